//! Presentation of valuation results: text report, JSON report, CSV output
//!
//! Amounts are assumed to be in millions of the chosen currency; the share
//! price is per share.

use crate::error::ValuationError;
use crate::inputs::{RangeViolation, ValuationInputs};
use crate::valuation::{CashflowRow, Valuation, ValueBridge};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::io;

/// Discount-rate components as shown to users
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WaccSummary {
    pub wacc: f64,
    pub cost_of_equity: f64,
    pub cost_of_debt: f64,
    pub after_tax_cost_of_debt: f64,
    pub weight_equity: f64,
    pub weight_debt: f64,
}

/// Serializable report of one valuation
#[derive(Debug, Clone, Serialize)]
pub struct ValuationReport {
    pub generated_at: DateTime<Utc>,
    pub inputs: ValuationInputs,
    pub wacc: WaccSummary,
    pub share_price: f64,
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub terminal_value: f64,
    pub pv_terminal_value: f64,
    /// Fraction of enterprise value contributed by the terminal value
    pub terminal_value_share: f64,
    pub schedule: Vec<CashflowRow>,
    pub bridge: ValueBridge,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RangeViolation>,
}

impl ValuationReport {
    pub fn from_valuation(valuation: &Valuation) -> Self {
        Self {
            generated_at: Utc::now(),
            inputs: valuation.inputs,
            wacc: WaccSummary {
                wacc: valuation.wacc.wacc,
                cost_of_equity: valuation.wacc.cost_of_equity,
                cost_of_debt: valuation.wacc.cost_of_debt,
                after_tax_cost_of_debt: valuation.after_tax_cost_of_debt(),
                weight_equity: valuation.wacc.weight_equity,
                weight_debt: valuation.wacc.weight_debt,
            },
            share_price: valuation.result.share_price,
            enterprise_value: valuation.result.enterprise_value,
            equity_value: valuation.result.equity_value,
            terminal_value: valuation.result.terminal_value,
            pv_terminal_value: valuation.result.pv_terminal_value,
            terminal_value_share: valuation.result.terminal_value_share(),
            schedule: valuation.schedule(),
            bridge: valuation.bridge(),
            warnings: valuation.range_warnings.clone(),
        }
    }

    /// Human-readable report, amounts suffixed with `currency`
    pub fn text<'a>(&'a self, currency: &'a str) -> TextReport<'a> {
        TextReport { report: self, currency }
    }
}

/// Text rendering of a `ValuationReport`
pub struct TextReport<'a> {
    report: &'a ValuationReport,
    currency: &'a str,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let cur = self.currency;
        let inputs = &r.inputs;

        writeln!(f, "Valuation Results")?;
        writeln!(f, "=================")?;
        writeln!(f, "  Estimated share price: {} {}", format_amount(r.share_price, 2), cur)?;
        writeln!(f, "  Enterprise value (EV): {} M{}", format_amount(r.enterprise_value, 0), cur)?;
        writeln!(f, "  Equity value:          {} M{}", format_amount(r.equity_value, 0), cur)?;

        writeln!(f, "\nWACC")?;
        writeln!(f, "  Cost of equity (Ke):         {}", format_pct(r.wacc.cost_of_equity))?;
        writeln!(f, "  Cost of debt (Kd after tax): {}", format_pct(r.wacc.after_tax_cost_of_debt))?;
        writeln!(f, "  WACC (discount rate):        {}", format_pct(r.wacc.wacc))?;
        let equity = format_amount(inputs.market_cap, 0);
        let debt = format_amount(inputs.total_debt, 0);
        writeln!(
            f,
            "  WACC = {e} / ({e} + {d}) x {} + {d} / ({e} + {d}) x {} x (1 - {:.0}%) = {}",
            format_pct(r.wacc.cost_of_equity),
            format_pct(r.wacc.cost_of_debt),
            inputs.tax_rate * 100.0,
            format_pct(r.wacc.wacc),
            e = equity,
            d = debt,
        )?;

        writeln!(f, "\nFree Cash Flow Projection")?;
        writeln!(f, "{:>6} {:>16} {:>16}", "Year", "Projected FCF", "Discounted FCF")?;
        writeln!(f, "{}", "-".repeat(40))?;
        for row in &r.schedule {
            writeln!(
                f,
                "{:>6} {:>16} {:>16}",
                row.year,
                format_amount(row.projected_fcff, 2),
                format_amount(row.discounted_fcff, 2)
            )?;
        }

        writeln!(f, "\nTerminal Value")?;
        writeln!(
            f,
            "  Terminal value (flows beyond year {}): {} M{}",
            r.schedule.len(),
            format_amount(r.terminal_value, 0),
            cur
        )?;
        writeln!(f, "  Present value: {} M{}", format_amount(r.pv_terminal_value, 0), cur)?;
        writeln!(f, "  Share of enterprise value: {}", format_pct(r.terminal_value_share))?;

        let b = &r.bridge;
        writeln!(f, "\nEnterprise Value to Share Price")?;
        writeln!(
            f,
            "  Enterprise value (sum of discounted FCF + PV of TV) : {} + {} = {} M{}",
            format_amount(b.sum_discounted_fcff, 0),
            format_amount(b.pv_terminal_value, 0),
            format_amount(b.enterprise_value, 0),
            cur
        )?;
        writeln!(f, "  (-) Total debt                                      : -{} M{}", format_amount(b.less_total_debt, 0), cur)?;
        writeln!(f, "  (+) Cash                                            : +{} M{}", format_amount(b.plus_cash, 0), cur)?;
        writeln!(f, "  = Equity value                                      : {} M{}", format_amount(b.equity_value, 0), cur)?;
        writeln!(f, "  (/) Shares outstanding                              : {}", format_amount(b.shares_outstanding, 0))?;
        writeln!(f, "  = ESTIMATED SHARE PRICE                             : {} {}", format_amount(b.share_price, 2), cur)?;

        if !r.warnings.is_empty() {
            writeln!(f, "\nInputs outside recognized ranges:")?;
            for w in &r.warnings {
                writeln!(f, "  {} = {} (expected {} to {})", w.field, w.value, w.min, w.max)?;
            }
        }

        Ok(())
    }
}

/// One line of batch output; failed rows carry the error instead of figures
#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub row: usize,
    pub share_price: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub equity_value: Option<f64>,
    pub wacc: Option<f64>,
    pub error: Option<String>,
}

impl BatchRow {
    pub fn from_outcome(row: usize, outcome: &Result<Valuation, ValuationError>) -> Self {
        match outcome {
            Ok(v) => Self {
                row,
                share_price: Some(v.result.share_price),
                enterprise_value: Some(v.result.enterprise_value),
                equity_value: Some(v.result.equity_value),
                wacc: Some(v.wacc.wacc),
                error: None,
            },
            Err(e) => Self {
                row,
                share_price: None,
                enterprise_value: None,
                equity_value: None,
                wacc: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Write the per-year schedule as CSV
pub fn write_schedule_csv<W: io::Write>(rows: &[CashflowRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write batch results as CSV
pub fn write_batch_csv<W: io::Write>(rows: &[BatchRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Fixed-decimal number with comma thousands separators, e.g. 6,112.66
pub fn format_amount(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // No "-0.00" after rounding
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Fraction as a percentage with two decimals, e.g. 0.078 -> "7.80%"
pub fn format_pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::validate_and_compute;

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(6112.660509841859, 0), "6,113");
        assert_eq!(format_amount(6112.660509841859, 2), "6,112.66");
        assert_eq!(format_amount(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(format_amount(999.0, 0), "999");
        assert_eq!(format_amount(-1500.5, 1), "-1,500.5");
        assert_eq!(format_amount(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(0.078), "7.80%");
        assert_eq!(format_pct(0.09), "9.00%");
        assert_eq!(format_pct(0.0), "0.00%");
    }

    #[test]
    fn test_text_report_contains_headline_figures() {
        let valuation = validate_and_compute(&ValuationInputs::default()).unwrap();
        let text = ValuationReport::from_valuation(&valuation).text("€").to_string();

        assert!(text.contains("Estimated share price: 53.13 €"));
        assert!(text.contains("Enterprise value (EV): 6,113 M€"));
        assert!(text.contains("Equity value:          5,313 M€"));
        assert!(text.contains("WACC (discount rate):        7.80%"));
        assert!(text.contains("Cost of debt (Kd after tax): 3.00%"));
        assert!(text.contains("(-) Total debt"));
        assert!(text.contains("Share of enterprise value: 76.93%"));
        assert!(text.contains("WACC = 4,000 / (4,000 + 1,000) x 9.00% + 1,000 / (4,000 + 1,000) x 4.00% x (1 - 25%) = 7.80%"));
        assert!(!text.contains("outside recognized ranges"));
    }

    #[test]
    fn test_json_report_shape() {
        let valuation = validate_and_compute(&ValuationInputs::default()).unwrap();
        let report = ValuationReport::from_valuation(&valuation);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["schedule"].as_array().unwrap().len(), 5);
        assert_eq!(json["schedule"][0]["year"], 1);
        assert!(json["generated_at"].is_string());
        assert!(json.get("warnings").is_none());
        assert_eq!(json["inputs"]["forecast_period"], 5);
        let share = json["terminal_value_share"].as_f64().unwrap();
        assert!((share - 4702.455653646152 / 6112.660509841859).abs() < 1e-12);
    }

    #[test]
    fn test_batch_row_from_error() {
        let outcome = Err(ValuationError::EmptyForecastPeriod);
        let row = BatchRow::from_outcome(4, &outcome);

        assert_eq!(row.row, 4);
        assert!(row.share_price.is_none());
        assert_eq!(row.error.as_deref(), Some("forecast period must be at least one year"));
    }

    #[test]
    fn test_schedule_csv_header() {
        let valuation = validate_and_compute(&ValuationInputs::default()).unwrap();
        let mut buf = Vec::new();
        write_schedule_csv(&valuation.schedule(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("year,projected_fcff,discount_factor,discounted_fcff"));
        assert_eq!(lines.count(), 5);
    }
}
