//! DCF Valuation CLI
//!
//! Values a company from flags, environment variables (DCF_*), a JSON inputs
//! document, or a CSV of companies.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dcf_valuation::{
    inputs::{load_inputs_csv, load_inputs_json},
    report::{write_batch_csv, write_schedule_csv, BatchRow},
    valuation::MAX_FORECAST_PERIOD,
    ValuationEngine, ValuationInputs, ValuationReport,
};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "dcf_valuation", version, about = "Discounted cash flow share price calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Value a single company
    Value(ValueArgs),
    /// Value every row of a CSV file independently
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct ValueArgs {
    /// JSON document with ValuationInputs (rates as fractions); replaces the flags below
    #[arg(long)]
    inputs: Option<PathBuf>,

    #[command(flatten)]
    company: CompanyArgs,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Also write the per-year schedule to this CSV file
    #[arg(long)]
    schedule_csv: Option<PathBuf>,

    /// Currency symbol used in the text report
    #[arg(long, env = "DCF_CURRENCY", default_value = "€")]
    currency: String,
}

/// Company inputs. Rates are given in percent, as on the calculator sliders.
#[derive(Debug, Args)]
struct CompanyArgs {
    /// EBIT (earnings before interest and taxes)
    #[arg(long, env = "DCF_EBIT", default_value_t = 500.0, allow_negative_numbers = true)]
    ebit: f64,

    /// Depreciation & amortization
    #[arg(long, env = "DCF_DA", default_value_t = 80.0, allow_negative_numbers = true)]
    da: f64,

    /// Capital expenditure
    #[arg(long, env = "DCF_CAPEX", default_value_t = 120.0, allow_negative_numbers = true)]
    capex: f64,

    /// Change in net working capital
    #[arg(long, env = "DCF_DELTA_NWC", default_value_t = 30.0, allow_negative_numbers = true)]
    delta_nwc: f64,

    #[arg(long, env = "DCF_INTEREST_EXPENSE", default_value_t = 40.0)]
    interest_expense: f64,

    #[arg(long, env = "DCF_MARKET_CAP", default_value_t = 4000.0)]
    market_cap: f64,

    #[arg(long, env = "DCF_TOTAL_DEBT", default_value_t = 1000.0)]
    total_debt: f64,

    /// Cash and equivalents
    #[arg(long, env = "DCF_CASH", default_value_t = 200.0)]
    cash: f64,

    #[arg(long, env = "DCF_SHARES", default_value_t = 100.0)]
    shares: f64,

    /// Tax rate (%)
    #[arg(long, env = "DCF_TAX_RATE", default_value_t = 25.0)]
    tax_rate: f64,

    /// Risk-free rate (%)
    #[arg(long, env = "DCF_RISK_FREE_RATE", default_value_t = 3.0)]
    risk_free_rate: f64,

    /// Expected market return (%)
    #[arg(long, env = "DCF_MARKET_RETURN", default_value_t = 8.0)]
    market_return: f64,

    #[arg(long, env = "DCF_BETA", default_value_t = 1.2, allow_negative_numbers = true)]
    beta: f64,

    /// Explicit forecast period (years)
    #[arg(
        long,
        env = "DCF_FORECAST_YEARS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_FORECAST_PERIOD))
    )]
    forecast_years: u32,

    /// Short-term FCF growth (%)
    #[arg(long, env = "DCF_SHORT_TERM_GROWTH", default_value_t = 5.0, allow_negative_numbers = true)]
    short_term_growth: f64,

    /// Perpetual growth (%)
    #[arg(long, env = "DCF_PERPETUAL_GROWTH", default_value_t = 2.0, allow_negative_numbers = true)]
    perpetual_growth: f64,
}

impl CompanyArgs {
    fn to_inputs(&self) -> ValuationInputs {
        ValuationInputs {
            ebit: self.ebit,
            depreciation_amortization: self.da,
            capex: self.capex,
            delta_nwc: self.delta_nwc,
            interest_expense: self.interest_expense,
            market_cap: self.market_cap,
            total_debt: self.total_debt,
            cash: self.cash,
            shares_outstanding: self.shares,
            tax_rate: self.tax_rate / 100.0,
            risk_free_rate: self.risk_free_rate / 100.0,
            market_return: self.market_return / 100.0,
            beta: self.beta,
            forecast_period: self.forecast_years,
            short_term_growth: self.short_term_growth / 100.0,
            perpetual_growth: self.perpetual_growth / 100.0,
        }
    }
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// CSV with one company per row (ValuationInputs field names, rates as fractions)
    input: PathBuf,

    /// Write results as CSV instead of printing a summary
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Value(args) => run_value(&args),
        Command::Batch(args) => run_batch(&args),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_value(args: &ValueArgs) -> Result<ExitCode> {
    let inputs = match &args.inputs {
        Some(path) => load_inputs_json(path)
            .with_context(|| format!("loading inputs from {}", path.display()))?,
        None => args.company.to_inputs(),
    };

    let engine = ValuationEngine::default();
    let valuation = match engine.value(&inputs) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("Critical error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    let report = ValuationReport::from_valuation(&valuation);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Amounts are in millions of {}; the share price is per share.\n", args.currency);
        print!("{}", report.text(&args.currency));
    }

    if let Some(path) = &args.schedule_csv {
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_schedule_csv(&report.schedule, file)?;
        log::info!("Schedule written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn run_batch(args: &BatchArgs) -> Result<ExitCode> {
    let companies = load_inputs_csv(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    log::info!("Valuing {} companies from {}", companies.len(), args.input.display());

    let engine = ValuationEngine::default();
    let rows: Vec<BatchRow> = companies
        .iter()
        .enumerate()
        .map(|(idx, inputs)| BatchRow::from_outcome(idx + 1, &engine.value(inputs)))
        .collect();

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_batch_csv(&rows, file)?;
            println!("{} results written to {}", rows.len(), path.display());
        }
        None => {
            println!("{:>5} {:>14} {:>16} {:>16} {:>8}", "Row", "SharePrice", "EV", "Equity", "WACC");
            println!("{}", "-".repeat(63));
            for row in &rows {
                match (&row.error, row.share_price, row.enterprise_value, row.equity_value, row.wacc) {
                    (None, Some(price), Some(ev), Some(equity), Some(wacc)) => println!(
                        "{:>5} {:>14.2} {:>16.0} {:>16.0} {:>7.2}%",
                        row.row, price, ev, equity, wacc * 100.0
                    ),
                    (error, ..) => println!(
                        "{:>5} {}",
                        row.row,
                        error.as_deref().unwrap_or("no result")
                    ),
                }
            }
        }
    }

    let failed = rows.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        log::warn!("{} of {} rows could not be valued", failed, rows.len());
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(args: &[&str]) -> ValuationInputs {
        let mut argv = vec!["dcf_valuation", "value"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Value(value) => value.company.to_inputs(),
            Command::Batch(_) => panic!("expected the value subcommand"),
        }
    }

    #[test]
    fn test_percent_flags_become_fractions() {
        let inputs = company(&[
            "--tax-rate", "25",
            "--risk-free-rate", "3.5",
            "--market-return", "9",
            "--short-term-growth", "-2",
            "--perpetual-growth", "1.5",
        ]);

        assert_eq!(inputs.tax_rate, 0.25);
        assert_eq!(inputs.risk_free_rate, 0.035);
        assert_eq!(inputs.market_return, 0.09);
        assert_eq!(inputs.short_term_growth, -0.02);
        assert_eq!(inputs.perpetual_growth, 0.015);
    }

    #[test]
    fn test_flag_defaults_match_reference_company() {
        assert_eq!(company(&[]), ValuationInputs::default());
    }

    #[test]
    fn test_forecast_years_bounds() {
        assert_eq!(company(&["--forecast-years", "100"]).forecast_period, 100);

        for years in ["0", "101", "3000000000"] {
            let parsed = Cli::try_parse_from(["dcf_valuation", "value", "--forecast-years", years]);
            assert!(parsed.is_err(), "{years} years should be refused");
        }
    }
}
