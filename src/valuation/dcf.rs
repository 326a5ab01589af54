//! Free cash flow projection and discounting
//!
//! FCFF(0) = EBIT * (1 - t) + D&A - CapEx - dNWC, grown at the short-term rate
//! for each explicit year, with a Gordon-Shapiro terminal value anchored on
//! the last explicit year.

use crate::inputs::{CapitalAccountInputs, GrowthAssumptions, OperatingInputs};
use super::schedule::ValuationResult;

/// Net operating profit after tax
pub fn nopat(ebit: f64, tax_rate: f64) -> f64 {
    ebit * (1.0 - tax_rate)
}

/// Base-year free cash flow to firm
pub fn base_fcff(operating: &OperatingInputs, tax_rate: f64) -> f64 {
    nopat(operating.ebit, tax_rate) + operating.depreciation_amortization
        - operating.capex
        - operating.delta_nwc
}

/// Project FCFF for years 1..=forecast_period at a constant growth rate
pub fn project_fcffs(base_fcff: f64, growth: f64, forecast_period: u32) -> Vec<f64> {
    (1..=forecast_period)
        .map(|year| base_fcff * (1.0 + growth).powf(f64::from(year)))
        .collect()
}

/// Growing perpetuity value at the horizon: CF * (1 + g) / (r - g)
///
/// Requires `discount_rate > growth`; the caller validates this.
pub fn gordon_terminal_value(last_fcff: f64, discount_rate: f64, growth: f64) -> f64 {
    last_fcff * (1.0 + growth) / (discount_rate - growth)
}

/// Growth of one unit over `periods` years, (1 + r)^n
pub fn compound_factor(rate: f64, periods: u32) -> f64 {
    (1.0 + rate).powf(f64::from(periods))
}

/// Present value factor for a cash flow `periods` years out
pub fn discount_factor(rate: f64, periods: u32) -> f64 {
    1.0 / compound_factor(rate, periods)
}

/// Run the DCF from base-year figures to a per-share price
///
/// Preconditions (checked by `validate_and_compute`, not here):
/// `wacc > growth.perpetual_growth` and `growth.forecast_period >= 1`.
pub fn compute_dcf(
    operating: &OperatingInputs,
    tax_rate: f64,
    wacc: f64,
    growth: &GrowthAssumptions,
    accounts: &CapitalAccountInputs,
) -> ValuationResult {
    let nopat = nopat(operating.ebit, tax_rate);
    let base_fcff = base_fcff(operating, tax_rate);

    let projected_fcffs = project_fcffs(base_fcff, growth.short_term_growth, growth.forecast_period);

    let last_fcff = projected_fcffs.last().copied().unwrap_or(base_fcff);
    let terminal_value = gordon_terminal_value(last_fcff, wacc, growth.perpetual_growth);

    // Year y (1-indexed) is discounted y periods
    let discounted_fcffs: Vec<f64> = (1..=growth.forecast_period)
        .zip(&projected_fcffs)
        .map(|(year, fcff)| fcff / compound_factor(wacc, year))
        .collect();
    let pv_terminal_value = terminal_value / compound_factor(wacc, growth.forecast_period);

    let enterprise_value = discounted_fcffs.iter().sum::<f64>() + pv_terminal_value;
    let equity_value = enterprise_value - accounts.total_debt + accounts.cash;

    let share_price = if accounts.shares_outstanding > 0.0 {
        equity_value / accounts.shares_outstanding
    } else {
        0.0
    };

    ValuationResult {
        share_price,
        enterprise_value,
        equity_value,
        projected_fcffs,
        terminal_value,
        nopat,
        base_fcff,
        discount_rate: wacc,
        discounted_fcffs,
        pv_terminal_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_operating() -> OperatingInputs {
        OperatingInputs {
            ebit: 500.0,
            depreciation_amortization: 80.0,
            capex: 120.0,
            delta_nwc: 30.0,
        }
    }

    fn reference_growth() -> GrowthAssumptions {
        GrowthAssumptions {
            forecast_period: 5,
            short_term_growth: 0.05,
            perpetual_growth: 0.02,
        }
    }

    fn reference_accounts() -> CapitalAccountInputs {
        CapitalAccountInputs {
            total_debt: 1000.0,
            cash: 200.0,
            shares_outstanding: 100.0,
        }
    }

    #[test]
    fn test_base_year_fcff() {
        assert_relative_eq!(nopat(500.0, 0.25), 375.0);
        // 375 + 80 - 120 - 30
        assert_relative_eq!(base_fcff(&reference_operating(), 0.25), 305.0);
    }

    #[test]
    fn test_projection_length_and_endpoints() {
        let fcffs = project_fcffs(305.0, 0.05, 5);

        assert_eq!(fcffs.len(), 5);
        assert_relative_eq!(fcffs[0], 305.0 * 1.05, max_relative = 1e-12);
        assert_relative_eq!(fcffs[4], 305.0 * 1.05_f64.powi(5), max_relative = 1e-12);
    }

    #[test]
    fn test_zero_growth_is_flat() {
        let fcffs = project_fcffs(305.0, 0.0, 7);
        assert!(fcffs.iter().all(|&f| f == 305.0));
    }

    #[test]
    fn test_reference_valuation() {
        let result = compute_dcf(
            &reference_operating(),
            0.25,
            0.078,
            &reference_growth(),
            &reference_accounts(),
        );

        assert_relative_eq!(result.terminal_value, 6845.710242995693, max_relative = 1e-12);
        assert_relative_eq!(result.pv_terminal_value, 4702.455653646152, max_relative = 1e-12);
        assert_relative_eq!(result.enterprise_value, 6112.660509841859, max_relative = 1e-12);
        assert_relative_eq!(result.equity_value, 5312.660509841859, max_relative = 1e-12);
        assert_eq!(result.share_price, 53.12660509841859);
    }

    #[test]
    fn test_discount_exponent_is_forecast_year() {
        let result = compute_dcf(
            &reference_operating(),
            0.25,
            0.10,
            &reference_growth(),
            &reference_accounts(),
        );

        for (idx, (projected, discounted)) in result
            .projected_fcffs
            .iter()
            .zip(&result.discounted_fcffs)
            .enumerate()
        {
            let year = idx as i32 + 1;
            assert_relative_eq!(*discounted, projected / 1.10_f64.powi(year), max_relative = 1e-12);
        }
        assert_relative_eq!(
            result.pv_terminal_value,
            result.terminal_value / 1.10_f64.powi(5),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_shares_gives_zero_price() {
        let accounts = CapitalAccountInputs { shares_outstanding: 0.0, ..reference_accounts() };
        let result = compute_dcf(&reference_operating(), 0.25, 0.078, &reference_growth(), &accounts);

        assert_eq!(result.share_price, 0.0);
        assert!(result.equity_value > 0.0);
    }

    #[test]
    fn test_terminal_value_uses_last_projected_year() {
        let result = compute_dcf(
            &reference_operating(),
            0.25,
            0.09,
            &reference_growth(),
            &reference_accounts(),
        );
        let last = *result.projected_fcffs.last().unwrap();
        assert_relative_eq!(result.terminal_value, last * 1.02 / 0.07, max_relative = 1e-12);
    }
}
