//! Valuation inputs: company financials, capital structure and market assumptions

mod ranges;
pub mod loader;

pub use ranges::{Bounds, InputRanges, RangeViolation};
pub use loader::{load_inputs_csv, load_inputs_csv_from_reader, load_inputs_json};

use serde::{Deserialize, Serialize};

/// Capital-structure and market inputs consumed by the WACC calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructureInputs {
    pub market_cap: f64,
    pub total_debt: f64,
    pub interest_expense: f64,
    /// Corporate tax rate as a fraction
    pub tax_rate: f64,
    pub risk_free_rate: f64,
    pub beta: f64,
    /// Expected market return as a fraction
    pub market_return: f64,
}

/// Base-year (year 0) operating figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingInputs {
    pub ebit: f64,
    pub depreciation_amortization: f64,
    pub capex: f64,
    /// Change in net working capital
    pub delta_nwc: f64,
}

/// Forecast horizon and growth rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssumptions {
    /// Number of explicitly projected years
    pub forecast_period: u32,
    /// Growth applied to every explicit forecast year
    pub short_term_growth: f64,
    /// Growth beyond the explicit horizon, must stay below the discount rate
    pub perpetual_growth: f64,
}

/// Claims used to bridge enterprise value to a per-share price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalAccountInputs {
    pub total_debt: f64,
    pub cash: f64,
    pub shares_outstanding: f64,
}

/// Every scalar needed for one valuation request
///
/// Amounts are in a single currency unit (the reports assume millions).
/// Rates are fractions, e.g. 0.25 for 25%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationInputs {
    // Operating figures (year 0)
    pub ebit: f64,
    pub depreciation_amortization: f64,
    pub capex: f64,
    pub delta_nwc: f64,
    pub interest_expense: f64,

    // Capital structure and shares
    pub market_cap: f64,
    pub total_debt: f64,
    pub cash: f64,
    pub shares_outstanding: f64,

    // Market and growth assumptions
    pub tax_rate: f64,
    pub risk_free_rate: f64,
    pub market_return: f64,
    pub beta: f64,
    pub forecast_period: u32,
    pub short_term_growth: f64,
    pub perpetual_growth: f64,
}

impl ValuationInputs {
    /// Inputs seen by the WACC calculation
    pub fn capital_structure(&self) -> CapitalStructureInputs {
        CapitalStructureInputs {
            market_cap: self.market_cap,
            total_debt: self.total_debt,
            interest_expense: self.interest_expense,
            tax_rate: self.tax_rate,
            risk_free_rate: self.risk_free_rate,
            beta: self.beta,
            market_return: self.market_return,
        }
    }

    pub fn operating(&self) -> OperatingInputs {
        OperatingInputs {
            ebit: self.ebit,
            depreciation_amortization: self.depreciation_amortization,
            capex: self.capex,
            delta_nwc: self.delta_nwc,
        }
    }

    pub fn growth(&self) -> GrowthAssumptions {
        GrowthAssumptions {
            forecast_period: self.forecast_period,
            short_term_growth: self.short_term_growth,
            perpetual_growth: self.perpetual_growth,
        }
    }

    pub fn capital_accounts(&self) -> CapitalAccountInputs {
        CapitalAccountInputs {
            total_debt: self.total_debt,
            cash: self.cash,
            shares_outstanding: self.shares_outstanding,
        }
    }

    /// First field holding NaN or an infinity, in declaration order
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let fields = [
            ("ebit", self.ebit),
            ("depreciation_amortization", self.depreciation_amortization),
            ("capex", self.capex),
            ("delta_nwc", self.delta_nwc),
            ("interest_expense", self.interest_expense),
            ("market_cap", self.market_cap),
            ("total_debt", self.total_debt),
            ("cash", self.cash),
            ("shares_outstanding", self.shares_outstanding),
            ("tax_rate", self.tax_rate),
            ("risk_free_rate", self.risk_free_rate),
            ("market_return", self.market_return),
            ("beta", self.beta),
            ("short_term_growth", self.short_term_growth),
            ("perpetual_growth", self.perpetual_growth),
        ];

        fields
            .iter()
            .find(|(_, value)| !value.is_finite())
            .map(|&(name, _)| name)
    }
}

impl Default for ValuationInputs {
    /// Reference company used by the interactive calculator
    fn default() -> Self {
        Self {
            ebit: 500.0,
            depreciation_amortization: 80.0,
            capex: 120.0,
            delta_nwc: 30.0,
            interest_expense: 40.0,
            market_cap: 4000.0,
            total_debt: 1000.0,
            cash: 200.0,
            shares_outstanding: 100.0,
            tax_rate: 0.25,
            risk_free_rate: 0.03,
            market_return: 0.08,
            beta: 1.2,
            forecast_period: 5,
            short_term_growth: 0.05,
            perpetual_growth: 0.02,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_share_debt_and_tax() {
        let inputs = ValuationInputs { total_debt: 750.0, tax_rate: 0.3, ..Default::default() };

        assert_eq!(inputs.capital_structure().total_debt, 750.0);
        assert_eq!(inputs.capital_accounts().total_debt, 750.0);
        assert_eq!(inputs.capital_structure().tax_rate, 0.3);
    }

    #[test]
    fn test_non_finite_field() {
        assert_eq!(ValuationInputs::default().non_finite_field(), None);

        let inputs = ValuationInputs {
            beta: f64::NAN,
            cash: f64::INFINITY,
            ..Default::default()
        };
        // cash is declared before beta
        assert_eq!(inputs.non_finite_field(), Some("cash"));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let inputs: ValuationInputs =
            serde_json::from_str(r#"{"ebit": 650.0, "forecast_period": 8}"#).unwrap();

        assert_eq!(inputs.ebit, 650.0);
        assert_eq!(inputs.forecast_period, 8);
        assert_eq!(inputs.market_cap, 4000.0);
        assert_eq!(inputs.perpetual_growth, 0.02);
    }
}
