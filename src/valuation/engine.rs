//! Valuation engine: WACC, discount-rate guard, then the DCF

use crate::error::ValuationError;
use crate::inputs::{InputRanges, RangeViolation, ValuationInputs};
use super::dcf::compute_dcf;
use super::schedule::{CashflowRow, ValueBridge, ValuationResult};
use super::wacc::{compute_wacc, WaccResult};
use serde::Serialize;

/// Complete answer to one valuation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    pub inputs: ValuationInputs,
    pub wacc: WaccResult,
    pub result: ValuationResult,
    /// Inputs outside the recognized ranges (valued anyway)
    pub range_warnings: Vec<RangeViolation>,
}

impl Valuation {
    pub fn share_price(&self) -> f64 {
        self.result.share_price
    }

    pub fn after_tax_cost_of_debt(&self) -> f64 {
        self.wacc.after_tax_cost_of_debt(self.inputs.tax_rate)
    }

    pub fn schedule(&self) -> Vec<CashflowRow> {
        self.result.schedule()
    }

    pub fn bridge(&self) -> ValueBridge {
        self.result.bridge(&self.inputs.capital_accounts())
    }
}

/// Longest explicit horizon the projection accepts, in years
pub const MAX_FORECAST_PERIOD: u32 = 100;

/// Runs valuation requests against a fixed set of recognized input ranges
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    ranges: InputRanges,
}

impl ValuationEngine {
    /// Value one company
    ///
    /// The projection only runs when the discount rate exceeds the perpetual
    /// growth rate; otherwise no `ValuationResult` is produced.
    pub fn value(&self, inputs: &ValuationInputs) -> Result<Valuation, ValuationError> {
        if let Some(field) = inputs.non_finite_field() {
            return Err(ValuationError::NonFiniteInput { field });
        }
        if inputs.forecast_period == 0 {
            return Err(ValuationError::EmptyForecastPeriod);
        }
        if inputs.forecast_period > MAX_FORECAST_PERIOD {
            return Err(ValuationError::ForecastPeriodTooLong {
                years: inputs.forecast_period,
                max: MAX_FORECAST_PERIOD,
            });
        }

        let range_warnings = self.ranges.check(inputs);
        for violation in &range_warnings {
            log::warn!(
                "{} = {} outside recognized range [{}, {}]",
                violation.field, violation.value, violation.min, violation.max
            );
        }

        let wacc = compute_wacc(&inputs.capital_structure());
        log::debug!(
            "WACC {:.6} (Ke {:.6}, Kd {:.6}, We {:.4}, Wd {:.4})",
            wacc.wacc, wacc.cost_of_equity, wacc.cost_of_debt, wacc.weight_equity, wacc.weight_debt
        );

        // Negated so a NaN rate is refused as well
        if !(wacc.wacc > inputs.perpetual_growth) {
            return Err(ValuationError::InvalidDiscountRate {
                wacc: wacc.wacc,
                perpetual_growth: inputs.perpetual_growth,
            });
        }

        let result = compute_dcf(
            &inputs.operating(),
            inputs.tax_rate,
            wacc.wacc,
            &inputs.growth(),
            &inputs.capital_accounts(),
        );
        log::debug!(
            "EV {:.2}, equity {:.2}, price {:.4}",
            result.enterprise_value, result.equity_value, result.share_price
        );

        Ok(Valuation {
            inputs: *inputs,
            wacc,
            result,
            range_warnings,
        })
    }
}

/// Value one company with the default recognized ranges
pub fn validate_and_compute(inputs: &ValuationInputs) -> Result<Valuation, ValuationError> {
    ValuationEngine::default().value(inputs)
}
