//! Recognized input ranges of the interactive calculator
//!
//! These are informative only: values outside them are valued as given, the
//! engine just logs a warning.

use super::ValuationInputs;
use serde::Serialize;

/// A closed interval `[min, max]` for one input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// An input outside its recognized range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeViolation {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Slider ranges of the reference interface, as fractions (years for the horizon)
#[derive(Debug, Clone, Copy)]
pub struct InputRanges {
    pub tax_rate: Bounds,
    pub risk_free_rate: Bounds,
    pub market_return: Bounds,
    pub beta: Bounds,
    pub forecast_period: Bounds,
    pub short_term_growth: Bounds,
    pub perpetual_growth: Bounds,
}

impl Default for InputRanges {
    fn default() -> Self {
        Self {
            tax_rate: Bounds::new(0.0, 0.50),
            risk_free_rate: Bounds::new(0.0, 0.10),
            market_return: Bounds::new(0.05, 0.15),
            beta: Bounds::new(0.5, 2.5),
            forecast_period: Bounds::new(3.0, 10.0),
            short_term_growth: Bounds::new(0.0, 0.20),
            perpetual_growth: Bounds::new(0.0, 0.05),
        }
    }
}

impl InputRanges {
    /// List every input lying outside its range, in declaration order
    pub fn check(&self, inputs: &ValuationInputs) -> Vec<RangeViolation> {
        let candidates = [
            ("tax_rate", inputs.tax_rate, self.tax_rate),
            ("risk_free_rate", inputs.risk_free_rate, self.risk_free_rate),
            ("market_return", inputs.market_return, self.market_return),
            ("beta", inputs.beta, self.beta),
            ("forecast_period", inputs.forecast_period as f64, self.forecast_period),
            ("short_term_growth", inputs.short_term_growth, self.short_term_growth),
            ("perpetual_growth", inputs.perpetual_growth, self.perpetual_growth),
        ];

        candidates
            .iter()
            .filter(|(_, value, bounds)| !bounds.contains(*value))
            .map(|&(field, value, bounds)| RangeViolation {
                field,
                value,
                min: bounds.min,
                max: bounds.max,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_defaults_in_range() {
        let ranges = InputRanges::default();
        assert!(ranges.check(&ValuationInputs::default()).is_empty());
    }

    #[test]
    fn test_reports_out_of_range_fields() {
        let inputs = ValuationInputs {
            beta: 3.1,
            forecast_period: 15,
            ..Default::default()
        };

        let violations = InputRanges::default().check(&inputs);
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();

        assert_eq!(fields, vec!["beta", "forecast_period"]);
        assert_eq!(violations[1].value, 15.0);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = Bounds::new(0.0, 0.05);
        assert!(bounds.contains(0.0));
        assert!(bounds.contains(0.05));
        assert!(!bounds.contains(0.0501));
    }
}
