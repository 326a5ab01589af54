//! Error types for valuation runs and input loading

use thiserror::Error;

/// Reasons a valuation request is refused before any projection is run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    /// The Gordon-Shapiro terminal value needs a discount rate above the
    /// perpetual growth rate
    #[error(
        "WACC ({:.2}%) must be greater than the perpetual growth rate ({:.2}%) for the terminal value to be valid",
        .wacc * 100.0,
        .perpetual_growth * 100.0
    )]
    InvalidDiscountRate { wacc: f64, perpetual_growth: f64 },

    /// No explicit forecast year to anchor the terminal value on
    #[error("forecast period must be at least one year")]
    EmptyForecastPeriod,

    /// Horizon beyond what the projection will allocate
    #[error("forecast period of {years} years exceeds the maximum of {max}")]
    ForecastPeriodTooLong { years: u32, max: u32 },

    /// NaN or infinite input, which would slip past the discount-rate guard
    #[error("{field} is not a finite number")]
    NonFiniteInput { field: &'static str },
}

/// Failures while reading valuation inputs from disk
#[derive(Debug, Error)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record parsed but carries a value the model cannot use
    #[error("row {row}: {message}")]
    Invalid { row: usize, message: String },
}
