//! DCF Valuation - intrinsic share price from a discounted cash flow model
//!
//! This library provides:
//! - WACC from capital structure and CAPM market inputs
//! - Free cash flow projection with a Gordon-Shapiro terminal value
//! - Enterprise value to equity value to per-share price bridge
//! - Text and JSON reports for the CLI and serverless front ends

pub mod error;
pub mod inputs;
pub mod valuation;
pub mod report;

// Re-export commonly used types
pub use error::{InputError, ValuationError};
pub use inputs::ValuationInputs;
pub use valuation::{validate_and_compute, Valuation, ValuationEngine, ValuationResult, WaccResult};
pub use report::ValuationReport;
