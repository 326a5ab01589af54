//! WACC and discounted cash flow valuation

pub mod wacc;
pub mod dcf;
mod schedule;
mod engine;

pub use wacc::{compute_wacc, capm_cost_of_equity, WaccResult};
pub use dcf::{
    compute_dcf, base_fcff, nopat, project_fcffs, gordon_terminal_value, compound_factor, discount_factor,
};
pub use schedule::{CashflowRow, ValueBridge, ValuationResult};
pub use engine::{validate_and_compute, Valuation, ValuationEngine, MAX_FORECAST_PERIOD};
