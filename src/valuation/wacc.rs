//! Weighted Average Cost of Capital
//!
//! Cost of equity via CAPM, cost of debt as interest expense over total debt,
//! blended with market-value weights and the debt tax shield.

use crate::inputs::CapitalStructureInputs;
use serde::{Deserialize, Serialize};

/// Discount rate and its components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaccResult {
    pub wacc: f64,
    pub cost_of_equity: f64,
    /// Pre-tax cost of debt
    pub cost_of_debt: f64,
    /// E / (E + D)
    pub weight_equity: f64,
    /// D / (E + D)
    pub weight_debt: f64,
}

impl WaccResult {
    /// Cost of debt net of the tax shield, Kd * (1 - t)
    pub fn after_tax_cost_of_debt(&self, tax_rate: f64) -> f64 {
        self.cost_of_debt * (1.0 - tax_rate)
    }
}

/// CAPM cost of equity: rf + beta * (rm - rf)
///
/// No bounds are applied; an extreme beta yields an extreme rate.
pub fn capm_cost_of_equity(risk_free_rate: f64, beta: f64, market_return: f64) -> f64 {
    risk_free_rate + beta * (market_return - risk_free_rate)
}

/// Compute WACC from capital structure and market inputs
///
/// Zero total capitalization returns an all-zero result, and zero debt
/// gives a zero cost of debt regardless of interest expense.
pub fn compute_wacc(inputs: &CapitalStructureInputs) -> WaccResult {
    let total_value = inputs.market_cap + inputs.total_debt;
    if total_value == 0.0 {
        return WaccResult::default();
    }

    let weight_equity = inputs.market_cap / total_value;
    let weight_debt = inputs.total_debt / total_value;

    let cost_of_equity =
        capm_cost_of_equity(inputs.risk_free_rate, inputs.beta, inputs.market_return);

    let cost_of_debt = if inputs.total_debt > 0.0 {
        inputs.interest_expense / inputs.total_debt
    } else {
        0.0
    };

    let wacc = weight_equity * cost_of_equity
        + weight_debt * cost_of_debt * (1.0 - inputs.tax_rate);

    WaccResult {
        wacc,
        cost_of_equity,
        cost_of_debt,
        weight_equity,
        weight_debt,
    }
}
