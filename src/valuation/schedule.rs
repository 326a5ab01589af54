//! Valuation output structures: per-year schedule and value bridge

use crate::inputs::CapitalAccountInputs;
use serde::{Deserialize, Serialize};

/// One explicit forecast year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    /// Forecast year, starting at 1
    pub year: u32,
    pub projected_fcff: f64,
    pub discount_factor: f64,
    pub discounted_fcff: f64,
}

/// Walk from enterprise value to the per-share price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBridge {
    pub sum_discounted_fcff: f64,
    pub pv_terminal_value: f64,
    pub enterprise_value: f64,
    pub less_total_debt: f64,
    pub plus_cash: f64,
    pub equity_value: f64,
    pub shares_outstanding: f64,
    pub share_price: f64,
}

/// Result of a DCF run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub share_price: f64,
    pub enterprise_value: f64,
    pub equity_value: f64,
    /// Projected FCFF, one per forecast year, chronological
    pub projected_fcffs: Vec<f64>,
    /// Terminal value as of the end of the explicit horizon (undiscounted)
    pub terminal_value: f64,

    // Supporting figures
    pub nopat: f64,
    pub base_fcff: f64,
    pub discount_rate: f64,
    pub discounted_fcffs: Vec<f64>,
    pub pv_terminal_value: f64,
}

impl ValuationResult {
    pub fn sum_discounted_fcff(&self) -> f64 {
        self.discounted_fcffs.iter().sum()
    }

    /// Per-year projected vs discounted cash flow
    pub fn schedule(&self) -> Vec<CashflowRow> {
        self.projected_fcffs
            .iter()
            .zip(&self.discounted_fcffs)
            .enumerate()
            .map(|(idx, (&projected_fcff, &discounted_fcff))| CashflowRow {
                year: idx as u32 + 1,
                projected_fcff,
                discount_factor: super::dcf::discount_factor(self.discount_rate, idx as u32 + 1),
                discounted_fcff,
            })
            .collect()
    }

    /// Enterprise value to share price, using the same claims the DCF ran with
    pub fn bridge(&self, accounts: &CapitalAccountInputs) -> ValueBridge {
        ValueBridge {
            sum_discounted_fcff: self.sum_discounted_fcff(),
            pv_terminal_value: self.pv_terminal_value,
            enterprise_value: self.enterprise_value,
            less_total_debt: accounts.total_debt,
            plus_cash: accounts.cash,
            equity_value: self.equity_value,
            shares_outstanding: accounts.shares_outstanding,
            share_price: self.share_price,
        }
    }

    /// Share of enterprise value coming from the terminal value
    pub fn terminal_value_share(&self) -> f64 {
        if self.enterprise_value == 0.0 {
            return 0.0;
        }
        self.pv_terminal_value / self.enterprise_value
    }
}
