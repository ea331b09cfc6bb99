//! Cycle Profit Calculator
//!
//! Closed-form economics of one stocking-to-harvest cycle. Every step below
//! runs in a fixed order so that results are bit-for-bit reproducible;
//! nothing here validates, clamps, logs or allocates. A zero total cost
//! makes the feed cost ratio `NaN`/`inf`, and that value is returned as-is.

use serde::{Deserialize, Serialize};

use super::params::CycleParameters;

/// Length of a production cycle in months
pub const CYCLE_MONTHS: f64 = 4.0;

/// Derived financial outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleResult {
    /// Feed + seed + labor + rent + other
    pub total_cost: f64,

    /// Harvested biomass × market price
    pub revenue: f64,

    /// Revenue - total cost (negative is a loss)
    pub net_profit: f64,

    /// Purchased feed needed for the cycle (kg)
    pub commercial_feed_kg: f64,

    /// Fish alive at harvest
    pub alive_fish: f64,

    /// Commercial feed cost as a percentage of total cost
    pub feed_cost_ratio: f64,
}

impl CycleResult {
    /// Net profit as a percentage of revenue
    pub fn profit_margin_pct(&self) -> f64 {
        (self.net_profit / self.revenue) * 100.0
    }

    /// Fill level of the profitability bar (0-100); empty when the margin is NaN
    pub fn profitability_bar_pct(&self) -> f64 {
        let margin = self.profit_margin_pct();
        if margin.is_nan() {
            0.0
        } else {
            margin.abs().min(100.0)
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.net_profit >= 0.0
    }
}

/// Result plus the intermediate figures the report breaks costs into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleAnalysis {
    pub result: CycleResult,

    /// Biomass gained between stocking and harvest (kg)
    pub total_weight_gain: f64,

    pub feed_cost: f64,
    pub seed_cost: f64,
    pub labor_cost: f64,
}

/// Run the full calculation, keeping the intermediates
pub fn analyze(params: &CycleParameters) -> CycleAnalysis {
    let alive_fish = params.fingerlings * params.survival_rate;

    let total_weight_gain = alive_fish * (params.harvest_weight - params.fingerling_weight);

    let commercial_feed_kg = total_weight_gain * params.fcr * (1.0 - params.natural_feed_ratio);

    let feed_cost = commercial_feed_kg * params.feed_price;

    let seed_cost = params.fingerlings * params.fingerling_price;

    let labor_cost = params.labor_per_month * CYCLE_MONTHS;

    let total_cost = feed_cost + seed_cost + labor_cost + params.pond_rent + params.other_cost;

    let revenue = alive_fish * params.harvest_weight * params.market_price;

    let net_profit = revenue - total_cost;

    let feed_cost_ratio = (feed_cost / total_cost) * 100.0;

    CycleAnalysis {
        result: CycleResult {
            total_cost,
            revenue,
            net_profit,
            commercial_feed_kg,
            alive_fish,
            feed_cost_ratio,
        },
        total_weight_gain,
        feed_cost,
        seed_cost,
        labor_cost,
    }
}

/// Compute the cycle outcome
pub fn compute(params: &CycleParameters) -> CycleResult {
    analyze(params).result
}

// ============================================
// TESTS
// ============================================
