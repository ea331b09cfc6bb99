//! Optimisation Advice
//!
//! Turns a computed cycle into short, actionable tips. Thresholds are
//! configurable; the defaults match the calculator page.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{CycleParameters, CycleResult};

/// Trigger levels for each tip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryThresholds {
    /// Feed cost share (percent of total cost) above which feed is "high"
    pub max_feed_cost_ratio_pct: f64,

    /// Survival rate below which husbandry needs attention
    pub min_survival_rate: f64,

    /// Net profit as a fraction of total cost above which scaling up pays
    pub expansion_profit_to_cost: f64,
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            max_feed_cost_ratio_pct: 40.0,
            min_survival_rate: 0.7,
            expansion_profit_to_cost: 0.2,
        }
    }
}

/// Severity drives the colour in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Positive,
    Caution,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    HighFeedCost,
    LowSurvival,
    Loss,
    ExpandScale,
}

impl Advisory {
    pub fn severity(self) -> Severity {
        match self {
            Advisory::HighFeedCost => Severity::Caution,
            Advisory::LowSurvival | Advisory::Loss => Severity::Critical,
            Advisory::ExpandScale => Severity::Positive,
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::HighFeedCost => write!(
                f,
                "Feed cost ratio is high, consider increasing natural feed proportion"
            ),
            Advisory::LowSurvival => write!(
                f,
                "Survival rate is low, improve farming environment and management"
            ),
            Advisory::Loss => write!(
                f,
                "Current parameters show loss, adjust costs or increase selling price"
            ),
            Advisory::ExpandScale => {
                write!(f, "Good profit margin, consider expanding farming scale")
            }
        }
    }
}

/// Collect every tip that applies, in display order
pub fn advise(
    params: &CycleParameters,
    result: &CycleResult,
    thresholds: &AdvisoryThresholds,
) -> Vec<Advisory> {
    let mut tips = Vec::new();

    if result.feed_cost_ratio > thresholds.max_feed_cost_ratio_pct {
        tips.push(Advisory::HighFeedCost);
    }
    if params.survival_rate < thresholds.min_survival_rate {
        tips.push(Advisory::LowSurvival);
    }
    if result.net_profit < 0.0 {
        tips.push(Advisory::Loss);
    }
    if result.net_profit > result.total_cost * thresholds.expansion_profit_to_cost {
        tips.push(Advisory::ExpandScale);
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{compute, Param};

    fn reference_params() -> CycleParameters {
        CycleParameters::new(1.6, 35_000.0, 1.3, 40.0, 22_000.0, 50_000.0, 0.7)
    }

    #[test]
    fn test_reference_scenario_tips() {
        let params = reference_params();
        let tips = advise(&params, &compute(&params), &AdvisoryThresholds::default());

        // 61% feed share, 70% survival (not below), healthy profit
        assert_eq!(tips, vec![Advisory::HighFeedCost, Advisory::ExpandScale]);
    }

    #[test]
    fn test_loss_and_low_survival() {
        let params = reference_params()
            .with(Param::SurvivalRate, 0.3)
            .with(Param::MarketPrice, 40.0);
        let tips = advise(&params, &compute(&params), &AdvisoryThresholds::default());

        assert!(tips.contains(&Advisory::LowSurvival));
        assert!(tips.contains(&Advisory::Loss));
        assert!(!tips.contains(&Advisory::ExpandScale));
        assert!(tips.iter().any(|t| t.severity() == Severity::Critical));
    }

    #[test]
    fn test_nan_ratio_gives_no_feed_tip() {
        let params = CycleParameters {
            fingerling_price: 0.0,
            feed_price: 0.0,
            labor_per_month: 0.0,
            pond_rent: 0.0,
            other_cost: 0.0,
            ..reference_params()
        };
        let result = compute(&params);
        assert!(result.feed_cost_ratio.is_nan());

        let tips = advise(&params, &result, &AdvisoryThresholds::default());
        assert!(!tips.contains(&Advisory::HighFeedCost));
    }

    #[test]
    fn test_custom_thresholds() {
        let params = reference_params();
        let thresholds = AdvisoryThresholds {
            max_feed_cost_ratio_pct: 70.0,
            min_survival_rate: 0.8,
            expansion_profit_to_cost: 2.0,
        };
        let tips = advise(&params, &compute(&params), &thresholds);
        assert_eq!(tips, vec![Advisory::LowSurvival]);
    }
}
