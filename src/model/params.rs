//! Cycle Parameters
//!
//! `CycleParameters` is the fully-populated record the calculator consumes.
//! `CycleInputs` is the sparse form that arrives from share links and CLI
//! overrides; it becomes a `CycleParameters` only through `resolve`, which
//! fills every absent field from a base record in one step.

use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================
// DOCUMENTED DEFAULTS
// ============================================

/// Initial weight per fingerling (kg)
pub const DEFAULT_FINGERLING_WEIGHT: f64 = 0.005;

/// Average weight per fish at harvest (kg)
pub const DEFAULT_HARVEST_WEIGHT: f64 = 0.4;

/// Farm-gate price per kg at harvest
pub const DEFAULT_MARKET_PRICE: f64 = 120.0;

/// Miscellaneous costs per cycle
pub const DEFAULT_OTHER_COST: f64 = 50_000.0;

/// Share of weight gain covered by natural (non-purchased) feed
pub const DEFAULT_NATURAL_FEED_RATIO: f64 = 0.4;

// ============================================
// PARAMETER KEYS
// ============================================

/// Identifies one field of `CycleParameters`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Fcr,
    Fingerlings,
    FingerlingPrice,
    FeedPrice,
    LaborPerMonth,
    PondRent,
    SurvivalRate,
    FingerlingWeight,
    HarvestWeight,
    MarketPrice,
    OtherCost,
    NaturalFeedRatio,
}

/// Bounds of a slider control in the calculator form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    /// Pin a value into the slider's bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Param {
    pub const ALL: [Param; 12] = [
        Param::Fcr,
        Param::Fingerlings,
        Param::FingerlingPrice,
        Param::FeedPrice,
        Param::LaborPerMonth,
        Param::PondRent,
        Param::SurvivalRate,
        Param::FingerlingWeight,
        Param::HarvestWeight,
        Param::MarketPrice,
        Param::OtherCost,
        Param::NaturalFeedRatio,
    ];

    /// Key used in share-link payloads (camelCase)
    pub fn key(self) -> &'static str {
        match self {
            Param::Fcr => "fcr",
            Param::Fingerlings => "fingerlings",
            Param::FingerlingPrice => "fingerlingPrice",
            Param::FeedPrice => "feedPrice",
            Param::LaborPerMonth => "laborPerMonth",
            Param::PondRent => "pondRent",
            Param::SurvivalRate => "survivalRate",
            Param::FingerlingWeight => "fingerlingWeight",
            Param::HarvestWeight => "harvestWeight",
            Param::MarketPrice => "marketPrice",
            Param::OtherCost => "otherCost",
            Param::NaturalFeedRatio => "naturalFeedRatio",
        }
    }

    /// Human-readable label for reports
    pub fn label(self) -> &'static str {
        match self {
            Param::Fcr => "Feed Conversion Ratio (FCR)",
            Param::Fingerlings => "Number of Fingerlings",
            Param::FingerlingPrice => "Fingerling Price",
            Param::FeedPrice => "Feed Price (per kg)",
            Param::LaborPerMonth => "Monthly Labor Cost",
            Param::PondRent => "Pond Rent (per cycle)",
            Param::SurvivalRate => "Survival Rate",
            Param::FingerlingWeight => "Fingerling Weight (kg)",
            Param::HarvestWeight => "Harvest Weight (kg)",
            Param::MarketPrice => "Market Price (per kg)",
            Param::OtherCost => "Other Costs",
            Param::NaturalFeedRatio => "Natural Feed Ratio",
        }
    }

    /// Whether the field has no documented default
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Param::FingerlingWeight
                | Param::HarvestWeight
                | Param::MarketPrice
                | Param::OtherCost
                | Param::NaturalFeedRatio
        )
    }

    /// Slider bounds for the two fraction fields; everything else is a free
    /// numeric input
    pub fn slider_range(self) -> Option<SliderRange> {
        match self {
            Param::SurvivalRate => Some(SliderRange { min: 0.1, max: 1.0, step: 0.01 }),
            Param::NaturalFeedRatio => Some(SliderRange { min: 0.0, max: 0.8, step: 0.01 }),
            _ => None,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Param {
    type Err = eyre::Report;

    /// Accepts `feedPrice`, `feed_price`, `feed-price` or any casing thereof
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        Param::ALL
            .into_iter()
            .find(|p| p.key().to_lowercase() == wanted)
            .ok_or_else(|| eyre!("Unknown parameter '{}'", s))
    }
}

/// A single `key=value` override
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamAssignment {
    pub param: Param,
    pub value: f64,
}

impl FromStr for ParamAssignment {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| eyre!("Expected key=value, got '{}'", s))?;
        let param: Param = key.parse()?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|e| eyre!("Invalid value for {}: '{}' ({})", param, value.trim(), e))?;
        Ok(Self { param, value })
    }
}

// ============================================
// FULL PARAMETER RECORD
// ============================================

/// Everything the profit calculation needs for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleParameters {
    /// kg of commercial feed per kg of weight gain
    pub fcr: f64,

    /// Number stocked
    pub fingerlings: f64,

    /// Price per fingerling
    pub fingerling_price: f64,

    /// Price per kg of commercial feed
    pub feed_price: f64,

    /// Labor cost per month
    pub labor_per_month: f64,

    /// Pond rent for the whole cycle
    pub pond_rent: f64,

    /// Fraction of fingerlings alive at harvest (0-1)
    pub survival_rate: f64,

    /// Initial weight per fish (kg)
    pub fingerling_weight: f64,

    /// Weight per fish at harvest (kg)
    pub harvest_weight: f64,

    /// Sale price per kg
    pub market_price: f64,

    /// Miscellaneous costs for the cycle
    pub other_cost: f64,

    /// Fraction of weight gain from natural feed (0-1)
    pub natural_feed_ratio: f64,
}

impl CycleParameters {
    /// Build from the required fields, taking the documented defaults for
    /// the rest
    pub fn new(
        fcr: f64,
        fingerlings: f64,
        fingerling_price: f64,
        feed_price: f64,
        labor_per_month: f64,
        pond_rent: f64,
        survival_rate: f64,
    ) -> Self {
        Self {
            fcr,
            fingerlings,
            fingerling_price,
            feed_price,
            labor_per_month,
            pond_rent,
            survival_rate,
            fingerling_weight: DEFAULT_FINGERLING_WEIGHT,
            harvest_weight: DEFAULT_HARVEST_WEIGHT,
            market_price: DEFAULT_MARKET_PRICE,
            other_cost: DEFAULT_OTHER_COST,
            natural_feed_ratio: DEFAULT_NATURAL_FEED_RATIO,
        }
    }

    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::Fcr => self.fcr,
            Param::Fingerlings => self.fingerlings,
            Param::FingerlingPrice => self.fingerling_price,
            Param::FeedPrice => self.feed_price,
            Param::LaborPerMonth => self.labor_per_month,
            Param::PondRent => self.pond_rent,
            Param::SurvivalRate => self.survival_rate,
            Param::FingerlingWeight => self.fingerling_weight,
            Param::HarvestWeight => self.harvest_weight,
            Param::MarketPrice => self.market_price,
            Param::OtherCost => self.other_cost,
            Param::NaturalFeedRatio => self.natural_feed_ratio,
        }
    }

    pub fn set(&mut self, param: Param, value: f64) {
        let slot = match param {
            Param::Fcr => &mut self.fcr,
            Param::Fingerlings => &mut self.fingerlings,
            Param::FingerlingPrice => &mut self.fingerling_price,
            Param::FeedPrice => &mut self.feed_price,
            Param::LaborPerMonth => &mut self.labor_per_month,
            Param::PondRent => &mut self.pond_rent,
            Param::SurvivalRate => &mut self.survival_rate,
            Param::FingerlingWeight => &mut self.fingerling_weight,
            Param::HarvestWeight => &mut self.harvest_weight,
            Param::MarketPrice => &mut self.market_price,
            Param::OtherCost => &mut self.other_cost,
            Param::NaturalFeedRatio => &mut self.natural_feed_ratio,
        };
        *slot = value;
    }

    /// Copy with one field replaced
    pub fn with(mut self, param: Param, value: f64) -> Self {
        self.set(param, value);
        self
    }

    /// Check the record against the domain constraints.
    ///
    /// The calculator accepts anything; this only reports what looks wrong.
    pub fn validate(&self) -> Vec<ParameterWarning> {
        let mut warnings = Vec::new();

        for param in Param::ALL {
            let value = self.get(param);

            if !value.is_finite() {
                warnings.push(ParameterWarning::new(param, value, "is not a finite number"));
                continue;
            }

            match param {
                Param::Fcr | Param::FingerlingWeight if value <= 0.0 => {
                    warnings.push(ParameterWarning::new(param, value, "must be positive"));
                }
                Param::SurvivalRate | Param::NaturalFeedRatio
                    if !(0.0..=1.0).contains(&value) =>
                {
                    warnings.push(ParameterWarning::new(param, value, "must be between 0 and 1"));
                }
                Param::Fingerlings if value >= 0.0 && value.fract() != 0.0 => {
                    warnings.push(ParameterWarning::new(param, value, "must be a whole number"));
                }
                Param::HarvestWeight
                    if self.fingerling_weight.is_finite() && value <= self.fingerling_weight =>
                {
                    warnings.push(ParameterWarning::new(
                        param,
                        value,
                        "must exceed the fingerling weight",
                    ));
                }
                _ if value < 0.0 => {
                    warnings.push(ParameterWarning::new(param, value, "must not be negative"));
                }
                _ => {}
            }
        }

        warnings
    }
}

impl Default for CycleParameters {
    /// Starting values of the calculator form
    fn default() -> Self {
        Self::new(2.0, 35_000.0, 3.0, 40.0, 22_000.0, 50_000.0, 0.7)
    }
}

/// A field that violates its domain constraint
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterWarning {
    pub param: Param,
    pub value: f64,
    pub reason: &'static str,
}

impl ParameterWarning {
    fn new(param: Param, value: f64, reason: &'static str) -> Self {
        Self { param, value, reason }
    }
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} {}", self.param, self.value, self.reason)
    }
}

// ============================================
// SPARSE INPUTS
// ============================================

/// Parameters as they arrive from outside: any field may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerlings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerling_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labor_per_month: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pond_rent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survival_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerling_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvest_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natural_feed_ratio: Option<f64>,
}

impl CycleInputs {
    pub fn get(&self, param: Param) -> Option<f64> {
        match param {
            Param::Fcr => self.fcr,
            Param::Fingerlings => self.fingerlings,
            Param::FingerlingPrice => self.fingerling_price,
            Param::FeedPrice => self.feed_price,
            Param::LaborPerMonth => self.labor_per_month,
            Param::PondRent => self.pond_rent,
            Param::SurvivalRate => self.survival_rate,
            Param::FingerlingWeight => self.fingerling_weight,
            Param::HarvestWeight => self.harvest_weight,
            Param::MarketPrice => self.market_price,
            Param::OtherCost => self.other_cost,
            Param::NaturalFeedRatio => self.natural_feed_ratio,
        }
    }

    pub fn set(&mut self, param: Param, value: f64) {
        let slot = match param {
            Param::Fcr => &mut self.fcr,
            Param::Fingerlings => &mut self.fingerlings,
            Param::FingerlingPrice => &mut self.fingerling_price,
            Param::FeedPrice => &mut self.feed_price,
            Param::LaborPerMonth => &mut self.labor_per_month,
            Param::PondRent => &mut self.pond_rent,
            Param::SurvivalRate => &mut self.survival_rate,
            Param::FingerlingWeight => &mut self.fingerling_weight,
            Param::HarvestWeight => &mut self.harvest_weight,
            Param::MarketPrice => &mut self.market_price,
            Param::OtherCost => &mut self.other_cost,
            Param::NaturalFeedRatio => &mut self.natural_feed_ratio,
        };
        *slot = Some(value);
    }

    /// Collect a list of overrides; later assignments win
    pub fn from_assignments<'a, I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = &'a ParamAssignment>,
    {
        let mut inputs = Self::default();
        for a in assignments {
            inputs.set(a.param, a.value);
        }
        inputs
    }

    /// Keys present in this record
    pub fn present(&self) -> Vec<Param> {
        Param::ALL
            .into_iter()
            .filter(|p| self.get(*p).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present().is_empty()
    }

    /// Fill every missing field from `base`
    pub fn resolve(&self, base: &CycleParameters) -> CycleParameters {
        let mut params = *base;
        for param in Param::ALL {
            if let Some(value) = self.get(param) {
                params.set(param, value);
            }
        }
        params
    }

    /// Require every field without a documented default, filling the rest
    /// from the documented defaults
    pub fn into_parameters(self) -> Result<CycleParameters> {
        let missing: Vec<&str> = Param::ALL
            .into_iter()
            .filter(|p| p.is_required() && self.get(*p).is_none())
            .map(Param::key)
            .collect();

        if !missing.is_empty() {
            return Err(eyre!("Missing required parameters: {}", missing.join(", ")));
        }

        // Required values are overwritten by resolve, only the optional
        // defaults of the base survive
        let base = CycleParameters::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        Ok(self.resolve(&base))
    }
}

impl From<CycleParameters> for CycleInputs {
    fn from(params: CycleParameters) -> Self {
        let mut inputs = Self::default();
        for param in Param::ALL {
            inputs.set(param, params.get(param));
        }
        inputs
    }
}

// ============================================
// TESTS
// ============================================
