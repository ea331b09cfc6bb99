//! Calculator Session
//!
//! Owns the current parameter record and keeps its analysis in step: every
//! mutation recomputes synchronously, so `result()` is never stale.

use tracing::{debug, warn};

use crate::model::{analyze, CycleAnalysis, CycleInputs, CycleParameters, CycleResult, Param};
use crate::share;

pub struct CalculatorSession {
    /// Values a share link falls back to for absent keys
    defaults: CycleParameters,
    params: CycleParameters,
    analysis: CycleAnalysis,
}

impl CalculatorSession {
    /// Start a session at `defaults`
    pub fn new(defaults: CycleParameters) -> Self {
        Self {
            defaults,
            params: defaults,
            analysis: analyze(&defaults),
        }
    }

    pub fn params(&self) -> &CycleParameters {
        &self.params
    }

    pub fn analysis(&self) -> &CycleAnalysis {
        &self.analysis
    }

    pub fn result(&self) -> &CycleResult {
        &self.analysis.result
    }

    /// Change one field
    pub fn set(&mut self, param: Param, value: f64) {
        debug!("{} = {}", param, value);
        self.params.set(param, value);
        self.recompute();
    }

    /// Apply every field present in `inputs`
    pub fn apply(&mut self, inputs: &CycleInputs) {
        if inputs.is_empty() {
            return;
        }
        self.params = inputs.resolve(&self.params);
        self.recompute();
    }

    /// Replace the whole record
    pub fn reset(&mut self, params: CycleParameters) {
        self.params = params;
        self.recompute();
    }

    /// Load parameters from a share link.
    ///
    /// Absent keys take the session defaults. A link that cannot be decoded
    /// leaves the current parameters untouched and returns `false`.
    pub fn load_share_link(&mut self, link: &str) -> bool {
        match share::parse_link(link) {
            Ok(inputs) => {
                debug!("Share link supplied {} parameters", inputs.present().len());
                self.params = inputs.resolve(&self.defaults);
                self.recompute();
                true
            }
            Err(e) => {
                warn!("Ignoring share link: {:#}", e);
                false
            }
        }
    }

    /// Link that reproduces the current parameters
    pub fn share_url(&self, base_url: &str) -> eyre::Result<String> {
        share::build_share_url(base_url, &self.params)
    }

    fn recompute(&mut self) {
        self.analysis = analyze(&self.params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compute;

    #[test]
    fn test_set_recomputes() {
        let mut session = CalculatorSession::new(CycleParameters::default());
        let before = *session.result();

        session.set(Param::MarketPrice, 150.0);

        assert_eq!(session.params().market_price, 150.0);
        assert!(session.result().revenue > before.revenue);
        assert_eq!(*session.result(), compute(session.params()));
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut session = CalculatorSession::new(CycleParameters::default());
        session.set(Param::Fcr, 1.4);

        let mut inputs = CycleInputs::default();
        inputs.set(Param::FeedPrice, 45.0);
        session.apply(&inputs);

        assert_eq!(session.params().fcr, 1.4);
        assert_eq!(session.params().feed_price, 45.0);
        assert_eq!(*session.result(), compute(session.params()));
    }

    #[test]
    fn test_share_link_round_trip() {
        let mut source = CalculatorSession::new(CycleParameters::default());
        source.set(Param::SurvivalRate, 0.82);
        source.set(Param::NaturalFeedRatio, 0.55);
        let url = source.share_url("https://calc.example.com/").unwrap();

        let mut target = CalculatorSession::new(CycleParameters::default());
        assert!(target.load_share_link(&url));
        assert_eq!(target.params(), source.params());
        assert_eq!(target.result(), source.result());
    }

    #[test]
    fn test_partial_link_uses_defaults_not_current() {
        let defaults = CycleParameters::default();
        let mut session = CalculatorSession::new(defaults);
        session.set(Param::Fcr, 1.1);

        let partial = CycleInputs {
            market_price: Some(99.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&partial).unwrap();
        assert_eq!(json, r#"{"marketPrice":99.0}"#);

        let link = format!(
            "https://calc.example.com/?data={}",
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, json)
        );
        assert!(session.load_share_link(&link));
        assert_eq!(session.params().market_price, 99.0);
        assert_eq!(session.params().fcr, defaults.fcr);
    }

    #[test]
    fn test_reset_replaces_everything() {
        let mut session = CalculatorSession::new(CycleParameters::default());
        session.set(Param::Fingerlings, 50_000.0);

        let fresh = CycleParameters::new(1.6, 35_000.0, 1.3, 40.0, 22_000.0, 50_000.0, 0.7);
        session.reset(fresh);

        assert_eq!(*session.params(), fresh);
        assert_eq!(session.analysis().seed_cost, 45_500.0);
    }

    #[test]
    fn test_bad_link_keeps_current_state() {
        let mut session = CalculatorSession::new(CycleParameters::default());
        session.set(Param::PondRent, 65_000.0);
        let before = *session.params();

        assert!(!session.load_share_link("https://calc.example.com/?data=%%%garbage"));
        assert!(!session.load_share_link("https://calc.example.com/"));
        assert_eq!(*session.params(), before);
    }
}
