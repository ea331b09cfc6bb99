//! Calculator Configuration
//!
//! Starting parameters, share-link base URL, currency formatting and advice
//! thresholds. Loaded from `BANGUS_*` environment variables (with `.env`
//! support) or from a TOML file.

use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::advisor::AdvisoryThresholds;
use crate::model::{CycleParameters, Param};
use crate::report::CurrencyFormat;

/// Prefix for every environment variable
pub const ENV_PREFIX: &str = "BANGUS_";

/// Where generated links point when nothing is configured
pub const DEFAULT_SHARE_BASE_URL: &str = "https://bangus-calculator.vercel.app/";

/// Most fraction digits a currency may be rendered with
const MAX_FRACTION_DIGITS: usize = 6;

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Origin and path of the calculator page; links append `?data=...`
    pub share_base_url: String,

    /// Refuse to compute when parameters violate their constraints
    pub strict_validation: bool,

    /// Parameters a fresh session starts from
    pub defaults: CycleParameters,

    /// Money formatting
    pub currency: CurrencyFormat,

    /// Trigger levels for optimisation tips
    pub advisories: AdvisoryThresholds,
}

// ============================================
// ENVIRONMENT SETTINGS
// ============================================

/// Environment settings besides the starting parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    ShareBaseUrl,
    StrictValidation,
    CurrencySymbol,
    CurrencyCode,
    Locale,
    CurrencyDecimals,
    MaxFeedCostRatioPct,
    MinSurvivalRate,
    ExpansionProfitToCost,
}

impl Setting {
    pub const ALL: [Setting; 9] = [
        Setting::ShareBaseUrl,
        Setting::StrictValidation,
        Setting::CurrencySymbol,
        Setting::CurrencyCode,
        Setting::Locale,
        Setting::CurrencyDecimals,
        Setting::MaxFeedCostRatioPct,
        Setting::MinSurvivalRate,
        Setting::ExpansionProfitToCost,
    ];

    /// camelCase name; `env_key` turns it into the variable name
    pub fn key(self) -> &'static str {
        match self {
            Setting::ShareBaseUrl => "shareBaseUrl",
            Setting::StrictValidation => "strictValidation",
            Setting::CurrencySymbol => "currencySymbol",
            Setting::CurrencyCode => "currencyCode",
            Setting::Locale => "locale",
            Setting::CurrencyDecimals => "currencyDecimals",
            Setting::MaxFeedCostRatioPct => "maxFeedCostRatioPct",
            Setting::MinSurvivalRate => "minSurvivalRate",
            Setting::ExpansionProfitToCost => "expansionProfitToCost",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Setting::ShareBaseUrl => "Share link base URL",
            Setting::StrictValidation => "Abort on out-of-range parameters?",
            Setting::CurrencySymbol => "Currency symbol",
            Setting::CurrencyCode => "Currency code",
            Setting::Locale => "Formatting locale",
            Setting::CurrencyDecimals => "Currency fraction digits",
            Setting::MaxFeedCostRatioPct => "Feed cost share that triggers advice (%)",
            Setting::MinSurvivalRate => "Survival rate that triggers advice",
            Setting::ExpansionProfitToCost => "Profit/cost ratio that suggests expansion",
        }
    }

    /// Whether `from_env` can use `raw`; anything else silently falls back
    pub fn accepts(self, raw: &str) -> bool {
        let raw = raw.trim();
        match self {
            Setting::StrictValidation => raw.parse::<bool>().is_ok(),
            Setting::CurrencyDecimals => raw.parse::<usize>().is_ok(),
            Setting::MaxFeedCostRatioPct
            | Setting::MinSurvivalRate
            | Setting::ExpansionProfitToCost => raw.parse::<f64>().is_ok(),
            Setting::ShareBaseUrl
            | Setting::CurrencySymbol
            | Setting::CurrencyCode
            | Setting::Locale => true,
        }
    }
}

/// `feedPrice` -> `BANGUS_FEED_PRICE`
pub fn env_key(name: &str) -> String {
    let mut key = String::from(ENV_PREFIX);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            key.push('_');
        }
        key.push(c.to_ascii_uppercase());
    }
    key
}

/// Read and parse a variable; missing or unparsable values give `default`
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(env_key(name))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base = Self::default();

        let mut defaults = base.defaults;
        for param in Param::ALL {
            defaults.set(param, env_or(param.key(), defaults.get(param)));
        }

        Ok(Self {
            share_base_url: env_or(Setting::ShareBaseUrl.key(), base.share_base_url),
            strict_validation: env_or(Setting::StrictValidation.key(), base.strict_validation),
            defaults,
            currency: CurrencyFormat {
                symbol: env_or(Setting::CurrencySymbol.key(), base.currency.symbol),
                code: env_or(Setting::CurrencyCode.key(), base.currency.code),
                locale: env_or(Setting::Locale.key(), base.currency.locale),
                fraction_digits: env_or(
                    Setting::CurrencyDecimals.key(),
                    base.currency.fraction_digits,
                ),
            },
            advisories: AdvisoryThresholds {
                max_feed_cost_ratio_pct: env_or(
                    Setting::MaxFeedCostRatioPct.key(),
                    base.advisories.max_feed_cost_ratio_pct,
                ),
                min_survival_rate: env_or(
                    Setting::MinSurvivalRate.key(),
                    base.advisories.min_survival_rate,
                ),
                expansion_profit_to_cost: env_or(
                    Setting::ExpansionProfitToCost.key(),
                    base.advisories.expansion_profit_to_cost,
                ),
            },
        })
    }

    /// Value of `setting` as it would be written in the environment
    pub fn setting(&self, setting: Setting) -> String {
        match setting {
            Setting::ShareBaseUrl => self.share_base_url.clone(),
            Setting::StrictValidation => self.strict_validation.to_string(),
            Setting::CurrencySymbol => self.currency.symbol.clone(),
            Setting::CurrencyCode => self.currency.code.clone(),
            Setting::Locale => self.currency.locale.clone(),
            Setting::CurrencyDecimals => self.currency.fraction_digits.to_string(),
            Setting::MaxFeedCostRatioPct => self.advisories.max_feed_cost_ratio_pct.to_string(),
            Setting::MinSurvivalRate => self.advisories.min_survival_rate.to_string(),
            Setting::ExpansionProfitToCost => {
                self.advisories.expansion_profit_to_cost.to_string()
            }
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Cannot read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        let url = self.share_base_url.trim();
        if url.is_empty() {
            return Err(eyre!("Invalid share_base_url - it must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(eyre!(
                "Invalid share_base_url '{}' - expected an http(s) URL",
                url
            ));
        }

        if self.currency.fraction_digits > MAX_FRACTION_DIGITS {
            return Err(eyre!(
                "currency.fraction_digits must be at most {} (currently {})",
                MAX_FRACTION_DIGITS,
                self.currency.fraction_digits
            ));
        }

        let warnings = self.defaults.validate();
        if !warnings.is_empty() {
            let list: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
            return Err(eyre!("Invalid default parameters: {}", list.join("; ")));
        }

        let t = &self.advisories;
        if !(t.max_feed_cost_ratio_pct.is_finite()
            && t.min_survival_rate.is_finite()
            && t.expansion_profit_to_cost.is_finite())
        {
            return Err(eyre!("Advisory thresholds must be finite numbers"));
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let d = &self.defaults;
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║            BANGUS CALCULATOR - CONFIGURATION               ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Share URL:   {:<45} ║", truncate(&self.share_base_url, 45));
        println!("║ Currency:    {:<45} ║",
            format!("{} ({}, {}, {} decimals)",
                self.currency.symbol, self.currency.code, self.currency.locale,
                self.currency.fraction_digits)
        );
        println!("║ Strict:      {:<45} ║",
            if self.strict_validation { "✓ Enabled" } else { "✗ Warnings only" }
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ DEFAULT PARAMETERS                                         ║");
        for param in Param::ALL {
            let value = match param.slider_range() {
                Some(r) => format!("{} [{}..{}]", d.get(param), r.min, r.max),
                None => d.get(param).to_string(),
            };
            println!("║ • {:<30} {:>25} ║", param.label(), value);
        }
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ ADVICE THRESHOLDS                                          ║");
        println!("║ • Max feed cost ratio:         {:>26.1}% ║", self.advisories.max_feed_cost_ratio_pct);
        println!("║ • Min survival rate:           {:>27.2} ║", self.advisories.min_survival_rate);
        println!("║ • Expansion profit/cost:       {:>27.2} ║", self.advisories.expansion_profit_to_cost);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            strict_validation: false,
            defaults: CycleParameters::default(),
            currency: CurrencyFormat::default(),
            advisories: AdvisoryThresholds::default(),
        }
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.defaults.fcr, 2.0);
        assert_eq!(config.defaults.fingerling_price, 3.0);
        assert_eq!(config.currency.code, "PHP");
        assert_eq!(config.currency.fraction_digits, 0);
    }

    #[test]
    fn test_env_key() {
        assert_eq!(env_key("fcr"), "BANGUS_FCR");
        assert_eq!(env_key("naturalFeedRatio"), "BANGUS_NATURAL_FEED_RATIO");
        assert_eq!(env_key("shareBaseUrl"), "BANGUS_SHARE_BASE_URL");
    }

    #[test]
    fn test_setting_names_and_defaults() {
        let config = Config::default();
        assert_eq!(env_key(Setting::CurrencyDecimals.key()), "BANGUS_CURRENCY_DECIMALS");
        assert_eq!(config.setting(Setting::ShareBaseUrl), DEFAULT_SHARE_BASE_URL);
        assert_eq!(config.setting(Setting::StrictValidation), "false");
        assert_eq!(config.setting(Setting::MaxFeedCostRatioPct), "40");

        // every default reads back through the same parser
        for setting in Setting::ALL {
            assert!(setting.accepts(&config.setting(setting)), "{:?}", setting);
        }
    }

    #[test]
    fn test_setting_accepts() {
        assert!(Setting::StrictValidation.accepts(" true "));
        assert!(!Setting::StrictValidation.accepts("yes"));
        assert!(Setting::CurrencyDecimals.accepts("2"));
        assert!(!Setting::CurrencyDecimals.accepts("-1"));
        assert!(!Setting::CurrencyDecimals.accepts("two"));
        assert!(Setting::MinSurvivalRate.accepts("0.65"));
        assert!(!Setting::ExpansionProfitToCost.accepts("20%"));
        assert!(Setting::Locale.accepts("en-PH"));
    }

    #[test]
    fn test_env_or_falls_back() {
        // Unique name so parallel tests never see it set
        assert_eq!(env_or("neverSetInTests", 7.5), 7.5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.share_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.currency.fraction_digits = 9;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.defaults.survival_rate = 1.4;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("survivalRate"), "unexpected error: {}", err);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.defaults.market_price = 135.0;
        config.strict_validation = true;

        let path = std::env::temp_dir().join(format!("bangus-config-{}.toml", std::process::id()));
        config.save_to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::from_file("/definitely/not/here/bangus.toml").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
