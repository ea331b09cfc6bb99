//! Cycle Report
//!
//! Console rendering of a computed cycle: currency and number formatting,
//! the cost breakdown, profitability bar and advice. Non-finite values are
//! always written as `NaN`, `∞` or `-∞` followed by their unit.

use console::style;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::advisor::{Advisory, Severity};
use crate::model::{CycleAnalysis, CycleParameters, CycleResult, CYCLE_MONTHS};

/// Width of the profitability bar in characters
const BAR_WIDTH: usize = 40;

// ============================================
// FORMATTING
// ============================================

/// How money is rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Prefix in front of the amount
    pub symbol: String,

    /// ISO 4217 code, shown in summaries
    pub code: String,

    /// Locale the grouping rules follow
    pub locale: String,

    /// Digits after the decimal point
    pub fraction_digits: usize,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₱".to_string(),
            code: "PHP".to_string(),
            locale: "zh-CN".to_string(),
            fraction_digits: 0,
        }
    }
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value == f64::INFINITY {
        Some("∞")
    } else if value == f64::NEG_INFINITY {
        Some("-∞")
    } else {
        None
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format `value` with `decimals` fixed decimals and `,` grouping
pub fn format_number(value: f64, decimals: usize) -> String {
    if let Some(s) = non_finite(value) {
        return s.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, group_thousands(int_part), f),
        None => format!("{}{}", sign, group_thousands(int_part)),
    }
}

/// Format an amount of money, sign in front of the symbol
pub fn format_currency(value: f64, currency: &CurrencyFormat) -> String {
    let number = format_number(value, currency.fraction_digits);
    match number.strip_prefix('-') {
        Some(abs) => format!("-{}{}", currency.symbol, abs),
        None => format!("{}{}", currency.symbol, number),
    }
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{}%", format_number(value, decimals))
}

/// Text bar filled to `pct` percent
pub fn render_bar(pct: f64) -> String {
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

// ============================================
// REPORT
// ============================================

/// Machine-readable report for `--json`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub parameters: CycleParameters,
    pub result: CycleResult,
    pub profit_margin_pct: f64,
    pub advisories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

/// Everything one report shows
pub struct CycleReport<'a> {
    pub params: &'a CycleParameters,
    pub analysis: &'a CycleAnalysis,
    pub advisories: &'a [Advisory],
    pub currency: &'a CurrencyFormat,
    pub share_url: Option<&'a str>,
}

impl<'a> CycleReport<'a> {
    pub fn to_json(&self) -> JsonReport {
        JsonReport {
            parameters: *self.params,
            result: self.analysis.result,
            profit_margin_pct: self.analysis.result.profit_margin_pct(),
            advisories: self.advisories.iter().map(|a| a.to_string()).collect(),
            share_url: self.share_url.map(String::from),
        }
    }

    /// Render the report for a terminal
    pub fn render(&self) -> String {
        let r = &self.analysis.result;
        let money = |v: f64| format_currency(v, self.currency);
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", style("═══ CALCULATION RESULTS ═══").blue().bold());
        let _ = writeln!(
            out,
            "Financial analysis for {}-month farming cycle",
            CYCLE_MONTHS
        );
        let _ = writeln!(out);

        let net = if r.is_profitable() {
            style(money(r.net_profit)).green().bold()
        } else {
            style(money(r.net_profit)).red().bold()
        };
        let _ = writeln!(out, "  Net Profit:        {}", net);
        let _ = writeln!(out, "  Total Revenue:     {}", style(money(r.revenue)).green());
        let _ = writeln!(out, "  Total Cost:        {}", style(money(r.total_cost)).red());

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Cost Breakdown").bold());
        let _ = writeln!(out, "  Commercial feed:   {}", money(self.analysis.feed_cost));
        let _ = writeln!(out, "  Fingerlings:       {}", money(self.analysis.seed_cost));
        let _ = writeln!(out, "  Labor:             {}", money(self.analysis.labor_cost));
        let _ = writeln!(out, "  Pond rent:         {}", money(self.params.pond_rent));
        let _ = writeln!(out, "  Other:             {}", money(self.params.other_cost));

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Production Details").bold());
        let _ = writeln!(out, "  Alive Fish Count:       {} fish", format_number(r.alive_fish, 0));
        let _ = writeln!(
            out,
            "  Weight Gain:            {} kg",
            format_number(self.analysis.total_weight_gain, 1)
        );
        let _ = writeln!(
            out,
            "  Commercial Feed Usage:  {} kg",
            format_number(r.commercial_feed_kg, 1)
        );
        let _ = writeln!(out, "  Feed Cost Ratio:        {}", format_percent(r.feed_cost_ratio, 1));

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Profitability").bold());
        let bar = render_bar(r.profitability_bar_pct());
        let bar = if r.is_profitable() {
            style(bar).green()
        } else {
            style(bar).red()
        };
        let _ = writeln!(out, "  {}", bar);
        let _ = writeln!(out, "  Profit Margin: {}", format_percent(r.profit_margin_pct(), 1));

        if !self.advisories.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", style("Optimization Tips").bold());
            for tip in self.advisories {
                let line = format!("  • {}", tip);
                let line = match tip.severity() {
                    Severity::Positive => style(line).green(),
                    Severity::Caution => style(line).yellow(),
                    Severity::Critical => style(line).red(),
                };
                let _ = writeln!(out, "{}", line);
            }
        }

        if let Some(url) = self.share_url {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", style("Share Your Calculation").bold());
            let _ = writeln!(out, "  {}", style(url).cyan());
            let _ = writeln!(
                out,
                "  Anyone with this link can view your calculation parameters"
            );
        }

        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{advise, AdvisoryThresholds};
    use crate::model::{analyze, Param};

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(1_176_000.0, 0), "1,176,000");
        assert_eq!(format_number(9_290.4, 1), "9,290.4");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1_000.0, 2), "1,000.00");
        assert_eq!(format_number(-570_884.4, 0), "-570,884");
        assert_eq!(format_number(-0.2, 0), "0");
    }

    #[test]
    fn test_non_finite_rendering() {
        assert_eq!(format_number(f64::NAN, 1), "NaN");
        assert_eq!(format_percent(f64::INFINITY, 1), "∞%");
        assert_eq!(format_percent(f64::NEG_INFINITY, 1), "-∞%");
        assert_eq!(format_currency(f64::NAN, &CurrencyFormat::default()), "₱NaN");
    }

    #[test]
    fn test_format_currency() {
        let php = CurrencyFormat::default();
        assert_eq!(format_currency(570_884.0, &php), "₱570,884");
        assert_eq!(format_currency(-605_116.6, &php), "-₱605,117");

        let usd = CurrencyFormat {
            symbol: "$".to_string(),
            code: "USD".to_string(),
            locale: "en-US".to_string(),
            fraction_digits: 2,
        };
        assert_eq!(format_currency(1234.5, &usd), "$1,234.50");
    }

    #[test]
    fn test_bar_bounds() {
        assert_eq!(render_bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(render_bar(50.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
        assert_eq!(render_bar(100.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(render_bar(250.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_render_contains_key_figures() {
        let params = CycleParameters::new(1.6, 35_000.0, 1.3, 40.0, 22_000.0, 50_000.0, 0.7);
        let analysis = analyze(&params);
        let tips = advise(&params, &analysis.result, &AdvisoryThresholds::default());
        let currency = CurrencyFormat::default();

        let report = CycleReport {
            params: &params,
            analysis: &analysis,
            advisories: &tips,
            currency: &currency,
            share_url: Some("https://calc.example.com/?data=abc"),
        };
        let text = report.render();

        assert!(text.contains("₱570,884"), "{}", text);
        assert!(text.contains("₱1,176,000"), "{}", text);
        assert!(text.contains("24,500 fish"), "{}", text);
        assert!(text.contains("9,290.4 kg"), "{}", text);
        assert!(text.contains("61.4%"), "{}", text);
        assert!(text.contains("48.5%"), "{}", text);
        assert!(text.contains("natural feed proportion"), "{}", text);
        assert!(text.contains("https://calc.example.com/?data=abc"), "{}", text);
    }

    #[test]
    fn test_json_report() {
        let params = CycleParameters::default().with(Param::SurvivalRate, 0.0);
        let analysis = analyze(&params);
        let currency = CurrencyFormat::default();

        let report = CycleReport {
            params: &params,
            analysis: &analysis,
            advisories: &[Advisory::Loss],
            currency: &currency,
            share_url: None,
        };
        let json = serde_json::to_value(report.to_json()).unwrap();

        assert_eq!(json["result"]["aliveFish"], 0.0);
        assert_eq!(json["parameters"]["survivalRate"], 0.0);
        // -inf margin has no JSON number
        assert!(json["profitMarginPct"].is_null());
        assert!(json.get("shareUrl").is_none());
        assert_eq!(json["advisories"].as_array().map(Vec::len), Some(1));
    }
}
