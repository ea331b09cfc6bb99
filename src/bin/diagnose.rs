//! Diagnostic tool - Check calculator configuration
//!
//! Run with: cargo run --bin diagnose

use std::env;

use bangus::config::{env_key, Config, Setting};
use bangus::model::Param;

/// Print one variable; returns false when its value would be ignored
fn show(key: &str, default: String, desc: &str, accepts: impl Fn(&str) -> bool) -> bool {
    let (value, marker) = match env::var(key) {
        Ok(v) => (v, "(from .env)"),
        Err(_) => (default, "(default)"),
    };
    println!("  {}: {} {}", key, value, marker);
    println!("    └─ {}\n", desc);
    accepts(&value)
}

fn main() {
    println!("🔍 BANGUS CALCULATOR DIAGNOSTIC CHECK\n");

    // Load .env
    dotenvy::dotenv().ok();

    let base = Config::default();
    let mut unparsable = Vec::new();

    println!("═══════════════════════════════════════════════════");
    println!("                STARTING PARAMETERS                 ");
    println!("═══════════════════════════════════════════════════\n");

    for param in Param::ALL {
        let key = env_key(param.key());
        let default = base.defaults.get(param).to_string();
        if !show(&key, default, param.label(), |v| v.trim().parse::<f64>().is_ok()) {
            unparsable.push(key);
        }
    }

    println!("═══════════════════════════════════════════════════");
    println!("              PRESENTATION & ADVICE                 ");
    println!("═══════════════════════════════════════════════════\n");

    for setting in Setting::ALL {
        let key = env_key(setting.key());
        let default = base.setting(setting);
        if !show(&key, default, setting.description(), |v| setting.accepts(v)) {
            unparsable.push(key);
        }
    }

    println!("═══════════════════════════════════════════════════");
    println!("                     STATUS                         ");
    println!("═══════════════════════════════════════════════════\n");

    if unparsable.is_empty() {
        println!("  ✅ All values parse");
    } else {
        println!("  ⚠️  These values do not parse and will fall back to defaults:");
        for key in &unparsable {
            println!("     • {}", key);
        }
    }

    match Config::from_env().and_then(|config| config.validate()) {
        Ok(()) => println!("  ✅ Configuration is valid"),
        Err(e) => println!("  ⚠️  {} - the calculator will refuse to start", e),
    }

    println!("\n✅ Diagnostic complete!\n");
}
