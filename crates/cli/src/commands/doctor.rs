//! `paperforge doctor` — Diagnose configuration and credentials.

use paperforge_config::{AppConfig, GOOGLE_PROVIDER};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 PaperForge Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!("  ℹ️  No config file, using defaults + environment");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    println!("  ✅ Synthesis engine: {}", config.synthesis.engine);
    println!("  ✅ Evidence provider: {}", config.evidence.provider);

    match config.require_credentials() {
        Ok(()) => println!("  ✅ Credentials present"),
        Err(e) => {
            println!("  ❌ {e}");
            if config.evidence.provider == GOOGLE_PROVIDER {
                println!("     Set GOOGLE_SEARCH_API_KEY and GOOGLE_CSE_ID in your .env file.");
            } else {
                println!("     Set AMPLIFY_API_KEY in a .env file or environment variable.");
            }
            issues += 1;
        }
    }

    if config.evidence.provider != GOOGLE_PROVIDER && config.evidence.openalex_mailto.is_none() {
        println!("  ⚠️  OPENALEX_EMAIL not set, requests use the common pool");
    }

    let out_dir = &config.output.dir;
    if out_dir.is_dir() {
        println!("  ✅ Output directory {} exists", out_dir.display());
    } else if out_dir.exists() {
        println!("  ❌ Output path {} is not a directory", out_dir.display());
        issues += 1;
    } else {
        println!(
            "  ℹ️  Output directory {} will be created on first run",
            out_dir.display()
        );
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
