//! `paperforge config` — Configuration management commands.

use paperforge_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            match config.require_credentials() {
                Ok(()) => println!("   ✅ All checks passed"),
                Err(e) => println!("\n   ⚠️  {e}"),
            }

            println!();
            println!("   Engine:     {}", config.synthesis.engine);
            println!("   Evidence:   {} (limit {})", config.evidence.provider, config.evidence.limit);
            println!("   Decompose:  {}", config.stages.decompose.model);
            println!("   Research:   {}", config.stages.research.model);
            println!("   Coalesce:   {}", config.stages.coalesce.model);
            println!("   Output:     {}", config.output.dir.display());
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&redacted(config))?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

/// Replace every secret with a placeholder before printing.
fn redacted(mut config: AppConfig) -> AppConfig {
    let mask = |secret: &mut Option<String>| {
        if secret.is_some() {
            *secret = Some("[REDACTED]".into());
        }
    };
    mask(&mut config.synthesis.api_key);
    mask(&mut config.evidence.google_api_key);
    mask(&mut config.evidence.google_cse_id);
    config
}
