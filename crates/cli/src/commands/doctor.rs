//! `alterego doctor`: diagnose configuration and persona documents.

use std::path::Path;

use alterego_config::AppConfig;

use crate::startup;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("AlterEgo Doctor");
    println!("===============\n");

    let mut issues = 0;

    if !config_path.exists() {
        println!("  ⚠️  No config file at {}, using defaults (run `alterego onboard`)", config_path.display());
        issues += 1;
    }

    let config = match startup::load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            summary(issues + 1);
            return Ok(());
        }
    };

    match config.validate_credentials() {
        Ok(()) => println!("  ✅ Credentials present ({} / {:?})", config.provider, config.notifier.kind),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    match startup::load_persona(&config, config_path) {
        Ok(persona) => println!(
            "  ✅ Persona documents readable (~{} tokens)",
            persona.estimated_tokens()
        ),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    if issues == 0 {
        issues += check_provider(&config).await;
    }

    summary(issues);
    Ok(())
}

async fn check_provider(config: &AppConfig) -> usize {
    let provider = match alterego_providers::build_from_config(config) {
        Ok(provider) => provider,
        Err(e) => {
            println!("  ❌ Provider: {e}");
            return 1;
        }
    };

    match provider.health_check().await {
        Ok(true) => {
            println!("  ✅ Provider {} reachable", provider.name());
            0
        }
        Ok(false) => {
            println!("  ⚠️  Provider {} answered but reported unhealthy", provider.name());
            1
        }
        Err(e) => {
            println!("  ❌ Provider {} unreachable: {e}", provider.name());
            1
        }
    }
}

fn summary(issues: usize) {
    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }
}
