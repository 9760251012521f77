//! `alterego onboard`: first-time setup.

use std::path::Path;

use alterego_config::AppConfig;

use crate::startup;

const SAMPLE_SUMMARY: &str = concat!(
    "I'm a software engineer who enjoys building reliable systems.\n",
    "Replace this text with a short biography in your own words: what you do,\n",
    "what you care about, and what visitors to your site should know about you.\n",
);

const SAMPLE_RESUME: &str = concat!(
    "# Resume\n\n",
    "## Experience\n\n",
    "- (role, company, dates, highlights)\n\n",
    "## Education\n\n",
    "- (degree, school, year)\n\n",
    "## Skills\n\n",
    "- (languages, tools, domains)\n",
);

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let base_dir = startup::base_dir(config_path);

    println!("AlterEgo: First-Time Setup");
    println!("==========================\n");

    if !base_dir.exists() {
        std::fs::create_dir_all(&base_dir)?;
        println!("✅ Created config directory: {}", base_dir.display());
    } else {
        println!("  Config directory exists: {}", base_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(config_path, AppConfig::default_toml())?;
        println!("✅ Created config at: {}", config_path.display());
    }

    // Persona documents named by the (possibly pre-existing) config
    let config = AppConfig::load_from(config_path)?;
    let sources = config.persona_sources(&base_dir);
    for (path, sample) in [
        (&sources.summary_path, SAMPLE_SUMMARY),
        (&sources.resume_path, SAMPLE_RESUME),
    ] {
        if path.exists() {
            println!("  Keeping existing {}", path.display());
        } else {
            std::fs::write(path, sample)?;
            println!("✅ Created {}", path.display());
        }
    }

    println!("\nNext steps:");
    println!("   1. Set persona.name in {}", config_path.display());
    println!("   2. Write your summary and resume into the files above");
    println!("   3. Add your OpenRouter key and Pushover credentials");
    println!("   4. Run: alterego doctor, then alterego chat\n");

    Ok(())
}
