//! `alterego prompt`: print the persona context the model receives.

use std::path::Path;

use crate::startup;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = startup::load_config(config_path)?;
    let persona = startup::load_persona(&config, config_path)?;

    println!("{persona}");
    eprintln!();
    eprintln!("  ~{} tokens", persona.estimated_tokens());
    Ok(())
}
