//! `alterego chat`: interactive or single-message chat.

use std::io::Write;
use std::path::Path;

use alterego_core::message::Message;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::startup;

const EXIT_COMMANDS: [&str; 5] = ["exit", "quit", "/exit", "/quit", ":q"];

pub async fn run(config_path: &Path, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = startup::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Err(e) = config.validate_credentials() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Set the missing values in your config file:");
        eprintln!("    {}", config_path.display());
        eprintln!();
        eprintln!("  or through the environment:");
        eprintln!("    OPENROUTER_API_KEY=sk-or-v1-...   (model access)");
        eprintln!("    PUSHOVER_USER=... PUSHOVER_TOKEN=...   (operator alerts)");
        eprintln!();
        return Err("Missing credentials. See above for setup instructions.".into());
    }

    let persona = startup::load_persona(&config, config_path)?;
    let driver = startup::build_driver(&config, persona)?;

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let answer = driver.respond(&msg, &[]).await;
        eprint!("\r              \r");
        println!("{answer}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  AlterEgo: chatting as {}", config.persona.name);
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", config.model);
    println!("  Notifier:  {:?}", config.notifier.kind);
    println!("  Context:   ~{} tokens", driver.persona().estimated_tokens());
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut history: Vec<Message> = Vec::new();
    let mut lines = BufReader::new(io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }
        if EXIT_COMMANDS.contains(&line) {
            break;
        }

        eprint!("  ...");
        let answer = driver.respond(line, &history).await;
        eprint!("\r     \r");

        println!();
        for text in answer.lines() {
            println!("  {} > {text}", config.persona.name);
        }
        println!();

        history.push(Message::user(line));
        history.push(Message::assistant(answer));
        debug!(turns = history.len(), "History updated");

        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
