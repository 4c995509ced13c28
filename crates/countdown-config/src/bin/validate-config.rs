//! Config validation CLI tool
//!
//! Validates a countdown configuration file and reports any errors.

use countdown_config::ConfigError;
use countdown_util::{default_config_path, format_datetime_full, format_duration};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a countdown configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            eprintln!("  validate-config config.example.toml");
            return ExitCode::from(2);
        }
    };

    // Check file exists
    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match countdown_config::load_config(&config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", countdown_config::CURRENT_CONFIG_VERSION);
            println!("  Events: {}", config.events.len());
            println!(
                "  Shown after arrival for: {}",
                format_duration(config.display.retention_window)
            );
            println!("  Update interval: {:?}", config.display.update_interval);

            if !config.events.is_empty() {
                println!();
                println!("Events:");
                for event in &config.events {
                    let target = match &event.target {
                        Some(dt) => format_datetime_full(dt),
                        None => "unresolved".to_string(),
                    };
                    println!("  - {} [{}]: {}", event.name, event.style, target);
                }
            }

            if !config.warnings.is_empty() {
                println!();
                println!("Warnings ({}):", config.warnings.len());
                for warning in &config.warnings {
                    println!("  - {}", warning);
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        countdown_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
