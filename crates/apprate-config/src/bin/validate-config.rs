//! Config validation CLI tool
//!
//! Validates an apprate configuration file and reports any errors.

use apprate_util::default_config_path;
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
            eprintln!("Validates an apprate configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match apprate_config::load_config(&config_path) {
        Ok(policy) => {
            let thresholds = &policy.thresholds;
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", apprate_config::CURRENT_CONFIG_VERSION);
            println!("  Minimum launches: {}", thresholds.minimum_launch_times());
            println!("  Minimum days: {}", thresholds.minimum_days());
            println!(
                "  Launches to show again: {}",
                thresholds.minimum_launch_times_to_show_again()
            );
            println!(
                "  Days to show again: {}",
                thresholds.minimum_days_to_show_again()
            );
            println!("  Rating threshold: {} stars", thresholds.rating_threshold());
            println!("  Feedback channel: {:?}", policy.response.feedback_channel);
            if let Some(url) = policy.response.listing_url() {
                println!("  Store listing: {}", url);
            }
            println!("  Database: {}", policy.storage.db_path().display());

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                apprate_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                apprate_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                apprate_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                apprate_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        apprate_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
