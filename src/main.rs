use anyhow::Context;
use clap::Parser;
use mdsnip::{Cli, MdSnip, OutputFormatter, OutputMode, SnipError, UserFriendlyError};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and succeed; usage errors exit 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return code;
        }
    };

    if let Err(e) = setup_logging(cli.verbosity_level()) {
        eprintln!("warning: {:#}", e);
    }

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let mdsnip = match MdSnip::from_cli(&cli) {
        Ok(mdsnip) => mdsnip,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    match mdsnip.extract(&cli.files) {
        Ok(report) => {
            mdsnip.output_formatter().print_extraction_report(&report);
            0
        }
        Err(e) => {
            mdsnip.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.config_output_path();

    match MdSnip::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  mdsnip --config {} <files.md...>", config_path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &SnipError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

/// Diagnostic events on stderr. `RUST_LOG` wins over `-v`.
fn setup_logging(verbosity: u8) -> anyhow::Result<()> {
    let default_level = match verbosity {
        0 => "mdsnip=warn",
        1 => "mdsnip=info",
        2 => "mdsnip=debug",
        _ => "mdsnip=trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "mdsnip",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[extract]"));
    }

    #[test]
    fn test_generate_config_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing").join("test.toml");

        let cli = Cli::try_parse_from([
            "mdsnip",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 1);
    }
}
