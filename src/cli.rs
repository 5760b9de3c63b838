use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mdsnip")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract unlabeled or language-tagged code fences from Markdown")]
#[command(
    long_about = "mdsnip scans Markdown files for triple-backtick fences that are either bare \
                  or labeled with the target language, and prints them to stdout separated \
                  by blank lines, or writes each one to DIR/file<N>.<ext>."
)]
#[command(after_help = "EXAMPLES:\n  \
    mdsnip README.md docs/guide.md\n  \
    mdsnip -d snippets docs/*.md\n  \
    mdsnip --lang rust --ext rs -d out book/*.md\n  \
    mdsnip --generate-config --config mdsnip.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Markdown files to scan, in order
    #[arg(required_unless_present = "generate_config")]
    pub files: Vec<PathBuf>,

    /// Output directory; writes file1.<ext>, file2.<ext>, ...
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Language label that selects a fence (case-insensitive)
    #[arg(short, long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Extension for files written with --dir
    #[arg(short, long, value_name = "EXT")]
    pub ext: Option<String>,

    /// Drop lines containing this text (repeatable, comma-separated)
    #[arg(short = 'x', long, value_delimiter = ',', value_name = "TEXT")]
    pub exclude_marker: Option<Vec<String>>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Format for status messages on stderr
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Scan and count snippets without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_language(self.lang.clone())
            .with_extension(self.ext.clone())
            .with_exclude_markers(self.exclude_marker.clone())
            .with_directory(self.dir.clone())
    }

    pub fn config_output_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from("mdsnip.toml"))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_files_and_dir() {
        let cli = Cli::try_parse_from(["mdsnip", "-d", "out", "a.md", "b.md"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.md"), PathBuf::from("b.md")]);
        assert_eq!(cli.dir, Some(PathBuf::from("out")));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["mdsnip", "-d", "out"]).is_err());
        assert!(Cli::try_parse_from(["mdsnip", "--generate-config"]).is_ok());
    }

    #[test]
    fn test_exclude_markers_split_on_commas() {
        let cli = Cli::try_parse_from(["mdsnip", "-x", "compile error,skip me", "a.md"]).unwrap();
        assert_eq!(
            cli.exclude_marker,
            Some(vec!["compile error".to_string(), "skip me".to_string()])
        );
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["mdsnip", "-q", "-v", "a.md"]).is_err());
    }

    #[test]
    fn test_overrides_reach_config() {
        let cli = Cli::try_parse_from(["mdsnip", "--lang", "rust", "--ext", "rs", "a.md"]).unwrap();
        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert_eq!(config.extract.language, "rust");
        assert_eq!(config.output.extension, "rs");
        assert_eq!(config.extract.exclude_markers, vec!["compile error"]);
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::try_parse_from(["mdsnip", "-vv", "a.md"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::try_parse_from(["mdsnip", "-q", "a.md"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
    }
}
