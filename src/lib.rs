pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExtractConfig, OutputConfig};
pub use error::{Result, SnipError, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    ConcatSink, DryRunSink, ExtractionMode, ExtractionProgress, ExtractionReport, Extractor,
    FenceMatcher, ScanState, SnippetSink, SplitSink,
};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Main library interface for mdsnip
pub struct MdSnip {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    dry_run: bool,
}

impl MdSnip {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let show_progress = !quiet
            && output_mode == OutputMode::Human
            && console::Term::stderr().is_term();

        Self {
            config,
            output_formatter,
            progress_manager: ProgressManager::new(show_progress),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
            .with_dry_run(cli_args.dry_run))
    }

    pub fn mode(&self) -> ExtractionMode {
        if self.dry_run {
            ExtractionMode::DryRun
        } else if self.config.is_split_mode() {
            ExtractionMode::Split
        } else {
            ExtractionMode::Concatenate
        }
    }

    /// Extract snippets from `inputs` into the configured destination
    pub fn extract(&self, inputs: &[PathBuf]) -> Result<ExtractionReport> {
        match self.mode() {
            ExtractionMode::DryRun => {
                let mut sink = DryRunSink::new();
                let report = self.run(inputs, &mut sink)?;
                self.output_formatter.info(&format!(
                    "Dry run: {} snippets would be extracted",
                    sink.snippet_sizes().len()
                ));
                Ok(report)
            }
            ExtractionMode::Split => {
                let directory = self
                    .config
                    .output
                    .directory
                    .clone()
                    .ok_or_else(|| SnipError::Config {
                        message: "Split mode requires an output directory".to_string(),
                    })?;

                // Fails before any input is opened
                let mut sink = SplitSink::prepare(&directory, &self.config.output.extension)?;
                self.output_formatter.debug(&format!(
                    "Writing snippets to {}",
                    sink.directory().display()
                ));
                self.run(inputs, &mut sink)
            }
            ExtractionMode::Concatenate => {
                let stdout = std::io::stdout();
                let mut sink = ConcatSink::new(stdout.lock());
                self.run(inputs, &mut sink)
            }
        }
    }

    fn run<S: SnippetSink>(&self, inputs: &[PathBuf], sink: &mut S) -> Result<ExtractionReport> {
        let matcher = FenceMatcher::new(
            &self.config.extract.language,
            self.config.extract.exclude_markers.as_slice(),
        )?;
        let mut extractor = Extractor::new(matcher).with_total_files(inputs.len());

        self.output_formatter.info(&format!(
            "Extracting '{}' and unlabeled fences from {} file(s)",
            extractor.matcher().language(),
            inputs.len()
        ));

        let file_progress = self.progress_manager.create_file_progress(inputs.len() as u64);

        for input in inputs {
            extractor.scan_file(input, sink)?;
            ui::progress::update_file_progress(&file_progress, extractor.progress());
            self.output_formatter
                .debug(&format!("Scanned {}", input.display()));
        }

        extractor.finish(sink)?;

        if let Some(last) = sink.written_files().last() {
            self.output_formatter.success(&format!(
                "Wrote {} snippet file(s), last: {}",
                sink.written_files().len(),
                last.display()
            ));
        }

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Extracted {} snippets", extractor.progress().snippets_emitted),
            extractor.progress().elapsed(),
        );

        let mode = self.mode();
        let output_directory = match mode {
            ExtractionMode::Split => self.config.output.directory.clone(),
            _ => None,
        };

        Ok(ExtractionReport::from_progress(
            extractor.progress(),
            mode,
            extractor.matcher().language(),
            inputs,
            output_directory,
            sink.written_files().to_vec(),
        ))
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &SnipError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Extract snippets from in-memory Markdown, concatenated with blank-line separators
pub fn extract_to_string(markdown: &str, language: &str) -> Result<String> {
    let defaults = ExtractConfig::default();
    let matcher = FenceMatcher::new(language, defaults.exclude_markers.as_slice())?;
    let mut extractor = Extractor::new(matcher);
    let mut sink = ConcatSink::new(Vec::new());

    extractor.scan_reader(Cursor::new(markdown.as_bytes()), &mut sink)?;
    extractor.finish(&mut sink)?;

    Ok(String::from_utf8_lossy(&sink.into_inner()).into_owned())
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
