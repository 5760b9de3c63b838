use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_scanned: usize,
    pub total_files: usize,
    pub lines_read: usize,
    pub bytes_read: u64,
    pub snippets_emitted: usize,
    pub fences_skipped: usize,
    pub lines_filtered: usize,
    pub unterminated_flushed: bool,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl ExtractionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_scanned: 0,
            total_files,
            lines_read: 0,
            bytes_read: 0,
            snippets_emitted: 0,
            fences_skipped: 0,
            lines_filtered: 0,
            unterminated_flushed: false,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn start_file(&mut self, filename: String) {
        self.current_file = Some(filename);
    }

    pub fn finish_file(&mut self) {
        self.files_scanned += 1;
    }

    pub fn record_line(&mut self, bytes: usize) {
        self.lines_read += 1;
        self.bytes_read += bytes as u64;
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_scanned as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for ExtractionProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    Concatenate,
    Split,
    DryRun,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExtractionMode::Concatenate => "concatenate",
            ExtractionMode::Split => "split",
            ExtractionMode::DryRun => "dry-run",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub mode: ExtractionMode,
    pub language: String,
    pub inputs: Vec<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub files_scanned: usize,
    pub lines_read: usize,
    pub bytes_read: u64,
    pub snippets_emitted: usize,
    pub fences_skipped: usize,
    pub lines_filtered: usize,
    pub unterminated_flushed: bool,
    pub written_files: Vec<PathBuf>,
    pub extraction_time: DateTime<Utc>,
    pub extraction_duration: Duration,
}

impl ExtractionReport {
    pub fn from_progress(
        progress: &ExtractionProgress,
        mode: ExtractionMode,
        language: &str,
        inputs: &[PathBuf],
        output_directory: Option<PathBuf>,
        written_files: Vec<PathBuf>,
    ) -> Self {
        Self {
            mode,
            language: language.to_string(),
            inputs: inputs.to_vec(),
            output_directory,
            files_scanned: progress.files_scanned,
            lines_read: progress.lines_read,
            bytes_read: progress.bytes_read,
            snippets_emitted: progress.snippets_emitted,
            fences_skipped: progress.fences_skipped,
            lines_filtered: progress.lines_filtered,
            unterminated_flushed: progress.unterminated_flushed,
            written_files,
            extraction_time: Utc::now(),
            extraction_duration: progress.elapsed(),
        }
    }
}
