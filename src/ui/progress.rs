use crate::extractor::ExtractionProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Progress bars for the scan. Drawn on stderr; hidden when disabled.
pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len:5} files {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Scanning...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

pub fn update_file_progress(pb: &ProgressBar, progress: &ExtractionProgress) {
    pb.set_position(progress.files_scanned as u64);

    let message = match progress.current_file {
        Some(ref file) => format!("{} ({} snippets)", truncate_filename(file, 40), progress.snippets_emitted),
        None => format!("{} snippets", progress.snippets_emitted),
    };
    pb.set_message(message);
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let elapsed_msg = if duration.as_secs() > 0 {
        format!("{} ({}s)", message, duration.as_secs())
    } else {
        format!("{} ({}ms)", message, duration.as_millis())
    };

    pb.finish_with_message(elapsed_msg);
}

fn truncate_filename(filename: &str, max_len: usize) -> String {
    let count = filename.chars().count();
    if count <= max_len {
        filename.to_string()
    } else {
        let tail: String = filename.chars().skip(count - (max_len - 3)).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_manager_hides_bars() {
        let manager = ProgressManager::new(false);
        assert!(!manager.is_enabled());
        assert!(manager.create_file_progress(3).is_hidden());
    }

    #[test]
    fn test_truncate_filename() {
        assert_eq!(truncate_filename("short.md", 20), "short.md");
        let long = "docs/some/very/deeply/nested/chapter.md";
        let truncated = truncate_filename(long, 20);
        assert_eq!(truncated.chars().count(), 20);
        assert!(truncated.starts_with("..."));
        assert!(truncated.ends_with("chapter.md"));
    }

    #[test]
    fn test_update_hidden_progress() {
        let pb = ProgressBar::hidden();
        let mut progress = ExtractionProgress::new(2);
        progress.start_file("a.md".to_string());
        progress.finish_file();
        update_file_progress(&pb, &progress);
        assert_eq!(pb.position(), 1);
    }
}
