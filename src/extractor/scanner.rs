use crate::error::{Result, SnipError};
use crate::extractor::fence::FenceMatcher;
use crate::extractor::report::ExtractionProgress;
use crate::extractor::sink::SnippetSink;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Line-by-line scan state. Survives across input files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    inside_fence: bool,
    inside_selected_fence: bool,
    buffer: Vec<u8>,
    snippet_index: usize,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inside_fence(&self) -> bool {
        self.inside_fence
    }

    pub fn is_inside_selected_fence(&self) -> bool {
        self.inside_selected_fence
    }

    /// Raw bytes collected for the open fence.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of snippets emitted so far.
    pub fn snippet_index(&self) -> usize {
        self.snippet_index
    }

    fn open(&mut self, selected: bool) {
        self.inside_fence = true;
        self.inside_selected_fence = selected;
        self.buffer.clear();
    }

    fn close(&mut self) {
        self.inside_fence = false;
        self.inside_selected_fence = false;
        self.buffer.clear();
    }
}

/// Drives a [`FenceMatcher`] over input text and hands finished snippets to a sink.
pub struct Extractor {
    matcher: FenceMatcher,
    state: ScanState,
    progress: ExtractionProgress,
}

impl Extractor {
    pub fn new(matcher: FenceMatcher) -> Self {
        Self {
            matcher,
            state: ScanState::new(),
            progress: ExtractionProgress::default(),
        }
    }

    pub fn with_total_files(mut self, total_files: usize) -> Self {
        self.progress.total_files = total_files;
        self
    }

    pub fn matcher(&self) -> &FenceMatcher {
        &self.matcher
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn progress(&self) -> &ExtractionProgress {
        &self.progress
    }

    /// Open `path` and scan it to completion. The handle is dropped on return.
    pub fn scan_file<S: SnippetSink + ?Sized>(&mut self, path: &Path, sink: &mut S) -> Result<()> {
        let file = File::open(path).map_err(|e| SnipError::from_input(path, e))?;
        self.progress.start_file(path.display().to_string());
        debug!(file = %path.display(), "scanning input");

        self.scan_with(BufReader::new(file), sink, |e| SnipError::from_input(path, e))?;

        self.progress.finish_file();
        Ok(())
    }

    /// Scan every line of `reader`, emitting each selected fence as it closes.
    pub fn scan_reader<R: BufRead, S: SnippetSink + ?Sized>(
        &mut self,
        reader: R,
        sink: &mut S,
    ) -> Result<()> {
        self.scan_with(reader, sink, SnipError::Io)
    }

    fn scan_with<R, S, F>(&mut self, mut reader: R, sink: &mut S, read_error: F) -> Result<()>
    where
        R: BufRead,
        S: SnippetSink + ?Sized,
        F: Fn(io::Error) -> SnipError,
    {
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let read = reader.read_until(b'\n', &mut raw).map_err(&read_error)?;
            if read == 0 {
                break;
            }
            self.progress.record_line(read);

            self.process_line(&raw, sink)?;
        }

        Ok(())
    }

    fn process_line<S: SnippetSink + ?Sized>(&mut self, line: &[u8], sink: &mut S) -> Result<()> {
        if self.matcher.is_fence(line) {
            if self.state.inside_fence {
                if self.state.inside_selected_fence {
                    self.emit(sink)?;
                }
                self.state.close();
            } else {
                let selected = self.matcher.is_selected(line);
                if !selected {
                    self.progress.fences_skipped += 1;
                }
                trace!(
                    selected,
                    fence = %String::from_utf8_lossy(line.trim_ascii()),
                    "fence opened"
                );
                self.state.open(selected);
            }
            return Ok(());
        }

        if self.state.inside_selected_fence {
            if self.matcher.is_excluded(line) {
                self.progress.lines_filtered += 1;
                trace!(
                    line = %String::from_utf8_lossy(line.trim_ascii_end()),
                    "dropped excluded line"
                );
                return Ok(());
            }
            self.state.buffer.extend_from_slice(line);
        }

        Ok(())
    }

    fn emit<S: SnippetSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.state.snippet_index += 1;
        debug!(
            index = self.state.snippet_index,
            bytes = self.state.buffer.len(),
            "snippet complete"
        );
        sink.emit(self.state.snippet_index, &self.state.buffer)?;
        self.progress.snippets_emitted += 1;
        Ok(())
    }

    /// Flush a non-empty unterminated selected fence, then finalize the sink.
    pub fn finish<S: SnippetSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        if self.state.inside_fence
            && self.state.inside_selected_fence
            && !self.state.buffer.is_empty()
        {
            debug!("input ended inside a selected fence; flushing pending snippet");
            self.emit(sink)?;
            self.progress.unterminated_flushed = true;
            self.state.close();
        }

        self.progress.current_file = None;
        sink.finish()
    }
}
