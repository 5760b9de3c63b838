use crate::error::{Result, SnipError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Destination for completed snippets.
pub trait SnippetSink {
    /// Receive one snippet. `index` is the 1-based snippet number.
    fn emit(&mut self, index: usize, snippet: &[u8]) -> Result<()>;

    /// Called once after the last input has been scanned.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    /// Paths created by this sink, in emission order.
    fn written_files(&self) -> &[PathBuf] {
        &[]
    }
}

/// Concatenation mode: every snippet followed by a blank separator line.
pub struct ConcatSink<W: Write> {
    writer: W,
}

impl<W: Write> ConcatSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl ConcatSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SnippetSink for ConcatSink<W> {
    fn emit(&mut self, _index: usize, snippet: &[u8]) -> Result<()> {
        self.writer.write_all(snippet)?;
        // Terminate the last line before the separator
        if !snippet.ends_with(b"\n") {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Split mode: snippet `N` goes to `<dir>/file<N>.<ext>`.
pub struct SplitSink {
    directory: PathBuf,
    extension: String,
    written: Vec<PathBuf>,
}

impl SplitSink {
    /// Create the directory if needed and confirm it accepts new files.
    pub fn prepare<P: Into<PathBuf>>(directory: P, extension: &str) -> Result<Self> {
        let directory = directory.into();

        fs::create_dir_all(&directory).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => SnipError::Permission {
                path: directory.display().to_string(),
            },
            _ => SnipError::Io(e),
        })?;

        if !directory.is_dir() {
            return Err(SnipError::Permission {
                path: directory.display().to_string(),
            });
        }

        // Unnamed scratch file, removed on drop
        tempfile::tempfile_in(&directory).map_err(|_| SnipError::Permission {
            path: directory.display().to_string(),
        })?;

        Ok(Self {
            directory,
            extension: extension.to_string(),
            written: Vec::new(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn snippet_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("file{}.{}", index, self.extension))
    }
}

impl SnippetSink for SplitSink {
    fn emit(&mut self, index: usize, snippet: &[u8]) -> Result<()> {
        let path = self.snippet_path(index);
        fs::write(&path, snippet).map_err(|e| SnipError::output_write(&path, e))?;
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.directory.is_dir() {
            return Err(SnipError::OutputDirectoryMissing {
                path: self.directory.display().to_string(),
            });
        }
        Ok(())
    }

    fn written_files(&self) -> &[PathBuf] {
        &self.written
    }
}

/// Counts snippets without writing them anywhere.
#[derive(Debug, Default)]
pub struct DryRunSink {
    snippets: Vec<usize>,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte length of each snippet seen so far.
    pub fn snippet_sizes(&self) -> &[usize] {
        &self.snippets
    }
}

impl SnippetSink for DryRunSink {
    fn emit(&mut self, _index: usize, snippet: &[u8]) -> Result<()> {
        self.snippets.push(snippet.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_concat_sink_separators() {
        let mut sink = ConcatSink::new(Vec::new());
        sink.emit(1, b"a\nb\n").unwrap();
        sink.emit(2, b"").unwrap();
        sink.emit(3, b"no newline").unwrap();
        sink.finish().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "a\nb\n\n\n\nno newline\n\n");
    }

    #[test]
    fn test_split_sink_names_files_by_index() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = SplitSink::prepare(temp_dir.path(), "prp").unwrap();

        sink.emit(1, b"first\n").unwrap();
        sink.emit(2, b"").unwrap();
        sink.finish().unwrap();

        let first = temp_dir.path().join("file1.prp");
        let second = temp_dir.path().join("file2.prp");
        assert_eq!(fs::read_to_string(&first).unwrap(), "first\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "");
        assert_eq!(sink.written_files(), &[first, second]);
    }

    #[test]
    fn test_split_sink_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a").join("b");

        let sink = SplitSink::prepare(&target, "rs").unwrap();
        assert!(target.is_dir());
        assert_eq!(sink.snippet_path(7), target.join("file7.rs"));
        // The scratch file is gone once prepare returns
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_split_sink_rejects_file_as_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("occupied");
        fs::write(&file, "x").unwrap();

        assert!(SplitSink::prepare(&file, "prp").is_err());
    }

    #[test]
    fn test_split_sink_detects_removed_directory() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out");
        let mut sink = SplitSink::prepare(&target, "prp").unwrap();

        fs::remove_dir_all(&target).unwrap();
        assert!(matches!(
            sink.finish(),
            Err(SnipError::OutputDirectoryMissing { .. })
        ));
    }

    #[test]
    fn test_dry_run_sink_counts() {
        let mut sink = DryRunSink::new();
        sink.emit(1, b"abc").unwrap();
        sink.emit(2, b"").unwrap();
        assert_eq!(sink.snippet_sizes(), &[3, 0]);
        assert!(sink.written_files().is_empty());
    }
}
