use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnipError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Failed to read input file {path}: {source}")]
    InputUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Failed to write snippet {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Output directory missing at exit: {path}")]
    OutputDirectoryMissing { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SnipError {
    /// Classify an error raised while opening or reading an input file.
    pub fn from_input(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => SnipError::InputNotFound {
                path: path.display().to_string(),
            },
            _ => SnipError::InputUnreadable {
                path: path.display().to_string(),
                source,
            },
        }
    }

    pub fn output_write(path: &Path, source: std::io::Error) -> Self {
        SnipError::OutputWrite {
            path: path.display().to_string(),
            source,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for SnipError {
    fn user_message(&self) -> String {
        match self {
            SnipError::InputNotFound { path } => {
                format!("Input file does not exist: {}", path)
            }
            SnipError::InputUnreadable { path, source } => {
                format!("Could not read {}: {}", path, source)
            }
            SnipError::Permission { path } => {
                format!("Output directory is not writable: {}", path)
            }
            SnipError::OutputWrite { path, source } => {
                format!("Could not write {}: {}", path, source)
            }
            SnipError::OutputDirectoryMissing { path } => {
                format!("Output directory disappeared during extraction: {}", path)
            }
            SnipError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            SnipError::InputNotFound { .. } => Some(
                "Check the path and pass each Markdown file as a separate argument.".to_string(),
            ),
            SnipError::Permission { .. } => Some(
                "Choose a different directory with --dir or fix its write permissions.".to_string(),
            ),
            SnipError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config."
                    .to_string(),
            ),
            SnipError::OutputDirectoryMissing { .. } => Some(
                "Make sure nothing else removes the output directory while mdsnip runs."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for SnipError {
    fn from(error: toml::de::Error) -> Self {
        SnipError::Config {
            message: error.to_string(),
        }
    }
}

impl From<regex::Error> for SnipError {
    fn from(error: regex::Error) -> Self {
        SnipError::Config {
            message: format!("Invalid pattern: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, SnipError>;
