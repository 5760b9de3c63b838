use crate::error::{Result, SnipError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Language token that selects a labeled fence.
    pub language: String,
    /// Lines inside a selected fence containing any of these (case-insensitive) are dropped.
    pub exclude_markers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension for split-mode files, without the leading dot.
    pub extension: String,
    /// Split mode target. Concatenation to stdout when unset.
    pub directory: Option<PathBuf>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            language: "pyrope".to_string(),
            exclude_markers: vec!["compile error".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "prp".to_string(),
            directory: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SnipError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SnipError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| SnipError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["mdsnip.toml", ".mdsnip.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref language) = cli_args.language {
            self.extract.language = language.trim().to_string();
        }

        if let Some(ref markers) = cli_args.exclude_markers {
            self.extract.exclude_markers = markers
                .iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
        }

        if let Some(ref extension) = cli_args.extension {
            self.output.extension = extension.trim().to_string();
        }

        if let Some(ref directory) = cli_args.directory {
            self.output.directory = Some(directory.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| SnipError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| SnipError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.extract.language.trim().is_empty() {
            return Err(SnipError::Config {
                message: "Target language must not be empty".to_string(),
            });
        }

        if self
            .extract
            .exclude_markers
            .iter()
            .any(|m| m.trim().is_empty())
        {
            return Err(SnipError::Config {
                message: "Exclusion markers must not be empty".to_string(),
            });
        }

        let ext = &self.output.extension;
        if ext.is_empty() {
            return Err(SnipError::Config {
                message: "Snippet file extension must not be empty".to_string(),
            });
        }

        if ext.starts_with('.') || ext.contains('/') || ext.contains('\\') {
            return Err(SnipError::Config {
                message: format!(
                    "Snippet file extension must be a bare suffix like \"prp\", got \"{}\"",
                    ext
                ),
            });
        }

        Ok(())
    }

    pub fn is_split_mode(&self) -> bool {
        self.output.directory.is_some()
    }

    pub fn create_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config.output.directory = Some(PathBuf::from("snippets"));
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub language: Option<String>,
    pub exclude_markers: Option<Vec<String>>,
    pub extension: Option<String>,
    pub directory: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_exclude_markers(mut self, markers: Option<Vec<String>>) -> Self {
        self.exclude_markers = markers;
        self
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }
}
