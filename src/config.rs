use crate::error::{OdfTextError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub batch: BatchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension given to every rendered file, without the leading dot
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("text"),
            overwrite: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OdfTextError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| OdfTextError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| OdfTextError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                // Try to load from default locations
                let default_paths = ["odftext.toml", ".odftext.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        log::debug!("using configuration file {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref input_dir) = cli_args.input_dir {
            self.batch.input_dir = input_dir.clone();
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.batch.output_dir = output_dir.clone();
        }

        // The flag can only switch overwriting on
        if cli_args.overwrite {
            self.batch.overwrite = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| OdfTextError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| OdfTextError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let extension = &self.output.extension;

        if extension.is_empty() {
            return Err(OdfTextError::Config {
                message: "Output extension must not be empty".to_string(),
            });
        }

        if extension.contains(['/', '\\', '.']) {
            return Err(OdfTextError::Config {
                message: format!(
                    "Output extension must be a bare extension without dots or separators: {}",
                    extension
                ),
            });
        }

        if self.batch.output_dir.as_os_str().is_empty() {
            return Err(OdfTextError::Config {
                message: "Output directory must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_dir(mut self, input_dir: Option<PathBuf>) -> Self {
        self.input_dir = input_dir;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
