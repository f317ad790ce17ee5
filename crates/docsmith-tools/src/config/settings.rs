//! Configuration settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use docsmith_pdf::{Converter, Docx2Pdf, LibreOffice};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const CONFIG_FILE_NAME: &str = "docsmith.toml";

/// Errors loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// PDF conversion settings
    pub conversion: ConversionSettings,
    /// Formatting demo settings
    pub demo: DemoSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load from `path`, or from `docsmith.toml` in `cwd` if present, or defaults
    pub fn discover(path: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = cwd.join(CONFIG_FILE_NAME);
                if local.is_file() {
                    Self::load(&local)
                } else {
                    debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}

/// PDF conversion configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConversionSettings {
    /// Per-attempt timeout for an external converter
    pub timeout_secs: u64,
    /// LibreOffice executable names or paths, tried in order
    pub libreoffice_binaries: Vec<String>,
    /// Try docx2pdf when LibreOffice is missing or fails
    pub fallback_docx2pdf: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: docsmith_pdf::DEFAULT_TIMEOUT.as_secs(),
            libreoffice_binaries: LibreOffice::DEFAULT_BINARIES
                .iter()
                .map(|b| b.to_string())
                .collect(),
            fallback_docx2pdf: true,
        }
    }
}

impl ConversionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the converter chain these settings describe
    pub fn converter(&self) -> Converter {
        let converter = Converter::new(self.timeout())
            .with_backend(LibreOffice::with_binaries(self.libreoffice_binaries.clone()));
        if self.fallback_docx2pdf {
            converter.with_backend(Docx2Pdf)
        } else {
            converter
        }
    }
}

/// Formatting demo configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoSettings {
    /// Document written by the demo
    pub output: String,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            output: "test_formatting.docx".to_string(),
        }
    }
}
