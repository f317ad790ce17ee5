//! Configuration
//!
//! Settings are loaded from `docsmith.toml`, either the path given on the
//! command line or the file in the current directory when it exists:
//!
//! ```toml
//! [conversion]
//! timeout_secs = 120
//! libreoffice_binaries = ["soffice", "libreoffice"]
//! fallback_docx2pdf = true
//!
//! [demo]
//! output = "test_formatting.docx"
//! ```

mod settings;


pub use settings::{ConfigError, ConversionSettings, DemoSettings, Settings, CONFIG_FILE_NAME};
