//! Configuration for the rsdn tools.
//!
//! The defaults live in `defaults/rsdn.default.toml`, which is compiled in, so
//! a binary started without any file still behaves like the forum. [`Loader`]
//! stacks user files and single-key overrides on top and produces an
//! [`RsdnConfig`], whose sections convert into the formatter's own types.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use rsdn_format::{FormatOptions, FormatterSettings, RequestContext};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/rsdn.default.toml");

/// Top-level configuration consumed by rsdn applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RsdnConfig {
    pub formatter: FormatterConfig,
    pub host: HostConfig,
}

/// Mirrors the knobs exposed by the formatter.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatterConfig {
    pub smiles: bool,
    pub implicit_links: bool,
    pub image_prefix: String,
    pub path_to_root: String,
    pub canonical_host: String,
    pub open_forum_links_in_new_window: bool,
}

impl From<&FormatterConfig> for FormatterSettings {
    fn from(config: &FormatterConfig) -> Self {
        FormatterSettings {
            image_prefix: config.image_prefix.clone(),
            path_to_root: config.path_to_root.clone(),
            canonical_host: config.canonical_host.clone(),
            open_forum_links_in_new_window: config.open_forum_links_in_new_window,
        }
    }
}

impl From<&FormatterConfig> for FormatOptions {
    fn from(config: &FormatterConfig) -> Self {
        FormatOptions {
            smiles: config.smiles,
            implicit_links: config.implicit_links,
            ..FormatOptions::default()
        }
    }
}

/// Facts about the page the output is embedded in.
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    pub secure: bool,
    pub timezone_offset_minutes: f64,
}

impl From<&HostConfig> for RequestContext {
    fn from(config: &HostConfig) -> Self {
        RequestContext::new(config.secure, config.timezone_offset_minutes)
    }
}

/// Layers user files and overrides over the embedded defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Loader holding only the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file on top of what is already loaded. The file
    /// must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a file only when it exists, such as `rsdn.toml` in the working
    /// directory.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one dotted key, e.g. `formatter.smiles`. Overrides win over
    /// every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers and deserialize them into [`RsdnConfig`].
    pub fn build(self) -> Result<RsdnConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RsdnConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.formatter.smiles);
        assert_eq!(config.formatter.image_prefix, "/Forum/Images/");
        assert_eq!(config.formatter.canonical_host, "rsdn.ru");
        assert!(!config.host.secure);
        assert_eq!(config.host.timezone_offset_minutes, 0.0);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("formatter.smiles", false)
            .expect("override to apply")
            .set_override("host.secure", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.formatter.smiles);
        assert!(config.host.secure);
    }

    #[test]
    fn layers_user_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "[formatter]\ncanonical_host = \"rsdn.org\"").expect("write");

        let config = Loader::new().with_file(file.path()).build().expect("config to build");
        assert_eq!(config.formatter.canonical_host, "rsdn.org");
        assert!(config.formatter.implicit_links);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        assert!(Loader::new().with_file("/nonexistent/rsdn.toml").build().is_err());
        assert!(Loader::new()
            .with_optional_file("/nonexistent/rsdn.toml")
            .build()
            .is_ok());
    }

    #[test]
    fn formatter_config_converts_to_settings_and_options() {
        let config = load_defaults().expect("defaults to deserialize");
        let settings: FormatterSettings = (&config.formatter).into();
        assert_eq!(settings.image_prefix, "/Forum/Images/");
        assert!(settings.open_forum_links_in_new_window);

        let options = FormatOptions::from(&config.formatter);
        assert!(options.smiles);
        assert!(options.implicit_links);
        assert!(!options.raw);
        assert!(!options.secure);

        let host = RequestContext::from(&config.host);
        assert_eq!(host, RequestContext::new(false, 0.0));
    }
}
