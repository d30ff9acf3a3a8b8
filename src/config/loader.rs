// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_file(path)        (YAML, or TOML by extension)
//!   .add_yaml_str()
//!   .add_toml_str()
//!   .with_env_prefix()     (REPO_VAULT__BACKUP__ENABLED=true)
//!   .set()                 (CLI overrides)
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use std::path::Path;

use config::{Environment, File, FileFormat};

use super::Config;
use crate::error::ConfigError;

/// Separator between nested keys in environment variable names.
const ENV_SEPARATOR: &str = "__";

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    /// Last source added, named in parse errors.
    source: Option<String>,
}

/// Picks the file format from the extension; anything but `.toml` is YAML.
#[must_use]
pub fn format_for(path: &Path) -> FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => FileFormat::Toml,
        _ => FileFormat::Yaml,
    }
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            source: None,
        }
    }

    /// Adds a required configuration file.
    ///
    /// The file is read when `build()` is called.
    #[must_use]
    pub fn add_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(format_for(p)).required(true));
        self.source = Some(p.display().to_string());
        self
    }

    #[must_use]
    pub fn add_yaml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Yaml));
        self.source = Some("<string>".to_string());
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.source = Some("<string>".to_string());
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self, ConfigError> {
        self.builder =
            self.builder
                .set_override(key, value)
                .map_err(|e| ConfigError::InvalidValue {
                    section: "override".to_string(),
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        Ok(self)
    }

    /// Builds and validates the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A configuration file is missing or has invalid syntax.
    /// - The merged configuration does not match the `Config` structure.
    /// - Validation fails (bad regex, zero timeout, empty API URL).
    pub fn build(self) -> Result<Config, ConfigError> {
        let source = self.source.unwrap_or_else(|| "<none>".to_string());
        let parse_error = |e: config::ConfigError| ConfigError::ParseError {
            path: source.clone(),
            message: e.to_string(),
        };

        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                Environment::with_prefix(prefix)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let cfg = builder.build().map_err(parse_error)?;
        let config: Config = cfg.try_deserialize().map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
