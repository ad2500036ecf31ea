//! Configuration management for `pressify.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [theme] and [convert] definitions
//! ├── error.rs       # ConfigError
//! └── mod.rs         # PressConfig (this file)
//! ```
//!
//! The file is optional: without it every section uses its defaults. CLI
//! flags override values from the file.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{ConvertSectionConfig, ThemeSectionConfig};

use crate::{cli::ConvertArgs, log};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing pressify.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressConfig {
    /// Absolute path to the config file, if one was loaded (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Theme header values
    #[serde(default)]
    pub theme: ThemeSectionConfig,

    /// Conversion settings
    #[serde(default)]
    pub convert: ConvertSectionConfig,
}

impl PressConfig {
    /// Load configuration for a `convert` run.
    ///
    /// `args.config` is resolved relative to the site folder unless absolute.
    pub fn load(site: &Path, args: &ConvertArgs) -> Result<Self, ConfigError> {
        let path = if args.config.is_absolute() {
            args.config.clone()
        } else {
            site.join(&args.config)
        };

        let mut config = if path.is_file() {
            let mut config = Self::from_path(&path)?;
            config.config_path = Some(path);
            config
        } else {
            Self::default()
        };

        config.apply_convert_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    /// CLI flags win over the file.
    fn apply_convert_args(&mut self, args: &ConvertArgs) {
        if let Some(out) = &args.out {
            self.convert.out = out.clone();
        }
        if let Some(css_build) = args.css_build {
            self.convert.css_build = css_build;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.theme.validate()?;
        self.convert.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn convert_args(argv: &[&str]) -> ConvertArgs {
        let mut full = vec!["pressify", "convert"];
        full.extend_from_slice(argv);
        match crate::cli::Cli::parse_from(full).command {
            crate::cli::Commands::Convert { args } => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = PressConfig::load(dir.path(), &convert_args(&[])).unwrap();
        assert_eq!(config.convert.out, "rmk-theme");
        assert!(config.convert.css_build);
        assert_eq!(config.theme.slug, "rmk");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_file_values_and_cli_override() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("pressify.toml"),
            r#"
[theme]
name = "Club Theme"
slug = "club"

[convert]
out = "club-theme"
css_build = true
"#,
        )
        .unwrap();

        let config =
            PressConfig::load(dir.path(), &convert_args(&["--css-build", "false"])).unwrap();
        assert_eq!(config.theme.name, "Club Theme");
        assert_eq!(config.theme.slug, "club");
        assert_eq!(config.theme.version, "1.1.3");
        assert_eq!(config.convert.out, "club-theme");
        assert!(!config.convert.css_build);

        let config = PressConfig::load(dir.path(), &convert_args(&["-o", "other"])).unwrap();
        assert_eq!(config.convert.out, "other");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let (config, ignored) =
            PressConfig::parse_with_ignored("[theme]\nname = \"X\"\ncolour = \"red\"\n").unwrap();
        assert_eq!(config.theme.name, "X");
        assert_eq!(ignored, ["theme.colour"]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pressify.toml"), "[theme]\nslug = \"my-theme\"\n").unwrap();
        let err = PressConfig::load(dir.path(), &convert_args(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            PressConfig::parse_with_ignored("[theme\nname = 1"),
            Err(ConfigError::Toml(_))
        ));
    }
}
