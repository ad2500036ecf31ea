//! `[theme]` section configuration.
//!
//! Values written into the `style.css` header and used as the prefix of the
//! generated PHP function and enqueue handles.
//!
//! # Example
//!
//! ```toml
//! [theme]
//! name = "RMK Theme"
//! author = "Tian Hrovat  & Andrej Sušnik"
//! slug = "rmk"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSectionConfig {
    /// `Theme Name:` header.
    pub name: String,
    /// `Theme URI:` header.
    pub uri: String,
    /// `Author:` header.
    pub author: String,
    /// `Description:` header.
    pub description: String,
    /// `Version:` header.
    pub version: String,
    /// Prefix for `<slug>_theme_enqueue` and `<slug>-style` handles.
    pub slug: String,
}

impl Default for ThemeSectionConfig {
    fn default() -> Self {
        Self {
            name: "RMK Theme".into(),
            uri: "http://example.com/".into(),
            author: "Tian Hrovat  & Andrej Sušnik".into(),
            description: "Converted from static site".into(),
            version: "1.1.3".into(),
            slug: "rmk".into(),
        }
    }
}

impl ThemeSectionConfig {
    /// The slug ends up in a PHP function name, so it must be an identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut chars = self.slug.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(ConfigError::Validation(format!(
                "theme.slug `{}` must start with a letter or `_` and contain only letters, digits and `_`",
                self.slug
            )));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation("theme.name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ThemeSectionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_slugs() {
        for slug in ["", "1rmk", "rmk-theme", "rmk theme"] {
            let theme = ThemeSectionConfig {
                slug: slug.into(),
                ..Default::default()
            };
            assert!(theme.validate().is_err(), "`{slug}` should be rejected");
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        let theme = ThemeSectionConfig {
            name: "  ".into(),
            ..Default::default()
        };
        assert!(theme.validate().is_err());
    }
}
