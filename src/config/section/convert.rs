//! `[convert]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [convert]
//! out = "rmk-theme"   # theme folder created inside the site folder
//! css_build = true    # run npm/npx when package.json exists
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSectionConfig {
    /// Theme folder name inside the site folder.
    pub out: String,
    /// Run the external CSS build when `package.json` is present.
    pub css_build: bool,
}

impl Default for ConvertSectionConfig {
    fn default() -> Self {
        Self {
            out: "rmk-theme".into(),
            css_build: true,
        }
    }
}

impl ConvertSectionConfig {
    /// `out` must be a single folder name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let out = self.out.as_str();
        if out.is_empty() || out == "." || out == ".." || out.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "convert.out `{out}` must be a plain folder name"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_must_be_folder_name() {
        assert!(ConvertSectionConfig::default().validate().is_ok());
        for out in ["", ".", "..", "a/b", "a\\b"] {
            let section = ConvertSectionConfig {
                out: out.into(),
                ..Default::default()
            };
            assert!(section.validate().is_err(), "`{out}` should be rejected");
        }
    }
}
