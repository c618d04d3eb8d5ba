//! Loading and validation for `NormalizerConfig`

use std::path::Path;

use super::types::{LineBreakMode, NormalizerConfig};
use crate::error::{NormalizeError, NormalizeResult};

impl NormalizerConfig {
    /// Parse a JSON configuration document.
    ///
    /// Missing fields take their defaults, so `{}` is a valid document.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::Json` for malformed JSON and
    /// `NormalizeError::Config` for empty names in any list.
    pub fn from_json_str(json: &str) -> NormalizeResult<Self> {
        let mut config: NormalizerConfig = serde_json::from_str(json)?;
        config.normalize_names();
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::Io` if the file cannot be read, otherwise the
    /// same errors as [`NormalizerConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> NormalizeResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded normalizer config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// The line-break mode the pipeline actually applies.
    ///
    /// `preserve_line_breaks` wins over whatever mode is configured.
    #[must_use]
    pub fn effective_line_break_mode(&self) -> LineBreakMode {
        if self.preserve_line_breaks {
            LineBreakMode::Preserve
        } else {
            self.line_break_mode
        }
    }

    pub(crate) fn normalize_names(&mut self) {
        for list in [
            &mut self.attribute_strip_list,
            &mut self.attribute_strip_prefixes,
            &mut self.block_elements,
            &mut self.carry_over_attributes,
        ] {
            for name in list.iter_mut() {
                *name = name.trim().to_ascii_lowercase();
            }
        }
    }

    pub(crate) fn validate(&self) -> NormalizeResult<()> {
        let lists = [
            ("attribute_strip_list", &self.attribute_strip_list),
            ("attribute_strip_prefixes", &self.attribute_strip_prefixes),
            ("block_elements", &self.block_elements),
            ("carry_over_attributes", &self.carry_over_attributes),
        ];
        for (field, list) in lists {
            if list.iter().any(String::is_empty) {
                return Err(NormalizeError::Config(format!(
                    "{field} contains an empty name"
                )));
            }
        }
        Ok(())
    }
}
