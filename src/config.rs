use crate::error::ColangError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Validation settings, as sent by an editor under the `colangServer` section.
///
/// Every field has a default, so partial objects (or `{}`) are valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Upper bound on diagnostics returned for one document.
    pub max_number_of_problems: usize,
    /// Whether `Unknown line` errors are emitted at all.
    pub report_unknown_lines: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_number_of_problems: 1000,
            report_unknown_lines: true,
        }
    }
}

impl Settings {
    /// Parses settings from a JSON object.
    ///
    /// # Errors
    /// Returns [`ColangError::Json`] if the text is not a valid settings object.
    pub fn from_json_str(json: &str) -> Result<Self, ColangError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses settings from a YAML mapping.
    ///
    /// # Errors
    /// Returns [`ColangError::Yaml`] if the text is not a valid settings mapping.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ColangError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads settings from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension, or does not contain valid settings.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ColangError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let read = || {
            std::fs::read_to_string(path).map_err(|source| ColangError::Io {
                path: path.display().to_string(),
                source,
            })
        };

        match extension.as_str() {
            "json" => Self::from_json_str(&read()?),
            "yaml" | "yml" => Self::from_yaml_str(&read()?),
            _ => Err(ColangError::UnsupportedSettingsFormat {
                path: path.display().to_string(),
            }),
        }
    }
}
