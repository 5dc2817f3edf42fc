//! Embedder settings and their JSON serialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EmbedResult;

/// Catalog entry for one annotated group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    /// Whether the group's data is to be embedded.
    pub embed: bool,
    /// Highest element dimension of the group's data (0 for point data).
    pub dimension: u8,
    /// Number of elements (dimension 1-3) or data points (dimension 0).
    pub size: usize,
}

/// Serializable embedder configuration.
///
/// Field and marker names left as `None` are discovered on load. The group
/// map records the embed selection per annotated group; entries for groups
/// that no longer exist in the data are dropped on the next load.
///
/// # Example
///
/// ```
/// use scaffold_embed::EmbedderSettings;
///
/// let json = r#"{
///     "dataCoordinatesField": "coordinates",
///     "diagnosticLevel": 1,
///     "groupData": {}
/// }"#;
/// let settings = EmbedderSettings::from_json(json).unwrap();
/// assert_eq!(settings.data_coordinates_field.as_deref(), Some("coordinates"));
/// assert_eq!(settings.diagnostic_level, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedderSettings {
    /// Name of the coordinates field on the data region, or `None` to
    /// discover the first coordinate field.
    pub data_coordinates_field: Option<String>,

    /// Name of the fitted coordinates field on the host region, or `None`
    /// to discover it.
    pub fitted_coordinates_field: Option<String>,

    /// Name of the material coordinates field on the host region, or `None`
    /// to guess it from the largest annotated group.
    pub material_coordinates_field: Option<String>,

    /// Name of the marker group on the data region, or `None` for the
    /// default (`"marker"`).
    pub data_marker_group: Option<String>,

    /// 0 = warnings only; 1+ = informational discovery messages too.
    pub diagnostic_level: u32,

    /// Embed selection per annotated group, keyed by group name.
    pub group_data: BTreeMap<String, GroupInfo>,
}

impl EmbedderSettings {
    /// Parse settings from their JSON serialization.
    ///
    /// Unknown keys are ignored so settings written by newer versions still
    /// load.
    ///
    /// # Errors
    ///
    /// Returns a settings error on malformed JSON.
    pub fn from_json(text: &str) -> EmbedResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the settings as pretty-printed JSON.
    ///
    /// Group entries are written in name order so output is stable.
    ///
    /// # Errors
    ///
    /// Returns a settings error if serialization fails.
    pub fn to_json(&self) -> EmbedResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut settings = EmbedderSettings {
            data_coordinates_field: Some("coordinates".to_string()),
            fitted_coordinates_field: Some("fitted coordinates".to_string()),
            material_coordinates_field: Some("body coordinates".to_string()),
            data_marker_group: Some("marker".to_string()),
            diagnostic_level: 1,
            group_data: BTreeMap::new(),
        };
        settings.group_data.insert(
            "cube".to_string(),
            GroupInfo {
                embed: true,
                dimension: 3,
                size: 1,
            },
        );

        let json = settings.to_json().unwrap();
        let restored = EmbedderSettings::from_json(&json).unwrap();
        assert_eq!(restored, settings);
    }

    #[test]
    fn defaults_for_missing_keys() {
        let settings = EmbedderSettings::from_json("{}").unwrap();
        assert!(settings.data_coordinates_field.is_none());
        assert_eq!(settings.diagnostic_level, 0);
        assert!(settings.group_data.is_empty());
    }

    #[test]
    fn unknown_keys_ignored() {
        let settings =
            EmbedderSettings::from_json(r#"{ "futureOption": 7, "diagnosticLevel": 2 }"#).unwrap();
        assert_eq!(settings.diagnostic_level, 2);
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(EmbedderSettings::from_json("{ nope").is_err());
    }

    #[test]
    fn group_entries_serialize_camel_case() {
        let mut settings = EmbedderSettings::default();
        settings.group_data.insert(
            "line".to_string(),
            GroupInfo {
                embed: false,
                dimension: 1,
                size: 2,
            },
        );
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"groupData\""));
        assert!(json.contains("\"embed\": false"));
        assert!(json.contains("\"dimension\": 1"));
    }
}
