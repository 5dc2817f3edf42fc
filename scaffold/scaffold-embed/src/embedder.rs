//! The embedder client API.

use std::path::PathBuf;

use scaffold_io::load_region;
use scaffold_types::Region;
use tracing::{info, warn};

use crate::catalog::build_group_catalog;
use crate::discovery::{
    discover_marker_group, find_coordinates_field, find_data_coordinates_field,
    guess_material_field_name, MarkerFields,
};
use crate::error::{EmbedError, EmbedResult};
use crate::output::generate_output;
use crate::settings::{EmbedderSettings, GroupInfo};

/// Assigns material coordinates to annotated data embedded in a scaffold.
///
/// An embedder is constructed over three document paths:
///
/// 1. the **scaffold** model carrying the material coordinate field,
/// 2. the **fitted geometry** defining the scaffold's fitted state, and
/// 3. the **data** captured in fitted-state coordinates, organized into
///    annotated groups.
///
/// [`load`](Self::load) reads the documents and discovers coordinate fields,
/// the marker group, and the group catalog. The client then selects groups
/// with [`group_set_embed`](Self::group_set_embed) and calls
/// [`generate_output`](Self::generate_output) to compute material
/// coordinates for every selected point.
///
/// # Example
///
/// ```no_run
/// use scaffold_embed::DataEmbedder;
///
/// let mut embedder = DataEmbedder::new(
///     "scaffold.json",
///     "fitted_geometry.json",
///     "data.json",
/// );
/// embedder.load().unwrap();
///
/// for name in embedder.group_names() {
///     println!("{name}: embed = {}", embedder.group_is_embed(&name));
/// }
///
/// let output = embedder.generate_output().unwrap();
/// println!("output has {} groups", output.groups().count());
/// ```
#[derive(Debug)]
pub struct DataEmbedder {
    scaffold_path: PathBuf,
    fitted_geometry_path: PathBuf,
    data_path: PathBuf,

    data_coordinates_field: Option<String>,
    fitted_coordinates_field: Option<String>,
    material_coordinates_field: Option<String>,
    marker_group_name: Option<String>,
    diagnostic_level: u32,
    catalog: Vec<(String, GroupInfo)>,

    host: Option<Region>,
    data: Option<Region>,
    marker: Option<MarkerFields>,
    output: Option<Region>,
}

impl DataEmbedder {
    /// Create an embedder over the three input documents.
    ///
    /// Nothing is read until [`load`](Self::load); call
    /// [`decode_settings`](Self::decode_settings) first if stored settings
    /// should steer discovery.
    #[must_use]
    pub fn new(
        scaffold_path: impl Into<PathBuf>,
        fitted_geometry_path: impl Into<PathBuf>,
        data_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scaffold_path: scaffold_path.into(),
            fitted_geometry_path: fitted_geometry_path.into(),
            data_path: data_path.into(),
            data_coordinates_field: None,
            fitted_coordinates_field: None,
            material_coordinates_field: None,
            marker_group_name: None,
            diagnostic_level: 0,
            catalog: Vec::new(),
            host: None,
            data: None,
            marker: None,
            output: None,
        }
    }

    /// Apply settings from their JSON serialization.
    ///
    /// Field names steer discovery on the next [`load`](Self::load); group
    /// entries seed the embed selection.
    ///
    /// # Errors
    ///
    /// Returns a settings error on malformed JSON.
    pub fn decode_settings(&mut self, text: &str) -> EmbedResult<()> {
        let settings = EmbedderSettings::from_json(text)?;
        self.data_coordinates_field = settings.data_coordinates_field;
        self.fitted_coordinates_field = settings.fitted_coordinates_field;
        self.material_coordinates_field = settings.material_coordinates_field;
        self.marker_group_name = settings.data_marker_group;
        self.diagnostic_level = settings.diagnostic_level;
        self.catalog = settings.group_data.into_iter().collect();
        Ok(())
    }

    /// Serialize the current settings as JSON.
    ///
    /// # Errors
    ///
    /// Returns a settings error if serialization fails.
    pub fn encode_settings(&self) -> EmbedResult<String> {
        self.settings().to_json()
    }

    /// Get a snapshot of the current settings.
    #[must_use]
    pub fn settings(&self) -> EmbedderSettings {
        EmbedderSettings {
            data_coordinates_field: self.data_coordinates_field.clone(),
            fitted_coordinates_field: self.fitted_coordinates_field.clone(),
            material_coordinates_field: self.material_coordinates_field.clone(),
            data_marker_group: self.marker_group_name.clone(),
            diagnostic_level: self.diagnostic_level,
            group_data: self.catalog.iter().cloned().collect(),
        }
    }

    /// Read the documents and discover fields, markers, and groups.
    ///
    /// May be called again to re-read changed inputs; embed selections are
    /// preserved for groups that still exist.
    ///
    /// # Errors
    ///
    /// Returns document errors from reading any of the three inputs, and a
    /// model error if the scaffold and fitted geometry documents do not
    /// share a topology.
    pub fn load(&mut self) -> EmbedResult<()> {
        self.host = None;
        self.data = None;
        self.marker = None;
        self.output = None;

        let mut host = load_region(&self.fitted_geometry_path)?;
        self.fitted_coordinates_field = find_coordinates_field(
            &mut host,
            self.fitted_coordinates_field.as_deref(),
            Some("fitted"),
        );

        let scaffold = load_region(&self.scaffold_path)?;
        host.merge(scaffold)?;
        if self.material_coordinates_field.is_none() {
            self.material_coordinates_field = guess_material_field_name(&host);
        }
        self.material_coordinates_field = find_coordinates_field(
            &mut host,
            self.material_coordinates_field.as_deref(),
            None,
        );

        let data = load_region(&self.data_path)?;
        self.data_coordinates_field =
            find_data_coordinates_field(&data, self.data_coordinates_field.as_deref());

        self.marker = discover_marker_group(
            &data,
            self.marker_group_name.as_deref(),
            self.data_coordinates_field.as_deref(),
        );
        if let Some(marker) = &self.marker {
            self.marker_group_name = Some(marker.group_name.clone());
        }

        self.catalog = build_group_catalog(&host, &data, self.marker.as_ref(), &self.catalog);

        if self.diagnostic_level > 0 {
            info!(
                fitted = self.fitted_coordinates_field.as_deref(),
                material = self.material_coordinates_field.as_deref(),
                data = self.data_coordinates_field.as_deref(),
                marker = self.marker.as_ref().map(|m| m.group_name.as_str()),
                groups = self.catalog.len(),
                "documents loaded"
            );
        }

        self.host = Some(host);
        self.data = Some(data);
        Ok(())
    }

    /// Get the host region (scaffold merged with fitted geometry).
    ///
    /// `None` before [`load`](Self::load).
    #[must_use]
    pub fn host_region(&self) -> Option<&Region> {
        self.host.as_ref()
    }

    /// Get the data region.
    ///
    /// `None` before [`load`](Self::load).
    #[must_use]
    pub fn data_region(&self) -> Option<&Region> {
        self.data.as_ref()
    }

    /// Get the generated output region.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::NotGenerated`] before
    /// [`generate_output`](Self::generate_output) has run.
    pub fn output_region(&self) -> EmbedResult<&Region> {
        self.output.as_ref().ok_or(EmbedError::NotGenerated)
    }

    /// Name of the resolved data coordinates field.
    #[must_use]
    pub fn data_coordinates_field_name(&self) -> Option<&str> {
        self.data_coordinates_field.as_deref()
    }

    /// Set the data coordinates field by name.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::FieldNotFound`] if the documents are loaded and
    /// no coordinate field of that name exists on the data region.
    pub fn set_data_coordinates_field(&mut self, name: &str) -> EmbedResult<()> {
        if let Some(data) = &self.data {
            let exists = data
                .node_field(name)
                .is_some_and(scaffold_types::NodeField::is_coordinate)
                || data
                    .point_field(name)
                    .is_some_and(scaffold_types::NodeField::is_coordinate);
            if !exists {
                return Err(EmbedError::FieldNotFound {
                    name: name.to_string(),
                });
            }
        }
        self.data_coordinates_field = Some(name.to_string());
        self.output = None;
        Ok(())
    }

    /// Name of the resolved fitted coordinates field.
    #[must_use]
    pub fn fitted_coordinates_field_name(&self) -> Option<&str> {
        self.fitted_coordinates_field.as_deref()
    }

    /// Set the fitted coordinates field by name.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::FieldNotFound`] if the documents are loaded and
    /// no coordinate field of that name exists on the host region.
    pub fn set_fitted_coordinates_field(&mut self, name: &str) -> EmbedResult<()> {
        self.set_host_field(name)?;
        self.fitted_coordinates_field = Some(name.to_string());
        self.output = None;
        Ok(())
    }

    /// Name of the resolved material coordinates field.
    #[must_use]
    pub fn material_coordinates_field_name(&self) -> Option<&str> {
        self.material_coordinates_field.as_deref()
    }

    /// Set the material coordinates field by name.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::FieldNotFound`] if the documents are loaded and
    /// no coordinate field of that name exists on the host region.
    pub fn set_material_coordinates_field(&mut self, name: &str) -> EmbedResult<()> {
        self.set_host_field(name)?;
        self.material_coordinates_field = Some(name.to_string());
        self.output = None;
        Ok(())
    }

    fn set_host_field(&self, name: &str) -> EmbedResult<()> {
        if let Some(host) = &self.host {
            if !host
                .node_field(name)
                .is_some_and(scaffold_types::NodeField::is_coordinate)
            {
                return Err(EmbedError::FieldNotFound {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Name of the marker group, once discovered or set.
    #[must_use]
    pub fn marker_group_name(&self) -> Option<&str> {
        self.marker_group_name.as_deref()
    }

    /// Set or clear the marker group by name.
    ///
    /// When the documents are loaded the marker's coordinate and name fields
    /// are re-discovered immediately; the group catalog is rebuilt on the
    /// next [`load`](Self::load).
    pub fn set_data_marker_group(&mut self, name: Option<&str>) {
        self.marker_group_name = name.map(str::to_string);
        if let Some(data) = &self.data {
            self.marker = discover_marker_group(
                data,
                self.marker_group_name.as_deref(),
                self.data_coordinates_field.as_deref(),
            );
            if let Some(marker) = &self.marker {
                self.marker_group_name = Some(marker.group_name.clone());
            }
        }
    }

    /// Get the diagnostic level.
    #[must_use]
    pub const fn diagnostic_level(&self) -> u32 {
        self.diagnostic_level
    }

    /// Set the diagnostic level: 0 = warnings only, 1+ = informational
    /// messages too.
    pub fn set_diagnostic_level(&mut self, level: u32) {
        self.diagnostic_level = level;
    }

    /// Names of all cataloged groups, marker-derived entries first.
    #[must_use]
    pub fn group_names(&self) -> Vec<String> {
        self.catalog.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Whether a group of the given name exists in the catalog.
    #[must_use]
    pub fn group_exists(&self, name: &str) -> bool {
        self.catalog.iter().any(|(n, _)| n == name)
    }

    /// Whether the group's data will be embedded.
    ///
    /// Unknown names log a warning and report `false`.
    #[must_use]
    pub fn group_is_embed(&self, name: &str) -> bool {
        match self.catalog.iter().find(|(n, _)| n == name) {
            Some((_, info)) => info.embed,
            None => {
                warn!(group = name, "no group of that name");
                false
            }
        }
    }

    /// Get a group's catalog entry.
    #[must_use]
    pub fn group_info(&self, name: &str) -> Option<GroupInfo> {
        self.catalog
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, info)| *info)
    }

    /// Select or deselect a group for embedding.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::GroupNotFound`] for unknown names.
    pub fn group_set_embed(&mut self, name: &str, embed: bool) -> EmbedResult<()> {
        match self.catalog.iter_mut().find(|(n, _)| n == name) {
            Some((_, info)) => {
                if info.embed != embed {
                    info.embed = embed;
                    self.output = None;
                }
                Ok(())
            }
            None => Err(EmbedError::GroupNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Generate embedded output for the groups with their embed flag set.
    ///
    /// The result is also available afterwards via
    /// [`output_region`](Self::output_region). Generation is deterministic:
    /// unchanged inputs produce identical material coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::NotLoaded`] before [`load`](Self::load), a
    /// missing-coordinates error if discovery resolved no field for a region
    /// the output needs, and field errors from the location search.
    pub fn generate_output(&mut self) -> EmbedResult<&Region> {
        let host = self.host.as_ref().ok_or(EmbedError::NotLoaded)?;
        let data = self.data.as_ref().ok_or(EmbedError::NotLoaded)?;
        let fitted = self
            .fitted_coordinates_field
            .as_deref()
            .ok_or(EmbedError::MissingCoordinatesField {
                region: "fitted geometry",
            })?;
        let material = self
            .material_coordinates_field
            .as_deref()
            .ok_or(EmbedError::MissingCoordinatesField { region: "scaffold" })?;
        let data_field = self
            .data_coordinates_field
            .as_deref()
            .ok_or(EmbedError::MissingCoordinatesField { region: "data" })?;

        let output = generate_output(
            host,
            fitted,
            material,
            data,
            data_field,
            &self.catalog,
            self.marker.as_ref(),
        )?;
        Ok(&*self.output.insert(output))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bare_embedder() -> DataEmbedder {
        DataEmbedder::new("scaffold.json", "fitted.json", "data.json")
    }

    #[test]
    fn settings_roundtrip_through_embedder() {
        let mut embedder = bare_embedder();
        embedder
            .decode_settings(
                r#"{
                    "dataCoordinatesField": "coordinates",
                    "fittedCoordinatesField": "fitted coordinates",
                    "materialCoordinatesField": "body coordinates",
                    "dataMarkerGroup": "marker",
                    "diagnosticLevel": 1,
                    "groupData": {
                        "cube": { "embed": false, "dimension": 3, "size": 1 }
                    }
                }"#,
            )
            .unwrap();

        assert_eq!(embedder.diagnostic_level(), 1);
        assert_eq!(
            embedder.fitted_coordinates_field_name(),
            Some("fitted coordinates")
        );
        assert!(embedder.group_exists("cube"));
        assert!(!embedder.group_is_embed("cube"));

        let encoded = embedder.encode_settings().unwrap();
        let reparsed = EmbedderSettings::from_json(&encoded).unwrap();
        assert_eq!(
            reparsed.material_coordinates_field.as_deref(),
            Some("body coordinates")
        );
        assert!(reparsed.group_data.contains_key("cube"));
    }

    #[test]
    fn unknown_group_queries() {
        let mut embedder = bare_embedder();
        assert!(!embedder.group_exists("limb"));
        assert!(!embedder.group_is_embed("limb"));
        let err = embedder.group_set_embed("limb", true).unwrap_err();
        assert!(matches!(err, EmbedError::GroupNotFound { .. }));
    }

    #[test]
    fn output_requires_generation() {
        let embedder = bare_embedder();
        assert!(matches!(
            embedder.output_region(),
            Err(EmbedError::NotGenerated)
        ));
    }

    #[test]
    fn generate_requires_load() {
        let mut embedder = bare_embedder();
        assert!(matches!(
            embedder.generate_output(),
            Err(EmbedError::NotLoaded)
        ));
    }

    #[test]
    fn setters_unvalidated_before_load() {
        let mut embedder = bare_embedder();
        embedder.set_data_coordinates_field("coordinates").unwrap();
        embedder
            .set_material_coordinates_field("body coordinates")
            .unwrap();
        assert_eq!(
            embedder.material_coordinates_field_name(),
            Some("body coordinates")
        );
        embedder.set_data_marker_group(Some("fiducials"));
        assert_eq!(embedder.marker_group_name(), Some("fiducials"));
        embedder.set_data_marker_group(None);
        assert_eq!(embedder.marker_group_name(), None);
    }
}
