//! A region: one loaded model document.

use crate::{FeMesh, Group, ModelError, ModelResult, NodeField, StringField};

/// One loaded model document: a mesh, its fields, data points, and groups.
///
/// A region holds two separate pools of field values:
///
/// - **node fields**, one value per mesh node, interpolated within elements;
/// - **point fields**, one value per data point. Data points model
///   dimension-0 data (digitized points, fiducial markers) that belongs to no
///   element. They may additionally carry [`StringField`] labels.
///
/// Groups reference elements, nodes, and data points by index.
///
/// # Example
///
/// ```
/// use scaffold_types::{FeMesh, NodeField, Region};
///
/// let mut region = Region::new(FeMesh::new(2));
/// let mut coordinates = NodeField::new("coordinates", 3, true).unwrap();
/// coordinates.push_value([0.0, 0.0, 0.0]);
/// coordinates.push_value([1.0, 0.0, 0.0]);
/// region.add_node_field(coordinates).unwrap();
///
/// assert!(region.node_field("coordinates").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Region {
    mesh: FeMesh,
    node_fields: Vec<NodeField>,
    point_count: usize,
    point_fields: Vec<NodeField>,
    string_fields: Vec<StringField>,
    groups: Vec<Group>,
}

impl Region {
    /// Create a region over a mesh, with no fields, points, or groups.
    #[must_use]
    pub const fn new(mesh: FeMesh) -> Self {
        Self {
            mesh,
            node_fields: Vec::new(),
            point_count: 0,
            point_fields: Vec::new(),
            string_fields: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Get the region's mesh.
    #[inline]
    #[must_use]
    pub const fn mesh(&self) -> &FeMesh {
        &self.mesh
    }

    /// Get the number of data points.
    #[inline]
    #[must_use]
    pub const fn point_count(&self) -> usize {
        self.point_count
    }

    /// Set the number of data points.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FieldLength`] if an existing point field's value
    /// count disagrees with the new pool size.
    pub fn set_point_count(&mut self, count: usize) -> ModelResult<()> {
        for field in &self.point_fields {
            field.validate_len(count)?;
        }
        self.point_count = count;
        Ok(())
    }

    /// Add a node field.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateField`] if a node field with the same
    /// name exists, or [`ModelError::FieldLength`] if the value count does
    /// not match the mesh's node pool.
    pub fn add_node_field(&mut self, field: NodeField) -> ModelResult<()> {
        if self.node_field(field.name()).is_some() {
            return Err(ModelError::DuplicateField {
                name: field.name().to_string(),
            });
        }
        field.validate_len(self.mesh.node_count())?;
        self.node_fields.push(field);
        Ok(())
    }

    /// Get a node field by name.
    #[must_use]
    pub fn node_field(&self, name: &str) -> Option<&NodeField> {
        self.node_fields.iter().find(|f| f.name() == name)
    }

    /// Get a mutable node field by name.
    #[must_use]
    pub fn node_field_mut(&mut self, name: &str) -> Option<&mut NodeField> {
        self.node_fields.iter_mut().find(|f| f.name() == name)
    }

    /// Iterate over node fields in definition order.
    pub fn node_fields(&self) -> impl Iterator<Item = &NodeField> {
        self.node_fields.iter()
    }

    /// Rename a node field.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FieldNotFound`] if no field has the old name, or
    /// [`ModelError::DuplicateField`] if the new name is taken.
    pub fn rename_node_field(&mut self, old_name: &str, new_name: &str) -> ModelResult<()> {
        if old_name == new_name {
            return Ok(());
        }
        if self.node_field(new_name).is_some() {
            return Err(ModelError::DuplicateField {
                name: new_name.to_string(),
            });
        }
        match self.node_field_mut(old_name) {
            Some(field) => {
                field.set_name(new_name);
                Ok(())
            }
            None => Err(ModelError::FieldNotFound {
                name: old_name.to_string(),
            }),
        }
    }

    /// Add a point field.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateField`] if a point field with the same
    /// name exists, or [`ModelError::FieldLength`] if the value count does
    /// not match the data point pool.
    pub fn add_point_field(&mut self, field: NodeField) -> ModelResult<()> {
        if self.point_field(field.name()).is_some() {
            return Err(ModelError::DuplicateField {
                name: field.name().to_string(),
            });
        }
        field.validate_len(self.point_count)?;
        self.point_fields.push(field);
        Ok(())
    }

    /// Get a point field by name.
    #[must_use]
    pub fn point_field(&self, name: &str) -> Option<&NodeField> {
        self.point_fields.iter().find(|f| f.name() == name)
    }

    /// Iterate over point fields in definition order.
    pub fn point_fields(&self) -> impl Iterator<Item = &NodeField> {
        self.point_fields.iter()
    }

    /// Add a string field over the data points.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateField`] if a string field with the same
    /// name exists, or [`ModelError::FieldLength`] if the value count does
    /// not match the data point pool.
    pub fn add_string_field(&mut self, field: StringField) -> ModelResult<()> {
        if self.string_field(field.name()).is_some() {
            return Err(ModelError::DuplicateField {
                name: field.name().to_string(),
            });
        }
        if field.len() != self.point_count {
            return Err(ModelError::FieldLength {
                name: field.name().to_string(),
                expected: self.point_count,
                actual: field.len(),
            });
        }
        self.string_fields.push(field);
        Ok(())
    }

    /// Get a string field by name.
    #[must_use]
    pub fn string_field(&self, name: &str) -> Option<&StringField> {
        self.string_fields.iter().find(|f| f.name() == name)
    }

    /// Iterate over string fields in definition order.
    pub fn string_fields(&self) -> impl Iterator<Item = &StringField> {
        self.string_fields.iter()
    }

    /// Add a group.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateGroup`] if a group with the same name
    /// exists.
    pub fn add_group(&mut self, group: Group) -> ModelResult<()> {
        if self.group(group.name()).is_some() {
            return Err(ModelError::DuplicateGroup {
                name: group.name().to_string(),
            });
        }
        self.groups.push(group);
        Ok(())
    }

    /// Get a group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// Get a mutable group by name.
    #[must_use]
    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.name() == name)
    }

    /// Check whether a group of the given name exists.
    #[must_use]
    pub fn has_group(&self, name: &str) -> bool {
        self.group(name).is_some()
    }

    /// Iterate over groups in definition order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Merge another region defined over the same topology into this one.
    ///
    /// Fields, string fields, and groups absent from this region (by name)
    /// are adopted from `other`; entries already present are kept unchanged.
    /// If this region's mesh is empty, `other`'s mesh and point pool are
    /// adopted wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::TopologyMismatch`] if both regions have
    /// non-trivial meshes or point pools that disagree.
    pub fn merge(&mut self, other: Self) -> ModelResult<()> {
        if self.mesh.node_count() == 0 && self.mesh.is_empty() {
            self.mesh = other.mesh;
        } else if other.mesh.node_count() != 0 || !other.mesh.is_empty() {
            if other.mesh.node_count() != self.mesh.node_count() {
                return Err(ModelError::TopologyMismatch {
                    reason: format!(
                        "node counts differ ({} vs {})",
                        self.mesh.node_count(),
                        other.mesh.node_count()
                    ),
                });
            }
            if other.mesh != self.mesh {
                return Err(ModelError::TopologyMismatch {
                    reason: "element lists differ".to_string(),
                });
            }
        }

        if self.point_count == 0 {
            self.point_count = other.point_count;
        } else if other.point_count != 0 && other.point_count != self.point_count {
            return Err(ModelError::TopologyMismatch {
                reason: format!(
                    "data point counts differ ({} vs {})",
                    self.point_count, other.point_count
                ),
            });
        }

        for field in other.node_fields {
            if self.node_field(field.name()).is_none() {
                self.add_node_field(field)?;
            }
        }
        for field in other.point_fields {
            if self.point_field(field.name()).is_none() {
                self.add_point_field(field)?;
            }
        }
        for field in other.string_fields {
            if self.string_field(field.name()).is_none() {
                self.add_string_field(field)?;
            }
        }
        for group in other.groups {
            if self.group(group.name()).is_none() {
                self.groups.push(group);
            }
        }
        Ok(())
    }
}
