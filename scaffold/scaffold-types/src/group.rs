//! Named groups of elements, nodes, and data points.

use hashbrown::HashSet;

use crate::FeMesh;

/// A named subset of a region's elements, nodes, and data points.
///
/// Groups carry the annotations of a model: an anatomical term, a fitting
/// contour, a fiducial marker set. Group membership drives which data is
/// embedded and which is excluded.
///
/// # Example
///
/// ```
/// use scaffold_types::Group;
///
/// let mut group = Group::new("cube");
/// group.add_nodes([0, 1, 2, 3]);
/// group.add_element(0);
///
/// assert_eq!(group.name(), "cube");
/// assert_eq!(group.node_count(), 4);
/// assert!(group.contains_element(0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Group {
    name: String,
    elements: HashSet<u32>,
    nodes: HashSet<u32>,
    points: HashSet<u32>,
}

impl Group {
    /// Create an empty group with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: HashSet::new(),
            nodes: HashSet::new(),
            points: HashSet::new(),
        }
    }

    /// Get the group name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an element to the group.
    pub fn add_element(&mut self, element_index: u32) {
        self.elements.insert(element_index);
    }

    /// Add multiple elements to the group.
    pub fn add_elements(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.elements.extend(indices);
    }

    /// Add a node to the group.
    pub fn add_node(&mut self, node_index: u32) {
        self.nodes.insert(node_index);
    }

    /// Add multiple nodes to the group.
    pub fn add_nodes(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.nodes.extend(indices);
    }

    /// Add a data point to the group.
    pub fn add_point(&mut self, point_index: u32) {
        self.points.insert(point_index);
    }

    /// Add multiple data points to the group.
    pub fn add_points(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.points.extend(indices);
    }

    /// Check if an element is in the group.
    #[must_use]
    pub fn contains_element(&self, element_index: u32) -> bool {
        self.elements.contains(&element_index)
    }

    /// Check if a node is in the group.
    #[must_use]
    pub fn contains_node(&self, node_index: u32) -> bool {
        self.nodes.contains(&node_index)
    }

    /// Check if a data point is in the group.
    #[must_use]
    pub fn contains_point(&self, point_index: u32) -> bool {
        self.points.contains(&point_index)
    }

    /// Get the number of elements in the group.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Get the number of nodes in the group.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of data points in the group.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Check if the group has no members at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.nodes.is_empty() && self.points.is_empty()
    }

    /// Get the element indices in ascending order.
    ///
    /// Sorted accessors keep downstream iteration deterministic.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self.elements.iter().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Get the node indices in ascending order.
    #[must_use]
    pub fn sorted_nodes(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self.nodes.iter().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Get the data point indices in ascending order.
    #[must_use]
    pub fn sorted_points(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self.points.iter().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Count the group's elements of a given dimension in a mesh.
    ///
    /// Elements missing from the mesh are ignored.
    #[must_use]
    pub fn element_count_of_dimension(&self, mesh: &FeMesh, dimension: u8) -> usize {
        self.elements
            .iter()
            .filter(|&&index| {
                mesh.element(index)
                    .is_some_and(|e| e.dimension() == dimension)
            })
            .count()
    }

    /// Get the highest dimension among the group's elements in a mesh.
    ///
    /// Returns `None` if the group has no elements present in the mesh.
    #[must_use]
    pub fn max_element_dimension(&self, mesh: &FeMesh) -> Option<u8> {
        self.elements
            .iter()
            .filter_map(|&index| mesh.element(index).map(crate::Element::dimension))
            .max()
    }

    /// Compute the union with another group.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            name: format!("{}+{}", self.name, other.name),
            elements: self.elements.union(&other.elements).copied().collect(),
            nodes: self.nodes.union(&other.nodes).copied().collect(),
            points: self.points.union(&other.points).copied().collect(),
        }
    }
}
