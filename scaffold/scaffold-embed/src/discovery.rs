//! Coordinate field and marker group discovery.
//!
//! Field names in settings are suggestions: discovery resolves them against
//! the loaded documents, falling back to the first coordinate field and
//! renaming host fields to carry the expected prefix.

use scaffold_types::Region;
use tracing::warn;

/// Find a coordinate field on a region's node pool.
///
/// Candidates are fields flagged as coordinates, in definition order. With no
/// requested name the first candidate wins. With a name prefix (used for the
/// fitted state), a candidate lacking the prefix matches `"<prefix> <name>"`
/// and, once selected, is renamed to carry the prefix so merged documents
/// cannot collide on plain `"coordinates"`.
///
/// A requested name that matches nothing falls back to the first candidate
/// with a warning. Returns the resolved field name.
pub(crate) fn find_coordinates_field(
    region: &mut Region,
    requested: Option<&str>,
    prefix: Option<&str>,
) -> Option<String> {
    let mut fallback: Option<String> = None;
    let mut selected: Option<String> = None;

    for field in region.node_fields() {
        if !field.is_coordinate() {
            continue;
        }
        let Some(wanted) = requested else {
            selected = Some(field.name().to_string());
            break;
        };
        let effective = match prefix {
            Some(p) if !field.name().starts_with(p) => format!("{p} {}", field.name()),
            _ => field.name().to_string(),
        };
        if effective == wanted {
            selected = Some(field.name().to_string());
            break;
        }
        if fallback.is_none() {
            fallback = Some(field.name().to_string());
        }
    }

    let name = selected.or(fallback)?;
    let resolved = match prefix {
        Some(p) if !name.starts_with(p) => {
            let prefixed = format!("{p} {name}");
            if region.rename_node_field(&name, &prefixed).is_ok() {
                prefixed
            } else {
                name
            }
        }
        _ => name,
    };

    if let Some(wanted) = requested {
        if resolved != wanted {
            warn!(
                requested = wanted,
                resolved = resolved.as_str(),
                "coordinates field not found, using fallback"
            );
        }
    }
    Some(resolved)
}

/// Find a coordinate field on the data region.
///
/// Data coordinates may live on mesh nodes (sub-models), on data points
/// (digitized points and markers), or both under the same name; the node
/// pool is searched first, then the point pool.
pub(crate) fn find_data_coordinates_field(
    region: &Region,
    requested: Option<&str>,
) -> Option<String> {
    let mut fallback: Option<String> = None;
    for field in region.node_fields().chain(region.point_fields()) {
        if !field.is_coordinate() {
            continue;
        }
        let Some(wanted) = requested else {
            return Some(field.name().to_string());
        };
        if field.name() == wanted {
            return Some(field.name().to_string());
        }
        if fallback.is_none() {
            fallback = Some(field.name().to_string());
        }
    }
    if let (Some(wanted), Some(found)) = (requested, fallback.as_deref()) {
        warn!(
            requested = wanted,
            resolved = found,
            "data coordinates field not found, using fallback"
        );
    }
    fallback
}

/// Guess the material coordinates field name.
///
/// By convention a scaffold's material field is named after its largest
/// annotated group: `"<group name> coordinates"`. The largest group is the
/// one with the most elements in the host mesh's highest dimension. Returns
/// the name only if such a field actually exists.
pub(crate) fn guess_material_field_name(region: &Region) -> Option<String> {
    let mesh = region.mesh();
    let dimension = mesh.max_dimension()?;

    let mut largest: Option<(&str, usize)> = None;
    for group in region.groups() {
        let size = group.element_count_of_dimension(mesh, dimension);
        if size > 0 && largest.is_none_or(|(_, s)| size > s) {
            largest = Some((group.name(), size));
        }
    }

    let (group_name, _) = largest?;
    let field_name = format!("{group_name} coordinates");
    region
        .node_field(&field_name)
        .map(|field| field.name().to_string())
}

/// The marker group and the fields discovered from its data points.
#[derive(Debug, Clone)]
pub(crate) struct MarkerFields {
    /// Name of the marker group in the data region.
    pub group_name: String,
    /// Point field giving marker coordinates.
    pub coordinates_field: Option<String>,
    /// String field giving each marker point's annotation name.
    pub name_field: Option<String>,
}

/// Discover the marker group and its coordinate and name fields.
///
/// The group is looked up by the requested name (default `"marker"`). Its
/// coordinates default to the data coordinates field when that is defined on
/// data points, else the first point field; the name field is the first
/// string field with a value at the group's first point.
pub(crate) fn discover_marker_group(
    data: &Region,
    requested: Option<&str>,
    data_coordinates: Option<&str>,
) -> Option<MarkerFields> {
    let group_name = requested.unwrap_or("marker");
    let group = data.group(group_name)?;

    let mut coordinates_field = None;
    let mut name_field = None;
    if let Some(&first) = group.sorted_points().first() {
        if let Some(wanted) = data_coordinates {
            if data.point_field(wanted).is_some() {
                coordinates_field = Some(wanted.to_string());
            }
        }
        if coordinates_field.is_none() {
            coordinates_field = data.point_fields().next().map(|f| f.name().to_string());
        }
        name_field = data
            .string_fields()
            .find(|f| f.value(first as usize).is_some())
            .map(|f| f.name().to_string());
    }

    if coordinates_field.is_none() || name_field.is_none() {
        warn!(
            group = group_name,
            "marker group is empty or has no coordinates or name field"
        );
    }
    Some(MarkerFields {
        group_name: group_name.to_string(),
        coordinates_field,
        name_field,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scaffold_types::{Element, ElementShape, FeMesh, Group, NodeField, StringField};

    fn host_region() -> Region {
        let mut mesh = FeMesh::new(8);
        mesh.add_element(Element::new(
            ElementShape::Hexahedron,
            vec![0, 1, 2, 3, 4, 5, 6, 7],
        ))
        .unwrap();
        let mut region = Region::new(mesh);
        let values: Vec<[f64; 3]> = (0..8).map(|i| [f64::from(i), 0.0, 0.0]).collect();
        region
            .add_node_field(
                NodeField::from_values("coordinates", 3, true, values.clone()).unwrap(),
            )
            .unwrap();
        region
            .add_node_field(NodeField::from_values("body coordinates", 3, true, values).unwrap())
            .unwrap();
        let mut body = Group::new("body");
        body.add_element(0);
        region.add_group(body).unwrap();
        region
    }

    #[test]
    fn first_candidate_without_request() {
        let mut region = host_region();
        let name = find_coordinates_field(&mut region, None, None).unwrap();
        assert_eq!(name, "coordinates");
    }

    #[test]
    fn prefix_matches_and_renames() {
        let mut region = host_region();
        let name =
            find_coordinates_field(&mut region, Some("fitted coordinates"), Some("fitted"))
                .unwrap();
        assert_eq!(name, "fitted coordinates");
        assert!(region.node_field("fitted coordinates").is_some());
        assert!(region.node_field("coordinates").is_none());
    }

    #[test]
    fn prefix_applied_without_request() {
        let mut region = host_region();
        let name = find_coordinates_field(&mut region, None, Some("fitted")).unwrap();
        assert_eq!(name, "fitted coordinates");
    }

    #[test]
    fn missing_request_falls_back() {
        let mut region = host_region();
        let name = find_coordinates_field(&mut region, Some("absent"), None).unwrap();
        assert_eq!(name, "coordinates");
    }

    #[test]
    fn exact_request_found() {
        let mut region = host_region();
        let name = find_coordinates_field(&mut region, Some("body coordinates"), None).unwrap();
        assert_eq!(name, "body coordinates");
    }

    #[test]
    fn no_candidates() {
        let mut region = Region::new(FeMesh::new(0));
        assert!(find_coordinates_field(&mut region, None, None).is_none());
    }

    #[test]
    fn guess_material_from_largest_group() {
        let region = host_region();
        assert_eq!(
            guess_material_field_name(&region).as_deref(),
            Some("body coordinates")
        );
    }

    #[test]
    fn guess_requires_field_to_exist() {
        let mut region = host_region();
        // rename the convention field away; the guess must fail
        region
            .rename_node_field("body coordinates", "other coordinates")
            .unwrap();
        assert!(guess_material_field_name(&region).is_none());
    }

    fn marker_data() -> Region {
        let mut region = Region::new(FeMesh::new(0));
        region.set_point_count(2).unwrap();
        region
            .add_point_field(
                NodeField::from_values(
                    "coordinates",
                    3,
                    true,
                    vec![[0.0; 3], [1.0, 0.0, 0.0]],
                )
                .unwrap(),
            )
            .unwrap();
        region
            .add_string_field(StringField::from_values(
                "marker name",
                vec![Some("apex".to_string()), Some("base".to_string())],
            ))
            .unwrap();
        let mut marker = Group::new("marker");
        marker.add_points([0, 1]);
        region.add_group(marker).unwrap();
        region
    }

    #[test]
    fn marker_discovery() {
        let data = marker_data();
        let marker = discover_marker_group(&data, None, Some("coordinates")).unwrap();
        assert_eq!(marker.group_name, "marker");
        assert_eq!(marker.coordinates_field.as_deref(), Some("coordinates"));
        assert_eq!(marker.name_field.as_deref(), Some("marker name"));
    }

    #[test]
    fn marker_group_absent() {
        let data = marker_data();
        assert!(discover_marker_group(&data, Some("fiducials"), None).is_none());
    }

    #[test]
    fn data_coordinates_found_on_points() {
        let data = marker_data();
        let name = find_data_coordinates_field(&data, None).unwrap();
        assert_eq!(name, "coordinates");
    }
}
