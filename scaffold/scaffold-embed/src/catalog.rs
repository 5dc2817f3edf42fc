//! Annotated group catalog.
//!
//! The catalog lists every annotated group in the data region with its
//! default embed selection. Groups whose names also appear in the host
//! region are fitting contours or fiducial markers and default to excluded,
//! as does the marker group itself and anything empty.

use scaffold_types::Region;

use crate::discovery::MarkerFields;
use crate::settings::GroupInfo;

/// Build the group catalog for loaded host and data regions.
///
/// Marker points are clustered by their annotation name into dimension-0
/// entries; regular data groups follow, overriding a cluster of the same
/// name. Embed selections from `previous` are carried over for groups that
/// still exist.
pub(crate) fn build_group_catalog(
    host: &Region,
    data: &Region,
    marker: Option<&MarkerFields>,
    previous: &[(String, GroupInfo)],
) -> Vec<(String, GroupInfo)> {
    let max_dimension = data.mesh().max_dimension().unwrap_or(0);

    let mut regular: Vec<(String, GroupInfo)> = Vec::new();
    for group in data.groups() {
        let name = group.name();
        let mut size = 0;
        let mut dimension = 0u8;
        for d in (1..=max_dimension).rev() {
            let count = group.element_count_of_dimension(data.mesh(), d);
            if count > 0 {
                size = count;
                dimension = d;
                break;
            }
        }
        if size == 0 {
            size = group.point_count();
            dimension = 0;
        }

        let in_host = host.has_group(name);
        let is_marker = marker.is_some_and(|m| m.group_name == name);
        let embed = !(in_host || size == 0 || is_marker);
        regular.push((
            name.to_string(),
            GroupInfo {
                embed,
                dimension,
                size,
            },
        ));
    }

    // marker clusters come first, in order of first appearance
    let mut catalog: Vec<(String, GroupInfo)> = Vec::new();
    if let Some(marker) = marker {
        if let (Some(group), Some(name_field)) = (
            data.group(&marker.group_name),
            marker
                .name_field
                .as_deref()
                .and_then(|name| data.string_field(name)),
        ) {
            for point in group.sorted_points() {
                let Some(marker_name) = name_field.value(point as usize) else {
                    continue;
                };
                if let Some((_, info)) = catalog.iter_mut().find(|(n, _)| n == marker_name) {
                    info.size += 1;
                } else {
                    let embed =
                        !(host.has_group(marker_name) || marker_name == marker.group_name);
                    catalog.push((
                        marker_name.to_string(),
                        GroupInfo {
                            embed,
                            dimension: 0,
                            size: 1,
                        },
                    ));
                }
            }
        }
    }

    for (name, info) in regular {
        if let Some((_, existing)) = catalog.iter_mut().find(|(n, _)| *n == name) {
            *existing = info;
        } else {
            catalog.push((name, info));
        }
    }

    for (name, info) in &mut catalog {
        if let Some((_, prior)) = previous.iter().find(|(n, _)| n.as_str() == name.as_str()) {
            info.embed = prior.embed;
        }
    }
    catalog
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scaffold_types::{Element, ElementShape, FeMesh, Group, NodeField, StringField};

    fn simple_host() -> Region {
        let mut region = Region::new(FeMesh::new(0));
        region.add_group(Group::new("bottom")).unwrap();
        region.add_group(Group::new("tip 2")).unwrap();
        region
    }

    fn simple_data() -> Region {
        let mut mesh = FeMesh::new(3);
        mesh.add_element(Element::new(ElementShape::Line, vec![0, 1]))
            .unwrap();
        mesh.add_element(Element::new(ElementShape::Line, vec![1, 2]))
            .unwrap();
        let mut region = Region::new(mesh);
        region
            .add_node_field(
                NodeField::from_values(
                    "coordinates",
                    3,
                    true,
                    vec![[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
                )
                .unwrap(),
            )
            .unwrap();
        region.set_point_count(3).unwrap();
        region
            .add_point_field(
                NodeField::from_values(
                    "coordinates",
                    3,
                    true,
                    vec![[0.0; 3], [0.5, 0.0, 0.0], [1.0, 0.0, 0.0]],
                )
                .unwrap(),
            )
            .unwrap();
        region
            .add_string_field(StringField::from_values(
                "marker name",
                vec![
                    Some("ICN".to_string()),
                    Some("ICN".to_string()),
                    Some("tip 2".to_string()),
                ],
            ))
            .unwrap();

        let mut line = Group::new("line");
        line.add_elements([0, 1]);
        line.add_nodes([0, 1, 2]);
        region.add_group(line).unwrap();

        let mut bottom = Group::new("bottom");
        bottom.add_element(0);
        region.add_group(bottom).unwrap();

        let mut marker = Group::new("marker");
        marker.add_points([0, 1, 2]);
        region.add_group(marker).unwrap();
        region
    }

    fn marker_fields() -> MarkerFields {
        MarkerFields {
            group_name: "marker".to_string(),
            coordinates_field: Some("coordinates".to_string()),
            name_field: Some("marker name".to_string()),
        }
    }

    #[test]
    fn clusters_come_first() {
        let catalog = build_group_catalog(
            &simple_host(),
            &simple_data(),
            Some(&marker_fields()),
            &[],
        );
        let names: Vec<&str> = catalog.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["ICN", "tip 2", "line", "bottom", "marker"]);
    }

    #[test]
    fn default_embed_selection() {
        let data = simple_data();
        let catalog =
            build_group_catalog(&simple_host(), &data, Some(&marker_fields()), &[]);
        let get = |name: &str| {
            catalog
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, info)| *info)
                .unwrap()
        };

        // real data group
        assert!(get("line").embed);
        assert_eq!(get("line").dimension, 1);
        assert_eq!(get("line").size, 2);

        // shares its name with a host group
        assert!(!get("bottom").embed);

        // the marker group itself
        assert!(!get("marker").embed);
        assert_eq!(get("marker").dimension, 0);
        assert_eq!(get("marker").size, 3);

        // marker cluster, not in host
        assert!(get("ICN").embed);
        assert_eq!(get("ICN").size, 2);
        assert_eq!(get("ICN").dimension, 0);

        // marker cluster shadowed by a host group
        assert!(!get("tip 2").embed);
    }

    #[test]
    fn previous_selection_carried() {
        let host = simple_host();
        let data = simple_data();
        let previous = vec![(
            "line".to_string(),
            GroupInfo {
                embed: false,
                dimension: 1,
                size: 2,
            },
        )];
        let catalog = build_group_catalog(&host, &data, Some(&marker_fields()), &previous);
        let line = catalog.iter().find(|(n, _)| n == "line").unwrap();
        assert!(!line.1.embed);
    }

    #[test]
    fn no_marker_group() {
        let catalog = build_group_catalog(&simple_host(), &simple_data(), None, &[]);
        let names: Vec<&str> = catalog.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["line", "bottom", "marker"]);
        // without marker discovery the marker group is just point data
        let marker = catalog.iter().find(|(n, _)| n == "marker").unwrap();
        assert!(marker.1.embed);
    }
}
