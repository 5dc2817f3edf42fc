//! Embedded output generation.
//!
//! For every catalog entry with its embed flag set, the generator locates
//! each of the group's points on the host's fitted coordinate field and
//! evaluates the host's material coordinate field there. The output region
//! holds a compacted copy of the embedded data (elements, nodes, data
//! points, labels, group membership) with the original data coordinates and
//! the computed material coordinates side by side.

use hashbrown::HashMap;
use scaffold_field::{evaluate_field, FieldError, HostLocator};
use scaffold_types::{Element, FeMesh, Group, NodeField, Point3, Region, StringField};
use tracing::{debug, info};

use crate::discovery::MarkerFields;
use crate::error::{EmbedError, EmbedResult};
use crate::settings::GroupInfo;

/// Output membership of one embedded group, in output indices.
struct OutputGroup {
    name: String,
    elements: Vec<u32>,
    nodes: Vec<u32>,
    points: Vec<u32>,
}

/// Map a data index to its output index, interning it on first use.
fn intern(map: &mut HashMap<u32, u32>, order: &mut Vec<u32>, index: u32) -> u32 {
    *map.entry(index).or_insert_with(|| {
        order.push(index);
        u32::try_from(order.len() - 1).unwrap_or(u32::MAX)
    })
}

pub(crate) fn generate_output(
    host: &Region,
    fitted_field_name: &str,
    material_field_name: &str,
    data: &Region,
    data_field_name: &str,
    catalog: &[(String, GroupInfo)],
    marker: Option<&MarkerFields>,
) -> EmbedResult<Region> {
    let fitted = host
        .node_field(fitted_field_name)
        .ok_or_else(|| EmbedError::FieldNotFound {
            name: fitted_field_name.to_string(),
        })?;
    let material = host
        .node_field(material_field_name)
        .ok_or_else(|| EmbedError::FieldNotFound {
            name: material_field_name.to_string(),
        })?;
    let locator = HostLocator::new(host.mesh(), fitted)?;

    // collect embedded elements, nodes, and points in catalog order
    let mut node_map: HashMap<u32, u32> = HashMap::new();
    let mut node_order: Vec<u32> = Vec::new();
    let mut point_map: HashMap<u32, u32> = HashMap::new();
    let mut point_order: Vec<u32> = Vec::new();
    let mut out_elements: Vec<Element> = Vec::new();
    let mut out_groups: Vec<OutputGroup> = Vec::new();

    let marker_names = marker.and_then(|m| {
        m.name_field
            .as_deref()
            .and_then(|name| data.string_field(name))
    });
    let marker_points = marker.and_then(|m| data.group(&m.group_name));

    for (name, _) in catalog.iter().filter(|(_, info)| info.embed) {
        let mut output_group = OutputGroup {
            name: name.clone(),
            elements: Vec::new(),
            nodes: Vec::new(),
            points: Vec::new(),
        };

        if let Some(group) = data.group(name) {
            for element_index in group.sorted_elements() {
                let Some(element) = data.mesh().element(element_index) else {
                    continue;
                };
                let nodes: Vec<u32> = element
                    .nodes
                    .iter()
                    .map(|&n| intern(&mut node_map, &mut node_order, n))
                    .collect();
                output_group.nodes.extend(nodes.iter().copied());
                output_group
                    .elements
                    .push(u32::try_from(out_elements.len()).unwrap_or(u32::MAX));
                out_elements.push(Element::new(element.shape, nodes));
            }
            for node in group.sorted_nodes() {
                output_group
                    .nodes
                    .push(intern(&mut node_map, &mut node_order, node));
            }
            for point in group.sorted_points() {
                output_group
                    .points
                    .push(intern(&mut point_map, &mut point_order, point));
            }
        } else if let (Some(names), Some(points)) = (marker_names, marker_points) {
            // a marker-derived entry: gather the marker points carrying this name
            for point in points.sorted_points() {
                if names.value(point as usize) == Some(name.as_str()) {
                    output_group
                        .points
                        .push(intern(&mut point_map, &mut point_order, point));
                }
            }
        }

        debug!(
            group = name.as_str(),
            elements = output_group.elements.len(),
            nodes = output_group.nodes.len(),
            points = output_group.points.len(),
            "group gathered for embedding"
        );
        out_groups.push(output_group);
    }

    // resolve the coordinate sources actually needed
    let node_coordinates = if node_order.is_empty() {
        None
    } else {
        Some(
            data.node_field(data_field_name)
                .ok_or(EmbedError::MissingCoordinatesField { region: "data" })?,
        )
    };
    let point_coordinates = if point_order.is_empty() {
        None
    } else {
        let field_name = if data.point_field(data_field_name).is_some() {
            data_field_name
        } else {
            marker
                .and_then(|m| m.coordinates_field.as_deref())
                .ok_or(EmbedError::MissingCoordinatesField { region: "data" })?
        };
        Some(
            data.point_field(field_name)
                .ok_or(EmbedError::MissingCoordinatesField { region: "data" })?,
        )
    };

    let mut max_distance = 0.0_f64;
    let mut embed_point = |position: Point3<f64>| -> EmbedResult<[f64; 3]> {
        let found = locator
            .find_nearest(&position)
            .ok_or(EmbedError::Field(FieldError::EmptyHostMesh))?;
        max_distance = max_distance.max(found.distance);
        Ok(evaluate_field(host.mesh(), material, &found.location)?)
    };

    // build the output mesh and its two coordinate fields
    let mut mesh = FeMesh::new(node_order.len());
    for element in out_elements {
        mesh.add_element(element)?;
    }
    let mut output = Region::new(mesh);

    if let Some(coordinates) = node_coordinates {
        let mut original =
            NodeField::new(data_field_name, coordinates.components(), true)?;
        let mut embedded = NodeField::new(material_field_name, material.components(), true)?;
        for &node in &node_order {
            let index = node as usize;
            original.push_value(coordinates.value(index).unwrap_or_default());
            let position = coordinates.point(index).unwrap_or_else(Point3::origin);
            embedded.push_value(embed_point(position)?);
        }
        output.add_node_field(original)?;
        output.add_node_field(embedded)?;
    }

    output.set_point_count(point_order.len())?;
    if let Some(coordinates) = point_coordinates {
        let mut original =
            NodeField::new(coordinates.name(), coordinates.components(), true)?;
        let mut embedded = NodeField::new(material_field_name, material.components(), true)?;
        for &point in &point_order {
            let index = point as usize;
            original.push_value(coordinates.value(index).unwrap_or_default());
            let position = coordinates.point(index).unwrap_or_else(Point3::origin);
            embedded.push_value(embed_point(position)?);
        }
        output.add_point_field(original)?;
        output.add_point_field(embedded)?;

        // carry marker labels for the embedded points
        if let Some(names) = marker_names {
            let values: Vec<Option<String>> = point_order
                .iter()
                .map(|&point| names.value(point as usize).map(str::to_string))
                .collect();
            if values.iter().any(Option::is_some) {
                output.add_string_field(StringField::from_values(names.name(), values))?;
            }
        }
    }

    for output_group in out_groups {
        let mut group = Group::new(&output_group.name);
        group.add_elements(output_group.elements);
        group.add_nodes(output_group.nodes);
        group.add_points(output_group.points);
        output.add_group(group)?;
    }

    info!(
        nodes = node_order.len(),
        points = point_order.len(),
        groups = output.groups().count(),
        max_distance,
        "embedded output generated"
    );
    Ok(output)
}
