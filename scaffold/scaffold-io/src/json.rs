//! JSON region documents.
//!
//! The wire schema is kept separate from the in-memory types so documents
//! stay stable as the model types evolve. A document is a single object:
//!
//! ```json
//! {
//!   "nodes": 2,
//!   "fields": [
//!     { "name": "coordinates", "components": 3, "coordinate": true,
//!       "values": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]] }
//!   ],
//!   "elements": [ { "shape": "line", "nodes": [0, 1] } ],
//!   "dataPoints": {
//!     "count": 1,
//!     "fields": [
//!       { "name": "coordinates", "components": 3, "coordinate": true,
//!         "values": [[0.5, 0.0, 0.0]] }
//!     ],
//!     "labels": [ { "name": "marker name", "values": ["apex"] } ]
//!   },
//!   "groups": [ { "name": "body", "elements": [0], "nodes": [0, 1] } ]
//! }
//! ```

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use scaffold_types::{
    Element, ElementShape, FeMesh, Group, NodeField, Region, StringField,
};

use crate::error::{IoError, IoResult};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionDoc {
    nodes: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    elements: Vec<ElementDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_points: Option<DataPointsDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    groups: Vec<GroupDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldDoc {
    name: String,
    components: usize,
    #[serde(default)]
    coordinate: bool,
    values: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementDoc {
    shape: String,
    nodes: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataPointsDoc {
    count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    labels: Vec<LabelsDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelsDoc {
    name: String,
    values: Vec<Option<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupDoc {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    elements: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    nodes: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    data_points: Vec<u32>,
}

/// Read a region document from a reader.
///
/// # Errors
///
/// Returns a JSON error on malformed input, or an
/// [`IoError::InvalidContent`]/model error when the document is structurally
/// inconsistent (bad shape tokens, index bounds, value lengths).
pub fn read_region(reader: impl Read) -> IoResult<Region> {
    let doc: RegionDoc = serde_json::from_reader(reader)?;
    doc_to_region(doc)
}

/// Write a region document to a writer as pretty-printed JSON.
///
/// # Errors
///
/// Returns a JSON or I/O error if writing fails.
pub fn write_region(region: &Region, mut writer: impl Write) -> IoResult<()> {
    let doc = region_to_doc(region);
    serde_json::to_writer_pretty(&mut writer, &doc)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn field_to_doc(field: &NodeField) -> FieldDoc {
    FieldDoc {
        name: field.name().to_string(),
        components: field.components(),
        coordinate: field.is_coordinate(),
        values: field
            .values()
            .iter()
            .map(|v| v[..field.components()].to_vec())
            .collect(),
    }
}

fn doc_to_field(doc: FieldDoc, expected: usize, owner: &str) -> IoResult<NodeField> {
    if doc.values.len() != expected {
        return Err(IoError::invalid_content(format!(
            "field '{}' has {} values, {} has {} entries",
            doc.name,
            doc.values.len(),
            owner,
            expected
        )));
    }
    let mut values = Vec::with_capacity(doc.values.len());
    for (index, row) in doc.values.iter().enumerate() {
        if row.len() != doc.components {
            return Err(IoError::invalid_content(format!(
                "field '{}' value {} has {} components, field declares {}",
                doc.name,
                index,
                row.len(),
                doc.components
            )));
        }
        let mut value = [0.0; 3];
        value[..row.len()].copy_from_slice(row);
        values.push(value);
    }
    Ok(NodeField::from_values(
        doc.name,
        doc.components,
        doc.coordinate,
        values,
    )?)
}

fn region_to_doc(region: &Region) -> RegionDoc {
    let data_points = if region.point_count() == 0
        && region.point_fields().next().is_none()
        && region.string_fields().next().is_none()
    {
        None
    } else {
        Some(DataPointsDoc {
            count: region.point_count(),
            fields: region.point_fields().map(field_to_doc).collect(),
            labels: region
                .string_fields()
                .map(|field| LabelsDoc {
                    name: field.name().to_string(),
                    values: field.values().to_vec(),
                })
                .collect(),
        })
    };

    RegionDoc {
        nodes: region.mesh().node_count(),
        fields: region.node_fields().map(field_to_doc).collect(),
        elements: region
            .mesh()
            .elements()
            .map(|element| ElementDoc {
                shape: element.shape.token().to_string(),
                nodes: element.nodes.clone(),
            })
            .collect(),
        data_points,
        groups: region
            .groups()
            .map(|group| GroupDoc {
                name: group.name().to_string(),
                elements: group.sorted_elements(),
                nodes: group.sorted_nodes(),
                data_points: group.sorted_points(),
            })
            .collect(),
    }
}

fn doc_to_region(doc: RegionDoc) -> IoResult<Region> {
    let mut mesh = FeMesh::new(doc.nodes);
    for element in doc.elements {
        let shape = ElementShape::from_token(&element.shape).ok_or_else(|| {
            IoError::invalid_content(format!("unknown element shape '{}'", element.shape))
        })?;
        mesh.add_element(Element::new(shape, element.nodes))?;
    }
    let element_count = mesh.element_count();

    let mut region = Region::new(mesh);
    for field in doc.fields {
        region.add_node_field(doc_to_field(field, doc.nodes, "node pool")?)?;
    }

    let mut point_count = 0;
    if let Some(data_points) = doc.data_points {
        point_count = data_points.count;
        region.set_point_count(point_count)?;
        for field in data_points.fields {
            region.add_point_field(doc_to_field(field, point_count, "data point pool")?)?;
        }
        for labels in data_points.labels {
            region.add_string_field(StringField::from_values(labels.name, labels.values))?;
        }
    }

    for group_doc in doc.groups {
        let mut group = Group::new(&group_doc.name);
        for &element in &group_doc.elements {
            if (element as usize) >= element_count {
                return Err(IoError::invalid_content(format!(
                    "group '{}' references element {element} of {element_count}",
                    group_doc.name
                )));
            }
            group.add_element(element);
        }
        for &node in &group_doc.nodes {
            if (node as usize) >= doc.nodes {
                return Err(IoError::invalid_content(format!(
                    "group '{}' references node {node} of {}",
                    group_doc.name, doc.nodes
                )));
            }
            group.add_node(node);
        }
        for &point in &group_doc.data_points {
            if (point as usize) >= point_count {
                return Err(IoError::invalid_content(format!(
                    "group '{}' references data point {point} of {point_count}",
                    group_doc.name
                )));
            }
            group.add_point(point);
        }
        region.add_group(group)?;
    }

    Ok(region)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_region() -> Region {
        let mut mesh = FeMesh::new(3);
        mesh.add_element(Element::new(ElementShape::Triangle, vec![0, 1, 2]))
            .unwrap();
        let mut region = Region::new(mesh);
        region
            .add_node_field(
                NodeField::from_values(
                    "coordinates",
                    3,
                    true,
                    vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                )
                .unwrap(),
            )
            .unwrap();
        region.set_point_count(2).unwrap();
        region
            .add_point_field(
                NodeField::from_values(
                    "coordinates",
                    3,
                    true,
                    vec![[0.25, 0.25, 0.0], [0.5, 0.25, 0.0]],
                )
                .unwrap(),
            )
            .unwrap();
        region
            .add_string_field(StringField::from_values(
                "marker name",
                vec![Some("apex".to_string()), None],
            ))
            .unwrap();
        let mut group = Group::new("face");
        group.add_element(0);
        group.add_nodes([0, 1, 2]);
        group.add_point(0);
        region.add_group(group).unwrap();
        region
    }

    #[test]
    fn roundtrip_preserves_structure() {
        let region = sample_region();
        let mut buffer = Vec::new();
        write_region(&region, &mut buffer).unwrap();
        let restored = read_region(buffer.as_slice()).unwrap();

        assert_eq!(restored.mesh().node_count(), 3);
        assert_eq!(restored.mesh().element_count(), 1);
        assert_eq!(restored.point_count(), 2);
        let field = restored.node_field("coordinates").unwrap();
        assert!(field.is_coordinate());
        assert_eq!(field.value(1), Some([1.0, 0.0, 0.0]));
        assert_eq!(
            restored.string_field("marker name").unwrap().value(0),
            Some("apex")
        );
        let group = restored.group("face").unwrap();
        assert!(group.contains_element(0));
        assert_eq!(group.node_count(), 3);
        assert!(group.contains_point(0));
    }

    #[test]
    fn short_component_fields_roundtrip() {
        let mut region = Region::new(FeMesh::new(1));
        region
            .add_node_field(
                NodeField::from_values("pressure", 1, false, vec![[7.0, 0.0, 0.0]]).unwrap(),
            )
            .unwrap();
        let mut buffer = Vec::new();
        write_region(&region, &mut buffer).unwrap();
        // the 1-component field serializes single-entry rows
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.contains("7.0"));
        let restored = read_region(buffer.as_slice()).unwrap();
        assert_eq!(
            restored.node_field("pressure").unwrap().value(0),
            Some([7.0, 0.0, 0.0])
        );
    }

    #[test]
    fn unknown_shape_rejected() {
        let text = r#"{ "nodes": 5, "elements": [ { "shape": "pyramid", "nodes": [0,1,2,3,4] } ] }"#;
        let err = read_region(text.as_bytes()).unwrap_err();
        assert!(matches!(err, IoError::InvalidContent { .. }));
    }

    #[test]
    fn wrong_value_count_rejected() {
        let text = r#"{
            "nodes": 2,
            "fields": [ { "name": "coordinates", "components": 3, "values": [[0.0, 0.0, 0.0]] } ]
        }"#;
        let err = read_region(text.as_bytes()).unwrap_err();
        assert!(matches!(err, IoError::InvalidContent { .. }));
    }

    #[test]
    fn wrong_component_count_rejected() {
        let text = r#"{
            "nodes": 1,
            "fields": [ { "name": "coordinates", "components": 3, "values": [[0.0, 0.0]] } ]
        }"#;
        let err = read_region(text.as_bytes()).unwrap_err();
        assert!(matches!(err, IoError::InvalidContent { .. }));
    }

    #[test]
    fn group_index_bounds_checked() {
        let text = r#"{
            "nodes": 2,
            "groups": [ { "name": "body", "nodes": [0, 5] } ]
        }"#;
        let err = read_region(text.as_bytes()).unwrap_err();
        assert!(matches!(err, IoError::InvalidContent { .. }));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = read_region("{ nodes:".as_bytes()).unwrap_err();
        assert!(matches!(err, IoError::Json(_)));
    }

    #[test]
    fn missing_sections_default() {
        let region = read_region(r#"{ "nodes": 4 }"#.as_bytes()).unwrap();
        assert_eq!(region.mesh().node_count(), 4);
        assert!(region.mesh().is_empty());
        assert_eq!(region.point_count(), 0);
    }
}
