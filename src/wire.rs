//! JSON wire format for annotation lists.
//!
//! Loading is lenient: the payload must be a JSON array, but individual entries that
//! fail to parse or describe an impossible shape are dropped with a warning instead of
//! failing the whole load.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::model::{Annotation, AnnotationSet, Shape};

/// Errors that can occur while reading or writing the wire format.
#[derive(Error, Debug)]
pub enum WireError {
    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed but is not an annotation list
    #[error("Expected a list of annotations, found {found}")]
    NotAList {
        /// JSON type that was found instead
        found: &'static str,
    },
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse an annotation list from JSON text.
pub fn parse_annotation_set(json: &str) -> Result<AnnotationSet, WireError> {
    let value: Value = serde_json::from_str(json)?;
    annotation_set_from_value(value)
}

/// Build an annotation set from an already parsed JSON value.
pub fn annotation_set_from_value(value: Value) -> Result<AnnotationSet, WireError> {
    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(WireError::NotAList {
                found: json_type_name(&other),
            });
        }
    };

    let total = entries.len();
    let mut seen = HashSet::new();
    let mut annotations = Vec::with_capacity(total);

    for (index, entry) in entries.into_iter().enumerate() {
        let mut annotation: Annotation = match serde_json::from_value(entry) {
            Ok(a) => a,
            Err(e) => {
                log::warn!("Dropping malformed annotation at index {}: {}", index, e);
                continue;
            }
        };

        if let Shape::Box(b) = &mut annotation.shape {
            *b = b.normalized();
        }
        if !annotation.shape.is_valid() {
            log::warn!(
                "Dropping invalid {} annotation at index {}",
                annotation.shape.kind_name(),
                index
            );
            continue;
        }
        if let Some(id) = &annotation.id {
            if !seen.insert(id.clone()) {
                log::warn!("Dropping annotation at index {} with duplicate id {}", index, id);
                continue;
            }
        }

        annotations.push(annotation);
    }

    if annotations.len() < total {
        log::warn!("Loaded {} of {} annotations", annotations.len(), total);
    } else {
        log::debug!("Loaded {} annotations", total);
    }

    Ok(AnnotationSet::from(annotations))
}

/// Serialize an annotation set to compact JSON.
pub fn to_json(set: &AnnotationSet) -> Result<String, WireError> {
    Ok(serde_json::to_string(set)?)
}

/// Serialize an annotation set to indented JSON.
pub fn to_json_pretty(set: &AnnotationSet) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(set)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationId, BoxShape, Point};

    #[test]
    fn test_parse_mixed_list() {
        let json = r#"[
            {"type": "box", "x": 10, "y": 10, "w": 50, "h": 50, "id": "a", "label": "cat"},
            {"type": "polygon", "points": [[0, 0], [10, 0], [10, 10]], "id": 2}
        ]"#;
        let set = parse_annotation_set(json).expect("valid list");
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(&AnnotationId::new("a")).map(|a| &a.shape),
            Some(&Shape::Box(BoxShape::new(10.0, 10.0, 50.0, 50.0)))
        );
        assert!(set.contains_id(&AnnotationId::new("2")));
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let json = r#"[
            {"type": "box", "x": 0, "y": 0, "w": 20, "h": 20},
            {"type": "circle", "r": 5},
            {"type": "box", "x": "left"},
            {"type": "polygon", "points": [[0, 0], [1, 1]]},
            42,
            {"type": "polygon", "points": [[0, 0], [10, 0], [10, 10]]}
        ]"#;
        let set = parse_annotation_set(json).expect("list payload");
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].shape.kind_name(), "box");
        assert_eq!(set.as_slice()[1].shape.kind_name(), "polygon");
    }

    #[test]
    fn test_negative_box_is_normalized() {
        let json = r#"[{"type": "box", "x": 60, "y": 60, "w": -50, "h": -50}]"#;
        let set = parse_annotation_set(json).expect("list payload");
        assert_eq!(
            set.as_slice()[0].shape,
            Shape::Box(BoxShape::new(10.0, 10.0, 50.0, 50.0))
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let json = r#"[
            {"type": "box", "x": 0, "y": 0, "w": 20, "h": 20, "id": "x", "label": "first"},
            {"type": "box", "x": 5, "y": 5, "w": 20, "h": 20, "id": "x", "label": "second"}
        ]"#;
        let set = parse_annotation_set(json).expect("list payload");
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].label.as_deref(), Some("first"));
    }

    #[test]
    fn test_non_list_payload_is_error() {
        assert!(matches!(
            parse_annotation_set(r#"{"annotations": []}"#),
            Err(WireError::NotAList { found: "object" })
        ));
        assert!(matches!(parse_annotation_set("[1,"), Err(WireError::Json(_))));
        assert!(parse_annotation_set("[]").expect("empty list").is_empty());
    }

    #[test]
    fn test_serialized_list_reloads() {
        let set = AnnotationSet::from(vec![
            Annotation::new(Shape::Polygon {
                points: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0), Point::new(5.0, 0.0)],
            })
            .with_id(AnnotationId::new("p")),
        ]);
        let json = to_json(&set).expect("serialize");
        assert!(json.contains(r#""type":"polygon""#));
        assert!(json.contains("[[1.0,2.0],[3.0,4.0],[5.0,0.0]]"));
        assert_eq!(parse_annotation_set(&json).expect("reload"), set);
    }

    #[test]
    fn test_unlabeled_entry_writes_empty_label() {
        let set = AnnotationSet::from(vec![
            Annotation::new(Shape::Box(BoxShape::new(0.0, 0.0, 20.0, 20.0)))
                .with_id(AnnotationId::new("b")),
        ]);
        let value: Value = serde_json::from_str(&to_json(&set).expect("serialize")).expect("json");
        assert_eq!(value[0]["label"], "");

        let reloaded = parse_annotation_set(&to_json(&set).expect("serialize")).expect("reload");
        assert_eq!(reloaded.as_slice()[0].label, None);
    }
}
