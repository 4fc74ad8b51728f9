//! Export document generation.
//!
//! - JSON: the image record plus the wire-format annotation list.
//! - COCO: one image, one category per distinct label, boxes and polygons.
//! - YOLO: one normalized `class cx cy w h` line per box. Needs image dimensions.

use std::collections::HashMap;

use serde::Serialize;

use super::{BackendError, BackendResult, ExportFile, ExportFormat, ImageInfo};
use crate::constants::DEFAULT_EXPORT_LABEL;
use crate::model::{Annotation, AnnotationSet, Shape};

/// Assigns class indices to labels in order of first appearance.
#[derive(Debug, Default)]
struct LabelClasses {
    indices: HashMap<String, usize>,
    names: Vec<String>,
}

impl LabelClasses {
    /// Index of the annotation's label, registering it if new.
    fn class_of(&mut self, ann: &Annotation) -> usize {
        let label = ann.label.as_deref().unwrap_or(DEFAULT_EXPORT_LABEL);
        if let Some(&index) = self.indices.get(label) {
            return index;
        }
        let index = self.names.len();
        self.indices.insert(label.to_string(), index);
        self.names.push(label.to_string());
        index
    }
}

/// Build an export document for one image.
pub fn export(
    format: ExportFormat,
    info: &ImageInfo,
    annotations: &AnnotationSet,
) -> BackendResult<ExportFile> {
    match format {
        ExportFormat::Json => export_json(info, annotations),
        ExportFormat::Coco => export_coco(info, annotations),
        ExportFormat::Yolo => export_yolo(info, annotations),
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    image: &'a ImageInfo,
    annotations: &'a AnnotationSet,
}

pub fn export_json(info: &ImageInfo, annotations: &AnnotationSet) -> BackendResult<ExportFile> {
    let document = JsonDocument {
        image: info,
        annotations,
    };
    let bytes = serde_json::to_vec_pretty(&document)?;
    log::info!(
        "Exported {} annotations for image {} as JSON",
        annotations.len(),
        info.id
    );
    Ok(file_for(ExportFormat::Json, info, bytes))
}

// ============================================================================
// COCO
// ============================================================================

#[derive(Debug, Serialize)]
struct CocoDocument {
    images: Vec<CocoImage>,
    annotations: Vec<CocoAnnotation>,
    categories: Vec<CocoCategory>,
}

#[derive(Debug, Serialize)]
struct CocoImage {
    id: u64,
    width: u32,
    height: u32,
    file_name: String,
}

#[derive(Debug, Serialize)]
struct CocoAnnotation {
    id: u64,
    image_id: u64,
    category_id: u64,
    bbox: [f32; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    segmentation: Option<Vec<Vec<f32>>>,
    area: f32,
    iscrowd: u8,
}

#[derive(Debug, Serialize)]
struct CocoCategory {
    id: u64,
    name: String,
    supercategory: &'static str,
}

pub fn export_coco(info: &ImageInfo, annotations: &AnnotationSet) -> BackendResult<ExportFile> {
    let image_id = info.id.0;
    let mut classes = LabelClasses::default();
    let mut coco_annotations = Vec::with_capacity(annotations.len());

    for ann in annotations {
        let category_id = classes.class_of(ann) as u64 + 1;
        let id = coco_annotations.len() as u64 + 1;

        let (bbox, segmentation) = match &ann.shape {
            Shape::Box(b) => ([b.x, b.y, b.w, b.h], None),
            Shape::Polygon { points } => {
                let Some(extents) = ann.shape.bounds() else {
                    log::warn!("Skipped empty polygon in COCO export of image {}", image_id);
                    continue;
                };
                let flat: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
                (
                    [extents.x, extents.y, extents.w, extents.h],
                    Some(vec![flat]),
                )
            }
        };

        coco_annotations.push(CocoAnnotation {
            id,
            image_id,
            category_id,
            bbox,
            segmentation,
            area: ann.shape.area(),
            iscrowd: 0,
        });
    }

    let document = CocoDocument {
        images: vec![CocoImage {
            id: image_id,
            width: info.width.unwrap_or(0),
            height: info.height.unwrap_or(0),
            file_name: info.filename.clone(),
        }],
        annotations: coco_annotations,
        categories: classes
            .names
            .into_iter()
            .enumerate()
            .map(|(i, name)| CocoCategory {
                id: i as u64 + 1,
                name,
                supercategory: "thing",
            })
            .collect(),
    };

    let bytes = serde_json::to_vec_pretty(&document)?;
    log::info!(
        "Exported {} annotations in {} categories for image {} as COCO",
        document.annotations.len(),
        document.categories.len(),
        image_id
    );
    Ok(file_for(ExportFormat::Coco, info, bytes))
}

// ============================================================================
// YOLO
// ============================================================================

pub fn export_yolo(info: &ImageInfo, annotations: &AnnotationSet) -> BackendResult<ExportFile> {
    let (width, height) = info
        .dimensions()
        .ok_or_else(|| BackendError::missing_dimensions(ExportFormat::Yolo.name(), info.id))?;
    let (width, height) = (width as f32, height as f32);

    let mut classes = LabelClasses::default();
    let mut lines = Vec::new();
    let mut skipped = 0usize;

    for ann in annotations {
        let Shape::Box(b) = &ann.shape else {
            skipped += 1;
            continue;
        };
        let class = classes.class_of(ann);
        let cx = (b.x + b.w / 2.0) / width;
        let cy = (b.y + b.h / 2.0) / height;
        lines.push(format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            class,
            cx,
            cy,
            b.w / width,
            b.h / height
        ));
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {} polygon annotations in YOLO export of image {} (boxes only)",
            skipped,
            info.id
        );
    }
    log::info!("Exported {} boxes for image {} as YOLO", lines.len(), info.id);
    Ok(file_for(
        ExportFormat::Yolo,
        info,
        lines.join("\n").into_bytes(),
    ))
}

fn file_for(format: ExportFormat, info: &ImageInfo, bytes: Vec<u8>) -> ExportFile {
    ExportFile::new(format.filename(info.id), format.content_type(), bytes)
}
