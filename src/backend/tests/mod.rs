//! Tests for export documents and the reference backends.

mod memory_tests;

use crate::backend::{ImageId, ImageInfo};
use crate::model::{Annotation, AnnotationId, AnnotationSet, BoxShape, Point, Shape};

/// A 640x480 image.
fn sample_image() -> ImageInfo {
    ImageInfo::new(ImageId(3), "street_0001.jpg").with_dimensions(640, 480)
}

/// Two labeled boxes, an unlabeled box and a labeled triangle.
fn sample_set() -> AnnotationSet {
    AnnotationSet::from(vec![
        Annotation::new(Shape::Box(BoxShape::new(100.0, 120.0, 80.0, 200.0)))
            .with_id(AnnotationId::new("a"))
            .with_label("person"),
        Annotation::new(Shape::Box(BoxShape::new(300.0, 200.0, 160.0, 100.0)))
            .with_id(AnnotationId::new("b"))
            .with_label("car"),
        Annotation::new(Shape::Polygon {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(40.0, 0.0),
                Point::new(40.0, 30.0),
            ],
        })
        .with_id(AnnotationId::new("c"))
        .with_label("car"),
        Annotation::new(Shape::Box(BoxShape::new(0.0, 0.0, 64.0, 48.0)))
            .with_id(AnnotationId::new("d")),
    ])
}

/// A unique scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "labelkit-{}-{}-{}",
        name,
        std::process::id(),
        web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
