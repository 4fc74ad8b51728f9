//! Scene construction: turns editor state into an ordered display list.

use super::style::{ItemStyle, VERTEX_MARKER_RADIUS};
use crate::drawing::DrawingState;
use crate::model::{Annotation, AnnotationId, AnnotationSet, Point, Shape};

/// A primitive in canvas pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneShape {
    /// An axis-aligned rectangle outline.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// A polyline, closed for committed polygons and open while drawing.
    Polygon { vertices: Vec<Point>, closed: bool },
    /// A filled circle marking a vertex.
    Marker { center: Point, radius: f32 },
}

/// A shape with its style.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    pub shape: SceneShape,
    pub style: ItemStyle,
}

impl SceneItem {
    pub fn new(shape: SceneShape, style: ItemStyle) -> Self {
        Self { shape, style }
    }
}

/// A label anchored at a shape's reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTag {
    pub anchor: Point,
    pub text: String,
    pub style: ItemStyle,
}

/// Everything drawn on top of the base image, in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Committed annotations, in set order.
    pub items: Vec<SceneItem>,
    /// Label tags, painted after all shapes.
    pub labels: Vec<LabelTag>,
    /// The shape being drawn, painted last.
    pub preview: Vec<SceneItem>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.labels.is_empty() && self.preview.is_empty()
    }

    /// All shape items in paint order.
    pub fn shapes(&self) -> impl Iterator<Item = &SceneItem> {
        self.items.iter().chain(self.preview.iter())
    }
}

/// Build the display list for a canvas.
pub fn build_scene(
    annotations: &AnnotationSet,
    drawing: &DrawingState,
    selected: Option<&AnnotationId>,
) -> Scene {
    let mut scene = Scene::default();

    for ann in annotations {
        let style = if selected.is_some_and(|id| ann.has_id(id)) {
            ItemStyle::Selected
        } else {
            ItemStyle::Normal
        };
        push_annotation(&mut scene, ann, style);
    }

    scene.preview = preview_items(drawing);
    scene
}

fn push_annotation(scene: &mut Scene, ann: &Annotation, style: ItemStyle) {
    match &ann.shape {
        Shape::Box(b) => scene.items.push(SceneItem::new(
            SceneShape::Rect {
                x: b.x,
                y: b.y,
                width: b.w,
                height: b.h,
            },
            style,
        )),
        Shape::Polygon { points } => {
            scene.items.push(SceneItem::new(
                SceneShape::Polygon {
                    vertices: points.clone(),
                    closed: true,
                },
                style,
            ));
            scene.items.extend(vertex_markers(points, style));
        }
    }

    if let (Some(text), Some(anchor)) = (&ann.label, ann.shape.reference_point()) {
        scene.labels.push(LabelTag {
            anchor,
            text: text.clone(),
            style,
        });
    }
}

fn preview_items(drawing: &DrawingState) -> Vec<SceneItem> {
    let style = ItemStyle::InProgress;
    match drawing {
        DrawingState::Idle | DrawingState::Box { drag: None } => Vec::new(),
        DrawingState::Box { drag: Some(drag) } => {
            let b = drag.to_box();
            let mut items = vec![SceneItem::new(
                SceneShape::Rect {
                    x: b.x,
                    y: b.y,
                    width: b.w,
                    height: b.h,
                },
                style,
            )];
            items.extend(vertex_markers(&[drag.anchor, drag.current], style));
            items
        }
        DrawingState::Polygon { vertices } => {
            let mut items = Vec::new();
            if vertices.len() >= 2 {
                items.push(SceneItem::new(
                    SceneShape::Polygon {
                        vertices: vertices.clone(),
                        closed: false,
                    },
                    style,
                ));
            }
            items.extend(vertex_markers(vertices, style));
            items
        }
    }
}

fn vertex_markers(points: &[Point], style: ItemStyle) -> impl Iterator<Item = SceneItem> + '_ {
    points.iter().map(move |p| {
        SceneItem::new(
            SceneShape::Marker {
                center: *p,
                radius: VERTEX_MARKER_RADIUS,
            },
            style,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::BoxDrag;
    use crate::model::BoxShape;

    fn sample_set() -> AnnotationSet {
        AnnotationSet::from(vec![
            Annotation::new(Shape::Box(BoxShape::new(10.0, 10.0, 50.0, 50.0)))
                .with_id(AnnotationId::new("box"))
                .with_label("cat"),
            Annotation::new(Shape::Polygon {
                points: vec![Point::new(0.0, 0.0), Point::new(30.0, 0.0), Point::new(30.0, 30.0)],
            })
            .with_id(AnnotationId::new("poly")),
        ])
    }

    #[test]
    fn test_committed_annotations() {
        let scene = build_scene(&sample_set(), &DrawingState::Idle, None);
        // Box, closed polygon and three vertex markers
        assert_eq!(scene.items.len(), 5);
        assert!(scene.items.iter().all(|i| i.style == ItemStyle::Normal));
        assert!(matches!(
            scene.items[1].shape,
            SceneShape::Polygon { closed: true, .. }
        ));
        assert!(scene.preview.is_empty());

        assert_eq!(scene.labels.len(), 1);
        assert_eq!(scene.labels[0].text, "cat");
        assert_eq!(scene.labels[0].anchor, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_selected_annotation_is_highlighted() {
        let selected = AnnotationId::new("poly");
        let scene = build_scene(&sample_set(), &DrawingState::Idle, Some(&selected));
        assert_eq!(scene.items[0].style, ItemStyle::Normal);
        assert!(scene.items[1..].iter().all(|i| i.style == ItemStyle::Selected));
    }

    #[test]
    fn test_box_drag_preview() {
        let drawing = DrawingState::Box {
            drag: Some(BoxDrag {
                anchor: Point::new(40.0, 40.0),
                current: Point::new(20.0, 25.0),
            }),
        };
        let scene = build_scene(&AnnotationSet::new(), &drawing, None);
        assert_eq!(
            scene.preview[0].shape,
            SceneShape::Rect {
                x: 20.0,
                y: 25.0,
                width: 20.0,
                height: 15.0
            }
        );
        assert!(scene.preview.iter().all(|i| i.style == ItemStyle::InProgress));
    }

    #[test]
    fn test_partial_polygon_preview_is_open() {
        let one = DrawingState::Polygon {
            vertices: vec![Point::new(1.0, 1.0)],
        };
        let scene = build_scene(&AnnotationSet::new(), &one, None);
        assert_eq!(scene.preview.len(), 1);
        assert!(matches!(scene.preview[0].shape, SceneShape::Marker { .. }));

        let two = DrawingState::Polygon {
            vertices: vec![Point::new(1.0, 1.0), Point::new(5.0, 1.0)],
        };
        let scene = build_scene(&AnnotationSet::new(), &two, None);
        assert!(matches!(
            scene.preview[0].shape,
            SceneShape::Polygon { closed: false, .. }
        ));
        assert_eq!(scene.shapes().count(), 3);
    }
}
