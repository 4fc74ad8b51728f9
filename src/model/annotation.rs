//! Annotation shapes, geometry and hit-testing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::MIN_POLYGON_VERTICES;
use crate::model::AnnotationId;

/// A 2D point in canvas pixel coordinates.
///
/// Serialized as an `[x, y]` pair, which is how polygon vertices travel on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// An axis-aligned box defined by its origin and extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BoxShape {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a normalized box spanning two corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    /// Fold negative extents into the origin so `w` and `h` are non-negative.
    pub fn normalized(self) -> Self {
        Self::from_corners(
            Point::new(self.x, self.y),
            Point::new(self.x + self.w, self.y + self.h),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Check if a point lies inside the box. Edges count as inside.
    pub fn contains(&self, p: Point) -> bool {
        if !self.is_finite() || !p.is_finite() {
            return false;
        }
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Point-in-polygon test using the even-odd ray casting rule.
///
/// Degenerate input (fewer than three vertices, non-finite coordinates) never matches.
pub fn polygon_contains(vertices: &[Point], p: Point) -> bool {
    if vertices.len() < MIN_POLYGON_VERTICES
        || !p.is_finite()
        || vertices.iter().any(|v| !v.is_finite())
    {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if ((vi.y > p.y) != (vj.y > p.y)) && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Geometry of an annotation.
///
/// Tagged by `type` on the wire: `{"type": "box", "x", "y", "w", "h"}` or
/// `{"type": "polygon", "points": [[x, y], ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Box(BoxShape),
    Polygon { points: Vec<Point> },
}

impl Shape {
    /// Short name used in logs and export warnings.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Box(_) => "box",
            Shape::Polygon { .. } => "polygon",
        }
    }

    /// Check if a point is inside this shape.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Box(b) => b.contains(p),
            Shape::Polygon { points } => polygon_contains(points, p),
        }
    }

    /// Whether the shape could have been produced by a commit: finite numbers,
    /// non-negative box extents, and enough polygon vertices.
    pub fn is_valid(&self) -> bool {
        match self {
            Shape::Box(b) => b.is_finite() && b.w >= 0.0 && b.h >= 0.0,
            Shape::Polygon { points } => {
                points.len() >= MIN_POLYGON_VERTICES && points.iter().all(Point::is_finite)
            }
        }
    }

    /// Axis-aligned extents of the shape.
    pub fn bounds(&self) -> Option<BoxShape> {
        match self {
            Shape::Box(b) => Some(*b),
            Shape::Polygon { points } => {
                let first = points.first()?;
                let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
                for p in &points[1..] {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                Some(BoxShape::new(min_x, min_y, max_x - min_x, max_y - min_y))
            }
        }
    }

    /// Enclosed area. Polygons use the shoelace formula.
    pub fn area(&self) -> f32 {
        match self {
            Shape::Box(b) => b.area(),
            Shape::Polygon { points } => {
                if points.len() < MIN_POLYGON_VERTICES {
                    return 0.0;
                }
                let mut twice = 0.0;
                let mut j = points.len() - 1;
                for i in 0..points.len() {
                    twice += points[j].x * points[i].y - points[i].x * points[j].y;
                    j = i;
                }
                (twice / 2.0).abs()
            }
        }
    }

    /// Anchor for the label tag: box origin or first polygon vertex.
    pub fn reference_point(&self) -> Option<Point> {
        match self {
            Shape::Box(b) => Some(b.origin()),
            Shape::Polygon { points } => points.first().copied(),
        }
    }
}

/// A single annotation on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// The shape geometry, flattened so `type` sits next to the coordinates.
    #[serde(flatten)]
    pub shape: Shape,
    /// Identifier, absent for annotations created by older clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AnnotationId>,
    /// Text label. Written as `""` when unset, and blank labels load as `None`.
    #[serde(
        default,
        serialize_with = "label_or_empty",
        deserialize_with = "blank_label_as_none"
    )]
    pub label: Option<String>,
}

fn label_or_empty<S>(label: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(label.as_deref().unwrap_or(""))
}

fn blank_label_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.filter(|l| !l.trim().is_empty()))
}

impl Annotation {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            id: None,
            label: None,
        }
    }

    pub fn with_id(mut self, id: AnnotationId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.shape.contains(p)
    }

    pub fn has_id(&self, id: &AnnotationId) -> bool {
        self.id.as_ref() == Some(id)
    }
}
