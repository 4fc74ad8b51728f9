//! Ordered annotation sets for a single image.

use serde::{Deserialize, Serialize};

use crate::model::{Annotation, AnnotationId, Point};

/// The annotations of one image, in the order they were drawn.
///
/// Sets are treated as values: every edit returns a new set and leaves the
/// original untouched, so history snapshots can hold them directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
}

impl AnnotationSet {
    pub const fn new() -> Self {
        Self {
            annotations: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Get an annotation by ID.
    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.has_id(id))
    }

    pub fn contains_id(&self, id: &AnnotationId) -> bool {
        self.get(id).is_some()
    }

    /// Ids of all annotations that carry one.
    pub fn ids(&self) -> impl Iterator<Item = &AnnotationId> {
        self.annotations.iter().filter_map(|a| a.id.as_ref())
    }

    /// A copy of this set with `annotation` drawn on top.
    pub fn with_appended(&self, annotation: Annotation) -> Self {
        let mut annotations = self.annotations.clone();
        annotations.push(annotation);
        Self { annotations }
    }

    /// A copy of this set without the annotation `id`, or `None` if it isn't present.
    pub fn without(&self, id: &AnnotationId) -> Option<Self> {
        let index = self.annotations.iter().position(|a| a.has_id(id))?;
        let mut annotations = self.annotations.clone();
        annotations.remove(index);
        Some(Self { annotations })
    }

    /// A copy of this set with the label of `id` replaced, or `None` if it isn't present.
    pub fn with_label(&self, id: &AnnotationId, label: impl Into<String>) -> Option<Self> {
        let index = self.annotations.iter().position(|a| a.has_id(id))?;
        let mut annotations = self.annotations.clone();
        annotations[index].label = Some(label.into());
        Some(Self { annotations })
    }

    /// Find the topmost annotation containing `point`.
    ///
    /// Iterates from the most recently drawn annotation backwards, so overlapping
    /// shapes resolve to the one drawn later.
    pub fn hit_test(&self, point: Point) -> Option<&Annotation> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.contains_point(point))
    }
}

impl From<Vec<Annotation>> for AnnotationSet {
    fn from(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }
}

impl FromIterator<Annotation> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self {
            annotations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxShape, Shape};

    fn boxed(id: &str, x: f32, y: f32, w: f32, h: f32) -> Annotation {
        Annotation::new(Shape::Box(BoxShape::new(x, y, w, h))).with_id(AnnotationId::new(id))
    }

    #[test]
    fn test_hit_test_box() {
        let set = AnnotationSet::from(vec![boxed("a", 0.0, 0.0, 10.0, 10.0)]);
        assert!(set.hit_test(Point::new(5.0, 5.0)).is_some());
        assert!(set.hit_test(Point::new(15.0, 15.0)).is_none());
    }

    #[test]
    fn test_hit_test_topmost_wins() {
        let set = AnnotationSet::from(vec![
            boxed("first", 0.0, 0.0, 50.0, 50.0),
            boxed("second", 25.0, 25.0, 50.0, 50.0),
        ]);
        let hit = set.hit_test(Point::new(30.0, 30.0)).expect("overlap hit");
        assert_eq!(hit.id, Some(AnnotationId::new("second")));

        let hit = set.hit_test(Point::new(5.0, 5.0)).expect("first-only hit");
        assert_eq!(hit.id, Some(AnnotationId::new("first")));
    }

    #[test]
    fn test_edits_leave_original_untouched() {
        let original = AnnotationSet::from(vec![boxed("a", 0.0, 0.0, 10.0, 10.0)]);

        let appended = original.with_appended(boxed("b", 20.0, 20.0, 10.0, 10.0));
        assert_eq!(original.len(), 1);
        assert_eq!(appended.len(), 2);

        let labeled = appended
            .with_label(&AnnotationId::new("b"), "dog")
            .expect("b exists");
        assert_eq!(appended.get(&AnnotationId::new("b")).and_then(|a| a.label.clone()), None);
        assert_eq!(
            labeled.get(&AnnotationId::new("b")).and_then(|a| a.label.clone()),
            Some("dog".to_string())
        );

        let removed = labeled.without(&AnnotationId::new("a")).expect("a exists");
        assert_eq!(removed.len(), 1);
        assert!(labeled.contains_id(&AnnotationId::new("a")));
        assert!(removed.without(&AnnotationId::new("missing")).is_none());
    }
}
