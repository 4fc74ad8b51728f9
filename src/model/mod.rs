//! Data models for the annotation editor.

mod annotation;
mod id;
mod set;

pub use annotation::{Annotation, BoxShape, Point, Shape};
pub use id::{AnnotationId, IdGenerator};
pub use set::AnnotationSet;
