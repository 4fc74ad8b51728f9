//! Canvas rendering.
//!
//! Rendering is split in two: [`build_scene`] turns the annotation set, the shape
//! being drawn and the selection into a display list, and [`rasterize`] paints that
//! list over the base image. Hosts with their own drawing surface can consume the
//! [`Scene`] directly.

mod fit;
mod raster;
mod scene;
pub mod style;
mod text;

pub use fit::DisplayFit;
pub use raster::{RenderError, rasterize, render_to_png};
pub use scene::{LabelTag, Scene, SceneItem, SceneShape, build_scene};
pub use style::ItemStyle;

use image::RgbaImage;

use crate::drawing::DrawingState;
use crate::model::{AnnotationId, AnnotationSet};

/// Render the full canvas: base image, annotations, in-progress shape and selection.
pub fn render_canvas(
    base: &RgbaImage,
    annotations: &AnnotationSet,
    drawing: &DrawingState,
    selected: Option<&AnnotationId>,
) -> Result<RgbaImage, RenderError> {
    rasterize(base, &build_scene(annotations, drawing, selected))
}
