//! Rasterization of a scene onto the base image using tiny-skia.

use std::io::Cursor;

use ab_glyph::FontArc;
use image::{ImageFormat, RgbaImage};
use thiserror::Error;
use tiny_skia::{
    ColorU8, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Rect, Stroke,
    StrokeDash, Transform,
};

use super::scene::{LabelTag, Scene, SceneItem, SceneShape};
use super::style::{IN_PROGRESS_DASH, Rgba, label};
use super::text::{self, plate_geometry};

/// Errors that can occur while rendering the canvas.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Canvas has zero size or is too large to allocate
    #[error("Cannot allocate a {width}x{height} canvas")]
    Allocation { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Paint `scene` over `base` and return the composed canvas at the base image's
/// natural resolution.
pub fn rasterize(base: &RgbaImage, scene: &Scene) -> Result<RgbaImage, RenderError> {
    let (width, height) = base.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Allocation { width, height })?;

    // tiny-skia stores premultiplied pixels
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(base.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    let font = text::label_font();
    for item in scene.shapes() {
        draw_item(&mut pixmap, item);
    }
    for tag in &scene.labels {
        draw_label_plate(&mut pixmap, tag, font);
    }

    let mut output = RgbaImage::new(width, height);
    for (dst, src) in output.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    // Text goes on top of the plates in a separate pass
    if let Some(font) = font {
        text::draw_label_texts(&mut output, &scene.labels, font);
    }

    log::trace!(
        "Rasterized {} shapes and {} labels at {}x{}",
        scene.items.len() + scene.preview.len(),
        scene.labels.len(),
        width,
        height
    );
    Ok(output)
}

/// Encode a canvas as PNG.
pub fn render_to_png(canvas: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Cursor::new(Vec::new());
    canvas.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn draw_item(pixmap: &mut Pixmap, item: &SceneItem) {
    let style = item.style;
    match &item.shape {
        SceneShape::Marker { center, radius } => {
            if let Some(path) = PathBuilder::from_circle(center.x, center.y, *radius) {
                pixmap.fill_path(
                    &path,
                    &paint_for(style.color()),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        SceneShape::Rect {
            x,
            y,
            width,
            height,
        } => {
            if let Some(path) = Rect::from_xywh(*x, *y, *width, *height).map(PathBuilder::from_rect)
            {
                fill_and_stroke(pixmap, &path, item);
            }
        }
        SceneShape::Polygon { vertices, closed } => {
            let Some((first, rest)) = vertices.split_first() else {
                return;
            };
            let mut pb = PathBuilder::new();
            pb.move_to(first.x, first.y);
            for p in rest {
                pb.line_to(p.x, p.y);
            }
            if *closed {
                pb.close();
            }
            if let Some(path) = pb.finish() {
                fill_and_stroke(pixmap, &path, item);
            }
        }
    }
}

fn fill_and_stroke(pixmap: &mut Pixmap, path: &Path, item: &SceneItem) {
    let style = item.style;
    let closed = !matches!(item.shape, SceneShape::Polygon { closed: false, .. });

    if let Some(fill) = style.fill().filter(|_| closed) {
        pixmap.fill_path(
            path,
            &paint_for(fill),
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }

    let stroke = Stroke {
        width: style.stroke_width(),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: if style.is_dashed() {
            StrokeDash::new(IN_PROGRESS_DASH.to_vec(), 0.0)
        } else {
            None
        },
        ..Default::default()
    };
    pixmap.stroke_path(
        path,
        &paint_for(style.color()),
        &stroke,
        Transform::identity(),
        None,
    );
}

/// Paint the tag plate above the anchor.
fn draw_label_plate(pixmap: &mut Pixmap, tag: &LabelTag, font: Option<&FontArc>) {
    let (x, top, width, height) = plate_geometry(tag, font);
    let Some(rect) = Rect::from_xywh(x, top, width, height) else {
        return;
    };
    pixmap.fill_rect(
        rect,
        &paint_for(tag.style.color().with_alpha(label::PLATE_ALPHA)),
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::DrawingState;
    use crate::model::{Annotation, AnnotationId, AnnotationSet, BoxShape, Shape};
    use crate::render::build_scene;

    const WHITE: image::Rgba<u8> = image::Rgba([255, 255, 255, 255]);

    fn boxed_set() -> AnnotationSet {
        AnnotationSet::from(vec![
            Annotation::new(Shape::Box(BoxShape::new(10.0, 10.0, 20.0, 20.0)))
                .with_id(AnnotationId::new("a")),
        ])
    }

    #[test]
    fn test_box_outline_is_painted() {
        let base = RgbaImage::from_pixel(40, 40, WHITE);
        let scene = build_scene(&boxed_set(), &DrawingState::Idle, None);
        let canvas = rasterize(&base, &scene).expect("rasterize");

        assert_eq!(canvas.dimensions(), (40, 40));
        // Left edge is stroked, interior and outside are untouched
        assert_ne!(*canvas.get_pixel(10, 20), WHITE);
        assert_eq!(*canvas.get_pixel(20, 20), WHITE);
        assert_eq!(*canvas.get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_selected_box_is_filled() {
        let base = RgbaImage::from_pixel(40, 40, WHITE);
        let id = AnnotationId::new("a");
        let scene = build_scene(&boxed_set(), &DrawingState::Idle, Some(&id));
        let canvas = rasterize(&base, &scene).expect("rasterize");
        assert_ne!(*canvas.get_pixel(20, 20), WHITE);
    }

    #[test]
    fn test_label_text_is_drawn() {
        let base = RgbaImage::from_pixel(200, 100, WHITE);
        let labeled = |label: &str| {
            let set = AnnotationSet::from(vec![
                Annotation::new(Shape::Box(BoxShape::new(20.0, 40.0, 60.0, 40.0)))
                    .with_id(AnnotationId::new("a"))
                    .with_label(label),
            ]);
            rasterize(&base, &build_scene(&set, &DrawingState::Idle, None)).expect("rasterize")
        };
        assert_ne!(labeled("cat"), labeled("dog"));
    }

    #[test]
    fn test_transparent_base_is_preserved() {
        let base = RgbaImage::new(8, 8);
        let canvas = rasterize(&base, &Scene::default()).expect("rasterize");
        assert_eq!(canvas, base);
    }

    #[test]
    fn test_empty_canvas_is_an_error() {
        let base = RgbaImage::new(0, 0);
        assert!(matches!(
            rasterize(&base, &Scene::default()),
            Err(RenderError::Allocation { .. })
        ));
    }

    #[test]
    fn test_png_encoding() {
        let canvas = RgbaImage::from_pixel(4, 4, WHITE);
        let png = render_to_png(&canvas).expect("encode");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
