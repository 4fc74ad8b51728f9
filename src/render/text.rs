//! Label text drawing.
//!
//! Text is drawn with `imageproc` in a pass after the tiny-skia shapes, using a
//! font bundled with the crate. If the font cannot be parsed, labels render as
//! plates without text.

use std::sync::OnceLock;

use ab_glyph::{FontArc, PxScale};
use image::RgbaImage;
use imageproc::drawing::{draw_text_mut, text_size};

use super::scene::LabelTag;
use super::style::label;

/// DejaVu Sans, see `assets/fonts/LICENSE-DejaVu.txt`.
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// The label font, parsed on first use.
pub fn label_font() -> Option<&'static FontArc> {
    static FONT: OnceLock<Option<FontArc>> = OnceLock::new();
    FONT.get_or_init(|| match FontArc::try_from_slice(BUNDLED_FONT) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("Label font unavailable, labels will have no text: {}", e);
            None
        }
    })
    .as_ref()
}

fn scale() -> PxScale {
    PxScale::from(label::TEXT_SIZE)
}

/// Position and size of a tag's plate: above the anchor, kept inside the top edge.
pub fn plate_geometry(tag: &LabelTag, font: Option<&FontArc>) -> (f32, f32, f32, f32) {
    let text_width = match font {
        Some(font) => text_size(scale(), font, &tag.text).0 as f32,
        None => tag.text.chars().count() as f32 * label::CHAR_WIDTH,
    };
    let top = (tag.anchor.y - label::HEIGHT).max(0.0);
    (
        tag.anchor.x,
        top,
        text_width + 2.0 * label::PADDING,
        label::HEIGHT,
    )
}

/// Draw the text of each tag onto its plate.
pub fn draw_label_texts(image: &mut RgbaImage, tags: &[LabelTag], font: &FontArc) {
    let color = label::TEXT_COLOR;
    let baseline_offset = ((label::HEIGHT - label::TEXT_SIZE) / 2.0).max(0.0);
    for tag in tags {
        let (x, y, _, _) = plate_geometry(tag, Some(font));
        draw_text_mut(
            image,
            image::Rgba([color.r, color.g, color.b, color.a]),
            (x + label::PADDING) as i32,
            (y + baseline_offset) as i32,
            scale(),
            font,
            &tag.text,
        );
    }
}
