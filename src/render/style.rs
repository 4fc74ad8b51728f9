//! Colors and stroke settings for canvas drawing.

/// An 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Committed annotations
pub const NORMAL_COLOR: Rgba = Rgba::new(0, 200, 83, 255);
/// Selected annotation outline
pub const SELECTED_COLOR: Rgba = Rgba::new(255, 193, 7, 255);
/// Shape currently being drawn
pub const IN_PROGRESS_COLOR: Rgba = Rgba::new(220, 220, 220, 255);

pub const NORMAL_STROKE_WIDTH: f32 = 2.0;
pub const SELECTED_STROKE_WIDTH: f32 = 3.0;
pub const IN_PROGRESS_STROKE_WIDTH: f32 = 1.5;

/// Fill alpha for the selected annotation's interior
pub const SELECTED_FILL_ALPHA: u8 = 64;

/// In-progress outlines are dashed: on, off
pub const IN_PROGRESS_DASH: [f32; 2] = [6.0, 4.0];

/// Radius of polygon vertex markers
pub const VERTEX_MARKER_RADIUS: f32 = 3.0;

/// Label tag geometry and text.
pub mod label {
    use super::Rgba;

    pub const HEIGHT: f32 = 16.0;
    /// Plate width per character when no font is available
    pub const CHAR_WIDTH: f32 = 7.0;
    pub const PADDING: f32 = 4.0;
    pub const PLATE_ALPHA: u8 = 200;
    /// Glyph height in pixels
    pub const TEXT_SIZE: f32 = 13.0;
    pub const TEXT_COLOR: Rgba = Rgba::new(20, 20, 20, 255);
}

/// Visual style of a scene item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStyle {
    Normal,
    Selected,
    InProgress,
}

impl ItemStyle {
    pub fn color(&self) -> Rgba {
        match self {
            ItemStyle::Normal => NORMAL_COLOR,
            ItemStyle::Selected => SELECTED_COLOR,
            ItemStyle::InProgress => IN_PROGRESS_COLOR,
        }
    }

    pub fn stroke_width(&self) -> f32 {
        match self {
            ItemStyle::Normal => NORMAL_STROKE_WIDTH,
            ItemStyle::Selected => SELECTED_STROKE_WIDTH,
            ItemStyle::InProgress => IN_PROGRESS_STROKE_WIDTH,
        }
    }

    /// Interior fill, if this style fills closed shapes.
    pub fn fill(&self) -> Option<Rgba> {
        match self {
            ItemStyle::Selected => Some(SELECTED_COLOR.with_alpha(SELECTED_FILL_ALPHA)),
            _ => None,
        }
    }

    pub fn is_dashed(&self) -> bool {
        matches!(self, ItemStyle::InProgress)
    }
}
