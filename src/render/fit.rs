//! Display fitting: maps between on-screen display and canvas pixel space.

use crate::model::Point;

/// Uniform scale that fits a canvas into a maximum display box.
///
/// The canvas always keeps its natural resolution; only the displayed size is
/// scaled, preserving aspect ratio and never enlarging small images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFit {
    canvas_width: f32,
    canvas_height: f32,
    scale: f32,
}

impl DisplayFit {
    pub fn new(canvas_width: u32, canvas_height: u32, max_width: f32, max_height: f32) -> Self {
        let (w, h) = (canvas_width as f32, canvas_height as f32);
        let scale = if w > 0.0 && h > 0.0 && max_width > 0.0 && max_height > 0.0 {
            (max_width / w).min(max_height / h).min(1.0)
        } else {
            1.0
        };
        Self {
            canvas_width: w,
            canvas_height: h,
            scale,
        }
    }

    /// Display scale factor (display pixels per canvas pixel), at most 1.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// On-screen size of the canvas.
    pub fn display_size(&self) -> (f32, f32) {
        (self.canvas_width * self.scale, self.canvas_height * self.scale)
    }

    /// Convert a position relative to the displayed canvas's top-left corner into
    /// canvas pixel coordinates.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(screen.x / self.scale, screen.y / self.scale)
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(canvas.x * self.scale, canvas.y * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_image_is_scaled_down() {
        let fit = DisplayFit::new(1600, 900, 800.0, 600.0);
        assert!((fit.scale() - 0.5).abs() < 1e-6);
        assert_eq!(fit.display_size(), (800.0, 450.0));
        assert_eq!(
            fit.screen_to_canvas(Point::new(100.0, 50.0)),
            Point::new(200.0, 100.0)
        );
    }

    #[test]
    fn test_height_limited() {
        let fit = DisplayFit::new(600, 1200, 800.0, 600.0);
        assert!((fit.scale() - 0.5).abs() < 1e-6);
        assert_eq!(fit.display_size(), (300.0, 600.0));
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let fit = DisplayFit::new(320, 240, 800.0, 600.0);
        assert_eq!(fit.scale(), 1.0);
        let p = Point::new(12.5, 7.0);
        assert_eq!(fit.screen_to_canvas(p), p);
        assert_eq!(fit.canvas_to_screen(p), p);
    }

    #[test]
    fn test_empty_canvas() {
        let fit = DisplayFit::new(0, 0, 800.0, 600.0);
        assert_eq!(fit.scale(), 1.0);
        assert_eq!(fit.display_size(), (0.0, 0.0));
    }
}
