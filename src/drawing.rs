//! Drawing state machine: tool mode, in-progress shapes and click selection.
//!
//! The session turns pointer and touch input into one of a few outcomes. It never
//! touches the annotation set itself; finished shapes are handed back to the
//! caller as [`DrawingOutcome::Committed`] so the editor can record them in history.

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_BOX_SIZE, MIN_POLYGON_VERTICES};
use crate::input::{PointerInput, TapThresholds, TouchGesture, TouchInput, TouchTracker};
use crate::model::{AnnotationId, AnnotationSet, BoxShape, Point, Shape};

/// Tool modes available in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// No drawing tool: clicks select annotations.
    #[default]
    None,
    /// Drag out bounding boxes.
    Box,
    /// Click polygon vertices, then finish.
    Polygon,
}

impl ToolMode {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::None => "Select",
            ToolMode::Box => "Box",
            ToolMode::Polygon => "Polygon",
        }
    }

    pub fn all() -> &'static [ToolMode] {
        &[ToolMode::None, ToolMode::Box, ToolMode::Polygon]
    }
}

/// A box being dragged: the anchor is fixed, the opposite corner follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDrag {
    pub anchor: Point,
    pub current: Point,
}

impl BoxDrag {
    /// Signed width and height of the drag.
    pub fn extent(&self) -> (f32, f32) {
        (self.current.x - self.anchor.x, self.current.y - self.anchor.y)
    }

    /// The normalized box covered by the drag.
    pub fn to_box(&self) -> BoxShape {
        BoxShape::from_corners(self.anchor, self.current)
    }
}

/// State for the shape currently being drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawingState {
    /// Not drawing anything.
    #[default]
    Idle,
    /// Box tool armed. `drag` is set between pointer down and pointer up.
    Box { drag: Option<BoxDrag> },
    /// Polygon tool armed, with the vertices placed so far.
    Polygon { vertices: Vec<Point> },
}

impl DrawingState {
    pub fn mode(&self) -> ToolMode {
        match self {
            DrawingState::Idle => ToolMode::None,
            DrawingState::Box { .. } => ToolMode::Box,
            DrawingState::Polygon { .. } => ToolMode::Polygon,
        }
    }

    /// Whether a partial shape exists that would be lost on cancel.
    pub fn has_partial_shape(&self) -> bool {
        match self {
            DrawingState::Idle => false,
            DrawingState::Box { drag } => drag.is_some(),
            DrawingState::Polygon { vertices } => !vertices.is_empty(),
        }
    }

    fn for_mode(mode: ToolMode) -> Self {
        match mode {
            ToolMode::None => DrawingState::Idle,
            ToolMode::Box => DrawingState::Box { drag: None },
            ToolMode::Polygon => DrawingState::Polygon {
                vertices: Vec::new(),
            },
        }
    }
}

/// What an input did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingOutcome {
    /// Nothing changed.
    Unchanged,
    /// The tool or the in-progress shape changed.
    Updated,
    /// A shape was finished and should be added to the annotation set.
    Committed(Shape),
    /// A click hit-tested the annotations; the selection is now this id.
    Selected(Option<AnnotationId>),
    /// An in-progress shape was discarded.
    Cancelled,
}

/// Thresholds that decide whether drawn input becomes an annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingThresholds {
    /// A box must be strictly larger than this on both axes.
    pub min_box_size: f32,
    /// Tap vs drag classification for touch input.
    pub tap: TapThresholds,
}

impl Default for DrawingThresholds {
    fn default() -> Self {
        Self {
            min_box_size: MIN_BOX_SIZE,
            tap: TapThresholds::default(),
        }
    }
}

/// Drawing session: tool state, selection and touch tracking for one editor.
#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    state: DrawingState,
    selected: Option<AnnotationId>,
    touch: TouchTracker,
    thresholds: DrawingThresholds,
}

impl DrawingSession {
    pub fn new(thresholds: DrawingThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn mode(&self) -> ToolMode {
        self.state.mode()
    }

    pub fn selected(&self) -> Option<&AnnotationId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, id: Option<AnnotationId>) {
        if self.selected != id {
            log::debug!("Selection: {:?} -> {:?}", self.selected, id);
            self.selected = id;
        }
    }

    /// Switch tools. Any partial shape of the previous tool is discarded.
    pub fn select_tool(&mut self, mode: ToolMode) -> DrawingOutcome {
        let discarded = self.state.has_partial_shape();
        self.state = DrawingState::for_mode(mode);
        self.touch = TouchTracker::Idle;
        log::debug!("Tool selected: {}", mode.name());
        if discarded {
            DrawingOutcome::Cancelled
        } else {
            DrawingOutcome::Updated
        }
    }

    /// Discard the in-progress shape and return to idle.
    pub fn cancel(&mut self) -> DrawingOutcome {
        let was_drawing = self.state != DrawingState::Idle;
        self.state = DrawingState::Idle;
        self.touch = TouchTracker::Idle;
        if was_drawing {
            log::debug!("Drawing cancelled");
            DrawingOutcome::Cancelled
        } else {
            DrawingOutcome::Unchanged
        }
    }

    /// Commit the polygon being drawn, if it has enough vertices.
    ///
    /// With too few vertices nothing happens and the vertices are kept.
    pub fn finish_polygon(&mut self) -> DrawingOutcome {
        let DrawingState::Polygon { vertices } = &self.state else {
            return DrawingOutcome::Unchanged;
        };
        if vertices.len() < MIN_POLYGON_VERTICES {
            log::debug!(
                "Polygon: finish ignored with {} vertices (need {})",
                vertices.len(),
                MIN_POLYGON_VERTICES
            );
            return DrawingOutcome::Unchanged;
        }

        let DrawingState::Polygon { vertices } = std::mem::take(&mut self.state) else {
            return DrawingOutcome::Unchanged;
        };
        log::info!("Polygon: finished with {} vertices", vertices.len());
        DrawingOutcome::Committed(Shape::Polygon { points: vertices })
    }

    /// Handle mouse / pen input.
    pub fn pointer(&mut self, input: PointerInput, annotations: &AnnotationSet) -> DrawingOutcome {
        match (&mut self.state, input) {
            (DrawingState::Box { drag }, PointerInput::Pressed(p)) => {
                *drag = Some(BoxDrag {
                    anchor: p,
                    current: p,
                });
                log::debug!("Box: anchor at ({:.1}, {:.1})", p.x, p.y);
                DrawingOutcome::Updated
            }
            (DrawingState::Box { drag: Some(drag) }, PointerInput::Moved(p)) => {
                drag.current = p;
                DrawingOutcome::Updated
            }
            (DrawingState::Box { .. }, PointerInput::Released(p)) => self.release_box(p),
            (DrawingState::Polygon { vertices }, PointerInput::Clicked(p)) => {
                vertices.push(p);
                log::debug!(
                    "Polygon: added vertex {} at ({:.1}, {:.1})",
                    vertices.len(),
                    p.x,
                    p.y
                );
                DrawingOutcome::Updated
            }
            (DrawingState::Idle, PointerInput::Clicked(p)) => self.select_at(p, annotations),
            _ => DrawingOutcome::Unchanged,
        }
    }

    /// Handle single-finger touch input.
    ///
    /// Box mode treats the touch as a drag and commits on touch end. Elsewhere the
    /// gesture is classified at touch end: taps act as clicks, drags are ignored.
    pub fn touch(&mut self, input: TouchInput, annotations: &AnnotationSet) -> DrawingOutcome {
        match input {
            TouchInput::Started { position, at } => {
                self.touch.start(position, at);
                if let DrawingState::Box { drag } = &mut self.state {
                    *drag = Some(BoxDrag {
                        anchor: position,
                        current: position,
                    });
                    return DrawingOutcome::Updated;
                }
                DrawingOutcome::Unchanged
            }
            TouchInput::Moved { position, .. } => {
                self.touch.update(position);
                if let DrawingState::Box { drag: Some(drag) } = &mut self.state {
                    drag.current = position;
                    return DrawingOutcome::Updated;
                }
                DrawingOutcome::Unchanged
            }
            TouchInput::Ended { position, at } => {
                let gesture = self.touch.finish(position, at, &self.thresholds.tap);
                match (&mut self.state, gesture) {
                    (DrawingState::Box { .. }, _) => self.release_box(position),
                    (DrawingState::Polygon { vertices }, Some(TouchGesture::Tap(p))) => {
                        vertices.push(p);
                        log::debug!("Polygon: tap added vertex {}", vertices.len());
                        DrawingOutcome::Updated
                    }
                    (DrawingState::Idle, Some(TouchGesture::Tap(p))) => {
                        self.select_at(p, annotations)
                    }
                    (_, Some(TouchGesture::Drag { .. })) => {
                        log::debug!("Touch drag ignored in {} mode", self.state.mode().name());
                        DrawingOutcome::Unchanged
                    }
                    _ => DrawingOutcome::Unchanged,
                }
            }
        }
    }

    /// Finish a box drag at `p`, committing it if it is large enough.
    fn release_box(&mut self, p: Point) -> DrawingOutcome {
        let DrawingState::Box { drag } = &mut self.state else {
            return DrawingOutcome::Unchanged;
        };
        let Some(mut finished) = drag.take() else {
            return DrawingOutcome::Unchanged;
        };
        finished.current = p;

        let (dx, dy) = finished.extent();
        let min = self.thresholds.min_box_size;
        if dx.abs() > min && dy.abs() > min {
            self.state = DrawingState::Idle;
            let shape = finished.to_box();
            log::info!(
                "Box: committed at ({:.1}, {:.1}) size {:.1}x{:.1}",
                shape.x,
                shape.y,
                shape.w,
                shape.h
            );
            DrawingOutcome::Committed(Shape::Box(shape))
        } else {
            log::debug!("Box: drag {:.1}x{:.1} below minimum {:.1}, discarded", dx, dy, min);
            DrawingOutcome::Updated
        }
    }

    /// Hit-test at `p` and make the result the selection.
    fn select_at(&mut self, p: Point, annotations: &AnnotationSet) -> DrawingOutcome {
        let hit = annotations.hit_test(p).and_then(|a| a.id.clone());
        self.select(hit.clone());
        DrawingOutcome::Selected(hit)
    }
}
