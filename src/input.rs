//! Input events delivered to the editor, and touch gesture classification.
//!
//! Positions are in canvas pixel space. Hosts convert on-screen coordinates with
//! [`crate::render::DisplayFit::screen_to_canvas`] before building these events.

use std::time::Duration;

use crate::constants::{TAP_MAX_DURATION_MS, TAP_MOVE_THRESHOLD};
use crate::model::Point;

/// Keyboard keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
}

impl Key {
    /// Compare character keys case-insensitively (Shift+Z arrives as `'Z'`).
    pub fn matches_char(&self, c: char) -> bool {
        matches!(self, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn ctrl_shift() -> Self {
        Self {
            ctrl: true,
            shift: true,
            ..Self::default()
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::default()
        }
    }

    /// The platform's primary shortcut modifier: Ctrl, or Cmd on macOS keyboards.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse / pen pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Primary button pressed.
    Pressed(Point),
    /// Pointer moved (with or without a button held).
    Moved(Point),
    /// Primary button released.
    Released(Point),
    /// A complete click (press and release without dragging).
    Clicked(Point),
}

impl PointerInput {
    pub fn position(&self) -> Point {
        match *self {
            PointerInput::Pressed(p)
            | PointerInput::Moved(p)
            | PointerInput::Released(p)
            | PointerInput::Clicked(p) => p,
        }
    }
}

/// Single-finger touch events. `at` is the event timestamp relative to any fixed
/// origin (only differences are used).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchInput {
    Started { position: Point, at: Duration },
    Moved { position: Point, at: Duration },
    Ended { position: Point, at: Duration },
}

/// How a finished touch sequence is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchGesture {
    /// Short and nearly stationary: acts like a click at the start point.
    Tap(Point),
    /// Anything else: a drag from `from` to `to`.
    Drag { from: Point, to: Point },
}

/// Thresholds separating taps from drags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapThresholds {
    /// Maximum distance from the start point, in canvas pixels.
    pub max_movement: f32,
    /// Maximum duration of the touch.
    pub max_duration: Duration,
}

impl Default for TapThresholds {
    fn default() -> Self {
        Self {
            max_movement: TAP_MOVE_THRESHOLD,
            max_duration: Duration::from_millis(TAP_MAX_DURATION_MS),
        }
    }
}

/// Touch tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TouchTracker {
    /// No finger down.
    #[default]
    Idle,
    /// Finger down; tracks the start and the largest distance travelled so far.
    Touching {
        start: Point,
        started_at: Duration,
        last: Point,
        max_distance: f32,
    },
}

impl TouchTracker {
    pub fn is_touching(&self) -> bool {
        matches!(self, TouchTracker::Touching { .. })
    }

    /// Begin tracking a touch. A touch already in progress is abandoned.
    pub fn start(&mut self, position: Point, at: Duration) {
        *self = TouchTracker::Touching {
            start: position,
            started_at: at,
            last: position,
            max_distance: 0.0,
        };
    }

    /// Record movement. Ignored when no touch is in progress.
    pub fn update(&mut self, position: Point) {
        if let TouchTracker::Touching {
            start,
            last,
            max_distance,
            ..
        } = self
        {
            *last = position;
            *max_distance = max_distance.max(start.distance_to(position));
        }
    }

    /// Finish the touch and classify it. Returns `None` if no touch was in progress.
    pub fn finish(
        &mut self,
        position: Point,
        at: Duration,
        thresholds: &TapThresholds,
    ) -> Option<TouchGesture> {
        self.update(position);
        let TouchTracker::Touching {
            start,
            started_at,
            max_distance,
            ..
        } = std::mem::take(self)
        else {
            return None;
        };

        let duration = at.saturating_sub(started_at);
        if max_distance < thresholds.max_movement && duration < thresholds.max_duration {
            Some(TouchGesture::Tap(start))
        } else {
            Some(TouchGesture::Drag {
                from: start,
                to: position,
            })
        }
    }
}
