//! labelkit - Image Annotation Editor Core
//!
//! The model and controller behind an interactive bounding-box and polygon
//! annotation editor: geometry and hit-testing, a bounded undo/redo history, the
//! drawing state machine for mouse and touch input, a canvas renderer, and an
//! [`Editor`] that ties them to a pluggable storage [`backend`].
//!
//! Hosts feed [`EditorMessage`]s into [`Editor::update`] and draw either the
//! rendered canvas ([`Editor::render`]) or the display list ([`Editor::scene`]).

pub mod backend;
pub mod config;
pub mod constants;
pub mod drawing;
pub mod editor;
pub mod history;
pub mod input;
pub mod keybindings;
pub mod model;
pub mod render;
pub mod wire;

pub use backend::{AnnotationBackend, DownloadSink, ExportFormat, ImageId, ImageInfo};
pub use config::EditorConfig;
pub use drawing::ToolMode;
pub use editor::{Editor, EditorError, EditorMessage};
pub use history::HistoryLog;
pub use model::{Annotation, AnnotationId, AnnotationSet, BoxShape, Point, Shape};
