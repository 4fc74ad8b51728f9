//! Tests for the editor controller.

mod label_tests;

use std::time::Duration;

use super::{Editor, EditorMessage};
use crate::backend::{CollectingSink, ImageId, ImageInfo, MemoryBackend};
use crate::config::EditorConfig;
use crate::drawing::ToolMode;
use crate::input::{PointerInput, TouchInput};
use crate::model::{IdGenerator, Point};

const IMAGE: ImageId = ImageId(1);

fn backend() -> MemoryBackend {
    MemoryBackend::new().with_image(ImageInfo::new(IMAGE, "cat.png").with_dimensions(200, 100))
}

fn open(backend: MemoryBackend) -> Editor<MemoryBackend, CollectingSink> {
    Editor::open(IMAGE, backend, CollectingSink::new(), &EditorConfig::default())
        .expect("editor should open")
        .with_id_generator(IdGenerator::with_session(7))
}

fn open_empty() -> Editor<MemoryBackend, CollectingSink> {
    open(backend())
}

fn p(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

/// Select the box tool and drag from `from` to `to`.
fn drag_box(editor: &mut Editor<MemoryBackend, CollectingSink>, from: Point, to: Point) {
    editor.update(EditorMessage::SelectTool(ToolMode::Box));
    editor.update(EditorMessage::Pointer(PointerInput::Pressed(from)));
    editor.update(EditorMessage::Pointer(PointerInput::Moved(to)));
    editor.update(EditorMessage::Pointer(PointerInput::Released(to)));
}

/// Draw a box and give it a label through the prompt.
fn add_labeled_box(
    editor: &mut Editor<MemoryBackend, CollectingSink>,
    from: Point,
    to: Point,
    label: &str,
) {
    drag_box(editor, from, to);
    editor.update(EditorMessage::LabelInput(label.to_string()));
    editor.update(EditorMessage::ConfirmLabel);
}

fn click(editor: &mut Editor<MemoryBackend, CollectingSink>, at: Point) {
    editor.update(EditorMessage::Pointer(PointerInput::Clicked(at)));
}

fn tap(editor: &mut Editor<MemoryBackend, CollectingSink>, at: Point, millis: u64) {
    editor.update(EditorMessage::Touch(TouchInput::Started {
        position: at,
        at: Duration::ZERO,
    }));
    editor.update(EditorMessage::Touch(TouchInput::Ended {
        position: at,
        at: Duration::from_millis(millis),
    }));
}
