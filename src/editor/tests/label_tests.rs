use super::*;
use crate::input::{Key, Modifiers};
use crate::model::AnnotationId;

#[test]
fn test_confirm_applies_trimmed_label() {
    let mut editor = open_empty();
    drag_box(&mut editor, p(10.0, 10.0), p(60.0, 60.0));
    editor.update(EditorMessage::LabelInput("  cat ".to_string()));
    editor.update(EditorMessage::ConfirmLabel);

    assert!(editor.prompt().is_none());
    assert_eq!(editor.annotations().as_slice()[0].label.as_deref(), Some("cat"));
    // Add, then label
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn test_cancel_keeps_annotation_unlabeled() {
    let mut editor = open_empty();
    drag_box(&mut editor, p(10.0, 10.0), p(60.0, 60.0));
    editor.update(EditorMessage::LabelInput("cat".to_string()));
    editor.update(EditorMessage::key(Key::Escape, Modifiers::none()));

    assert!(editor.prompt().is_none());
    assert_eq!(editor.annotations().len(), 1);
    assert_eq!(editor.annotations().as_slice()[0].label, None);
    // Escape closed the prompt only
    assert_eq!(editor.selected(), Some(&AnnotationId::new("7-1")));
}

#[test]
fn test_blank_label_is_ignored() {
    let mut editor = open_empty();
    drag_box(&mut editor, p(10.0, 10.0), p(60.0, 60.0));
    editor.update(EditorMessage::LabelInput("   ".to_string()));
    editor.update(EditorMessage::key(Key::Enter, Modifiers::none()));

    assert!(editor.prompt().is_none());
    assert_eq!(editor.annotations().as_slice()[0].label, None);
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn test_prompt_blocks_canvas_and_shortcuts() {
    let mut editor = open_empty();
    drag_box(&mut editor, p(10.0, 10.0), p(60.0, 60.0));
    assert!(editor.prompt().is_some());

    // Tool hotkeys and undo must not reach the editor
    editor.update(EditorMessage::key(Key::Char('p'), Modifiers::none()));
    editor.update(EditorMessage::key(Key::Char('z'), Modifiers::ctrl()));
    editor.update(EditorMessage::Undo);
    editor.update(EditorMessage::SelectTool(ToolMode::Polygon));
    click(&mut editor, p(100.0, 50.0));

    assert_eq!(editor.annotations().len(), 1);
    assert_eq!(editor.tool(), ToolMode::None);
    assert_eq!(editor.selected(), Some(&AnnotationId::new("7-1")));
    assert!(editor.prompt().is_some());
}

#[test]
fn test_edit_label_prefills_current_label() {
    let mut editor = open_empty();
    add_labeled_box(&mut editor, p(10.0, 10.0), p(60.0, 60.0), "cat");

    editor.update(EditorMessage::EditLabel);
    let prompt = editor.prompt().expect("prompt for the selection");
    assert_eq!(prompt.text(), "cat");

    // Unchanged label adds no history entry
    let entries = editor.history().len();
    editor.update(EditorMessage::ConfirmLabel);
    assert_eq!(editor.history().len(), entries);

    editor.update(EditorMessage::EditLabel);
    editor.update(EditorMessage::LabelInput("tiger".to_string()));
    editor.update(EditorMessage::ConfirmLabel);
    assert_eq!(editor.annotations().as_slice()[0].label.as_deref(), Some("tiger"));
    assert_eq!(editor.history().len(), entries + 1);
}

#[test]
fn test_edit_label_without_selection_does_nothing() {
    let mut editor = open_empty();
    editor.update(EditorMessage::EditLabel);
    assert!(editor.prompt().is_none());
}

#[test]
fn test_labels_appear_in_scene() {
    let mut editor = open_empty();
    add_labeled_box(&mut editor, p(10.0, 10.0), p(60.0, 60.0), "cat");
    drag_box(&mut editor, p(100.0, 10.0), p(150.0, 60.0));
    editor.update(EditorMessage::CancelLabel);

    let scene = editor.scene();
    assert_eq!(scene.items.len(), 2);
    let texts: Vec<_> = scene.labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["cat"]);
}
