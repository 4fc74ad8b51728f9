//! The annotation editor for a single image.
//!
//! [`Editor`] owns the undo history, the drawing session and the label prompt, and
//! talks to storage through an [`AnnotationBackend`]. Input arrives as
//! [`EditorMessage`]s through [`Editor::update`]; every change that affects the
//! picture raises a redraw flag the host polls with [`Editor::take_redraw`].

mod message;
mod prompt;

#[cfg(test)]
mod tests;

use image::RgbaImage;
use thiserror::Error;

pub use message::EditorMessage;
pub use prompt::{LabelPrompt, StatusKind, StatusMessage};

use crate::backend::{AnnotationBackend, BackendError, DownloadSink, ExportFormat, ImageId};
use crate::config::EditorConfig;
use crate::drawing::{DrawingOutcome, DrawingSession, DrawingState, ToolMode};
use crate::history::HistoryLog;
use crate::keybindings::{EditorAction, KeyBindings};
use crate::model::{Annotation, AnnotationId, AnnotationSet, IdGenerator, Shape};
use crate::render::{self, DisplayFit, RenderError, Scene};

static EMPTY_SET: AnnotationSet = AnnotationSet::new();

/// Errors that prevent an editor from opening or rendering.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Annotations could not be loaded, so editing would risk overwriting them
    #[error("Failed to load annotations for image {image}: {source}")]
    Load {
        image: ImageId,
        #[source]
        source: BackendError,
    },

    /// Canvas rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What was discarded when an editor was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseReport {
    pub image: ImageId,
    /// Edits made since the last successful save were thrown away.
    pub discarded_unsaved_changes: bool,
    pub annotation_count: usize,
}

/// Interactive editor for the annotations of one image.
pub struct Editor<B: AnnotationBackend, S: DownloadSink> {
    image: ImageId,
    backend: B,
    sink: S,
    history: HistoryLog,
    session: DrawingSession,
    ids: IdGenerator,
    keys: KeyBindings,
    prompt: Option<LabelPrompt>,
    status: Option<StatusMessage>,
    /// Revision of the last successful save, or of the loaded set.
    saved_revision: Option<u64>,
    display_max: (f32, f32),
    needs_redraw: bool,
}

impl<B: AnnotationBackend, S: DownloadSink> Editor<B, S> {
    /// Load the image's annotations and start an editing session.
    pub fn open(
        image: ImageId,
        mut backend: B,
        sink: S,
        config: &EditorConfig,
    ) -> Result<Self, EditorError> {
        let loaded = backend
            .load(image)
            .map_err(|source| EditorError::Load { image, source })?;

        let mut ids = IdGenerator::new();
        ids.reserve(loaded.ids());

        // Annotations without an id cannot be selected
        let loaded: AnnotationSet = loaded
            .iter()
            .cloned()
            .map(|a| match a.id {
                Some(_) => a,
                None => a.with_id(ids.next_id()),
            })
            .collect();

        log::info!("Opened image {} with {} annotations", image, loaded.len());
        let history = HistoryLog::with_initial(loaded, config.drawing.history_limit);
        let saved_revision = history.current_revision();

        Ok(Self {
            image,
            backend,
            sink,
            history,
            session: DrawingSession::new(config.drawing.thresholds()),
            ids,
            keys: config.key_bindings(),
            prompt: None,
            status: None,
            saved_revision,
            display_max: (
                config.preferences.display_max_width,
                config.preferences.display_max_height,
            ),
            needs_redraw: true,
        })
    }

    /// Replace the id generator for annotations drawn from now on, e.g. with a fixed
    /// session seed.
    pub fn with_id_generator(mut self, mut ids: IdGenerator) -> Self {
        ids.reserve(self.annotations().ids());
        self.ids = ids;
        self
    }

    pub fn image_id(&self) -> ImageId {
        self.image
    }

    /// The live annotation set.
    pub fn annotations(&self) -> &AnnotationSet {
        self.history.current().unwrap_or(&EMPTY_SET)
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn drawing(&self) -> &DrawingState {
        self.session.state()
    }

    pub fn tool(&self) -> ToolMode {
        self.session.mode()
    }

    pub fn selected(&self) -> Option<&AnnotationId> {
        self.session.selected()
    }

    pub fn prompt(&self) -> Option<&LabelPrompt> {
        self.prompt.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn key_bindings(&self) -> &KeyBindings {
        &self.keys
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Whether the live set differs from what was last saved (or loaded).
    pub fn has_unsaved_changes(&self) -> bool {
        self.history.current_revision() != self.saved_revision
    }

    /// Return and clear the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Display list for the current state.
    pub fn scene(&self) -> Scene {
        render::build_scene(
            self.annotations(),
            self.session.state(),
            self.session.selected(),
        )
    }

    /// Render the canvas over `base` at the image's natural resolution.
    pub fn render(&self, base: &RgbaImage) -> Result<RgbaImage, EditorError> {
        Ok(render::render_canvas(
            base,
            self.annotations(),
            self.session.state(),
            self.session.selected(),
        )?)
    }

    /// Fit a canvas of the given size into the configured display box.
    pub fn display_fit(&self, canvas_width: u32, canvas_height: u32) -> DisplayFit {
        DisplayFit::new(
            canvas_width,
            canvas_height,
            self.display_max.0,
            self.display_max.1,
        )
    }

    /// End the session. History and drawing state are discarded; nothing is saved.
    pub fn close(self) -> CloseReport {
        let discarded_unsaved_changes = self.has_unsaved_changes();
        if discarded_unsaved_changes {
            log::warn!("Closing image {} with unsaved changes", self.image);
        } else {
            log::info!("Closed image {}", self.image);
        }
        CloseReport {
            image: self.image,
            discarded_unsaved_changes,
            annotation_count: self.annotations().len(),
        }
    }

    /// Handle one message.
    pub fn update(&mut self, message: EditorMessage) {
        if self.prompt.is_some() {
            self.update_prompt(message);
            return;
        }

        match message {
            EditorMessage::SelectTool(mode) => self.perform(EditorAction::SelectTool(mode)),
            EditorMessage::Pointer(input) => {
                let outcome = self.session.pointer(input, annotations_of(&self.history));
                self.apply(outcome);
            }
            EditorMessage::Touch(input) => {
                let outcome = self.session.touch(input, annotations_of(&self.history));
                self.apply(outcome);
            }
            EditorMessage::FinishPolygon => self.perform(EditorAction::FinishPolygon),
            EditorMessage::Cancel => self.perform(EditorAction::Cancel),
            EditorMessage::Key { key, modifiers } => {
                if let Some(action) = self.keys.action_for(key, modifiers) {
                    self.perform(action);
                }
            }
            EditorMessage::Undo => self.perform(EditorAction::Undo),
            EditorMessage::Redo => self.perform(EditorAction::Redo),
            EditorMessage::DeleteSelected => self.perform(EditorAction::DeleteSelected),
            EditorMessage::EditLabel => self.open_prompt_for_selection(),
            EditorMessage::LabelInput(_) | EditorMessage::ConfirmLabel | EditorMessage::CancelLabel => {
                log::debug!("Label message without an open prompt ignored");
            }
            EditorMessage::Save => self.save(),
            EditorMessage::Export(format) => self.export(format),
        }
    }

    /// While the prompt is open only prompt messages, Enter/Escape, save and export
    /// are handled.
    fn update_prompt(&mut self, message: EditorMessage) {
        match message {
            EditorMessage::LabelInput(text) => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.set_text(text);
                }
            }
            EditorMessage::ConfirmLabel
            | EditorMessage::Key {
                key: crate::input::Key::Enter,
                ..
            } => self.confirm_label(),
            EditorMessage::CancelLabel
            | EditorMessage::Key {
                key: crate::input::Key::Escape,
                ..
            } => self.cancel_label(),
            // Not canvas input, so they run with the prompt left open
            EditorMessage::Save => self.save(),
            EditorMessage::Export(format) => self.export(format),
            other => log::debug!("Ignored {:?} while the label prompt is open", other),
        }
    }

    fn perform(&mut self, action: EditorAction) {
        match action {
            EditorAction::SelectTool(mode) => {
                let outcome = self.session.select_tool(mode);
                self.apply(outcome);
            }
            EditorAction::FinishPolygon => {
                let outcome = self.session.finish_polygon();
                self.apply(outcome);
            }
            EditorAction::Cancel => {
                let had_selection = self.session.selected().is_some();
                let outcome = self.session.cancel();
                self.session.select(None);
                if had_selection || outcome != DrawingOutcome::Unchanged {
                    self.needs_redraw = true;
                }
            }
            EditorAction::Undo => {
                if self.history.undo().is_some() {
                    log::info!("Undo (cursor {})", self.history.cursor());
                    self.after_history_move();
                }
            }
            EditorAction::Redo => {
                if self.history.redo().is_some() {
                    log::info!("Redo (cursor {})", self.history.cursor());
                    self.after_history_move();
                }
            }
            EditorAction::DeleteSelected => self.delete_selected(),
        }
    }

    fn apply(&mut self, outcome: DrawingOutcome) {
        match outcome {
            DrawingOutcome::Unchanged => {}
            DrawingOutcome::Updated | DrawingOutcome::Cancelled | DrawingOutcome::Selected(_) => {
                self.needs_redraw = true;
            }
            DrawingOutcome::Committed(shape) => self.commit(shape),
        }
    }

    /// Add a finished shape with a fresh id, select it and ask for its label.
    fn commit(&mut self, shape: Shape) {
        let id = self.ids.next_id();
        let kind = shape.kind_name();
        let updated = self
            .annotations()
            .with_appended(Annotation::new(shape).with_id(id.clone()));
        self.history.push(updated);
        log::info!("Added {} annotation {}", kind, id);

        self.session.select(Some(id.clone()));
        self.prompt = Some(LabelPrompt::new(id, None));
        self.needs_redraw = true;
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.session.selected().cloned() else {
            return;
        };
        match self.annotations().without(&id) {
            Some(updated) => {
                self.history.push(updated);
                log::info!("Deleted annotation {}", id);
            }
            None => log::debug!("Selected annotation {} no longer exists", id),
        }
        self.session.select(None);
        self.needs_redraw = true;
    }

    /// Drop a selection that points at an annotation the live set no longer has.
    fn after_history_move(&mut self) {
        if let Some(id) = self.session.selected() {
            if !self.annotations().contains_id(id) {
                self.session.select(None);
            }
        }
        self.needs_redraw = true;
    }

    fn open_prompt_for_selection(&mut self) {
        let Some(id) = self.session.selected() else {
            return;
        };
        let Some(ann) = self.annotations().get(id) else {
            return;
        };
        self.prompt = Some(LabelPrompt::new(id.clone(), ann.label.as_deref()));
    }

    fn confirm_label(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let Some(label) = prompt.label() else {
            log::debug!("Blank label for {} ignored", prompt.target());
            return;
        };

        let current = self
            .annotations()
            .get(prompt.target())
            .and_then(|a| a.label.as_deref());
        if current == Some(label) {
            return;
        }

        if let Some(updated) = self.annotations().with_label(prompt.target(), label) {
            self.history.push(updated);
            log::info!("Labeled annotation {} as {:?}", prompt.target(), label);
            self.needs_redraw = true;
        }
    }

    fn cancel_label(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            log::debug!("Label prompt for {} cancelled", prompt.target());
        }
    }

    fn save(&mut self) {
        let count = self.annotations().len();
        match self.backend.save(self.image, annotations_of(&self.history)) {
            Ok(()) => {
                self.saved_revision = self.history.current_revision();
                log::info!("Saved {} annotations for image {}", count, self.image);
                self.status = Some(StatusMessage::success(format!(
                    "Saved {} annotations",
                    count
                )));
            }
            Err(e) => {
                log::error!("Failed to save annotations for image {}: {}", self.image, e);
                self.status = Some(StatusMessage::error(format!("Save failed: {}", e)));
            }
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let result = self
            .backend
            .export(self.image, format)
            .and_then(|file| self.sink.deliver(file));
        match result {
            Ok(path) => {
                log::info!("Exported image {} as {} to {:?}", self.image, format.name(), path);
                self.status = Some(StatusMessage::success(format!(
                    "Exported {} to {}",
                    format.name(),
                    path.display()
                )));
            }
            Err(e) => {
                log::error!("Failed to export image {} as {}: {}", self.image, format.name(), e);
                self.status = Some(StatusMessage::error(format!(
                    "{} export failed: {}",
                    format.name(),
                    e
                )));
            }
        }
    }
}

/// Live set of a history log, borrowed independently of the rest of the editor.
fn annotations_of(history: &HistoryLog) -> &AnnotationSet {
    history.current().unwrap_or(&EMPTY_SET)
}
