//! Editor message types.
//!
//! All user input and actions reach the editor as messages, one at a time.

use crate::backend::ExportFormat;
use crate::drawing::ToolMode;
use crate::input::{Key, Modifiers, PointerInput, TouchInput};

/// Messages that can be sent to update editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMessage {
    // Tools and drawing
    /// Switch drawing tool
    SelectTool(ToolMode),
    /// Mouse / pen input in canvas coordinates
    Pointer(PointerInput),
    /// Touch input in canvas coordinates
    Touch(TouchInput),
    /// Commit the polygon being drawn
    FinishPolygon,
    /// Discard the shape being drawn and clear the selection
    Cancel,

    // Keyboard
    /// Key press, resolved through the key bindings
    Key { key: Key, modifiers: Modifiers },

    // History and selection
    Undo,
    Redo,
    DeleteSelected,

    // Label prompt
    /// Open the label prompt for the selected annotation
    EditLabel,
    /// Prompt text changed
    LabelInput(String),
    /// Apply the prompt text as label
    ConfirmLabel,
    /// Close the prompt without changes
    CancelLabel,

    // Persistence
    /// Send the current annotations to the backend
    Save,
    /// Fetch an export document and hand it to the download sink
    Export(ExportFormat),
}

impl EditorMessage {
    pub fn key(key: Key, modifiers: Modifiers) -> Self {
        Self::Key { key, modifiers }
    }
}
