//! Keyboard shortcuts for the editor.
//!
//! Fixed shortcuts (undo, redo, delete, cancel, finish) follow platform conventions.
//! Tool hotkeys are customizable and persisted through [`KeyBindingsConfig`].

use crate::drawing::ToolMode;
use crate::input::{Key, Modifiers};

/// Action triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Undo,
    Redo,
    DeleteSelected,
    /// Discard the in-progress shape and clear the selection.
    Cancel,
    FinishPolygon,
    SelectTool(ToolMode),
}

/// Keybinding configuration for the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Hotkey for leaving drawing mode
    pub tool_select: Key,
    /// Hotkey for the box tool
    pub tool_box: Key,
    /// Hotkey for the polygon tool
    pub tool_polygon: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            tool_select: Key::Char('v'),
            tool_box: Key::Char('b'),
            tool_polygon: Key::Char('p'),
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a key press to an editor action, if any.
    ///
    /// Tool hotkeys only fire without Ctrl/Cmd/Alt so they don't shadow shortcuts.
    pub fn action_for(&self, key: Key, modifiers: Modifiers) -> Option<EditorAction> {
        if modifiers.primary() {
            if key.matches_char('z') {
                return Some(if modifiers.shift {
                    EditorAction::Redo
                } else {
                    EditorAction::Undo
                });
            }
            if key.matches_char('y') {
                return Some(EditorAction::Redo);
            }
            return None;
        }

        match key {
            Key::Delete | Key::Backspace => Some(EditorAction::DeleteSelected),
            Key::Escape => Some(EditorAction::Cancel),
            Key::Enter => Some(EditorAction::FinishPolygon),
            _ if modifiers.alt => None,
            _ => self.tool_for_key(key).map(EditorAction::SelectTool),
        }
    }

    /// Get the tool that corresponds to a key press, if any.
    pub fn tool_for_key(&self, key: Key) -> Option<ToolMode> {
        ToolMode::all()
            .iter()
            .copied()
            .find(|tool| keys_match(self.key_for_tool(*tool), key))
    }

    /// Get the hotkey for a specific tool.
    pub fn key_for_tool(&self, tool: ToolMode) -> Key {
        match tool {
            ToolMode::None => self.tool_select,
            ToolMode::Box => self.tool_box,
            ToolMode::Polygon => self.tool_polygon,
        }
    }

    /// Set the hotkey for a tool.
    pub fn set_tool_key(&mut self, tool: ToolMode, key: Key) {
        match tool {
            ToolMode::None => self.tool_select = key,
            ToolMode::Box => self.tool_box = key,
            ToolMode::Polygon => self.tool_polygon = key,
        }
    }

    /// Check if a key is already used by a binding other than `exclude_tool`.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: Key, exclude_tool: Option<ToolMode>) -> Option<String> {
        if matches!(
            key,
            Key::Delete | Key::Backspace | Key::Escape | Key::Enter
        ) {
            return Some("Editor shortcut".to_string());
        }
        ToolMode::all()
            .iter()
            .filter(|tool| Some(**tool) != exclude_tool)
            .find(|tool| keys_match(self.key_for_tool(**tool), key))
            .map(|tool| format!("{} tool", tool.name()))
    }
}

fn keys_match(bound: Key, pressed: Key) -> bool {
    match bound {
        Key::Char(c) => pressed.matches_char(c),
        other => other == pressed,
    }
}

/// Convert a key to a display string.
pub fn key_to_string(key: Key) -> String {
    match key {
        Key::Char(c) => c.to_uppercase().to_string(),
        Key::Enter => "Enter".to_string(),
        Key::Escape => "Escape".to_string(),
        Key::Backspace => "Backspace".to_string(),
        Key::Delete => "Delete".to_string(),
        Key::Tab => "Tab".to_string(),
        Key::Space => "Space".to_string(),
    }
}

/// Parse a display string back into a key. Single characters map to [`Key::Char`].
pub fn key_from_string(s: &str) -> Option<Key> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(Key::Char(c.to_ascii_lowercase()));
    }
    match s.to_ascii_lowercase().as_str() {
        "enter" => Some(Key::Enter),
        "escape" | "esc" => Some(Key::Escape),
        "backspace" => Some(Key::Backspace),
        "delete" | "del" => Some(Key::Delete),
        "tab" => Some(Key::Tab),
        "space" => Some(Key::Space),
        _ => None,
    }
}

/// Keybinding section of the configuration file, with keys stored as strings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KeyBindingsConfig {
    #[serde(default = "default_tool_select")]
    pub tool_select: String,
    #[serde(default = "default_tool_box")]
    pub tool_box: String,
    #[serde(default = "default_tool_polygon")]
    pub tool_polygon: String,
}

fn default_tool_select() -> String {
    key_to_string(KeyBindings::default().tool_select)
}

fn default_tool_box() -> String {
    key_to_string(KeyBindings::default().tool_box)
}

fn default_tool_polygon() -> String {
    key_to_string(KeyBindings::default().tool_polygon)
}

impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self::from(&KeyBindings::default())
    }
}

impl From<&KeyBindings> for KeyBindingsConfig {
    fn from(bindings: &KeyBindings) -> Self {
        Self {
            tool_select: key_to_string(bindings.tool_select),
            tool_box: key_to_string(bindings.tool_box),
            tool_polygon: key_to_string(bindings.tool_polygon),
        }
    }
}

impl KeyBindingsConfig {
    /// Convert back to KeyBindings. Unparseable entries keep their default key.
    pub fn to_keybindings(&self) -> KeyBindings {
        let defaults = KeyBindings::default();
        let parse = |name: &str, value: &str, fallback: Key| {
            key_from_string(value).unwrap_or_else(|| {
                log::warn!("Unknown key {:?} for {}, using {}", value, name, key_to_string(fallback));
                fallback
            })
        };

        KeyBindings {
            tool_select: parse("tool_select", &self.tool_select, defaults.tool_select),
            tool_box: parse("tool_box", &self.tool_box, defaults.tool_box),
            tool_polygon: parse("tool_polygon", &self.tool_polygon, defaults.tool_polygon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_shortcuts() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.action_for(Key::Char('z'), Modifiers::ctrl()),
            Some(EditorAction::Undo)
        );
        assert_eq!(
            keys.action_for(Key::Char('z'), Modifiers::meta()),
            Some(EditorAction::Undo)
        );
        assert_eq!(
            keys.action_for(Key::Char('Z'), Modifiers::ctrl_shift()),
            Some(EditorAction::Redo)
        );
        assert_eq!(
            keys.action_for(Key::Char('y'), Modifiers::ctrl()),
            Some(EditorAction::Redo)
        );
        // Plain Z is not undo
        assert_eq!(keys.action_for(Key::Char('z'), Modifiers::none()), None);
    }

    #[test]
    fn test_editing_keys() {
        let keys = KeyBindings::default();
        let none = Modifiers::none();
        assert_eq!(keys.action_for(Key::Delete, none), Some(EditorAction::DeleteSelected));
        assert_eq!(keys.action_for(Key::Backspace, none), Some(EditorAction::DeleteSelected));
        assert_eq!(keys.action_for(Key::Escape, none), Some(EditorAction::Cancel));
        assert_eq!(keys.action_for(Key::Enter, none), Some(EditorAction::FinishPolygon));
    }

    #[test]
    fn test_tool_hotkeys() {
        let mut keys = KeyBindings::default();
        assert_eq!(
            keys.action_for(Key::Char('B'), Modifiers::none()),
            Some(EditorAction::SelectTool(ToolMode::Box))
        );
        assert_eq!(
            keys.action_for(Key::Char('p'), Modifiers::none()),
            Some(EditorAction::SelectTool(ToolMode::Polygon))
        );
        // Ctrl+B is not a tool switch
        assert_eq!(keys.action_for(Key::Char('b'), Modifiers::ctrl()), None);

        keys.set_tool_key(ToolMode::Box, Key::Char('r'));
        assert_eq!(keys.tool_for_key(Key::Char('r')), Some(ToolMode::Box));
        assert_eq!(keys.tool_for_key(Key::Char('b')), None);
    }

    #[test]
    fn test_key_conflict() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.key_conflict(Key::Char('p'), Some(ToolMode::Box)),
            Some("Polygon tool".to_string())
        );
        assert_eq!(keys.key_conflict(Key::Char('p'), Some(ToolMode::Polygon)), None);
        assert!(keys.key_conflict(Key::Escape, None).is_some());
    }

    #[test]
    fn test_config_round_trip() {
        let mut keys = KeyBindings::default();
        keys.set_tool_key(ToolMode::Polygon, Key::Char('o'));
        let config = KeyBindingsConfig::from(&keys);
        assert_eq!(config.tool_polygon, "O");
        assert_eq!(config.to_keybindings(), keys);

        let broken = KeyBindingsConfig {
            tool_box: "not a key".to_string(),
            ..KeyBindingsConfig::default()
        };
        assert_eq!(broken.to_keybindings().tool_box, Key::Char('b'));
    }
}
