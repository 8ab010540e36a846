//! Keyboard and context-menu commands.

use crate::editor::{Alignment, Editor, NudgeDirection};
use crate::error::EditorResult;

/// A key press with modifiers, as reported by the host.
///
/// `key` uses DOM key names ("z", "Delete", "ArrowLeft"). `ctrl` is also set
/// for the platform command key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, ctrl: bool, shift: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
            shift,
        }
    }

    /// Display form, e.g. "Ctrl+Shift+Z".
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        if self.key.chars().count() == 1 {
            parts.push(self.key.to_uppercase());
        } else {
            parts.push(self.key.clone());
        }
        parts.join("+")
    }
}

/// Every operation reachable from a shortcut or the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Delete,
    SelectAll,
    Deselect,
    Nudge { direction: NudgeDirection, fast: bool },
    BringToFront,
    BringForward,
    SendBackwards,
    SendToBack,
    ToggleLock,
    Align(Alignment),
    ZoomIn,
    ZoomOut,
    AutoZoom,
}

impl Command {
    /// Map a key press to a command.
    pub fn from_shortcut(chord: &KeyChord) -> Option<Self> {
        let key = chord.key.to_ascii_lowercase();
        let command = match (key.as_str(), chord.ctrl, chord.shift) {
            ("z", true, false) => Command::Undo,
            ("z", true, true) | ("y", true, _) => Command::Redo,
            ("c", true, false) => Command::Copy,
            ("x", true, false) => Command::Cut,
            ("v", true, false) => Command::Paste,
            ("a", true, false) => Command::SelectAll,
            ("delete" | "backspace", false, _) => Command::Delete,
            ("escape", false, _) => Command::Deselect,
            ("arrowup", false, fast) => Command::Nudge {
                direction: NudgeDirection::Up,
                fast,
            },
            ("arrowdown", false, fast) => Command::Nudge {
                direction: NudgeDirection::Down,
                fast,
            },
            ("arrowleft", false, fast) => Command::Nudge {
                direction: NudgeDirection::Left,
                fast,
            },
            ("arrowright", false, fast) => Command::Nudge {
                direction: NudgeDirection::Right,
                fast,
            },
            ("]", true, true) => Command::BringToFront,
            ("]", true, false) => Command::BringForward,
            ("[", true, false) => Command::SendBackwards,
            ("[", true, true) => Command::SendToBack,
            ("l", true, true) => Command::ToggleLock,
            ("=" | "+", true, _) => Command::ZoomIn,
            ("-", true, _) => Command::ZoomOut,
            ("0", true, false) => Command::AutoZoom,
            _ => return None,
        };
        Some(command)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Copy => "Copy selection",
            Command::Cut => "Cut selection",
            Command::Paste => "Paste",
            Command::Delete => "Delete selection",
            Command::SelectAll => "Select all",
            Command::Deselect => "Clear selection",
            Command::Nudge { fast: false, .. } => "Nudge selection",
            Command::Nudge { fast: true, .. } => "Nudge selection further",
            Command::BringToFront => "Bring to front",
            Command::BringForward => "Bring forward",
            Command::SendBackwards => "Send backwards",
            Command::SendToBack => "Send to back",
            Command::ToggleLock => "Lock or unlock selection",
            Command::Align(_) => "Align to workspace",
            Command::ZoomIn => "Zoom in",
            Command::ZoomOut => "Zoom out",
            Command::AutoZoom => "Fit workspace",
        }
    }

    /// Default shortcuts, for help screens.
    pub fn shortcuts() -> Vec<(KeyChord, Command)> {
        [
            KeyChord::new("z", true, false),
            KeyChord::new("z", true, true),
            KeyChord::new("y", true, false),
            KeyChord::new("c", true, false),
            KeyChord::new("x", true, false),
            KeyChord::new("v", true, false),
            KeyChord::new("a", true, false),
            KeyChord::new("Delete", false, false),
            KeyChord::new("Backspace", false, false),
            KeyChord::new("Escape", false, false),
            KeyChord::new("ArrowLeft", false, false),
            KeyChord::new("ArrowLeft", false, true),
            KeyChord::new("]", true, true),
            KeyChord::new("]", true, false),
            KeyChord::new("[", true, false),
            KeyChord::new("[", true, true),
            KeyChord::new("l", true, true),
            KeyChord::new("=", true, false),
            KeyChord::new("-", true, false),
            KeyChord::new("0", true, false),
        ]
        .into_iter()
        .filter_map(|chord| Command::from_shortcut(&chord).map(|command| (chord, command)))
        .collect()
    }
}

impl Editor {
    /// Run a command. Returns whether it changed anything.
    pub fn execute(&mut self, command: Command) -> EditorResult<bool> {
        log::debug!("Executing {command:?}");
        match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Copy => Ok(self.copy()),
            Command::Cut => Ok(self.cut()? > 0),
            Command::Paste => Ok(!self.paste()?.is_empty()),
            Command::Delete => Ok(self.delete()? > 0),
            Command::SelectAll => Ok(self.select_all()),
            Command::Deselect => Ok(self.clear_selection()),
            Command::Nudge { direction, fast } => self.nudge(direction, fast),
            Command::BringToFront => self.bring_to_front(),
            Command::BringForward => self.bring_forward(),
            Command::SendBackwards => self.send_backwards(),
            Command::SendToBack => self.send_to_back(),
            Command::ToggleLock => self.toggle_lock(),
            Command::Align(alignment) => self.align_to_workspace(alignment),
            Command::ZoomIn => {
                self.zoom_in();
                Ok(true)
            }
            Command::ZoomOut => {
                self.zoom_out();
                Ok(true)
            }
            Command::AutoZoom => self.auto_zoom().map(|_| true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::shapes::ShapeKind;

    fn chord(key: &str, ctrl: bool, shift: bool) -> KeyChord {
        KeyChord::new(key, ctrl, shift)
    }

    #[test]
    fn test_shortcut_mapping() {
        assert_eq!(Command::from_shortcut(&chord("z", true, false)), Some(Command::Undo));
        assert_eq!(Command::from_shortcut(&chord("Z", true, true)), Some(Command::Redo));
        assert_eq!(Command::from_shortcut(&chord("y", true, false)), Some(Command::Redo));
        assert_eq!(Command::from_shortcut(&chord("c", true, false)), Some(Command::Copy));
        assert_eq!(Command::from_shortcut(&chord("v", true, false)), Some(Command::Paste));
        assert_eq!(Command::from_shortcut(&chord("Backspace", false, false)), Some(Command::Delete));
        assert_eq!(Command::from_shortcut(&chord("a", true, false)), Some(Command::SelectAll));
        assert_eq!(Command::from_shortcut(&chord("Escape", false, false)), Some(Command::Deselect));
        assert_eq!(
            Command::from_shortcut(&chord("ArrowUp", false, true)),
            Some(Command::Nudge {
                direction: NudgeDirection::Up,
                fast: true
            })
        );
        assert_eq!(Command::from_shortcut(&chord("q", false, false)), None);
        assert_eq!(Command::from_shortcut(&chord("z", false, false)), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(chord("z", true, true).format(), "Ctrl+Shift+Z");
        assert_eq!(chord("Delete", false, false).format(), "Delete");
    }

    #[test]
    fn test_every_listed_shortcut_maps() {
        let shortcuts = Command::shortcuts();
        assert_eq!(shortcuts.len(), 20);
        assert!(shortcuts.iter().all(|(_, command)| !command.description().is_empty()));
    }

    #[test]
    fn test_execute_keyboard_flow() {
        let mut editor = Editor::new(EditorConfig::default()).unwrap();
        let key = editor.add_shape(ShapeKind::Rectangle, None).unwrap();
        let left = editor.scene().get(key).unwrap().frame.left;

        let right = chord("ArrowRight", false, true);
        let command = Command::from_shortcut(&right).unwrap();
        assert!(editor.execute(command).unwrap());
        assert_eq!(editor.scene().get(key).unwrap().frame.left, left + 10.0);

        assert!(editor.execute(Command::Copy).unwrap());
        assert!(editor.execute(Command::Paste).unwrap());
        assert_eq!(editor.scene().len(), 2);
        assert!(editor.execute(Command::Undo).unwrap());
        assert_eq!(editor.scene().len(), 1);
        assert!(editor.execute(Command::Redo).unwrap());
        assert!(editor.execute(Command::SelectAll).unwrap());
        assert!(editor.execute(Command::Delete).unwrap());
        assert!(editor.scene().is_empty());
        assert!(!editor.execute(Command::Deselect).unwrap());
    }
}
