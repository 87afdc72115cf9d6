//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The table
//! lives here so native and web hosts share one binding set. This is the
//! externally documented input surface: Ctrl/Cmd+Z undo, Ctrl/Cmd+Y or
//! Ctrl/Cmd+Shift+Z redo, arrow-key nudge (Shift for fine steps),
//! Delete/Backspace, Ctrl/Cmd+D duplicate, Escape, and the
//! Ctrl/Cmd+bracket z-order steps.

use crate::input::Modifiers;

/// Arrow-key nudge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDir {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDir {
    /// Unit delta (mm-sign only; the session applies the distance).
    pub const fn unit(self) -> (f32, f32) {
        match self {
            NudgeDir::Left => (-1.0, 0.0),
            NudgeDir::Right => (1.0, 0.0),
            NudgeDir::Up => (0.0, -1.0),
            NudgeDir::Down => (0.0, 1.0),
        }
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Duplicate,
    Save,

    // ── Geometry ──
    Nudge { dir: NudgeDir, fine: bool },

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    // ── UI ──
    Deselect,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        // ── Modifier combos first (most specific) ──
        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "[" => Some(ShortcutAction::SendToBack),
                "]" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "s" | "S" => Some(ShortcutAction::Save),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        if let Some(dir) = match key {
            "ArrowLeft" => Some(NudgeDir::Left),
            "ArrowRight" => Some(NudgeDir::Right),
            "ArrowUp" => Some(NudgeDir::Up),
            "ArrowDown" => Some(NudgeDir::Down),
            _ => None,
        } {
            return Some(ShortcutAction::Nudge {
                dir,
                fine: modifiers.shift,
            });
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
