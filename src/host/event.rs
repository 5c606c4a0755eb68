//! Key events as seen by bindings.
//!
//! Keys are identified by their label (`"a"`, `"A"`, `"Enter"`, `"F1"`),
//! the same string a host input system reports. Terminal input is converted
//! from crossterm's `KeyEvent` so that a shifted letter keeps its upper-case
//! label and the SHIFT flag, which is how terminals report it. Shifted
//! symbols (`?`, `!`, `:`) drop the flag: the label already carries the
//! shift, and terminals disagree on whether they set it.

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

/// A single key press delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key label as reported by the host
    pub key: String,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub alt_key: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl KeyEvent {
    /// Create an event for `key` with no modifiers held.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl_key: false,
            shift_key: false,
            alt_key: false,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn with_ctrl(mut self, held: bool) -> Self {
        self.ctrl_key = held;
        self
    }

    pub fn with_shift(mut self, held: bool) -> Self {
        self.shift_key = held;
        self
    }

    pub fn with_alt(mut self, held: bool) -> Self {
        self.alt_key = held;
        self
    }

    /// Suppress the host's default handling of this key.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from reaching targets further up the chain.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Convert a terminal key event.
    ///
    /// Returns `None` for releases and for keys that have no label
    /// (media keys, bare modifier presses).
    pub fn from_crossterm(event: &crossterm::event::KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let key = key_label(event.code)?;
        let mods = event.modifiers;
        let shift = match event.code {
            KeyCode::BackTab => true,
            KeyCode::Char(c) if is_shifted_symbol(c) => false,
            _ => mods.contains(KeyModifiers::SHIFT),
        };
        Some(
            Self::new(key)
                .with_ctrl(mods.contains(KeyModifiers::CONTROL))
                .with_shift(shift)
                .with_alt(mods.contains(KeyModifiers::ALT)),
        )
    }
}

/// A printable character with no case of its own, other than space.
fn is_shifted_symbol(c: char) -> bool {
    !c.is_whitespace() && !c.is_alphabetic()
}

/// Label for a terminal key code, using the names browsers report.
fn key_label(code: KeyCode) -> Option<String> {
    let label = match code {
        KeyCode::Char(' ') => " ",
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::F(n) => return Some(format!("F{n}")),
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Backspace => "Backspace",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        _ => return None,
    };
    Some(label.to_string())
}
