//! Host environment: key events, event targets, event turns, and terminal
//! input.

mod event;
mod target;
mod terminal;
mod turn;

pub use event::KeyEvent;
pub use target::{key_listener, Element, EventTarget, KeyListener};
pub use terminal::TerminalInput;
pub use turn::{after_turn, in_turn, Turn};
