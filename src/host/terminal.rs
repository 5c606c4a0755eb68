//! Terminal input source backed by crossterm.

use super::{Element, KeyEvent};
use crate::keybindings::KeybindError;
use anyhow::Result;
use crossterm::event::{self, Event};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Reads terminal key presses and delivers them to the focused element.
///
/// Without a focused element, events go straight to the root surface.
#[derive(Debug)]
pub struct TerminalInput {
    root: Rc<Element>,
    focus: RefCell<Option<Rc<Element>>>,
}

impl TerminalInput {
    pub fn new(root: Rc<Element>) -> Self {
        Self {
            root,
            focus: RefCell::new(None),
        }
    }

    /// Move focus to `element`, or back to the root surface with `None`.
    pub fn set_focus(&self, element: Option<Rc<Element>>) {
        *self.focus.borrow_mut() = element;
    }

    pub fn focused(&self) -> Option<Rc<Element>> {
        self.focus.borrow().clone()
    }

    /// Deliver an already-built event as if it came from the terminal.
    pub fn deliver(&self, event: &mut KeyEvent) -> Result<(), KeybindError> {
        match self.focused() {
            Some(element) => element.dispatch_key(event),
            None => self.root.dispatch_key(event),
        }
    }

    /// Wait up to `timeout` for the next terminal key press.
    ///
    /// The event is returned undelivered; pass it to [`Self::deliver`]
    /// and then apply default handling unless a binding prevented it.
    pub fn next_key(&self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(raw) => Ok(KeyEvent::from_crossterm(&raw)),
            _ => Ok(None),
        }
    }
}
