//! Event targets: things key listeners can be attached to.

use super::{KeyEvent, Turn};
use crate::keybindings::KeybindError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Callback registered on an event target.
pub type KeyListener = Rc<dyn Fn(&mut KeyEvent) -> Result<(), KeybindError>>;

/// Wrap a closure as a [`KeyListener`].
pub fn key_listener<F>(f: F) -> KeyListener
where
    F: Fn(&mut KeyEvent) -> Result<(), KeybindError> + 'static,
{
    Rc::new(f)
}

/// Native subscription mechanism offered by the host.
pub trait EventTarget {
    /// Register a listener that receives every key press delivered here.
    fn add_key_listener(&self, listener: KeyListener);
}

/// An in-process event target with an optional parent.
///
/// Key events delivered to an element run its own listeners and then
/// bubble to the parent chain until a listener stops propagation. The root
/// of the chain plays the role of the global input surface.
pub struct Element {
    name: String,
    parent: Option<Rc<Element>>,
    listeners: RefCell<Vec<KeyListener>>,
}

impl Element {
    /// Create a root element (no parent).
    pub fn root(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            parent: None,
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Create an element whose events bubble to `parent`.
    pub fn child(name: impl Into<String>, parent: &Rc<Element>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            parent: Some(Rc::clone(parent)),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of listeners attached to this element only.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver a key event here and bubble it up the parent chain.
    ///
    /// The whole delivery is one [`Turn`]. The first listener error aborts
    /// delivery and is returned.
    pub fn dispatch_key(&self, event: &mut KeyEvent) -> Result<(), KeybindError> {
        let _turn = Turn::begin();
        let mut current = Some(self);
        while let Some(element) = current {
            // Listeners may attach new listeners while running
            let listeners: Vec<KeyListener> = element.listeners.borrow().clone();
            for listener in listeners {
                listener(event)?;
            }
            if event.is_propagation_stopped() {
                tracing::trace!(element = %element.name, key = %event.key, "propagation stopped");
                break;
            }
            current = element.parent.as_deref();
        }
        Ok(())
    }
}

impl EventTarget for Element {
    fn add_key_listener(&self, listener: KeyListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.clone()))
            .field("listeners", &self.listener_count())
            .finish()
    }
}
