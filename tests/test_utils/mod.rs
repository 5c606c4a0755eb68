//! Test utilities and fixtures for keybinds tests
#![allow(dead_code)]

use keybinds::host::{Element, KeyEvent};
use keybinds::keybindings::{BindOptions, Registry};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A root surface and a registry listening on it.
pub fn registry() -> (Rc<Element>, Registry) {
    let root = Element::root("screen");
    let registry = Registry::new(root.clone());
    (root, registry)
}

/// Options whose action bumps `hits`.
pub fn counting(hits: &Rc<Cell<usize>>) -> BindOptions {
    let hits = Rc::clone(hits);
    BindOptions::new(move |_| {
        hits.set(hits.get() + 1);
        Ok(())
    })
}

/// Options whose action appends `label` to `log`.
pub fn recording(log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> BindOptions {
    let log = Rc::clone(log);
    BindOptions::new(move |_| {
        log.borrow_mut().push(label);
        Ok(())
    })
}

pub fn counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

pub fn journal() -> Rc<RefCell<Vec<&'static str>>> {
    Rc::new(RefCell::new(Vec::new()))
}

/// Deliver a plain key press to `target` and return the event.
pub fn press(target: &Element, key: &str) -> KeyEvent {
    let mut event = KeyEvent::new(key);
    target.dispatch_key(&mut event).unwrap();
    event
}

/// Deliver a prepared event to `target` and return it.
pub fn send(target: &Element, mut event: KeyEvent) -> KeyEvent {
    target.dispatch_key(&mut event).unwrap();
    event
}
