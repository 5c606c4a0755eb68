//! Tests for bindings scoped to individual event targets.

mod test_utils;

use keybinds::host::{Element, EventTarget, KeyEvent};
use keybinds::keybindings::{BindOptions, Scope};
use pretty_assertions::assert_eq;
use std::rc::Rc;
use test_utils::*;

// ============================================================================
// Isolation
// ============================================================================

#[test]
fn test_scoped_binding_only_fires_on_its_target() {
    let (root, registry) = registry();
    let editor = Element::child("editor", &root);
    let sidebar = Element::child("sidebar", &root);
    let hits = counter();
    registry
        .bind("a", counting(&hits).target(editor.clone()))
        .unwrap();

    press(&sidebar, "a");
    press(&root, "a");
    assert_eq!(hits.get(), 0);

    press(&editor, "a");
    assert_eq!(hits.get(), 1);
}

#[test]
fn test_global_binding_fires_when_event_bubbles_to_surface() {
    let (root, registry) = registry();
    let editor = Element::child("editor", &root);
    let log = journal();
    registry.bind("g", recording(&log, "global")).unwrap();
    registry
        .bind("g", recording(&log, "editor").target(editor.clone()))
        .unwrap();

    press(&editor, "g");
    assert_eq!(*log.borrow(), vec!["editor", "global"]);
}

#[test]
fn test_global_binding_misses_events_surface_never_sees() {
    let (root, registry) = registry();
    let editor = Element::child("editor", &root);
    let log = journal();
    registry.bind("g", recording(&log, "global")).unwrap();
    registry
        .bind(
            "g",
            recording(&log, "editor")
                .target(editor.clone())
                .stop_propagation(),
        )
        .unwrap();

    let event = press(&editor, "g");
    assert!(event.is_propagation_stopped());
    assert_eq!(*log.borrow(), vec!["editor"]);
}

#[test]
fn test_detached_element_does_not_reach_global() {
    let (_root, registry) = registry();
    let floating = Element::root("floating");
    let hits = counter();
    registry.bind("g", counting(&hits)).unwrap();

    press(&floating, "g");
    assert_eq!(hits.get(), 0);
}

// ============================================================================
// Listener Attachment
// ============================================================================

mod attachment {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_listener_per_target() {
        let (root, registry) = registry();
        let editor = Element::child("editor", &root);
        let sidebar = Element::child("sidebar", &root);

        registry
            .bind("a", BindOptions::new(|_| Ok(())).target(editor.clone()))
            .unwrap();
        registry
            .bind("b", BindOptions::new(|_| Ok(())).target(editor.clone()))
            .unwrap();
        registry
            .bind_once("c", BindOptions::new(|_| Ok(())).target(sidebar.clone()))
            .unwrap();

        assert_eq!(editor.listener_count(), 1);
        assert_eq!(sidebar.listener_count(), 1);
        assert_eq!(root.listener_count(), 0, "no global bind yet");
    }

    #[test]
    fn test_same_target_shares_scope() {
        let (root, registry) = registry();
        let editor = Element::child("editor", &root);
        let a = registry
            .bind("a", BindOptions::new(|_| Ok(())).target(editor.clone()))
            .unwrap();
        let b = registry
            .bind("b", BindOptions::new(|_| Ok(())).target(editor.clone()))
            .unwrap();

        assert!(matches!(a.scope(), Scope::Target(_)));
        assert_eq!(a.scope(), b.scope());
    }

    #[test]
    fn test_dyn_target_handle() {
        let (root, registry) = registry();
        let editor = Element::child("editor", &root);
        let as_dyn: Rc<dyn EventTarget> = editor.clone();
        let hits = counter();
        registry
            .bind("a", counting(&hits).target(as_dyn.clone()))
            .unwrap();

        assert_eq!(registry.scoped_bindings(&as_dyn).len(), 1);
        assert_eq!(registry.scoped_bindings(&editor).len(), 1);
        press(&editor, "a");
        assert_eq!(hits.get(), 1);
    }
}

// ============================================================================
// Target Lifetime
// ============================================================================

mod lifetime {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_does_not_keep_target_alive() {
        let (root, registry) = registry();
        let editor = Element::child("editor", &root);
        registry
            .bind("a", BindOptions::new(|_| Ok(())).target(editor.clone()))
            .unwrap();

        assert_eq!(Rc::strong_count(&editor), 1);
    }

    #[test]
    fn test_dropped_target_bindings_become_unreachable() {
        let (root, registry) = registry();
        let editor = Element::child("editor", &root);
        let stale = registry
            .bind("a", BindOptions::new(|_| Ok(())).target(editor.clone()))
            .unwrap();
        drop(editor);

        let sidebar = Element::child("sidebar", &root);
        let fresh = registry
            .bind("a", BindOptions::new(|_| Ok(())).target(sidebar.clone()))
            .unwrap();

        assert!(!stale.remove());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.scoped_bindings(&sidebar), vec![fresh]);
    }
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn test_remove_scoped_binding() {
    let (root, registry) = registry();
    let editor = Element::child("editor", &root);
    let hits = counter();
    let binding = registry
        .bind("q", counting(&hits).target(editor.clone()))
        .unwrap();

    assert!(registry.remove(&binding));
    assert!(!registry.remove(&binding));
    assert!(registry.scoped_bindings(&editor).is_empty());

    press(&editor, "q");
    press(&editor, "Q");
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_modifiers_apply_within_scope() {
    let (root, registry) = registry();
    let editor = Element::child("editor", &root);
    let hits = counter();
    registry
        .bind("s", counting(&hits).ctrl().target(editor.clone()))
        .unwrap();

    send(&editor, KeyEvent::new("s"));
    assert_eq!(hits.get(), 0);
    send(&editor, KeyEvent::new("S").with_ctrl(true));
    assert_eq!(hits.get(), 1);
}
