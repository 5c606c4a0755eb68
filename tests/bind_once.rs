//! Tests for one-shot bindings and their deferred removal.

mod test_utils;

use keybinds::host::{Element, KeyEvent};
use keybinds::keybindings::{invoke, BindOptions, KeybindError, Registry};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use test_utils::*;

#[test]
fn test_fires_once_then_gone() {
    let (root, registry) = registry();
    let hits = counter();
    let binding = registry.bind_once("x", counting(&hits)).unwrap();
    assert!(binding.is_once());

    press(&root, "x");
    assert_eq!(hits.get(), 1);

    press(&root, "x");
    assert_eq!(hits.get(), 1);
    assert!(!registry.remove(&binding));
    assert!(registry.bindings_for("x").is_empty());
    assert!(registry.bindings_for("X").is_empty());
}

#[test]
fn test_non_matching_event_does_not_consume() {
    let (root, registry) = registry();
    let hits = counter();
    registry.bind_once("x", counting(&hits).ctrl()).unwrap();

    press(&root, "x");
    assert_eq!(hits.get(), 0);
    assert_eq!(registry.bindings_for("x").len(), 1);

    send(&root, KeyEvent::new("x").with_ctrl(true));
    assert_eq!(hits.get(), 1);
    assert!(registry.is_empty());
}

#[test]
fn test_disabled_one_shot_waits() {
    let (root, registry) = registry();
    let hits = counter();
    let binding = registry.bind_once("x", counting(&hits)).unwrap();

    binding.set_enabled(false);
    press(&root, "x");
    assert_eq!(registry.len(), 1);

    binding.set_enabled(true);
    press(&root, "x");
    assert_eq!(hits.get(), 1);
    assert!(registry.is_empty());
}

// ============================================================================
// Deferred Removal
// ============================================================================

mod deferred {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removal_waits_for_end_of_pass() {
        let (root, registry) = registry();
        let observed = Rc::new(Cell::new((0usize, 0usize)));

        registry
            .bind_once("x", BindOptions::new(|_| Ok(())))
            .unwrap();

        let reg = registry.clone();
        let seen = Rc::clone(&observed);
        registry
            .bind(
                "x",
                BindOptions::new(move |_| {
                    seen.set((reg.pending_removals(), reg.bindings_for("x").len()));
                    Ok(())
                }),
            )
            .unwrap();

        press(&root, "x");
        // The one-shot was still registered while its sibling ran
        assert_eq!(observed.get(), (1, 2));
        assert_eq!(registry.pending_removals(), 0);
        assert_eq!(registry.bindings_for("x").len(), 1);
    }

    #[test]
    fn test_scoped_one_shot_survives_until_event_finishes_bubbling() {
        let (root, registry) = registry();
        let panel = Element::child("panel", &root);
        let observed = Rc::new(Cell::new(None));

        let one_shot = registry
            .bind_once("x", BindOptions::new(|_| Ok(())).target(panel.clone()))
            .unwrap();

        let reg = registry.clone();
        let target = panel.clone();
        let seen = Rc::clone(&observed);
        registry
            .bind(
                "x",
                BindOptions::new(move |_| {
                    seen.set(Some(reg.scoped_bindings(&target).len()));
                    Ok(())
                }),
            )
            .unwrap();

        press(&panel, "x");
        // Still registered when the event reached the root listener
        assert_eq!(observed.get(), Some(1));
        assert!(registry.scoped_bindings(&panel).is_empty());
        assert!(!one_shot.remove());
    }

    #[test]
    fn test_panicking_action_does_not_stall_later_removals() {
        let (root, registry) = registry();
        registry
            .bind("p", BindOptions::new(|_| panic!("action blew up")))
            .unwrap();

        let panicked = std::panic::catch_unwind(AssertUnwindSafe(|| {
            root.dispatch_key(&mut KeyEvent::new("p"))
        }));
        assert!(panicked.is_err());

        let hits = counter();
        registry.bind_once("x", counting(&hits)).unwrap();
        press(&root, "x");
        assert_eq!(registry.pending_removals(), 0);
        assert!(registry.bindings_for("x").is_empty());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_two_one_shots_on_same_key_both_fire() {
        let (root, registry) = registry();
        let log = journal();
        registry.bind_once("y", recording(&log, "a")).unwrap();
        registry.bind_once("y", recording(&log, "b")).unwrap();

        press(&root, "y");
        press(&root, "y");
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_direct_invoke_queues_until_run_deferred() {
        let (_root, registry) = registry();
        let hits = counter();
        registry.bind_once("z", counting(&hits)).unwrap();

        let candidates = registry.bindings_for("z");
        invoke(&mut KeyEvent::new("z"), &candidates).unwrap();
        invoke(&mut KeyEvent::new("z"), &candidates).unwrap();
        assert_eq!(hits.get(), 1, "spent binding must not fire again");
        assert_eq!(registry.pending_removals(), 1);

        assert_eq!(registry.run_deferred(), 1);
        assert!(registry.is_empty());
        assert_eq!(registry.run_deferred(), 0);
    }

    #[test]
    fn test_manual_remove_before_flush() {
        let (_root, registry) = registry();
        let binding = registry.bind_once("z", BindOptions::new(|_| Ok(()))).unwrap();

        let candidates = registry.bindings_for("z");
        invoke(&mut KeyEvent::new("z"), &candidates).unwrap();
        assert!(binding.remove());
        assert_eq!(registry.run_deferred(), 0);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_failing_one_shot_still_removed_and_error_surfaces() {
    let (root, registry) = registry();
    registry
        .bind_once("e", BindOptions::new(|_| anyhow::bail!("boom")))
        .unwrap();

    let mut event = KeyEvent::new("e");
    let err = root.dispatch_key(&mut event).unwrap_err();
    assert!(matches!(err, KeybindError::Action { .. }));
    assert!(registry.is_empty());

    press(&root, "e");
}

#[test]
fn test_scoped_one_shot() {
    let root = Element::root("screen");
    let registry = Registry::new(root.clone());
    let panel = Element::child("panel", &root);
    let hits = counter();
    registry
        .bind_once("p", counting(&hits).target(panel.clone()))
        .unwrap();

    press(&panel, "p");
    press(&panel, "P");
    assert_eq!(hits.get(), 1);
    assert!(registry.scoped_bindings(&panel).is_empty());
}
