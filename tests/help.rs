//! Tests for help text generated from the registry.

mod test_utils;

use keybinds::host::Element;
use keybinds::keybindings::{generate_help, generate_help_for, BindOptions};
use pretty_assertions::assert_eq;
use test_utils::*;

#[test]
fn test_help_lists_global_bindings_in_order() {
    let (_root, registry) = registry();
    registry
        .bind("s", BindOptions::new(|_| Ok(())).ctrl().description("Save"))
        .unwrap();
    registry.bind("Enter", BindOptions::new(|_| Ok(()))).unwrap();

    assert_eq!(
        generate_help(&registry),
        vec!["  Ctrl+s        Save".to_string(), "  Enter         -".to_string()]
    );
}

#[test]
fn test_modifier_order_is_ctrl_alt_shift() {
    let (_root, registry) = registry();
    let binding = registry
        .bind("F1", BindOptions::new(|_| Ok(())).shift().alt().ctrl())
        .unwrap();
    assert_eq!(binding.display(), "Ctrl+Alt+Shift+F1");
}

#[test]
fn test_help_marks_once_and_disabled() {
    let (_root, registry) = registry();
    registry
        .bind_once("w", BindOptions::new(|_| Ok(())).description("Welcome"))
        .unwrap();
    let paused = registry
        .bind("p", BindOptions::new(|_| Ok(())).description("Pause"))
        .unwrap();
    paused.set_enabled(false);

    let help = generate_help(&registry);
    assert!(help[0].ends_with("Welcome (once)"), "got: {:?}", help[0]);
    assert!(help[1].ends_with("Pause (disabled)"), "got: {:?}", help[1]);
}

#[test]
fn test_scoped_help() {
    let (root, registry) = registry();
    let editor = Element::child("editor", &root);
    registry
        .bind(
            "s",
            BindOptions::new(|_| Ok(()))
                .description("Save")
                .target(editor.clone()),
        )
        .unwrap();

    assert!(generate_help(&registry).is_empty());
    let scoped = generate_help_for(&registry.scoped_bindings(&editor));
    assert_eq!(scoped.len(), 1);
    assert!(scoped[0].contains("Save"));
}
