//! Keybinding registry and dispatch.
//!
//! A [`Registry`] maps key labels to [`Binding`]s, globally or scoped to an
//! event target, and attaches one native listener per scope that routes key
//! events through [`invoke`].

mod binding;
mod dispatch;
mod error;
mod help;
mod registry;

pub use binding::{Action, BindOptions, Binding, BindingId, Scope, TargetId};
pub use dispatch::invoke;
pub use error::{KeybindError, ValidationError};
pub use help::{generate_help, generate_help_for};
pub use registry::Registry;

/// Key table entries a binding for `key` is indexed under.
///
/// A single-character key yields its lower- and upper-case forms (once each,
/// so keys without case such as `"1"` yield one entry). Longer labels are
/// used verbatim.
pub fn key_variants(key: &str) -> Vec<String> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let lower: String = c.to_lowercase().collect();
            let upper: String = c.to_uppercase().collect();
            if lower == upper {
                vec![lower]
            } else {
                vec![lower, upper]
            }
        }
        _ => vec![key.to_string()],
    }
}
