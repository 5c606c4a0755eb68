//! Dispatch of one key event against a candidate list.

use super::{Binding, KeybindError};
use crate::host::KeyEvent;

/// Run every enabled binding in `candidates` whose modifiers match `event`.
///
/// Candidates are the bindings already looked up for the event's key; they
/// run in list order and every match fires, there is no first-match stop.
/// A matching binding's suppression flags are applied to the event after its
/// action returns.
///
/// An empty candidate list is a caller error ([`KeybindError::Lookup`]).
/// An action error aborts the pass and is returned as
/// [`KeybindError::Action`]; a one-shot binding is still expired in that
/// case.
pub fn invoke(event: &mut KeyEvent, candidates: &[Binding]) -> Result<(), KeybindError> {
    if candidates.is_empty() {
        return Err(KeybindError::Lookup {
            key: event.key.clone(),
        });
    }

    tracing::trace!(key = %event.key, candidates = candidates.len(), "dispatch pass");

    for binding in candidates {
        if !binding.is_enabled() || binding.is_spent() {
            continue;
        }
        if !binding.matches_modifiers(event) {
            continue;
        }

        let outcome = binding.run(event);
        if binding.is_once() {
            binding.expire();
        }
        outcome.map_err(|source| KeybindError::Action {
            key: event.key.clone(),
            source,
        })?;

        if binding.prevents_default() {
            event.prevent_default();
        }
        if binding.stops_propagation() {
            event.stop_propagation();
        }
    }

    Ok(())
}
