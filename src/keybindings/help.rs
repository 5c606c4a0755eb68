//! Help text generated from the live registry.

use super::{Binding, Registry};

/// One line per global binding, in registration order.
///
/// Lines look like `"  Ctrl+s        Save"`.
pub fn generate_help(registry: &Registry) -> Vec<String> {
    registry.bindings().iter().map(format_binding).collect()
}

/// Help lines for an arbitrary binding list, e.g. a target's bindings.
pub fn generate_help_for(bindings: &[Binding]) -> Vec<String> {
    bindings.iter().map(format_binding).collect()
}

fn format_binding(binding: &Binding) -> String {
    let mut line = format!(
        "  {:14}{}",
        binding.display(),
        binding.description().unwrap_or("-")
    );
    if binding.is_once() {
        line.push_str(" (once)");
    }
    if !binding.is_enabled() {
        line.push_str(" (disabled)");
    }
    line
}
