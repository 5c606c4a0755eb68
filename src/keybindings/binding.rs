//! Binding records and the options used to create them.

use super::registry::RegistryInner;
use super::ValidationError;
use crate::host::{EventTarget, KeyEvent};
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked with the triggering event.
pub type Action = Rc<dyn Fn(&mut KeyEvent) -> anyhow::Result<()>>;

/// Registry-unique binding identity. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub(crate) u64);

impl BindingId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque identity assigned to a scoping target on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub(crate) u64);

/// Where a binding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Any key press observed by the global input surface
    Global,
    /// Key presses delivered to one specific target
    Target(TargetId),
}

/// Options for [`Registry::bind`](super::Registry::bind).
///
/// A bare closure or function converts into options carrying only that
/// action:
///
/// ```ignore
/// fn save(_: &mut KeyEvent) -> anyhow::Result<()> { Ok(()) }
/// registry.bind("s", save)?;
/// registry.bind("s", BindOptions::new(|_| Ok(())).ctrl().prevent_default())?;
/// ```
#[derive(Clone)]
pub struct BindOptions {
    pub(crate) action: Option<Action>,
    pub(crate) ctrl: bool,
    pub(crate) shift: bool,
    pub(crate) alt: bool,
    pub(crate) enabled: bool,
    pub(crate) prevent_default: bool,
    pub(crate) stop_propagation: bool,
    pub(crate) target: Option<Rc<dyn EventTarget>>,
    pub(crate) description: Option<String>,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            action: None,
            ctrl: false,
            shift: false,
            alt: false,
            enabled: true,
            prevent_default: false,
            stop_propagation: false,
            target: None,
            description: None,
        }
    }
}

impl BindOptions {
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&mut KeyEvent) -> anyhow::Result<()> + 'static,
    {
        Self {
            action: Some(Rc::new(action)),
            ..Self::default()
        }
    }

    /// Replace the action.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut KeyEvent) -> anyhow::Result<()> + 'static,
    {
        self.action = Some(Rc::new(action));
        self
    }

    /// Require Ctrl to be held.
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Require Shift to be held.
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Require Alt to be held.
    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Set all three modifier requirements at once.
    pub fn modifiers(mut self, ctrl: bool, shift: bool, alt: bool) -> Self {
        self.ctrl = ctrl;
        self.shift = shift;
        self.alt = alt;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    pub fn stop_propagation(mut self) -> Self {
        self.stop_propagation = true;
        self
    }

    /// Scope the binding to `target` instead of the global surface.
    pub fn target(mut self, target: Rc<dyn EventTarget>) -> Self {
        self.target = Some(target);
        self
    }

    /// Human-readable label used by help output.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn validate(&self, key: &str) -> Result<(), ValidationError> {
        if key.is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        if self.action.is_none() {
            return Err(ValidationError::MissingAction);
        }
        Ok(())
    }
}

impl<F> From<F> for BindOptions
where
    F: Fn(&mut KeyEvent) -> anyhow::Result<()> + 'static,
{
    fn from(action: F) -> Self {
        Self::new(action)
    }
}

impl fmt::Debug for BindOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindOptions")
            .field("has_action", &self.action.is_some())
            .field("ctrl", &self.ctrl)
            .field("shift", &self.shift)
            .field("alt", &self.alt)
            .field("enabled", &self.enabled)
            .field("prevent_default", &self.prevent_default)
            .field("stop_propagation", &self.stop_propagation)
            .field("scoped", &self.target.is_some())
            .field("description", &self.description)
            .finish()
    }
}

pub(crate) struct BindingInner {
    id: BindingId,
    key: String,
    action: Action,
    ctrl: bool,
    shift: bool,
    alt: bool,
    prevent_default: bool,
    stop_propagation: bool,
    enabled: Cell<bool>,
    once: bool,
    spent: Cell<bool>,
    scope: Scope,
    description: Option<String>,
    registry: Weak<RegistryInner>,
}

/// Handle to a registered binding.
///
/// Clones share the same record; identity is the [`BindingId`].
#[derive(Clone)]
pub struct Binding {
    inner: Rc<BindingInner>,
}

impl Binding {
    /// Build a binding from options that already passed validation.
    pub(crate) fn from_options(
        id: BindingId,
        key: &str,
        options: BindOptions,
        once: bool,
        scope: Scope,
        registry: Weak<RegistryInner>,
    ) -> Result<Self, ValidationError> {
        let action = options.action.ok_or(ValidationError::MissingAction)?;
        Ok(Self {
            inner: Rc::new(BindingInner {
                id,
                key: key.to_string(),
                action,
                ctrl: options.ctrl,
                shift: options.shift,
                alt: options.alt,
                prevent_default: options.prevent_default,
                stop_propagation: options.stop_propagation,
                enabled: Cell::new(options.enabled),
                once,
                spent: Cell::new(false),
                scope,
                description: options.description,
                registry,
            }),
        })
    }

    pub fn id(&self) -> BindingId {
        self.inner.id
    }

    /// Key as given at registration.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn ctrl(&self) -> bool {
        self.inner.ctrl
    }

    pub fn shift(&self) -> bool {
        self.inner.shift
    }

    pub fn alt(&self) -> bool {
        self.inner.alt
    }

    pub fn prevents_default(&self) -> bool {
        self.inner.prevent_default
    }

    pub fn stops_propagation(&self) -> bool {
        self.inner.stop_propagation
    }

    pub fn scope(&self) -> Scope {
        self.inner.scope
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// Suppress or restore invocation without unregistering.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.set(enabled);
    }

    /// Whether this binding removes itself after firing once.
    pub fn is_once(&self) -> bool {
        self.inner.once
    }

    /// A one-shot binding that already fired and awaits removal.
    pub fn is_spent(&self) -> bool {
        self.inner.spent.get()
    }

    /// Exact modifier match: every flag must equal the event's.
    pub fn matches_modifiers(&self, event: &KeyEvent) -> bool {
        self.inner.ctrl == event.ctrl_key
            && self.inner.shift == event.shift_key
            && self.inner.alt == event.alt_key
    }

    /// Format as `Ctrl+Alt+Shift+key`.
    pub fn display(&self) -> String {
        let mut result = String::new();
        if self.inner.ctrl {
            result.push_str("Ctrl+");
        }
        if self.inner.alt {
            result.push_str("Alt+");
        }
        if self.inner.shift {
            result.push_str("Shift+");
        }
        result.push_str(&self.inner.key);
        result
    }

    /// Unregister from the owning registry. Returns `false` if it was
    /// already gone or the registry no longer exists.
    pub fn remove(&self) -> bool {
        match self.inner.registry.upgrade() {
            Some(registry) => registry.remove(self),
            None => false,
        }
    }

    pub(crate) fn belongs_to(&self, registry: &RegistryInner) -> bool {
        std::ptr::eq(self.inner.registry.as_ptr(), registry)
    }

    pub(crate) fn run(&self, event: &mut KeyEvent) -> anyhow::Result<()> {
        (self.inner.action)(event)
    }

    /// Mark a one-shot binding as fired and queue its removal.
    pub(crate) fn expire(&self) {
        if self.inner.spent.replace(true) {
            return;
        }
        if let Some(registry) = self.inner.registry.upgrade() {
            RegistryInner::defer_removal(&registry, self.clone());
        }
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id && Weak::ptr_eq(&self.inner.registry, &other.inner.registry)
    }
}

impl Eq for Binding {}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.inner.id)
            .field("key", &self.inner.key)
            .field("ctrl", &self.inner.ctrl)
            .field("shift", &self.inner.shift)
            .field("alt", &self.inner.alt)
            .field("enabled", &self.inner.enabled.get())
            .field("once", &self.inner.once)
            .field("scope", &self.inner.scope)
            .finish()
    }
}
