//! The binding registry.
//!
//! Holds one key table for the global input surface and one per scoping
//! target. Single-character keys are indexed under both their lower- and
//! upper-case forms, sharing one binding record, so a letter fires whether
//! or not the host applied Shift's case transformation.
//!
//! Native listeners are attached lazily: once on the global surface at the
//! first global bind, and once per target at its first scoped bind.

use super::binding::{BindOptions, Binding, BindingId, Scope, TargetId};
use super::{dispatch, key_variants, KeybindError, ValidationError};
use crate::host::{self, key_listener, EventTarget, KeyEvent, Turn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Key label -> bindings in registration order.
type KeyTable = HashMap<String, Vec<Binding>>;

/// Identity relation for a scoping target. The registry never keeps the
/// target alive.
struct TargetEntry {
    target: Weak<dyn EventTarget>,
    addr: *const (),
    id: TargetId,
}

impl TargetEntry {
    fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }
}

fn target_addr<T: ?Sized>(target: &Rc<T>) -> *const () {
    Rc::as_ptr(target).cast::<()>()
}

pub(crate) struct RegistryInner {
    surface: Rc<dyn EventTarget>,
    global: RefCell<KeyTable>,
    scoped: RefCell<HashMap<TargetId, KeyTable>>,
    targets: RefCell<Vec<TargetEntry>>,
    next_id: Cell<u64>,
    next_target: Cell<u64>,
    global_attached: Cell<bool>,
    deferred: RefCell<Vec<Binding>>,
}

/// Keybinding registry bound to one global input surface.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct Registry {
    inner: Rc<RegistryInner>,
}

impl Registry {
    /// Create a registry whose global bindings listen on `surface`.
    ///
    /// No listener is attached until the first global binding is created.
    pub fn new(surface: Rc<dyn EventTarget>) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                surface,
                global: RefCell::new(KeyTable::new()),
                scoped: RefCell::new(HashMap::new()),
                targets: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                next_target: Cell::new(0),
                global_attached: Cell::new(false),
                deferred: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register a persistent binding.
    pub fn bind(
        &self,
        key: &str,
        options: impl Into<BindOptions>,
    ) -> Result<Binding, ValidationError> {
        RegistryInner::insert(&self.inner, key, options.into(), false)
    }

    /// Register a binding that removes itself after its first invocation.
    ///
    /// Removal is queued and runs once the host turn that fired it has
    /// ended, so sibling bindings and later listeners for the same event
    /// still see it registered. Outside a turn the removal waits for
    /// [`Self::run_deferred`].
    pub fn bind_once(
        &self,
        key: &str,
        options: impl Into<BindOptions>,
    ) -> Result<Binding, ValidationError> {
        RegistryInner::insert(&self.inner, key, options.into(), true)
    }

    /// Unregister `binding` from every key entry it was indexed under.
    ///
    /// Returns `false` if nothing was removed.
    pub fn remove(&self, binding: &Binding) -> bool {
        self.inner.remove(binding)
    }

    /// Run queued one-shot removals now. Returns how many were removed.
    pub fn run_deferred(&self) -> usize {
        self.inner.run_deferred()
    }

    /// Number of one-shot removals waiting to run.
    pub fn pending_removals(&self) -> usize {
        self.inner.deferred.borrow().len()
    }

    /// Route `event` through the global key table, as the global listener
    /// does. Keys with no bindings are ignored. Runs as its own host turn
    /// unless one is already running.
    pub fn handle_global(&self, event: &mut KeyEvent) -> Result<(), KeybindError> {
        self.inner.handle_event(Scope::Global, event)
    }

    /// Global bindings that currently fire for `key`, in invocation order.
    pub fn bindings_for(&self, key: &str) -> Vec<Binding> {
        self.inner.lookup(Scope::Global, key).unwrap_or_default()
    }

    /// All global bindings, each once, in registration order.
    pub fn bindings(&self) -> Vec<Binding> {
        unique_bindings(&self.inner.global.borrow())
    }

    /// Bindings scoped to `target`, each once, in registration order.
    pub fn scoped_bindings<T>(&self, target: &Rc<T>) -> Vec<Binding>
    where
        T: EventTarget + ?Sized,
    {
        let addr = target_addr(target);
        let id = self
            .inner
            .targets
            .borrow()
            .iter()
            .find(|entry| entry.addr == addr && entry.is_alive())
            .map(|entry| entry.id);
        match id {
            Some(id) => self
                .inner
                .scoped
                .borrow()
                .get(&id)
                .map(unique_bindings)
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Number of distinct registered bindings across all scopes.
    pub fn len(&self) -> usize {
        let global = unique_bindings(&self.inner.global.borrow()).len();
        let scoped: usize = self
            .inner
            .scoped
            .borrow()
            .values()
            .map(|table| unique_bindings(table).len())
            .sum();
        global + scoped
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every binding and queued removal.
    ///
    /// Attached native listeners stay in place and find nothing to run;
    /// binding identities keep counting up.
    pub fn clear(&self) {
        self.inner.global.borrow_mut().clear();
        for table in self.inner.scoped.borrow_mut().values_mut() {
            table.clear();
        }
        self.inner.deferred.borrow_mut().clear();
        tracing::debug!("registry cleared");
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("bindings", &self.len())
            .field("targets", &self.inner.targets.borrow().len())
            .field("global_attached", &self.inner.global_attached.get())
            .finish()
    }
}

/// Distinct bindings of a table ordered by identity.
fn unique_bindings(table: &KeyTable) -> Vec<Binding> {
    let mut bindings: Vec<Binding> = table.values().flatten().cloned().collect();
    bindings.sort_by_key(Binding::id);
    bindings.dedup_by_key(|binding| binding.id());
    bindings
}

impl RegistryInner {
    fn insert(
        this: &Rc<Self>,
        key: &str,
        mut options: BindOptions,
        once: bool,
    ) -> Result<Binding, ValidationError> {
        options.validate(key)?;

        let scope = match options.target.take() {
            Some(target) => Scope::Target(Self::resolve_target(this, &target)),
            None => {
                Self::ensure_global_listener(this);
                Scope::Global
            }
        };

        let id = BindingId(this.next_id.get());
        this.next_id.set(id.0 + 1);
        let binding = Binding::from_options(id, key, options, once, scope, Rc::downgrade(this))?;

        this.with_table(scope, |table| {
            for variant in key_variants(key) {
                table.entry(variant).or_default().push(binding.clone());
            }
        });

        tracing::debug!(id = %id, key, ?scope, once, "binding registered");
        Ok(binding)
    }

    pub(crate) fn remove(&self, binding: &Binding) -> bool {
        if !binding.belongs_to(self) {
            return false;
        }
        let id = binding.id();
        let variants = key_variants(binding.key());
        let removed = self
            .with_table(binding.scope(), |table| {
                let mut removed = 0;
                for variant in &variants {
                    if let Some(list) = table.get_mut(variant) {
                        let before = list.len();
                        list.retain(|b| b.id() != id);
                        removed += before - list.len();
                        if list.is_empty() {
                            table.remove(variant);
                        }
                    }
                }
                removed
            })
            .unwrap_or(0);

        if removed > 0 {
            tracing::debug!(id = %id, key = binding.key(), "binding removed");
        }
        removed > 0
    }

    pub(crate) fn defer_removal(this: &Rc<Self>, binding: Binding) {
        tracing::debug!(id = %binding.id(), key = binding.key(), "one-shot binding expired");
        this.deferred.borrow_mut().push(binding);

        let weak = Rc::downgrade(this);
        let scheduled = host::after_turn(move || {
            if let Some(registry) = weak.upgrade() {
                registry.run_deferred();
            }
        });
        if !scheduled {
            tracing::trace!("no host turn running, removal waits for run_deferred");
        }
    }

    fn run_deferred(&self) -> usize {
        let pending = std::mem::take(&mut *self.deferred.borrow_mut());
        pending.iter().filter(|binding| self.remove(binding)).count()
    }

    /// Entry point for native listeners.
    fn handle_event(&self, scope: Scope, event: &mut KeyEvent) -> Result<(), KeybindError> {
        // Snapshot so actions may add or remove bindings mid-pass
        let Some(candidates) = self.lookup(scope, &event.key) else {
            return Ok(());
        };

        let _turn = Turn::begin();
        dispatch::invoke(event, &candidates)
    }

    /// Copy of the non-empty candidate list for `key` in `scope`.
    fn lookup(&self, scope: Scope, key: &str) -> Option<Vec<Binding>> {
        let found = match scope {
            Scope::Global => self.global.borrow().get(key).cloned(),
            Scope::Target(id) => self
                .scoped
                .borrow()
                .get(&id)
                .and_then(|table| table.get(key).cloned()),
        };
        found.filter(|list| !list.is_empty())
    }

    /// Run `f` on the table for `scope`; `None` if the scope is gone.
    fn with_table<R>(&self, scope: Scope, f: impl FnOnce(&mut KeyTable) -> R) -> Option<R> {
        match scope {
            Scope::Global => Some(f(&mut self.global.borrow_mut())),
            Scope::Target(id) => self.scoped.borrow_mut().get_mut(&id).map(f),
        }
    }

    fn ensure_global_listener(this: &Rc<Self>) {
        if this.global_attached.replace(true) {
            return;
        }
        Self::attach_listener(this, this.surface.as_ref(), Scope::Global);
    }

    /// Find or assign the identity of `target`, attaching its listener the
    /// first time it is seen.
    fn resolve_target(this: &Rc<Self>, target: &Rc<dyn EventTarget>) -> TargetId {
        this.prune_dead_targets();

        let addr = target_addr(target);
        if let Some(entry) = this.targets.borrow().iter().find(|entry| entry.addr == addr) {
            return entry.id;
        }

        let id = TargetId(this.next_target.get());
        this.next_target.set(id.0 + 1);
        this.targets.borrow_mut().push(TargetEntry {
            target: Rc::downgrade(target),
            addr,
            id,
        });
        this.scoped.borrow_mut().insert(id, KeyTable::new());
        Self::attach_listener(this, target.as_ref(), Scope::Target(id));
        id
    }

    /// Forget targets the host has dropped, along with their bindings.
    fn prune_dead_targets(&self) {
        let mut targets = self.targets.borrow_mut();
        let mut scoped = self.scoped.borrow_mut();
        targets.retain(|entry| {
            if entry.is_alive() {
                return true;
            }
            scoped.remove(&entry.id);
            tracing::debug!(target_id = entry.id.0, "pruned dropped target");
            false
        });
    }

    fn attach_listener(this: &Rc<Self>, target: &dyn EventTarget, scope: Scope) {
        let registry = Rc::downgrade(this);
        target.add_key_listener(key_listener(move |event| match registry.upgrade() {
            Some(registry) => registry.handle_event(scope, event),
            None => Ok(()),
        }));
        tracing::debug!(?scope, "native key listener attached");
    }
}
