use super::Command;
use crate::config::{BindingConfig, Config};
use crate::host::{Element, KeyEvent, TerminalInput};
use crate::keybindings::{generate_help, generate_help_for, BindOptions, Binding, Registry};
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Name of the root surface element.
pub const ROOT_NAME: &str = "screen";

/// Names of the focusable elements, in Tab order.
pub const ELEMENT_NAMES: &[&str] = &["editor", "sidebar"];

/// Log lines kept for display.
const LOG_CAPACITY: usize = 200;

/// Demo application state.
pub struct App {
    registry: Registry,
    input: TerminalInput,
    elements: Vec<Rc<Element>>,
    queue: Rc<RefCell<VecDeque<Command>>>,
    /// Every binding created from the keymap, for toggling by description
    bindings: Vec<Binding>,
    log: VecDeque<String>,
    show_help: bool,
    should_quit: bool,
}

impl App {
    /// Build the element tree and register the keymap's bindings.
    pub fn new(config: &Config) -> Result<Self> {
        let root = Element::root(ROOT_NAME);
        let elements = ELEMENT_NAMES
            .iter()
            .map(|name| Element::child(*name, &root))
            .collect();

        let mut app = Self {
            registry: Registry::new(root.clone()),
            input: TerminalInput::new(root),
            elements,
            queue: Rc::new(RefCell::new(VecDeque::new())),
            bindings: Vec::new(),
            log: VecDeque::new(),
            show_help: true,
            should_quit: false,
        };

        for (index, entry) in config.bindings.iter().enumerate() {
            let binding = app
                .install(entry)
                .with_context(|| format!("binding #{index} ({})", entry.key))?;
            app.bindings.push(binding);
        }

        Ok(app)
    }

    fn install(&self, entry: &BindingConfig) -> Result<Binding> {
        let command = entry.command()?;
        let queue = Rc::clone(&self.queue);

        let mut options = BindOptions::new(move |_| {
            queue.borrow_mut().push_back(command.clone());
            Ok(())
        })
        .modifiers(entry.ctrl, entry.shift, entry.alt)
        .enabled(entry.enabled);
        if entry.prevent_default {
            options = options.prevent_default();
        }
        if entry.stop_propagation {
            options = options.stop_propagation();
        }
        if let Some(description) = &entry.description {
            options = options.description(description.clone());
        }
        if let Some(scope) = &entry.scope {
            let element = self
                .element(scope)
                .with_context(|| format!("unknown scope `{scope}`"))?;
            options = options.target(element);
        }

        let binding = if entry.once {
            self.registry.bind_once(&entry.key, options)?
        } else {
            self.registry.bind(&entry.key, options)?
        };
        Ok(binding)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn input(&self) -> &TerminalInput {
        &self.input
    }

    pub fn element(&self, name: &str) -> Option<Rc<Element>> {
        self.elements.iter().find(|e| e.name() == name).cloned()
    }

    /// Name of the focused element, or the root.
    pub fn focus_name(&self) -> String {
        self.input
            .focused()
            .map(|e| e.name().to_string())
            .unwrap_or_else(|| ROOT_NAME.to_string())
    }

    pub fn log(&self) -> impl Iterator<Item = &String> {
        self.log.iter()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Help for global bindings followed by the focused element's own.
    pub fn help_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("  [{ROOT_NAME}]")];
        lines.extend(generate_help(&self.registry));
        if let Some(focused) = self.input.focused() {
            lines.push(String::new());
            lines.push(format!("  [{}]", focused.name()));
            lines.extend(generate_help_for(&self.registry.scoped_bindings(&focused)));
        }
        lines
    }

    /// Deliver a key press and process what it triggered.
    pub fn handle_key(&mut self, mut event: KeyEvent) {
        if let Err(e) = self.input.deliver(&mut event) {
            self.report(&e);
        }
        self.after_delivery(&event);
    }

    /// Default handling for a delivered key, then drain queued commands.
    fn after_delivery(&mut self, event: &KeyEvent) {
        if !event.is_default_prevented() {
            self.default_action(event);
        }
        self.drain_commands();
    }

    fn report(&mut self, error: &dyn std::fmt::Display) {
        tracing::warn!("key dispatch failed: {}", error);
        self.push_log(format!("error: {error}"));
    }

    fn default_action(&mut self, event: &KeyEvent) {
        match event.key.as_str() {
            "Escape" => self.should_quit = true,
            "c" if event.ctrl_key => self.should_quit = true,
            "Tab" => self.cycle_focus(if event.shift_key { -1 } else { 1 }),
            _ => {}
        }
    }

    fn drain_commands(&mut self) {
        loop {
            let Some(command) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            self.update(command);
        }
    }

    /// Apply one command to the app state.
    pub fn update(&mut self, command: Command) {
        match command {
            Command::Quit => self.should_quit = true,
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::Log(text) => self.push_log(text),
            Command::Focus(name) => self.focus(&name),
            Command::Toggle(description) => self.toggle(&description),
        }
    }

    fn focus(&mut self, name: &str) {
        if name == ROOT_NAME {
            self.input.set_focus(None);
        } else if let Some(element) = self.element(name) {
            self.input.set_focus(Some(element));
        } else {
            self.push_log(format!("no element named `{name}`"));
            return;
        }
        self.push_log(format!("focus: {name}"));
    }

    /// Tab order: root, then each element; wraps around.
    fn cycle_focus(&mut self, step: isize) {
        let count = self.elements.len() as isize + 1;
        let current = match self.input.focused() {
            Some(focused) => self
                .elements
                .iter()
                .position(|e| Rc::ptr_eq(e, &focused))
                .map(|i| i as isize + 1)
                .unwrap_or(0),
            None => 0,
        };
        let next = (current + step).rem_euclid(count);
        let name = if next == 0 {
            ROOT_NAME.to_string()
        } else {
            self.elements[next as usize - 1].name().to_string()
        };
        self.focus(&name);
    }

    fn toggle(&mut self, description: &str) {
        let mut toggled = 0;
        for binding in &self.bindings {
            if binding.description() == Some(description) {
                binding.set_enabled(!binding.is_enabled());
                toggled += 1;
            }
        }
        if toggled == 0 {
            self.push_log(format!("no binding described `{description}`"));
        } else {
            self.push_log(format!("toggled `{description}` ({toggled})"));
        }
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}
