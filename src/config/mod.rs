//! Keymap configuration file.
//!
//! The demo application reads its bindings from `keymap.toml`. Each entry
//! names a key, its modifiers and suppression flags, an optional scope
//! (element name), and the command it triggers.

use crate::tui::Command;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub key: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Element name; global when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ctrl: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub shift: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub alt: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub prevent_default: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub stop_propagation: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub once: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl BindingConfig {
    /// A global binding for `key` with default flags.
    pub fn new(key: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            command: command.into(),
            args: None,
            description: None,
            scope: None,
            ctrl: false,
            shift: false,
            alt: false,
            prevent_default: false,
            stop_propagation: false,
            once: false,
            enabled: true,
        }
    }

    /// Parse the command this entry triggers.
    pub fn command(&self) -> Result<Command> {
        Command::parse(&self.command, self.args.as_deref())
    }
}

impl Config {
    /// Keymap written by `--init`.
    pub fn default_keymap() -> Self {
        let mut quit = BindingConfig::new("q", "quit");
        quit.description = Some("Quit".to_string());

        let mut help = BindingConfig::new("?", "help");
        help.description = Some("Toggle help".to_string());

        let mut focus_editor = BindingConfig::new("1", "focus");
        focus_editor.args = Some("editor".to_string());
        focus_editor.description = Some("Focus editor".to_string());

        let mut focus_sidebar = BindingConfig::new("2", "focus");
        focus_sidebar.args = Some("sidebar".to_string());
        focus_sidebar.description = Some("Focus sidebar".to_string());

        let mut save = BindingConfig::new("s", "log");
        save.args = Some("saved".to_string());
        save.description = Some("Save".to_string());
        save.ctrl = true;
        save.prevent_default = true;
        save.scope = Some("editor".to_string());

        let mut toggle_save = BindingConfig::new("t", "toggle");
        toggle_save.args = Some("Save".to_string());
        toggle_save.description = Some("Enable/disable Save".to_string());
        toggle_save.ctrl = true;

        let mut sidebar_down = BindingConfig::new("j", "log");
        sidebar_down.args = Some("sidebar: next item".to_string());
        sidebar_down.description = Some("Next item".to_string());
        sidebar_down.scope = Some("sidebar".to_string());
        sidebar_down.stop_propagation = true;

        let mut global_down = BindingConfig::new("j", "log");
        global_down.args = Some("screen: j".to_string());
        global_down.description = Some("Log j".to_string());

        let mut greet = BindingConfig::new("w", "log");
        greet.args = Some("welcome (fires once)".to_string());
        greet.description = Some("Welcome".to_string());
        greet.once = true;

        let mut keep_tab = BindingConfig::new("Tab", "log");
        keep_tab.args = Some("tab swallowed by editor".to_string());
        keep_tab.description = Some("Keep focus".to_string());
        keep_tab.scope = Some("editor".to_string());
        keep_tab.prevent_default = true;
        keep_tab.enabled = false;

        let mut toggle_tab = BindingConfig::new("k", "toggle");
        toggle_tab.args = Some("Keep focus".to_string());
        toggle_tab.description = Some("Enable/disable Keep focus".to_string());
        toggle_tab.ctrl = true;

        Self {
            bindings: vec![
                quit,
                help,
                focus_editor,
                focus_sidebar,
                save,
                toggle_save,
                sidebar_down,
                global_down,
                greet,
                keep_tab,
                toggle_tab,
            ],
        }
    }

    /// Check every entry; errors name the offending entry by index.
    pub fn validate(&self) -> Result<()> {
        for (index, binding) in self.bindings.iter().enumerate() {
            if binding.key.is_empty() {
                anyhow::bail!("binding #{index}: key must not be empty");
            }
            binding
                .command()
                .with_context(|| format!("binding #{index} ({})", binding.key))?;
        }
        Ok(())
    }
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = directories::ProjectDirs::from("", "", "keybinds")
        .context("Could not determine config directory")?
        .config_dir()
        .to_path_buf();
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("keymap.toml"))
}

pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        anyhow::bail!(
            "Keymap not found at {}. Run `keybinds --init` to create one.",
            path.display()
        );
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read keymap from {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse keymap from {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid keymap at {}", path.display()))?;

    tracing::debug!(path = %path.display(), bindings = config.bindings.len(), "keymap loaded");
    Ok(config)
}

/// Write the default keymap to `path` (or the default location).
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn init(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if path.exists() && !force {
        anyhow::bail!(
            "Keymap already exists at {}. Pass --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(&Config::default_keymap())
        .context("Failed to serialize default keymap")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write keymap to {}", path.display()))?;

    Ok(path)
}
