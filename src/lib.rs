//! keybinds - keybinding registry and dispatch engine
//!
//! The `keybindings` module is the engine; `host` describes the input
//! environment it plugs into. `config` and `tui` make up the demo app and
//! are exposed for integration testing.

pub mod config;
pub mod host;
pub mod keybindings;
pub mod tui;
