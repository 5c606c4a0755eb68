//! Commands bound keys can trigger in the demo application.
//!
//! Bindings push commands onto the app's queue; `App::update()` drains the
//! queue after each key event.

use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Quit the application
    Quit,
    /// Show or hide the help panel
    ToggleHelp,
    /// Append a line to the event log
    Log(String),
    /// Move focus to the named element (`screen` for the root)
    Focus(String),
    /// Enable/disable every binding with this description
    Toggle(String),
}

impl Command {
    /// Parse a keymap command name and its argument.
    pub fn parse(name: &str, args: Option<&str>) -> Result<Self> {
        let required = |what: &str| -> Result<String> {
            match args {
                Some(arg) if !arg.is_empty() => Ok(arg.to_string()),
                _ => anyhow::bail!("command `{name}` requires {what} in `args`"),
            }
        };

        Ok(match name {
            "quit" => Command::Quit,
            "help" => Command::ToggleHelp,
            "log" => Command::Log(args.unwrap_or_default().to_string()),
            "focus" => Command::Focus(required("an element name")?),
            "toggle" => Command::Toggle(required("a binding description")?),
            other => anyhow::bail!("unknown command `{other}`"),
        })
    }
}
