use anyhow::{Context, Result};
use clap::Parser;
use keybinds::{config, tui};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "keybinds")]
#[command(about = "Interactive keybinding registry demo")]
#[command(version)]
struct Args {
    /// Path to keymap file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Write the default keymap and exit
    #[arg(long)]
    init: bool,

    /// Overwrite an existing keymap with --init
    #[arg(long, requires = "init")]
    force: bool,

    /// Print the bindings the keymap registers and exit
    #[arg(long)]
    list: bool,

    /// Write logs to this file (the TUI owns stderr otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = !(args.init || args.list);
    init_logging(args.log_file.as_deref(), interactive)?;

    if args.init {
        let path = config::init(args.config.as_deref(), args.force)?;
        println!("Wrote default keymap to {}", path.display());
        return Ok(());
    }

    let config = config::load(args.config.as_deref())?;

    if args.list {
        let app = tui::App::new(&config)?;
        for line in app.help_lines() {
            println!("{line}");
        }
        for name in tui::ELEMENT_NAMES {
            if let Some(element) = app.element(name) {
                println!();
                println!("  [{name}]");
                let bindings = app.registry().scoped_bindings(&element);
                for line in keybinds::keybindings::generate_help_for(&bindings) {
                    println!("{line}");
                }
            }
        }
        return Ok(());
    }

    tui::run(&config)
}

/// Log to `log_file` when given; otherwise to stderr unless the TUI is
/// about to take over the terminal.
fn init_logging(log_file: Option<&std::path::Path>, interactive: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("keybinds=info".parse()?);

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}
