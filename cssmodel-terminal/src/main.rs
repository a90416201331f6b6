//! cssmodel Terminal Editor
//!
//! Compose cubes and polygons in the terminal and export them as HTML.
//! Usage: cssmodel-terminal [config.toml]
//! Controls:
//!   - c / p: Add a cube / polygon
//!   - Mouse drag: Move the primitive under the pointer
//!   - Tab / Shift+Tab: Cycle property fields; Enter: Edit the focused field
//!   - [ / ]: Select the previous / next primitive
//!   - e: Export to HTML
//!   - Q/ESC: Quit

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use cssmodel_terminal::config::DEFAULT_CONFIG_PATH;
use cssmodel_terminal::{TerminalApp, TerminalConfig};

fn init_logging(config: &TerminalConfig) -> Result<(), Box<dyn Error>> {
    let file = File::create(&config.log_file)?;
    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = TerminalConfig::load(&config_path)?;

    init_logging(&config)?;
    if !config_path.exists() {
        config.save_to_file(&config_path)?;
        log::info!("Wrote default settings to {}", config_path.display());
    }
    log::info!("Starting editor with {}", config_path.display());

    println!("cssmodel Terminal Editor - Loading...");
    println!("Logging to {} (press Q to quit)...", config.log_file.display());
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(&config)?;
    app.run()?;

    log::info!("Exiting with {} objects", app.session().scene().len());
    println!("Thank you for using the cssmodel editor!");
    Ok(())
}
