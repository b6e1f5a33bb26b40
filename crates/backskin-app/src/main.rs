//! `backskin` command-line entry point.
//!
//! Lists, inspects and sets the backend skin of an application root, and
//! shows how paths and assets resolve through the active skin.

mod commands;

use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use backskin_skin::TomlSettings;
use backskin_types::config::BackskinConfig;
use backskin_vfs::{RealVfs, Vfs, join};

use commands::{Cli, Site};

/// Settings file, relative to the application root.
const SETTINGS_FILE: &str = "storage/backskin/settings.toml";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BackskinConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BackskinConfig::default(),
    };
    log::debug!("Application root {}", config.app_root);

    let vfs: Rc<dyn Vfs> = Rc::new(RealVfs::new("/"));
    let settings = TomlSettings::new(
        Box::new(RealVfs::new("/")),
        join(config.root(), SETTINGS_FILE),
    );
    let site = Site::new(config, vfs, Box::new(settings));

    let output = commands::run(cli.command, site)?;
    print!("{output}");
    Ok(())
}
