mod application;
mod cli;
mod cli_handlers;
mod core;
mod logging;
mod models;
mod modules;
mod utils;

use crate::modules::storage::toml_backend::TomlConfigBackend;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::Result;
use clap::Parser;
use cli::Cli;
use cli_handlers::from_cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let storage = match &cli.config {
        Some(path) => TomlConfigBackend::at(path),
        None => TomlConfigBackend::new()?,
    };
    let config = storage.load()?;

    // Without a log file the player still works, it just stays quiet
    if let Err(e) = logging::init(&config) {
        TerminalRenderer::new().print_error(&format!("{:#}", e));
    }

    from_cli(cli.command, storage, config).execute()
}
