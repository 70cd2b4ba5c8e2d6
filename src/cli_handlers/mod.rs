mod config;
mod play;
mod probe;

pub use config::ConfigCommand;
pub use play::PlayCommand;
pub use probe::ProbeCommand;

use crate::cli::Commands;
use crate::models::Config;
use crate::modules::storage::toml_backend::TomlConfigBackend;
use anyhow::Result;

/// Every CLI command implements this trait.
///
/// Commands own their arguments and are consumed on execution; they run exactly once.
pub trait CliCommand {
    fn execute(self: Box<Self>) -> Result<()>;
}

/// Converts a parsed [`Commands`] variant into a boxed [`CliCommand`] ready to execute.
pub fn from_cli(cmd: Commands, storage: TomlConfigBackend, config: Config) -> Box<dyn CliCommand> {
    match cmd {
        Commands::Play { sources } => Box::new(PlayCommand { sources, config }),
        Commands::Config { init } => Box::new(ConfigCommand {
            init,
            storage,
            config,
        }),
        Commands::Probe { source } => Box::new(ProbeCommand { source }),
    }
}
