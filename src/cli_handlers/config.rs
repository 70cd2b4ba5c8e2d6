use crate::cli_handlers::CliCommand;
use crate::models::Config;
use crate::modules::storage::toml_backend::TomlConfigBackend;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::Result;

pub struct ConfigCommand {
    pub init: bool,
    pub storage: TomlConfigBackend,
    pub config: Config,
}

impl CliCommand for ConfigCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let ui = TerminalRenderer::new();
        let path = self.storage.path().display().to_string();

        if self.init {
            if self.storage.path().exists() {
                ui.print_message(&format!("Config already exists at {}", path));
            } else {
                self.storage.save(&self.config)?;
                ui.print_message(&format!("✓ Wrote default config to {}", path));
            }
        }

        ui.print_message(&format!("# {}", path));
        ui.print_message(&toml::to_string_pretty(&self.config)?);
        Ok(())
    }
}
