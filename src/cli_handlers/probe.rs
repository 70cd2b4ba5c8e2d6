use crate::cli_handlers::CliCommand;
use crate::core::models::MediaRef;
use crate::modules::playback::duration_probe::probe_duration;
use crate::modules::ui::progress_formatter::format_duration;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::{Context, Result};

pub struct ProbeCommand {
    pub source: String,
}

impl CliCommand for ProbeCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let media = MediaRef::new(self.source);
        let ui = TerminalRenderer::new();

        let path = media
            .local_path()
            .with_context(|| format!("Only local files can be probed: {}", media))?;
        let duration = probe_duration(path)?;

        let duration_label = if duration.is_zero() {
            "unknown".to_string()
        } else {
            format_duration(duration)
        };

        ui.print_table(&[
            ("title", media.display_name()),
            ("source", media.to_string()),
            ("duration", duration_label),
        ])?;

        Ok(())
    }
}
