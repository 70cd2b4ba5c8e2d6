use crate::application::app::Application;
use crate::cli_handlers::CliCommand;
use crate::core::models::MediaRef;
use crate::core::traits::MediaEngine;
use crate::models::Config;
use crate::modules::overlay::logging_overlay::LoggingOverlay;
use crate::modules::playback::rodio_engine::RodioEngine;
use crate::modules::ui::tui::renderer::TuiRenderer;
use anyhow::{Result, bail};
use tracing::{error, info};

pub struct PlayCommand {
    pub sources: Vec<String>,
    pub config: Config,
}

impl CliCommand for PlayCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let sources = self.config.candidate_sources(&self.sources);
        if sources.is_empty() {
            bail!("Nothing to play. Pass a source or list some under `sources` in the config.");
        }

        let mut app = Application::new(&self.config)
            .with_ui_renderer(Box::new(TuiRenderer::new(self.config.seek_step_seconds)));
        if self.config.overlay.enabled {
            app = app.with_overlay(Box::new(LoggingOverlay::new(&self.config.overlay)));
        }

        let result = run(&mut app, &sources, &self.config);

        // The terminal must be restored whatever happened
        let cleanup = app.cleanup();
        if let Err(e) = &result {
            error!(error = %e, "playback ended with an error");
        }
        result?;
        cleanup
    }
}

fn run(app: &mut Application, sources: &[MediaRef], config: &Config) -> Result<()> {
    app.init()?;

    let tick_interval = config.tick_interval();
    app.bind_first_playable(sources, || -> Box<dyn MediaEngine> {
        Box::new(RodioEngine::new(tick_interval))
    })?;

    info!(candidates = sources.len(), "entering main loop");
    app.run()
}
