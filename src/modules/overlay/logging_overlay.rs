use crate::core::models::SurfaceHandle;
use crate::core::traits::OverlayHost;
use crate::models::OverlayConfig;
use anyhow::{Result, bail};
use tracing::info;

/// Default overlay collaborator: records attach/detach against the configured channel and stream
pub struct LoggingOverlay {
    channel_id: Option<String>,
    stream_id: Option<String>,
    surface: Option<SurfaceHandle>,
}

impl LoggingOverlay {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            channel_id: config.channel_id.clone(),
            stream_id: config.stream_id.clone(),
            surface: None,
        }
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }
}

impl OverlayHost for LoggingOverlay {
    fn attach(&mut self, surface: &SurfaceHandle) -> Result<()> {
        if let Some(current) = &self.surface {
            bail!("Overlay already attached to surface {}", current.id);
        }

        info!(
            surface = surface.id,
            title = %surface.title,
            channel = self.channel_id.as_deref().unwrap_or("-"),
            stream = self.stream_id.as_deref().unwrap_or("-"),
            "overlay attached"
        );
        self.surface = Some(surface.clone());
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(surface) = self.surface.take() {
            info!(surface = surface.id, "overlay detached");
        }
    }
}
