use crate::application::session::PlaybackSession;
use crate::application::state::TransportView;
use crate::core::error::TransportError;
use crate::core::events::*;
use crate::core::models::{MediaRef, UnknownDurationPolicy};
use crate::core::traits::*;
use crate::models::Config;
use crate::modules::overlay::OverlayAttachment;
use crate::utils::{EVENT_QUEUE_CAPACITY, FRAME_INTERVAL};
use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use tracing::{debug, info, warn};

/// Main application orchestrator.
///
/// Single owner of the playback session: engine threads and the UI only
/// post events, and every state change happens on the loop draining them.
pub struct Application {
    unknown_duration: UnknownDurationPolicy,
    event_tx: EventSender,
    event_rx: EventReceiver,

    session: Option<PlaybackSession>,

    // Module references
    ui_renderer: Option<Box<dyn UiRenderer>>,
    overlay_host: Option<Box<dyn OverlayHost>>,
    overlay: Option<OverlayAttachment>,

    last_rendered: Option<TransportView>,
    running: bool,
}

impl Application {
    pub fn new(config: &Config) -> Self {
        let (tx, rx) = bounded(EVENT_QUEUE_CAPACITY);

        Self {
            unknown_duration: config.unknown_duration,
            event_tx: tx,
            event_rx: rx,
            session: None,
            ui_renderer: None,
            overlay_host: None,
            overlay: None,
            last_rendered: None,
            running: false,
        }
    }

    /// Set the UI renderer
    pub fn with_ui_renderer(mut self, renderer: Box<dyn UiRenderer>) -> Self {
        self.ui_renderer = Some(renderer);
        self
    }

    /// Set the overlay collaborator, attached to the renderer's surface on `init`
    pub fn with_overlay(mut self, host: Box<dyn OverlayHost>) -> Self {
        self.overlay_host = Some(host);
        self
    }

    #[cfg(test)]
    pub fn event_sender(&self) -> EventSender {
        self.event_tx.clone()
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// What the control surface should currently display
    pub fn view(&self) -> TransportView {
        self.session
            .as_ref()
            .map(PlaybackSession::view)
            .unwrap_or_else(TransportView::unbound)
    }

    /// Bind the first playable source, replacing any current session
    pub fn bind_first_playable<F>(&mut self, sources: &[MediaRef], make_engine: F) -> Result<()>
    where
        F: FnMut() -> Box<dyn MediaEngine>,
    {
        self.release_session();

        let session = PlaybackSession::bind_first_playable(
            sources,
            make_engine,
            &self.event_tx,
            self.unknown_duration,
        )
        .context("No playable source")?;

        info!(session = %session.id(), media = %session.media(), "playback session bound");
        self.session = Some(session);
        Ok(())
    }

    /// Initialize the UI, then attach the overlay to its surface
    pub fn init(&mut self) -> Result<()> {
        if let Some(ui) = &mut self.ui_renderer {
            ui.init()?;

            if let Some(host) = self.overlay_host.take() {
                let surface = ui.surface();
                self.overlay = Some(OverlayAttachment::attach(host, &surface)?);
            }
        }

        Ok(())
    }

    /// Run the main event loop
    pub fn run(&mut self) -> Result<()> {
        self.running = true;

        while self.running {
            // Process all pending events
            self.process_events();

            // Poll UI for input
            let ui_events = match &mut self.ui_renderer {
                Some(ui) => ui.poll_input()?,
                None => Vec::new(),
            };
            for event in ui_events {
                self.handle_event(AppEvent::Ui(event));
            }

            self.render_if_changed()?;

            // Small sleep to prevent CPU spinning
            std::thread::sleep(FRAME_INTERVAL);
        }

        Ok(())
    }

    /// Process events once without entering the main loop
    #[cfg(test)]
    pub fn run_once(&mut self) -> Result<()> {
        self.process_events();
        self.render_if_changed()
    }

    /// Drain all events currently in the queue
    fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Handle a single event
    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Clock(ce) => self.handle_clock_event(&ce),
            AppEvent::Ui(UiEvent::QuitRequested) => {
                self.running = false;
            }
            AppEvent::Ui(ue) => {
                if let Some(session) = &mut self.session {
                    session.handle_ui(&ue);
                } else {
                    debug!(event = ?ue, "no media bound, gesture ignored");
                }
            }
        }
    }

    fn handle_clock_event(&mut self, event: &ClockEvent) {
        let result = match &mut self.session {
            Some(session) => session.handle_clock(event),
            None => Err(TransportError::StaleCallback {
                session: event.session(),
            }),
        };

        match result {
            Ok(_) => {}
            Err(e @ TransportError::StaleCallback { .. }) => {
                debug!(error = %e, ?event, "dropping notification");
            }
            Err(e) => warn!(error = %e, ?event, "notification failed"),
        }
    }

    fn render_if_changed(&mut self) -> Result<()> {
        let view = self.view();
        let Some(ui) = &mut self.ui_renderer else {
            return Ok(());
        };

        if self.last_rendered.as_ref() != Some(&view) {
            ui.render(&view)?;
            self.last_rendered = Some(view);
        }

        Ok(())
    }

    /// Release the current session, if any. Later notifications for it are dropped as stale.
    pub fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.release();
        }
    }

    /// Cleanup resources: clock first, then the overlay, then the surface itself
    pub fn cleanup(&mut self) -> Result<()> {
        self.release_session();

        if let Some(overlay) = self.overlay.take() {
            debug!(surface = overlay.surface().id, "detaching overlay");
            overlay.detach();
        }

        // Cleanup UI
        if let Some(ui) = &mut self.ui_renderer {
            ui.cleanup()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{EngineCall, RecordingEngine, SharedProbe};
    use crate::core::models::{SeekState, SurfaceHandle};
    use std::cell::RefCell;
    use std::rc::Rc;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn bound_app() -> (Application, SharedProbe) {
        let mut app = Application::new(&Config::default());
        let (engine, probe) = RecordingEngine::new();
        let mut engine = Some(engine);
        app.bind_first_playable(&[MediaRef::new("/media/clip.ogg")], || -> Box<dyn MediaEngine> {
            Box::new(engine.take().unwrap())
        })
        .unwrap();
        (app, probe)
    }

    fn send_ui(app: &Application, event: UiEvent) {
        app.event_sender().send(AppEvent::Ui(event)).unwrap();
    }

    /// Renderer that records what it was asked to show
    #[derive(Default)]
    struct Journal {
        lifecycle: Vec<&'static str>,
        renders: Vec<TransportView>,
        input: Vec<UiEvent>,
    }

    struct JournalRenderer(Rc<RefCell<Journal>>);

    impl UiRenderer for JournalRenderer {
        fn init(&mut self) -> Result<()> {
            self.0.borrow_mut().lifecycle.push("ui init");
            Ok(())
        }

        fn cleanup(&mut self) -> Result<()> {
            self.0.borrow_mut().lifecycle.push("ui cleanup");
            Ok(())
        }

        fn surface(&self) -> SurfaceHandle {
            SurfaceHandle::new("journal")
        }

        fn render(&mut self, view: &TransportView) -> Result<()> {
            self.0.borrow_mut().renders.push(view.clone());
            Ok(())
        }

        fn poll_input(&mut self) -> Result<Vec<UiEvent>> {
            Ok(std::mem::take(&mut self.0.borrow_mut().input))
        }
    }

    struct JournalOverlay(Rc<RefCell<Journal>>);

    impl OverlayHost for JournalOverlay {
        fn attach(&mut self, _surface: &SurfaceHandle) -> Result<()> {
            self.0.borrow_mut().lifecycle.push("overlay attach");
            Ok(())
        }

        fn detach(&mut self) {
            self.0.borrow_mut().lifecycle.push("overlay detach");
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn unbound_app_shows_placeholder_view() {
        let app = Application::new(&Config::default());
        assert_eq!(app.view(), TransportView::unbound());
        assert!(app.session().is_none());
    }

    #[test]
    fn engine_and_gesture_events_share_one_queue() {
        let (mut app, probe) = bound_app();
        let observer = probe.borrow().observer();

        observer.duration_known(120.0);
        observer.tick(30.0);
        app.run_once().unwrap();
        assert_eq!(app.view().position, 0.25);

        send_ui(&app, UiEvent::DragStarted);
        send_ui(&app, UiEvent::DragMoved { value: 0.4 });
        observer.tick(31.0);
        send_ui(&app, UiEvent::DragEnded);
        app.run_once().unwrap();

        let view = app.view();
        assert_eq!(view.seek_state, SeekState::Settling);
        assert_eq!(view.position, 0.4);

        let (target, request) = probe.borrow().last_seek();
        observer.seek_completed(request);
        observer.tick(target);
        app.run_once().unwrap();

        assert_eq!(app.view().seek_state, SeekState::Idle);
        assert_eq!(app.view().position, 0.4);
        app.cleanup().unwrap();
    }

    #[test]
    fn late_tick_after_release_is_dropped_silently() {
        let (mut app, probe) = bound_app();
        let observer = probe.borrow().observer();
        let session = app.session().unwrap().id();

        app.release_session();

        // Observer is cancelled, and a tick that was already queued is stale
        observer.tick(10.0);
        app.event_sender()
            .send(AppEvent::Clock(ClockEvent::PeriodicTick { session, seconds: 10.0 }))
            .unwrap();

        assert!(app.run_once().is_ok());
        assert_eq!(app.view(), TransportView::unbound());
        assert_eq!(probe.borrow().count(&EngineCall::Detach), 1);
    }

    #[test]
    fn rebinding_releases_previous_session() {
        let (mut app, first_probe) = bound_app();
        let (engine, second_probe) = RecordingEngine::new();
        let mut engine = Some(engine);

        app.bind_first_playable(&[MediaRef::new("/media/next.ogg")], || -> Box<dyn MediaEngine> {
            Box::new(engine.take().unwrap())
        })
        .unwrap();

        assert_eq!(first_probe.borrow().count(&EngineCall::Detach), 1);
        assert_eq!(second_probe.borrow().count(&EngineCall::Detach), 0);
        assert_eq!(app.session().unwrap().media().as_str(), "/media/next.ogg");
        app.cleanup().unwrap();
    }

    #[test]
    fn bind_failure_leaves_app_unbound() {
        let mut app = Application::new(&Config::default());
        let result = app.bind_first_playable(&[MediaRef::new("/nope.ogg")], || -> Box<dyn MediaEngine> {
            Box::new(RecordingEngine::failing("no such file"))
        });

        assert!(result.is_err());
        assert!(app.session().is_none());
    }

    #[test]
    fn quit_stops_the_loop() {
        let (mut app, _probe) = bound_app();
        send_ui(&app, UiEvent::QuitRequested);
        app.run().unwrap();
        app.cleanup().unwrap();
    }

    #[test]
    fn renders_only_when_view_changes() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let (app, probe) = bound_app();
        let mut app = app.with_ui_renderer(Box::new(JournalRenderer(Rc::clone(&journal))));
        app.init().unwrap();

        app.run_once().unwrap();
        app.run_once().unwrap();
        assert_eq!(journal.borrow().renders.len(), 1);

        probe.borrow().observer().duration_known(60.0);
        app.run_once().unwrap();
        assert_eq!(journal.borrow().renders.len(), 2);
        assert_eq!(journal.borrow().renders[1].duration_seconds, 60.0);
        app.cleanup().unwrap();
    }

    #[test]
    fn teardown_order_is_clock_overlay_surface() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let (app, probe) = bound_app();
        let mut app = app
            .with_ui_renderer(Box::new(JournalRenderer(Rc::clone(&journal))))
            .with_overlay(Box::new(JournalOverlay(Rc::clone(&journal))));

        app.init().unwrap();
        journal.borrow_mut().input.push(UiEvent::QuitRequested);
        app.run().unwrap();
        app.cleanup().unwrap();

        assert_eq!(probe.borrow().count(&EngineCall::Detach), 1);
        assert_eq!(
            journal.borrow().lifecycle,
            vec!["ui init", "overlay attach", "overlay detach", "ui cleanup"]
        );
    }
}
