//! In-memory media engine that records every call, for driving the transport in tests.

use crate::core::error::TransportError;
use crate::core::events::ClockObserver;
use crate::core::models::{MediaRef, SeekRequestId};
use crate::core::traits::MediaEngine;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Attach(String),
    Play,
    Pause,
    Seek(f64, SeekRequestId),
    Detach,
}

#[derive(Debug, Default)]
pub struct EngineProbe {
    pub calls: Vec<EngineCall>,
    observer: Option<ClockObserver>,
}

impl EngineProbe {
    /// The observer the engine was attached with
    pub fn observer(&self) -> ClockObserver {
        self.observer.clone().expect("engine was never attached")
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn seeks(&self) -> Vec<(f64, SeekRequestId)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Seek(target, request) => Some((*target, *request)),
                _ => None,
            })
            .collect()
    }

    pub fn last_seek(&self) -> (f64, SeekRequestId) {
        *self.seeks().last().expect("no seek was issued")
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

pub type SharedProbe = Rc<RefCell<EngineProbe>>;

pub struct RecordingEngine {
    probe: SharedProbe,
    fail_with: Option<String>,
}

impl RecordingEngine {
    pub fn new() -> (Self, SharedProbe) {
        let probe = SharedProbe::default();
        let engine = Self {
            probe: Rc::clone(&probe),
            fail_with: None,
        };
        (engine, probe)
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            probe: SharedProbe::default(),
            fail_with: Some(reason.to_string()),
        }
    }
}

impl MediaEngine for RecordingEngine {
    fn attach(&mut self, media: &MediaRef, observer: ClockObserver) -> Result<(), TransportError> {
        if let Some(reason) = &self.fail_with {
            return Err(TransportError::engine_unavailable(media, reason));
        }

        let mut probe = self.probe.borrow_mut();
        probe.calls.push(EngineCall::Attach(media.to_string()));
        probe.observer = Some(observer);
        Ok(())
    }

    fn play(&mut self) {
        self.probe.borrow_mut().calls.push(EngineCall::Play);
    }

    fn pause(&mut self) {
        self.probe.borrow_mut().calls.push(EngineCall::Pause);
    }

    fn seek(&mut self, target_seconds: f64, request: SeekRequestId) {
        self.probe
            .borrow_mut()
            .calls
            .push(EngineCall::Seek(target_seconds, request));
    }

    fn detach(&mut self) {
        self.probe.borrow_mut().calls.push(EngineCall::Detach);
    }
}
