use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crossbeam::channel::Sender;

use crate::InputEvent;

#[derive(Debug, Default)]
pub(crate) struct RunState {
    started: AtomicBool,
    terminated: AtomicBool,
}

impl RunState {
    pub fn mark_started(&self) {
        self.started.store(true, Ordering::Release);
    }

    pub fn mark_terminated(&self) {
        self.terminated.store(true, Ordering::Release);
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire) && !self.is_terminated()
    }
}

/// Controls a renderer from another thread
///
/// Events sent through the handle are delivered to the renderer's input
/// handlers before the next block is rendered.
#[derive(Clone, Debug)]
pub struct RendererHandle {
    event_tx: Sender<InputEvent>,
    state: Arc<RunState>,
}

impl RendererHandle {
    pub(crate) fn new(event_tx: Sender<InputEvent>, state: Arc<RunState>) -> Self {
        Self { event_tx, state }
    }

    /// Press `key`
    pub fn key_down(&self, key: char) {
        self.send(InputEvent::KeyDown(key));
    }

    /// Release `key`
    pub fn key_up(&self, key: char) {
        self.send(InputEvent::KeyUp(key));
    }

    /// Queue an input event
    pub fn send(&self, event: InputEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!(?event, "Renderer has gone, dropping input event");
        }
    }

    /// Ask the renderer's run loop to finish
    pub fn terminate(&self) {
        self.state.mark_terminated();
    }

    /// Whether the renderer has started and not been terminated
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }
}
