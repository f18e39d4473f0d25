use std::time::Duration;

use super::{LatencyTracker, OutputError, OutputSettings};

/// Where an output is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputState {
    /// Nothing is acquired
    Closed,

    /// The device or file is acquired but blocks are ignored
    Open,

    /// Pushed blocks are played or written
    Running,
}

/// The state machine shared by every output
///
/// It also owns the output's latency tracker, which is reset on open and
/// updated on every accepted push.
#[derive(Debug)]
pub(crate) struct OutputLifecycle {
    state: OutputState,
    latency: LatencyTracker,
}

impl Default for OutputLifecycle {
    fn default() -> Self {
        Self {
            state: OutputState::Closed,
            latency: LatencyTracker::new(),
        }
    }
}

impl OutputLifecycle {
    pub fn state(&self) -> OutputState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == OutputState::Running
    }

    /// Runs `acquire` and moves to `Open` if it succeeds
    pub fn open(
        &mut self,
        acquire: impl FnOnce() -> Result<(), OutputError>,
    ) -> Result<(), OutputError> {
        if self.state != OutputState::Closed {
            return Err(OutputError::AlreadyOpen);
        }

        acquire()?;

        self.latency.reset();
        self.state = OutputState::Open;
        Ok(())
    }

    /// Runs `play` and moves from `Open` to `Running` if it succeeds
    ///
    /// `play` isn't run when the output is already running.
    pub fn start(
        &mut self,
        play: impl FnOnce() -> Result<(), OutputError>,
    ) -> Result<(), OutputError> {
        match self.state {
            OutputState::Closed => Err(OutputError::NotOpen),
            OutputState::Open => {
                play()?;
                self.state = OutputState::Running;
                Ok(())
            }
            OutputState::Running => Ok(()),
        }
    }

    /// Runs `pause` and moves from `Running` to `Open` if it succeeds
    ///
    /// `pause` isn't run when the output isn't running.
    pub fn stop(
        &mut self,
        pause: impl FnOnce() -> Result<(), OutputError>,
    ) -> Result<(), OutputError> {
        match self.state {
            OutputState::Closed => Err(OutputError::NotOpen),
            OutputState::Open => Ok(()),
            OutputState::Running => {
                pause()?;
                self.state = OutputState::Open;
                Ok(())
            }
        }
    }

    /// Returns true if the output was open or running
    pub fn close(&mut self) -> bool {
        let was_open = self.state != OutputState::Closed;
        self.state = OutputState::Closed;
        was_open
    }

    /// Checks the length of a pushed block
    ///
    /// Returns true if the block should be used, which also counts it in the
    /// latency average.
    pub fn accept_push(
        &mut self,
        settings: &OutputSettings,
        data: &[f32],
    ) -> Result<bool, OutputError> {
        let expected = settings.samples_per_buffer();

        if expected == 0 {
            return Err(OutputError::EmptyBlock);
        }

        if data.len() != expected {
            return Err(OutputError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        if !self.is_running() {
            return Ok(false);
        }

        self.latency.update();
        Ok(true)
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency.latency()
    }
}
