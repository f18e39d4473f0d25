use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{AudioBuffer, AudioTape, OwnedAudioBuffer};

use super::{
    AudioOutput, OutputError, OutputId, OutputLifecycle, OutputSettings, OutputState,
};

/// Records every pushed block onto an [`AudioTape`]
///
/// The tape is shared, so it can be read while the output is still recording.
pub struct TapeOutput {
    id: OutputId,
    settings: OutputSettings,
    lifecycle: OutputLifecycle,
    tape: Arc<Mutex<AudioTape>>,
    scratch: OwnedAudioBuffer,
}

impl TapeOutput {
    /// Create an output recording onto a new, unbounded tape
    pub fn new(settings: OutputSettings) -> Self {
        let tape = AudioTape::new(
            settings.frames_per_buffer,
            settings.sample_rate,
            settings.channel_count,
            None,
        );

        Self::with_tape(settings, Arc::new(Mutex::new(tape)))
    }

    /// Create an output recording onto `tape`
    pub fn with_tape(settings: OutputSettings, tape: Arc<Mutex<AudioTape>>) -> Self {
        Self {
            id: OutputId::generate(),
            settings,
            lifecycle: OutputLifecycle::default(),
            tape,
            scratch: OwnedAudioBuffer::new(
                settings.frames_per_buffer,
                settings.channel_count,
                settings.sample_rate,
            ),
        }
    }

    /// The tape being recorded on
    pub fn tape(&self) -> Arc<Mutex<AudioTape>> {
        Arc::clone(&self.tape)
    }
}

impl AudioOutput for TapeOutput {
    fn id(&self) -> OutputId {
        self.id
    }

    fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    fn state(&self) -> OutputState {
        self.lifecycle.state()
    }

    fn is_ready(&self) -> bool {
        self.lifecycle.is_running()
    }

    fn push(&mut self, data: &[f32]) -> Result<(), OutputError> {
        if self.lifecycle.accept_push(&self.settings, data)? {
            self.scratch.fill_from_interleaved(
                data,
                self.settings.channel_count,
                self.settings.frames_per_buffer,
            );

            self.tape.lock().record(&self.scratch);
        }

        Ok(())
    }

    fn open(&mut self) -> Result<(), OutputError> {
        self.lifecycle.open(|| Ok(()))
    }

    fn start(&mut self) -> Result<(), OutputError> {
        self.lifecycle.start(|| Ok(()))
    }

    fn stop(&mut self) -> Result<(), OutputError> {
        self.lifecycle.stop(|| Ok(()))
    }

    fn close(&mut self) -> Result<(), OutputError> {
        self.lifecycle.close();
        Ok(())
    }

    fn latency(&self) -> Option<Duration> {
        self.lifecycle.latency()
    }
}

#[cfg(test)]
mod tests {
    use crate::SampleLocation;

    use super::*;

    #[test]
    fn records_pushed_blocks() {
        let settings = OutputSettings::new(2, 1_000, 2);
        let mut output = TapeOutput::new(settings);
        let tape = output.tape();

        output.open().unwrap();
        output.start().unwrap();
        output.push(&[1.0, -1.0, 2.0, -2.0]).unwrap();
        output.push(&[3.0, -3.0, 4.0, -4.0]).unwrap();

        let tape = tape.lock();
        assert_eq!(tape.len(), 4);

        let played = tape.playback(0, 4);
        assert_eq!(
            played.get_channel_data(SampleLocation::channel(1)),
            &[-1.0, -2.0, -3.0, -4.0]
        );
    }

    #[test]
    fn nothing_is_recorded_when_stopped() {
        let settings = OutputSettings::new(2, 1_000, 2);
        let mut output = TapeOutput::new(settings);

        output.open().unwrap();
        output.start().unwrap();
        output.stop().unwrap();
        output.push(&[1.0; 4]).unwrap();

        assert!(!output.is_ready());
        assert!(output.tape().lock().is_empty());
    }
}
