use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::Mutex;
use pianola::{
    AudioBuffer, AudioOutput, AudioRenderer, AudioTape, Key, Keyboard, OutputError, OutputId,
    OutputSettings, OutputState, Piano, RendererError, SampleLocation, TapeOutput, Waveform,
};

const FRAMES_PER_BUFFER: usize = 256;
const SAMPLE_RATE: usize = 48_000;
const CHANNEL_COUNT: usize = 2;

fn settings() -> OutputSettings {
    OutputSettings::new(FRAMES_PER_BUFFER, SAMPLE_RATE, CHANNEL_COUNT)
}

/// An output that only accepts blocks when told to
struct GatedOutput {
    id: OutputId,
    settings: OutputSettings,
    state: OutputState,
    ready: Arc<AtomicBool>,
    pushed: Arc<AtomicUsize>,
}

impl GatedOutput {
    fn new(settings: OutputSettings) -> (Self, Arc<AtomicBool>, Arc<AtomicUsize>) {
        let ready = Arc::new(AtomicBool::new(false));
        let pushed = Arc::new(AtomicUsize::new(0));

        let output = Self {
            id: OutputId::generate(),
            settings,
            state: OutputState::Closed,
            ready: ready.clone(),
            pushed: pushed.clone(),
        };

        (output, ready, pushed)
    }
}

impl AudioOutput for GatedOutput {
    fn id(&self) -> OutputId {
        self.id
    }

    fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    fn state(&self) -> OutputState {
        self.state
    }

    fn is_ready(&self) -> bool {
        self.state == OutputState::Running && self.ready.load(Ordering::Acquire)
    }

    fn push(&mut self, _data: &[f32]) -> Result<(), OutputError> {
        self.pushed.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn open(&mut self) -> Result<(), OutputError> {
        self.state = OutputState::Open;
        Ok(())
    }

    fn start(&mut self) -> Result<(), OutputError> {
        self.state = OutputState::Running;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), OutputError> {
        self.state = OutputState::Open;
        Ok(())
    }

    fn close(&mut self) -> Result<(), OutputError> {
        self.state = OutputState::Closed;
        Ok(())
    }

    fn latency(&self) -> Option<Duration> {
        None
    }
}

/// An output whose `stop` or `push` can be made to fail
struct FaultyOutput {
    id: OutputId,
    settings: OutputSettings,
    state: Arc<Mutex<OutputState>>,
    fail_stop: bool,
    fail_push: bool,
}

impl FaultyOutput {
    fn new(settings: OutputSettings) -> (Self, Arc<Mutex<OutputState>>) {
        let state = Arc::new(Mutex::new(OutputState::Closed));

        let output = Self {
            id: OutputId::generate(),
            settings,
            state: state.clone(),
            fail_stop: false,
            fail_push: false,
        };

        (output, state)
    }

    fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }
}

impl AudioOutput for FaultyOutput {
    fn id(&self) -> OutputId {
        self.id
    }

    fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    fn state(&self) -> OutputState {
        *self.state.lock()
    }

    fn is_ready(&self) -> bool {
        *self.state.lock() == OutputState::Running
    }

    fn push(&mut self, _data: &[f32]) -> Result<(), OutputError> {
        if self.fail_push {
            return Err(OutputError::BufferSizeMismatch {
                expected: self.settings.samples_per_buffer(),
                actual: 0,
            });
        }

        Ok(())
    }

    fn open(&mut self) -> Result<(), OutputError> {
        *self.state.lock() = OutputState::Open;
        Ok(())
    }

    fn start(&mut self) -> Result<(), OutputError> {
        *self.state.lock() = OutputState::Running;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), OutputError> {
        if self.fail_stop {
            return Err(OutputError::NotOpen);
        }

        *self.state.lock() = OutputState::Open;
        Ok(())
    }

    fn close(&mut self) -> Result<(), OutputError> {
        *self.state.lock() = OutputState::Closed;
        Ok(())
    }

    fn latency(&self) -> Option<Duration> {
        None
    }
}

struct Fixture {
    renderer: AudioRenderer,
    tapes: Vec<Arc<Mutex<AudioTape>>>,
}

impl Fixture {
    fn with_tape_outputs(count: usize) -> Self {
        let mut renderer = AudioRenderer::new(settings());
        let mut tapes = Vec::new();

        for _ in 0..count {
            let output = TapeOutput::new(settings());
            tapes.push(output.tape());
            renderer
                .add_output(Box::new(output))
                .expect("matching settings");
        }

        Self { renderer, tapes }
    }

    fn with_piano(mut self) -> Self {
        let piano = Piano::with_waveform_voices(self.renderer.context(), Waveform::Sawtooth, 4);
        self.renderer.add_input_handler(Box::new(piano));
        self
    }

    fn render_blocks(&mut self, count: usize) {
        for _ in 0..count {
            assert!(self.renderer.render_block().expect("render"));
        }
    }
}

#[test]
fn cannot_start_without_outputs() {
    let mut renderer = AudioRenderer::new(settings());
    assert!(matches!(renderer.start(), Err(RendererError::NoOutputs)));
    assert!(matches!(
        renderer.render_block(),
        Err(RendererError::NoOutputs)
    ));
}

#[test]
fn rejects_outputs_with_other_settings() {
    let mut renderer = AudioRenderer::new(settings());
    let output = TapeOutput::new(OutputSettings::new(128, SAMPLE_RATE, CHANNEL_COUNT));

    let result = renderer.add_output(Box::new(output));
    assert!(matches!(
        result,
        Err(RendererError::SettingsMismatch { .. })
    ));
    assert!(renderer.lead_output().is_none());
}

#[test]
fn waits_for_the_lead_output() {
    let mut renderer = AudioRenderer::new(settings());
    let (gated, ready, pushed) = GatedOutput::new(settings());
    renderer.add_output(Box::new(gated)).unwrap();

    let tape_output = TapeOutput::new(settings());
    let tape = tape_output.tape();
    renderer.add_output(Box::new(tape_output)).unwrap();

    renderer.start().unwrap();

    assert!(!renderer.render_block().unwrap());
    assert_eq!(renderer.frame_count(), 0);
    assert_eq!(pushed.load(Ordering::Acquire), 0);
    assert!(tape.lock().is_empty());

    ready.store(true, Ordering::Release);

    assert!(renderer.render_block().unwrap());
    assert_eq!(renderer.frame_count(), 1);
    assert_eq!(pushed.load(Ordering::Acquire), 1);
    assert_eq!(tape.lock().len(), FRAMES_PER_BUFFER);
}

#[test]
fn the_lead_output_can_be_changed() {
    let mut renderer = AudioRenderer::new(settings());

    let tape_output = TapeOutput::new(settings());
    let tape_id = renderer.add_output(Box::new(tape_output)).unwrap();

    let (gated, _ready, _pushed) = GatedOutput::new(settings());
    let gated_id = renderer.add_output(Box::new(gated)).unwrap();

    assert_eq!(renderer.lead_output().map(|output| output.id()), Some(tape_id));

    renderer.set_lead_output(gated_id).unwrap();
    renderer.start().unwrap();

    assert!(!renderer.render_block().unwrap());

    assert!(matches!(
        renderer.set_lead_output(OutputId::generate()),
        Err(RendererError::UnknownOutput(_))
    ));
}

#[test]
fn removing_the_lead_output_hands_over_to_the_next() {
    let mut fixture = Fixture::with_tape_outputs(2);
    let first = fixture.renderer.lead_output().map(|output| output.id()).unwrap();

    let removed = fixture.renderer.remove_output(first);
    assert!(removed.is_some());

    let lead = fixture.renderer.lead_output().map(|output| output.id());
    assert!(lead.is_some());
    assert_ne!(lead, Some(first));
    assert!(fixture.renderer.find_output(first).is_none());
}

#[test]
fn every_output_receives_the_same_blocks() {
    let mut fixture = Fixture::with_tape_outputs(2).with_piano();
    fixture.renderer.start().unwrap();

    fixture.renderer.handle().key_down('a');
    fixture.render_blocks(4);

    assert_eq!(fixture.renderer.frame_count(), 4);

    let first = fixture.tapes[0].lock().playback(0, 4 * FRAMES_PER_BUFFER);
    let second = fixture.tapes[1].lock().playback(0, 4 * FRAMES_PER_BUFFER);

    assert!(!first.is_silent());

    for channel in 0..CHANNEL_COUNT {
        assert_eq!(
            first.get_channel_data(SampleLocation::channel(channel)),
            second.get_channel_data(SampleLocation::channel(channel))
        );
    }
}

#[test]
fn silent_without_input() {
    let mut fixture = Fixture::with_tape_outputs(1).with_piano();
    fixture.renderer.start().unwrap();
    fixture.render_blocks(2);

    let recorded = fixture.tapes[0].lock().playback(0, 2 * FRAMES_PER_BUFFER);
    assert!(recorded.is_silent());
}

#[test]
fn pause_holds_rendering_until_unpaused() {
    let mut fixture = Fixture::with_tape_outputs(1);
    fixture.renderer.start().unwrap();

    fixture.renderer.pause();
    assert!(fixture.renderer.is_paused());
    assert!(!fixture.renderer.render_block().unwrap());
    assert_eq!(fixture.renderer.frame_count(), 0);

    assert!(fixture.renderer.increment().unwrap());
    assert_eq!(fixture.renderer.frame_count(), 1);

    fixture.renderer.unpause();
    assert!(fixture.renderer.render_block().unwrap());
    assert_eq!(fixture.renderer.frame_count(), 2);
    assert_eq!(fixture.tapes[0].lock().len(), 2 * FRAMES_PER_BUFFER);
}

#[test]
fn terminating_through_a_handle_stops_rendering() {
    let mut fixture = Fixture::with_tape_outputs(1);
    fixture.renderer.start().unwrap();

    let handle = fixture.renderer.handle();
    assert!(handle.is_running());

    handle.terminate();
    assert!(!handle.is_running());
    assert!(!fixture.renderer.render_block().unwrap());

    fixture.renderer.terminate().unwrap();

    let output = fixture.renderer.lead_output().unwrap();
    assert_eq!(output.state(), OutputState::Closed);
}

#[test]
fn run_returns_once_terminated() {
    let mut fixture = Fixture::with_tape_outputs(1);
    let handle = fixture.renderer.handle();

    let terminator = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        handle.terminate();
    });

    fixture.renderer.run().unwrap();
    terminator.join().unwrap();

    assert!(fixture.renderer.frame_count() > 0);
    assert!(!fixture.tapes[0].lock().is_empty());
}

#[test]
fn rejects_outputs_with_empty_blocks() {
    let empty = OutputSettings::new(FRAMES_PER_BUFFER, SAMPLE_RATE, 0);
    let mut renderer = AudioRenderer::new(empty);

    let result = renderer.add_output(Box::new(TapeOutput::new(empty)));
    assert!(matches!(result, Err(RendererError::EmptyBlock(_))));
}

#[test]
fn a_consumed_event_is_not_offered_to_later_handlers() {
    let mut fixture = Fixture::with_tape_outputs(1);

    let mut keyboard = Keyboard::new();
    keyboard.add_key(Key::new('a'));
    fixture.renderer.add_input_handler(Box::new(keyboard));

    let mut fixture = fixture.with_piano();
    fixture.renderer.start().unwrap();

    let handle = fixture.renderer.handle();
    handle.key_down('a');
    fixture.render_blocks(2);

    let consumed = fixture.tapes[0].lock().playback(0, 2 * FRAMES_PER_BUFFER);
    assert!(consumed.is_silent());

    handle.key_down('s');
    fixture.render_blocks(2);

    let passed_on = fixture.tapes[0]
        .lock()
        .playback(2 * FRAMES_PER_BUFFER, 2 * FRAMES_PER_BUFFER);
    assert!(!passed_on.is_silent());
}

#[test]
fn terminate_closes_every_output_and_reports_the_first_failure() {
    let mut renderer = AudioRenderer::new(settings());

    let (failing, failing_state) = FaultyOutput::new(settings());
    renderer.add_output(Box::new(failing.failing_stop())).unwrap();

    let (healthy, healthy_state) = FaultyOutput::new(settings());
    renderer.add_output(Box::new(healthy)).unwrap();

    renderer.start().unwrap();
    assert_eq!(*failing_state.lock(), OutputState::Running);

    let result = renderer.terminate();

    assert!(matches!(
        result,
        Err(RendererError::Output(OutputError::NotOpen))
    ));
    assert_eq!(*failing_state.lock(), OutputState::Closed);
    assert_eq!(*healthy_state.lock(), OutputState::Closed);
}

#[test]
fn run_closes_the_outputs_when_a_push_fails() {
    let mut renderer = AudioRenderer::new(settings());

    let (failing, failing_state) = FaultyOutput::new(settings());
    renderer.add_output(Box::new(failing.failing_push())).unwrap();

    let tape_output = TapeOutput::new(settings());
    let tape_id = renderer.add_output(Box::new(tape_output)).unwrap();

    let result = renderer.run();

    assert!(matches!(
        result,
        Err(RendererError::Output(OutputError::BufferSizeMismatch { .. }))
    ));
    assert_eq!(*failing_state.lock(), OutputState::Closed);

    let tape = renderer.find_output(tape_id).unwrap();
    assert_eq!(tape.state(), OutputState::Closed);
    assert!(!renderer.handle().is_running());
}
