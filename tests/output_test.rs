use pianola::{
    read_wav_file, AudioBuffer, AudioOutput, AudioRenderer, CsvFileOutput, InputEvent,
    OutputError, OutputSettings, OutputState, Piano, TapeOutput, WavFileOutput, WavSampleFormat,
    Waveform,
};
use tempfile::TempDir;

const FRAMES_PER_BUFFER: usize = 128;
const SAMPLE_RATE: usize = 44_100;
const CHANNEL_COUNT: usize = 2;

fn settings() -> OutputSettings {
    OutputSettings::new(FRAMES_PER_BUFFER, SAMPLE_RATE, CHANNEL_COUNT)
}

struct Fixture {
    directory: TempDir,
    renderer: AudioRenderer,
}

impl Fixture {
    fn new() -> Self {
        let mut renderer = AudioRenderer::new(settings());
        let piano = Piano::with_waveform_voices(renderer.context(), Waveform::Sine, 4);
        renderer.add_input_handler(Box::new(piano));

        Self {
            directory: tempfile::tempdir().expect("temporary directory"),
            renderer,
        }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.directory.path().join(name)
    }

    fn play(&mut self, block_count: usize) {
        self.renderer.start().unwrap();
        self.renderer.handle().send(InputEvent::KeyDown('a'));

        for _ in 0..block_count {
            assert!(self.renderer.render_block().unwrap());
        }

        self.renderer.terminate().unwrap();
    }
}

#[test]
fn renders_to_a_wav_file() {
    let mut fixture = Fixture::new();
    let path = fixture.path("render.wav");

    let output = WavFileOutput::with_format(settings(), &path, WavSampleFormat::Float32);
    fixture.renderer.add_output(Box::new(output)).unwrap();
    fixture.play(10);

    let file = read_wav_file(&path).unwrap();
    assert_eq!(file.frame_count(), 10 * FRAMES_PER_BUFFER);
    assert_eq!(file.channel_count(), CHANNEL_COUNT);
    assert_eq!(file.sample_rate(), SAMPLE_RATE);
    assert!(!file.is_silent());
}

#[test]
fn renders_to_a_csv_file() {
    let mut fixture = Fixture::new();
    let path = fixture.path("render.csv");

    fixture
        .renderer
        .add_output(Box::new(CsvFileOutput::new(settings(), &path)))
        .unwrap();
    fixture.play(3);

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();

    assert_eq!(
        lines.next(),
        Some("sample_index,time_seconds,channel_0,channel_1")
    );
    assert_eq!(lines.count(), 3 * FRAMES_PER_BUFFER);
}

#[test]
fn file_and_tape_outputs_record_the_same_audio() {
    let mut fixture = Fixture::new();
    let path = fixture.path("render.wav");

    let tape_output = TapeOutput::new(settings());
    let tape = tape_output.tape();

    fixture
        .renderer
        .add_output(Box::new(WavFileOutput::with_format(
            settings(),
            &path,
            WavSampleFormat::Float32,
        )))
        .unwrap();
    fixture.renderer.add_output(Box::new(tape_output)).unwrap();
    fixture.play(4);

    let file = read_wav_file(&path).unwrap();
    let recorded = tape.lock().playback(0, 4 * FRAMES_PER_BUFFER);

    let mut from_file = vec![0.0; file.frame_count() * CHANNEL_COUNT];
    let mut from_tape = vec![0.0; recorded.frame_count() * CHANNEL_COUNT];
    file.copy_to_interleaved(&mut from_file, CHANNEL_COUNT, file.frame_count());
    recorded.copy_to_interleaved(&mut from_tape, CHANNEL_COUNT, recorded.frame_count());

    assert_eq!(from_file, from_tape);
}

#[test]
fn outputs_follow_their_lifecycle() {
    let fixture = Fixture::new();
    let mut output = WavFileOutput::new(settings(), fixture.path("lifecycle.wav"));
    let block = vec![0.0; settings().samples_per_buffer()];

    assert_eq!(output.state(), OutputState::Closed);
    assert!(matches!(output.start(), Err(OutputError::NotOpen)));

    output.open().unwrap();
    assert_eq!(output.state(), OutputState::Open);
    assert!(!output.is_ready());
    assert!(matches!(output.open(), Err(OutputError::AlreadyOpen)));

    output.start().unwrap();
    assert_eq!(output.state(), OutputState::Running);
    assert!(output.is_ready());
    output.push(&block).unwrap();

    output.stop().unwrap();
    assert_eq!(output.state(), OutputState::Open);

    output.close().unwrap();
    assert_eq!(output.state(), OutputState::Closed);
}

#[test]
fn latency_is_reported_after_pushes() {
    let mut output = TapeOutput::new(settings());
    let block = vec![0.0; settings().samples_per_buffer()];

    assert!(output.latency().is_none());

    output.open().unwrap();
    output.start().unwrap();

    for _ in 0..4 {
        output.push(&block).unwrap();
    }

    assert!(output.latency().is_some());
}

#[test]
fn blocks_of_the_wrong_size_are_rejected() {
    let mut output = TapeOutput::new(settings());
    output.open().unwrap();
    output.start().unwrap();

    let result = output.push(&[0.0; 3]);
    assert!(matches!(
        result,
        Err(OutputError::BufferSizeMismatch { .. })
    ));
}
