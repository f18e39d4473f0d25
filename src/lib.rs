#![warn(missing_docs)]

//! pianola is a keyboard-driven synthesizer engine
//!
//! You can use it to:
//! - Create an audio renderer with one or more outputs (sound device, WAV, CSV, tape)
//! - Create generator nodes that play samples or waveforms
//! - Connect the nodes together in a render graph
//! - Shape the sound with echo and frequency filter nodes
//! - Play a recorded tape back into the graph
//! - Route key presses to a pool of piano voices
//! - Track the average latency of every output
//!
//! # Example
//!
//! ```rust
//! use pianola::{AudioRenderer, OutputSettings, Piano, TapeOutput};
//!
//! let settings = OutputSettings::new(512, 44_100, 2);
//! let mut renderer = AudioRenderer::new(settings);
//!
//! renderer.add_output(Box::new(TapeOutput::new(settings)))?;
//! renderer.add_input_handler(Box::new(Piano::with_waveform_voices(
//!     renderer.context(),
//!     pianola::Waveform::Square,
//!     8,
//! )));
//!
//! let handle = renderer.handle();
//! handle.key_down('a');
//! renderer.start()?;
//! renderer.render_block()?;
//! ```

mod buffer;
mod commands;
mod config;
mod effects;
mod engine;
mod graph;
mod keyboard;
mod output;
mod parameter;
mod renderer;
mod score;
mod tape;
mod utility;

pub(crate) use commands::Command;

pub use buffer::AudioBuffer;
pub use buffer::MutableBorrowedAudioBuffer;
pub use buffer::OwnedAudioBuffer;
pub use buffer::SampleLocation;

pub use config::ConfigError;
pub use config::SynthConfig;
pub use config::VoiceConfig;

pub use effects::Echo;
pub use effects::FrequencyFilter;
pub use effects::Gain;
pub use effects::Generator;
pub use effects::GeneratorSource;
pub use effects::TapePlayer;
pub use effects::Waveform;

pub use engine::create_engine;
pub use engine::create_engine_with_options;
pub use engine::AudioProcess;
pub use engine::CommandQueue;
pub use engine::Context;
pub use engine::EngineOptions;

pub use graph::GraphNode;

pub use keyboard::tone_for_key;
pub use keyboard::InputEvent;
pub use keyboard::InputHandler;
pub use keyboard::Key;
pub use keyboard::Keyboard;
pub use keyboard::Piano;
pub use keyboard::PianoKey;
pub use keyboard::KEY_TONE_MAPPING;
pub use keyboard::MIDDLE_C;
pub use keyboard::SEMITONE;

pub use output::AudioOutput;
pub use output::CsvFileOutput;
pub use output::LatencyTracker;
pub use output::OutputError;
pub use output::OutputId;
pub use output::OutputSettings;
pub use output::OutputState;
pub use output::TapeOutput;
pub use output::WavFileOutput;
pub use output::WavSampleFormat;

#[cfg(feature = "device")]
pub use output::DeviceOutput;

pub use parameter::AudioParameter;

pub use renderer::AudioRenderer;
pub use renderer::RendererError;
pub use renderer::RendererHandle;

pub use score::Score;
pub use score::ScoreError;
pub use score::ScoreNote;

pub use tape::AudioTape;
pub use tape::TapeError;

pub use utility::read_wav_file;
pub use utility::write_wav_file;
pub use utility::AudioFileError;
pub use utility::Level;
pub use utility::Timestamp;

pub(crate) const MAXIMUM_FRAME_COUNT: usize = 512;
pub(crate) const MAXIMUM_CHANNEL_COUNT: usize = 2;
