mod audio_output;
mod csv_file_output;
#[cfg(feature = "device")]
mod device_output;
mod latency;
mod lifecycle;
mod output_error;
mod settings;
mod tape_output;
mod wav_file_output;

pub use audio_output::AudioOutput;
pub use csv_file_output::CsvFileOutput;
#[cfg(feature = "device")]
pub use device_output::DeviceOutput;
pub use latency::LatencyTracker;
pub use lifecycle::OutputState;
pub use output_error::OutputError;
pub use settings::OutputId;
pub use settings::OutputSettings;
pub use tape_output::TapeOutput;
pub use wav_file_output::WavFileOutput;
pub use wav_file_output::WavSampleFormat;

pub(crate) use lifecycle::OutputLifecycle;
