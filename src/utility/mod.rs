mod audio_file;
mod level;
mod timestamp;

pub use audio_file::read_wav_file;
pub use audio_file::write_wav_file;
pub(crate) use audio_file::pcm_16_from_float;
pub use audio_file::AudioFileError;
pub use level::Level;
pub use timestamp::Timestamp;
