mod audio_tape;
mod tape_error;

pub use audio_tape::AudioTape;
pub use tape_error::TapeError;
