mod audio_buffer;
mod mutable_borrowed_audio_buffer;
mod owned_audio_buffer;
mod sample_location;

pub use audio_buffer::AudioBuffer;
pub use mutable_borrowed_audio_buffer::MutableBorrowedAudioBuffer;
pub use owned_audio_buffer::OwnedAudioBuffer;
pub use sample_location::SampleLocation;
