use thiserror::Error;

/// Errors reported by an [`AudioOutput`](crate::AudioOutput)
#[derive(Debug, Error)]
pub enum OutputError {
    /// `open` was called on an output that is already open
    #[error("output is already open")]
    AlreadyOpen,

    /// The output must be opened first
    #[error("output is not open")]
    NotOpen,

    /// A pushed block has the wrong length
    #[error("expected {expected} interleaved samples, got {actual}")]
    BufferSizeMismatch {
        /// `frames_per_buffer * channel_count`
        expected: usize,
        /// The length that was pushed
        actual: usize,
    },

    /// The output's settings describe a block with no channels or no frames
    #[error("blocks with no channels or no frames can't be pushed")]
    EmptyBlock,

    /// Reading or writing a file failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a WAV file failed
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// There is no sound device to play on
    #[cfg(feature = "device")]
    #[error("no output device available")]
    NoDevice,

    /// The sound device doesn't support the requested stream
    #[cfg(feature = "device")]
    #[error("unsupported stream configuration: {0}")]
    UnsupportedConfig(String),

    /// Creating the stream failed
    #[cfg(feature = "device")]
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    /// Starting the stream failed
    #[cfg(feature = "device")]
    #[error("failed to play output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// Pausing the stream failed
    #[cfg(feature = "device")]
    #[error("failed to pause output stream: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),
}
