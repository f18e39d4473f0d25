use thiserror::Error;

use crate::AudioFileError;

/// Errors importing or exporting an [`AudioTape`](crate::AudioTape)
#[derive(Debug, Error)]
pub enum TapeError {
    /// The audio file couldn't be read or written
    #[error(transparent)]
    AudioFile(#[from] AudioFileError),

    /// The requested range is empty or starts before zero
    #[error("invalid range: {start} to {end} seconds")]
    InvalidRange {
        /// Start of the range in seconds
        start: f64,
        /// End of the range in seconds
        end: f64,
    },

    /// The requested range starts after the end of the file
    #[error("start time {start} is beyond the end of the file ({duration} seconds)")]
    StartOutOfRange {
        /// Start of the range in seconds
        start: f64,
        /// Length of the file in seconds
        duration: f64,
    },
}
