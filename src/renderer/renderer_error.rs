use thiserror::Error;

use crate::{OutputError, OutputId, OutputSettings};

/// Errors reported by an [`AudioRenderer`](crate::AudioRenderer)
#[derive(Debug, Error)]
pub enum RendererError {
    /// There is nowhere to send rendered blocks
    #[error("no outputs have been added")]
    NoOutputs,

    /// An output doesn't accept the blocks the renderer produces
    #[error("output settings {actual:?} don't match the renderer's {expected:?}")]
    SettingsMismatch {
        /// The renderer's settings
        expected: OutputSettings,
        /// The output's settings
        actual: OutputSettings,
    },

    /// An output's blocks would have no channels or no frames
    #[error("output settings {0:?} describe an empty block")]
    EmptyBlock(OutputSettings),

    /// No output has this id
    #[error("unknown output {0:?}")]
    UnknownOutput(OutputId),

    /// An output failed
    #[error(transparent)]
    Output(#[from] OutputError),
}
