use crate::OwnedAudioBuffer;

use super::Waveform;

/// What a [`super::Generator`] plays
#[derive(Clone, Debug)]
pub enum GeneratorSource {
    /// A recorded sample, played once from the start
    ///
    /// The sample plays at its original speed when the tone equals
    /// `root_frequency`.
    Sample {
        /// The sample data
        buffer: OwnedAudioBuffer,
        /// The pitch of the recording in Hz
        root_frequency: f64,
    },

    /// A periodic waveform played at the tone frequency
    Waveform(Waveform),
}
