use crate::{Generator, GraphNode, Level};

/// One voice of a [`Piano`](crate::Piano)
///
/// The voice is connected to its destination when the key is created.
pub struct PianoKey {
    voice: Generator,
    tone: f64,
}

impl PianoKey {
    /// Wrap `voice` and connect it to `destination`
    pub fn new(voice: Generator, destination: &GraphNode) -> Self {
        voice.node.connect_to(destination);

        Self {
            tone: voice.tone.get_value(),
            voice,
        }
    }

    /// Set the tone in Hz, starting at the next block
    pub fn set_tone(&mut self, tone: f64) {
        self.tone = tone;
        self.voice.tone.set_value_now(tone);
    }

    /// Set the gain, starting at the next block
    pub fn set_gain(&mut self, gain: Level) {
        self.voice.gain.set_value_now(gain.as_linear());
    }

    /// The last tone that was set
    pub fn tone(&self) -> f64 {
        self.tone
    }

    /// Start playing from the beginning
    pub fn key_down(&mut self) {
        self.voice.play_now();
    }

    /// Fade the voice out
    pub fn key_up(&mut self) {
        self.voice.stop_now();
    }

    /// The generator behind this key
    pub fn voice(&self) -> &Generator {
        &self.voice
    }
}
