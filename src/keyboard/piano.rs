use std::collections::{HashMap, VecDeque};

use crate::{
    Context, Gain, Generator, Level, OwnedAudioBuffer, Waveform, MAXIMUM_CHANNEL_COUNT,
};

use super::{tone_for_key, InputEvent, InputHandler, PianoKey};

type VoiceFactory = Box<dyn Fn(&dyn Context) -> Generator>;

/// A polyphonic piano built from a pool of generator voices
///
/// Pressing a tone takes a voice from the pool. Releasing the tone fades the
/// voice out and returns it to the pool. When every voice is in use a new one
/// is created. Every voice plays through one bus, which is connected to the
/// output.
pub struct Piano {
    voice_factory: VoiceFactory,
    bus: Gain,
    pool: VecDeque<PianoKey>,
    pressed: HashMap<u64, PianoKey>,
}

impl Piano {
    /// Create a piano with `pool_size` voices made by `voice_factory`
    pub fn new(
        context: &dyn Context,
        pool_size: usize,
        voice_factory: impl Fn(&dyn Context) -> Generator + 'static,
    ) -> Self {
        let bus = Gain::new(context, MAXIMUM_CHANNEL_COUNT);
        bus.node.connect_to_output();

        let mut piano = Self {
            voice_factory: Box::new(voice_factory),
            bus,
            pool: VecDeque::with_capacity(pool_size),
            pressed: HashMap::with_capacity(pool_size),
        };

        for _ in 0..pool_size {
            piano.add_voice(context);
        }

        piano
    }

    /// Create a piano whose voices play `waveform`
    pub fn with_waveform_voices(
        context: &dyn Context,
        waveform: Waveform,
        pool_size: usize,
    ) -> Self {
        Self::new(context, pool_size, move |context| {
            Generator::from_waveform(context, waveform)
        })
    }

    /// Create a piano whose voices play `sample`, recorded at `root_frequency`
    pub fn with_sample_voices(
        context: &dyn Context,
        sample: OwnedAudioBuffer,
        root_frequency: f64,
        pool_size: usize,
    ) -> Self {
        Self::new(context, pool_size, move |context| {
            Generator::from_sample(context, sample.clone(), root_frequency)
        })
    }

    /// Set the level of the bus every voice plays through
    pub fn set_volume(&mut self, volume: Level) {
        self.bus.set_level(volume);
    }

    /// The level of the bus every voice plays through
    pub fn volume(&self) -> Level {
        self.bus.level()
    }

    /// Play `tone`
    ///
    /// Returns false if the tone is already sounding.
    pub fn key_down(&mut self, context: &dyn Context, tone: f64, gain: Level) -> bool {
        if self.is_sounding(tone) {
            return false;
        }

        let mut key = match self.pool.pop_front() {
            Some(key) => key,
            None => {
                tracing::debug!(tone, "Voice pool exhausted, adding a voice");
                PianoKey::new((self.voice_factory)(context), &self.bus.node)
            }
        };

        key.set_tone(tone);
        key.set_gain(gain);
        key.key_down();

        self.pressed.insert(tone.to_bits(), key);
        true
    }

    /// Release `tone`
    ///
    /// Returns false if the tone wasn't sounding.
    pub fn key_up(&mut self, tone: f64) -> bool {
        match self.pressed.remove(&tone.to_bits()) {
            Some(mut key) => {
                key.key_up();
                self.pool.push_back(key);
                true
            }
            None => false,
        }
    }

    /// The number of idle voices
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// The number of tones currently held
    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }

    /// Whether `tone` is held
    pub fn is_sounding(&self, tone: f64) -> bool {
        self.pressed.contains_key(&tone.to_bits())
    }

    fn add_voice(&mut self, context: &dyn Context) {
        let voice = (self.voice_factory)(context);
        self.pool.push_back(PianoKey::new(voice, &self.bus.node));
    }
}

impl InputHandler for Piano {
    fn handle_input(&mut self, event: InputEvent, context: &dyn Context) -> bool {
        let Some(tone) = tone_for_key(event.key()) else {
            return false;
        };

        match event {
            InputEvent::KeyDown(_) => {
                self.key_down(context, tone, Level::unity());
            }
            InputEvent::KeyUp(_) => {
                self.key_up(tone);
            }
        }

        true
    }
}
