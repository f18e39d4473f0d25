use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    read_wav_file, AudioFileError, Context, Level, OutputSettings, Piano, Waveform,
    MAXIMUM_CHANNEL_COUNT, MIDDLE_C,
};

/// Errors loading a [`SynthConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file couldn't be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file isn't valid JSON for a config
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// The sample for the voices couldn't be loaded
    #[error("failed to load voice sample: {0}")]
    AudioFile(#[from] AudioFileError),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The sound every piano voice makes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VoiceConfig {
    /// A periodic waveform at the key's tone
    Waveform {
        /// The shape of the wave
        waveform: Waveform,
    },

    /// A WAV file played at a rate set by the key's tone
    Sample {
        /// The WAV file to play
        path: PathBuf,

        /// The pitch of the recording in Hz
        #[serde(default = "default_root_frequency")]
        root_frequency: f64,
    },
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig::Waveform {
            waveform: Waveform::Square,
        }
    }
}

fn default_root_frequency() -> f64 {
    MIDDLE_C
}

/// Settings for the synthesizer
///
/// Every field is optional in the JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Frames per second
    pub sample_rate: usize,

    /// Frames in one rendered block
    pub frames_per_buffer: usize,

    /// Output channels
    pub channel_count: usize,

    /// Voices created up front
    pub voice_pool_size: usize,

    /// Level of the bus every voice plays through, written in dB
    #[serde(rename = "gain_db")]
    pub gain: Level,

    /// The key that stops live playback
    pub quit_key: char,

    /// The sound of each voice
    pub voice: VoiceConfig,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            frames_per_buffer: 512,
            channel_count: 2,
            voice_pool_size: 8,
            gain: Level::from_db(-6.0),
            quit_key: 'q',
            voice: VoiceConfig::default(),
        }
    }
}

impl SynthConfig {
    /// Read a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&contents)?;

        tracing::debug!(path = %path.as_ref().display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Parse a config from JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The shape of the blocks the renderer produces
    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings::new(self.frames_per_buffer, self.sample_rate, self.channel_count)
    }

    /// Build a piano with the configured voices and volume
    pub fn create_piano(&self, context: &dyn Context) -> Result<Piano, ConfigError> {
        let mut piano = match &self.voice {
            VoiceConfig::Waveform { waveform } => {
                Piano::with_waveform_voices(context, *waveform, self.voice_pool_size)
            }
            VoiceConfig::Sample {
                path,
                root_frequency,
            } => {
                if *root_frequency <= 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "root_frequency must be positive, got {root_frequency}"
                    )));
                }

                let sample = read_wav_file(path)?;
                Piano::with_sample_voices(context, sample, *root_frequency, self.voice_pool_size)
            }
        };

        piano.set_volume(self.gain);
        Ok(piano)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid("sample_rate must be positive".into()));
        }

        if self.frames_per_buffer == 0 {
            return Err(ConfigError::Invalid(
                "frames_per_buffer must be positive".into(),
            ));
        }

        if !(1..=MAXIMUM_CHANNEL_COUNT).contains(&self.channel_count) {
            return Err(ConfigError::Invalid(format!(
                "channel_count must be between 1 and {MAXIMUM_CHANNEL_COUNT}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::create_engine;

    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SynthConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SynthConfig::default());
        assert_eq!(config.output_settings(), OutputSettings::new(512, 44_100, 2));
    }

    #[test]
    fn reads_waveform_voices() {
        let config = SynthConfig::from_json_str(
            r#"{ "sample_rate": 48000, "voice": { "type": "waveform", "waveform": "sine" } }"#,
        )
        .unwrap();

        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(
            config.voice,
            VoiceConfig::Waveform {
                waveform: Waveform::Sine
            }
        );
    }

    #[test]
    fn sample_voices_default_to_middle_c() {
        let config = SynthConfig::from_json_str(
            r#"{ "voice": { "type": "sample", "path": "piano.wav" } }"#,
        )
        .unwrap();

        assert_eq!(
            config.voice,
            VoiceConfig::Sample {
                path: PathBuf::from("piano.wav"),
                root_frequency: MIDDLE_C
            }
        );
    }

    #[test]
    fn gain_is_in_decibels() {
        let config = SynthConfig::from_json_str(r#"{ "gain_db": -6.0206 }"#).unwrap();
        assert_relative_eq!(config.gain.as_linear(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            SynthConfig::from_json_str(r#"{ "channel_count": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SynthConfig::from_json_str(r#"{ "frames_per_buffer": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SynthConfig::from_json_str(r#"{ "voice": { "type": "organ" } }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn loads_from_a_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("config.json");
        std::fs::write(&path, r#"{ "voice_pool_size": 3, "quit_key": "x" }"#).unwrap();

        let config = SynthConfig::load(&path).unwrap();
        assert_eq!(config.voice_pool_size, 3);
        assert_eq!(config.quit_key, 'x');
    }

    #[test]
    fn creates_a_piano_with_the_pool_size() {
        let (context, _process) = create_engine(44_100);
        let config = SynthConfig {
            voice_pool_size: 5,
            ..Default::default()
        };

        let piano = config.create_piano(context.as_ref()).unwrap();
        assert_eq!(piano.pool_size(), 5);
    }

    #[test]
    fn missing_sample_is_an_error() {
        let (context, _process) = create_engine(44_100);
        let config = SynthConfig {
            voice: VoiceConfig::Sample {
                path: PathBuf::from("/definitely/not/here.wav"),
                root_frequency: MIDDLE_C,
            },
            ..Default::default()
        };

        assert!(matches!(
            config.create_piano(context.as_ref()),
            Err(ConfigError::AudioFile(_))
        ));
    }
}
