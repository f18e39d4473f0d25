use std::path::Path;

use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation};

/// Errors reading or writing audio files
#[derive(Debug, thiserror::Error)]
pub enum AudioFileError {
    /// The file could not be opened or written
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The WAV data could not be decoded or encoded
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    /// The file contains no channels
    #[error("the file has no audio channels")]
    NoChannels,
}

/// Read a WAV file into a buffer
///
/// Integer samples are scaled into the range -1.0 to 1.0.
pub fn read_wav_file(path: impl AsRef<Path>) -> Result<OwnedAudioBuffer, AudioFileError> {
    let path = path.as_ref();
    let mut reader = hound::WavReader::open(path)?;
    let specification = reader.spec();

    let channel_count = specification.channels as usize;
    if channel_count == 0 {
        return Err(AudioFileError::NoChannels);
    }

    let sample_rate = specification.sample_rate as usize;
    let frame_count = reader.len() as usize / channel_count;

    let mut buffer = OwnedAudioBuffer::new(frame_count, channel_count, sample_rate);

    match specification.sample_format {
        hound::SampleFormat::Float => {
            for (position, sample) in reader.samples::<f32>().enumerate() {
                let location =
                    SampleLocation::new(position % channel_count, position / channel_count);
                if location.frame < frame_count {
                    buffer.set_sample(location, sample?);
                }
            }
        }
        hound::SampleFormat::Int => {
            let max_value = (2_i64.pow(specification.bits_per_sample as u32 - 1) - 1) as f64;

            for (position, sample) in reader.samples::<i32>().enumerate() {
                let location =
                    SampleLocation::new(position % channel_count, position / channel_count);
                if location.frame < frame_count {
                    buffer.set_sample(location, (sample? as f64 / max_value) as f32);
                }
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        frame_count,
        channel_count,
        sample_rate,
        "Read wav file"
    );

    Ok(buffer)
}

/// Write a buffer to a 16-bit WAV file
///
/// Samples are clamped to the range -1.0 to 1.0.
pub fn write_wav_file(
    path: impl AsRef<Path>,
    buffer: &dyn AudioBuffer,
) -> Result<(), AudioFileError> {
    let specification = hound::WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate() as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path.as_ref(), specification)?;

    for frame in 0..buffer.frame_count() {
        for channel in 0..buffer.channel_count() {
            let sample = buffer.get_sample(SampleLocation::new(channel, frame));
            writer.write_sample(pcm_16_from_float(sample))?;
        }
    }

    writer.finalize()?;

    Ok(())
}

pub(crate) fn pcm_16_from_float(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
