use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::utility::pcm_16_from_float;

use super::{
    AudioOutput, OutputError, OutputId, OutputLifecycle, OutputSettings, OutputState,
};

/// The sample format written by a [`WavFileOutput`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WavSampleFormat {
    /// 16-bit PCM, clamped to the range -1.0 to 1.0
    #[default]
    Int16,

    /// 32-bit float, written as is
    Float32,
}

impl WavSampleFormat {
    fn specification(&self, settings: &OutputSettings) -> hound::WavSpec {
        let (bits_per_sample, sample_format) = match self {
            WavSampleFormat::Int16 => (16, hound::SampleFormat::Int),
            WavSampleFormat::Float32 => (32, hound::SampleFormat::Float),
        };

        hound::WavSpec {
            channels: settings.channel_count as u16,
            sample_rate: settings.sample_rate as u32,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Writes every pushed block to a WAV file
///
/// The file is created on open and its header is finalised on close.
pub struct WavFileOutput {
    id: OutputId,
    settings: OutputSettings,
    path: PathBuf,
    format: WavSampleFormat,
    lifecycle: OutputLifecycle,
    writer: Option<hound::WavWriter<BufWriter<File>>>,
}

impl WavFileOutput {
    /// Create an output that writes 16-bit PCM to `path`
    pub fn new(settings: OutputSettings, path: impl AsRef<Path>) -> Self {
        Self::with_format(settings, path, WavSampleFormat::Int16)
    }

    /// Create an output that writes `format` samples to `path`
    pub fn with_format(
        settings: OutputSettings,
        path: impl AsRef<Path>,
        format: WavSampleFormat,
    ) -> Self {
        Self {
            id: OutputId::generate(),
            settings,
            path: path.as_ref().to_path_buf(),
            format,
            lifecycle: OutputLifecycle::default(),
            writer: None,
        }
    }

    /// The file being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&mut self, data: &[f32]) -> Result<(), OutputError> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(OutputError::NotOpen);
        };

        match self.format {
            WavSampleFormat::Int16 => {
                for sample in data {
                    writer.write_sample(pcm_16_from_float(*sample))?;
                }
            }
            WavSampleFormat::Float32 => {
                for sample in data {
                    writer.write_sample(*sample)?;
                }
            }
        }

        Ok(())
    }
}

impl AudioOutput for WavFileOutput {
    fn id(&self) -> OutputId {
        self.id
    }

    fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    fn state(&self) -> OutputState {
        self.lifecycle.state()
    }

    fn is_ready(&self) -> bool {
        self.lifecycle.is_running()
    }

    fn push(&mut self, data: &[f32]) -> Result<(), OutputError> {
        if self.lifecycle.accept_push(&self.settings, data)? {
            self.write(data)?;
        }

        Ok(())
    }

    fn open(&mut self) -> Result<(), OutputError> {
        let specification = self.format.specification(&self.settings);
        let path = &self.path;
        let writer = &mut self.writer;

        self.lifecycle.open(|| {
            *writer = Some(hound::WavWriter::create(path, specification)?);
            tracing::info!(path = %path.display(), "Opened wav file");
            Ok(())
        })
    }

    fn start(&mut self) -> Result<(), OutputError> {
        self.lifecycle.start(|| Ok(()))
    }

    fn stop(&mut self) -> Result<(), OutputError> {
        self.lifecycle.stop(|| Ok(()))
    }

    fn close(&mut self) -> Result<(), OutputError> {
        self.lifecycle.close();

        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
            tracing::info!(path = %self.path.display(), "Closed wav file");
        }

        Ok(())
    }

    fn latency(&self) -> Option<Duration> {
        self.lifecycle.latency()
    }
}

impl Drop for WavFileOutput {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            tracing::error!(%error, "Failed to finalise wav file");
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{read_wav_file, AudioBuffer, SampleLocation};

    use super::*;

    fn settings() -> OutputSettings {
        OutputSettings::new(4, 8_000, 2)
    }

    #[test]
    fn writes_pushed_blocks() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("output.wav");

        let mut output = WavFileOutput::new(settings(), &path);
        output.open().unwrap();
        output.start().unwrap();
        output.push(&[0.5, -0.5, 0.25, -0.25, 0.0, 0.0, 1.0, -1.0]).unwrap();
        output.push(&[0.1; 8]).unwrap();
        output.close().unwrap();

        let buffer = read_wav_file(&path).unwrap();
        assert_eq!(buffer.frame_count(), 8);
        assert_eq!(buffer.channel_count(), 2);
        assert_relative_eq!(
            buffer.get_sample(SampleLocation::new(1, 0)),
            -0.5,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            buffer.get_sample(SampleLocation::new(0, 3)),
            1.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn float_files_keep_values_beyond_unity() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("output.wav");

        let mut output = WavFileOutput::with_format(settings(), &path, WavSampleFormat::Float32);
        output.open().unwrap();
        output.start().unwrap();
        output.push(&[2.0; 8]).unwrap();
        output.close().unwrap();

        let buffer = read_wav_file(&path).unwrap();
        assert_relative_eq!(buffer.get_sample(SampleLocation::new(0, 0)), 2.0);
    }

    #[test]
    fn ignores_blocks_until_started() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("output.wav");

        let mut output = WavFileOutput::new(settings(), &path);
        output.open().unwrap();
        output.push(&[0.5; 8]).unwrap();
        assert!(!output.is_ready());
        output.close().unwrap();

        let buffer = read_wav_file(&path).unwrap();
        assert_eq!(buffer.frame_count(), 0);
    }
}
