use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use super::{
    AudioOutput, OutputError, OutputId, OutputLifecycle, OutputSettings, OutputState,
};

/// Writes every pushed frame as a row of a CSV file
///
/// The file starts with a `sample_index,time_seconds,channel_0,...` header.
/// Rows are written as blocks arrive and flushed on close.
pub struct CsvFileOutput {
    id: OutputId,
    settings: OutputSettings,
    path: PathBuf,
    lifecycle: OutputLifecycle,
    writer: Option<BufWriter<File>>,
    sample_index: usize,
}

impl CsvFileOutput {
    /// Create an output that writes to `path`
    pub fn new(settings: OutputSettings, path: impl AsRef<Path>) -> Self {
        Self {
            id: OutputId::generate(),
            settings,
            path: path.as_ref().to_path_buf(),
            lifecycle: OutputLifecycle::default(),
            writer: None,
            sample_index: 0,
        }
    }

    /// The file being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_header(writer: &mut impl Write, channel_count: usize) -> std::io::Result<()> {
        write!(writer, "sample_index,time_seconds")?;
        for channel in 0..channel_count {
            write!(writer, ",channel_{channel}")?;
        }
        writeln!(writer)
    }

    fn write_rows(&mut self, data: &[f32]) -> Result<(), OutputError> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(OutputError::NotOpen);
        };

        for frame in data.chunks_exact(self.settings.channel_count) {
            let time_seconds = self.sample_index as f64 / self.settings.sample_rate as f64;
            write!(writer, "{},{}", self.sample_index, time_seconds)?;

            for sample in frame {
                write!(writer, ",{sample}")?;
            }

            writeln!(writer)?;
            self.sample_index += 1;
        }

        Ok(())
    }
}

impl AudioOutput for CsvFileOutput {
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
            self.write_rows(data)?;
        }

        Ok(())
    }

    fn open(&mut self) -> Result<(), OutputError> {
        let path = &self.path;
        let writer = &mut self.writer;
        let sample_index = &mut self.sample_index;
        let channel_count = self.settings.channel_count;

        self.lifecycle.open(|| {
            let mut file = BufWriter::new(File::create(path)?);
            Self::write_header(&mut file, channel_count)?;

            *writer = Some(file);
            *sample_index = 0;

            tracing::info!(path = %path.display(), "Opened csv file");
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

        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            tracing::info!(
                path = %self.path.display(),
                frames = self.sample_index,
                "Closed csv file"
            );
        }

        Ok(())
    }

    fn latency(&self) -> Option<Duration> {
        self.lifecycle.latency()
    }
}

impl Drop for CsvFileOutput {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            tracing::error!(%error, "Failed to flush csv file");
        }
    }
}
