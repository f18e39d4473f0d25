use std::path::Path;

use crate::{
    read_wav_file, utility::write_wav_file, AudioBuffer, OwnedAudioBuffer, SampleLocation,
};

use super::TapeError;

/// Recorded audio with separate record and playback positions
///
/// Positions are frame indices counted from the first frame ever recorded.
/// Without a capacity the tape grows as it is recorded on. With a capacity
/// the tape keeps the most recent `capacity` frames: recording past the end
/// of the window slides it forward, and frames that fall before the window are
/// dropped.
#[derive(Clone, Debug)]
pub struct AudioTape {
    frames_per_buffer: usize,
    sample_rate: usize,
    capacity: Option<usize>,
    channels: Vec<Vec<f32>>,
    record_position: usize,
    playback_position: usize,
}

impl AudioTape {
    /// Create an empty tape
    pub fn new(
        frames_per_buffer: usize,
        sample_rate: usize,
        channel_count: usize,
        capacity: Option<usize>,
    ) -> Self {
        let channel_length = capacity.unwrap_or(0);

        Self {
            frames_per_buffer,
            sample_rate,
            capacity,
            channels: vec![vec![0.0; channel_length]; channel_count],
            record_position: 0,
            playback_position: 0,
        }
    }

    /// Load part of a WAV file onto a new tape
    ///
    /// `start` defaults to the beginning of the file and `end` to its end. An
    /// `end` beyond the file is clamped to the file's length. The tape takes
    /// the sample rate and channel count of the file, and its record position
    /// is placed after the loaded audio.
    pub fn load_wav(
        path: impl AsRef<Path>,
        frames_per_buffer: usize,
        start: Option<f64>,
        end: Option<f64>,
    ) -> Result<Self, TapeError> {
        let file = read_wav_file(path.as_ref())?;
        let duration = file.length_in_seconds();

        let start = start.unwrap_or(0.0);
        let end = end.unwrap_or(duration);

        if start < 0.0 || end <= start {
            return Err(TapeError::InvalidRange { start, end });
        }

        let sample_rate = file.sample_rate();
        let start_frame = (start * sample_rate as f64) as usize;
        let end_frame =
            ((end.min(duration) * sample_rate as f64) as usize).min(file.frame_count());

        if start_frame >= file.frame_count() {
            return Err(TapeError::StartOutOfRange { start, duration });
        }

        let channel_count = file.channel_count();
        let frame_count = end_frame - start_frame;

        let mut loaded = OwnedAudioBuffer::new(frame_count, channel_count, sample_rate);
        loaded.copy_from(
            &file,
            SampleLocation::frame(start_frame),
            SampleLocation::origin(),
            channel_count,
            frame_count,
        );

        let mut tape = Self::new(frames_per_buffer, sample_rate, channel_count, None);
        tape.record(&loaded);

        tracing::debug!(
            path = %path.as_ref().display(),
            start_frame,
            end_frame,
            "Loaded tape"
        );

        Ok(tape)
    }

    /// Write the recorded frames to a 16-bit WAV file
    pub fn export_wav(&self, path: impl AsRef<Path>) -> Result<(), TapeError> {
        let buffer = self.playback(self.first_frame(), self.len());
        write_wav_file(path, &buffer)?;
        Ok(())
    }

    /// Append `buffer` at the record position
    pub fn record(&mut self, buffer: &dyn AudioBuffer) {
        self.record_at(buffer, self.record_position);
    }

    /// Write `buffer` starting at `frame_offset`, replacing what was there
    ///
    /// Any gap between the end of the tape and `frame_offset` is filled with
    /// silence. Channels missing from `buffer` are recorded as silence.
    pub fn record_at(&mut self, buffer: &dyn AudioBuffer, frame_offset: usize) {
        let frame_count = buffer.frame_count();
        let write_end = frame_offset + frame_count;

        match self.capacity {
            None => {
                for channel in self.channels.iter_mut() {
                    if channel.len() < write_end {
                        channel.resize(write_end, 0.0);
                    }
                }
            }
            Some(0) => return,
            Some(capacity) => {
                let window_end = self.first_frame() + capacity;
                if write_end > window_end {
                    self.slide_window(write_end - window_end);
                }
            }
        }

        self.record_position = self.record_position.max(write_end);

        let first_frame = self.first_frame();
        if write_end <= first_frame {
            return;
        }

        let skipped = first_frame.saturating_sub(frame_offset);
        let destination_start = frame_offset + skipped - first_frame;

        for (channel, data) in self.channels.iter_mut().enumerate() {
            let destination =
                &mut data[destination_start..destination_start + frame_count - skipped];

            if channel < buffer.channel_count() {
                let source = buffer.get_channel_data(SampleLocation::new(channel, skipped));
                destination.copy_from_slice(&source[..destination.len()]);
            } else {
                destination.fill(0.0);
            }
        }
    }

    /// Read `frame_count` frames starting at `frame_offset`
    ///
    /// Frames that aren't on the tape are silent.
    pub fn playback(&self, frame_offset: usize, frame_count: usize) -> OwnedAudioBuffer {
        let mut buffer =
            OwnedAudioBuffer::new(frame_count, self.channel_count(), self.sample_rate);

        let first_frame = self.first_frame();
        let available_end = first_frame + self.len();

        let start = frame_offset.max(first_frame);
        let end = (frame_offset + frame_count).min(available_end);

        if start >= end {
            return buffer;
        }

        for (channel, data) in self.channels.iter().enumerate() {
            let source = &data[start - first_frame..end - first_frame];
            let destination =
                buffer.get_channel_data_mut(SampleLocation::new(channel, start - frame_offset));
            destination[..source.len()].copy_from_slice(source);
        }

        buffer
    }

    /// Read `frame_count` frames starting at `frame_offset` as interleaved samples
    pub fn playback_interleaved(&self, frame_offset: usize, frame_count: usize) -> Vec<f32> {
        let buffer = self.playback(frame_offset, frame_count);
        let channel_count = self.channel_count();

        let mut interleaved = vec![0.0; frame_count * channel_count];
        buffer.copy_to_interleaved(&mut interleaved, channel_count, frame_count);
        interleaved
    }

    /// Read one block at the playback position and move the position on
    pub fn playback_block(&mut self) -> OwnedAudioBuffer {
        let buffer = self.playback(self.playback_position, self.frames_per_buffer);
        self.playback_position += self.frames_per_buffer;
        buffer
    }

    /// Erase the tape and move both positions back to the start
    pub fn clear(&mut self) {
        let channel_length = self.capacity.unwrap_or(0);

        for channel in self.channels.iter_mut() {
            channel.clear();
            channel.resize(channel_length, 0.0);
        }

        self.record_position = 0;
        self.playback_position = 0;
    }

    /// The number of frames held on the tape
    pub fn len(&self) -> usize {
        match self.capacity {
            Some(capacity) => self.record_position.min(capacity),
            None => self.record_position,
        }
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The length of the held frames in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// The position of the oldest frame still held
    pub fn first_frame(&self) -> usize {
        match self.capacity {
            Some(capacity) => self.record_position.saturating_sub(capacity),
            None => 0,
        }
    }

    /// The frame after the last frame recorded
    pub fn record_position(&self) -> usize {
        self.record_position
    }

    /// The frame [`AudioTape::playback_block`] reads from next
    pub fn playback_position(&self) -> usize {
        self.playback_position
    }

    /// Move the playback position
    pub fn set_playback_position(&mut self, frame: usize) {
        self.playback_position = frame;
    }

    /// The largest number of frames held, if the tape is bounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// The number of frames in one block
    pub fn frames_per_buffer(&self) -> usize {
        self.frames_per_buffer
    }

    /// The number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Frames per second
    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    fn slide_window(&mut self, shift: usize) {
        for channel in self.channels.iter_mut() {
            let length = channel.len();

            if shift >= length {
                channel.fill(0.0);
            } else {
                channel.copy_within(shift.., 0);
                channel[length - shift..].fill(0.0);
            }
        }
    }
}
