use crate::{AudioBuffer, SampleLocation};
use rand::Rng;

/// An audio buffer that owns its samples
///
/// Samples are stored channel after channel.
#[repr(align(64))]
#[derive(Clone, Debug)]
pub struct OwnedAudioBuffer {
    data: Vec<f32>,
    channel_count: usize,
    frame_count: usize,
    sample_rate: usize,
}

impl OwnedAudioBuffer {
    /// Create a silent buffer
    pub fn new(frame_count: usize, channel_count: usize, sample_rate: usize) -> Self {
        Self {
            data: vec![0.0; frame_count * channel_count],
            channel_count,
            frame_count,
            sample_rate,
        }
    }

    /// Create a buffer from channel-major sample vectors
    ///
    /// Every channel is padded with silence to the length of the longest one.
    pub fn from_channels(channels: &[Vec<f32>], sample_rate: usize) -> Self {
        let frame_count = channels.iter().map(Vec::len).max().unwrap_or(0);
        let mut buffer = Self::new(frame_count, channels.len(), sample_rate);

        for (channel, samples) in channels.iter().enumerate() {
            let data = buffer.get_channel_data_mut(SampleLocation::channel(channel));
            data[..samples.len()].copy_from_slice(samples);
        }

        buffer
    }

    /// Create a buffer of uniformly distributed noise between -1 and 1
    pub fn white_noise(frame_count: usize, channel_count: usize, sample_rate: usize) -> Self {
        let mut buffer = Self::new(frame_count, channel_count, sample_rate);

        let mut random_generator = rand::rng();

        for location in buffer.frame_iter() {
            let sample_value = random_generator.random_range(-1.0..=1.0);
            buffer.set_sample(location, sample_value);
        }

        buffer
    }

    /// Create a buffer with the same sine wave in every channel
    pub fn sine(
        frame_count: usize,
        channel_count: usize,
        sample_rate: usize,
        frequency: f64,
        amplitude: f64,
    ) -> Self {
        debug_assert!(channel_count > 0);

        let mut buffer = Self::new(frame_count, channel_count, sample_rate);

        let channel = buffer.get_channel_data_mut(SampleLocation::origin());

        for (index, sample) in channel.iter_mut().enumerate() {
            let time = index as f64 / sample_rate as f64;
            *sample = (amplitude * (std::f64::consts::TAU * frequency * time).sin()) as f32;
        }

        for channel in 1..channel_count {
            buffer.duplicate_channel(SampleLocation::origin(), channel, frame_count);
        }

        buffer
    }

    fn get_sample_location_bounds(&self, sample_location: &SampleLocation) -> (usize, usize) {
        debug_assert!(sample_location.channel < self.channel_count);
        debug_assert!(sample_location.frame <= self.frame_count);

        let start = sample_location.channel * self.frame_count + sample_location.frame;
        let end = (sample_location.channel + 1) * self.frame_count;
        (start, end)
    }
}

impl AudioBuffer for OwnedAudioBuffer {
    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    fn get_channel_data(&self, sample_location: SampleLocation) -> &[f32] {
        let (start, end) = self.get_sample_location_bounds(&sample_location);
        &self.data[start..end]
    }

    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32] {
        let (start, end) = self.get_sample_location_bounds(&sample_location);
        &mut self.data[start..end]
    }

    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize) {
        let (source_start, _) = self.get_sample_location_bounds(&source);
        let (destination_start, _) =
            self.get_sample_location_bounds(&source.with_channel(to_channel));

        debug_assert!(
            (source_start + frame_count <= destination_start)
                || (destination_start + frame_count <= source_start)
        );

        self.data
            .copy_within(source_start..source_start + frame_count, destination_start);
    }
}
