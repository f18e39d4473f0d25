use crate::{AudioBuffer, SampleLocation};

/// A window onto part of another buffer
///
/// The engine uses these to render a long callback buffer in blocks, and the
/// graph to hand each node the channels it reads.
pub struct MutableBorrowedAudioBuffer<'a> {
    buffer: &'a mut dyn AudioBuffer,
    channel_offset: usize,
    channel_count: usize,
    frame_offset: usize,
    frame_count: usize,
}

impl<'a> MutableBorrowedAudioBuffer<'a> {
    /// Create a slice of another audio buffer with a subset of frames
    pub fn slice_frames(
        buffer: &'a mut dyn AudioBuffer,
        frame_offset: usize,
        frame_count: usize,
    ) -> Self {
        let channel_count = buffer.channel_count();
        Self::slice(buffer, 0, channel_count, frame_offset, frame_count)
    }

    /// Create a slice of another audio buffer with a subset of channels and frames
    pub fn slice(
        buffer: &'a mut dyn AudioBuffer,
        channel_offset: usize,
        channel_count: usize,
        frame_offset: usize,
        frame_count: usize,
    ) -> Self {
        assert!(channel_offset + channel_count <= buffer.channel_count());
        assert!(frame_offset + frame_count <= buffer.frame_count());

        Self {
            buffer,
            channel_offset,
            channel_count,
            frame_offset,
            frame_count,
        }
    }

    fn translate(&self, sample_location: SampleLocation) -> SampleLocation {
        sample_location
            .offset_frames(self.frame_offset)
            .offset_channels(self.channel_offset)
    }
}

impl<'a> AudioBuffer for MutableBorrowedAudioBuffer<'a> {
    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn sample_rate(&self) -> usize {
        self.buffer.sample_rate()
    }

    fn get_channel_data(&self, sample_location: SampleLocation) -> &[f32] {
        let data = self.buffer.get_channel_data(self.translate(sample_location));
        let end = self.frame_count - sample_location.frame;
        &data[0..end]
    }

    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32] {
        let location = self.translate(sample_location);
        let data = self.buffer.get_channel_data_mut(location);
        let end = self.frame_count - sample_location.frame;
        &mut data[0..end]
    }

    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize) {
        let source = self.translate(source);
        self.buffer
            .duplicate_channel(source, to_channel + self.channel_offset, frame_count);
    }
}
