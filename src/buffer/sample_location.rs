/// The position of a single sample in a buffer
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleLocation {
    /// Channel index
    pub channel: usize,
    /// Frame index
    pub frame: usize,
}

impl SampleLocation {
    /// Create a location from a channel and a frame
    pub fn new(channel: usize, frame: usize) -> Self {
        Self { channel, frame }
    }

    /// The first frame of the first channel
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// The first frame of `channel`
    pub fn channel(channel: usize) -> Self {
        Self::new(channel, 0)
    }

    /// `frame` in the first channel
    pub fn frame(frame: usize) -> Self {
        Self::new(0, frame)
    }

    /// The same frame in a different channel
    pub fn with_channel(&self, channel: usize) -> Self {
        Self::new(channel, self.frame)
    }

    /// Offset the location by a number of frames
    pub fn offset_frames(&self, frame_count: usize) -> Self {
        Self::new(self.channel, self.frame + frame_count)
    }

    /// Offset the location by a number of channels
    pub fn offset_channels(&self, channel_count: usize) -> Self {
        Self::new(self.channel + channel_count, self.frame)
    }
}
