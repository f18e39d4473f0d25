use std::time::Duration;

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat, SampleRate, Stream, StreamConfig,
};
use crossbeam::channel::{Receiver, Sender};

use super::{
    AudioOutput, OutputError, OutputId, OutputLifecycle, OutputSettings, OutputState,
};

const QUEUED_BLOCK_LIMIT: usize = 2;
const CHANNEL_CAPACITY: usize = 4;

/// Plays pushed blocks on the default sound device
///
/// Blocks are handed to the device callback through a bounded queue. The
/// output is ready while fewer than two blocks are waiting. When the queue
/// runs dry the device plays silence.
pub struct DeviceOutput {
    id: OutputId,
    settings: OutputSettings,
    lifecycle: OutputLifecycle,
    stream: Option<Stream>,
    block_tx: Option<Sender<Vec<f32>>>,
}

impl DeviceOutput {
    /// Create an output for the default device
    ///
    /// The device isn't touched until the output is opened.
    pub fn new(settings: OutputSettings) -> Self {
        Self {
            id: OutputId::generate(),
            settings,
            lifecycle: OutputLifecycle::default(),
            stream: None,
            block_tx: None,
        }
    }

    fn queued_block_count(&self) -> usize {
        self.block_tx.as_ref().map_or(usize::MAX, Sender::len)
    }
}

fn choose_config(
    device: &cpal::Device,
    settings: &OutputSettings,
) -> Result<StreamConfig, OutputError> {
    let sample_rate = SampleRate(settings.sample_rate as u32);
    let channel_count = settings.channel_count as u16;

    let supported = device
        .supported_output_configs()
        .map_err(|error| OutputError::UnsupportedConfig(error.to_string()))?
        .find(|config| {
            config.channels() == channel_count
                && config.sample_format() == SampleFormat::F32
                && config.min_sample_rate() <= sample_rate
                && sample_rate <= config.max_sample_rate()
        })
        .ok_or_else(|| {
            OutputError::UnsupportedConfig(format!(
                "{channel_count} channels of f32 at {} Hz",
                settings.sample_rate
            ))
        })?;

    Ok(supported.with_sample_rate(sample_rate).config())
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    block_rx: Receiver<Vec<f32>>,
) -> Result<Stream, OutputError> {
    let mut pending: Vec<f32> = Vec::new();
    let mut position = 0;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for sample in data.iter_mut() {
                if position >= pending.len() {
                    match block_rx.try_recv() {
                        Ok(block) => {
                            pending = block;
                            position = 0;
                        }
                        Err(_) => {
                            *sample = 0.0;
                            continue;
                        }
                    }
                }

                *sample = pending.get(position).copied().unwrap_or(0.0);
                position += 1;
            }
        },
        move |error| tracing::error!(%error, "Output stream error"),
        None,
    )?;

    Ok(stream)
}

impl AudioOutput for DeviceOutput {
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
        self.lifecycle.is_running() && self.queued_block_count() < QUEUED_BLOCK_LIMIT
    }

    fn push(&mut self, data: &[f32]) -> Result<(), OutputError> {
        if !self.lifecycle.accept_push(&self.settings, data)? {
            return Ok(());
        }

        if let Some(block_tx) = self.block_tx.as_ref() {
            if block_tx.try_send(data.to_vec()).is_err() {
                tracing::warn!("Device queue is full, dropping block");
            }
        }

        Ok(())
    }

    fn open(&mut self) -> Result<(), OutputError> {
        let settings = self.settings;
        let stream_slot = &mut self.stream;
        let block_tx_slot = &mut self.block_tx;

        self.lifecycle.open(|| {
            let host = cpal::default_host();
            let device = host.default_output_device().ok_or(OutputError::NoDevice)?;

            let config = choose_config(&device, &settings)?;
            let (block_tx, block_rx) = crossbeam::channel::bounded(CHANNEL_CAPACITY);
            let stream = build_stream(&device, &config, block_rx)?;

            tracing::info!(
                host = host.id().name(),
                device = %device.name().unwrap_or_default(),
                sample_rate = settings.sample_rate,
                channel_count = settings.channel_count,
                "Opened output device"
            );

            *stream_slot = Some(stream);
            *block_tx_slot = Some(block_tx);
            Ok(())
        })
    }

    fn start(&mut self) -> Result<(), OutputError> {
        let stream = self.stream.as_ref();

        self.lifecycle.start(|| {
            if let Some(stream) = stream {
                stream.play()?;
            }
            Ok(())
        })
    }

    fn stop(&mut self) -> Result<(), OutputError> {
        let stream = self.stream.as_ref();

        self.lifecycle.stop(|| {
            if let Some(stream) = stream {
                stream.pause()?;
            }
            Ok(())
        })
    }

    fn close(&mut self) -> Result<(), OutputError> {
        if self.lifecycle.close() {
            self.stream = None;
            self.block_tx = None;
            tracing::info!("Closed output device");
        }

        Ok(())
    }

    fn latency(&self) -> Option<Duration> {
        self.lifecycle.latency()
    }
}
