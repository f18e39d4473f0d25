use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use crate::{
    graph::run_garbage_collector, AudioProcess, Command, CommandQueue, Context, Timestamp,
    MAXIMUM_FRAME_COUNT,
};

use super::processor::Processor;

/// Options used to create an engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// The sample rate the graph renders at
    pub sample_rate: usize,

    /// The largest block a node renders in one go
    ///
    /// Larger requests are split into several blocks.
    pub maximum_frame_count: usize,
}

impl EngineOptions {
    /// Options with the default maximum frame count
    pub fn new(sample_rate: usize) -> Self {
        Self {
            sample_rate,
            maximum_frame_count: MAXIMUM_FRAME_COUNT,
        }
    }

    /// Change the maximum frame count
    pub fn with_maximum_frame_count(mut self, maximum_frame_count: usize) -> Self {
        self.maximum_frame_count = maximum_frame_count.max(1);
        self
    }
}

struct Root {
    options: EngineOptions,
    timestamp: Arc<AtomicI64>,
    command_transmitter: CommandTransmitter,
}

impl Context for Root {
    fn start(&mut self) {
        self.command_transmitter.send(Command::Start);
    }

    fn stop(&mut self) {
        self.command_transmitter.send(Command::Stop);
    }

    fn current_time(&self) -> Timestamp {
        Timestamp::from_raw_i64(self.timestamp.load(Ordering::Acquire))
    }

    fn get_sample_rate(&self) -> usize {
        self.options.sample_rate
    }

    fn maximum_frame_count(&self) -> usize {
        self.options.maximum_frame_count
    }

    fn get_command_queue(&self) -> Box<dyn CommandQueue> {
        Box::new(self.command_transmitter.clone())
    }
}

/// Create an audio context
///
/// This returns a pair:
///
/// * The `Context` is the root context. This will be required to create most
///   nodes and should be kept in scope for the lifetime of the application
///
/// * The `AudioProcess` is used to generate audio. This might be passed to a
///   different thread if used in a realtime context, or it might be kept in
///   the main thread if used offline.
pub fn create_engine(sample_rate: usize) -> (Box<dyn Context>, Box<dyn AudioProcess + Send>) {
    create_engine_with_options(EngineOptions::new(sample_rate))
}

/// Create an audio context with options
pub fn create_engine_with_options(
    options: EngineOptions,
) -> (Box<dyn Context>, Box<dyn AudioProcess + Send>) {
    let options = options.with_maximum_frame_count(options.maximum_frame_count);

    let (command_transmitter, command_receiver) = CommandTransmitter::new();
    let (garbage_transmitter, garbage_receiver) = crossbeam::channel::unbounded();
    let timestamp = Arc::new(AtomicI64::new(0));

    run_garbage_collector(garbage_receiver);

    let processor = Box::new(Processor::new(
        options.sample_rate,
        options.maximum_frame_count,
        command_receiver,
        garbage_transmitter,
        Arc::clone(&timestamp),
    ));

    let engine = Box::new(Root {
        options,
        timestamp,
        command_transmitter,
    });

    tracing::debug!(
        sample_rate = options.sample_rate,
        maximum_frame_count = options.maximum_frame_count,
        "Created engine"
    );

    (engine, processor)
}

#[derive(Clone)]
struct CommandTransmitter {
    command_tx: crossbeam::channel::Sender<Command>,
}

impl CommandTransmitter {
    fn new() -> (Self, crossbeam::channel::Receiver<Command>) {
        let (command_tx, command_rx) = crossbeam::channel::unbounded();
        (Self { command_tx }, command_rx)
    }
}

impl CommandQueue for CommandTransmitter {
    fn send(&self, command: Command) {
        let _ = self.command_tx.send(command);
    }
}
