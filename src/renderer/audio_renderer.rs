use std::{sync::Arc, time::Duration};

use crossbeam::channel::{Receiver, Sender};

use crate::{
    create_engine_with_options, AudioBuffer, AudioOutput, AudioProcess, Context, EngineOptions,
    InputEvent, InputHandler, OutputId, OutputSettings, OutputState, OwnedAudioBuffer,
};

use super::{
    renderer_handle::{RendererHandle, RunState},
    RendererError,
};

const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Pulls blocks from the render graph and pushes them to every output
///
/// A block is rendered only when the lead output is ready for one, so the
/// lead output sets the pace. The first output added leads unless another is
/// chosen with [`AudioRenderer::set_lead_output`].
pub struct AudioRenderer {
    settings: OutputSettings,
    context: Box<dyn Context>,
    audio_process: Box<dyn AudioProcess + Send>,
    outputs: Vec<Box<dyn AudioOutput>>,
    lead_output: Option<OutputId>,
    input_handlers: Vec<Box<dyn InputHandler>>,
    event_tx: Sender<InputEvent>,
    event_rx: Receiver<InputEvent>,
    state: Arc<RunState>,
    paused: bool,
    frame_count: u64,
    block: OwnedAudioBuffer,
    interleaved: Vec<f32>,
}

impl AudioRenderer {
    /// Create a renderer and the engine it renders
    pub fn new(settings: OutputSettings) -> Self {
        let (context, audio_process) =
            create_engine_with_options(EngineOptions::new(settings.sample_rate));

        let (event_tx, event_rx) = crossbeam::channel::unbounded();

        Self {
            settings,
            context,
            audio_process,
            outputs: Vec::new(),
            lead_output: None,
            input_handlers: Vec::new(),
            event_tx,
            event_rx,
            state: Arc::new(RunState::default()),
            paused: false,
            frame_count: 0,
            block: OwnedAudioBuffer::new(
                settings.frames_per_buffer,
                settings.channel_count,
                settings.sample_rate,
            ),
            interleaved: vec![0.0; settings.samples_per_buffer()],
        }
    }

    /// The shape of the blocks this renderer produces
    pub fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    /// The engine context, used to create nodes
    pub fn context(&self) -> &dyn Context {
        self.context.as_ref()
    }

    /// A handle to send key events and stop the renderer from elsewhere
    pub fn handle(&self) -> RendererHandle {
        RendererHandle::new(self.event_tx.clone(), Arc::clone(&self.state))
    }

    /// Add an output
    ///
    /// The output must accept blocks with the renderer's settings, and those
    /// settings must describe a non-empty block.
    pub fn add_output(&mut self, output: Box<dyn AudioOutput>) -> Result<OutputId, RendererError> {
        if output.settings().samples_per_buffer() == 0 {
            return Err(RendererError::EmptyBlock(*output.settings()));
        }

        if *output.settings() != self.settings {
            return Err(RendererError::SettingsMismatch {
                expected: self.settings,
                actual: *output.settings(),
            });
        }

        let id = output.id();
        tracing::debug!(?id, "Added output");

        self.outputs.push(output);
        Ok(id)
    }

    /// Remove an output, handing it back to the caller
    ///
    /// If the output was leading, the first remaining output leads.
    pub fn remove_output(&mut self, id: OutputId) -> Option<Box<dyn AudioOutput>> {
        let index = self.outputs.iter().position(|output| output.id() == id)?;

        if self.lead_output == Some(id) {
            self.lead_output = None;
        }

        Some(self.outputs.remove(index))
    }

    /// Choose the output that paces rendering
    pub fn set_lead_output(&mut self, id: OutputId) -> Result<(), RendererError> {
        if self.find_output(id).is_none() {
            return Err(RendererError::UnknownOutput(id));
        }

        self.lead_output = Some(id);
        Ok(())
    }

    /// Find an output by id
    pub fn find_output(&self, id: OutputId) -> Option<&dyn AudioOutput> {
        self.outputs
            .iter()
            .find(|output| output.id() == id)
            .map(|output| output.as_ref())
    }

    /// The output that paces rendering
    pub fn lead_output(&self) -> Option<&dyn AudioOutput> {
        match self.lead_output {
            Some(id) => self.find_output(id),
            None => self.outputs.first().map(|output| output.as_ref()),
        }
    }

    /// Add a handler for key events
    ///
    /// Handlers see events in the order they were added. An event consumed by
    /// one handler isn't offered to the ones after it.
    pub fn add_input_handler(&mut self, handler: Box<dyn InputHandler>) {
        self.input_handlers.push(handler);
    }

    /// Open and start every output, then start the engine
    pub fn start(&mut self) -> Result<(), RendererError> {
        if self.outputs.is_empty() {
            return Err(RendererError::NoOutputs);
        }

        for output in self.outputs.iter_mut() {
            if output.state() == OutputState::Closed {
                output.open()?;
            }

            output.start()?;
        }

        self.context.start();
        self.state.mark_started();

        tracing::debug!(output_count = self.outputs.len(), "Renderer started");
        Ok(())
    }

    /// Render one block if the lead output is ready
    ///
    /// Pending input events are delivered first. Returns true if a block was
    /// pushed to the outputs.
    pub fn render_block(&mut self) -> Result<bool, RendererError> {
        self.deliver_input_events();

        if self.paused || self.state.is_terminated() {
            return Ok(false);
        }

        self.render_if_ready()
    }

    /// Render blocks until the renderer is terminated, then close every output
    pub fn run(&mut self) -> Result<(), RendererError> {
        if !self.state.is_running() && !self.state.is_terminated() {
            self.start()?;
        }

        while self.state.is_running() {
            match self.render_block() {
                Ok(true) => (),
                Ok(false) => std::thread::sleep(IDLE_SLEEP),
                Err(error) => {
                    tracing::error!(%error, "Rendering failed");
                    let _ = self.terminate();
                    return Err(error);
                }
            }
        }

        self.terminate()
    }

    /// Stop rendering blocks until [`AudioRenderer::unpause`] is called
    pub fn pause(&mut self) {
        tracing::debug!("Pausing");
        self.paused = true;
    }

    /// Resume rendering blocks
    pub fn unpause(&mut self) {
        tracing::debug!("Unpausing");
        self.paused = false;
    }

    /// Whether the renderer is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Render a single block, even while paused
    pub fn increment(&mut self) -> Result<bool, RendererError> {
        self.deliver_input_events();
        self.render_if_ready()
    }

    /// Stop the engine and close every output
    pub fn terminate(&mut self) -> Result<(), RendererError> {
        self.state.mark_terminated();
        self.context.stop();

        let mut first_error = None;

        for output in self.outputs.iter_mut() {
            if output.state() == OutputState::Closed {
                continue;
            }

            let stopped = output.stop();
            let closed = output.close();

            for error in [stopped.err(), closed.err()].into_iter().flatten() {
                tracing::warn!(id = ?output.id(), %error, "Failed to close output");
                first_error.get_or_insert(error);
            }
        }

        tracing::debug!(frame_count = self.frame_count, "Renderer terminated");

        match first_error {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    /// The number of blocks pushed to the outputs so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn deliver_input_events(&mut self) {
        let context = self.context.as_ref();

        while let Ok(event) = self.event_rx.try_recv() {
            let handled = self
                .input_handlers
                .iter_mut()
                .any(|handler| handler.handle_input(event, context));

            if !handled {
                tracing::trace!(?event, "Input event not handled");
            }
        }
    }

    fn render_if_ready(&mut self) -> Result<bool, RendererError> {
        let lead_is_ready = match self.lead_output() {
            Some(output) => output.is_ready(),
            None => return Err(RendererError::NoOutputs),
        };

        if !lead_is_ready {
            return Ok(false);
        }

        self.audio_process.process(&mut self.block);
        self.block.copy_to_interleaved(
            &mut self.interleaved,
            self.settings.channel_count,
            self.settings.frames_per_buffer,
        );

        for output in self.outputs.iter_mut() {
            output.push(&self.interleaved)?;
        }

        self.frame_count += 1;
        Ok(true)
    }
}
