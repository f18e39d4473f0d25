mod audio_renderer;
mod renderer_error;
mod renderer_handle;

pub use audio_renderer::AudioRenderer;
pub use renderer_error::RendererError;
pub use renderer_handle::RendererHandle;
