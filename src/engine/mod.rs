mod audio_process;
mod context;
mod engine;
mod processor;

pub use audio_process::AudioProcess;
pub use context::CommandQueue;
pub use context::Context;
pub use engine::create_engine;
pub use engine::create_engine_with_options;
pub use engine::EngineOptions;
