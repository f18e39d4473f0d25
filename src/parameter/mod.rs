mod audio_parameter;
mod parameter_change;
mod realtime_parameter;

pub use audio_parameter::AudioParameter;
pub use parameter_change::ParameterChange;
pub use parameter_change::ValueChangeMethod;
pub use realtime_parameter::RealtimeAudioParameter;
