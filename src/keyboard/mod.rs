mod input;
mod key;
mod keyboard;
mod piano;
mod piano_key;
mod tone;

pub use input::InputEvent;
pub use input::InputHandler;
pub use key::Key;
pub use keyboard::Keyboard;
pub use piano::Piano;
pub use piano_key::PianoKey;
pub use tone::tone_for_key;
pub use tone::KEY_TONE_MAPPING;
pub use tone::MIDDLE_C;
pub use tone::SEMITONE;
