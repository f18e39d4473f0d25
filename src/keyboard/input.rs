use crate::Context;

/// A key press or release, named by the character on the key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// The key was pressed
    KeyDown(char),

    /// The key was released
    KeyUp(char),
}

impl InputEvent {
    /// The character on the key
    pub fn key(&self) -> char {
        match self {
            InputEvent::KeyDown(key) | InputEvent::KeyUp(key) => *key,
        }
    }
}

/// Something that reacts to key events
pub trait InputHandler {
    /// Handle an event
    ///
    /// Returns true if the event was consumed. A consumed event is not passed
    /// on to any other handler.
    fn handle_input(&mut self, event: InputEvent, context: &dyn Context) -> bool;
}
