use std::collections::HashMap;

use crate::Context;

use super::{InputEvent, InputHandler, Key};

/// A set of keys looked up by name
#[derive(Debug, Default)]
pub struct Keyboard {
    keys: HashMap<char, Key>,
}

impl Keyboard {
    /// Create an empty keyboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, replacing any key with the same name
    pub fn add_key(&mut self, key: Key) {
        if self.keys.insert(key.name(), key).is_some() {
            tracing::debug!("Replaced existing key");
        }
    }

    /// Find a key by name
    pub fn key(&self, name: char) -> Option<&Key> {
        self.keys.get(&name)
    }

    /// Press a key
    ///
    /// Returns false if there is no key called `name`
    pub fn key_down(&mut self, name: char) -> bool {
        match self.keys.get_mut(&name) {
            Some(key) => {
                key.key_down();
                true
            }
            None => false,
        }
    }

    /// Release a key
    ///
    /// Returns false if there is no key called `name`
    pub fn key_up(&mut self, name: char) -> bool {
        match self.keys.get_mut(&name) {
            Some(key) => {
                key.key_up();
                true
            }
            None => false,
        }
    }

    /// Whether the key called `name` is held down
    pub fn is_pressed(&self, name: char) -> bool {
        self.key(name).is_some_and(Key::is_pressed)
    }

    /// The number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether there are no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl InputHandler for Keyboard {
    fn handle_input(&mut self, event: InputEvent, _context: &dyn Context) -> bool {
        match event {
            InputEvent::KeyDown(name) => self.key_down(name),
            InputEvent::KeyUp(name) => self.key_up(name),
        }
    }
}
