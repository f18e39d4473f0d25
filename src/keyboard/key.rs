use std::fmt;

type KeyCallback = Box<dyn FnMut() + Send>;

/// A named key with optional press and release callbacks
pub struct Key {
    name: char,
    pressed: bool,
    on_down: Option<KeyCallback>,
    on_up: Option<KeyCallback>,
}

impl Key {
    /// Create a key with no callbacks
    pub fn new(name: char) -> Self {
        Self {
            name,
            pressed: false,
            on_down: None,
            on_up: None,
        }
    }

    /// Run `callback` whenever the key is pressed
    pub fn with_down_callback(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_down = Some(Box::new(callback));
        self
    }

    /// Run `callback` whenever the key is released
    pub fn with_up_callback(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_up = Some(Box::new(callback));
        self
    }

    /// Press the key
    pub fn key_down(&mut self) {
        if let Some(callback) = self.on_down.as_mut() {
            callback();
        }

        self.pressed = true;
    }

    /// Release the key
    pub fn key_up(&mut self) {
        if let Some(callback) = self.on_up.as_mut() {
            callback();
        }

        self.pressed = false;
    }

    /// Whether the key is held down
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// The character on the key
    pub fn name(&self) -> char {
        self.name
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("name", &self.name)
            .field("pressed", &self.pressed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    #[test]
    fn tracks_pressed_state() {
        let mut key = Key::new('a');
        assert!(!key.is_pressed());

        key.key_down();
        assert!(key.is_pressed());

        key.key_up();
        assert!(!key.is_pressed());
    }

    #[test]
    fn down_callback_runs_on_every_press() {
        let calls = Arc::new(AtomicUsize::new(0));

        let mut key = Key::new('s').with_down_callback({
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });

        key.key_down();
        key.key_down();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn up_callback_runs_on_release() {
        let released = Arc::new(AtomicBool::new(false));

        let mut key = Key::new('d').with_up_callback({
            let released = Arc::clone(&released);
            move || released.store(true, Ordering::SeqCst)
        });

        key.key_down();
        assert!(!released.load(Ordering::SeqCst));

        key.key_up();
        assert!(released.load(Ordering::SeqCst));
    }
}
