use std::sync::atomic::{AtomicUsize, Ordering};

/// Identifies a DSP or a parameter for the lifetime of the process
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(usize);

impl Id {
    pub fn generate() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_increasing() {
        let first = Id::generate();
        let second = Id::generate();
        assert_ne!(first, second);
        assert!(first < second);
    }
}
