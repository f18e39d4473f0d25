use crate::commands::Id;

/// A directed edge from the output of one DSP to the input of another
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    pub source: Id,
    pub destination: Id,
}

impl Connection {
    pub fn new(source: Id, destination: Id) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub fn involves(&self, id: Id) -> bool {
        self.source == id || self.destination == id
    }
}
