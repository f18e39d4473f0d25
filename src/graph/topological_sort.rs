use std::{cmp::Reverse, collections::BinaryHeap, collections::HashMap};

use crate::commands::Id;

use super::Connection;

/// Kahn's algorithm over the DSPs in the graph
///
/// When several nodes are ready at once the one with the lowest id goes
/// first, so the order is stable between runs.
pub struct TopologicalSort {
    dependency_count: HashMap<Id, usize>,
    ready_to_process: BinaryHeap<Reverse<Id>>,
    order: Vec<Id>,
}

impl TopologicalSort {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dependency_count: HashMap::with_capacity(capacity),
            ready_to_process: BinaryHeap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Returns `None` if the connections contain a cycle
    pub fn sort(
        &mut self,
        nodes: impl Iterator<Item = Id>,
        connections: &[Connection],
    ) -> Option<&[Id]> {
        self.dependency_count.clear();
        self.ready_to_process.clear();
        self.order.clear();

        for node in nodes {
            self.dependency_count.insert(node, 0);
        }

        for connection in connections {
            if let Some(count) = self.dependency_count.get_mut(&connection.destination) {
                *count += 1;
            }
        }

        for (node, count) in self.dependency_count.iter() {
            if *count == 0 {
                self.ready_to_process.push(Reverse(*node));
            }
        }

        while let Some(Reverse(node)) = self.ready_to_process.pop() {
            self.order.push(node);

            for connection in connections.iter().filter(|connection| connection.source == node) {
                if let Some(count) = self.dependency_count.get_mut(&connection.destination) {
                    *count -= 1;
                    if *count == 0 {
                        self.ready_to_process.push(Reverse(connection.destination));
                    }
                }
            }
        }

        if self.order.len() == self.dependency_count.len() {
            Some(&self.order)
        } else {
            None
        }
    }
}
