//! Topological ordering of an agent's components.
//!
//! # Algorithm
//!
//! Kahn's algorithm with a max-heap as the ready set.  Heap entries are
//! `(priority, Reverse(index))`, so the highest priority pops first and ties
//! fall back to the lowest `ComponentId`, i.e. declaration order.
//!
//! Components still holding unsatisfied dependencies once the heap is empty
//! sit on a cycle or downstream of one; all of them are reported.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ak_core::ComponentId;
use tracing::debug;

use crate::{ConfigurationError, ScheduleResult};

/// One component as the sorter sees it.  Its `ComponentId` is its position
/// in the slice passed to [`ExecutionOrder::build`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskNode {
    pub name:     String,
    pub priority: i32,
}

impl TaskNode {
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self { name: name.into(), priority }
    }
}

/// `consumer` reads at least one channel `producer` writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Link {
    pub producer: ComponentId,
    pub consumer: ComponentId,
}

impl Link {
    pub fn new(producer: ComponentId, consumer: ComponentId) -> Self {
        Self { producer, consumer }
    }
}

/// The order in which an agent's components execute every cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionOrder {
    order: Vec<ComponentId>,
}

impl ExecutionOrder {
    /// Sort `nodes` so every producer precedes its consumers.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::CyclicDependency`] if `links` contain a cycle
    /// (a self link included), [`ConfigurationError::InvalidLink`] if a link
    /// points outside `nodes`.
    pub fn build(nodes: &[TaskNode], links: &[Link]) -> ScheduleResult<Self> {
        let n = nodes.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];

        for link in links {
            let (p, c) = (link.producer.index(), link.consumer.index());
            if p >= n || c >= n {
                return Err(ConfigurationError::InvalidLink {
                    producer: link.producer,
                    consumer: link.consumer,
                });
            }
            successors[p].push(c);
            in_degree[c] += 1;
        }

        let mut ready: BinaryHeap<(i32, Reverse<usize>)> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(|i| (nodes[i].priority, Reverse(i)))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some((_, Reverse(i))) = ready.pop() {
            order.push(ComponentId::from_index(i));
            for &s in &successors[i] {
                in_degree[s] -= 1;
                if in_degree[s] == 0 {
                    ready.push((nodes[s].priority, Reverse(s)));
                }
            }
        }

        if order.len() < n {
            let components = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| nodes[i].name.clone())
                .collect();
            return Err(ConfigurationError::CyclicDependency { components });
        }

        debug!(components = n, links = links.len(), "execution order built");
        Ok(Self { order })
    }

    #[inline]
    pub fn as_slice(&self) -> &[ComponentId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of `id` in the order.
    pub fn position(&self, id: ComponentId) -> Option<usize> {
        self.order.iter().position(|&c| c == id)
    }
}
