//! A min-priority queue with at most one live entry per element.
//!
//! Backed by a binary heap in a `Vec` plus an element-to-slot index map.
//! Re-enqueueing a present element updates its priority in place instead of
//! inserting a duplicate, which gives the queue decrease-key support: the
//! solver keeps every open cell enqueued under its current entropy and
//! adjusts priorities as propagation shrinks domains.

use std::collections::HashMap;
use std::hash::Hash;

/// Min-heap keyed by `P` with element uniqueness by value equality.
///
/// Invariant: the heap array and the index map are mutually consistent at
/// every public-method boundary. Each heap slot's element maps back to that
/// slot, and every mapped element occupies exactly one slot.
#[derive(Debug, Clone, Default)]
pub struct UniqueHeap<T, P> {
    heap: Vec<(T, P)>,
    slots: HashMap<T, usize>,
}

impl<T, P> UniqueHeap<T, P>
where
    T: Clone + Eq + Hash,
    P: Ord + Copy,
{
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// `true` when no entries are queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// `true` when the element has a live entry.
    pub fn contains(&self, element: &T) -> bool {
        self.slots.contains_key(element)
    }

    /// The minimum-priority entry without removing it.
    pub fn peek(&self) -> Option<(&T, &P)> {
        self.heap.first().map(|(e, p)| (e, p))
    }

    /// Inserts the element, or updates its priority in place if present.
    pub fn enqueue(&mut self, element: T, priority: P) {
        if let Some(&slot) = self.slots.get(&element) {
            self.reprioritize(slot, priority);
        } else {
            self.heap.push((element.clone(), priority));
            let slot = self.heap.len() - 1;
            self.slots.insert(element, slot);
            self.bubble_up(slot);
        }
    }

    /// Removes and returns the minimum-priority entry, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<(T, P)> {
        let last = self.heap.len().checked_sub(1)?;
        self.heap.swap(0, last);
        let (element, priority) = self.heap.pop()?;
        self.slots.remove(&element);
        if !self.heap.is_empty() {
            self.slots.insert(self.heap[0].0.clone(), 0);
            self.bubble_down(0);
        }
        Some((element, priority))
    }

    /// Repositions an existing element under a new priority.
    ///
    /// Returns `false` when the element is not queued.
    pub fn update_priority(&mut self, element: &T, priority: P) -> bool {
        let Some(&slot) = self.slots.get(element) else {
            return false;
        };
        self.reprioritize(slot, priority);
        true
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    fn reprioritize(&mut self, slot: usize, priority: P) {
        let improved = priority < self.heap[slot].1;
        self.heap[slot].1 = priority;
        if improved {
            self.bubble_up(slot);
        } else {
            self.bubble_down(slot);
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].0.clone(), a);
        self.slots.insert(self.heap[b].0.clone(), b);
    }

    fn bubble_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let up = parent(slot);
            if self.heap[slot].1 < self.heap[up].1 {
                self.swap_slots(slot, up);
                slot = up;
            } else {
                break;
            }
        }
    }

    fn bubble_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let mut smallest = slot;
            let left = 2 * slot + 1;
            let right = 2 * slot + 2;
            if left < len && self.heap[left].1 < self.heap[smallest].1 {
                smallest = left;
            }
            if right < len && self.heap[right].1 < self.heap[smallest].1 {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }
}

const fn parent(slot: usize) -> usize {
    (slot - 1) / 2
}
