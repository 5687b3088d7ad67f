/// DirtyQueue: FIFO of pending work with O(1) de-duplication.
///
/// A `VecDeque` keeps arrival order, an `FxHashSet` mirrors its contents
/// so a key is enqueued at most once no matter how many times it is
/// pushed between two drains.

use std::collections::VecDeque;
use std::hash::Hash;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub struct DirtyQueue<K> {
    queue: VecDeque<K>,
    members: FxHashSet<K>,
}

impl<K: Copy + Eq + Hash> DirtyQueue<K> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            members: FxHashSet::default(),
        }
    }

    /// Enqueue `key` unless it is already pending.
    ///
    /// Returns `true` if the key was added.
    pub fn push(&mut self, key: K) -> bool {
        if !self.members.insert(key) {
            return false;
        }
        self.queue.push_back(key);
        true
    }

    /// Dequeue the oldest pending key.
    pub fn pop_front(&mut self) -> Option<K> {
        let key = self.queue.pop_front()?;
        self.members.remove(&key);
        Some(key)
    }

    /// Drop `key` from the queue if pending.
    ///
    /// O(n) in the queue length. Returns `true` if the key was pending.
    pub fn remove(&mut self, key: &K) -> bool {
        if !self.members.remove(key) {
            return false;
        }
        if let Some(pos) = self.queue.iter().position(|k| k == key) {
            self.queue.remove(pos);
        }
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.members.clear();
    }

    /// Pending keys, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.queue.iter()
    }
}

impl<K: Copy + Eq + Hash> Default for DirtyQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dirty_queue_tests.rs"]
mod tests;
