use std::collections::VecDeque;

/// Fixed-capacity FIFO: pushing into a full buffer evicts the oldest value.
#[derive(Debug, Clone)]
pub struct SlidingBuffer<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingBuffer<T> {
    /// Empty buffer holding at most `capacity` values (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of values
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of values held
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value is held
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the buffer holds `capacity` values
    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Append `value`, evicting the oldest one when full
    pub fn push(&mut self, value: T) {
        while self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Change the capacity; the oldest values are dropped when shrinking
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    /// Values from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Drop every value
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
