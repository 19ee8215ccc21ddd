use std::collections::VecDeque;

/// A ring buffer that drops its oldest entries once it's full.
pub struct Queue<T> {
    max: usize,
    queue: VecDeque<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::with_capacity(500)
    }
}

impl<T> Queue<T> {
    pub fn with_capacity(max: usize) -> Self {
        let max = max.max(1);
        Self {
            queue: VecDeque::with_capacity(max),
            max,
        }
    }

    pub fn push(&mut self, item: T) {
        while self.queue.len() >= self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(item)
    }

    pub const fn capacity(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + ExactSizeIterator + DoubleEndedIterator {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest() {
        let mut queue = Queue::with_capacity(3);
        (0..5).for_each(|i| queue.push(i));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);

        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_capacity_holds_one() {
        let mut queue = Queue::with_capacity(0);
        queue.push("a");
        queue.push("b");
        assert_eq!(queue.capacity(), 1);
        assert_eq!(queue.iter().last(), Some(&"b"));
    }
}
