//! Unbounded blocking FIFO shared between threads.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Multi-producer, multi-consumer queue.
///
/// `send` never blocks and never fails; `receive` parks the calling thread
/// until an item is available.
pub struct Channel<T> {
    queue: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> Channel<T> {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append an item and wake one waiting receiver.
    pub fn send(&self, item: T) {
        self.queue.lock().push_back(item);
        self.available.notify_one();
    }

    /// Remove the oldest item, waiting until there is one.
    pub fn receive(&self) -> T {
        let mut queue = self.queue.lock();
        loop {
            if let Some(item) = queue.pop_front() {
                return item;
            }
            self.available.wait(&mut queue);
        }
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let channel = Channel::new();
        for i in 0..5 {
            channel.send(i);
        }
        assert_eq!((0..5).map(|_| channel.receive()).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(channel.queue.lock().is_empty());
    }

    #[test]
    fn test_receive_blocks_until_send() {
        let channel = Channel::new();
        std::thread::scope(|s| {
            let receiver = s.spawn(|| channel.receive());
            std::thread::sleep(Duration::from_millis(20));
            channel.send("late");
            assert_eq!(receiver.join().unwrap(), "late");
        });
    }

    #[test]
    fn test_many_producers_many_consumers() {
        let channel = Channel::new();
        let per_producer = 1000;

        let received: usize = std::thread::scope(|s| {
            for p in 0..4 {
                let channel = &channel;
                s.spawn(move || {
                    for i in 0..per_producer {
                        channel.send(p * per_producer + i);
                    }
                });
            }
            let consumers: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..per_producer).map(|_| channel.receive()).count()))
                .collect();
            consumers.into_iter().map(|c| c.join().unwrap()).sum()
        });

        assert_eq!(received, 4 * per_producer);
        assert!(channel.queue.lock().is_empty());
    }
}
