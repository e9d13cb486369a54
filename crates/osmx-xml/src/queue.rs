//! Bounded hand-off of sealed buffers from the producer to the consumer.
//!
//! The queue is a bounded crossbeam channel. [`BufferProducer::push`]
//! blocks while `max_queue_size` buffers are waiting, which is what keeps
//! a fast parser from running arbitrarily far ahead of a slow consumer.
//! The stream ends with one [`Buffer::end_of_stream`] sentinel.

use crossbeam_channel::{bounded, Receiver, SendError, Sender};
use osmx_arena::Buffer;

/// Create a queue holding at most `max_queue_size` buffers.
pub fn buffer_queue(max_queue_size: usize) -> (BufferProducer, BufferConsumer) {
    let (tx, rx) = bounded(max_queue_size);
    (BufferProducer { tx }, BufferConsumer { rx })
}

/// Returned by [`BufferProducer::push`] when the consumer has gone away.
///
/// Carries the buffer that could not be delivered.
#[derive(Debug)]
pub struct Disconnected(pub Buffer);

/// Sending half of the buffer queue.
#[derive(Debug)]
pub struct BufferProducer {
    tx: Sender<Buffer>,
}

impl BufferProducer {
    /// Hand off a sealed buffer, blocking while the queue is full.
    pub fn push(&self, buffer: Buffer) -> Result<(), Disconnected> {
        self.tx
            .send(buffer)
            .map_err(|SendError(buffer)| Disconnected(buffer))
    }

    /// Number of buffers waiting.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Whether no buffers are waiting.
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Receiving half of the buffer queue.
#[derive(Debug)]
pub struct BufferConsumer {
    rx: Receiver<Buffer>,
}

impl BufferConsumer {
    /// Take the next buffer, blocking while the queue is empty.
    ///
    /// Returns `None` once the producer is gone and the queue is drained.
    pub fn pop(&self) -> Option<Buffer> {
        self.rx.recv().ok()
    }

    /// Take the next buffer if one is waiting.
    pub fn try_pop(&self) -> Option<Buffer> {
        self.rx.try_recv().ok()
    }

    /// Number of buffers waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no buffers are waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Maximum number of buffers the queue holds.
    pub fn capacity(&self) -> usize {
        self.rx.capacity().unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order() {
        let (tx, rx) = buffer_queue(4);
        for cap in [8, 16, 24] {
            tx.push(Buffer::new(cap)).unwrap();
        }
        assert_eq!(rx.len(), 3);
        let caps: Vec<_> = std::iter::from_fn(|| rx.try_pop())
            .map(|b| b.capacity())
            .collect();
        assert_eq!(caps, vec![8, 16, 24]);
        assert!(rx.is_empty());
    }

    #[test]
    fn push_blocks_while_full() {
        let (tx, rx) = buffer_queue(1);
        tx.push(Buffer::new(8)).unwrap();
        let handle = thread::spawn(move || {
            tx.push(Buffer::new(16)).unwrap();
            tx
        });
        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());
        assert_eq!(rx.len(), 1);
        assert_eq!(rx.pop().map(|b| b.capacity()), Some(8));
        let tx = handle.join().unwrap();
        assert_eq!(tx.len(), 1);
    }

    #[test]
    fn pop_after_producer_drop_drains_then_ends() {
        let (tx, rx) = buffer_queue(2);
        tx.push(Buffer::end_of_stream()).unwrap();
        drop(tx);
        assert!(rx.pop().is_some_and(|b| b.is_end_of_stream()));
        assert!(rx.pop().is_none());
    }

    #[test]
    fn push_after_consumer_drop_returns_buffer() {
        let (tx, rx) = buffer_queue(2);
        drop(rx);
        let Disconnected(buffer) = tx.push(Buffer::new(32)).unwrap_err();
        assert_eq!(buffer.capacity(), 32);
    }
}
