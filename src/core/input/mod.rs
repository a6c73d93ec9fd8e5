//! Buffered gameplay input with hardware timestamps.
//!
//! Key events arrive asynchronously from the host (window thread, autoplay
//! driver, tests) and queue on a lock-free channel. The session drains the
//! queue once per tick and replays events in timestamp order, so judgement
//! offsets depend on when a key went down, not on frame timing.

pub mod bindings;

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Key transition carried by an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Press,
    Release,
}

/// A column-mapped key event stamped with the playback-clock time it
/// happened at, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub column: usize,
    pub kind: InputKind,
    pub at_ms: f64,
}

/// Cloneable submission handle for event producers.
#[derive(Clone)]
pub struct InputHandle {
    sender: Sender<InputEvent>,
}

impl InputHandle {
    pub fn press(&self, column: usize, at_ms: f64) {
        let _ = self.sender.send(InputEvent {
            column,
            kind: InputKind::Press,
            at_ms,
        });
    }

    pub fn release(&self, column: usize, at_ms: f64) {
        let _ = self.sender.send(InputEvent {
            column,
            kind: InputKind::Release,
            at_ms,
        });
    }
}

/// Receiving end of the input buffer, owned by the game session.
pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Returns a handle producers use to submit events.
    pub fn handle(&self) -> InputHandle {
        InputHandle {
            sender: self.sender.clone(),
        }
    }

    /// Takes every buffered event, sorted by hardware timestamp.
    ///
    /// The sort is stable, so events sharing a timestamp keep their
    /// arrival order.
    pub fn drain_ordered(&self) -> Vec<InputEvent> {
        let mut events: Vec<InputEvent> = self.receiver.try_iter().collect();
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        events
    }

    /// Drops every buffered event without processing it.
    pub fn discard(&self) {
        for _ in self.receiver.try_iter() {}
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_orders_events_by_timestamp() {
        let queue = InputQueue::new();
        let handle = queue.handle();

        handle.press(0, 120.0);
        handle.press(1, 80.0);
        handle.release(0, 150.0);

        let events = queue.drain_ordered();
        let times: Vec<f64> = events.iter().map(|e| e.at_ms).collect();
        assert_eq!(times, vec![80.0, 120.0, 150.0]);

        // Queue is now empty.
        assert!(queue.drain_ordered().is_empty());
    }

    #[test]
    fn equal_timestamps_keep_arrival_order() {
        let queue = InputQueue::new();
        let handle = queue.handle();

        handle.press(2, 100.0);
        handle.press(3, 100.0);

        let events = queue.drain_ordered();
        assert_eq!(events[0].column, 2);
        assert_eq!(events[1].column, 3);
    }

    #[test]
    fn discard_empties_the_buffer() {
        let queue = InputQueue::new();
        let handle = queue.handle();

        handle.press(0, 10.0);
        handle.press(1, 20.0);
        queue.discard();

        assert!(queue.drain_ordered().is_empty());
    }
}
