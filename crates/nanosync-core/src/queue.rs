//! Thread-safe FIFO shared by the event producers and the coordinator.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::message::QueuedEvent;

#[derive(Default)]
struct Shared {
    events: Mutex<VecDeque<QueuedEvent>>,
    ready: Condvar,
}

/// Multi-producer FIFO of [`QueuedEvent`]s.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct EventQueue {
    shared: Arc<Shared>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and wake one waiter.
    pub fn push(&self, event: QueuedEvent) {
        self.shared.events.lock().push_back(event);
        self.shared.ready.notify_one();
    }

    /// Take the oldest event without blocking.
    #[must_use]
    pub fn try_pop(&self) -> Option<QueuedEvent> {
        self.shared.events.lock().pop_front()
    }

    /// Take the oldest event, waiting up to `timeout` for one to arrive.
    #[must_use]
    pub fn pop_timeout(&self, timeout: Duration) -> Option<QueuedEvent> {
        let mut events = self.shared.events.lock();
        if events.is_empty() {
            self.shared.ready.wait_while_for(&mut events, |events| events.is_empty(), timeout);
        }
        events.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.events.lock().is_empty()
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::DeviceMessage;
    use std::time::Instant;

    fn cc(control: u8) -> QueuedEvent {
        QueuedEvent::Device(DeviceMessage::control_change(0, control, 0))
    }

    #[test]
    fn test_fifo_order() {
        let queue = EventQueue::new();
        queue.push(cc(1));
        queue.push(cc(2));
        queue.clone().push(cc(3));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.try_pop(), Some(cc(1)));
        assert_eq!(queue.try_pop(), Some(cc(2)));
        assert_eq!(queue.try_pop(), Some(cc(3)));
        assert_eq!(queue.try_pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_timeout_expires_on_empty_queue() {
        let queue = EventQueue::new();
        let start = Instant::now();
        assert_eq!(queue.pop_timeout(Duration::from_millis(20)), None);
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn test_pop_timeout_wakes_on_push_from_other_thread() {
        let queue = EventQueue::new();
        let producer = queue.clone();

        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            producer.push(cc(7));
        });

        assert_eq!(queue.pop_timeout(Duration::from_secs(5)), Some(cc(7)));
        handle.join().unwrap();
    }
}
