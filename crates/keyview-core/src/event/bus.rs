// Keyview Event Bus
// Merges the down/up/press feeds into one totally ordered queue

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::key::{EventKind, InputEvent, KeyEvent};

type Queue = Arc<Mutex<VecDeque<InputEvent>>>;

/// Single FIFO shared by every feed.
///
/// Feeds may be driven from different threads; the queue lock serializes
/// them, so the order events are drained in is the order they were sent in.
#[derive(Debug, Default)]
pub struct EventBus {
    queue: Queue,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender bound to one feed
    pub fn sender(&self, kind: EventKind) -> EventSender {
        EventSender {
            kind,
            queue: Arc::clone(&self.queue),
        }
    }

    /// All three feeds
    pub fn feeds(&self) -> Feeds {
        Feeds {
            down: self.sender(EventKind::Down),
            up: self.sender(EventKind::Up),
            press: self.sender(EventKind::Press),
        }
    }

    /// Enqueue an already tagged event
    pub fn publish(&self, input: InputEvent) {
        self.queue.lock().push_back(input);
    }

    /// Oldest pending event
    pub fn pop(&self) -> Option<InputEvent> {
        self.queue.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

/// Push side of one raw feed
#[derive(Debug, Clone)]
pub struct EventSender {
    kind: EventKind,
    queue: Queue,
}

impl EventSender {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn send(&self, event: KeyEvent) {
        self.queue.lock().push_back(InputEvent {
            kind: self.kind,
            event,
        });
    }
}

/// The three push-based input feeds handed to an Event Source
#[derive(Debug, Clone)]
pub struct Feeds {
    pub down: EventSender,
    pub up: EventSender,
    pub press: EventSender,
}

impl Feeds {
    /// Route a tagged event to the feed matching its kind
    pub fn publish(&self, input: InputEvent) {
        let sender = match input.kind {
            EventKind::Down => &self.down,
            EventKind::Up => &self.up,
            EventKind::Press => &self.press,
        };
        sender.send(input.event);
    }
}
