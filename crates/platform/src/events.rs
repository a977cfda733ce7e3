//! Window events the game subscribes to, buffered between frames.

use std::collections::VecDeque;

use winit::event::{ElementState, WindowEvent};

/// Queue capacity; events arriving while it is full are dropped.
pub const EVENT_QUEUE_CAPACITY: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    FramebufferResized { width: u32, height: u32 },
    /// Text produced by a key press.
    Typed(String),
}

/// What a typed key asks the game to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleMipmap,
}

/// Key binding: `m` / `M` toggles mipmapping, nothing else is bound.
pub fn action_for_text(text: &str) -> Option<KeyAction> {
    match text {
        "m" | "M" => Some(KeyAction::ToggleMipmap),
        _ => None,
    }
}

/// Keep only resize and typed-text events.
pub fn translate(event: &WindowEvent) -> Option<GameEvent> {
    match event {
        WindowEvent::Resized(size) => Some(GameEvent::FramebufferResized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => event
            .text
            .as_ref()
            .map(|t| GameEvent::Typed(t.to_string())),
        _ => None,
    }
}

/// Bounded FIFO filled by the event loop and drained once per frame.
#[derive(Debug)]
pub struct EventQueue {
    buf: VecDeque<GameEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Enqueue without blocking. Returns `false` if the queue was full.
    pub fn push(&mut self, event: GameEvent) -> bool {
        if self.buf.len() >= self.capacity {
            self.dropped += 1;
            log::warn!(
                "Event queue full ({}), dropping {:?} ({} dropped so far)",
                self.capacity,
                event,
                self.dropped
            );
            return false;
        }
        self.buf.push_back(event);
        true
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.buf.drain(..)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_capacity(EVENT_QUEUE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn only_m_toggles() {
        assert_eq!(action_for_text("m"), Some(KeyAction::ToggleMipmap));
        assert_eq!(action_for_text("M"), Some(KeyAction::ToggleMipmap));
        assert_eq!(action_for_text("n"), None);
        assert_eq!(action_for_text("mm"), None);
        assert_eq!(action_for_text(""), None);
    }

    #[test]
    fn resize_is_translated() {
        let ev = WindowEvent::Resized(PhysicalSize::new(640, 480));
        assert_eq!(
            translate(&ev),
            Some(GameEvent::FramebufferResized {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn unsubscribed_events_are_ignored() {
        assert_eq!(translate(&WindowEvent::CloseRequested), None);
        assert_eq!(translate(&WindowEvent::Focused(true)), None);
    }

    #[test]
    fn drains_in_fifo_order() {
        let mut q = EventQueue::default();
        q.push(GameEvent::Typed("a".into()));
        q.push(GameEvent::FramebufferResized { width: 1, height: 2 });
        q.push(GameEvent::Typed("m".into()));
        let got: Vec<_> = q.drain().collect();
        assert_eq!(
            got,
            vec![
                GameEvent::Typed("a".into()),
                GameEvent::FramebufferResized { width: 1, height: 2 },
                GameEvent::Typed("m".into()),
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn full_queue_drops_newest() {
        let mut q = EventQueue::with_capacity(2);
        assert!(q.push(GameEvent::Typed("1".into())));
        assert!(q.push(GameEvent::Typed("2".into())));
        assert!(!q.push(GameEvent::Typed("3".into())));
        assert_eq!(q.len(), 2);
        assert_eq!(q.dropped, 1);
        let got: Vec<_> = q.drain().collect();
        assert_eq!(got.last(), Some(&GameEvent::Typed("2".into())));
    }

    #[test]
    fn default_capacity_is_bounded() {
        let mut q = EventQueue::default();
        for i in 0..(EVENT_QUEUE_CAPACITY + 10) {
            q.push(GameEvent::Typed(i.to_string()));
        }
        assert_eq!(q.len(), EVENT_QUEUE_CAPACITY);
        assert_eq!(q.dropped, 10);
    }
}
