use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub expires: Instant,
}

/// Short-lived notices shown in the status bar; the newest one wins.
#[derive(Debug, Clone)]
pub struct Toasts {
    ttl: Duration,
    items: VecDeque<Toast>,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, text: impl Into<String>, now: Instant) {
        self.items.push_back(Toast {
            text: text.into(),
            expires: now + self.ttl,
        });
        while self.items.len() > MAX_TOASTS {
            self.items.pop_front();
        }
    }

    /// Drop expired toasts; true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.expires > now);
        before != self.items.len()
    }

    pub fn current(&self, now: Instant) -> Option<&Toast> {
        self.items.iter().rev().find(|t| t.expires > now)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
