use std::collections::VecDeque;

use serde_json::Value;

use crate::node::message::Message;

/// The FIFO holding area for not-yet-released messages.
///
/// Insertion order is arrival order and release is strictly head-first.
/// Expired entries are purged lazily: only on insert and on trigger, never by
/// a background clock, so an overdue message may linger until the next touch.
#[derive(Debug, Default)]
pub struct Backlog {
    entries: VecDeque<Message>,
}

impl Backlog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Appends a message to the tail, normalizing its `ttl` and stamping the
    /// enqueue timestamp.
    pub fn push(&mut self, mut msg: Message, now: u64) {
        msg.ttl = Some(Value::from(msg.normalized_ttl()));
        msg.enqueued_at = Some(now);
        self.entries.push_back(msg);
    }

    /// Removes and returns the head of the backlog.
    pub fn pop(&mut self) -> Option<Message> {
        self.entries.pop_front()
    }

    /// Drops every entry whose ttl has elapsed, preserving order.
    ///
    /// An entry is retained iff `ttl == 0` or less than `ttl` milliseconds
    /// have passed since it was enqueued.
    pub fn purge_expired(&mut self, now: u64) {
        self.entries.retain(|msg| {
            let ttl = msg.normalized_ttl();
            ttl == 0
                || msg
                    .enqueued_at
                    .is_none_or(|stamped| now.saturating_sub(stamped) < ttl)
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }
}
