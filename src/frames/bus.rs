use std::collections::VecDeque;

use serde_json::Value;

use crate::frames::message::FrameMessage;
use crate::frames::tree::FrameId;

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub from: FrameId,
    pub to: FrameId,
    pub payload: Value,
}

/// In-order mailbox standing in for `window.postMessage`. Posting never
/// blocks and never reports delivery.
#[derive(Debug, Default)]
pub struct MessageBus {
    queue: VecDeque<Envelope>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, from: FrameId, to: FrameId, message: &FrameMessage) {
        self.post_raw(from, to, message.to_value());
    }

    /// Post an arbitrary payload, as any script on the page may.
    pub fn post_raw(&mut self, from: FrameId, to: FrameId, payload: Value) {
        self.queue.push_back(Envelope { from, to, payload });
    }

    /// Remove and return every message addressed to `to`, oldest first.
    pub fn take_for(&mut self, to: FrameId) -> Vec<Envelope> {
        let (mine, rest): (VecDeque<Envelope>, VecDeque<Envelope>) =
            self.queue.drain(..).partition(|e| e.to == to);
        self.queue = rest;
        mine.into_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Recipients with mail waiting, in posting order without repeats.
    pub fn recipients(&self) -> Vec<FrameId> {
        let mut out: Vec<FrameId> = Vec::new();
        for envelope in &self.queue {
            if !out.contains(&envelope.to) {
                out.push(envelope.to);
            }
        }
        out
    }
}
