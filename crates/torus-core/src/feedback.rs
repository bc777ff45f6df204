//! Free-text user feedback intake.
//!
//! Feedback is accepted verbatim: no parsing, no schema, no validation.
//! Every entry is logged and kept in a bounded in-memory history so the
//! most recent remarks are available to whatever eventually consumes them.
//!
//! The tick cycle pulls pending feedback from a [`FeedbackSource`] once per
//! tick. [`ChannelFeedbackSource`] adapts a tokio channel fed by the engine
//! (stdin reader); [`NoFeedback`] is the stub used when intake is disabled.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use torus_types::FeedbackId;
use tracing::{info, warn};

/// Upper bound on the history slots reserved up front. Larger capacities
/// grow on demand as feedback arrives.
const PREALLOCATED_ENTRIES: usize = 64;

/// One piece of recorded feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    /// Unique identifier.
    pub id: FeedbackId,
    /// Tick during which the feedback was ingested.
    pub tick: u64,
    /// Wall-clock time the feedback was recorded.
    pub received_at: DateTime<Utc>,
    /// The feedback text, unmodified.
    pub text: String,
}

/// Bounded history of recorded feedback, oldest first.
#[derive(Debug, Clone)]
pub struct FeedbackLog {
    entries: VecDeque<FeedbackEntry>,
    capacity: usize,
    total_received: u64,
}

impl FeedbackLog {
    /// Create a log that retains at most `capacity` entries.
    ///
    /// A capacity of 0 still logs and counts feedback but retains nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(PREALLOCATED_ENTRIES)),
            capacity,
            total_received: 0,
        }
    }

    /// Accept and log one piece of feedback. Returns its identifier.
    pub fn record(&mut self, tick: u64, text: impl Into<String>) -> FeedbackId {
        let entry = FeedbackEntry {
            id: FeedbackId::new(),
            tick,
            received_at: Utc::now(),
            text: text.into(),
        };
        info!(
            feedback_id = %entry.id,
            tick,
            feedback = %entry.text,
            "User feedback received"
        );

        let id = entry.id;
        self.total_received = self.total_received.saturating_add(1);
        if self.capacity == 0 {
            return id;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        id
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &FeedbackEntry> {
        self.entries.iter()
    }

    /// The most recent retained entry.
    pub fn latest(&self) -> Option<&FeedbackEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total feedback received over the log's lifetime.
    pub const fn total_received(&self) -> u64 {
        self.total_received
    }
}

/// A source of pending feedback, drained once per tick.
pub trait FeedbackSource {
    /// Return every feedback string that arrived since the last call.
    fn drain(&mut self) -> Vec<String>;
}

/// A feedback source that never yields anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl FeedbackSource for NoFeedback {
    fn drain(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Feedback source backed by a tokio unbounded channel.
///
/// Draining never blocks. Once every sender is dropped the source logs
/// the disconnect once and yields nothing further.
#[derive(Debug)]
pub struct ChannelFeedbackSource {
    receiver: UnboundedReceiver<String>,
    disconnected: bool,
}

impl ChannelFeedbackSource {
    /// Wrap the receiving half of a feedback channel.
    pub const fn new(receiver: UnboundedReceiver<String>) -> Self {
        Self {
            receiver,
            disconnected: false,
        }
    }

    /// Whether every sender has been dropped.
    pub const fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl FeedbackSource for ChannelFeedbackSource {
    fn drain(&mut self) -> Vec<String> {
        let mut pending = Vec::new();
        if self.disconnected {
            return pending;
        }
        loop {
            match self.receiver.try_recv() {
                Ok(text) => pending.push(text),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("Feedback channel closed, no further feedback will be accepted");
                    self.disconnected = true;
                    break;
                }
            }
        }
        pending
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn records_text_verbatim() {
        let mut log = FeedbackLog::new(4);
        let raw = "  works great!! \t{not json";
        let id = log.record(3, raw);

        let latest = log.latest().unwrap();
        assert_eq!(latest.id, id);
        assert_eq!(latest.tick, 3);
        assert_eq!(latest.text, raw);
    }

    #[test]
    fn accepts_empty_feedback() {
        let mut log = FeedbackLog::new(4);
        let _ = log.record(1, "");
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().unwrap().text, "");
    }

    #[test]
    fn history_is_bounded_and_keeps_newest() {
        let mut log = FeedbackLog::new(3);
        for i in 0..10_u64 {
            let _ = log.record(i, format!("note {i}"));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.total_received(), 10);
        let texts: Vec<&str> = log.entries().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["note 7", "note 8", "note 9"]);
    }

    #[test]
    fn zero_capacity_counts_but_retains_nothing() {
        let mut log = FeedbackLog::new(0);
        let _ = log.record(0, "hello");
        assert!(log.is_empty());
        assert_eq!(log.total_received(), 1);
    }

    #[test]
    fn huge_capacity_allocates_lazily() {
        let mut log = FeedbackLog::new(usize::MAX);
        assert!(log.is_empty());
        for i in 0..200_u64 {
            let _ = log.record(i, format!("note {i}"));
        }
        assert_eq!(log.len(), 200);
        assert_eq!(log.latest().unwrap().text, "note 199");
    }

    #[test]
    fn no_feedback_is_empty() {
        assert!(NoFeedback.drain().is_empty());
    }

    #[test]
    fn channel_source_drains_pending_messages() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut source = ChannelFeedbackSource::new(rx);

        assert!(source.drain().is_empty());

        tx.send("first".to_owned()).unwrap();
        tx.send("second".to_owned()).unwrap();
        assert_eq!(source.drain(), vec!["first", "second"]);
        assert!(source.drain().is_empty());
        assert!(!source.is_disconnected());
    }

    #[test]
    fn channel_source_delivers_buffered_messages_before_disconnect() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut source = ChannelFeedbackSource::new(rx);

        tx.send("last words".to_owned()).unwrap();
        drop(tx);

        assert_eq!(source.drain(), vec!["last words"]);
        assert!(source.drain().is_empty());
        assert!(source.is_disconnected());
    }
}
