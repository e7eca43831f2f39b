//! Product analytics events.
//!
//! An [`EventDispatcher`] is created per session and owns its queue and the set
//! of event ids it has already accepted, so nothing is shared between
//! sessions or tests. Lifecycle: `new` → `track`/`flush` → `teardown`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyticsEvent {
    /// Deduplication key; an id is accepted at most once per session.
    pub id: String,
    pub name: String,
    pub properties: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, properties: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties,
            occurred_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn deliver(&self, session_id: Uuid, events: &[AnalyticsEvent]) -> Result<()>;
}

/// Writes events to the log.
pub struct TracingSink;

#[async_trait]
impl AnalyticsSink for TracingSink {
    async fn deliver(&self, session_id: Uuid, events: &[AnalyticsEvent]) -> Result<()> {
        for event in events {
            tracing::info!(
                target: "vowline::analytics",
                session = %session_id,
                event = %event.name,
                properties = %event.properties,
                "analytics event"
            );
        }
        Ok(())
    }
}

#[derive(Default)]
struct DispatcherState {
    queue: VecDeque<AnalyticsEvent>,
    processed: HashSet<String>,
    closed: bool,
}

pub struct EventDispatcher {
    session_id: Uuid,
    sink: Arc<dyn AnalyticsSink>,
    state: Mutex<DispatcherState>,
}

impl EventDispatcher {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            sink,
            state: Mutex::new(DispatcherState::default()),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Queues `event`. Returns false if its id was already seen or the
    /// dispatcher has been torn down.
    pub async fn track(&self, event: AnalyticsEvent) -> bool {
        let mut state = self.state.lock().await;
        if state.closed || !state.processed.insert(event.id.clone()) {
            return false;
        }
        state.queue.push_back(event);
        true
    }

    pub async fn pending(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Hands every queued event to the sink. On failure the batch goes back
    /// to the front of the queue for the next flush.
    pub async fn flush(&self) -> Result<usize> {
        let batch: Vec<AnalyticsEvent> = {
            let mut state = self.state.lock().await;
            state.queue.drain(..).collect()
        };

        if batch.is_empty() {
            return Ok(0);
        }

        if let Err(e) = self.sink.deliver(self.session_id, &batch).await {
            tracing::warn!("Analytics flush failed, requeueing {} events: {}", batch.len(), e);
            let mut state = self.state.lock().await;
            for event in batch.into_iter().rev() {
                state.queue.push_front(event);
            }
            return Err(e);
        }

        Ok(batch.len())
    }

    /// Final flush, then stops accepting events and forgets the session.
    pub async fn teardown(&self) -> Result<usize> {
        {
            let mut state = self.state.lock().await;
            state.closed = true;
        }
        let flushed = self.flush().await;

        let mut state = self.state.lock().await;
        state.queue.clear();
        state.processed.clear();
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<AnalyticsEvent>>,
        fail: AtomicBool,
    }

    #[async_trait]
    impl AnalyticsSink for RecordingSink {
        async fn deliver(&self, _session_id: Uuid, events: &[AnalyticsEvent]) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::External("sink down".to_string()));
            }
            self.delivered.lock().await.extend_from_slice(events);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_dropped() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = EventDispatcher::new(sink.clone());

        assert!(dispatcher.track(AnalyticsEvent::new("a", "booking_created", json!({}))).await);
        assert!(!dispatcher.track(AnalyticsEvent::new("a", "booking_created", json!({}))).await);
        assert!(dispatcher.track(AnalyticsEvent::new("b", "payout_sent", json!({}))).await);

        assert_eq!(dispatcher.flush().await.unwrap(), 2);
        assert_eq!(dispatcher.pending().await, 0);

        // Still a duplicate after the flush.
        assert!(!dispatcher.track(AnalyticsEvent::new("a", "booking_created", json!({}))).await);
        assert_eq!(sink.delivered.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_flush_keeps_events() {
        let sink = Arc::new(RecordingSink::default());
        sink.fail.store(true, Ordering::SeqCst);
        let dispatcher = EventDispatcher::new(sink.clone());

        dispatcher.track(AnalyticsEvent::new("a", "x", json!({}))).await;
        dispatcher.track(AnalyticsEvent::new("b", "y", json!({}))).await;
        assert!(dispatcher.flush().await.is_err());
        assert_eq!(dispatcher.pending().await, 2);

        sink.fail.store(false, Ordering::SeqCst);
        assert_eq!(dispatcher.flush().await.unwrap(), 2);
        let delivered = sink.delivered.lock().await;
        assert_eq!(delivered[0].id, "a");
        assert_eq!(delivered[1].id, "b");
    }

    #[tokio::test]
    async fn test_teardown_flushes_and_closes() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = EventDispatcher::new(sink.clone());

        dispatcher.track(AnalyticsEvent::new("a", "x", json!({}))).await;
        assert_eq!(dispatcher.teardown().await.unwrap(), 1);
        assert!(!dispatcher.track(AnalyticsEvent::new("c", "z", json!({}))).await);
        assert_eq!(sink.delivered.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_state() {
        let sink = Arc::new(RecordingSink::default());
        let first = EventDispatcher::new(sink.clone());
        let second = EventDispatcher::new(sink.clone());

        assert!(first.track(AnalyticsEvent::new("a", "x", json!({}))).await);
        assert!(second.track(AnalyticsEvent::new("a", "x", json!({}))).await);
        assert_ne!(first.session_id(), second.session_id());
    }
}
