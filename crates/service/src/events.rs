//! In-process change feed.
//!
//! Every successful write publishes a [`ChangeEvent`]; subscribers (the admin
//! dashboard's event stream) refetch whatever table changed. Slow subscribers
//! lose events rather than blocking writers.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Insert => "insert",
            ChangeAction::Update => "update",
            ChangeAction::Delete => "delete",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub table: &'static str,
    pub action: ChangeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Record the mutation metric and fan the event out; no subscribers is fine.
    pub fn publish(&self, table: &'static str, action: ChangeAction, id: Option<Uuid>) {
        common::metrics::record_mutation(table, action.as_str());
        let delivered = self.tx.send(ChangeEvent { table, action, id }).unwrap_or(0);
        trace!(table, action = action.as_str(), delivered, "change_event");
    }
}

impl Default for ChangeFeed {
    fn default() -> Self { Self::new(256) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let feed = ChangeFeed::new(8);
        let mut rx = feed.subscribe();
        let id = Uuid::new_v4();
        feed.publish("franchise_listings", ChangeAction::Update, Some(id));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.table, "franchise_listings");
        assert_eq!(ev.action, ChangeAction::Update);
        assert_eq!(ev.id, Some(id));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let feed = ChangeFeed::default();
        feed.publish("industries", ChangeAction::Insert, None);
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_ahead() {
        let feed = ChangeFeed::new(2);
        let mut rx = feed.subscribe();
        for _ in 0..5 {
            feed.publish("gallery", ChangeAction::Insert, None);
        }
        assert!(matches!(rx.recv().await, Err(broadcast::error::RecvError::Lagged(_))));
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn event_serializes_lowercase_action() {
        let ev = ChangeEvent { table: "states", action: ChangeAction::Delete, id: None };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["action"], "delete");
        assert!(v.get("id").is_none());
    }
}
