//! # Schema History
//!
//! The historized store receives every applied schema change together with
//! an optional [`TableChanges`] record. Durable storage lives outside this
//! crate; [`MemorySchemaHistory`] is an in-process store for development and
//! tests.
//!
//! The registry is updated before the history write. A failed write is
//! reported to the caller but the registry is not rolled back: the store's
//! own retry/recovery has to close the gap between the in-memory view and
//! the durable log.

use crate::common::schema_change::{SchemaChangeEvent, SchemaChangeType};
use crate::common::table_changes::TableChanges;
use crate::common::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Append-only store of schema changes.
#[async_trait]
pub trait SchemaHistory: Send + Sync {
    /// Append one applied schema change.
    ///
    /// Implementations are responsible for durability and for notifying
    /// their own listeners.
    async fn record(
        &self,
        event: &SchemaChangeEvent,
        table_changes: Option<&TableChanges>,
    ) -> Result<()>;
}

/// Shared handle to a history store.
pub type SharedSchemaHistory = Arc<dyn SchemaHistory>;

/// One entry of the schema history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Database (catalog) name
    pub database: String,
    /// Schema name
    pub schema: String,
    /// Type of the applied change
    pub change_type: SchemaChangeType,
    /// Original DDL statement, if the event carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddl: Option<String>,
    /// Source position of the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Event timestamp (Unix epoch millis)
    pub timestamp_ms: i64,
    /// Table definitions to replay, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_changes: Option<TableChanges>,
}

impl HistoryRecord {
    /// Build a record from an applied event.
    pub fn from_event(event: &SchemaChangeEvent, table_changes: Option<&TableChanges>) -> Self {
        Self {
            database: event.database.clone(),
            schema: event.schema.clone(),
            change_type: event.change_type,
            ddl: event.ddl.clone(),
            position: event.position.clone(),
            timestamp_ms: event.timestamp_ms,
            table_changes: table_changes.cloned(),
        }
    }
}

/// In-memory schema history.
///
/// Records are kept in application order; listeners subscribed through
/// [`subscribe`](Self::subscribe) receive each record after it is stored.
pub struct MemorySchemaHistory {
    records: Mutex<Vec<HistoryRecord>>,
    notifier: broadcast::Sender<HistoryRecord>,
}

impl MemorySchemaHistory {
    /// Capacity of the listener channel
    const LISTENER_CAPACITY: usize = 256;

    pub fn new() -> Self {
        let (notifier, _) = broadcast::channel(Self::LISTENER_CAPACITY);
        Self {
            records: Mutex::new(Vec::new()),
            notifier,
        }
    }

    /// Subscribe to newly stored records.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryRecord> {
        self.notifier.subscribe()
    }

    /// All stored records, oldest first.
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Default for MemorySchemaHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaHistory for MemorySchemaHistory {
    async fn record(
        &self,
        event: &SchemaChangeEvent,
        table_changes: Option<&TableChanges>,
    ) -> Result<()> {
        let record = HistoryRecord::from_event(event, table_changes);
        // Notify under the lock so listeners see the stored order
        let mut records = self.records.lock();
        records.push(record.clone());
        if self.notifier.send(record).is_err() {
            trace!("No schema history listeners");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::table::{TableDefinition, TableId};

    fn create_event() -> SchemaChangeEvent {
        SchemaChangeEvent::new("inventory", "dbo", SchemaChangeType::Create)
            .with_table(TableDefinition::new(TableId::new("inventory", "dbo", "orders")))
            .with_position("00000025:00000448:0001")
            .with_timestamp(1_000)
    }

    #[tokio::test]
    async fn test_memory_history_appends_in_order() {
        let history = MemorySchemaHistory::new();
        assert!(history.is_empty());

        let event = create_event();
        let mut changes = TableChanges::new();
        changes.create(&event.tables[0]);

        history.record(&event, Some(&changes)).await.unwrap();
        history
            .record(&event.clone().with_timestamp(2_000), None)
            .await
            .unwrap();

        let records = history.records();
        assert_eq!(history.len(), 2);
        assert_eq!(records[0].timestamp_ms, 1_000);
        assert_eq!(records[0].table_changes.as_ref().unwrap().len(), 1);
        assert_eq!(records[1].timestamp_ms, 2_000);
        assert!(records[1].table_changes.is_none());
    }

    #[tokio::test]
    async fn test_memory_history_notifies_listeners() {
        let history = MemorySchemaHistory::new();
        let mut listener = history.subscribe();

        history.record(&create_event(), None).await.unwrap();

        let record = listener.recv().await.unwrap();
        assert_eq!(record.change_type, SchemaChangeType::Create);
        assert_eq!(record.position.as_deref(), Some("00000025:00000448:0001"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_records_notify_in_stored_order() {
        let history = Arc::new(MemorySchemaHistory::new());
        let mut listener = history.subscribe();

        let writers: Vec<_> = (0..8i64)
            .map(|writer| {
                let history = Arc::clone(&history);
                tokio::spawn(async move {
                    for i in 0..16i64 {
                        let event = create_event().with_timestamp(writer * 100 + i);
                        history.record(&event, None).await.unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        let mut notified = Vec::new();
        while let Ok(record) = listener.try_recv() {
            notified.push(record.timestamp_ms);
        }
        let stored: Vec<i64> = history.records().iter().map(|r| r.timestamp_ms).collect();
        assert_eq!(stored.len(), 128);
        assert_eq!(notified, stored);
    }

    #[test]
    fn test_history_record_json() {
        let record = HistoryRecord::from_event(&create_event(), None);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["database"], "inventory");
        assert_eq!(json["change_type"], "CREATE");
        assert!(json.get("table_changes").is_none());

        let back: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
