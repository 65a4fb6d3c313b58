//! # Schema Change Events
//!
//! Structural change notifications consumed by the schema applier.
//!
//! A [`SchemaChangeEvent`] carries fully resolved [`TableDefinition`]s, never
//! raw DDL to be parsed: the optional `ddl` text is kept only as metadata for
//! the history log.
//!
//! ## Usage
//!
//! ```rust
//! use rivven_cdc_schema::common::{
//!     Column, SchemaChangeEvent, SchemaChangeType, TableDefinition, TableId,
//! };
//!
//! let table = TableDefinition::new(TableId::new("inventory", "dbo", "orders"))
//!     .with_column(Column::new("id", "int", 1).with_nullable(false))
//!     .with_primary_key(["id"]);
//!
//! let event = SchemaChangeEvent::new("inventory", "dbo", SchemaChangeType::Create)
//!     .with_table(table)
//!     .with_snapshot(true);
//!
//! assert_eq!(event.tables.len(), 1);
//! assert!(event.is_snapshot_create());
//! ```

use crate::common::table::TableDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of DDL a schema change event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaChangeType {
    Create,
    Alter,
    Drop,
    Truncate,
    /// Database-level change, not tied to a table's structure
    Database,
}

impl SchemaChangeType {
    /// DDL keyword, as written to logs and history.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
            Self::Truncate => "TRUNCATE",
            Self::Database => "DATABASE",
        }
    }
}

impl fmt::Display for SchemaChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema change event.
///
/// For SQL Server every DDL statement affects exactly one table, so a
/// well-formed event carries exactly one entry in `tables`. Multi-table
/// statements must be split upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaChangeEvent {
    pub database: String,
    pub schema: String,
    /// Resolved table definitions after the change
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
    pub change_type: SchemaChangeType,
    /// Produced by the initial snapshot rather than live capture
    #[serde(default)]
    pub from_snapshot: bool,
    /// DDL text, metadata only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddl: Option<String>,
    /// Commit LSN the change was read at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Unix epoch millis
    pub timestamp_ms: i64,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

impl SchemaChangeEvent {
    /// Event without tables, stamped with the current time.
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        change_type: SchemaChangeType,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            tables: Vec::new(),
            change_type,
            from_snapshot: false,
            ddl: None,
            position: None,
            timestamp_ms: now_millis(),
        }
    }

    pub fn with_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_snapshot(mut self, from_snapshot: bool) -> Self {
        self.from_snapshot = from_snapshot;
        self
    }

    pub fn with_ddl(mut self, ddl: impl Into<String>) -> Self {
        self.ddl = Some(ddl.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// CREATE read during the snapshot; seeds the history with the table.
    pub fn is_snapshot_create(&self) -> bool {
        self.from_snapshot && self.change_type == SchemaChangeType::Create
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Counters for the schema applier.
#[derive(Debug, Default)]
pub struct SchemaChangeStats {
    applied: AtomicU64,
    creates: AtomicU64,
    alters: AtomicU64,
    drops: AtomicU64,
    others: AtomicU64,
    table_changes: AtomicU64,
    history_failures: AtomicU64,
    malformed: AtomicU64,
}

impl SchemaChangeStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn by_type(&self, change_type: SchemaChangeType) -> &AtomicU64 {
        match change_type {
            SchemaChangeType::Create => &self.creates,
            SchemaChangeType::Alter => &self.alters,
            SchemaChangeType::Drop => &self.drops,
            SchemaChangeType::Truncate | SchemaChangeType::Database => &self.others,
        }
    }

    /// Count a change written to the registry.
    pub fn record_applied(&self, change_type: SchemaChangeType, with_table_changes: bool) {
        self.applied.fetch_add(1, Ordering::Relaxed);
        self.by_type(change_type).fetch_add(1, Ordering::Relaxed);
        if with_table_changes {
            self.table_changes.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_history_failure(&self) {
        self.history_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SchemaChangeStatsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        SchemaChangeStatsSnapshot {
            changes_applied: load(&self.applied),
            creates: load(&self.creates),
            alters: load(&self.alters),
            drops: load(&self.drops),
            others: load(&self.others),
            table_changes_emitted: load(&self.table_changes),
            history_failures: load(&self.history_failures),
            malformed_events: load(&self.malformed),
        }
    }
}

/// Point-in-time copy of [`SchemaChangeStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaChangeStatsSnapshot {
    /// Changes written to the registry
    pub changes_applied: u64,
    pub creates: u64,
    pub alters: u64,
    pub drops: u64,
    /// TRUNCATE and database-level changes
    pub others: u64,
    /// History records carrying table changes
    pub table_changes_emitted: u64,
    /// History writes that failed after the registry was updated
    pub history_failures: u64,
    /// Events rejected for not carrying exactly one table
    pub malformed_events: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::table::{Column, TableId};

    fn orders() -> TableDefinition {
        TableDefinition::new(TableId::new("inventory", "dbo", "orders"))
            .with_column(Column::new("id", "int", 1))
    }

    #[test]
    fn test_event_builder() {
        let event = SchemaChangeEvent::new("inventory", "dbo", SchemaChangeType::Alter)
            .with_table(orders())
            .with_ddl("ALTER TABLE dbo.orders ADD note nvarchar(100)")
            .with_position("00000027:00000758:0003")
            .with_timestamp(42);

        assert_eq!(event.tables, vec![orders()]);
        assert!(!event.from_snapshot);
        assert_eq!(event.position.as_deref(), Some("00000027:00000758:0003"));
        assert_eq!(event.timestamp_ms, 42);
        let stamped = SchemaChangeEvent::new("inventory", "dbo", SchemaChangeType::Drop);
        assert!(stamped.timestamp_ms > 0);
    }

    #[test]
    fn test_is_snapshot_create() {
        let create = SchemaChangeEvent::new("inventory", "dbo", SchemaChangeType::Create);
        assert!(!create.is_snapshot_create());
        assert!(create.with_snapshot(true).is_snapshot_create());

        let alter = SchemaChangeEvent::new("inventory", "dbo", SchemaChangeType::Alter)
            .with_snapshot(true);
        assert!(!alter.is_snapshot_create());
    }

    #[test]
    fn test_event_json() {
        let event = SchemaChangeEvent::new("inventory", "dbo", SchemaChangeType::Create)
            .with_table(orders())
            .with_snapshot(true);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["change_type"], "CREATE");
        assert_eq!(json["tables"][0]["id"]["table"], "orders");
        assert!(json.get("ddl").is_none());

        let parsed: SchemaChangeEvent = serde_json::from_str(
            r#"{"database":"inventory","schema":"dbo","change_type":"TRUNCATE","timestamp_ms":1}"#,
        )
        .unwrap();
        assert_eq!(parsed.change_type, SchemaChangeType::Truncate);
        assert!(parsed.tables.is_empty());
        assert!(!parsed.from_snapshot);
    }

    #[test]
    fn test_change_type_keyword() {
        assert_eq!(SchemaChangeType::Create.to_string(), "CREATE");
        assert_eq!(SchemaChangeType::Database.to_string(), "DATABASE");
    }

    #[test]
    fn test_stats_by_type() {
        let stats = SchemaChangeStats::new();

        stats.record_applied(SchemaChangeType::Create, true);
        stats.record_applied(SchemaChangeType::Alter, false);
        stats.record_applied(SchemaChangeType::Alter, false);
        stats.record_applied(SchemaChangeType::Truncate, false);
        stats.record_history_failure();
        stats.record_malformed();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.changes_applied, 4);
        assert_eq!(
            (snapshot.creates, snapshot.alters, snapshot.drops, snapshot.others),
            (1, 2, 0, 1)
        );
        assert_eq!(snapshot.table_changes_emitted, 1);
        assert_eq!(snapshot.history_failures, 1);
        assert_eq!(snapshot.malformed_events, 1);
    }
}
