//! # Historized Schema
//!
//! Composition of the pieces every dialect's database schema needs:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   HistorizedSchema                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  SchemaBuilder   ←─── definition → derived TableSchema   │
//! │  SchemaRegistry  ←─── current entry per TableId          │
//! │  SchemaHistory   ←─── append-only change log             │
//! │  Stats           ←─── applied/failed counters            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Dialects decide *what* to overwrite and record; this type does the
//! overwriting, recording and replaying.

use crate::common::history::{HistoryRecord, SharedSchemaHistory};
use crate::common::registry::SchemaRegistry;
use crate::common::schema_builder::SchemaBuilder;
use crate::common::schema_change::{SchemaChangeEvent, SchemaChangeStats};
use crate::common::table::{TableDefinition, TableId};
use crate::common::table_changes::{TableChangeType, TableChanges};
use crate::common::{Result, SchemaError};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Registry, schema builder and history store wired together.
pub struct HistorizedSchema {
    registry: SchemaRegistry,
    builder: Box<dyn SchemaBuilder>,
    history: SharedSchemaHistory,
    stats: SchemaChangeStats,
}

impl HistorizedSchema {
    /// Create a historized schema over a resolved capture set.
    pub fn new(
        captured: HashSet<TableId>,
        builder: Box<dyn SchemaBuilder>,
        history: SharedSchemaHistory,
    ) -> Self {
        Self {
            registry: SchemaRegistry::new(captured),
            builder,
            history,
            stats: SchemaChangeStats::new(),
        }
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Get statistics.
    pub fn stats(&self) -> &SchemaChangeStats {
        &self.stats
    }

    /// Derive the output schema of `table` and replace its registry entry.
    ///
    /// Returns the new entry version.
    pub fn overwrite(&self, table: &TableDefinition, dropped: bool) -> u64 {
        let schema = self.builder.build(table);
        let version = self.registry.put(table.clone(), schema, dropped);
        debug!(
            "Registered table {} at version {}{}",
            table.id,
            version,
            if dropped { " (dropped)" } else { "" }
        );
        version
    }

    /// Hand an applied change to the history store.
    ///
    /// The registry has already been updated and stays updated if the store
    /// fails.
    pub async fn record(
        &self,
        event: &SchemaChangeEvent,
        table_changes: Option<&TableChanges>,
    ) -> Result<()> {
        self.history
            .record(event, table_changes)
            .await
            .map_err(|e| {
                self.stats.record_history_failure();
                warn!(
                    "Schema history write failed for {} event: {}; \
                     in-memory schema keeps the change",
                    event.change_type, e
                );
                match e {
                    SchemaError::History { .. } => e,
                    other => SchemaError::history_caused_by(other),
                }
            })
    }

    /// Rebuild registry entries from stored history records.
    ///
    /// Replays every table change in order without writing to the history.
    /// Records without table changes are skipped. Returns the number of
    /// table changes applied.
    pub fn recover<'a, I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = &'a HistoryRecord>,
    {
        let mut applied = 0;
        for record in records {
            let Some(changes) = &record.table_changes else {
                continue;
            };
            for change in changes.iter() {
                let dropped = change.change_type == TableChangeType::Drop;
                self.overwrite(&change.table, dropped);
                applied += 1;
            }
        }

        info!(
            "Recovered {} table changes into {} registry entries",
            applied,
            self.registry.len()
        );
        applied
    }
}
