//! SQL Server database schema
//!
//! Logical view of the captured SQL Server database: the capture set
//! resolved at startup plus the versioned definition of every table a
//! schema change has been applied to.

use super::config::SqlServerSchemaConfig;
use super::topic::SqlServerTopicSelector;
use super::value_converters::SqlServerValueConverters;
use crate::common::{
    determine_captured_tables, HistorizedSchema, HistoryRecord, RegistryEntry, Result,
    SchemaChangeEvent, SchemaChangeStatsSnapshot, SchemaChangeType, SchemaError,
    SchemaNameAdjuster, SchemaRegistry, SharedSchemaHistory, TableChanges, TableDefinition,
    TableId, TableLister, TableSchema, TableSchemaBuilder,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// SQL Server database schema.
///
/// Safe to share behind an `Arc`: readers use the registry accessors while a
/// single task applies schema changes.
///
/// # Example
///
/// ```rust,ignore
/// let history = Arc::new(MemorySchemaHistory::new());
/// let schema = SqlServerDatabaseSchema::new(config, &lister, history).await?;
///
/// schema.apply_schema_change(&event).await?;
/// let orders = schema.table_for(&TableId::new("inventory", "dbo", "orders"));
/// ```
pub struct SqlServerDatabaseSchema {
    config: SqlServerSchemaConfig,
    schema: HistorizedSchema,
    topic_selector: SqlServerTopicSelector,
    /// Serializes appliers so history order matches application order
    apply_lock: Mutex<()>,
}

impl SqlServerDatabaseSchema {
    /// Resolve the capture set and create an empty schema.
    ///
    /// Fails with [`SchemaError::CaptureSetResolution`] if the table listing
    /// cannot be obtained.
    pub async fn new<L>(
        config: SqlServerSchemaConfig,
        lister: &L,
        history: SharedSchemaHistory,
    ) -> Result<Self>
    where
        L: TableLister + ?Sized,
    {
        config.validate()?;
        let filter = config.table_filter()?;
        let captured = determine_captured_tables(lister, &config.database_name, &filter).await?;

        let builder = TableSchemaBuilder::new(
            SqlServerValueConverters::new(config.decimal_handling_mode),
            SchemaNameAdjuster::avro(),
            config.server_name.clone(),
        )
        .with_sanitize_field_names(config.sanitize_field_names);

        Ok(Self {
            topic_selector: SqlServerTopicSelector::new(config.server_name.clone()),
            schema: HistorizedSchema::new(captured, Box::new(builder), history),
            config,
            apply_lock: Mutex::new(()),
        })
    }

    /// Apply one schema change event.
    ///
    /// The event must carry exactly one table. Its definition replaces the
    /// registry entry wholesale, whatever the change type. A DROP keeps the
    /// last definition with a tombstone. CREATE events from the snapshot
    /// also produce a table-changes record for the history.
    ///
    /// If the history write fails the error is returned, but the registry
    /// keeps the change.
    pub async fn apply_schema_change(&self, event: &SchemaChangeEvent) -> Result<()> {
        let _guard = self.apply_lock.lock().await;
        debug!(
            "Applying schema change event {} ({} tables, snapshot={})",
            event.change_type,
            event.tables.len(),
            event.from_snapshot
        );

        // SQL Server DDL affects a single table
        let table = match event.tables.as_slice() {
            [table] => table,
            tables => {
                self.schema.stats().record_malformed();
                return Err(SchemaError::MalformedEvent {
                    table_count: tables.len(),
                });
            }
        };

        let dropped = event.change_type == SchemaChangeType::Drop;
        let version = self.schema.overwrite(table, dropped);

        let table_changes = if event.is_snapshot_create() {
            let mut changes = TableChanges::new();
            changes.create(table);
            Some(changes)
        } else {
            None
        };

        self.schema
            .stats()
            .record_applied(event.change_type, table_changes.is_some());
        info!(
            "Applied {} for {} (version {}, captured={})",
            event.change_type,
            table.id,
            version,
            self.schema.registry().is_captured(&table.id)
        );

        self.schema.record(event, table_changes.as_ref()).await
    }

    /// Rebuild the registry from stored history records.
    ///
    /// Returns the number of table changes replayed.
    pub async fn recover<'a, I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = &'a HistoryRecord>,
    {
        let _guard = self.apply_lock.lock().await;
        self.schema.recover(records)
    }

    /// Tables captured by this connector instance.
    pub fn captured_tables(&self) -> HashSet<TableId> {
        self.schema.registry().snapshot_captured_view()
    }

    /// Current definition of a table.
    pub fn table_for(&self, id: &TableId) -> Option<Arc<TableDefinition>> {
        self.schema.registry().get(id)
    }

    /// Current derived schema of a table.
    pub fn schema_for(&self, id: &TableId) -> Option<Arc<TableSchema>> {
        self.schema.registry().schema_for(id)
    }

    /// Full registry entry of a table.
    pub fn entry(&self, id: &TableId) -> Option<Arc<RegistryEntry>> {
        self.schema.registry().entry(id)
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &SchemaRegistry {
        self.schema.registry()
    }

    /// Topic for row changes of a table.
    pub fn topic_for(&self, id: &TableId) -> String {
        self.topic_selector.topic_for(id)
    }

    /// Topic for schema change events.
    pub fn schema_change_topic(&self) -> String {
        self.topic_selector.schema_change_topic()
    }

    /// Get configuration.
    pub fn config(&self) -> &SqlServerSchemaConfig {
        &self.config
    }

    /// Get statistics.
    pub fn stats(&self) -> SchemaChangeStatsSnapshot {
        self.schema.stats().snapshot()
    }
}
