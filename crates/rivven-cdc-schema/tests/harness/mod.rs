//! Test harness for schema tracking integration tests
//!
//! Provides in-process stand-ins for the source database and the history
//! store, plus table fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use rivven_cdc_schema::sqlserver::SqlServerSchemaConfig;
use rivven_cdc_schema::{
    Column, Result, SchemaChangeEvent, SchemaChangeType, SchemaError, SchemaHistory,
    TableChanges, TableDefinition, TableId, TableLister,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test logging (idempotent)
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("rivven_cdc_schema=debug".parse().unwrap()),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const DATABASE: &str = "inventory";
pub const SERVER: &str = "server1";

/// `inventory.dbo.<table>`
pub fn table_id(table: &str) -> TableId {
    TableId::new(DATABASE, "dbo", table)
}

/// Config over `inventory` with the given include patterns.
pub fn config_including(patterns: &[&str]) -> SqlServerSchemaConfig {
    let mut builder = SqlServerSchemaConfig::builder()
        .server_name(SERVER)
        .database_name(DATABASE);
    for pattern in patterns {
        builder = builder.include_table(*pattern);
    }
    builder.build().unwrap()
}

/// Table with an `id int` primary key and the given extra columns.
pub fn table_with_columns(table: &str, extra: &[(&str, &str)]) -> TableDefinition {
    let mut definition = TableDefinition::new(table_id(table))
        .with_column(Column::new("id", "int", 1).with_nullable(false))
        .with_primary_key(["id"]);
    for (i, (name, type_name)) in extra.iter().enumerate() {
        definition = definition.with_column(Column::new(*name, *type_name, i as u32 + 2));
    }
    definition
}

pub fn event(
    change_type: SchemaChangeType,
    table: TableDefinition,
    from_snapshot: bool,
) -> SchemaChangeEvent {
    SchemaChangeEvent::new(DATABASE, "dbo", change_type)
        .with_table(table)
        .with_snapshot(from_snapshot)
}

/// Lister returning a fixed table set.
pub struct StaticLister {
    tables: Vec<TableId>,
    calls: AtomicUsize,
}

impl StaticLister {
    pub fn new(tables: &[&str]) -> Self {
        Self {
            tables: tables.iter().map(|t| table_id(t)).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableLister for StaticLister {
    async fn read_table_names(&self, _database: &str) -> Result<HashSet<TableId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.iter().cloned().collect())
    }
}

/// Lister whose catalog query always fails.
pub struct FailingLister;

#[async_trait]
impl TableLister for FailingLister {
    async fn read_table_names(&self, _database: &str) -> Result<HashSet<TableId>> {
        Err(SchemaError::connection("login failed for user 'cdc'"))
    }
}

/// History store that can be switched into failing mode.
#[derive(Default)]
pub struct FlakyHistory {
    failing: AtomicBool,
    recorded: Mutex<Vec<(SchemaChangeType, bool)>>,
}

impl FlakyHistory {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Recorded `(change type, has table changes)` pairs.
    pub fn recorded(&self) -> Vec<(SchemaChangeType, bool)> {
        self.recorded.lock().clone()
    }
}

#[async_trait]
impl SchemaHistory for FlakyHistory {
    async fn record(
        &self,
        event: &SchemaChangeEvent,
        table_changes: Option<&TableChanges>,
    ) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SchemaError::history("history topic unavailable"));
        }
        self.recorded
            .lock()
            .push((event.change_type, table_changes.is_some()));
        Ok(())
    }
}
