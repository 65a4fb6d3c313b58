//! # Schema Registry
//!
//! In-memory view of the current structure of every known table.
//!
//! Each table maps to an immutable [`RegistryEntry`] behind an `Arc`. A
//! change builds a complete new entry and swaps the `Arc` under a short
//! write lock; readers clone the `Arc` under a read lock. A reader therefore
//! sees either the previous or the new entry, never a mix of both.
//!
//! Mutation is crate-private and only reachable through the schema applier,
//! which keeps a single writer.
//!
//! Registry membership is independent of the capture set: tables outside the
//! capture set (e.g. referenced by foreign keys) are tracked the same way.

use crate::common::schema_builder::TableSchema;
use crate::common::table::{TableDefinition, TableId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Registry state for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    /// Structural definition
    pub definition: Arc<TableDefinition>,
    /// Derived output schema
    pub schema: Arc<TableSchema>,
    /// 1 for the first put, incremented on every later put
    pub version: u64,
    /// Tombstone: the last applied change dropped the table
    pub dropped: bool,
}

/// Versioned table registry.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Capture set resolved at startup
    captured: HashSet<TableId>,
    /// Current entry per table
    tables: RwLock<HashMap<TableId, Arc<RegistryEntry>>>,
}

impl SchemaRegistry {
    /// Create an empty registry over a resolved capture set.
    pub fn new(captured: HashSet<TableId>) -> Self {
        Self {
            captured,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Current definition of a table.
    ///
    /// Dropped tables keep their last definition; check
    /// [`is_dropped`](Self::is_dropped) to tell them apart.
    pub fn get(&self, id: &TableId) -> Option<Arc<TableDefinition>> {
        self.tables.read().get(id).map(|e| Arc::clone(&e.definition))
    }

    /// Current derived schema of a table.
    pub fn schema_for(&self, id: &TableId) -> Option<Arc<TableSchema>> {
        self.tables.read().get(id).map(|e| Arc::clone(&e.schema))
    }

    /// Full entry (definition, schema, version, tombstone) of a table.
    pub fn entry(&self, id: &TableId) -> Option<Arc<RegistryEntry>> {
        self.tables.read().get(id).cloned()
    }

    /// Version of a table's current entry.
    pub fn version(&self, id: &TableId) -> Option<u64> {
        self.tables.read().get(id).map(|e| e.version)
    }

    /// Whether the last applied change dropped the table.
    pub fn is_dropped(&self, id: &TableId) -> bool {
        self.tables.read().get(id).is_some_and(|e| e.dropped)
    }

    /// Tables captured by this connector instance.
    pub fn snapshot_captured_view(&self) -> HashSet<TableId> {
        self.captured.clone()
    }

    /// Check capture-set membership.
    pub fn is_captured(&self, id: &TableId) -> bool {
        self.captured.contains(id)
    }

    /// All tables with a registry entry, dropped ones included.
    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<_> = self.tables.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    /// Replace the entry of `definition.id` wholesale and return its new
    /// version.
    pub(crate) fn put(
        &self,
        definition: TableDefinition,
        schema: TableSchema,
        dropped: bool,
    ) -> u64 {
        let id = definition.id.clone();
        let definition = Arc::new(definition);
        let schema = Arc::new(schema);

        let mut tables = self.tables.write();
        let version = tables.get(&id).map_or(1, |prev| prev.version + 1);
        tables.insert(
            id,
            Arc::new(RegistryEntry {
                definition,
                schema,
                version,
                dropped,
            }),
        );
        version
    }
}
