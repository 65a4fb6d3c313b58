//! Table-changes records for the schema history.
//!
//! A [`TableChanges`] value lists complete table definitions together with
//! the kind of change that produced them. History consumers replay these
//! records to rebuild the registry without re-reading the source database.

use crate::common::table::{TableDefinition, TableId};
use serde::{Deserialize, Serialize};

/// Kind of a single table change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableChangeType {
    Create,
    Alter,
    Drop,
}

/// One table definition with its change kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    #[serde(rename = "type")]
    pub change_type: TableChangeType,
    pub id: TableId,
    pub table: TableDefinition,
}

/// Ordered list of table changes attached to a history record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChanges {
    changes: Vec<TableChange>,
}

impl TableChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a table creation.
    pub fn create(&mut self, table: &TableDefinition) -> &mut Self {
        self.push(TableChangeType::Create, table)
    }

    /// Record a table alteration.
    pub fn alter(&mut self, table: &TableDefinition) -> &mut Self {
        self.push(TableChangeType::Alter, table)
    }

    /// Record a table drop.
    pub fn drop(&mut self, table: &TableDefinition) -> &mut Self {
        self.push(TableChangeType::Drop, table)
    }

    fn push(&mut self, change_type: TableChangeType, table: &TableDefinition) -> &mut Self {
        self.changes.push(TableChange {
            change_type,
            id: table.id.clone(),
            table: table.clone(),
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableChange> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl IntoIterator for TableChanges {
    type Item = TableChange;
    type IntoIter = std::vec::IntoIter<TableChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
