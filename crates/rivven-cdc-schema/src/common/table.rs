//! Table identity and structural definitions.
//!
//! [`TableDefinition`] values are produced outside this crate (by the DDL
//! resolution step of a connector) and are treated as immutable snapshots:
//! a schema change replaces a definition, it never edits one.

use crate::common::{Result, SchemaError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Table Identifier
// ============================================================================

/// Qualified table identifier: `catalog.schema.table`.
///
/// For SQL Server the catalog is the database name. Equality, ordering and
/// hashing are by value, so identifiers can key both the capture set and the
/// schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    schema: Option<String>,
    table: String,
}

impl TableId {
    /// Create a fully qualified identifier.
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: Some(catalog.into()),
            schema: Some(schema.into()),
            table: table.into(),
        }
    }

    /// Create an identifier with only a table name.
    pub fn unqualified(table: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            table: table.into(),
        }
    }

    /// Parse a dotted identifier (`table`, `schema.table` or
    /// `catalog.schema.table`).
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(SchemaError::invalid_table_id(format!(
                "'{}' contains an empty part",
                s
            )));
        }

        match parts.as_slice() {
            [table] => Ok(Self::unqualified(*table)),
            [schema, table] => Ok(Self {
                catalog: None,
                schema: Some((*schema).to_string()),
                table: (*table).to_string(),
            }),
            [catalog, schema, table] => Ok(Self::new(*catalog, *schema, *table)),
            _ => Err(SchemaError::invalid_table_id(format!(
                "'{}' has more than three parts",
                s
            ))),
        }
    }

    /// Catalog (database) name, if qualified.
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Schema name, if qualified.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Table name.
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(catalog) = &self.catalog {
            write!(f, "{}.", catalog)?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        write!(f, "{}", self.table)
    }
}

impl FromStr for TableId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ============================================================================
// Column
// ============================================================================

/// Column of a table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Database-native type name (e.g., "nvarchar", "decimal", "datetime2")
    pub type_name: String,
    /// Length or precision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Scale (decimal digits, fractional second precision)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Column position (1-indexed)
    pub position: u32,
    /// Is nullable
    pub nullable: bool,
    /// Default value expression (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// IDENTITY column
    #[serde(default)]
    pub auto_increment: bool,
    /// Computed column
    #[serde(default)]
    pub generated: bool,
}

impl Column {
    /// Create a new nullable column.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, position: u32) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            length: None,
            scale: None,
            position,
            nullable: true,
            default_value: None,
            auto_increment: false,
            generated: false,
        }
    }

    /// Set length/precision.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set scale.
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set nullable.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Mark as IDENTITY column.
    pub fn with_auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    /// Mark as computed column.
    pub fn with_generated(mut self, generated: bool) -> Self {
        self.generated = generated;
        self
    }
}

// ============================================================================
// Table Definition
// ============================================================================

/// Complete structural definition of a table at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table identity
    pub id: TableId,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    /// Primary key column names, in key order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub primary_key: Vec<String>,
    /// Table comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TableDefinition {
    /// Create a definition with no columns.
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            columns: Vec::new(),
            primary_key: Vec::new(),
            comment: None,
        }
    }

    /// Append a column.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Replace all columns.
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Set primary key column names.
    pub fn with_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set table comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Look up a column by name (case-insensitive, as SQL Server compares).
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Primary key columns in key order. Names without a matching column
    /// are skipped.
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.primary_key
            .iter()
            .filter_map(|name| self.column(name))
            .collect()
    }

    /// Check whether a column is part of the primary key.
    pub fn is_primary_key_column(&self, name: &str) -> bool {
        self.primary_key
            .iter()
            .any(|pk| pk.eq_ignore_ascii_case(name))
    }
}
