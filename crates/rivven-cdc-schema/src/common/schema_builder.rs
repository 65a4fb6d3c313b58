//! # Derived Output Schemas
//!
//! Builds the externally published key/value schema of a table from its
//! structural definition.
//!
//! ## Pieces
//!
//! - [`ValueConverterProvider`] - maps a dialect column type to a logical [`FieldType`]
//! - [`SchemaNameAdjuster`] - makes schema and field names safe for Avro-style consumers
//! - [`DecimalHandlingMode`] - how DECIMAL/NUMERIC/MONEY columns are represented
//! - [`TableSchemaBuilder`] - combines the above into a [`TableSchema`]
//!
//! Building is total: a column whose type has no mapping is left out of the
//! derived schema and logged, the table itself is still registered.

use crate::common::table::{Column, TableDefinition, TableId};
use crate::common::{Result, SchemaError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

// ============================================================================
// Decimal Handling
// ============================================================================

/// Representation of exact numeric columns in the derived schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalHandlingMode {
    /// Exact decimal with precision and scale
    #[default]
    Precise,
    /// 64-bit floating point (may lose precision)
    Double,
    /// Decimal rendered as a string
    String,
}

impl DecimalHandlingMode {
    /// Parse a configuration value (case-insensitive, surrounding
    /// whitespace ignored).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "precise" => Some(Self::Precise),
            "double" => Some(Self::Double),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precise => "precise",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

impl FromStr for DecimalHandlingMode {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            SchemaError::config(format!(
                "invalid decimal handling mode '{}', expected precise, double or string",
                s
            ))
        })
    }
}

impl std::fmt::Display for DecimalHandlingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Field Types
// ============================================================================

/// Logical type of a field in the derived schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Boolean,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    /// Exact decimal
    Decimal { precision: u32, scale: u32 },
    /// Days since epoch
    Date,
    /// Time of day in milliseconds
    Time,
    /// Time of day in microseconds
    MicroTime,
    /// Time of day in nanoseconds
    NanoTime,
    /// Milliseconds since epoch, no zone
    Timestamp,
    /// Microseconds since epoch, no zone
    MicroTimestamp,
    /// Nanoseconds since epoch, no zone
    NanoTimestamp,
    /// ISO-8601 string with offset
    ZonedTimestamp,
}

/// One field of a derived schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name (adjusted if sanitizing is enabled)
    pub name: String,
    /// Logical type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field may be null
    pub optional: bool,
    /// Default value expression of the source column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Derived key/value schema of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table the schema was derived from
    pub id: TableId,
    /// Fully qualified key schema name
    pub key_schema_name: String,
    /// Fully qualified value schema name
    pub value_schema_name: String,
    /// Primary key fields, in key order
    pub key_fields: Vec<FieldSchema>,
    /// All supported columns, in declaration order
    pub value_fields: Vec<FieldSchema>,
}

impl TableSchema {
    /// Look up a value field by name.
    pub fn value_field(&self, name: &str) -> Option<&FieldSchema> {
        self.value_fields.iter().find(|f| f.name == name)
    }

    /// Tables without a primary key produce keyless records.
    pub fn has_key(&self) -> bool {
        !self.key_fields.is_empty()
    }
}

// ============================================================================
// Name Adjustment
// ============================================================================

/// Replaces characters that are not valid in Avro-style full names.
///
/// A valid name starts with `[A-Za-z_]` and continues with `[A-Za-z0-9_]`;
/// `.` is kept as the namespace separator in schema names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaNameAdjuster {
    replacement: Option<char>,
}

impl SchemaNameAdjuster {
    /// Adjuster replacing invalid characters with `_`.
    pub fn avro() -> Self {
        Self {
            replacement: Some('_'),
        }
    }

    /// Adjuster that leaves names unchanged.
    pub fn none() -> Self {
        Self { replacement: None }
    }

    /// Adjust a dotted schema name, segment by segment.
    pub fn adjust(&self, name: &str) -> String {
        if self.replacement.is_none() {
            return name.to_string();
        }
        name.split('.')
            .map(|segment| self.adjust_segment(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Adjust a single identifier (no namespace separators allowed).
    pub fn adjust_segment(&self, segment: &str) -> String {
        let Some(replacement) = self.replacement else {
            return segment.to_string();
        };

        let mut adjusted = String::with_capacity(segment.len() + 1);
        for (i, c) in segment.chars().enumerate() {
            let valid = if i == 0 {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_'
            };
            if valid {
                adjusted.push(c);
            } else if i == 0 && c.is_ascii_digit() {
                adjusted.push(replacement);
                adjusted.push(c);
            } else {
                adjusted.push(replacement);
            }
        }
        if adjusted.is_empty() {
            adjusted.push(replacement);
        }
        adjusted
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Maps dialect column types to logical field types.
pub trait ValueConverterProvider: Send + Sync {
    /// Logical type for a column, or `None` if the type is unsupported.
    fn field_type(&self, column: &Column) -> Option<FieldType>;
}

/// Builds the derived schema of a table definition.
///
/// Must be total and side-effect free for valid definitions.
pub trait SchemaBuilder: Send + Sync {
    fn build(&self, table: &TableDefinition) -> TableSchema;
}

/// Default [`SchemaBuilder`] driven by a [`ValueConverterProvider`].
#[derive(Debug, Clone)]
pub struct TableSchemaBuilder<P> {
    converters: P,
    adjuster: SchemaNameAdjuster,
    schema_prefix: String,
    sanitize_field_names: bool,
}

impl<P: ValueConverterProvider> TableSchemaBuilder<P> {
    /// Create a builder.
    ///
    /// `schema_prefix` is the logical server name that namespaces every
    /// derived schema name.
    pub fn new(
        converters: P,
        adjuster: SchemaNameAdjuster,
        schema_prefix: impl Into<String>,
    ) -> Self {
        Self {
            converters,
            adjuster,
            schema_prefix: schema_prefix.into(),
            sanitize_field_names: false,
        }
    }

    /// Also adjust field names, not only schema names.
    pub fn with_sanitize_field_names(mut self, sanitize: bool) -> Self {
        self.sanitize_field_names = sanitize;
        self
    }

    fn schema_namespace(&self, id: &TableId) -> String {
        let mut parts = vec![self.schema_prefix.as_str()];
        if let Some(schema) = id.schema() {
            parts.push(schema);
        }
        parts.push(id.table());
        self.adjuster.adjust(&parts.join("."))
    }

    fn field(&self, column: &Column, optional: bool) -> Option<FieldSchema> {
        let Some(field_type) = self.converters.field_type(column) else {
            warn!(
                "Column '{}' has unsupported type '{}', skipping",
                column.name, column.type_name
            );
            return None;
        };

        let name = if self.sanitize_field_names {
            self.adjuster.adjust_segment(&column.name)
        } else {
            column.name.clone()
        };

        Some(FieldSchema {
            name,
            field_type,
            optional,
            default_value: column.default_value.clone(),
        })
    }
}

impl<P: ValueConverterProvider> SchemaBuilder for TableSchemaBuilder<P> {
    fn build(&self, table: &TableDefinition) -> TableSchema {
        let namespace = self.schema_namespace(&table.id);

        let key_fields = table
            .primary_key_columns()
            .into_iter()
            .filter_map(|c| self.field(c, false))
            .collect();

        let value_fields = table
            .columns
            .iter()
            .filter_map(|c| self.field(c, c.nullable))
            .collect();

        TableSchema {
            id: table.id.clone(),
            key_schema_name: format!("{}.Key", namespace),
            value_schema_name: format!("{}.Value", namespace),
            key_fields,
            value_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Maps "int" and "text", rejects everything else.
    struct MiniConverters;

    impl ValueConverterProvider for MiniConverters {
        fn field_type(&self, column: &Column) -> Option<FieldType> {
            match column.type_name.as_str() {
                "int" => Some(FieldType::Int32),
                "text" => Some(FieldType::String),
                _ => None,
            }
        }
    }

    fn orders() -> TableDefinition {
        TableDefinition::new(TableId::new("inventory", "dbo", "orders"))
            .with_column(Column::new("id", "int", 1).with_nullable(false))
            .with_column(Column::new("note", "text", 2).with_default("''"))
            .with_column(Column::new("geo", "geography", 3))
            .with_primary_key(["id"])
    }

    #[test]
    fn test_decimal_mode_parse() {
        assert_eq!(
            DecimalHandlingMode::parse("precise"),
            Some(DecimalHandlingMode::Precise)
        );
        assert_eq!(
            DecimalHandlingMode::parse(" DOUBLE "),
            Some(DecimalHandlingMode::Double)
        );
        assert_eq!(
            "String".parse::<DecimalHandlingMode>().unwrap(),
            DecimalHandlingMode::String
        );
        assert!(DecimalHandlingMode::parse("float").is_none());
        assert!("float".parse::<DecimalHandlingMode>().is_err());
        assert_eq!(DecimalHandlingMode::default(), DecimalHandlingMode::Precise);
    }

    #[test]
    fn test_name_adjuster() {
        let adjuster = SchemaNameAdjuster::avro();
        assert_eq!(adjuster.adjust("server1.dbo.orders"), "server1.dbo.orders");
        assert_eq!(adjuster.adjust("server-1.dbo.order lines"), "server_1.dbo.order_lines");
        assert_eq!(adjuster.adjust_segment("1st"), "_1st");
        assert_eq!(adjuster.adjust_segment("a$b"), "a_b");
        assert_eq!(adjuster.adjust_segment(""), "_");

        let none = SchemaNameAdjuster::none();
        assert_eq!(none.adjust("server-1.dbo.x y"), "server-1.dbo.x y");
    }

    #[test]
    fn test_build_schema() {
        let builder =
            TableSchemaBuilder::new(MiniConverters, SchemaNameAdjuster::avro(), "server1");
        let schema = builder.build(&orders());

        assert_eq!(schema.key_schema_name, "server1.dbo.orders.Key");
        assert_eq!(schema.value_schema_name, "server1.dbo.orders.Value");
        assert!(schema.has_key());
        assert_eq!(schema.key_fields.len(), 1);
        assert!(!schema.key_fields[0].optional);

        // unsupported "geography" column is left out
        assert_eq!(schema.value_fields.len(), 2);
        let note = schema.value_field("note").unwrap();
        assert!(note.optional);
        assert_eq!(note.field_type, FieldType::String);
        assert_eq!(note.default_value.as_deref(), Some("''"));
    }

    #[test]
    fn test_build_sanitizes_field_names() {
        let table = TableDefinition::new(TableId::new("inventory", "dbo", "orders"))
            .with_column(Column::new("order id", "int", 1));

        let plain = TableSchemaBuilder::new(MiniConverters, SchemaNameAdjuster::avro(), "s");
        assert!(plain.build(&table).value_field("order id").is_some());

        let sanitizing = TableSchemaBuilder::new(MiniConverters, SchemaNameAdjuster::avro(), "s")
            .with_sanitize_field_names(true);
        assert!(sanitizing.build(&table).value_field("order_id").is_some());
    }

    #[test]
    fn test_field_type_json() {
        let json = serde_json::to_value(FieldType::Decimal {
            precision: 10,
            scale: 2,
        })
        .unwrap();
        assert_eq!(json["type"], "decimal");
        assert_eq!(json["precision"], 10);
    }
}
