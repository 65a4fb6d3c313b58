//! # Common Schema Tracking Types
//!
//! Database-agnostic building blocks:
//!
//! - [`TableId`], [`TableDefinition`] - Table identity and structure
//! - [`CaptureFilter`], [`TableFilter`] - Include/exclude table filtering
//! - [`TableLister`], [`determine_captured_tables`] - Capture-set resolution
//! - [`SchemaChangeEvent`] - Resolved DDL notifications
//! - [`SchemaRegistry`] - Versioned in-memory table registry
//! - [`TableSchemaBuilder`] - Derived key/value schemas
//! - [`SchemaHistory`], [`MemorySchemaHistory`] - Schema change log
//! - [`HistorizedSchema`] - Registry, builder and history wired together
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Common Module                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TableLister    ←─── lists source tables at startup         │
//! │  CaptureFilter  ←─── include/exclude patterns               │
//! │  SchemaRegistry ←─── TableId → definition + schema          │
//! │  SchemaBuilder  ←─── definition → derived schema            │
//! │  SchemaHistory  ←─── append-only change log                 │
//! │  TableChanges   ←─── replayable definitions                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod capture;
mod error;
mod filter;
mod historized;
mod history;
pub mod pattern;
mod registry;
mod schema_builder;
mod schema_change;
mod table;
mod table_changes;

pub use capture::{determine_captured_tables, resolve_captured_tables, TableLister};
pub use error::*;
pub use filter::{CaptureFilter, CaptureFilterConfig, TableFilter};
pub use historized::HistorizedSchema;
pub use history::{HistoryRecord, MemorySchemaHistory, SchemaHistory, SharedSchemaHistory};
pub use registry::{RegistryEntry, SchemaRegistry};
pub use schema_builder::{
    DecimalHandlingMode, FieldSchema, FieldType, SchemaBuilder, SchemaNameAdjuster, TableSchema,
    TableSchemaBuilder, ValueConverterProvider,
};
pub use schema_change::{
    SchemaChangeEvent, SchemaChangeStats, SchemaChangeStatsSnapshot, SchemaChangeType,
};
pub use table::{Column, TableDefinition, TableId};
pub use table_changes::{TableChange, TableChangeType, TableChanges};
