//! # rivven-cdc-schema - Schema Tracking for Rivven CDC
//!
//! Captured-table resolution and schema-change tracking for CDC connectors.
//!
//! ## Features
//!
//! - `sqlserver` - SQL Server database schema (enabled by default)
//! - `full` - All dialects
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐        ┌──────────────┐        ┌──────────────┐
//! │ TableLister  │        │ DDL events   │        │ History      │
//! │ (startup)    │        │ (streaming)  │        │ (recovery)   │
//! └──────┬───────┘        └──────┬───────┘        └──────┬───────┘
//!        │                       │                       │
//!        ▼                       ▼                       ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Database Schema                          │
//! │   captured set  +  TableId → (definition, schema, version)   │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    SchemaHistory                             │
//! │       { change type, ddl, position, table changes }          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rivven_cdc_schema::{CaptureFilter, CaptureFilterConfig, TableFilter, TableId};
//!
//! let filter = CaptureFilter::new(CaptureFilterConfig {
//!     include_tables: vec!["dbo.*".to_string()],
//!     exclude_tables: vec!["dbo.audit_*".to_string()],
//! })
//! .unwrap();
//!
//! assert!(filter.is_included(&TableId::new("inventory", "dbo", "orders")));
//! assert!(!filter.is_included(&TableId::new("inventory", "dbo", "audit_log")));
//! ```
//!
//! ## Public API Organization
//!
//! ### Crate root
//! Identity, filtering, events, history and errors.
//!
//! ### `common` module
//! Building blocks for custom dialects: registry, schema builder,
//! historized schema, pattern matching.
//!
//! ### Dialect modules
//! `sqlserver` - the SQL Server database schema and its configuration.

// Common module - always available
pub mod common;

pub use common::{
    // Error handling
    ErrorCategory,
    Result,
    SchemaError,
    // Table identity and structure
    Column,
    TableDefinition,
    TableId,
    // Capture-set resolution
    determine_captured_tables,
    CaptureFilter,
    CaptureFilterConfig,
    TableFilter,
    TableLister,
    // Schema changes
    SchemaChangeEvent,
    SchemaChangeType,
    TableChange,
    TableChangeType,
    TableChanges,
    // Derived schemas
    DecimalHandlingMode,
    FieldSchema,
    FieldType,
    TableSchema,
    // History
    HistoryRecord,
    MemorySchemaHistory,
    SchemaHistory,
    SharedSchemaHistory,
};

// SQL Server - feature-gated
#[cfg(feature = "sqlserver")]
pub mod sqlserver;
