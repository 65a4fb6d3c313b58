//! # SQL Server Schema Tracking
//!
//! Logical schema of a SQL Server database captured through CDC tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  SqlServerDatabaseSchema                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  startup:   TableLister ──▶ CaptureFilter ──▶ captured set      │
//! │                                                                 │
//! │  DDL:       SchemaChangeEvent (exactly one table)               │
//! │                  │                                              │
//! │                  ▼                                              │
//! │             SqlServerValueConverters ──▶ TableSchema            │
//! │                  │                                              │
//! │                  ▼                                              │
//! │             SchemaRegistry (overwrite) ──▶ SchemaHistory        │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike the binlog-based dialects, SQL Server reports DDL per capture
//! instance, so every schema change event describes exactly one table.
//! Events carrying zero or several tables are rejected.
//!
//! ## Change Handling
//!
//! | Change | Registry | Table changes in history |
//! |--------|----------|--------------------------|
//! | CREATE (snapshot) | overwrite | `CREATE` with full definition |
//! | CREATE (streaming) | overwrite | none |
//! | ALTER | overwrite | none |
//! | DROP | overwrite, tombstoned | none |
//!
//! ## Example
//!
//! ```rust,ignore
//! use rivven_cdc_schema::sqlserver::{SqlServerDatabaseSchema, SqlServerSchemaConfig};
//! use rivven_cdc_schema::MemorySchemaHistory;
//!
//! let config = SqlServerSchemaConfig::builder()
//!     .server_name("server1")
//!     .database_name("inventory")
//!     .include_table("dbo.*")
//!     .build()?;
//!
//! let history = Arc::new(MemorySchemaHistory::new());
//! let schema = SqlServerDatabaseSchema::new(config, &lister, history).await?;
//!
//! for event in ddl_events {
//!     schema.apply_schema_change(&event).await?;
//! }
//! ```

mod config;
mod schema;
mod topic;
mod value_converters;

pub use config::{SqlServerSchemaConfig, SqlServerSchemaConfigBuilder};
pub use schema::SqlServerDatabaseSchema;
pub use topic::SqlServerTopicSelector;
pub use value_converters::SqlServerValueConverters;

// Re-export common types
pub use crate::common::{SchemaChangeEvent, SchemaChangeType, TableDefinition, TableId};
