//! # Capture-Set Resolution
//!
//! Computes the tables a connector instance emits change events for: every
//! table the source lists, kept if the configured [`TableFilter`] includes
//! it. Resolution runs once at startup; a listing failure aborts startup.

use crate::common::filter::TableFilter;
use crate::common::table::TableId;
use crate::common::{Result, SchemaError};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{info, trace, warn};

/// Lists the tables visible in a source database.
///
/// Connectivity and retry policy belong to the implementation.
#[async_trait]
pub trait TableLister: Send + Sync {
    /// List all base tables of `database`.
    async fn read_table_names(&self, database: &str) -> Result<HashSet<TableId>>;
}

/// Keep the tables the filter includes.
///
/// The result is always a subset of `all_tables`.
pub fn resolve_captured_tables<I, F>(all_tables: I, filter: &F) -> HashSet<TableId>
where
    I: IntoIterator<Item = TableId>,
    F: TableFilter + ?Sized,
{
    all_tables
        .into_iter()
        .filter(|id| {
            let included = filter.is_included(id);
            if !included {
                trace!(
                    "Skipping table {} as it's not included in the filter configuration",
                    id
                );
            }
            included
        })
        .collect()
}

/// Query the source once and resolve the capture set.
///
/// Any listing failure is returned as
/// [`SchemaError::CaptureSetResolution`]; no partial capture set is produced.
pub async fn determine_captured_tables<L, F>(
    lister: &L,
    database: &str,
    filter: &F,
) -> Result<HashSet<TableId>>
where
    L: TableLister + ?Sized,
    F: TableFilter + ?Sized,
{
    let all_tables = lister
        .read_table_names(database)
        .await
        .map_err(|e| SchemaError::capture_set_resolution(database, e))?;

    let total = all_tables.len();
    let captured = resolve_captured_tables(all_tables, filter);

    if captured.is_empty() {
        warn!(
            "No tables in database '{}' match the filter configuration ({} listed)",
            database, total
        );
    } else {
        info!(
            "Capturing {} of {} tables in database '{}'",
            captured.len(),
            total,
            database
        );
    }

    Ok(captured)
}
