//! Table filtering for capture-set resolution
//!
//! - Include/exclude tables by pattern (glob, or regex with `regex:`)
//! - Excludes take precedence over includes
//! - Patterns match `catalog.schema.table`, `schema.table` or `table`
//!
//! # Example
//!
//! ```rust
//! use rivven_cdc_schema::{CaptureFilter, CaptureFilterConfig, TableFilter, TableId};
//!
//! let config = CaptureFilterConfig {
//!     include_tables: vec!["dbo.*".to_string()],
//!     exclude_tables: vec!["*.audit_log".to_string()],
//! };
//! let filter = CaptureFilter::new(config).unwrap();
//!
//! assert!(filter.is_included(&TableId::new("inventory", "dbo", "orders")));
//! assert!(!filter.is_included(&TableId::new("inventory", "dbo", "audit_log")));
//! ```

use crate::common::pattern::{PatternError, TablePatternSet};
use crate::common::table::TableId;
use serde::{Deserialize, Serialize};

/// Predicate deciding whether a table belongs to the capture set.
///
/// Implementations must be pure: the same identifier always yields the
/// same answer.
pub trait TableFilter: Send + Sync {
    /// Check if a table should be captured
    fn is_included(&self, id: &TableId) -> bool;
}

impl<F> TableFilter for F
where
    F: Fn(&TableId) -> bool + Send + Sync,
{
    fn is_included(&self, id: &TableId) -> bool {
        self(id)
    }
}

/// Filter configuration for captured tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFilterConfig {
    /// Tables to include (supports glob patterns like "dbo.*")
    #[serde(default = "default_include")]
    pub include_tables: Vec<String>,

    /// Tables to exclude (evaluated before includes)
    #[serde(default)]
    pub exclude_tables: Vec<String>,
}

fn default_include() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for CaptureFilterConfig {
    fn default() -> Self {
        Self {
            include_tables: default_include(),
            exclude_tables: vec![],
        }
    }
}

/// Compiled capture filter
#[derive(Debug, Clone)]
pub struct CaptureFilter {
    config: CaptureFilterConfig,
    include_patterns: TablePatternSet,
    exclude_patterns: TablePatternSet,
}

impl CaptureFilter {
    /// Create a new filter from configuration
    pub fn new(config: CaptureFilterConfig) -> Result<Self, PatternError> {
        let include_patterns = TablePatternSet::compile(&config.include_tables)?;
        let exclude_patterns = TablePatternSet::compile(&config.exclude_tables)?;

        Ok(Self {
            config,
            include_patterns,
            exclude_patterns,
        })
    }

    /// Filter that captures every table
    pub fn include_all() -> Self {
        Self {
            config: CaptureFilterConfig::default(),
            include_patterns: TablePatternSet::compile(&default_include()).unwrap_or_default(),
            exclude_patterns: TablePatternSet::default(),
        }
    }

    /// Get the filter configuration
    pub fn config(&self) -> &CaptureFilterConfig {
        &self.config
    }
}

impl TableFilter for CaptureFilter {
    fn is_included(&self, id: &TableId) -> bool {
        if self.exclude_patterns.matches(id) {
            return false;
        }

        // No include patterns means everything not excluded
        self.include_patterns.is_empty() || self.include_patterns.matches(id)
    }
}
