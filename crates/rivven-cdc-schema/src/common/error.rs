//! Error types for schema tracking
//!
//! Errors are classified so the connector framework can decide whether
//! to abort startup, drop a single event, or retry a collaborator call.

use crate::common::pattern::PatternError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error categories for metrics and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Startup failures (table listing, capture-set resolution)
    Initialization,
    /// Schema change events that break the event contract
    Contract,
    /// Historized store failures
    History,
    /// Configuration errors (invalid settings, bad patterns)
    Configuration,
    /// Network errors reported by collaborators
    Network,
    /// Serialization errors (JSON)
    Serialization,
}

/// Schema tracking errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The source table listing could not be obtained
    #[error("Could not obtain the list of captured tables for database '{database}': {source}")]
    CaptureSetResolution {
        database: String,
        #[source]
        source: Box<SchemaError>,
    },

    /// A schema change event did not carry exactly one table
    #[error("Malformed schema change event: expected exactly one table, got {table_count}")]
    MalformedEvent { table_count: usize },

    /// Historized store rejected a record
    #[error("Schema history error: {message}")]
    History {
        message: String,
        #[source]
        source: Option<Box<SchemaError>>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid filter pattern
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Table identifier could not be parsed
    #[error("Invalid table identifier: {0}")]
    InvalidTableId(String),

    /// Connection error reported by a source collaborator
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Wrap a table-listing failure as a fatal initialization error
    pub fn capture_set_resolution(database: impl Into<String>, source: SchemaError) -> Self {
        Self::CaptureSetResolution {
            database: database.into(),
            source: Box::new(source),
        }
    }

    /// Create a history error
    pub fn history(msg: impl Into<String>) -> Self {
        Self::History {
            message: msg.into(),
            source: None,
        }
    }

    /// Wrap a collaborator failure raised while writing history
    pub fn history_caused_by(source: SchemaError) -> Self {
        Self::History {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create an invalid table identifier error
    pub fn invalid_table_id(msg: impl Into<String>) -> Self {
        Self::InvalidTableId(msg.into())
    }

    /// Check if this error is retriable.
    ///
    /// Only raw connection errors qualify. Once wrapped into a
    /// capture-set resolution failure the error is fatal: retry policy
    /// belongs to the connection collaborator.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Whether the connector must stop before processing any event.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CaptureSetResolution { .. } | Self::Config(_) | Self::Pattern(_)
        )
    }

    /// Get the error category for metrics and alerting.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CaptureSetResolution { .. } => ErrorCategory::Initialization,
            Self::MalformedEvent { .. } => ErrorCategory::Contract,
            Self::History { .. } => ErrorCategory::History,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Pattern(_) => ErrorCategory::Configuration,
            Self::InvalidTableId(_) => ErrorCategory::Configuration,
            Self::Connection(_) => ErrorCategory::Network,
            Self::Json(_) => ErrorCategory::Serialization,
        }
    }

    /// Get a metric-safe error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CaptureSetResolution { .. } => "capture_set_resolution",
            Self::MalformedEvent { .. } => "malformed_event",
            Self::History { .. } => "history_error",
            Self::Config(_) => "config_error",
            Self::Pattern(_) => "pattern_error",
            Self::InvalidTableId(_) => "invalid_table_id",
            Self::Connection(_) => "connection_error",
            Self::Json(_) => "json_error",
        }
    }
}

/// Result type for schema tracking operations
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::MalformedEvent { table_count: 2 };
        assert!(err.to_string().contains("exactly one table"));
        assert!(err.to_string().contains('2'));

        let err = SchemaError::capture_set_resolution(
            "inventory",
            SchemaError::connection("login failed"),
        );
        assert!(err.to_string().contains("inventory"));
        assert!(err.to_string().contains("login failed"));
    }

    #[test]
    fn test_history_error_keeps_source() {
        use std::error::Error;

        let err = SchemaError::history_caused_by(SchemaError::connection("broker down"));
        assert!(err.to_string().contains("broker down"));
        let source = err.source().expect("source kept");
        assert_eq!(source.to_string(), "Connection error: broker down");
        assert!(SchemaError::history("disk full").source().is_none());
    }

    #[test]
    fn test_error_is_retriable() {
        assert!(SchemaError::connection("reset").is_retriable());

        let wrapped =
            SchemaError::capture_set_resolution("db", SchemaError::connection("reset"));
        assert!(!wrapped.is_retriable());
        assert!(!SchemaError::history("disk full").is_retriable());
        assert!(!SchemaError::MalformedEvent { table_count: 0 }.is_retriable());
    }

    #[test]
    fn test_error_is_fatal() {
        let wrapped = SchemaError::capture_set_resolution("db", SchemaError::connection("x"));
        assert!(wrapped.is_fatal());
        assert!(SchemaError::config("x").is_fatal());
        assert!(!SchemaError::history("x").is_fatal());
        assert!(!SchemaError::MalformedEvent { table_count: 3 }.is_fatal());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            SchemaError::MalformedEvent { table_count: 0 }.category(),
            ErrorCategory::Contract
        );
        assert_eq!(SchemaError::history("x").category(), ErrorCategory::History);
        assert_eq!(
            SchemaError::config("x").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            SchemaError::connection("x").category(),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(SchemaError::history("x").error_code(), "history_error");
        assert_eq!(
            SchemaError::MalformedEvent { table_count: 0 }.error_code(),
            "malformed_event"
        );
    }
}
