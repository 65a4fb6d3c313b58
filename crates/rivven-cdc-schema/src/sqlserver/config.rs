//! SQL Server schema tracking configuration

use crate::common::{
    CaptureFilter, CaptureFilterConfig, DecimalHandlingMode, Result, SchemaError,
};
use serde::{Deserialize, Serialize};

/// Configuration of SQL Server schema tracking.
///
/// # Example
///
/// ```rust
/// use rivven_cdc_schema::sqlserver::SqlServerSchemaConfig;
/// use rivven_cdc_schema::DecimalHandlingMode;
///
/// let config = SqlServerSchemaConfig::builder()
///     .server_name("server1")
///     .database_name("inventory")
///     .include_table("dbo.*")
///     .exclude_table("dbo.audit_log")
///     .decimal_handling_mode(DecimalHandlingMode::String)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.database_name, "inventory");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlServerSchemaConfig {
    /// Logical server name; prefixes topic and schema names
    pub server_name: String,
    /// Database whose tables are captured
    pub database_name: String,
    /// Tables to include (glob patterns)
    #[serde(default = "default_include")]
    pub include_tables: Vec<String>,
    /// Tables to exclude (glob patterns, evaluated first)
    #[serde(default)]
    pub exclude_tables: Vec<String>,
    /// Representation of DECIMAL/NUMERIC/MONEY columns
    #[serde(default)]
    pub decimal_handling_mode: DecimalHandlingMode,
    /// Adjust field names to Avro-safe identifiers
    #[serde(default)]
    pub sanitize_field_names: bool,
}

fn default_include() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for SqlServerSchemaConfig {
    fn default() -> Self {
        Self {
            server_name: String::new(),
            database_name: String::new(),
            include_tables: default_include(),
            exclude_tables: Vec::new(),
            decimal_handling_mode: DecimalHandlingMode::default(),
            sanitize_field_names: false,
        }
    }
}

impl SqlServerSchemaConfig {
    /// Create a new builder.
    pub fn builder() -> SqlServerSchemaConfigBuilder {
        SqlServerSchemaConfigBuilder::default()
    }

    /// Filter configuration for capture-set resolution.
    pub fn filter_config(&self) -> CaptureFilterConfig {
        CaptureFilterConfig {
            include_tables: self.include_tables.clone(),
            exclude_tables: self.exclude_tables.clone(),
        }
    }

    /// Compile the table filter.
    pub fn table_filter(&self) -> Result<CaptureFilter> {
        Ok(CaptureFilter::new(self.filter_config())?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.server_name.trim().is_empty() {
            return Err(SchemaError::config("server_name must not be empty"));
        }
        if self.database_name.trim().is_empty() {
            return Err(SchemaError::config("database_name must not be empty"));
        }
        self.table_filter()?;
        Ok(())
    }
}

/// Builder for [`SqlServerSchemaConfig`].
#[derive(Debug, Default)]
pub struct SqlServerSchemaConfigBuilder {
    config: SqlServerSchemaConfig,
    includes_set: bool,
}

impl SqlServerSchemaConfigBuilder {
    /// Set logical server name.
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.config.server_name = name.into();
        self
    }

    /// Set database name.
    pub fn database_name(mut self, name: impl Into<String>) -> Self {
        self.config.database_name = name.into();
        self
    }

    /// Add a table include pattern. The first call replaces the
    /// include-everything default.
    pub fn include_table(mut self, pattern: impl Into<String>) -> Self {
        if !self.includes_set {
            self.config.include_tables.clear();
            self.includes_set = true;
        }
        self.config.include_tables.push(pattern.into());
        self
    }

    /// Add a table exclude pattern.
    pub fn exclude_table(mut self, pattern: impl Into<String>) -> Self {
        self.config.exclude_tables.push(pattern.into());
        self
    }

    /// Set decimal handling mode.
    pub fn decimal_handling_mode(mut self, mode: DecimalHandlingMode) -> Self {
        self.config.decimal_handling_mode = mode;
        self
    }

    /// Adjust field names to Avro-safe identifiers.
    pub fn sanitize_field_names(mut self, sanitize: bool) -> Self {
        self.config.sanitize_field_names = sanitize;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<SqlServerSchemaConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
