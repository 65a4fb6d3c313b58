//! SQL Server column type to logical field type mapping
//!
//! | SQL Server type | Field type |
//! |-----------------|------------|
//! | `bit` | Boolean |
//! | `tinyint`, `smallint` | Int16 |
//! | `int` | Int32 |
//! | `bigint` | Int64 |
//! | `real` / `float` | Float32 / Float64 |
//! | `decimal`, `numeric`, `money`, `smallmoney` | per [`DecimalHandlingMode`] |
//! | character, `xml`, `uniqueidentifier` | String |
//! | `binary`, `varbinary`, `image`, `rowversion` | Bytes |
//! | `date` | Date |
//! | `time(p)` | Time / MicroTime / NanoTime |
//! | `smalldatetime`, `datetime` | Timestamp |
//! | `datetime2(p)` | Timestamp / MicroTimestamp / NanoTimestamp |
//! | `datetimeoffset` | ZonedTimestamp |
//!
//! Spatial types, `sql_variant` and `hierarchyid` have no mapping.

use crate::common::{Column, DecimalHandlingMode, FieldType, ValueConverterProvider};

/// Default precision of `decimal`/`numeric` without explicit precision
const DEFAULT_DECIMAL_PRECISION: u32 = 18;
/// Default fractional second precision of `time` and `datetime2`
const DEFAULT_TIME_PRECISION: u32 = 7;

/// SQL Server value converters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerValueConverters {
    decimal_mode: DecimalHandlingMode,
}

impl SqlServerValueConverters {
    pub fn new(decimal_mode: DecimalHandlingMode) -> Self {
        Self { decimal_mode }
    }

    pub fn decimal_mode(&self) -> DecimalHandlingMode {
        self.decimal_mode
    }

    fn decimal(&self, precision: u32, scale: u32) -> FieldType {
        match self.decimal_mode {
            DecimalHandlingMode::Precise => FieldType::Decimal { precision, scale },
            DecimalHandlingMode::Double => FieldType::Float64,
            DecimalHandlingMode::String => FieldType::String,
        }
    }
}

/// Lower-case base type name: `NVARCHAR(50)` → `nvarchar`,
/// `int identity` → `int`.
fn base_type(type_name: &str) -> String {
    let lower = type_name.trim().to_ascii_lowercase();
    let end = lower
        .find(|c: char| c == '(' || c.is_ascii_whitespace())
        .unwrap_or(lower.len());
    lower[..end].to_string()
}

impl ValueConverterProvider for SqlServerValueConverters {
    fn field_type(&self, column: &Column) -> Option<FieldType> {
        let field_type = match base_type(&column.type_name).as_str() {
            "bit" => FieldType::Boolean,
            "tinyint" | "smallint" => FieldType::Int16,
            "int" => FieldType::Int32,
            "bigint" => FieldType::Int64,
            "real" => FieldType::Float32,
            "float" => {
                // float(n) with n <= 24 is stored as real
                match column.length {
                    Some(n) if n <= 24 => FieldType::Float32,
                    _ => FieldType::Float64,
                }
            }
            "decimal" | "numeric" => self.decimal(
                column.length.unwrap_or(DEFAULT_DECIMAL_PRECISION),
                column.scale.unwrap_or(0),
            ),
            "money" => self.decimal(19, 4),
            "smallmoney" => self.decimal(10, 4),
            "char" | "varchar" | "text" | "nchar" | "nvarchar" | "ntext" | "xml"
            | "uniqueidentifier" | "sysname" => FieldType::String,
            "binary" | "varbinary" | "image" | "timestamp" | "rowversion" => FieldType::Bytes,
            "date" => FieldType::Date,
            "time" => match column.scale.unwrap_or(DEFAULT_TIME_PRECISION) {
                0..=3 => FieldType::Time,
                4..=6 => FieldType::MicroTime,
                _ => FieldType::NanoTime,
            },
            "smalldatetime" | "datetime" => FieldType::Timestamp,
            "datetime2" => match column.scale.unwrap_or(DEFAULT_TIME_PRECISION) {
                0..=3 => FieldType::Timestamp,
                4..=6 => FieldType::MicroTimestamp,
                _ => FieldType::NanoTimestamp,
            },
            "datetimeoffset" => FieldType::ZonedTimestamp,
            _ => return None,
        };
        Some(field_type)
    }
}
