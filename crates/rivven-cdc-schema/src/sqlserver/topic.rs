//! Topic naming for SQL Server tables

use crate::common::TableId;

/// Topic names derived from the logical server name.
///
/// - table topics: `<server>.<schema>.<table>`
/// - schema change topic: `<server>.schema_changes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlServerTopicSelector {
    prefix: String,
}

impl SqlServerTopicSelector {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Topic for row changes of a table.
    pub fn topic_for(&self, id: &TableId) -> String {
        match id.schema() {
            Some(schema) => format!("{}.{}.{}", self.prefix, schema, id.table()),
            None => format!("{}.{}", self.prefix, id.table()),
        }
    }

    /// Topic for schema change events.
    pub fn schema_change_topic(&self) -> String {
        if self.prefix.is_empty() {
            "schema_changes".to_string()
        } else {
            format!("{}.schema_changes", self.prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        let selector = SqlServerTopicSelector::new("server1");
        assert_eq!(
            selector.topic_for(&TableId::new("inventory", "dbo", "orders")),
            "server1.dbo.orders"
        );
        assert_eq!(
            selector.topic_for(&TableId::unqualified("orders")),
            "server1.orders"
        );
        assert_eq!(selector.schema_change_topic(), "server1.schema_changes");
        assert_eq!(
            SqlServerTopicSelector::new("").schema_change_topic(),
            "schema_changes"
        );
    }
}
