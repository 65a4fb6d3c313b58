//! Property-based tests for capture-set resolution
//!
//! The resolved set must be exactly the listed tables the filter accepts.

use proptest::prelude::*;
use rivven_cdc_schema::common::resolve_captured_tables;
use rivven_cdc_schema::{CaptureFilter, CaptureFilterConfig, TableFilter, TableId};
use std::collections::HashSet;

fn table_ids() -> impl Strategy<Value = HashSet<TableId>> {
    prop::collection::hash_set(
        ("(dbo|sales|audit)", "[a-z]{1,8}")
            .prop_map(|(schema, table)| TableId::new("inventory", schema, table)),
        0..32,
    )
}

proptest! {
    /// Property: resolve(L, F) == { t in L : F(t) }
    #[test]
    fn prop_resolved_set_is_filtered_listing(
        listed in table_ids(),
        excluded_schema in "(dbo|sales|audit)",
    ) {
        let filter = CaptureFilter::new(CaptureFilterConfig {
            include_tables: vec!["*".to_string()],
            exclude_tables: vec![format!("{}.*", excluded_schema)],
        })
        .unwrap();

        let captured = resolve_captured_tables(listed.clone(), &filter);

        let expected: HashSet<TableId> = listed
            .iter()
            .filter(|id| id.schema() != Some(excluded_schema.as_str()))
            .cloned()
            .collect();
        prop_assert_eq!(captured, expected);
    }

    /// Property: the resolved set never leaves the listing
    #[test]
    fn prop_resolved_set_within_listing(listed in table_ids(), seed in any::<u8>()) {
        let filter = move |id: &TableId| id.table().len() % 3 != (seed % 3) as usize;

        let captured = resolve_captured_tables(listed.clone(), &filter);

        prop_assert!(captured.is_subset(&listed));
        for id in &listed {
            prop_assert_eq!(captured.contains(id), filter.is_included(id));
        }
    }
}
