// src/filter.rs
// =============================================================================
// Local search over already-fetched records.
//
// A record matches when its name or its symbol contains the search term,
// ignoring case. A blank term matches everything. Nothing is refetched, this
// only narrows down what is shown.
// =============================================================================

use crate::catalog::AssetRecord;

/// Returns the records whose name or symbol contains `term`, in their
/// original order.
pub fn filter_records(records: &[AssetRecord], term: &str) -> Vec<AssetRecord> {
    if term.trim().is_empty() {
        return records.to_vec();
    }

    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.name.to_lowercase().contains(&needle)
                || record.symbol.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
