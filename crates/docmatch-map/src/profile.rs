//! Per-column statistics derived from a dataset.

use std::collections::BTreeSet;

use docmatch_model::{ColumnProfile, Dataset};
use docmatch_validate::is_blank;

/// Profiles every column of `dataset` in column order.
///
/// Duplicate column names are profiled once. At most `sample_size`
/// non-empty values are kept per column, in row order.
pub fn profile(dataset: &Dataset, sample_size: usize) -> Vec<ColumnProfile> {
    let mut seen = BTreeSet::new();
    dataset
        .columns
        .iter()
        .filter(|column| seen.insert(column.as_str()))
        .map(|column| profile_column(dataset, column, sample_size))
        .collect()
}

fn profile_column(dataset: &Dataset, column: &str, sample_size: usize) -> ColumnProfile {
    let total_count = dataset.row_count();
    let mut non_empty_count = 0;
    let mut sample_values = Vec::new();
    for value in dataset.column_values(column) {
        if is_blank(value) {
            continue;
        }
        non_empty_count += 1;
        if sample_values.len() < sample_size {
            sample_values.push(value.to_string());
        }
    }
    let fill_rate = if total_count == 0 {
        0.0
    } else {
        non_empty_count as f64 / total_count as f64
    };
    ColumnProfile {
        name: column.to_string(),
        total_count,
        non_empty_count,
        fill_rate,
        sample_values,
    }
}
