//! Grouped sums, counts and cross-tabulations over generated records.
//!
//! Grouping functions only report categories that occur in the input. Use
//! [`complete_severity`] / [`complete_status`] when every variant must be present.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{InfrastructureRecord, InfrastructureStatus, Severity, SeverityRecord};

pub fn sum_area_by_severity(records: &[SeverityRecord]) -> BTreeMap<Severity, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.severity).or_insert(0.0) += record.area_acres;
    }
    totals
}

pub fn count_by_status(records: &[InfrastructureRecord]) -> BTreeMap<InfrastructureStatus, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.status).or_insert(0) += 1;
    }
    counts
}

pub fn total_area(records: &[SeverityRecord]) -> f64 {
    records.iter().map(|record| record.area_acres).sum()
}

pub fn count_at_risk(records: &[InfrastructureRecord]) -> u64 {
    records
        .iter()
        .filter(|record| record.status == InfrastructureStatus::AtRisk)
        .count() as u64
}

/// Returns one entry per severity in display order, zero for absent ones.
pub fn complete_severity(totals: &BTreeMap<Severity, f64>) -> Vec<(Severity, f64)> {
    Severity::ALL
        .iter()
        .map(|severity| (*severity, totals.get(severity).copied().unwrap_or(0.0)))
        .collect()
}

pub fn complete_status(
    counts: &BTreeMap<InfrastructureStatus, u64>,
) -> Vec<(InfrastructureStatus, u64)> {
    InfrastructureStatus::ALL
        .iter()
        .map(|status| (*status, counts.get(status).copied().unwrap_or(0)))
        .collect()
}

/// Count matrix of co-occurring row and column values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossTab<R: Ord, C: Ord> {
    cells: BTreeMap<R, BTreeMap<C, u64>>,
    columns: BTreeSet<C>,
}

impl<R: Ord + Clone, C: Ord + Clone> CrossTab<R, C> {
    /// Rows in sorted order.
    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.cells.keys()
    }

    /// Columns observed anywhere in the input, sorted.
    pub fn columns(&self) -> impl Iterator<Item = &C> {
        self.columns.iter()
    }

    pub fn get(&self, row: &R, column: &C) -> u64 {
        self.cells
            .get(row)
            .and_then(|cols| cols.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// Counts for one column across every row, in row order.
    pub fn column(&self, column: &C) -> Vec<(R, u64)> {
        self.cells
            .keys()
            .map(|row| (row.clone(), self.get(row, column)))
            .collect()
    }

    pub fn row_total(&self, row: &R) -> u64 {
        self.cells
            .get(row)
            .map(|cols| cols.values().sum())
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.cells.values().flat_map(|cols| cols.values()).sum()
    }
}

pub fn cross_tabulate<T, R, C>(
    items: &[T],
    row_key: impl Fn(&T) -> R,
    col_key: impl Fn(&T) -> C,
) -> CrossTab<R, C>
where
    R: Ord,
    C: Ord + Clone,
{
    let mut cells: BTreeMap<R, BTreeMap<C, u64>> = BTreeMap::new();
    let mut columns = BTreeSet::new();
    for item in items {
        let column = col_key(item);
        columns.insert(column.clone());
        *cells
            .entry(row_key(item))
            .or_default()
            .entry(column)
            .or_insert(0) += 1;
    }
    CrossTab { cells, columns }
}
