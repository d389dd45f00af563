//! Distinct-value partitions of clustered columns and the association of
//! color columns with the categorical columns they encode.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::column_type::ColumnType;
use crate::matrix::Matrix;

/// Name given to the group of rows with an empty value.
pub const MISSING_VALUE: &str = "N/A";

/// Rows of one column grouped by their (case-sensitive) value.
///
/// Groups are ordered by value and each holds ascending row indices; the
/// groups of one column are pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub groups: BTreeMap<String, Vec<usize>>,
}

impl Partition {
    /// Group row indices by value, in row order.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (row, value) in values.into_iter().enumerate() {
            let value = if value.is_empty() { MISSING_VALUE } else { value };
            // Rows arrive in order, so every group stays sorted.
            match groups.get_mut(value) {
                Some(rows) => rows.push(row),
                None => {
                    groups.insert(value.to_string(), vec![row]);
                }
            }
        }
        Self { groups }
    }

    /// Number of distinct values.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the column was not partitioned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rows holding `value`.
    pub fn rows(&self, value: &str) -> Option<&[usize]> {
        self.groups.get(value).map(Vec::as_slice)
    }

    /// Returns true if every group of `self` equals some group of `other`.
    pub fn is_exactly_covered_by(&self, other: &Partition) -> bool {
        self.groups
            .values()
            .all(|rows| other.groups.values().any(|candidate| candidate == rows))
    }

    /// First value (in value order) whose rows include all of `rows`.
    pub fn containing_group(&self, rows: &[usize]) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, group)| includes(group, rows))
            .map(|(value, _)| value.as_str())
    }
}

/// Returns true if sorted `superset` contains every element of sorted
/// `subset`.
pub fn includes(superset: &[usize], subset: &[usize]) -> bool {
    let mut candidates = superset.iter();
    subset
        .iter()
        .all(|wanted| candidates.by_ref().any(|have| have == wanted))
}

/// Partition every Categorical and Color column; other columns get an empty
/// partition. Columns are processed in parallel.
pub fn partition_columns(table: &Matrix<String>, types: &[ColumnType]) -> Vec<Partition> {
    let rows = table.rows();
    let columns = table.columns();
    (0..columns)
        .into_par_iter()
        .with_max_len(1)
        .map(|c| {
            if types[c].is_clustered() {
                Partition::from_values((0..rows).map(|r| table.values[r * columns + c].as_str()))
            } else {
                Partition::default()
            }
        })
        .collect()
}

/// Number of distinct values of every Color column, 0 for other columns.
pub fn color_counts(partitions: &[Partition], types: &[ColumnType]) -> Vec<usize> {
    partitions
        .iter()
        .zip(types)
        .map(|(partition, column_type)| match column_type {
            ColumnType::Color => partition.len(),
            ColumnType::Unknown | ColumnType::Numerical | ColumnType::Categorical => 0,
        })
        .collect()
}

/// Nearest column that color column `color` encodes.
///
/// Candidates are visited at growing distance, the lower index before the
/// higher one at equal distance. A candidate must not be a color column,
/// must have at least as many distinct values, and every color group must
/// equal one of its groups.
fn nearest_encoded_column(
    color: usize,
    partitions: &[Partition],
    color_counts: &[usize],
) -> Option<usize> {
    let items = partitions.len();
    let wanted = color_counts[color];
    (1..items)
        .flat_map(|offset| {
            [
                color.checked_sub(offset),
                Some(color + offset).filter(|&j| j < items),
            ]
        })
        .flatten()
        .find(|&j| {
            color_counts[j] == 0
                && wanted <= partitions[j].len()
                && partitions[color].is_exactly_covered_by(&partitions[j])
        })
}

/// For every column, the color column associated with it.
///
/// When several color columns pick the same column, the one with the
/// highest index is kept.
pub fn associate_colors(partitions: &[Partition], color_counts: &[usize]) -> Vec<Option<usize>> {
    let matches: Vec<(usize, Option<usize>)> = (0..partitions.len())
        .into_par_iter()
        .with_max_len(1)
        .map(|i| {
            let target = if color_counts[i] > 0 {
                nearest_encoded_column(i, partitions, color_counts)
            } else {
                None
            };
            (i, target)
        })
        .collect();

    let mut has_color = vec![None; partitions.len()];
    for (color, target) in matches {
        if let Some(j) = target {
            has_color[j] = Some(color);
        }
    }
    has_color
}
