//! Emission of cluster records from classified columns.

use log::{debug, warn};
use rayon::prelude::*;

use super::color::{Color, generate_palette, parse_color};
use super::partition::{Partition, associate_colors, color_counts, partition_columns};
use crate::column_type::ColumnType;
use crate::matrix::Matrix;

/// A named, colored group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// The distinct value the rows share.
    pub name: String,
    /// Display color.
    pub color: Color,
    /// Ascending row indices.
    pub indices: Vec<usize>,
}

/// All clusters derived from one source column.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSet {
    /// Name of the source column.
    pub name: String,
    /// Index of the source column.
    pub column: usize,
    /// Categorical, or Color for a color column that encodes no other column.
    pub column_type: ColumnType,
    /// Color column the cluster colors were taken from.
    pub color_column: Option<usize>,
    /// One cluster per distinct value, in value order.
    pub clusters: Vec<Cluster>,
}

impl ClusterSet {
    /// Number of clusters.
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns true if the set has no clusters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Cluster named `name`.
    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }
}

/// Builds cluster sets from a string table and its column types.
#[derive(Debug)]
pub struct ClusterBuilder<'a> {
    table: &'a Matrix<String>,
    types: &'a [ColumnType],
    partitions: Vec<Partition>,
    has_color: Vec<Option<usize>>,
}

impl<'a> ClusterBuilder<'a> {
    /// Partition the clustered columns and associate color columns.
    pub fn new(table: &'a Matrix<String>, types: &'a [ColumnType]) -> Self {
        debug_assert_eq!(table.columns(), types.len());
        let partitions = partition_columns(table, types);
        let counts = color_counts(&partitions, types);
        let has_color = associate_colors(&partitions, &counts);
        debug!(
            "partitioned {} columns, {} color associations",
            partitions.iter().filter(|p| !p.is_empty()).count(),
            has_color.iter().flatten().count()
        );
        Self {
            table,
            types,
            partitions,
            has_color,
        }
    }

    /// Partition of every column (empty for unclustered columns).
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Color column associated with every column.
    pub fn color_associations(&self) -> &[Option<usize>] {
        &self.has_color
    }

    /// Emit one set per Categorical column, in column order, followed by one
    /// set per Color column that no Categorical column took its colors from.
    pub fn build(&self) -> Vec<ClusterSet> {
        let items = self.types.len();

        let mut sets: Vec<ClusterSet> = (0..items)
            .into_par_iter()
            .with_max_len(1)
            .filter(|&i| self.types[i] == ColumnType::Categorical)
            .map(|i| self.categorical_set(i))
            .collect();

        let mut processed = vec![false; items];
        for set in &sets {
            processed[set.column] = true;
            if let Some(color) = set.color_column {
                processed[color] = true;
            }
        }

        let standalone: Vec<ClusterSet> = (0..items)
            .into_par_iter()
            .with_max_len(1)
            .filter(|&i| self.types[i] == ColumnType::Color && !processed[i])
            .map(|i| self.color_set(i))
            .collect();
        sets.extend(standalone);
        sets
    }

    fn categorical_set(&self, column: usize) -> ClusterSet {
        let partition = &self.partitions[column];
        let color_column = self.has_color[column];
        let generated = generate_palette(partition.len());

        let clusters = partition
            .groups
            .iter()
            .enumerate()
            .map(|(k, (value, rows))| {
                let color = match color_column {
                    Some(c) => self.partitions[c]
                        .containing_group(rows)
                        .and_then(parse_color)
                        .unwrap_or_else(|| {
                            warn!("no color found for cluster {value:?}, using a generated one");
                            generated[k]
                        }),
                    None => generated[k],
                };
                Cluster {
                    name: value.clone(),
                    color,
                    indices: rows.clone(),
                }
            })
            .collect();

        ClusterSet {
            name: self.table.column_header[column].clone(),
            column,
            column_type: ColumnType::Categorical,
            color_column,
            clusters,
        }
    }

    fn color_set(&self, column: usize) -> ClusterSet {
        let partition = &self.partitions[column];
        let generated = generate_palette(partition.len());

        let clusters = partition
            .groups
            .iter()
            .enumerate()
            .map(|(k, (value, rows))| Cluster {
                name: value.clone(),
                color: parse_color(value).unwrap_or(generated[k]),
                indices: rows.clone(),
            })
            .collect();

        ClusterSet {
            name: self.table.column_header[column].clone(),
            column,
            column_type: ColumnType::Color,
            color_column: None,
            clusters,
        }
    }
}
