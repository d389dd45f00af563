use rayon::prelude::*;

use crate::cluster::builder::ClusterSet;
use crate::column_type::ColumnType;
use crate::matrix::{BFloat16, Matrix};
use crate::options::StorageType;
use crate::parse::field::FromField;

/// Numeric buffer in the configured storage type.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericMatrix {
    Float32(Matrix<f32>),
    BFloat16(Matrix<BFloat16>),
}

impl NumericMatrix {
    /// Number of rows (samples).
    pub fn rows(&self) -> usize {
        match self {
            NumericMatrix::Float32(m) => m.rows(),
            NumericMatrix::BFloat16(m) => m.rows(),
        }
    }

    /// Number of columns (dimensions).
    pub fn columns(&self) -> usize {
        match self {
            NumericMatrix::Float32(m) => m.columns(),
            NumericMatrix::BFloat16(m) => m.columns(),
        }
    }

    /// Dimension names.
    pub fn column_header(&self) -> &[String] {
        match self {
            NumericMatrix::Float32(m) => &m.column_header,
            NumericMatrix::BFloat16(m) => &m.column_header,
        }
    }

    /// Sample names.
    pub fn row_header(&self) -> &[String] {
        match self {
            NumericMatrix::Float32(m) => &m.row_header,
            NumericMatrix::BFloat16(m) => &m.row_header,
        }
    }

    /// Storage type of the values.
    pub fn storage_type(&self) -> StorageType {
        match self {
            NumericMatrix::Float32(_) => StorageType::Float32,
            NumericMatrix::BFloat16(_) => StorageType::BFloat16,
        }
    }

    /// Cell value widened to `f32`.
    pub fn get_f32(&self, row: usize, column: usize) -> Option<f32> {
        match self {
            NumericMatrix::Float32(m) => m.get(row, column).copied(),
            NumericMatrix::BFloat16(m) => m.get(row, column).map(|v| v.to_f32()),
        }
    }

    /// Copy the Numerical columns of a string table into a numeric matrix.
    ///
    /// Returns `None` if no column is Numerical.
    pub fn from_numerical_columns(
        table: &Matrix<String>,
        types: &[ColumnType],
        storage_type: StorageType,
    ) -> Option<Self> {
        match storage_type {
            StorageType::Float32 => numerical_columns(table, types).map(NumericMatrix::Float32),
            StorageType::BFloat16 => numerical_columns(table, types).map(NumericMatrix::BFloat16),
        }
    }
}

/// Gather the Numerical columns of `table`, in column order. Empty values
/// become zero.
fn numerical_columns<T>(table: &Matrix<String>, types: &[ColumnType]) -> Option<Matrix<T>>
where
    T: FromField + Clone + Default + Send + Sync,
{
    let selected: Vec<usize> = types
        .iter()
        .enumerate()
        .filter(|(_, t)| matches!(t, ColumnType::Numerical))
        .map(|(c, _)| c)
        .collect();
    if selected.is_empty() || table.rows() == 0 {
        return None;
    }

    let mut values: Vec<T> = vec![T::default(); table.rows() * selected.len()];
    values
        .par_chunks_mut(selected.len())
        .enumerate()
        .for_each(|(r, out_row)| {
            let source_row = table.row(r);
            for (out, &c) in out_row.iter_mut().zip(&selected) {
                let value = &source_row[c];
                if !value.is_empty() {
                    *out = T::from_field(value);
                }
            }
        });

    let column_header = selected
        .iter()
        .map(|&c| table.column_header[c].clone())
        .collect();
    Some(Matrix::new(values, column_header, table.row_header.clone()))
}

/// Mixed table: numerical columns plus cluster sets.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedData {
    /// Type of every column of the extracted table.
    pub column_types: Vec<ColumnType>,
    /// Names of all columns of the extracted table.
    pub column_header: Vec<String>,
    /// Sample names.
    pub row_header: Vec<String>,
    /// Numerical columns, if any.
    pub numeric: Option<NumericMatrix>,
    /// Categorical sets first, then unmatched color sets.
    pub clusters: Vec<ClusterSet>,
}

/// What a load produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedData {
    /// Whole table as numbers.
    Numeric(NumericMatrix),
    /// Classified table.
    Mixed(MixedData),
}

/// Result of loading one table.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutput {
    /// Dataset name, the input file stem.
    pub name: String,
    /// Corner label of the table, when it has one.
    pub corner_label: Option<String>,
    pub data: LoadedData,
}

impl LoadOutput {
    /// Numeric matrix of the output, whichever path produced it.
    pub fn numeric(&self) -> Option<&NumericMatrix> {
        match &self.data {
            LoadedData::Numeric(m) => Some(m),
            LoadedData::Mixed(mixed) => mixed.numeric.as_ref(),
        }
    }

    /// Cluster sets of the output (none for numeric loads).
    pub fn clusters(&self) -> &[ClusterSet] {
        match &self.data {
            LoadedData::Numeric(_) => &[],
            LoadedData::Mixed(mixed) => &mixed.clusters,
        }
    }
}
