//! Main loader builder and load methods.
//!
//! Wires the reader, the column classifier and the cluster builder into one
//! pipeline: read, extract, then either convert to numbers or classify and
//! cluster.

use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::cluster::builder::ClusterBuilder;
use crate::cluster::classify::{ClassifyMode, classify_columns};
use crate::column_type::ColumnType;
use crate::dataset::{LoadOutput, LoadedData, MixedData, NumericMatrix};
use crate::error::Result;
use crate::matrix::{BFloat16, Matrix};
use crate::options::{DEFAULT_SEPARATOR, SourceType, StorageType, separator_for_path};
use crate::parse::field::FromField;
use crate::parse::reader::TableReader;

/// Name of datasets loaded from memory.
pub const BYTES_DATASET_NAME: &str = "data";

/// Loads delimited text tables.
///
/// # Example
///
/// ```no_run
/// use csv_clusters::{CsvLoader, SourceType};
///
/// let mut loader = CsvLoader::new();
/// loader.row_header(true).source_type(SourceType::Mixed);
///
/// if let Some(output) = loader.load_path("iris.csv").unwrap() {
///     for set in output.clusters() {
///         println!("{}: {} clusters", set.name, set.len());
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CsvLoader {
    /// Field separator.
    separator: u8,
    /// First line holds column labels.
    column_header: bool,
    /// First field of every line holds the row label.
    row_header: bool,
    /// Swap rows and columns on extraction.
    transposed: bool,
    source_type: SourceType,
    storage_type: StorageType,
    /// Sample order of an existing dataset to align to.
    parent_labels: Vec<String>,
    /// Dimensions to keep, in order.
    dimension_labels: Vec<String>,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    /// Create a loader for comma separated tables with a column header.
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            column_header: true,
            row_header: false,
            transposed: false,
            source_type: SourceType::default(),
            storage_type: StorageType::default(),
            parent_labels: Vec::new(),
            dimension_labels: Vec::new(),
        }
    }

    /// Set the field separator.
    pub fn separator(&mut self, separator: u8) -> &mut Self {
        self.separator = separator;
        self
    }

    /// Set whether the first line holds column labels.
    pub fn column_header(&mut self, column_header: bool) -> &mut Self {
        self.column_header = column_header;
        self
    }

    /// Set whether the first field of every line holds the row label.
    pub fn row_header(&mut self, row_header: bool) -> &mut Self {
        self.row_header = row_header;
        self
    }

    /// Swap rows and columns of the loaded table.
    pub fn transposed(&mut self, transposed: bool) -> &mut Self {
        self.transposed = transposed;
        self
    }

    /// Set how values are interpreted.
    pub fn source_type(&mut self, source_type: SourceType) -> &mut Self {
        self.source_type = source_type;
        self
    }

    /// Set the element type of numeric output.
    pub fn storage_type(&mut self, storage_type: StorageType) -> &mut Self {
        self.storage_type = storage_type;
        self
    }

    /// Align the sample axis to the labels of an existing dataset.
    pub fn parent_labels(&mut self, labels: Vec<String>) -> &mut Self {
        self.parent_labels = labels;
        self
    }

    /// Load only these dimensions, in this order.
    pub fn dimension_labels(&mut self, labels: Vec<String>) -> &mut Self {
        self.dimension_labels = labels;
        self
    }

    /// Load the table stored at `path`.
    ///
    /// Returns `Ok(None)` when there is nothing to load: the file cannot be
    /// read, or the table has no rows or no columns.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Option<LoadOutput>> {
        let path = path.as_ref();
        let separator = separator_for_path(path, self.separator);
        let mut reader = self.reader(separator)?;
        reader.read(path);

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| BYTES_DATASET_NAME.to_string());
        self.finish(name, reader)
    }

    /// Load a table from memory.
    pub fn load_bytes(&self, data: &[u8]) -> Result<Option<LoadOutput>> {
        let mut reader = self.reader(self.separator)?;
        reader.read_bytes(data);
        self.finish(BYTES_DATASET_NAME.to_string(), reader)
    }

    fn reader(&self, separator: u8) -> Result<TableReader> {
        TableReader::new(separator, self.column_header, self.row_header)
    }

    fn finish(&self, name: String, mut reader: TableReader) -> Result<Option<LoadOutput>> {
        let start = Instant::now();
        let data = if self.source_type.is_classified() {
            self.load_mixed(&mut reader).map(LoadedData::Mixed)
        } else {
            self.load_numeric(&mut reader).map(LoadedData::Numeric)
        };
        let Some(data) = data else {
            info!("{name}: nothing to load");
            return Ok(None);
        };

        match &data {
            LoadedData::Numeric(m) => {
                info!("{name}: loaded {} x {} numeric values", m.rows(), m.columns());
            }
            LoadedData::Mixed(mixed) => info!(
                "{name}: loaded {} samples, {} numerical dimensions, {} cluster sets",
                mixed.row_header.len(),
                mixed.numeric.as_ref().map_or(0, NumericMatrix::columns),
                mixed.clusters.len()
            ),
        }
        debug!("{name}: extraction took {:?}", start.elapsed());

        Ok(Some(LoadOutput {
            name,
            corner_label: reader.corner_label().map(str::to_string),
            data,
        }))
    }

    fn extract<T>(&self, reader: &mut TableReader) -> Option<Matrix<T>>
    where
        T: FromField + Clone + Default + Send + Sync,
    {
        if self.parent_labels.is_empty() && self.dimension_labels.is_empty() {
            reader.extract_all(self.transposed)
        } else {
            reader.extract(self.transposed, &self.parent_labels, &self.dimension_labels)
        }
    }

    fn load_numeric(&self, reader: &mut TableReader) -> Option<NumericMatrix> {
        match self.storage_type {
            StorageType::Float32 => self.extract::<f32>(reader).map(NumericMatrix::Float32),
            StorageType::BFloat16 => self.extract::<BFloat16>(reader).map(NumericMatrix::BFloat16),
        }
    }

    fn load_mixed(&self, reader: &mut TableReader) -> Option<MixedData> {
        let mode = ClassifyMode::for_source(self.source_type).unwrap_or_default();
        let table: Matrix<String> = self.extract(reader)?;

        let column_types = classify_columns(&table, mode);
        debug!(
            "column types: {}",
            column_types
                .iter()
                .map(ColumnType::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let numeric = NumericMatrix::from_numerical_columns(&table, &column_types, self.storage_type);
        let clusters = ClusterBuilder::new(&table, &column_types).build();

        Some(MixedData {
            column_types,
            column_header: table.column_header,
            row_header: table.row_header,
            numeric,
            clusters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoaderError;

    #[test]
    fn test_default_loader() {
        let loader = CsvLoader::new();
        assert_eq!(loader.separator, b',');
        assert!(loader.column_header);
        assert!(!loader.row_header);
        assert!(!loader.transposed);
        assert_eq!(loader.source_type, SourceType::Mixed);
        assert_eq!(loader.storage_type, StorageType::Float32);
    }

    #[test]
    fn test_invalid_separator() {
        let mut loader = CsvLoader::new();
        loader.separator(b'"');
        assert!(matches!(
            loader.load_bytes(b"a\n1\n"),
            Err(LoaderError::InvalidConfig(_))
        ));

        loader.separator(0xA7);
        assert!(matches!(
            loader.load_bytes("x\u{a7}y\n1\u{a7}2\n".as_bytes()),
            Err(LoaderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_numerical_source_skips_classification() {
        let mut loader = CsvLoader::new();
        loader.source_type(SourceType::Numerical);
        let output = loader.load_bytes(b"x,g\n1,A\n").unwrap().unwrap();
        let LoadedData::Numeric(m) = &output.data else {
            panic!("expected numeric data");
        };
        // Text is read with prefix conversion, not clustered.
        assert_eq!(m.get_f32(0, 1), Some(0.0));
        assert!(output.clusters().is_empty());
    }

    #[test]
    fn test_numeric_load() {
        let mut loader = CsvLoader::new();
        loader.source_type(SourceType::Numerical).row_header(true);
        let output = loader
            .load_bytes(b"id,x,y\na,1,2\nb,3,1e40\n")
            .unwrap()
            .unwrap();

        assert_eq!(output.name, BYTES_DATASET_NAME);
        assert_eq!(output.corner_label.as_deref(), Some("id"));
        let LoadedData::Numeric(m) = &output.data else {
            panic!("expected numeric data");
        };
        assert_eq!(m.column_header(), &["x".to_string(), "y".to_string()]);
        assert_eq!(m.row_header(), &["a".to_string(), "b".to_string()]);
        assert_eq!(m.get_f32(0, 1), Some(2.0));
        assert_eq!(m.get_f32(1, 1), Some(f32::MAX));
    }

    #[test]
    fn test_mixed_load() {
        let loader = CsvLoader::new();
        let output = loader
            .load_bytes(b"id,color,group\n1,red,A\n2,red,A\n3,blue,B\n")
            .unwrap()
            .unwrap();
        let LoadedData::Mixed(mixed) = &output.data else {
            panic!("expected mixed data");
        };
        assert_eq!(
            mixed.column_types,
            vec![ColumnType::Numerical, ColumnType::Color, ColumnType::Categorical]
        );
        assert_eq!(mixed.numeric.as_ref().map(NumericMatrix::columns), Some(1));
        assert_eq!(mixed.clusters.len(), 1);
        assert_eq!(mixed.clusters[0].color_column, Some(1));
    }

    #[test]
    fn test_empty_input_is_nothing_to_load() {
        let loader = CsvLoader::new();
        assert!(loader.load_bytes(b"").unwrap().is_none());
        assert!(loader.load_bytes(b"a,b\n").unwrap().is_none());
    }
}
