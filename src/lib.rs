//! csv-clusters: load delimited text tables as numeric matrices or clusters
//!
//! A table is read line by line, tokenized lazily and extracted into a dense
//! row-major buffer, optionally transposed and re-aligned to external sample
//! and dimension labels. Mixed tables are classified column by column: numeric
//! columns become a numeric matrix, categorical and color columns become
//! clusters of rows, colored by a matching color column when there is one.
//!
//! # Quick Start
//!
//! ```no_run
//! use csv_clusters::{CsvLoader, LoadedData};
//!
//! let loader = CsvLoader::new();
//!
//! match loader.load_path("iris.csv").unwrap() {
//!     Some(output) => match &output.data {
//!         LoadedData::Numeric(m) => println!("{} x {}", m.rows(), m.columns()),
//!         LoadedData::Mixed(mixed) => {
//!             for set in &mixed.clusters {
//!                 println!("{}: {} clusters", set.name, set.len());
//!             }
//!         }
//!     },
//!     None => println!("nothing to load"),
//! }
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! use csv_clusters::{CsvLoader, SourceType, StorageType};
//!
//! let mut loader = CsvLoader::new();
//! loader
//!     .separator(b';')
//!     .row_header(true)
//!     .transposed(true)
//!     .source_type(SourceType::Numerical)
//!     .storage_type(StorageType::BFloat16);
//! ```
//!
//! # Color matching
//!
//! A color column is attached to the nearest categorical column whose value
//! groups are exactly its own. The categorical clusters then take their
//! colors from it; other categorical columns get an evenly spaced palette.

pub mod cluster;
mod column_type;
mod dataset;
mod encoding;
mod error;
pub mod export;
mod loader;
mod matrix;
mod options;
pub mod parse;

pub use cluster::builder::{Cluster, ClusterBuilder, ClusterSet};
pub use cluster::classify::{ClassifyMode, classify_column, classify_columns};
pub use cluster::color::{Color, generate_palette, is_color, parse_color, to_hex};
pub use column_type::ColumnType;
pub use dataset::{LoadOutput, LoadedData, MixedData, NumericMatrix};
pub use error::{LoaderError, Result};
pub use loader::{BYTES_DATASET_NAME, CsvLoader};
pub use matrix::{BFloat16, Matrix};
pub use options::{DEFAULT_SEPARATOR, SourceType, StorageType};
pub use parse::reader::TableReader;

// Re-export for advanced usage
pub use encoding::{decode_text, is_utf8};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api() {
        let _loader = CsvLoader::new();
        let _reader = TableReader::new(b',', true, false).unwrap();
        let _source = SourceType::Categorical;
        let _storage = StorageType::BFloat16;
        let _type = ColumnType::Color;
    }

    #[test]
    fn test_load_simple_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6\n";
        let mut loader = CsvLoader::new();
        loader.source_type(SourceType::Numerical);

        let output = loader.load_bytes(data).unwrap().unwrap();
        let m = output.numeric().unwrap();

        assert_eq!(m.rows(), 2);
        assert_eq!(m.columns(), 3);
        assert_eq!(m.get_f32(1, 2), Some(6.0));
    }

    #[test]
    fn test_builder_pattern() {
        let mut loader = CsvLoader::new();
        loader
            .separator(b'\t')
            .column_header(false)
            .row_header(true)
            .transposed(true)
            .parent_labels(vec!["s1".into()])
            .dimension_labels(vec!["d1".into()]);

        // Verify builder returns &mut Self for chaining
    }
}
