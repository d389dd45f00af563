//! Write loaded tables back out as delimited text.

use std::fmt::Display;
use std::io::Write;

use csv::WriterBuilder;

use crate::cluster::builder::ClusterSet;
use crate::cluster::color::to_hex;
use crate::dataset::NumericMatrix;
use crate::error::Result;
use crate::matrix::Matrix;

/// Header of the cluster membership table.
pub const CLUSTER_COLUMNS: [&str; 4] = ["set", "cluster", "color", "sample"];

/// Write `matrix` with its column header as first record and its row
/// labels as first field.
pub fn write_matrix<W, T>(writer: W, matrix: &Matrix<T>, corner: &str, separator: u8) -> Result<()>
where
    W: Write,
    T: Display,
{
    let mut wtr = WriterBuilder::new().delimiter(separator).from_writer(writer);

    wtr.write_record(std::iter::once(corner).chain(matrix.column_header.iter().map(String::as_str)))?;
    for (r, label) in matrix.row_header.iter().enumerate() {
        let mut record = Vec::with_capacity(matrix.columns() + 1);
        record.push(label.clone());
        record.extend(matrix.row(r).iter().map(ToString::to_string));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a numeric matrix in whichever storage type it holds.
pub fn write_numeric<W: Write>(
    writer: W,
    matrix: &NumericMatrix,
    corner: &str,
    separator: u8,
) -> Result<()> {
    match matrix {
        NumericMatrix::Float32(m) => write_matrix(writer, m, corner, separator),
        NumericMatrix::BFloat16(m) => write_matrix(writer, m, corner, separator),
    }
}

/// Write cluster membership in long form: one record per clustered sample.
///
/// Samples are named through `row_header`; indices past its end are written
/// as numbers.
pub fn write_clusters<W: Write>(
    writer: W,
    sets: &[ClusterSet],
    row_header: &[String],
    separator: u8,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(separator).from_writer(writer);
    wtr.write_record(CLUSTER_COLUMNS)?;

    for set in sets {
        for cluster in &set.clusters {
            let color = to_hex(cluster.color);
            for &index in &cluster.indices {
                let sample = row_header
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| index.to_string());
                wtr.write_record([set.name.as_str(), &cluster.name, &color, &sample])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
