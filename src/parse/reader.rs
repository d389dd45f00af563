//! Buffered table reading and label-indexed typed extraction.

use std::path::Path;

use log::{debug, warn};
use rayon::prelude::*;

use super::field::FromField;
use super::label_index::build_index;
use super::tokenizer::LineBuffer;
use crate::encoding::decode_text;
use crate::error::{LoaderError, Result};
use crate::matrix::Matrix;
use crate::options::validate_separator;

/// Prefix of synthesized column labels.
pub const COLUMN_LABEL_PREFIX: &str = "VAR";

/// Remove spaces, tabs and stray quotes around a header label.
fn trim_label(label: &str) -> String {
    label
        .trim_matches(|c| matches!(c, ' ' | '\t' | '"'))
        .to_string()
}

fn numbered_labels(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}")).collect()
}

/// Reads a delimited text table into per-line buffers.
///
/// Rows are split on demand only; header labels are derived on read.
/// Invariants after [`read`](Self::read): `column_header().len() ==
/// num_columns()` and `row_header().len() == num_rows()`.
#[derive(Debug)]
pub struct TableReader {
    separator: u8,
    with_column_header: bool,
    with_row_header: bool,
    rows: Vec<LineBuffer>,
    corner_label: Option<String>,
    column_header: Vec<String>,
    row_header: Vec<String>,
    columns: usize,
    corner_corrected: bool,
}

impl TableReader {
    /// Create a reader; nothing is read until [`read`](Self::read).
    ///
    /// Fails for separators that cannot split a line, see
    /// [`validate_separator`].
    pub fn new(separator: u8, with_column_header: bool, with_row_header: bool) -> Result<Self> {
        if let Some(problem) = validate_separator(separator) {
            return Err(LoaderError::InvalidConfig(problem));
        }
        Ok(Self {
            separator,
            with_column_header,
            with_row_header,
            rows: Vec::new(),
            corner_label: None,
            column_header: Vec::new(),
            row_header: Vec::new(),
            columns: 0,
            corner_corrected: false,
        })
    }

    /// Field separator.
    #[inline]
    pub fn separator(&self) -> u8 {
        self.separator
    }

    /// Whether the first line holds column labels.
    #[inline]
    pub fn has_column_header(&self) -> bool {
        self.with_column_header
    }

    /// Whether the first field of every row is its label.
    #[inline]
    pub fn has_row_header(&self) -> bool {
        self.with_row_header
    }

    /// Number of data rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of data columns (row labels excluded).
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns
    }

    /// Label naming the row-header axis, if the file has one.
    pub fn corner_label(&self) -> Option<&str> {
        self.corner_label.as_deref()
    }

    /// Column labels.
    pub fn column_header(&self) -> &[String] {
        &self.column_header
    }

    /// Row labels.
    pub fn row_header(&self) -> &[String] {
        &self.row_header
    }

    /// Buffered data line `index`.
    pub fn line(&self, index: usize) -> Option<&LineBuffer> {
        self.rows.get(index)
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.corner_label = None;
        self.column_header.clear();
        self.row_header.clear();
        self.columns = 0;
        self.corner_corrected = false;
    }

    /// Read the file at `path`.
    ///
    /// A file that cannot be read leaves the reader empty (zero rows and
    /// columns); this is not an error.
    pub fn read<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(data) => self.read_bytes(&data),
            Err(e) => {
                warn!("cannot read {}: {e}", path.display());
                self.clear();
            }
        }
    }

    /// Read a table from raw bytes in any supported text encoding.
    pub fn read_bytes(&mut self, data: &[u8]) {
        let (text, transcoded) = decode_text(data);
        if transcoded {
            debug!("input was transcoded to UTF-8");
        }
        self.read_text(&text);
    }

    /// Read a table from text.
    pub fn read_text(&mut self, text: &str) {
        self.clear();

        let mut lines = text.lines();
        let Some(first) = lines.next() else {
            debug!("empty input, nothing read");
            return;
        };

        let header_line = LineBuffer::new(first);
        let header_fields = header_line.tokenize(self.separator).len();
        let offset = usize::from(self.with_row_header);
        self.columns = header_fields - offset;

        if self.with_column_header {
            if self.with_row_header {
                self.corner_label = Some(header_line.get(0).unwrap_or_default().to_string());
            }
            self.column_header = (0..self.columns)
                .map(|c| trim_label(header_line.get(c + offset).unwrap_or_default()))
                .collect();
        } else {
            self.column_header = numbered_labels(COLUMN_LABEL_PREFIX, self.columns);
        }

        self.rows
            .reserve(bytecount::count(text.as_bytes(), b'\n') + 1);
        if !self.with_column_header {
            // The first line was data after all.
            self.rows.push(header_line);
        }
        self.rows.extend(
            lines
                .filter(|line| !line.is_empty())
                .map(LineBuffer::new),
        );

        if self.with_column_header && self.with_row_header {
            if let Some(first_row) = self.rows.first() {
                let width = first_row.tokenize(self.separator).len();
                if width == self.columns + 2 {
                    self.apply_missing_corner();
                }
            }
        }

        if self.with_row_header {
            let separator = self.separator;
            self.row_header = self
                .rows
                .par_iter()
                .with_max_len(1)
                .map(|row| {
                    row.tokenize(separator);
                    row.get(0).unwrap_or_default().to_string()
                })
                .collect();
        } else {
            self.row_header = numbered_labels("", self.rows.len());
        }

        debug!(
            "read {} rows x {} columns (column header: {}, row header: {})",
            self.rows.len(),
            self.columns,
            self.with_column_header,
            self.with_row_header
        );
    }

    /// The header line lacked the corner cell: its first field names the
    /// first data column instead of the row-header axis.
    fn apply_missing_corner(&mut self) {
        debug!("header row is one field short, treating corner label as omitted");
        let first_column = self.corner_label.take().unwrap_or_default();
        self.column_header.insert(0, trim_label(&first_column));
        self.columns += 1;
        self.corner_corrected = true;
    }

    /// Extract the whole table with identity row and column mapping.
    ///
    /// Every row is tokenized first. If the widest row shows that the header
    /// row omitted its corner cell and [`read`](Self::read) did not catch it,
    /// the column header is corrected here.
    pub fn extract_all<T>(&mut self, transposed: bool) -> Option<Matrix<T>>
    where
        T: FromField + Clone + Default + Send + Sync,
    {
        if self.rows.is_empty() || self.columns == 0 {
            return None;
        }

        let separator = self.separator;
        let widest = self
            .rows
            .par_iter()
            .map(|row| row.tokenize(separator).len())
            .max()
            .unwrap_or(0);
        if !self.corner_corrected
            && self.with_column_header
            && self.with_row_header
            && widest == self.columns + 2
        {
            self.apply_missing_corner();
        }

        let target_row = (0..self.rows.len()).map(Some).collect::<Vec<_>>();
        let target_column = (0..self.columns).map(Some).collect::<Vec<_>>();
        self.fill(
            &target_row,
            &target_column,
            self.column_header.clone(),
            self.row_header.clone(),
            transposed,
        )
    }

    /// Extract typed values, aligned to external label orders.
    ///
    /// `parent_labels` re-orders the sample axis: the column axis when
    /// `transposed` (requires a column header), the row axis otherwise
    /// (requires a row header). Unmatched source rows/columns are dropped and
    /// unmatched labels leave zero-valued holes. `dimension_labels` selects
    /// and orders the columns of an untransposed table with a column header.
    ///
    /// Returns `None` when the result would have no rows or no columns.
    pub fn extract<T>(
        &self,
        transposed: bool,
        parent_labels: &[String],
        dimension_labels: &[String],
    ) -> Option<Matrix<T>>
    where
        T: FromField + Clone + Default + Send + Sync,
    {
        if self.rows.is_empty() || self.columns == 0 {
            return None;
        }

        let mut target_row: Vec<Option<usize>> = (0..self.rows.len()).map(Some).collect();
        let mut target_column: Vec<Option<usize>> = (0..self.columns).map(Some).collect();
        let mut column_header = self.column_header.clone();
        let mut row_header = self.row_header.clone();

        if !parent_labels.is_empty() {
            if transposed && self.with_column_header {
                target_column = build_index(&self.column_header, parent_labels);
                column_header = parent_labels.to_vec();
            } else if !transposed && self.with_row_header {
                target_row = build_index(&self.row_header, parent_labels);
                row_header = parent_labels.to_vec();
            } else {
                warn!("parent labels ignored: the sample axis of this table has no labels");
            }
        }

        if !dimension_labels.is_empty() && !transposed && self.with_column_header {
            target_column = build_index(&self.column_header, dimension_labels);
            column_header = dimension_labels.to_vec();
        }

        self.fill(
            &target_row,
            &target_column,
            column_header,
            row_header,
            transposed,
        )
    }

    fn fill<T>(
        &self,
        target_row: &[Option<usize>],
        target_column: &[Option<usize>],
        column_header: Vec<String>,
        row_header: Vec<String>,
        transposed: bool,
    ) -> Option<Matrix<T>>
    where
        T: FromField + Clone + Default + Send + Sync,
    {
        let out_columns = column_header.len();
        let out_rows = row_header.len();
        if out_columns == 0 || out_rows == 0 {
            debug!("nothing to extract ({out_rows} rows x {out_columns} columns)");
            return None;
        }

        // Each output row is owned by one source row so workers write
        // disjoint memory; duplicates lose to the first source row.
        let mut source_of_row: Vec<Option<usize>> = vec![None; out_rows];
        for (source, target) in target_row.iter().enumerate() {
            if let Some(t) = *target
                && t < out_rows
                && source_of_row[t].is_none()
            {
                source_of_row[t] = Some(source);
            }
        }

        let mut claimed = vec![false; out_columns];
        let column_map: Vec<(usize, usize)> = target_column
            .iter()
            .enumerate()
            .filter_map(|(source, target)| {
                let t = (*target)?;
                if t < out_columns && !claimed[t] {
                    claimed[t] = true;
                    Some((source, t))
                } else {
                    None
                }
            })
            .collect();

        let offset = usize::from(self.with_row_header);
        let separator = self.separator;

        let mut values: Vec<T> = (0..out_rows * out_columns)
            .into_par_iter()
            .map(|_| T::default())
            .collect();

        values
            .par_chunks_mut(out_columns)
            .zip(source_of_row.par_iter())
            .with_max_len(1)
            .for_each(|(out_row, source)| {
                let Some(source) = *source else { return };
                let line = &self.rows[source];
                line.tokenize(separator);
                for &(s, t) in &column_map {
                    line.get_as(s + offset, &mut out_row[t]);
                }
            });

        let matrix = Matrix::new(values, column_header, row_header);
        Some(if transposed {
            matrix.transposed()
        } else {
            matrix
        })
    }
}
