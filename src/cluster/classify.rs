//! Per-column type classification.

use rayon::prelude::*;

use super::color::is_color;
use crate::column_type::ColumnType;
use crate::matrix::Matrix;
use crate::options::SourceType;
use crate::parse::field::is_number;

/// How columns are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifyMode {
    /// Numerical, then Color, then Categorical.
    #[default]
    Autodetect,
    /// Numbers are not recognised: Color or Categorical only.
    ForceCategorical,
}

impl ClassifyMode {
    /// Mode used for a source type; numerical sources are not classified.
    pub fn for_source(source_type: SourceType) -> Option<Self> {
        match source_type {
            SourceType::Mixed => Some(ClassifyMode::Autodetect),
            SourceType::Categorical => Some(ClassifyMode::ForceCategorical),
            SourceType::Numerical => None,
        }
    }
}

/// Classify one column from its values.
///
/// Empty values never falsify a flag, so a column without any value is
/// Numerical under [`ClassifyMode::Autodetect`] (and Color under
/// [`ClassifyMode::ForceCategorical`]). The scan stops once nothing but
/// Categorical is possible.
pub fn classify_column<'a, I>(values: I, mode: ClassifyMode) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut numerical = match mode {
        ClassifyMode::Autodetect => true,
        ClassifyMode::ForceCategorical => false,
    };
    let mut color = true;

    for value in values {
        if value.is_empty() {
            continue;
        }
        if numerical {
            numerical = is_number(value);
        }
        if color {
            color = is_color(value);
        }
        if !numerical && !color {
            break;
        }
    }

    ColumnType::from_flags(numerical, color)
}

/// Classify every column of a string table; columns are scanned in parallel.
pub fn classify_columns(table: &Matrix<String>, mode: ClassifyMode) -> Vec<ColumnType> {
    let rows = table.rows();
    let columns = table.columns();
    (0..columns)
        .into_par_iter()
        .with_max_len(1)
        .map(|c| {
            classify_column(
                (0..rows).map(|r| table.values[r * columns + c].as_str()),
                mode,
            )
        })
        .collect()
}
