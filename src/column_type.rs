use std::fmt;

/// Data type decided for one logical column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    /// Not classified yet.
    #[default]
    Unknown,
    /// Every non-empty value parses fully as a number.
    Numerical,
    /// Free-form values, grouped into clusters by distinct value.
    Categorical,
    /// Every non-empty value is a color specification.
    Color,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Unknown => write!(f, "Unknown"),
            ColumnType::Numerical => write!(f, "Numerical"),
            ColumnType::Categorical => write!(f, "Categorical"),
            ColumnType::Color => write!(f, "Color"),
        }
    }
}

impl ColumnType {
    /// Returns true if the column is partitioned into clusters.
    #[inline]
    pub fn is_clustered(&self) -> bool {
        match self {
            ColumnType::Categorical | ColumnType::Color => true,
            ColumnType::Unknown | ColumnType::Numerical => false,
        }
    }

    /// Decide the tag from the two scan flags of the classifier.
    ///
    /// Numerical wins over Color when both flags survived the scan.
    pub const fn from_flags(is_numerical: bool, is_color: bool) -> Self {
        match (is_numerical, is_color) {
            (true, _) => ColumnType::Numerical,
            (false, true) => ColumnType::Color,
            (false, false) => ColumnType::Categorical,
        }
    }
}
