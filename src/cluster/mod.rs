//! Column classification and cluster construction for mixed tables.
//!
//! Columns are first tagged Numerical, Categorical or Color. Categorical and
//! Color columns are then partitioned by distinct value, each color column is
//! matched with the nearest categorical column whose groups it colors
//! exactly, and one cluster set is emitted per categorical column plus one
//! per color column left unmatched.

pub mod builder;
pub mod classify;
pub mod color;
pub mod partition;
