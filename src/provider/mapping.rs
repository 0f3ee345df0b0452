//! Turning result sets into values

use super::row::Row;
use crate::error::{EnvelopeError, EnvelopeResult};

/// Map every row; the first failure fails the whole set
pub fn map_to_list<T, F>(rows: &[Row], mapper: F) -> EnvelopeResult<Vec<T>>
where
    F: Fn(&Row) -> EnvelopeResult<T>,
{
    rows.iter().map(mapper).collect()
}

/// Map every row, dropping the ones the mapper rejects
pub fn map_to_list_lenient<T, F>(rows: &[Row], mapper: F) -> Vec<T>
where
    F: Fn(&Row) -> Option<T>,
{
    rows.iter().filter_map(mapper).collect()
}

/// Map a result expected to hold at most one row
///
/// An empty set yields `None`; more than one row is an error.
pub fn map_to_one<T, F>(rows: &[Row], mapper: F) -> EnvelopeResult<Option<T>>
where
    F: Fn(&Row) -> EnvelopeResult<T>,
{
    match rows {
        [] => Ok(None),
        [row] => mapper(row).map(Some),
        _ => Err(EnvelopeError::TooManyRows(rows.len())),
    }
}

/// Like [`map_to_one`], substituting `default` for an empty set
pub fn map_to_one_or_default<T, F>(rows: &[Row], mapper: F, default: T) -> EnvelopeResult<T>
where
    F: Fn(&Row) -> EnvelopeResult<T>,
{
    Ok(map_to_one(rows, mapper)?.unwrap_or(default))
}
