use crate::error::ShapeError;
use crate::table::Table;

use std::collections::HashMap;

pub type ParameterMap<K> = HashMap<K, f64>;

/// Converts a table with at most one axis longer than one into `{1: v_1, ..., n: v_n}`.
/// A single value converts to `{1: value}` and a table with a zero-length axis to `{}`.
pub fn convert_1d(table: &Table) -> Result<ParameterMap<usize>, ShapeError> {
    let shape = table.shape();

    if shape.iter().filter(|&&len| len > 1).count() > 1 {
        return Err(ShapeError::new(format!(
            "expected at most one axis longer than one, got shape {:?}",
            shape
        )));
    }

    //column-major storage order is the axis order here
    Ok(table
        .values()
        .iter()
        .enumerate()
        .map(|(i, &value)| (i + 1, value))
        .collect())
}

/// Like [`convert_1d`], but only accepts tables that have exactly one axis.
pub fn convert_1d_strict(table: &Table) -> Result<ParameterMap<usize>, ShapeError> {
    if table.rank() != 1 {
        return Err(ShapeError::new(format!(
            "expected one axis, got shape {:?}",
            table.shape()
        )));
    }

    convert_1d(table)
}

pub fn convert_2d(table: &Table) -> Result<ParameterMap<(usize, usize)>, ShapeError> {
    if table.rank() != 2 {
        return Err(ShapeError::new(format!(
            "expected two axes, got shape {:?}",
            table.shape()
        )));
    }

    let values = table.values();
    let mut params = HashMap::with_capacity(values.len());

    for i in 0..values.nrows() {
        for j in 0..values.ncols() {
            params.insert((i + 1, j + 1), values[(i, j)]);
        }
    }

    Ok(params)
}
