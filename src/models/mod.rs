pub mod pizza;
pub mod transportation;

use crate::error::TabLpError;
use crate::model::Index;
use crate::table::Table;

fn one(index: Index) -> Result<usize, TabLpError> {
    match index {
        Index::One(i) => Ok(i),
        other => Err(TabLpError::model(format!(
            "expected a single index, got ({})",
            other
        ))),
    }
}

fn col_labels(table: &Table, sheet: &str) -> Result<Vec<String>, TabLpError> {
    table
        .col_labels()
        .map(<[String]>::to_vec)
        .ok_or_else(|| TabLpError::model(format!("sheet {} needs column labels", sheet)))
}

fn check_len(sheet: &str, table: &Table, expected: usize) -> Result<(), TabLpError> {
    if table.len() != expected {
        return Err(TabLpError::model(format!(
            "sheet {} has {} values, expected {}",
            sheet,
            table.len(),
            expected
        )));
    }

    Ok(())
}
