use crate::solver::TerminationStatus;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ShapeError(String);

impl ShapeError {
    pub fn new(msg: String) -> Self {
        Self(msg)
    }
}

#[derive(Error, Debug)]
pub enum TabLpError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("workbook has no sheet named {0}")]
    MissingSheet(String),

    #[error("{0}")]
    Model(String),

    #[error("solver error: {0}")]
    Solver(String),

    #[error("no optimal solution available, termination status: {0}")]
    NotOptimal(TerminationStatus),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TabLpError {
    pub fn model(msg: String) -> Self {
        Self::Model(msg)
    }
}
