mod error;
mod util;

pub mod convert;
pub mod model;
pub mod models;
pub mod problem;
pub mod sheet;
pub mod solve;
pub mod solver;
pub mod table;

pub use crate::convert::{convert_1d, convert_1d_strict, convert_2d, ParameterMap};
pub use crate::error::{ShapeError, TabLpError};
pub use crate::model::{AbstractModel, Index, Instance};
pub use crate::problem::{
    Bound, Constraint, ConstraintOp, LinearExpr, Problem, Sense, Variable, VariableId,
};
pub use crate::sheet::Workbook;
pub use crate::solve::{solve, SolutionColumn, SolutionFrame, Solved};
pub use crate::solver::{
    MicrolpSolver, Solution, Solver, SolverResult, TabLpResult, TerminationStatus,
};
pub use crate::table::Table;
