use crate::error::{ShapeError, TabLpError};
use crate::model::{AbstractModel, Index, Instance};
use crate::solver::{Solution, Solver, SolverResult, TerminationStatus};
use crate::table::Table;

use log::{info, warn};

/// A solve that terminates without an optimal point is not an error here; check
/// [`Solved::status`] before reading values.
pub fn solve<S: Solver + ?Sized>(model: &AbstractModel, solver: &S) -> Result<Solved, TabLpError> {
    let instance = model.create_instance()?;
    let result = solver.solve(instance.problem())?;

    match &result {
        SolverResult::Optimal(sol) => info!(
            "{} solved by {}: optimal, objective {}",
            model.name(),
            solver.name(),
            sol.obj()
        ),
        other => warn!(
            "{} solved by {}: {}",
            model.name(),
            solver.name(),
            other.status()
        ),
    }

    Ok(Solved { instance, result })
}

#[derive(Debug, Clone)]
pub struct Solved {
    pub instance: Instance,
    pub result: SolverResult,
}

impl Solved {
    pub fn status(&self) -> TerminationStatus {
        self.result.status()
    }

    pub fn solution(&self) -> Result<&Solution, TabLpError> {
        self.result
            .solution()
            .ok_or_else(|| TabLpError::NotOptimal(self.status()))
    }

    pub fn objective(&self) -> Result<f64, TabLpError> {
        self.solution().map(Solution::obj)
    }

    pub fn var_values(&self, name: &str) -> Result<&[f64], TabLpError> {
        let range = self.instance.var_range(name)?;
        Ok(&self.solution()?.x()[range])
    }

    pub fn value<I: Into<Index>>(&self, name: &str, index: I) -> Result<f64, TabLpError> {
        let id: usize = self.instance.var(name, index)?.into();
        Ok(self.solution()?.x()[id])
    }

    pub fn frame(&self) -> Result<SolutionFrame, TabLpError> {
        let mut columns = Vec::new();

        for name in self.instance.var_names() {
            let indices = self.instance.var_indices(name)?;
            let values = self.var_values(name)?;
            columns.push(SolutionColumn {
                name: name.to_string(),
                entries: indices.into_iter().zip(values.iter().copied()).collect(),
            });
        }

        Ok(SolutionFrame {
            columns,
            row_labels: None,
        })
    }

    //cell (i, j) holds the value of the variable at index (i, j)
    pub fn var_table(
        &self,
        name: &str,
        row_labels: &[String],
        col_labels: &[String],
    ) -> Result<Table, TabLpError> {
        match *self.instance.var_dims(name)? {
            [m, n] if m == row_labels.len() && n == col_labels.len() => (),
            ref dims => {
                return Err(TabLpError::model(format!(
                    "cannot show {} (indexed over {:?}) as a {} x {} table",
                    name,
                    dims,
                    row_labels.len(),
                    col_labels.len()
                )))
            }
        }

        let table = Table::from_flat(
            row_labels.to_vec(),
            col_labels.to_vec(),
            self.var_values(name)?,
        )?;

        Ok(table)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolutionColumn {
    pub name: String,
    pub entries: Vec<(Index, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolutionFrame {
    pub columns: Vec<SolutionColumn>,
    row_labels: Option<Vec<String>>,
}

impl SolutionFrame {
    pub fn column(&self, name: &str) -> Option<&SolutionColumn> {
        self.columns.iter().find(|col| col.name == name)
    }

    //rows are positions within each column, so the longest column sets the row count
    pub fn nrows(&self) -> usize {
        self.columns
            .iter()
            .map(|col| col.entries.len())
            .max()
            .unwrap_or(0)
    }

    /// Replaces the positional row index with `labels`, one per row.
    pub fn with_index(mut self, labels: Vec<String>) -> Result<Self, ShapeError> {
        if labels.len() != self.nrows() {
            return Err(ShapeError::new(format!(
                "got {} labels for a frame with {} rows",
                labels.len(),
                self.nrows()
            )));
        }

        self.row_labels = Some(labels);
        Ok(self)
    }

    pub fn row_labels(&self) -> Option<&[String]> {
        self.row_labels.as_deref()
    }
}

impl std::fmt::Display for SolutionFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for column in &self.columns {
            writeln!(f, "{}", column.name)?;
            for (row, (index, value)) in column.entries.iter().enumerate() {
                match self.row_labels.as_ref().and_then(|labels| labels.get(row)) {
                    Some(label) => writeln!(f, "  {} {}", label, value)?,
                    None => writeln!(f, "  [{}] {}", index, value)?,
                }
            }
        }

        Ok(())
    }
}
