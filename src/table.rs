use crate::error::ShapeError;

use nalgebra::{DMatrix, DVector};

/// Labeled numeric data with one or two axes. One-dimensional tables are stored as a
/// single column with no column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    row_labels: Vec<String>,
    col_labels: Option<Vec<String>>,
    values: DMatrix<f64>,
}

impl Table {
    pub fn new_1d(labels: Vec<String>, values: DVector<f64>) -> Result<Self, ShapeError> {
        if labels.len() != values.len() {
            return Err(ShapeError::new(format!(
                "got {} labels for {} values",
                labels.len(),
                values.len()
            )));
        }

        let n = values.len();

        Ok(Self {
            row_labels: labels,
            col_labels: None,
            values: DMatrix::from_column_slice(n, 1, values.as_slice()),
        })
    }

    pub fn new_2d(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        values: DMatrix<f64>,
    ) -> Result<Self, ShapeError> {
        if row_labels.len() != values.nrows() || col_labels.len() != values.ncols() {
            return Err(ShapeError::new(format!(
                "got {} x {} labels for a {} x {} table",
                row_labels.len(),
                col_labels.len(),
                values.nrows(),
                values.ncols()
            )));
        }

        Ok(Self {
            row_labels,
            col_labels: Some(col_labels),
            values,
        })
    }

    pub fn vector(values: &[f64]) -> Self {
        Self {
            row_labels: default_labels(values.len()),
            col_labels: None,
            values: DMatrix::from_column_slice(values.len(), 1, values),
        }
    }

    pub fn matrix(values: DMatrix<f64>) -> Self {
        Self {
            row_labels: default_labels(values.nrows()),
            col_labels: Some(default_labels(values.ncols())),
            values,
        }
    }

    pub fn from_rows(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        rows: &[Vec<f64>],
    ) -> Result<Self, ShapeError> {
        let ncols = col_labels.len();

        if let Some((i, row)) = rows.iter().enumerate().find(|(_i, row)| row.len() != ncols) {
            return Err(ShapeError::new(format!(
                "row {} has {} values, expected {}",
                i + 1,
                row.len(),
                ncols
            )));
        }

        let values = DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]);
        Self::new_2d(row_labels, col_labels, values)
    }

    //row-major: flat index (i - 1) * ncols + (j - 1) lands in 1-based cell (i, j)
    pub fn from_flat(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        flat: &[f64],
    ) -> Result<Self, ShapeError> {
        let (m, n) = (row_labels.len(), col_labels.len());

        if flat.len() != m * n {
            return Err(ShapeError::new(format!(
                "cannot reshape {} values into {} x {}",
                flat.len(),
                m,
                n
            )));
        }

        Self::new_2d(row_labels, col_labels, DMatrix::from_row_slice(m, n, flat))
    }

    pub fn rank(&self) -> usize {
        match self.col_labels {
            Some(_) => 2,
            None => 1,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self.col_labels {
            Some(_) => vec![self.values.nrows(), self.values.ncols()],
            None => vec![self.values.nrows()],
        }
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    //0-based
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> Option<&[String]> {
        self.col_labels.as_deref()
    }
}

fn default_labels(n: usize) -> Vec<String> {
    (1..=n).map(|i| i.to_string()).collect()
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let header: Vec<&str> = match &self.col_labels {
            Some(labels) => labels.iter().map(String::as_str).collect(),
            None => vec!["value"],
        };

        let cells: Vec<Vec<String>> = (0..self.nrows())
            .map(|i| {
                (0..self.ncols())
                    .map(|j| format!("{}", self.values[(i, j)]))
                    .collect()
            })
            .collect();

        let label_width = self.row_labels.iter().map(String::len).max().unwrap_or(0);

        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(j, label)| {
                cells
                    .iter()
                    .map(|row| row[j].len())
                    .chain(std::iter::once(label.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:width$}", "", width = label_width)?;
        for (label, width) in header.iter().zip(&widths) {
            write!(f, "  {:>width$}", label, width = width)?;
        }
        writeln!(f)?;

        for (label, row) in self.row_labels.iter().zip(&cells) {
            write!(f, "{:width$}", label, width = label_width)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", cell, width = width)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
