use crate::error::TabLpError;
use crate::table::Table;

use nom::bytes::complete::is_not;
use nom::character::complete::{char, space0};
use nom::combinator::{all_consuming, map};
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::{delimited, tuple};
use nom::IResult;

use log::{debug, error};

use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<(String, Table)>,
}

impl Workbook {
    //a sheet is a [name] line, a header line (index name, then column labels) and one
    //labeled line per row; blank lines and # comments are skipped
    pub fn parse(text: &str) -> Result<Self, TabLpError> {
        let mut workbook = Workbook::default();
        let mut current: Option<SheetBuilder> = None;

        for (line_no, line) in text.lines().enumerate().map(|(i, line)| (i + 1, line.trim())) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                let (_, name) = parse_sheet_name(line)
                    .map_err(|_| parse_error(line_no, "malformed sheet name"))?;

                if name.is_empty() {
                    return Err(parse_error(line_no, "empty sheet name"));
                }

                if let Some(sheet) = current.take() {
                    workbook.push(sheet.finish()?)?;
                }

                current = Some(SheetBuilder::new(name, line_no));
                continue;
            }

            let sheet = current
                .as_mut()
                .ok_or_else(|| parse_error(line_no, "data found before the first sheet"))?;

            let (_, cells) =
                parse_cells(line).map_err(|_| parse_error(line_no, "malformed or empty cell"))?;

            sheet.push_line(line_no, cells)?;
        }

        if let Some(sheet) = current.take() {
            workbook.push(sheet.finish()?)?;
        }

        debug!("parsed workbook with {} sheets", workbook.sheets.len());

        Ok(workbook)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TabLpError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!("reading workbook {}", path.as_ref().display());
        Self::parse(&text)
    }

    pub fn sheet(&self, name: &str) -> Result<&Table, TabLpError> {
        self.sheets
            .iter()
            .find(|(sheet_name, _table)| sheet_name == name)
            .map(|(_name, table)| table)
            .ok_or_else(|| TabLpError::MissingSheet(name.to_string()))
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(name, _table)| name.as_str())
    }

    fn push(&mut self, (name, line, table): (String, usize, Table)) -> Result<(), TabLpError> {
        if self.sheets.iter().any(|(sheet_name, _table)| *sheet_name == name) {
            error!("sheet {} is defined more than once", name);
            return Err(parse_error(line, &format!("duplicate sheet {}", name)));
        }

        self.sheets.push((name, table));
        Ok(())
    }
}

impl std::convert::TryFrom<&str> for Workbook {
    type Error = TabLpError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}

struct SheetBuilder {
    name: String,
    line: usize,
    col_labels: Option<Vec<String>>,
    row_labels: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl SheetBuilder {
    fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            line,
            col_labels: None,
            row_labels: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn push_line(&mut self, line_no: usize, cells: Vec<&str>) -> Result<(), TabLpError> {
        if self.col_labels.is_none() {
            if cells.len() < 2 {
                return Err(parse_error(
                    line_no,
                    "a sheet header needs an index name and at least one column",
                ));
            }

            self.col_labels = Some(cells[1..].iter().map(|s| s.to_string()).collect());
            return Ok(());
        }

        let ncols = self.col_labels.as_ref().map_or(0, Vec::len);

        if cells.len() != ncols + 1 {
            return Err(parse_error(
                line_no,
                &format!(
                    "expected a label and {} values, found {} cells",
                    ncols,
                    cells.len()
                ),
            ));
        }

        let mut row = Vec::with_capacity(ncols);

        for &cell in &cells[1..] {
            match all_consuming(double::<&str, nom::error::Error<&str>>)(cell) {
                Ok((_, value)) if value.is_finite() => row.push(value),
                _ => {
                    return Err(parse_error(
                        line_no,
                        &format!("{} is not a finite number", cell),
                    ))
                }
            }
        }

        self.row_labels.push(cells[0].to_string());
        self.rows.push(row);
        Ok(())
    }

    fn finish(self) -> Result<(String, usize, Table), TabLpError> {
        let SheetBuilder {
            name,
            line,
            col_labels,
            row_labels,
            rows,
        } = self;

        let col_labels = match col_labels {
            Some(col_labels) => col_labels,
            None => return Err(parse_error(line, &format!("sheet {} has no header", name))),
        };

        if rows.is_empty() {
            return Err(parse_error(line, &format!("sheet {} has no rows", name)));
        }

        let table = Table::from_rows(row_labels, col_labels, &rows)?;
        Ok((name, line, table))
    }
}

fn parse_error(line: usize, msg: &str) -> TabLpError {
    TabLpError::Parse {
        line,
        msg: msg.to_string(),
    }
}

fn parse_sheet_name(i: &str) -> IResult<&str, &str> {
    all_consuming(delimited(
        tuple((char('['), space0)),
        map(is_not("]"), str::trim),
        tuple((char(']'), space0)),
    ))(i)
}

fn parse_cells(i: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char(','), map(is_not(","), str::trim)))(i)
}
