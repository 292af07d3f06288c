use super::{check_len, col_labels, one};
use crate::convert::{convert_1d, convert_2d};
use crate::error::TabLpError;
use crate::model::AbstractModel;
use crate::problem::{Bound, LinearExpr, Sense};
use crate::sheet::Workbook;
use crate::solve::Solved;
use crate::table::Table;

pub fn build(workbook: &Workbook) -> Result<AbstractModel, TabLpError> {
    let cost = workbook.sheet("cost")?;
    let capacity = workbook.sheet("capacity")?;
    let demand = workbook.sheet("demand")?;

    let (plants, markets) = (cost.nrows(), cost.ncols());
    check_len("capacity", capacity, plants)?;
    check_len("demand", demand, markets)?;

    //min sum(i, j) cost[i, j] x[i, j]
    //s.t. sum(j) x[i, j] <= capacity[i], sum(i) x[i, j] >= demand[j], x >= 0
    let mut model = AbstractModel::new("transportation", Sense::Minimize);

    model.add_set("plants", plants)?;
    model.add_set("markets", markets)?;

    model.add_param("cost", &["plants", "markets"], convert_2d(cost)?)?;
    model.add_param("capacity", &["plants"], convert_1d(capacity)?)?;
    model.add_param("demand", &["markets"], convert_1d(demand)?)?;

    model.add_var("x", &["plants", "markets"], Bound::Lower(0.))?;

    model.set_objective(|inst| {
        let mut expr = LinearExpr::new();
        for i in inst.set("plants")? {
            for j in inst.set("markets")? {
                expr.add(inst.var("x", (i, j))?, inst.param("cost", (i, j))?);
            }
        }
        Ok(expr)
    });

    model.add_constraint("supply", &["plants"], |inst, index| {
        let i = one(index)?;
        let mut expr = LinearExpr::new();
        for j in inst.set("markets")? {
            expr.add(inst.var("x", (i, j))?, 1.);
        }
        Ok(Some(expr.lte(inst.param("capacity", i)?)))
    })?;

    model.add_constraint("demand_met", &["markets"], |inst, index| {
        let j = one(index)?;
        let mut expr = LinearExpr::new();
        for i in inst.set("plants")? {
            expr.add(inst.var("x", (i, j))?, 1.);
        }
        Ok(Some(expr.gte(inst.param("demand", j)?)))
    })?;

    Ok(model)
}

/// Shipments as a plants x markets table, labeled like the `cost` sheet.
pub fn shipments(solved: &Solved, workbook: &Workbook) -> Result<Table, TabLpError> {
    let cost = workbook.sheet("cost")?;
    solved.var_table("x", cost.row_labels(), &col_labels(cost, "cost")?)
}
