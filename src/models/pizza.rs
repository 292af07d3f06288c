use super::{check_len, col_labels, one};
use crate::convert::{convert_1d, convert_2d};
use crate::error::TabLpError;
use crate::model::AbstractModel;
use crate::problem::{Bound, LinearExpr, Sense};
use crate::sheet::Workbook;
use crate::solve::Solved;
use crate::table::Table;

pub fn build(workbook: &Workbook) -> Result<AbstractModel, TabLpError> {
    let profit = workbook.sheet("profit")?;
    let usage = workbook.sheet("usage")?;
    let available = workbook.sheet("available")?;

    let (ingredients, pizzas) = (usage.nrows(), usage.ncols());
    check_len("profit", profit, pizzas)?;
    check_len("available", available, ingredients)?;

    //max sum(j) profit[j] x[j] s.t. sum(j) usage[i, j] x[j] <= available[i], x >= 0
    let mut model = AbstractModel::new("pizza", Sense::Maximize);

    model.add_set("pizzas", pizzas)?;
    model.add_set("ingredients", ingredients)?;

    model.add_param("profit", &["pizzas"], convert_1d(profit)?)?;
    model.add_param("usage", &["ingredients", "pizzas"], convert_2d(usage)?)?;
    model.add_param("available", &["ingredients"], convert_1d(available)?)?;

    model.add_var("x", &["pizzas"], Bound::Lower(0.))?;

    model.set_objective(|inst| {
        let mut expr = LinearExpr::new();
        for j in inst.set("pizzas")? {
            expr.add(inst.var("x", j)?, inst.param("profit", j)?);
        }
        Ok(expr)
    });

    model.add_constraint("ingredient_limit", &["ingredients"], |inst, index| {
        let i = one(index)?;
        let mut expr = LinearExpr::new();
        for j in inst.set("pizzas")? {
            expr.add(inst.var("x", j)?, inst.param("usage", (i, j))?);
        }
        Ok(Some(expr.lte(inst.param("available", i)?)))
    })?;

    Ok(model)
}

pub fn bake_plan(solved: &Solved, workbook: &Workbook) -> Result<Table, TabLpError> {
    let pizzas = col_labels(workbook.sheet("usage")?, "usage")?;
    let quantity = vec!["quantity".to_string()];
    let values = solved.var_values("x")?;
    Ok(Table::from_flat(pizzas, quantity, values)?)
}
