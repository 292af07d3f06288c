use crate::error::TabLpError;
use crate::util::EPS;

use std::collections::{HashMap, HashSet};

const LTE_STR: &str = "\u{2264}";
const EQ_STR: &str = "\u{003D}";
const GTE_STR: &str = "\u{2265}";
const INF_STR: &str = "\u{221E}";

#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub sense: Sense,
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
    var_names: HashSet<String>, //these strings are duplicated in the variables
}

impl Problem {
    pub fn new(sense: Sense) -> Self {
        Self {
            sense,
            ..Default::default()
        }
    }

    pub fn add_var(
        &mut self,
        obj_coeff: f64,
        bound: Bound,
        name: Option<String>,
    ) -> Result<VariableId, TabLpError> {
        if let Bound::TwoSided(lb, ub) = bound {
            if lb > ub {
                return Err(TabLpError::model(format!(
                    "invalid variable bounds: ({}, {})",
                    lb, ub
                )));
            }
        }

        let bound_valid = match bound {
            Bound::Free => true,
            Bound::Lower(lb) => lb.is_finite(),
            Bound::Upper(ub) => ub.is_finite(),
            Bound::TwoSided(lb, ub) => lb.is_finite() && ub.is_finite(),
            Bound::Fixed(fixed_val) => fixed_val.is_finite(),
        };

        if !bound_valid {
            return Err(TabLpError::model(format!("invalid bound: {:?}", bound)));
        }

        if !obj_coeff.is_finite() {
            return Err(TabLpError::model(format!(
                "invalid objective coefficient: {}",
                obj_coeff
            )));
        }

        if let Some(name) = &name {
            if !self.var_names.insert(name.clone()) {
                return Err(TabLpError::model(format!(
                    "variable names must be unique, {} was added twice",
                    name
                )));
            }
        }

        let id = VariableId(self.variables.len());
        self.variables.push(Variable::new(id, obj_coeff, bound, name));
        Ok(id)
    }

    pub fn add_constraint(
        &mut self,
        coeffs: Vec<(VariableId, f64)>,
        op: ConstraintOp,
        rhs: f64,
    ) -> Result<(), TabLpError> {
        self.push_constraint(Constraint { coeffs, op, rhs })
    }

    pub fn push_constraint(&mut self, constraint: Constraint) -> Result<(), TabLpError> {
        if let Some((invalid_var, _coeff)) = constraint
            .coeffs
            .iter()
            .find(|(id, _coeff)| id.0 >= self.variables.len())
        {
            return Err(TabLpError::model(format!("{:?} is invalid", invalid_var)));
        }

        if let Some((var, coeff)) = constraint
            .coeffs
            .iter()
            .find(|(_id, coeff)| !coeff.is_finite())
        {
            return Err(TabLpError::model(format!(
                "invalid constraint coefficient for {:?}: {}",
                var, coeff
            )));
        }

        if !constraint.rhs.is_finite() {
            return Err(TabLpError::model(format!(
                "invalid constraint right-hand side: {}",
                constraint.rhs
            )));
        }

        self.constraints.push(constraint);
        Ok(())
    }

    /// Adds `coeff` to the objective coefficient of `var`.
    pub fn add_obj_coeff(&mut self, var: VariableId, coeff: f64) -> Result<(), TabLpError> {
        if !coeff.is_finite() {
            return Err(TabLpError::model(format!(
                "invalid objective coefficient for {:?}: {}",
                var, coeff
            )));
        }

        match self.variables.get_mut(var.0) {
            Some(variable) => {
                variable.obj_coeff += coeff;
                Ok(())
            }

            None => Err(TabLpError::model(format!("{:?} is invalid", var))),
        }
    }

    pub fn vars(&self) -> &[Variable] {
        self.variables.as_slice()
    }

    pub fn constraints(&self) -> &[Constraint] {
        self.constraints.as_slice()
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(x)
            .map(|(var, val)| var.obj_coeff * val)
            .sum()
    }

    pub fn is_feasible(&self, x: &[f64]) -> bool {
        self.is_feasible_within(x, EPS)
    }

    pub fn is_feasible_within(&self, x: &[f64], tol: f64) -> bool {
        if x.len() != self.variables.len() {
            return false;
        }

        for (var, &val) in self.variables.iter().zip(x.iter()) {
            match var.bound {
                Bound::Free => (),

                Bound::Lower(lb) => {
                    if val < lb - tol {
                        return false;
                    }
                }
                Bound::Upper(ub) => {
                    if val > ub + tol {
                        return false;
                    }
                }

                Bound::TwoSided(lb, ub) => {
                    if val < lb - tol {
                        return false;
                    }

                    if val > ub + tol {
                        return false;
                    }
                }

                Bound::Fixed(fixed_val) => {
                    if (val - fixed_val).abs() > tol {
                        return false;
                    }
                }
            }
        }

        self.constraints
            .iter()
            .all(|constraint| constraint.is_feasible(x, tol))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl std::default::Default for Sense {
    fn default() -> Self {
        Sense::Minimize
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub id: VariableId,
    pub obj_coeff: f64,
    pub bound: Bound,
    pub name: Option<String>,
}

impl Variable {
    fn new(id: VariableId, obj_coeff: f64, bound: Bound, name: Option<String>) -> Self {
        Self {
            id,
            obj_coeff,
            bound,
            name,
        }
    }

    pub fn lower(&self) -> f64 {
        match self.bound {
            Bound::Lower(lb) | Bound::TwoSided(lb, _) | Bound::Fixed(lb) => lb,
            Bound::Free | Bound::Upper(_) => f64::NEG_INFINITY,
        }
    }

    pub fn upper(&self) -> f64 {
        match self.bound {
            Bound::Upper(ub) | Bound::TwoSided(_, ub) | Bound::Fixed(ub) => ub,
            Bound::Free | Bound::Lower(_) => f64::INFINITY,
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        //Problem add_var guarantees that different variables have different ids
        self.id == other.id
    }
}

impl Eq for Variable {}

impl std::hash::Hash for Variable {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Free,
    Lower(f64),
    Upper(f64),
    TwoSided(f64, f64),
    Fixed(f64),
}

impl Bound {
    fn display(&self, f: &mut std::fmt::Formatter, var: &Variable) -> std::fmt::Result {
        match self {
            Bound::Free => write!(f, "{} free", var),
            Bound::Lower(lb) => write!(f, "{} {gte} {}", var, lb, gte = GTE_STR),
            Bound::Upper(ub) => write!(f, "{} {lte} {}", var, ub, lte = LTE_STR),
            Bound::TwoSided(lb, ub) => {
                write!(f, "{} {lte} {} {lte} {}", lb, var, ub, lte = LTE_STR)
            }
            Bound::Fixed(val) => write!(f, "{} {eq} {}", var, val, eq = EQ_STR),
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Bound::Free => write!(f, "(-{inf}, {inf})", inf = INF_STR),
            Bound::Lower(lb) => write!(f, "[{}, {inf})", lb, inf = INF_STR),
            Bound::Upper(ub) => write!(f, "(-{inf}, {}]", ub, inf = INF_STR),
            Bound::TwoSided(lb, ub) => write!(f, "[{}, {}]", lb, ub),
            Bound::Fixed(val) => write!(f, "[{val}, {val}]", val = val),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub coeffs: Vec<(VariableId, f64)>,
    pub op: ConstraintOp,
    pub rhs: f64,
}

impl Constraint {
    pub fn new(expr: LinearExpr, op: ConstraintOp, rhs: f64) -> Self {
        Self {
            coeffs: expr.terms,
            op,
            rhs,
        }
    }

    //NaN if a coefficient refers to a variable outside of x
    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coeffs
            .iter()
            .map(|(var, coeff)| x.get(var.0).map_or(f64::NAN, |val| coeff * val))
            .sum()
    }

    fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        let lhs = self.lhs(x);

        match self.op {
            ConstraintOp::Lte => lhs <= self.rhs + tol,
            ConstraintOp::Eq => (lhs - self.rhs).abs() < tol,
            ConstraintOp::Gte => lhs >= self.rhs - tol,
        }
    }

    fn display(
        &self,
        f: &mut std::fmt::Formatter,
        var_names: &HashMap<VariableId, &Variable>,
    ) -> std::fmt::Result {
        for (var_id, coeff) in &self.coeffs {
            if *coeff == 0. {
                continue;
            }

            match var_names.get(var_id) {
                Some(var) => write!(
                    f,
                    "{} {} {} ",
                    if *coeff >= 0. { "+" } else { "-" },
                    coeff.abs(),
                    var
                )?,
                None => write!(f, "? ")?,
            }
        }

        write!(f, "{} {}", self.op, self.rhs)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VariableId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, var: VariableId, coeff: f64) -> &mut Self {
        self.terms.push((var, coeff));
        self
    }

    pub fn lte(self, rhs: f64) -> Constraint {
        Constraint::new(self, ConstraintOp::Lte, rhs)
    }

    pub fn equal(self, rhs: f64) -> Constraint {
        Constraint::new(self, ConstraintOp::Eq, rhs)
    }

    pub fn gte(self, rhs: f64) -> Constraint {
        Constraint::new(self, ConstraintOp::Gte, rhs)
    }
}

impl std::iter::FromIterator<(VariableId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VariableId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl std::convert::From<usize> for VariableId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl std::convert::From<VariableId> for usize {
    fn from(id: VariableId) -> Self {
        id.0
    }
}

impl std::convert::From<&VariableId> for usize {
    fn from(id: &VariableId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Lte,
    Eq,
    Gte,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.sense {
            Sense::Minimize => writeln!(f, "minimize")?,
            Sense::Maximize => writeln!(f, "maximize")?,
        }

        let mut var_id_to_var: HashMap<VariableId, &Variable> = HashMap::new();

        for var in &self.variables {
            var_id_to_var.insert(var.id, var);

            if var.obj_coeff == 0. {
                continue;
            }

            write!(
                f,
                "{} {} {} ",
                if var.obj_coeff > 0. { "+" } else { "-" },
                var.obj_coeff.abs(),
                var
            )?;
        }

        writeln!(f, "\n\nsubject to")?;

        for constraint in &self.constraints {
            constraint.display(f, &var_id_to_var)?;
            writeln!(f)?;
        }

        writeln!(f, "\nwith the bounds")?;

        for var in &self.variables {
            var.bound.display(f, var)?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "id[{}]", self.id.0),
        }
    }
}

impl std::fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConstraintOp::Lte => write!(f, "{}", LTE_STR),
            ConstraintOp::Eq => write!(f, "{}", EQ_STR),
            ConstraintOp::Gte => write!(f, "{}", GTE_STR),
        }
    }
}
