use crate::error::TabLpError;
use crate::problem::{ConstraintOp, Problem, Sense};

use log::{debug, warn};

use std::collections::BTreeMap;

const DEFAULT_TOLERANCE: f64 = 1e-6;

pub type TabLpResult = Result<SolverResult, TabLpError>;

pub trait Solver {
    fn solve(&self, prob: &Problem) -> TabLpResult;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub enum SolverResult {
    Optimal(Solution),
    Infeasible,
    Unbounded,
}

impl SolverResult {
    pub fn status(&self) -> TerminationStatus {
        match self {
            SolverResult::Optimal(..) => TerminationStatus::Optimal,
            SolverResult::Infeasible => TerminationStatus::Infeasible,
            SolverResult::Unbounded => TerminationStatus::Unbounded,
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolverResult::Optimal(sol) => Some(sol),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

impl std::fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TerminationStatus::Optimal => write!(f, "optimal"),
            TerminationStatus::Infeasible => write!(f, "infeasible"),
            TerminationStatus::Unbounded => write!(f, "unbounded"),
            TerminationStatus::Error => write!(f, "error"),
        }
    }
}

impl std::convert::From<&TabLpResult> for TerminationStatus {
    fn from(result: &TabLpResult) -> Self {
        match result {
            Ok(result) => result.status(),
            Err(_) => TerminationStatus::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    obj: f64,
    x: Vec<f64>,
}

impl Solution {
    pub fn new(obj: f64, x: Vec<f64>) -> Self {
        Self { obj, x }
    }

    pub fn obj(&self) -> f64 {
        self.obj
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }
}

/// Delegates to the pure-Rust `microlp` simplex solver.
pub struct MicrolpSolver {
    tolerance: f64,
}

impl std::default::Default for MicrolpSolver {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MicrolpSolver {
    //tolerance for checking the returned point against bounds and constraints
    pub fn new(tolerance: Option<f64>) -> Self {
        Self {
            tolerance: tolerance.unwrap_or(DEFAULT_TOLERANCE),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Solver for MicrolpSolver {
    fn solve(&self, prob: &Problem) -> TabLpResult {
        let direction = match prob.sense {
            Sense::Minimize => microlp::OptimizationDirection::Minimize,
            Sense::Maximize => microlp::OptimizationDirection::Maximize,
        };

        let mut lp = microlp::Problem::new(direction);

        let mut vars: Vec<microlp::Variable> = Vec::with_capacity(prob.vars().len());

        for var in prob.vars() {
            let (lb, ub) = (var.lower(), var.upper());

            if lb.is_nan() || ub.is_nan() || lb > ub || !var.obj_coeff.is_finite() {
                return Err(TabLpError::model(format!("invalid variable {}", var)));
            }

            vars.push(lp.add_var(var.obj_coeff, (var.lower(), var.upper())));
        }

        for constraint in prob.constraints() {
            //microlp rejects a variable appearing twice in one constraint
            let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
            for (id, coeff) in &constraint.coeffs {
                *merged.entry(id.into()).or_insert(0.) += coeff;
            }

            let mut lhs = microlp::LinearExpr::empty();
            for (i, coeff) in merged {
                let var = vars.get(i).ok_or_else(|| {
                    TabLpError::model(format!("constraint refers to unknown variable id {}", i))
                })?;

                if coeff != 0. {
                    lhs.add(*var, coeff);
                }
            }

            let op = match constraint.op {
                ConstraintOp::Lte => microlp::ComparisonOp::Le,
                ConstraintOp::Eq => microlp::ComparisonOp::Eq,
                ConstraintOp::Gte => microlp::ComparisonOp::Ge,
            };

            lp.add_constraint(lhs, op, constraint.rhs);
        }

        debug!(
            "solving with microlp: {} variables, {} constraints, tolerance {}",
            vars.len(),
            prob.constraints().len(),
            self.tolerance()
        );

        let solution = match lp.solve() {
            Ok(solution) => solution,
            Err(microlp::Error::Infeasible) => return Ok(SolverResult::Infeasible),
            Err(microlp::Error::Unbounded) => return Ok(SolverResult::Unbounded),
            #[allow(unreachable_patterns)]
            Err(err) => return Err(TabLpError::Solver(err.to_string())),
        };

        let x: Vec<f64> = vars.iter().map(|&var| solution[var]).collect();

        if !prob.is_feasible_within(&x, self.tolerance) {
            warn!("microlp returned a point outside the feasible region");
            return Err(TabLpError::Solver(format!(
                "returned point violates the problem within tolerance {}",
                self.tolerance
            )));
        }

        Ok(SolverResult::Optimal(Solution::new(prob.objective_value(&x), x)))
    }

    fn name(&self) -> &str {
        "microlp"
    }
}
