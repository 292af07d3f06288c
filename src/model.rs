use crate::convert::ParameterMap;
use crate::error::TabLpError;
use crate::problem::{Bound, Constraint, LinearExpr, Problem, Sense, VariableId};

use log::{debug, trace};

use std::collections::{HashMap, HashSet};
use std::ops::{Range, RangeInclusive};

//1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Index {
    One(usize),
    Two(usize, usize),
}

impl std::convert::From<usize> for Index {
    fn from(i: usize) -> Self {
        Index::One(i)
    }
}

impl std::convert::From<(usize, usize)> for Index {
    fn from((i, j): (usize, usize)) -> Self {
        Index::Two(i, j)
    }
}

impl std::fmt::Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Index::One(i) => write!(f, "{}", i),
            Index::Two(i, j) => write!(f, "{},{}", i, j),
        }
    }
}

pub type ConstraintRule = Box<dyn Fn(&Instance, Index) -> Result<Option<Constraint>, TabLpError>>;
pub type ObjectiveRule = Box<dyn Fn(&Instance) -> Result<LinearExpr, TabLpError>>;

struct ParamDecl {
    name: String,
    sets: Vec<String>,
    values: HashMap<Index, f64>,
}

struct VarDecl {
    name: String,
    sets: Vec<String>,
    bound: Bound,
}

struct ConstraintDecl {
    name: String,
    sets: Vec<String>,
    rule: ConstraintRule,
}

pub struct AbstractModel {
    name: String,
    sense: Sense,
    sets: Vec<(String, usize)>,
    params: Vec<ParamDecl>,
    scalars: Vec<(String, f64)>,
    vars: Vec<VarDecl>,
    constraints: Vec<ConstraintDecl>,
    objective: Option<ObjectiveRule>,
    component_names: HashSet<String>,
}

impl AbstractModel {
    pub fn new(name: &str, sense: Sense) -> Self {
        Self {
            name: name.to_string(),
            sense,
            sets: Vec::new(),
            params: Vec::new(),
            scalars: Vec::new(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            component_names: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn add_set(&mut self, name: &str, len: usize) -> Result<(), TabLpError> {
        self.claim_name(name)?;
        self.sets.push((name.to_string(), len));
        Ok(())
    }

    //values must cover the cross product of the sets exactly
    pub fn add_param<K: Into<Index>>(
        &mut self,
        name: &str,
        sets: &[&str],
        values: ParameterMap<K>,
    ) -> Result<(), TabLpError> {
        let dims = self.dims(sets)?;
        let values: HashMap<Index, f64> = values.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let expected: usize = dims.iter().product();
        if values.len() != expected {
            return Err(TabLpError::model(format!(
                "parameter {} has {} values, but its index sets have {} entries",
                name,
                values.len(),
                expected
            )));
        }

        if let Some((index, value)) = values.iter().find(|(_index, value)| !value.is_finite()) {
            return Err(TabLpError::model(format!(
                "parameter {} has non-finite value {} at {}",
                name, value, index
            )));
        }

        if let Some(index) = values.keys().find(|&&index| offset(&dims, index).is_none()) {
            return Err(TabLpError::model(format!(
                "parameter {} has out of range index {}",
                name, index
            )));
        }

        self.claim_name(name)?;
        self.params.push(ParamDecl {
            name: name.to_string(),
            sets: sets.iter().map(|s| s.to_string()).collect(),
            values,
        });

        Ok(())
    }

    pub fn add_scalar_param(&mut self, name: &str, value: f64) -> Result<(), TabLpError> {
        if !value.is_finite() {
            return Err(TabLpError::model(format!(
                "scalar parameter {} has non-finite value {}",
                name, value
            )));
        }

        self.claim_name(name)?;
        self.scalars.push((name.to_string(), value));
        Ok(())
    }

    pub fn add_var(&mut self, name: &str, sets: &[&str], bound: Bound) -> Result<(), TabLpError> {
        self.dims(sets)?;
        self.claim_name(name)?;
        self.vars.push(VarDecl {
            name: name.to_string(),
            sets: sets.iter().map(|s| s.to_string()).collect(),
            bound,
        });

        Ok(())
    }

    /// The rule runs once per index of `sets`. Returning `Ok(None)` skips that index.
    pub fn add_constraint<F>(&mut self, name: &str, sets: &[&str], rule: F) -> Result<(), TabLpError>
    where
        F: Fn(&Instance, Index) -> Result<Option<Constraint>, TabLpError> + 'static,
    {
        self.dims(sets)?;
        self.claim_name(name)?;
        self.constraints.push(ConstraintDecl {
            name: name.to_string(),
            sets: sets.iter().map(|s| s.to_string()).collect(),
            rule: Box::new(rule),
        });

        Ok(())
    }

    pub fn set_objective<F>(&mut self, rule: F)
    where
        F: Fn(&Instance) -> Result<LinearExpr, TabLpError> + 'static,
    {
        self.objective = Some(Box::new(rule));
    }

    pub fn create_instance(&self) -> Result<Instance, TabLpError> {
        let objective = self
            .objective
            .as_ref()
            .ok_or_else(|| TabLpError::model(format!("model {} has no objective", self.name)))?;

        let mut instance = Instance {
            name: self.name.clone(),
            sets: self.sets.iter().cloned().collect(),
            params: HashMap::new(),
            scalars: self.scalars.iter().cloned().collect(),
            vars: HashMap::new(),
            var_order: Vec::new(),
            problem: Problem::new(self.sense),
        };

        for param in &self.params {
            let dims = self.dims_of(&param.sets)?;
            instance.params.insert(
                param.name.clone(),
                ParamBlock {
                    dims,
                    values: param.values.clone(),
                },
            );
        }

        for var in &self.vars {
            let dims = self.dims_of(&var.sets)?;
            let first = instance.problem.vars().len();

            for index in indices(&dims) {
                instance.problem.add_var(
                    0.,
                    var.bound,
                    Some(format!("{}[{}]", var.name, index)),
                )?;
            }

            trace!("{}: {} variables from id {}", var.name, dims.iter().product::<usize>(), first);

            instance.vars.insert(var.name.clone(), VarBlock { dims, first });
            instance.var_order.push(var.name.clone());
        }

        let expr = objective(&instance)?;
        for (var, coeff) in expr.terms {
            instance.problem.add_obj_coeff(var, coeff)?;
        }

        for decl in &self.constraints {
            let dims = self.dims_of(&decl.sets)?;
            let mut added = 0;

            for index in indices(&dims) {
                let constraint = (decl.rule)(&instance, index)?;

                if let Some(constraint) = constraint {
                    instance.problem.push_constraint(constraint)?;
                    added += 1;
                }
            }

            trace!("{}: {} constraints", decl.name, added);
        }

        debug!(
            "created instance of {} with {} variables and {} constraints",
            self.name,
            instance.problem.vars().len(),
            instance.problem.constraints().len()
        );

        Ok(instance)
    }

    fn claim_name(&mut self, name: &str) -> Result<(), TabLpError> {
        if !self.component_names.insert(name.to_string()) {
            return Err(TabLpError::model(format!(
                "component names must be unique, {} was declared twice",
                name
            )));
        }

        Ok(())
    }

    fn set_len(&self, name: &str) -> Result<usize, TabLpError> {
        self.sets
            .iter()
            .find(|(set_name, _len)| set_name == name)
            .map(|(_name, len)| *len)
            .ok_or_else(|| TabLpError::model(format!("unknown index set {}", name)))
    }

    fn dims(&self, sets: &[&str]) -> Result<Vec<usize>, TabLpError> {
        if sets.is_empty() || sets.len() > 2 {
            return Err(TabLpError::model(format!(
                "components are indexed over one or two sets, got {}",
                sets.len()
            )));
        }

        sets.iter().map(|name| self.set_len(name)).collect()
    }

    fn dims_of(&self, sets: &[String]) -> Result<Vec<usize>, TabLpError> {
        let sets: Vec<&str> = sets.iter().map(String::as_str).collect();
        self.dims(&sets)
    }
}

#[derive(Debug, Clone)]
struct ParamBlock {
    dims: Vec<usize>,
    values: HashMap<Index, f64>,
}

#[derive(Debug, Clone)]
struct VarBlock {
    dims: Vec<usize>,
    first: usize,
}

impl VarBlock {
    fn len(&self) -> usize {
        self.dims.iter().product()
    }
}

#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    sets: HashMap<String, usize>,
    params: HashMap<String, ParamBlock>,
    scalars: HashMap<String, f64>,
    vars: HashMap<String, VarBlock>,
    var_order: Vec<String>,
    problem: Problem,
}

impl Instance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set(&self, name: &str) -> Result<RangeInclusive<usize>, TabLpError> {
        self.set_len(name).map(|len| 1..=len)
    }

    pub fn set_len(&self, name: &str) -> Result<usize, TabLpError> {
        self.sets
            .get(name)
            .copied()
            .ok_or_else(|| TabLpError::model(format!("unknown index set {}", name)))
    }

    pub fn param<I: Into<Index>>(&self, name: &str, index: I) -> Result<f64, TabLpError> {
        let index = index.into();
        let block = self
            .params
            .get(name)
            .ok_or_else(|| TabLpError::model(format!("unknown parameter {}", name)))?;

        check_index(name, &block.dims, index)?;

        block
            .values
            .get(&index)
            .copied()
            .ok_or_else(|| TabLpError::model(format!("parameter {} has no value at {}", name, index)))
    }

    pub fn scalar(&self, name: &str) -> Result<f64, TabLpError> {
        self.scalars
            .get(name)
            .copied()
            .ok_or_else(|| TabLpError::model(format!("unknown scalar parameter {}", name)))
    }

    pub fn var<I: Into<Index>>(&self, name: &str, index: I) -> Result<VariableId, TabLpError> {
        let block = self.var_block(name)?;
        let offset = check_index(name, &block.dims, index.into())?;
        Ok(VariableId::from(block.first + offset))
    }

    pub fn var_indices(&self, name: &str) -> Result<Vec<Index>, TabLpError> {
        self.var_block(name).map(|block| indices(&block.dims))
    }

    pub fn var_range(&self, name: &str) -> Result<Range<usize>, TabLpError> {
        self.var_block(name)
            .map(|block| block.first..block.first + block.len())
    }

    pub fn var_dims(&self, name: &str) -> Result<&[usize], TabLpError> {
        self.var_block(name).map(|block| block.dims.as_slice())
    }

    pub fn var_names(&self) -> impl Iterator<Item = &str> {
        self.var_order.iter().map(String::as_str)
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    fn var_block(&self, name: &str) -> Result<&VarBlock, TabLpError> {
        self.vars
            .get(name)
            .ok_or_else(|| TabLpError::model(format!("unknown variable {}", name)))
    }
}

//row-major position of index, None if out of range
fn offset(dims: &[usize], index: Index) -> Option<usize> {
    match (dims, index) {
        (&[n], Index::One(i)) if (1..=n).contains(&i) => Some(i - 1),
        (&[m, n], Index::Two(i, j)) if (1..=m).contains(&i) && (1..=n).contains(&j) => {
            Some((i - 1) * n + (j - 1))
        }
        _ => None,
    }
}

fn check_index(name: &str, dims: &[usize], index: Index) -> Result<usize, TabLpError> {
    offset(dims, index).ok_or_else(|| {
        TabLpError::model(format!(
            "index {} is invalid for {}, which is indexed over {:?}",
            index, name, dims
        ))
    })
}

fn indices(dims: &[usize]) -> Vec<Index> {
    match *dims {
        [n] => (1..=n).map(Index::One).collect(),
        [m, n] => (1..=m)
            .flat_map(|i| (1..=n).map(move |j| Index::Two(i, j)))
            .collect(),
        _ => Vec::new(),
    }
}
