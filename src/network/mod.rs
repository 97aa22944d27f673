//! Boolean networks in prime-implicant form and their percolation.
//!
//! A [`PrimeNetwork`] stores, for every variable, the minimal partial assignments that force
//! it to `0` and to `1`. It is the single input that all searches operate on. Networks can
//! be created directly from prime implicants ([`PrimeNetwork::try_new`]) or derived from
//! any model supported by `biodivine-lib-param-bn` (see [`PrimeNetwork::try_from_file`]).

use crate::error::ControlError;
use crate::subspace::Subspace;
use log::trace;
use std::collections::{BTreeMap, BTreeSet};

mod prime_implicants;

#[cfg(test)]
mod tests;

/// A clause is a list of `(regulator, value)` literals, sorted by regulator index.
pub(crate) type Clause = Vec<(usize, bool)>;

/// The prime implicants of a single variable.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariablePrimes {
    /// Clauses forcing the variable to `0`.
    pub off: Vec<Subspace>,
    /// Clauses forcing the variable to `1`.
    pub on: Vec<Subspace>,
}

impl VariablePrimes {
    pub fn new(off: Vec<Subspace>, on: Vec<Subspace>) -> VariablePrimes {
        VariablePrimes { off, on }
    }

    /// A variable with a constant update function.
    pub fn constant(value: bool) -> VariablePrimes {
        if value {
            VariablePrimes::new(Vec::new(), vec![Subspace::new()])
        } else {
            VariablePrimes::new(vec![Subspace::new()], Vec::new())
        }
    }

    /// A variable whose update function is a single literal of `regulator`
    /// (`regulator` if `positive`, `!regulator` otherwise).
    pub fn literal(regulator: &str, positive: bool) -> VariablePrimes {
        VariablePrimes::new(
            vec![Subspace::from([(regulator, !positive)])],
            vec![Subspace::from([(regulator, positive)])],
        )
    }

    /// An input variable, i.e. a variable that keeps its value forever.
    pub fn input(name: &str) -> VariablePrimes {
        VariablePrimes::literal(name, true)
    }

    pub fn get(&self, value: bool) -> &[Subspace] {
        if value { &self.on } else { &self.off }
    }
}

/// A Boolean network over a fixed, ordered set of variables, given by prime implicants.
///
/// The network is validated on construction and never changes afterwards.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimeNetwork {
    names: Vec<String>,
    index: BTreeMap<String, usize>,
    /// `clauses[var][0]` force `var` to `0`, `clauses[var][1]` force it to `1`.
    clauses: Vec<[Vec<Clause>; 2]>,
}

impl PrimeNetwork {
    /// Create a new network from a list of variables and their prime implicants. The order
    /// of the list is the variable order used by all enumeration procedures.
    ///
    /// Fails if a variable is declared twice, if a clause references an undeclared
    /// variable, or if some clause forcing `1` is consistent with a clause forcing `0`.
    pub fn try_new(variables: Vec<(String, VariablePrimes)>) -> Result<PrimeNetwork, ControlError> {
        let mut index = BTreeMap::new();
        for (i, (name, _)) in variables.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(ControlError::DuplicateVariable(name.clone()));
            }
        }

        let mut clauses = Vec::with_capacity(variables.len());
        for (name, primes) in &variables {
            for on in &primes.on {
                if primes.off.iter().any(|off| off.is_consistent_with(on)) {
                    return Err(ControlError::InconsistentPrimes(name.clone()));
                }
            }
            let off = Self::index_clauses(&index, &primes.off)?;
            let on = Self::index_clauses(&index, &primes.on)?;
            clauses.push([off, on]);
        }

        Ok(PrimeNetwork {
            names: variables.into_iter().map(|(name, _)| name).collect(),
            index,
            clauses,
        })
    }

    fn index_clauses(
        index: &BTreeMap<String, usize>,
        clauses: &[Subspace],
    ) -> Result<Vec<Clause>, ControlError> {
        let mut result = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let mut literals = Vec::with_capacity(clause.len());
            for (variable, value) in clause.iter() {
                let Some(var) = index.get(variable) else {
                    return Err(ControlError::UnknownVariable(variable.to_string()));
                };
                literals.push((*var, value));
            }
            literals.sort();
            result.push(literals);
        }
        Ok(result)
    }

    pub fn num_vars(&self) -> usize {
        self.names.len()
    }

    /// Variable names in network order.
    pub fn variables(&self) -> &[String] {
        &self.names
    }

    pub fn find_variable(&self, name: &str) -> Option<usize> {
        self.index.get(name).cloned()
    }

    pub fn get_variable_name(&self, var: usize) -> &str {
        &self.names[var]
    }

    /// The prime implicants of `variable` as subspaces, or `None` for unknown variables.
    pub fn primes(&self, variable: &str) -> Option<VariablePrimes> {
        let var = self.find_variable(variable)?;
        let [off, on] = &self.clauses[var];
        Some(VariablePrimes::new(
            off.iter().map(|it| self.clause_to_subspace(it)).collect(),
            on.iter().map(|it| self.clause_to_subspace(it)).collect(),
        ))
    }

    pub(crate) fn clauses(&self, var: usize, value: bool) -> &[Clause] {
        &self.clauses[var][usize::from(value)]
    }

    /// Variables that occur in at least one clause of `var`.
    pub fn regulators(&self, var: usize) -> BTreeSet<usize> {
        self.clauses[var]
            .iter()
            .flatten()
            .flat_map(|clause| clause.iter().map(|(regulator, _)| *regulator))
            .collect()
    }

    /// Check that `space` only references variables of this network.
    pub fn validate_subspace(&self, space: &Subspace) -> Result<(), ControlError> {
        match space.variables().find(|it| !self.index.contains_key(*it)) {
            Some(unknown) => Err(ControlError::UnknownVariable(unknown.to_string())),
            None => Ok(()),
        }
    }

    /// Check that `name` is a variable of this network and return its index.
    pub fn validate_variable(&self, name: &str) -> Result<usize, ControlError> {
        self.find_variable(name)
            .ok_or_else(|| ControlError::UnknownVariable(name.to_string()))
    }

    /// Compute the percolation closure of `space`.
    ///
    /// Variables of `space` keep their values. Every other variable with a clause whose
    /// literals are all fixed and satisfied is fixed to the value of that clause, until no
    /// more variables change. The result contains `space` and is the empty subspace when
    /// nothing can be forced. Percolating the result again does not change it.
    pub fn percolate(&self, space: &Subspace) -> Subspace {
        let mut values = self.to_values(space);
        let mut forced = Vec::new();
        loop {
            let mut changed = false;
            for var in 0..self.num_vars() {
                if values[var].is_some() {
                    continue;
                }
                if let Some(value) = self.forced_value(var, &values) {
                    values[var] = Some(value);
                    forced.push((var, value));
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        trace!("Percolation of {} fixed {} variables.", space, forced.len());

        space
            .iter()
            .map(|(name, value)| (name.to_string(), value))
            .chain(
                forced
                    .into_iter()
                    .map(|(var, value)| (self.names[var].clone(), value)),
            )
            .collect()
    }

    /// The value forced on `var` by a satisfied clause, if any.
    pub(crate) fn forced_value(&self, var: usize, values: &[Option<bool>]) -> Option<bool> {
        [false, true].into_iter().find(|value| {
            self.clauses(var, *value)
                .iter()
                .any(|clause| is_satisfied(clause, values))
        })
    }

    /// Convert `space` into a value vector indexed by variables. Variables that do not
    /// belong to this network are ignored.
    pub(crate) fn to_values(&self, space: &Subspace) -> Vec<Option<bool>> {
        let mut values = vec![None; self.num_vars()];
        for (name, value) in space.iter() {
            if let Some(var) = self.find_variable(name) {
                values[var] = Some(value);
            }
        }
        values
    }

    pub(crate) fn from_values(&self, values: &[Option<bool>]) -> Subspace {
        values
            .iter()
            .enumerate()
            .filter_map(|(var, value)| value.map(|it| (self.names[var].clone(), it)))
            .collect()
    }

    fn clause_to_subspace(&self, clause: &Clause) -> Subspace {
        clause
            .iter()
            .map(|(var, value)| (self.names[*var].clone(), *value))
            .collect()
    }
}

/// True iff every literal of `clause` is fixed to its value in `values`.
pub(crate) fn is_satisfied(clause: &Clause, values: &[Option<bool>]) -> bool {
    clause.iter().all(|(var, value)| values[*var] == Some(*value))
}

/// True iff some literal of `clause` is fixed to the opposite value in `values`.
pub(crate) fn is_refuted(clause: &Clause, values: &[Option<bool>]) -> bool {
    clause.iter().any(|(var, value)| values[*var] == Some(!*value))
}
