use crate::error::ControlError;
use crate::intervention::{ControlStrategy, Goal, InterventionProblem, Literal};
use std::collections::BTreeMap;

/// How values are forced in a rewritten network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForcingRule {
    /// A variable is forced to `1` by a satisfied clause and to `0` once every clause of
    /// its formula is refuted. Without edge facts, this coincides with percolation.
    #[default]
    Percolation,
    /// A variable is forced to `1` by a satisfied clause and to `0` only when its formula
    /// has no clauses left.
    PositiveSupport,
}

/// The formulas of an [`InterventionProblem`] after applying an intervention.
///
/// An edge fact `source -> target = v` removes every clause of `target` that needs
/// `source` to have the opposite value, and removes the (now satisfied) `source`
/// literals from the remaining clauses. Node facts fix their variables.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RewrittenNetwork {
    formulas: Vec<Vec<Vec<Literal>>>,
    fixed: Vec<Option<bool>>,
}

impl RewrittenNetwork {
    pub fn new(
        problem: &InterventionProblem,
        nodes: &[(usize, bool)],
        edges: &[(usize, usize, bool)],
    ) -> RewrittenNetwork {
        let mut fixed = vec![None; problem.num_vars()];
        for (var, value) in nodes {
            fixed[*var] = Some(*value);
        }

        let mut edge_facts: Vec<BTreeMap<usize, bool>> = vec![BTreeMap::new(); problem.num_vars()];
        for (source, target, value) in edges {
            edge_facts[*target].insert(*source, *value);
        }

        let formulas = problem
            .formulas
            .iter()
            .zip(&edge_facts)
            .map(|(formula, facts)| rewrite_formula(formula, facts))
            .collect();

        RewrittenNetwork { formulas, fixed }
    }

    /// Rewrite the network using a [`ControlStrategy`] given by variable names.
    pub fn try_from_strategy(
        problem: &InterventionProblem,
        strategy: &ControlStrategy,
    ) -> Result<RewrittenNetwork, ControlError> {
        let mut nodes = Vec::new();
        for (variable, value) in strategy.nodes().iter() {
            nodes.push((problem.find_variable(variable)?, value));
        }
        let mut edges = Vec::new();
        for fact in strategy.edges() {
            let (source, target) = problem.find_edge(&fact.source, &fact.target)?;
            edges.push((source, target, fact.value));
        }
        Ok(RewrittenNetwork::new(problem, &nodes, &edges))
    }

    pub fn formula(&self, var: usize) -> &[Vec<Literal>] {
        &self.formulas[var]
    }

    /// Compute the values forced by the intervention, until fixpoint.
    pub fn evaluate(&self, rule: ForcingRule) -> Vec<Option<bool>> {
        let mut values = self.fixed.clone();
        loop {
            let mut changed = false;
            for (var, formula) in self.formulas.iter().enumerate() {
                if values[var].is_some() {
                    continue;
                }
                let satisfied = formula
                    .iter()
                    .any(|clause| clause.iter().all(|it| holds(it, &values)));
                let refuted = match rule {
                    ForcingRule::Percolation => formula
                        .iter()
                        .all(|clause| clause.iter().any(|it| fails(it, &values))),
                    ForcingRule::PositiveSupport => formula.is_empty(),
                };
                if satisfied {
                    values[var] = Some(true);
                    changed = true;
                } else if refuted {
                    values[var] = Some(false);
                    changed = true;
                }
            }
            if !changed {
                return values;
            }
        }
    }
}

impl InterventionProblem {
    /// True iff every literal of `goal` is forced to its value.
    pub fn goal_holds(&self, goal: &Goal, values: &[Option<bool>]) -> bool {
        goal.space.iter().all(|(variable, value)| {
            self.variables
                .iter()
                .position(|it| it == variable)
                .is_some_and(|var| values[var] == Some(value))
        })
    }

    /// True iff the forced values satisfy at least one goal.
    pub fn any_goal_holds(&self, values: &[Option<bool>]) -> bool {
        self.goals.iter().any(|goal| self.goal_holds(goal, values))
    }

    /// True iff `strategy` forces at least one goal under the given `rule`.
    pub fn is_solution(
        &self,
        strategy: &ControlStrategy,
        rule: ForcingRule,
    ) -> Result<bool, ControlError> {
        let network = RewrittenNetwork::try_from_strategy(self, strategy)?;
        Ok(self.any_goal_holds(&network.evaluate(rule)))
    }
}

fn rewrite_formula(formula: &[Vec<Literal>], facts: &BTreeMap<usize, bool>) -> Vec<Vec<Literal>> {
    if facts.is_empty() {
        return formula.to_vec();
    }
    formula
        .iter()
        .filter(|clause| {
            !clause.iter().any(|literal| {
                facts
                    .get(&literal.regulator)
                    .is_some_and(|value| *value != bool::from(literal.sign))
            })
        })
        .map(|clause| {
            clause
                .iter()
                .filter(|literal| !facts.contains_key(&literal.regulator))
                .copied()
                .collect()
        })
        .collect()
}

fn holds(literal: &Literal, values: &[Option<bool>]) -> bool {
    values[literal.regulator] == Some(bool::from(literal.sign))
}

fn fails(literal: &Literal, values: &[Option<bool>]) -> bool {
    values[literal.regulator] == Some(!bool::from(literal.sign))
}
