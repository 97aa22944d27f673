//! Combined node and edge interventions.
//!
//! An [`InterventionProblem`] describes the network formulas, the goals and the limits of
//! admissible interventions independently of any solver. A node intervention fixes a
//! variable, an edge intervention fixes the value of one regulator inside the formula of
//! one target (see [`RewrittenNetwork`]). An intervention is a solution when the values it
//! forces satisfy every literal of at least one goal.
//!
//! Problems are solved by an [`InterventionSolver`]: either explicitly by
//! [`ExhaustiveSolver`], or by an external `clingo` process ([`asp::ClingoSolver`]).
//! Solver models are turned into [`ControlStrategy`] values by [`decode_models`].

use crate::error::ControlError;
use log::{debug, info};

pub mod asp;
mod driver;
mod problem;
mod rewrite;
mod solver;
mod strategy;

#[cfg(test)]
mod tests;

pub use driver::{ControlProblem, ControlType};
pub use problem::{
    Goal, GoalKind, InterventionLimits, InterventionProblem, InterventionType, Literal, Sign,
};
pub use rewrite::{ForcingRule, RewrittenNetwork};
pub use solver::{
    EnumerationConfig, EnumerationState, EnumerationStep, ExhaustiveSolver, InterventionAtom,
    InterventionEnumeration, InterventionModel, InterventionSolver,
};
pub use strategy::{ControlStrategy, EdgeFact};

/// Decode solver models into control strategies.
///
/// No models means no strategy exists (the result is empty). Otherwise every model gives
/// one strategy; an empty model is the empty strategy, i.e. the goal holds without any
/// intervention. Structurally equal strategies are reported once. Models with conflicting
/// facts are rejected.
pub fn decode_models(models: Vec<InterventionModel>) -> Result<Vec<ControlStrategy>, ControlError> {
    let mut result: Vec<ControlStrategy> = Vec::with_capacity(models.len());
    for model in models {
        let mut strategy = ControlStrategy::new();
        for atom in model {
            match atom {
                InterventionAtom::Node { variable, sign } => {
                    strategy.insert_node(&variable, bool::from(sign))?
                }
                InterventionAtom::Edge {
                    source,
                    target,
                    sign,
                } => strategy.insert_edge(EdgeFact {
                    source,
                    target,
                    value: bool::from(sign),
                })?,
            }
        }
        if result.contains(&strategy) {
            debug!("Duplicate control strategy {} ignored.", strategy);
        } else {
            result.push(strategy);
        }
    }
    Ok(result)
}

/// Solve `problem` using `solver` and decode the resulting models.
pub fn build_and_solve<S: InterventionSolver>(
    problem: &InterventionProblem,
    solver: &S,
) -> Result<Vec<ControlStrategy>, ControlError> {
    info!(
        "Solving intervention problem with {} variables and {} goals.",
        problem.num_vars(),
        problem.goals.len()
    );
    let models = solver.solve(problem)?;
    decode_models(models)
}
