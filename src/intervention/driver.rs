use crate::error::ControlError;
use crate::intervention::{
    ControlStrategy, Goal, InterventionProblem, InterventionSolver, InterventionType,
    build_and_solve,
};
use crate::network::PrimeNetwork;
use crate::report::summarize;
use crate::subspace::Subspace;
use crate::trap_spaces::{AttractorEvidence, select_target_trap_spaces};
use log::info;

/// What the interventions should achieve.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlType {
    /// Force the target subspace directly.
    #[default]
    Percolation,
    /// Force one of the selected trap spaces of the target.
    TrapSpaces,
    /// Reach one of the selected trap spaces, treated as plain subspaces.
    Transient,
    /// Force one of the selected trap spaces or the target itself.
    Both,
}

impl ControlType {
    /// True if goals are derived from the selected target trap spaces.
    pub fn uses_trap_spaces(self) -> bool {
        self != ControlType::Percolation
    }
}

/// A complete node/edge control problem: a network, a target and everything that
/// restricts the admissible interventions.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlProblem {
    pub network: PrimeNetwork,
    pub target: Subspace,
    pub intervention_type: InterventionType,
    pub control_type: ControlType,
    pub avoid_nodes: Vec<String>,
    pub avoid_edges: Vec<(String, String)>,
    /// Maximal intervention size (default: `3`).
    pub limit: usize,
    /// Evidence used to select the target trap spaces (default: minimal trap spaces
    /// computed from the network, no complex attractors).
    pub evidence: AttractorEvidence,
    /// Maximal number of trap spaces considered during the selection (default: `1000000`).
    pub max_trap_spaces: usize,
}

impl ControlProblem {
    pub fn new(
        network: PrimeNetwork,
        target: Subspace,
        intervention_type: InterventionType,
        control_type: ControlType,
    ) -> ControlProblem {
        ControlProblem {
            network,
            target,
            intervention_type,
            control_type,
            avoid_nodes: Vec::new(),
            avoid_edges: Vec::new(),
            limit: 3,
            evidence: AttractorEvidence::from_attractors(Vec::new()),
            max_trap_spaces: 1_000_000,
        }
    }

    /// The goals of the intervention problem according to the [`ControlType`].
    pub fn goals(&self) -> Result<Vec<Goal>, ControlError> {
        self.network.validate_subspace(&self.target)?;
        if !self.control_type.uses_trap_spaces() {
            return Ok(vec![Goal::subspace(self.target.clone())]);
        }

        let selected = select_target_trap_spaces(
            &self.network,
            &self.target,
            &self.evidence,
            self.max_trap_spaces,
        )?;
        info!("Number of selected trap spaces: {}.", selected.len());

        let goals = match self.control_type {
            ControlType::Transient => selected.into_iter().map(Goal::subspace).collect(),
            ControlType::Both => selected
                .into_iter()
                .map(Goal::trap_space)
                .chain([Goal::subspace(self.target.clone())])
                .collect(),
            _ => selected.into_iter().map(Goal::trap_space).collect(),
        };
        Ok(goals)
    }

    /// Build the validated [`InterventionProblem`].
    pub fn to_problem(&self) -> Result<InterventionProblem, ControlError> {
        InterventionProblem::try_new(
            &self.network,
            self.goals()?,
            self.intervention_type,
            self.limit,
        )?
        .avoid_nodes(&self.avoid_nodes)?
        .avoid_edges(
            self.avoid_edges
                .iter()
                .map(|(source, target)| (source.as_str(), target.as_str())),
        )
    }

    /// Build the problem, solve it using `solver` and decode the control strategies.
    pub fn solve<S: InterventionSolver>(
        &self,
        solver: &S,
    ) -> Result<Vec<ControlStrategy>, ControlError> {
        let problem = self.to_problem()?;
        let strategies = build_and_solve(&problem, solver)?;
        info!("Control problem solved: {}.", summarize(&strategies));
        Ok(strategies)
    }
}
