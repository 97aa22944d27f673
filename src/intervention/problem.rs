use crate::error::ControlError;
use crate::network::PrimeNetwork;
use crate::subspace::Subspace;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// The sign of a literal or of a forced value, encoded as `+1` / `-1`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// The `+1` / `-1` encoding.
    pub fn as_int(self) -> i64 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }

    pub fn try_from_int(value: i64) -> Option<Sign> {
        match value {
            1 => Some(Sign::Positive),
            -1 => Some(Sign::Negative),
            _ => None,
        }
    }
}

impl From<bool> for Sign {
    fn from(value: bool) -> Self {
        if value { Sign::Positive } else { Sign::Negative }
    }
}

impl From<Sign> for bool {
    fn from(value: Sign) -> Self {
        value == Sign::Positive
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_int())
    }
}

/// One literal of a clause: `regulator` must have the value given by `sign`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub regulator: usize,
    pub sign: Sign,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalKind {
    /// A selected trap space of the target.
    TrapSpace,
    /// A subspace that only needs to be reached.
    Subspace,
}

/// A subspace whose literals must all be forced by a solution.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Goal {
    pub kind: GoalKind,
    pub space: Subspace,
}

impl Goal {
    pub fn trap_space(space: Subspace) -> Goal {
        Goal {
            kind: GoalKind::TrapSpace,
            space,
        }
    }

    pub fn subspace(space: Subspace) -> Goal {
        Goal {
            kind: GoalKind::Subspace,
            space,
        }
    }
}

/// Which kinds of interventions are allowed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterventionType {
    Node,
    Edge,
    #[default]
    Combined,
}

impl InterventionType {
    pub fn limits(self, max_size: usize) -> InterventionLimits {
        let (max_nodes, max_edges) = match self {
            InterventionType::Node => (Some(max_size), None),
            InterventionType::Edge => (None, Some(max_size)),
            InterventionType::Combined => (Some(max_size), Some(max_size)),
        };
        InterventionLimits {
            max_size,
            max_nodes,
            max_edges,
        }
    }
}

/// Size bounds of an intervention. `None` disables the corresponding intervention kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterventionLimits {
    pub max_size: usize,
    pub max_nodes: Option<usize>,
    pub max_edges: Option<usize>,
}

/// The solver-independent description of a node/edge intervention problem.
///
/// Variables are referenced by their index in `variables`. The formula of every variable
/// is the disjunction of the clauses forcing it to `1`.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterventionProblem {
    pub variables: Vec<String>,
    pub formulas: Vec<Vec<Vec<Literal>>>,
    pub goals: Vec<Goal>,
    pub limits: InterventionLimits,
    pub avoid_nodes: BTreeSet<usize>,
    /// Avoided `(source, target)` regulations.
    pub avoid_edges: BTreeSet<(usize, usize)>,
}

impl InterventionProblem {
    /// Build the problem for `network`, failing if some goal references an unknown
    /// variable.
    pub fn try_new(
        network: &PrimeNetwork,
        goals: Vec<Goal>,
        intervention_type: InterventionType,
        max_size: usize,
    ) -> Result<InterventionProblem, ControlError> {
        for goal in &goals {
            network.validate_subspace(&goal.space)?;
        }

        let formulas = (0..network.num_vars())
            .map(|var| {
                network
                    .clauses(var, true)
                    .iter()
                    .map(|clause| {
                        clause
                            .iter()
                            .map(|(regulator, value)| Literal {
                                regulator: *regulator,
                                sign: Sign::from(*value),
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Ok(InterventionProblem {
            variables: network.variables().to_vec(),
            formulas,
            goals,
            limits: intervention_type.limits(max_size),
            avoid_nodes: BTreeSet::new(),
            avoid_edges: BTreeSet::new(),
        })
    }

    /// Forbid node interventions on the given variables.
    pub fn avoid_nodes<I, S>(mut self, nodes: I) -> Result<InterventionProblem, ControlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let var = self.find_variable(node.as_ref())?;
            self.avoid_nodes.insert(var);
        }
        Ok(self)
    }

    /// Forbid edge interventions on the given `(source, target)` regulations.
    pub fn avoid_edges<I, S>(mut self, edges: I) -> Result<InterventionProblem, ControlError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        for (source, target) in edges {
            let edge = self.find_edge(source.as_ref(), target.as_ref())?;
            self.avoid_edges.insert(edge);
        }
        Ok(self)
    }

    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn find_variable(&self, name: &str) -> Result<usize, ControlError> {
        self.variables
            .iter()
            .position(|it| it == name)
            .ok_or_else(|| ControlError::UnknownVariable(name.to_string()))
    }

    /// Resolve a `(source, target)` pair that must be a regulation, i.e. `source` appears
    /// in the formula of `target`.
    pub fn find_edge(&self, source: &str, target: &str) -> Result<(usize, usize), ControlError> {
        let edge = (self.find_variable(source)?, self.find_variable(target)?);
        if self.is_regulation(edge.0, edge.1) {
            Ok(edge)
        } else {
            Err(ControlError::UnknownEdge {
                source: source.to_string(),
                target: target.to_string(),
            })
        }
    }

    pub fn is_regulation(&self, source: usize, target: usize) -> bool {
        self.formulas[target]
            .iter()
            .flatten()
            .any(|literal| literal.regulator == source)
    }

    /// All regulations of the network, ordered by target and then by source.
    pub fn regulations(&self) -> Vec<(usize, usize)> {
        let mut result = Vec::new();
        for target in 0..self.num_vars() {
            let sources: BTreeSet<usize> = self.formulas[target]
                .iter()
                .flatten()
                .map(|literal| literal.regulator)
                .collect();
            result.extend(sources.into_iter().map(|source| (source, target)));
        }
        result
    }

    /// Subspace goals first, then trap space goals. Subspace goals are numbered `-1, -2, ...`
    /// and trap space goals `0, 1, ...`.
    pub fn numbered_goals(&self) -> Vec<(i64, &Goal)> {
        let subspaces = self
            .goals
            .iter()
            .filter(|it| it.kind == GoalKind::Subspace)
            .zip(1i64..)
            .map(|(goal, i)| (-i, goal));
        let trap_spaces = self
            .goals
            .iter()
            .filter(|it| it.kind == GoalKind::TrapSpace)
            .zip(0i64..)
            .map(|(goal, i)| (i, goal));
        subspaces.chain(trap_spaces).collect()
    }
}
