use crate::error::ControlError;
use crate::intervention::{ForcingRule, InterventionProblem, RewrittenNetwork, Sign};
use crate::search::{first_combination, next_combination};
use cancel_this::is_cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, Generator, GeneratorStep, Stateful};
use log::{debug, info};

/// One fact of a solver model, using the signed `+1` / `-1` value encoding.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterventionAtom {
    Node {
        variable: String,
        sign: Sign,
    },
    Edge {
        source: String,
        target: String,
        sign: Sign,
    },
}

/// A single solver model: the facts of one intervention.
pub type InterventionModel = Vec<InterventionAtom>;

/// Anything that can enumerate the models of an [`InterventionProblem`].
///
/// An infeasible problem has no models; this is not an error.
pub trait InterventionSolver {
    fn solve(&self, problem: &InterventionProblem) -> Result<Vec<InterventionModel>, ControlError>;
}

/// Explicit iterative deepening over the intervention size.
///
/// Every admissible intervention is checked using a [`RewrittenNetwork`]. Interventions
/// that contain an already found model are never reported, hence every model is
/// inclusion-minimal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExhaustiveSolver {
    pub rule: ForcingRule,
    /// The maximal number of reported models; `0` means all of them.
    pub max_models: usize,
}

impl ExhaustiveSolver {
    pub fn new(rule: ForcingRule) -> ExhaustiveSolver {
        ExhaustiveSolver {
            rule,
            max_models: 0,
        }
    }

    pub fn with_max_models(mut self, max_models: usize) -> ExhaustiveSolver {
        self.max_models = max_models;
        self
    }
}

impl InterventionSolver for ExhaustiveSolver {
    fn solve(&self, problem: &InterventionProblem) -> Result<Vec<InterventionModel>, ControlError> {
        let config = EnumerationConfig {
            problem: problem.clone(),
            rule: self.rule,
        };
        let state = EnumerationState::from(&config);
        let mut models = Vec::new();
        for model in InterventionEnumeration::configure(config, state) {
            models.push(model?);
            if models.len() == self.max_models {
                debug!("Model limit {} reached.", self.max_models);
                break;
            }
        }
        info!("Found {} intervention models.", models.len());
        Ok(models)
    }
}

/// Enumerates the inclusion-minimal models of an [`InterventionProblem`] by increasing size.
pub type InterventionEnumeration =
    Generator<EnumerationConfig, EnumerationState, InterventionModel, EnumerationStep>;

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumerationConfig {
    pub problem: InterventionProblem,
    pub rule: ForcingRule,
}

impl From<InterventionProblem> for EnumerationConfig {
    fn from(value: InterventionProblem) -> Self {
        EnumerationConfig {
            problem: value,
            rule: ForcingRule::default(),
        }
    }
}

/// A single admissible choice of the enumeration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Choice {
    Node(usize, bool),
    Edge(usize, usize, bool),
}

/// Internal state of the [`InterventionEnumeration`].
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumerationState {
    choices: Vec<Choice>,
    /// The next combination of choices, `None` once the enumeration is finished.
    next: Option<Vec<usize>>,
    found: Vec<Vec<usize>>,
}

/// Step implementation of the [`InterventionEnumeration`]. Each step examines one
/// combination of choices.
pub struct EnumerationStep;

impl From<&EnumerationConfig> for EnumerationState {
    fn from(value: &EnumerationConfig) -> Self {
        let problem = &value.problem;
        let mut choices = Vec::new();
        if problem.limits.max_nodes.is_some() {
            for var in 0..problem.num_vars() {
                if !problem.avoid_nodes.contains(&var) {
                    choices.push(Choice::Node(var, false));
                    choices.push(Choice::Node(var, true));
                }
            }
        }
        if problem.limits.max_edges.is_some() {
            for (source, target) in problem.regulations() {
                if !problem.avoid_edges.contains(&(source, target)) {
                    choices.push(Choice::Edge(source, target, false));
                    choices.push(Choice::Edge(source, target, true));
                }
            }
        }
        debug!("Intervention enumeration uses {} choices.", choices.len());
        EnumerationState {
            choices,
            next: Some(Vec::new()),
            found: Vec::new(),
        }
    }
}

impl GeneratorStep<EnumerationConfig, EnumerationState, InterventionModel> for EnumerationStep {
    fn step(
        context: &EnumerationConfig,
        state: &mut EnumerationState,
    ) -> Completable<Option<InterventionModel>> {
        is_cancelled!()?;

        let Some(combination) = state.next.take() else {
            return Ok(None);
        };

        state.next = advance(context, state.choices.len(), &combination);

        if state
            .found
            .iter()
            .any(|model| model.iter().all(|it| combination.contains(it)))
        {
            return Err(Suspended);
        }

        let selected: Vec<Choice> = combination.iter().map(|i| state.choices[*i]).collect();
        if !is_admissible(context, &selected) {
            return Err(Suspended);
        }

        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for choice in &selected {
            match *choice {
                Choice::Node(var, value) => nodes.push((var, value)),
                Choice::Edge(source, target, value) => edges.push((source, target, value)),
            }
        }
        let values = RewrittenNetwork::new(&context.problem, &nodes, &edges).evaluate(context.rule);
        if !context.problem.any_goal_holds(&values) {
            return Err(Suspended);
        }

        state.found.push(combination);
        let model = to_model(&context.problem, &selected);
        debug!("Found intervention model of size {}: {:?}.", model.len(), model);
        Ok(Some(model))
    }
}

/// The successor of `combination`, moving to the next size once the current one is
/// exhausted.
fn advance(context: &EnumerationConfig, count: usize, combination: &[usize]) -> Option<Vec<usize>> {
    if let Some(next) = next_combination(combination.to_vec(), count) {
        return Some(next);
    }
    let size = combination.len() + 1;
    if size > context.problem.limits.max_size {
        return None;
    }
    let next = first_combination(size, count)?;
    info!("Checking interventions of size {}.", size);
    Some(next)
}

/// One value per node and edge, node-fixed variables take no part in edge facts, and
/// the per-kind limits hold.
fn is_admissible(context: &EnumerationConfig, selected: &[Choice]) -> bool {
    let limits = &context.problem.limits;
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for choice in selected {
        match *choice {
            Choice::Node(var, _) => {
                if nodes.contains(&var) {
                    return false;
                }
                nodes.push(var);
            }
            Choice::Edge(source, target, _) => {
                if edges.contains(&(source, target)) {
                    return false;
                }
                edges.push((source, target));
            }
        }
    }
    let node_edge_conflict = edges
        .iter()
        .any(|(source, target)| nodes.contains(source) || nodes.contains(target));
    !node_edge_conflict
        && nodes.len() <= limits.max_nodes.unwrap_or(0)
        && edges.len() <= limits.max_edges.unwrap_or(0)
}

fn to_model(problem: &InterventionProblem, selected: &[Choice]) -> InterventionModel {
    selected
        .iter()
        .map(|choice| match *choice {
            Choice::Node(var, value) => InterventionAtom::Node {
                variable: problem.variables[var].clone(),
                sign: Sign::from(value),
            },
            Choice::Edge(source, target, value) => InterventionAtom::Edge {
                source: problem.variables[source].clone(),
                target: problem.variables[target].clone(),
                sign: Sign::from(value),
            },
        })
        .collect()
}
