use crate::error::ControlError;
use crate::subspace::Subspace;
use std::fmt::{Display, Formatter};

/// A regulatory edge `source -> target` whose occurrences are forced to `value`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeFact {
    pub source: String,
    pub target: String,
    pub value: bool,
}

impl EdgeFact {
    pub fn new(source: &str, target: &str, value: bool) -> EdgeFact {
        EdgeFact {
            source: source.to_string(),
            target: target.to_string(),
            value,
        }
    }
}

/// A combined node and edge intervention.
///
/// Node facts fix variables, edge facts fix regulations. Each variable and each edge
/// carries at most one value, and a node-fixed variable never takes part in an edge fact.
/// Edge facts are kept sorted, so equality is structural.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlStrategy {
    nodes: Subspace,
    edges: Vec<EdgeFact>,
}

impl ControlStrategy {
    /// The empty intervention.
    pub fn new() -> ControlStrategy {
        ControlStrategy::default()
    }

    pub fn nodes(&self) -> &Subspace {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeFact] {
        &self.edges
    }

    /// Number of node and edge facts.
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a node fact. Repeating an existing fact has no effect.
    pub fn insert_node(&mut self, variable: &str, value: bool) -> Result<(), ControlError> {
        match self.nodes.get(variable) {
            Some(current) if current == value => return Ok(()),
            Some(_) => return Err(ControlError::ConflictingNodeIntervention(variable.to_string())),
            None => (),
        }
        if let Some(edge) = self.find_edge_of(variable) {
            return Err(ControlError::NodeEdgeConflict {
                variable: variable.to_string(),
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
        self.nodes = self.nodes.with(variable, value);
        Ok(())
    }

    /// Add an edge fact. Repeating an existing fact has no effect.
    pub fn insert_edge(&mut self, fact: EdgeFact) -> Result<(), ControlError> {
        for variable in [&fact.source, &fact.target] {
            if self.nodes.contains_variable(variable) {
                return Err(ControlError::NodeEdgeConflict {
                    variable: variable.clone(),
                    source: fact.source.clone(),
                    target: fact.target.clone(),
                });
            }
        }
        let key = |it: &EdgeFact| (it.source.clone(), it.target.clone());
        match self.edges.binary_search_by_key(&key(&fact), key) {
            Ok(i) if self.edges[i].value == fact.value => Ok(()),
            Ok(_) => Err(ControlError::ConflictingEdgeIntervention {
                source: fact.source,
                target: fact.target,
            }),
            Err(i) => {
                self.edges.insert(i, fact);
                Ok(())
            }
        }
    }

    fn find_edge_of(&self, variable: &str) -> Option<&EdgeFact> {
        self.edges
            .iter()
            .find(|it| it.source == variable || it.target == variable)
    }
}

impl From<Subspace> for ControlStrategy {
    fn from(value: Subspace) -> Self {
        ControlStrategy {
            nodes: value,
            edges: Vec::new(),
        }
    }
}

impl Display for ControlStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        let nodes = self
            .nodes
            .iter()
            .map(|(var, value)| format!("{}={}", var, u8::from(value)));
        let edges = self
            .edges
            .iter()
            .map(|it| format!("{}->{}={}", it.source, it.target, u8::from(it.value)));
        for (i, fact) in nodes.chain(edges).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", fact)?;
        }
        write!(f, "}}")
    }
}
