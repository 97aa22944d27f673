use crate::error::ControlError;
use crate::network::PrimeNetwork;
use crate::subspace::Subspace;
use std::collections::BTreeSet;

/// A "flat" configuration object shared by the percolation-based searches.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    pub network: PrimeNetwork,
    /// The subspace that the network should be driven into.
    pub target: Subspace,
    /// Variables that can never be part of an intervention (default: empty).
    pub avoid_nodes: BTreeSet<String>,
    /// The candidate universe: variables (in enumeration order) and the values they can be
    /// fixed to (default: every variable with values `[0, 1]`).
    pub candidates: Vec<(String, Vec<bool>)>,
    /// Trap spaces used to decide acceptance in the trap space guided search (default: empty).
    pub trap_spaces: Vec<Subspace>,
    /// Smallest intervention size to examine (default: `0`).
    pub min_size: usize,
    /// Largest intervention size to examine, inclusive (default: `3`).
    pub max_size: usize,
}

impl SearchConfig {
    /// Create a new [`SearchConfig`] that examines every network variable.
    ///
    /// Fails if `target` references variables that are not in the `network`.
    pub fn try_new(network: PrimeNetwork, target: Subspace) -> Result<SearchConfig, ControlError> {
        network.validate_subspace(&target)?;
        let candidates = network
            .variables()
            .iter()
            .map(|it| (it.clone(), vec![false, true]))
            .collect();
        Ok(SearchConfig {
            network,
            target,
            avoid_nodes: BTreeSet::new(),
            candidates,
            trap_spaces: Vec::new(),
            min_size: 0,
            max_size: 3,
        })
    }

    /// Exclude the given variables from all interventions.
    pub fn avoid_nodes<I, S>(mut self, nodes: I) -> Result<SearchConfig, ControlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            self.network.validate_variable(node)?;
            self.avoid_nodes.insert(node.to_string());
        }
        let avoid = &self.avoid_nodes;
        self.candidates.retain(|(var, _)| !avoid.contains(var));
        Ok(self)
    }

    pub fn with_size_range(mut self, min_size: usize, max_size: usize) -> SearchConfig {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Restrict the candidate universe to the values observed in the `selected` trap spaces
    /// and use them to decide acceptance.
    ///
    /// Variables and values are kept in the order in which they first appear. Avoided
    /// variables are skipped.
    pub fn restrict_to_trap_spaces(mut self, selected: Vec<Subspace>) -> SearchConfig {
        let mut candidates: Vec<(String, Vec<bool>)> = Vec::new();
        for space in &selected {
            for (var, value) in space.iter() {
                if self.avoid_nodes.contains(var) {
                    continue;
                }
                match candidates.iter_mut().find(|(it, _)| it == var) {
                    Some((_, values)) if !values.contains(&value) => values.push(value),
                    Some(_) => (),
                    None => candidates.push((var.to_string(), vec![value])),
                }
            }
        }
        self.candidates = candidates;
        self.trap_spaces = selected;
        self
    }
}
