//! Percolation-driven searches for node interventions.
//!
//! Both searches enumerate candidate interventions (partial assignments of candidate
//! variables) by increasing size, lexicographically within one size, and collect the
//! accepted ones. Once a strategy is accepted, every candidate that fixes at least the
//! same values is skipped, so larger redundant interventions are never reported after a
//! smaller one.
//!
//! - [`PercolationSearch`]: accepts a candidate iff its percolation lies in the target.
//! - [`TrapSpaceSearch`]: the candidate universe is restricted to values observed in
//!   selected trap spaces, and a candidate is accepted iff it lies in one of the selected
//!   trap spaces and its percolation stays inside that same trap space.
//!
//! # Example
//!
//! ```no_run
//! use biodivine_control_strategies::network::PrimeNetwork;
//! use biodivine_control_strategies::search::{SearchConfig, search_percolation_only};
//! use biodivine_control_strategies::subspace::Subspace;
//!
//! let network = PrimeNetwork::try_from_file("model.bnet").unwrap();
//! let target = Subspace::from([("Apoptosis", true)]);
//! let config = SearchConfig::try_new(network, target).unwrap().with_size_range(0, 2);
//! let strategies = search_percolation_only(config, Vec::new()).unwrap();
//! ```

use crate::error::ControlError;
use crate::subspace::Subspace;
use crate::trap_spaces::{AttractorEvidence, select_target_trap_spaces};
use cancel_this::Cancellable;
use computation_process::{Algorithm, Computation};

mod candidate_search;
mod search_config;
mod search_state;

#[cfg(test)]
mod tests;

pub use candidate_search::CandidateSearch;
pub use search_config::SearchConfig;
pub use search_state::SearchState;
pub(crate) use search_state::{first_combination, next_combination};

/// Decides whether a candidate intervention is a control strategy.
pub trait AcceptanceRule: 'static {
    fn accepts(context: &SearchConfig, candidate: &Subspace, percolation: &Subspace) -> bool;
}

/// The percolation of the candidate lies in the target.
pub struct PercolatesToTarget;

/// Some selected trap space lies in the candidate and contains its percolation.
pub struct PercolatesToTrapSpace;

impl AcceptanceRule for PercolatesToTarget {
    fn accepts(context: &SearchConfig, _candidate: &Subspace, percolation: &Subspace) -> bool {
        percolation.is_included_in(&context.target)
    }
}

impl AcceptanceRule for PercolatesToTrapSpace {
    fn accepts(context: &SearchConfig, candidate: &Subspace, percolation: &Subspace) -> bool {
        context
            .trap_spaces
            .iter()
            .any(|space| space.is_included_in(candidate) && percolation.is_included_in(space))
    }
}

/// A helper alias for searches over [`SearchConfig`] and [`SearchState`].
pub type SearchComputation<RULE> =
    Computation<SearchConfig, SearchState, Vec<Subspace>, CandidateSearch<RULE>>;

/// Search for interventions whose percolation lies in the target.
pub type PercolationSearch = SearchComputation<PercolatesToTarget>;

/// Search for interventions that percolate into a selected trap space. The configuration
/// must be prepared using [`SearchConfig::restrict_to_trap_spaces`].
pub type TrapSpaceSearch = SearchComputation<PercolatesToTrapSpace>;

/// Run the [`PercolationSearch`], extending the `previous` strategies.
pub fn search_percolation_only(
    config: SearchConfig,
    previous: Vec<Subspace>,
) -> Cancellable<Vec<Subspace>> {
    PercolationSearch::run(config, previous)
}

/// Select target trap spaces (see [`select_target_trap_spaces`]) and run the
/// [`TrapSpaceSearch`] restricted to them, extending the `previous` strategies.
pub fn search_via_trap_spaces(
    config: SearchConfig,
    evidence: &AttractorEvidence,
    max_trap_spaces: usize,
    previous: Vec<Subspace>,
) -> Result<Vec<Subspace>, ControlError> {
    let selected =
        select_target_trap_spaces(&config.network, &config.target, evidence, max_trap_spaces)?;
    let config = config.restrict_to_trap_spaces(selected);
    Ok(TrapSpaceSearch::run(config, previous)?)
}
