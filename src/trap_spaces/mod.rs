//! Trap spaces of prime-implicant networks and their classification against a target.
//!
//! Trap spaces are enumerated explicitly by [`TrapSpaceEnumeration`]. The remaining
//! functions filter the enumerated trap spaces by kind ([`TrapSpaceKind`]) and select
//! the ones which are acceptable proxies of a target subspace ([`select_trap_spaces`]).

use crate::error::ControlError;
use crate::network::{PrimeNetwork, is_refuted};
use crate::subspace::Subspace;
use cancel_this::{Cancellable, is_cancelled};
use computation_process::{Generator, Stateful};
use log::{debug, info};

mod enumeration;
mod selection;


pub use enumeration::{TrapSpaceState, TrapSpaceStep};
pub use selection::{AttractorEvidence, select_trap_spaces};

/// Enumerates all trap spaces of a [`PrimeNetwork`] (including the trivial empty one).
///
/// Trap spaces are produced in depth-first order over the network variables, with a free
/// variable explored before its fixed values.
pub type TrapSpaceEnumeration = Generator<PrimeNetwork, TrapSpaceState, Subspace, TrapSpaceStep>;

/// Which trap spaces should be reported.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapSpaceKind {
    /// Inclusion-minimal trap spaces.
    Min,
    /// Inclusion-maximal non-trivial trap spaces.
    Max,
    /// Every trap space.
    All,
    /// Trap spaces that are equal to their own percolation.
    #[default]
    Percolated,
}

/// True iff `space` is a trap space of `network`: no variable fixed in `space` has a clause
/// forcing the opposite value which is consistent with `space`.
///
/// Subspaces that reference unknown variables are never trap spaces.
pub fn is_trap_space(network: &PrimeNetwork, space: &Subspace) -> bool {
    if network.validate_subspace(space).is_err() {
        return false;
    }
    let values = network.to_values(space);
    values.iter().enumerate().all(|(var, value)| match value {
        None => true,
        Some(value) => network
            .clauses(var, !*value)
            .iter()
            .all(|clause| is_refuted(clause, &values)),
    })
}

/// Compute all trap spaces of the given `kind`.
pub fn compute_trap_spaces(
    network: &PrimeNetwork,
    kind: TrapSpaceKind,
) -> Cancellable<Vec<Subspace>> {
    let all = collect(TrapSpaceEnumeration::configure(
        network.clone(),
        TrapSpaceState::from(network),
    ))?;
    let result = filter_kind(network, all, kind)?;
    info!("Found {} trap spaces of kind {:?}.", result.len(), kind);
    Ok(result)
}

/// Compute non-trivial trap spaces of the given `kind` which are consistent with `space`,
/// i.e. their intersection with `space` is not empty.
///
/// The kind filter is applied within the family of trap spaces that intersect `space`.
/// At most `max_output` trap spaces are returned. When no non-trivial trap space
/// qualifies, the result is the trivial trap space `[{}]`.
pub fn compute_trap_spaces_intersecting(
    network: &PrimeNetwork,
    space: &Subspace,
    kind: TrapSpaceKind,
    max_output: usize,
) -> Result<Vec<Subspace>, ControlError> {
    network.validate_subspace(space)?;
    let family = collect(TrapSpaceEnumeration::configure(
        network.clone(),
        TrapSpaceState::intersecting(network, space),
    ))?;
    debug!("Found {} trap spaces intersecting {}.", family.len(), space);

    let mut result: Vec<Subspace> = filter_kind(network, family, kind)?
        .into_iter()
        .filter(|it| !it.is_empty())
        .take(max_output)
        .collect();
    if result.is_empty() {
        result.push(Subspace::new());
    }

    info!(
        "Found {} trap spaces of kind {:?} intersecting {}.",
        result.len(),
        kind,
        space
    );
    Ok(result)
}

/// Select trap spaces that can serve as proxies of `target`.
///
/// The candidates are the percolated trap spaces intersecting `target` (at most
/// `max_output` of them), always extended with the trivial trap space. When
/// `evidence.use_attractors` is set and no minimal trap spaces are given, they are
/// computed from the network.
pub fn select_target_trap_spaces(
    network: &PrimeNetwork,
    target: &Subspace,
    evidence: &AttractorEvidence,
    max_output: usize,
) -> Result<Vec<Subspace>, ControlError> {
    let mut candidates =
        compute_trap_spaces_intersecting(network, target, TrapSpaceKind::Percolated, max_output)?;
    if !candidates.iter().any(|it| it.is_empty()) {
        candidates.push(Subspace::new());
    }

    let selected = if evidence.use_attractors && evidence.minimal_trap_spaces.is_none() {
        let minimal = compute_trap_spaces(network, TrapSpaceKind::Min)?;
        let evidence = evidence.clone().with_minimal_trap_spaces(minimal);
        select_trap_spaces(&candidates, target, &evidence)
    } else {
        select_trap_spaces(&candidates, target, evidence)
    };

    info!(
        "Selected {}/{} trap spaces for target {}.",
        selected.len(),
        candidates.len(),
        target
    );
    Ok(selected)
}

fn collect(generator: TrapSpaceEnumeration) -> Cancellable<Vec<Subspace>> {
    let mut result = Vec::new();
    for space in generator {
        result.push(space?);
    }
    Ok(result)
}

fn filter_kind(
    network: &PrimeNetwork,
    spaces: Vec<Subspace>,
    kind: TrapSpaceKind,
) -> Cancellable<Vec<Subspace>> {
    match kind {
        TrapSpaceKind::All => Ok(spaces),
        TrapSpaceKind::Percolated => Ok(spaces
            .into_iter()
            .filter(|it| &network.percolate(it) == it)
            .collect()),
        TrapSpaceKind::Min => {
            // Most fixed first: anything strictly inside a trap space is seen before it.
            keep_extremal(&spaces, |a, b| b.len().cmp(&a.len()), |kept, it| {
                kept.is_included_in(it)
            })
        }
        TrapSpaceKind::Max => {
            let non_trivial: Vec<Subspace> = spaces.into_iter().filter(|it| !it.is_empty()).collect();
            keep_extremal(&non_trivial, |a, b| a.len().cmp(&b.len()), |kept, it| {
                it.is_included_in(kept)
            })
        }
    }
}

/// Keep the trap spaces that are not dominated by any other one, in their original order.
///
/// Spaces are visited in `order`, which must visit every dominating space before the spaces
/// it dominates. Domination is transitive, so each space is only compared with the kept ones.
fn keep_extremal<O, D>(spaces: &[Subspace], order: O, dominates: D) -> Cancellable<Vec<Subspace>>
where
    O: Fn(&Subspace, &Subspace) -> std::cmp::Ordering,
    D: Fn(&Subspace, &Subspace) -> bool,
{
    let mut indices: Vec<usize> = (0..spaces.len()).collect();
    indices.sort_by(|a, b| order(&spaces[*a], &spaces[*b]));

    let mut kept: Vec<usize> = Vec::new();
    for i in indices {
        is_cancelled!()?;
        let space = &spaces[i];
        if !kept.iter().any(|k| dominates(&spaces[*k], space)) {
            kept.push(i);
        }
    }
    kept.sort_unstable();
    Ok(kept.into_iter().map(|i| spaces[i].clone()).collect())
}
