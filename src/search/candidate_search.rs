use crate::search::search_state::{Cursor, first_combination, next_combination};
use crate::search::{AcceptanceRule, SearchConfig, SearchState};
use crate::simple_type_name;
use crate::subspace::Subspace;
use cancel_this::is_cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, ComputationStep};
use log::{debug, info, trace};
use std::marker::PhantomData;

/// A [`ComputationStep`] which enumerates candidate interventions of increasing size and
/// collects the ones accepted by the [`AcceptanceRule`] `R` into the current `state`.
///
/// Each step examines one combination of candidate variables with all of its value
/// assignments. A candidate that fixes everything some already accepted strategy fixes is
/// skipped without being evaluated.
pub struct CandidateSearch<R: AcceptanceRule>(PhantomData<R>);

impl<R: AcceptanceRule> ComputationStep<SearchConfig, SearchState, Vec<Subspace>>
    for CandidateSearch<R>
{
    fn step(context: &SearchConfig, state: &mut SearchState) -> Completable<Vec<Subspace>> {
        is_cancelled!()?;

        let count = context.candidates.len();
        let combination = match std::mem::replace(&mut state.cursor, Cursor::Done) {
            Cursor::Done => return Ok(state.strategies.clone()),
            Cursor::Start => {
                let first = (context.min_size <= context.max_size)
                    .then(|| first_combination(context.min_size, count))
                    .flatten();
                let Some(first) = first else {
                    return finish::<R>(state);
                };
                info!(
                    "Search<{}> checking control strategies of size {}.",
                    simple_type_name::<R>(),
                    first.len()
                );
                first
            }
            Cursor::At(combination) => combination,
        };

        examine::<R>(context, state, &combination);

        let size = combination.len();
        if let Some(next) = next_combination(combination, count) {
            state.cursor = Cursor::At(next);
            return Err(Suspended);
        }

        match (size < context.max_size)
            .then(|| first_combination(size + 1, count))
            .flatten()
        {
            Some(next) => {
                info!(
                    "Search<{}> checking control strategies of size {}; {} found so far.",
                    simple_type_name::<R>(),
                    next.len(),
                    state.strategies.len()
                );
                state.cursor = Cursor::At(next);
                Err(Suspended)
            }
            None => finish::<R>(state),
        }
    }
}

fn finish<R: AcceptanceRule>(state: &mut SearchState) -> Completable<Vec<Subspace>> {
    state.cursor = Cursor::Done;
    info!(
        "Search<{}> finished with {} control strategies.",
        simple_type_name::<R>(),
        state.strategies.len()
    );
    Ok(state.strategies.clone())
}

/// Evaluate every value assignment of the variables in `combination` (last variable
/// changes fastest).
fn examine<R: AcceptanceRule>(context: &SearchConfig, state: &mut SearchState, combination: &[usize]) {
    let variables: Vec<&(String, Vec<bool>)> =
        combination.iter().map(|i| &context.candidates[*i]).collect();
    let mut digits = vec![0usize; variables.len()];
    loop {
        let candidate: Subspace = variables
            .iter()
            .zip(&digits)
            .map(|((var, values), digit)| (var.as_str(), values[*digit]))
            .collect();

        if state
            .strategies
            .iter()
            .any(|accepted| candidate.is_included_in(accepted))
        {
            trace!("Candidate {} is subsumed.", candidate);
        } else {
            let percolation = context.network.percolate(&candidate);
            if R::accepts(context, &candidate, &percolation) {
                debug!(
                    "Intervention {} accepted; percolation: {}.",
                    candidate, percolation
                );
                state.strategies.push(candidate);
            } else {
                trace!("Intervention {} rejected; percolation: {}.", candidate, percolation);
            }
        }

        // Advance the odometer; stop once every position wrapped around.
        let mut position = variables.len();
        loop {
            if position == 0 {
                return;
            }
            position -= 1;
            digits[position] += 1;
            if digits[position] < variables[position].1.len() {
                break;
            }
            digits[position] = 0;
        }
    }
}
