use crate::network::{PrimeNetwork, is_refuted};
use crate::subspace::Subspace;
use cancel_this::is_cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, GeneratorStep};
use log::{debug, trace};

/// Internal state of the trap space enumeration.
///
/// The enumeration is a depth-first search over partial assignments in which every
/// variable (in network order) is either left free, or fixed to `0` or `1`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapSpaceState {
    /// For every variable, the value it must never be fixed to (if any). This restricts
    /// the enumeration to trap spaces that intersect a given subspace.
    forbidden: Vec<Option<bool>>,
    stack: Vec<Frame>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Frame {
    /// Variables `0..depth` are decided (fixed or free), the rest is undecided.
    depth: usize,
    values: Vec<Option<bool>>,
}

/// Step implementation of the trap space enumeration. Each step processes one partial
/// assignment and yields it once it is complete and trapped.
pub struct TrapSpaceStep;

impl From<&PrimeNetwork> for TrapSpaceState {
    fn from(value: &PrimeNetwork) -> Self {
        TrapSpaceState {
            forbidden: vec![None; value.num_vars()],
            stack: vec![Frame {
                depth: 0,
                values: vec![None; value.num_vars()],
            }],
        }
    }
}

impl TrapSpaceState {
    /// Only enumerate trap spaces that are consistent with (intersect) `space`.
    pub fn intersecting(network: &PrimeNetwork, space: &Subspace) -> TrapSpaceState {
        let mut state = TrapSpaceState::from(network);
        for (var, value) in network.to_values(space).into_iter().enumerate() {
            state.forbidden[var] = value.map(|it| !it);
        }
        state
    }
}

impl GeneratorStep<PrimeNetwork, TrapSpaceState, Subspace> for TrapSpaceStep {
    fn step(context: &PrimeNetwork, state: &mut TrapSpaceState) -> Completable<Option<Subspace>> {
        is_cancelled!()?;

        let Some(frame) = state.stack.pop() else {
            debug!("Trap space enumeration finished.");
            return Ok(None);
        };

        if has_decided_conflict(context, &frame) {
            trace!("Partial assignment pruned at depth {}.", frame.depth);
            return Err(Suspended);
        }

        if frame.depth == context.num_vars() {
            let space = context.from_values(&frame.values);
            trace!("Found trap space {}.", space);
            return Ok(Some(space));
        }

        // Children are pushed in reverse so that the "free" branch is explored first.
        let var = frame.depth;
        for value in [Some(true), Some(false), None] {
            if value.is_some() && value == state.forbidden[var] {
                continue;
            }
            let mut values = frame.values.clone();
            values[var] = value;
            state.stack.push(Frame {
                depth: frame.depth + 1,
                values,
            });
        }

        Err(Suspended)
    }
}

/// A fixed variable whose opposite clause is consistent with the assignment and only
/// depends on decided variables can never become trapped.
fn has_decided_conflict(network: &PrimeNetwork, frame: &Frame) -> bool {
    (0..frame.depth).any(|var| {
        let Some(value) = frame.values[var] else {
            return false;
        };
        network.clauses(var, !value).iter().any(|clause| {
            clause.iter().all(|(regulator, _)| *regulator < frame.depth)
                && !is_refuted(clause, &frame.values)
        })
    })
}
