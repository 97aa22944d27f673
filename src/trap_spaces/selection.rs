use crate::subspace::{ComplexAttractor, Subspace};
use log::debug;

/// Known long-term behaviour of the network which can widen the trap space selection.
///
/// By default, no evidence is used and the selection is a plain containment filter.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttractorEvidence {
    pub use_attractors: bool,
    /// Minimal trap spaces of the network. `None` means "not known yet" (they can be
    /// computed on demand, see [`super::select_target_trap_spaces`]).
    pub minimal_trap_spaces: Option<Vec<Subspace>>,
    pub complex_attractors: Vec<ComplexAttractor>,
}

impl AttractorEvidence {
    /// Evidence that is never used.
    pub fn disabled() -> AttractorEvidence {
        AttractorEvidence::default()
    }

    pub fn new(
        minimal_trap_spaces: Vec<Subspace>,
        complex_attractors: Vec<ComplexAttractor>,
    ) -> AttractorEvidence {
        AttractorEvidence {
            use_attractors: true,
            minimal_trap_spaces: Some(minimal_trap_spaces),
            complex_attractors,
        }
    }

    /// Use the given complex attractors and compute minimal trap spaces when needed.
    pub fn from_attractors(complex_attractors: Vec<ComplexAttractor>) -> AttractorEvidence {
        AttractorEvidence {
            use_attractors: true,
            minimal_trap_spaces: None,
            complex_attractors,
        }
    }

    pub fn with_minimal_trap_spaces(mut self, minimal_trap_spaces: Vec<Subspace>) -> Self {
        self.minimal_trap_spaces = Some(minimal_trap_spaces);
        self
    }
}

impl From<Vec<ComplexAttractor>> for AttractorEvidence {
    fn from(value: Vec<ComplexAttractor>) -> Self {
        AttractorEvidence::from_attractors(value)
    }
}

/// Select the trap spaces of `trap_spaces` which are acceptable proxies of `target`.
///
/// A trap space inside `target` is always accepted. With attractor evidence, a trap space
/// outside of `target` is also accepted when it contains a minimal trap space or an
/// attractor state inside `target`, and no minimal trap space or attractor state outside
/// of it. If the evidence contains nothing outside of `target`, every trap space is
/// accepted. If it contains nothing inside of `target`, it is ignored.
///
/// The directly accepted trap spaces come first, in input order, followed by the ones
/// accepted through evidence.
pub fn select_trap_spaces(
    trap_spaces: &[Subspace],
    target: &Subspace,
    evidence: &AttractorEvidence,
) -> Vec<Subspace> {
    let (mut accepted, rest): (Vec<&Subspace>, Vec<&Subspace>) = trap_spaces
        .iter()
        .partition(|it| it.is_included_in(target));

    if !evidence.use_attractors {
        return accepted.into_iter().cloned().collect();
    }

    let minimal = evidence.minimal_trap_spaces.as_deref().unwrap_or(&[]);
    let (min_in, min_out): (Vec<&Subspace>, Vec<&Subspace>) =
        minimal.iter().partition(|it| it.is_included_in(target));
    let (attr_in, attr_out): (Vec<&ComplexAttractor>, Vec<&ComplexAttractor>) = evidence
        .complex_attractors
        .iter()
        .partition(|it| it.is_included_in(target));

    debug!(
        "Attractor evidence: {}/{} minimal trap spaces and {}/{} complex attractors inside target.",
        min_in.len(),
        minimal.len(),
        attr_in.len(),
        evidence.complex_attractors.len()
    );

    if min_in.is_empty() && attr_in.is_empty() {
        return accepted.into_iter().cloned().collect();
    }

    if min_out.is_empty() && attr_out.is_empty() {
        return trap_spaces.to_vec();
    }

    for space in rest {
        let positive = min_in.iter().any(|it| it.is_included_in(space))
            || attr_in.iter().any(|it| it.intersects(space));
        let negative = min_out.iter().any(|it| it.is_included_in(space))
            || attr_out.iter().any(|it| it.intersects(space));
        if positive && !negative {
            debug!("Trap space {} accepted through attractor evidence.", space);
            accepted.push(space);
        }
    }

    accepted.into_iter().cloned().collect()
}
