//! Partial assignments of network variables ("subspaces") and the containment relation
//! that every other part of the crate is built on.
//!
//! A [`Subspace`] fixes a subset of variables to `0`/`1` and represents the hypercube of
//! all states that agree with it. The empty subspace is the whole state space. The same
//! type is used for targets, trap spaces, full states and node interventions.

use crate::error::ControlError;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt::{Display, Formatter};


/// An immutable assignment of `bool` values to a subset of network variables.
///
/// Equality and ordering are structural. Values outside of `{0, 1}` cannot be represented;
/// [`Subspace::try_from_values`] rejects them when converting from integer data.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subspace(BTreeMap<String, bool>);

/// A complex (cyclic) attractor, given as the list of its states.
///
/// The order of states is immaterial. For containment purposes, every state is treated as
/// a point subspace.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexAttractor(Vec<Subspace>);

impl Subspace {
    /// The empty subspace, i.e. the whole state space.
    pub fn new() -> Subspace {
        Subspace::default()
    }

    /// Build a subspace from integer values, checking that every value is `0` or `1` and
    /// that no variable is listed twice with different values.
    pub fn try_from_values<I, S>(values: I) -> Result<Subspace, ControlError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut result = BTreeMap::new();
        for (variable, value) in values {
            let variable = variable.into();
            let value = match value {
                0 => false,
                1 => true,
                _ => return Err(ControlError::InvalidValue { variable, value }),
            };
            match result.entry(variable) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(entry) => {
                    if *entry.get() != value {
                        return Err(ControlError::ConflictingNodeIntervention(
                            entry.key().clone(),
                        ));
                    }
                }
            }
        }
        Ok(Subspace(result))
    }

    /// The number of fixed variables. For a node intervention, this is its size.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, variable: &str) -> Option<bool> {
        self.0.get(variable).cloned()
    }

    pub fn contains_variable(&self, variable: &str) -> bool {
        self.0.contains_key(variable)
    }

    /// Iterate over `(variable, value)` pairs in variable name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|it| it.as_str())
    }

    /// A copy of this subspace with `variable` additionally fixed to `value` (the previous
    /// value of `variable`, if any, is replaced).
    pub fn with(&self, variable: &str, value: bool) -> Subspace {
        let mut result = self.0.clone();
        result.insert(variable.to_string(), value);
        Subspace(result)
    }

    /// True iff every variable fixed in `other` is also fixed in `self` to the same value.
    ///
    /// Geometrically, the hypercube of `self` is a subset of the hypercube of `other`. The
    /// relation is not symmetric: `self` may fix additional variables. Callers always pass
    /// the subject first and the reference second.
    pub fn is_included_in(&self, other: &Subspace) -> bool {
        other
            .0
            .iter()
            .all(|(variable, value)| self.0.get(variable) == Some(value))
    }

    /// True iff no variable is fixed to opposite values in `self` and `other`, i.e. the two
    /// hypercubes intersect.
    pub fn is_consistent_with(&self, other: &Subspace) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .0
            .iter()
            .all(|(variable, value)| large.0.get(variable).is_none_or(|it| it == value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Subspace {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Subspace(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[(S, bool); N]> for Subspace {
    fn from(value: [(S, bool); N]) -> Self {
        Subspace::from_iter(value)
    }
}

impl Display for Subspace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (variable, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", variable, u8::from(value))?;
        }
        write!(f, "}}")
    }
}

impl ComplexAttractor {
    pub fn new(states: Vec<Subspace>) -> ComplexAttractor {
        ComplexAttractor(states)
    }

    pub fn states(&self) -> &[Subspace] {
        &self.0
    }

    /// True iff every state of this attractor lies in `space`.
    pub fn is_included_in(&self, space: &Subspace) -> bool {
        self.0.iter().all(|state| state.is_included_in(space))
    }

    /// True iff at least one state of this attractor lies in `space`.
    pub fn intersects(&self, space: &Subspace) -> bool {
        self.0.iter().any(|state| state.is_included_in(space))
    }
}

impl From<Vec<Subspace>> for ComplexAttractor {
    fn from(value: Vec<Subspace>) -> Self {
        ComplexAttractor::new(value)
    }
}
