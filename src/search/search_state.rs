use crate::subspace::Subspace;

/// The accumulator of a search together with its enumeration cursor.
///
/// The accumulator can be seeded with strategies found earlier (e.g. by a search with a
/// smaller size range); these are never removed and take part in the subsumption check.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchState {
    pub strategies: Vec<Subspace>,
    pub(crate) cursor: Cursor,
}

/// Position of the search in the candidate enumeration.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) enum Cursor {
    #[default]
    Start,
    /// The next combination of candidate indices (ascending) to examine.
    At(Vec<usize>),
    Done,
}

impl From<Vec<Subspace>> for SearchState {
    fn from(value: Vec<Subspace>) -> Self {
        SearchState {
            strategies: value,
            cursor: Cursor::Start,
        }
    }
}

impl From<&[Subspace]> for SearchState {
    fn from(value: &[Subspace]) -> Self {
        SearchState::from(value.to_vec())
    }
}

impl From<SearchState> for Vec<Subspace> {
    fn from(value: SearchState) -> Self {
        value.strategies
    }
}

/// The first combination of `size` out of `count` elements, if there is one.
pub(crate) fn first_combination(size: usize, count: usize) -> Option<Vec<usize>> {
    (size <= count).then(|| (0..size).collect())
}

/// Advance `combination` to its lexicographic successor among `count` elements.
pub(crate) fn next_combination(mut combination: Vec<usize>, count: usize) -> Option<Vec<usize>> {
    let size = combination.len();
    let position = (0..size).rev().find(|i| combination[*i] < count - size + i)?;
    combination[position] += 1;
    for i in (position + 1)..size {
        combination[i] = combination[i - 1] + 1;
    }
    Some(combination)
}
