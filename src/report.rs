//! Human-readable summaries of control strategies.

use crate::intervention::ControlStrategy;
use crate::subspace::Subspace;
use std::collections::BTreeMap;

/// Anything with a well-defined intervention size.
pub trait Intervention {
    fn size(&self) -> usize;
}

impl Intervention for Subspace {
    fn size(&self) -> usize {
        self.len()
    }
}

impl Intervention for ControlStrategy {
    fn size(&self) -> usize {
        self.len()
    }
}

/// Count the strategies per size, e.g. `"2 control strategies, 1 of size 1, 1 of size 2"`.
pub fn summarize<T: Intervention>(strategies: &[T]) -> String {
    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for strategy in strategies {
        *sizes.entry(strategy.size()).or_default() += 1;
    }
    let mut text = format!("{} control strategies", strategies.len());
    for (size, count) in sizes {
        text.push_str(&format!(", {count} of size {size}"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::summarize;
    use crate::intervention::{ControlStrategy, EdgeFact};
    use crate::subspace::Subspace;

    #[test]
    fn summary_groups_by_size() {
        let strategies = vec![
            Subspace::from([("v1", true)]),
            Subspace::from([("v2", false), ("v3", true)]),
        ];
        assert_eq!(
            summarize(&strategies),
            "2 control strategies, 1 of size 1, 1 of size 2"
        );
    }

    #[test]
    fn summary_of_nothing() {
        assert_eq!(summarize::<Subspace>(&[]), "0 control strategies");
        assert_eq!(
            summarize(&[Subspace::new()]),
            "1 control strategies, 1 of size 0"
        );
    }

    #[test]
    fn edges_count_towards_size() {
        let mut combined = ControlStrategy::from(Subspace::from([("a", true)]));
        combined
            .insert_edge(EdgeFact::new("b", "c", false))
            .unwrap();
        let strategies = vec![
            combined,
            ControlStrategy::from(Subspace::from([("c", true)])),
            ControlStrategy::from(Subspace::from([("b", true)])),
        ];
        assert_eq!(
            summarize(&strategies),
            "3 control strategies, 2 of size 1, 1 of size 2"
        );
    }
}
