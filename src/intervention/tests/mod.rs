use crate::network::{PrimeNetwork, VariablePrimes};
use crate::subspace::Subspace;
use crate::test_utils::mk_network;

mod driver_tests;
mod problem_tests;

fn s<const N: usize>(values: [(&str, bool); N]) -> Subspace {
    Subspace::from(values)
}

/// `v1 = v2` where `v2` is an input.
fn input_driven() -> PrimeNetwork {
    mk_network(vec![
        ("v1", VariablePrimes::literal("v2", true)),
        ("v2", VariablePrimes::input("v2")),
    ])
}

/// A single variable that is constantly `0`.
fn constant_off() -> PrimeNetwork {
    mk_network(vec![("v1", VariablePrimes::constant(false))])
}
