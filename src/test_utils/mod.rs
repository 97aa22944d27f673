//! Small hand-written networks shared by the unit tests.
//!
//! All networks are given directly by their prime implicants so that the tests do not
//! depend on any model parser.

use crate::network::{PrimeNetwork, VariablePrimes};
use crate::subspace::Subspace;

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

pub fn mk_network(variables: Vec<(&str, VariablePrimes)>) -> PrimeNetwork {
    let variables = variables
        .into_iter()
        .map(|(name, primes)| (name.to_string(), primes))
        .collect();
    PrimeNetwork::try_new(variables).expect("Invalid test network")
}

/// A single variable `v1` with constant update function `v1 = 1`.
pub fn constant_source() -> PrimeNetwork {
    mk_network(vec![("v1", VariablePrimes::constant(true))])
}

/// Two variables that activate each other: `v1 = v2`, `v2 = v1`.
pub fn mutual_activation() -> PrimeNetwork {
    mk_network(vec![
        ("v1", VariablePrimes::literal("v2", true)),
        ("v2", VariablePrimes::literal("v1", true)),
    ])
}

/// A linear cascade driven by an input: `a = a`, `b = a`, `c = b`.
///
/// Trap spaces: `{}`, `{a=0}`, `{a=1}`, `{a=0, b=0}`, `{a=1, b=1}`, `{a=0, b=0, c=0}` and
/// `{a=1, b=1, c=1}`. The last two are the minimal trap spaces (fixed points).
pub fn cascade() -> PrimeNetwork {
    mk_network(vec![
        ("a", VariablePrimes::input("a")),
        ("b", VariablePrimes::literal("a", true)),
        ("c", VariablePrimes::literal("b", true)),
    ])
}

/// A negative feedback loop `x = !y`, `y = x` with a read-out `z = x & y`.
///
/// The only trap space is `{}`; the loop forms a complex attractor in which `z` oscillates
/// between values.
pub fn negative_loop() -> PrimeNetwork {
    mk_network(vec![
        ("x", VariablePrimes::literal("y", false)),
        ("y", VariablePrimes::literal("x", true)),
        (
            "z",
            VariablePrimes::new(
                vec![Subspace::from([("x", false)]), Subspace::from([("y", false)])],
                vec![Subspace::from([("x", true), ("y", true)])],
            ),
        ),
    ])
}
