use crate::error::ControlError;
use crate::network::{PrimeNetwork, VariablePrimes};
use crate::subspace::Subspace;
use crate::test_utils::{cascade, constant_source, init_logger, mutual_activation};

fn sorted(mut spaces: Vec<Subspace>) -> Vec<Subspace> {
    spaces.sort();
    spaces
}

#[test]
fn constant_source_percolates_from_nothing() {
    init_logger();
    let network = constant_source();
    assert_eq!(
        network.percolate(&Subspace::new()),
        Subspace::from([("v1", true)])
    );
}

#[test]
fn percolation_follows_the_cascade() {
    init_logger();
    let network = cascade();
    assert_eq!(network.percolate(&Subspace::new()), Subspace::new());
    assert_eq!(
        network.percolate(&Subspace::from([("a", true)])),
        Subspace::from([("a", true), ("b", true), ("c", true)])
    );
    assert_eq!(
        network.percolate(&Subspace::from([("b", false)])),
        Subspace::from([("b", false), ("c", false)])
    );
}

#[test]
fn percolation_keeps_fixed_values() {
    // `b` follows `a`, but a fixed `b` is never overwritten by percolation.
    let network = cascade();
    let space = Subspace::from([("a", true), ("b", false)]);
    assert_eq!(
        network.percolate(&space),
        Subspace::from([("a", true), ("b", false), ("c", false)])
    );
}

#[test]
fn percolation_is_idempotent() {
    init_logger();
    let network = mutual_activation();
    let candidates = [
        Subspace::new(),
        Subspace::from([("v1", true)]),
        Subspace::from([("v2", false)]),
        Subspace::from([("v1", true), ("v2", false)]),
    ];
    for space in candidates {
        let once = network.percolate(&space);
        assert_eq!(network.percolate(&once), once);
        assert!(once.is_included_in(&space));
    }
}

#[test]
fn invalid_networks_are_rejected() {
    let duplicate = PrimeNetwork::try_new(vec![
        ("a".to_string(), VariablePrimes::input("a")),
        ("a".to_string(), VariablePrimes::constant(true)),
    ]);
    assert_eq!(
        duplicate.unwrap_err(),
        ControlError::DuplicateVariable("a".to_string())
    );

    let unknown = PrimeNetwork::try_new(vec![("a".to_string(), VariablePrimes::literal("b", true))]);
    assert_eq!(
        unknown.unwrap_err(),
        ControlError::UnknownVariable("b".to_string())
    );

    let inconsistent = PrimeNetwork::try_new(vec![
        ("a".to_string(), VariablePrimes::input("a")),
        (
            "b".to_string(),
            VariablePrimes::new(
                vec![Subspace::from([("a", true)])],
                vec![Subspace::new()],
            ),
        ),
    ]);
    assert_eq!(
        inconsistent.unwrap_err(),
        ControlError::InconsistentPrimes("b".to_string())
    );
}

#[test]
fn subspaces_are_validated_against_network() {
    let network = cascade();
    assert!(network.validate_subspace(&Subspace::from([("a", true)])).is_ok());
    assert_eq!(
        network.validate_subspace(&Subspace::from([("a", true), ("z", false)])),
        Err(ControlError::UnknownVariable("z".to_string()))
    );
}

#[test]
fn primes_are_derived_from_bnet() {
    init_logger();
    let network = PrimeNetwork::try_from_bnet(
        "targets, factors\na, a\nb, a | c\nc, !a & b\n",
    )
    .unwrap();
    assert_eq!(network.num_vars(), 3);

    let b = network.primes("b").unwrap();
    assert_eq!(
        sorted(b.on),
        vec![Subspace::from([("a", true)]), Subspace::from([("c", true)])]
    );
    assert_eq!(b.off, vec![Subspace::from([("a", false), ("c", false)])]);

    let c = network.primes("c").unwrap();
    assert_eq!(c.on, vec![Subspace::from([("a", false), ("b", true)])]);
    assert_eq!(
        sorted(c.off),
        vec![Subspace::from([("a", true)]), Subspace::from([("b", false)])]
    );

    let a = network.primes("a").unwrap();
    assert_eq!(a, VariablePrimes::input("a"));

    let c = network.find_variable("c").unwrap();
    let regulators: Vec<&str> = network
        .regulators(c)
        .into_iter()
        .map(|it| network.get_variable_name(it))
        .collect();
    assert_eq!(regulators.len(), 2);
    assert!(regulators.contains(&"a") && regulators.contains(&"b"));
}
