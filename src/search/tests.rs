use crate::error::ControlError;
use crate::search::{
    PercolationSearch, SearchConfig, SearchState, TrapSpaceSearch, search_percolation_only,
    search_via_trap_spaces,
};
use crate::subspace::Subspace;
use crate::test_utils::{cascade, constant_source, init_logger, mutual_activation};
use crate::trap_spaces::AttractorEvidence;
use cancel_this::Cancellable;
use computation_process::{Algorithm, Computable, Stateful};

fn s<const N: usize>(values: [(&str, bool); N]) -> Subspace {
    Subspace::from(values)
}

#[test]
fn constant_source_needs_no_intervention() -> Cancellable<()> {
    init_logger();
    let config = SearchConfig::try_new(constant_source(), s([("v1", true)]))
        .unwrap()
        .with_size_range(0, 0);
    assert_eq!(search_percolation_only(config, Vec::new())?, vec![s([])]);
    Ok(())
}

#[test]
fn empty_strategy_subsumes_everything() -> Cancellable<()> {
    init_logger();
    let config = SearchConfig::try_new(constant_source(), s([("v1", true)]))
        .unwrap()
        .with_size_range(0, 3);
    assert_eq!(search_percolation_only(config, Vec::new())?, vec![s([])]);
    Ok(())
}

#[test]
fn mutual_activation_strategies() -> Cancellable<()> {
    init_logger();
    let target = s([("v1", true), ("v2", true)]);
    let config = SearchConfig::try_new(mutual_activation(), target)
        .unwrap()
        .with_size_range(0, 1);
    let expected = vec![s([("v1", true)]), s([("v2", true)])];
    assert_eq!(search_percolation_only(config.clone(), Vec::new())?, expected);

    // `{v1=1, v2=1}` is a superset of both and is never reported.
    let config = config.with_size_range(0, 2);
    assert_eq!(search_percolation_only(config, Vec::new())?, expected);
    Ok(())
}

#[test]
fn cascade_strategies() -> Cancellable<()> {
    init_logger();
    let config = SearchConfig::try_new(cascade(), s([("c", true)])).unwrap();
    assert_eq!(
        search_percolation_only(config.clone(), Vec::new())?,
        vec![s([("a", true)]), s([("b", true)]), s([("c", true)])]
    );

    let avoiding = config.avoid_nodes(["a"]).unwrap();
    assert_eq!(
        search_percolation_only(avoiding, Vec::new())?,
        vec![s([("b", true)]), s([("c", true)])]
    );
    Ok(())
}

#[test]
fn previous_strategies_are_extended() -> Cancellable<()> {
    init_logger();
    let config = SearchConfig::try_new(cascade(), s([("c", true)]))
        .unwrap()
        .with_size_range(1, 1);
    let previous = vec![s([("a", true)])];
    assert_eq!(
        search_percolation_only(config.clone(), previous.clone())?,
        vec![s([("a", true)]), s([("b", true)]), s([("c", true)])]
    );

    // An empty size range leaves the accumulator untouched.
    let empty = config.with_size_range(2, 1);
    assert_eq!(search_percolation_only(empty, previous.clone())?, previous);
    Ok(())
}

#[test]
fn trap_space_guided_cascade() {
    init_logger();
    let config = SearchConfig::try_new(cascade(), s([("c", true)])).unwrap();
    let result =
        search_via_trap_spaces(config.clone(), &AttractorEvidence::disabled(), 100, Vec::new());
    assert_eq!(result.unwrap(), vec![s([("a", true)])]);

    let evidence = AttractorEvidence::from_attractors(Vec::new());
    let result = search_via_trap_spaces(config.clone(), &evidence, 100, Vec::new());
    assert_eq!(result.unwrap(), vec![s([("a", true)])]);

    let avoiding = config.avoid_nodes(["a"]).unwrap();
    let result = search_via_trap_spaces(avoiding, &AttractorEvidence::disabled(), 100, Vec::new());
    assert_eq!(result.unwrap(), Vec::<Subspace>::new());
}

#[test]
fn trap_space_universe() -> Cancellable<()> {
    init_logger();
    let config = SearchConfig::try_new(cascade(), s([("c", true)]))
        .unwrap()
        .avoid_nodes(["b"])
        .unwrap()
        .restrict_to_trap_spaces(vec![
            s([("a", true), ("b", true), ("c", true)]),
            s([("a", false), ("c", true)]),
        ]);
    assert_eq!(
        config.candidates,
        vec![
            ("a".to_string(), vec![true, false]),
            ("c".to_string(), vec![true])
        ]
    );

    // `{a=0, c=1}` is not a trap space, but it is accepted once a candidate lies in it
    // and percolates into it.
    let result = TrapSpaceSearch::run(config, Vec::new())?;
    assert_eq!(result, vec![s([("a", true)]), s([("a", false), ("c", true)])]);
    Ok(())
}

#[test]
fn invalid_configurations_are_rejected() {
    let unknown_target = SearchConfig::try_new(cascade(), s([("x", true)]));
    assert_eq!(
        unknown_target.unwrap_err(),
        ControlError::UnknownVariable("x".to_string())
    );

    let config = SearchConfig::try_new(cascade(), s([("c", true)])).unwrap();
    assert_eq!(
        config.avoid_nodes(["a", "y"]).unwrap_err(),
        ControlError::UnknownVariable("y".to_string())
    );
}

#[test]
fn search_is_resumable() -> Cancellable<()> {
    init_logger();
    let config = SearchConfig::try_new(cascade(), s([("c", true)])).unwrap();
    let mut computation = <PercolationSearch as Stateful<SearchConfig, SearchState>>::configure(
        config.clone(),
        SearchState::default(),
    );

    let result = loop {
        if let Ok(result) = computation.try_compute() {
            break result;
        }
    };
    assert_eq!(result, PercolationSearch::run(config, Vec::new())?);
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn search_serialization_roundtrip() -> Cancellable<()> {
    init_logger();
    let config = SearchConfig::try_new(cascade(), s([("c", true)])).unwrap();
    let mut computation = <PercolationSearch as Stateful<SearchConfig, SearchState>>::configure(
        config.clone(),
        SearchState::default(),
    );

    // Size 0 and the first combination of size 1.
    for _ in 0..3 {
        let _ = computation.try_compute();
    }

    let json = serde_json::to_string(&computation).expect("Failed to serialize search");
    let mut deserialized: PercolationSearch =
        serde_json::from_str(&json).expect("Failed to deserialize search");

    let resumed = loop {
        if let Ok(result) = deserialized.try_compute() {
            break result;
        }
    };
    assert_eq!(resumed, PercolationSearch::run(config, Vec::new())?);
    Ok(())
}
