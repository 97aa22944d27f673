use super::s;
use crate::error::ControlError;
use crate::intervention::{
    ControlProblem, ControlStrategy, ControlType, EdgeFact, ExhaustiveSolver, Goal,
    InterventionType,
};
use crate::subspace::Subspace;
use crate::test_utils::{cascade, init_logger};
use crate::trap_spaces::AttractorEvidence;

fn cascade_problem(intervention_type: InterventionType, control_type: ControlType) -> ControlProblem {
    let mut problem = ControlProblem::new(
        cascade(),
        s([("c", true)]),
        intervention_type,
        control_type,
    );
    problem.limit = 1;
    problem
}

fn node_strategies(spaces: Vec<Subspace>) -> Vec<ControlStrategy> {
    spaces.into_iter().map(ControlStrategy::from).collect()
}

#[test]
fn goals_follow_the_control_type() {
    init_logger();
    let target = Goal::subspace(s([("c", true)]));
    let trap = s([("a", true), ("b", true), ("c", true)]);

    let percolation = cascade_problem(InterventionType::Node, ControlType::Percolation);
    assert_eq!(percolation.goals().unwrap(), vec![target.clone()]);

    let trap_spaces = cascade_problem(InterventionType::Node, ControlType::TrapSpaces);
    assert_eq!(
        trap_spaces.goals().unwrap(),
        vec![Goal::trap_space(trap.clone())]
    );

    let transient = cascade_problem(InterventionType::Node, ControlType::Transient);
    assert_eq!(
        transient.goals().unwrap(),
        vec![Goal::subspace(trap.clone())]
    );

    let both = cascade_problem(InterventionType::Node, ControlType::Both);
    assert_eq!(
        both.goals().unwrap(),
        vec![Goal::trap_space(trap), target]
    );
}

#[test]
fn evidence_does_not_change_the_cascade_goals() {
    init_logger();
    let mut problem = cascade_problem(InterventionType::Node, ControlType::TrapSpaces);
    problem.evidence = AttractorEvidence::disabled();
    assert_eq!(
        problem.goals().unwrap(),
        vec![Goal::trap_space(s([("a", true), ("b", true), ("c", true)]))]
    );
}

#[test]
fn node_control_of_the_cascade() {
    init_logger();
    let solver = ExhaustiveSolver::default();

    let percolation = cascade_problem(InterventionType::Node, ControlType::Percolation);
    let expected = node_strategies(vec![s([("a", true)]), s([("b", true)]), s([("c", true)])]);
    assert_eq!(percolation.solve(&solver).unwrap(), expected);

    let both = cascade_problem(InterventionType::Node, ControlType::Both);
    assert_eq!(both.solve(&solver).unwrap(), expected);

    let trap_spaces = cascade_problem(InterventionType::Node, ControlType::TrapSpaces);
    assert_eq!(
        trap_spaces.solve(&solver).unwrap(),
        node_strategies(vec![s([("a", true)])])
    );

    let transient = cascade_problem(InterventionType::Node, ControlType::Transient);
    assert_eq!(
        transient.solve(&solver).unwrap(),
        node_strategies(vec![s([("a", true)])])
    );
}

#[test]
fn avoided_driver_leaves_no_strategy() {
    init_logger();
    let mut problem = cascade_problem(InterventionType::Node, ControlType::TrapSpaces);
    problem.avoid_nodes = vec!["a".to_string()];
    assert!(problem.solve(&ExhaustiveSolver::default()).unwrap().is_empty());
}

#[test]
fn edge_control_of_the_cascade() {
    init_logger();
    let problem = cascade_problem(InterventionType::Edge, ControlType::TrapSpaces);
    let mut expected = ControlStrategy::new();
    expected.insert_edge(EdgeFact::new("a", "a", true)).unwrap();
    assert_eq!(
        problem.solve(&ExhaustiveSolver::default()).unwrap(),
        vec![expected]
    );
}

#[test]
fn invalid_control_problems() {
    init_logger();
    let solver = ExhaustiveSolver::default();

    let mut unknown_target = cascade_problem(InterventionType::Node, ControlType::TrapSpaces);
    unknown_target.target = s([("x", true)]);
    assert_eq!(
        unknown_target.solve(&solver).unwrap_err(),
        ControlError::UnknownVariable("x".to_string())
    );

    let mut unknown_edge = cascade_problem(InterventionType::Edge, ControlType::Percolation);
    unknown_edge.avoid_edges = vec![("c".to_string(), "a".to_string())];
    assert_eq!(
        unknown_edge.solve(&solver).unwrap_err(),
        ControlError::UnknownEdge {
            source: "c".to_string(),
            target: "a".to_string()
        }
    );
}
