use super::{input_driven, s};
use crate::error::ControlError;
use crate::intervention::{
    ControlStrategy, EdgeFact, ForcingRule, Goal, InterventionLimits, InterventionProblem,
    InterventionType, Literal, RewrittenNetwork, Sign,
};
use crate::subspace::Subspace;
use crate::test_utils::{cascade, mutual_activation};

#[test]
fn problem_is_built_from_on_clauses() {
    let network = mutual_activation();
    let goals = vec![Goal::subspace(s([("v1", true), ("v2", true)]))];
    let problem = InterventionProblem::try_new(&network, goals, InterventionType::Node, 2).unwrap();

    assert_eq!(problem.variables, vec!["v1".to_string(), "v2".to_string()]);
    assert_eq!(
        problem.formulas,
        vec![
            vec![vec![Literal {
                regulator: 1,
                sign: Sign::Positive
            }]],
            vec![vec![Literal {
                regulator: 0,
                sign: Sign::Positive
            }]],
        ]
    );
    assert_eq!(
        problem.limits,
        InterventionLimits {
            max_size: 2,
            max_nodes: Some(2),
            max_edges: None,
        }
    );
    assert_eq!(problem.regulations(), vec![(1, 0), (0, 1)]);
}

#[test]
fn intervention_types_disable_limits() {
    assert_eq!(InterventionType::Edge.limits(3).max_nodes, None);
    assert_eq!(InterventionType::Edge.limits(3).max_edges, Some(3));
    let combined = InterventionType::Combined.limits(1);
    assert_eq!((combined.max_nodes, combined.max_edges), (Some(1), Some(1)));
}

#[test]
fn malformed_problems_are_rejected() {
    let network = cascade();
    let unknown_goal = InterventionProblem::try_new(
        &network,
        vec![Goal::trap_space(s([("x", true)]))],
        InterventionType::Combined,
        1,
    );
    assert_eq!(
        unknown_goal.unwrap_err(),
        ControlError::UnknownVariable("x".to_string())
    );

    let problem = InterventionProblem::try_new(
        &network,
        vec![Goal::subspace(s([("c", true)]))],
        InterventionType::Combined,
        1,
    )
    .unwrap();
    assert_eq!(
        problem.clone().avoid_nodes(["q"]).unwrap_err(),
        ControlError::UnknownVariable("q".to_string())
    );
    // `c` does not regulate `a`.
    assert_eq!(
        problem.clone().avoid_edges([("c", "a")]).unwrap_err(),
        ControlError::UnknownEdge {
            source: "c".to_string(),
            target: "a".to_string()
        }
    );

    let problem = problem
        .avoid_nodes(["b"])
        .unwrap()
        .avoid_edges([("a", "b")])
        .unwrap();
    assert!(problem.avoid_nodes.contains(&1));
    assert!(problem.avoid_edges.contains(&(0, 1)));
}

#[test]
fn goals_are_numbered_by_kind() {
    let network = cascade();
    let goals = vec![
        Goal::trap_space(s([("a", true)])),
        Goal::subspace(s([("b", true)])),
        Goal::trap_space(s([("c", true)])),
        Goal::subspace(s([("c", false)])),
    ];
    let problem =
        InterventionProblem::try_new(&network, goals.clone(), InterventionType::Node, 1).unwrap();
    let numbered: Vec<(i64, Goal)> = problem
        .numbered_goals()
        .into_iter()
        .map(|(id, goal)| (id, goal.clone()))
        .collect();
    assert_eq!(
        numbered,
        vec![
            (-1, goals[1].clone()),
            (-2, goals[3].clone()),
            (0, goals[0].clone()),
            (1, goals[2].clone()),
        ]
    );
}

#[test]
fn edge_facts_rewrite_formulas() {
    let network = cascade();
    let goals = vec![Goal::subspace(s([("c", true)]))];
    let problem = InterventionProblem::try_new(&network, goals, InterventionType::Edge, 1).unwrap();

    // A satisfied edge removes the literal, leaving a tautology.
    let on = RewrittenNetwork::new(&problem, &[], &[(0, 1, true)]);
    assert_eq!(on.formula(1), &[Vec::<Literal>::new()]);
    assert_eq!(
        on.evaluate(ForcingRule::Percolation),
        vec![None, Some(true), Some(true)]
    );

    // A refuted edge removes the clause, leaving an empty formula.
    let off = RewrittenNetwork::new(&problem, &[], &[(0, 1, false)]);
    assert!(off.formula(1).is_empty());
    assert_eq!(
        off.evaluate(ForcingRule::Percolation),
        vec![None, Some(false), Some(false)]
    );
    assert_eq!(
        off.evaluate(ForcingRule::PositiveSupport),
        vec![None, Some(false), None]
    );
}

#[test]
fn forcing_rules_differ_on_refuted_clauses() {
    let network = input_driven();
    let goals = vec![Goal::subspace(s([("v1", false)]))];
    let problem = InterventionProblem::try_new(&network, goals, InterventionType::Node, 1).unwrap();

    let rewritten = RewrittenNetwork::new(&problem, &[(1, false)], &[]);
    assert_eq!(
        rewritten.evaluate(ForcingRule::Percolation),
        vec![Some(false), Some(false)]
    );
    assert_eq!(
        rewritten.evaluate(ForcingRule::PositiveSupport),
        vec![None, Some(false)]
    );

    let strategy = ControlStrategy::from(s([("v2", false)]));
    assert!(problem.is_solution(&strategy, ForcingRule::Percolation).unwrap());
    assert!(!problem.is_solution(&strategy, ForcingRule::PositiveSupport).unwrap());
}

#[test]
fn percolation_rule_matches_network_percolation() {
    let network = cascade();
    let problem = InterventionProblem::try_new(&network, Vec::new(), InterventionType::Node, 1)
        .unwrap();
    for space in [s([]), s([("a", true)]), s([("b", false)]), s([("a", true), ("b", false)])] {
        let strategy = ControlStrategy::from(space.clone());
        let rewritten = RewrittenNetwork::try_from_strategy(&problem, &strategy).unwrap();
        let values = rewritten.evaluate(ForcingRule::Percolation);
        let forced: Subspace = problem
            .variables
            .iter()
            .zip(values)
            .filter_map(|(var, value)| value.map(|it| (var.as_str(), it)))
            .collect();
        assert_eq!(forced, network.percolate(&space));
    }
}

#[test]
fn strategies_reject_conflicts() {
    let mut strategy = ControlStrategy::new();
    strategy.insert_node("a", true).unwrap();
    strategy.insert_node("a", true).unwrap();
    assert_eq!(
        strategy.insert_node("a", false).unwrap_err(),
        ControlError::ConflictingNodeIntervention("a".to_string())
    );
    assert_eq!(
        strategy.insert_edge(EdgeFact::new("b", "a", true)).unwrap_err(),
        ControlError::NodeEdgeConflict {
            variable: "a".to_string(),
            source: "b".to_string(),
            target: "a".to_string(),
        }
    );

    strategy.insert_edge(EdgeFact::new("c", "b", false)).unwrap();
    assert_eq!(
        strategy.insert_edge(EdgeFact::new("c", "b", true)).unwrap_err(),
        ControlError::ConflictingEdgeIntervention {
            source: "c".to_string(),
            target: "b".to_string(),
        }
    );
    assert!(strategy.insert_node("b", true).is_err());
    assert_eq!(strategy.len(), 2);
    assert_eq!(strategy.to_string(), "{a=1, c->b=0}");
}
