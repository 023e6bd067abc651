//! Integration tests for forest generation: structure, invariants, determinism.

use rstest::rstest;

use gptgen::application::{generate_forest, ApplicationError, GenerationParams};
use std::collections::HashSet;

use gptgen::domain::{
    intersect_across_alternatives, ConditionSet, DomainError, Forest, GoalNode, NodeRef, PlanNode,
    Step,
};
use gptgen::util::testing;

fn scenario_params() -> GenerationParams {
    GenerationParams {
        depth: 2,
        goals_per_plan: 1,
        plans_per_goal: 1,
        actions_per_plan: 2,
        total_variables: 4,
        selected_variables: 4,
        tree_count: 1,
        seed: 100,
        ..Default::default()
    }
}

fn generate(params: GenerationParams) -> Forest {
    testing::init_test_setup();
    let params = params.validated().expect("valid params");
    generate_forest(&params).expect("feasible params")
}

/// Atoms true before step `k` of a sequential plan: the context plus every earlier declared effect.
fn eligible_before(plan: &PlanNode, k: usize) -> ConditionSet {
    plan.body[..k]
        .iter()
        .map(|s| s.declared_effects().expect("sequential steps"))
        .fold(plan.context_precondition.clone(), |acc, effects| {
            effects
                .into_iter()
                .fold(acc, |acc, atom| acc.add_established(atom))
        })
}

fn plans_with_goal(forest: &Forest) -> Vec<(&GoalNode, &PlanNode)> {
    forest
        .iter()
        .filter_map(|n| match n {
            NodeRef::Goal(g) => Some(g),
            _ => None,
        })
        .flat_map(|g| g.plans.iter().map(move |p| (g, p)))
        .collect()
}

fn is_parallel_plan(plan: &PlanNode) -> bool {
    matches!(plan.body.first(), Some(Step::Parallel(_)))
}

fn varied_params() -> Vec<GenerationParams> {
    vec![
        GenerationParams::default(),
        GenerationParams {
            parallel_probability: 0.5,
            ..Default::default()
        },
        GenerationParams {
            leaf_probability: 0.3,
            selected_variables: 20,
            tree_count: 3,
            seed: 42,
            ..Default::default()
        },
        GenerationParams {
            depth: 2,
            goals_per_plan: 2,
            plans_per_goal: 2,
            actions_per_plan: 2,
            total_variables: 12,
            selected_variables: 12,
            parallel_probability: 1.0,
            tree_count: 2,
            seed: 7,
            ..Default::default()
        },
    ]
}

/// Parameters leaving part of the environment out of every tree's effect selection.
fn partially_selected_params() -> Vec<GenerationParams> {
    vec![
        GenerationParams::default(),
        GenerationParams {
            depth: 2,
            goals_per_plan: 1,
            plans_per_goal: 3,
            actions_per_plan: 2,
            total_variables: 10,
            selected_variables: 4,
            tree_count: 2,
            seed: 3,
            ..Default::default()
        },
        GenerationParams {
            depth: 2,
            goals_per_plan: 2,
            plans_per_goal: 3,
            actions_per_plan: 2,
            total_variables: 24,
            selected_variables: 12,
            parallel_probability: 1.0,
            tree_count: 2,
            seed: 11,
            ..Default::default()
        },
    ]
}

/// Per plan of `goal`: the context atoms its siblings do not share.
fn extra_context(goal: &GoalNode) -> Vec<ConditionSet> {
    let contexts: Vec<ConditionSet> = goal
        .plans
        .iter()
        .map(|p| p.context_precondition.clone())
        .collect();
    let common = intersect_across_alternatives(&contexts);
    contexts.into_iter().map(|c| c.without(&common)).collect()
}

/// Ids a tree changes: action effects and goal conditions.
fn effect_ids(top: &GoalNode) -> HashSet<String> {
    top.iter()
        .flat_map(|n| match n {
            NodeRef::Action(a) => a.postcondition.iter().cloned().collect::<Vec<_>>(),
            NodeRef::Goal(g) => g.goal_condition.iter().cloned().collect(),
            _ => Vec::new(),
        })
        .map(|l| l.id().to_string())
        .collect()
}

// ============================================================
// Scenario
// ============================================================

#[test]
fn given_small_scenario_when_generating_then_top_plan_holds_two_actions() {
    let forest = generate(scenario_params());

    assert_eq!(forest.goals.len(), 1);
    let top = &forest.goals[0];
    assert_eq!(top.id, "T0-G0");
    assert_eq!(top.plans.len(), 1);
    let plan = &top.plans[0];
    assert_eq!(plan.id, "T0-P0");
    assert_eq!(plan.actions().count(), 2);
    assert_eq!(plan.subgoals().count(), 1);
}

#[test]
fn given_small_scenario_when_generating_then_first_effect_is_eligible_for_second_action() {
    let forest = generate(scenario_params());
    let plan = &forest.goals[0].plans[0];

    let positions: Vec<usize> = plan
        .body
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s, Step::Action(_)))
        .map(|(i, _)| i)
        .collect();
    let first = plan.body[positions[0]].as_action().unwrap();
    let second = plan.body[positions[1]].as_action().unwrap();

    let eligible = eligible_before(plan, positions[1]);
    for atom in first.postcondition.iter() {
        assert!(eligible.contains(atom), "{atom} missing from {eligible}");
    }
    for atom in second.precondition.iter() {
        assert!(eligible.contains(atom), "{atom} not established before {}", second.id);
    }
}

// ============================================================
// Invariants
// ============================================================

#[rstest]
fn given_generated_forest_when_inspecting_conditions_then_never_both_polarities(
    #[values(0, 1, 2, 3)] case: usize,
) {
    let forest = generate(varied_params()[case].clone());

    for node in forest.iter() {
        match node {
            NodeRef::Goal(g) => {
                assert!(g.goal_condition.is_consistent(), "{}", g.id);
                assert!(g.postcondition.is_consistent(), "{}", g.id);
            }
            NodeRef::Plan(p) => {
                assert!(p.context_precondition.is_consistent(), "{}", p.id);
                assert!(p.postcondition.is_consistent(), "{}", p.id);
            }
            NodeRef::Action(a) => {
                assert!(a.precondition.is_consistent(), "{}", a.id);
                assert!(a.postcondition.is_consistent(), "{}", a.id);
            }
            NodeRef::Parallel(p) => assert!(p.declared_effects().is_ok()),
        }
    }
}

#[rstest]
fn given_generated_forest_when_inspecting_plans_then_first_step_requires_context(
    #[values(0, 1, 2, 3)] case: usize,
) {
    let forest = generate(varied_params()[case].clone());

    for (_, plan) in plans_with_goal(&forest) {
        match plan.body.first() {
            Some(Step::Action(a)) => assert_eq!(a.precondition, plan.context_precondition, "{}", plan.id),
            Some(Step::Parallel(p)) => {
                for action in p.children.iter().filter_map(Step::as_action) {
                    assert_eq!(action.precondition, plan.context_precondition, "{}", plan.id);
                }
            }
            Some(Step::Goal(g)) => panic!("plan {} starts with subgoal {}", plan.id, g.id),
            None => {}
        }
    }
}

#[rstest]
fn given_generated_forest_when_inspecting_plans_then_last_step_achieves_goal(
    #[values(0, 1, 2, 3)] case: usize,
) {
    let forest = generate(varied_params()[case].clone());

    for (goal, plan) in plans_with_goal(&forest) {
        let last = plan.body.last().expect("non-empty body");
        assert_eq!(last.declared_effects().unwrap(), goal.goal_condition, "{}", plan.id);
        assert!(plan.postcondition.iter().all(|a| !plan.context_precondition.contains(a)));
    }
}

#[rstest]
fn given_sequential_plans_when_inspecting_steps_then_preconditions_were_established(
    #[values(0, 2)] case: usize,
) {
    let forest = generate(varied_params()[case].clone());

    for (_, plan) in plans_with_goal(&forest) {
        assert!(!is_parallel_plan(plan));
        for (k, step) in plan.body.iter().enumerate().skip(1) {
            let Some(action) = step.as_action() else {
                continue;
            };
            let eligible = eligible_before(plan, k);
            for atom in action.precondition.iter() {
                assert!(eligible.contains(atom), "{} requires {atom}", action.id);
            }
        }
    }
}

#[rstest]
fn given_sequential_plans_when_inspecting_subgoals_then_never_first_or_last(
    #[values(0, 2)] case: usize,
) {
    let forest = generate(varied_params()[case].clone());

    for (_, plan) in plans_with_goal(&forest) {
        let n = plan.body.len();
        assert!(!matches!(plan.body[0], Step::Goal(_)), "{}", plan.id);
        assert!(!matches!(plan.body[n - 1], Step::Goal(_)), "{}", plan.id);
    }
}

#[rstest]
fn given_partial_selection_when_generating_then_sibling_plans_get_distinct_extra_context(
    #[values(0, 1, 2)] case: usize,
) {
    let forest = generate(partially_selected_params()[case].clone());

    for node in forest.iter() {
        let NodeRef::Goal(goal) = node else {
            continue;
        };
        let extras = extra_context(goal);
        let ids: HashSet<&str> = extras
            .iter()
            .inspect(|extra| assert_eq!(extra.len(), 1, "plan of {} context extra {extra}", goal.id))
            .flat_map(|extra| extra.iter().map(|l| l.id()))
            .collect();
        assert_eq!(ids.len(), goal.plans.len(), "{} reuses an extra context variable", goal.id);
        for atom in extras.iter().flat_map(|e| e.iter()) {
            assert!(
                forest.environment.variables().contains(atom),
                "{atom} is not at its initial value"
            );
        }
    }
}

#[rstest]
fn given_partial_selection_when_generating_then_extra_context_is_never_an_effect(
    #[values(0, 1, 2)] case: usize,
) {
    let forest = generate(partially_selected_params()[case].clone());

    for top in &forest.goals {
        let changed = effect_ids(top);
        let goals = top.iter().filter_map(|n| match n {
            NodeRef::Goal(g) => Some(g),
            _ => None,
        });
        for goal in goals {
            for atom in extra_context(goal).iter().flat_map(|e| e.iter()) {
                assert!(
                    !changed.contains(atom.id()),
                    "{} context variable {atom} is also an effect in tree {}",
                    goal.id,
                    top.id
                );
            }
        }
    }
}

#[test]
fn given_default_params_when_generating_then_tree_shape_follows_parameters() {
    let params = GenerationParams::default();
    let forest = generate(params.clone());

    assert_eq!(forest.goals.len(), params.tree_count);
    assert_eq!(forest.environment.variables().len(), params.total_variables);
    assert_eq!(forest.environment.goal_indicators().len(), params.tree_count);
    for (i, top) in forest.goals.iter().enumerate() {
        assert_eq!(top.id, format!("T{i}-G0"));
        assert_eq!(top.depth(), params.depth);
        let plans = top.iter().filter_map(|n| match n {
            NodeRef::Plan(p) => Some(p),
            _ => None,
        });
        for plan in plans {
            assert_eq!(plan.actions().count(), params.actions_per_plan);
            let goals = plan.subgoals().count();
            assert!(goals == 0 || goals == params.goals_per_plan);
        }
    }
}

#[test]
fn given_certain_leaf_probability_when_generating_then_every_plan_is_leaf() {
    let forest = generate(GenerationParams {
        leaf_probability: 1.0,
        ..Default::default()
    });

    for top in &forest.goals {
        assert_eq!(top.depth(), 1);
        assert!(top.plans.iter().all(PlanNode::is_leaf));
    }
}

// ============================================================
// Determinism
// ============================================================

#[rstest]
fn given_same_seed_and_params_when_generating_twice_then_identical(
    #[values(0, 1, 2, 3)] case: usize,
) {
    let first = generate(varied_params()[case].clone());
    let second = generate(varied_params()[case].clone());

    assert_eq!(first, second);
}

#[test]
fn given_different_seeds_when_generating_then_forests_differ() {
    let first = generate(GenerationParams::default());
    let second = generate(GenerationParams {
        seed: 101,
        ..Default::default()
    });

    assert_ne!(first, second);
}

// ============================================================
// Boundaries
// ============================================================

#[test]
fn given_no_selected_variables_when_actions_needed_then_fails_fast() {
    let params = GenerationParams {
        selected_variables: 0,
        ..scenario_params()
    };

    let result = params.validated();

    assert!(matches!(
        result,
        Err(ApplicationError::InvalidParameter {
            name: "selected_variables",
            ..
        })
    ));
}

#[test]
fn given_more_goals_than_interior_positions_when_validating_then_fails_fast() {
    let params = GenerationParams {
        goals_per_plan: 2,
        actions_per_plan: 1,
        ..scenario_params()
    };

    assert!(matches!(
        params.validated(),
        Err(ApplicationError::InvalidParameter {
            name: "goals_per_plan",
            ..
        })
    ));
}

#[test]
fn given_unvalidated_infeasible_params_when_generating_then_error_names_tree() {
    testing::init_test_setup();
    let params = GenerationParams {
        goals_per_plan: 2,
        actions_per_plan: 1,
        ..scenario_params()
    };

    let result = generate_forest(&params);

    match result {
        Err(ApplicationError::Infeasible { tree, source }) => {
            assert_eq!(tree, 0);
            assert!(matches!(source, DomainError::InsufficientInteriorPositions { .. }));
        }
        other => panic!("expected infeasibility, got {other:?}"),
    }
}

#[test]
fn given_single_action_leaf_tree_when_generating_then_action_achieves_goal_directly() {
    let forest = generate(GenerationParams {
        depth: 1,
        actions_per_plan: 1,
        plans_per_goal: 2,
        total_variables: 3,
        selected_variables: 3,
        tree_count: 2,
        ..Default::default()
    });

    for (i, top) in forest.goals.iter().enumerate() {
        for plan in &top.plans {
            assert_eq!(plan.body.len(), 1);
            let action = plan.body[0].as_action().unwrap();
            assert_eq!(action.postcondition, top.goal_condition);
            assert!(action.id.starts_with(&format!("T{i}-A")));
        }
    }
}
