//! Domain entities: the goal-plan tree node types.

use crate::domain::conditions::{union_across_parallel, ConditionSet};
use crate::domain::environment::EnvironmentModel;
use crate::domain::error::DomainResult;

/// Primitive step with a single-atom precondition and its effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionNode {
    pub id: String,
    pub precondition: ConditionSet,
    pub postcondition: ConditionSet,
}

/// A goal achieved by any one of its alternative plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalNode {
    pub id: String,
    /// Condition the goal is required to make true
    pub goal_condition: ConditionSet,
    /// Atoms guaranteed whichever plan is chosen
    pub postcondition: ConditionSet,
    pub plans: Vec<PlanNode>,
}

/// One way of achieving a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanNode {
    pub id: String,
    /// Context condition that must hold before the plan is chosen
    pub context_precondition: ConditionSet,
    /// New truths the plan establishes (pre-existing truths excluded)
    pub postcondition: ConditionSet,
    pub body: Vec<Step>,
}

/// Steps a downstream executor may run concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParallelComposition {
    pub children: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Action(ActionNode),
    Goal(GoalNode),
    Parallel(ParallelComposition),
}

/// Everything an exporter needs: the shared environment and the ordered top-level goals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forest {
    pub environment: EnvironmentModel,
    pub goals: Vec<GoalNode>,
}

/// Node totals of a tree or forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCounts {
    pub goals: usize,
    pub plans: usize,
    pub actions: usize,
    pub parallel: usize,
}

impl Step {
    /// The atoms this step declares it makes true.
    pub fn declared_effects(&self) -> DomainResult<ConditionSet> {
        match self {
            Step::Action(a) => Ok(a.postcondition.clone()),
            Step::Goal(g) => Ok(g.goal_condition.clone()),
            Step::Parallel(p) => p.declared_effects(),
        }
    }

    pub fn as_action(&self) -> Option<&ActionNode> {
        match self {
            Step::Action(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_goal(&self) -> Option<&GoalNode> {
        match self {
            Step::Goal(g) => Some(g),
            _ => None,
        }
    }
}

impl ParallelComposition {
    /// Union of the children's declared effects; fails if two children share an id.
    pub fn declared_effects(&self) -> DomainResult<ConditionSet> {
        let effects = self
            .children
            .iter()
            .map(Step::declared_effects)
            .collect::<DomainResult<Vec<_>>>()?;
        union_across_parallel(&effects)
    }
}

impl PlanNode {
    pub fn actions(&self) -> impl Iterator<Item = &ActionNode> {
        self.body.iter().filter_map(Step::as_action)
    }

    pub fn subgoals(&self) -> impl Iterator<Item = &GoalNode> {
        self.body.iter().filter_map(Step::as_goal)
    }

    /// True when the body holds actions only.
    pub fn is_leaf(&self) -> bool {
        self.body.iter().all(|s| matches!(s, Step::Action(_)))
    }
}

impl GoalNode {
    /// Preorder walk over this goal and everything below it.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter {
            stack: vec![NodeRef::Goal(self)],
        }
    }

    pub fn counts(&self) -> NodeCounts {
        let mut counts = NodeCounts::default();
        for node in self.iter() {
            match node {
                NodeRef::Goal(_) => counts.goals += 1,
                NodeRef::Plan(_) => counts.plans += 1,
                NodeRef::Action(_) => counts.actions += 1,
                NodeRef::Parallel(_) => counts.parallel += 1,
            }
        }
        counts
    }

    /// Longest goal-to-goal chain below and including this goal.
    pub fn depth(&self) -> usize {
        fn step_depth(step: &Step) -> usize {
            match step {
                Step::Action(_) => 0,
                Step::Goal(g) => g.depth(),
                Step::Parallel(p) => p.children.iter().map(step_depth).max().unwrap_or(0),
            }
        }
        1 + self
            .plans
            .iter()
            .flat_map(|p| p.body.iter())
            .map(step_depth)
            .max()
            .unwrap_or(0)
    }
}

impl Forest {
    pub fn counts(&self) -> NodeCounts {
        self.goals.iter().map(GoalNode::counts).fold(NodeCounts::default(), |acc, c| {
            NodeCounts {
                goals: acc.goals + c.goals,
                plans: acc.plans + c.plans,
                actions: acc.actions + c.actions,
                parallel: acc.parallel + c.parallel,
            }
        })
    }

    /// Preorder walk over every tree in order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.goals.iter().flat_map(GoalNode::iter)
    }
}

/// Borrowed view of any node in a tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Goal(&'a GoalNode),
    Plan(&'a PlanNode),
    Action(&'a ActionNode),
    Parallel(&'a ParallelComposition),
}

impl<'a> NodeRef<'a> {
    fn from_step(step: &'a Step) -> Self {
        match step {
            Step::Action(a) => NodeRef::Action(a),
            Step::Goal(g) => NodeRef::Goal(g),
            Step::Parallel(p) => NodeRef::Parallel(p),
        }
    }
}

/// Stack-based preorder iterator.
pub struct NodeIter<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        match current {
            NodeRef::Goal(g) => self.stack.extend(g.plans.iter().rev().map(NodeRef::Plan)),
            NodeRef::Plan(p) => self.stack.extend(p.body.iter().rev().map(NodeRef::from_step)),
            NodeRef::Parallel(p) => self
                .stack
                .extend(p.children.iter().rev().map(NodeRef::from_step)),
            NodeRef::Action(_) => {}
        }
        Some(current)
    }
}
