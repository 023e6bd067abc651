//! Recursive goal-plan tree generation.
//!
//! Goals and plans are created top-down: a goal is handed the condition it has
//! to achieve, each of its plans ends with a step achieving it, and subgoals are
//! carved out of the plan's sequential chain. Once a goal's plans are built its
//! postcondition is derived as the atoms every alternative guarantees.

use tracing::{debug, info, instrument};

use crate::application::composition::{
    policy_for, CompositionPolicy, Layout, PlanBody, PlanFrame, PlanRequest,
};
use crate::application::params::GenerationParams;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    intersect_across_alternatives, ConditionSet, DomainResult, EnvironmentModel, Forest,
    GoalNode, IdAllocator, Literal, PlanNode, SeededRng,
};

/// Generates a forest from validated parameters.
pub fn generate_forest(params: &GenerationParams) -> ApplicationResult<Forest> {
    let policy = policy_for(params);
    GoalPlanGenerator::new(params, policy.as_ref()).generate()
}

/// Mutable state threaded through the recursion of one tree.
pub(crate) struct TreeContext<'r> {
    pub rng: &'r mut SeededRng,
    pub ids: IdAllocator,
    /// Variables usable as extra plan context only
    pub irrelevant: Vec<Literal>,
}

#[derive(Debug)]
pub struct GoalPlanGenerator<'a> {
    params: &'a GenerationParams,
    policy: &'a dyn CompositionPolicy,
}

impl<'a> GoalPlanGenerator<'a> {
    pub fn new(params: &'a GenerationParams, policy: &'a dyn CompositionPolicy) -> Self {
        Self { params, policy }
    }

    pub fn params(&self) -> &GenerationParams {
        self.params
    }

    /// Environment first, then each tree in order, all from one seeded stream.
    #[instrument(level = "debug", skip(self), fields(seed = self.params.seed, policy = self.policy.name()))]
    pub fn generate(&self) -> ApplicationResult<Forest> {
        let mut rng = SeededRng::new(self.params.seed);
        let environment = EnvironmentModel::initialize(
            self.params.total_variables,
            self.params.tree_count,
            &mut rng,
        );

        let mut goals = Vec::with_capacity(self.params.tree_count);
        for tree in 0..self.params.tree_count {
            let goal = self
                .generate_tree(tree, &environment, &mut rng)
                .map_err(|source| ApplicationError::Infeasible { tree, source })?;
            goals.push(goal);
        }
        Ok(Forest { environment, goals })
    }

    /// One top-level goal with a fresh relevant-variable selection and fresh ids.
    pub fn generate_tree(
        &self,
        tree: usize,
        environment: &EnvironmentModel,
        rng: &mut SeededRng,
    ) -> DomainResult<GoalNode> {
        let selection = environment.select_relevant(self.params.selected_variables, rng)?;
        let pool = selection.effect_pool();
        let mut ctx = TreeContext {
            rng,
            ids: IdAllocator::new(tree),
            irrelevant: selection.irrelevant,
        };

        let goal = self.create_goal(
            &mut ctx,
            0,
            pool,
            ConditionSet::new(),
            EnvironmentModel::goal_condition(tree),
        )?;

        let counts = goal.counts();
        info!(
            tree,
            goals = counts.goals,
            plans = counts.plans,
            actions = counts.actions,
            "tree generated"
        );
        Ok(goal)
    }

    /// Build a goal with `plans_per_goal` alternatives, each achieving `goal_condition`.
    ///
    /// Every plan's context is `context_pre` plus one irrelevant variable (at
    /// its initial value) not yet used by a sibling plan.
    pub(crate) fn create_goal(
        &self,
        ctx: &mut TreeContext<'_>,
        depth: usize,
        pool: ConditionSet,
        context_pre: ConditionSet,
        goal_condition: ConditionSet,
    ) -> DomainResult<GoalNode> {
        let id = ctx.ids.next_goal();
        debug!(%id, depth, pool = pool.len(), "create goal");

        let mut unused_context: Vec<Literal> = ctx
            .irrelevant
            .iter()
            .filter(|l| !context_pre.contains_id(l.id()))
            .cloned()
            .collect();

        let mut plans = Vec::with_capacity(self.params.plans_per_goal);
        for _ in 0..self.params.plans_per_goal {
            let mut context = context_pre.clone();
            if let Some(i) = ctx.rng.index(unused_context.len()) {
                context = context.add_established(unused_context.remove(i));
            }
            let plan_depth = if ctx.rng.chance(self.params.leaf_probability) {
                self.params.max_depth()
            } else {
                depth
            };
            plans.push(self.create_plan(ctx, plan_depth, pool.clone(), context, &goal_condition)?);
        }

        let ledgers: Vec<ConditionSet> = plans.iter().map(|p| p.postcondition.clone()).collect();
        let postcondition = intersect_across_alternatives(&ledgers);
        Ok(GoalNode {
            id,
            goal_condition,
            postcondition,
            plans,
        })
    }

    fn create_plan(
        &self,
        ctx: &mut TreeContext<'_>,
        depth: usize,
        pool: ConditionSet,
        context: ConditionSet,
        goal_condition: &ConditionSet,
    ) -> DomainResult<PlanNode> {
        let id = ctx.ids.next_plan();
        let num_goals = if depth >= self.params.max_depth() {
            0
        } else {
            self.params.goals_per_plan
        };

        let layout = self.policy.choose(
            ctx.rng,
            &PlanRequest {
                plan_id: &id,
                depth,
                num_actions: self.params.actions_per_plan,
                num_goals,
                pool: &pool,
            },
        );
        debug!(%id, depth, ?layout, context = %context, "create plan");

        let frame = PlanFrame {
            plan_id: &id,
            depth,
            pool,
            context: &context,
            goal_condition,
            num_goals,
        };
        let PlanBody { steps, ledger } = match layout {
            Layout::Sequential => self.build_sequential(ctx, frame)?,
            Layout::Parallel => self.build_parallel(ctx, frame)?,
        };

        let postcondition = ledger.without(&context);
        postcondition.check_consistent()?;
        Ok(PlanNode {
            id,
            context_precondition: context,
            postcondition,
            body: steps,
        })
    }
}
