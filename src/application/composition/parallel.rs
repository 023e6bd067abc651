//! Parallel plan bodies: independent branches over disjoint propositions,
//! closed by a joining action that achieves the goal.

use tracing::trace;

use crate::application::composition::{PlanBody, PlanFrame};
use crate::application::generator::{GoalPlanGenerator, TreeContext};
use crate::domain::{
    union_across_parallel, ActionNode, ConditionSet, DomainError, DomainResult,
    ParallelComposition, Step,
};

impl GoalPlanGenerator<'_> {
    /// Actions claim one id each; subgoals share the remaining ids in even slices.
    pub(crate) fn build_parallel(
        &self,
        ctx: &mut TreeContext<'_>,
        frame: PlanFrame<'_>,
    ) -> DomainResult<PlanBody> {
        let num_actions = self.params().actions_per_plan;
        let mut available = frame.pool;
        let mut children = Vec::with_capacity(num_actions + frame.num_goals);
        let mut branch_effects = Vec::with_capacity(num_actions + frame.num_goals);

        for _ in 0..num_actions {
            let effect = ctx
                .rng
                .pick(available.as_slice())
                .ok_or_else(|| empty("effect pool", frame.plan_id))?
                .clone();
            let postcondition = ConditionSet::singleton(effect);
            available = available.remove_conflicting(&postcondition);
            branch_effects.push(postcondition.clone());
            children.push(Step::Action(ActionNode {
                id: ctx.ids.next_action(),
                precondition: frame.context.clone(),
                postcondition,
            }));
        }

        if frame.num_goals > 0 {
            let ids: Vec<String> = available
                .distinct_ids()
                .into_iter()
                .map(str::to_string)
                .collect();
            let per_goal = ids.len() / frame.num_goals;
            if per_goal == 0 {
                return Err(empty("subgoal propositions", frame.plan_id));
            }
            let order = ctx
                .rng
                .sample_indices(ids.len(), per_goal * frame.num_goals)
                .ok_or_else(|| empty("subgoal propositions", frame.plan_id))?;

            for chunk in order.chunks(per_goal) {
                let slice_ids: Vec<&str> = chunk.iter().map(|&i| ids[i].as_str()).collect();
                let slice = available.restricted_to(&slice_ids);
                let target = ctx
                    .rng
                    .pick(slice.as_slice())
                    .ok_or_else(|| empty("subgoal propositions", frame.plan_id))?
                    .clone();
                trace!(plan = frame.plan_id, %target, slice = slice_ids.len(), "parallel subgoal");
                let goal_condition = ConditionSet::singleton(target);
                let subgoal_pool = slice.remove_conflicting(&goal_condition);

                let subgoal = self.create_goal(
                    ctx,
                    frame.depth + 1,
                    subgoal_pool,
                    frame.context.clone(),
                    goal_condition,
                )?;
                branch_effects.push(subgoal.postcondition.clone());
                children.push(Step::Goal(subgoal));
            }
        }

        let combined = union_across_parallel(&branch_effects)?;
        let join_precondition = match ctx.rng.pick(combined.as_slice()) {
            Some(atom) => ConditionSet::singleton(atom.clone()),
            None => frame.context.clone(),
        };
        let join = ActionNode {
            id: ctx.ids.next_action(),
            precondition: join_precondition,
            postcondition: frame.goal_condition.clone(),
        };

        let mut ledger = frame.context.clone();
        for atom in combined.iter().chain(frame.goal_condition.iter()) {
            ledger = ledger.add_established(atom.clone());
        }

        Ok(PlanBody {
            steps: vec![
                Step::Parallel(ParallelComposition { children }),
                Step::Action(join),
            ],
            ledger,
        })
    }
}

fn empty(pool: &'static str, plan_id: &str) -> DomainError {
    DomainError::EmptyPool {
        pool,
        node: plan_id.to_string(),
    }
}
