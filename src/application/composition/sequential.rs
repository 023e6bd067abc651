//! Sequential plan bodies: a chain of steps where each step's precondition was
//! made true by the context or by an earlier step.

use tracing::trace;

use crate::application::composition::{PlanBody, PlanFrame};
use crate::application::generator::{GoalPlanGenerator, TreeContext};
use crate::domain::{
    ActionNode, ConditionSet, DomainError, DomainResult, SeededRng, Step,
};

/// Pre/postcondition pair of one chain position before it becomes an action or a subgoal.
#[derive(Debug, Clone)]
struct DraftStep {
    precondition: ConditionSet,
    postcondition: ConditionSet,
}

impl GoalPlanGenerator<'_> {
    /// Draft `actions + goals` steps, then turn the sampled interior positions into subgoals.
    pub(crate) fn build_sequential(
        &self,
        ctx: &mut TreeContext<'_>,
        frame: PlanFrame<'_>,
    ) -> DomainResult<PlanBody> {
        let step_count = self.params().actions_per_plan + frame.num_goals;
        if step_count == 0 {
            return Ok(PlanBody::default());
        }

        let (drafts, mut ledger) = draft_chain(ctx.rng, &frame, step_count)?;
        let positions = subgoal_positions(ctx.rng, frame.plan_id, step_count, frame.num_goals)?;

        // Subgoals may only touch ids the chain leaves alone.
        let used: ConditionSet = drafts[0]
            .precondition
            .iter()
            .chain(drafts.iter().flat_map(|d| d.postcondition.iter()))
            .cloned()
            .collect();
        let subgoal_pool = frame.pool.remove_conflicting(&used);

        let mut steps = Vec::with_capacity(step_count);
        for (position, draft) in drafts.into_iter().enumerate() {
            if positions.contains(&position) {
                ledger = ledger.without(&draft.postcondition);
                let subgoal = self.create_goal(
                    ctx,
                    frame.depth + 1,
                    subgoal_pool.clone(),
                    draft.precondition,
                    draft.postcondition,
                )?;
                for atom in subgoal.postcondition.iter() {
                    ledger = ledger.add_established(atom.clone());
                }
                steps.push(Step::Goal(subgoal));
            } else {
                steps.push(Step::Action(ActionNode {
                    id: ctx.ids.next_action(),
                    precondition: draft.precondition,
                    postcondition: draft.postcondition,
                }));
            }
        }

        Ok(PlanBody { steps, ledger })
    }
}

/// Chain where step 0 requires the context, every later step requires one
/// atom of the state reached so far, and the last step achieves the goal.
///
/// Returns the drafts and the state after the final step.
fn draft_chain(
    rng: &mut SeededRng,
    frame: &PlanFrame<'_>,
    step_count: usize,
) -> DomainResult<(Vec<DraftStep>, ConditionSet)> {
    let mut pool = frame.pool.clone();
    let mut current = frame.context.clone();
    let mut drafts = Vec::with_capacity(step_count);

    for k in 0..step_count {
        let precondition = if k == 0 {
            frame.context.clone()
        } else {
            let atom = rng
                .pick(current.as_slice())
                .ok_or_else(|| empty("current state", frame.plan_id))?
                .clone();
            ConditionSet::singleton(atom)
        };

        let postcondition = if k == step_count - 1 {
            frame.goal_condition.clone()
        } else {
            let effect = rng
                .pick(pool.as_slice())
                .ok_or_else(|| empty("effect pool", frame.plan_id))?
                .clone();
            trace!(plan = frame.plan_id, step = k, %effect, "drew effect");
            pool = pool.consume_as_precondition(&effect);
            current = current.add_established(effect.clone());
            ConditionSet::singleton(effect)
        };

        drafts.push(DraftStep {
            precondition,
            postcondition,
        });
    }

    for atom in frame.goal_condition.iter() {
        current = current.add_established(atom.clone());
    }
    Ok((drafts, current))
}

/// Distinct positions strictly between the first and the last step.
fn subgoal_positions(
    rng: &mut SeededRng,
    plan_id: &str,
    step_count: usize,
    num_goals: usize,
) -> DomainResult<Vec<usize>> {
    if num_goals == 0 {
        return Ok(Vec::new());
    }
    let interior = step_count.saturating_sub(2);
    let picked = rng.sample_indices(interior, num_goals).ok_or_else(|| {
        DomainError::InsufficientInteriorPositions {
            goals: num_goals,
            positions: interior,
            plan: plan_id.to_string(),
        }
    })?;
    Ok(picked.into_iter().map(|i| i + 1).collect())
}

fn empty(pool: &'static str, plan_id: &str) -> DomainError {
    DomainError::EmptyPool {
        pool,
        node: plan_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Literal;

    fn lit(id: &str, state: bool) -> Literal {
        Literal::new(id, state)
    }

    #[test]
    fn given_chain_when_drafting_then_first_requires_context_and_last_achieves_goal() {
        let mut rng = SeededRng::new(7);
        let context = ConditionSet::singleton(lit("EV-9", true));
        let goal = ConditionSet::singleton(lit("G-0", true));
        let frame = PlanFrame {
            plan_id: "T0-P0",
            depth: 0,
            pool: vec![lit("EV-0", true), lit("EV-1", false), lit("EV-2", true)].into(),
            context: &context,
            goal_condition: &goal,
            num_goals: 0,
        };

        let (drafts, state) = draft_chain(&mut rng, &frame, 3).unwrap();

        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].precondition, context);
        assert_eq!(drafts[2].postcondition, goal);
        assert!(state.contains(&lit("G-0", true)));
        assert!(state.contains(&lit("EV-9", true)));
        assert!(state.is_consistent());
        // each later precondition was established by the context or an earlier step
        for k in 1..drafts.len() {
            let atom = drafts[k].precondition.first().unwrap();
            let established = context.contains(atom)
                || drafts[..k].iter().any(|d| d.postcondition.contains(atom));
            assert!(established, "step {k} requires unestablished {atom}");
        }
    }

    #[test]
    fn given_empty_pool_when_drafting_then_fails() {
        let mut rng = SeededRng::new(7);
        let context = ConditionSet::new();
        let goal = ConditionSet::singleton(lit("G-0", true));
        let frame = PlanFrame {
            plan_id: "T0-P3",
            depth: 0,
            pool: ConditionSet::new(),
            context: &context,
            goal_condition: &goal,
            num_goals: 0,
        };

        let result = draft_chain(&mut rng, &frame, 2);

        assert_eq!(
            result.unwrap_err(),
            DomainError::EmptyPool {
                pool: "effect pool",
                node: "T0-P3".into()
            }
        );
    }

    #[test]
    fn given_interior_positions_when_sampling_then_never_first_or_last() {
        let mut rng = SeededRng::new(3);

        for _ in 0..50 {
            let positions = subgoal_positions(&mut rng, "T0-P0", 6, 3).unwrap();
            assert_eq!(positions.len(), 3);
            assert!(positions.iter().all(|p| (1..=4).contains(p)));
        }
    }

    #[test]
    fn given_too_few_interior_positions_when_sampling_then_error() {
        let mut rng = SeededRng::new(3);

        let result = subgoal_positions(&mut rng, "T0-P2", 3, 2);

        assert_eq!(
            result.unwrap_err(),
            DomainError::InsufficientInteriorPositions {
                goals: 2,
                positions: 1,
                plan: "T0-P2".into()
            }
        );
    }
}
