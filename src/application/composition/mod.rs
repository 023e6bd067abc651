//! Plan body layouts
//!
//! A plan body is either a sequential chain of steps or a parallel composition
//! followed by a joining action. Which layout a plan gets is decided by a
//! [`CompositionPolicy`]; the body builders live in the submodules.

mod parallel;
mod sequential;

use std::fmt;

use tracing::trace;

use crate::application::params::GenerationParams;
use crate::domain::{ConditionSet, SeededRng, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Sequential,
    Parallel,
}

/// What a policy gets to see about the plan being built.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub plan_id: &'a str,
    pub depth: usize,
    pub num_actions: usize,
    pub num_goals: usize,
    pub pool: &'a ConditionSet,
}

/// Ids a parallel subgoal slice needs: its goal condition and one left to draw effects from.
const MIN_SUBGOAL_SLICE: usize = 2;

impl PlanRequest<'_> {
    /// A parallel layout needs one distinct id per action, and every subgoal
    /// slice of the remaining ids must keep an effect pool once its goal
    /// condition is taken out.
    pub fn fits_parallel(&self) -> bool {
        let branches = self.num_actions + self.num_goals;
        let distinct = self.pool.distinct_ids().len();
        if branches == 0 || distinct <= branches {
            return false;
        }
        self.num_goals == 0 || (distinct - self.num_actions) / self.num_goals >= MIN_SUBGOAL_SLICE
    }
}

/// Decides the layout of every plan body.
pub trait CompositionPolicy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn choose(&self, rng: &mut SeededRng, request: &PlanRequest<'_>) -> Layout;
}

/// Always lays steps out one after the other. Consumes no draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialPolicy;

impl CompositionPolicy for SequentialPolicy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn choose(&self, _rng: &mut SeededRng, _request: &PlanRequest<'_>) -> Layout {
        Layout::Sequential
    }
}

/// Picks a parallel layout with the given probability when the pool is wide enough.
///
/// One draw is consumed per plan whether or not the pool fits.
#[derive(Debug, Clone, Copy)]
pub struct ParallelPolicy {
    probability: f64,
}

impl ParallelPolicy {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl CompositionPolicy for ParallelPolicy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn choose(&self, rng: &mut SeededRng, request: &PlanRequest<'_>) -> Layout {
        let drawn = rng.chance(self.probability);
        if drawn && request.fits_parallel() {
            Layout::Parallel
        } else {
            if drawn {
                trace!(plan = request.plan_id, "pool too narrow for parallel layout");
            }
            Layout::Sequential
        }
    }
}

/// Policy implied by the parameters: parallel layouts only when their probability is positive.
pub fn policy_for(params: &GenerationParams) -> Box<dyn CompositionPolicy> {
    if params.parallel_probability > 0.0 {
        Box::new(ParallelPolicy::new(params.parallel_probability))
    } else {
        Box::new(SequentialPolicy)
    }
}

/// Inputs shared by both body builders.
#[derive(Debug)]
pub(crate) struct PlanFrame<'a> {
    pub plan_id: &'a str,
    pub depth: usize,
    /// Effects the body may still produce
    pub pool: ConditionSet,
    pub context: &'a ConditionSet,
    pub goal_condition: &'a ConditionSet,
    pub num_goals: usize,
}

/// A finished plan body and the ledger of atoms true once it has run.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlanBody {
    pub steps: Vec<Step>,
    pub ledger: ConditionSet,
}
