//! Validated generation parameters.

use crate::application::{ApplicationError, ApplicationResult};

/// Variables usable as effects per tree when the configuration leaves it unset.
pub const DEFAULT_SELECTED_VARIABLES: usize = 30;

/// Default effect selection for `total` variables, never more than exist.
pub fn default_selection(total: usize) -> usize {
    DEFAULT_SELECTED_VARIABLES.min(total)
}

/// Immutable parameter set consumed by the generator.
///
/// Build one through [`GenerationParams::validated`] (or
/// `Settings::validate`) so that every configuration error surfaces before
/// generation starts.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Maximum depth of a tree; plans at depth `depth - 1` are leaves
    pub depth: usize,
    /// Subgoals in each non-leaf plan
    pub goals_per_plan: usize,
    /// Alternative plans per goal
    pub plans_per_goal: usize,
    /// Actions in each plan
    pub actions_per_plan: usize,
    /// Environment variables
    pub total_variables: usize,
    /// Variables eligible as action effects in each tree
    pub selected_variables: usize,
    /// Probability that a plan is forced to be a leaf
    pub leaf_probability: f64,
    /// Probability that a plan lays out its steps in parallel
    pub parallel_probability: f64,
    /// Number of trees in the forest
    pub tree_count: usize,
    pub seed: u64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            depth: 3,
            goals_per_plan: 3,
            plans_per_goal: 3,
            actions_per_plan: 3,
            total_variables: 60,
            selected_variables: DEFAULT_SELECTED_VARIABLES,
            leaf_probability: 0.0,
            parallel_probability: 0.0,
            tree_count: 10,
            seed: 100,
        }
    }
}

impl GenerationParams {
    /// Depth at which plans contain actions only.
    pub fn max_depth(&self) -> usize {
        self.depth.saturating_sub(1)
    }

    /// Check every fail-fast rule and hand the parameters back unchanged.
    pub fn validated(self) -> ApplicationResult<Self> {
        if self.depth == 0 {
            return Err(ApplicationError::invalid("depth", "must be greater than 0"));
        }
        if self.goals_per_plan == 0 {
            return Err(ApplicationError::invalid(
                "goals_per_plan",
                "must be greater than 0",
            ));
        }
        if self.plans_per_goal == 0 {
            return Err(ApplicationError::invalid(
                "plans_per_goal",
                "must be greater than 0",
            ));
        }
        if self.total_variables == 0 {
            return Err(ApplicationError::invalid(
                "total_variables",
                "must be greater than 0",
            ));
        }
        if self.tree_count == 0 {
            return Err(ApplicationError::invalid(
                "tree_count",
                "must be greater than 0",
            ));
        }
        if self.selected_variables > self.total_variables {
            return Err(ApplicationError::invalid(
                "selected_variables",
                format!(
                    "{} exceeds total_variables ({})",
                    self.selected_variables, self.total_variables
                ),
            ));
        }
        if self.selected_variables == 0 && self.actions_per_plan > 0 {
            return Err(ApplicationError::invalid(
                "selected_variables",
                "must be greater than 0 when plans contain actions",
            ));
        }
        check_probability("leaf_probability", self.leaf_probability)?;
        check_probability("parallel_probability", self.parallel_probability)?;

        // Subgoals sit strictly between the first and the last step of a plan.
        if self.depth > 1 {
            let interior = (self.actions_per_plan + self.goals_per_plan).saturating_sub(2);
            if self.goals_per_plan > interior {
                return Err(ApplicationError::invalid(
                    "goals_per_plan",
                    format!(
                        "{} subgoal(s) need {} interior position(s) but {} action(s) per plan leave {}",
                        self.goals_per_plan, self.goals_per_plan, self.actions_per_plan, interior
                    ),
                ));
            }
        }
        Ok(self)
    }
}

fn check_probability(name: &'static str, p: f64) -> ApplicationResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ApplicationError::invalid(
            name,
            format!("{p} is not between 0 and 1"),
        ))
    }
}
