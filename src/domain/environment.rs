//! Named propositions shared by every tree of a forest.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::conditions::ConditionSet;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::literal::Literal;
use crate::domain::rng::SeededRng;

/// Prefix of the per-tree goal indicator propositions.
pub const GOAL_PREFIX: &str = "G-";
/// Prefix of the environment propositions.
pub const VARIABLE_PREFIX: &str = "EV-";

/// Initial state of the world: one goal indicator per tree plus the
/// environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentModel {
    goal_indicators: Vec<Literal>,
    variables: Vec<Literal>,
}

/// Per-tree partition of the environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSelection {
    /// Variables an action may produce as an effect
    pub relevant: Vec<Literal>,
    /// Pure environment variables, usable only as extra plan context
    pub irrelevant: Vec<Literal>,
}

impl EnvironmentModel {
    /// Goal indicators start false; each variable gets a coin-flipped initial value.
    pub fn initialize(num_variables: usize, num_trees: usize, rng: &mut SeededRng) -> Self {
        let goal_indicators = (0..num_trees)
            .map(|i| Literal::new(format!("{GOAL_PREFIX}{i}"), false))
            .collect();
        let variables = (0..num_variables)
            .map(|i| Literal::new(format!("{VARIABLE_PREFIX}{i}"), rng.coin()))
            .collect();
        debug!(num_variables, num_trees, "environment initialized");
        Self {
            goal_indicators,
            variables,
        }
    }

    /// All propositions: goal indicators first, then variables in index order.
    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.goal_indicators.iter().chain(self.variables.iter())
    }

    pub fn len(&self) -> usize {
        self.goal_indicators.len() + self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<&Literal> {
        self.literals().find(|l| l.id() == id)
    }

    pub fn variables(&self) -> &[Literal] {
        &self.variables
    }

    pub fn goal_indicators(&self) -> &[Literal] {
        &self.goal_indicators
    }

    /// The condition a tree's top-level goal has to make true.
    pub fn goal_condition(tree: usize) -> ConditionSet {
        ConditionSet::singleton(Literal::new(format!("{GOAL_PREFIX}{tree}"), true))
    }

    /// Split the variables into `m` relevant ones and the irrelevant rest.
    pub fn select_relevant(&self, m: usize, rng: &mut SeededRng) -> DomainResult<VariableSelection> {
        let total = self.variables.len();
        let picked: HashSet<usize> = rng
            .sample_indices(total, m)
            .ok_or(DomainError::SelectionExceedsVariables { selected: m, total })?
            .into_iter()
            .collect();

        let (relevant, irrelevant): (Vec<_>, Vec<_>) = self
            .variables
            .iter()
            .enumerate()
            .partition(|(i, _)| picked.contains(i));

        Ok(VariableSelection {
            relevant: relevant.into_iter().map(|(_, l)| l.clone()).collect(),
            irrelevant: irrelevant.into_iter().map(|(_, l)| l.clone()).collect(),
        })
    }
}

impl VariableSelection {
    /// Both polarities of every relevant variable: initial values first, then negations.
    pub fn effect_pool(&self) -> ConditionSet {
        self.relevant
            .iter()
            .cloned()
            .chain(self.relevant.iter().map(Literal::negated))
            .collect()
    }
}
