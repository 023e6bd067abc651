//! Ordered literal collections and the consistency-preserving operations on them.
//!
//! A [`ConditionSet`] plays two roles during generation:
//! - as a *truth* set (preconditions, postconditions, ledgers) it holds at most
//!   one polarity per id;
//! - as an effect *pool* it lists candidate effects and may hold both
//!   polarities of an id until one of them is consumed.
//!
//! Operations take `self` by value and hand back the updated set so that the
//! recursive generator never shares a mutable collection between callers.

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::literal::Literal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionSet {
    literals: Vec<Literal>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(literal: Literal) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Literal> {
        self.literals.iter()
    }

    pub fn as_slice(&self) -> &[Literal] {
        &self.literals
    }

    pub fn first(&self) -> Option<&Literal> {
        self.literals.first()
    }

    /// Exact membership (id and polarity).
    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    /// Membership by id, either polarity.
    pub fn contains_id(&self, id: &str) -> bool {
        self.literals.iter().any(|l| l.id() == id)
    }

    /// Ids in order of first appearance, each listed once.
    pub fn distinct_ids(&self) -> Vec<&str> {
        self.literals.iter().map(Literal::id).unique().collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.first_conflict().is_none()
    }

    /// Fails when the set holds an atom together with its negation.
    pub fn check_consistent(&self) -> DomainResult<()> {
        match self.first_conflict() {
            Some(id) => Err(DomainError::InconsistentConditions { id }),
            None => Ok(()),
        }
    }

    fn first_conflict(&self) -> Option<String> {
        let mut seen: HashSet<(&str, bool)> = HashSet::new();
        for lit in &self.literals {
            if seen.contains(&(lit.id(), !lit.state())) {
                return Some(lit.id().to_string());
            }
            seen.insert((lit.id(), lit.state()));
        }
        None
    }

    /// Record that `atom` now holds: its negation is dropped and the atom is
    /// appended unless already present.
    pub fn add_established(mut self, atom: Literal) -> Self {
        self.literals.retain(|l| !l.is_opposite(&atom));
        if !self.literals.contains(&atom) {
            self.literals.push(atom);
        }
        self
    }

    /// Mark `atom` as used up in an effect pool.
    ///
    /// The atom leaves the pool so no later step can re-achieve it, and its
    /// negation becomes eligible (appended unless already listed).
    pub fn consume_as_precondition(mut self, atom: &Literal) -> Self {
        self.literals.retain(|l| l != atom);
        let negation = atom.negated();
        if !self.literals.contains(&negation) {
            self.literals.push(negation);
        }
        self
    }

    /// Strip every atom whose id appears in `used`, regardless of polarity.
    pub fn remove_conflicting(mut self, used: &ConditionSet) -> Self {
        self.literals.retain(|l| !used.contains_id(l.id()));
        self
    }

    /// Strip exact matches of `other`.
    pub fn without(mut self, other: &ConditionSet) -> Self {
        self.literals.retain(|l| !other.contains(l));
        self
    }

    /// Keep only atoms whose id is in `ids`.
    pub fn restricted_to(&self, ids: &[&str]) -> Self {
        self.literals
            .iter()
            .filter(|l| ids.contains(&l.id()))
            .cloned()
            .collect()
    }
}

/// The atoms guaranteed whichever alternative ends up being chosen.
///
/// Exact (id and polarity) intersection; every input is treated alike and the
/// result keeps the order of the first input.
pub fn intersect_across_alternatives(results: &[ConditionSet]) -> ConditionSet {
    let Some((first, rest)) = results.split_first() else {
        return ConditionSet::new();
    };
    first
        .iter()
        .filter(|lit| rest.iter().all(|other| other.contains(lit)))
        .cloned()
        .collect()
}

/// The atoms guaranteed once every parallel branch has run.
///
/// Branches must not target overlapping ids; the first shared id is reported
/// as [`DomainError::ParallelConflict`].
pub fn union_across_parallel(results: &[ConditionSet]) -> DomainResult<ConditionSet> {
    let mut union = ConditionSet::new();
    for (idx, branch) in results.iter().enumerate() {
        for lit in branch {
            let claimed_elsewhere = results
                .iter()
                .enumerate()
                .any(|(other_idx, other)| other_idx != idx && other.contains_id(lit.id()));
            if claimed_elsewhere {
                return Err(DomainError::ParallelConflict {
                    id: lit.id().to_string(),
                });
            }
            union = union.add_established(lit.clone());
        }
    }
    Ok(union)
}

impl FromIterator<Literal> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self {
            literals: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Literal>> for ConditionSet {
    fn from(literals: Vec<Literal>) -> Self {
        Self { literals }
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Literal;
    type IntoIter = std::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl IntoIterator for ConditionSet {
    type Item = Literal;
    type IntoIter = std::vec::IntoIter<Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.into_iter()
    }
}

/// `(a,true), (b,false)`
impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literals.iter().join(", "))
    }
}
