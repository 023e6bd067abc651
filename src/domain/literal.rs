//! Boolean propositions with a polarity.

use std::fmt;

/// A named proposition together with the value it is asserted to have.
///
/// Two literals are *opposite* when they share an id but disagree on the state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    id: String,
    state: bool,
}

impl Literal {
    pub fn new(id: impl Into<String>, state: bool) -> Self {
        Self {
            id: id.into(),
            state,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> bool {
        self.state
    }

    /// The same proposition with the opposite value.
    pub fn negated(&self) -> Self {
        Self {
            id: self.id.clone(),
            state: !self.state,
        }
    }

    pub fn is_opposite(&self, other: &Literal) -> bool {
        self.id == other.id && self.state != other.state
    }

    /// True when both literals talk about the same proposition, whatever the polarity.
    pub fn shares_id(&self, other: &Literal) -> bool {
        self.id == other.id
    }
}

/// Stable textual form `(id,state)` consumed by exporters.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.id, self.state)
    }
}
