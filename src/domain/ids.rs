//! Per-tree node identifiers.

/// Monotonic goal/plan/action counters for one tree.
///
/// A fresh allocator is created for every top-level tree so numbering restarts
/// at zero: `T{tree}-G{n}`, `T{tree}-P{n}`, `T{tree}-A{n}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    tree: usize,
    goals: usize,
    plans: usize,
    actions: usize,
}

impl IdAllocator {
    pub fn new(tree: usize) -> Self {
        Self {
            tree,
            goals: 0,
            plans: 0,
            actions: 0,
        }
    }

    pub fn next_goal(&mut self) -> String {
        let id = format!("T{}-G{}", self.tree, self.goals);
        self.goals += 1;
        id
    }

    pub fn next_plan(&mut self) -> String {
        let id = format!("T{}-P{}", self.tree, self.plans);
        self.plans += 1;
        id
    }

    pub fn next_action(&mut self) -> String {
        let id = format!("T{}-A{}", self.tree, self.actions);
        self.actions += 1;
        id
    }

    /// Number of (goals, plans, actions) handed out so far.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.goals, self.plans, self.actions)
    }
}
