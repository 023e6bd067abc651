//! Terminal tree rendering of generated forests.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{ActionNode, ConditionSet, Forest, GoalNode, PlanNode, Step};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn conditions(label: &str, set: &ConditionSet) -> String {
    if set.is_empty() {
        String::new()
    } else {
        format!(" {label}[{set}]")
    }
}

impl TreeNodeConvert for GoalNode {
    #[instrument(level = "trace", skip(self), fields(goal = %self.id))]
    fn to_tree_string(&self) -> Tree<String> {
        let root = format!("{}{}", self.id, conditions("achieves", &self.goal_condition));
        let leaves: Vec<_> = self.plans.iter().map(|p| p.to_tree_string()).collect();
        Tree::new(root).with_leaves(leaves)
    }
}

impl TreeNodeConvert for PlanNode {
    fn to_tree_string(&self) -> Tree<String> {
        let root = format!("{}{}", self.id, conditions("context", &self.context_precondition));
        let leaves: Vec<_> = self.body.iter().map(|s| s.to_tree_string()).collect();
        Tree::new(root).with_leaves(leaves)
    }
}

impl TreeNodeConvert for ActionNode {
    fn to_tree_string(&self) -> Tree<String> {
        Tree::new(format!(
            "{}{}{}",
            self.id,
            conditions("pre", &self.precondition),
            conditions("post", &self.postcondition)
        ))
    }
}

impl TreeNodeConvert for Step {
    fn to_tree_string(&self) -> Tree<String> {
        match self {
            Step::Action(a) => a.to_tree_string(),
            Step::Goal(g) => g.to_tree_string(),
            Step::Parallel(p) => {
                let leaves: Vec<_> = p.children.iter().map(|c| c.to_tree_string()).collect();
                Tree::new("||".to_string()).with_leaves(leaves)
            }
        }
    }
}

impl TreeNodeConvert for Forest {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.goals.iter().map(|g| g.to_tree_string()).collect();
        Tree::new(format!("Forest ({} trees)", self.goals.len())).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Literal;

    #[test]
    fn given_goal_when_rendering_then_nodes_nest_under_plans() {
        let goal = GoalNode {
            id: "T0-G0".into(),
            goal_condition: ConditionSet::singleton(Literal::new("G-0", true)),
            postcondition: ConditionSet::singleton(Literal::new("G-0", true)),
            plans: vec![PlanNode {
                id: "T0-P0".into(),
                context_precondition: ConditionSet::new(),
                postcondition: ConditionSet::singleton(Literal::new("G-0", true)),
                body: vec![Step::Action(ActionNode {
                    id: "T0-A0".into(),
                    precondition: ConditionSet::new(),
                    postcondition: ConditionSet::singleton(Literal::new("G-0", true)),
                })],
            }],
        };

        let rendered = goal.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "T0-G0 achieves[(G-0,true)]");
        assert!(lines[1].ends_with("T0-P0"));
        assert!(lines[2].ends_with("T0-A0 post[(G-0,true)]"));
    }
}
