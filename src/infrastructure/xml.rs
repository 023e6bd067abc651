//! XML document for goal-plan forests.
//!
//! ```text
//! <Forest>
//!   <Environment>
//!     <Literal name="G-0" value="false" />
//!   </Environment>
//!   <Goal name="T0-G0" goal-condition="(G-0,true);">
//!     <Plan name="T0-P0" precondition="(EV-3,false);">
//!       <Action name="T0-A0" precondition="(EV-3,false);" postcondition="(EV-1,true);" />
//!     </Plan>
//!   </Goal>
//! </Forest>
//! ```

use std::fmt::Write;

use itertools::Itertools;
use quick_xml::escape::escape;

use crate::domain::{
    ActionNode, ConditionSet, Forest, GoalNode, Literal, ParallelComposition, PlanNode, Step,
};
use crate::infrastructure::{ForestExporter, InfraResult};

const INDENT: &str = "  ";
const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExporter;

impl XmlExporter {
    pub fn new() -> Self {
        Self
    }
}

impl ForestExporter for XmlExporter {
    fn format(&self) -> &'static str {
        "xml"
    }

    fn render(&self, forest: &Forest) -> InfraResult<String> {
        let mut out = String::new();
        writeln!(out, "{DECLARATION}")?;
        writeln!(out, "<Forest>")?;
        writeln!(out, "{INDENT}<Environment>")?;
        for literal in forest.environment.literals() {
            write_literal(&mut out, literal, 2)?;
        }
        writeln!(out, "{INDENT}</Environment>")?;
        for goal in &forest.goals {
            write_goal(&mut out, goal, 1)?;
        }
        writeln!(out, "</Forest>")?;
        Ok(out)
    }
}

fn pad(level: usize) -> String {
    INDENT.repeat(level)
}

/// `(a,true), (b,false);` or `None` for an empty set.
fn condition_attr(name: &str, conditions: &ConditionSet) -> Option<String> {
    if conditions.is_empty() {
        return None;
    }
    let joined = conditions.iter().join(", ");
    Some(format!(r#" {name}="{};""#, escape(&joined)))
}

fn write_literal(out: &mut String, literal: &Literal, level: usize) -> std::fmt::Result {
    writeln!(
        out,
        r#"{}<Literal name="{}" value="{}" />"#,
        pad(level),
        escape(literal.id()),
        literal.state()
    )
}

fn write_goal(out: &mut String, goal: &GoalNode, level: usize) -> std::fmt::Result {
    let condition = condition_attr("goal-condition", &goal.goal_condition).unwrap_or_default();
    writeln!(
        out,
        r#"{}<Goal name="{}"{condition}>"#,
        pad(level),
        escape(&goal.id)
    )?;
    for plan in &goal.plans {
        write_plan(out, plan, level + 1)?;
    }
    writeln!(out, "{}</Goal>", pad(level))
}

fn write_plan(out: &mut String, plan: &PlanNode, level: usize) -> std::fmt::Result {
    let context = condition_attr("precondition", &plan.context_precondition).unwrap_or_default();
    writeln!(
        out,
        r#"{}<Plan name="{}"{context}>"#,
        pad(level),
        escape(&plan.id)
    )?;
    for step in &plan.body {
        write_step(out, step, level + 1)?;
    }
    writeln!(out, "{}</Plan>", pad(level))
}

fn write_step(out: &mut String, step: &Step, level: usize) -> std::fmt::Result {
    match step {
        Step::Action(action) => write_action(out, action, level),
        Step::Goal(goal) => write_goal(out, goal, level),
        Step::Parallel(parallel) => write_parallel(out, parallel, level),
    }
}

fn write_action(out: &mut String, action: &ActionNode, level: usize) -> std::fmt::Result {
    let pre = condition_attr("precondition", &action.precondition).unwrap_or_default();
    let post = condition_attr("postcondition", &action.postcondition).unwrap_or_default();
    writeln!(
        out,
        r#"{}<Action name="{}"{pre}{post} />"#,
        pad(level),
        escape(&action.id)
    )
}

fn write_parallel(out: &mut String, parallel: &ParallelComposition, level: usize) -> std::fmt::Result {
    writeln!(out, r#"{}<Parallel_composition name="||">"#, pad(level))?;
    for child in &parallel.children {
        write_step(out, child, level + 1)?;
    }
    writeln!(out, "{}</Parallel_composition>", pad(level))
}
