//! Deterministic generator of goal-plan tree forests.
//!
//! A forest is a set of AND/OR trees (goals with alternative plans, plans with
//! ordered actions and subgoals) annotated with pre- and postconditions over a
//! shared environment. The same seed and parameters always yield the same
//! forest, which makes the XML output usable as a benchmark fixture.
//!
//! ```no_run
//! use gptgen::application::{generate_forest, GenerationParams};
//! use gptgen::infrastructure::{ForestExporter, XmlExporter};
//!
//! let params = GenerationParams::default().validated()?;
//! let forest = generate_forest(&params)?;
//! let xml = XmlExporter::new().render(&forest)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
