//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::config::RawSettings;

/// Deterministic goal-plan tree fixture generator for intention-progression benchmarks
#[derive(Parser, Debug)]
#[command(name = "gptgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: --debug --debug --debug)
    #[arg(long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a forest and write it as XML
    Generate {
        #[command(flatten)]
        options: GenerationArgs,
    },

    /// Print the forest as a tree
    Show {
        #[command(flatten)]
        options: GenerationArgs,
        /// Only this tree (0-based)
        #[arg(long)]
        tree: Option<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Generation parameters; anything left out falls back to the config layers.
#[derive(Args, Debug, Default, Clone)]
pub struct GenerationArgs {
    /// Seed of the random stream
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Maximum depth of each tree
    #[arg(short = 'd', long)]
    pub depth: Option<usize>,

    /// Subgoals per non-leaf plan
    #[arg(short = 'g', long = "goals")]
    pub goals_per_plan: Option<usize>,

    /// Alternative plans per goal
    #[arg(short = 'p', long = "plans")]
    pub plans_per_goal: Option<usize>,

    /// Actions per plan
    #[arg(short = 'a', long = "actions")]
    pub actions_per_plan: Option<usize>,

    /// Probability that a plan is cut short into a leaf
    #[arg(short = 'l', long = "leaf-probability")]
    pub leaf_probability: Option<f64>,

    /// Probability that a plan runs its steps in parallel
    #[arg(short = 'P', long = "parallel-probability")]
    pub parallel_probability: Option<f64>,

    /// Total environment variables
    #[arg(short = 'v', long = "variables")]
    pub total_variables: Option<usize>,

    /// Variables usable as action effects
    #[arg(short = 'e', long = "selected")]
    pub selected_variables: Option<usize>,

    /// Number of trees
    #[arg(short = 't', long = "trees")]
    pub tree_count: Option<usize>,

    /// Output file
    #[arg(short = 'f', long = "file", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Additional config file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

impl GenerationArgs {
    /// Flags as the topmost config layer.
    pub fn to_overrides(&self) -> RawSettings {
        RawSettings {
            seed: self.seed,
            depth: self.depth,
            goals_per_plan: self.goals_per_plan,
            plans_per_goal: self.plans_per_goal,
            actions_per_plan: self.actions_per_plan,
            total_variables: self.total_variables,
            selected_variables: self.selected_variables,
            leaf_probability: self.leaf_probability,
            parallel_probability: self.parallel_probability,
            tree_count: self.tree_count,
            output: self.output.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show {
        /// Additional config file
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
    },
    /// Create a config template
    Init {
        /// Where to write it (default: global config path)
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show config file locations
    Path,
}
