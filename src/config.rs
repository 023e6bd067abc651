//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/gptgen/gptgen.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `GPTGEN_*` prefix
//! 5. Command line flags (applied by the caller through [`Settings::merge_with`])

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::params::default_selection;
use crate::application::{ApplicationError, GenerationParams};

const ENV_PREFIX: &str = "GPTGEN";

/// Unified configuration for gptgen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Seed of the random stream
    pub seed: u64,
    /// Maximum tree depth
    pub depth: usize,
    pub goals_per_plan: usize,
    pub plans_per_goal: usize,
    pub actions_per_plan: usize,
    /// Environment variables in the forest
    pub total_variables: usize,
    /// Variables usable as effects per tree (default: 30, at most `total_variables`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_variables: Option<usize>,
    pub leaf_probability: f64,
    pub parallel_probability: f64,
    /// Number of top-level trees
    pub tree_count: usize,
    /// Where the XML document is written
    pub output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            seed: params.seed,
            depth: params.depth,
            goals_per_plan: params.goals_per_plan,
            plans_per_goal: params.plans_per_goal,
            actions_per_plan: params.actions_per_plan,
            total_variables: params.total_variables,
            selected_variables: None,
            leaf_probability: params.leaf_probability,
            parallel_probability: params.parallel_probability,
            tree_count: params.tree_count,
            output: PathBuf::from("gpt.xml"),
        }
    }
}

/// Raw settings for intermediate parsing: `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub seed: Option<u64>,
    pub depth: Option<usize>,
    pub goals_per_plan: Option<usize>,
    pub plans_per_goal: Option<usize>,
    pub actions_per_plan: Option<usize>,
    pub total_variables: Option<usize>,
    pub selected_variables: Option<usize>,
    pub leaf_probability: Option<f64>,
    pub parallel_probability: Option<f64>,
    pub tree_count: Option<usize>,
    pub output: Option<PathBuf>,
}

/// Get the XDG config directory for gptgen.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gptgen").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("gptgen.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the path untouched.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let environment = Environment::with_prefix(ENV_PREFIX);
        Self::load_layers(global.as_deref(), config_file, environment)
    }

    /// Layered loading with every source made explicit.
    pub fn load_layers(
        global: Option<&Path>,
        config_file: Option<&Path>,
        environment: Environment,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        current = current.merge_with(&Self::env_overrides(environment)?);

        current.output = expand_path(&current.output);
        Ok(current)
    }

    /// Environment source reading `vars` instead of the process environment.
    pub fn environment_from<I>(vars: I) -> Environment
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let source: Map<String, String> = vars.into_iter().collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    /// Read GPTGEN_* variables into a RawSettings overlay.
    fn env_overrides(environment: Environment) -> Result<RawSettings, ApplicationError> {
        let config = Config::builder()
            .add_source(environment.prefix_separator("_").try_parsing(true))
            .build()
            .map_err(config_err)?;

        fn opt<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
            match result {
                Ok(v) => Ok(Some(v)),
                Err(ConfigError::NotFound(_)) => Ok(None),
                Err(e) => Err(config_err(e)),
            }
        }

        Ok(RawSettings {
            seed: opt(config.get::<u64>("seed"))?,
            depth: opt(config.get::<usize>("depth"))?,
            goals_per_plan: opt(config.get::<usize>("goals_per_plan"))?,
            plans_per_goal: opt(config.get::<usize>("plans_per_goal"))?,
            actions_per_plan: opt(config.get::<usize>("actions_per_plan"))?,
            total_variables: opt(config.get::<usize>("total_variables"))?,
            selected_variables: opt(config.get::<usize>("selected_variables"))?,
            leaf_probability: opt(config.get_float("leaf_probability"))?,
            parallel_probability: opt(config.get_float("parallel_probability"))?,
            tree_count: opt(config.get::<usize>("tree_count"))?,
            output: opt(config.get_string("output"))?.map(PathBuf::from),
        })
    }

    /// Overlay wins wherever it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            seed: overlay.seed.unwrap_or(self.seed),
            depth: overlay.depth.unwrap_or(self.depth),
            goals_per_plan: overlay.goals_per_plan.unwrap_or(self.goals_per_plan),
            plans_per_goal: overlay.plans_per_goal.unwrap_or(self.plans_per_goal),
            actions_per_plan: overlay.actions_per_plan.unwrap_or(self.actions_per_plan),
            total_variables: overlay.total_variables.unwrap_or(self.total_variables),
            selected_variables: overlay.selected_variables.or(self.selected_variables),
            leaf_probability: overlay.leaf_probability.unwrap_or(self.leaf_probability),
            parallel_probability: overlay
                .parallel_probability
                .unwrap_or(self.parallel_probability),
            tree_count: overlay.tree_count.unwrap_or(self.tree_count),
            output: overlay
                .output
                .as_ref()
                .map(|p| expand_path(p))
                .unwrap_or_else(|| self.output.clone()),
        }
    }

    /// Produce the immutable, validated parameter set.
    pub fn validate(&self) -> Result<GenerationParams, ApplicationError> {
        GenerationParams {
            depth: self.depth,
            goals_per_plan: self.goals_per_plan,
            plans_per_goal: self.plans_per_goal,
            actions_per_plan: self.actions_per_plan,
            total_variables: self.total_variables,
            selected_variables: self
                .selected_variables
                .unwrap_or_else(|| default_selection(self.total_variables)),
            leaf_probability: self.leaf_probability,
            parallel_probability: self.parallel_probability,
            tree_count: self.tree_count,
            seed: self.seed,
        }
        .validated()
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# gptgen configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/gptgen/gptgen.toml
#   File:   gptgen generate --config <file>
#   Env:    GPTGEN_* environment variables (e.g. GPTGEN_SEED=7)
#   Flags:  command line options

# Seed of the random stream; same seed and parameters give the same forest
# seed = 100

# Maximum depth of each tree (plans at the deepest level hold actions only)
# depth = 3

# Subgoals per non-leaf plan
# goals_per_plan = 3

# Alternative plans per goal
# plans_per_goal = 3

# Actions per plan
# actions_per_plan = 3

# Environment variables and how many of them actions may change per tree
# (default: 30, capped at total_variables); the rest only appear in plan contexts
# total_variables = 60
# selected_variables = 30

# Probability that a plan is cut short into a leaf
# leaf_probability = 0.0

# Probability that a plan runs its steps in parallel
# parallel_probability = 0.0

# Number of top-level trees
# tree_count = 10

# Output document
# output = "gpt.xml"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
