//! Command dispatch and handlers

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info, instrument};

use crate::application::hash::{fingerprint, short_fingerprint};
use crate::application::{generate_forest, GenerationParams};
use crate::cli::args::{Cli, Commands, ConfigCommands, GenerationArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::Forest;
use crate::infrastructure::{ForestExporter, InfraError, XmlExporter};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Generate { options } => cmd_generate(options),
        Commands::Show { options, tree } => cmd_show(options, *tree),
        Commands::Config { command } => match command {
            ConfigCommands::Show { config } => cmd_config_show(config.as_deref()),
            ConfigCommands::Init { path, force } => cmd_config_init(path.as_deref(), *force),
            ConfigCommands::Path => cmd_config_path(),
        },
        Commands::Completion { shell } => cmd_completion(*shell),
    }
}

/// Config layers with the command line flags on top.
pub fn resolve_settings(options: &GenerationArgs) -> CliResult<(Settings, GenerationParams)> {
    let settings = Settings::load(options.config.as_deref())?.merge_with(&options.to_overrides());
    let params = settings.validate()?;
    debug!(?params, output = %settings.output.display(), "settings resolved");
    Ok((settings, params))
}

/// Summary of a written document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output: PathBuf,
    pub trees: usize,
    pub goals: usize,
    pub plans: usize,
    pub actions: usize,
    pub parallel: usize,
    pub sha256: String,
}

/// Generate the forest for `params` and write it to `output`.
pub fn generate_to_path(params: &GenerationParams, output: &Path) -> CliResult<GenerationReport> {
    let forest = generate_forest(params)?;
    let document = XmlExporter::new().write_to_path(&forest, output)?;
    let counts = forest.counts();
    let report = GenerationReport {
        output: output.to_path_buf(),
        trees: forest.goals.len(),
        goals: counts.goals,
        plans: counts.plans,
        actions: counts.actions,
        parallel: counts.parallel,
        sha256: fingerprint(document.as_bytes()),
    };
    info!(
        output = %output.display(),
        hash = %short_fingerprint(document.as_bytes()),
        "forest written"
    );
    Ok(report)
}

#[instrument(skip(options))]
fn cmd_generate(options: &GenerationArgs) -> CliResult<()> {
    let (settings, params) = resolve_settings(options)?;
    let report = generate_to_path(&params, &settings.output)?;

    output::success(&format!("Wrote {}", report.output.display()));
    output::detail(&format!("trees:    {}", report.trees));
    output::detail(&format!(
        "nodes:    {} goals, {} plans, {} actions, {} parallel",
        report.goals, report.plans, report.actions, report.parallel
    ));
    output::detail(&format!("seed:     {}", params.seed));
    output::detail(&format!("sha256:   {}", report.sha256));
    Ok(())
}

#[instrument(skip(options))]
fn cmd_show(options: &GenerationArgs, tree: Option<usize>) -> CliResult<()> {
    let (_, params) = resolve_settings(options)?;
    let forest = generate_forest(&params)?;
    output::info(&render_forest(&forest, tree)?);
    Ok(())
}

/// Tree view of the whole forest or of a single tree.
pub fn render_forest(forest: &Forest, tree: Option<usize>) -> CliResult<String> {
    match tree {
        None => Ok(forest.to_tree_string().to_string()),
        Some(i) => forest
            .goals
            .get(i)
            .map(|g| g.to_tree_string().to_string())
            .ok_or_else(|| {
                CliError::InvalidArgs(format!(
                    "tree {i} out of range (forest has {} trees)",
                    forest.goals.len()
                ))
            }),
    }
}

#[instrument]
fn cmd_config_show(config: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load(config)?;
    output::info(&settings.to_toml()?);
    Ok(())
}

#[instrument]
fn cmd_config_init(path: Option<&Path>, force: bool) -> CliResult<()> {
    let target = match path {
        Some(p) => p.to_path_buf(),
        None => global_config_path().ok_or_else(|| {
            CliError::InvalidArgs("cannot determine config directory".to_string())
        })?,
    };
    write_template(&target, force)?;
    output::success(&format!("Created {}", target.display()));
    Ok(())
}

/// Write the config template, refusing to clobber an existing file unless forced.
pub fn write_template(target: &Path, force: bool) -> CliResult<()> {
    if target.exists() && !force {
        return Err(CliError::InvalidArgs(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
    }
    fs::write(target, Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
    Ok(())
}

fn cmd_config_path() -> CliResult<()> {
    match global_config_path() {
        Some(path) => {
            let state = if path.exists() { "" } else { " (not found)" };
            output::action("global", &format!("{}{state}", path.display()));
        }
        None => output::warning("no config directory on this platform"),
    }
    output::action("env", &"GPTGEN_* (e.g. GPTGEN_SEED, GPTGEN_TREE_COUNT)");
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
