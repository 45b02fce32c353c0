// src/lib.rs

pub mod cli;
pub mod codec;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod mask;
pub mod orchestrator;
pub mod project;
pub mod properties;
pub mod session;
pub mod version;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, Level};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::graph::collect_project_dependencies;
use crate::orchestrator::{RunOrchestrator, RunReport, RunRequest};
use crate::project::Properties;
use crate::properties::ProjectPropertiesBuilder;
use crate::session::dump::MASKED_VALUE;
use crate::session::{DumpSession, HostExtensions, PropertiesBuilder};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - graph files → dependency trees → run properties
/// - the dump session and the run orchestrator
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let base_dir = config_root_dir(&config_path);

    if args.dry_run {
        print!("{}", dry_run_report(&cfg, &base_dir)?);
        return Ok(());
    }

    let skip = args.skip || cfg.scanner.skip;
    if let Some(report) = run_from_config(&cfg, &base_dir, skip)? {
        info!(
            state = %report.state,
            server_version = %report.server_version,
            "analysis done"
        );
    }
    Ok(())
}

/// Run the analysis described by `cfg`, resolving relative paths against
/// `base_dir`. Returns `None` when the analysis was skipped.
pub fn run_from_config(
    cfg: &ConfigFile,
    base_dir: &Path,
    skip: bool,
) -> errors::Result<Option<RunReport>> {
    if skip {
        info!("sonar.skip = true: Skipping analysis");
        return Ok(None);
    }

    let properties_builder = properties_builder(cfg, base_dir);
    let extensions = HostExtensions::standard();
    let session = DumpSession::new(
        base_dir.join(&cfg.session.dump_file),
        cfg.session.server_version.clone(),
    );

    let mut orchestrator = RunOrchestrator::new(
        session,
        &extensions,
        &properties_builder,
        cfg.sensitive_keys()?,
    );
    let report = orchestrator.execute(&run_request(cfg))?;
    Ok(Some(report))
}

fn properties_builder(
    cfg: &ConfigFile,
    base_dir: &Path,
) -> ProjectPropertiesBuilder<graph::FileGraphBuilder> {
    // Debug logging implies a verbose analysis.
    let verbose = cfg.scanner.verbose || tracing::enabled!(Level::DEBUG);
    ProjectPropertiesBuilder::new(cfg.graph_builder(base_dir))
        .with_filter(cfg.projection_filter())
        .with_dependencies_key(cfg.scanner.dependencies_key.clone())
        .verbose(verbose)
}

fn run_request(cfg: &ConfigFile) -> RunRequest {
    RunRequest {
        root: cfg.root_project(),
        sub_projects: cfg.sub_projects(),
        properties: Properties::new(),
    }
}

/// Directory containing the config file; graph and dump paths are relative
/// to it.
///
/// - If the config path has a non-empty parent (e.g. "ci/Scanlink.toml"),
///   that directory is used.
/// - For a bare filename the current working directory is used.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Dry-run output: dependency trees per project, their encoded JSON and
/// the run properties (masked values hidden). No session is started.
pub fn dry_run_report(cfg: &ConfigFile, base_dir: &Path) -> Result<String> {
    let graphs = cfg.graph_builder(base_dir);
    let filter = cfg.projection_filter();
    let request = run_request(cfg);
    let mut out = String::new();

    writeln!(out, "scanlink dry-run")?;
    writeln!(
        out,
        "  session.server_version = {}",
        cfg.session.server_version.as_deref().unwrap_or("<unknown>")
    )?;
    writeln!(out, "  session.dump_file = {:?}", cfg.session.dump_file)?;
    writeln!(out)?;

    let projects = std::iter::once(&request.root).chain(request.sub_projects.iter());
    for project in projects {
        let nodes = collect_project_dependencies(&graphs, project, &filter)?;
        writeln!(out, "{} [{}]", project, project.id)?;
        for node in &nodes {
            write_tree(&mut out, node, 1)?;
        }
        writeln!(out, "  json: {}", codec::encode(&nodes)?)?;
    }
    writeln!(out)?;

    let sensitive = cfg.sensitive_keys()?;
    writeln!(out, "masked key patterns: {:?}", sensitive.patterns())?;
    let properties = properties_builder(cfg, base_dir).configure(
        &request.sub_projects,
        &request.root,
        request.properties.clone(),
    )?;
    writeln!(out, "properties ({}):", properties.len())?;
    for (key, value) in &properties {
        let value = if sensitive.is_sensitive(key) {
            MASKED_VALUE
        } else {
            value.as_str()
        };
        writeln!(out, "  {key}={value}")?;
    }

    debug!("dry-run complete (no session started)");
    Ok(out)
}

fn write_tree(out: &mut String, node: &codec::DependencyNode, depth: usize) -> std::fmt::Result {
    writeln!(
        out,
        "{}- {}:{} ({})",
        "  ".repeat(depth),
        node.key,
        node.version,
        if node.scope.is_empty() { "-" } else { node.scope.as_str() }
    )?;
    for child in &node.children {
        write_tree(out, child, depth + 1)?;
    }
    Ok(())
}
