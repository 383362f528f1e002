// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod score;
pub mod task;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{RunSettings, load_and_validate, load_run_section};
use crate::engine::{DataContext, RunContext, TraversalEngine};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::graph::{GraphDocument, NodeSpec, load_data, load_graph};
use crate::score::{ScoreReport, aggregate, write_report};
use crate::task::ModuleRegistry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides + env)
/// - graph and data context loading
/// - the module registry (built-ins + scripts under the module root)
/// - the traversal and the score
pub fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let registry = ModuleRegistry::with_builtins();
    let (config_path, explicit) = args.config_path();
    let env_root = std::env::var_os("NAGARE_MODULE_ROOT").map(PathBuf::from);

    if args.list_modules {
        let section = load_run_section(&fs, &config_path, explicit)?.merged_with(args.overrides());
        let root = config::validate_module_root(&fs, section.module_root.or(env_root).as_deref())?;
        print_modules(&registry, &root)?;
        return Ok(());
    }

    let settings = load_and_validate(&fs, &config_path, explicit, args.overrides(), env_root)?;
    let graph = load_graph(&fs, &settings.graph)?;

    if args.dry_run {
        print_dry_run(&settings, &graph);
        return Ok(());
    }

    let report = run_session(&fs, &registry, &settings, &graph)?;
    println!("{}", report.summary);
    Ok(())
}

/// Run one session from validated settings: load the data context, traverse
/// `graph`, aggregate, and write the score if a path is configured.
///
/// The score file is fully written before this returns.
pub fn run_session(
    fs: &dyn FileSystem,
    registry: &ModuleRegistry,
    settings: &RunSettings,
    graph: &GraphDocument,
) -> Result<ScoreReport> {
    let data = match &settings.data {
        Some(path) => load_data(fs, path)?,
        None => DataContext::new(),
    };

    info!(
        graph = ?settings.graph,
        strict = settings.strict,
        propagate = settings.propagate,
        descend = %settings.descend,
        "running graph"
    );

    let mut ctx = RunContext::from_settings(settings, data);
    TraversalEngine::new(registry).run(&mut ctx, &graph.nodes);
    let report = aggregate(ctx.visited_nodes());

    if let Some(score_path) = &settings.score {
        write_report(fs, score_path, &report)?;
    }

    info!(summary = %report.summary, "finished running graph");
    Ok(report)
}

/// Dry-run output: settings and the graph tree with commands.
fn print_dry_run(settings: &RunSettings, graph: &GraphDocument) {
    println!("nagare dry-run");
    println!("  graph = {}", settings.graph.display());
    println!("  module_root = {}", settings.module_root.display());
    println!("  strict = {}", settings.strict);
    println!("  propagate = {}", settings.propagate);
    println!("  descend = {}", settings.descend);
    if let Some(data) = &settings.data {
        println!("  data = {}", data.display());
    }
    if let Some(score) = &settings.score {
        println!("  score = {}", score.display());
    }
    println!();

    println!("nodes ({}):", graph.node_count());
    for spec in &graph.nodes {
        print_spec(spec, 1);
    }

    debug!("dry-run complete (no execution)");
}

fn print_spec(spec: &NodeSpec, depth: usize) {
    let indent = "  ".repeat(depth);
    match &spec.command {
        Some(cmd) => println!("{indent}- {} [{cmd}]", spec.name),
        None => println!("{indent}- {} (router)", spec.name),
    }
    for child in &spec.children {
        print_spec(child, depth + 1);
    }
}

fn print_modules(registry: &ModuleRegistry, module_root: &Path) -> Result<()> {
    println!("built-in modules:");
    for command in registry.commands() {
        println!("  - {command}");
    }

    let scripts = registry.discover_scripts(module_root)?;
    println!("scripts under {} ({}):", module_root.display(), scripts.len());
    for command in scripts {
        let shadowed = if registry.contains(&command) {
            " (shadowed by built-in)"
        } else {
            ""
        };
        println!("  - {command}{shadowed}");
    }
    Ok(())
}
