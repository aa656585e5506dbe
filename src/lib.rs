// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod workflow;

use std::fs as std_fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::dag::LeveledPlan;
use crate::engine::{RunReport, Runtime};
use crate::errors::WfdagError;
use crate::exec::LocalExecutorBackend;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config and workflow loading
/// - plan building
/// - output directory scaffolding
/// - level-by-level execution
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_or_default(args.config.as_deref())?;
    if args.execute {
        cfg.execution.simulate = false;
    }

    let workflow = workflow::load_from_path(&args.workflow)?;
    let plan = LeveledPlan::from_workflow(&workflow)?;
    debug!("plan for '{}':\n{}", plan.workflow_name(), plan);

    if args.dry_run {
        print_dry_run(&plan, args.json)?;
        return Ok(());
    }

    let out_dir = args
        .output_directory
        .clone()
        .or_else(|| cfg.execution.work_dir.clone())
        .unwrap_or_else(|| PathBuf::from("out"));
    scaffold_output_directory(&out_dir, args.force_overwrite)?;
    write_json(&out_dir.join("plan.json"), &plan)?;

    let executor = LocalExecutorBackend::new(&out_dir, cfg.simulation.clone());
    let runtime = Runtime::new(executor, cfg);
    let report = runtime.run(&plan).await?;
    write_json(&out_dir.join("report.json"), &report)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, &out_dir);
    }

    Ok(())
}

/// Create `path`, refusing to reuse an existing one unless `overwrite`.
pub fn scaffold_output_directory(path: &Path, overwrite: bool) -> errors::Result<()> {
    if path.exists() && !overwrite {
        return Err(WfdagError::OutputDirectoryExists(path.to_path_buf()));
    }
    std_fs::create_dir_all(path)?;
    info!(path = %path.display(), "output directory ready");
    Ok(())
}

fn write_json(path: &Path, value: &impl Serialize) -> errors::Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    std_fs::write(path, contents)?;
    debug!(path = %path.display(), "wrote JSON");
    Ok(())
}

/// Dry-run output: the plan as text, or as JSON.
fn print_dry_run(plan: &LeveledPlan, json: bool) -> errors::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    println!("wfdag dry-run");
    println!("  workflow = {}", plan.workflow_name());
    println!("  tasks = {}", plan.task_count());
    println!("  levels = {}", plan.len());
    println!();

    for (level, ids) in plan.iter() {
        println!("level {level} ({} tasks):", ids.len());
        for task in ids.iter().filter_map(|id| plan.task(*id)) {
            println!("  - {} ({})", task.id, task.name());
            match task.record.command() {
                Some(args) => println!("      cmd: {}", args.join(" ")),
                None => println!("      cmd: <none>"),
            }
            if !task.parents.is_empty() {
                let parents: Vec<String> = task.parents.iter().map(|p| p.to_string()).collect();
                println!("      after: {}", parents.join(", "));
            }
            if !task.record.inputs().is_empty() {
                println!("      inputs: {:?}", task.record.inputs());
            }
            if !task.record.outputs().is_empty() {
                println!("      outputs: {:?}", task.record.outputs());
            }
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}

fn print_summary(report: &RunReport, out_dir: &Path) {
    let simulated = report.tasks.iter().filter(|t| t.simulated).count();
    println!(
        "{}: {} tasks completed ({} simulated); results in {}",
        report.workflow,
        report.tasks.len(),
        simulated,
        out_dir.display()
    );
}
