// src/exec/task_runner.rs

//! Runs a single work unit.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::engine::{TaskOutcome, TaskReport, WorkUnit};
use crate::fs::FileSystem;

/// What a unit needs from its backend.
#[derive(Debug, Clone)]
pub struct UnitContext {
    pub fs: Arc<dyn FileSystem>,
    pub work_dir: PathBuf,
    /// `Some` when the unit is simulated.
    pub simulated_duration: Option<Duration>,
}

/// Run one unit and report how it went.
///
/// - no command: only create the declared outputs;
/// - simulated: sleep for the sampled duration, then create the outputs;
/// - otherwise: run the command in the work directory.
///
/// Internal errors (spawn failure, unwritable output) are logged and reported
/// as `Failed(-1)`.
pub async fn run_unit(unit: WorkUnit, ctx: UnitContext) -> TaskReport {
    let started = Instant::now();
    let outcome = match run_unit_inner(&unit, &ctx).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(task = %unit.name, error = %err, "task execution error");
            TaskOutcome::Failed(-1)
        }
    };
    let elapsed = started.elapsed().as_secs_f64();
    TaskReport::new(unit, outcome, elapsed)
}

async fn run_unit_inner(unit: &WorkUnit, ctx: &UnitContext) -> Result<TaskOutcome> {
    info!(
        task = %unit.name,
        id = %unit.id,
        level = unit.level,
        inputs = ?unit.inputs,
        outputs = ?unit.outputs,
        "executing task"
    );

    let Some(arguments) = unit.command.as_deref() else {
        debug!(task = %unit.name, "no command; materializing outputs");
        materialize_outputs(ctx.fs.as_ref(), &ctx.work_dir, &unit.outputs)?;
        return Ok(TaskOutcome::Success);
    };

    if let Some(duration) = ctx.simulated_duration {
        info!(
            task = %unit.name,
            seconds = duration.as_secs_f64(),
            "simulating task execution"
        );
        tokio::time::sleep(duration).await;
        materialize_outputs(ctx.fs.as_ref(), &ctx.work_dir, &unit.outputs)?;
        return Ok(TaskOutcome::Success);
    }

    let outcome = run_command(&unit.name, arguments, &ctx.work_dir).await?;
    if outcome.is_success() {
        for output in &unit.outputs {
            match output_path(&ctx.work_dir, output) {
                Ok(path) if !ctx.fs.exists(&path) => {
                    warn!(task = %unit.name, output = %output, "declared output missing after run");
                }
                Ok(_) => {}
                Err(err) => warn!(task = %unit.name, error = %err, "not checking output"),
            }
        }
    }
    Ok(outcome)
}

/// Create every declared output as an empty file if it does not exist yet.
///
/// Fails before touching anything if an output would land outside
/// `work_dir`.
pub fn materialize_outputs(fs: &dyn FileSystem, work_dir: &Path, outputs: &[String]) -> Result<()> {
    let paths = outputs
        .iter()
        .map(|output| output_path(work_dir, output))
        .collect::<Result<Vec<_>>>()?;

    for path in paths {
        fs.touch(&path)
            .with_context(|| format!("materializing output {:?}", path))?;
    }
    Ok(())
}

/// `work_dir.join(output)`, for relative names that stay below `work_dir`.
fn output_path(work_dir: &Path, output: &str) -> Result<PathBuf> {
    let relative = Path::new(output);
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained || !relative.components().any(|c| matches!(c, Component::Normal(_))) {
        bail!("output '{}' is not a relative path inside the work directory", output);
    }
    Ok(work_dir.join(relative))
}

/// Run `arguments` through the platform shell and wait for it.
async fn run_command(task: &str, arguments: &[String], work_dir: &Path) -> Result<TaskOutcome> {
    let line = arguments.join(" ");
    info!(task = %task, cmd = %line, "starting task process");

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&line);
        c
    };

    cmd.current_dir(work_dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", task))?;

    // Always consume both pipes so buffers don't fill; log at debug.
    if let Some(stdout) = child.stdout.take() {
        let task_name = task.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stdout: {}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        let task_name = task.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{}'", task))?;

    let code = status.code().unwrap_or(-1);
    info!(
        task = %task,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    Ok(if status.success() {
        TaskOutcome::Success
    } else {
        TaskOutcome::Failed(code)
    })
}
