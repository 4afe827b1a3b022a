//! Running a single planned step as a blocking child process.

use crate::config::TOOL_PACKAGE;
use crate::plan::{Program, Step, render_command};
use crate::report::{NOT_FOUND_EXIT, StepOutcome};
use crate::venv::Activation;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

/// Where a child's stdout goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRoute {
    /// Straight to our stdout
    Terminal,
    /// To our stderr, leaving stdout free for a structured report
    Stderr,
}

/// Result of running one step.
#[derive(Debug)]
pub struct StepRun {
    pub outcome: StepOutcome,
    /// Executable that was started, if it could be resolved
    pub program: Option<PathBuf>,
    /// Captured stdout, only for capturing runs
    pub stdout: Option<String>,
}

/// Run `step`, streaming its stdout according to `route`.
#[must_use]
pub fn run_streaming(step: &Step, activation: &Activation, route: OutputRoute) -> StepRun {
    execute(step, activation, Capture::No(route))
}

/// Run `step` and keep its stdout.
#[must_use]
pub fn run_captured(step: &Step, activation: &Activation) -> StepRun {
    execute(step, activation, Capture::Yes)
}

enum Capture {
    No(OutputRoute),
    Yes,
}

fn execute(step: &Step, activation: &Activation, capture: Capture) -> StepRun {
    let start = Instant::now();

    let Some((program, prefix)) = resolve_program(&step.program, activation) else {
        let command = step.command_line(activation);
        tracing::error!(step = step.kind.label(), %command, "executable not found in environment");
        return not_found(step, command, None, start);
    };

    let mut argv: Vec<OsString> = prefix.into_iter().map(OsString::from).collect();
    argv.extend(step.args.iter().cloned());
    let command = render_command(&program, &argv);

    tracing::info!(step = step.kind.label(), %command, "running");

    let mut cmd = Command::new(&program);
    cmd.args(&argv).stderr(Stdio::inherit());
    if step.is_activated() {
        activation.apply(&mut cmd);
    }

    let result = match capture {
        Capture::Yes => cmd.output().map(|out| {
            (
                out.status,
                Some(String::from_utf8_lossy(&out.stdout).to_string()),
            )
        }),
        Capture::No(route) => {
            match route {
                OutputRoute::Terminal => cmd.stdout(Stdio::inherit()),
                OutputRoute::Stderr => cmd.stdout(std::io::stderr()),
            };
            cmd.status().map(|status| (status, None))
        }
    };

    match result {
        Ok((status, stdout)) => {
            let exit_code = exit_code(status);
            let outcome = StepOutcome {
                kind: step.kind,
                command,
                exit_code,
                duration_ms: start.elapsed().as_millis(),
            };
            if outcome.success() {
                tracing::info!(step = step.kind.label(), duration_ms = outcome.duration_ms, "finished");
            } else {
                tracing::warn!(step = step.kind.label(), exit_code, "command failed");
            }
            StepRun {
                outcome,
                program: Some(program),
                stdout,
            }
        }
        Err(e) => {
            tracing::error!(step = step.kind.label(), %command, error = %e, "failed to start");
            not_found(step, command, Some(program), start)
        }
    }
}

fn resolve_program(program: &Program, activation: &Activation) -> Option<(PathBuf, Vec<String>)> {
    match program {
        Program::Interpreter(path) => Some((path.clone(), Vec::new())),
        Program::Pip => Some(activation.pip_command()),
        Program::Tool => activation.resolve(TOOL_PACKAGE).map(|p| (p, Vec::new())),
    }
}

fn not_found(step: &Step, command: String, program: Option<PathBuf>, start: Instant) -> StepRun {
    StepRun {
        outcome: StepOutcome {
            kind: step.kind,
            command,
            exit_code: NOT_FOUND_EXIT,
            duration_ms: start.elapsed().as_millis(),
        },
        program,
        stdout: None,
    }
}

/// Numeric status the way a shell reports it (`128 + signal` when killed).
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
