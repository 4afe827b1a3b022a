//! The bootstrap run: create the environment, write the snippets, install, report.

use crate::cli::OutputFormatArg;
use crate::config::BootstrapConfig;
use crate::error::Result;
use crate::plan::{Plan, StepKind};
use crate::report::{self, Report};
use crate::snippets;
use crate::step::{self, OutputRoute};

/// Execute every step of the plan for `config`, in order, without short-circuiting.
///
/// # Errors
///
/// Returns `Err` only if the activation snippets cannot be written. Failures
/// of the external tools are recorded in the returned report instead.
pub fn bootstrap(config: &BootstrapConfig, format: OutputFormatArg) -> Result<Report> {
    let plan = Plan::build(config);
    let route = match format {
        OutputFormatArg::Stream => OutputRoute::Terminal,
        OutputFormatArg::Json => OutputRoute::Stderr,
    };
    tracing::info!(version = %config.version, env = %plan.activation.root().display(), "bootstrapping");

    let mut outcomes = Vec::with_capacity(plan.steps.len());
    let mut written = None;
    let mut tool_path = None;
    let mut tool_version = None;

    for step in &plan.steps {
        if step.kind == StepKind::QueryVersion {
            let run = step::run_captured(step, &plan.activation);
            if let Some(stdout) = &run.stdout {
                if let Some(path) = &run.program {
                    emit(format, &path.display().to_string());
                }
                emit(format, stdout.trim_end());
                tool_version = Some(stdout.trim().to_string());
            }
            tool_path = run.stdout.as_ref().and(run.program);
            outcomes.push(run.outcome);
            continue;
        }

        let run = step::run_streaming(step, &plan.activation, route);
        outcomes.push(run.outcome);

        if step.kind == StepKind::CreateEnv {
            written = Some(snippets::write_snippets(
                &config.working_dir,
                plan.activation.root(),
            )?);
        }
    }

    let exit_code = report::exit_status(&outcomes);
    let (activate_file, leave_file) = match written {
        Some(w) => (w.activate, w.leave),
        None => (
            config.working_dir.join(snippets::ACTIVATE_FILE),
            config.working_dir.join(snippets::LEAVE_FILE),
        ),
    };

    Ok(Report {
        version: config.version.clone(),
        env_dir: plan.activation.root().to_path_buf(),
        activate_file,
        leave_file,
        steps: outcomes,
        tool_path,
        tool_version,
        exit_code,
    })
}

/// What a run would do, without doing it.
#[must_use]
pub fn describe(config: &BootstrapConfig) -> String {
    let plan = Plan::build(config);
    let env_dir = plan.activation.root();
    format!(
        "{plan}# {}\n{}\n# {}\n{}\n",
        config.working_dir.join(snippets::ACTIVATE_FILE).display(),
        snippets::activate_line(env_dir).to_string_lossy(),
        config.working_dir.join(snippets::LEAVE_FILE).display(),
        snippets::LEAVE_LINE,
    )
}

fn emit(format: OutputFormatArg, line: &str) {
    if matches!(format, OutputFormatArg::Stream) {
        println!("{line}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(dir: &std::path::Path, python: &str) -> BootstrapConfig {
        BootstrapConfig {
            version: "9.5.1".to_string(),
            working_dir: dir.to_path_buf(),
            python: PathBuf::from(python),
            companion: "pynvim".to_string(),
        }
    }

    #[test]
    fn test_describe_mentions_everything() {
        let cfg = config(std::path::Path::new("/work"), "python3");
        let text = describe(&cfg);
        assert!(text.contains("-m venv"));
        assert!(text.contains("ansible==9.5.1"));
        assert!(text.contains("pynvim"));
        assert!(text.contains("--version"));
        assert!(text.contains(&*snippets::activate_line(&cfg.env_dir()).to_string_lossy()));
        assert!(text.contains(snippets::LEAVE_LINE));
    }

    #[test]
    fn test_missing_interpreter_still_writes_snippets() {
        let temp = tempfile::TempDir::new().unwrap();
        let cfg = config(temp.path(), "/nonexistent/python3");

        let report = bootstrap(&cfg, OutputFormatArg::Json).unwrap();

        assert_eq!(report.steps.len(), 5);
        assert!(report.steps.iter().all(|s| !s.success()));
        assert_ne!(report.exit_code, 0);
        assert!(report.tool_path.is_none());
        assert!(report.tool_version.is_none());
        assert!(temp.path().join(snippets::ACTIVATE_FILE).exists());
        assert!(temp.path().join(snippets::LEAVE_FILE).exists());
    }
}
