//! The ordered list of external invocations, built before anything runs.

use crate::config::{BootstrapConfig, TOOL_PACKAGE};
use crate::venv::Activation;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// What a step is for; used in logs and the JSON report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    CreateEnv,
    UpgradePip,
    InstallTool,
    InstallCompanion,
    QueryVersion,
}

impl StepKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CreateEnv => "create environment",
            Self::UpgradePip => "upgrade pip",
            Self::InstallTool => "install tool",
            Self::InstallCompanion => "install companion",
            Self::QueryVersion => "query version",
        }
    }
}

/// Which executable a step invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// The base interpreter, outside any environment.
    Interpreter(PathBuf),
    /// pip inside the environment, resolved when the step runs.
    Pip,
    /// The installed tool inside the environment, resolved when the step runs.
    Tool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    pub program: Program,
    pub args: Vec<OsString>,
}

impl Step {
    /// Steps after environment creation run with the activation applied.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        !matches!(self.program, Program::Interpreter(_))
    }

    /// Command line for display, with the program shown as it will be looked up.
    #[must_use]
    pub fn command_line(&self, activation: &Activation) -> String {
        let program = match &self.program {
            Program::Interpreter(path) => path.clone(),
            Program::Pip => activation.expected_path("pip"),
            Program::Tool => activation.expected_path(TOOL_PACKAGE),
        };
        render_command(&program, &self.args)
    }
}

/// Shell-quoted command line for logs and dry runs.
#[must_use]
pub fn render_command<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> String {
    let mut parts = vec![shell_quote(&program.to_string_lossy())];
    parts.extend(args.iter().map(|a| shell_quote(&a.as_ref().to_string_lossy())));
    parts.join(" ")
}

/// Every step of a run, in execution order.
#[derive(Debug, Clone)]
pub struct Plan {
    pub activation: Activation,
    pub steps: Vec<Step>,
}

impl Plan {
    #[must_use]
    pub fn build(config: &BootstrapConfig) -> Self {
        let env_dir = config.env_dir();
        let install = |kind, args: &[&str]| Step {
            kind,
            program: Program::Pip,
            args: args.iter().map(OsString::from).collect(),
        };

        let steps = vec![
            Step {
                kind: StepKind::CreateEnv,
                program: Program::Interpreter(config.python.clone()),
                args: vec!["-m".into(), "venv".into(), env_dir.clone().into_os_string()],
            },
            install(StepKind::UpgradePip, &["install", "--upgrade", "pip"]),
            install(StepKind::InstallTool, &["install", &config.tool_requirement()]),
            install(StepKind::InstallCompanion, &["install", &config.companion]),
            Step {
                kind: StepKind::QueryVersion,
                program: Program::Tool,
                args: vec!["--version".into()],
            },
        ];

        Self {
            activation: Activation::new(&env_dir),
            steps,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{}", step.command_line(&self.activation))?;
        }
        Ok(())
    }
}

/// Quote `value` for a POSIX shell when it contains anything beyond a safe set.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
