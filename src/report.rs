//! Outcome of a run, printed as JSON with `--output-format json`.

use crate::plan::StepKind;
use serde::Serialize;
use std::path::PathBuf;

/// Exit code recorded when a program cannot be started, as a shell would report it.
pub const NOT_FOUND_EXIT: i32 = 127;

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub kind: StepKind,
    /// The command line as displayed in logs
    pub command: String,
    pub exit_code: i32,
    pub duration_ms: u128,
}

impl StepOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub version: String,
    pub env_dir: PathBuf,
    pub activate_file: PathBuf,
    pub leave_file: PathBuf,
    pub steps: Vec<StepOutcome>,
    /// Where the tool resolved inside the environment, if it did
    pub tool_path: Option<PathBuf>,
    /// Output of the version query, trimmed
    pub tool_version: Option<String>,
    pub exit_code: i32,
}

impl Report {
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Exit status of a run: the last failing step's code, or 0.
///
/// Steps never short-circuit, so a failed install is still reported even
/// when later steps succeed.
#[must_use]
pub fn exit_status(steps: &[StepOutcome]) -> i32 {
    steps
        .iter()
        .rev()
        .find(|s| !s.success())
        .map_or(0, |s| s.exit_code)
}
