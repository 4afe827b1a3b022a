//! Settings resolution: command-line flag, then environment variable, then default.

use crate::error::{BootstrapError, Result};
use crate::venv::Activation;
use std::path::{Path, PathBuf};

/// Package installed at the requested version, and the executable it provides.
pub const TOOL_PACKAGE: &str = "ansible";

/// Environment directories are named `<prefix><version>`.
pub const ENV_PREFIX: &str = "ansible-";

/// Editor integration installed next to the tool on every run.
pub const DEFAULT_COMPANION: &str = "pynvim";

pub const PYTHON_ENV_VAR: &str = "BOOTSTRAP_PYTHON";
pub const COMPANION_ENV_VAR: &str = "BOOTSTRAP_COMPANION";
pub const LOG_ENV_VAR: &str = "BOOTSTRAP_LOG";

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub working_dir: Option<PathBuf>,
    pub python: Option<PathBuf>,
    pub companion: Option<String>,
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Requested tool version, used verbatim.
    pub version: String,
    /// Absolute directory receiving the environment and the two snippets.
    pub working_dir: PathBuf,
    /// Interpreter used to create the environment.
    pub python: PathBuf,
    pub companion: String,
}

impl BootstrapConfig {
    /// Resolve settings from `overrides` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the working directory cannot be determined, the
    /// companion package name is empty, or the environment directory would
    /// contain the `PATH` separator.
    pub fn from_env(version: &str, overrides: Overrides) -> Result<Self> {
        Self::resolve(version, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`BootstrapConfig::from_env`].
    pub fn resolve(
        version: &str,
        overrides: Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let working_dir = resolve_working_dir(overrides.working_dir.as_deref())?;

        let python = overrides
            .python
            .or_else(|| non_empty(lookup(PYTHON_ENV_VAR)).map(PathBuf::from))
            .unwrap_or_else(default_python);

        let companion = match overrides.companion {
            Some(value) => value,
            None => non_empty(lookup(COMPANION_ENV_VAR))
                .unwrap_or_else(|| DEFAULT_COMPANION.to_string()),
        };
        if companion.trim().is_empty() {
            return Err(BootstrapError::InvalidConfig(
                "companion package name must not be empty".to_string(),
            ));
        }

        let config = Self {
            version: version.to_string(),
            working_dir,
            python,
            companion,
        };
        let env_dir = config.env_dir();
        if !Activation::new(&env_dir).is_path_safe() {
            return Err(BootstrapError::InvalidConfig(format!(
                "environment directory '{}' contains the PATH separator and cannot be activated",
                env_dir.display()
            )));
        }
        Ok(config)
    }

    /// Name of the environment directory, e.g. `ansible-9.5.1`.
    #[must_use]
    pub fn env_name(&self) -> String {
        format!("{ENV_PREFIX}{}", self.version)
    }

    #[must_use]
    pub fn env_dir(&self) -> PathBuf {
        self.working_dir.join(self.env_name())
    }

    /// Requirement specifier handed to pip, e.g. `ansible==9.5.1`.
    #[must_use]
    pub fn tool_requirement(&self) -> String {
        format!("{TOOL_PACKAGE}=={}", self.version)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn resolve_working_dir(custom: Option<&Path>) -> Result<PathBuf> {
    match custom {
        Some(path) => path
            .canonicalize()
            .map_err(|_| BootstrapError::MissingWorkingDir(path.to_path_buf())),
        None => std::env::current_dir().map_err(BootstrapError::CurrentDir),
    }
}

/// Get the base Python executable (prefers python3)
fn default_python() -> PathBuf {
    which::which("python3")
        .or_else(|_| which::which("python"))
        .unwrap_or_else(|_| PathBuf::from("python3"))
}
