//! Layout of a Python virtual environment and its activation as an explicit value.
//!
//! Nothing here touches the bootstrapper's own process environment: every
//! child that should run "inside" the environment gets the variables from
//! [`Activation::apply`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Directory holding executables inside a venv.
#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

/// An activated virtual environment, handed to every step after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    root: PathBuf,
    bin_dir: PathBuf,
}

impl Activation {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            bin_dir: root.join(BIN_DIR),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// `PATH` with the environment's bin directory in front of `inherited`.
    #[must_use]
    pub fn search_path(&self, inherited: Option<OsString>) -> OsString {
        let mut dirs = vec![self.bin_dir.clone()];
        if let Some(inherited) = &inherited {
            dirs.extend(std::env::split_paths(inherited));
        }
        match std::env::join_paths(dirs) {
            Ok(path) => path,
            Err(e) => {
                // bin_dir itself holds the separator; keep what the caller had
                tracing::warn!(bin_dir = %self.bin_dir.display(), error = %e, "cannot prepend environment to PATH");
                inherited.unwrap_or_default()
            }
        }
    }

    /// Whether the bin directory can be placed on `PATH` and searched.
    #[must_use]
    pub fn is_path_safe(&self) -> bool {
        std::env::join_paths([&self.bin_dir]).is_ok()
    }

    /// Configure `cmd` the way `source bin/activate` would configure a shell.
    pub fn apply(&self, cmd: &mut Command) {
        cmd.env("VIRTUAL_ENV", &self.root)
            .env("PATH", self.search_path(std::env::var_os("PATH")))
            .env_remove("PYTHONHOME");
    }

    /// Look up `program` in the environment's bin directory only.
    #[must_use]
    pub fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which_in(program, Some(&self.bin_dir), &self.root).ok()
    }

    /// The pip entry point: the `pip` script when present, else `python -m pip`.
    #[must_use]
    pub fn pip_command(&self) -> (PathBuf, Vec<String>) {
        match self.resolve("pip") {
            Some(pip) => (pip, Vec::new()),
            None => (
                self.expected_path("python"),
                vec!["-m".to_string(), "pip".to_string()],
            ),
        }
    }

    /// Where `program` lives once the environment is populated.
    #[must_use]
    pub fn expected_path(&self, program: &str) -> PathBuf {
        self.bin_dir.join(program)
    }
}
