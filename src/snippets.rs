//! The `.env` / `.env.leave` pair read by autoenv-style shell hooks.
//!
//! Both files live in the working directory, hold a single line, and are
//! overwritten on every run:
//!
//! - `.env`: `source <abs-env-dir>/bin/activate`
//! - `.env.leave`: a deactivate call guarded on `deactivate` being defined

use crate::error::{BootstrapError, Result};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

pub const ACTIVATE_FILE: &str = ".env";
pub const LEAVE_FILE: &str = ".env.leave";

pub const LEAVE_LINE: &str = "command -v deactivate >/dev/null 2>&1 && deactivate";

/// Contents of `.env` for the environment at `env_dir`.
#[must_use]
pub fn activate_line(env_dir: &Path) -> OsString {
    let mut line = OsString::from("source ");
    line.push(env_dir.join("bin").join("activate"));
    line
}

/// Paths of the two snippets that were written.
#[derive(Debug, Clone)]
pub struct WrittenSnippets {
    pub activate: PathBuf,
    pub leave: PathBuf,
}

/// Overwrite `.env` and `.env.leave` in `working_dir`.
///
/// # Errors
///
/// Returns `Err` if either file cannot be written.
pub fn write_snippets(working_dir: &Path, env_dir: &Path) -> Result<WrittenSnippets> {
    let activate = working_dir.join(ACTIVATE_FILE);
    write_line(&activate, &activate_line(env_dir))?;

    let leave = working_dir.join(LEAVE_FILE);
    write_line(&leave, OsStr::new(LEAVE_LINE))?;

    tracing::info!(activate = %activate.display(), leave = %leave.display(), "wrote activation snippets");
    Ok(WrittenSnippets { activate, leave })
}

fn write_line(path: &Path, line: &OsStr) -> Result<()> {
    let mut contents = line_bytes(line);
    contents.push(b'\n');
    fs::write(path, contents).map_err(|source| BootstrapError::WriteScript {
        path: path.to_path_buf(),
        source,
    })
}

/// Raw bytes of `line`, so a non-UTF-8 working directory is written as-is.
#[cfg(unix)]
fn line_bytes(line: &OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    line.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn line_bytes(line: &OsStr) -> Vec<u8> {
    line.to_string_lossy().into_owned().into_bytes()
}
