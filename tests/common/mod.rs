//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Helper to get the compiled binary path
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bootstrap"))
}

/// Helper to create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Package version for testing --version flag
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper to create a Command with test environment
/// Clears `BOOTSTRAP_*` variables so the caller's shell settings don't leak in
pub fn test_command(binary: &Path) -> Command {
    let mut cmd = Command::new(binary);
    cmd.env_remove("BOOTSTRAP_PYTHON")
        .env_remove("BOOTSTRAP_COMPANION")
        .env_remove("BOOTSTRAP_LOG")
        .env_remove("FAKE_PIP_FAIL");
    cmd
}

/// Stand-in for `pip`: logs its arguments to `$VIRTUAL_ENV/pip.log` and
/// creates `bin/ansible` when asked to install `ansible==X`.
/// Fails every call when `FAKE_PIP_FAIL` is set.
const FAKE_PIP: &str = r#"#!/bin/sh
echo "$*" >> "$VIRTUAL_ENV/pip.log"
if [ -n "$FAKE_PIP_FAIL" ]; then
  echo "ERROR: simulated pip failure" >&2
  exit 1
fi
case "$2" in
  ansible==*)
    version="${2#ansible==}"
    printf '#!/bin/sh\necho "ansible [core %s]"\n' "$version" > "$VIRTUAL_ENV/bin/ansible"
    chmod +x "$VIRTUAL_ENV/bin/ansible"
    ;;
esac
exit 0
"#;

/// Stand-in for `python3`: only understands `-m venv DIR`.
const FAKE_PYTHON: &str = r#"#!/bin/sh
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  cp "$(dirname "$0")/pip" "$3/bin/pip"
  chmod +x "$3/bin/pip"
  touch "$3/bin/activate"
  exit 0
fi
echo "fake python: unsupported arguments: $*" >&2
exit 2
"#;

/// Write the fake interpreter (and the pip it installs) into `dir`.
/// Returns the path to pass as `--python`.
#[cfg(unix)]
pub fn install_fake_python(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    for (name, body) in [("python3", FAKE_PYTHON), ("pip", FAKE_PIP)] {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
    dir.join("python3")
}

/// Names of the entries directly under `dir`, sorted
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
