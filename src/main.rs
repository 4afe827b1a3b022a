//! # bootstrap
//!
//! Create `ansible-<VERSION>` in the current directory, install Ansible at that
//! version plus a companion package into it, and write `.env` / `.env.leave`.
//!
//! ## Usage
//!
//! - Bootstrap a version: `bootstrap 9.5.1`
//! - See what would happen: `bootstrap --dry-run 9.5.1`
//! - Machine-readable summary: `bootstrap --output-format json 9.5.1`

/// Entry point for the CLI tool.
fn main() {
    ansible_bootstrap::cli::run_cli();
}
