//! # ansible-bootstrap
//!
//! Provision a Python virtual environment pinned to one Ansible version and
//! write the `.env` / `.env.leave` snippets that activate and deactivate it.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod plan;
pub mod report;
pub mod snippets;
pub mod step;
pub mod venv;

/// Print an error message and exit with code 1.
pub fn fatal_error(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
