//! CLI help specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    studio()
        .args(&["--help"])
        .passes()
        .stdout_has("pipelines")
        .stdout_has("run");
}

#[test]
fn run_help_lists_flags() {
    studio()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--scenes")
        .stdout_has("--approve")
        .stdout_has("--time-scale")
        .stdout_has("--fail-stage");
}

#[test]
fn version_prints_name_and_version() {
    studio()
        .args(&["--version"])
        .passes()
        .stdout_eq(&format!("studio {}\n", env!("CARGO_PKG_VERSION")));
}
