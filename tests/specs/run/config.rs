//! Engine config file specs

use crate::prelude::*;

#[test]
fn config_file_sets_pacing_and_failures() {
    let project = Project::empty();
    project.file(
        "studio.toml",
        "time_scale = 0.0\nticks_per_stage = 4\nfail_stages = [\"hook\"]\n",
    );
    project
        .studio()
        .args(&["run", "youtube-script", "--config", "studio.toml"])
        .fails()
        .stdout_has("Error: Hook failed: synthetic failure");
}

#[test]
fn flags_override_the_config_file() {
    let project = Project::empty();
    project.file("studio.toml", "time_scale = 100.0\n");
    project
        .studio()
        .args(&[
            "run",
            "social-media",
            "--config",
            "studio.toml",
            "--time-scale",
            "0",
        ])
        .passes()
        .stdout_has("Status: Completed");
}

#[test]
fn unknown_config_keys_are_rejected() {
    let project = Project::empty();
    project.file("studio.toml", "speed = 2\n");
    project
        .studio()
        .args(&["run", "social-media", "--config", "studio.toml"])
        .fails()
        .stderr_has("unknown field");
}

#[test]
fn missing_config_file_is_reported() {
    let project = Project::empty();
    project
        .studio()
        .args(&["run", "social-media", "--config", "absent.toml"])
        .fails()
        .stderr_has("absent.toml");
}
