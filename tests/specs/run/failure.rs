//! Runs with failing stages

use crate::prelude::*;

#[test]
fn failing_stage_fails_the_job() {
    studio()
        .args(&["run", "blog-article", "--fail-stage", "seo", "--time-scale", "0"])
        .fails()
        .stdout_has("Status: Failed")
        .stdout_has("Error: SEO failed: synthetic failure")
        .stdout_lacks("url:");
}

#[test]
fn later_stages_never_start() {
    let run = studio()
        .args(&[
            "run",
            "blog-article",
            "--fail-stage",
            "sections",
            "--time-scale",
            "0",
            "--format",
            "json",
        ])
        .fails();
    let job = run.last_json();
    assert_eq!(job["status"], "Failed");
    assert_eq!(job["stages"][1]["status"], "failed");
    for stage in &job["stages"].as_array().unwrap()[2..] {
        assert_eq!(stage["status"], "pending");
        assert_eq!(stage["progress"], 0);
    }
}

#[test]
fn failing_scene_generation_fails_the_job() {
    studio()
        .args(&[
            "run",
            "faceless-video",
            "--scenes",
            "2",
            "--fail-stage",
            "scene_generation",
            "--time-scale",
            "0",
        ])
        .fails()
        .stdout_has("Status: Failed")
        .stdout_has("[failed]");
}
