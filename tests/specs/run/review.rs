//! Runs of gated video pipelines

use crate::prelude::*;

#[test]
fn approving_two_of_three_leaves_the_third_pending() {
    let run = studio()
        .args(&[
            "run",
            "faceless-video",
            "--scenes",
            "3",
            "--approve",
            "0,1",
            "--time-scale",
            "0",
            "--format",
            "json",
        ])
        .passes();
    let job = run.last_json();
    assert_eq!(job["status"], "Completed");
    let statuses: Vec<&str> = job["scenes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["completed", "completed", "pending"]);
    assert_eq!(job["stages"][2]["progress"], 100);
    assert_eq!(job["stages"][3]["status"], "completed");
    assert!(job["scenes"][0]["t2v"]["url"].as_str().is_some());
    assert!(job["scenes"][2]["t2v"]["url"].is_null());
}

#[test]
fn run_pauses_at_review_before_approving() {
    studio()
        .args(&["run", "faceless-video", "--scenes", "2", "--time-scale", "0"])
        .passes()
        .stdout_has("AwaitingSceneReview")
        .stdout_has("Status: Completed")
        .stdout_has("0. [completed]")
        .stdout_has("1. [completed]");
}

#[test]
fn approving_nothing_leaves_the_job_at_review() {
    studio()
        .args(&[
            "run",
            "faceless-video",
            "--scenes",
            "2",
            "--approve",
            "none",
            "--time-scale",
            "0",
        ])
        .fails()
        .stdout_has("Status: AwaitingSceneReview")
        .stdout_has("0. [pending]");
}

#[test]
fn storyboard_generates_every_sub_stage() {
    let run = studio()
        .args(&[
            "run",
            "storyboard-video",
            "--scenes",
            "2",
            "--automated",
            "--time-scale",
            "0",
            "--format",
            "json",
        ])
        .passes();
    let job = run.last_json();
    assert_eq!(job["status"], "Completed");
    for scene in job["scenes"].as_array().unwrap() {
        for unit in ["t2i", "i2v", "t2s", "voice"] {
            assert_eq!(scene["subStages"][unit]["status"], "completed", "{unit}");
        }
    }
    assert!(run.stdout().lines().all(|l| !l.contains("AwaitingSceneReview")));
}

#[test]
fn out_of_range_approval_fails() {
    studio()
        .args(&[
            "run",
            "faceless-video",
            "--scenes",
            "2",
            "--approve",
            "4",
            "--time-scale",
            "0",
        ])
        .fails()
        .stderr_has("no scene at index 4");
}
