//! CLI error specs

use crate::prelude::*;

#[test]
fn unknown_pipeline_is_rejected() {
    studio()
        .args(&["run", "podcast", "--time-scale", "0"])
        .fails()
        .stderr_has("unknown pipeline type: podcast");
}

#[test]
fn bad_approval_list_is_rejected() {
    studio()
        .args(&["run", "faceless-video", "--approve", "first"])
        .fails()
        .stderr_has("invalid scene index");
}

#[test]
fn zero_scenes_is_rejected() {
    studio()
        .args(&["run", "faceless-video", "--scenes", "0", "--time-scale", "0"])
        .fails()
        .stderr_has("numberOfScenes must be at least 1");
}

#[test]
fn huge_scene_count_is_rejected() {
    studio()
        .args(&["run", "faceless-video", "--scenes", "4000000000", "--time-scale", "0"])
        .fails()
        .stderr_has("numberOfScenes must be at most 100");
}

#[test]
fn negative_time_scale_is_rejected() {
    studio()
        .args(&["run", "blog-article", "--time-scale=-1"])
        .fails()
        .stderr_has("time_scale must be a non-negative number");
}

#[test]
fn missing_subcommand_fails() {
    studio().args(&[]).fails();
}
