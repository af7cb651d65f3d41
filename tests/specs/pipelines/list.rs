//! Pipeline registry listing specs

use crate::prelude::*;

#[test]
fn lists_every_pipeline_in_order() {
    let run = studio().args(&["pipelines"]).passes();
    let names: Vec<String> = run
        .stdout()
        .lines()
        .skip(1)
        .filter_map(|l| l.split_whitespace().next().map(str::to_string))
        .collect();
    similar_asserts::assert_eq!(
        names,
        vec![
            "faceless-video",
            "storyboard-video",
            "social-media",
            "blog-article",
            "youtube-script",
            "ai-ugc",
        ]
    );
}

#[test]
fn text_rows_show_stage_estimates() {
    studio()
        .args(&["pipelines"])
        .passes()
        .stdout_has("script:15 scene_breakdown:10 scene_generation:45 assembly:25")
        .stdout_has("script:15 scene_breakdown:10 scene_generation:60 assembly:20")
        .stdout_has("content:10 hashtags:5 image:15 formatting:3")
        .stdout_has("outline:8 sections:30 seo:10 images:20 assembly:5")
        .stdout_has("hook:8 script:25 retention:10 broll:12")
        .stdout_has("persona:10 script:15 avatar:30 assembly:25");
}

#[test]
fn json_lists_registry() {
    let run = studio().args(&["pipelines", "--format", "json"]).passes();
    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    let pipelines = json.as_array().unwrap();
    assert_eq!(pipelines.len(), 6);
    assert_eq!(pipelines[0]["pipelineType"], "faceless-video");
    assert_eq!(pipelines[0]["sceneReview"], true);
    assert_eq!(pipelines[5]["pipelineType"], "ai-ugc");
    assert_eq!(pipelines[5]["video"], true);
    assert_eq!(pipelines[5]["sceneReview"], false);
    assert_eq!(pipelines[3]["stages"][2]["id"], "seo");
}
