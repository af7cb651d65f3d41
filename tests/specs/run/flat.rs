//! Runs of pipelines without scenes

use crate::prelude::*;

#[test]
fn blog_article_completes() {
    studio()
        .args(&["run", "blog-article", "--time-scale", "0"])
        .passes()
        .stdout_has("Processing")
        .stdout_has("Pipeline: blog-article")
        .stdout_has("Status: Completed")
        .stdout_has("url: https://cdn.studio.local/blog-article/")
        .stdout_lacks("videoUrl")
        .stdout_lacks("Scenes:");
}

#[test]
fn every_stage_reaches_one_hundred() {
    let run = studio()
        .args(&["run", "youtube-script", "--time-scale", "0", "--format", "json"])
        .passes();
    let job = run.last_json();
    assert_eq!(job["status"], "Completed");
    let stages: Vec<(&str, &str, u64)> = job["stages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            (
                s["stageId"].as_str().unwrap(),
                s["status"].as_str().unwrap(),
                s["progress"].as_u64().unwrap(),
            )
        })
        .collect();
    similar_asserts::assert_eq!(
        stages,
        vec![
            ("hook", "completed", 100),
            ("script", "completed", 100),
            ("retention", "completed", 100),
            ("broll", "completed", 100),
        ]
    );
}

#[test]
fn json_streams_updates_before_the_job() {
    let run = studio()
        .args(&["run", "social-media", "--time-scale", "0", "--format", "json"])
        .passes();
    let stdout = run.stdout();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(lines.len() > 2);
    assert_eq!(lines[0]["origin"], "submit");
    assert_eq!(lines[0]["job"]["status"], "Queued");
    let sequences: Vec<u64> = lines[..lines.len() - 1]
        .iter()
        .map(|u| u["sequence"].as_u64().unwrap())
        .collect();
    assert!(sequences.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn ai_ugc_has_a_video_but_no_scenes() {
    let run = studio()
        .args(&["run", "ai-ugc", "--time-scale", "0", "--format", "json"])
        .passes();
    let job = run.last_json();
    assert_eq!(job["status"], "Completed");
    assert!(job.get("scenes").is_none());
    assert!(job["outputs"]["videoUrl"]
        .as_str()
        .unwrap()
        .ends_with("/final.mp4"));
}

#[test]
fn variables_reach_the_job() {
    let run = studio()
        .args(&[
            "run",
            "social-media",
            "--time-scale",
            "0",
            "--var",
            "topic=cold brew",
            "--format",
            "json",
        ])
        .passes();
    assert_eq!(run.last_json()["variables"]["topic"], "cold brew");
}
