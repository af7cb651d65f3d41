// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn scenes(n: usize) -> Vec<Scene> {
    (0..n)
        .map(|i| {
            Scene::new(
                format!("s{}", i),
                i,
                SceneDraft {
                    description: format!("scene {}", i),
                    prompt: format!("prompt {}", i),
                },
                SceneShape::T2v,
                12,
            )
        })
        .collect()
}

fn ids(scenes: &[Scene]) -> Vec<&str> {
    scenes.iter().map(|s| s.id.as_str()).collect()
}

fn assert_contiguous(scenes: &[Scene]) {
    for (i, scene) in scenes.iter().enumerate() {
        assert_eq!(scene.index, i, "scene {} out of place", scene.id);
    }
}

#[test]
fn new_scene_is_pending_with_empty_output() {
    let scene = &scenes(1)[0];
    assert_eq!(scene.status, SceneStatus::Pending);
    assert_eq!(scene.output, SceneOutput::T2v(GenerationUnit::default()));
    assert!(scene.regeneration_comment.is_none());
    assert!(scene.estimated_tokens > 0);
}

#[test]
fn edit_replaces_description_only() {
    let mut list = scenes(2);
    list[1].status = SceneStatus::Approved;
    let next = edit(&list, "s1", "a lighthouse at dusk").unwrap();
    assert_eq!(next[1].description, "a lighthouse at dusk");
    assert_eq!(next[1].prompt, "prompt 1");
    assert_eq!(next[1].status, SceneStatus::Approved);
}

#[test]
fn edit_unknown_scene_is_rejected() {
    assert_eq!(
        edit(&scenes(2), "nope", "x"),
        Err(ValidationError::SceneNotFound("nope".to_string()))
    );
}

#[parameterized(
    first_up = { "s0", MoveDirection::Up, &["s0", "s1", "s2"] },
    last_down = { "s2", MoveDirection::Down, &["s0", "s1", "s2"] },
    middle_up = { "s1", MoveDirection::Up, &["s1", "s0", "s2"] },
    middle_down = { "s1", MoveDirection::Down, &["s0", "s2", "s1"] },
    first_down = { "s0", MoveDirection::Down, &["s1", "s0", "s2"] },
)]
fn move_swaps_with_neighbour(id: &str, direction: MoveDirection, expected: &[&str]) {
    let next = move_scene(&scenes(3), id, direction).unwrap();
    assert_eq!(ids(&next), expected.to_vec());
    assert_contiguous(&next);
}

#[test]
fn delete_reindexes_remaining() {
    let next = delete(&scenes(4), "s1").unwrap();
    assert_eq!(ids(&next), vec!["s0", "s2", "s3"]);
    assert_contiguous(&next);
}

#[test]
fn approve_is_idempotent() {
    let once = approve(&scenes(2), "s0").unwrap();
    let twice = approve(&once, "s0").unwrap();
    assert_eq!(once, twice);
    assert_eq!(twice[0].status, SceneStatus::Approved);
    assert_eq!(twice[1].status, SceneStatus::Pending);
}

#[test]
fn approve_keeps_generated_scenes() {
    let mut list = scenes(1);
    list[0].status = SceneStatus::Completed;
    let next = approve_all(&list);
    assert_eq!(next[0].status, SceneStatus::Completed);
}

#[test]
fn approve_all_approves_every_scene() {
    let next = approve_selected(&scenes(3), &ApproveSelection::All).unwrap();
    assert!(next.iter().all(|s| s.status == SceneStatus::Approved));
}

#[test]
fn approve_selected_only_touches_selection() {
    let selection = ApproveSelection::Only(vec!["s0".to_string(), "s2".to_string()]);
    let next = approve_selected(&scenes(3), &selection).unwrap();
    let statuses: Vec<_> = next.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![
            SceneStatus::Approved,
            SceneStatus::Pending,
            SceneStatus::Approved
        ]
    );
}

#[test]
fn empty_approval_is_rejected() {
    assert_eq!(
        approve_selected(&scenes(3), &ApproveSelection::Only(vec![])),
        Err(ValidationError::EmptyApproval)
    );
    assert_eq!(
        approve_selected(&[], &ApproveSelection::All),
        Err(ValidationError::EmptyApproval)
    );
}

#[test]
fn approve_selected_with_unknown_id_is_rejected() {
    let selection = ApproveSelection::Only(vec!["s0".to_string(), "ghost".to_string()]);
    assert_eq!(
        approve_selected(&scenes(2), &selection),
        Err(ValidationError::SceneNotFound("ghost".to_string()))
    );
}

#[parameterized(
    empty = { "" },
    spaces = { "   " },
    newline = { "\n\t" },
)]
fn blank_regeneration_comment_is_rejected(comment: &str) {
    assert_eq!(
        begin_regeneration(&scenes(2), "s0", comment),
        Err(ValidationError::EmptyComment)
    );
}

#[test]
fn regeneration_resets_scene_and_annotates_on_finish() {
    let mut list = scenes(2);
    list[0].status = SceneStatus::Approved;
    let started = begin_regeneration(&list, "s0", "more sunset").unwrap();
    assert_eq!(started[0].status, SceneStatus::Pending);
    assert_eq!(
        started[0].regeneration_comment.as_deref(),
        Some("more sunset")
    );
    assert_eq!(started[0].description, "scene 0");

    let finished = finish_regeneration(&started, "s0", "more sunset")
        .unwrap()
        .unwrap();
    assert_eq!(finished[0].description, "scene 0 [Revised: more sunset]");
    assert_eq!(
        finished[0].prompt,
        "prompt 0\nRevision notes: more sunset"
    );
    assert_eq!(finished[0].status, SceneStatus::Pending);
}

#[test]
fn stale_regeneration_is_skipped() {
    let first = begin_regeneration(&scenes(1), "s0", "warmer").unwrap();
    let second = begin_regeneration(&first, "s0", "colder").unwrap();
    assert_eq!(finish_regeneration(&second, "s0", "warmer"), Ok(None));
}

#[test]
fn regeneration_clears_generated_output() {
    let mut list = scenes(1);
    list[0].status = SceneStatus::Completed;
    list[0].output = SceneOutput::T2v(GenerationUnit {
        status: UnitStatus::Completed,
        url: Some("https://cdn.example/clip.mp4".to_string()),
        ..Default::default()
    });
    let next = begin_regeneration(&list, "s0", "again").unwrap();
    assert_eq!(next[0].output, SceneOutput::T2v(GenerationUnit::default()));
}

#[test]
fn sub_stage_units_run_in_order() {
    let mut output = SceneOutput::empty(SceneShape::SubStages);
    let order: Vec<_> = output.units().into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        order,
        vec![SceneUnit::T2i, SceneUnit::I2v, SceneUnit::T2s, SceneUnit::Voice]
    );
    if let Some(unit) = output.unit_mut(SceneUnit::T2i) {
        unit.status = UnitStatus::Completed;
    }
    assert_eq!(output.next_unit().map(|(k, _)| k), Some(SceneUnit::I2v));
    assert!(output.unit_mut(SceneUnit::T2v).is_none());
}

#[test]
fn scene_serializes_with_flattened_output() {
    let storyboard = Scene::new(
        "s0",
        0,
        SceneDraft {
            description: "d".to_string(),
            prompt: "p".to_string(),
        },
        SceneShape::SubStages,
        10,
    );
    let json = serde_json::to_value(&storyboard).unwrap();
    assert_eq!(json["status"], "pending");
    assert_eq!(json["subStages"]["t2i"]["status"], "pending");
    assert!(json.get("t2v").is_none());
    assert!(json.get("regenerationComment").is_none());

    let back: Scene = serde_json::from_value(json).unwrap();
    assert_eq!(back, storyboard);
}

#[derive(Debug, Clone)]
enum Op {
    Move(usize, bool),
    Delete(usize),
    Edit(usize),
    Approve(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..8usize, any::<bool>()).prop_map(|(i, up)| Op::Move(i, up)),
        (0..8usize).prop_map(Op::Delete),
        (0..8usize).prop_map(Op::Edit),
        (0..8usize).prop_map(Op::Approve),
    ]
}

proptest! {
    #[test]
    fn indices_stay_contiguous(n in 1..8usize, ops in prop::collection::vec(op(), 0..20)) {
        let mut list = scenes(n);
        for op in ops {
            if list.is_empty() {
                break;
            }
            let at = match op {
                Op::Move(i, _) | Op::Delete(i) | Op::Edit(i) | Op::Approve(i) => i % list.len(),
            };
            let id = list[at].id.clone();
            list = match op {
                Op::Move(_, up) => {
                    let dir = if up { MoveDirection::Up } else { MoveDirection::Down };
                    move_scene(&list, &id, dir).unwrap()
                }
                Op::Delete(_) => delete(&list, &id).unwrap(),
                Op::Edit(_) => edit(&list, &id, "edited").unwrap(),
                Op::Approve(_) => approve(&list, &id).unwrap(),
            };
            for (i, scene) in list.iter().enumerate() {
                prop_assert_eq!(scene.index, i);
            }
        }
    }
}
