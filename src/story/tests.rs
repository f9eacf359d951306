use super::*;
use crate::config::StoryConfig;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn step(completed: bool) -> StepState {
    StepState {
        completed,
        ..Default::default()
    }
}

fn create_test_story() -> Story {
    let config = StoryConfig {
        write_debounce_secs: 2.0,
        nonserialized: vec!["inputs".to_string()],
    };
    let mut story = Story::new("hubble", &config);
    story.insert_stage(
        0,
        StageState {
            steps: vec![step(true), step(false), step(true)],
            ..Default::default()
        },
    );
    story.insert_stage(1, StageState::default());
    story
}

fn record_events(story: &mut Story) -> Rc<RefCell<Vec<StoryEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    story.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn step_index_is_clamped_to_last_step() {
    let mut story = create_test_story();

    assert_eq!(story.set_step_index(7).unwrap(), 2);
    assert_eq!(story.state().step_index, 2);
    assert_eq!(story.state().stages[&0].step_index, 2);
    assert!(story.state().step_complete);

    assert_eq!(story.set_step_index(1).unwrap(), 1);
    assert!(!story.state().step_complete);
}

#[test]
fn step_index_needs_an_existing_non_empty_stage() {
    let mut story = create_test_story();

    story.set_stage_index(1);
    assert!(matches!(story.set_step_index(0), Err(StoryError::EmptyStage(1))));

    story.set_stage_index(5);
    assert!(matches!(story.set_step_index(0), Err(StoryError::UnknownStage(5))));
}

#[test]
fn max_stage_index_never_decreases() {
    let mut story = create_test_story();
    story.set_stage_index(3);
    story.set_stage_index(1);
    assert_eq!(story.state().stage_index, 1);
    assert_eq!(story.state().max_stage_index, 3);
}

#[test]
fn step_complete_writes_through_to_stage() {
    let mut story = create_test_story();
    story.set_step_index(1).unwrap();
    let events = record_events(&mut story);

    story.set_step_complete(true).unwrap();

    assert!(story.state().stages[&0].steps[1].completed);
    assert!(story.state().step_complete);
    assert_eq!(*events.borrow(), vec![StoryEvent::StepComplete(true)]);
}

#[test]
fn scores_are_totalled_with_missing_as_zero() {
    let mut story = create_test_story();
    let events = record_events(&mut story);

    story.set_mc_score("1", "q1", Some(10));
    story.set_mc_score("1", "q2", None);
    story.set_mc_score("2", "q1", Some(5));
    assert_eq!(story.state().total_score, 15);

    story.set_mc_score("1", "q1", Some(3));
    assert_eq!(story.state().total_score, 8);
    assert_eq!(
        *events.borrow(),
        vec![StoryEvent::TotalScore(10), StoryEvent::TotalScore(15), StoryEvent::TotalScore(8)]
    );

    story.set_mc_scoring(McScoring::new());
    assert_eq!(story.state().total_score, 0);
}

#[test]
fn as_dict_filters_nonserialized_keys() {
    let mut story = create_test_story();
    story.set_response("1", "why", json!("because"));
    let dict = story.as_dict();

    assert!(dict.get("inputs").is_none());
    assert_eq!(dict["name"], "hubble");
    assert_eq!(dict["responses"]["1"]["why"], "because");
    assert_eq!(dict["stages"]["0"]["steps"][0]["completed"], true);
}

#[test]
fn update_from_dict_merges_and_strips_model_ids() {
    let mut story = create_test_story();
    story
        .update_from_dict(json!({
            "stage_index": 1,
            "max_stage_index": 4,
            "inputs": { "secret": 1 },
            "stages": {
                "0": { "model_id": "IPY_MODEL_abc", "step_index": 1, "steps": [{ "completed": true }] }
            }
        }))
        .unwrap();

    let state = story.state();
    assert_eq!(state.stage_index, 1);
    assert_eq!(state.max_stage_index, 4);
    assert_eq!(state.name.as_deref(), Some("hubble"));
    assert!(state.inputs.is_empty());
    assert!(state.stages[&0].extra.get("model_id").is_none());
    assert_eq!(state.stages[&0].steps.len(), 1);
    assert!(!state.stages.contains_key(&1));
}

#[test]
fn update_from_dict_rejects_malformed_input() {
    let mut story = create_test_story();
    assert!(matches!(
        story.update_from_dict(json!([1, 2, 3])),
        Err(StoryError::Import(_))
    ));
    assert!(matches!(
        story.update_from_dict(json!({ "stage_index": "two" })),
        Err(StoryError::Import(_))
    ));
    assert_eq!(story.state().stage_index, 0);
}

#[test]
fn writes_are_debounced() {
    let mut story = create_test_story();
    let mut hub = MessageLog::default();
    let start = story.clock();

    story.set_stage_index(1);
    story.tick(start + Duration::from_secs(1));
    story.set_response("1", "q", json!(2));
    assert!(story.has_pending_write());

    // Deadline is two seconds after the last change, at start + 3s.
    assert!(!story.flush_writes(start + Duration::from_millis(2500), &mut hub).unwrap());
    assert!(hub.messages.is_empty());

    assert!(story.flush_writes(start + Duration::from_secs(3), &mut hub).unwrap());
    assert_eq!(hub.messages.len(), 1);
    assert_eq!(hub.messages[0].story["stage_index"], 1);

    assert!(!story.flush_writes(start + Duration::from_secs(10), &mut hub).unwrap());
    assert_eq!(hub.messages.len(), 1);
}

#[test]
fn write_deadline_follows_caller_clock() {
    let mut story = create_test_story();
    let mut hub = MessageLog::default();
    let replayed = story.clock() + Duration::from_secs(3600);

    story.tick(replayed);
    story.set_stage_index(1);

    assert!(!story.flush_writes(replayed + Duration::from_secs(1), &mut hub).unwrap());
    assert!(story.flush_writes(replayed + Duration::from_secs(2), &mut hub).unwrap());
    assert_eq!(hub.messages.len(), 1);

    // Flushing advanced the clock, so the next change is timed from there.
    story.set_mc_score("1", "q1", Some(4));
    assert!(!story.flush_writes(replayed + Duration::from_secs(3), &mut hub).unwrap());
    assert!(story.flush_writes(replayed + Duration::from_secs(4), &mut hub).unwrap());
    assert_eq!(hub.messages.len(), 2);
}

#[test]
fn flush_now_skips_the_wait() {
    let mut story = create_test_story();
    let mut hub = MessageLog::default();
    story.setup_for_student(json!({ "id": 7 }), None);

    story.flush_now(&mut hub).unwrap();

    assert!(!story.has_pending_write());
    assert_eq!(hub.messages.len(), 1);
    assert_eq!(hub.messages[0].story["student_user"]["id"], 7);
}

#[test]
fn story_round_trips_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("story.json"));
    let mut story = create_test_story();
    story.set_stage_index(1);
    story.set_mc_score("1", "q1", Some(10));
    story.flush_now(&mut store).unwrap();

    let mut restored = Story::new("hubble", &StoryConfig::default());
    restored
        .update_from_dict(store.load().unwrap().unwrap())
        .unwrap();
    assert_eq!(restored.state().stage_index, 1);
    assert_eq!(restored.state().total_score, 10);
}
