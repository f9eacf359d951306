//! Lesson progress: stages, steps, scores and their persistence.
//!
//! A [`Story`] wraps the serializable [`StoryState`] and adds the runtime
//! pieces that never leave the process: the viewers shown in each stage, the
//! write debouncer and a change signal for the frontend. Every mutation
//! requests a database write. The story never reads the system clock after
//! construction: callers advance it with [`Story::tick`] or
//! [`Story::flush_writes`], and pending writes are timed against that clock.

pub mod data;
pub mod hub;
pub mod stage;
pub mod state;

// Re-export commonly used types at module level
pub use data::{DataCollection, DataError, Dataset};
pub use hub::{Hub, JsonFileStore, MessageLog, WriteDebouncer, WriteToDatabaseMessage};
pub use stage::{ElementRegistry, Stage, StageError, UiElement, ViewerLayout};
pub use state::{McScore, McScoring, StageState, StepState, StoryState};

use crate::config::StoryConfig;
use crate::input::Viewer;
use crate::observe::{Signal, SubscriptionId};
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised while navigating or importing a story.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("stage {0} does not exist")]
    UnknownStage(usize),

    #[error("stage {0} has no steps")]
    EmptyStage(usize),

    #[error("step {step} does not exist in stage {stage}")]
    UnknownStep { stage: usize, step: usize },

    #[error("invalid story data: {0}")]
    Import(String),
}

/// Change notifications for the frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryEvent {
    StageIndex(usize),
    MaxStageIndex(usize),
    StepIndex(usize),
    StepComplete(bool),
    TotalScore(u32),
    Responses,
    Imported,
}

/// A running lesson.
pub struct Story {
    state: StoryState,
    nonserialized: Vec<String>,
    viewers: BTreeMap<String, Viewer>,
    writes: WriteDebouncer,
    /// Latest time supplied by the caller; write deadlines start here
    clock: Instant,
    changes: Signal<StoryEvent>,
}

impl Story {
    pub fn new(name: impl Into<String>, config: &StoryConfig) -> Self {
        let state = StoryState {
            name: Some(name.into()),
            ..StoryState::default()
        };
        Self::with_state(state, config)
    }

    pub fn with_state(state: StoryState, config: &StoryConfig) -> Self {
        Self {
            state,
            nonserialized: config.nonserialized.clone(),
            viewers: BTreeMap::new(),
            writes: WriteDebouncer::new(
                Duration::try_from_secs_f64(config.write_debounce_secs).unwrap_or(Duration::ZERO),
            ),
            clock: Instant::now(),
            changes: Signal::new(),
        }
    }

    /// Advances the story clock used to time pending writes.
    pub fn tick(&mut self, now: Instant) {
        self.clock = now;
    }

    pub fn clock(&self) -> Instant {
        self.clock
    }

    pub fn state(&self) -> &StoryState {
        &self.state
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&StoryEvent) + 'static) -> SubscriptionId {
        self.changes.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }

    /// Adds a stage's progress entry, replacing any existing one.
    pub fn insert_stage(&mut self, index: usize, stage: StageState) {
        self.state.stages.insert(index, stage);
    }

    pub fn set_stage_index(&mut self, index: usize) {
        if self.state.stage_index != index {
            self.state.stage_index = index;
            self.changes.emit(&StoryEvent::StageIndex(index));
        }
        if index > self.state.max_stage_index {
            self.state.max_stage_index = index;
            self.changes.emit(&StoryEvent::MaxStageIndex(index));
        }
        debug!("Stage index set to {}", index);
        self.request_write();
    }

    /// Moves to a step of the current stage, clamped to its last step.
    pub fn set_step_index(&mut self, index: usize) -> Result<usize, StoryError> {
        let stage_index = self.state.stage_index;
        let stage = self
            .state
            .stages
            .get_mut(&stage_index)
            .ok_or(StoryError::UnknownStage(stage_index))?;
        let last = stage
            .steps
            .len()
            .checked_sub(1)
            .ok_or(StoryError::EmptyStage(stage_index))?;

        let step = index.min(last);
        stage.step_index = step;
        let complete = stage.steps[step].completed;

        if self.state.step_index != step {
            self.state.step_index = step;
            self.changes.emit(&StoryEvent::StepIndex(step));
        }
        self.update_step_complete(complete);
        debug!("Step index set to {} in stage {}", step, stage_index);
        self.request_write();
        Ok(step)
    }

    /// Marks the current step as completed or not.
    pub fn set_step_complete(&mut self, complete: bool) -> Result<(), StoryError> {
        let stage_index = self.state.stage_index;
        let step = self.state.step_index;
        let stage = self
            .state
            .stages
            .get_mut(&stage_index)
            .ok_or(StoryError::UnknownStage(stage_index))?;
        let entry = stage.steps.get_mut(step).ok_or(StoryError::UnknownStep {
            stage: stage_index,
            step,
        })?;
        entry.completed = complete;

        self.update_step_complete(complete);
        self.request_write();
        Ok(())
    }

    pub fn set_mc_score(&mut self, stage: &str, tag: &str, score: Option<u32>) {
        let entry = self
            .state
            .mc_scoring
            .entry(stage.to_string())
            .or_default()
            .entry(tag.to_string())
            .or_default();
        entry.score = score;
        self.update_total_score();
        self.request_write();
    }

    pub fn set_mc_scoring(&mut self, scoring: McScoring) {
        self.state.mc_scoring = scoring;
        self.update_total_score();
        self.request_write();
    }

    pub fn set_response(&mut self, stage: &str, tag: &str, value: Value) {
        self.state
            .responses
            .entry(stage.to_string())
            .or_default()
            .insert(tag.to_string(), value);
        self.changes.emit(&StoryEvent::Responses);
        self.request_write();
    }

    /// Records who is working through the story.
    pub fn setup_for_student(&mut self, student: Value, classroom: Option<Value>) {
        info!("Story set up for student");
        self.state.student_user = Some(student);
        self.state.classroom = classroom;
        self.request_write();
    }

    /// Exports the story as a JSON object without the non-serialized keys.
    pub fn as_dict(&self) -> Value {
        let mut dict = match serde_json::to_value(&self.state) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        state::drop_keys(&mut dict, &self.nonserialized);
        Value::Object(dict)
    }

    /// Merges a previously exported story into this one.
    ///
    /// Keys present in `dict` replace the current values; everything else is
    /// kept. Non-serialized keys and per-stage `model_id`s are ignored.
    pub fn update_from_dict(&mut self, dict: Value) -> Result<(), StoryError> {
        let Value::Object(mut incoming) = dict else {
            return Err(StoryError::Import("expected a JSON object".into()));
        };
        state::drop_keys(&mut incoming, &self.nonserialized);
        state::strip_model_ids(&mut incoming);

        let mut merged = match serde_json::to_value(&self.state) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => return Err(StoryError::Import(e.to_string())),
        };
        merged.extend(incoming);

        let state: StoryState = serde_json::from_value(Value::Object(merged))
            .map_err(|e| StoryError::Import(e.to_string()))?;
        self.state = state;
        info!(
            "Imported story at stage {} step {}",
            self.state.stage_index, self.state.step_index
        );
        self.changes.emit(&StoryEvent::Imported);
        Ok(())
    }

    /// Broadcasts the story if a requested write has settled.
    pub fn flush_writes(&mut self, now: Instant, hub: &mut dyn Hub) -> anyhow::Result<bool> {
        self.tick(now);
        if !self.writes.due(now) {
            return Ok(false);
        }
        self.broadcast(hub)?;
        Ok(true)
    }

    /// Broadcasts the story immediately, dropping any pending write.
    pub fn flush_now(&mut self, hub: &mut dyn Hub) -> anyhow::Result<()> {
        self.writes.cancel();
        self.broadcast(hub)
    }

    pub fn has_pending_write(&self) -> bool {
        self.writes.is_pending()
    }

    pub fn viewer(&self, label: &str) -> Option<&Viewer> {
        self.viewers.get(label)
    }

    pub fn viewer_mut(&mut self, label: &str) -> Option<&mut Viewer> {
        self.viewers.get_mut(label)
    }

    /// Registers a viewer, returning the one it replaced.
    pub fn insert_viewer(&mut self, label: impl Into<String>, viewer: Viewer) -> Option<Viewer> {
        self.viewers.insert(label.into(), viewer)
    }

    pub fn viewer_labels(&self) -> impl Iterator<Item = &str> {
        self.viewers.keys().map(String::as_str)
    }

    fn broadcast(&mut self, hub: &mut dyn Hub) -> anyhow::Result<()> {
        debug!("Writing story to database");
        hub.broadcast(WriteToDatabaseMessage {
            story: self.as_dict(),
        })
    }

    fn update_step_complete(&mut self, complete: bool) {
        if self.state.step_complete != complete {
            self.state.step_complete = complete;
            self.changes.emit(&StoryEvent::StepComplete(complete));
        }
    }

    fn update_total_score(&mut self) {
        let total = self.state.score_total();
        if self.state.total_score != total {
            self.state.total_score = total;
            self.changes.emit(&StoryEvent::TotalScore(total));
        }
    }

    fn request_write(&mut self) {
        self.writes.request(self.clock);
    }
}

#[cfg(test)]
mod tests;
