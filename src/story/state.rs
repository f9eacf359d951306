//! Serializable story progress.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Progress of one step inside a stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepState {
    #[serde(default)]
    pub completed: bool,
    /// Frontend-defined fields (title, template, ...) carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Progress of one stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    /// Last step the student was on in this stage
    #[serde(default)]
    pub step_index: usize,
    #[serde(default)]
    pub steps: Vec<StepState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Score of one multiple-choice question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McScore {
    /// Points awarded; `None` until the question is answered
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Multiple-choice scores keyed by stage, then by question tag.
pub type McScoring = BTreeMap<String, BTreeMap<String, McScore>>;

/// Free-form responses keyed by stage, then by question tag.
pub type Responses = BTreeMap<String, BTreeMap<String, Value>>;

/// Everything about a student's progress through a story that is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryState {
    pub name: Option<String>,
    pub inputs: BTreeMap<String, Value>,
    pub stage_index: usize,
    pub step_index: usize,
    pub step_complete: bool,
    /// Furthest stage ever reached
    pub max_stage_index: usize,
    pub stages: BTreeMap<usize, StageState>,
    pub teacher_user: Option<Value>,
    pub student_user: Option<Value>,
    pub classroom: Option<Value>,
    pub mc_scoring: McScoring,
    pub total_score: u32,
    pub has_scoring: bool,
    pub responses: Responses,
}

impl Default for StoryState {
    fn default() -> Self {
        Self {
            name: None,
            inputs: BTreeMap::new(),
            stage_index: 0,
            step_index: 0,
            step_complete: false,
            max_stage_index: 0,
            stages: BTreeMap::new(),
            teacher_user: None,
            student_user: None,
            classroom: None,
            mc_scoring: BTreeMap::new(),
            total_score: 0,
            has_scoring: true,
            responses: BTreeMap::new(),
        }
    }
}

impl StoryState {
    /// Sum of all answered multiple-choice scores.
    pub fn score_total(&self) -> u32 {
        self.mc_scoring
            .values()
            .flat_map(BTreeMap::values)
            .map(|mc| mc.score.unwrap_or(0))
            .sum()
    }
}

/// Removes `keys` from a top-level JSON object.
pub(crate) fn drop_keys(dict: &mut Map<String, Value>, keys: &[String]) {
    for key in keys {
        dict.remove(key);
    }
}

/// Removes frontend widget ids from every stage entry.
///
/// The frontend assigns `model_id`s itself; importing stale ones would make
/// it lose track of its widgets.
pub(crate) fn strip_model_ids(dict: &mut Map<String, Value>) {
    if let Some(Value::Object(stages)) = dict.get_mut("stages") {
        for stage in stages.values_mut() {
            if let Value::Object(stage) = stage {
                stage.remove("model_id");
            }
        }
    }
}
