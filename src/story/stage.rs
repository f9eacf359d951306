//! A chapter of a story: its viewers, widgets and data.
//!
//! Viewers live in the [`Story`] so stages can share them; a stage only
//! records how each one is laid out. Widgets belong to the stage and are
//! looked up by label through an [`ElementRegistry`].

use super::Story;
use super::data::{DataCollection, DataError, Dataset};
use crate::draw::Axis;
use crate::input::Viewer;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by stage lookups.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("invalid label '{0}': labels must be non-empty and contain no whitespace")]
    InvalidLabel(String),

    #[error("stage has no viewer labelled '{0}'")]
    UnknownViewer(String),

    #[error("stage has no widget labelled '{0}'")]
    UnknownWidget(String),

    #[error(transparent)]
    Data(#[from] DataError),
}

/// A UI element a stage can host next to its viewers.
pub trait UiElement: Any {
    /// Short name of the element type, e.g. `"slider"`
    fn kind(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// How a story viewer appears in a stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerLayout {
    /// Story label of the viewer
    pub viewer: String,
    /// Title shown above the viewer
    pub title: Option<String>,
    pub show_toolbar: bool,
}

/// Widgets keyed by label.
#[derive(Default)]
pub struct ElementRegistry {
    elements: BTreeMap<String, Box<dyn UiElement>>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element, returning the one previously under `label`.
    pub fn insert(
        &mut self,
        label: &str,
        element: Box<dyn UiElement>,
    ) -> Result<Option<Box<dyn UiElement>>, StageError> {
        validate_label(label)?;
        Ok(self.elements.insert(label.to_string(), element))
    }

    pub fn get(&self, label: &str) -> Option<&dyn UiElement> {
        self.elements.get(label).map(Box::as_ref)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut (dyn UiElement + 'static)> {
        self.elements.get_mut(label).map(Box::as_mut)
    }

    /// Typed lookup.
    pub fn get_as<T: UiElement>(&self, label: &str) -> Option<&T> {
        self.get(label)?.as_any().downcast_ref::<T>()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn validate_label(label: &str) -> Result<(), StageError> {
    if label.is_empty() || label.chars().any(char::is_whitespace) {
        return Err(StageError::InvalidLabel(label.to_string()));
    }
    Ok(())
}

/// One chapter of a story.
pub struct Stage {
    pub index: usize,
    pub title: String,
    pub subtitle: String,
    pub stage_icon: String,
    viewers: BTreeMap<String, ViewerLayout>,
    widgets: ElementRegistry,
    data: DataCollection,
}

impl Stage {
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            subtitle: String::new(),
            stage_icon: String::new(),
            viewers: BTreeMap::new(),
            widgets: ElementRegistry::new(),
            data: DataCollection::new(),
        }
    }

    /// Shows a story viewer in this stage, creating it with `make` if the
    /// story has none under `label` yet.
    pub fn add_viewer<'s>(
        &mut self,
        story: &'s mut Story,
        label: &str,
        title: Option<&str>,
        show_toolbar: bool,
        make: impl FnOnce() -> Viewer,
    ) -> Result<&'s mut Viewer, StageError> {
        validate_label(label)?;
        if story.viewer(label).is_none() {
            debug!("Creating viewer '{}' for stage {}", label, self.index);
            story.insert_viewer(label, make());
        }
        self.viewers.insert(
            label.to_string(),
            ViewerLayout {
                viewer: label.to_string(),
                title: title.map(str::to_string),
                show_toolbar,
            },
        );
        story
            .viewer_mut(label)
            .ok_or_else(|| StageError::UnknownViewer(label.to_string()))
    }

    pub fn get_viewer<'s>(&self, story: &'s Story, label: &str) -> Result<&'s Viewer, StageError> {
        if !self.viewers.contains_key(label) {
            return Err(StageError::UnknownViewer(label.to_string()));
        }
        story
            .viewer(label)
            .ok_or_else(|| StageError::UnknownViewer(label.to_string()))
    }

    pub fn get_viewer_mut<'s>(
        &self,
        story: &'s mut Story,
        label: &str,
    ) -> Result<&'s mut Viewer, StageError> {
        if !self.viewers.contains_key(label) {
            return Err(StageError::UnknownViewer(label.to_string()));
        }
        story
            .viewer_mut(label)
            .ok_or_else(|| StageError::UnknownViewer(label.to_string()))
    }

    pub fn viewer_layouts(&self) -> impl Iterator<Item = &ViewerLayout> {
        self.viewers.values()
    }

    pub fn set_viewer_nticks(
        &self,
        story: &mut Story,
        label: &str,
        axis: Axis,
        ticks: u32,
    ) -> Result<(), StageError> {
        self.get_viewer_mut(story, label)?
            .figure_mut()
            .set_nticks(axis, ticks);
        Ok(())
    }

    /// Adds a widget, replacing any existing one with the same label.
    pub fn add_widget(&mut self, label: &str, widget: Box<dyn UiElement>) -> Result<(), StageError> {
        if self.widgets.insert(label, widget)?.is_some() {
            debug!("Replaced widget '{}' in stage {}", label, self.index);
        }
        Ok(())
    }

    pub fn get_widget(&self, label: &str) -> Result<&dyn UiElement, StageError> {
        self.widgets
            .get(label)
            .ok_or_else(|| StageError::UnknownWidget(label.to_string()))
    }

    pub fn get_widget_as<T: UiElement>(&self, label: &str) -> Result<&T, StageError> {
        self.widgets
            .get_as::<T>(label)
            .ok_or_else(|| StageError::UnknownWidget(label.to_string()))
    }

    pub fn widgets(&self) -> &ElementRegistry {
        &self.widgets
    }

    pub fn data(&self) -> &DataCollection {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataCollection {
        &mut self.data
    }

    pub fn add_data(&mut self, dataset: Dataset) {
        self.data.add_data(dataset);
    }

    pub fn get_data(&self, label: &str) -> Result<&Dataset, StageError> {
        Ok(self.data.get_data(label)?)
    }

    pub fn update_data_value(
        &mut self,
        label: &str,
        component: &str,
        value: Value,
        index: usize,
    ) -> Result<(), StageError> {
        Ok(self.data.update_data_value(label, component, value, index)?)
    }

    pub fn update_data_values(
        &mut self,
        label: &str,
        values: &BTreeMap<String, Value>,
        index: usize,
    ) -> Result<(), StageError> {
        Ok(self.data.update_data_values(label, values, index)?)
    }

    pub fn add_data_values(
        &mut self,
        label: &str,
        values: &BTreeMap<String, Value>,
    ) -> Result<(), StageError> {
        Ok(self.data.add_data_values(label, values)?)
    }

    pub fn get_data_indices(
        &self,
        label: &str,
        component: &str,
        condition: impl Fn(&Value) -> bool,
        single: bool,
    ) -> Result<Vec<usize>, StageError> {
        Ok(self
            .data
            .get_data_indices(label, component, condition, single)?)
    }

    pub fn remove_data_values(
        &mut self,
        label: &str,
        component: &str,
        condition: impl Fn(&Value) -> bool,
        single: bool,
    ) -> Result<usize, StageError> {
        Ok(self
            .data
            .remove_data_values(label, component, condition, single)?)
    }
}
