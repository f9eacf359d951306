//! Tabular lesson data: named datasets of equally long columns.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by dataset operations.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("no dataset labelled '{0}'")]
    UnknownDataset(String),

    #[error("dataset '{dataset}' has no component '{component}'")]
    UnknownComponent { dataset: String, component: String },

    #[error("row {index} is out of range for dataset '{dataset}' with {len} rows")]
    IndexOutOfRange {
        dataset: String,
        index: usize,
        len: usize,
    },

    #[error("component '{component}' has {found} rows, expected {expected}")]
    RaggedColumns {
        component: String,
        expected: usize,
        found: usize,
    },
}

/// One named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub values: Vec<Value>,
}

/// A labelled table whose columns all have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    label: String,
    components: Vec<Component>,
}

impl Dataset {
    /// Builds a dataset; every column must have the same number of rows.
    pub fn new(
        label: impl Into<String>,
        columns: impl IntoIterator<Item = (String, Vec<Value>)>,
    ) -> Result<Self, DataError> {
        let components: Vec<Component> = columns
            .into_iter()
            .map(|(name, values)| Component { name, values })
            .collect();
        if let Some(first) = components.first() {
            let expected = first.values.len();
            if let Some(bad) = components.iter().find(|c| c.values.len() != expected) {
                return Err(DataError::RaggedColumns {
                    component: bad.name.clone(),
                    expected,
                    found: bad.values.len(),
                });
            }
        }
        Ok(Self {
            label: label.into(),
            components,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.components.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name.as_str())
    }

    pub fn component(&self, name: &str) -> Result<&[Value], DataError> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| self.unknown_component(name))
    }

    /// Sets a single cell.
    pub fn set_value(&mut self, component: &str, index: usize, value: Value) -> Result<(), DataError> {
        self.check_index(index)?;
        let column = self.column_mut(component)?;
        column[index] = value;
        Ok(())
    }

    /// Sets several cells of one row. Nothing changes if any name is unknown.
    pub fn set_values(
        &mut self,
        index: usize,
        values: &BTreeMap<String, Value>,
    ) -> Result<(), DataError> {
        self.check_index(index)?;
        for name in values.keys() {
            self.component(name)?;
        }
        for (name, value) in values {
            self.column_mut(name)?[index] = value.clone();
        }
        Ok(())
    }

    /// Appends a row. Components missing from `values` get `null`.
    pub fn push_row(&mut self, values: &BTreeMap<String, Value>) {
        for name in values.keys() {
            if !self.components.iter().any(|c| &c.name == name) {
                debug!("Ignoring unknown component '{}' in new row for '{}'", name, self.label);
            }
        }
        for component in &mut self.components {
            let value = values.get(&component.name).cloned().unwrap_or(Value::Null);
            component.values.push(value);
        }
    }

    /// Row indices whose value in `component` satisfies `condition`.
    pub fn indices_where(
        &self,
        component: &str,
        condition: impl Fn(&Value) -> bool,
    ) -> Result<Vec<usize>, DataError> {
        Ok(self
            .component(component)?
            .iter()
            .enumerate()
            .filter(|(_, value)| condition(value))
            .map(|(index, _)| index)
            .collect())
    }

    /// Removes the given rows from every column.
    pub fn remove_rows(&mut self, indices: &[usize]) -> Result<(), DataError> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(self.out_of_range(index));
        }
        for component in &mut self.components {
            let mut row = 0;
            component.values.retain(|_| {
                let keep = !indices.contains(&row);
                row += 1;
                keep
            });
        }
        Ok(())
    }

    fn column_mut(&mut self, name: &str) -> Result<&mut Vec<Value>, DataError> {
        let position = self.components.iter().position(|c| c.name == name);
        match position {
            Some(position) => Ok(&mut self.components[position].values),
            None => Err(self.unknown_component(name)),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), DataError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(self.out_of_range(index))
        }
    }

    fn unknown_component(&self, name: &str) -> DataError {
        DataError::UnknownComponent {
            dataset: self.label.clone(),
            component: name.to_string(),
        }
    }

    fn out_of_range(&self, index: usize) -> DataError {
        DataError::IndexOutOfRange {
            dataset: self.label.clone(),
            index,
            len: self.len(),
        }
    }
}

/// All datasets loaded into a lesson, looked up by label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataCollection {
    datasets: Vec<Dataset>,
}

impl DataCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset, replacing any existing one with the same label.
    pub fn add_data(&mut self, dataset: Dataset) {
        if let Some(existing) = self
            .datasets
            .iter_mut()
            .find(|d| d.label == dataset.label)
        {
            debug!("Replacing dataset '{}'", dataset.label);
            *existing = dataset;
        } else {
            self.datasets.push(dataset);
        }
    }

    pub fn get_data(&self, label: &str) -> Result<&Dataset, DataError> {
        self.datasets
            .iter()
            .find(|d| d.label == label)
            .ok_or_else(|| DataError::UnknownDataset(label.to_string()))
    }

    pub fn get_data_mut(&mut self, label: &str) -> Result<&mut Dataset, DataError> {
        self.datasets
            .iter_mut()
            .find(|d| d.label == label)
            .ok_or_else(|| DataError::UnknownDataset(label.to_string()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|d| d.label.as_str())
    }

    pub fn update_data_value(
        &mut self,
        label: &str,
        component: &str,
        value: Value,
        index: usize,
    ) -> Result<(), DataError> {
        self.get_data_mut(label)?.set_value(component, index, value)
    }

    /// Updates several components of one row in a single step.
    pub fn update_data_values(
        &mut self,
        label: &str,
        values: &BTreeMap<String, Value>,
        index: usize,
    ) -> Result<(), DataError> {
        self.get_data_mut(label)?.set_values(index, values)
    }

    pub fn add_data_values(
        &mut self,
        label: &str,
        values: &BTreeMap<String, Value>,
    ) -> Result<(), DataError> {
        self.get_data_mut(label)?.push_row(values);
        Ok(())
    }

    /// Rows matching `condition`; with `single`, at most the first match.
    pub fn get_data_indices(
        &self,
        label: &str,
        component: &str,
        condition: impl Fn(&Value) -> bool,
        single: bool,
    ) -> Result<Vec<usize>, DataError> {
        let mut indices = self.get_data(label)?.indices_where(component, condition)?;
        if single {
            indices.truncate(1);
        }
        Ok(indices)
    }

    /// Removes matching rows and returns how many were removed.
    pub fn remove_data_values(
        &mut self,
        label: &str,
        component: &str,
        condition: impl Fn(&Value) -> bool,
        single: bool,
    ) -> Result<usize, DataError> {
        let indices = self.get_data_indices(label, component, condition, single)?;
        self.get_data_mut(label)?.remove_rows(&indices)?;
        Ok(indices.len())
    }
}
