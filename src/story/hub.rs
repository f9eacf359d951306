//! Database write messages, debouncing and sinks.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Request to persist the current story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteToDatabaseMessage {
    /// Story dictionary as produced by `Story::as_dict`
    pub story: Value,
}

/// Message bus that carries story writes to persistence.
pub trait Hub {
    fn broadcast(&mut self, message: WriteToDatabaseMessage) -> Result<()>;
}

/// Hub that keeps every message in memory.
#[derive(Debug, Default)]
pub struct MessageLog {
    pub messages: Vec<WriteToDatabaseMessage>,
}

impl Hub for MessageLog {
    fn broadcast(&mut self, message: WriteToDatabaseMessage) -> Result<()> {
        self.messages.push(message);
        Ok(())
    }
}

/// Trailing-edge debounce for story writes.
///
/// Every request pushes the deadline out by `wait`; the write happens once
/// requests stop arriving for that long.
#[derive(Debug, Clone)]
pub struct WriteDebouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl WriteDebouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once the deadline has passed, consuming the pending write.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// On-disk layout written by [`JsonFileStore`].
#[derive(Debug, Serialize, Deserialize)]
struct StoryFile {
    version: u32,
    last_modified: String,
    story: Value,
}

const CURRENT_VERSION: u32 = 1;

/// Hub that keeps the latest story in a JSON file.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash never leaves a half-written story behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored story dictionary, if any.
    pub fn load(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            debug!("No story file at {}", self.path.display());
            return Ok(None);
        }
        let bytes = fs::read(&self.path)
            .with_context(|| format!("failed to read story file {}", self.path.display()))?;
        let file: StoryFile = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse story file {}", self.path.display()))?;
        if file.version > CURRENT_VERSION {
            log::warn!(
                "Story file {} has version {}, newer than supported {}",
                self.path.display(),
                file.version,
                CURRENT_VERSION
            );
        }
        Ok(Some(file.story))
    }
}

impl Hub for JsonFileStore {
    fn broadcast(&mut self, message: WriteToDatabaseMessage) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create story directory {}", parent.display())
                })?;
            }
        }

        let payload = StoryFile {
            version: CURRENT_VERSION,
            last_modified: Utc::now().to_rfc3339(),
            story: message.story,
        };
        let json_bytes =
            serde_json::to_vec_pretty(&payload).context("failed to serialise story payload")?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &json_bytes)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "failed to move {} into place at {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        info!(
            "Saved story ({} bytes) to {}",
            json_bytes.len(),
            self.path.display()
        );
        Ok(())
    }
}
