//! Storage layer for taskr
//!
//! Persists the task collection to a JSON document and keeps a derived
//! metadata summary next to it:
//!
//! ```text
//! tasks.json       # { "tasks": [...], "lastUpdated": "..." }
//! metadata.json    # { "path", "activeCount", "deletedCount", "total", "lastUpdated" }
//! ```
//!
//! Both files are replaced atomically (write temp sibling, then rename), so a
//! reader never sees a half-written document. The metadata file is rewritten
//! only after the collection write succeeds.
//!
//! The `load`/`save`/`add`/`update`/`remove` entry points are fail-soft: they
//! log storage errors and fall back to an empty collection or `false`
//! instead of returning them. `try_load` and `try_save` expose the errors.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::task::{StoredTask, Task};

/// Default name of the task collection file
pub const DEFAULT_STORAGE_FILE: &str = "tasks.json";

/// Default name of the metadata summary file
pub const DEFAULT_METADATA_FILE: &str = "metadata.json";

/// On-disk layout of the task collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDocument {
    pub tasks: Vec<StoredTask>,
    pub last_updated: DateTime<Utc>,
}

/// Summary derived from the last saved collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageMetadata {
    pub path: String,
    pub active_count: usize,
    pub deleted_count: usize,
    pub total: usize,
    pub last_updated: DateTime<Utc>,
}

impl StorageMetadata {
    pub fn derive(path: &Path, tasks: &[Task], last_updated: DateTime<Utc>) -> Self {
        let deleted_count = tasks.iter().filter(|task| task.is_deleted()).count();
        Self {
            path: path.display().to_string(),
            active_count: tasks.len() - deleted_count,
            deleted_count,
            total: tasks.len(),
            last_updated,
        }
    }
}

/// Repository for the task collection
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    metadata_path: PathBuf,
}

impl Repository {
    /// Repository backed by `path`, with the metadata file as its sibling
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let metadata_path = sibling(&path, DEFAULT_METADATA_FILE);
        Self {
            path,
            metadata_path,
        }
    }

    pub fn with_metadata_path(mut self, metadata_path: impl Into<PathBuf>) -> Self {
        self.metadata_path = metadata_path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Create the storage file (and its metadata) with an empty collection if
    /// it does not exist yet. Returns whether anything was created.
    pub fn init(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.try_save(&[])?;
        info!(path = %self.path.display(), "initialized task storage");
        Ok(true)
    }

    // =========================================================================
    // Load / save
    // =========================================================================

    /// Load every stored task, including soft-deleted ones.
    ///
    /// Any failure is logged and yields an empty collection.
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "failed to load tasks");
                Vec::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<Vec<Task>> {
        self.init()?;
        let content = fs::read_to_string(&self.path)?;
        let document: StorageDocument = serde_json::from_str(&content)?;
        let tasks = document
            .tasks
            .into_iter()
            .map(|stored| {
                let id = stored.id.clone();
                Task::from_storage_form(stored).map_err(|err| {
                    Error::OperationFailed(format!("stored task '{id}' is invalid: {err}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Replace the stored collection with `tasks`, then refresh the metadata.
    ///
    /// Returns `false` (after logging) if either write failed.
    pub fn save(&self, tasks: &[Task]) -> bool {
        match self.try_save(tasks) {
            Ok(_) => true,
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "failed to save tasks");
                false
            }
        }
    }

    pub fn try_save(&self, tasks: &[Task]) -> Result<StorageMetadata> {
        let last_updated = Utc::now();
        let document = StorageDocument {
            tasks: tasks.iter().map(Task::to_storage_form).collect(),
            last_updated,
        };
        write_json_atomic(&self.path, &document)?;

        let metadata = StorageMetadata::derive(&self.path, tasks, last_updated);
        write_json_atomic(&self.metadata_path, &metadata)?;

        debug!(
            path = %self.path.display(),
            total = metadata.total,
            deleted = metadata.deleted_count,
            "saved tasks"
        );
        Ok(metadata)
    }

    /// Read the metadata summary written by the last successful save
    pub fn metadata(&self) -> Result<StorageMetadata> {
        let content = fs::read_to_string(&self.metadata_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    // =========================================================================
    // Collection operations
    // =========================================================================

    // Mutations read through `try_load` so that an unreadable file is never
    // overwritten with a collection that lost its contents.
    fn load_for_update(&self) -> Option<Vec<Task>> {
        match self.try_load() {
            Ok(tasks) => Some(tasks),
            Err(err) => {
                error!(
                    path = %self.path.display(),
                    error = %err,
                    "refusing to modify unreadable task storage"
                );
                None
            }
        }
    }

    /// Append `task` and persist. Returns the resulting collection, or the
    /// collection as loaded if the task could not be stored.
    pub fn add(&self, task: Task) -> Vec<Task> {
        let Some(mut tasks) = self.load_for_update() else {
            return Vec::new();
        };
        if tasks.iter().any(|existing| existing.id() == task.id()) {
            warn!(id = task.id(), "task id already stored; not adding");
            return tasks;
        }

        let id = task.id().to_string();
        tasks.push(task);
        if self.save(&tasks) {
            info!(id = %id, "task added");
            return tasks;
        }
        tasks.pop();
        tasks
    }

    /// Replace the stored task with the same id as `task`.
    ///
    /// Unknown ids leave storage untouched and return the loaded collection.
    pub fn update(&self, task: Task) -> Vec<Task> {
        let Some(tasks) = self.load_for_update() else {
            return Vec::new();
        };
        let Some(index) = tasks.iter().position(|existing| existing.id() == task.id()) else {
            warn!(id = task.id(), "task not found; nothing updated");
            return tasks;
        };

        let mut updated = tasks.clone();
        let id = task.id().to_string();
        updated[index] = task;
        if self.save(&updated) {
            info!(id = %id, "task updated");
            return updated;
        }
        tasks
    }

    /// Soft-delete the task with `id`, stamped with the current time.
    pub fn remove(&self, id: &str) -> Vec<Task> {
        self.remove_at(id, Utc::now())
    }

    pub fn remove_at(&self, id: &str, edited_at: DateTime<Utc>) -> Vec<Task> {
        let Some(tasks) = self.load_for_update() else {
            return Vec::new();
        };
        let Some(task) = tasks.iter().find(|task| task.id() == id) else {
            warn!(id = %id, "task not found; nothing deleted");
            return tasks;
        };
        self.update(task.mark_deleted(edited_at))
    }

    /// Look up a stored task (soft-deleted included) by id
    pub fn find(&self, id: &str) -> Option<Task> {
        self.load().into_iter().find(|task| task.id() == id)
    }

    /// Human-readable summary of the storage file
    pub fn info(&self) -> String {
        let tasks = self.load();
        let deleted = tasks.iter().filter(|task| task.is_deleted()).count();
        [
            "Task storage".to_string(),
            format!("- Path: {}", self.path.display()),
            format!("- Active tasks: {}", tasks.len() - deleted),
            format!("- Deleted tasks: {deleted}"),
            format!("- Total: {}", tasks.len()),
        ]
        .join("\n")
    }
}

// =============================================================================
// Atomic file writes
// =============================================================================

/// A fully written temp file waiting to be renamed over its target.
///
/// Dropping it without calling [`StagedWrite::commit`] discards the temp file
/// and leaves the target untouched.
#[derive(Debug)]
pub struct StagedWrite {
    temp_path: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Atomically replace the target with the staged contents
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.temp_path, &self.target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Write `data` to a temp sibling of `path` and flush it to disk.
pub fn stage_atomic(path: &Path, data: &[u8]) -> Result<StagedWrite> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_sibling(path);
    let mut file = File::create(&temp_path)?;
    let staged = StagedWrite {
        temp_path,
        target: path.to_path_buf(),
        committed: false,
    };
    file.write_all(data)?;
    file.sync_all()?;
    Ok(staged)
}

/// Write data atomically using temp file + rename
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    stage_atomic(path, data)?.commit()
}

/// Write JSON data atomically (pretty printed)
pub fn write_json_atomic<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    write_atomic(path, json.as_bytes())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
