//! The task entity.
//!
//! A [`Task`] is immutable: edits and soft deletion produce a new value.
//! Every constructor runs the field validators, so a `Task` in hand always
//! satisfies the title/description rules and `created_at <= last_edited_at`
//! whenever both timestamps are known.
//! [`StoredTask`] is the plain serialized form used in `tasks.json`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{
    validate_description, validate_title, Choice, OptionTable, ValidationError, DESCRIPTION_RULE,
    TITLE_RULE,
};

/// Lookahead used by [`Task::is_priority`]
pub const DEFAULT_PRIORITY_WINDOW_DAYS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl Status {
    pub const OPTIONS: OptionTable<Status> = OptionTable {
        field: "status",
        entries: &[
            Choice {
                value: Status::Pending,
                label: "pending",
                code: 1,
            },
            Choice {
                value: Status::InProgress,
                label: "in-progress",
                code: 2,
            },
            Choice {
                value: Status::Completed,
                label: "completed",
                code: 3,
            },
            Choice {
                value: Status::Cancelled,
                label: "cancelled",
                code: 4,
            },
        ],
    };

    pub fn label(self) -> &'static str {
        Self::OPTIONS.label_of(self)
    }

    pub fn code(self) -> u8 {
        Self::OPTIONS.code_of(self)
    }

    /// Pending and in-progress tasks are still being worked on
    pub fn is_active(self) -> bool {
        matches!(self, Status::Pending | Status::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const OPTIONS: OptionTable<Difficulty> = OptionTable {
        field: "difficulty",
        entries: &[
            Choice {
                value: Difficulty::Easy,
                label: "easy",
                code: 1,
            },
            Choice {
                value: Difficulty::Medium,
                label: "medium",
                code: 2,
            },
            Choice {
                value: Difficulty::Hard,
                label: "hard",
                code: 3,
            },
        ],
    };

    pub fn label(self) -> &'static str {
        Self::OPTIONS.label_of(self)
    }

    pub fn code(self) -> u8 {
        Self::OPTIONS.code_of(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Programming,
    Study,
    Work,
    Leisure,
    #[default]
    Other,
}

impl Category {
    pub const OPTIONS: OptionTable<Category> = OptionTable {
        field: "category",
        entries: &[
            Choice {
                value: Category::Programming,
                label: "programming",
                code: 1,
            },
            Choice {
                value: Category::Study,
                label: "study",
                code: 2,
            },
            Choice {
                value: Category::Work,
                label: "work",
                code: 3,
            },
            Choice {
                value: Category::Leisure,
                label: "leisure",
                code: 4,
            },
            Choice {
                value: Category::Other,
                label: "other",
                code: 5,
            },
        ],
    };

    pub fn label(self) -> &'static str {
        Self::OPTIONS.label_of(self)
    }

    pub fn code(self) -> u8 {
        Self::OPTIONS.code_of(self)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serialized form of a task as it appears in the storage file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub deleted: bool,
}

/// User-supplied fields for a task that does not exist yet.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub difficulty: Difficulty,
    pub category: Category,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Field overrides for [`Task::apply_edits`]. `None` keeps the current value.
///
/// `due_date` is doubly optional: `Some(None)` clears the due date.
#[derive(Debug, Clone, Default)]
pub struct TaskEdits {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskEdits {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.difficulty.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: String,
    title: String,
    description: String,
    status: Status,
    created_at: Option<DateTime<Utc>>,
    last_edited_at: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    difficulty: Difficulty,
    category: Category,
    deleted: bool,
}

impl Task {
    /// Create a brand new task with a fresh id, stamped at `now`.
    pub fn create(draft: NewTask, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::from_storage_form(StoredTask {
            id: Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            status: draft.status,
            created_at: Some(now),
            last_edited_at: Some(now),
            due_date: draft.due_date,
            difficulty: draft.difficulty,
            category: draft.category,
            deleted: false,
        })
    }

    /// Rebuild a task from its stored form, re-checking every invariant.
    pub fn from_storage_form(stored: StoredTask) -> Result<Self, ValidationError> {
        validate_title(&stored.title, &TITLE_RULE)?;
        validate_description(&stored.description, &DESCRIPTION_RULE)?;
        if stored.id.trim().is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }
        if let (Some(created), Some(edited)) = (stored.created_at, stored.last_edited_at) {
            if edited < created {
                return Err(ValidationError::BeforeCreation {
                    field: "lastEditedAt",
                });
            }
        }

        Ok(Self {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            status: stored.status,
            created_at: stored.created_at,
            last_edited_at: stored.last_edited_at,
            due_date: stored.due_date,
            difficulty: stored.difficulty,
            category: stored.category,
            deleted: stored.deleted,
        })
    }

    pub fn to_storage_form(&self) -> StoredTask {
        StoredTask {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            created_at: self.created_at,
            last_edited_at: self.last_edited_at,
            due_date: self.due_date,
            difficulty: self.difficulty,
            category: self.category,
            deleted: self.deleted,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// `None` for legacy entries stored without a creation time
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn last_edited_at(&self) -> Option<DateTime<Utc>> {
        self.last_edited_at
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// A task is overdue once its due date is strictly before `reference`.
    /// Status is not considered here.
    pub fn is_overdue(&self, reference: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < reference)
    }

    /// Active task due within the default three day window.
    ///
    /// Past due dates are inside the window too, so an overdue pending task
    /// is also a priority task.
    pub fn is_priority(&self, reference: DateTime<Utc>) -> bool {
        self.is_priority_within(reference, DEFAULT_PRIORITY_WINDOW_DAYS)
    }

    pub fn is_priority_within(&self, reference: DateTime<Utc>, window_days: u32) -> bool {
        if !self.status.is_active() {
            return false;
        }
        let Some(due) = self.due_date else {
            return false;
        };
        match reference.checked_add_signed(Duration::days(i64::from(window_days))) {
            Some(limit) => due <= limit,
            None => true,
        }
    }

    /// Soft delete. The edit time never moves before `created_at`.
    pub fn mark_deleted(&self, edited_at: DateTime<Utc>) -> Self {
        Self {
            last_edited_at: Some(
                self.created_at
                    .map_or(edited_at, |created| edited_at.max(created)),
            ),
            deleted: true,
            ..self.clone()
        }
    }

    /// Produce a copy with `edits` applied and `last_edited_at` set to
    /// `edited_at`. The id and creation time are carried over untouched.
    pub fn apply_edits(
        &self,
        edits: TaskEdits,
        edited_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let stored = StoredTask {
            id: self.id.clone(),
            title: edits
                .title
                .map(|title| title.trim().to_string())
                .unwrap_or_else(|| self.title.clone()),
            description: edits
                .description
                .map(|description| description.trim().to_string())
                .unwrap_or_else(|| self.description.clone()),
            status: edits.status.unwrap_or(self.status),
            created_at: self.created_at,
            last_edited_at: Some(edited_at),
            due_date: edits.due_date.unwrap_or(self.due_date),
            difficulty: edits.difficulty.unwrap_or(self.difficulty),
            category: edits.category.unwrap_or(self.category),
            deleted: self.deleted,
        };
        Self::from_storage_form(stored)
    }
}
