//! Collection statistics.
//!
//! `total` and `deleted` count every stored entry; the per-status and
//! per-difficulty breakdowns only count tasks that are not soft-deleted.

use serde::Serialize;

use crate::task::{Difficulty, Status, Task};

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DifficultyCount {
    pub difficulty: Difficulty,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub deleted: usize,
    pub statuses: Vec<StatusCount>,
    pub difficulties: Vec<DifficultyCount>,
}

impl TaskStats {
    pub fn compute(tasks: &[Task]) -> Self {
        let deleted = tasks.iter().filter(|task| task.is_deleted()).count();
        let visible: Vec<&Task> = tasks.iter().filter(|task| !task.is_deleted()).collect();

        let statuses = Status::OPTIONS
            .iter()
            .map(|choice| StatusCount {
                status: choice.value,
                count: visible
                    .iter()
                    .filter(|task| task.status() == choice.value)
                    .count(),
            })
            .collect();

        let difficulties = Difficulty::OPTIONS
            .iter()
            .map(|choice| DifficultyCount {
                difficulty: choice.value,
                count: visible
                    .iter()
                    .filter(|task| task.difficulty() == choice.value)
                    .count(),
            })
            .collect();

        Self {
            total: tasks.len(),
            active: visible.len(),
            deleted,
            statuses,
            difficulties,
        }
    }

    pub fn status_count(&self, status: Status) -> usize {
        self.statuses
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    pub fn difficulty_count(&self, difficulty: Difficulty) -> usize {
        self.difficulties
            .iter()
            .find(|entry| entry.difficulty == difficulty)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}
