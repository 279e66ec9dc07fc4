//! taskr command implementations.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{Config, CONFIG_FILE};
use crate::dates::parse_due_date;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query;
use crate::stats::TaskStats;
use crate::storage::Repository;
use crate::task::{Category, Difficulty, NewTask, Status, StoredTask, Task, TaskEdits};
use crate::validation::{parse_choice, OptionTable};

pub struct NewOptions {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub due: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub view: i64,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct SearchOptions {
    pub term: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct DeleteOptions {
    pub id: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct PriorityOptions {
    pub days: Option<u32>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct OverdueOptions {
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RelatedOptions {
    pub id: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct StatsOptions {
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct InfoOptions {
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<StoredTask>,
}

#[derive(Serialize)]
struct TaskDetailsOutput {
    #[serde(flatten)]
    task: StoredTask,
    overdue: bool,
    priority: bool,
}

#[derive(Serialize)]
struct PriorityOutput {
    window_days: u32,
    total: usize,
    tasks: Vec<StoredTask>,
}

#[derive(Serialize)]
struct RelatedOutput {
    base: StoredTask,
    total: usize,
    tasks: Vec<StoredTask>,
}

#[derive(Serialize)]
struct InfoOutput {
    path: String,
    metadata_path: String,
    active_count: usize,
    deleted_count: usize,
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
}

struct TaskContext {
    repo: Repository,
    config: Config,
    warnings: Vec<String>,
}

impl TaskContext {
    /// Collection for read-only views. An unreadable file is shown as an
    /// empty collection plus a warning.
    fn tasks_for_view(&mut self) -> Vec<Task> {
        match self.repo.try_load() {
            Ok(tasks) => tasks,
            Err(err) => {
                self.warnings.push(format!(
                    "could not read {}: {err}; showing no tasks",
                    self.repo.path().display()
                ));
                Vec::new()
            }
        }
    }

    /// Collection for commands that need the stored tasks to be readable.
    fn require_tasks(&self) -> Result<Vec<Task>> {
        self.repo.try_load().map_err(|err| Error::StorageUnreadable {
            path: self.repo.path().display().to_string(),
            reason: err.to_string(),
        })
    }

    fn find_task(&self, id: &str) -> Result<Task> {
        self.require_tasks()?
            .into_iter()
            .find(|task| task.id() == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    fn human(&self, header: impl Into<String>) -> HumanOutput {
        let mut human = HumanOutput::new(header);
        for warning in &self.warnings {
            human.push_warning(warning.clone());
        }
        human
    }
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let ctx = load_context(options.file)?;
    let draft = NewTask {
        title: options.title,
        description: options.description.unwrap_or_default(),
        status: parse_option(options.status.as_deref(), &Status::OPTIONS)?.unwrap_or_default(),
        difficulty: parse_option(options.difficulty.as_deref(), &Difficulty::OPTIONS)?
            .unwrap_or_default(),
        category: parse_option(options.category.as_deref(), &Category::OPTIONS)?
            .unwrap_or_default(),
        due_date: match options.due.as_deref() {
            Some(input) => parse_due_date(input)?,
            None => None,
        },
    };
    let task = Task::create(draft, Utc::now())?;

    ctx.require_tasks()?;
    let tasks = ctx.repo.add(task.clone());
    if !tasks.iter().any(|stored| stored.id() == task.id()) {
        return Err(save_failed(&ctx.repo));
    }

    let mut human = ctx.human("Task created");
    human.push_summary("ID", task.id());
    push_task_summary(&mut human, &task);
    human.push_next_step(format!("taskr show {}", task.id()));

    emit_success(
        output_options(options.json, options.quiet),
        "new",
        &task.to_storage_form(),
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let mut ctx = load_context(options.file)?;
    let visible = query::visible(&ctx.tasks_for_view());
    let mut tasks = query::filter_by_menu_option(&visible, options.view);
    query::sort_by_title(&mut tasks);

    let view = query::LIST_VIEWS
        .iter()
        .find(|(code, _, _)| i64::from(*code) == options.view)
        .map(|(_, name, _)| *name)
        .unwrap_or("all");

    let mut human = ctx.human("Tasks");
    human.push_summary("View", view);
    emit_task_list(options.json, options.quiet, "list", &tasks, human)
}

pub fn run_search(options: SearchOptions) -> Result<()> {
    let mut ctx = load_context(options.file)?;
    let visible = query::visible(&ctx.tasks_for_view());
    let mut tasks = query::filter_by_title_substring(&visible, &options.term);
    query::sort_by_title(&mut tasks);

    let mut human = ctx.human(format!("Tasks matching '{}'", options.term));
    if tasks.is_empty() {
        human.push_next_step("taskr list");
    }
    emit_task_list(options.json, options.quiet, "search", &tasks, human)
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(options.file)?;
    let task = ctx.find_task(&options.id)?;
    let now = Utc::now();

    let output = TaskDetailsOutput {
        task: task.to_storage_form(),
        overdue: task.is_overdue(now),
        priority: task.is_priority_within(now, ctx.config.tasks.priority_window_days),
    };

    let mut human = ctx.human(format!("Task {}", task.id()));
    push_task_summary(&mut human, &task);
    if let Some(created) = task.created_at() {
        human.push_summary("Created", created.to_rfc3339());
    }
    if let Some(edited) = task.last_edited_at() {
        human.push_summary("Last edited", edited.to_rfc3339());
    }
    if !task.description().is_empty() {
        human.push_detail(task.description());
    }
    if task.is_deleted() {
        human.push_warning("task is deleted");
    } else if output.overdue {
        human.push_warning("task is overdue");
    }

    emit_success(
        output_options(options.json, options.quiet),
        "show",
        &output,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let ctx = load_context(options.file)?;
    let task = ctx.find_task(&options.id)?;
    if task.is_deleted() {
        return Err(Error::InvalidArgument(format!(
            "task {} is deleted and cannot be edited",
            task.id()
        )));
    }

    let due_date = if options.clear_due {
        Some(None)
    } else {
        match options.due.as_deref() {
            Some(input) => Some(parse_due_date(input)?),
            None => None,
        }
    };
    let edits = TaskEdits {
        title: options.title,
        description: options.description,
        status: parse_option(options.status.as_deref(), &Status::OPTIONS)?,
        difficulty: parse_option(options.difficulty.as_deref(), &Difficulty::OPTIONS)?,
        category: parse_option(options.category.as_deref(), &Category::OPTIONS)?,
        due_date,
    };
    if edits.is_empty() {
        return Err(Error::InvalidArgument(
            "no changes given; pass at least one field to edit".to_string(),
        ));
    }

    let edited = task.apply_edits(edits, Utc::now())?;
    let tasks = ctx.repo.update(edited.clone());
    if !tasks.contains(&edited) {
        return Err(save_failed(&ctx.repo));
    }

    let mut human = ctx.human("Task updated");
    human.push_summary("ID", edited.id());
    push_task_summary(&mut human, &edited);

    emit_success(
        output_options(options.json, options.quiet),
        "edit",
        &edited.to_storage_form(),
        Some(&human),
    )
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let ctx = load_context(options.file)?;
    let task = ctx.find_task(&options.id)?;

    let tasks = ctx.repo.remove(task.id());
    let deleted = tasks
        .into_iter()
        .find(|stored| stored.id() == task.id() && stored.is_deleted())
        .ok_or_else(|| save_failed(&ctx.repo))?;

    let mut human = ctx.human("Task deleted");
    human.push_summary("ID", deleted.id());
    human.push_summary("Title", deleted.title());

    emit_success(
        output_options(options.json, options.quiet),
        "delete",
        &deleted.to_storage_form(),
        Some(&human),
    )
}

pub fn run_priority(options: PriorityOptions) -> Result<()> {
    let mut ctx = load_context(options.file)?;
    let window_days = options
        .days
        .unwrap_or(ctx.config.tasks.priority_window_days);
    let visible = query::visible(&ctx.tasks_for_view());
    let mut tasks = query::filter_priority(&visible, Utc::now(), window_days);
    sort_by_due_date(&mut tasks);

    let output = PriorityOutput {
        window_days,
        total: tasks.len(),
        tasks: tasks.iter().map(Task::to_storage_form).collect(),
    };

    let mut human = ctx.human("Priority tasks");
    human.push_summary("Window", format!("{window_days} days"));
    human.push_summary("Total", tasks.len().to_string());
    for task in &tasks {
        human.push_detail(task_line(task));
    }

    emit_success(
        output_options(options.json, options.quiet),
        "priority",
        &output,
        Some(&human),
    )
}

pub fn run_overdue(options: OverdueOptions) -> Result<()> {
    let mut ctx = load_context(options.file)?;
    let visible = query::visible(&ctx.tasks_for_view());
    let mut tasks = query::filter_overdue(&visible, Utc::now());
    sort_by_due_date(&mut tasks);

    let human = ctx.human("Overdue tasks");
    emit_task_list(options.json, options.quiet, "overdue", &tasks, human)
}

pub fn run_related(options: RelatedOptions) -> Result<()> {
    let ctx = load_context(options.file)?;
    let stored = ctx.require_tasks()?;
    let base = stored
        .iter()
        .find(|task| task.id() == options.id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(options.id.clone()))?;

    let visible = query::visible(&stored);
    let mut tasks = query::filter_related_by_category(&base, &visible);
    query::sort_by_title(&mut tasks);

    let output = RelatedOutput {
        base: base.to_storage_form(),
        total: tasks.len(),
        tasks: tasks.iter().map(Task::to_storage_form).collect(),
    };

    let mut human = ctx.human(format!("Tasks related to '{}'", base.title()));
    human.push_summary("Category", base.category().label());
    human.push_summary("Total", tasks.len().to_string());
    for task in &tasks {
        human.push_detail(task_line(task));
    }

    emit_success(
        output_options(options.json, options.quiet),
        "related",
        &output,
        Some(&human),
    )
}

pub fn run_stats(options: StatsOptions) -> Result<()> {
    let mut ctx = load_context(options.file)?;
    let stats = TaskStats::compute(&ctx.tasks_for_view());

    let mut human = ctx.human("Task statistics");
    human.push_summary("Total", stats.total.to_string());
    human.push_summary("Active", stats.active.to_string());
    human.push_summary("Deleted", stats.deleted.to_string());
    for choice in Status::OPTIONS.iter() {
        human.push_detail(format!(
            "status {}: {}",
            choice.label,
            stats.status_count(choice.value)
        ));
    }
    for choice in Difficulty::OPTIONS.iter() {
        human.push_detail(format!(
            "difficulty {}: {}",
            choice.label,
            stats.difficulty_count(choice.value)
        ));
    }

    emit_success(
        output_options(options.json, options.quiet),
        "stats",
        &stats,
        Some(&human),
    )
}

pub fn run_info(options: InfoOptions) -> Result<()> {
    let ctx = load_context(options.file)?;
    let tasks = ctx.require_tasks()?;
    let deleted_count = tasks.iter().filter(|task| task.is_deleted()).count();

    let output = InfoOutput {
        path: ctx.repo.path().display().to_string(),
        metadata_path: ctx.repo.metadata_path().display().to_string(),
        active_count: tasks.len() - deleted_count,
        deleted_count,
        total: tasks.len(),
        last_updated: ctx.repo.metadata().ok().map(|meta| meta.last_updated),
    };

    let mut human = ctx.human(ctx.repo.info());
    human.push_summary("Metadata", output.metadata_path.clone());

    emit_success(
        output_options(options.json, options.quiet),
        "info",
        &output,
        Some(&human),
    )
}

fn load_context(file: Option<PathBuf>) -> Result<TaskContext> {
    let cwd = std::env::current_dir()?;
    let mut warnings = Vec::new();
    let config = Config::load_from_dir(&cwd).unwrap_or_else(|err| {
        warnings.push(format!("ignoring {CONFIG_FILE}: {err}"));
        Config::default()
    });
    let repo = match file {
        Some(path) => Repository::new(path),
        None => {
            let repo = Repository::new(config.storage_path(&cwd));
            match config.metadata_path(&cwd) {
                Some(metadata_path) => repo.with_metadata_path(metadata_path),
                None => repo,
            }
        }
    };
    Ok(TaskContext {
        repo,
        config,
        warnings,
    })
}

fn parse_option<T: Copy + PartialEq + 'static>(
    input: Option<&str>,
    table: &OptionTable<T>,
) -> Result<Option<T>> {
    Ok(input.map(|value| parse_choice(value, table)).transpose()?)
}

fn save_failed(repo: &Repository) -> Error {
    Error::OperationFailed(format!(
        "could not write {} (run with RUST_LOG=taskr=error for details)",
        repo.path().display()
    ))
}

fn output_options(json: bool, quiet: bool) -> OutputOptions {
    OutputOptions { json, quiet }
}

fn emit_task_list(
    json: bool,
    quiet: bool,
    command: &str,
    tasks: &[Task],
    mut human: HumanOutput,
) -> Result<()> {
    let output = TaskListOutput {
        total: tasks.len(),
        tasks: tasks.iter().map(Task::to_storage_form).collect(),
    };

    human.push_summary("Total", tasks.len().to_string());
    for task in tasks {
        human.push_detail(task_line(task));
    }

    emit_success(output_options(json, quiet), command, &output, Some(&human))
}

// Undated tasks sort last.
fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| (task.due_date().is_none(), task.due_date()));
}

fn task_line(task: &Task) -> String {
    let mut line = format!(
        "[{}][{}][{}] {} {}",
        task.status(),
        task.difficulty(),
        task.category(),
        task.id(),
        task.title()
    );
    if let Some(due) = task.due_date() {
        line.push_str(&format!(" (due: {})", due.format("%Y-%m-%d")));
    }
    line
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("Title", task.title());
    human.push_summary("Status", task.status().label());
    human.push_summary("Difficulty", task.difficulty().label());
    human.push_summary("Category", task.category().label());
    if let Some(due) = task.due_date() {
        human.push_summary("Due", due.to_rfc3339());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;
    use chrono::Duration;

    #[test]
    fn parse_option_accepts_codes_and_labels() {
        assert_eq!(
            parse_option(Some("3"), &Status::OPTIONS).unwrap(),
            Some(Status::Completed)
        );
        assert_eq!(
            parse_option(Some("hard"), &Difficulty::OPTIONS).unwrap(),
            Some(Difficulty::Hard)
        );
        assert_eq!(parse_option(None, &Category::OPTIONS).unwrap(), None);
        assert!(matches!(
            parse_option(Some("9"), &Status::OPTIONS),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn due_date_order_puts_undated_last() {
        let now = Utc::now();
        let dated = |title: &str, days: i64| {
            let draft = NewTask {
                due_date: Some(now + Duration::days(days)),
                ..NewTask::titled(title)
            };
            Task::create(draft, now).unwrap()
        };
        let mut tasks = vec![
            Task::create(NewTask::titled("none"), now).unwrap(),
            dated("later", 5),
            dated("sooner", 1),
        ];
        sort_by_due_date(&mut tasks);
        let titles: Vec<&str> = tasks.iter().map(Task::title).collect();
        assert_eq!(titles, ["sooner", "later", "none"]);
    }

    #[test]
    fn task_line_includes_labels() {
        let task = Task::create(NewTask::titled("Write report"), Utc::now()).unwrap();
        let line = task_line(&task);
        assert!(line.starts_with("[pending][easy][other] "));
        assert!(line.ends_with(" Write report"));
    }
}
