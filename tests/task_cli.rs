mod support;

use chrono::{Duration, Local};
use predicates::str::contains;
use serde_json::Value;

use support::TestDir;

fn titles(data: &Value) -> Vec<String> {
    data["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|task| task["title"].as_str().expect("title").to_string())
        .collect()
}

fn local_date(days_from_today: i64) -> String {
    (Local::now() + Duration::days(days_from_today))
        .format("%Y-%m-%d")
        .to_string()
}

#[test]
fn new_task_is_stored_with_defaults() {
    let dir = TestDir::new();
    let data = dir.run_json(&["new", "  Buy milk  "]);

    assert_eq!(data["title"], "Buy milk");
    assert_eq!(data["description"], "");
    assert_eq!(data["status"], "pending");
    assert_eq!(data["difficulty"], "easy");
    assert_eq!(data["category"], "other");
    assert_eq!(data["deleted"], false);
    assert!(data["dueDate"].is_null());
    assert!(data["createdAt"].is_string());

    let stored = dir.read_json("tasks.json");
    assert_eq!(stored["tasks"].as_array().expect("tasks").len(), 1);
    assert_eq!(stored["tasks"][0]["id"], data["id"]);

    let metadata = dir.read_json("metadata.json");
    assert_eq!(metadata["activeCount"], 1);
    assert_eq!(metadata["total"], 1);
    assert_eq!(metadata["lastUpdated"], stored["lastUpdated"]);
}

#[test]
fn new_task_accepts_codes_and_labels() {
    let dir = TestDir::new();
    let data = dir.run_json(&[
        "new",
        "Learn lifetimes",
        "--description",
        "chapter 10",
        "--status",
        "2",
        "--difficulty",
        "hard",
        "--category",
        "Study",
        "--due",
        "2030/01/15",
    ]);

    assert_eq!(data["status"], "in-progress");
    assert_eq!(data["difficulty"], "hard");
    assert_eq!(data["category"], "study");
    assert_eq!(data["description"], "chapter 10");
    assert!(data["dueDate"].as_str().expect("due date").starts_with("2030-01-1"));
}

#[test]
fn invalid_input_is_a_user_error() {
    let dir = TestDir::new();

    dir.cmd()
        .args(["new", "   "])
        .assert()
        .code(2)
        .stderr(contains("title cannot be empty"));

    let long_title = "a".repeat(101);
    dir.cmd()
        .args(["new", &long_title])
        .assert()
        .code(2)
        .stderr(contains("cannot exceed 100 characters"));

    dir.cmd()
        .args(["new", "ok", "--status", "0"])
        .assert()
        .code(2)
        .stderr(contains("between 1 and 4"));

    dir.cmd()
        .args(["new", "ok", "--due", "2026/02/30"])
        .assert()
        .code(2)
        .stderr(contains("invalid date"));

    let output = dir
        .cmd()
        .args(["new", "ok", "--category", "gardening", "--json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("error json");
    assert_eq!(value["status"], "error");
    assert_eq!(value["command"], "new");
    assert_eq!(value["error"]["kind"], "user_error");
    assert_eq!(value["error"]["code"], 2);

    assert!(!dir.tasks_file().exists());
}

#[test]
fn list_sorts_by_title_and_filters_by_view() {
    let dir = TestDir::new();
    dir.new_task(&["cherry", "--status", "completed"]);
    dir.new_task(&["Apple"]);
    dir.new_task(&["banana", "--status", "in-progress"]);

    let all = dir.run_json(&["list"]);
    assert_eq!(all["total"], 3);
    assert_eq!(titles(&all), ["Apple", "banana", "cherry"]);

    assert_eq!(titles(&dir.run_json(&["list", "--view", "2"])), ["Apple"]);
    assert_eq!(titles(&dir.run_json(&["list", "--view", "3"])), ["banana"]);
    assert_eq!(titles(&dir.run_json(&["list", "--view", "4"])), ["cherry"]);

    dir.cmd().args(["list", "--view", "9"]).assert().failure();
}

#[test]
fn search_matches_titles_case_insensitively() {
    let dir = TestDir::new();
    dir.new_task(&["Write REPORT"]);
    dir.new_task(&["Read book"]);

    let data = dir.run_json(&["search", "report"]);
    assert_eq!(titles(&data), ["Write REPORT"]);
    assert_eq!(dir.run_json(&["search", "zzz"])["total"], 0);
}

#[test]
fn edit_updates_fields_and_revalidates() {
    let dir = TestDir::new();
    let id = dir.new_task(&["Draft", "--due", "2031-03-01"]);

    let data = dir.run_json(&["edit", &id, "--title", "Final", "--status", "completed"]);
    assert_eq!(data["id"], id.as_str());
    assert_eq!(data["title"], "Final");
    assert_eq!(data["status"], "completed");
    assert!(data["dueDate"].is_string());
    assert!(data["lastEditedAt"].is_string());

    let cleared = dir.run_json(&["edit", &id, "--clear-due"]);
    assert!(cleared["dueDate"].is_null());

    dir.cmd()
        .args(["edit", &id, "--title", ""])
        .assert()
        .code(2)
        .stderr(contains("title cannot be empty"));

    dir.cmd()
        .args(["edit", &id])
        .assert()
        .code(2)
        .stderr(contains("no changes given"));

    let shown = dir.run_json(&["show", &id]);
    assert_eq!(shown["title"], "Final");
}

#[test]
fn delete_is_soft() {
    let dir = TestDir::new();
    let id = dir.new_task(&["Throwaway"]);
    dir.new_task(&["Keeper"]);

    let deleted = dir.run_json(&["delete", &id]);
    assert_eq!(deleted["deleted"], true);

    assert_eq!(titles(&dir.run_json(&["list"])), ["Keeper"]);

    let shown = dir.run_json(&["show", &id]);
    assert_eq!(shown["deleted"], true);

    let stored = dir.read_json("tasks.json");
    assert_eq!(stored["tasks"].as_array().expect("tasks").len(), 2);

    let metadata = dir.read_json("metadata.json");
    assert_eq!(metadata["activeCount"], 1);
    assert_eq!(metadata["deletedCount"], 1);
    assert_eq!(metadata["total"], 2);

    // Deleting again keeps the task deleted.
    dir.run_json(&["delete", &id]);
    assert_eq!(dir.read_json("metadata.json")["deletedCount"], 1);

    dir.cmd()
        .args(["edit", &id, "--title", "back"])
        .assert()
        .code(2)
        .stderr(contains("deleted"));
}

#[test]
fn unknown_ids_are_reported() {
    let dir = TestDir::new();
    dir.new_task(&["Only"]);

    for command in ["show", "delete", "related"] {
        dir.cmd()
            .args([command, "no-such-id"])
            .assert()
            .code(2)
            .stderr(contains("Task not found: no-such-id"))
            .stderr(contains("hint: taskr list"));
    }

    dir.cmd()
        .args(["edit", "no-such-id", "--title", "x"])
        .assert()
        .code(2);
}

#[test]
fn priority_and_overdue_views() {
    let dir = TestDir::new();
    let tomorrow = local_date(1);
    let far = local_date(30);

    dir.new_task(&["late pending", "--due", "2020-01-01"]);
    dir.new_task(&["late cancelled", "--due", "2020-01-01", "--status", "cancelled"]);
    dir.new_task(&["late done", "--due", "2020-01-01", "--status", "completed"]);
    dir.new_task(&["soon", "--due", &tomorrow, "--status", "in-progress"]);
    dir.new_task(&["later", "--due", &far]);
    dir.new_task(&["undated"]);

    let priority = dir.run_json(&["priority"]);
    assert_eq!(priority["window_days"], 3);
    assert_eq!(titles(&priority), ["late pending", "soon"]);

    let narrow = dir.run_json(&["priority", "--days", "0"]);
    assert_eq!(titles(&narrow), ["late pending"]);

    let wide = dir.run_json(&["priority", "--days", "60"]);
    assert_eq!(titles(&wide), ["late pending", "soon", "later"]);

    let mut overdue = titles(&dir.run_json(&["overdue"]));
    overdue.sort();
    assert_eq!(overdue, ["late cancelled", "late pending"]);
}

#[test]
fn related_lists_same_category_only() {
    let dir = TestDir::new();
    let base = dir.new_task(&["Fix bug", "--category", "work"]);
    dir.new_task(&["Write docs", "--category", "3"]);
    dir.new_task(&["Gaming", "--category", "leisure"]);
    let gone = dir.new_task(&["Old meeting", "--category", "work"]);
    dir.run_json(&["delete", &gone]);

    let data = dir.run_json(&["related", &base]);
    assert_eq!(data["base"]["id"], base.as_str());
    assert_eq!(titles(&data), ["Write docs"]);
}

#[test]
fn stats_count_live_tasks_per_bucket() {
    let dir = TestDir::new();
    dir.new_task(&["a", "--difficulty", "hard"]);
    dir.new_task(&["b", "--status", "completed", "--difficulty", "medium"]);
    let gone = dir.new_task(&["c", "--difficulty", "hard"]);
    dir.run_json(&["delete", &gone]);

    let stats = dir.run_json(&["stats"]);
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["active"], 2);
    assert_eq!(stats["deleted"], 1);

    let count = |field: &str, key: &str, label: &str| -> u64 {
        stats[field]
            .as_array()
            .expect("counts")
            .iter()
            .find(|entry| entry[key] == label)
            .and_then(|entry| entry["count"].as_u64())
            .unwrap_or(0)
    };
    assert_eq!(count("statuses", "status", "pending"), 1);
    assert_eq!(count("statuses", "status", "completed"), 1);
    assert_eq!(count("difficulties", "difficulty", "hard"), 1);
    assert_eq!(count("difficulties", "difficulty", "medium"), 1);
}

#[test]
fn info_initializes_storage_and_reports_counts() {
    let dir = TestDir::new();
    let data = dir.run_json(&["info"]);
    assert_eq!(data["total"], 0);
    assert!(dir.tasks_file().exists());
    assert!(dir.metadata_file().exists());

    dir.new_task(&["one"]);
    dir.cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(contains("Task storage"))
        .stdout(contains("- Active tasks: 1"))
        .stdout(contains("- Total: 1"));
}

#[test]
fn quiet_suppresses_human_output() {
    let dir = TestDir::new();
    dir.cmd()
        .args(["new", "silent", "--quiet"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn stats_human_output_lists_every_bucket() {
    let dir = TestDir::new();
    dir.new_task(&["a", "--status", "in-progress", "--difficulty", "hard"]);

    dir.cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(contains("status in-progress: 1"))
        .stdout(contains("status cancelled: 0"))
        .stdout(contains("difficulty hard: 1"))
        .stdout(contains("difficulty medium: 0"));
}
