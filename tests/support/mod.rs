#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub fn taskr_cmd() -> Command {
    let mut cmd = Command::cargo_bin("taskr").expect("binary");
    cmd.env_remove("TASKR_FILE").env_remove("RUST_LOG");
    cmd
}

/// Scratch working directory for one test.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.dir.path().join("metadata.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read_json(&self, rel_path: &str) -> Value {
        let content = fs::read_to_string(self.dir.path().join(rel_path)).expect("read file");
        serde_json::from_str(&content).expect("parse json")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = taskr_cmd();
        cmd.current_dir(self.path());
        cmd
    }

    /// Run a successful command with `--json` and return its `data` payload.
    pub fn run_json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("json output");
        assert_eq!(value["status"], "success");
        value["data"].clone()
    }

    pub fn new_task(&self, args: &[&str]) -> String {
        let mut full = vec!["new"];
        full.extend_from_slice(args);
        let data = self.run_json(&full);
        data["id"].as_str().expect("task id").to_string()
    }
}
