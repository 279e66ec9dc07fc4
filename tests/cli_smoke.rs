use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn taskr_help_works() {
    Command::cargo_bin("taskr")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("personal task tracker"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "new", "list", "search", "show", "edit", "delete", "priority", "overdue", "related",
        "stats", "info",
    ];

    for cmd in subcommands {
        Command::cargo_bin("taskr")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn missing_subcommand_fails() {
    Command::cargo_bin("taskr")
        .expect("binary")
        .assert()
        .failure();
}
