//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn pal() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pal"));
    // Keep the developer's real keys and log settings out of the tests.
    cmd.env_remove("OPENAI_API_KEY").env_remove("ANTHROPIC_API_KEY").env_remove("RUST_LOG");
    cmd
}

/// A small project configured for the offline testing provider.
fn testing_project(extra_config: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::write(root.join("pal.toml"), format!("provider = \"testing\"\n{}", extra_config)).unwrap();
    fs::write(root.join("README.md"), "# Demo\n\nA tiny project.\n").unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
    tmp
}

fn count_rows(root: &Path, table: &str) -> i64 {
    let conn = Connection::open(root.join(".pal").join("db.sqlite")).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0)).unwrap()
}

#[test]
fn test_cli_version() {
    pal().arg("--version").assert().success().stdout(predicate::str::contains("pal"));
}

#[test]
fn test_cli_help() {
    pal()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("--project-path"))
        .stdout(predicate::str::contains("--continue"));
}

#[test]
fn test_init_creates_config() {
    let tmp = TempDir::new().unwrap();

    pal()
        .args(["init", "anthropic", "--project-path"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization successful"));

    let content = fs::read_to_string(tmp.path().join("pal.toml")).unwrap();
    assert!(content.contains("provider = \"anthropic\""));
    assert!(content.contains("max-file-size = \"20KB\""));
    assert!(content.contains("[openai]"));
    assert!(content.contains("[anthropic]"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pal.toml"), "provider = \"openai\"\n").unwrap();

    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = fs::read_to_string(tmp.path().join("pal.toml")).unwrap();
    assert_eq!(content, "provider = \"openai\"\n");
}

#[test]
fn test_init_rejects_unknown_provider() {
    let tmp = TempDir::new().unwrap();
    pal().arg("-p").arg(tmp.path()).args(["init", "gemini"]).assert().failure();
    assert!(!tmp.path().join("pal.toml").exists());
}

#[test]
fn test_init_suggests_ignoring_state_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".gitignore"), "target/\n").unwrap();

    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Consider adding .pal"));
}

#[test]
fn test_config_prints_resolved_values() {
    let tmp = testing_project("max-file-size = \"1MiB\"\n");

    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("provider = \"testing\""))
        .stdout(predicate::str::contains("max-file-size = \"1MiB\""))
        .stdout(predicate::str::contains("max-context-length = 100000"))
        .stdout(predicate::str::contains("system-message"));
}

#[test]
fn test_config_reports_all_problems() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pal.toml"), "provider = \"gemini\"\nmax-file-size = \"lots\"\n")
        .unwrap();

    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("The config is invalid."))
        .stderr(predicate::str::contains("\"gemini\" is not a supported value"))
        .stderr(predicate::str::contains("max-file-size"));
}

#[test]
fn test_missing_config_points_to_init() {
    let tmp = TempDir::new().unwrap();
    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pal init"));
}

#[test]
fn test_analyze_honors_ignore_rules() {
    let tmp = testing_project("");
    let root = tmp.path();
    fs::write(root.join(".gitignore"), "*.log\n").unwrap();
    fs::write(root.join("debug.log"), "noise\n").unwrap();

    pal()
        .arg("-p")
        .arg(root)
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("Number of documents"))
        .stdout(predicate::str::contains("README.md"))
        .stdout(predicate::str::contains("src/main.rs"))
        .stdout(predicate::str::contains(".gitignore"))
        .stdout(predicate::str::contains("debug.log").not())
        .stdout(predicate::str::contains("pal.toml").not());
}

#[test]
fn test_ask_with_testing_provider() {
    let tmp = testing_project("");

    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("What does this project do?")
        .assert()
        .success()
        .stdout("Hello, world!\n");

    assert_eq!(count_rows(tmp.path(), "conversations"), 1);
    assert_eq!(count_rows(tmp.path(), "messages"), 2);
}

#[test]
fn test_ask_reads_stdin() {
    let tmp = testing_project("");

    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("Explain this diff")
        .write_stdin("+ fn added() {}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello, world!"));

    let conn = Connection::open(tmp.path().join(".pal/db.sqlite")).unwrap();
    let content: String = conn
        .query_row("SELECT content FROM messages WHERE role = 'user'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(content, "+ fn added() {}\n\n\nExplain this diff");
}

#[test]
fn test_continue_appends_to_recent_conversation() {
    let tmp = testing_project("");

    pal().arg("-p").arg(tmp.path()).arg("first").assert().success();
    pal().arg("-p").arg(tmp.path()).args(["-c", "second"]).assert().success();

    assert_eq!(count_rows(tmp.path(), "conversations"), 1);
    assert_eq!(count_rows(tmp.path(), "messages"), 4);

    pal().arg("-p").arg(tmp.path()).arg("third").assert().success();
    assert_eq!(count_rows(tmp.path(), "conversations"), 2);
}

#[test]
fn test_continue_without_history_starts_fresh() {
    let tmp = testing_project("");
    pal().arg("-p").arg(tmp.path()).args(["--continue", "hello"]).assert().success();
    assert_eq!(count_rows(tmp.path(), "conversations"), 1);
}

#[test]
fn test_old_conversations_are_pruned() {
    let tmp = testing_project("max-conversation-history = 2\n");

    for message in ["one", "two", "three"] {
        pal().arg("-p").arg(tmp.path()).arg(message).assert().success();
    }

    assert_eq!(count_rows(tmp.path(), "conversations"), 2);
    assert_eq!(count_rows(tmp.path(), "messages"), 4);
}

#[test]
fn test_pruning_can_be_disabled() {
    let tmp = testing_project("max-conversation-history = -1\n");

    for message in ["one", "two", "three"] {
        pal().arg("-p").arg(tmp.path()).arg(message).assert().success();
    }
    assert_eq!(count_rows(tmp.path(), "conversations"), 3);
}

#[test]
fn test_empty_message_is_rejected() {
    let tmp = testing_project("");

    pal()
        .arg("-p")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("The message cannot be empty."));

    assert!(!tmp.path().join(".pal").exists());
}

#[test]
fn test_context_too_long_is_rejected() {
    let tmp = testing_project("max-context-length = 10\n");

    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the maximum permitted context"));

    assert!(!tmp.path().join(".pal").exists());
}

#[test]
fn test_missing_api_key_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pal.toml"), "provider = \"openai\"\n").unwrap();

    pal()
        .arg("-p")
        .arg(tmp.path())
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_missing_api_key_fails_before_scanning() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pal.toml"), "provider = \"anthropic\"\n").unwrap();
    fs::write(tmp.path().join("README.md"), "# Demo\n").unwrap();

    pal()
        .arg("-v")
        .arg("-p")
        .arg(tmp.path())
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"))
        .stderr(predicate::str::contains("Collected").not());
}

#[test]
fn test_continue_starts_fresh_when_last_conversation_is_unreadable() {
    let tmp = testing_project("");
    pal().arg("-p").arg(tmp.path()).arg("first").assert().success();

    // Text columns holding blobs cannot be loaded back as messages.
    let conn = Connection::open(tmp.path().join(".pal/db.sqlite")).unwrap();
    conn.execute("UPDATE messages SET content = X'00FF'", []).unwrap();
    drop(conn);

    pal()
        .arg("-p")
        .arg(tmp.path())
        .args(["--continue", "second"])
        .assert()
        .success()
        .stdout("Hello, world!\n");

    assert_eq!(count_rows(tmp.path(), "conversations"), 2);
}
