//! Integration tests for the sqassistant CLI
//!
//! These drive the demo sections end to end through the binary.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create an sqassistant Command isolated from the caller's env
fn sqa(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("sqassistant");
    cmd.current_dir(dir.path())
        .env_remove("SQA_SESSION_FILE")
        .env_remove("SQA_AUTO_ROLLBACK")
        .env_remove("SQA_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

fn create_temp_project() -> TempDir {
    TempDir::new().unwrap()
}

fn session_path(dir: &TempDir) -> PathBuf {
    dir.path().join(".sqa").join("last.session")
}

fn read_session(dir: &TempDir) -> serde_json::Value {
    let content = fs::read_to_string(session_path(dir)).unwrap();
    serde_json::from_str(&content).unwrap()
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        let dir = create_temp_project();
        sqa(&dir).arg("--help").assert().success();
    }

    #[test]
    fn test_version() {
        let dir = create_temp_project();
        sqa(&dir).arg("--version").assert().success();
    }
}

// =============================================================================
// Run Tests
// =============================================================================

mod run {
    use super::*;

    #[test]
    fn test_run_starts_and_saves_session() {
        let dir = create_temp_project();

        sqa(&dir)
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("Starting network, connecting to localhost:8000"))
            .stdout(predicate::str::contains("Starting database, opening example.db"))
            .stdout(predicate::str::contains("Successfully started"))
            .stdout(predicate::str::contains("Session saved"));

        let record = read_session(&dir);
        assert_eq!(
            record["sections"],
            serde_json::json!([
                {"host": "localhost", "port": 8000},
                {"path": "newPath.db"},
                {"geometry": [123, 456, 640, 480]}
            ])
        );
    }

    #[test]
    fn test_second_run_resumes_saved_data() {
        let dir = create_temp_project();
        sqa(&dir).arg("run").assert().success();

        sqa(&dir)
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("opening newPath.db"));
    }

    #[test]
    fn test_failure_rolls_back_started_sections() {
        let dir = create_temp_project();

        sqa(&dir)
            .args(["run", "--fail", "window"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("Start failed"))
            .stdout(predicate::str::contains("Stopping network"))
            .stdout(predicate::str::contains("Closing database"))
            .stdout(predicate::str::contains("Rolled back"))
            .stdout(predicate::str::contains("Doing rollback now").not());

        let record = read_session(&dir);
        assert_eq!(record["sections"][1], serde_json::json!({"path": "newPath.db"}));
    }

    #[test]
    fn test_failure_without_auto_rollback_rolls_back_explicitly() {
        let dir = create_temp_project();

        sqa(&dir)
            .args(["run", "--fail", "database", "--no-rollback"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("Doing rollback now"))
            .stdout(predicate::str::contains("Closing database"))
            .stdout(predicate::str::contains("Starting main window").not());
    }

    #[test]
    fn test_env_disables_auto_rollback() {
        let dir = create_temp_project();

        sqa(&dir)
            .env("SQA_AUTO_ROLLBACK", "false")
            .args(["run", "--fail", "network"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("Doing rollback now"));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let dir = create_temp_project();

        sqa(&dir)
            .args(["run", "--fail", "printer"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown section 'printer'"));
    }

    #[test]
    fn test_no_session_writes_nothing() {
        let dir = create_temp_project();

        sqa(&dir)
            .args(["run", "--no-session"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Session persistence disabled"))
            .stdout(predicate::str::contains("Session saved").not());

        assert!(!dir.path().join(".sqa").exists());
    }

    #[test]
    fn test_custom_session_file() {
        let dir = create_temp_project();
        let custom = dir.path().join("custom.session");

        sqa(&dir)
            .arg("run")
            .arg("--session-file")
            .arg(&custom)
            .assert()
            .success();

        assert!(custom.exists());
        assert!(!session_path(&dir).exists());
    }

    #[test]
    fn test_relative_session_file_resolves_against_project_dir() {
        let cwd = create_temp_project();
        let project = create_temp_project();

        sqa(&cwd)
            .arg("--project-dir")
            .arg(project.path())
            .args(["run", "--session-file", "custom.session"])
            .assert()
            .success();

        assert!(project.path().join("custom.session").exists());
        assert!(!cwd.path().join("custom.session").exists());

        sqa(&cwd)
            .arg("--project-dir")
            .arg(project.path())
            .args(["session", "show", "--session-file", "custom.session"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"path":"newPath.db"}"#));
    }

    #[test]
    fn test_invalid_log_level_keeps_warnings() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".sqa")).unwrap();
        fs::write(
            session_path(&dir),
            r#"{"version": 1, "saved_at": "2026-01-01T00:00:00Z", "sections": [{"host": "#,
        )
        .unwrap();

        sqa(&dir)
            .env("SQA_LOG_LEVEL", "loud")
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("connecting to localhost:8000"))
            .stderr(predicate::str::contains("Invalid logging level"))
            .stderr(predicate::str::contains("Session file is truncated"));
    }

    #[test]
    fn test_stale_section_data_starts_with_defaults() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".sqa")).unwrap();
        fs::write(
            session_path(&dir),
            r#"{"version": 1, "saved_at": "2026-01-01T00:00:00Z", "sections": [{"host": "old"}, {"path": "example.db"}, {"geometry": [1, 2, 3, 4]}]}"#,
        )
        .unwrap();

        sqa(&dir)
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("connecting to localhost:8000"))
            .stderr(predicate::str::contains("does not match section data type"));

        let record = read_session(&dir);
        assert_eq!(
            record["sections"][0],
            serde_json::json!({"host": "localhost", "port": 8000})
        );
    }

    #[test]
    fn test_corrupt_session_is_fatal() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".sqa")).unwrap();
        fs::write(session_path(&dir), "definitely not json").unwrap();

        sqa(&dir)
            .arg("run")
            .assert()
            .failure()
            .stdout(predicate::str::contains("Starting network").not())
            .stderr(predicate::str::contains("corrupt"));
    }

    #[test]
    fn test_empty_session_is_cold_start() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".sqa")).unwrap();
        fs::write(session_path(&dir), "").unwrap();

        sqa(&dir)
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("opening example.db"));
    }
}

// =============================================================================
// Session Tests
// =============================================================================

mod session {
    use super::*;

    #[test]
    fn test_show_without_session() {
        let dir = create_temp_project();

        sqa(&dir)
            .args(["session", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No session saved"));
    }

    #[test]
    fn test_show_after_run() {
        let dir = create_temp_project();
        sqa(&dir).arg("run").assert().success();

        sqa(&dir)
            .arg("session")
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved at:"))
            .stdout(predicate::str::contains(r#"{"path":"newPath.db"}"#));
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = create_temp_project();
        sqa(&dir).arg("run").assert().success();

        sqa(&dir)
            .args(["session", "clear"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Session cleared"));
        assert!(!session_path(&dir).exists());

        sqa(&dir)
            .args(["session", "clear"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No session to clear"));
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

mod configuration {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let dir = create_temp_project();

        sqa(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Using default configuration"))
            .stdout(predicate::str::contains("auto_rollback = true"));
    }

    #[test]
    fn test_config_init_creates_toml() {
        let dir = create_temp_project();

        sqa(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created assistant.toml"));
        assert!(dir.path().join(".sqa/assistant.toml").exists());

        sqa(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
    }

    #[test]
    fn test_config_file_disables_rollback() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".sqa")).unwrap();
        fs::write(
            dir.path().join(".sqa/assistant.toml"),
            "[assistant]\nauto_rollback = false\n",
        )
        .unwrap();

        sqa(&dir)
            .args(["run", "--fail", "window"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("Doing rollback now"));
    }

    #[test]
    fn test_config_file_disables_session() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".sqa")).unwrap();
        fs::write(
            dir.path().join(".sqa/assistant.toml"),
            "[session]\nenabled = false\n",
        )
        .unwrap();

        sqa(&dir)
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("Session persistence disabled"));
        assert!(!session_path(&dir).exists());
    }

    #[test]
    fn test_config_warns_on_bad_log_level() {
        let dir = create_temp_project();

        sqa(&dir)
            .env("SQA_LOG_LEVEL", "loud")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Invalid logging level 'loud'"));
    }
}
