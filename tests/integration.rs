//! End-to-end tests for the resttest CLI
//!
//! These tests verify the complete workflow by:
//! 1. Writing a fake runner script that replays a recorded pyresttest transcript
//! 2. Running the resttest binary against it from a scratch directory
//! 3. Checking console output, exit codes and the log files left behind

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use async_trait::async_trait;
use resttest::cli::App;
use resttest::common::config::Config;
use resttest::common::paths::LogLayout;
use resttest::report::{self, ReportFilter};
use resttest::runner::{Orchestrator, TranscriptSource};

/// Test context with a scratch directory and the binary under test
struct TestContext {
    /// Temporary directory, also the working directory of the binary
    temp_dir: tempfile::TempDir,
    /// Path to the resttest binary
    bin: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().expect("Failed to create temp dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_resttest")),
        }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Install a runner that prints the recorded transcript, plus a config
    /// file mapping `tests` keys to it
    #[cfg(unix)]
    fn install_fake_runner(&self, tests: &[&str]) {
        use std::os::unix::fs::PermissionsExt;

        let script = self.path().join("fake-pyresttest");
        fs::write(
            &script,
            format!("#!/bin/sh\ncat '{}'\n", fixture_path().display()),
        )
        .expect("Failed to write fake runner");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake runner executable");

        let mut config = format!("[runner]\nprogram = '{}'\n", script.display());
        for key in tests {
            config.push_str(&format!("\n[tests.{key}]\nfile = 'suite{key}.yaml'\n"));
        }
        fs::write(self.path().join("resttest.toml"), config).expect("Failed to write config");
    }

    /// Run the binary with stdin closed
    fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.bin)
            .args(args)
            .current_dir(self.path())
            .env("NO_COLOR", "1")
            .stdin(Stdio::null())
            .output()
            .expect("Failed to run resttest")
    }

    /// Every file under `logs/`
    fn log_files(&self) -> Vec<PathBuf> {
        let logs = self.path().join("logs");
        let mut files = Vec::new();
        let Ok(days) = fs::read_dir(&logs) else {
            return files;
        };
        for day in days {
            for file in fs::read_dir(day.unwrap().path()).unwrap() {
                files.push(file.unwrap().path());
            }
        }
        files
    }
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("quickstart_transcript.txt")
}

fn fixture() -> String {
    fs::read_to_string(fixture_path()).expect("Failed to read fixture")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ============== Flag validation ==============

#[test]
fn test_option_without_target_exits_with_error() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--write"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[--test-api] must not be empty"));
}

#[test]
fn test_all_and_test_api_conflict() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--all", "--test-api", "1"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_silent_errors_without_write_is_rejected() {
    let ctx = TestContext::new();
    let output = ctx.run(&["-t", "1", "-s", "-e"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(ctx.log_files().is_empty());
}

#[test]
fn test_no_flags_opens_menu_and_quits_on_eof() {
    let ctx = TestContext::new();
    let output = ctx.run(&[]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Menu:"));
    assert!(out.contains("0- Quit"));
}

// ============== Full runs against a fake runner ==============

#[cfg(unix)]
#[test]
fn test_single_run_writes_error_log() {
    let ctx = TestContext::new();
    ctx.install_fake_runner(&["1"]);

    let output = ctx.run(&["-t", "1", "-e", "-w"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Starting test 'suite1.yaml...'"));
    assert!(out.contains("Results written to: logs/logs_"));
    assert!(out.contains("Quickstart app tests FAILED"));
    // The menu is not shown without --menu.
    assert!(!out.contains("Menu:"));

    let logs = ctx.log_files();
    assert_eq!(logs.len(), 1);
    let text = fs::read_to_string(&logs[0]).unwrap();
    assert!(text.contains("GET /api/person/42/"));
    assert!(!text.contains("GET /api/person/ HTTP"));
    assert!(text.contains("Invalid HTTP response code"));
}

#[cfg(unix)]
#[test]
fn test_unknown_test_key_is_reported() {
    let ctx = TestContext::new();
    ctx.install_fake_runner(&["1"]);

    let output = ctx.run(&["-t", "4"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Unknown option, please try again"));
}

#[cfg(unix)]
#[test]
fn test_all_with_write_leaves_one_log() {
    let ctx = TestContext::new();
    ctx.install_fake_runner(&["1", "3"]);

    let output = ctx.run(&["--all", "--write", "--silent"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert_eq!(out.matches("Starting test").count(), 2);
    assert_eq!(out.matches("Unknown option").count(), 3);
    assert!(out.contains("All log files concatenated under:"));

    let logs = ctx.log_files();
    assert_eq!(logs.len(), 1);
    let text = fs::read_to_string(&logs[0]).unwrap();
    assert_eq!(text.matches("GET /api/person/42/ HTTP").count(), 2);
}

#[test]
fn test_missing_runner_is_not_fatal() {
    let ctx = TestContext::new();
    fs::write(
        ctx.path().join("resttest.toml"),
        "[runner]\nprogram = 'resttest-missing-runner'\n",
    )
    .unwrap();

    let output = ctx.run(&["-t", "1"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("An error has occurred: Test runner 'resttest-missing-runner' not found"));
}

// ============== Library pipeline ==============

struct Recorded;

#[async_trait]
impl TranscriptSource for Recorded {
    async fn capture(&self, _test_file: &Path) -> resttest::Result<String> {
        Ok(fixture())
    }
}

#[test]
fn test_recorded_transcript_parses() {
    let parsed = resttest::parse(&fixture());
    assert_eq!(parsed.segments.len(), 2);
    assert_eq!(parsed.error_count(), 1);
    assert_eq!(parsed.summary.len(), 1);
    assert!(!parsed.summary[0].passed);

    let blocks = report::collect_blocks(&parsed.segments, ReportFilter::minimal_errors());
    let text = report::render_plain(&blocks);
    assert!(text.contains("\"name\":\"Get single person\""));
    assert!(text.contains("\"url\":\"http://localhost:8000/api/person/42/\""));
    assert!(!text.contains("Host: localhost"));
}

#[tokio::test]
async fn test_menu_review_to_file() {
    let root = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(Recorded, Config::default(), LogLayout::new(root.path()));
    // Run test 1, full debug to file, done, quit.
    let mut app = App::new(orchestrator, std::io::Cursor::new("1\n1\n2\n4\n0\n"));

    app.run(None).await.unwrap();

    let day = fs::read_dir(app.orchestrator().layout().root())
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    let logs: Vec<_> = fs::read_dir(day.path()).unwrap().collect();
    assert_eq!(logs.len(), 1);
    let text = fs::read_to_string(logs[0].as_ref().unwrap().path()).unwrap();
    assert!(text.contains("------------ INFO ------------"));
    assert!(text.contains("\"count\":3"));
}
