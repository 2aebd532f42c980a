//! Tests that drive the `bookmarker` binary.

mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use common::{document, start_mock};
use tempfile::TempDir;

fn bookmarker_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bookmarker"))
}

fn run_bookmarker(config_path: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let binary = bookmarker_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path)
        .args(args)
        .env_remove("FIRESTORE_EMULATOR_HOST")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run bookmarker binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code())
}

/// Write a config pointing at the emulator stand-in on `host`.
fn write_config(tmp: &TempDir, host: &str, filter_cmd: &str, browser: &Path) -> PathBuf {
    let content = format!(
        r#"account_key_file = ""
browser = "{}"
filter_cmd = "{}"
wait_for_browser = true
emulator_host = "{}"
"#,
        browser.display(),
        filter_cmd,
        host
    );
    let path = tmp.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

/// A fake browser that records its arguments into `opened.txt`.
#[cfg(unix)]
fn fake_browser(tmp: &TempDir) -> (PathBuf, PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let record = tmp.path().join("opened.txt");
    let script = tmp.path().join("browser.sh");
    fs::write(
        &script,
        format!("#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n", record.display()),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    (script, record)
}

fn sample_docs() -> Vec<serde_json::Value> {
    vec![
        document("a", "A", "http://a", "2019-05-01T10:00:00Z"),
        document("b", "B", "http://b", "2019-05-02T10:00:00Z"),
    ]
}

#[test]
fn test_positional_argument_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, code) = run_bookmarker(&tmp.path().join("config.toml"), &["extra"]);
    assert_eq!(code, Some(2), "stderr={}", stderr);
    assert!(!tmp.path().join("config.toml").exists());
}

#[test]
fn test_first_run_writes_default_config_and_requires_key_file() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("bookmarker").join("config.toml");

    let (_, stderr, code) = run_bookmarker(&config_path, &[]);
    assert_eq!(code, Some(1));
    assert!(
        stderr.contains("please set key file to config file"),
        "stderr={}",
        stderr
    );

    let written = fs::read_to_string(&config_path).unwrap();
    assert!(written.contains("account_key_file = \"\""));
    assert!(written.contains("browser = \"google-chrome\""));
    assert!(written.contains("filter_cmd = \"peco\""));
}

#[test]
fn test_missing_key_file_fails() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("config.toml");
    fs::write(
        &config_path,
        "account_key_file = \"/nonexistent/key.json\"\n",
    )
    .unwrap();

    let (_, stderr, code) = run_bookmarker(&config_path, &[]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("key.json"), "stderr={}", stderr);
}

#[cfg(unix)]
#[test]
fn test_open_launches_browser_with_selected_url() {
    let tmp = TempDir::new().unwrap();
    let (host, _state) = start_mock(sample_docs());
    let (browser, record) = fake_browser(&tmp);
    let config_path = write_config(&tmp, &host, "grep http://b", &browser);

    let (stdout, stderr, code) = run_bookmarker(&config_path, &[]);
    assert_eq!(code, Some(0), "stdout={}, stderr={}", stdout, stderr);
    assert_eq!(fs::read_to_string(record).unwrap(), "http://b\n");
}

#[cfg(unix)]
#[test]
fn test_empty_filter_output_fails_with_no_selection() {
    let tmp = TempDir::new().unwrap();
    let (host, _state) = start_mock(sample_docs());
    let (browser, record) = fake_browser(&tmp);
    let config_path = write_config(&tmp, &host, "cat > /dev/null", &browser);

    let (_, stderr, code) = run_bookmarker(&config_path, &[]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("no bookmark selected"), "stderr={}", stderr);
    assert!(!record.exists());
}

#[cfg(unix)]
#[test]
fn test_filter_env_expansion() {
    let tmp = TempDir::new().unwrap();
    let (host, _state) = start_mock(sample_docs());
    let (browser, record) = fake_browser(&tmp);
    let config_path = write_config(&tmp, &host, "grep ${BOOKMARKER_TEST_PICK}", &browser);

    let output = Command::new(bookmarker_binary())
        .arg("--config")
        .arg(&config_path)
        .env_remove("FIRESTORE_EMULATOR_HOST")
        .env("BOOKMARKER_TEST_PICK", "http://a")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(record).unwrap(), "http://a\n");
}

#[test]
fn test_list_prints_table() {
    let tmp = TempDir::new().unwrap();
    let (host, _state) = start_mock(sample_docs());
    let config_path = write_config(&tmp, &host, "peco", Path::new("true"));

    let (stdout, stderr, code) = run_bookmarker(&config_path, &["-l"]);
    assert_eq!(code, Some(0), "stderr={}", stderr);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("CREATED"));
    assert!(lines[1].starts_with("2019-05-01 10:00  A"));
    assert!(lines[2].ends_with("http://b"));
}

#[test]
fn test_store_failure_exits_1() {
    let tmp = TempDir::new().unwrap();
    let (host, state) = start_mock(sample_docs());
    *state.fail.lock().unwrap() = true;
    let config_path = write_config(&tmp, &host, "peco", Path::new("true"));

    let (_, stderr, code) = run_bookmarker(&config_path, &["-l"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("failed to iterate"), "stderr={}", stderr);
}

#[test]
fn test_list_aborts_on_stream_error() {
    let tmp = TempDir::new().unwrap();
    let (host, state) = start_mock(sample_docs());
    *state.stream_error.lock().unwrap() = true;
    let config_path = write_config(&tmp, &host, "peco", Path::new("true"));

    let (stdout, stderr, code) = run_bookmarker(&config_path, &["-l"]);
    assert_eq!(code, Some(1));
    assert!(stdout.is_empty(), "partial listing printed: {}", stdout);
    assert!(stderr.contains("failed to iterate"), "stderr={}", stderr);
}

#[test]
fn test_edit_runs_editor_on_config() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("config.toml");
    let copy = tmp.path().join("seen.toml");

    let output = Command::new(bookmarker_binary())
        .arg("--config")
        .arg(&config_path)
        .arg("-c")
        .env("EDITOR", format!("cp -f -- \"$1\" '{}'; true", copy.display()))
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(config_path.exists());
    assert!(copy.exists());
}

#[test]
fn test_delete_and_list_conflict() {
    let tmp = TempDir::new().unwrap();
    let (_, _, code) = run_bookmarker(&tmp.path().join("config.toml"), &["-d", "-l"]);
    assert_eq!(code, Some(2));
}
