use std::path::Path;
use std::process::{Command, Output};

fn mayday(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mayday"))
        .args(args)
        .arg("--config-dir")
        .arg(workdir)
        .arg("--report-dir")
        .arg(workdir.join("reports"))
        .current_dir(workdir)
        .env_remove("RUST_LOG")
        .env_remove("RUST_BACKTRACE")
        .output()
        .unwrap()
}

#[test]
fn test_silent_panic_leaves_stderr_empty() {
    let dir = tempfile::tempdir().unwrap();
    let output = mayday(
        dir.path(),
        &["crash", "--panic", "--silent", "--reason", "kaboom"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("substitute value 0"));
    assert_eq!(String::from_utf8_lossy(&output.stderr), "");
    assert_eq!(std::fs::read_dir(dir.path().join("reports")).unwrap().count(), 1);
}

#[test]
fn test_panic_shows_only_the_friendly_notice() {
    let dir = tempfile::tempdir().unwrap();
    let output = mayday(dir.path(), &["crash", "--panic", "--reason", "kaboom"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Well, this is embarrassing."));
    assert!(!stderr.contains("panicked at"));
    assert!(!stderr.contains("RUST_BACKTRACE"));
}

#[test]
fn test_exit_code_terminates_process() {
    let dir = tempfile::tempdir().unwrap();
    let output = mayday(
        dir.path(),
        &["crash", "--silent", "--no-report", "--exit-code", "4"],
    );

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());
}
