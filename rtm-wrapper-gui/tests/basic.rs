use std::process::Command;

#[test]
fn version_flag_prints_detailed_version() {
    let exe = env!("CARGO_BIN_EXE_rtm-wrapper-gui");
    let output = Command::new(exe).arg("--version").output().expect("run binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("rtm-wrapper-gui "));
    assert!(stdout.contains("rtm-core "));
    assert!(stdout.contains("rtm-dataset "));
}

#[test]
fn unknown_log_level_is_a_usage_error() {
    let exe = env!("CARGO_BIN_EXE_rtm-wrapper-gui");
    let output = Command::new(exe)
        .args(["--log-level", "chatty", "--version"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown log level"));
}
