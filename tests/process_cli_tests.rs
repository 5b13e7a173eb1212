use std::process::Command;

#[test]
fn process_subcommand_is_available() {
    let output = Command::new(env!("CARGO_BIN_EXE_gavel"))
        .args(["process", "--help"])
        .output()
        .expect("failed to execute gavel");

    assert!(
        output.status.success(),
        "process --help should succeed\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn process_reports_missing_audio_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_gavel"))
        .args(["process", "does-not-exist.mp3"])
        .output()
        .expect("failed to execute gavel");

    assert!(
        !output.status.success(),
        "process should fail for a missing file\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Audio file not found"),
        "expected missing file error, got:\n{}",
        stderr
    );
}

#[test]
fn completions_are_generated() {
    let output = Command::new(env!("CARGO_BIN_EXE_gavel"))
        .args(["completions", "bash"])
        .output()
        .expect("failed to execute gavel");

    assert!(output.status.success());
    assert!(!output.stdout.is_empty(), "completion script should not be empty");
}

#[test]
fn config_path_prints_a_location() {
    let output = Command::new(env!("CARGO_BIN_EXE_gavel"))
        .args(["config", "path"])
        .output()
        .expect("failed to execute gavel");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("config.toml"),
        "expected config path, got:\n{}",
        stdout
    );
}
