//! End-to-end tests for the psd2png binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run_psd2png(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_psd2png"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run psd2png")
}

/// 8-bit RGB document with empty metadata sections and raw planar pixels
fn rgb_psd(width: u32, height: u32, pixels: &[[u8; 3]]) -> Vec<u8> {
    let mut bytes = b"8BPS".to_vec();
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&[0; 6]);
    bytes.extend_from_slice(&3u16.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&8u16.to_be_bytes());
    bytes.extend_from_slice(&3u16.to_be_bytes());
    for _ in 0..3 {
        bytes.extend_from_slice(&0u32.to_be_bytes());
    }
    bytes.extend_from_slice(&0u16.to_be_bytes());
    for channel in 0..3 {
        bytes.extend(pixels.iter().map(|px| px[channel]));
    }
    bytes
}

#[test]
fn test_missing_roots_is_a_silent_no_op() {
    let output = run_psd2png(&[]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_missing_output_root_creates_nothing() {
    let input_dir = tempdir().unwrap();
    fs::write(input_dir.path().join("pic.psd"), b"junk").unwrap();

    let output = run_psd2png(&[input_dir.path()]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
    let entries: Vec<_> = fs::read_dir(input_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_corrupt_documents_are_reported_and_run_completes() {
    let input_dir = tempdir().unwrap();
    fs::create_dir_all(input_dir.path().join("nested")).unwrap();
    fs::write(input_dir.path().join("nested/bad.PSD"), b"{ not: psd }").unwrap();
    fs::write(input_dir.path().join("ignored.txt"), b"text").unwrap();
    let output_dir = tempdir().unwrap();

    let output = run_psd2png(&[input_dir.path(), output_dir.path()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("Failed to open or export"), "stderr: {}", stderr);
    assert!(stderr.contains("bad.PSD"), "stderr: {}", stderr);
    assert!(stdout.contains("Conversion complete"), "stdout: {}", stdout);
    assert!(output_dir.path().join("nested").is_dir());
    assert!(!output_dir.path().join("nested/bad.png").exists());
}

#[test]
fn test_missing_input_root_fails() {
    let parent = tempdir().unwrap();
    let output_dir = tempdir().unwrap();

    let absent = parent.path().join("absent");

    let output = run_psd2png(&[absent.as_path(), output_dir.path()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success());
    assert!(!stdout.contains("Conversion complete"));
}

#[test]
fn test_dry_run_lists_without_writing() {
    let input_dir = tempdir().unwrap();
    fs::create_dir_all(input_dir.path().join("a/b")).unwrap();
    fs::write(input_dir.path().join("a/b/pic.PSD"), b"").unwrap();
    let output_dir = tempdir().unwrap();
    let mirror = output_dir.path().join("mirror");

    let output = Command::new(env!("CARGO_BIN_EXE_psd2png"))
        .arg(input_dir.path())
        .arg(&mirror)
        .arg("--dry-run")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("pic.png"), "stdout: {}", stdout);
    assert!(stdout.contains("1 PSD files would be converted"));
    assert!(!mirror.exists());
}

#[test]
fn test_report_is_written_as_json() {
    let input_dir = tempdir().unwrap();
    fs::write(input_dir.path().join("broken.psd"), b"nope").unwrap();
    let output_dir = tempdir().unwrap();
    let report = output_dir.path().join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_psd2png"))
        .arg(input_dir.path())
        .arg(output_dir.path())
        .arg("--quiet")
        .arg("--report")
        .arg(&report)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["discovered"], 1);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["failures"][0]["stage"], "open");
}

#[test]
fn test_valid_document_is_converted_end_to_end() {
    let input_dir = tempdir().unwrap();
    fs::create_dir_all(input_dir.path().join("a/b")).unwrap();
    fs::write(
        input_dir.path().join("a/b/pic.PSD"),
        rgb_psd(2, 1, &[[200, 10, 20], [0, 128, 255]]),
    )
    .unwrap();
    let output_dir = tempdir().unwrap();
    let report = output_dir.path().join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_psd2png"))
        .arg(input_dir.path())
        .arg(output_dir.path())
        .arg("--report")
        .arg(&report)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stderr.is_empty(), "stderr: {}", stderr);
    assert!(stdout.contains("1 of 1 files converted"), "stdout: {}", stdout);

    let rgba = image::open(output_dir.path().join("a/b/pic.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(rgba.get_pixel(0, 0).0, [200, 10, 20, 255]);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["converted"], 1);
    assert_eq!(json["failed"], 0);
}
