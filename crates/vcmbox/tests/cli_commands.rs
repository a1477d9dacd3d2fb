#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::{Command, Output};

fn missing_device() -> PathBuf {
    PathBuf::from(format!(
        "/tmp/vcmbox-missing-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

fn vcmbox(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vcmbox"))
        .env_remove("VCMBOX_DEVICE")
        .env_remove("VCMBOX_LOG_LEVEL")
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("vcmbox should run")
}

#[test]
fn version_prints_package_version() {
    let output = vcmbox(&["version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("vcmbox {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn metrics_without_device_returns_69() {
    let device = missing_device();
    let output = vcmbox(&["--device", device.to_str().unwrap(), "metrics"]);

    assert_eq!(output.status.code(), Some(69));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not present"), "stderr: {stderr}");
}

#[test]
fn device_from_environment() {
    let device = missing_device();
    let output = Command::new(env!("CARGO_BIN_EXE_vcmbox"))
        .env("VCMBOX_DEVICE", &device)
        .arg("props")
        .output()
        .expect("vcmbox should run");

    assert_eq!(output.status.code(), Some(69));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(device.to_str().unwrap()), "stderr: {stderr}");
}

#[test]
fn serve_without_device_fails_before_binding() {
    let device = missing_device();
    let output = vcmbox(&[
        "--device",
        device.to_str().unwrap(),
        "serve",
        "--addr",
        "127.0.0.1:0",
    ]);

    assert_eq!(output.status.code(), Some(69));
}

#[cfg(target_os = "linux")]
#[test]
fn metrics_on_non_mailbox_device_keeps_first_header() {
    // /dev/null opens but rejects the property ioctl.
    let output = vcmbox(&["--device", "/dev/null", "metrics"]);

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "# HELP rpi_vc_revision Firmware revision of the VideoCore device.\n\
         # TYPE rpi_vc_revision gauge\n"
    );
}

#[test]
fn doctor_reports_missing_device() {
    let device = missing_device();
    let output = vcmbox(&[
        "--format",
        "json",
        "--device",
        device.to_str().unwrap(),
        "doctor",
    ]);

    assert_eq!(output.status.code(), Some(30));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("doctor should emit json");
    assert_eq!(payload["overall"], "fail");

    let checks = payload["checks"].as_array().expect("checks array");
    let present = checks
        .iter()
        .find(|c| c["name"] == "device_present")
        .expect("device_present check");
    assert_eq!(present["status"], "fail");
    let open = checks
        .iter()
        .find(|c| c["name"] == "device_open")
        .expect("device_open check");
    assert_eq!(open["status"], "skip");
}

#[test]
fn doctor_raw_prints_overall_only() {
    let device = missing_device();
    let output = vcmbox(&[
        "--format",
        "raw",
        "--device",
        device.to_str().unwrap(),
        "doctor",
    ]);

    assert_eq!(output.status.code(), Some(30));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "fail");
}
