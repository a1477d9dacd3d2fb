use std::path::Path;

use serde::Serialize;
use vcmbox_mailbox::PropertyClient;
use vcmbox_transport::DeviceControl;

use crate::cmd::{Context, DoctorArgs};
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: &'static str,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    device: String,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, ctx: &Context) -> CliResult<i32> {
    let path = &ctx.config.device_path;
    let mut checks = vec![platform_check(), device_present_check(path)];

    if checks.iter().any(|c| c.status == CheckStatus::Fail) {
        checks.push(CheckResult::new(
            "device_open",
            CheckStatus::Skip,
            "device not present",
        ));
        checks.push(CheckResult::new(
            "firmware_revision",
            CheckStatus::Skip,
            "device not present",
        ));
    } else {
        match PropertyClient::open(ctx.config.clone()) {
            Ok(mut client) => {
                checks.push(CheckResult::new(
                    "device_open",
                    CheckStatus::Pass,
                    format!("{} opened", path.display()),
                ));
                checks.extend(firmware_checks(&mut client));
                client.close();
            }
            Err(err) => {
                checks.push(CheckResult::new(
                    "device_open",
                    CheckStatus::Fail,
                    err.to_string(),
                ));
                checks.push(CheckResult::new(
                    "firmware_revision",
                    CheckStatus::Skip,
                    "device not open",
                ));
            }
        }
    }
    checks.push(selector_check(ctx.config.verify_selector));

    let has_fail = checks.iter().any(|c| c.status == CheckStatus::Fail);
    let output = DoctorOutput {
        device: path.display().to_string(),
        checks,
        overall: if has_fail { "fail" } else { "pass" },
    };

    print_doctor(&output, ctx.format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("vcmbox doctor ({})\n", output.device);
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<20} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => println!("{}", output.overall),
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

fn platform_check() -> CheckResult {
    if cfg!(target_os = "linux") {
        CheckResult::new("platform", CheckStatus::Pass, std::env::consts::ARCH)
    } else {
        CheckResult::new(
            "platform",
            CheckStatus::Fail,
            format!(
                "the VideoCore mailbox is only exposed on Linux, not {}",
                std::env::consts::OS
            ),
        )
    }
}

fn device_present_check(path: &Path) -> CheckResult {
    match std::fs::metadata(path) {
        Ok(_) => CheckResult::new(
            "device_present",
            CheckStatus::Pass,
            format!("{} exists", path.display()),
        ),
        Err(err) => CheckResult::new(
            "device_present",
            CheckStatus::Fail,
            format!("{}: {err}", path.display()),
        ),
    }
}

/// One property round trip proves the firmware answers.
fn firmware_checks<D: DeviceControl>(client: &mut PropertyClient<D>) -> Vec<CheckResult> {
    match client.firmware_revision() {
        Ok(revision) => {
            let mut checks = vec![CheckResult::new(
                "firmware_revision",
                CheckStatus::Pass,
                format!("0x{revision:08x}"),
            )];
            if let Ok(board) = client.board_revision() {
                checks.push(CheckResult::new(
                    "board_revision",
                    CheckStatus::Info,
                    format!("0x{board:06x}"),
                ));
            }
            checks
        }
        Err(err) => vec![CheckResult::new(
            "firmware_revision",
            CheckStatus::Fail,
            err.to_string(),
        )],
    }
}

fn selector_check(verify: bool) -> CheckResult {
    let detail = if verify { "strict" } else { "lenient" };
    CheckResult::new("selector_echo", CheckStatus::Info, detail)
}
