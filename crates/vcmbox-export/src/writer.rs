use std::fmt::Display;
use std::io::Write;

use tracing::debug;
use vcmbox_mailbox::{Clock, PowerDevice, PropertyClient, Voltage};
use vcmbox_transport::DeviceControl;

use crate::error::Result;

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const GAUGE: &str = "gauge";

/// Label value for SoC-wide sensors.
const SOC: &str = "soc";

/// Writes metric families one header at a time.
struct ExpositionWriter<'w, W> {
    out: &'w mut W,
    name: &'static str,
    labels: &'static [&'static str],
}

impl<'w, W: Write> ExpositionWriter<'w, W> {
    fn new(out: &'w mut W) -> Self {
        Self {
            out,
            name: "",
            labels: &[],
        }
    }

    fn header(
        &mut self,
        name: &'static str,
        help: &str,
        labels: &'static [&'static str],
    ) -> Result<()> {
        self.name = name;
        self.labels = labels;
        writeln!(self.out, "# HELP {name} {help}")?;
        writeln!(self.out, "# TYPE {name} {GAUGE}")?;
        Ok(())
    }

    fn sample(&mut self, value: impl Display, values: &[&str]) -> Result<()> {
        debug_assert_eq!(
            values.len(),
            self.labels.len(),
            "label count mismatch for {}",
            self.name
        );
        write!(self.out, "{}", self.name)?;
        if !self.labels.is_empty() {
            write!(self.out, "{{")?;
            for (i, (key, value)) in self.labels.iter().zip(values).enumerate() {
                if i > 0 {
                    write!(self.out, ",")?;
                }
                write!(self.out, "{key}=\"{value}\"")?;
            }
            write!(self.out, "}}")?;
        }
        writeln!(self.out, " {value}")?;
        Ok(())
    }
}

fn celsius(c: f32) -> String {
    format!("{c:.3}")
}

fn fahrenheit(c: f32) -> String {
    format!("{:.3}", c * 9.0 / 5.0 + 32.0)
}

fn volts(v: f32) -> String {
    format!("{v:.6}")
}

/// Write every metric in Prometheus text exposition format.
///
/// Each header is written before its value is read, so a failed read shows
/// in the output where it happened. The first error aborts the report.
pub fn write_metrics<D, W>(client: &mut PropertyClient<D>, out: &mut W) -> Result<()>
where
    D: DeviceControl,
    W: Write,
{
    let mut w = ExpositionWriter::new(out);

    // Hardware.
    w.header(
        "rpi_vc_revision",
        "Firmware revision of the VideoCore device.",
        &[],
    )?;
    w.sample(client.firmware_revision()?, &[])?;

    w.header("rpi_board_model", "Board model.", &[])?;
    w.sample(client.board_model()?, &[])?;

    w.header("rpi_board_revision", "Board revision.", &[])?;
    w.sample(client.board_revision()?, &[])?;

    // Power.
    w.header(
        "rpi_power_state",
        "Component power state (0: off, 1: on, 2: missing).",
        &["id"],
    )?;
    for device in PowerDevice::ALL {
        let state = client.power_state(device)?;
        w.sample(state.bits(), &[device.label()])?;
    }

    // Clocks.
    w.header("rpi_clock_rate_hz", "Clock rate in Hertz.", &["id"])?;
    for clock in Clock::ALL {
        w.sample(client.clock_rate(clock)?, &[clock.label()])?;
    }

    w.header(
        "rpi_clock_rate_measured_hz",
        "Measured clock rate in Hertz.",
        &["id"],
    )?;
    for clock in Clock::ALL {
        w.sample(client.clock_rate_measured(clock)?, &[clock.label()])?;
    }

    w.header("rpi_turbo", "Turbo state.", &[])?;
    w.sample(u8::from(client.turbo()?), &[])?;

    // Temperature.
    w.header(
        "rpi_temperature_c",
        "Temperature of the SoC in degrees celsius.",
        &["id"],
    )?;
    let temp = client.temperature()?;
    w.sample(celsius(temp), &[SOC])?;
    w.header(
        "rpi_temperature_f",
        "Temperature of the SoC in degrees fahrenheit.",
        &["id"],
    )?;
    w.sample(fahrenheit(temp), &[SOC])?;

    w.header(
        "rpi_max_temperature_c",
        "Maximum temperature of the SoC in degrees celsius.",
        &["id"],
    )?;
    let max_temp = client.max_temperature()?;
    w.sample(celsius(max_temp), &[SOC])?;
    w.header(
        "rpi_max_temperature_f",
        "Maximum temperature of the SoC in degrees fahrenheit.",
        &["id"],
    )?;
    w.sample(fahrenheit(max_temp), &[SOC])?;

    // Voltages.
    w.header("rpi_voltage", "Current component voltage.", &["id"])?;
    for rail in Voltage::ALL {
        w.sample(volts(client.voltage(rail)?), &[rail.label()])?;
    }

    w.header(
        "rpi_voltage_min",
        "Minimum supported component voltage.",
        &["id"],
    )?;
    for rail in Voltage::ALL {
        w.sample(volts(client.min_voltage(rail)?), &[rail.label()])?;
    }

    w.header(
        "rpi_voltage_max",
        "Maximum supported component voltage.",
        &["id"],
    )?;
    for rail in Voltage::ALL {
        w.sample(volts(client.max_voltage(rail)?), &[rail.label()])?;
    }

    w.out.flush()?;
    debug!("wrote metrics");
    Ok(())
}

/// Render every metric into a string.
pub fn render_metrics<D: DeviceControl>(client: &mut PropertyClient<D>) -> Result<String> {
    let mut out = Vec::with_capacity(4096);
    write_metrics(client, &mut out)?;
    // The writer only emits UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
