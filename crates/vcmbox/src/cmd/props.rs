use serde::Serialize;
use vcmbox_mailbox::{Clock, PowerDevice, PropertyClient, Voltage};
use vcmbox_transport::DeviceControl;

use crate::cmd::{Context, PropsArgs};
use crate::exit::{mailbox_error, CliResult, SUCCESS};
use crate::output::{print_json, render_rows, OutputFormat, Row};

#[derive(Debug, Serialize)]
struct PowerEntry {
    id: &'static str,
    on: bool,
    missing: bool,
}

#[derive(Debug, Serialize)]
struct ClockEntry {
    id: &'static str,
    rate_hz: u32,
    measured_hz: u32,
}

#[derive(Debug, Serialize)]
struct VoltageEntry {
    id: &'static str,
    volts: f32,
    min_volts: f32,
    max_volts: f32,
}

#[derive(Debug, Serialize)]
struct PropsOutput {
    device: String,
    firmware_revision: u32,
    board_model: u32,
    board_revision: String,
    mac_address: String,
    turbo: bool,
    temperature_c: f32,
    max_temperature_c: f32,
    power: Vec<PowerEntry>,
    clocks: Vec<ClockEntry>,
    voltages: Vec<VoltageEntry>,
}

pub fn run(_args: PropsArgs, ctx: &Context) -> CliResult<i32> {
    let mut client = ctx.open_client()?;
    let device = ctx.config.device_path.display().to_string();
    let props = collect(&mut client, device).map_err(|err| mailbox_error("props", err))?;
    client.close();

    match ctx.format {
        OutputFormat::Json => print_json(&props),
        format => println!("{}", render_rows(&rows(&props), format)),
    }
    Ok(SUCCESS)
}

fn collect<D: DeviceControl>(
    client: &mut PropertyClient<D>,
    device: String,
) -> vcmbox_mailbox::Result<PropsOutput> {
    let mut power = Vec::with_capacity(PowerDevice::ALL.len());
    for id in PowerDevice::ALL {
        let state = client.power_state(id)?;
        power.push(PowerEntry {
            id: id.label(),
            on: state.is_on(),
            missing: state.is_missing(),
        });
    }

    let mut clocks = Vec::with_capacity(Clock::ALL.len());
    for id in Clock::ALL {
        clocks.push(ClockEntry {
            id: id.label(),
            rate_hz: client.clock_rate(id)?,
            measured_hz: client.clock_rate_measured(id)?,
        });
    }

    let mut voltages = Vec::with_capacity(Voltage::ALL.len());
    for id in Voltage::ALL {
        voltages.push(VoltageEntry {
            id: id.label(),
            volts: client.voltage(id)?,
            min_volts: client.min_voltage(id)?,
            max_volts: client.max_voltage(id)?,
        });
    }

    Ok(PropsOutput {
        device,
        firmware_revision: client.firmware_revision()?,
        board_model: client.board_model()?,
        board_revision: format!("0x{:06x}", client.board_revision()?),
        mac_address: client.board_mac_address()?.to_string(),
        turbo: client.turbo()?,
        temperature_c: client.temperature()?,
        max_temperature_c: client.max_temperature()?,
        power,
        clocks,
        voltages,
    })
}

fn rows(props: &PropsOutput) -> Vec<Row> {
    let mut rows = vec![
        Row::new("device", &props.device),
        Row::new("firmware_revision", props.firmware_revision),
        Row::new("board_model", props.board_model),
        Row::new("board_revision", &props.board_revision),
        Row::new("mac_address", &props.mac_address),
        Row::new("turbo", props.turbo),
        Row::new("temperature_c", format!("{:.3}", props.temperature_c)),
        Row::new(
            "max_temperature_c",
            format!("{:.3}", props.max_temperature_c),
        ),
    ];

    for p in &props.power {
        let state = if p.missing {
            "missing"
        } else if p.on {
            "on"
        } else {
            "off"
        };
        rows.push(Row::labeled("power", p.id, state));
    }
    for c in &props.clocks {
        rows.push(Row::labeled("clock_rate_hz", c.id, c.rate_hz));
        rows.push(Row::labeled("clock_rate_measured_hz", c.id, c.measured_hz));
    }
    for v in &props.voltages {
        rows.push(Row::labeled("voltage", v.id, format!("{:.6}", v.volts)));
        rows.push(Row::labeled("voltage_min", v.id, format!("{:.6}", v.min_volts)));
        rows.push(Row::labeled("voltage_max", v.id, format!("{:.6}", v.max_volts)));
    }
    rows
}

#[cfg(test)]
mod tests {
    use vcmbox_mailbox::{MailboxConfig, MailboxError, SimulatedFirmware};

    use super::*;

    fn props(sim: SimulatedFirmware) -> vcmbox_mailbox::Result<PropsOutput> {
        let mut client = PropertyClient::with_device(sim, MailboxConfig::default());
        collect(&mut client, "/dev/vcio".to_string())
    }

    #[test]
    fn collects_every_property() {
        let props = props(SimulatedFirmware::pi4()).unwrap();

        assert_eq!(props.board_revision, "0xc03114");
        assert_eq!(props.mac_address, "dc:a6:32:12:34:56");
        assert_eq!(props.power.len(), PowerDevice::ALL.len());
        assert_eq!(props.clocks.len(), Clock::ALL.len());
        assert_eq!(props.voltages.len(), Voltage::ALL.len());
        assert_eq!(props.clocks[2].id, "arm");
        assert_eq!(props.clocks[2].measured_hz, 1_500_345_728);
    }

    #[test]
    fn json_shape() {
        let props = props(SimulatedFirmware::pi4()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&props).unwrap();

        assert_eq!(json["board_model"], 0);
        assert_eq!(json["turbo"], false);
        assert_eq!(json["power"][3]["id"], "usb_hcd");
        assert_eq!(json["power"][3]["on"], true);
        assert_eq!(json["voltages"][0]["id"], "core");
    }

    #[test]
    fn raw_rows() {
        let props = props(SimulatedFirmware::pi4()).unwrap();
        let text = render_rows(&rows(&props), OutputFormat::Raw);

        assert!(text.lines().any(|l| l == "power.spi=off"));
        assert!(text.lines().any(|l| l == "temperature_c=48.312"));
        assert!(text.lines().any(|l| l == "voltage.core=0.850000"));
    }

    #[test]
    fn first_failure_is_returned() {
        let mut sim = SimulatedFirmware::pi4();
        sim.remove(vcmbox_tag::ids::GET_BOARD_MAC_ADDRESS);
        let err = props(sim).unwrap_err();
        assert!(matches!(err, MailboxError::TagNotAnswered { .. }));
    }
}
