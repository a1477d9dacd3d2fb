use vcmbox_tag::{ids as tag_id, Tag};
use vcmbox_transport::{DeviceChannel, DeviceControl};

use crate::config::MailboxConfig;
use crate::error::{MailboxError, Result};
use crate::ids::{Clock, MacAddress, PowerDevice, PowerState, Voltage};
use crate::mailbox::Mailbox;

/// Value buffer for a property answered with a single word.
const SCALAR_CAPACITY: usize = 4;

/// Value buffer for a property answered with `[selector, value]`.
const SELECTOR_CAPACITY: usize = 8;

const MAC_ADDRESS_CAPACITY: usize = 6;

/// Selector used by the SoC-wide temperature and turbo tags.
const SOC_ID: u32 = 0;

/// Typed property reads on top of a [`Mailbox`].
///
/// Every getter is one exchange; values are copied out of the mailbox
/// buffer before returning.
pub struct PropertyClient<D = DeviceChannel> {
    mailbox: Mailbox<D>,
}

impl PropertyClient<DeviceChannel> {
    /// Open the device named by `config.device_path`.
    pub fn open(config: MailboxConfig) -> Result<Self> {
        Ok(Self::new(Mailbox::open(config)?))
    }

    /// Release the device handle. Safe to call more than once.
    pub fn close(&mut self) {
        self.mailbox.close();
    }
}

impl<D: DeviceControl> PropertyClient<D> {
    pub fn new(mailbox: Mailbox<D>) -> Self {
        Self { mailbox }
    }

    /// Build a client on top of an already-open device.
    pub fn with_device(device: D, config: MailboxConfig) -> Self {
        Self::new(Mailbox::with_device(device, config))
    }

    /// Borrow the underlying mailbox for raw tag requests.
    pub fn mailbox(&mut self) -> &mut Mailbox<D> {
        &mut self.mailbox
    }

    pub fn into_inner(self) -> Mailbox<D> {
        self.mailbox
    }

    /// Firmware revision of the VideoCore.
    pub fn firmware_revision(&mut self) -> Result<u32> {
        self.scalar(tag_id::GET_FIRMWARE_REVISION)
    }

    pub fn board_model(&mut self) -> Result<u32> {
        self.scalar(tag_id::GET_BOARD_MODEL)
    }

    pub fn board_revision(&mut self) -> Result<u32> {
        self.scalar(tag_id::GET_BOARD_REVISION)
    }

    /// MAC address of the on-board Ethernet, in network byte order.
    pub fn board_mac_address(&mut self) -> Result<MacAddress> {
        let tag = tag_id::GET_BOARD_MAC_ADDRESS;
        let tags = self.mailbox.request(tag, MAC_ADDRESS_CAPACITY, &[])?;
        let value = first_answer(tag, &tags)?;
        let words = expect_words(tag, value, 2)?;

        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&words[0].to_ne_bytes());
        bytes[4..].copy_from_slice(&words[1].to_ne_bytes());
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&bytes[..6]);
        Ok(MacAddress(mac))
    }

    pub fn power_state(&mut self, device: PowerDevice) -> Result<PowerState> {
        let word = self.selected(tag_id::GET_POWER_STATE, device.id())?;
        Ok(PowerState::from_word(word))
    }

    /// Configured clock rate in Hz.
    pub fn clock_rate(&mut self, clock: Clock) -> Result<u32> {
        self.selected(tag_id::GET_CLOCK_RATE, clock.id())
    }

    /// Clock rate in Hz as measured by the firmware.
    pub fn clock_rate_measured(&mut self, clock: Clock) -> Result<u32> {
        self.selected(tag_id::GET_CLOCK_RATE_MEASURED, clock.id())
    }

    /// Current voltage of a rail in volts.
    pub fn voltage(&mut self, rail: Voltage) -> Result<f32> {
        self.selected(tag_id::GET_VOLTAGE, rail.id()).map(microvolts_to_volts)
    }

    /// Minimum supported voltage of a rail in volts.
    pub fn min_voltage(&mut self, rail: Voltage) -> Result<f32> {
        self.selected(tag_id::GET_MIN_VOLTAGE, rail.id()).map(microvolts_to_volts)
    }

    /// Maximum supported voltage of a rail in volts.
    pub fn max_voltage(&mut self, rail: Voltage) -> Result<f32> {
        self.selected(tag_id::GET_MAX_VOLTAGE, rail.id()).map(microvolts_to_volts)
    }

    /// SoC temperature in degrees Celsius.
    pub fn temperature(&mut self) -> Result<f32> {
        self.selected(tag_id::GET_TEMPERATURE, SOC_ID).map(millidegrees_to_celsius)
    }

    /// Maximum safe SoC temperature in degrees Celsius.
    ///
    /// Overclocking may be disabled above this temperature.
    pub fn max_temperature(&mut self) -> Result<f32> {
        self.selected(tag_id::GET_MAX_TEMPERATURE, SOC_ID).map(millidegrees_to_celsius)
    }

    pub fn turbo(&mut self) -> Result<bool> {
        Ok(self.selected(tag_id::GET_TURBO, SOC_ID)? == 1)
    }

    /// Read a property answered with a single word.
    pub fn scalar(&mut self, tag: u32) -> Result<u32> {
        let tags = self.mailbox.request(tag, SCALAR_CAPACITY, &[])?;
        let value = first_answer(tag, &tags)?;
        Ok(expect_words(tag, value, 1)?[0])
    }

    /// Read a property answered with `[selector, value]`.
    ///
    /// When [`MailboxConfig::verify_selector`] is set, a response that echoes
    /// a different selector fails with [`MailboxError::SelectorMismatch`].
    pub fn selected(&mut self, tag: u32, selector: u32) -> Result<u32> {
        let verify = self.mailbox.config().verify_selector;
        let tags = self.mailbox.request(tag, SELECTOR_CAPACITY, &[selector])?;
        let value = first_answer(tag, &tags)?;
        let words = expect_words(tag, value, 2)?;

        if verify && words[0] != selector {
            return Err(MailboxError::SelectorMismatch {
                tag,
                expected: selector,
                actual: words[0],
            });
        }
        Ok(words[1])
    }
}

impl<D> std::fmt::Debug for PropertyClient<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyClient")
            .field("mailbox", &self.mailbox)
            .finish()
    }
}

fn first_answer<'a>(tag: u32, tags: &[Tag<'a>]) -> Result<&'a [u32]> {
    let first = tags.first().ok_or(MailboxError::NoTagsReturned { tag })?;
    if !first.is_response() {
        return Err(MailboxError::TagNotAnswered { tag });
    }
    Ok(first.value())
}

fn expect_words(tag: u32, value: &[u32], expected: usize) -> Result<&[u32]> {
    if value.len() < expected {
        return Err(MailboxError::ShortValue {
            tag,
            expected,
            actual: value.len(),
        });
    }
    Ok(&value[..expected])
}

pub(crate) fn microvolts_to_volts(microvolts: u32) -> f32 {
    microvolts as f32 / 1_000_000.0
}

pub(crate) fn millidegrees_to_celsius(millidegrees: u32) -> f32 {
    millidegrees as f32 / 1000.0
}

#[cfg(test)]
mod tests {
    use vcmbox_tag::RESPONSE_BIT;
    use vcmbox_transport::Opcode;

    use super::*;
    use crate::mailbox::REPLY_SUCCESS;
    use crate::sim::SimulatedFirmware;

    /// Replays a fixed response body for every request.
    struct Replay(Vec<u32>);

    impl DeviceControl for Replay {
        fn exchange(&mut self, _opcode: Opcode, buf: &mut [u32]) -> vcmbox_transport::Result<()> {
            buf[1] = REPLY_SUCCESS;
            buf[2..2 + self.0.len()].copy_from_slice(&self.0);
            Ok(())
        }
    }

    fn replay(words: &[u32]) -> PropertyClient<Replay> {
        PropertyClient::with_device(Replay(words.to_vec()), MailboxConfig::default())
    }

    #[test]
    fn scalar_reads_firmware_revision() {
        let mut client = replay(&[1, 4, 0x8000_0004, 0x00B0_2DF2, 0]);
        assert_eq!(client.firmware_revision().unwrap(), 0x00B0_2DF2);
    }

    #[test]
    fn selector_reads_power_state() {
        let mut client = replay(&[0x0002_0001, 8, 0x8000_0008, 0, 1, 0]);
        let state = client.power_state(PowerDevice::SdCard).unwrap();
        assert!(state.is_on());
        assert_eq!(state.bits(), 1);
    }

    #[test]
    fn selector_value_is_second_word() {
        let mut client = replay(&[0x0002_0001, 8, 0x8000_0008, 0, 1, 0]);
        assert_eq!(client.selected(tag_id::GET_POWER_STATE, 0).unwrap(), 1);
    }

    #[test]
    fn no_tags_returned() {
        let mut client = replay(&[0]);
        let err = client.firmware_revision().unwrap_err();
        assert!(matches!(
            err,
            MailboxError::NoTagsReturned { tag } if tag == tag_id::GET_FIRMWARE_REVISION
        ));
    }

    #[test]
    fn short_value_is_an_error_not_zero() {
        // Response bit set but zero bytes written.
        let mut client = replay(&[0x0003_0006, 8, RESPONSE_BIT, 0, 0, 0]);
        let err = client.temperature().unwrap_err();
        assert!(matches!(
            err,
            MailboxError::ShortValue {
                expected: 2,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn unanswered_tag() {
        let mut client = replay(&[1, 4, 0, 0, 0]);
        let err = client.firmware_revision().unwrap_err();
        assert!(matches!(err, MailboxError::TagNotAnswered { tag: 1 }));
    }

    #[test]
    fn selector_mismatch_strict() {
        // Asked for the ARM clock, answered for the core clock.
        let mut client = replay(&[0x0003_0002, 8, 0x8000_0008, 4, 500_000_000, 0]);
        let err = client.clock_rate(Clock::Arm).unwrap_err();
        assert!(matches!(
            err,
            MailboxError::SelectorMismatch {
                expected: 3,
                actual: 4,
                ..
            }
        ));
    }

    #[test]
    fn selector_mismatch_lenient() {
        let config = MailboxConfig {
            verify_selector: false,
            ..MailboxConfig::default()
        };
        let mut client = PropertyClient::with_device(
            Replay(vec![0x0003_0002, 8, 0x8000_0008, 4, 500_000_000, 0]),
            config,
        );
        assert_eq!(client.clock_rate(Clock::Arm).unwrap(), 500_000_000);
    }

    #[test]
    fn mac_address_bytes_in_memory_order() {
        let words = [
            u32::from_ne_bytes([0xdc, 0xa6, 0x32, 0x01]),
            u32::from_ne_bytes([0x02, 0x0f, 0x00, 0x00]),
        ];
        let mut client = replay(&[0x0001_0003, 6, 0x8000_0006, words[0], words[1], 0]);
        let mac = client.board_mac_address().unwrap();
        assert_eq!(mac.to_string(), "dc:a6:32:01:02:0f");
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(millidegrees_to_celsius(48_312), 48.312);
        assert_eq!(millidegrees_to_celsius(0), 0.0);
        assert_eq!(microvolts_to_volts(1_200_000), 1.2);
        assert_eq!(microvolts_to_volts(850_000), 0.85);
    }

    #[test]
    fn reads_every_property_from_simulated_firmware() {
        let mut client =
            PropertyClient::with_device(SimulatedFirmware::pi4(), MailboxConfig::default());

        assert_eq!(client.firmware_revision().unwrap(), 0x6183_2A5B);
        assert_eq!(client.board_model().unwrap(), 0);
        assert_eq!(client.board_revision().unwrap(), 0x00C0_3114);
        assert_eq!(
            client.board_mac_address().unwrap().to_string(),
            "dc:a6:32:12:34:56"
        );
        assert!(client.power_state(PowerDevice::UsbHcd).unwrap().is_on());
        assert!(!client.power_state(PowerDevice::Spi).unwrap().is_on());
        assert_eq!(client.clock_rate(Clock::Arm).unwrap(), 1_500_000_000);
        assert_eq!(client.clock_rate_measured(Clock::Arm).unwrap(), 1_500_345_728);
        assert_eq!(client.voltage(Voltage::Core).unwrap(), 0.85);
        assert_eq!(client.min_voltage(Voltage::Core).unwrap(), 0.8);
        assert_eq!(client.max_voltage(Voltage::Core).unwrap(), 1.2);
        assert_eq!(client.temperature().unwrap(), 48.312);
        assert_eq!(client.max_temperature().unwrap(), 85.0);
        assert!(!client.turbo().unwrap());
    }

    #[test]
    fn unknown_selector_reports_missing_power_device() {
        let mut sim = SimulatedFirmware::pi4();
        sim.set_selected(tag_id::GET_POWER_STATE, PowerDevice::Ccp2Tx.id(), 0x2);
        let mut client = PropertyClient::with_device(sim, MailboxConfig::default());
        assert!(client.power_state(PowerDevice::Ccp2Tx).unwrap().is_missing());
    }
}
