//! Selector ids for the per-device property tags.

use std::fmt;

/// Devices whose power state the firmware reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PowerDevice {
    SdCard = 0x0000_0000,
    Uart0 = 0x0000_0001,
    Uart1 = 0x0000_0002,
    UsbHcd = 0x0000_0003,
    I2c0 = 0x0000_0004,
    I2c1 = 0x0000_0005,
    I2c2 = 0x0000_0006,
    Spi = 0x0000_0007,
    Ccp2Tx = 0x0000_0008,
}

impl PowerDevice {
    pub const ALL: [PowerDevice; 9] = [
        PowerDevice::SdCard,
        PowerDevice::Uart0,
        PowerDevice::Uart1,
        PowerDevice::UsbHcd,
        PowerDevice::I2c0,
        PowerDevice::I2c1,
        PowerDevice::I2c2,
        PowerDevice::Spi,
        PowerDevice::Ccp2Tx,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    /// Metric label.
    pub fn label(self) -> &'static str {
        match self {
            PowerDevice::SdCard => "sd_card",
            PowerDevice::Uart0 => "uart0",
            PowerDevice::Uart1 => "uart1",
            PowerDevice::UsbHcd => "usb_hcd",
            PowerDevice::I2c0 => "i2c0",
            PowerDevice::I2c1 => "i2c1",
            PowerDevice::I2c2 => "i2c2",
            PowerDevice::Spi => "spi",
            PowerDevice::Ccp2Tx => "ccp2tx",
        }
    }
}

/// Clocks the firmware reports rates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Clock {
    Emmc = 0x0000_0001,
    Uart = 0x0000_0002,
    Arm = 0x0000_0003,
    Core = 0x0000_0004,
    V3d = 0x0000_0005,
    H264 = 0x0000_0006,
    Isp = 0x0000_0007,
    Sdram = 0x0000_0008,
    Pixel = 0x0000_0009,
    Pwm = 0x0000_000A,
    Hevc = 0x0000_000B,
    Emmc2 = 0x0000_000C,
    M2mc = 0x0000_000D,
    PixelBvb = 0x0000_000E,
}

impl Clock {
    pub const ALL: [Clock; 14] = [
        Clock::Emmc,
        Clock::Uart,
        Clock::Arm,
        Clock::Core,
        Clock::V3d,
        Clock::H264,
        Clock::Isp,
        Clock::Sdram,
        Clock::Pixel,
        Clock::Pwm,
        Clock::Hevc,
        Clock::Emmc2,
        Clock::M2mc,
        Clock::PixelBvb,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Clock::Emmc => "emmc",
            Clock::Uart => "uart",
            Clock::Arm => "arm",
            Clock::Core => "core",
            Clock::V3d => "v3d",
            Clock::H264 => "h264",
            Clock::Isp => "isp",
            Clock::Sdram => "sdram",
            Clock::Pixel => "pixel",
            Clock::Pwm => "pwm",
            Clock::Hevc => "hevc",
            Clock::Emmc2 => "emmc2",
            Clock::M2mc => "m2mc",
            Clock::PixelBvb => "pixel_bvb",
        }
    }
}

/// Voltage rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Voltage {
    Core = 0x0000_0001,
    SdramC = 0x0000_0002,
    SdramP = 0x0000_0003,
    SdramI = 0x0000_0004,
}

impl Voltage {
    pub const ALL: [Voltage; 4] = [
        Voltage::Core,
        Voltage::SdramC,
        Voltage::SdramP,
        Voltage::SdramI,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Voltage::Core => "core",
            Voltage::SdramC => "sdram_c",
            Voltage::SdramP => "sdram_p",
            Voltage::SdramI => "sdram_i",
        }
    }
}

/// Power state word of a device.
///
/// Bit 0 is set when the device is powered, bit 1 when it does not exist.
/// Other bits are reserved and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerState(u32);

impl PowerState {
    const ON: u32 = 1 << 0;
    const MISSING: u32 = 1 << 1;

    pub fn from_word(word: u32) -> Self {
        Self(word & (Self::ON | Self::MISSING))
    }

    pub fn is_on(self) -> bool {
        self.0 & Self::ON != 0
    }

    pub fn is_missing(self) -> bool {
        self.0 & Self::MISSING != 0
    }

    /// The two defined bits (0: off, 1: on, 2: missing).
    pub fn bits(self) -> u32 {
        self.0
    }
}

/// Ethernet MAC address of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_firmware_table() {
        assert_eq!(PowerDevice::Ccp2Tx.id(), 8);
        assert_eq!(Clock::Arm.id(), 3);
        assert_eq!(Clock::PixelBvb.id(), 0xE);
        assert_eq!(Voltage::SdramI.id(), 4);
    }

    #[test]
    fn tables_are_in_id_order() {
        assert!(PowerDevice::ALL.windows(2).all(|w| w[0].id() < w[1].id()));
        assert!(Clock::ALL.windows(2).all(|w| w[0].id() < w[1].id()));
        assert!(Voltage::ALL.windows(2).all(|w| w[0].id() < w[1].id()));
    }

    #[test]
    fn power_state_masks_reserved_bits() {
        let state = PowerState::from_word(0xFFFF_FFFD);
        assert!(state.is_on());
        assert!(!state.is_missing());
        assert_eq!(state.bits(), 1);

        let missing = PowerState::from_word(0x2);
        assert!(!missing.is_on());
        assert!(missing.is_missing());
    }

    #[test]
    fn mac_address_display() {
        let mac = MacAddress([0xdc, 0xa6, 0x32, 0x01, 0x02, 0x0f]);
        assert_eq!(mac.to_string(), "dc:a6:32:01:02:0f");
    }
}
