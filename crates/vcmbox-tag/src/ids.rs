//! Property tag ids.
//!
//! Only the read-only telemetry tags used by vcmbox are listed. See the
//! firmware wiki page "Mailbox property interface" for the full table.

/// VideoCore firmware revision.
pub const GET_FIRMWARE_REVISION: u32 = 0x0000_0001;

/// Board model number.
pub const GET_BOARD_MODEL: u32 = 0x0001_0001;

/// Board revision number.
pub const GET_BOARD_REVISION: u32 = 0x0001_0002;

/// Board MAC address (6 bytes).
pub const GET_BOARD_MAC_ADDRESS: u32 = 0x0001_0003;

pub const GET_POWER_STATE: u32 = 0x0002_0001;

pub const GET_CLOCK_RATE: u32 = 0x0003_0002;
pub const GET_VOLTAGE: u32 = 0x0003_0003;
pub const GET_MAX_VOLTAGE: u32 = 0x0003_0005;
pub const GET_TEMPERATURE: u32 = 0x0003_0006;
pub const GET_MIN_VOLTAGE: u32 = 0x0003_0008;
pub const GET_TURBO: u32 = 0x0003_0009;
pub const GET_MAX_TEMPERATURE: u32 = 0x0003_000A;

/// Clock rate as measured by the firmware rather than the configured value.
pub const GET_CLOCK_RATE_MEASURED: u32 = 0x0003_0047;

/// Returns a human-readable name for a tag id.
pub fn tag_name(id: u32) -> &'static str {
    match id {
        GET_FIRMWARE_REVISION => "GET_FIRMWARE_REVISION",
        GET_BOARD_MODEL => "GET_BOARD_MODEL",
        GET_BOARD_REVISION => "GET_BOARD_REVISION",
        GET_BOARD_MAC_ADDRESS => "GET_BOARD_MAC_ADDRESS",
        GET_POWER_STATE => "GET_POWER_STATE",
        GET_CLOCK_RATE => "GET_CLOCK_RATE",
        GET_VOLTAGE => "GET_VOLTAGE",
        GET_MAX_VOLTAGE => "GET_MAX_VOLTAGE",
        GET_TEMPERATURE => "GET_TEMPERATURE",
        GET_MIN_VOLTAGE => "GET_MIN_VOLTAGE",
        GET_TURBO => "GET_TURBO",
        GET_MAX_TEMPERATURE => "GET_MAX_TEMPERATURE",
        GET_CLOCK_RATE_MEASURED => "GET_CLOCK_RATE_MEASURED",
        _ => "UNKNOWN",
    }
}

/// Returns true for tags that only read state (bit 15 of the id clear).
pub fn is_get(id: u32) -> bool {
    id & 0x0000_8000 == 0
}
