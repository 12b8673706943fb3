//! GATT Characteristic Constants for Thunder Sense Boards
//!
//! Standard Bluetooth SIG characteristics are given as 16-bit short ids and
//! expanded against the Bluetooth base UUID. Silicon Labs vendor
//! characteristics are full 128-bit UUIDs.

use uuid::Uuid;

/// Bluetooth base UUID: 00000000-0000-1000-8000-00805f9b34fb
pub const BLUETOOTH_BASE_UUID: u128 = 0x00000000_0000_1000_8000_00805f9b34fb;

/// Expand a 16-bit SIG assigned number into a full UUID
pub const fn sig_uuid(short: u16) -> Uuid {
    Uuid::from_u128(BLUETOOTH_BASE_UUID | ((short as u128) << 96))
}

/// Battery Level (read)
pub const BATTERY_UUID: Uuid = sig_uuid(0x2a19);

/// Power source (read)
pub const POWER_UUID: Uuid = Uuid::from_u128(0xec61a454_ed01_a5e8_b8f9_de9ec026ec51);

/// Temperature, 0.01 °C (read)
pub const TEMPERATURE_UUID: Uuid = sig_uuid(0x2a6e);

/// Humidity, 0.01 % (read)
pub const HUMIDITY_UUID: Uuid = sig_uuid(0x2a6f);

/// UV Index (read)
pub const UV_INDEX_UUID: Uuid = sig_uuid(0x2a76);

/// Pressure, 0.001 mbar (read)
pub const PRESSURE_UUID: Uuid = sig_uuid(0x2a6d);

/// Ambient light, 0.01 lux (read)
pub const AMBIENT_LIGHT_UUID: Uuid = Uuid::from_u128(0xc8546913_bfd9_45eb_8dde_9f8754f4a32e);

/// Sound level, 0.01 dBA (read)
pub const SOUND_UUID: Uuid = Uuid::from_u128(0xc8546913_bf02_45eb_8dde_9f8754f4a32e);

/// eCO2, ppm (read)
pub const CO2_UUID: Uuid = Uuid::from_u128(0xefd658ae_c401_ef33_76e7_91b00019103b);

/// TVOC, ppb (read)
pub const VOC_UUID: Uuid = Uuid::from_u128(0xefd658ae_c402_ef33_76e7_91b00019103b);

/// RGB LED control characteristic (write)
pub const INDICATOR_UUID: Uuid = Uuid::from_u128(0xfcb89c40_c603_59f3_7dc3_5ece444a401b);

/// Mode byte that enables all four LEDs of the RGB indicator
pub const INDICATOR_MODE_ALL: u8 = 0x0f;

/// Advertised name prefix shared by all Thunder Sense boards
pub const NAME_PREFIX: &str = "Thunder Sense";

/// Whether `uuid` is the RGB indicator characteristic
pub fn is_indicator(uuid: Uuid) -> bool {
    uuid == INDICATOR_UUID
}

/// Indicator write payload: `[mode, r, g, b]`
pub fn indicator_payload(r: u8, g: u8, b: u8) -> [u8; 4] {
    [INDICATOR_MODE_ALL, r, g, b]
}
