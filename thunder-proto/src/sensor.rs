//! Sensor kinds and their fixed-width payload decoding rules

use uuid::Uuid;

use crate::gatt;

/// Sensor exposed by a Thunder Sense board
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensorKind {
    Battery,
    Power,
    Temperature,
    Humidity,
    UvIndex,
    Pressure,
    AmbientLight,
    Sound,
    Co2,
    Voc,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{kind} payload too short: expected {expected} bytes, got {actual}")]
    TooShort {
        kind: SensorKind,
        expected: usize,
        actual: usize,
    },
}

impl SensorKind {
    pub const ALL: [SensorKind; 10] = [
        SensorKind::Battery,
        SensorKind::Power,
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::UvIndex,
        SensorKind::Pressure,
        SensorKind::AmbientLight,
        SensorKind::Sound,
        SensorKind::Co2,
        SensorKind::Voc,
    ];

    /// Resolve a characteristic UUID; unknown characteristics are `None`
    pub fn from_uuid(uuid: Uuid) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.uuid() == uuid)
    }

    pub fn uuid(self) -> Uuid {
        match self {
            SensorKind::Battery => gatt::BATTERY_UUID,
            SensorKind::Power => gatt::POWER_UUID,
            SensorKind::Temperature => gatt::TEMPERATURE_UUID,
            SensorKind::Humidity => gatt::HUMIDITY_UUID,
            SensorKind::UvIndex => gatt::UV_INDEX_UUID,
            SensorKind::Pressure => gatt::PRESSURE_UUID,
            SensorKind::AmbientLight => gatt::AMBIENT_LIGHT_UUID,
            SensorKind::Sound => gatt::SOUND_UUID,
            SensorKind::Co2 => gatt::CO2_UUID,
            SensorKind::Voc => gatt::VOC_UUID,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SensorKind::Battery => "battery",
            SensorKind::Power => "power",
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::UvIndex => "uvIndex",
            SensorKind::Pressure => "pressure",
            SensorKind::AmbientLight => "ambientLight",
            SensorKind::Sound => "sound",
            SensorKind::Co2 => "co2",
            SensorKind::Voc => "voc",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SensorKind::Battery => "%",
            SensorKind::Power => "",
            SensorKind::Temperature => "°C",
            SensorKind::Humidity => "%",
            SensorKind::UvIndex => "",
            SensorKind::Pressure => "mbar",
            SensorKind::AmbientLight => "lux",
            SensorKind::Sound => "dBA",
            SensorKind::Co2 => "ppm",
            SensorKind::Voc => "ppb",
        }
    }

    /// Number of leading payload bytes the decoder consumes
    pub fn width(self) -> usize {
        match self {
            SensorKind::Battery | SensorKind::Power | SensorKind::UvIndex => 1,
            SensorKind::Temperature
            | SensorKind::Humidity
            | SensorKind::Sound
            | SensorKind::Co2
            | SensorKind::Voc => 2,
            SensorKind::Pressure | SensorKind::AmbientLight => 4,
        }
    }

    /// Decode a raw characteristic value. Trailing bytes are ignored.
    pub fn decode(self, payload: &[u8]) -> Result<f64, DecodeError> {
        let b = payload.get(..self.width()).ok_or(DecodeError::TooShort {
            kind: self,
            expected: self.width(),
            actual: payload.len(),
        })?;

        let value = match self {
            SensorKind::Battery | SensorKind::Power => f64::from(b[0] as i8),
            SensorKind::UvIndex => f64::from(b[0]),
            SensorKind::Temperature | SensorKind::Humidity | SensorKind::Sound => {
                f64::from(i16::from_le_bytes([b[0], b[1]])) / 100.0
            }
            SensorKind::Co2 | SensorKind::Voc => f64::from(u16::from_le_bytes([b[0], b[1]])),
            SensorKind::Pressure => f64::from(u32::from_le_bytes([b[0], b[1], b[2], b[3]])) / 1000.0,
            SensorKind::AmbientLight => {
                f64::from(u32::from_le_bytes([b[0], b[1], b[2], b[3]])) / 100.0
            }
        };

        Ok(value)
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
