use super::{Unit, UnitWidth, measurement, unit_enum_traits};

// Lower bounds of Beaufort classes 1..=12, in centimetres per second.
pub const WIND_SPEED_0: i64 = 0;
pub const WIND_SPEED_1: i64 = 30;
pub const WIND_SPEED_2: i64 = 160;
pub const WIND_SPEED_3: i64 = 340;
pub const WIND_SPEED_4: i64 = 550;
pub const WIND_SPEED_5: i64 = 800;
pub const WIND_SPEED_6: i64 = 1080;
pub const WIND_SPEED_7: i64 = 1390;
pub const WIND_SPEED_8: i64 = 1720;
pub const WIND_SPEED_9: i64 = 2080;
pub const WIND_SPEED_10: i64 = 2450;
pub const WIND_SPEED_11: i64 = 2850;
pub const WIND_SPEED_12: i64 = 3270;

const BEAUFORT_THRESHOLDS: [i64; 13] = [
    WIND_SPEED_0,
    WIND_SPEED_1,
    WIND_SPEED_2,
    WIND_SPEED_3,
    WIND_SPEED_4,
    WIND_SPEED_5,
    WIND_SPEED_6,
    WIND_SPEED_7,
    WIND_SPEED_8,
    WIND_SPEED_9,
    WIND_SPEED_10,
    WIND_SPEED_11,
    WIND_SPEED_12,
];

measurement!(
    /// A speed, stored in centimetres per second.
    Speed,
    SpeedUnit
);

impl Speed {
    /// Beaufort class (0..=12) of this speed.
    pub fn beaufort(self) -> u8 {
        to_beaufort(self.reference())
    }
}

/// Buckets a speed in cm/s into its Beaufort class.
///
/// Negative speeds are calm.
pub fn to_beaufort(cm_per_sec: i64) -> u8 {
    BEAUFORT_THRESHOLDS
        .iter()
        .rposition(|threshold| cm_per_sec >= *threshold)
        .unwrap_or(0) as u8
}

/// Lower bound, in cm/s, of a Beaufort class. Classes above 12 clamp to 12.
///
/// This is not the inverse of [`to_beaufort`]: the original speed inside the
/// bucket is lost.
pub fn from_beaufort(class: u8) -> i64 {
    BEAUFORT_THRESHOLDS[usize::from(class.min(12))]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpeedUnit {
    MetersPerSecond,
    #[default]
    KilometersPerHour,
    MilesPerHour,
    Knots,
    FeetPerSecond,
    /// Lossy: a classification, not a proportional scale.
    Beaufort,
}

impl Unit for SpeedUnit {
    const DIMENSION: &'static str = "speed";

    fn id(&self) -> &'static str {
        match self {
            Self::MetersPerSecond => "mps",
            Self::KilometersPerHour => "kph",
            Self::MilesPerHour => "mph",
            Self::Knots => "kn",
            Self::FeetPerSecond => "ftps",
            Self::Beaufort => "bf",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::MetersPerSecond => "m/s",
            Self::KilometersPerHour => "km/h",
            Self::MilesPerHour => "mi/h",
            Self::Knots => "kt",
            Self::FeetPerSecond => "ft/s",
            Self::Beaufort => "Bft",
        }
    }

    fn from_reference(&self, reference: f64) -> f64 {
        match self {
            Self::MetersPerSecond => reference / 100.0,
            Self::KilometersPerHour => reference * 0.036,
            Self::MilesPerHour => reference / 44.704,
            Self::Knots => reference * 0.036 / 1.852,
            Self::FeetPerSecond => reference / 30.48,
            Self::Beaufort => f64::from(to_beaufort(reference.round() as i64)),
        }
    }

    fn to_reference(&self, value: f64) -> f64 {
        match self {
            Self::MetersPerSecond => value * 100.0,
            Self::KilometersPerHour => value / 0.036,
            Self::MilesPerHour => value * 44.704,
            Self::Knots => value * 1.852 / 0.036,
            Self::FeetPerSecond => value * 30.48,
            Self::Beaufort => from_beaufort(value.round().clamp(0.0, 12.0) as u8) as f64,
        }
    }

    fn precision(&self, width: UnitWidth) -> u8 {
        match (self, width) {
            (Self::Beaufort, _) => 0,
            (_, UnitWidth::Long) => 1,
            (Self::MetersPerSecond | Self::FeetPerSecond, _) => 1,
            _ => 0,
        }
    }

    fn max_decimals(&self) -> u8 {
        match self {
            Self::Beaufort => 0,
            _ => 2,
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::MetersPerSecond,
            Self::KilometersPerHour,
            Self::MilesPerHour,
            Self::Knots,
            Self::FeetPerSecond,
            Self::Beaufort,
        ]
    }
}

unit_enum_traits!(SpeedUnit);
