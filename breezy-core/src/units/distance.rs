use super::{Unit, UnitWidth, measurement, unit_enum_traits};

measurement!(
    /// A distance (visibility, ceiling), stored in millimetres.
    Distance,
    DistanceUnit
);

impl Distance {
    pub fn from_meters(m: f64) -> Self {
        Self::from_unit(m, DistanceUnit::Meter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceUnit {
    Meter,
    #[default]
    Kilometer,
    Mile,
    NauticalMile,
    Foot,
}

impl DistanceUnit {
    fn millimeters_per_unit(self) -> f64 {
        match self {
            Self::Meter => 1_000.0,
            Self::Kilometer => 1_000_000.0,
            Self::Mile => 1_609_344.0,
            Self::NauticalMile => 1_852_000.0,
            Self::Foot => 304.8,
        }
    }
}

impl Unit for DistanceUnit {
    const DIMENSION: &'static str = "distance";

    fn id(&self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Mile => "mi",
            Self::NauticalMile => "nmi",
            Self::Foot => "ft",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Mile => "mi",
            Self::NauticalMile => "NM",
            Self::Foot => "ft",
        }
    }

    fn from_reference(&self, reference: f64) -> f64 {
        reference / self.millimeters_per_unit()
    }

    fn to_reference(&self, value: f64) -> f64 {
        value * self.millimeters_per_unit()
    }

    fn precision(&self, width: UnitWidth) -> u8 {
        match (self, width) {
            (Self::Meter | Self::Foot, _) => 0,
            (_, UnitWidth::Narrow) => 0,
            _ => 1,
        }
    }

    fn max_decimals(&self) -> u8 {
        match self {
            Self::Meter | Self::Foot => 2,
            _ => 3,
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Meter,
            Self::Kilometer,
            Self::Mile,
            Self::NauticalMile,
            Self::Foot,
        ]
    }
}

unit_enum_traits!(DistanceUnit);
