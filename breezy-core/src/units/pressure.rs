use super::{Unit, UnitWidth, measurement, unit_enum_traits};

measurement!(
    /// A pressure, stored in pascals.
    Pressure,
    PressureUnit
);

impl Pressure {
    pub fn from_hectopascals(hpa: f64) -> Self {
        Self::from_unit(hpa, PressureUnit::Hectopascal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PressureUnit {
    #[default]
    Hectopascal,
    Millibar,
    Kilopascal,
    Atmosphere,
    MillimeterOfMercury,
    InchOfMercury,
}

impl PressureUnit {
    fn pascals_per_unit(self) -> f64 {
        match self {
            Self::Hectopascal | Self::Millibar => 100.0,
            Self::Kilopascal => 1_000.0,
            Self::Atmosphere => 101_325.0,
            Self::MillimeterOfMercury => 133.322_387_415,
            Self::InchOfMercury => 3_386.388_666_6,
        }
    }
}

impl Unit for PressureUnit {
    const DIMENSION: &'static str = "pressure";

    fn id(&self) -> &'static str {
        match self {
            Self::Hectopascal => "hpa",
            Self::Millibar => "mb",
            Self::Kilopascal => "kpa",
            Self::Atmosphere => "atm",
            Self::MillimeterOfMercury => "mmhg",
            Self::InchOfMercury => "inhg",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Hectopascal => "hPa",
            Self::Millibar => "mbar",
            Self::Kilopascal => "kPa",
            Self::Atmosphere => "atm",
            Self::MillimeterOfMercury => "mmHg",
            Self::InchOfMercury => "inHg",
        }
    }

    fn from_reference(&self, reference: f64) -> f64 {
        reference / self.pascals_per_unit()
    }

    fn to_reference(&self, value: f64) -> f64 {
        value * self.pascals_per_unit()
    }

    fn precision(&self, width: UnitWidth) -> u8 {
        match (self, width) {
            (Self::Atmosphere, _) => 3,
            (Self::InchOfMercury | Self::Kilopascal, _) => 2,
            (_, UnitWidth::Long) => 1,
            _ => 0,
        }
    }

    fn max_decimals(&self) -> u8 {
        match self {
            Self::Hectopascal | Self::Millibar => 2,
            Self::Kilopascal | Self::MillimeterOfMercury => 2,
            Self::InchOfMercury => 3,
            Self::Atmosphere => 4,
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Hectopascal,
            Self::Millibar,
            Self::Kilopascal,
            Self::Atmosphere,
            Self::MillimeterOfMercury,
            Self::InchOfMercury,
        ]
    }
}

unit_enum_traits!(PressureUnit);
