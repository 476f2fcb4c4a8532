use super::{Unit, UnitWidth, measurement, unit_enum_traits};

measurement!(
    /// A temperature, stored in tenths of a degree Celsius.
    Temperature,
    TemperatureUnit
);

impl Temperature {
    pub fn from_celsius(celsius: f64) -> Self {
        Self::from_unit(celsius, TemperatureUnit::Celsius)
    }

    pub fn celsius(self) -> f64 {
        self.to_f64(TemperatureUnit::Celsius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Unit for TemperatureUnit {
    const DIMENSION: &'static str = "temperature";

    fn id(&self) -> &'static str {
        match self {
            Self::Celsius => "c",
            Self::Fahrenheit => "f",
            Self::Kelvin => "k",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::Kelvin => "K",
        }
    }

    fn from_reference(&self, reference: f64) -> f64 {
        let celsius = reference / 10.0;
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            Self::Kelvin => celsius + 273.15,
        }
    }

    fn to_reference(&self, value: f64) -> f64 {
        let celsius = match self {
            Self::Celsius => value,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            Self::Kelvin => value - 273.15,
        };
        celsius * 10.0
    }

    fn precision(&self, width: UnitWidth) -> u8 {
        match width {
            UnitWidth::Long => 1,
            _ => 0,
        }
    }

    fn max_decimals(&self) -> u8 {
        1
    }

    fn all() -> &'static [Self] {
        &[Self::Celsius, Self::Fahrenheit, Self::Kelvin]
    }
}

unit_enum_traits!(TemperatureUnit);
