use super::{Unit, UnitWidth, measurement, unit_enum_traits};

measurement!(
    /// A ratio (humidity, cloud cover, probability), stored in basis points.
    Ratio,
    RatioUnit
);

impl Ratio {
    pub fn from_percent(percent: f64) -> Self {
        Self::from_unit(percent, RatioUnit::Percent)
    }

    pub fn percent(self) -> f64 {
        self.to_f64(RatioUnit::Percent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RatioUnit {
    #[default]
    Percent,
    Fraction,
}

impl Unit for RatioUnit {
    const DIMENSION: &'static str = "ratio";

    fn id(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Fraction => "fraction",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Fraction => "frac",
        }
    }

    fn from_reference(&self, reference: f64) -> f64 {
        match self {
            Self::Percent => reference / 100.0,
            Self::Fraction => reference / 10_000.0,
        }
    }

    fn to_reference(&self, value: f64) -> f64 {
        match self {
            Self::Percent => value * 100.0,
            Self::Fraction => value * 10_000.0,
        }
    }

    fn precision(&self, _width: UnitWidth) -> u8 {
        match self {
            Self::Percent => 0,
            Self::Fraction => 2,
        }
    }

    fn max_decimals(&self) -> u8 {
        match self {
            Self::Percent => 2,
            Self::Fraction => 4,
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Percent, Self::Fraction]
    }
}

unit_enum_traits!(RatioUnit);
