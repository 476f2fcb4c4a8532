use super::{Unit, UnitWidth, measurement, unit_enum_traits};

measurement!(
    /// An amount of precipitation, stored in micrometres of water depth.
    Precipitation,
    PrecipitationUnit
);

impl Precipitation {
    pub fn from_millimeters(mm: f64) -> Self {
        Self::from_unit(mm, PrecipitationUnit::Millimeter)
    }

    pub fn millimeters(self) -> f64 {
        self.to_f64(PrecipitationUnit::Millimeter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrecipitationUnit {
    #[default]
    Millimeter,
    Centimeter,
    Inch,
    LiterPerSquareMeter,
}

impl Unit for PrecipitationUnit {
    const DIMENSION: &'static str = "precipitation";

    fn id(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Inch => "in",
            Self::LiterPerSquareMeter => "lpsqm",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Inch => "\"",
            Self::LiterPerSquareMeter => "L/m²",
        }
    }

    fn from_reference(&self, reference: f64) -> f64 {
        match self {
            Self::Millimeter | Self::LiterPerSquareMeter => reference / 1_000.0,
            Self::Centimeter => reference / 10_000.0,
            Self::Inch => reference / 25_400.0,
        }
    }

    fn to_reference(&self, value: f64) -> f64 {
        match self {
            Self::Millimeter | Self::LiterPerSquareMeter => value * 1_000.0,
            Self::Centimeter => value * 10_000.0,
            Self::Inch => value * 25_400.0,
        }
    }

    fn precision(&self, _width: UnitWidth) -> u8 {
        match self {
            Self::Inch => 2,
            _ => 1,
        }
    }

    fn max_decimals(&self) -> u8 {
        match self {
            Self::Inch | Self::Centimeter => 3,
            _ => 2,
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Millimeter,
            Self::Centimeter,
            Self::Inch,
            Self::LiterPerSquareMeter,
        ]
    }
}

unit_enum_traits!(PrecipitationUnit);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_inch_is_25_4_mm() {
        let inch = Precipitation::from_unit(1.0, PrecipitationUnit::Inch);
        assert!((inch.millimeters() - 25.4).abs() < 1e-9);
        assert_eq!(
            Precipitation::from_millimeters(2.5).to_f64(PrecipitationUnit::LiterPerSquareMeter),
            2.5
        );
    }

    #[test]
    fn sums_in_reference_unit() {
        let total: Precipitation = [0.2, 0.3, 1.5]
            .into_iter()
            .map(Precipitation::from_millimeters)
            .sum();
        assert_eq!(total.reference(), 2_000);
    }
}
