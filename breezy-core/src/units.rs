//! Typed measurement units.
//!
//! Every measurement is stored as an integer in a single reference unit per
//! dimension (centimetres per second for speed, decidegrees Celsius for
//! temperature, pascals for pressure, micrometres for precipitation,
//! millimetres for distance, basis points for ratios). Display units convert
//! to and from that reference; arithmetic and comparison only ever happen on
//! the reference value.

use serde::{Deserialize, Serialize};

use crate::error::UnitError;

pub mod distance;
pub mod format;
pub mod precipitation;
pub mod pressure;
pub mod ratio;
pub mod speed;
pub mod temperature;

pub use distance::{Distance, DistanceUnit};
pub use format::{FormatOptions, Locale};
pub use precipitation::{Precipitation, PrecipitationUnit};
pub use pressure::{Pressure, PressureUnit};
pub use ratio::{Ratio, RatioUnit};
pub use speed::{Speed, SpeedUnit};
pub use temperature::{Temperature, TemperatureUnit};

/// How much room a formatted value gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitWidth {
    Narrow,
    #[default]
    Short,
    Long,
}

/// A display unit of one measurement dimension.
pub trait Unit: Copy + PartialEq + Sized + 'static {
    /// Dimension name used in error messages.
    const DIMENSION: &'static str;

    /// Stable identifier, used in config files and on the command line.
    fn id(&self) -> &'static str;

    /// Short English symbol; also accepted when parsing.
    fn symbol(&self) -> &'static str;

    /// Reference value to a value in this unit.
    fn from_reference(&self, reference: f64) -> f64;

    /// Value in this unit to the reference unit.
    fn to_reference(&self, value: f64) -> f64;

    /// Default number of decimals for a given width.
    fn precision(&self, width: UnitWidth) -> u8;

    /// Upper bound on requested decimals; more would only show noise below the
    /// reference resolution.
    fn max_decimals(&self) -> u8;

    fn all() -> &'static [Self];

    /// Look a unit up by id or symbol, case-insensitively.
    fn parse_unit(input: &str) -> Result<Self, UnitError> {
        let needle = input.trim();
        Self::all()
            .iter()
            .copied()
            .find(|unit| {
                unit.id().eq_ignore_ascii_case(needle) || unit.symbol().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnitError::UnknownUnit {
                dimension: Self::DIMENSION,
                input: input.to_string(),
            })
    }
}

/// Splits "36 km/h" or "36km/h" into its number and unit parts.
pub(crate) fn split_measurement(input: &str) -> Result<(f64, &str), UnitError> {
    let trimmed = input.trim();
    let split_at = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || ((*c == '-' || *c == '+') && *i == 0)))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    let (number, unit) = trimmed.split_at(split_at);
    let unit = unit.trim();
    if number.is_empty() || unit.is_empty() {
        return Err(UnitError::Malformed(input.to_string()));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| UnitError::Malformed(input.to_string()))?;

    Ok((value, unit))
}

/// Generates the value type of one dimension.
///
/// The generated type wraps an `i64` in the dimension's reference unit and
/// offers `from_unit` / `to_f64` / `format` / `parse` on top of `U: Unit`.
macro_rules! measurement {
    ($(#[$meta:meta])* $name:ident, $unit:ty) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Default,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $unit {
            /// `value` in this unit, as a measurement.
            pub fn value(self, value: f64) -> $name {
                $name::from_unit(value, self)
            }
        }

        impl $name {
            pub const ZERO: Self = Self(0);

            pub const fn from_reference(reference: i64) -> Self {
                Self(reference)
            }

            pub const fn reference(self) -> i64 {
                self.0
            }

            /// Converts `value`, expressed in `unit`, to the reference unit.
            pub fn from_unit(value: f64, unit: $unit) -> Self {
                Self($crate::units::Unit::to_reference(&unit, value).round() as i64)
            }

            /// Like [`Self::from_unit`], but passes `None` and non-finite
            /// provider values through as `None`.
            pub fn from_unit_opt(value: Option<f64>, unit: $unit) -> Option<Self> {
                value
                    .filter(|v| v.is_finite())
                    .map(|v| Self::from_unit(v, unit))
            }

            pub fn to_f64(self, unit: $unit) -> f64 {
                $crate::units::Unit::from_reference(&unit, self.0 as f64)
            }

            pub fn format(
                self,
                unit: $unit,
                options: &$crate::units::FormatOptions,
            ) -> Result<String, $crate::error::UnitError> {
                $crate::units::format::format_value(self.to_f64(unit), unit, options)
            }

            /// Parses a measurement such as `"36 km/h"`.
            pub fn parse(input: &str) -> Result<Self, $crate::error::UnitError> {
                let (value, unit) = $crate::units::split_measurement(input)?;
                let unit = <$unit as $crate::units::Unit>::parse_unit(unit)?;
                Ok(Self::from_unit(value, unit))
            }

            pub fn max(self, other: Self) -> Self {
                std::cmp::Ord::max(self, other)
            }

            pub fn min(self, other: Self) -> Self {
                std::cmp::Ord::min(self, other)
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0.saturating_add(rhs.0))
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0.saturating_sub(rhs.0))
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |total, v| total + v)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::UnitError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

pub(crate) use measurement;

/// Implements `Display`, `FromStr` and serde-as-id for a unit enum.
macro_rules! unit_enum_traits {
    ($unit:ty) => {
        impl std::fmt::Display for $unit {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::units::Unit::symbol(self))
            }
        }

        impl std::str::FromStr for $unit {
            type Err = $crate::error::UnitError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$unit as $crate::units::Unit>::parse_unit(s)
            }
        }

        impl serde::Serialize for $unit {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::units::Unit::id(self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $unit {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$unit as $crate::units::Unit>::parse_unit(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use unit_enum_traits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_measurement_accepts_spacing_variants() {
        assert_eq!(split_measurement("36 km/h").unwrap(), (36.0, "km/h"));
        assert_eq!(split_measurement("36km/h").unwrap(), (36.0, "km/h"));
        assert_eq!(split_measurement(" -4.5 °C ").unwrap(), (-4.5, "°C"));
    }

    #[test]
    fn split_measurement_rejects_garbage() {
        assert!(matches!(split_measurement("km/h"), Err(UnitError::Malformed(_))));
        assert!(matches!(split_measurement("36"), Err(UnitError::Malformed(_))));
        assert!(matches!(split_measurement("3.6.1 m/s"), Err(UnitError::Malformed(_))));
        assert!(matches!(split_measurement(""), Err(UnitError::Malformed(_))));
    }

    #[test]
    fn arithmetic_saturates() {
        let max = Precipitation::from_reference(i64::MAX);
        let min = Precipitation::from_reference(i64::MIN);
        let one = Precipitation::from_reference(1);
        assert_eq!(max + one, max);
        assert_eq!(min - one, min);
        assert_eq!([max, one, one].into_iter().sum::<Precipitation>(), max);
        assert_eq!(one + one - one, one);
    }
}
