//! Locale-aware rendering of measurement values.
//!
//! Labels come from a small built-in table. For a few language/unit pairs
//! the generic labels read wrong (French and German Beaufort abbreviations,
//! the verbose Chinese Beaufort name), so those are replaced by curated
//! entries before falling back to English.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Unit, UnitWidth};
use crate::error::UnitError;

/// Language and optional region, parsed from tags like `fr`, `de-AT` or
/// `zh_Hans_CN`. Script subtags are accepted and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn english() -> Self {
        Self {
            language: "en".to_string(),
            region: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Decimal separator used when rendering numbers.
    pub fn decimal_separator(&self) -> char {
        match self.language.as_str() {
            "fr" | "de" | "it" | "es" | "pt" | "nl" | "ru" | "pl" | "cs" | "sk" | "tr" | "sv"
            | "nb" | "nn" | "no" | "da" | "fi" | "is" | "uk" | "ro" | "hu" | "el" => {
                // Swiss German keeps the point.
                if self.language == "de" && self.region.as_deref() == Some("CH") {
                    '.'
                } else {
                    ','
                }
            }
            _ => '.',
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = UnitError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let mut parts = tag.trim().split(['-', '_']);
        let language = parts
            .next()
            .filter(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_alphabetic()))
            .ok_or_else(|| UnitError::InvalidLocale(tag.to_string()))?
            .to_ascii_lowercase();

        let mut region = None;
        for part in parts {
            match part.len() {
                // Script subtag, e.g. Hans.
                4 if part.chars().all(|c| c.is_ascii_alphabetic()) => {}
                2 if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                    region = Some(part.to_ascii_uppercase());
                }
                3 if part.chars().all(|c| c.is_ascii_digit()) => {
                    region = Some(part.to_string());
                }
                _ => return Err(UnitError::InvalidLocale(tag.to_string())),
            }
        }

        Ok(Self { language, region })
    }
}

impl Serialize for Locale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How to render a value.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub locale: Locale,
    pub width: UnitWidth,
    /// `None` uses the unit's precision for `width`. Capped at the unit's
    /// maximum; negative values are rejected.
    pub decimals: Option<i32>,
}

impl FormatOptions {
    pub fn for_locale(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }
}

/// How a label attaches to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    /// `21 km/h`
    Spaced(&'static str),
    /// `21°C`, `5级`
    Attached(&'static str),
}

/// Renders `value`, already expressed in `unit`.
pub fn format_value<U: Unit>(
    value: f64,
    unit: U,
    options: &FormatOptions,
) -> Result<String, UnitError> {
    let decimals = match options.decimals {
        Some(d) if d < 0 => return Err(UnitError::NegativeDecimals(d)),
        Some(d) => usize::from(unit.max_decimals()).min(d as usize),
        None => usize::from(unit.precision(options.width)),
    };

    let mut number = format!("{value:.decimals$}");
    // -0 and -0.0 read as a sign error.
    if number.starts_with('-') && number[1..].chars().all(|c| c == '0' || c == '.') {
        number.remove(0);
    }
    let separator = options.locale.decimal_separator();
    if separator != '.' {
        number = number.replace('.', &separator.to_string());
    }

    let label = curated_label(options.locale.language(), unit.id(), options.width)
        .unwrap_or_else(|| default_label(unit.id(), options.width));

    Ok(match label {
        Label::Spaced(text) => format!("{number} {text}"),
        Label::Attached(text) => format!("{number}{text}"),
    })
}

/// Display name of a unit, without a number.
pub fn unit_name<U: Unit>(unit: U, width: UnitWidth, locale: &Locale) -> &'static str {
    match curated_label(locale.language(), unit.id(), width)
        .unwrap_or_else(|| default_label(unit.id(), width))
    {
        Label::Spaced(text) | Label::Attached(text) => text,
    }
}

fn default_label(id: &str, width: UnitWidth) -> Label {
    use Label::{Attached, Spaced};
    use UnitWidth::{Long, Narrow, Short};

    match (id, width) {
        // speed
        ("mps", Long) => Spaced("meters per second"),
        ("mps", _) => Spaced("m/s"),
        ("kph", Long) => Spaced("kilometers per hour"),
        ("kph", _) => Spaced("km/h"),
        ("mph", Long) => Spaced("miles per hour"),
        ("mph", _) => Spaced("mph"),
        ("kn", Long) => Spaced("knots"),
        ("kn", _) => Spaced("kn"),
        ("ftps", Long) => Spaced("feet per second"),
        ("ftps", _) => Spaced("ft/s"),
        ("bf", Long) => Spaced("on the Beaufort scale"),
        ("bf", _) => Spaced("Bft"),
        // temperature
        ("c", Narrow) | ("f", Narrow) => Attached("°"),
        ("c", Short) => Attached("°C"),
        ("c", Long) => Spaced("degrees Celsius"),
        ("f", Short) => Attached("°F"),
        ("f", Long) => Spaced("degrees Fahrenheit"),
        ("k", Long) => Spaced("kelvins"),
        ("k", _) => Spaced("K"),
        // pressure
        ("hpa", Long) => Spaced("hectopascals"),
        ("hpa", _) => Spaced("hPa"),
        ("mb", Long) => Spaced("millibars"),
        ("mb", _) => Spaced("mbar"),
        ("kpa", Long) => Spaced("kilopascals"),
        ("kpa", _) => Spaced("kPa"),
        ("atm", Long) => Spaced("atmospheres"),
        ("atm", _) => Spaced("atm"),
        ("mmhg", Long) => Spaced("millimeters of mercury"),
        ("mmhg", _) => Spaced("mmHg"),
        ("inhg", Long) => Spaced("inches of mercury"),
        ("inhg", _) => Spaced("inHg"),
        // precipitation
        ("mm", Long) => Spaced("millimeters"),
        ("mm", _) => Spaced("mm"),
        ("cm", Long) => Spaced("centimeters"),
        ("cm", _) => Spaced("cm"),
        ("in", Long) => Spaced("inches"),
        ("in", Narrow) => Attached("\""),
        ("in", _) => Spaced("in"),
        ("lpsqm", Long) => Spaced("liters per square meter"),
        ("lpsqm", _) => Spaced("L/m²"),
        // distance
        ("m", Long) => Spaced("meters"),
        ("m", _) => Spaced("m"),
        ("km", Long) => Spaced("kilometers"),
        ("km", _) => Spaced("km"),
        ("mi", Long) => Spaced("miles"),
        ("mi", _) => Spaced("mi"),
        ("nmi", Long) => Spaced("nautical miles"),
        ("nmi", _) => Spaced("NM"),
        ("ft", Long) => Spaced("feet"),
        ("ft", _) => Spaced("ft"),
        // ratio
        ("percent", Long) => Spaced("percent"),
        ("percent", _) => Attached("%"),
        ("fraction", _) => Spaced(""),
        _ => Spaced(""),
    }
}

fn curated_label(language: &str, id: &str, width: UnitWidth) -> Option<Label> {
    use Label::{Attached, Spaced};
    use UnitWidth::{Long, Narrow, Short};

    let label = match (language, id, width) {
        ("fr", "bf", Long) => Spaced("Beaufort"),
        ("fr", "bf", _) => Spaced("Bf"),
        ("fr", "kph", Long) => Spaced("kilomètres par heure"),
        ("fr", "mps", Long) => Spaced("mètres par seconde"),
        ("fr", "kn", Short | Narrow) => Spaced("nd"),
        ("fr", "kn", Long) => Spaced("nœuds"),
        ("fr", "percent", _) => Spaced("%"),
        ("fr", "c", Long) => Spaced("degrés Celsius"),

        ("de", "bf", Long) => Spaced("Beaufort"),
        ("de", "bf", _) => Spaced("Bft"),
        ("de", "kph", Long) => Spaced("Kilometer pro Stunde"),
        ("de", "mps", Long) => Spaced("Meter pro Sekunde"),
        ("de", "c", Long) => Spaced("Grad Celsius"),
        ("de", "percent", _) => Spaced("%"),

        ("zh", "bf", _) => Attached("级"),
        ("zh", "kph", Long) => Spaced("公里/小时"),
        ("zh", "mps", Long) => Spaced("米/秒"),
        ("zh", "c", Long) => Spaced("摄氏度"),
        ("zh", "hpa", Long) => Spaced("百帕"),
        ("zh", "mm", Long) => Spaced("毫米"),
        _ => return None,
    };
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{
        Precipitation, PrecipitationUnit, Speed, SpeedUnit, Temperature, TemperatureUnit,
    };

    fn options(tag: &str, width: UnitWidth, decimals: Option<i32>) -> FormatOptions {
        FormatOptions {
            locale: tag.parse().unwrap(),
            width,
            decimals,
        }
    }

    #[test]
    fn parses_locale_tags() {
        let locale: Locale = "zh_Hans_CN".parse().unwrap();
        assert_eq!(locale.language(), "zh");
        assert_eq!(locale.region(), Some("CN"));
        assert_eq!(locale.to_string(), "zh-CN");

        assert_eq!("es-419".parse::<Locale>().unwrap().region(), Some("419"));
        assert!("".parse::<Locale>().is_err());
        assert!("english".parse::<Locale>().is_err());
        assert!("fr-F".parse::<Locale>().is_err());
    }

    #[test]
    fn rejects_negative_decimals() {
        let speed = Speed::from_unit(12.0, SpeedUnit::KilometersPerHour);
        let err = speed
            .format(SpeedUnit::KilometersPerHour, &options("en", UnitWidth::Short, Some(-1)))
            .unwrap_err();
        assert_eq!(err, UnitError::NegativeDecimals(-1));
    }

    #[test]
    fn caps_decimals_at_unit_maximum() {
        let t = Temperature::from_celsius(21.44);
        let text = t
            .format(TemperatureUnit::Celsius, &options("en", UnitWidth::Short, Some(5)))
            .unwrap();
        assert_eq!(text, "21.4°C");
    }

    #[test]
    fn uses_locale_decimal_separator() {
        let p = Precipitation::from_millimeters(2.5);
        let text = p
            .format(PrecipitationUnit::Millimeter, &options("de-DE", UnitWidth::Short, None))
            .unwrap();
        assert_eq!(text, "2,5 mm");

        let swiss = p
            .format(PrecipitationUnit::Millimeter, &options("de-CH", UnitWidth::Short, None))
            .unwrap();
        assert_eq!(swiss, "2.5 mm");
    }

    #[test]
    fn curated_beaufort_labels() {
        let speed = Speed::from_unit(36.0, SpeedUnit::KilometersPerHour);
        let render = |tag: &str| {
            speed
                .format(SpeedUnit::Beaufort, &options(tag, UnitWidth::Short, None))
                .unwrap()
        };
        assert_eq!(render("en"), "5 Bft");
        assert_eq!(render("fr-FR"), "5 Bf");
        assert_eq!(render("de"), "5 Bft");
        assert_eq!(render("zh-CN"), "5级");
    }

    #[test]
    fn negative_zero_is_rendered_without_sign() {
        let t = Temperature::from_celsius(-0.2);
        let text = t
            .format(TemperatureUnit::Celsius, &options("en", UnitWidth::Narrow, None))
            .unwrap();
        assert_eq!(text, "0°");
    }

    #[test]
    fn unit_names_follow_locale() {
        let zh: Locale = "zh".parse().unwrap();
        assert_eq!(unit_name(SpeedUnit::KilometersPerHour, UnitWidth::Long, &zh), "公里/小时");
        assert_eq!(
            unit_name(SpeedUnit::KilometersPerHour, UnitWidth::Long, &Locale::english()),
            "kilometers per hour"
        );
    }
}
