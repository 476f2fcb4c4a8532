use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical weather condition.
///
/// Converters map provider codes onto this with explicit tables; anything
/// not in a table stays `None` rather than being guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCode {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Snow,
    Wind,
    Fog,
    Haze,
    Sleet,
    Hail,
    Thunder,
    Thunderstorm,
}

impl WeatherCode {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::PartlyCloudy => "partly_cloudy",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Wind => "wind",
            Self::Fog => "fog",
            Self::Haze => "haze",
            Self::Sleet => "sleet",
            Self::Hail => "hail",
            Self::Thunder => "thunder",
            Self::Thunderstorm => "thunderstorm",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|code| code.id() == id)
    }

    pub const fn all() -> &'static [WeatherCode] {
        &[
            Self::Clear,
            Self::PartlyCloudy,
            Self::Cloudy,
            Self::Rain,
            Self::Snow,
            Self::Wind,
            Self::Fog,
            Self::Haze,
            Self::Sleet,
            Self::Hail,
            Self::Thunder,
            Self::Thunderstorm,
        ]
    }

    /// Rough ordering used to pick the dominant condition of a period.
    pub(crate) fn weight(&self) -> u8 {
        match self {
            Self::Clear => 0,
            Self::PartlyCloudy => 1,
            Self::Cloudy => 2,
            Self::Haze => 3,
            Self::Fog => 4,
            Self::Wind => 5,
            Self::Rain => 6,
            Self::Sleet => 7,
            Self::Snow => 8,
            Self::Thunder => 9,
            Self::Thunderstorm => 10,
            Self::Hail => 11,
        }
    }

    pub fn is_precipitation(&self) -> bool {
        matches!(
            self,
            Self::Rain | Self::Snow | Self::Sleet | Self::Hail | Self::Thunderstorm
        )
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
