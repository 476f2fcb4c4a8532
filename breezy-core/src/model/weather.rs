use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AirQuality, Pollen, WeatherCode};
use crate::units::{Distance, Precipitation, Pressure, Ratio, Speed, Temperature};

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Direction the wind blows from, in degrees clockwise from north.
    pub degree: Option<f64>,
    pub speed: Option<Speed>,
    pub gusts: Option<Speed>,
}

impl Wind {
    pub fn is_empty(&self) -> bool {
        self.degree.is_none() && self.speed.is_none() && self.gusts.is_none()
    }

    /// Beaufort class 0.
    pub fn is_calm(&self) -> bool {
        self.speed.is_some_and(|s| s.beaufort() == 0)
    }

    /// 16-point compass name of [`Self::degree`].
    pub fn direction_name(&self) -> Option<&'static str> {
        let degree = self.degree.filter(|d| d.is_finite())?;
        let index = ((degree.rem_euclid(360.0) / 22.5).round() as usize) % 16;
        Some(COMPASS_POINTS[index])
    }

    /// Degrees for a 16-point compass name such as `"SSW"`.
    pub fn degree_from_compass(name: &str) -> Option<f64> {
        COMPASS_POINTS
            .iter()
            .position(|p| p.eq_ignore_ascii_case(name.trim()))
            .map(|i| i as f64 * 22.5)
    }

    /// `None` when nothing is known, so empty winds don't reach the model.
    pub(crate) fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationTotals {
    pub total: Option<Precipitation>,
    pub thunderstorm: Option<Precipitation>,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    pub ice: Option<Precipitation>,
}

impl PrecipitationTotals {
    pub fn total(total: Option<Precipitation>) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_none()
            && self.thunderstorm.is_none()
            && self.rain.is_none()
            && self.snow.is_none()
            && self.ice.is_none()
    }

    /// The explicit total, or the sum of whatever parts are known.
    pub fn total_or_sum(&self) -> Option<Precipitation> {
        self.total.or_else(|| {
            let parts = [self.rain, self.snow, self.ice];
            parts
                .iter()
                .any(Option::is_some)
                .then(|| parts.iter().flatten().copied().sum())
        })
    }

    pub(crate) fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationProbability {
    pub total: Option<Ratio>,
    pub thunderstorm: Option<Ratio>,
    pub rain: Option<Ratio>,
    pub snow: Option<Ratio>,
    pub ice: Option<Ratio>,
}

impl PrecipitationProbability {
    pub fn total(total: Option<Ratio>) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_none()
            && self.thunderstorm.is_none()
            && self.rain.is_none()
            && self.snow.is_none()
            && self.ice.is_none()
    }

    /// Largest of the known probabilities.
    pub fn max(&self) -> Option<Ratio> {
        [self.total, self.thunderstorm, self.rain, self.snow, self.ice]
            .into_iter()
            .flatten()
            .max()
    }

    pub(crate) fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub weather_text: Option<String>,
    pub weather_code: Option<WeatherCode>,
    pub temperature: Option<Temperature>,
    pub feels_like: Option<Temperature>,
    pub wind: Option<Wind>,
    pub uv_index: Option<f64>,
    pub relative_humidity: Option<Ratio>,
    pub dew_point: Option<Temperature>,
    pub pressure: Option<Pressure>,
    pub cloud_cover: Option<Ratio>,
    pub visibility: Option<Distance>,
    pub ceiling: Option<Distance>,
    pub observed_at: Option<DateTime<Utc>>,
    /// Provider-written summary for the coming hours.
    pub hourly_forecast_text: Option<String>,
}

impl Current {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.weather_code.is_none() && self.weather_text.is_none()
    }
}

/// One half (day 06–18 or night 18–06) of a daily forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalfDay {
    pub weather_text: Option<String>,
    pub weather_code: Option<WeatherCode>,
    /// Maximum for the day half, minimum for the night half.
    pub temperature: Option<Temperature>,
    pub feels_like: Option<Temperature>,
    pub precipitation: Option<PrecipitationTotals>,
    pub precipitation_probability: Option<PrecipitationProbability>,
    pub wind: Option<Wind>,
    pub cloud_cover: Option<Ratio>,
}

impl HalfDay {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SunTimes {
    pub rise: Option<DateTime<Utc>>,
    pub set: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Daily {
    /// Calendar date in the location's time zone.
    pub date: NaiveDate,
    pub day: Option<HalfDay>,
    pub night: Option<HalfDay>,
    pub sun: Option<SunTimes>,
    pub uv_index: Option<f64>,
    pub air_quality: Option<AirQuality>,
    pub pollen: Option<Pollen>,
    pub sunshine_hours: Option<f64>,
}

impl Daily {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            day: None,
            night: None,
            sun: None,
            uv_index: None,
            air_quality: None,
            pollen: None,
            sunshine_hours: None,
        }
    }

    pub fn max_temperature(&self) -> Option<Temperature> {
        self.day.as_ref().and_then(|d| d.temperature)
    }

    pub fn min_temperature(&self) -> Option<Temperature> {
        self.night.as_ref().and_then(|n| n.temperature)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hourly {
    pub date: DateTime<Utc>,
    pub is_daylight: Option<bool>,
    pub weather_text: Option<String>,
    pub weather_code: Option<WeatherCode>,
    pub temperature: Option<Temperature>,
    pub feels_like: Option<Temperature>,
    pub precipitation: Option<PrecipitationTotals>,
    pub precipitation_probability: Option<PrecipitationProbability>,
    pub wind: Option<Wind>,
    pub uv_index: Option<f64>,
    pub relative_humidity: Option<Ratio>,
    pub dew_point: Option<Temperature>,
    pub pressure: Option<Pressure>,
    pub cloud_cover: Option<Ratio>,
    pub visibility: Option<Distance>,
}

impl Hourly {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            is_daylight: None,
            weather_text: None,
            weather_code: None,
            temperature: None,
            feels_like: None,
            precipitation: None,
            precipitation_probability: None,
            wind: None,
            uv_index: None,
            relative_humidity: None,
            dew_point: None,
            pressure: None,
            cloud_cover: None,
            visibility: None,
        }
    }
}

/// Precipitation nowcast step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minutely {
    pub date: DateTime<Utc>,
    pub minute_interval: u32,
    /// Intensity, as the amount that would fall in one hour.
    pub precipitation_intensity: Option<Precipitation>,
}

/// Climatological normals for the current month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Normals {
    pub month: Option<u32>,
    pub daytime_temperature: Option<Temperature>,
    pub nighttime_temperature: Option<Temperature>,
}

impl Normals {
    pub fn is_empty(&self) -> bool {
        self.daytime_temperature.is_none() && self.nighttime_temperature.is_none()
    }
}
