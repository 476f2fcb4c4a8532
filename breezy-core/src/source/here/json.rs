//! HERE Destination Weather v3 and reverse geocoding shapes.
//!
//! The report endpoint sends many numbers as strings (`"highTemperature":
//! "18.0"`), so numeric fields go through [`lenient_f64`].

use serde::Deserialize;

use crate::source::lenient_f64;

#[derive(Debug, Deserialize)]
pub struct HereReport {
    #[serde(default)]
    pub places: Vec<HerePlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HerePlace {
    pub observations: Option<Vec<HereObservation>>,
    pub daily_forecasts: Option<Vec<HereForecastBlock<HereDaily>>>,
    pub hourly_forecasts: Option<Vec<HereForecastBlock<HereHourly>>>,
    pub nws_alerts: Option<HereNwsAlerts>,
}

#[derive(Debug, Deserialize)]
pub struct HereForecastBlock<T> {
    #[serde(default = "Vec::new")]
    pub forecasts: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HereObservation {
    pub time: Option<String>,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub comfort: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dew_point: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wind_direction: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub uv_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub visibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub barometer_pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HereDaily {
    pub time: String,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub high_temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub low_temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precipitation_probability: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rain_fall: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub snow_fall: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wind_direction: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub uv_index: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HereHourly {
    pub time: String,
    pub daylight: Option<String>,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub comfort: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dew_point: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precipitation_probability: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rain_fall: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub snow_fall: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wind_direction: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub uv_index: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub visibility: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HereNwsAlerts {
    #[serde(default)]
    pub warnings: Vec<HereNwsAlert>,
    #[serde(default)]
    pub watches: Vec<HereNwsAlert>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HereNwsAlert {
    pub name: Option<String>,
    pub description: Option<String>,
    pub message: Option<String>,
    /// NWS significance letter: W(arning), A (watch), Y (advisory), S(tatement).
    pub significance: Option<String>,
    pub valid_from_time_local: Option<String>,
    pub valid_until_time_local: Option<String>,
    #[serde(default)]
    pub county: Vec<HereCounty>,
}

#[derive(Debug, Deserialize)]
pub struct HereCounty {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HereRevGeocode {
    #[serde(default)]
    pub items: Vec<HereRevGeocodeItem>,
}

#[derive(Debug, Deserialize)]
pub struct HereRevGeocodeItem {
    pub address: HereAddress,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HereAddress {
    /// ISO 3166-1 alpha-3.
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
}
