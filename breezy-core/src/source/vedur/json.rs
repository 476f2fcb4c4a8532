//! Veðurstofa Íslands forecast and CAP broker shapes.
//!
//! Station forecasts are all strings, numbers included.

use serde::Deserialize;

use crate::source::lenient_f64;

#[derive(Debug, Deserialize)]
pub struct VedurStation {
    pub id: String,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct VedurForecastResult {
    #[serde(default)]
    pub forecasts: Vec<VedurStationForecast>,
}

#[derive(Debug, Deserialize)]
pub struct VedurStationForecast {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub forecast: Vec<VedurForecastStep>,
}

/// One step. `D` is an Icelandic compass name such as `"NA"` or `"Logn"`.
#[derive(Debug, Deserialize)]
pub struct VedurForecastStep {
    pub ftime: String,
    #[serde(rename = "T", default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(rename = "F", default, deserialize_with = "lenient_f64")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "D")]
    pub wind_direction: Option<String>,
    #[serde(rename = "W")]
    pub weather: Option<String>,
    #[serde(rename = "R", default, deserialize_with = "lenient_f64")]
    pub precipitation: Option<f64>,
    #[serde(rename = "N", default, deserialize_with = "lenient_f64")]
    pub cloud_cover: Option<f64>,
    #[serde(rename = "TD", default, deserialize_with = "lenient_f64")]
    pub dew_point: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct VedurCapAlert {
    pub identifier: String,
    #[serde(default)]
    pub info: Vec<VedurCapInfo>,
}

#[derive(Debug, Deserialize)]
pub struct VedurCapInfo {
    pub language: Option<String>,
    pub event: Option<String>,
    pub severity: Option<String>,
    pub onset: Option<String>,
    pub expires: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    #[serde(rename = "senderName")]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub area: Vec<VedurCapArea>,
}

#[derive(Debug, Deserialize)]
pub struct VedurCapArea {
    #[serde(rename = "areaDesc")]
    pub area_desc: Option<String>,
    /// Space-separated `lat,lon` pairs.
    #[serde(default)]
    pub polygon: Vec<String>,
}
