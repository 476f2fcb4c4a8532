//! ClimWeb API shapes, shared by every national instance.

use serde::Deserialize;

/// `api/cities`: a GeoJSON FeatureCollection of points.
#[derive(Debug, Deserialize)]
pub struct ClimWebCities {
    #[serde(default)]
    pub features: Vec<ClimWebCity>,
}

#[derive(Debug, Deserialize)]
pub struct ClimWebCity {
    pub properties: ClimWebCityProperties,
    pub geometry: Option<ClimWebPoint>,
}

#[derive(Debug, Deserialize)]
pub struct ClimWebCityProperties {
    pub id: serde_json::Value,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClimWebPoint {
    /// `[longitude, latitude]`.
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ClimWebForecastResult {
    #[serde(default)]
    pub forecasts: Vec<ClimWebDailyForecast>,
}

#[derive(Debug, Deserialize)]
pub struct ClimWebDailyForecast {
    pub date: String,
    pub condition: Option<String>,
    pub condition_label: Option<String>,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    /// km/h.
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub humidity: Option<f64>,
    pub rain_probability: Option<f64>,
    /// mm.
    pub rainfall: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ClimWebAlert {
    pub identifier: Option<String>,
    pub event: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub severity: Option<String>,
    pub sender_name: Option<String>,
    pub onset: Option<String>,
    pub expires: Option<String>,
    #[serde(default)]
    pub areas: Vec<ClimWebAlertArea>,
}

#[derive(Debug, Deserialize)]
pub struct ClimWebAlertArea {
    #[serde(rename = "areaDesc")]
    pub area_desc: Option<String>,
    /// GeoJSON geometry serialised into a string.
    pub geojson: Option<String>,
}
