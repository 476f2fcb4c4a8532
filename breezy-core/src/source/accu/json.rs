//! AccuWeather response shapes.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuLocation {
    pub key: String,
    pub localized_name: Option<String>,
    pub country: Option<AccuNamed>,
    pub administrative_area: Option<AccuNamed>,
    pub parent_city: Option<AccuNamed>,
    pub supplemental_admin_areas: Option<Vec<AccuNamed>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuNamed {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub localized_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuValue {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

/// Observations report every value in both systems.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMetricImperial {
    pub metric: Option<AccuValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuDirection {
    pub degrees: Option<f64>,
    pub localized: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuCurrentWind {
    pub direction: Option<AccuDirection>,
    pub speed: Option<AccuMetricImperial>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuCurrentGust {
    pub speed: Option<AccuMetricImperial>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuCurrent {
    pub epoch_time: Option<i64>,
    pub weather_text: Option<String>,
    pub weather_icon: Option<u32>,
    pub temperature: Option<AccuMetricImperial>,
    pub real_feel_temperature: Option<AccuMetricImperial>,
    pub relative_humidity: Option<f64>,
    pub dew_point: Option<AccuMetricImperial>,
    pub wind: Option<AccuCurrentWind>,
    pub wind_gust: Option<AccuCurrentGust>,
    #[serde(rename = "UVIndex")]
    pub uv_index: Option<f64>,
    pub visibility: Option<AccuMetricImperial>,
    pub cloud_cover: Option<f64>,
    pub pressure: Option<AccuMetricImperial>,
    pub ceiling: Option<AccuMetricImperial>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuForecastDailyResult {
    pub headline: Option<AccuHeadline>,
    #[serde(default)]
    pub daily_forecasts: Vec<AccuForecastDaily>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuHeadline {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuForecastDaily {
    pub epoch_date: i64,
    pub sun: Option<AccuRiseSet>,
    pub temperature: Option<AccuMinMax>,
    pub real_feel_temperature: Option<AccuMinMax>,
    pub hours_of_sun: Option<f64>,
    pub air_and_pollen: Option<Vec<AccuAirAndPollen>>,
    pub day: Option<AccuHalfDay>,
    pub night: Option<AccuHalfDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuRiseSet {
    pub epoch_rise: Option<i64>,
    pub epoch_set: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMinMax {
    pub minimum: Option<AccuValue>,
    pub maximum: Option<AccuValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuForecastWind {
    pub speed: Option<AccuValue>,
    pub direction: Option<AccuDirection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuHalfDay {
    pub icon: Option<u32>,
    pub long_phrase: Option<String>,
    pub icon_phrase: Option<String>,
    pub precipitation_probability: Option<f64>,
    pub thunderstorm_probability: Option<f64>,
    pub rain_probability: Option<f64>,
    pub snow_probability: Option<f64>,
    pub ice_probability: Option<f64>,
    pub wind: Option<AccuForecastWind>,
    pub wind_gust: Option<AccuForecastWind>,
    pub total_liquid: Option<AccuValue>,
    pub rain: Option<AccuValue>,
    pub snow: Option<AccuValue>,
    pub ice: Option<AccuValue>,
    pub cloud_cover: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAirAndPollen {
    pub name: String,
    pub value: Option<f64>,
    pub category_value: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuForecastHourly {
    pub epoch_date_time: i64,
    pub weather_icon: Option<u32>,
    pub icon_phrase: Option<String>,
    pub is_daylight: Option<bool>,
    pub temperature: Option<AccuValue>,
    pub real_feel_temperature: Option<AccuValue>,
    pub dew_point: Option<AccuValue>,
    pub relative_humidity: Option<f64>,
    pub wind: Option<AccuForecastWind>,
    pub wind_gust: Option<AccuForecastWind>,
    #[serde(rename = "UVIndex")]
    pub uv_index: Option<f64>,
    pub visibility: Option<AccuValue>,
    pub cloud_cover: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub thunderstorm_probability: Option<f64>,
    pub rain_probability: Option<f64>,
    pub snow_probability: Option<f64>,
    pub ice_probability: Option<f64>,
    pub total_liquid: Option<AccuValue>,
    pub rain: Option<AccuValue>,
    pub snow: Option<AccuValue>,
    pub ice: Option<AccuValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMinutelyResult {
    pub summary: Option<AccuMinutelySummary>,
    pub intervals: Option<Vec<AccuMinutelyInterval>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMinutelySummary {
    pub phrase: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMinutelyInterval {
    pub start_epoch_date_time: i64,
    pub minute: Option<i32>,
    pub dbz: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAlert {
    pub alert_id: Option<i64>,
    pub description: Option<AccuLocalized>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub color: Option<AccuColor>,
    pub source: Option<String>,
    pub area: Option<Vec<AccuAlertArea>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuLocalized {
    pub localized: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAlertArea {
    pub name: Option<String>,
    pub epoch_start_time: Option<i64>,
    pub epoch_end_time: Option<i64>,
    pub summary: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccuAirQualityResult {
    pub data: Option<Vec<AccuAirQualityData>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuAirQualityData {
    pub epoch_date: i64,
    pub pollutants: Option<Vec<AccuAirQualityPollutant>>,
}

#[derive(Debug, Deserialize)]
pub struct AccuAirQualityPollutant {
    #[serde(rename = "type")]
    pub kind: String,
    pub concentration: AccuAirQualityConcentration,
}

#[derive(Debug, Deserialize)]
pub struct AccuAirQualityConcentration {
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuClimoSummary {
    pub normals: Option<AccuClimoNormals>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuClimoNormals {
    pub temperatures: Option<AccuClimoTemperatures>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuClimoTemperatures {
    pub maximum: Option<AccuMetricImperial>,
    pub minimum: Option<AccuMetricImperial>,
}
