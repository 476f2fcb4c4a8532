//! MET Norway response shapes (locationforecast, nowcast, airqualityforecast,
//! metalerts).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MetNoForecastResult {
    pub properties: Option<MetNoForecastProperties>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoForecastProperties {
    #[serde(default)]
    pub timeseries: Vec<MetNoTimestep>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoTimestep {
    pub time: String,
    pub data: MetNoTimestepData,
}

#[derive(Debug, Deserialize)]
pub struct MetNoTimestepData {
    pub instant: Option<MetNoInstant>,
    pub next_1_hours: Option<MetNoPeriod>,
    pub next_6_hours: Option<MetNoPeriod>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoInstant {
    pub details: Option<MetNoInstantDetails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetNoInstantDetails {
    pub air_temperature: Option<f64>,
    pub air_pressure_at_sea_level: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub dew_point_temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_speed_of_gust: Option<f64>,
    pub wind_from_direction: Option<f64>,
    pub cloud_area_fraction: Option<f64>,
    pub ultraviolet_index_clear_sky: Option<f64>,
    /// Nowcast only, mm/h.
    pub precipitation_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoPeriod {
    pub summary: Option<MetNoSummary>,
    pub details: Option<MetNoPeriodDetails>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoSummary {
    pub symbol_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoPeriodDetails {
    pub precipitation_amount: Option<f64>,
    pub probability_of_precipitation: Option<f64>,
    pub probability_of_thunder: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAirQualityResult {
    pub data: Option<MetNoAirQualityData>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAirQualityData {
    #[serde(default)]
    pub time: Vec<MetNoAirQualityTime>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAirQualityTime {
    pub from: String,
    pub variables: Option<MetNoAirQualityVariables>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAirQualityVariables {
    pub pm25_concentration: Option<MetNoAirQualityValue>,
    pub pm10_concentration: Option<MetNoAirQualityValue>,
    pub no2_concentration: Option<MetNoAirQualityValue>,
    pub o3_concentration: Option<MetNoAirQualityValue>,
    pub so2_concentration: Option<MetNoAirQualityValue>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAirQualityValue {
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAlertsResult {
    #[serde(default)]
    pub features: Vec<MetNoAlertFeature>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAlertFeature {
    pub properties: MetNoAlertProperties,
    pub when: Option<MetNoAlertWhen>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAlertProperties {
    pub id: Option<String>,
    pub title: Option<String>,
    pub event: Option<String>,
    pub area: Option<String>,
    pub severity: Option<String>,
    /// `"2; yellow; Moderate"`.
    pub awareness_level: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub consequences: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetNoAlertWhen {
    #[serde(default)]
    pub interval: Vec<String>,
}
