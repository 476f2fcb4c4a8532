//! Shapes of the China weather API.
//!
//! Daily and hourly forecasts are parallel arrays (`temperature.value[i]`,
//! `weather.value[i]`, ...) that share one index. Numbers arrive as either
//! JSON numbers or strings.

use serde::Deserialize;

use crate::source::lenient_f64;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChinaLocation {
    pub location_key: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaValue {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaNumber(#[serde(deserialize_with = "lenient_f64")] pub Option<f64>);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChinaNumberList {
    pub pub_time: Option<String>,
    #[serde(default)]
    pub value: Vec<ChinaNumber>,
}

/// `from`/`to` pair: max/min temperature, day/night weather code.
#[derive(Debug, Deserialize)]
pub struct ChinaRange {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub from: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub to: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaRangeList {
    #[serde(default)]
    pub value: Vec<ChinaRange>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaSunRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaSunRangeList {
    #[serde(default)]
    pub value: Vec<ChinaSunRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChinaWeatherResult {
    pub current: Option<ChinaCurrent>,
    pub forecast_daily: Option<ChinaForecastDaily>,
    pub forecast_hourly: Option<ChinaForecastHourly>,
    pub aqi: Option<ChinaAqi>,
    #[serde(default)]
    pub alerts: Vec<ChinaAlert>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChinaCurrent {
    pub pub_time: Option<String>,
    pub weather: Option<String>,
    pub temperature: Option<ChinaValue>,
    pub feels_like: Option<ChinaValue>,
    pub humidity: Option<ChinaValue>,
    pub pressure: Option<ChinaValue>,
    pub visibility: Option<ChinaValue>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub uv_index: Option<f64>,
    pub wind: Option<ChinaCurrentWind>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaCurrentWind {
    pub direction: Option<ChinaValue>,
    pub speed: Option<ChinaValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChinaForecastDaily {
    pub pub_time: Option<String>,
    pub temperature: Option<ChinaRangeList>,
    pub weather: Option<ChinaRangeList>,
    pub wind: Option<ChinaDailyWind>,
    pub precipitation_probability: Option<ChinaNumberList>,
    pub sun_rise_set: Option<ChinaSunRangeList>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaDailyWind {
    pub direction: Option<ChinaRangeList>,
    pub speed: Option<ChinaRangeList>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaForecastHourly {
    pub temperature: Option<ChinaNumberList>,
    pub weather: Option<ChinaNumberList>,
    pub wind: Option<ChinaHourlyWindList>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaHourlyWindList {
    #[serde(default)]
    pub value: Vec<ChinaHourlyWind>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaHourlyWind {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub direction: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub speed: Option<f64>,
}

/// Concentrations in µg/m³, CO in mg/m³.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChinaAqi {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pm25: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pm10: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub no2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub so2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub o3: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub co: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChinaAlert {
    pub alert_id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Colour word such as `黄色`.
    pub level: Option<String>,
    pub detail: Option<String>,
    pub pub_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChinaMinutelyResult {
    pub precipitation: Option<ChinaNumberList>,
}
