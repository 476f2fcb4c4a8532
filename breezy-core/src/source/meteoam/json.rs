//! MeteoAM meteogram shapes and their typed decoding.
//!
//! The meteogram is column-oriented: `paramlist` names the columns,
//! `timeseries` holds the timestamps and `datasets["0"]` maps a column index
//! (as a string) to one value per timestamp. [`MeteoAmSeries::decode`] turns
//! that into typed columns once, so converters never inspect raw JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::{error::SourceError, source::parse_utc};

#[derive(Debug, Deserialize)]
pub struct MeteoAmMeteogram {
    #[serde(default)]
    pub paramlist: Vec<String>,
    #[serde(default)]
    pub timeseries: Vec<String>,
    #[serde(default)]
    pub datasets: BTreeMap<String, BTreeMap<String, Vec<Value>>>,
    pub extrainfo: Option<MeteoAmExtraInfo>,
}

#[derive(Debug, Deserialize)]
pub struct MeteoAmExtraInfo {
    #[serde(default)]
    pub stats: Vec<MeteoAmDailyStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeteoAmDailyStats {
    pub local_date: String,
    pub max_celsius: Option<f64>,
    pub min_celsius: Option<f64>,
    pub icon: Option<Value>,
    pub max_wind_kmh: Option<f64>,
}

/// One typed value per timestamp and parameter.
#[derive(Debug, Default, PartialEq)]
pub struct MeteoAmSeries {
    pub time: Vec<DateTime<Utc>>,
    pub icon: Vec<Option<String>>,
    /// °C.
    pub temperature: Vec<Option<f64>>,
    /// %.
    pub humidity: Vec<Option<f64>>,
    /// hPa.
    pub pressure: Vec<Option<f64>>,
    /// %.
    pub precipitation_probability: Vec<Option<f64>>,
    /// Degrees.
    pub wind_direction: Vec<Option<f64>>,
    /// km/h.
    pub wind_speed: Vec<Option<f64>>,
}

/// Icons arrive as `"01"` or `1`.
pub fn icon_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(format!("{:0>2}", s.trim())),
        Value::Number(n) => n.as_u64().map(|n| format!("{n:02}")),
        _ => None,
    }
}

fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

impl MeteoAmSeries {
    pub fn decode(raw: &MeteoAmMeteogram) -> Result<Self, SourceError> {
        let dataset = raw
            .datasets
            .get("0")
            .ok_or_else(|| SourceError::ParseError("meteogram has no dataset 0".to_string()))?;

        // Timestamps that fail to parse drop their whole row.
        let rows: Vec<(usize, DateTime<Utc>)> = raw
            .timeseries
            .iter()
            .enumerate()
            .filter_map(|(i, t)| parse_utc(t).map(|t| (i, t)))
            .collect();

        let column = |name: &str| -> Option<&Vec<Value>> {
            let index = raw.paramlist.iter().position(|p| p == name)?;
            dataset.get(&index.to_string())
        };
        let numbers = |name: &str| -> Vec<Option<f64>> {
            let values = column(name);
            rows.iter()
                .map(|(i, _)| values.and_then(|v| v.get(*i)).and_then(number_value))
                .collect()
        };

        let icons = column("icon");
        Ok(Self {
            time: rows.iter().map(|(_, t)| *t).collect(),
            icon: rows
                .iter()
                .map(|(i, _)| icons.and_then(|v| v.get(*i)).and_then(icon_value))
                .collect(),
            temperature: numbers("2t"),
            humidity: numbers("r"),
            pressure: numbers("pmsl"),
            precipitation_probability: numbers("tpp"),
            wind_direction: numbers("wdir"),
            wind_speed: numbers("wkmh"),
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_columns_by_name() {
        let raw: MeteoAmMeteogram = serde_json::from_value(json!({
            "paramlist": ["wkmh", "2t", "icon", "tpp"],
            "timeseries": ["2025-07-01T10:00:00Z", "garbage", "2025-07-01T11:00:00Z"],
            "datasets": { "0": {
                "0": [10, 12, "14.5"],
                "1": [25.3, 25.9, null],
                "2": ["1", 3, "03"]
            }}
        }))
        .unwrap();

        let series = MeteoAmSeries::decode(&raw).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.wind_speed, vec![Some(10.0), Some(14.5)]);
        assert_eq!(series.temperature, vec![Some(25.3), None]);
        assert_eq!(series.icon, vec![Some("01".to_string()), Some("03".to_string())]);
        // Listed but absent column, and unlisted column.
        assert_eq!(series.precipitation_probability, vec![None, None]);
        assert_eq!(series.humidity, vec![None, None]);
    }

    #[test]
    fn missing_dataset_is_a_parse_error() {
        let raw: MeteoAmMeteogram = serde_json::from_value(json!({ "paramlist": [] })).unwrap();
        assert!(matches!(
            MeteoAmSeries::decode(&raw),
            Err(SourceError::ParseError(_))
        ));
    }
}
