use chrono::NaiveDate;
use tracing::debug;

use super::json::{ClimWebAlert, ClimWebCities, ClimWebDailyForecast};
use crate::{
    error::SourceError,
    geo::{self, Coordinates, Geometry},
    model::{
        Alert, AlertSeverity, Daily, HalfDay, PrecipitationProbability, PrecipitationTotals,
        WeatherCode, Wind, sort_alerts, synthesize_alert_id,
    },
    source::parse_utc,
    units::{Precipitation, Ratio, Speed, SpeedUnit, Temperature},
};

/// Cities further away than this are not a match.
pub const MAX_CITY_DISTANCE_M: f64 = 150_000.0;

pub fn weather_code(condition: Option<&str>) -> Option<WeatherCode> {
    let condition = condition?.to_ascii_lowercase();
    let code = match condition.as_str() {
        c if c.contains("thunder") => WeatherCode::Thunderstorm,
        c if c.contains("hail") => WeatherCode::Hail,
        c if c.contains("sleet") => WeatherCode::Sleet,
        c if c.contains("snow") => WeatherCode::Snow,
        c if c.contains("rain") || c.contains("shower") || c.contains("drizzle") => {
            WeatherCode::Rain
        }
        c if c.contains("fog") || c.contains("mist") => WeatherCode::Fog,
        c if c.contains("haze") || c.contains("dust") || c.contains("smoke") => WeatherCode::Haze,
        c if c.contains("wind") => WeatherCode::Wind,
        c if c.contains("partly") || c.contains("few_clouds") || c.contains("scattered") => {
            WeatherCode::PartlyCloudy
        }
        c if c.contains("cloud") || c.contains("overcast") => WeatherCode::Cloudy,
        c if c.contains("clear") || c.contains("sunny") || c.contains("fair") => WeatherCode::Clear,
        _ => return None,
    };
    Some(code)
}

fn city_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Id of the city nearest to `target`, within [`MAX_CITY_DISTANCE_M`].
pub fn nearest_city(cities: &ClimWebCities, target: Coordinates) -> Result<String, SourceError> {
    let candidates = cities.features.iter().filter_map(|city| {
        let id = city_id(&city.properties.id)?;
        match city.geometry.as_ref()?.coordinates.as_slice() {
            [lon, lat, ..] => Some((id, Coordinates::new(*lat, *lon))),
            _ => None,
        }
    });

    geo::nearest_within(target, candidates, MAX_CITY_DISTANCE_M).ok_or_else(|| {
        SourceError::LocationNotFound(format!(
            "no city within {} km of {:.4},{:.4}",
            MAX_CITY_DISTANCE_M / 1000.0,
            target.latitude,
            target.longitude
        ))
    })
}

fn half(forecast: &ClimWebDailyForecast, temperature: Option<f64>, is_day: bool) -> Option<HalfDay> {
    let celsius = temperature.filter(|t| t.is_finite()).map(Temperature::from_celsius);
    let half = if is_day {
        HalfDay {
            weather_text: forecast.condition_label.clone(),
            weather_code: weather_code(forecast.condition.as_deref()),
            temperature: celsius,
            feels_like: None,
            precipitation: PrecipitationTotals::total(
                forecast
                    .rainfall
                    .filter(|r| r.is_finite())
                    .map(Precipitation::from_millimeters),
            )
            .non_empty(),
            precipitation_probability: PrecipitationProbability::total(
                forecast
                    .rain_probability
                    .filter(|p| p.is_finite())
                    .map(Ratio::from_percent),
            )
            .non_empty(),
            wind: Wind {
                degree: forecast.wind_direction,
                speed: Speed::from_unit_opt(forecast.wind_speed, SpeedUnit::KilometersPerHour),
                gusts: None,
            }
            .non_empty(),
            cloud_cover: None,
        }
    } else {
        HalfDay {
            temperature: celsius,
            ..HalfDay::default()
        }
    };
    (!half.is_empty()).then_some(half)
}

pub fn convert_daily(forecasts: &[ClimWebDailyForecast]) -> Result<Vec<Daily>, SourceError> {
    let daily: Vec<Daily> = forecasts
        .iter()
        .filter_map(|forecast| {
            let date = NaiveDate::parse_from_str(forecast.date.trim(), "%Y-%m-%d").ok()?;
            let mut daily = Daily::new(date);
            daily.day = half(forecast, forecast.max_temp, true);
            daily.night = half(forecast, forecast.min_temp, false);
            Some(daily)
        })
        .collect();

    if daily.is_empty() {
        return Err(SourceError::InvalidData(
            "ClimWeb returned no usable forecast days".to_string(),
        ));
    }
    Ok(daily)
}

/// Alerts whose area contains `point`.
///
/// Areas with unparseable geometry are skipped rather than failing the
/// whole list.
pub fn convert_alerts(alerts: &[ClimWebAlert], point: Coordinates) -> Vec<Alert> {
    let mut converted: Vec<Alert> = alerts
        .iter()
        .filter_map(|alert| {
            let regions = alert.areas.iter().filter_map(|area| {
                let raw = area.geojson.as_deref()?;
                match Geometry::from_json_str(raw) {
                    Ok(geometry) => Some((area.area_desc.clone().unwrap_or_default(), geometry)),
                    Err(err) => {
                        debug!(error = %err, "Skipping ClimWeb alert area");
                        None
                    }
                }
            });
            let matched = geo::matching_regions(point, regions);
            let area = matched.first()?;

            let onset = alert.onset.as_deref().and_then(parse_utc);
            let id = alert.identifier.clone().unwrap_or_else(|| {
                synthesize_alert_id(alert.event.as_deref().unwrap_or_default(), area, onset)
            });

            let mut converted = Alert::new(
                id,
                alert
                    .severity
                    .as_deref()
                    .map(AlertSeverity::from_cap)
                    .unwrap_or_default(),
            );
            converted.start_date = onset;
            converted.end_date = alert.expires.as_deref().and_then(parse_utc);
            converted.headline = alert.headline.clone().or_else(|| alert.event.clone());
            converted.description = alert.description.clone();
            converted.instruction = alert.instruction.clone();
            converted.source = alert.sender_name.clone();
            Some(converted)
        })
        .collect();
    sort_alerts(&mut converted);
    converted
}
