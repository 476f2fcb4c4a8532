use chrono::{DateTime, Utc};
use tracing::debug;

use super::json::{VedurCapAlert, VedurCapInfo, VedurForecastResult, VedurForecastStep, VedurStation};
use crate::{
    completion,
    error::SourceError,
    geo::{self, Coordinates, Geometry, Polygon},
    model::{
        Alert, AlertSeverity, Feature, FeatureSet, Hourly, Location, PrecipitationTotals,
        WeatherCode, WeatherWrapper, Wind, sort_alerts,
    },
    source::parse_utc,
    units::{Precipitation, Ratio, Speed, SpeedUnit, Temperature},
};

/// Stations further away than this are not a match.
pub const MAX_STATION_DISTANCE_M: f64 = 100_000.0;

pub fn nearest_station(stations: &[VedurStation], target: Coordinates) -> Result<String, SourceError> {
    let candidates = stations
        .iter()
        .map(|s| (s.id.clone(), Coordinates::new(s.lat, s.lon)));
    geo::nearest_within(target, candidates, MAX_STATION_DISTANCE_M).ok_or_else(|| {
        SourceError::LocationNotFound(format!(
            "no Veður station within {} km",
            MAX_STATION_DISTANCE_M / 1000.0
        ))
    })
}

/// Degrees for an Icelandic (`NA`, `ASA`, `V`) or English compass name.
/// `Logn` (calm) has no direction.
pub fn wind_degree(raw: &str) -> Option<f64> {
    let english: String = raw
        .trim()
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'A' => 'E',
            'V' => 'W',
            other => other,
        })
        .collect();
    Wind::degree_from_compass(&english)
}

/// Forecast texts come in Icelandic or English depending on `lang`.
pub fn weather_code(text: Option<&str>) -> Option<WeatherCode> {
    let text = text?.trim().to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
    let code = if has(&["þrum", "thunder"]) {
        WeatherCode::Thunderstorm
    } else if has(&["hagl", "hail"]) {
        WeatherCode::Hail
    } else if has(&["slyd", "sleet"]) {
        WeatherCode::Sleet
    } else if has(&["snj", "él", "skafrenn", "snow"]) {
        WeatherCode::Snow
    } else if has(&["rign", "skúr", "súld", "rain", "drizzle", "shower"]) {
        WeatherCode::Rain
    } else if has(&["mistur", "sandfok", "moldrok", "haze", "dust"]) {
        WeatherCode::Haze
    } else if has(&["þok", "fog", "mist"]) {
        WeatherCode::Fog
    } else if has(&["léttskýjað", "partly"]) {
        WeatherCode::PartlyCloudy
    } else if has(&["skýjað", "cloud", "overcast"]) {
        WeatherCode::Cloudy
    } else if has(&["heiðskírt", "clear", "sunny"]) {
        WeatherCode::Clear
    } else {
        return None;
    };
    Some(code)
}

fn convert_step(step: &VedurForecastStep) -> Option<Hourly> {
    let mut hourly = Hourly::new(parse_utc(&step.ftime)?);
    hourly.weather_text = step.weather.clone().filter(|w| !w.trim().is_empty());
    hourly.weather_code = weather_code(step.weather.as_deref());
    hourly.temperature = step.temperature.filter(|t| t.is_finite()).map(Temperature::from_celsius);
    hourly.dew_point = step.dew_point.filter(|t| t.is_finite()).map(Temperature::from_celsius);
    hourly.cloud_cover = step.cloud_cover.filter(|c| c.is_finite()).map(Ratio::from_percent);
    hourly.precipitation = PrecipitationTotals::total(
        step.precipitation
            .filter(|p| p.is_finite())
            .map(Precipitation::from_millimeters),
    )
    .non_empty();
    hourly.wind = Wind {
        degree: step.wind_direction.as_deref().and_then(wind_degree),
        speed: Speed::from_unit_opt(step.wind_speed, SpeedUnit::MetersPerSecond),
        gusts: None,
    }
    .non_empty();
    Some(hourly)
}

pub fn convert_hourly(result: &VedurForecastResult) -> Vec<Hourly> {
    result
        .forecasts
        .first()
        .map(|station| station.forecast.iter().filter_map(convert_step).collect())
        .unwrap_or_default()
}

pub fn convert_forecast(
    result: &VedurForecastResult,
    location: &Location,
    features: &FeatureSet,
    now: DateTime<Utc>,
) -> Result<WeatherWrapper, SourceError> {
    let hourly = convert_hourly(result);
    if hourly.iter().all(|h| h.temperature.is_none()) {
        return Err(SourceError::InvalidData(
            "Veður station forecast has no temperatures".to_string(),
        ));
    }

    let mut wrapper = WeatherWrapper::default();
    if features.contains(&Feature::Current) {
        wrapper.current = completion::current_from_hourly(&hourly, now);
    }
    if features.contains(&Feature::Forecast) {
        wrapper.daily_forecast = Some(completion::daily_from_hourly(&hourly, location));
        wrapper.hourly_forecast = Some(hourly);
    }
    Ok(wrapper)
}

/// The `info` block in `language`, or the first one.
fn pick_info<'a>(alert: &'a VedurCapAlert, language: &str) -> Option<&'a VedurCapInfo> {
    alert
        .info
        .iter()
        .find(|info| {
            info.language
                .as_deref()
                .is_some_and(|l| l.to_ascii_lowercase().starts_with(language))
        })
        .or_else(|| alert.info.first())
}

/// Alerts with at least one polygon containing `point`.
pub fn convert_alerts(alerts: &[VedurCapAlert], point: Coordinates, language: &str) -> Vec<Alert> {
    let mut converted: Vec<Alert> = alerts
        .iter()
        .filter_map(|alert| {
            let info = pick_info(alert, language)?;
            let regions = info.area.iter().flat_map(|area| {
                area.polygon.iter().filter_map(move |raw| match Polygon::from_cap_string(raw) {
                    Ok(polygon) => Some((area.area_desc.clone(), Geometry::Polygon(polygon))),
                    Err(err) => {
                        debug!(error = %err, "Skipping Veður alert polygon");
                        None
                    }
                })
            });
            if geo::matching_regions(point, regions).is_empty() {
                return None;
            }

            let mut converted = Alert::new(
                alert.identifier.clone(),
                info.severity
                    .as_deref()
                    .map(AlertSeverity::from_cap)
                    .unwrap_or_default(),
            );
            converted.start_date = info.onset.as_deref().and_then(parse_utc);
            converted.end_date = info.expires.as_deref().and_then(parse_utc);
            converted.headline = info.headline.clone().or_else(|| info.event.clone());
            converted.description = info.description.clone();
            converted.instruction = info.instruction.clone();
            converted.source = info
                .sender_name
                .clone()
                .or_else(|| Some("Veðurstofa Íslands".to_string()));
            Some(converted)
        })
        .collect();
    sort_alerts(&mut converted);
    converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reykjavik() -> Location {
        Location::new(64.1466, -21.9426, chrono_tz::Atlantic::Reykjavik).with_country_code("IS")
    }

    #[test]
    fn icelandic_compass() {
        assert_eq!(wind_degree("N"), Some(0.0));
        assert_eq!(wind_degree("A"), Some(90.0));
        assert_eq!(wind_degree("SV"), Some(225.0));
        assert_eq!(wind_degree("ANA"), Some(67.5));
        assert_eq!(wind_degree("NNW"), Some(337.5));
        assert_eq!(wind_degree("Logn"), None);
    }

    #[test]
    fn weather_texts() {
        assert_eq!(weather_code(Some("Léttskýjað")), Some(WeatherCode::PartlyCloudy));
        assert_eq!(weather_code(Some("Alskýjað")), Some(WeatherCode::Cloudy));
        assert_eq!(weather_code(Some("Slydduél")), Some(WeatherCode::Sleet));
        assert_eq!(weather_code(Some("Snjóél")), Some(WeatherCode::Snow));
        assert_eq!(weather_code(Some("Lítils háttar rigning")), Some(WeatherCode::Rain));
        assert_eq!(weather_code(Some("Mistur")), Some(WeatherCode::Haze));
        assert_eq!(weather_code(Some("Þoka")), Some(WeatherCode::Fog));
        assert_eq!(weather_code(Some("Clear sky")), Some(WeatherCode::Clear));
        assert_eq!(weather_code(Some("")), None);
    }

    #[test]
    fn nearest_station_within_range() {
        let stations: Vec<VedurStation> = serde_json::from_value(json!([
            { "id": "1", "name": "Reykjavík", "lat": 64.1275, "lon": -21.9028 },
            { "id": "422", "name": "Akureyri", "lat": 65.6856, "lon": -18.1002 }
        ]))
        .unwrap();
        assert_eq!(nearest_station(&stations, reykjavik().coordinates()).unwrap(), "1");
        assert!(nearest_station(&stations, Coordinates::new(48.85, 2.35))
            .unwrap_err()
            .is_location_error());
    }

    #[test]
    fn station_forecast() {
        let result: VedurForecastResult = serde_json::from_value(json!({
            "forecasts": [{
                "id": "1",
                "name": "Reykjavík",
                "forecast": [
                    { "ftime": "2025-03-01 12:00:00", "T": "3", "F": "7", "D": "NA", "W": "Skýjað", "R": "0.0" },
                    { "ftime": "2025-03-01 13:00:00", "T": "4", "F": "0", "D": "Logn", "W": "Rigning", "R": "1.2" },
                    { "ftime": "bad", "T": "5" }
                ]
            }]
        }))
        .unwrap();
        let features: FeatureSet = [Feature::Current, Feature::Forecast].into();
        let now = parse_utc("2025-03-01T12:30:00Z").unwrap();
        let wrapper = convert_forecast(&result, &reykjavik(), &features, now).unwrap();

        let hourly = wrapper.hourly_forecast.as_ref().unwrap();
        assert_eq!(hourly.len(), 2);
        let wind = hourly[0].wind.as_ref().unwrap();
        assert_eq!(wind.direction_name(), Some("NE"));
        assert_eq!(wind.speed, Some(Speed::from_unit(7.0, SpeedUnit::MetersPerSecond)));
        assert!(hourly[1].wind.as_ref().unwrap().is_calm());

        let current = wrapper.current.unwrap();
        assert_eq!(current.weather_code, Some(WeatherCode::Cloudy));
        assert_eq!(current.weather_text.as_deref(), Some("Skýjað"));

        let daily = wrapper.daily_forecast.unwrap();
        assert_eq!(daily[0].max_temperature(), Some(Temperature::from_celsius(4.0)));

        let empty: VedurForecastResult = serde_json::from_value(json!({ "forecasts": [] })).unwrap();
        assert!(matches!(
            convert_forecast(&empty, &reykjavik(), &features, now),
            Err(SourceError::InvalidData(_))
        ));
    }

    #[test]
    fn alerts_match_cap_polygons() {
        let alerts: Vec<VedurCapAlert> = serde_json::from_value(json!([
            {
                "identifier": "2.49.0.0.352.0.IS.250301.1",
                "info": [
                    {
                        "language": "is-IS",
                        "event": "Vindur",
                        "severity": "Moderate",
                        "headline": "Gul viðvörun",
                        "area": [{ "areaDesc": "Höfuðborgarsvæðið", "polygon": ["63.9,-22.8 64.4,-22.8 64.4,-21.0 63.9,-21.0 63.9,-22.8"] }]
                    },
                    {
                        "language": "en-US",
                        "event": "Wind",
                        "severity": "Moderate",
                        "headline": "Yellow warning",
                        "onset": "2025-03-01T06:00:00+00:00",
                        "area": [{ "areaDesc": "Capital region", "polygon": ["bad", "63.9,-22.8 64.4,-22.8 64.4,-21.0 63.9,-21.0 63.9,-22.8"] }]
                    }
                ]
            },
            {
                "identifier": "north",
                "info": [{
                    "language": "en-US",
                    "severity": "Severe",
                    "area": [{ "areaDesc": "North", "polygon": ["65.5,-18.5 66.0,-18.5 66.0,-17.5 65.5,-17.5"] }]
                }]
            }
        ]))
        .unwrap();

        let point = reykjavik().coordinates();
        let english = convert_alerts(&alerts, point, "en");
        assert_eq!(english.len(), 1);
        assert_eq!(english[0].headline.as_deref(), Some("Yellow warning"));
        assert_eq!(english[0].severity, AlertSeverity::Moderate);
        assert!(english[0].start_date.is_some());

        let icelandic = convert_alerts(&alerts, point, "is");
        assert_eq!(icelandic[0].headline.as_deref(), Some("Gul viðvörun"));
        assert_eq!(icelandic[0].source.as_deref(), Some("Veðurstofa Íslands"));
    }
}
