//! MET Norway responses to the canonical model.
//!
//! Locationforecast steps are hourly for about two days and six-hourly after
//! that. Each step takes its symbol and precipitation from the period that
//! follows it, so six-hour amounts still sum correctly per day half.

use chrono::{DateTime, Utc};

use super::json::{
    MetNoAirQualityResult, MetNoAlertsResult, MetNoForecastResult, MetNoPeriod, MetNoTimestep,
};
use crate::{
    completion,
    error::SourceError,
    model::{
        AirQuality, AirQualityWrapper, Alert, AlertSeverity, Feature, FeatureSet, Hourly,
        Location, Minutely, Pollutant, PrecipitationProbability, PrecipitationTotals, WeatherCode,
        WeatherWrapper, Wind, synthesize_alert_id,
    },
    source::parse_utc,
    units::{Precipitation, Pressure, Ratio, Speed, SpeedUnit, Temperature},
};

/// Symbol codes look like `lightrainshowers_day`; the suffix is dropped.
pub fn weather_code(symbol: Option<&str>) -> Option<WeatherCode> {
    let base = symbol?.split('_').next()?;
    let code = match base {
        s if s.contains("thunder") => WeatherCode::Thunderstorm,
        "clearsky" => WeatherCode::Clear,
        "fair" | "partlycloudy" => WeatherCode::PartlyCloudy,
        "cloudy" => WeatherCode::Cloudy,
        "fog" => WeatherCode::Fog,
        s if s.contains("sleet") => WeatherCode::Sleet,
        s if s.contains("snow") => WeatherCode::Snow,
        s if s.contains("rain") => WeatherCode::Rain,
        _ => return None,
    };
    Some(code)
}

fn percent(v: Option<f64>) -> Option<Ratio> {
    v.filter(|p| p.is_finite()).map(Ratio::from_percent)
}

fn convert_step(step: &MetNoTimestep) -> Option<Hourly> {
    let mut hourly = Hourly::new(parse_utc(&step.time)?);
    let details = step
        .data
        .instant
        .as_ref()
        .and_then(|i| i.details.as_ref());

    if let Some(d) = details {
        hourly.temperature = d.air_temperature.filter(|t| t.is_finite()).map(Temperature::from_celsius);
        hourly.dew_point = d
            .dew_point_temperature
            .filter(|t| t.is_finite())
            .map(Temperature::from_celsius);
        hourly.pressure = d
            .air_pressure_at_sea_level
            .filter(|p| p.is_finite())
            .map(Pressure::from_hectopascals);
        hourly.relative_humidity = percent(d.relative_humidity);
        hourly.cloud_cover = percent(d.cloud_area_fraction);
        hourly.uv_index = d.ultraviolet_index_clear_sky;
        hourly.wind = Wind {
            degree: d.wind_from_direction,
            speed: Speed::from_unit_opt(d.wind_speed, SpeedUnit::MetersPerSecond),
            gusts: Speed::from_unit_opt(d.wind_speed_of_gust, SpeedUnit::MetersPerSecond),
        }
        .non_empty();
    }

    let period: Option<&MetNoPeriod> = step
        .data
        .next_1_hours
        .as_ref()
        .or(step.data.next_6_hours.as_ref());
    if let Some(period) = period {
        let symbol = period.summary.as_ref().and_then(|s| s.symbol_code.as_deref());
        hourly.weather_code = weather_code(symbol);
        hourly.is_daylight = symbol.map(|s| !s.ends_with("_night"));
        if let Some(d) = &period.details {
            hourly.precipitation = PrecipitationTotals::total(
                d.precipitation_amount
                    .filter(|v| v.is_finite())
                    .map(Precipitation::from_millimeters),
            )
            .non_empty();
            hourly.precipitation_probability = PrecipitationProbability {
                total: percent(d.probability_of_precipitation),
                thunderstorm: percent(d.probability_of_thunder),
                ..PrecipitationProbability::default()
            }
            .non_empty();
        }
    }

    Some(hourly)
}

pub fn convert_hourly(result: &MetNoForecastResult) -> Vec<Hourly> {
    result
        .properties
        .as_ref()
        .map(|p| p.timeseries.iter().filter_map(convert_step).collect())
        .unwrap_or_default()
}

/// Current and forecast derived from the timeseries.
pub fn convert_forecast(
    result: &MetNoForecastResult,
    location: &Location,
    features: &FeatureSet,
    now: DateTime<Utc>,
) -> Result<WeatherWrapper, SourceError> {
    let hourly = convert_hourly(result);
    if hourly.is_empty() {
        return Err(SourceError::InvalidData(
            "MET Norway returned an empty timeseries".to_string(),
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

/// Nowcast steps are five minutes apart; intensity is already mm/h.
pub fn convert_nowcast(result: &MetNoForecastResult) -> Vec<Minutely> {
    let Some(properties) = &result.properties else {
        return Vec::new();
    };
    properties
        .timeseries
        .iter()
        .filter_map(|step| {
            let rate = step
                .data
                .instant
                .as_ref()
                .and_then(|i| i.details.as_ref())
                .and_then(|d| d.precipitation_rate)
                .filter(|r| r.is_finite());
            Some(Minutely {
                date: parse_utc(&step.time)?,
                minute_interval: 5,
                precipitation_intensity: rate.map(Precipitation::from_millimeters),
            })
        })
        .collect()
}

pub fn convert_air_quality(result: &MetNoAirQualityResult, location: &Location) -> AirQualityWrapper {
    let mut wrapper = AirQualityWrapper::default();
    let times = result.data.as_ref().map(|d| d.time.as_slice()).unwrap_or_default();

    for time in times {
        let (Some(date), Some(variables)) = (parse_utc(&time.from), &time.variables) else {
            continue;
        };
        let mut aq = AirQuality::default();
        for (pollutant, value) in [
            (Pollutant::Pm25, &variables.pm25_concentration),
            (Pollutant::Pm10, &variables.pm10_concentration),
            (Pollutant::No2, &variables.no2_concentration),
            (Pollutant::O3, &variables.o3_concentration),
            (Pollutant::So2, &variables.so2_concentration),
        ] {
            aq.set(pollutant, value.as_ref().and_then(|v| v.value));
        }
        wrapper.add_hourly(date, aq, location);
    }

    wrapper.current = wrapper.hourly.values().next().cloned();
    wrapper
}

/// Severity from `"2; yellow; Moderate"`, falling back to the CAP field.
fn alert_severity(awareness: Option<&str>, severity: Option<&str>) -> AlertSeverity {
    let from_awareness = awareness
        .and_then(|a| a.split(';').nth(1))
        .map(AlertSeverity::from_color_word)
        .filter(|s| *s != AlertSeverity::Unknown);
    from_awareness.unwrap_or_else(|| severity.map(AlertSeverity::from_cap).unwrap_or_default())
}

pub fn convert_alerts(result: &MetNoAlertsResult) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = result
        .features
        .iter()
        .map(|feature| {
            let p = &feature.properties;
            let interval = feature.when.as_ref().map(|w| w.interval.as_slice());
            let start = interval.and_then(|i| i.first()).and_then(|s| parse_utc(s));
            let end = interval.and_then(|i| i.get(1)).and_then(|s| parse_utc(s));

            let id = p.id.clone().unwrap_or_else(|| {
                synthesize_alert_id(
                    p.event.as_deref().unwrap_or_default(),
                    p.area.as_deref().unwrap_or_default(),
                    start,
                )
            });
            let mut alert = Alert::new(
                id,
                alert_severity(p.awareness_level.as_deref(), p.severity.as_deref()),
            );
            alert.start_date = start;
            alert.end_date = end;
            alert.headline = p.title.clone().or_else(|| p.event.clone());
            alert.description = match (&p.description, &p.consequences) {
                (Some(d), Some(c)) => Some(format!("{d}\n\n{c}")),
                (d, c) => d.clone().or_else(|| c.clone()),
            };
            alert.instruction = p.instruction.clone();
            alert.source = Some("MET Norway".to_string());
            alert
        })
        .collect();
    crate::model::sort_alerts(&mut alerts);
    alerts
}
