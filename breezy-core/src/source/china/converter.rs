use chrono::{Days, DurationRound, TimeDelta};

use super::json::{
    ChinaAlert, ChinaAqi, ChinaCurrent, ChinaForecastDaily, ChinaForecastHourly,
    ChinaMinutelyResult, ChinaNumberList, ChinaRange, ChinaValue, ChinaWeatherResult,
};
use crate::{
    error::SourceError,
    model::{
        AirQuality, AirQualityWrapper, Alert, AlertSeverity, Current, Daily, Feature, FeatureSet,
        HalfDay, Hourly, Location, Minutely, Pollutant, PrecipitationProbability, SunTimes,
        WeatherCode, WeatherWrapper, Wind, sort_alerts, synthesize_alert_id,
    },
    source::parse_utc,
    units::{Distance, DistanceUnit, Precipitation, Pressure, Ratio, Speed, SpeedUnit, Temperature},
};

pub fn weather_code(code: Option<f64>) -> Option<WeatherCode> {
    let code = code.filter(|c| c.is_finite() && *c >= 0.0)?.round() as u32;
    let mapped = match code {
        0 => WeatherCode::Clear,
        1 => WeatherCode::PartlyCloudy,
        2 => WeatherCode::Cloudy,
        3 | 7..=12 => WeatherCode::Rain,
        4 => WeatherCode::Thunderstorm,
        5 => WeatherCode::Hail,
        6 | 19 => WeatherCode::Sleet,
        13..=17 => WeatherCode::Snow,
        18 => WeatherCode::Fog,
        20 | 30 | 31 => WeatherCode::Wind,
        29 | 53 => WeatherCode::Haze,
        _ => return None,
    };
    Some(mapped)
}

/// Warning levels are colour words: 蓝色, 黄色, 橙色, 红色.
pub fn alert_severity(level: &str) -> AlertSeverity {
    if level.contains('红') {
        AlertSeverity::Extreme
    } else if level.contains('橙') {
        AlertSeverity::Severe
    } else if level.contains('黄') {
        AlertSeverity::Moderate
    } else if level.contains('蓝') {
        AlertSeverity::Minor
    } else {
        AlertSeverity::from_color_word(level)
    }
}

fn value(v: &Option<ChinaValue>) -> Option<f64> {
    v.as_ref().and_then(|v| v.value).filter(|v| v.is_finite())
}

fn number(list: &Option<ChinaNumberList>, i: usize) -> Option<f64> {
    list.as_ref()?.value.get(i)?.0.filter(|v| v.is_finite())
}

pub fn convert_current(current: &ChinaCurrent) -> Option<Current> {
    let wind = current.wind.as_ref();
    let converted = Current {
        weather_code: weather_code(current.weather.as_deref().and_then(|w| w.trim().parse().ok())),
        temperature: value(&current.temperature).map(Temperature::from_celsius),
        feels_like: value(&current.feels_like).map(Temperature::from_celsius),
        relative_humidity: value(&current.humidity).map(Ratio::from_percent),
        pressure: value(&current.pressure).map(Pressure::from_hectopascals),
        visibility: Distance::from_unit_opt(value(&current.visibility), DistanceUnit::Kilometer),
        uv_index: current.uv_index,
        wind: Wind {
            degree: wind.and_then(|w| value(&w.direction)),
            speed: Speed::from_unit_opt(
                wind.and_then(|w| value(&w.speed)),
                SpeedUnit::KilometersPerHour,
            ),
            gusts: None,
        }
        .non_empty(),
        observed_at: current.pub_time.as_deref().and_then(parse_utc),
        ..Current::default()
    };
    (!converted.is_empty()).then_some(converted)
}

fn range(list: Option<&Vec<ChinaRange>>, i: usize) -> (Option<f64>, Option<f64>) {
    list.and_then(|l| l.get(i))
        .map(|r| (r.from, r.to))
        .unwrap_or_default()
}

/// Daily arrays start at the local date of `pubTime`.
pub fn convert_daily(daily: &ChinaForecastDaily, location: &Location) -> Vec<Daily> {
    let Some(start) = daily.pub_time.as_deref().and_then(parse_utc) else {
        return Vec::new();
    };
    let start = location.local_date(start);

    let temperatures = daily.temperature.as_ref().map(|t| &t.value);
    let weather = daily.weather.as_ref().map(|w| &w.value);
    let directions = daily.wind.as_ref().and_then(|w| w.direction.as_ref()).map(|d| &d.value);
    let speeds = daily.wind.as_ref().and_then(|w| w.speed.as_ref()).map(|s| &s.value);
    let days = temperatures.map_or(0, Vec::len);

    (0..days)
        .filter_map(|i| {
            let date = start.checked_add_days(Days::new(i as u64))?;
            let (max, min) = range(temperatures, i);
            let (day_code, night_code) = range(weather, i);
            let (day_direction, night_direction) = range(directions, i);
            let (day_speed, night_speed) = range(speeds, i);
            let probability = PrecipitationProbability::total(
                number(&daily.precipitation_probability, i).map(Ratio::from_percent),
            )
            .non_empty();

            let half = |temperature: Option<f64>, code, degree, speed| {
                let half = HalfDay {
                    weather_code: weather_code(code),
                    temperature: temperature
                        .filter(|t: &f64| t.is_finite())
                        .map(Temperature::from_celsius),
                    precipitation_probability: probability.clone(),
                    wind: Wind {
                        degree,
                        speed: Speed::from_unit_opt(speed, SpeedUnit::KilometersPerHour),
                        gusts: None,
                    }
                    .non_empty(),
                    ..HalfDay::default()
                };
                (!half.is_empty()).then_some(half)
            };

            let mut converted = Daily::new(date);
            converted.day = half(max, day_code, day_direction, day_speed);
            converted.night = half(min, night_code, night_direction, night_speed);
            converted.sun = daily
                .sun_rise_set
                .as_ref()
                .and_then(|s| s.value.get(i))
                .map(|s| SunTimes {
                    rise: s.from.as_deref().and_then(parse_utc),
                    set: s.to.as_deref().and_then(parse_utc),
                });
            Some(converted)
        })
        .collect()
}

/// Hourly arrays start at the hour of the temperature `pubTime`.
pub fn convert_hourly(hourly: &ChinaForecastHourly) -> Vec<Hourly> {
    let Some(temperatures) = &hourly.temperature else {
        return Vec::new();
    };
    let Some(start) = temperatures
        .pub_time
        .as_deref()
        .and_then(parse_utc)
        .and_then(|t| t.duration_trunc(TimeDelta::hours(1)).ok())
    else {
        return Vec::new();
    };
    let winds = hourly.wind.as_ref().map(|w| &w.value);

    (0..temperatures.value.len())
        .map(|i| {
            let mut converted = Hourly::new(start + TimeDelta::hours(i as i64));
            converted.temperature = number(&hourly.temperature, i).map(Temperature::from_celsius);
            converted.weather_code = weather_code(number(&hourly.weather, i));
            converted.wind = winds.and_then(|w| w.get(i)).and_then(|w| {
                Wind {
                    degree: w.direction,
                    speed: Speed::from_unit_opt(w.speed, SpeedUnit::KilometersPerHour),
                    gusts: None,
                }
                .non_empty()
            });
            converted
        })
        .collect()
}

pub fn convert_air_quality(aqi: &ChinaAqi) -> AirQualityWrapper {
    let mut current = AirQuality::default();
    current.set(Pollutant::Pm25, aqi.pm25);
    current.set(Pollutant::Pm10, aqi.pm10);
    current.set(Pollutant::No2, aqi.no2);
    current.set(Pollutant::So2, aqi.so2);
    current.set(Pollutant::O3, aqi.o3);
    current.set(Pollutant::Co, aqi.co);
    AirQualityWrapper {
        current: (!current.is_empty()).then_some(current),
        ..AirQualityWrapper::default()
    }
}

pub fn convert_alerts(alerts: &[ChinaAlert]) -> Vec<Alert> {
    let mut converted: Vec<Alert> = alerts
        .iter()
        .map(|alert| {
            let published = alert.pub_time.as_deref().and_then(parse_utc);
            let id = alert.alert_id.clone().unwrap_or_else(|| {
                synthesize_alert_id(
                    alert.kind.as_deref().unwrap_or_default(),
                    alert.title.as_deref().unwrap_or_default(),
                    published,
                )
            });
            let mut converted = Alert::new(
                id,
                alert.level.as_deref().map(alert_severity).unwrap_or_default(),
            );
            converted.start_date = published;
            converted.headline = alert.title.clone();
            converted.description = alert.detail.clone();
            converted
        })
        .collect();
    sort_alerts(&mut converted);
    converted
}

/// One step per minute from `pubTime`; values are mm/h.
pub fn convert_minutely(result: &ChinaMinutelyResult) -> Vec<Minutely> {
    let Some(precipitation) = &result.precipitation else {
        return Vec::new();
    };
    let Some(start) = precipitation.pub_time.as_deref().and_then(parse_utc) else {
        return Vec::new();
    };
    precipitation
        .value
        .iter()
        .enumerate()
        .map(|(i, v)| Minutely {
            date: start + TimeDelta::minutes(i as i64),
            minute_interval: 1,
            precipitation_intensity: v
                .0
                .filter(|v| v.is_finite())
                .map(Precipitation::from_millimeters),
        })
        .collect()
}

pub fn convert_weather(
    result: &ChinaWeatherResult,
    features: &FeatureSet,
    location: &Location,
) -> Result<WeatherWrapper, SourceError> {
    let current = result.current.as_ref().and_then(convert_current);
    let daily = result
        .forecast_daily
        .as_ref()
        .map(|d| convert_daily(d, location))
        .unwrap_or_default();
    let hourly = result
        .forecast_hourly
        .as_ref()
        .map(convert_hourly)
        .unwrap_or_default();

    let wants_weather = features.contains(&Feature::Current) || features.contains(&Feature::Forecast);
    if wants_weather && current.is_none() && daily.is_empty() && hourly.is_empty() {
        return Err(SourceError::InvalidData(
            "China weather has neither current conditions nor a forecast".to_string(),
        ));
    }

    let mut wrapper = WeatherWrapper::default();
    if features.contains(&Feature::Current) {
        wrapper.current = current;
    }
    if features.contains(&Feature::Forecast) {
        wrapper.daily_forecast = Some(daily).filter(|d| !d.is_empty());
        wrapper.hourly_forecast = Some(hourly).filter(|h| !h.is_empty());
    }
    if features.contains(&Feature::AirQuality) {
        wrapper.air_quality = result
            .aqi
            .as_ref()
            .map(convert_air_quality)
            .filter(|aq| !aq.is_empty());
    }
    if features.contains(&Feature::Alert) {
        wrapper.alert_list = Some(convert_alerts(&result.alerts));
    }
    Ok(wrapper)
}
