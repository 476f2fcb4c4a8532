//! AccuWeather responses to the canonical model.
//!
//! Requests are made with `metric=true`: temperatures in °C, speeds in km/h,
//! precipitation in mm, pressure in mbar, visibility in km, ceiling in m.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::json::{
    AccuAirAndPollen, AccuAirQualityResult, AccuAlert, AccuClimoSummary, AccuCurrent,
    AccuForecastDaily, AccuForecastDailyResult, AccuForecastHourly, AccuForecastWind, AccuHalfDay,
    AccuLocation, AccuMetricImperial, AccuNamed, AccuMinutelyResult, AccuValue,
};
use crate::{
    error::SourceError,
    model::{
        AirQuality, AirQualityWrapper, Alert, AlertSeverity, Current, Daily, HalfDay, Hourly,
        Location, LocationAddress, Minutely, Normals, Pollen, PollenWrapper, Pollutant,
        PrecipitationProbability, PrecipitationTotals, SunTimes, WeatherCode, WeatherWrapper,
        Wind, sort_alerts, synthesize_alert_id,
    },
    source::unix_to_utc,
    units::{
        Distance, DistanceUnit, Precipitation, PrecipitationUnit, Pressure, PressureUnit, Ratio,
        Speed, SpeedUnit, Temperature, TemperatureUnit,
    },
};

pub fn weather_code(icon: Option<u32>) -> Option<WeatherCode> {
    let code = match icon? {
        1 | 2 | 30 | 33 | 34 => WeatherCode::Clear,
        3 | 4 | 6 | 35 | 36 => WeatherCode::PartlyCloudy,
        7 | 8 | 38 => WeatherCode::Cloudy,
        5 | 37 => WeatherCode::Haze,
        11 => WeatherCode::Fog,
        12 | 13 | 14 | 18 | 39 | 40 => WeatherCode::Rain,
        15 | 16 | 17 | 41 | 42 => WeatherCode::Thunderstorm,
        19 | 20 | 21 | 22 | 23 | 43 | 44 => WeatherCode::Snow,
        24 | 26 | 29 => WeatherCode::Sleet,
        25 => WeatherCode::Hail,
        32 => WeatherCode::Wind,
        // 31 is "cold": no weather.
        _ => return None,
    };
    Some(code)
}

fn metric(value: &Option<AccuMetricImperial>) -> Option<f64> {
    value.as_ref()?.metric.as_ref()?.value
}

fn value(value: &Option<AccuValue>) -> Option<f64> {
    value.as_ref()?.value
}

fn celsius(v: Option<f64>) -> Option<Temperature> {
    Temperature::from_unit_opt(v, TemperatureUnit::Celsius)
}

fn kph(v: Option<f64>) -> Option<Speed> {
    Speed::from_unit_opt(v, SpeedUnit::KilometersPerHour)
}

fn mm(v: Option<f64>) -> Option<Precipitation> {
    Precipitation::from_unit_opt(v, PrecipitationUnit::Millimeter)
}

fn percent(v: Option<f64>) -> Option<Ratio> {
    v.filter(|p| p.is_finite()).map(Ratio::from_percent)
}

fn forecast_wind(wind: &Option<AccuForecastWind>, gust: &Option<AccuForecastWind>) -> Option<Wind> {
    Wind {
        degree: wind
            .as_ref()
            .and_then(|w| w.direction.as_ref())
            .and_then(|d| d.degrees),
        speed: kph(wind.as_ref().and_then(|w| value(&w.speed))),
        gusts: kph(gust.as_ref().and_then(|g| value(&g.speed))),
    }
    .non_empty()
}

pub fn convert_current(current: &AccuCurrent, minutely_phrase: Option<String>) -> Current {
    let wind = Wind {
        degree: current
            .wind
            .as_ref()
            .and_then(|w| w.direction.as_ref())
            .and_then(|d| d.degrees),
        speed: kph(current.wind.as_ref().and_then(|w| metric(&w.speed))),
        gusts: kph(current.wind_gust.as_ref().and_then(|g| metric(&g.speed))),
    };

    Current {
        weather_text: current.weather_text.clone(),
        weather_code: weather_code(current.weather_icon),
        temperature: celsius(metric(&current.temperature)),
        feels_like: celsius(metric(&current.real_feel_temperature)),
        wind: wind.non_empty(),
        uv_index: current.uv_index,
        relative_humidity: percent(current.relative_humidity),
        dew_point: celsius(metric(&current.dew_point)),
        pressure: Pressure::from_unit_opt(metric(&current.pressure), PressureUnit::Millibar),
        cloud_cover: percent(current.cloud_cover),
        visibility: Distance::from_unit_opt(metric(&current.visibility), DistanceUnit::Kilometer),
        ceiling: Distance::from_unit_opt(metric(&current.ceiling), DistanceUnit::Meter),
        observed_at: current.epoch_time.and_then(unix_to_utc),
        hourly_forecast_text: minutely_phrase,
    }
}

fn half_day(half: &AccuHalfDay, temperature: Option<f64>, feels_like: Option<f64>) -> HalfDay {
    let precipitation = PrecipitationTotals {
        total: mm(value(&half.total_liquid)),
        thunderstorm: None,
        rain: mm(value(&half.rain)),
        // Snow is reported in cm of snowfall.
        snow: Precipitation::from_unit_opt(value(&half.snow), PrecipitationUnit::Centimeter),
        ice: mm(value(&half.ice)),
    };
    let probability = PrecipitationProbability {
        total: percent(half.precipitation_probability),
        thunderstorm: percent(half.thunderstorm_probability),
        rain: percent(half.rain_probability),
        snow: percent(half.snow_probability),
        ice: percent(half.ice_probability),
    };

    HalfDay {
        weather_text: half.long_phrase.clone().or_else(|| half.icon_phrase.clone()),
        weather_code: weather_code(half.icon),
        temperature: celsius(temperature),
        feels_like: celsius(feels_like),
        precipitation: precipitation.non_empty(),
        precipitation_probability: probability.non_empty(),
        wind: forecast_wind(&half.wind, &half.wind_gust),
        cloud_cover: percent(half.cloud_cover),
    }
}

fn pollen_from(entries: &[AccuAirAndPollen]) -> Option<Pollen> {
    let level = |name: &str| {
        entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .and_then(|e| e.category_value)
            // Categories run 1 (low) to 6 (hazardous); model levels top out at 5.
            .map(|c| c.min(5))
    };
    let pollen = Pollen {
        grass: level("Grass"),
        tree: level("Tree"),
        ragweed: level("Ragweed"),
        mold: level("Mold"),
    };
    (!pollen.is_empty()).then_some(pollen)
}

pub fn convert_daily(days: &[AccuForecastDaily], location: &Location) -> Vec<Daily> {
    days.iter()
        .filter_map(|day| {
            let instant = unix_to_utc(day.epoch_date)?;
            let mut daily = Daily::new(location.local_date(instant));

            let temps = day.temperature.as_ref();
            let feels = day.real_feel_temperature.as_ref();
            daily.day = day.day.as_ref().map(|half| {
                half_day(
                    half,
                    temps.and_then(|t| value(&t.maximum)),
                    feels.and_then(|t| value(&t.maximum)),
                )
            });
            daily.night = day.night.as_ref().map(|half| {
                half_day(
                    half,
                    temps.and_then(|t| value(&t.minimum)),
                    feels.and_then(|t| value(&t.minimum)),
                )
            });
            daily.sun = day.sun.as_ref().map(|sun| SunTimes {
                rise: sun.epoch_rise.and_then(unix_to_utc),
                set: sun.epoch_set.and_then(unix_to_utc),
            });
            daily.sunshine_hours = day.hours_of_sun;

            let air_and_pollen = day.air_and_pollen.as_deref().unwrap_or_default();
            daily.uv_index = air_and_pollen
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case("UVIndex"))
                .and_then(|e| e.value);
            daily.pollen = pollen_from(air_and_pollen);
            Some(daily)
        })
        .collect()
}

pub fn convert_pollen(days: &[AccuForecastDaily], location: &Location) -> Option<PollenWrapper> {
    let daily: BTreeMap<_, _> = days
        .iter()
        .filter_map(|day| {
            let date = location.local_date(unix_to_utc(day.epoch_date)?);
            let pollen = pollen_from(day.air_and_pollen.as_deref()?)?;
            Some((date, pollen))
        })
        .collect();

    let wrapper = PollenWrapper {
        current: daily.values().next().cloned(),
        daily,
    };
    (!wrapper.is_empty()).then_some(wrapper)
}

pub fn convert_hourly(hours: &[AccuForecastHourly]) -> Vec<Hourly> {
    hours
        .iter()
        .filter_map(|hour| {
            let mut hourly = Hourly::new(unix_to_utc(hour.epoch_date_time)?);
            hourly.is_daylight = hour.is_daylight;
            hourly.weather_text = hour.icon_phrase.clone();
            hourly.weather_code = weather_code(hour.weather_icon);
            hourly.temperature = celsius(value(&hour.temperature));
            hourly.feels_like = celsius(value(&hour.real_feel_temperature));
            hourly.dew_point = celsius(value(&hour.dew_point));
            hourly.relative_humidity = percent(hour.relative_humidity);
            hourly.wind = forecast_wind(&hour.wind, &hour.wind_gust);
            hourly.uv_index = hour.uv_index;
            hourly.visibility =
                Distance::from_unit_opt(value(&hour.visibility), DistanceUnit::Kilometer);
            hourly.cloud_cover = percent(hour.cloud_cover);
            hourly.precipitation = PrecipitationTotals {
                total: mm(value(&hour.total_liquid)),
                thunderstorm: None,
                rain: mm(value(&hour.rain)),
                snow: Precipitation::from_unit_opt(value(&hour.snow), PrecipitationUnit::Centimeter),
                ice: mm(value(&hour.ice)),
            }
            .non_empty();
            hourly.precipitation_probability = PrecipitationProbability {
                total: percent(hour.precipitation_probability),
                thunderstorm: percent(hour.thunderstorm_probability),
                rain: percent(hour.rain_probability),
                snow: percent(hour.snow_probability),
                ice: percent(hour.ice_probability),
            }
            .non_empty();
            Some(hourly)
        })
        .collect()
}

/// Current, daily, hourly and (optionally) minutely results of one forecast
/// round. The minutely summary phrase, or else the daily headline, becomes
/// the current hourly forecast text.
///
/// When all three are missing the response is garbage and nothing is
/// returned, so cached data is left alone.
pub fn convert_forecast(
    current: Option<&AccuCurrent>,
    daily: Option<&AccuForecastDailyResult>,
    hourly: Option<&[AccuForecastHourly]>,
    minutely: Option<&AccuMinutelyResult>,
    location: &Location,
) -> Result<WeatherWrapper, SourceError> {
    let daily_forecasts = daily
        .map(|d| d.daily_forecasts.as_slice())
        .filter(|d| !d.is_empty());
    let hourly = hourly.filter(|h| !h.is_empty());

    if current.is_none() && daily_forecasts.is_none() && hourly.is_none() {
        return Err(SourceError::InvalidData(
            "AccuWeather returned no current, daily or hourly data".to_string(),
        ));
    }

    let headline = daily.and_then(|d| d.headline.as_ref()).and_then(|h| h.text.clone());

    Ok(WeatherWrapper {
        current: current
            .map(|c| convert_current(c, minutely.and_then(minutely_phrase).or(headline)))
            .filter(|c| !c.is_empty()),
        daily_forecast: daily_forecasts.map(|d| convert_daily(d, location)),
        hourly_forecast: hourly.map(convert_hourly),
        minutely_forecast: minutely.map(convert_minutely),
        pollen: daily_forecasts.and_then(|d| convert_pollen(d, location)),
        ..WeatherWrapper::default()
    })
}

/// Marshall–Palmer: Z = 200 R^1.6, with Z from reflectivity in dBZ.
pub fn precipitation_from_dbz(dbz: f64) -> Option<Precipitation> {
    if !dbz.is_finite() {
        return None;
    }
    let z = 10f64.powf(dbz / 10.0);
    let rate = (z / 200.0).powf(1.0 / 1.6);
    // Below ~0.1 mm/h the radar only sees noise.
    Some(if rate < 0.1 {
        Precipitation::ZERO
    } else {
        Precipitation::from_millimeters(rate)
    })
}

pub fn convert_minutely(result: &AccuMinutelyResult) -> Vec<Minutely> {
    let intervals = result.intervals.as_deref().unwrap_or_default();
    let starts: Vec<Option<DateTime<Utc>>> = intervals
        .iter()
        .map(|i| unix_to_utc(i.start_epoch_date_time))
        .collect();

    intervals
        .iter()
        .enumerate()
        .filter_map(|(i, interval)| {
            let date = starts[i]?;
            let minute_interval = starts
                .get(i + 1)
                .copied()
                .flatten()
                .map(|next| (next - date).num_minutes())
                .filter(|m| *m > 0)
                .map_or(1, |m| m as u32);
            Some(Minutely {
                date,
                minute_interval,
                precipitation_intensity: interval.dbz.and_then(precipitation_from_dbz),
            })
        })
        .collect()
}

pub fn minutely_phrase(result: &AccuMinutelyResult) -> Option<String> {
    result.summary.as_ref()?.phrase.clone()
}

pub fn convert_alerts(alerts: &[AccuAlert]) -> Vec<Alert> {
    let mut converted: Vec<Alert> = alerts
        .iter()
        .map(|alert| {
            let area = alert.area.as_ref().and_then(|areas| areas.first());
            let severity = alert
                .level
                .as_deref()
                .map(AlertSeverity::from_color_word)
                .unwrap_or_default();
            let start = area.and_then(|a| a.epoch_start_time).and_then(unix_to_utc);
            let id = alert.alert_id.map(|id| id.to_string()).unwrap_or_else(|| {
                let event = alert.category.as_deref().or_else(|| {
                    alert.description.as_ref().and_then(|d| d.localized.as_deref())
                });
                synthesize_alert_id(
                    event.unwrap_or_default(),
                    area.and_then(|a| a.name.as_deref()).unwrap_or_default(),
                    start,
                )
            });

            let mut converted = Alert::new(id, severity);
            converted.start_date = start;
            converted.end_date = area.and_then(|a| a.epoch_end_time).and_then(unix_to_utc);
            converted.headline = alert
                .description
                .as_ref()
                .and_then(|d| d.localized.clone())
                .or_else(|| alert.category.clone());
            converted.description = area.and_then(|a| a.text.clone().or_else(|| a.summary.clone()));
            converted.source = alert.source.clone();
            if let Some(color) = &alert.color {
                converted.color = 0xFF00_0000
                    | u32::from(color.red) << 16
                    | u32::from(color.green) << 8
                    | u32::from(color.blue);
            }
            converted
        })
        .collect();
    sort_alerts(&mut converted);
    converted
}

fn pollutant(kind: &str) -> Option<Pollutant> {
    match kind.to_ascii_uppercase().as_str() {
        "PM2_5" | "PM25" => Some(Pollutant::Pm25),
        "PM10" => Some(Pollutant::Pm10),
        "SO2" => Some(Pollutant::So2),
        "NO2" => Some(Pollutant::No2),
        "O3" => Some(Pollutant::O3),
        "CO" => Some(Pollutant::Co),
        _ => None,
    }
}

/// Hourly concentrations, with daily worst values per local date.
pub fn convert_air_quality(result: &AccuAirQualityResult, location: &Location) -> AirQualityWrapper {
    let mut wrapper = AirQualityWrapper::default();

    for entry in result.data.as_deref().unwrap_or_default() {
        let Some(date) = unix_to_utc(entry.epoch_date) else {
            continue;
        };
        let mut aq = AirQuality::default();
        for p in entry.pollutants.as_deref().unwrap_or_default() {
            if let Some(kind) = pollutant(&p.kind) {
                // CO arrives in µg/m³.
                let value = match kind {
                    Pollutant::Co => p.concentration.value.map(|v| v / 1000.0),
                    _ => p.concentration.value,
                };
                aq.set(kind, value);
            }
        }
        wrapper.add_hourly(date, aq, location);
    }

    wrapper.current = wrapper.hourly.values().next().cloned();
    wrapper
}

pub fn convert_normals(summary: &AccuClimoSummary, month: u32) -> Option<Normals> {
    let temperatures = summary.normals.as_ref()?.temperatures.as_ref()?;
    let normals = Normals {
        month: Some(month),
        daytime_temperature: celsius(metric(&temperatures.maximum)),
        nighttime_temperature: celsius(metric(&temperatures.minimum)),
    };
    (!normals.is_empty()).then_some(normals)
}

pub fn convert_address(location: &AccuLocation) -> LocationAddress {
    let named = |n: &Option<AccuNamed>| n.as_ref().and_then(|n| n.localized_name.clone());
    LocationAddress {
        country_code: location.country.as_ref().and_then(|c| c.id.clone()),
        country: named(&location.country),
        admin1: named(&location.administrative_area),
        admin2: location
            .supplemental_admin_areas
            .as_ref()
            .and_then(|areas| areas.first())
            .and_then(|a| a.localized_name.clone()),
        city: named(&location.parent_city).or_else(|| location.localized_name.clone()),
        district: location
            .parent_city
            .as_ref()
            .and(location.localized_name.clone()),
    }
}
