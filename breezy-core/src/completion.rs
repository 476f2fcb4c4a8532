//! Derives records a source doesn't send from the ones it does.
//!
//! Hourly-only sources get their daily forecast here. Day halves run from
//! 06:00 to 18:00 and night halves from 18:00 to 06:00 the next morning, both
//! in the location's time zone.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::{
    model::{
        Current, Daily, HalfDay, Hourly, Location, PrecipitationProbability, PrecipitationTotals,
        WeatherCode, Wind,
    },
    units::{Ratio, Temperature},
};

const DAY_START_HOUR: u32 = 6;
const NIGHT_START_HOUR: u32 = 18;

#[derive(Default)]
struct Halves<'a> {
    day: Vec<&'a Hourly>,
    night: Vec<&'a Hourly>,
}

/// Groups hourly records into local days and summarises each half.
pub fn daily_from_hourly(hourly: &[Hourly], location: &Location) -> Vec<Daily> {
    let mut days: BTreeMap<_, Halves<'_>> = BTreeMap::new();

    for hour in hourly {
        let local = hour.date.with_timezone(&location.timezone);
        let date = local.date_naive();
        match local.hour() {
            h if h < DAY_START_HOUR => {
                if let Some(previous) = date.pred_opt() {
                    days.entry(previous).or_default().night.push(hour);
                }
            }
            h if h < NIGHT_START_HOUR => days.entry(date).or_default().day.push(hour),
            _ => days.entry(date).or_default().night.push(hour),
        }
    }

    days.into_iter()
        .map(|(date, halves)| {
            let mut daily = Daily::new(date);
            daily.day = half_day(&halves.day, true);
            daily.night = half_day(&halves.night, false);
            daily.uv_index = halves
                .day
                .iter()
                .filter_map(|h| h.uv_index)
                .fold(None, |acc: Option<f64>, uv| Some(acc.map_or(uv, |a| a.max(uv))));
            daily
        })
        .collect()
}

fn half_day(hours: &[&Hourly], is_day: bool) -> Option<HalfDay> {
    if hours.is_empty() {
        return None;
    }

    let extreme = |values: Vec<Temperature>| {
        if is_day {
            values.into_iter().max()
        } else {
            values.into_iter().min()
        }
    };

    let weather_code = dominant_code(hours);
    let weather_text = weather_code.and_then(|code| {
        hours
            .iter()
            .find(|h| h.weather_code == Some(code))
            .and_then(|h| h.weather_text.clone())
    });

    let totals: Vec<_> = hours
        .iter()
        .filter_map(|h| h.precipitation.as_ref().and_then(PrecipitationTotals::total_or_sum))
        .collect();
    let precipitation =
        (!totals.is_empty()).then(|| PrecipitationTotals::total(Some(totals.into_iter().sum())));

    let probability = hours
        .iter()
        .filter_map(|h| {
            h.precipitation_probability
                .as_ref()
                .and_then(PrecipitationProbability::max)
        })
        .max()
        .map(|p| PrecipitationProbability::total(Some(p)));

    let wind = hours
        .iter()
        .filter_map(|h| h.wind.as_ref())
        .filter(|w| w.speed.is_some())
        .max_by_key(|w| w.speed)
        .cloned();

    let covers: Vec<i64> = hours
        .iter()
        .filter_map(|h| h.cloud_cover.map(Ratio::reference))
        .collect();
    let cloud_cover = (!covers.is_empty())
        .then(|| Ratio::from_reference(covers.iter().sum::<i64>() / covers.len() as i64));

    let half = HalfDay {
        weather_text,
        weather_code,
        temperature: extreme(hours.iter().filter_map(|h| h.temperature).collect()),
        feels_like: extreme(hours.iter().filter_map(|h| h.feels_like).collect()),
        precipitation,
        precipitation_probability: probability,
        wind,
        cloud_cover,
    };
    (!half.is_empty()).then_some(half)
}

/// Most frequent code; ties go to the more significant weather.
fn dominant_code(hours: &[&Hourly]) -> Option<WeatherCode> {
    let mut counts: HashMap<WeatherCode, usize> = HashMap::new();
    for code in hours.iter().filter_map(|h| h.weather_code) {
        *counts.entry(code).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(code, count)| (*count, code.weight()))
        .map(|(code, _)| code)
}

/// Current conditions from the hourly step covering `now`, or the first
/// step if none does.
pub fn current_from_hourly(hourly: &[Hourly], now: DateTime<Utc>) -> Option<Current> {
    let hour = hourly
        .iter()
        .find(|h| h.date <= now && now < h.date + Duration::hours(1))
        .or_else(|| hourly.first())?;

    let current = Current {
        weather_text: hour.weather_text.clone(),
        weather_code: hour.weather_code,
        temperature: hour.temperature,
        feels_like: hour.feels_like,
        wind: hour.wind.clone().and_then(Wind::non_empty),
        uv_index: hour.uv_index,
        relative_humidity: hour.relative_humidity,
        dew_point: hour.dew_point,
        pressure: hour.pressure,
        cloud_cover: hour.cloud_cover,
        visibility: hour.visibility,
        ceiling: None,
        observed_at: Some(hour.date),
        hourly_forecast_text: None,
    };
    (!current.is_empty()).then_some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    use crate::units::{Precipitation, Speed, SpeedUnit};

    fn hour(location: &Location, day: u32, h: u32, celsius: f64, code: WeatherCode) -> Hourly {
        let local = location
            .timezone
            .with_ymd_and_hms(2025, 7, day, h, 0, 0)
            .single()
            .unwrap();
        let mut hourly = Hourly::new(local.with_timezone(&Utc));
        hourly.temperature = Some(Temperature::from_celsius(celsius));
        hourly.weather_code = Some(code);
        hourly
    }

    #[test]
    fn groups_by_local_day_and_splits_halves() {
        let location = Location::new(59.91, 10.75, chrono_tz::Europe::Oslo);
        let mut hours = vec![
            hour(&location, 1, 8, 14.0, WeatherCode::Cloudy),
            hour(&location, 1, 14, 21.0, WeatherCode::Rain),
            hour(&location, 1, 15, 20.0, WeatherCode::Rain),
            hour(&location, 1, 20, 15.0, WeatherCode::Clear),
            // 03:00 the next morning still belongs to the night of the 1st.
            hour(&location, 2, 3, 9.0, WeatherCode::Clear),
            hour(&location, 2, 10, 18.0, WeatherCode::Clear),
        ];
        hours[1].precipitation = Some(PrecipitationTotals::total(Some(
            Precipitation::from_millimeters(1.5),
        )));
        hours[2].precipitation = Some(PrecipitationTotals::total(Some(
            Precipitation::from_millimeters(0.5),
        )));

        let daily = daily_from_hourly(&hours, &location);
        assert_eq!(daily.len(), 2);

        let first = &daily[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(first.max_temperature(), Some(Temperature::from_celsius(21.0)));
        assert_eq!(first.min_temperature(), Some(Temperature::from_celsius(9.0)));
        let day = first.day.as_ref().unwrap();
        assert_eq!(day.weather_code, Some(WeatherCode::Rain));
        assert_eq!(
            day.precipitation.as_ref().and_then(|p| p.total),
            Some(Precipitation::from_millimeters(2.0))
        );

        assert_eq!(daily[1].max_temperature(), Some(Temperature::from_celsius(18.0)));
        assert!(daily[1].night.is_none());
    }

    #[test]
    fn ties_prefer_significant_weather() {
        let location = Location::new(0.0, 0.0, chrono_tz::UTC);
        let hours = [
            hour(&location, 1, 9, 20.0, WeatherCode::Clear),
            hour(&location, 1, 10, 20.0, WeatherCode::Thunderstorm),
        ];
        let refs: Vec<_> = hours.iter().collect();
        assert_eq!(dominant_code(&refs), Some(WeatherCode::Thunderstorm));
    }

    #[test]
    fn current_uses_step_covering_now() {
        let location = Location::new(0.0, 0.0, chrono_tz::UTC);
        let mut hours = vec![
            hour(&location, 1, 9, 20.0, WeatherCode::Clear),
            hour(&location, 1, 10, 23.0, WeatherCode::PartlyCloudy),
        ];
        hours[1].wind = Some(Wind {
            speed: Some(Speed::from_unit(4.0, SpeedUnit::MetersPerSecond)),
            ..Wind::default()
        });
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 10, 30, 0).unwrap();

        let current = current_from_hourly(&hours, now).unwrap();
        assert_eq!(current.temperature, Some(Temperature::from_celsius(23.0)));
        assert!(current.wind.is_some());

        let later = Utc.with_ymd_and_hms(2025, 7, 3, 0, 0, 0).unwrap();
        let fallback = current_from_hourly(&hours, later).unwrap();
        assert_eq!(fallback.temperature, Some(Temperature::from_celsius(20.0)));

        assert!(current_from_hourly(&[], now).is_none());
    }
}
