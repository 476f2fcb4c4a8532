use chrono::{DateTime, NaiveDate, Utc};

use super::json::{MeteoAmDailyStats, MeteoAmMeteogram, MeteoAmSeries, icon_value};
use crate::{
    completion,
    error::SourceError,
    model::{
        Daily, Feature, FeatureSet, HalfDay, Hourly, Location, PrecipitationProbability,
        WeatherCode, WeatherWrapper, Wind,
    },
    units::{Pressure, Ratio, Speed, SpeedUnit, Temperature},
};

/// Night icons are the day icon plus 30.
const NIGHT_ICON_OFFSET: u32 = 30;

fn icon_number(icon: &str) -> Option<u32> {
    icon.trim().parse().ok()
}

pub fn weather_code(icon: Option<&str>) -> Option<WeatherCode> {
    let mut n = icon_number(icon?)?;
    if n > NIGHT_ICON_OFFSET {
        n -= NIGHT_ICON_OFFSET;
    }
    let code = match n {
        1 => WeatherCode::Clear,
        2 | 3 => WeatherCode::PartlyCloudy,
        4..=6 => WeatherCode::Cloudy,
        7..=9 => WeatherCode::Rain,
        10 | 11 => WeatherCode::Thunderstorm,
        12 | 13 => WeatherCode::Snow,
        14 => WeatherCode::Sleet,
        15 => WeatherCode::Hail,
        16 | 17 => WeatherCode::Fog,
        18 => WeatherCode::Haze,
        19 => WeatherCode::Wind,
        _ => return None,
    };
    Some(code)
}

fn is_night_icon(icon: &str) -> bool {
    icon_number(icon).is_some_and(|n| n > NIGHT_ICON_OFFSET)
}

pub fn convert_hourly(series: &MeteoAmSeries) -> Vec<Hourly> {
    (0..series.len())
        .map(|i| {
            let mut hourly = Hourly::new(series.time[i]);
            let icon = series.icon[i].as_deref();
            hourly.weather_code = weather_code(icon);
            hourly.is_daylight = icon.map(|icon| !is_night_icon(icon));
            hourly.temperature = series.temperature[i].map(Temperature::from_celsius);
            hourly.relative_humidity = series.humidity[i].map(Ratio::from_percent);
            hourly.pressure = series.pressure[i].map(Pressure::from_hectopascals);
            hourly.precipitation_probability = PrecipitationProbability::total(
                series.precipitation_probability[i].map(Ratio::from_percent),
            )
            .non_empty();
            hourly.wind = Wind {
                degree: series.wind_direction[i],
                speed: Speed::from_unit_opt(series.wind_speed[i], SpeedUnit::KilometersPerHour),
                gusts: None,
            }
            .non_empty();
            hourly
        })
        .collect()
}

fn convert_stats(stats: &MeteoAmDailyStats) -> Option<Daily> {
    let date = NaiveDate::parse_from_str(stats.local_date.trim(), "%Y-%m-%d").ok()?;
    let mut daily = Daily::new(date);

    let day = HalfDay {
        weather_code: weather_code(stats.icon.as_ref().and_then(icon_value).as_deref()),
        temperature: stats
            .max_celsius
            .filter(|t| t.is_finite())
            .map(Temperature::from_celsius),
        wind: Wind {
            speed: Speed::from_unit_opt(stats.max_wind_kmh, SpeedUnit::KilometersPerHour),
            ..Wind::default()
        }
        .non_empty(),
        ..HalfDay::default()
    };
    let night = HalfDay {
        temperature: stats
            .min_celsius
            .filter(|t| t.is_finite())
            .map(Temperature::from_celsius),
        ..HalfDay::default()
    };
    daily.day = (!day.is_empty()).then_some(day);
    daily.night = (!night.is_empty()).then_some(night);
    Some(daily)
}

/// Daily stats when the meteogram has them, otherwise summarised hours.
pub fn convert_daily(raw: &MeteoAmMeteogram, hourly: &[Hourly], location: &Location) -> Vec<Daily> {
    let from_stats: Vec<Daily> = raw
        .extrainfo
        .iter()
        .flat_map(|info| info.stats.iter())
        .filter_map(convert_stats)
        .collect();
    if from_stats.is_empty() {
        completion::daily_from_hourly(hourly, location)
    } else {
        from_stats
    }
}

pub fn convert_meteogram(
    raw: &MeteoAmMeteogram,
    location: &Location,
    features: &FeatureSet,
    now: DateTime<Utc>,
) -> Result<WeatherWrapper, SourceError> {
    let series = MeteoAmSeries::decode(raw)?;
    if series.is_empty() || series.temperature.iter().all(Option::is_none) {
        return Err(SourceError::InvalidData(
            "MeteoAM meteogram has no temperatures".to_string(),
        ));
    }

    let hourly = convert_hourly(&series);
    let mut wrapper = WeatherWrapper::default();
    if features.contains(&Feature::Current) {
        wrapper.current = completion::current_from_hourly(&hourly, now);
    }
    if features.contains(&Feature::Forecast) {
        wrapper.daily_forecast = Some(convert_daily(raw, &hourly, location));
        wrapper.hourly_forecast = Some(hourly);
    }
    Ok(wrapper)
}
