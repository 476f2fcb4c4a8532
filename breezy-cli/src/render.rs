//! Plain-text rendering of refresh results.

use breezy_core::{
    Config, Location, SourceId, WeatherWrapper,
    model::{Alert, Current, Daily, Wind},
    units::{FormatOptions, Precipitation, Ratio, RatioUnit, Speed, Temperature},
};

struct Formatter<'a> {
    config: &'a Config,
    options: FormatOptions,
}

impl<'a> Formatter<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            options: FormatOptions::for_locale(config.language.clone()),
        }
    }

    fn temperature(&self, t: Option<Temperature>) -> String {
        t.and_then(|t| t.format(self.config.units.temperature, &self.options).ok())
            .unwrap_or_else(|| "-".to_string())
    }

    fn speed(&self, s: Option<Speed>) -> Option<String> {
        s.and_then(|s| s.format(self.config.units.speed, &self.options).ok())
    }

    fn precipitation(&self, p: Option<Precipitation>) -> Option<String> {
        p.and_then(|p| p.format(self.config.units.precipitation, &self.options).ok())
    }

    fn ratio(&self, r: Option<Ratio>) -> Option<String> {
        r.and_then(|r| r.format(RatioUnit::Percent, &self.options).ok())
    }

    fn wind(&self, wind: Option<&Wind>) -> Option<String> {
        let wind = wind?;
        let speed = self.speed(wind.speed);
        match (wind.direction_name(), speed) {
            (Some(direction), Some(speed)) => Some(format!("{direction} {speed}")),
            (None, Some(speed)) => Some(speed),
            (Some(direction), None) => Some(direction.to_string()),
            (None, None) => None,
        }
    }

    fn current(&self, current: &Current) -> Vec<String> {
        let mut lines = vec![format!(
            "Now: {} {}",
            self.temperature(current.temperature),
            current
                .weather_text
                .clone()
                .or_else(|| current.weather_code.map(|c| c.to_string()))
                .unwrap_or_default()
        )];
        if current.feels_like.is_some() {
            lines.push(format!("  Feels like {}", self.temperature(current.feels_like)));
        }
        if let Some(wind) = self.wind(current.wind.as_ref()) {
            lines.push(format!("  Wind {wind}"));
        }
        if let Some(humidity) = self.ratio(current.relative_humidity) {
            lines.push(format!("  Humidity {humidity}"));
        }
        if let Some(pressure) = current
            .pressure
            .and_then(|p| p.format(self.config.units.pressure, &self.options).ok())
        {
            lines.push(format!("  Pressure {pressure}"));
        }
        if let Some(text) = &current.hourly_forecast_text {
            lines.push(format!("  {text}"));
        }
        lines
    }

    fn daily(&self, daily: &Daily) -> String {
        let day = daily.day.as_ref();
        let condition = day
            .and_then(|d| d.weather_text.clone().or_else(|| d.weather_code.map(|c| c.to_string())))
            .unwrap_or_default();
        let mut line = format!(
            "{}  {:>7} / {:<7} {}",
            daily.date.format("%a %d %b"),
            self.temperature(daily.max_temperature()),
            self.temperature(daily.min_temperature()),
            condition
        );
        let precipitation = [daily.day.as_ref(), daily.night.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|half| half.precipitation.as_ref().and_then(|p| p.total_or_sum()))
            .reduce(|a, b| a + b);
        if let Some(amount) = self.precipitation(precipitation) {
            line.push_str(&format!("  {amount}"));
        }
        line
    }

    fn alert(&self, alert: &Alert, location: &Location) -> String {
        let when = |d: Option<chrono::DateTime<chrono::Utc>>| {
            d.map(|d| d.with_timezone(&location.timezone).format("%d %b %H:%M").to_string())
                .unwrap_or_else(|| "?".to_string())
        };
        format!(
            "[{}] {} ({} to {})",
            alert.severity,
            alert.headline.as_deref().unwrap_or(&alert.alert_id),
            when(alert.start_date),
            when(alert.end_date)
        )
    }
}

pub fn weather(wrapper: &WeatherWrapper, location: &Location, config: &Config) -> String {
    let formatter = Formatter::new(config);
    let mut lines = Vec::new();

    if let Some(address) = &wrapper.location_address {
        let place: Vec<&str> = [&address.city, &address.admin1, &address.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect();
        lines.push(place.join(", "));
    }
    if let Some(current) = &wrapper.current {
        lines.extend(formatter.current(current));
    }
    if let Some(daily) = &wrapper.daily_forecast {
        lines.push(String::new());
        lines.push("Forecast:".to_string());
        lines.extend(daily.iter().map(|d| format!("  {}", formatter.daily(d))));
    }
    if let Some(minutely) = &wrapper.minutely_forecast {
        let wet = minutely
            .iter()
            .filter(|m| m.precipitation_intensity.is_some_and(|p| p > Precipitation::ZERO))
            .count();
        lines.push(format!("Next {} steps: {wet} with precipitation", minutely.len()));
    }
    if let Some(air) = wrapper.air_quality.as_ref().and_then(|a| a.current.as_ref()) {
        if let Some(index) = air.index() {
            lines.push(format!("Air quality index {index}"));
        }
    }
    if let Some(alerts) = &wrapper.alert_list {
        lines.push(String::new());
        if alerts.is_empty() {
            lines.push("No active alerts.".to_string());
        } else {
            lines.push("Alerts:".to_string());
            lines.extend(alerts.iter().map(|a| format!("  {}", formatter.alert(a, location))));
        }
    }
    if let Some(normals) = &wrapper.normals {
        lines.push(format!(
            "Normals: {} / {}",
            formatter.temperature(normals.daytime_temperature),
            formatter.temperature(normals.nighttime_temperature)
        ));
    }
    if !wrapper.failed_features.is_empty() {
        lines.push(String::new());
        lines.push("Unavailable:".to_string());
        lines.extend(
            wrapper
                .failed_features
                .iter()
                .map(|(feature, error)| format!("  {feature}: {error}")),
        );
    }

    lines.into_iter().map(|l| l + "\n").collect()
}

pub fn sources(config: &Config) -> String {
    let default = config.default_source_id().ok();
    SourceId::all()
        .iter()
        .map(|id| {
            let status = if config.is_source_configured(*id) {
                "ready"
            } else {
                "needs API key"
            };
            let marker = if Some(*id) == default { " (default)" } else { "" };
            format!("{:<12} {:<22} {status}{marker}\n", id.as_str(), id.name())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use breezy_core::{Feature, SourceError, model::AlertSeverity};

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn renders_current_alerts_and_failures() {
        let location = Location::new(59.91, 10.75, chrono_tz::Europe::Oslo);
        let mut wrapper = WeatherWrapper {
            current: Some(Current {
                weather_text: Some("Cloudy".into()),
                temperature: Some(Temperature::from_celsius(4.2)),
                ..Current::default()
            }),
            alert_list: Some(vec![{
                let mut alert = Alert::new("a", AlertSeverity::Severe);
                alert.headline = Some("Strong wind".into());
                alert
            }]),
            ..WeatherWrapper::default()
        };
        wrapper.record_failure(Feature::Forecast, SourceError::RateLimitExceeded);

        let text = weather(&wrapper, &location, &config());
        assert!(text.contains("Now: 4°C Cloudy"));
        assert!(text.contains("[severe] Strong wind"));
        assert!(text.contains("forecast: Rate limit exceeded"));
    }

    #[test]
    fn lists_every_source() {
        let text = sources(&config());
        assert_eq!(text.lines().count(), SourceId::all().len());
        assert!(text.contains("accu"));
        assert!(text.contains("needs API key"));
    }
}
