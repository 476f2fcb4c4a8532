//! HERE report to the canonical model. Requests use `units=metric`:
//! °C, km/h, km, mbar, mm (snowfall in cm).

use super::json::{HereAddress, HereDaily, HereHourly, HereNwsAlert, HereObservation, HerePlace};
use crate::{
    error::SourceError,
    model::{
        Alert, AlertSeverity, Current, Daily, Feature, FeatureSet, HalfDay, Hourly, Location,
        LocationAddress, PrecipitationProbability, PrecipitationTotals, WeatherCode,
        WeatherWrapper, Wind, sort_alerts, synthesize_alert_id,
    },
    source::parse_utc,
    units::{
        Distance, DistanceUnit, Precipitation, PrecipitationUnit, Pressure, PressureUnit, Ratio,
        Speed, SpeedUnit, Temperature, TemperatureUnit,
    },
};

/// First matching fragment of the icon name wins, so order matters.
const ICON_RULES: &[(&str, WeatherCode)] = &[
    ("tstorm", WeatherCode::Thunderstorm),
    ("thunder", WeatherCode::Thunderstorm),
    ("hail", WeatherCode::Hail),
    ("icy", WeatherCode::Sleet),
    ("sleet", WeatherCode::Sleet),
    ("freezing", WeatherCode::Sleet),
    ("mixture_of_precip", WeatherCode::Sleet),
    ("snow_rain_mix", WeatherCode::Sleet),
    ("snow_changing_to_rain", WeatherCode::Sleet),
    ("rain_changing_to_snow", WeatherCode::Sleet),
    ("snow", WeatherCode::Snow),
    ("flurr", WeatherCode::Snow),
    ("blizzard", WeatherCode::Snow),
    ("rain", WeatherCode::Rain),
    ("shower", WeatherCode::Rain),
    ("drizzle", WeatherCode::Rain),
    ("fog", WeatherCode::Fog),
    ("haze", WeatherCode::Haze),
    ("hazy", WeatherCode::Haze),
    ("smoke", WeatherCode::Haze),
    ("dust", WeatherCode::Haze),
    ("sand", WeatherCode::Haze),
    ("tornado", WeatherCode::Wind),
    ("hurricane", WeatherCode::Wind),
    ("tropical_storm", WeatherCode::Wind),
    ("wind", WeatherCode::Wind),
    ("more_clouds_than_sun", WeatherCode::Cloudy),
    ("broken_clouds", WeatherCode::Cloudy),
    ("mostly_cloudy", WeatherCode::Cloudy),
    ("low_clouds", WeatherCode::Cloudy),
    ("overcast", WeatherCode::Cloudy),
    ("partly", WeatherCode::PartlyCloudy),
    ("breaks_of_sun", WeatherCode::PartlyCloudy),
    ("cloudiness", WeatherCode::PartlyCloudy),
    ("clearing", WeatherCode::PartlyCloudy),
    ("clouds", WeatherCode::PartlyCloudy),
    // Sic: HERE spells one icon `passing_clounds`.
    ("clounds", WeatherCode::PartlyCloudy),
    ("cloudy", WeatherCode::Cloudy),
    ("sunny", WeatherCode::Clear),
    ("clear", WeatherCode::Clear),
];

pub fn weather_code(icon_name: Option<&str>) -> Option<WeatherCode> {
    let name = icon_name?.to_ascii_lowercase();
    let name = name.strip_prefix("night_").unwrap_or(&name);
    ICON_RULES
        .iter()
        .find(|(fragment, _)| name.contains(fragment))
        .map(|(_, code)| *code)
}

fn celsius(v: Option<f64>) -> Option<Temperature> {
    Temperature::from_unit_opt(v, TemperatureUnit::Celsius)
}

fn percent(v: Option<f64>) -> Option<Ratio> {
    v.filter(|p| p.is_finite()).map(Ratio::from_percent)
}

fn wind(speed: Option<f64>, direction: Option<f64>) -> Option<Wind> {
    Wind {
        degree: direction,
        speed: Speed::from_unit_opt(speed, SpeedUnit::KilometersPerHour),
        gusts: None,
    }
    .non_empty()
}

fn precipitation(rain: Option<f64>, snow: Option<f64>) -> Option<PrecipitationTotals> {
    let rain = Precipitation::from_unit_opt(rain, PrecipitationUnit::Millimeter);
    let snow = Precipitation::from_unit_opt(snow, PrecipitationUnit::Centimeter);
    let mut totals = PrecipitationTotals {
        rain,
        snow,
        ..PrecipitationTotals::default()
    };
    totals.total = totals.total_or_sum();
    totals.non_empty()
}

pub fn convert_current(observation: &HereObservation) -> Current {
    Current {
        weather_text: observation.description.clone(),
        weather_code: weather_code(observation.icon_name.as_deref()),
        temperature: celsius(observation.temperature),
        feels_like: celsius(observation.comfort),
        wind: wind(observation.wind_speed, observation.wind_direction),
        uv_index: observation.uv_index,
        relative_humidity: percent(observation.humidity),
        dew_point: celsius(observation.dew_point),
        pressure: Pressure::from_unit_opt(observation.barometer_pressure, PressureUnit::Millibar),
        cloud_cover: None,
        visibility: Distance::from_unit_opt(observation.visibility, DistanceUnit::Kilometer),
        ceiling: None,
        observed_at: observation.time.as_deref().and_then(parse_utc),
        hourly_forecast_text: None,
    }
}

/// HERE daily entries have one description for the whole day; it goes to
/// the day half, the night half only keeps the low.
pub fn convert_daily(days: &[HereDaily], location: &Location) -> Vec<Daily> {
    days.iter()
        .filter_map(|day| {
            let date = location.local_date(parse_utc(&day.time)?);
            let mut daily = Daily::new(date);
            let day_half = HalfDay {
                weather_text: day.description.clone(),
                weather_code: weather_code(day.icon_name.as_deref()),
                temperature: celsius(day.high_temperature),
                precipitation: precipitation(day.rain_fall, day.snow_fall),
                precipitation_probability: PrecipitationProbability::total(percent(
                    day.precipitation_probability,
                ))
                .non_empty(),
                wind: wind(day.wind_speed, day.wind_direction),
                ..HalfDay::default()
            };
            daily.day = (!day_half.is_empty()).then_some(day_half);
            daily.night = celsius(day.low_temperature).map(|low| HalfDay {
                temperature: Some(low),
                ..HalfDay::default()
            });
            daily.uv_index = day.uv_index;
            Some(daily)
        })
        .collect()
}

pub fn convert_hourly(hours: &[HereHourly]) -> Vec<Hourly> {
    hours
        .iter()
        .filter_map(|hour| {
            let mut hourly = Hourly::new(parse_utc(&hour.time)?);
            hourly.is_daylight = hour.daylight.as_deref().map(|d| d.eq_ignore_ascii_case("day"));
            hourly.weather_text = hour.description.clone();
            hourly.weather_code = weather_code(hour.icon_name.as_deref());
            hourly.temperature = celsius(hour.temperature);
            hourly.feels_like = celsius(hour.comfort);
            hourly.relative_humidity = percent(hour.humidity);
            hourly.dew_point = celsius(hour.dew_point);
            hourly.precipitation = precipitation(hour.rain_fall, hour.snow_fall);
            hourly.precipitation_probability =
                PrecipitationProbability::total(percent(hour.precipitation_probability)).non_empty();
            hourly.wind = wind(hour.wind_speed, hour.wind_direction);
            hourly.uv_index = hour.uv_index;
            hourly.visibility = Distance::from_unit_opt(hour.visibility, DistanceUnit::Kilometer);
            Some(hourly)
        })
        .collect()
}

fn severity(significance: Option<&str>) -> AlertSeverity {
    match significance.map(str::trim) {
        Some("W") => AlertSeverity::Severe,
        Some("A") => AlertSeverity::Moderate,
        Some("Y" | "S") => AlertSeverity::Minor,
        _ => AlertSeverity::Unknown,
    }
}

pub fn convert_alerts<'a>(alerts: impl IntoIterator<Item = &'a HereNwsAlert>) -> Vec<Alert> {
    let mut converted: Vec<Alert> = alerts
        .into_iter()
        .map(|alert| {
            let start = alert.valid_from_time_local.as_deref().and_then(parse_utc);
            let area = alert
                .county
                .first()
                .and_then(|c| c.name.as_deref())
                .unwrap_or_default();
            let id = synthesize_alert_id(alert.name.as_deref().unwrap_or_default(), area, start);

            let mut converted = Alert::new(id, severity(alert.significance.as_deref()));
            converted.start_date = start;
            converted.end_date = alert.valid_until_time_local.as_deref().and_then(parse_utc);
            converted.headline = alert.name.clone().or_else(|| alert.description.clone());
            converted.description = alert.message.clone().or_else(|| alert.description.clone());
            converted.source = Some("National Weather Service".to_string());
            converted
        })
        .collect();
    sort_alerts(&mut converted);
    converted
}

/// One report response, limited to `features`.
///
/// If weather was asked for but the place has no observation, daily or
/// hourly data at all, the response is garbage.
pub fn convert_report(
    place: Option<&HerePlace>,
    features: &FeatureSet,
    location: &Location,
) -> Result<WeatherWrapper, SourceError> {
    let observation = place
        .and_then(|p| p.observations.as_ref())
        .and_then(|o| o.first());
    let daily = place
        .and_then(|p| p.daily_forecasts.as_ref())
        .and_then(|d| d.first())
        .map(|d| d.forecasts.as_slice())
        .filter(|d| !d.is_empty());
    let hourly = place
        .and_then(|p| p.hourly_forecasts.as_ref())
        .and_then(|h| h.first())
        .map(|h| h.forecasts.as_slice())
        .filter(|h| !h.is_empty());

    let wants_weather = features.contains(&Feature::Current) || features.contains(&Feature::Forecast);
    if wants_weather && observation.is_none() && daily.is_none() && hourly.is_none() {
        return Err(SourceError::InvalidData(
            "HERE returned no observation or forecast".to_string(),
        ));
    }

    let mut wrapper = WeatherWrapper::default();
    if features.contains(&Feature::Current) {
        wrapper.current = observation.map(convert_current).filter(|c| !c.is_empty());
    }
    if features.contains(&Feature::Forecast) {
        wrapper.daily_forecast = daily.map(|d| convert_daily(d, location));
        wrapper.hourly_forecast = hourly.map(convert_hourly);
    }
    if features.contains(&Feature::Alert) {
        // No alerts block means nothing is active.
        let nws = place.and_then(|p| p.nws_alerts.as_ref());
        wrapper.alert_list = Some(
            nws.map(|n| convert_alerts(n.warnings.iter().chain(&n.watches)))
                .unwrap_or_default(),
        );
    }
    Ok(wrapper)
}

/// ISO 3166-1 alpha-3 to alpha-2, for the countries sources gate on and the
/// most common others. Unlisted codes map to `None`.
const ALPHA3_TO_ALPHA2: &[(&str, &str)] = &[
    ("ARG", "AR"), ("ASM", "AS"), ("AUS", "AU"), ("AUT", "AT"), ("BEL", "BE"),
    ("BEN", "BJ"), ("BRA", "BR"), ("CAN", "CA"), ("CHE", "CH"), ("CHN", "CN"),
    ("CZE", "CZ"), ("DEU", "DE"), ("DNK", "DK"), ("ESP", "ES"), ("ETH", "ET"),
    ("FIN", "FI"), ("FRA", "FR"), ("GBR", "GB"), ("GHA", "GH"), ("GRC", "GR"),
    ("GUM", "GU"), ("HKG", "HK"), ("IND", "IN"), ("IRL", "IE"), ("ISL", "IS"),
    ("ITA", "IT"), ("JPN", "JP"), ("KOR", "KR"), ("MAC", "MO"), ("MEX", "MX"),
    ("MNP", "MP"), ("NLD", "NL"), ("NOR", "NO"), ("NZL", "NZ"), ("POL", "PL"),
    ("PRI", "PR"), ("PRT", "PT"), ("SJM", "SJ"), ("SWE", "SE"), ("TWN", "TW"),
    ("USA", "US"), ("VIR", "VI"), ("ZAF", "ZA"),
];

fn alpha2(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 2 {
        return Some(code.to_ascii_uppercase());
    }
    ALPHA3_TO_ALPHA2
        .iter()
        .find(|(alpha3, _)| alpha3.eq_ignore_ascii_case(code))
        .map(|(_, alpha2)| (*alpha2).to_string())
}

pub fn convert_address(address: &HereAddress) -> LocationAddress {
    LocationAddress {
        country_code: address.country_code.as_deref().and_then(alpha2),
        country: address.country_name.clone(),
        admin1: address.state.clone(),
        admin2: address.county.clone(),
        city: address.city.clone(),
        district: address.district.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::here::json::HereReport;
    use serde_json::json;

    fn report() -> HereReport {
        serde_json::from_value(json!({
            "places": [{
                "observations": [{
                    "time": "2025-07-01T14:00:00-04:00",
                    "description": "Partly sunny. Warm.",
                    "iconName": "partly_sunny",
                    "temperature": "29.0",
                    "comfort": "31.2",
                    "humidity": "55",
                    "windSpeed": 14.4,
                    "windDirection": 180,
                    "barometerPressure": "1014.9",
                    "visibility": "*"
                }],
                "dailyForecasts": [{ "forecasts": [
                    { "time": "2025-07-01T00:00:00-04:00", "iconName": "thunderstorms", "description": "Storms", "highTemperature": "31.0", "lowTemperature": "22.0", "precipitationProbability": "70", "rainFall": "12.7", "snowFall": "*" },
                    { "time": "2025-07-02T00:00:00-04:00", "iconName": "sunny", "highTemperature": 30 }
                ]}],
                "hourlyForecasts": [{ "forecasts": [
                    { "time": "2025-07-01T15:00:00-04:00", "daylight": "D", "iconName": "night_passing_clounds", "temperature": "28" }
                ]}],
                "nwsAlerts": {
                    "warnings": [{
                        "name": "Severe Thunderstorm Warning",
                        "significance": "W",
                        "message": "Damaging winds possible.",
                        "validFromTimeLocal": "2025-07-01T15:00:00-04:00",
                        "validUntilTimeLocal": "2025-07-01T17:00:00-04:00",
                        "county": [{ "name": "Kings" }]
                    }],
                    "watches": [{ "name": "Flood Watch", "significance": "A" }]
                }
            }]
        }))
        .unwrap()
    }

    fn location() -> Location {
        Location::new(40.65, -73.95, chrono_tz::America::New_York)
    }

    #[test]
    fn icon_names() {
        assert_eq!(weather_code(Some("night_passing_clounds")), Some(WeatherCode::PartlyCloudy));
        assert_eq!(weather_code(Some("more_clouds_than_sun")), Some(WeatherCode::Cloudy));
        assert_eq!(weather_code(Some("more_sun_than_clouds")), Some(WeatherCode::PartlyCloudy));
        assert_eq!(weather_code(Some("snow_changing_to_rain")), Some(WeatherCode::Sleet));
        assert_eq!(weather_code(Some("isolated_tstorms_late")), Some(WeatherCode::Thunderstorm));
        assert_eq!(weather_code(Some("hazy_sunshine")), Some(WeatherCode::Haze));
        assert_eq!(weather_code(Some("mostly_clear")), Some(WeatherCode::Clear));
        assert_eq!(weather_code(Some("cloudy")), Some(WeatherCode::Cloudy));
        assert_eq!(weather_code(Some("")), None);
    }

    #[test]
    fn numbers_sent_as_strings_are_accepted() {
        let report = report();
        let current = convert_current(&report.places[0].observations.as_ref().unwrap()[0]);
        assert_eq!(current.temperature, Some(Temperature::from_celsius(29.0)));
        assert_eq!(current.pressure, Some(Pressure::from_hectopascals(1014.9)));
        assert_eq!(current.visibility, None);
        assert_eq!(current.wind.unwrap().speed.map(Speed::reference), Some(400));
        assert_eq!(current.weather_code, Some(WeatherCode::PartlyCloudy));
    }

    #[test]
    fn report_is_limited_to_requested_features() {
        let report = report();
        let features: FeatureSet = [Feature::Forecast, Feature::Alert].into();
        let wrapper = convert_report(report.places.first(), &features, &location()).unwrap();

        assert!(wrapper.current.is_none());
        let daily = wrapper.daily_forecast.unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].max_temperature(), Some(Temperature::from_celsius(31.0)));
        assert_eq!(daily[0].min_temperature(), Some(Temperature::from_celsius(22.0)));
        assert_eq!(
            daily[0].day.as_ref().and_then(|d| d.precipitation.as_ref()).and_then(|p| p.total),
            Some(Precipitation::from_millimeters(12.7))
        );
        assert!(daily[1].night.is_none());
        assert_eq!(wrapper.hourly_forecast.map(|h| h.len()), Some(1));

        let alerts = wrapper.alert_list.unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, AlertSeverity::Severe);
        assert!(alerts[0].alert_id.starts_with("Severe Thunderstorm WarningKings"));
        assert_eq!(alerts[1].alert_id, "Flood Watch");
    }

    #[test]
    fn missing_weather_is_garbage_but_alerts_alone_are_not() {
        let empty: HereReport = serde_json::from_value(json!({ "places": [{}] })).unwrap();
        let err = convert_report(empty.places.first(), &[Feature::Current].into(), &location())
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidData(_)));

        let alerts_only =
            convert_report(empty.places.first(), &[Feature::Alert].into(), &location()).unwrap();
        assert_eq!(alerts_only.alert_list, Some(vec![]));
    }

    #[test]
    fn address_country_is_alpha2() {
        let address: HereAddress = serde_json::from_value(json!({
            "countryCode": "NOR",
            "countryName": "Norge",
            "city": "Oslo"
        }))
        .unwrap();
        let converted = convert_address(&address);
        assert_eq!(converted.country_code.as_deref(), Some("NO"));
        assert_eq!(converted.city.as_deref(), Some("Oslo"));

        assert_eq!(alpha2("usa"), Some("US".to_string()));
        assert_eq!(alpha2("XKX"), None);
    }
}
