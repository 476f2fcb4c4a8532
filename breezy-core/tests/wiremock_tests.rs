//! Integration tests for the weather sources using wiremock
//!
//! Every source is built from a `Config` whose instance URL points at a mock
//! HTTP server, then driven through `WeatherRefresher` the way the CLI does.

use std::time::Duration;

use breezy_core::{
    Config, Feature, FeatureSet, Location, SourceError, SourceId, WeatherRefresher,
    model::AlertSeverity, source_from_config,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// ============================================================================
// Helpers
// ============================================================================

#[allow(clippy::expect_used)]
fn create_test_refresher(id: SourceId, mock_server: &MockServer) -> WeatherRefresher {
    let mut config = Config::default();
    config.set_instance(id, format!("{}/", mock_server.uri()));
    if id.requires_api_key() {
        config.upsert_api_key(id, "test-key".to_string());
    }
    let source = source_from_config(id, &config).expect("source should build");
    WeatherRefresher::new([source])
}

fn features(list: &[Feature]) -> FeatureSet {
    list.iter().copied().collect()
}

fn oslo() -> Location {
    Location::new(59.9139, 10.7522, chrono_tz::Europe::Oslo).with_country_code("NO")
}

fn accra() -> Location {
    Location::new(5.6037, -0.187, chrono_tz::Africa::Accra).with_country_code("GH")
}

fn reykjavik() -> Location {
    Location::new(64.1466, -21.9426, chrono_tz::Atlantic::Reykjavik).with_country_code("IS")
}

fn beijing() -> Location {
    Location::new(39.9042, 116.4074, chrono_tz::Asia::Shanghai).with_country_code("CN")
}

fn sample_metno_forecast() -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": {
            "timeseries": [
                {
                    "time": "2025-01-15T12:00:00Z",
                    "data": {
                        "instant": { "details": {
                            "air_temperature": -3.5,
                            "air_pressure_at_sea_level": 1021.4,
                            "relative_humidity": 81.0,
                            "wind_speed": 4.2,
                            "wind_from_direction": 200.0
                        }},
                        "next_1_hours": {
                            "summary": { "symbol_code": "cloudy" },
                            "details": { "precipitation_amount": 0.0 }
                        }
                    }
                },
                {
                    "time": "2025-01-15T13:00:00Z",
                    "data": {
                        "instant": { "details": { "air_temperature": -2.9 } },
                        "next_1_hours": {
                            "summary": { "symbol_code": "lightsnow" },
                            "details": { "precipitation_amount": 0.3 }
                        }
                    }
                }
            ]
        }
    })
}

fn sample_metno_alerts() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "properties": {
                "id": "2.49.0.1.578.0.250115.1",
                "title": "Strong wind, orange level, Oslo",
                "event": "wind",
                "area": "Oslo",
                "severity": "Severe",
                "awareness_level": "3; orange; Severe",
                "description": "Gusts up to 30 m/s."
            },
            "when": { "interval": ["2025-01-15T15:00:00+00:00", "2025-01-16T06:00:00+00:00"] }
        }]
    })
}

async fn mount_metno_forecast(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/locationforecast/2.0/complete"))
        .and(query_param("lat", "59.9139"))
        .and(query_param("lon", "10.7522"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_metno_forecast()))
        .mount(mock_server)
        .await;
}

// ============================================================================
// MET Norway
// ============================================================================

#[tokio::test]
async fn test_metno_forecast_and_alerts() {
    let mock_server = MockServer::start().await;
    mount_metno_forecast(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/metalerts/2.0/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_metno_alerts()))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::MetNorway, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let outcome = refresher
        .request_weather(
            SourceId::MetNorway,
            &location,
            &features(&[Feature::Current, Feature::Forecast, Feature::Alert]),
            &ticket,
        )
        .await
        .unwrap();
    let wrapper = outcome.wrapper;

    assert!(wrapper.failed_features.is_empty(), "{:?}", wrapper.failed_features);
    assert!(outcome.parameters.is_none());

    let current = wrapper.current.unwrap();
    assert!(current.temperature.is_some());
    assert_eq!(wrapper.hourly_forecast.unwrap().len(), 2);
    assert!(!wrapper.daily_forecast.unwrap().is_empty());

    let alerts = wrapper.alert_list.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, AlertSeverity::Severe);
}

#[tokio::test]
async fn test_server_error_only_fails_its_own_group() {
    let mock_server = MockServer::start().await;
    mount_metno_forecast(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/metalerts/2.0/current.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::MetNorway, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let wrapper = refresher
        .request_weather(
            SourceId::MetNorway,
            &location,
            &features(&[Feature::Current, Feature::Alert]),
            &ticket,
        )
        .await
        .unwrap()
        .wrapper;

    assert!(wrapper.current.is_some());
    assert!(wrapper.alert_list.is_none());
    assert!(matches!(
        wrapper.failed_features.get(&Feature::Alert),
        Some(SourceError::ServiceUnavailable(_))
    ));
    assert!(!wrapper.failed_features.contains_key(&Feature::Current));
}

#[tokio::test]
async fn test_rate_limit_is_recorded_per_feature() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locationforecast/2.0/complete"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::MetNorway, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let wrapper = refresher
        .request_weather(
            SourceId::MetNorway,
            &location,
            &features(&[Feature::Current, Feature::Forecast]),
            &ticket,
        )
        .await
        .unwrap()
        .wrapper;

    assert!(wrapper.current.is_none());
    assert!(matches!(
        wrapper.failed_features.get(&Feature::Current),
        Some(SourceError::RateLimitExceeded)
    ));
    assert!(matches!(
        wrapper.failed_features.get(&Feature::Forecast),
        Some(SourceError::RateLimitExceeded)
    ));
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locationforecast/2.0/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::MetNorway, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let wrapper = refresher
        .request_weather(SourceId::MetNorway, &location, &features(&[Feature::Forecast]), &ticket)
        .await
        .unwrap()
        .wrapper;

    assert!(matches!(
        wrapper.failed_features.get(&Feature::Forecast),
        Some(SourceError::ParseError(_))
    ));
}

#[tokio::test]
async fn test_alerts_outside_norway_are_unsupported() {
    let mock_server = MockServer::start().await;
    mount_metno_forecast(&mock_server).await;

    let refresher = create_test_refresher(SourceId::MetNorway, &mock_server);
    let location = oslo().with_country_code("DE");
    let ticket = refresher.begin(location.cache_key());

    let wrapper = refresher
        .request_weather(
            SourceId::MetNorway,
            &location,
            &features(&[Feature::Current, Feature::Alert]),
            &ticket,
        )
        .await
        .unwrap()
        .wrapper;

    assert!(wrapper.current.is_some());
    assert!(matches!(
        wrapper.failed_features.get(&Feature::Alert),
        Some(SourceError::UnsupportedFeature(Feature::Alert))
    ));
}

#[tokio::test]
async fn test_newer_cycle_cancels_slow_refresh() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locationforecast/2.0/complete"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_metno_forecast())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::MetNorway, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let wanted = features(&[Feature::Forecast]);
    let slow = refresher.request_weather(
        SourceId::MetNorway,
        &location,
        &wanted,
        &ticket,
    );
    let restart = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        refresher.begin(location.cache_key())
    };
    let (result, newer) = tokio::join!(slow, restart);

    assert!(matches!(result, Err(SourceError::Cancelled)));
    assert!(ticket.is_cancelled());
    assert!(!newer.is_cancelled());
}

// ============================================================================
// ClimWeb
// ============================================================================

fn sample_climweb_cities() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "id": 7, "name": "Accra" },
                "geometry": { "type": "Point", "coordinates": [-0.1969, 5.556] }
            },
            {
                "type": "Feature",
                "properties": { "id": 12, "name": "Tamale" },
                "geometry": { "type": "Point", "coordinates": [-0.8393, 9.4008] }
            }
        ]
    })
}

fn sample_climweb_forecast() -> serde_json::Value {
    serde_json::json!({
        "forecasts": [
            {
                "date": "2025-03-01",
                "condition": "partly_cloudy",
                "condition_label": "Partly Cloudy",
                "max_temp": 32.0,
                "min_temp": 24.0,
                "wind_speed": 14.0,
                "wind_direction": 220.0,
                "rain_probability": 20.0
            },
            {
                "date": "2025-03-02",
                "condition": "light_rain",
                "condition_label": "Light Rain",
                "max_temp": 31.0,
                "min_temp": 23.5,
                "rainfall": 3.2
            }
        ]
    })
}

#[tokio::test]
async fn test_climweb_resolves_city_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/api/cities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_climweb_cities()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/en/api/forecasts/city-forecasts"))
        .and(query_param("city_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_climweb_forecast()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::GMet, &mock_server);
    let location = accra();
    let wanted = features(&[Feature::Forecast]);

    let ticket = refresher.begin(location.cache_key());
    let first = refresher
        .request_weather(SourceId::GMet, &location, &wanted, &ticket)
        .await
        .unwrap();
    refresher.finish(&ticket);

    let parameters = first.parameters.unwrap();
    assert_eq!(parameters.get("cityId").map(String::as_str), Some("7"));
    let daily = first.wrapper.daily_forecast.unwrap();
    assert_eq!(daily.len(), 2);

    // The lookup is cached, so the second cycle goes straight to the forecast.
    let ticket = refresher.begin(location.cache_key());
    let second = refresher
        .request_weather(SourceId::GMet, &location, &wanted, &ticket)
        .await
        .unwrap();
    assert!(second.wrapper.failed_features.is_empty());
}

#[tokio::test]
async fn test_climweb_city_too_far_fails_the_refresh() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/api/cities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_climweb_cities()))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::GMet, &mock_server);
    // Ouagadougou: inside no city's radius, and no country code to rule it out.
    let location = Location::new(12.3714, -1.5197, chrono_tz::Africa::Ouagadougou);
    let ticket = refresher.begin(location.cache_key());

    let result = refresher
        .request_weather(SourceId::GMet, &location, &features(&[Feature::Forecast]), &ticket)
        .await;

    assert!(matches!(result, Err(SourceError::LocationNotFound(_))));
}

// ============================================================================
// Veður
// ============================================================================

fn sample_vedur_stations() -> serde_json::Value {
    serde_json::json!([
        { "id": "1", "name": "Reykjavík", "lat": 64.1275, "lon": -21.9028 },
        { "id": "422", "name": "Akureyri", "lat": 65.6856, "lon": -18.1002 }
    ])
}

fn sample_vedur_forecast() -> serde_json::Value {
    serde_json::json!({
        "forecasts": [{
            "id": "1",
            "name": "Reykjavík",
            "forecast": [
                { "ftime": "2025-03-01 12:00:00", "T": "2", "F": "8", "D": "NA", "W": "Skýjað", "R": "0.0" },
                { "ftime": "2025-03-01 13:00:00", "T": "3", "F": "6", "D": "A", "W": "Rigning", "R": "0.8" }
            ]
        }]
    })
}

fn sample_vedur_alerts() -> serde_json::Value {
    serde_json::json!([
        {
            "identifier": "2.49.0.0.352.0.IS.250301.1",
            "info": [
                {
                    "language": "is-IS",
                    "event": "Hvassviðri",
                    "severity": "Moderate",
                    "headline": "Gul viðvörun",
                    "area": [{ "areaDesc": "Höfuðborgarsvæðið", "polygon": ["63.9,-22.5 64.4,-22.5 64.4,-21.4 63.9,-21.4 63.9,-22.5"] }]
                },
                {
                    "language": "en-US",
                    "event": "Gale",
                    "severity": "Moderate",
                    "onset": "2025-03-01T15:00:00+00:00",
                    "expires": "2025-03-02T03:00:00+00:00",
                    "headline": "Yellow warning",
                    "area": [{ "areaDesc": "Capital region", "polygon": ["63.9,-22.5 64.4,-22.5 64.4,-21.4 63.9,-21.4 63.9,-22.5"] }]
                }
            ]
        },
        {
            "identifier": "2.49.0.0.352.0.IS.250301.2",
            "info": [{
                "language": "en-US",
                "event": "Snow",
                "severity": "Severe",
                "area": [{ "areaDesc": "North", "polygon": ["65.5,-18.5 66.0,-18.5 66.0,-17.5 65.5,-17.5 65.5,-18.5"] }]
            }]
        }
    ])
}

#[tokio::test]
async fn test_vedur_station_forecast_and_cap_alerts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/stations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_vedur_stations()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather/forecasts/en/station/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_vedur_forecast()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cap/v1/capbroker/active/category/Met"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_vedur_alerts()))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::Vedur, &mock_server);
    let location = reykjavik();
    let ticket = refresher.begin(location.cache_key());

    let outcome = refresher
        .request_weather(
            SourceId::Vedur,
            &location,
            &features(&[Feature::Current, Feature::Forecast, Feature::Alert]),
            &ticket,
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.parameters.unwrap().get("stationId").map(String::as_str),
        Some("1")
    );
    let wrapper = outcome.wrapper;
    assert!(wrapper.failed_features.is_empty(), "{:?}", wrapper.failed_features);
    assert_eq!(wrapper.hourly_forecast.unwrap().len(), 2);

    // Only the capital region polygon covers Reykjavík; English info is picked.
    let alerts = wrapper.alert_list.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].headline.as_deref(), Some("Yellow warning"));
    assert_eq!(alerts[0].severity, AlertSeverity::Moderate);
}

// ============================================================================
// China
// ============================================================================

fn sample_china_weather() -> serde_json::Value {
    serde_json::json!({
        "current": {
            "pubTime": "2025-03-01T08:00:00+08:00",
            "weather": "1",
            "temperature": { "unit": "℃", "value": "6" },
            "feelsLike": { "unit": "℃", "value": "3" },
            "humidity": { "unit": "%", "value": "35" },
            "pressure": { "unit": "hPa", "value": "1024" },
            "visibility": { "unit": "km", "value": "15" },
            "uvIndex": "3",
            "wind": {
                "direction": { "unit": "°", "value": "315" },
                "speed": { "unit": "km/h", "value": "11" }
            }
        },
        "forecastDaily": {
            "pubTime": "2025-03-01T08:00:00+08:00",
            "temperature": { "value": [{ "from": "9", "to": "-2" }, { "from": "11", "to": "0" }] },
            "weather": { "value": [{ "from": "0", "to": "1" }, { "from": "1", "to": "1" }] },
            "precipitationProbability": { "value": ["0", "10"] }
        },
        "aqi": { "pm25": "42", "pm10": "60", "no2": "30", "so2": "4", "o3": "55", "co": "0.6" },
        "alerts": [{
            "title": "寒潮橙色预警",
            "type": "寒潮",
            "level": "橙色",
            "detail": "预计未来24小时气温下降8℃以上。",
            "pubTime": "2025-03-01T09:00:00+08:00"
        }]
    })
}

#[tokio::test]
async fn test_china_location_key_then_weather_all() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/location/city/geo"))
        .and(query_param("appKey", "weather20151024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "locationKey": "weathercn:101010100", "name": "北京" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather/all"))
        .and(query_param("locationKey", "weathercn:101010100"))
        .and(query_param("days", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_china_weather()))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::China, &mock_server);
    let location = beijing();
    let ticket = refresher.begin(location.cache_key());

    let wrapper = refresher
        .request_weather(
            SourceId::China,
            &location,
            &features(&[Feature::Current, Feature::Forecast, Feature::AirQuality, Feature::Alert]),
            &ticket,
        )
        .await
        .unwrap()
        .wrapper;

    assert!(wrapper.failed_features.is_empty(), "{:?}", wrapper.failed_features);
    let current = wrapper.current.unwrap();
    assert_eq!(current.temperature.map(|t| t.celsius()), Some(6.0));
    assert_eq!(wrapper.daily_forecast.unwrap().len(), 2);
    assert!(wrapper.air_quality.is_some());

    let alerts = wrapper.alert_list.unwrap();
    assert_eq!(alerts[0].severity, AlertSeverity::Severe);
    assert_eq!(alerts[0].alert_id, "寒潮寒潮橙色预警1740790800");
}

#[tokio::test]
async fn test_china_outside_mainland_is_unsupported() {
    let mock_server = MockServer::start().await;

    let refresher = create_test_refresher(SourceId::China, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let wrapper = refresher
        .request_weather(SourceId::China, &location, &features(&[Feature::Current]), &ticket)
        .await
        .unwrap()
        .wrapper;

    assert!(matches!(
        wrapper.failed_features.get(&Feature::Current),
        Some(SourceError::UnsupportedFeature(Feature::Current))
    ));
}

// ============================================================================
// Keyed sources
// ============================================================================

#[tokio::test]
async fn test_accuweather_unknown_location() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/geoposition/search"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::AccuWeather, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let result = refresher
        .request_weather(SourceId::AccuWeather, &location, &features(&[Feature::Current]), &ticket)
        .await;

    assert!(matches!(result, Err(SourceError::LocationNotFound(_))));
}

#[tokio::test]
async fn test_accuweather_current_conditions() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/geoposition/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "254946",
            "LocalizedName": "Oslo",
            "Country": { "ID": "NO", "LocalizedName": "Norway" }
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/currentconditions/v1/254946"))
        .and(query_param("details", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "EpochTime": 1736942400,
            "WeatherText": "Light snow",
            "WeatherIcon": 19,
            "Temperature": { "Metric": { "Value": -4.0, "Unit": "C" } },
            "RelativeHumidity": 88,
            "Wind": {
                "Direction": { "Degrees": 45, "Localized": "NE" },
                "Speed": { "Metric": { "Value": 9.3, "Unit": "km/h" } }
            }
        }])))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::AccuWeather, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let outcome = refresher
        .request_weather(SourceId::AccuWeather, &location, &features(&[Feature::Current]), &ticket)
        .await
        .unwrap();

    assert_eq!(
        outcome.parameters.unwrap().get("locationKey").map(String::as_str),
        Some("254946")
    );
    let current = outcome.wrapper.current.unwrap();
    assert_eq!(current.weather_text.as_deref(), Some("Light snow"));
    assert_eq!(current.temperature.map(|t| t.celsius()), Some(-4.0));
}

#[tokio::test]
async fn test_here_report_observation() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/report"))
        .and(query_param("products", "observation"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": [{
                "observations": [{
                    "time": "2025-01-15T12:00:00Z",
                    "description": "Overcast",
                    "iconName": "cloudy",
                    "temperature": "-3.0",
                    "humidity": "80",
                    "windSpeed": "14.4",
                    "windDirection": "200"
                }]
            }]
        })))
        .mount(&mock_server)
        .await;

    let refresher = create_test_refresher(SourceId::Here, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let wrapper = refresher
        .request_weather(SourceId::Here, &location, &features(&[Feature::Current]), &ticket)
        .await
        .unwrap()
        .wrapper;

    let current = wrapper.current.unwrap();
    assert_eq!(current.weather_text.as_deref(), Some("Overcast"));
    assert_eq!(current.temperature.map(|t| t.celsius()), Some(-3.0));
}

#[tokio::test]
async fn test_unregistered_source() {
    let mock_server = MockServer::start().await;
    let refresher = create_test_refresher(SourceId::MetNorway, &mock_server);
    let location = oslo();
    let ticket = refresher.begin(location.cache_key());

    let result = refresher
        .request_weather(SourceId::Vedur, &location, &features(&[Feature::Current]), &ticket)
        .await;

    assert!(matches!(result, Err(SourceError::SourceNotRegistered(_))));
}
