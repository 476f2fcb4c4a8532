use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    error::SourceError,
    http::SourceClient,
    model::{Feature, FeatureSet, Location, WeatherWrapper},
    source::{FeatureRequest, LocationParameters, SourceId, WeatherSource, subset},
};

mod converter;
mod json;

use json::{ChinaLocation, ChinaMinutelyResult, ChinaWeatherResult};

const DEFAULT_BASE_URL: &str = "https://weatherapi.market.xiaomi.com/wtr-v3";
const LOCATION_KEY: &str = "locationKey";

// Public app credentials the API expects on every call.
const APP_KEY: &str = "weather20151024";
const SIGN: &str = "zUFJoAR2ZVrDy1vF3D07";

const SUPPORTED: &[Feature] = &[
    Feature::Current,
    Feature::Forecast,
    Feature::Minutely,
    Feature::AirQuality,
    Feature::Alert,
];

/// Served by one `weather/all` call, which needs the location key.
const ALL_GROUP: &[Feature] = &[
    Feature::Current,
    Feature::Forecast,
    Feature::AirQuality,
    Feature::Alert,
];

#[derive(Debug, Clone)]
pub struct ChinaSource {
    client: SourceClient,
    base_url: String,
}

impl ChinaSource {
    pub fn new(client: SourceClient, instance: Option<&str>) -> Self {
        Self {
            client,
            base_url: instance.unwrap_or(DEFAULT_BASE_URL).to_string(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        location: &Location,
        extra: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let latitude = location.latitude().to_string();
        let longitude = location.longitude().to_string();
        let mut query = vec![
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("locale", "zh_cn"),
            ("isGlobal", "false"),
            ("appKey", APP_KEY),
            ("sign", SIGN),
        ];
        query.extend_from_slice(extra);
        self.client
            .get_json(&format!("{}/{}", self.base_url, path), &query)
            .await
    }

    #[instrument(skip_all, level = "debug")]
    async fn weather_all(
        &self,
        location: &Location,
        features: &FeatureSet,
    ) -> Result<WeatherWrapper, SourceError> {
        let key = location
            .parameter(self.id().as_str(), LOCATION_KEY)
            .ok_or_else(|| SourceError::LocationNotFound("missing China location key".into()))?;
        let result: ChinaWeatherResult = self
            .get("weather/all", location, &[(LOCATION_KEY, key), ("days", "15")])
            .await?;
        converter::convert_weather(&result, features, location)
    }

    async fn minutely(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let result: ChinaMinutelyResult =
            self.get("weather/xm/forecast/minutely", location, &[]).await?;
        Ok(WeatherWrapper {
            minutely_forecast: Some(converter::convert_minutely(&result)),
            ..WeatherWrapper::default()
        })
    }
}

#[async_trait]
impl WeatherSource for ChinaSource {
    fn id(&self) -> SourceId {
        SourceId::China
    }

    fn supported_features(&self) -> &'static [Feature] {
        SUPPORTED
    }

    fn is_feature_supported_for_location(&self, location: &Location, feature: Feature) -> bool {
        SUPPORTED.contains(&feature)
            && (location.country_code.is_none() || location.is_in_country(&["CN"]))
    }

    fn needs_location_parameters_refresh(&self, location: &Location, features: &FeatureSet) -> bool {
        !subset(features, ALL_GROUP).is_empty()
            && location.parameter(self.id().as_str(), LOCATION_KEY).is_none()
    }

    async fn request_location_parameters(
        &self,
        location: &Location,
    ) -> Result<LocationParameters, SourceError> {
        let cities: Vec<ChinaLocation> = self.get("location/city/geo", location, &[]).await?;
        let city = cities
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::LocationNotFound(location.cache_key()))?;
        debug!(key = %city.location_key, name = ?city.name, "Resolved China location");

        Ok(LocationParameters::from([(LOCATION_KEY.to_string(), city.location_key)]))
    }

    fn feature_requests<'a>(
        &'a self,
        location: &'a Location,
        features: &FeatureSet,
    ) -> Vec<FeatureRequest<'a>> {
        let mut requests = Vec::new();

        let all = subset(features, ALL_GROUP);
        if !all.is_empty() {
            let wanted = all.clone();
            requests.push(FeatureRequest::new(all, async move {
                self.weather_all(location, &wanted).await
            }));
        }
        if features.contains(&Feature::Minutely) {
            requests.push(FeatureRequest::new([Feature::Minutely].into(), self.minutely(location)));
        }

        requests
    }
}
