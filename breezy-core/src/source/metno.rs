use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use crate::{
    error::SourceError,
    http::SourceClient,
    model::{Feature, FeatureSet, Location, WeatherWrapper},
    source::{FeatureRequest, SourceId, WeatherSource, subset},
};

mod converter;
mod json;

use json::{MetNoAirQualityResult, MetNoAlertsResult, MetNoForecastResult};

const DEFAULT_BASE_URL: &str = "https://api.met.no/weatherapi";

const SUPPORTED: &[Feature] = &[
    Feature::Current,
    Feature::Forecast,
    Feature::Minutely,
    Feature::AirQuality,
    Feature::Alert,
];

const FORECAST_GROUP: &[Feature] = &[Feature::Current, Feature::Forecast];

/// Nowcast radar coverage.
const NOWCAST_COUNTRIES: &[&str] = &["NO", "SE", "FI", "DK"];

/// MET Norway: locationforecast, nowcast, air quality and MetAlerts.
///
/// Needs no key, but rejects requests without an identifying User-Agent.
#[derive(Debug, Clone)]
pub struct MetNorwaySource {
    client: SourceClient,
    base_url: String,
}

impl MetNorwaySource {
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
    ) -> Result<T, SourceError> {
        // MET Norway asks clients to send at most four decimals.
        let lat = format!("{:.4}", location.latitude());
        let lon = format!("{:.4}", location.longitude());
        self.client
            .get_json(
                &format!("{}/{}", self.base_url, path),
                &[("lat", lat.as_str()), ("lon", lon.as_str())],
            )
            .await
    }

    #[instrument(skip_all, level = "debug")]
    async fn forecast(
        &self,
        location: &Location,
        features: &FeatureSet,
    ) -> Result<WeatherWrapper, SourceError> {
        let result: MetNoForecastResult = self.get("locationforecast/2.0/complete", location).await?;
        converter::convert_forecast(&result, location, features, Utc::now())
    }

    async fn nowcast(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let result: MetNoForecastResult = self.get("nowcast/2.0/complete", location).await?;
        Ok(WeatherWrapper {
            minutely_forecast: Some(converter::convert_nowcast(&result)),
            ..WeatherWrapper::default()
        })
    }

    async fn air_quality(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let result: MetNoAirQualityResult = self.get("airqualityforecast/0.1/", location).await?;
        let air_quality = converter::convert_air_quality(&result, location);
        Ok(WeatherWrapper {
            air_quality: (!air_quality.is_empty()).then_some(air_quality),
            ..WeatherWrapper::default()
        })
    }

    async fn alerts(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let result: MetNoAlertsResult = self.get("metalerts/2.0/current.json", location).await?;
        Ok(WeatherWrapper {
            alert_list: Some(converter::convert_alerts(&result)),
            ..WeatherWrapper::default()
        })
    }
}

#[async_trait]
impl WeatherSource for MetNorwaySource {
    fn id(&self) -> SourceId {
        SourceId::MetNorway
    }

    fn supported_features(&self) -> &'static [Feature] {
        SUPPORTED
    }

    fn is_feature_supported_for_location(&self, location: &Location, feature: Feature) -> bool {
        match feature {
            Feature::Minutely => location.is_in_country(NOWCAST_COUNTRIES),
            // Air quality forecasts and MetAlerts only cover Norway.
            Feature::AirQuality | Feature::Alert => location.is_in_country(&["NO", "SJ"]),
            other => SUPPORTED.contains(&other),
        }
    }

    fn feature_requests<'a>(
        &'a self,
        location: &'a Location,
        features: &FeatureSet,
    ) -> Vec<FeatureRequest<'a>> {
        let mut requests = Vec::new();

        let forecast = subset(features, FORECAST_GROUP);
        if !forecast.is_empty() {
            let wanted = forecast.clone();
            requests.push(FeatureRequest::new(forecast, async move {
                self.forecast(location, &wanted).await
            }));
        }
        if features.contains(&Feature::Minutely) {
            requests.push(FeatureRequest::new([Feature::Minutely].into(), self.nowcast(location)));
        }
        if features.contains(&Feature::AirQuality) {
            requests.push(FeatureRequest::new(
                [Feature::AirQuality].into(),
                self.air_quality(location),
            ));
        }
        if features.contains(&Feature::Alert) {
            requests.push(FeatureRequest::new([Feature::Alert].into(), self.alerts(location)));
        }

        requests
    }
}
