//! Veðurstofa Íslands (Icelandic Met Office).
//!
//! Forecasts are per station, so the nearest station id is cached on the
//! location. Warnings come from the CAP broker and are matched to the
//! location by polygon.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use crate::{
    error::SourceError,
    http::SourceClient,
    model::{Feature, FeatureSet, Location, WeatherWrapper},
    source::{FeatureRequest, LocationParameters, SourceId, WeatherSource, subset},
    units::Locale,
};

mod converter;
mod json;

use json::{VedurCapAlert, VedurForecastResult, VedurStation};

const DEFAULT_BASE_URL: &str = "https://api.vedur.is";
const STATION_ID: &str = "stationId";

const SUPPORTED: &[Feature] = &[Feature::Current, Feature::Forecast, Feature::Alert];
const FORECAST_GROUP: &[Feature] = &[Feature::Current, Feature::Forecast];

#[derive(Debug, Clone)]
pub struct VedurSource {
    client: SourceClient,
    base_url: String,
    /// `is` or `en`; the only languages published.
    language: &'static str,
}

impl VedurSource {
    pub fn new(client: SourceClient, instance: Option<&str>, language: Locale) -> Self {
        Self {
            client,
            base_url: instance.unwrap_or(DEFAULT_BASE_URL).to_string(),
            language: if language.language() == "is" { "is" } else { "en" },
        }
    }

    #[instrument(skip_all, level = "debug")]
    async fn forecast(
        &self,
        location: &Location,
        features: &FeatureSet,
    ) -> Result<WeatherWrapper, SourceError> {
        let station = location
            .parameter(self.id().as_str(), STATION_ID)
            .ok_or_else(|| SourceError::LocationNotFound("missing Veður station id".into()))?;

        let result: VedurForecastResult = self
            .client
            .get_json(
                &format!(
                    "{}/weather/forecasts/{}/station/{}",
                    self.base_url, self.language, station
                ),
                &[],
            )
            .await?;
        converter::convert_forecast(&result, location, features, Utc::now())
    }

    async fn alerts(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let alerts: Vec<VedurCapAlert> = self
            .client
            .get_json(
                &format!("{}/cap/v1/capbroker/active/category/Met", self.base_url),
                &[],
            )
            .await?;
        debug!(count = alerts.len(), "Veður CAP alerts fetched");

        Ok(WeatherWrapper {
            alert_list: Some(converter::convert_alerts(
                &alerts,
                location.coordinates(),
                self.language,
            )),
            ..WeatherWrapper::default()
        })
    }
}

#[async_trait]
impl WeatherSource for VedurSource {
    fn id(&self) -> SourceId {
        SourceId::Vedur
    }

    fn supported_features(&self) -> &'static [Feature] {
        SUPPORTED
    }

    fn is_feature_supported_for_location(&self, location: &Location, feature: Feature) -> bool {
        SUPPORTED.contains(&feature)
            && (location.country_code.is_none() || location.is_in_country(&["IS"]))
    }

    fn needs_location_parameters_refresh(&self, location: &Location, features: &FeatureSet) -> bool {
        !subset(features, FORECAST_GROUP).is_empty()
            && location.parameter(self.id().as_str(), STATION_ID).is_none()
    }

    async fn request_location_parameters(
        &self,
        location: &Location,
    ) -> Result<LocationParameters, SourceError> {
        let stations: Vec<VedurStation> = self
            .client
            .get_json(&format!("{}/weather/stations", self.base_url), &[])
            .await?;
        let station = converter::nearest_station(&stations, location.coordinates())?;
        debug!(%station, "Resolved Veður station");

        Ok(LocationParameters::from([(STATION_ID.to_string(), station)]))
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
        if features.contains(&Feature::Alert) {
            requests.push(FeatureRequest::new([Feature::Alert].into(), self.alerts(location)));
        }

        requests
    }
}
