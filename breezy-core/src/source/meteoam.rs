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

use json::MeteoAmMeteogram;

const DEFAULT_BASE_URL: &str = "https://api.meteoam.it/deda-meteograms/api/GetMeteogram/preset1";

const SUPPORTED: &[Feature] = &[Feature::Current, Feature::Forecast];

/// Servizio Meteorologico dell'Aeronautica Militare.
#[derive(Debug, Clone)]
pub struct MeteoAmSource {
    client: SourceClient,
    base_url: String,
}

impl MeteoAmSource {
    pub fn new(client: SourceClient, instance: Option<&str>) -> Self {
        Self {
            client,
            base_url: instance.unwrap_or(DEFAULT_BASE_URL).to_string(),
        }
    }

    #[instrument(skip_all, level = "debug")]
    async fn meteogram(
        &self,
        location: &Location,
        features: &FeatureSet,
    ) -> Result<WeatherWrapper, SourceError> {
        let url = format!(
            "{}/{:.4},{:.4}",
            self.base_url,
            location.latitude(),
            location.longitude()
        );
        let raw: MeteoAmMeteogram = self.client.get_json(&url, &[]).await?;
        converter::convert_meteogram(&raw, location, features, Utc::now())
    }
}

#[async_trait]
impl WeatherSource for MeteoAmSource {
    fn id(&self) -> SourceId {
        SourceId::MeteoAm
    }

    fn supported_features(&self) -> &'static [Feature] {
        SUPPORTED
    }

    fn feature_requests<'a>(
        &'a self,
        location: &'a Location,
        features: &FeatureSet,
    ) -> Vec<FeatureRequest<'a>> {
        let wanted = subset(features, SUPPORTED);
        if wanted.is_empty() {
            return Vec::new();
        }
        let group = wanted.clone();
        vec![FeatureRequest::new(group, async move {
            self.meteogram(location, &wanted).await
        })]
    }
}
