//! ClimWeb, the CMS several African national weather services run.
//!
//! Every instance exposes the same API, so one [`ClimWebSource`] serves them
//! all; an [`Instance`] only carries what differs between countries.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    error::SourceError,
    http::SourceClient,
    model::{Feature, FeatureSet, Location, WeatherWrapper},
    source::{FeatureRequest, LocationParameters, SourceId, WeatherSource},
    units::Locale,
};

mod converter;
mod json;

use json::{ClimWebAlert, ClimWebCities, ClimWebForecastResult};

const CITY_ID: &str = "cityId";

const SUPPORTED: &[Feature] = &[Feature::Forecast, Feature::Alert];

#[derive(Debug, PartialEq, Eq)]
pub struct Instance {
    pub id: SourceId,
    pub base_url: &'static str,
    pub country_code: &'static str,
    /// Languages the site is published in; the first is the fallback.
    pub languages: &'static [&'static str],
}

pub const INSTANCES: &[Instance] = &[
    Instance {
        id: SourceId::Emi,
        base_url: "https://www.ethiomet.gov.et",
        country_code: "ET",
        languages: &["en", "am"],
    },
    Instance {
        id: SourceId::GMet,
        base_url: "https://www.meteo.gov.gh",
        country_code: "GH",
        languages: &["en"],
    },
    Instance {
        id: SourceId::MeteoBenin,
        base_url: "https://www.meteobenin.bj",
        country_code: "BJ",
        languages: &["fr", "en"],
    },
];

#[derive(Debug, Clone)]
pub struct ClimWebSource {
    instance: &'static Instance,
    client: SourceClient,
    base_url: String,
    language: &'static str,
}

impl ClimWebSource {
    pub fn new(
        id: SourceId,
        client: SourceClient,
        instance_url: Option<&str>,
        language: Locale,
    ) -> Result<Self, SourceError> {
        let instance = INSTANCES
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| SourceError::InvalidData(format!("{id} is not a ClimWeb instance")))?;

        let language = instance
            .languages
            .iter()
            .copied()
            .find(|l| *l == language.language())
            .or_else(|| instance.languages.first().copied())
            .unwrap_or("en");

        Ok(Self {
            instance,
            client,
            base_url: instance_url.unwrap_or(instance.base_url).to_string(),
            language,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/api/{}", self.base_url, self.language, path)
    }

    #[instrument(skip_all, fields(source = %self.instance.id), level = "debug")]
    async fn forecast(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let city_id = location
            .parameter(self.instance.id.as_str(), CITY_ID)
            .ok_or_else(|| SourceError::LocationNotFound("missing ClimWeb city id".into()))?;

        let result: ClimWebForecastResult = self
            .client
            .get_json(&self.url("forecasts/city-forecasts"), &[("city_id", city_id)])
            .await?;

        Ok(WeatherWrapper {
            daily_forecast: Some(converter::convert_daily(&result.forecasts)?),
            ..WeatherWrapper::default()
        })
    }

    async fn alerts(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let alerts: Vec<ClimWebAlert> = self
            .client
            .get_json(&self.url("cap-alerts"), &[("active", "true")])
            .await?;
        debug!(count = alerts.len(), "ClimWeb alerts fetched");

        Ok(WeatherWrapper {
            alert_list: Some(converter::convert_alerts(&alerts, location.coordinates())),
            ..WeatherWrapper::default()
        })
    }
}

#[async_trait]
impl WeatherSource for ClimWebSource {
    fn id(&self) -> SourceId {
        self.instance.id
    }

    fn supported_features(&self) -> &'static [Feature] {
        SUPPORTED
    }

    /// Unknown countries are given the benefit of the doubt.
    fn is_feature_supported_for_location(&self, location: &Location, feature: Feature) -> bool {
        SUPPORTED.contains(&feature)
            && (location.country_code.is_none()
                || location.is_in_country(&[self.instance.country_code]))
    }

    fn needs_location_parameters_refresh(&self, location: &Location, features: &FeatureSet) -> bool {
        features.contains(&Feature::Forecast)
            && location.parameter(self.id().as_str(), CITY_ID).is_none()
    }

    async fn request_location_parameters(
        &self,
        location: &Location,
    ) -> Result<LocationParameters, SourceError> {
        let cities: ClimWebCities = self.client.get_json(&self.url("cities"), &[]).await?;
        let city_id = converter::nearest_city(&cities, location.coordinates())?;
        debug!(source = %self.instance.id, %city_id, "Resolved ClimWeb city");

        Ok(LocationParameters::from([(CITY_ID.to_string(), city_id)]))
    }

    fn feature_requests<'a>(
        &'a self,
        location: &'a Location,
        features: &FeatureSet,
    ) -> Vec<FeatureRequest<'a>> {
        let mut requests = Vec::new();
        if features.contains(&Feature::Forecast) {
            requests.push(FeatureRequest::new([Feature::Forecast].into(), self.forecast(location)));
        }
        if features.contains(&Feature::Alert) {
            requests.push(FeatureRequest::new([Feature::Alert].into(), self.alerts(location)));
        }
        requests
    }
}
