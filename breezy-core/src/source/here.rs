use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    error::SourceError,
    http::SourceClient,
    model::{Feature, FeatureSet, Location, WeatherWrapper},
    source::{FeatureRequest, SourceId, WeatherSource, subset},
    units::Locale,
};

mod converter;
mod json;

use json::{HereReport, HereRevGeocode};

const WEATHER_BASE_URL: &str = "https://weather.hereapi.com";
const GEOCODE_BASE_URL: &str = "https://revgeocode.search.hereapi.com";

const SUPPORTED: &[Feature] = &[
    Feature::Current,
    Feature::Forecast,
    Feature::Alert,
    Feature::ReverseGeocoding,
];

/// Served by one `report` call. Alerts get a call of their own.
const REPORT_GROUP: &[Feature] = &[Feature::Current, Feature::Forecast];

#[derive(Debug, Clone)]
pub struct HereSource {
    client: SourceClient,
    api_key: String,
    weather_url: String,
    geocode_url: String,
    language: Locale,
}

impl HereSource {
    /// An instance override replaces both the weather and geocoding hosts.
    pub fn new(
        client: SourceClient,
        api_key: String,
        instance: Option<&str>,
        language: Locale,
    ) -> Self {
        Self {
            client,
            api_key,
            weather_url: instance.unwrap_or(WEATHER_BASE_URL).to_string(),
            geocode_url: instance.unwrap_or(GEOCODE_BASE_URL).to_string(),
            language,
        }
    }

    /// `products` for the requested features.
    fn products(features: &FeatureSet) -> String {
        let mut products = Vec::new();
        if features.contains(&Feature::Current) {
            products.push("observation");
        }
        if features.contains(&Feature::Forecast) {
            products.push("forecast7days");
            products.push("forecastHourly");
        }
        if features.contains(&Feature::Alert) {
            products.push("nwsAlerts");
        }
        products.join(",")
    }

    #[instrument(skip_all, level = "debug")]
    async fn report(
        &self,
        location: &Location,
        features: &FeatureSet,
    ) -> Result<WeatherWrapper, SourceError> {
        let products = Self::products(features);
        let at = format!("{},{}", location.latitude(), location.longitude());
        let language = self.language.to_string();
        debug!(%products, "HERE report");

        let report: HereReport = self
            .client
            .get_json(
                &format!("{}/v3/report", self.weather_url),
                &[
                    ("products", products.as_str()),
                    ("location", at.as_str()),
                    ("units", "metric"),
                    ("oneObservation", "true"),
                    ("lang", language.as_str()),
                    ("apiKey", self.api_key.as_str()),
                ],
            )
            .await?;

        converter::convert_report(report.places.first(), features, location)
    }

    async fn reverse_geocoding(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let at = format!("{},{}", location.latitude(), location.longitude());
        let language = self.language.to_string();
        let result: HereRevGeocode = self
            .client
            .get_json(
                &format!("{}/v1/revgeocode", self.geocode_url),
                &[
                    ("at", at.as_str()),
                    ("lang", language.as_str()),
                    ("apiKey", self.api_key.as_str()),
                ],
            )
            .await?;

        let item = result
            .items
            .first()
            .ok_or_else(|| SourceError::LocationNotFound(location.cache_key()))?;
        Ok(WeatherWrapper {
            location_address: Some(converter::convert_address(&item.address)),
            ..WeatherWrapper::default()
        })
    }
}

#[async_trait]
impl WeatherSource for HereSource {
    fn id(&self) -> SourceId {
        SourceId::Here
    }

    fn supported_features(&self) -> &'static [Feature] {
        SUPPORTED
    }

    /// NWS alerts only exist for the United States.
    fn is_feature_supported_for_location(&self, location: &Location, feature: Feature) -> bool {
        match feature {
            Feature::Alert => location.is_in_country(&["US", "PR", "GU", "VI", "AS", "MP"]),
            other => SUPPORTED.contains(&other),
        }
    }

    fn feature_requests<'a>(
        &'a self,
        location: &'a Location,
        features: &FeatureSet,
    ) -> Vec<FeatureRequest<'a>> {
        let mut requests = Vec::new();

        let report = subset(features, REPORT_GROUP);
        if !report.is_empty() {
            let wanted = report.clone();
            requests.push(FeatureRequest::new(report, async move {
                self.report(location, &wanted).await
            }));
        }
        if features.contains(&Feature::Alert) {
            let wanted = FeatureSet::from([Feature::Alert]);
            requests.push(FeatureRequest::new(wanted.clone(), async move {
                self.report(location, &wanted).await
            }));
        }
        if features.contains(&Feature::ReverseGeocoding) {
            requests.push(FeatureRequest::new(
                [Feature::ReverseGeocoding].into(),
                self.reverse_geocoding(location),
            ));
        }

        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn products_follow_features() {
        assert_eq!(
            HereSource::products(&[Feature::Current, Feature::Alert].into()),
            "observation,nwsAlerts"
        );
        assert_eq!(
            HereSource::products(&[Feature::Forecast].into()),
            "forecast7days,forecastHourly"
        );
        assert_eq!(HereSource::products(&FeatureSet::new()), "");
    }

    #[test]
    fn alerts_are_requested_apart_from_weather() {
        let client = SourceClient::new(&Config::default()).unwrap();
        let source = HereSource::new(client, "k".into(), None, Locale::english());
        let location = Location::new(40.71, -74.01, chrono_tz::America::New_York);
        let features = FeatureSet::from([
            Feature::Current,
            Feature::Forecast,
            Feature::Alert,
            Feature::ReverseGeocoding,
        ]);

        let requests = source.feature_requests(&location, &features);
        let groups: Vec<_> = requests.iter().map(|r| r.features.clone()).collect();
        assert_eq!(
            groups,
            vec![
                FeatureSet::from([Feature::Current, Feature::Forecast]),
                FeatureSet::from([Feature::Alert]),
                FeatureSet::from([Feature::ReverseGeocoding]),
            ]
        );
    }
}
