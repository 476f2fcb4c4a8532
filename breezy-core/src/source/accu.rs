use async_trait::async_trait;
use chrono::{Datelike, Utc};
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

use json::{
    AccuAirQualityResult, AccuAlert, AccuClimoSummary, AccuCurrent, AccuForecastDailyResult,
    AccuForecastHourly, AccuLocation, AccuMinutelyResult,
};

const DEFAULT_BASE_URL: &str = "https://dataservice.accuweather.com";
const LOCATION_KEY: &str = "locationKey";

const SUPPORTED: &[Feature] = &[
    Feature::Current,
    Feature::Forecast,
    Feature::Pollen,
    Feature::Minutely,
    Feature::Alert,
    Feature::AirQuality,
    Feature::Normals,
    Feature::ReverseGeocoding,
];

/// Served by the three-call forecast round.
const FORECAST_GROUP: &[Feature] = &[Feature::Current, Feature::Forecast, Feature::Pollen];

/// Everything except minutely and reverse geocoding is keyed by location key.
const KEYED: &[Feature] = &[
    Feature::Current,
    Feature::Forecast,
    Feature::Pollen,
    Feature::Alert,
    Feature::AirQuality,
    Feature::Normals,
];

#[derive(Debug, Clone)]
pub struct AccuWeatherSource {
    client: SourceClient,
    api_key: String,
    base_url: String,
    language: Locale,
}

impl AccuWeatherSource {
    pub fn new(
        client: SourceClient,
        api_key: String,
        instance: Option<&str>,
        language: Locale,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: instance.unwrap_or(DEFAULT_BASE_URL).to_string(),
            language,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `en-us`-style tag AccuWeather expects.
    fn language_tag(&self) -> String {
        self.language.to_string().to_lowercase()
    }

    fn location_key<'l>(&self, location: &'l Location) -> Result<&'l str, SourceError> {
        location
            .parameter(self.id().as_str(), LOCATION_KEY)
            .ok_or_else(|| SourceError::LocationNotFound("missing AccuWeather location key".into()))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let language = self.language_tag();
        let mut query = vec![
            ("apikey", self.api_key.as_str()),
            ("language", language.as_str()),
        ];
        query.extend_from_slice(extra);
        self.client.get_json(&self.url(path), &query).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn geoposition(&self, latitude: f64, longitude: f64) -> Result<AccuLocation, SourceError> {
        let q = format!("{latitude},{longitude}");
        self.get("locations/v1/cities/geoposition/search", &[("q", q.as_str())])
            .await
    }

    async fn forecast(
        &self,
        location: &Location,
        features: &FeatureSet,
    ) -> Result<WeatherWrapper, SourceError> {
        let key = self.location_key(location)?;
        let wants_current = features.contains(&Feature::Current);
        let wants_daily =
            features.contains(&Feature::Forecast) || features.contains(&Feature::Pollen);
        let wants_hourly = features.contains(&Feature::Forecast);

        let details = [("details", "true"), ("metric", "true")];
        let current_path = format!("currentconditions/v1/{key}");
        let daily_path = format!("forecasts/v1/daily/15day/{key}");
        let hourly_path = format!("forecasts/v1/hourly/72hour/{key}");
        let wants_minutely = features.contains(&Feature::Minutely);

        let current = async {
            if wants_current {
                self.get::<Vec<AccuCurrent>>(&current_path, &details)
                    .await
                    .map(|mut list| (!list.is_empty()).then(|| list.swap_remove(0)))
            } else {
                Ok(None)
            }
        };
        let daily = async {
            if wants_daily {
                self.get::<AccuForecastDailyResult>(&daily_path, &details)
                    .await
                    .map(Some)
            } else {
                Ok(None)
            }
        };
        let hourly = async {
            if wants_hourly {
                self.get::<Vec<AccuForecastHourly>>(&hourly_path, &details)
                    .await
                    .map(Some)
            } else {
                Ok(None)
            }
        };

        let minutely = async {
            if wants_minutely {
                self.fetch_minutely(location).await.map(Some)
            } else {
                Ok(None)
            }
        };

        let (current, daily, hourly, minutely) =
            tokio::try_join!(current, daily, hourly, minutely)?;
        debug!(
            current = current.is_some(),
            daily = daily.is_some(),
            hourly = hourly.is_some(),
            minutely = minutely.is_some(),
            "AccuWeather forecast round"
        );

        converter::convert_forecast(
            current.as_ref(),
            daily.as_ref(),
            hourly.as_deref(),
            minutely.as_ref(),
            location,
        )
    }

    async fn fetch_minutely(&self, location: &Location) -> Result<AccuMinutelyResult, SourceError> {
        let q = format!("{},{}", location.latitude(), location.longitude());
        self.get("forecasts/v1/minute", &[("q", q.as_str()), ("details", "true")])
            .await
    }

    async fn minutely(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let result = self.fetch_minutely(location).await?;
        Ok(WeatherWrapper {
            minutely_forecast: Some(converter::convert_minutely(&result)),
            ..WeatherWrapper::default()
        })
    }

    async fn alerts(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let key = self.location_key(location)?;
        let alerts: Vec<AccuAlert> = self
            .get(&format!("alerts/v1/{key}"), &[("details", "true")])
            .await?;

        Ok(WeatherWrapper {
            alert_list: Some(converter::convert_alerts(&alerts)),
            ..WeatherWrapper::default()
        })
    }

    async fn air_quality(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let key = self.location_key(location)?;
        let result: AccuAirQualityResult = self
            .get(&format!("airquality/v2/forecasts/hourly/96hour/{key}"), &[])
            .await?;

        let air_quality = converter::convert_air_quality(&result, location);
        Ok(WeatherWrapper {
            air_quality: (!air_quality.is_empty()).then_some(air_quality),
            ..WeatherWrapper::default()
        })
    }

    async fn normals(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let key = self.location_key(location)?;
        let today = location.local_date(Utc::now());
        let path = format!(
            "climo/v1/summary/{}/{:02}/{key}",
            today.year(),
            today.month()
        );
        let summary: AccuClimoSummary = self.get(&path, &[("details", "true")]).await?;

        Ok(WeatherWrapper {
            normals: converter::convert_normals(&summary, today.month()),
            ..WeatherWrapper::default()
        })
    }

    async fn reverse_geocoding(&self, location: &Location) -> Result<WeatherWrapper, SourceError> {
        let found = self
            .geoposition(location.latitude(), location.longitude())
            .await?;

        Ok(WeatherWrapper {
            location_address: Some(converter::convert_address(&found)),
            ..WeatherWrapper::default()
        })
    }
}

#[async_trait]
impl WeatherSource for AccuWeatherSource {
    fn id(&self) -> SourceId {
        SourceId::AccuWeather
    }

    fn supported_features(&self) -> &'static [Feature] {
        SUPPORTED
    }

    fn needs_location_parameters_refresh(&self, location: &Location, features: &FeatureSet) -> bool {
        !subset(features, KEYED).is_empty()
            && location.parameter(self.id().as_str(), LOCATION_KEY).is_none()
    }

    async fn request_location_parameters(
        &self,
        location: &Location,
    ) -> Result<LocationParameters, SourceError> {
        let found = self
            .geoposition(location.latitude(), location.longitude())
            .await
            .map_err(|err| match err {
                SourceError::RequestFailed { status: 400 | 404, .. } => {
                    SourceError::LocationNotFound(location.cache_key())
                }
                other => other,
            })?;

        Ok(LocationParameters::from([(LOCATION_KEY.to_string(), found.key)]))
    }

    fn feature_requests<'a>(
        &'a self,
        location: &'a Location,
        features: &FeatureSet,
    ) -> Vec<FeatureRequest<'a>> {
        let mut requests = Vec::new();

        let mut forecast = subset(features, FORECAST_GROUP);
        // Current conditions carry the minutely summary phrase, so both come
        // from the same round.
        let minutely_in_round =
            features.contains(&Feature::Minutely) && forecast.contains(&Feature::Current);
        if minutely_in_round {
            forecast.insert(Feature::Minutely);
        }
        if !forecast.is_empty() {
            let wanted = forecast.clone();
            requests.push(FeatureRequest::new(forecast, async move {
                self.forecast(location, &wanted).await
            }));
        }
        if features.contains(&Feature::Minutely) && !minutely_in_round {
            requests.push(FeatureRequest::new(
                [Feature::Minutely].into(),
                self.minutely(location),
            ));
        }
        if features.contains(&Feature::Alert) {
            requests.push(FeatureRequest::new([Feature::Alert].into(), self.alerts(location)));
        }
        if features.contains(&Feature::AirQuality) {
            requests.push(FeatureRequest::new(
                [Feature::AirQuality].into(),
                self.air_quality(location),
            ));
        }
        if features.contains(&Feature::Normals) {
            requests.push(FeatureRequest::new([Feature::Normals].into(), self.normals(location)));
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
