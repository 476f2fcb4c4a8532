use crate::{
    config::Config,
    error::SourceError,
    http::SourceClient,
    model::{Feature, FeatureSet, Location, WeatherWrapper},
    source::{
        accu::AccuWeatherSource, china::ChinaSource, climweb::ClimWebSource, here::HereSource,
        meteoam::MeteoAmSource, metno::MetNorwaySource, vedur::VedurSource,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer};
use std::{collections::BTreeMap, convert::TryFrom, fmt::Debug, future::Future, sync::Arc};

pub mod accu;
pub mod china;
pub mod climweb;
pub mod here;
pub mod meteoam;
pub mod metno;
pub mod vedur;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceId {
    AccuWeather,
    MetNorway,
    /// Ethiopian Meteorological Institute (ClimWeb).
    Emi,
    /// Ghana Meteorological Agency (ClimWeb).
    GMet,
    /// Météo-Bénin (ClimWeb).
    MeteoBenin,
    Here,
    MeteoAm,
    Vedur,
    China,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::AccuWeather => "accu",
            SourceId::MetNorway => "metno",
            SourceId::Emi => "emi",
            SourceId::GMet => "gmet",
            SourceId::MeteoBenin => "meteobenin",
            SourceId::Here => "here",
            SourceId::MeteoAm => "meteoam",
            SourceId::Vedur => "vedur",
            SourceId::China => "china",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceId::AccuWeather => "AccuWeather",
            SourceId::MetNorway => "MET Norway",
            SourceId::Emi => "EMI (Ethiopia)",
            SourceId::GMet => "GMet (Ghana)",
            SourceId::MeteoBenin => "Météo-Bénin",
            SourceId::Here => "HERE",
            SourceId::MeteoAm => "Servizio Meteo AM",
            SourceId::Vedur => "Veðurstofa Íslands",
            SourceId::China => "中国",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[
            SourceId::AccuWeather,
            SourceId::MetNorway,
            SourceId::Emi,
            SourceId::GMet,
            SourceId::MeteoBenin,
            SourceId::Here,
            SourceId::MeteoAm,
            SourceId::Vedur,
            SourceId::China,
        ]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, SourceId::AccuWeather | SourceId::Here)
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        SourceId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == lower)
            .ok_or_else(|| {
                let known: Vec<_> = SourceId::all().iter().map(SourceId::as_str).collect();
                anyhow::anyhow!(
                    "Unknown source '{value}'. Supported sources: {}.",
                    known.join(", ")
                )
            })
    }
}

/// Cached lookups a source stores on a [`Location`].
pub type LocationParameters = BTreeMap<String, String>;

pub type FeatureFuture<'a> = BoxFuture<'a, Result<WeatherWrapper, SourceError>>;

/// One network round (possibly several concurrent calls) covering a group of
/// features. A failure of the future fails every feature in `features`.
pub struct FeatureRequest<'a> {
    pub features: FeatureSet,
    pub future: FeatureFuture<'a>,
}

impl<'a> FeatureRequest<'a> {
    pub fn new<F>(features: FeatureSet, future: F) -> Self
    where
        F: Future<Output = Result<WeatherWrapper, SourceError>> + Send + 'a,
    {
        Self {
            features,
            future: Box::pin(future),
        }
    }
}

impl Debug for FeatureRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureRequest")
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

/// RFC 3339 timestamps, tolerating a missing offset (taken as UTC).
pub(crate) fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Accepts `12.5`, `"12.5"`, `"*"` and `null`; anything non-numeric is `None`.
pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Features of `group` that were asked for.
pub(crate) fn subset(requested: &FeatureSet, group: &[Feature]) -> FeatureSet {
    group
        .iter()
        .copied()
        .filter(|f| requested.contains(f))
        .collect()
}

/// A weather provider.
///
/// Sources describe their network calls as [`FeatureRequest`]s; the
/// refresher runs them concurrently and handles partial failure.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    fn id(&self) -> SourceId;

    fn supported_features(&self) -> &'static [Feature];

    /// Whether `feature` can be served for this particular location.
    fn is_feature_supported_for_location(&self, _location: &Location, feature: Feature) -> bool {
        self.supported_features().contains(&feature)
    }

    /// True when cached parameters are missing and `features` need them.
    fn needs_location_parameters_refresh(
        &self,
        _location: &Location,
        _features: &FeatureSet,
    ) -> bool {
        false
    }

    /// Resolves the parameters this source caches on a location.
    async fn request_location_parameters(
        &self,
        _location: &Location,
    ) -> Result<LocationParameters, SourceError> {
        Ok(LocationParameters::new())
    }

    /// One request per feature group. `features` only holds supported,
    /// requested features.
    fn feature_requests<'a>(
        &'a self,
        location: &'a Location,
        features: &FeatureSet,
    ) -> Vec<FeatureRequest<'a>>;
}

/// Construct a source from config and explicit SourceId.
pub fn source_from_config(
    id: SourceId,
    config: &Config,
) -> Result<Arc<dyn WeatherSource>, SourceError> {
    let client = SourceClient::new(config)?;
    let api_key = || {
        config
            .api_key(id)
            .map(str::to_owned)
            .ok_or_else(|| SourceError::ApiKeyMissing(id.to_string()))
    };
    let language = config.language.clone();

    let source: Arc<dyn WeatherSource> = match id {
        SourceId::AccuWeather => Arc::new(AccuWeatherSource::new(
            client,
            api_key()?,
            config.instance(id),
            language,
        )),
        SourceId::MetNorway => Arc::new(MetNorwaySource::new(client, config.instance(id))),
        SourceId::Emi | SourceId::GMet | SourceId::MeteoBenin => {
            Arc::new(ClimWebSource::new(id, client, config.instance(id), language)?)
        }
        SourceId::Here => Arc::new(HereSource::new(
            client,
            api_key()?,
            config.instance(id),
            language,
        )),
        SourceId::MeteoAm => Arc::new(MeteoAmSource::new(client, config.instance(id))),
        SourceId::Vedur => Arc::new(VedurSource::new(client, config.instance(id), language)),
        SourceId::China => Arc::new(ChinaSource::new(client, config.instance(id))),
    };

    Ok(source)
}

/// Every source that can be built from `config`; unconfigured ones are skipped.
pub fn configured_sources(config: &Config) -> Vec<Arc<dyn WeatherSource>> {
    SourceId::all()
        .iter()
        .filter(|id| config.is_source_configured(**id))
        .filter_map(|id| match source_from_config(*id, config) {
            Ok(source) => Some(source),
            Err(err) => {
                tracing::warn!(source = %id, error = %err, "Skipping source");
                None
            }
        })
        .collect()
}
