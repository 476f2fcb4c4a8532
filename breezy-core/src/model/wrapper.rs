use std::{collections::BTreeMap, collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    AirQualityWrapper, Alert, Current, Daily, Hourly, LocationAddress, Minutely, Normals,
    PollenWrapper,
};
use crate::error::SourceError;

/// One independently requestable category of weather data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Current,
    Forecast,
    Minutely,
    AirQuality,
    Pollen,
    Alert,
    Normals,
    ReverseGeocoding,
}

pub type FeatureSet = BTreeSet<Feature>;

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Forecast => "forecast",
            Self::Minutely => "minutely",
            Self::AirQuality => "air_quality",
            Self::Pollen => "pollen",
            Self::Alert => "alert",
            Self::Normals => "normals",
            Self::ReverseGeocoding => "reverse_geocoding",
        }
    }

    pub const fn all() -> &'static [Feature] {
        &[
            Self::Current,
            Self::Forecast,
            Self::Minutely,
            Self::AirQuality,
            Self::Pollen,
            Self::Alert,
            Self::Normals,
            Self::ReverseGeocoding,
        ]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| {
                let known: Vec<_> = Self::all().iter().map(Feature::as_str).collect();
                format!("Unknown feature '{s}'. Known features: {}.", known.join(", "))
            })
    }
}

/// Sparse result of a weather request.
///
/// `None` means "not requested or not available", never a zero value.
/// After [`WeatherWrapper::reconcile`], every requested feature is either
/// present or listed in `failed_features`, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherWrapper {
    pub current: Option<Current>,
    pub daily_forecast: Option<Vec<Daily>>,
    pub hourly_forecast: Option<Vec<Hourly>>,
    pub minutely_forecast: Option<Vec<Minutely>>,
    pub air_quality: Option<AirQualityWrapper>,
    pub pollen: Option<PollenWrapper>,
    pub alert_list: Option<Vec<Alert>>,
    pub normals: Option<Normals>,
    pub location_address: Option<LocationAddress>,
    #[serde(skip)]
    pub failed_features: BTreeMap<Feature, SourceError>,
}

impl WeatherWrapper {
    pub fn is_present(&self, feature: Feature) -> bool {
        match feature {
            Feature::Current => self.current.is_some(),
            Feature::Forecast => self.daily_forecast.is_some() || self.hourly_forecast.is_some(),
            Feature::Minutely => self.minutely_forecast.is_some(),
            Feature::AirQuality => self.air_quality.is_some(),
            Feature::Pollen => self.pollen.is_some(),
            Feature::Alert => self.alert_list.is_some(),
            Feature::Normals => self.normals.is_some(),
            Feature::ReverseGeocoding => self.location_address.is_some(),
        }
    }

    pub fn clear(&mut self, feature: Feature) {
        match feature {
            Feature::Current => self.current = None,
            Feature::Forecast => {
                self.daily_forecast = None;
                self.hourly_forecast = None;
            }
            Feature::Minutely => self.minutely_forecast = None,
            Feature::AirQuality => self.air_quality = None,
            Feature::Pollen => self.pollen = None,
            Feature::Alert => self.alert_list = None,
            Feature::Normals => self.normals = None,
            Feature::ReverseGeocoding => self.location_address = None,
        }
    }

    /// Features that carry data.
    pub fn present_features(&self) -> FeatureSet {
        Feature::all()
            .iter()
            .copied()
            .filter(|f| self.is_present(*f))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_features().is_empty()
    }

    /// Fills gaps in `self` from `other`. Values already present win.
    pub fn merge(mut self, other: WeatherWrapper) -> Self {
        self.current = self.current.or(other.current);
        self.daily_forecast = self.daily_forecast.or(other.daily_forecast);
        self.hourly_forecast = self.hourly_forecast.or(other.hourly_forecast);
        self.minutely_forecast = self.minutely_forecast.or(other.minutely_forecast);
        self.air_quality = self.air_quality.or(other.air_quality);
        self.pollen = self.pollen.or(other.pollen);
        self.alert_list = self.alert_list.or(other.alert_list);
        self.normals = self.normals.or(other.normals);
        self.location_address = self.location_address.or(other.location_address);
        for (feature, error) in other.failed_features {
            self.failed_features.entry(feature).or_insert(error);
        }
        self
    }

    pub fn record_failure(&mut self, feature: Feature, error: SourceError) {
        self.failed_features.insert(feature, error);
    }

    /// Enforces the request contract for `requested`:
    /// - unrequested features are dropped, data and failures alike;
    /// - a failed feature carries no data;
    /// - a requested feature with no data is recorded as failed.
    pub fn reconcile(&mut self, requested: &FeatureSet) {
        for feature in Feature::all() {
            if !requested.contains(feature) {
                self.clear(*feature);
                self.failed_features.remove(feature);
            } else if self.failed_features.contains_key(feature) {
                self.clear(*feature);
            } else if !self.is_present(*feature) {
                self.failed_features.insert(
                    *feature,
                    SourceError::InvalidData(format!("source returned no {feature} data")),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> Current {
        Current {
            weather_text: Some("Clear".into()),
            ..Current::default()
        }
    }

    #[test]
    fn feature_parsing() {
        assert_eq!("air-quality".parse::<Feature>().unwrap(), Feature::AirQuality);
        assert_eq!("CURRENT".parse::<Feature>().unwrap(), Feature::Current);
        assert!("radar".parse::<Feature>().unwrap_err().contains("Known features"));
    }

    #[test]
    fn merge_keeps_existing_values() {
        let first = WeatherWrapper {
            current: Some(current()),
            ..WeatherWrapper::default()
        };
        let mut second = WeatherWrapper {
            current: Some(Current::default()),
            alert_list: Some(vec![]),
            ..WeatherWrapper::default()
        };
        second.record_failure(Feature::Normals, SourceError::RateLimitExceeded);

        let merged = first.merge(second);
        assert_eq!(merged.current, Some(current()));
        assert_eq!(merged.alert_list, Some(vec![]));
        assert!(merged.failed_features.contains_key(&Feature::Normals));
    }

    #[test]
    fn reconcile_enforces_present_xor_failed() {
        let requested: FeatureSet = [Feature::Current, Feature::Alert, Feature::Normals].into();
        let mut wrapper = WeatherWrapper {
            current: Some(current()),
            alert_list: Some(vec![]),
            minutely_forecast: Some(vec![]),
            ..WeatherWrapper::default()
        };
        wrapper.record_failure(Feature::Alert, SourceError::Timeout("slow".into()));
        wrapper.record_failure(Feature::Pollen, SourceError::RateLimitExceeded);

        wrapper.reconcile(&requested);

        assert!(wrapper.current.is_some());
        assert!(wrapper.alert_list.is_none());
        assert!(wrapper.minutely_forecast.is_none());
        assert_eq!(
            wrapper.failed_features.keys().copied().collect::<Vec<_>>(),
            [Feature::Alert, Feature::Normals]
        );
        for feature in &requested {
            assert_ne!(
                wrapper.is_present(*feature),
                wrapper.failed_features.contains_key(feature)
            );
        }
    }

    #[test]
    fn empty_alert_list_counts_as_present() {
        let wrapper = WeatherWrapper {
            alert_list: Some(vec![]),
            ..WeatherWrapper::default()
        };
        assert!(wrapper.is_present(Feature::Alert));
        assert!(!wrapper.is_empty());
    }
}
