//! Canonical, source-agnostic weather model.
//!
//! Every converter produces these types and every consumer reads them.
//! Numeric fields carry unit types from [`crate::units`]; absent values are
//! `None`, never zero.

mod air_quality;
mod alert;
mod location;
mod weather;
mod weather_code;
mod wrapper;

pub use air_quality::{AirQuality, AirQualityWrapper, Pollen, PollenWrapper, Pollutant};
pub use alert::{Alert, AlertSeverity, sort_alerts, synthesize_alert_id};
pub use location::{Location, LocationAddress};
pub use weather::{
    Current, Daily, HalfDay, Hourly, Minutely, Normals, PrecipitationProbability,
    PrecipitationTotals, SunTimes, Wind,
};
pub use weather_code::WeatherCode;
pub use wrapper::{Feature, FeatureSet, WeatherWrapper};
