//! Core library for the `breezy` CLI.
//!
//! This crate defines:
//! - Typed measurement units with conversion and locale-aware formatting
//! - The canonical weather model every source converts into
//! - Weather sources and their response converters
//! - The refresher that runs a source's requests with partial failure
//!
//! It is used by `breezy-cli`, but can also be reused by other binaries or services.

pub mod completion;
pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod model;
pub mod refresh;
pub mod source;
pub mod units;

pub use config::{Config, SourceConfig, UnitPreferences};
pub use error::{SourceError, UnitError};
pub use model::{Feature, FeatureSet, Location, WeatherWrapper};
pub use refresh::{RefreshOutcome, RefreshTicket, WeatherRefresher};
pub use source::{SourceId, WeatherSource, source_from_config};
