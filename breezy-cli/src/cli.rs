use anyhow::{Context, anyhow};
use breezy_core::{
    Config, Feature, FeatureSet, Location, SourceId, WeatherRefresher, source_from_config,
    units::{
        DistanceUnit, FormatOptions, PrecipitationUnit, PressureUnit, SpeedUnit, TemperatureUnit,
        Unit, format::format_value,
    },
};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use inquire::{Password, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "breezy", version, about = "Multi-source weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure a source and make it the default.
    Configure {
        /// Source short name, e.g. "metno" or "accu".
        source: String,
    },

    /// List the known sources and whether they are ready to use.
    Sources,

    /// Show weather for a coordinate.
    Show {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// IANA time zone of the location, e.g. "Europe/Oslo".
        #[arg(long, default_value = "UTC")]
        tz: String,

        /// ISO 3166 country code; lets sources skip features they can't serve there.
        #[arg(long)]
        country: Option<String>,

        /// Source to ask; defaults to the configured one.
        #[arg(long)]
        source: Option<String>,

        /// Comma-separated features.
        #[arg(long, value_delimiter = ',', default_value = "current,forecast,alert")]
        features: Vec<String>,
    },

    /// Convert a value between units of the same dimension, e.g. `36 kph mps`.
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: f64,
        from: String,
        to: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { source } => configure(&source),
            Command::Sources => {
                let config = Config::load()?;
                print!("{}", render::sources(&config));
                Ok(())
            }
            Command::Show {
                lat,
                lon,
                tz,
                country,
                source,
                features,
            } => show(lat, lon, &tz, country, source, &features).await,
            Command::Convert { value, from, to } => {
                println!("{}", convert(value, &from, &to)?);
                Ok(())
            }
        }
    }
}

fn configure(source: &str) -> anyhow::Result<()> {
    let id = SourceId::try_from(source)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = Password::new(&format!("API key for {}:", id.name()))
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        if api_key.trim().is_empty() {
            return Err(anyhow!("API key must not be empty"));
        }
        config.upsert_api_key(id, api_key.trim().to_string());
    }

    let instance = Text::new("Instance URL (leave empty for the default):")
        .prompt()
        .context("Failed to read instance URL")?;
    if !instance.trim().is_empty() {
        config.set_instance(id, instance.trim().to_string());
    }

    config.set_default_source(id);
    config.save()?;
    println!("{} configured and set as default source.", id.name());
    Ok(())
}

fn parse_features(raw: &[String]) -> anyhow::Result<FeatureSet> {
    raw.iter()
        .filter(|f| !f.trim().is_empty())
        .map(|f| f.parse::<Feature>().map_err(|e| anyhow!(e)))
        .collect()
}

async fn show(
    lat: f64,
    lon: f64,
    tz: &str,
    country: Option<String>,
    source: Option<String>,
    features: &[String],
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let id = match source {
        Some(source) => SourceId::try_from(source.as_str())?,
        None => config.default_source_id().unwrap_or(SourceId::MetNorway),
    };
    let timezone: Tz = tz
        .parse()
        .map_err(|_| anyhow!("Unknown time zone '{tz}'"))?;
    let features = parse_features(features)?;

    let mut location = Location::new(lat, lon, timezone);
    if let Some(country) = country {
        location = location.with_country_code(country);
    }

    let refresher = WeatherRefresher::new([source_from_config(id, &config)?]);
    let ticket = refresher.begin(location.cache_key());
    let outcome = refresher
        .request_weather(id, &location, &features, &ticket)
        .await;
    refresher.finish(&ticket);
    let outcome = outcome.with_context(|| format!("{} could not refresh this location", id.name()))?;

    print!("{}", render::weather(&outcome.wrapper, &location, &config));
    Ok(())
}

/// Converts through the reference unit of whichever dimension knows both units.
fn convert(value: f64, from: &str, to: &str) -> anyhow::Result<String> {
    fn try_dimension<U: Unit>(value: f64, from: &str, to: &str) -> Option<anyhow::Result<String>> {
        let from = U::parse_unit(from).ok()?;
        Some(
            U::parse_unit(to)
                .and_then(|to| {
                    let converted = to.from_reference(from.to_reference(value));
                    format_value(converted, to, &FormatOptions::default())
                })
                .map_err(anyhow::Error::from),
        )
    }

    try_dimension::<SpeedUnit>(value, from, to)
        .or_else(|| try_dimension::<TemperatureUnit>(value, from, to))
        .or_else(|| try_dimension::<PressureUnit>(value, from, to))
        .or_else(|| try_dimension::<PrecipitationUnit>(value, from, to))
        .or_else(|| try_dimension::<DistanceUnit>(value, from, to))
        .unwrap_or_else(|| Err(anyhow!("Unknown unit '{from}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_within_a_dimension() {
        assert_eq!(convert(36.0, "kph", "mps").unwrap(), "10.0 m/s");
        assert_eq!(convert(0.0, "c", "f").unwrap(), "32°F");
        assert!(convert(1.0, "kph", "hpa").is_err());
        assert!(convert(1.0, "parsecs", "mm").is_err());
    }

    #[test]
    fn feature_lists() {
        let features = parse_features(&["current".into(), " air-quality".into(), "".into()]).unwrap();
        assert_eq!(features, [Feature::Current, Feature::AirQuality].into());
        assert!(parse_features(&["radar".into()]).is_err());
    }
}
