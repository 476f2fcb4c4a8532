use thiserror::Error;

use crate::model::Feature;

/// Errors raised by the unit system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The id or symbol does not name a known unit of this dimension.
    #[error("Unknown {dimension} unit '{input}'")]
    UnknownUnit {
        dimension: &'static str,
        input: String,
    },

    /// A measurement string could not be split into value and unit.
    #[error("Malformed measurement '{0}': expected '<number> <unit>'")]
    Malformed(String),

    /// A negative decimal count was requested when formatting.
    #[error("Decimal count must not be negative, got {0}")]
    NegativeDecimals(i32),

    /// A locale tag could not be parsed.
    #[error("Invalid locale tag '{0}'")]
    InvalidLocale(String),
}

/// Errors raised by weather sources and the refresh orchestrator.
///
/// Payloads are plain strings so that a failure can be recorded in
/// [`WeatherWrapper::failed_features`](crate::model::WeatherWrapper) and
/// cloned into every feature of the group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Connection to the provider failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The HTTP call exceeded the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The provider answered with a non-success status.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The provider throttled us.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The provider reported a server-side error.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The response body did not match the expected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The response parsed, but carried no usable data.
    #[error("No usable data in response: {0}")]
    InvalidData(String),

    /// No station, city or region of this source matches the location.
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// The source needs an API key and none is configured.
    #[error("No API key configured for source '{0}'")]
    ApiKeyMissing(String),

    /// The refresher has no source with this id.
    #[error("Source '{0}' is not registered")]
    SourceNotRegistered(String),

    /// The source cannot provide this feature.
    #[error("Feature {0} is not supported by this source")]
    UnsupportedFeature(Feature),

    /// The refresh was cancelled before this feature completed.
    #[error("Refresh cancelled")]
    Cancelled,

    /// A newer refresh for the same location started; this result was dropped.
    #[error("Refresh superseded by a newer request")]
    Superseded,
}

impl SourceError {
    /// True for errors that mean "this place can't be located by this source".
    pub fn is_location_error(&self) -> bool {
        matches!(self, Self::LocationNotFound(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::RequestFailed {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_errors_are_distinguishable() {
        assert!(SourceError::LocationNotFound("no station".into()).is_location_error());
        assert!(!SourceError::Timeout("slow".into()).is_location_error());
    }

    #[test]
    fn unit_error_messages() {
        let err = UnitError::UnknownUnit {
            dimension: "speed",
            input: "furlongs".into(),
        };
        assert!(err.to_string().contains("furlongs"));
        assert!(UnitError::NegativeDecimals(-1).to_string().contains("-1"));
    }
}
