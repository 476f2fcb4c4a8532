use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Address resolved by reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAddress {
    pub country_code: Option<String>,
    pub country: Option<String>,
    pub admin1: Option<String>,
    pub admin2: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
}

/// A place weather is requested for.
///
/// `parameters` caches per-source lookups (station id, city key, ...) keyed by
/// source id. Moving the location invalidates all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    coordinates: Coordinates,
    pub timezone: Tz,
    pub country_code: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    parameters: BTreeMap<String, BTreeMap<String, String>>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, timezone: Tz) -> Self {
        Self {
            coordinates: Coordinates::new(latitude, longitude),
            timezone,
            country_code: None,
            city: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude
    }

    /// Moves the location. Cached source parameters are dropped when the
    /// coordinates actually change.
    pub fn set_coordinates(&mut self, coordinates: Coordinates) {
        if coordinates != self.coordinates {
            self.coordinates = coordinates;
            self.parameters.clear();
        }
    }

    /// Key identifying this place for locking and de-duplication.
    pub fn cache_key(&self) -> String {
        format!("{:.4},{:.4}", self.coordinates.latitude, self.coordinates.longitude)
    }

    pub fn is_in_country(&self, codes: &[&str]) -> bool {
        self.country_code
            .as_deref()
            .is_some_and(|cc| codes.iter().any(|c| c.eq_ignore_ascii_case(cc)))
    }

    pub fn parameters(&self, source_id: &str) -> Option<&BTreeMap<String, String>> {
        self.parameters.get(source_id)
    }

    pub fn parameter(&self, source_id: &str, key: &str) -> Option<&str> {
        self.parameters
            .get(source_id)
            .and_then(|p| p.get(key))
            .map(String::as_str)
    }

    pub fn set_parameters(&mut self, source_id: &str, values: BTreeMap<String, String>) {
        self.parameters.insert(source_id.to_string(), values);
    }

    pub fn all_parameters(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.parameters
    }

    /// Calendar date of `instant` in this location's time zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// UTC instant of `time` on `date`, local to this location.
    ///
    /// Local times skipped by a DST jump resolve to the first valid instant
    /// after them; ambiguous ones to the earlier instant.
    pub fn local_instant(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let naive = date.and_time(time);
        for shift in 0..=3 {
            let candidate = naive + Duration::hours(shift);
            if let Some(dt) = self.timezone.from_local_datetime(&candidate).earliest() {
                return dt.with_timezone(&Utc);
            }
        }
        // No zone skips more than a few hours; treat the wall time as UTC.
        Utc.from_utc_datetime(&naive)
    }

    /// `[start, end)` of `date` in this location's time zone.
    pub fn day_bounds(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.local_instant(date, NaiveTime::MIN);
        let next = date.succ_opt().unwrap_or(date);
        (start, self.local_instant(next, NaiveTime::MIN))
    }
}
