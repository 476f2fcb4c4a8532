use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

const INDEX_LEVELS: [f64; 6] = [0.0, 20.0, 50.0, 100.0, 150.0, 250.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    So2,
    No2,
    O3,
    Co,
}

impl Pollutant {
    pub const fn all() -> &'static [Pollutant] {
        &[Self::Pm25, Self::Pm10, Self::So2, Self::No2, Self::O3, Self::Co]
    }

    /// Concentrations at which each index level starts. µg/m³, CO in mg/m³.
    fn thresholds(self) -> [f64; 6] {
        match self {
            Self::Pm25 => [0.0, 5.0, 15.0, 30.0, 60.0, 110.0],
            Self::Pm10 => [0.0, 15.0, 45.0, 80.0, 160.0, 300.0],
            Self::So2 => [0.0, 20.0, 40.0, 270.0, 500.0, 960.0],
            Self::No2 => [0.0, 10.0, 25.0, 200.0, 400.0, 1000.0],
            Self::O3 => [0.0, 50.0, 100.0, 160.0, 240.0, 480.0],
            Self::Co => [0.0, 2.0, 4.0, 35.0, 100.0, 230.0],
        }
    }

    /// Piecewise-linear index of a concentration. Values past the last
    /// threshold extrapolate along the last segment.
    pub fn index(self, concentration: f64) -> Option<u32> {
        if !concentration.is_finite() || concentration < 0.0 {
            return None;
        }
        let thresholds = self.thresholds();
        let segment = thresholds
            .windows(2)
            .position(|w| concentration < w[1])
            .unwrap_or(thresholds.len() - 2);

        let (c_lo, c_hi) = (thresholds[segment], thresholds[segment + 1]);
        let (i_lo, i_hi) = (INDEX_LEVELS[segment], INDEX_LEVELS[segment + 1]);
        let index = i_lo + (concentration - c_lo) / (c_hi - c_lo) * (i_hi - i_lo);
        Some(index.round() as u32)
    }
}

/// Pollutant concentrations. µg/m³, except CO in mg/m³.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub co: Option<f64>,
}

impl AirQuality {
    pub fn concentration(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::Co => self.co,
        }
    }

    pub fn set(&mut self, pollutant: Pollutant, value: Option<f64>) {
        let slot = match pollutant {
            Pollutant::Pm25 => &mut self.pm25,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::So2 => &mut self.so2,
            Pollutant::No2 => &mut self.no2,
            Pollutant::O3 => &mut self.o3,
            Pollutant::Co => &mut self.co,
        };
        *slot = value.filter(|v| v.is_finite());
    }

    /// Overall index: the worst pollutant's index.
    pub fn index(&self) -> Option<u32> {
        Pollutant::all()
            .iter()
            .filter_map(|p| self.concentration(*p).and_then(|c| p.index(c)))
            .max()
    }

    /// Pollutant driving [`Self::index`].
    pub fn dominant_pollutant(&self) -> Option<Pollutant> {
        Pollutant::all()
            .iter()
            .copied()
            .filter_map(|p| self.concentration(p).and_then(|c| p.index(c)).map(|i| (p, i)))
            .max_by_key(|(_, i)| *i)
            .map(|(p, _)| p)
    }

    /// 1 (excellent) to 6 (hazardous).
    pub fn level(&self) -> Option<u8> {
        let index = f64::from(self.index()?);
        let level = INDEX_LEVELS.iter().rposition(|l| index >= *l).unwrap_or(0);
        Some(level as u8 + 1)
    }

    pub fn is_empty(&self) -> bool {
        Pollutant::all().iter().all(|p| self.concentration(*p).is_none())
    }

    /// Raises each pollutant to `other`'s concentration where that is higher.
    pub fn absorb_worst(&mut self, other: &AirQuality) {
        for pollutant in Pollutant::all() {
            let worst = match (self.concentration(*pollutant), other.concentration(*pollutant)) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
            self.set(*pollutant, worst);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQualityWrapper {
    pub current: Option<AirQuality>,
    pub daily: BTreeMap<NaiveDate, AirQuality>,
    pub hourly: BTreeMap<DateTime<Utc>, AirQuality>,
}

impl AirQualityWrapper {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.daily.is_empty() && self.hourly.is_empty()
    }

    /// Records an hourly reading and folds it into the worst values of its
    /// local day. Empty readings are skipped.
    pub fn add_hourly(&mut self, date: DateTime<Utc>, aq: AirQuality, location: &Location) {
        if aq.is_empty() {
            return;
        }
        self.daily.entry(location.local_date(date)).or_default().absorb_worst(&aq);
        self.hourly.insert(date, aq);
    }
}

/// Pollen levels, 0 (none) to 5 (very high).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pollen {
    pub grass: Option<u8>,
    pub tree: Option<u8>,
    pub ragweed: Option<u8>,
    pub mold: Option<u8>,
}

impl Pollen {
    pub fn is_empty(&self) -> bool {
        self.grass.is_none() && self.tree.is_none() && self.ragweed.is_none() && self.mold.is_none()
    }

    pub fn max_level(&self) -> Option<u8> {
        [self.grass, self.tree, self.ragweed, self.mold]
            .into_iter()
            .flatten()
            .max()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollenWrapper {
    pub current: Option<Pollen>,
    pub daily: BTreeMap<NaiveDate, Pollen>,
}

impl PollenWrapper {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.daily.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_interpolates_between_thresholds() {
        assert_eq!(Pollutant::Pm25.index(0.0), Some(0));
        assert_eq!(Pollutant::Pm25.index(5.0), Some(20));
        assert_eq!(Pollutant::Pm25.index(10.0), Some(35));
        assert_eq!(Pollutant::Pm25.index(110.0), Some(250));
        assert_eq!(Pollutant::Pm25.index(-1.0), None);
    }

    #[test]
    fn index_extrapolates_past_last_threshold() {
        // Last segment: 60..110 µg/m³ spans 150..250.
        assert_eq!(Pollutant::Pm25.index(160.0), Some(350));
    }

    #[test]
    fn overall_index_is_worst_pollutant() {
        let aq = AirQuality {
            pm25: Some(5.0),
            no2: Some(200.0),
            ..AirQuality::default()
        };
        assert_eq!(aq.index(), Some(100));
        assert_eq!(aq.dominant_pollutant(), Some(Pollutant::No2));
        assert_eq!(aq.level(), Some(4));
        assert_eq!(AirQuality::default().index(), None);
        assert!(AirQuality::default().is_empty());
    }

    #[test]
    fn daily_keeps_worst_reading_per_local_day() {
        use chrono::TimeZone;

        let oslo = Location::new(59.91, 10.75, chrono_tz::Europe::Oslo);
        let at = |hour| Utc.with_ymd_and_hms(2025, 1, 15, hour, 0, 0).unwrap();
        let reading = |pm25, no2| AirQuality { pm25, no2, ..AirQuality::default() };

        let mut wrapper = AirQualityWrapper::default();
        wrapper.add_hourly(at(21), reading(Some(12.0), None), &oslo);
        wrapper.add_hourly(at(22), reading(Some(8.0), Some(40.0)), &oslo);
        // Midnight in Oslo, so the next local day.
        wrapper.add_hourly(at(23), reading(Some(3.0), None), &oslo);
        wrapper.add_hourly(at(20), AirQuality::default(), &oslo);

        assert_eq!(wrapper.hourly.len(), 3);
        let jan15 = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let jan16 = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();
        assert_eq!(wrapper.daily[&jan15], reading(Some(12.0), Some(40.0)));
        assert_eq!(wrapper.daily[&jan16], reading(Some(3.0), None));
    }
}
