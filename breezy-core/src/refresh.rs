//! Runs one source's feature requests for a location.
//!
//! A refresh resolves the source's location parameters first (at most one
//! lookup at a time per location and source), then runs every feature group
//! concurrently. A failing group only fails its own features; the rest of
//! the wrapper is still returned.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::SourceError,
    model::{FeatureSet, Location, WeatherWrapper},
    source::{LocationParameters, SourceId, WeatherSource, configured_sources},
};

type ParameterKey = (String, SourceId);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle for one refresh cycle of one location.
///
/// Starting a new cycle for the same location cancels this one.
#[derive(Debug, Clone)]
pub struct RefreshTicket {
    location_key: String,
    generation: u64,
    token: CancellationToken,
}

impl RefreshTicket {
    pub fn location_key(&self) -> &str {
        &self.location_key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
pub struct RefreshOutcome {
    pub wrapper: WeatherWrapper,
    /// Parameters the caller should store on its location, when they changed.
    pub parameters: Option<LocationParameters>,
}

pub struct WeatherRefresher {
    sources: BTreeMap<SourceId, Arc<dyn WeatherSource>>,
    parameter_locks: Mutex<HashMap<ParameterKey, Arc<tokio::sync::Mutex<()>>>>,
    parameter_cache: Mutex<HashMap<ParameterKey, LocationParameters>>,
    in_flight: Mutex<HashMap<String, (u64, CancellationToken)>>,
    generations: AtomicU64,
}

impl std::fmt::Debug for WeatherRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherRefresher")
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl WeatherRefresher {
    pub fn new(sources: impl IntoIterator<Item = Arc<dyn WeatherSource>>) -> Self {
        Self {
            sources: sources.into_iter().map(|s| (s.id(), s)).collect(),
            parameter_locks: Mutex::new(HashMap::new()),
            parameter_cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            generations: AtomicU64::new(0),
        }
    }

    /// Every source `config` can build.
    pub fn from_config(config: &Config) -> Self {
        Self::new(configured_sources(config))
    }

    pub fn source(&self, id: SourceId) -> Option<&Arc<dyn WeatherSource>> {
        self.sources.get(&id)
    }

    pub fn source_ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.sources.keys().copied()
    }

    /// Starts a refresh cycle for `location_key`, cancelling the previous one.
    pub fn begin(&self, location_key: impl Into<String>) -> RefreshTicket {
        let location_key = location_key.into();
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();

        let previous = lock(&self.in_flight).insert(location_key.clone(), (generation, token.clone()));
        if let Some((old_generation, old_token)) = previous {
            debug!(location = %location_key, old_generation, "Cancelling previous refresh");
            old_token.cancel();
        }

        RefreshTicket {
            location_key,
            generation,
            token,
        }
    }

    /// Cancels the in-flight cycle for `location_key`, if any.
    pub fn cancel(&self, location_key: &str) {
        if let Some((_, token)) = lock(&self.in_flight).remove(location_key) {
            token.cancel();
        }
    }

    /// Forgets `ticket` once the caller is done with it.
    pub fn finish(&self, ticket: &RefreshTicket) {
        let mut in_flight = lock(&self.in_flight);
        if in_flight
            .get(&ticket.location_key)
            .is_some_and(|(generation, _)| *generation == ticket.generation)
        {
            in_flight.remove(&ticket.location_key);
        }
    }

    fn is_current(&self, ticket: &RefreshTicket) -> bool {
        lock(&self.in_flight)
            .get(&ticket.location_key)
            .is_some_and(|(generation, _)| *generation == ticket.generation)
    }

    /// Lock serializing lookups for `key`. Locks nobody holds are dropped
    /// on the way, so the map only ever holds lookups in progress.
    fn parameter_lock(&self, key: &ParameterKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = lock(&self.parameter_locks);
        locks.retain(|_, held| Arc::strong_count(held) > 1);
        locks.entry(key.clone()).or_default().clone()
    }

    /// Drops everything kept for a location that is no longer refreshed,
    /// cancelling its running cycle.
    pub fn forget_location(&self, location_key: &str) {
        self.cancel(location_key);
        lock(&self.parameter_cache).retain(|(key, _), _| key != location_key);
        lock(&self.parameter_locks).retain(|(key, _), _| key != location_key);
    }

    fn cached_parameters(&self, key: &ParameterKey) -> Option<LocationParameters> {
        lock(&self.parameter_cache).get(key).cloned()
    }

    /// Makes sure `location` carries the parameters `source` needs.
    ///
    /// Returns the parameters that were newly set on `location`.
    async fn ensure_parameters(
        &self,
        source: &dyn WeatherSource,
        location: &mut Location,
        features: &FeatureSet,
        ticket: &RefreshTicket,
    ) -> Result<Option<LocationParameters>, SourceError> {
        let id = source.id();
        if !source.needs_location_parameters_refresh(location, features) {
            return Ok(None);
        }

        let key = (location.cache_key(), id);
        if let Some(cached) = self.cached_parameters(&key) {
            location.set_parameters(id.as_str(), cached.clone());
            if !source.needs_location_parameters_refresh(location, features) {
                return Ok(Some(cached));
            }
        }

        let parameter_lock = self.parameter_lock(&key);
        let _guard = tokio::select! {
            () = ticket.token.cancelled() => return Err(SourceError::Cancelled),
            guard = parameter_lock.lock() => guard,
        };

        // Another refresh may have resolved them while we waited.
        if let Some(cached) = self.cached_parameters(&key) {
            location.set_parameters(id.as_str(), cached.clone());
            if !source.needs_location_parameters_refresh(location, features) {
                return Ok(Some(cached));
            }
        }

        let result = tokio::select! {
            () = ticket.token.cancelled() => return Err(SourceError::Cancelled),
            result = source.request_location_parameters(location) => result,
        };
        let parameters = result.inspect_err(|err| {
            warn!(source = %id, location = %key.0, error = %err, "Location parameter lookup failed");
        })?;

        debug!(source = %id, location = %key.0, ?parameters, "Location parameters resolved");
        lock(&self.parameter_cache).insert(key, parameters.clone());
        location.set_parameters(id.as_str(), parameters.clone());
        Ok(Some(parameters))
    }

    /// Requests `features` for `location` from one source.
    ///
    /// Feature failures are recorded in the wrapper; `Err` is reserved for
    /// failures of the whole refresh (parameter lookup, cancellation, a newer
    /// cycle for the same location).
    pub async fn request_weather(
        &self,
        source_id: SourceId,
        location: &Location,
        features: &FeatureSet,
        ticket: &RefreshTicket,
    ) -> Result<RefreshOutcome, SourceError> {
        let source = self
            .sources
            .get(&source_id)
            .ok_or_else(|| SourceError::SourceNotRegistered(source_id.to_string()))?;

        if features.is_empty() {
            return Ok(RefreshOutcome {
                wrapper: WeatherWrapper::default(),
                parameters: None,
            });
        }
        if ticket.is_cancelled() {
            return Err(SourceError::Cancelled);
        }

        let mut wrapper = WeatherWrapper::default();
        let mut supported = FeatureSet::new();
        for feature in features {
            if source.is_feature_supported_for_location(location, *feature) {
                supported.insert(*feature);
            } else {
                wrapper.record_failure(*feature, SourceError::UnsupportedFeature(*feature));
            }
        }

        let mut location = location.clone();
        let parameters = if supported.is_empty() {
            None
        } else {
            self.ensure_parameters(source.as_ref(), &mut location, &supported, ticket)
                .await?
        };

        let requests = source.feature_requests(&location, &supported);
        info!(
            source = %source_id,
            location = %location.cache_key(),
            requests = requests.len(),
            "Refreshing weather"
        );

        let calls = requests.into_iter().map(|request| async move {
            let result = request.future.await;
            (request.features, result)
        });
        let results = tokio::select! {
            () = ticket.token.cancelled() => return Err(SourceError::Cancelled),
            results = join_all(calls) => results,
        };

        for (group, result) in results {
            match result {
                Ok(partial) => wrapper = wrapper.merge(partial),
                Err(err) => {
                    warn!(source = %source_id, features = ?group, error = %err, "Feature request failed");
                    for feature in group {
                        wrapper.record_failure(feature, err.clone());
                    }
                }
            }
        }
        wrapper.reconcile(features);

        if !self.is_current(ticket) {
            debug!(source = %source_id, generation = ticket.generation, "Dropping superseded refresh");
            return Err(SourceError::Superseded);
        }

        Ok(RefreshOutcome {
            wrapper,
            parameters,
        })
    }
}
