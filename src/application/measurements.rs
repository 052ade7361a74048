//! Measurement store: the latest value of every project variable.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::store::{Endpoint, LoadGate, LoadKey, LoadOutcome, StoreDeps};
use crate::domain::{LoadState, MeasurementRecord, MeasurementValue, Report};
use crate::error::{ApiError, Error, Result};
use crate::port::{fetch_json, ApiRequest, Event};

const KIND: &str = "measurement";

/// Values and load state change together under one lock.
#[derive(Default)]
struct Inner {
    values: HashMap<String, MeasurementValue>,
    state: LoadState,
}

/// Variable name to current value, for the selected project.
///
/// Unlike the record stores this is a plain key/value map: the backend
/// returns `{ name: value }` and publish calls answer with SenML-style
/// records that patch single entries.
pub struct MeasurementStore {
    inner: RwLock<Inner>,
    gate: LoadGate,
    endpoint: Endpoint,
    deps: StoreDeps,
}

impl MeasurementStore {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            gate: LoadGate::new(),
            endpoint: Endpoint::project("measurements"),
            deps,
        }
    }

    /// Replace all values from the backend. Same failure and staleness
    /// rules as the record stores.
    pub async fn load(&self) -> LoadOutcome {
        let (path, epoch) = match self.endpoint.list(&self.deps.scope) {
            Ok(resolved) => resolved,
            Err(err) => return self.fail_load(&Error::from(err)),
        };

        let key = LoadKey::new(path.as_str(), epoch);
        self.gate
            .run(key, || async move {
                match self.replace_from(&path, epoch).await {
                    Ok(Some(count)) => LoadOutcome::Loaded { count },
                    Ok(None) => LoadOutcome::Stale,
                    Err(err) => self.fail_load(&err),
                }
            })
            .await
    }

    async fn replace_from(&self, path: &str, epoch: u64) -> Result<Option<usize>> {
        let previous = std::mem::replace(&mut self.inner.write().state, LoadState::Loading);
        debug!(collection = KIND, path, "Loading measurements");

        let raw: std::result::Result<HashMap<String, Value>, ApiError> =
            fetch_json(self.deps.fetch.as_ref(), ApiRequest::get(path)).await;
        let raw = match raw {
            Ok(raw) => raw,
            Err(err) => {
                self.inner.write().state = previous;
                return Err(err.into());
            }
        };

        if self.deps.scope.epoch() != epoch {
            self.inner.write().state = previous;
            return Ok(None);
        }

        let values: HashMap<String, MeasurementValue> = raw
            .into_iter()
            .filter_map(|(name, value)| to_measurement(value).map(|v| (name, v)))
            .collect();
        let count = values.len();
        {
            let mut inner = self.inner.write();
            inner.values = values;
            inner.state = LoadState::Loaded { at: Utc::now() };
        }
        self.deps.notifier.notify(Event::CollectionLoaded { kind: KIND, count });
        Ok(Some(count))
    }

    fn fail_load(&self, err: &Error) -> LoadOutcome {
        self.report_failure("load", err);
        LoadOutcome::Failed {
            reason: err.to_string(),
        }
    }

    fn report_failure(&self, action: &str, err: &Error) {
        warn!(collection = KIND, action, error = %err, "Store action failed");
        self.deps.notifier.notify(Report::error(err.to_string()).into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<MeasurementValue> {
        self.inner.read().values.get(name).cloned()
    }

    /// All values, as a copy.
    #[must_use]
    pub fn all(&self) -> HashMap<String, MeasurementValue> {
        self.inner.read().values.clone()
    }

    /// Variable names, empty names skipped, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .inner
            .read()
            .values
            .keys()
            .filter(|k| !k.is_empty())
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().values.is_empty()
    }

    /// Load state and values read together, so a view never pairs new
    /// values with a `Loading` state.
    #[must_use]
    pub fn snapshot(&self) -> (LoadState, HashMap<String, MeasurementValue>) {
        let inner = self.inner.read();
        (inner.state, inner.values.clone())
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.inner.read().state
    }

    /// Publish a value and apply every record the backend answers with.
    pub async fn publish(&self, record: &MeasurementRecord) -> bool {
        match self.try_publish(record).await {
            Ok(applied) => {
                debug!(variable = %record.n, applied, "Measurement published");
                true
            }
            Err(err) => {
                self.report_failure("publish", &err);
                false
            }
        }
    }

    async fn try_publish(&self, record: &MeasurementRecord) -> Result<usize> {
        let (base, _) = self.endpoint.base(&self.deps.scope)?;
        let path = format!("{base}/{}/publish", record.n);
        let records: Vec<MeasurementRecord> =
            fetch_json(self.deps.fetch.as_ref(), ApiRequest::post(path, record)?).await?;

        let mut inner = self.inner.write();
        let mut applied = 0;
        for record in records {
            if let Some(value) = record.value() {
                inner.values.insert(record.n, value);
                applied += 1;
            }
        }
        Ok(applied)
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.values.clear();
        inner.state = LoadState::Unloaded;
    }
}

fn to_measurement(value: Value) -> Option<MeasurementValue> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(MeasurementValue::Number),
        Value::String(s) => Some(MeasurementValue::Text(s)),
        other => Some(MeasurementValue::Text(other.to_string())),
    }
}
