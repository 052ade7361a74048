//! Scripted [`RemoteFetch`] for tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::ApiError;
use crate::port::{ApiRequest, RemoteFetch};

type Reply = Result<Value, ApiError>;

#[derive(Default)]
struct Route {
    queued: VecDeque<Reply>,
    fallback: Option<Reply>,
}

/// Answers requests from a script keyed by `"METHOD /path"`.
///
/// Queued replies are consumed first, in order; after that the route's
/// standing reply is returned on every call. Unscripted routes answer 404.
#[derive(Default)]
pub struct ScriptedFetch {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl ScriptedFetch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every reply, to hold requests in flight.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Standing successful reply for `route`.
    pub fn respond(&self, route: &str, body: Value) {
        self.routes.lock().entry(route.to_string()).or_default().fallback = Some(Ok(body));
    }

    /// Standing failure for `route`.
    pub fn fail(&self, route: &str, err: ApiError) {
        self.routes.lock().entry(route.to_string()).or_default().fallback = Some(Err(err));
    }

    /// One-shot successful reply, used before the standing one.
    pub fn enqueue(&self, route: &str, body: Value) {
        self.routes
            .lock()
            .entry(route.to_string())
            .or_default()
            .queued
            .push_back(Ok(body));
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// How often `route` was called.
    #[must_use]
    pub fn calls(&self, route: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| route_key(r) == route)
            .count()
    }

    fn reply(&self, key: &str) -> Reply {
        let mut routes = self.routes.lock();
        let Some(route) = routes.get_mut(key) else {
            return Err(ApiError::from_status(404, format!("no scripted reply for {key}")));
        };
        if let Some(reply) = route.queued.pop_front() {
            return reply;
        }
        route.fallback.clone().unwrap_or_else(|| {
            Err(ApiError::from_status(404, format!("script for {key} exhausted")))
        })
    }
}

fn route_key(request: &ApiRequest) -> String {
    format!("{} {}", request.method, request.path)
}

#[async_trait]
impl RemoteFetch for ScriptedFetch {
    async fn fetch(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let key = route_key(&request);
        self.requests.lock().push(request);
        // Pick the reply at call time so queued replies keep request order.
        let reply = self.reply(&key);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}
