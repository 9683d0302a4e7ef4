//! Request admission control
//!
//! Sliding-window rate limiting applied before anything else touches a
//! request. Each client origin is tracked separately for API and
//! interactive traffic so that hammering the programmatic interface
//! does not throttle page navigation, and vice versa. Stale windows
//! are reclaimed by a periodic sweep.

use aerobook_core::RateLimitSettings;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use dashmap::DashMap;
use serde_json::json;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::AppState;

/// Path serving the interactive "rate limit exceeded" surface; it must
/// stay exempt from admission checks to avoid redirect loops.
pub const RATE_LIMIT_EXCEEDED_PATH: &str = "/rate-limit-exceeded";

/// Path prefixes excluded from admission entirely
const EXEMPT_PREFIXES: &[&str] = &["/css/", "/js/", "/images/", "/img/", "/static/"];

/// Exact paths excluded from admission entirely
const EXEMPT_PATHS: &[&str] = &["/favicon.ico", "/robots.txt", RATE_LIMIT_EXCEEDED_PATH];

/// Traffic class a request is admitted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// Programmatic JSON clients
    Api,
    /// Everything else: page navigation, form posts
    Interactive,
}

impl std::fmt::Display for RequestClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestClass::Api => write!(f, "api"),
            RequestClass::Interactive => write!(f, "interactive"),
        }
    }
}

/// Lookup key for one client's window in one traffic class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    pub origin: String,
    pub class: RequestClass,
}

/// One client's counter within the current window
#[derive(Debug, Clone)]
struct RateWindow {
    window_start: Instant,
    count: u32,
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Reject { retry_after_secs: u64 },
}

/// Concurrent map of per-client sliding windows.
///
/// Mutation happens through the map's entry guard, so the
/// read/reset-if-expired/increment sequence is atomic per key and the
/// sweep cannot drop a window mid-increment. There is no lock shared
/// across unrelated clients.
#[derive(Debug, Default)]
pub struct RateWindowStore {
    windows: DashMap<ClientKey, RateWindow>,
}

impl RateWindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against the key's window, resetting the
    /// window first if it has elapsed.
    fn check_at(&self, key: ClientKey, limit: u32, window: Duration, now: Instant) -> Admission {
        let mut entry = self.windows.entry(key).or_insert_with(|| RateWindow {
            window_start: now,
            count: 0,
        });

        let state = entry.value_mut();
        if now.duration_since(state.window_start) >= window {
            state.count = 0;
            state.window_start = now;
        }

        state.count += 1;
        if state.count > limit {
            Admission::Reject {
                retry_after_secs: window.as_secs(),
            }
        } else {
            Admission::Allow
        }
    }

    /// Drop every window that started before the cutoff
    fn evict_older_than(&self, cutoff: Instant) {
        self.windows.retain(|_, state| state.window_start >= cutoff);
    }

    fn len(&self) -> usize {
        self.windows.len()
    }
}

/// Gatekeeper consulted before any business logic runs
#[derive(Debug)]
pub struct AdmissionController {
    settings: RateLimitSettings,
    store: RateWindowStore,
}

impl AdmissionController {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            store: RateWindowStore::new(),
        }
    }

    pub fn settings(&self) -> &RateLimitSettings {
        &self.settings
    }

    /// Admit or reject one request from the given origin and class
    pub fn admit(&self, origin: &str, class: RequestClass) -> Admission {
        self.admit_at(origin, class, Instant::now())
    }

    fn limit_for(&self, class: RequestClass) -> u32 {
        match class {
            RequestClass::Api => self.settings.max_api_requests,
            RequestClass::Interactive => self.settings.max_interactive_requests,
        }
    }

    fn admit_at(&self, origin: &str, class: RequestClass, now: Instant) -> Admission {
        let key = ClientKey {
            origin: origin.to_string(),
            class,
        };
        self.store
            .check_at(key, self.limit_for(class), self.settings.window(), now)
    }

    /// Reclaim windows idle for two full window lengths
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    fn sweep_at(&self, now: Instant) {
        let before = self.store.len();
        let cutoff = now
            .checked_sub(self.settings.eviction_age())
            .unwrap_or(now);
        self.store.evict_older_than(cutoff);
        debug!(
            evicted = before - self.store.len(),
            remaining = self.store.len(),
            "Rate limiter sweep completed"
        );
    }
}

/// Derive the traffic class from the target path and content
/// negotiation
pub fn request_class(path: &str, headers: &HeaderMap) -> RequestClass {
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false);

    if path.starts_with("/api/") || accepts_json {
        RequestClass::Api
    } else {
        RequestClass::Interactive
    }
}

/// Resolve the client origin: first forwarded-for hop, then real-ip,
/// then the transport peer address. Missing or "unknown" values fall
/// through to the next source; malformed headers never fail admission.
pub fn client_origin<B>(req: &axum::http::Request<B>) -> String {
    fn usable(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    if let Some(origin) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(usable)
    {
        return origin;
    }

    if let Some(origin) = req
        .headers()
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(usable)
    {
        return origin;
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Paths that bypass admission entirely
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.contains(&path) || EXEMPT_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Admission middleware. Runs before credential verification; rejected
/// requests never reach the identity layer.
pub async fn admission_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_exempt(&path) {
        return next.run(request).await;
    }

    let class = request_class(&path, request.headers());
    let origin = client_origin(&request);

    // Make the class available to later rejection shaping
    request.extensions_mut().insert(class);

    match state.admission.admit(&origin, class) {
        Admission::Allow => next.run(request).await,
        Admission::Reject { retry_after_secs } => {
            warn!(%origin, %class, path, "Rate limit exceeded");
            rate_limit_response(class, state.admission.settings(), retry_after_secs)
        }
    }
}

fn rate_limit_response(
    class: RequestClass,
    settings: &RateLimitSettings,
    retry_after_secs: u64,
) -> Response {
    match class {
        RequestClass::Api => {
            let body = json!({
                "error": "Rate limit exceeded",
                "message": format!(
                    "Too many requests. Maximum {} requests per standard window allowed.",
                    settings.max_api_requests
                ),
                "retryAfter": retry_after_secs,
            });
            (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response()
        }
        // Interactive callers get a friendly surface instead of a raw
        // 429; that surface is exempt from admission, so no loop.
        RequestClass::Interactive => Redirect::temporary(RATE_LIMIT_EXCEEDED_PATH).into_response(),
    }
}

/// Handler for the interactive rejection surface. Served normally so
/// the redirect landing here cannot loop.
pub async fn rate_limit_exceeded() -> &'static str {
    "Rate limit exceeded. Please wait a minute before trying again."
}
