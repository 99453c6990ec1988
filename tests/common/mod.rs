#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use sunoproxy::{
    management::{Clock, CredentialConfig, CredentialManager, ManualClock},
    suno::SunoClient,
};
use tokio::{net::TcpListener, time::sleep};

pub const SESSION_ID: &str = "sess-1";
pub const DEVICE_ID: &str = "device-test";
pub const NOW: i64 = 1_700_000_000;

/// Builds an unsigned JWT-shaped token carrying `exp` and a serial number.
pub fn make_jwt(exp: i64, serial: usize) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "exp": exp, "iat": exp - 3600, "sid": SESSION_ID, "serial": serial }).to_string(),
    );
    format!("{}.{}.c2lnbmF0dXJl", header, payload)
}

#[derive(Debug, Clone)]
pub enum IssuerMode {
    /// Issue a token expiring `lifetime` seconds after the stub clock's now.
    Jwt { lifetime: i64 },
    /// Issue this exact string as the token.
    Raw(String),
    /// Fail with this status.
    Status(u16),
    /// Answer 200 without a `jwt` field.
    MissingJwt,
}

pub struct IssuerStub {
    pub hits: AtomicUsize,
    pub mode: Mutex<IssuerMode>,
    pub last_cookie: Mutex<Option<String>>,
    pub set_cookies: Mutex<Vec<String>>,
    pub delay: Mutex<Duration>,
    pub clock: Arc<ManualClock>,
}

impl IssuerStub {
    pub fn new(clock: Arc<ManualClock>, mode: IssuerMode) -> Arc<Self> {
        Arc::new(IssuerStub {
            hits: AtomicUsize::new(0),
            mode: Mutex::new(mode),
            last_cookie: Mutex::new(None),
            set_cookies: Mutex::new(Vec::new()),
            delay: Mutex::new(Duration::ZERO),
            clock,
        })
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn set_mode(&self, mode: IssuerMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_cookies(&self, cookies: &[&str]) {
        *self.set_cookies.lock().unwrap() = cookies.iter().map(|c| c.to_string()).collect();
    }

    pub fn last_cookie(&self) -> Option<String> {
        self.last_cookie.lock().unwrap().clone()
    }

    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route("/v1/client/sessions/{session_id}/tokens", post(issue))
            .with_state(Arc::clone(self))
    }
}

async fn issue(
    State(stub): State<Arc<IssuerStub>>,
    Path(_session_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let serial = stub.hits.fetch_add(1, Ordering::SeqCst) + 1;
    *stub.last_cookie.lock().unwrap() = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let delay = *stub.delay.lock().unwrap();
    if !delay.is_zero() {
        sleep(delay).await;
    }

    let mode = stub.mode.lock().unwrap().clone();
    let mut response = match mode {
        IssuerMode::Jwt { lifetime } => {
            let jwt = make_jwt(stub.clock.now_secs() + lifetime, serial);
            Json(json!({ "object": "token", "jwt": jwt })).into_response()
        }
        IssuerMode::Raw(jwt) => Json(json!({ "object": "token", "jwt": jwt })).into_response(),
        IssuerMode::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            "session is not valid",
        )
            .into_response(),
        IssuerMode::MissingJwt => Json(json!({ "object": "token" })).into_response(),
    };

    for cookie in stub.set_cookies.lock().unwrap().iter() {
        response
            .headers_mut()
            .append(header::SET_COOKIE, HeaderValue::from_str(cookie).unwrap());
    }
    response
}

/// Fake Suno studio API. Rejects requests without the proxy's auth headers.
pub struct StudioStub {
    pub base_url: String,
    pub last_payload: Mutex<Option<Value>>,
    /// Clip id to the number of readiness checks left before its WAV is ready.
    pub wav_jobs: Mutex<HashMap<String, u32>>,
    /// Readiness checks a new WAV conversion takes.
    pub wav_polls: u32,
}

pub const AUDIO_BYTES: &[u8] = b"ID3\x04\x00fake-mp3-payload";

impl StudioStub {
    pub fn new(base_url: &str) -> Arc<Self> {
        Arc::new(StudioStub {
            base_url: base_url.to_string(),
            last_payload: Mutex::new(None),
            wav_jobs: Mutex::new(HashMap::new()),
            wav_polls: 2,
        })
    }

    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route("/api/session/", get(studio_session))
            .route("/api/feed/", get(studio_feed))
            .route("/api/feed/v3", post(studio_feed_page))
            .route("/api/billing/info/", get(studio_billing))
            .route("/api/generate/custom/", post(studio_generate))
            .route("/api/gen/{clip_id}/convert_wav/", post(studio_convert_wav))
            .route("/api/gen/{clip_id}/wav_file/", get(studio_wav_file))
            .route("/audio/{file}", get(studio_audio))
            .with_state(Arc::clone(self))
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len());
    let device = headers.get("device-id").and_then(|v| v.to_str().ok()) == Some(DEVICE_ID);
    let signature = headers
        .get("browser-token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("{\"token\":\""));
    bearer && device && signature
}

async fn studio_session(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "user": { "display_name": "tester" },
        "roles": { "tier_id": "tier-pro" },
        "configs": { "gen-endpoint": { "endpoint": "/api/generate/custom/" } }
    }))
    .into_response()
}

async fn studio_feed(
    State(stub): State<Arc<StudioStub>>,
    Query(query): Query<std::collections::HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let ids = query.get("ids").cloned().unwrap_or_default();
    let clips: Vec<Value> = ids
        .split(',')
        .filter(|id| !id.is_empty() && *id != "missing")
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Song {}", id),
                "status": "complete",
                "audio_url": format!("{}/audio/{}.mp3?sig=abc", stub.base_url, id),
                "metadata": { "duration": 12.5, "tags": "synthwave" }
            })
        })
        .collect();
    Json(Value::Array(clips)).into_response()
}

async fn studio_feed_page(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "clips": [], "has_more": false, "next_cursor": null })).into_response()
}

async fn studio_billing(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "total_credits_left": 50, "period": "month" })).into_response()
}

async fn studio_generate(
    State(stub): State<Arc<StudioStub>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    *stub.last_payload.lock().unwrap() = Some(payload.clone());
    Json(json!({ "id": "batch-1", "clips": [{ "id": "new-clip", "status": "submitted" }] }))
        .into_response()
}

async fn studio_convert_wav(
    State(stub): State<Arc<StudioStub>>,
    Path(clip_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    stub.wav_jobs.lock().unwrap().insert(clip_id, stub.wav_polls);
    StatusCode::NO_CONTENT.into_response()
}

/// 404 until a conversion was requested, then `null` until it is done.
async fn studio_wav_file(
    State(stub): State<Arc<StudioStub>>,
    Path(clip_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let mut jobs = stub.wav_jobs.lock().unwrap();
    let Some(left) = jobs.get_mut(&clip_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if *left > 0 {
        *left -= 1;
        return Json(json!({ "wav_file_url": null })).into_response();
    }
    let url = format!("{}/audio/{}.wav", stub.base_url, clip_id);
    Json(json!({ "wav_file_url": url })).into_response()
}

async fn studio_audio() -> Response {
    ([(header::CONTENT_TYPE, "audio/mpeg")], AUDIO_BYTES).into_response()
}

/// Binds an ephemeral port and returns the listener with its base URL.
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    (listener, base_url)
}

pub fn serve(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

/// Starts an issuer stub and returns its base URL.
pub async fn spawn_issuer(stub: &Arc<IssuerStub>) -> String {
    let (listener, base_url) = bind().await;
    serve(listener, stub.router());
    base_url
}

pub fn credential_config(
    issuer_url: &str,
    session_id: Option<&str>,
    cookie: &str,
) -> CredentialConfig {
    CredentialConfig {
        cookie: cookie.to_string(),
        session_id: session_id.map(str::to_string),
        device_id: Some(DEVICE_ID.to_string()),
        issuer_url: issuer_url.to_string(),
        clerk_js_version: "5.103.1".to_string(),
        renewal_timeout: Some(Duration::from_secs(5)),
    }
}

pub fn dyn_clock(clock: &Arc<ManualClock>) -> Arc<dyn Clock> {
    clock.clone()
}

/// Issuer and studio stubs on one port, with a client pointed at them.
pub async fn spawn_upstream(
    mode: IssuerMode,
    session_id: Option<&str>,
) -> (Arc<SunoClient>, Arc<IssuerStub>, Arc<StudioStub>) {
    let clock = Arc::new(ManualClock::at_secs(NOW));
    let issuer = IssuerStub::new(clock.clone(), mode);

    let (listener, base_url) = bind().await;
    let studio = StudioStub::new(&base_url);
    serve(listener, issuer.router().merge(studio.router()));

    let credentials = Arc::new(CredentialManager::with_clock(
        credential_config(&base_url, session_id, "__client=abc"),
        dyn_clock(&clock),
    ));
    (Arc::new(SunoClient::new(base_url, credentials)), issuer, studio)
}
