use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, ORIGIN, PRAGMA, REFERER, USER_AGENT},
};
use serde_json::{Value, json};
use tokio::{fs, io::AsyncWriteExt, time::sleep};
use uuid::Uuid;

use crate::{
    error::ClientError,
    management::CredentialManager,
    suno::{self, audio},
    types::{AudioInfo, FeedPage, GenerateSongRequest},
    warning,
};

/// Client for the Suno studio API.
///
/// Stateless apart from the shared [`CredentialManager`]; the token is read
/// once per call.
pub struct SunoClient {
    http: Client,
    base_url: String,
    credentials: Arc<CredentialManager>,
}

impl SunoClient {
    pub fn new(base_url: impl Into<String>, credentials: Arc<CredentialManager>) -> Self {
        let base_url: String = base_url.into();
        SunoClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    /// Fetches the session document (`GET /api/session/`).
    pub async fn session(&self) -> Result<Value, ClientError> {
        self.send_json(self.http.get(self.url("/api/session/")))
            .await
    }

    /// Starts a song generation.
    ///
    /// The session is consulted for the user tier and the generation endpoint.
    /// If that lookup fails the request still goes out with the defaults
    /// [`suno::DEFAULT_USER_TIER`] and [`suno::DEFAULT_GENERATE_ENDPOINT`].
    pub async fn generate(&self, request: &GenerateSongRequest) -> Result<Value, ClientError> {
        let (user_tier, endpoint) = match self.session().await {
            Ok(session) => (session_user_tier(&session), session_generate_endpoint(&session)),
            Err(e) => {
                warning!("Session lookup failed, using generation defaults: {}", e);
                (None, None)
            }
        };

        let user_tier = user_tier.unwrap_or_else(|| suno::DEFAULT_USER_TIER.to_string());
        let endpoint = endpoint.unwrap_or_else(|| suno::DEFAULT_GENERATE_ENDPOINT.to_string());
        let payload = build_generate_payload(request, &user_tier);

        self.send_json(self.http.post(self.url(&endpoint)).json(&payload))
            .await
    }

    /// Fetches clips by id (`GET /api/feed/?ids=a,b`).
    pub async fn feed(&self, clip_ids: &[String]) -> Result<Value, ClientError> {
        let request = self
            .http
            .get(self.url("/api/feed/"))
            .query(&[("ids", clip_ids.join(","))]);
        self.send_json(request).await
    }

    /// Fetches one page of the account library (`POST /api/feed/v3`).
    pub async fn feed_page(
        &self,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<FeedPage, ClientError> {
        let body = json!({
            "cursor": cursor,
            "limit": limit,
            "filters": {
                "disliked": "False",
                "trashed": "False",
                "stem": { "presence": "False" },
                "workspace": { "presence": "True", "workspaceId": "default" },
            },
        });

        let value = self
            .send_json(self.http.post(self.url("/api/feed/v3")).json(&body))
            .await?;
        // unknown shapes degrade to an empty page
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// Fetches credits and plan details (`GET /api/billing/info/`).
    pub async fn billing_info(&self) -> Result<Value, ClientError> {
        self.send_json(self.http.get(self.url("/api/billing/info/")))
            .await
    }

    /// Resolves the audio URL of a clip, `None` if the feed has none.
    pub async fn audio_url(&self, clip_id: &str) -> Result<Option<String>, ClientError> {
        let feed = self.feed(&[clip_id.to_string()]).await?;
        Ok(audio::feed_audio_url(&feed))
    }

    /// Summarizes a clip, `None` if the feed does not contain it.
    pub async fn audio_info(&self, clip_id: &str) -> Result<Option<AudioInfo>, ClientError> {
        let feed = self.feed(&[clip_id.to_string()]).await?;
        Ok(audio::audio_info(clip_id, &feed))
    }

    /// Opens a streaming download of an audio file.
    ///
    /// Audio files are served from a CDN and need no token.
    pub async fn open_audio(&self, audio_url: &str) -> Result<Response, ClientError> {
        let response = self
            .http
            .get(audio_url)
            .header(USER_AGENT, suno::USER_AGENT)
            .header(REFERER, suno::REFERER)
            .send()
            .await?;
        check_status(response).await
    }

    /// Streams an audio file to `path`.
    ///
    /// Bytes go to `<path>.part`, which is renamed once the whole body has
    /// arrived and removed on any failure. `on_chunk` receives the size of
    /// each written chunk. Returns the number of bytes written.
    pub async fn save_audio(
        &self,
        audio_url: &str,
        path: &Path,
        mut on_chunk: impl FnMut(u64),
    ) -> Result<u64, ClientError> {
        let mut response = self.open_audio(audio_url).await?;
        let part = part_path(path);

        let written = async {
            let mut file = fs::File::create(&part).await?;
            let mut written = 0;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
                on_chunk(chunk.len() as u64);
            }
            file.flush().await?;
            Ok::<u64, ClientError>(written)
        }
        .await;

        match written {
            Ok(written) => {
                fs::rename(&part, path).await?;
                Ok(written)
            }
            Err(e) => {
                let _ = fs::remove_file(&part).await;
                Err(e)
            }
        }
    }

    /// Asks Suno to render a WAV file for a clip.
    pub async fn convert_wav(&self, clip_id: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/gen/{}/convert_wav/", clip_id));
        let response = self.authorized(self.http.post(url)).await?.send().await?;
        // 204 without a body is the usual answer
        check_status(response).await?;
        Ok(())
    }

    /// URL of the rendered WAV file, `None` while the conversion is running.
    pub async fn wav_file_url(&self, clip_id: &str) -> Result<Option<String>, ClientError> {
        let url = self.url(&format!("/api/gen/{}/wav_file/", clip_id));
        let response = self.authorized(self.http.get(url)).await?.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: Value = check_status(response).await?.json().await?;
        Ok(body
            .get("wav_file_url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .map(str::to_string))
    }

    /// Polls [`wav_file_url`](Self::wav_file_url) until the file is ready.
    pub async fn wait_for_wav(
        &self,
        clip_id: &str,
        interval: Duration,
        attempts: u32,
    ) -> Result<String, ClientError> {
        for attempt in 0..attempts {
            if attempt > 0 {
                sleep(interval).await;
            }
            if let Some(url) = self.wav_file_url(clip_id).await? {
                return Ok(url);
            }
        }

        Err(ClientError::WavNotReady {
            clip_id: clip_id.to_string(),
            attempts,
        })
    }

    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.credentials.get_token().await?;

        Ok(builder
            .bearer_auth(token)
            .header("browser-token", self.credentials.generate_request_signature())
            .header("device-id", self.credentials.device_id())
            .header(ACCEPT, "*/*")
            .header(ACCEPT_LANGUAGE, suno::ACCEPT_LANGUAGE)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .header(ORIGIN, suno::ORIGIN)
            .header(REFERER, suno::REFERER)
            .header(USER_AGENT, suno::USER_AGENT))
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value, ClientError> {
        let response = self.authorized(builder).await?.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<Value>().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Upstream { status, body })
}

fn part_path(path: &Path) -> PathBuf {
    let mut part = OsString::from(path.as_os_str());
    part.push(".part");
    PathBuf::from(part)
}

fn session_user_tier(session: &Value) -> Option<String> {
    session
        .pointer("/roles/tier_id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn session_generate_endpoint(session: &Value) -> Option<String> {
    session
        .pointer("/configs/gen-endpoint/endpoint")
        .and_then(Value::as_str)
        .filter(|e| e.starts_with('/'))
        .map(str::to_string)
}

/// Builds the body of a text-to-song generation request.
///
/// Project id and create-session token are generated when absent; the
/// transaction id is new on every call.
pub fn build_generate_payload(request: &GenerateSongRequest, user_tier: &str) -> Value {
    let project_id = request
        .project_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    json!({
        "project_id": project_id,
        "token": null,
        "generation_type": "TEXT",
        "mv": request.mv,
        "prompt": request.prompt,
        "gpt_description_prompt": request.gpt_description_prompt,
        "make_instrumental": request.make_instrumental,
        "user_uploaded_images_b64": null,
        "metadata": {
            "web_client_pathname": "/create",
            "is_max_mode": false,
            "is_mumble": false,
            "create_mode": "simple",
            "user_tier": user_tier,
            "create_session_token": Uuid::new_v4().to_string(),
            "disable_volume_normalization": false,
            "can_control_sliders": [],
            "lyrics_model": "default",
        },
        "override_fields": [],
        "cover_clip_id": null,
        "cover_start_s": null,
        "cover_end_s": null,
        "persona_id": null,
        "artist_clip_id": null,
        "artist_start_s": null,
        "artist_end_s": null,
        "continue_clip_id": null,
        "continued_aligned_prompt": null,
        "continue_at": null,
        "transaction_uuid": Uuid::new_v4().to_string(),
    })
}
