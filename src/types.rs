use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Claims read from the payload of a session token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<f64>,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
}

/// Uniform response envelope returned by the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: i32,
    pub msg: String,
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn success(data: Value) -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
            data: Some(data),
        }
    }
}

fn default_model() -> String {
    "chirp-crow".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSongRequest {
    pub gpt_description_prompt: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub make_instrumental: bool,
    #[serde(default = "default_model")]
    pub mv: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFeedRequest {
    pub clip_ids: Vec<String>,
}

/// One page of the library feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub clips: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Clip summary returned by `/audio-info/{clip_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioInfo {
    pub clip_id: String,
    pub audio_url: Option<String>,
    pub title: Option<Value>,
    pub status: Option<Value>,
    pub metadata: Value,
    pub full_data: Value,
}

#[derive(Tabled)]
pub struct ClipTableRow {
    pub id: String,
    pub title: String,
    pub created: String,
    pub duration: String,
    pub tags: String,
}

#[derive(Tabled)]
pub struct CreditTableRow {
    pub field: String,
    pub value: String,
}
