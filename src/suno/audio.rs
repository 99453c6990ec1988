use serde_json::{Value, json};

use crate::types::AudioInfo;

const AUDIO_KEYS: [&str; 3] = ["audio_url", "audioUrl", "audio"];

/// Locates the first clip in a feed response.
///
/// The feed comes back either as an array of clips, as an object with a
/// `clips` array, or as a single clip object. An object is treated as a clip
/// when it carries an `id` or one of the audio keys.
pub fn first_clip(feed: &Value) -> Option<&Value> {
    match feed {
        Value::Array(items) => items.first(),
        Value::Object(map) => {
            if let Some(clip) = map
                .get("clips")
                .and_then(Value::as_array)
                .and_then(|clips| clips.first())
            {
                return Some(clip);
            }

            let looks_like_clip =
                map.contains_key("id") || AUDIO_KEYS.iter().any(|k| clip_field(feed, k).is_some());
            looks_like_clip.then_some(feed)
        }
        _ => None,
    }
}

/// Reads the audio URL of a clip, trying each known field name in turn.
pub fn clip_audio_url(clip: &Value) -> Option<&str> {
    AUDIO_KEYS.iter().find_map(|key| clip_field(clip, key))
}

/// Audio URL of the first clip in a feed response.
pub fn feed_audio_url(feed: &Value) -> Option<String> {
    first_clip(feed)
        .and_then(clip_audio_url)
        .map(str::to_string)
}

/// Builds the `/audio-info` summary for the first clip in a feed response.
pub fn audio_info(clip_id: &str, feed: &Value) -> Option<AudioInfo> {
    let clip = first_clip(feed)?;
    Some(AudioInfo {
        clip_id: clip_id.to_string(),
        audio_url: clip_audio_url(clip).map(str::to_string),
        title: clip.get("title").cloned(),
        status: clip.get("status").cloned(),
        metadata: clip.get("metadata").cloned().unwrap_or_else(|| json!({})),
        full_data: clip.clone(),
    })
}

/// Picks the attachment name for a download.
///
/// Uses the last path segment of the audio URL (query string removed) when it
/// has an extension, otherwise `<clip_id>.mp3`.
pub fn download_filename(audio_url: &str, clip_id: &str) -> String {
    let path = audio_url.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some(segment) if path.contains('/') && segment.contains('.') => segment.to_string(),
        _ => format!("{}.mp3", clip_id),
    }
}

/// A clip can be downloaded once it is complete and has audio.
pub fn is_downloadable(clip: &Value) -> bool {
    clip.get("status").and_then(Value::as_str) == Some("complete")
        && clip_audio_url(clip).is_some()
}

fn clip_field<'a>(clip: &'a Value, key: &str) -> Option<&'a str> {
    clip.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
