use serde_json::json;
use sunoproxy::{
    suno::{audio::*, build_generate_payload},
    types::GenerateSongRequest,
};

#[test]
fn test_first_clip_from_array() {
    let feed = json!([{ "id": "one" }, { "id": "two" }]);
    assert_eq!(first_clip(&feed).unwrap()["id"], "one");

    // Empty array has no clip
    assert!(first_clip(&json!([])).is_none());
}

#[test]
fn test_first_clip_from_clips_object() {
    let feed = json!({ "clips": [{ "id": "inner" }], "id": "outer" });
    assert_eq!(first_clip(&feed).unwrap()["id"], "inner");
}

#[test]
fn test_first_clip_from_single_object() {
    let with_id = json!({ "id": "solo", "clips": [] });
    assert_eq!(first_clip(&with_id).unwrap()["id"], "solo");

    let with_audio = json!({ "audioUrl": "https://cdn.example/a.mp3" });
    assert!(first_clip(&with_audio).is_some());

    // Unrelated objects and scalars are not clips
    assert!(first_clip(&json!({ "detail": "nope" })).is_none());
    assert!(first_clip(&json!("clip")).is_none());
}

#[test]
fn test_clip_audio_url_field_order() {
    let clip = json!({ "audio": "c", "audioUrl": "b", "audio_url": "a" });
    assert_eq!(clip_audio_url(&clip), Some("a"));

    let clip = json!({ "audio": "c", "audioUrl": "b" });
    assert_eq!(clip_audio_url(&clip), Some("b"));

    // Empty strings are skipped
    let clip = json!({ "audio_url": "", "audio": "c" });
    assert_eq!(clip_audio_url(&clip), Some("c"));

    assert_eq!(clip_audio_url(&json!({ "id": "x" })), None);
}

#[test]
fn test_feed_audio_url() {
    let feed = json!({ "clips": [{ "id": "x", "audio_url": "https://cdn.example/x.mp3" }] });
    assert_eq!(feed_audio_url(&feed).as_deref(), Some("https://cdn.example/x.mp3"));
    assert_eq!(feed_audio_url(&json!([])), None);
}

#[test]
fn test_audio_info_defaults_metadata() {
    let feed = json!([{ "id": "x", "title": "Title", "status": "streaming" }]);
    let info = audio_info("x", &feed).unwrap();

    assert_eq!(info.clip_id, "x");
    assert_eq!(info.audio_url, None);
    assert_eq!(info.title, Some(json!("Title")));
    assert_eq!(info.metadata, json!({}));
    assert_eq!(info.full_data["status"], "streaming");

    assert!(audio_info("x", &json!([])).is_none());
}

#[test]
fn test_download_filename() {
    assert_eq!(
        download_filename("https://cdn1.suno.ai/abc-123.mp3?token=x", "abc-123"),
        "abc-123.mp3"
    );
    assert_eq!(
        download_filename("https://cdn1.suno.ai/audio/stream", "clip"),
        "clip.mp3"
    );
    // No path at all
    assert_eq!(download_filename("file.mp3", "clip"), "clip.mp3");
}

#[test]
fn test_is_downloadable() {
    assert!(is_downloadable(&json!({ "status": "complete", "audio_url": "u" })));
    assert!(!is_downloadable(&json!({ "status": "streaming", "audio_url": "u" })));
    assert!(!is_downloadable(&json!({ "status": "complete" })));
}

#[test]
fn test_build_generate_payload() {
    let request: GenerateSongRequest =
        serde_json::from_value(json!({ "gpt_description_prompt": "lofi beats" })).unwrap();

    // Request defaults
    assert_eq!(request.mv, "chirp-crow");
    assert_eq!(request.prompt, "");
    assert!(!request.make_instrumental);

    let first = build_generate_payload(&request, "tier-1");
    let second = build_generate_payload(&request, "tier-1");

    assert_eq!(first["generation_type"], "TEXT");
    assert_eq!(first["gpt_description_prompt"], "lofi beats");
    assert_eq!(first["metadata"]["user_tier"], "tier-1");
    assert_eq!(first["metadata"]["create_mode"], "simple");
    assert!(first["token"].is_null());

    // Generated ids are fresh per request
    assert_ne!(first["project_id"], second["project_id"]);
    assert_ne!(first["transaction_uuid"], second["transaction_uuid"]);
    assert_eq!(first["project_id"].as_str().unwrap().len(), 36);
}
