use chrono::DateTime;
use serde_json::Value;

/// Formats Unix seconds as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => secs.to_string(),
    }
}

/// Makes a clip title safe to use as a file name.
///
/// Characters that are invalid on common filesystems and runs of whitespace
/// become `_`; the result is cut to 200 characters.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => out.push('_'),
            _ => out.push(c),
        }
    }
    out.chars().take(200).collect()
}

/// File name for a library clip: `<title>_<id>.<extension>`, `Track_<n>` when
/// untitled.
pub fn clip_filename(clip: &Value, index: usize, extension: &str) -> String {
    let id = clip.get("id").and_then(Value::as_str).unwrap_or("unknown");
    let title = clip
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty() && *t != "(Untitled)")
        .map(str::to_string)
        .unwrap_or_else(|| format!("Track_{}", index + 1));

    format!("{}_{}.{}", sanitize_filename(&title), id, extension)
}

/// Renders a JSON scalar for table output; nested values are compacted.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
