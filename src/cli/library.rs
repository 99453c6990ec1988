use std::{path::Path, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use serde_json::Value;
use tabled::Table;
use tokio::time::sleep;

use crate::{
    Res, cli, error, info,
    suno::{self, SunoClient, audio},
    success,
    types::ClipTableRow,
    utils, warning,
};

/// Lists the clips in the account library that are ready to download.
///
/// Pages through `/api/feed/v3` with a spinner. Only the first page is
/// fetched unless `all` is set.
pub async fn clips(limit: u32, all: bool) {
    let client = cli::suno_client();

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching clips...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut all_clips: Vec<Value> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    loop {
        let page = match client.feed_page(cursor.as_deref(), limit).await {
            Ok(page) => page,
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to fetch clips: {}", e);
            }
        };

        pages += 1;
        all_clips.extend(page.clips);
        pb.set_message(format!("Fetched {} clips...", all_clips.len()));

        cursor = page.next_cursor;
        if !all || !page.has_more || cursor.is_none() {
            break;
        }

        // stay under the upstream rate limit
        sleep(Duration::from_millis(100)).await;
    }
    pb.finish_and_clear();

    let rows: Vec<ClipTableRow> = all_clips
        .iter()
        .filter(|c| audio::is_downloadable(c))
        .map(clip_row)
        .collect();

    let downloadable = rows.len();
    if downloadable > 0 {
        println!("{}", Table::new(rows));
    }
    success!(
        "{} of {} clips downloadable ({} page(s))",
        downloadable,
        all_clips.len(),
        pages
    );
}

/// Downloads clips into `dir`, skipping files that already exist.
///
/// With `wav` set, each clip is first converted to WAV on Suno's side and the
/// rendered file is saved instead of the MP3. Waits a random 2 to 5 seconds
/// between downloads.
pub async fn download(clip_ids: Vec<String>, dir: String, wav: bool) {
    let client = cli::suno_client();
    let dir = Path::new(&dir);
    if let Err(e) = async_fs::create_dir_all(dir).await {
        error!("Cannot create download directory {}. Err: {}", dir.display(), e);
    }

    let total = clip_ids.len();
    let mut saved = 0;
    let mut failed = 0;

    for (index, clip_id) in clip_ids.iter().enumerate() {
        if index > 0 {
            let delay = rand::rng().random_range(2000..=5000);
            sleep(Duration::from_millis(delay)).await;
        }

        info!("[{}/{}] {}", index + 1, total, clip_id);
        match download_clip(&client, clip_id, index, dir, wav).await {
            Ok(true) => saved += 1,
            Ok(false) => {}
            Err(e) => {
                failed += 1;
                warning!("Failed to download {}. Err: {}", clip_id, e);
            }
        }
    }

    success!("Downloaded {} of {} clips ({} failed)", saved, total, failed);
}

async fn download_clip(
    client: &SunoClient,
    clip_id: &str,
    index: usize,
    dir: &Path,
    wav: bool,
) -> Res<bool> {
    let feed = client.feed(&[clip_id.to_string()]).await?;
    let clip = audio::first_clip(&feed).ok_or_else(|| format!("clip {} not found", clip_id))?;

    let extension = if wav { "wav" } else { "mp3" };
    let path = dir.join(utils::clip_filename(clip, index, extension));
    if path.exists() {
        warning!("Skipping, already exists: {}", path.display());
        return Ok(false);
    }

    let audio_url = if wav {
        client.convert_wav(clip_id).await?;
        info!("WAV conversion started, waiting for the file...");
        client
            .wait_for_wav(clip_id, suno::WAV_POLL_INTERVAL, suno::WAV_POLL_ATTEMPTS)
            .await?
    } else {
        audio::clip_audio_url(clip)
            .map(str::to_string)
            .ok_or_else(|| format!("clip {} has no audio yet", clip_id))?
    };

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.set_message(path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());

    let result = client
        .save_audio(&audio_url, &path, |len| {
            pb.inc_length(len);
            pb.inc(len);
        })
        .await;
    pb.finish_and_clear();

    let written = result?;
    success!("Saved {} ({:.2} MB)", path.display(), written as f64 / (1024.0 * 1024.0));
    Ok(true)
}

fn clip_row(clip: &Value) -> ClipTableRow {
    let field = |key: &str| clip.get(key).map(utils::display_value).unwrap_or_default();
    let metadata = clip.get("metadata");

    ClipTableRow {
        id: field("id"),
        title: clip
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or("(Untitled)")
            .to_string(),
        created: field("created_at"),
        duration: metadata
            .and_then(|m| m.get("duration"))
            .and_then(Value::as_f64)
            .map(|d| format!("{:.2}s", d))
            .unwrap_or_default(),
        tags: metadata
            .and_then(|m| m.get("tags"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}
