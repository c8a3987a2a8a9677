use std::process::Command;

use eyre::{Result, bail};
use log::debug;
use serde::Deserialize;

use crate::VideoInfo;

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    id: String,
    title: String,
    webpage_url: String,
    duration: Option<f64>,
    channel: Option<String>,
    channel_url: Option<String>,
}

/// Extract video metadata by running `yt-dlp -J` against the URL.
pub fn extract_video_info(url: &str) -> Result<VideoInfo> {
    debug!("Extracting video metadata via yt-dlp: {url}");

    let output = Command::new("yt-dlp")
        .args(["--dump-single-json", "--no-playlist", "--quiet", url])
        .output();

    let output = match output {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!(
                "yt-dlp not found. Install it to enable metadata extraction:\n  \
                 pip install yt-dlp\n  \
                 or: brew install yt-dlp"
            );
        }
        Err(e) => bail!("failed to run yt-dlp: {e}"),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("yt-dlp could not resolve {url}: {}", stderr.trim());
    }

    parse_info_json(&String::from_utf8_lossy(&output.stdout))
}

fn parse_info_json(json: &str) -> Result<VideoInfo> {
    let info: YtDlpInfo = serde_json::from_str(json)?;
    Ok(VideoInfo {
        id: info.id,
        title: info.title,
        url: info.webpage_url,
        duration_seconds: info.duration.unwrap_or_default() as u64,
        channel: info.channel.unwrap_or_default(),
        channel_url: info.channel_url.unwrap_or_default(),
    })
}
