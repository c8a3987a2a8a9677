use crate::{SectionSummary, VideoInfo};
use crate::llm::Usage;

const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// `H:M:S` with no zero padding, matching plain integer division
pub fn pretty_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes}:{secs}")
}

/// OSC-8 terminal hyperlink
fn hyperlink(url: &str, label: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{label}\x1b]8;;\x1b\\")
}

/// Deep link into the video at a given offset
fn timestamp_link(url: &str, seconds: u64) -> String {
    format!("{url}&t={seconds}")
}

/// One clickable `<timestamp>: <text>` line per section
pub fn render_section_summaries(url: &str, sections: &[SectionSummary]) -> String {
    sections
        .iter()
        .map(|s| {
            let link = timestamp_link(url, s.timestamp_seconds);
            let label = pretty_timestamp(s.timestamp_seconds);
            format!("{}: {}", hyperlink(&link, &label), s.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full report: title/duration/channel, overall summary, chapter
/// summaries with deep links, usage stats
pub fn render_report(
    url: &str,
    info: &VideoInfo,
    sections: &[SectionSummary],
    summary: &str,
    usage: &Usage,
) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("{BOLD}Title:{RESET} {}\n", hyperlink(&info.url, &info.title)));
    out.push_str(&format!(
        "{BOLD}Duration:{RESET} {}\n",
        pretty_timestamp(info.duration_seconds)
    ));
    out.push_str(&format!(
        "{BOLD}Channel:{RESET} {}\n",
        hyperlink(&info.channel_url, &info.channel)
    ));

    out.push('\n');
    out.push_str(&format!("{BOLD}Summary:{RESET}\n{summary}\n"));

    out.push('\n');
    out.push_str(&format!(
        "{BOLD}Chapter Summaries:{RESET}\n{}\n",
        render_section_summaries(url, sections)
    ));

    out.push('\n');
    out.push_str(&format!("{BOLD}OpenAI Stats:{RESET}\n{usage}\n"));

    out
}

/// One-line error panel for stderr
pub fn render_error(message: &str) -> String {
    format!("{RED}Error:{RESET} {message}")
}
