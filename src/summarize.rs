use eyre::Result;
use log::{debug, info};
use regex::Regex;

use crate::SectionSummary;
use crate::llm::TextGenerator;
use crate::splitter::TextSplitter;

/// Splitting parameters for the map stage
pub const CHUNK_SIZE: usize = 1024;
pub const CHUNK_OVERLAP: usize = 100;

fn section_prompt(video_title: &str, text: &str) -> String {
    format!(
        "Your mission is to summarize a video using its title and english subtitles.\n\
         The format of the subtitles will be `[timestamp in seconds]: [subtitle]`.\n\
         For each sentence in the summary, you should provide a timestamp to the original video section that this sentence is based on.\n\
         For example, a summary of a video section that starts at second 31 will be: `[31]: summary`.\n\
         \n\
         The title of the video is: {video_title}\n\
         The subtitles are given between the triple backticks:\n\
         ```\n\
         {text}\n\
         ```\n\
         \n\
         Your summary:\n"
    )
}

fn overall_prompt(video_title: &str, text: &str) -> String {
    format!(
        "Your mission is to write a concise summary of a video using its title and chapter summaries.\n\
         The format of the chapter summaries will be `[chapter timestamp in seconds]: chapter summary`.\n\
         For example, a summary of a chapter that starts at second 31 will be: `[31]: summary`.\n\
         \n\
         The title of the video is: {video_title}\n\
         The chapter summaries are given between the triple backticks:\n\
         ```\n\
         {text}\n\
         ```\n\
         \n\
         Your concise video summary:"
    )
}

/// Map-reduce over the serialized transcript: summarize each chunk with
/// timestamp citations, then merge the per-chunk summaries with one more
/// call using the same instructions, and parse the result into sections.
pub async fn summarize_sections(
    generator: &mut impl TextGenerator,
    video_title: &str,
    subtitles: &str,
) -> Result<Vec<SectionSummary>> {
    let splitter = TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP);
    let chunks = splitter.split(subtitles);
    info!("Summarizing {} transcript chunks", chunks.len());

    let mut partials = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        debug!("Summarizing chunk {}/{}", i + 1, chunks.len());
        let partial = generator.complete(&section_prompt(video_title, chunk)).await?;
        partials.push(partial);
    }

    let combined = partials.join("\n\n");
    let merged = generator.complete(&section_prompt(video_title, &combined)).await?;

    Ok(parse_section_summaries(&merged))
}

/// Parse `[<seconds>]: <text>` lines; anything else is dropped.
/// Line order is preserved as-is, never sorted.
pub fn parse_section_summaries(text: &str) -> Vec<SectionSummary> {
    let line_re = Regex::new(r"^\s*\[(\d+(?:\.\d+)?)\]:\s+(.*)").unwrap();
    text.lines()
        .filter_map(|line| {
            let caps = line_re.captures(line)?;
            let timestamp = caps[1].parse::<f64>().ok()?;
            Some(SectionSummary {
                timestamp_seconds: timestamp as u64,
                text: caps[2].to_string(),
            })
        })
        .collect()
}

/// One final call synthesizing the section summaries into a short paragraph
pub async fn summarize_overall(
    generator: &mut impl TextGenerator,
    video_title: &str,
    sections: &[SectionSummary],
) -> Result<String> {
    let combined = sections.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join("\n");
    generator.complete(&overall_prompt(video_title, &combined)).await
}
