use std::path::PathBuf;
use std::process::Command;

use eyre::Result;
use log::{debug, info};

mod cli;

use cli::Cli;
use ytsum::llm::TextGenerator;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn tool_version(name: &str) -> Option<String> {
    Command::new(name)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string()
        })
}

fn build_after_help() -> String {
    let yt_dlp = tool_version("yt-dlp");

    let yt_dlp_line = match &yt_dlp {
        Some(v) => format!("  \x1b[32m✅\x1b[0m yt-dlp     {v}"),
        None => "  \x1b[31m❌\x1b[0m yt-dlp     (not found — needed for metadata extraction)".to_string(),
    };

    let log_path = log_dir().join("ytsum.log");

    format!(
        "\nREQUIRED TOOLS:\n{yt_dlp_line}\n\nLogs are written to: {}",
        log_path.display()
    )
}

async fn run(cli: &Cli, config: &ytsum::config::Config) -> Result<()> {
    let url = cli.url.trim().to_string();

    // URL validation happens before any network call
    let video_id = ytsum::extract_video_id(&url)
        .ok_or_else(|| eyre::eyre!("could not extract video ID from: {url}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/shorts/ID\n  <11-character video ID>"))?;

    // Config defaults apply where flags are absent
    let lang = cli
        .lang
        .clone()
        .or_else(|| config.default_lang.clone())
        .unwrap_or_else(|| "en".to_string());
    let model = cli
        .model
        .clone()
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| ytsum::llm::DEFAULT_MODEL.to_string());
    debug!("Using lang={lang} model={model}");

    // Deep links reuse the URL as given; a bare video ID gets the
    // canonical watch URL instead
    let link_url = if url == video_id {
        ytsum::watch_url(&video_id)
    } else {
        url.clone()
    };

    let client = reqwest::Client::new();

    if cli.verbose {
        eprintln!("Extracting video metadata...");
    }
    let video_info = ytsum::metadata::extract_video_info(&link_url)?;
    info!("Video: {} ({})", video_info.title, video_info.id);

    if cli.verbose {
        eprintln!("Fetching transcript...");
    }
    let subtitles = ytsum::transcript::fetch_transcript(&client, &video_id, &lang).await?;

    let mut generator = ytsum::llm::OpenAi::new(client, &model)?;

    if cli.verbose {
        eprintln!("Summarizing sections...");
    }
    let sections = ytsum::summarize::summarize_sections(&mut generator, &video_info.title, &subtitles).await?;
    info!("Parsed {} section summaries", sections.len());

    if cli.verbose {
        eprintln!("Writing overall summary...");
    }
    let summary = ytsum::summarize::summarize_overall(&mut generator, &video_info.title, &sections).await?;

    print!(
        "{}",
        ytsum::output::render_report(&link_url, &video_info, &sections, &summary, generator.usage())
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytsum::config::Config::load().unwrap_or_default();

    match run(&cli, &config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.debug {
                return Err(e);
            }
            eprintln!("{}", ytsum::output::render_error(&e.to_string()));
            std::process::exit(1);
        }
    }
}
