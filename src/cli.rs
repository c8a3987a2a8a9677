use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize YouTube videos into timestamped chapters",
    version,
)]
pub struct Cli {
    /// YouTube video URL or video ID
    pub url: String,

    /// LLM model for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Print the full error chain instead of the error panel
    #[arg(short, long)]
    pub debug: bool,

    /// Show pipeline progress on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
