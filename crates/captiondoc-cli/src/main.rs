use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, fmt};

use captiondoc_core::{
    CaptionDocError, HostingConfig, MetadataSource, YoutubeClient, build_document, failure_hints,
    format_transcript_plain, generate_documents, parse_video_id, save_documents,
};

#[derive(Parser)]
#[command(name = "captiondoc")]
#[command(about = "Turn a YouTube video's captions into timestamped Word and PDF transcripts")]
struct Cli {
    /// Video ID (e.g. "dQw4w9WgXcQ") or a full YouTube URL
    video: String,

    /// Directory to write the .docx and .pdf files to. Defaults to your downloads folder.
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Only show the video's title and thumbnail
    #[arg(long)]
    info: bool,

    /// Also print the transcript to stdout
    #[arg(short, long)]
    print: bool,

    /// Show debug logs on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_out_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

fn report_failure(error: &CaptionDocError) {
    eprintln!("{} {}", style("Error:").red().bold(), error);

    if error.is_lookup_failure() {
        eprintln!(
            "\n{}",
            style("Unable to generate transcript. Please check if the video has captions available.")
                .red()
        );
        eprintln!("\n{}", style("Possible reasons for this error:").dim());
        for (i, hint) in failure_hints().iter().enumerate() {
            eprintln!("  {}. {}", i + 1, hint);
        }
        eprintln!(
            "\n{}",
            style("Please try another video or check if the video ID is correct.").dim()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let video_id = match parse_video_id(&cli.video) {
        Ok(id) => id,
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    };

    let client = YoutubeClient::new(HostingConfig::from_env()?)?;

    println!(
        "\n{}  {}\n",
        style("captiondoc").cyan().bold(),
        style("YouTube Transcript").dim()
    );

    // Step 1: Preview (title + thumbnail)
    let spinner = create_spinner("Fetching video info...");
    let metadata = match client.resolve_metadata(&video_id).await {
        Ok(metadata) => metadata,
        Err(e) => {
            spinner.finish_and_clear();
            report_failure(&e);
            std::process::exit(1);
        }
    };
    spinner.finish_with_message(format!(
        "{} {}",
        style("✓").green().bold(),
        style(&metadata.title).bold()
    ));
    if let Some(url) = &metadata.thumbnail_url {
        println!("  {} {}", style("Thumbnail:").dim(), style(url).cyan());
    }

    if cli.info {
        return Ok(());
    }

    // Step 2: Generate both documents
    let spinner = create_spinner("Generating transcript...");
    let bundle = match generate_documents(&video_id, &client, &client).await {
        Ok(bundle) => bundle,
        Err(e) => {
            spinner.finish_and_clear();
            report_failure(&e);
            std::process::exit(1);
        }
    };
    spinner.finish_with_message(format!(
        "{} Transcript generated successfully! {}",
        style("✓").green().bold(),
        style(format!("({} entries)", bundle.entries.len())).dim()
    ));

    let out_dir = cli.out_dir.unwrap_or_else(default_out_dir);
    let written = save_documents(&bundle, &out_dir).await?;

    println!();
    for (document, path) in bundle.documents().iter().zip(&written) {
        println!(
            "{} {} {} {}",
            style(format!("{:>5}", document.kind.label())).dim(),
            style(path.display()).cyan(),
            style(format!("[{}]", format_size(document.bytes.len()))).dim(),
            style(document.mime_type()).dim()
        );
    }

    if cli.print {
        println!("\n{}", style("─".repeat(60)).dim());
        let document = build_document(&bundle.metadata.title, &bundle.entries);
        println!("{}", format_transcript_plain(&document));
    }

    Ok(())
}
