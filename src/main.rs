//! # snapstory-dl CLI
//!
//! Command-line interface for the snapstory-dl library: look up a public
//! Snapchat user's stories, highlights and spotlight clips, and download
//! them one at a time or all at once.

use std::path::PathBuf;

use clap::Parser;
use log::error;
use snapstory_dl::{
    bulk_folder_name, BulkProgress, Error, MediaType, Result, Snap, StoryResult,
};

mod cli;

/// Command-line interface for snapstory-dl
#[derive(Parser)]
#[command(name = "snapstory-dl")]
#[command(about = "Snapchat public story, highlight and spotlight downloader")]
#[command(long_about = "Fetches a public Snapchat user's media:
  snapstory-dl someuser                  # List stories, highlights and spotlight
  snapstory-dl someuser --json           # Dump the full result as JSON
  snapstory-dl someuser --download-all   # Save everything into {user}_stories_{millis}/
  snapstory-dl someuser --download ID    # Save a single snap as snap_{id}.{ext}")]
#[command(version)]
struct Cli {
    /// Snapchat username to look up
    username: String,

    /// Print the full result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Download every snap into a fresh folder
    #[arg(long)]
    download_all: bool,

    /// Download a single snap by its id
    #[arg(long, value_name = "ID")]
    download: Option<String>,

    /// Parent directory for downloads
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e}");
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if cli.download.is_some() && cli.download_all {
        eprintln!("❌ Error: --download and --download-all cannot be used together");
        std::process::exit(1);
    }

    // The core trusts a trimmed, non-empty username; validate it here
    let username = cli.username.trim();
    if username.is_empty() {
        eprintln!("❌ Error: username must not be empty");
        std::process::exit(1);
    }

    if cli.verbose {
        eprintln!("👻 Looking up '{username}'...");
    }

    let result = snapstory_dl::fetch_stories(username).await?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result)
                .expect("Failed to serialize story result")
        );
        return Ok(());
    }

    print_summary(&result);

    if let Some(ref snap_id) = cli.download {
        download_one(&result, snap_id, &cli.output).await?;
    } else if cli.download_all {
        download_everything(&result, username, &cli.output).await?;
    }

    Ok(())
}

/// Print the profile header and a per-snap listing
fn print_summary(result: &StoryResult) {
    let profile = &result.user_profile;

    println!("👻 {} (@{})", profile.display_name, profile.username);
    if let Some(count) = profile.subscriber_count {
        println!("   {count} subscribers");
    }
    if let Some(ref bio) = profile.bio {
        println!("   {bio}");
    }
    println!(
        "   {} story, {} highlight, {} spotlight ({} total)",
        result.stories.len(),
        result.highlights.len(),
        result.spotlight.len(),
        result.all_snaps.len()
    );
    println!();

    for snap in &result.all_snaps {
        let collection = snap
            .collection_title
            .as_deref()
            .map(|t| format!(" [{t}]"))
            .unwrap_or_default();
        println!(
            "  {:<9} {:<5} {}{}",
            snap.source.as_str(),
            snap.media_type.as_str(),
            snap.id,
            collection
        );
    }
}

/// Download a single snap as `snap_{id}.{ext}` into the output directory
async fn download_one(result: &StoryResult, snap_id: &str, output: &std::path::Path) -> Result<()> {
    let snap = match result.all_snaps.iter().find(|s| s.id == snap_id) {
        Some(snap) => snap,
        None => {
            eprintln!("❌ Error: no snap with id '{snap_id}'");
            std::process::exit(1);
        }
    };
    if snap.media_url.is_empty() {
        eprintln!("❌ Error: snap '{snap_id}' has no media URL");
        std::process::exit(1);
    }

    let dest = output.join(single_snap_filename(snap));
    eprintln!("📁 Saving to: {}", dest.display());

    snapstory_dl::download(&snap.media_url, &dest).await?;

    eprintln!("✅ Saved {}", dest.display());
    Ok(())
}

/// Bulk-download every snap with a progress bar
async fn download_everything(
    result: &StoryResult,
    username: &str,
    output: &std::path::Path,
) -> Result<()> {
    let folder = output.join(bulk_folder_name(username));
    std::fs::create_dir_all(&folder).map_err(Error::IoError)?;

    let total = result.all_snaps.len();
    eprintln!("📁 Saving to: {}", folder.display());

    let progress_manager =
        cli::ProgressManager::new(total as u64, &format!("👻 Downloading {total} snaps"));
    let pb = progress_manager.pb.clone();

    let progress: snapstory_dl::BulkProgressCallback = std::sync::Arc::new(move |event: BulkProgress| {
        pb.set_position(event.current as u64);
        if event.current >= event.total {
            pb.finish_with_message("✅ Download completed!");
        }
    });

    snapstory_dl::download_all(&result.all_snaps, &folder, Some(progress)).await?;

    eprintln!("✅ Saved {} snaps to {}", total, folder.display());
    Ok(())
}

fn single_snap_filename(snap: &Snap) -> String {
    let ext = match snap.media_type {
        MediaType::Video => "mp4",
        MediaType::Image => "jpg",
    };
    format!("snap_{}.{}", snap.id, ext)
}
