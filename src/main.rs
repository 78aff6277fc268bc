mod app;
mod config;
mod input;
mod lyrics;
mod player;
mod queue;
mod search;
mod storage;
mod tui;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "refrain",
    version,
    about = "Search, play, and follow lyrics from the terminal"
)]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Search tracks and print to stdout (headless).
    Search {
        query: String,
    },
    /// Fetch lyrics for a track and print to stdout (headless).
    Lyrics {
        artist: String,
        title: String,
        /// Include LRC timestamps (synced lyrics only).
        #[arg(long)]
        timestamps: bool,
    },

    /// Audio output device management (mpv).
    Audio {
        #[command(subcommand)]
        cmd: AudioCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AudioCommand {
    /// List mpv audio devices.
    List,
    /// Set mpv audio device (name as shown in list).
    Set { device: String },
    /// Clear mpv audio device override.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = config::load_or_init(cli.config.as_deref()).context("load config")?;
    let cfg_path = config::resolve_path(cli.config.as_deref()).context("resolve config path")?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let mouse = cfg.input.mouse;
            let mut terminal = tui::TerminalGuard::enter(mouse).context("init terminal")?;
            let mut app = app::App::new(cfg, cfg_path)?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Search { query } => {
            let client = search::SearchClient::new(cfg.search.api_key.clone());
            print_tracks(&client.search(&query).await);
        }
        Command::Lyrics {
            artist,
            title,
            timestamps,
        } => {
            let client = match cfg.lyrics.base_url.as_deref() {
                Some(url) => lyrics::LyricsClient::with_base_url(url),
                None => lyrics::LyricsClient::new(),
            };
            match lyrics::fetch_lyrics(&client, &artist, &title).await {
                Some(parsed) if timestamps && parsed.synced => println!("{}", parsed.to_lrc()),
                Some(parsed) => {
                    for line in &parsed.lines {
                        println!("{}", line.text);
                    }
                }
                None => println!("No lyrics found for {} - {}", artist, title),
            }
        }
        Command::Audio { cmd } => match cmd {
            AudioCommand::List => list_audio_devices().await?,
            AudioCommand::Set { device } => {
                set_audio_device(cfg, Some(device), cli.config.as_deref())?
            }
            AudioCommand::Clear => set_audio_device(cfg, None, cli.config.as_deref())?,
        },
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();
}

async fn list_audio_devices() -> anyhow::Result<()> {
    let out = tokio::process::Command::new("mpv")
        .args(["--audio-device=help", "--no-video", "--idle=no"])
        .output()
        .await
        .context("run mpv --audio-device=help")?;
    // mpv prints the device list to stdout.
    print!("{}", String::from_utf8_lossy(&out.stdout));
    eprint!("{}", String::from_utf8_lossy(&out.stderr));
    Ok(())
}

fn set_audio_device(
    mut cfg: config::Config,
    device: Option<String>,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    let cleared = device.is_none();
    cfg.player.audio_device = device;
    config::persist(&cfg, path).context("save config")?;
    println!(
        "{}",
        if cleared {
            "Cleared audio device override."
        } else {
            "Updated audio device in config."
        }
    );
    Ok(())
}

fn print_tracks(tracks: &[search::Track]) {
    for (i, t) in tracks.iter().enumerate() {
        let clock = t
            .duration_seconds
            .map(|s| format!("  [{}]", tui::widgets::format_clock(s as f64)))
            .unwrap_or_default();
        println!("{:02}. {}{}  (video_id={})", i + 1, t.label(), clock, t.video_id);
    }
}
