// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abalone CLI - terminal client
//!
//! Plays Abalone on stdin/stdout, either two humans sharing the terminal or
//! one human against the remote AI service.

use std::path::PathBuf;

use abalone_cli::{describe_update, parse_input, render_view, Input, HELP};
use abalone_core::{AiMode, Color, GameMode, GameSession, Layout, SessionView};
use abalone_network::{
    load_config, load_config_from, spawn, AiBridge, ClientConfig, DriverHandle, SessionUpdate, TcpTransport,
    UserCommand,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, Naming};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

/// Rotating file log under `./logs` (or `~/Library/Logs/abalone-cli` on macOS)
fn init_logging() -> Result<()> {
    let log_dir = match std::env::consts::OS {
        "macos" => {
            let mut path = PathBuf::from(std::env::var("HOME")?);
            path.push("Library");
            path.push("Logs");
            path.push("abalone-cli");
            path
        }
        _ => {
            let mut path = PathBuf::from(".");
            path.push("logs");
            path
        }
    };

    std::fs::create_dir_all(&log_dir)?;

    Logger::try_with_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename("abalone-cli")
                .suffix("log"),
        )
        .rotate(
            Criterion::Size(16 * 1024 * 1024),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()?;

    Ok(())
}

static LOGGER_INIT: std::sync::Once = std::sync::Once::new();

fn ensure_logging_initialized() -> Result<()> {
    let mut result = Ok(());
    LOGGER_INIT.call_once(|| {
        result = init_logging();
    });
    result
}

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(name = "abalone-cli", about = "Terminal Abalone client", version)]
struct Args {
    /// Who plays: two humans or a human against the AI
    #[clap(long, value_enum)]
    mode: Option<ModeArg>,

    /// Your color against the AI
    #[clap(long, value_enum)]
    color: Option<ColorArg>,

    /// Starting position
    #[clap(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Moves per player; enables the move limit
    #[clap(long)]
    move_limit: Option<u32>,

    /// Seconds per turn; enables the turn timer
    #[clap(long)]
    time_limit: Option<u32>,

    /// Review AI moves before they are applied
    #[clap(long)]
    confirm_ai: bool,

    /// AI service address (host:port)
    #[clap(long)]
    server: Option<String>,

    /// Read settings from this file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// Log to stderr at debug level
    #[clap(long)]
    debug: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Pvp,
    Pve,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Black,
    White,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Standard,
    BelgianDaisy,
    GermanDaisy,
}

impl Args {
    /// Let flags override the stored settings
    fn apply(&self, config: &mut ClientConfig) {
        let session = &mut config.session;
        if let Some(mode) = self.mode {
            session.mode = match mode {
                ModeArg::Pvp => GameMode::HumanVsHuman,
                ModeArg::Pve => GameMode::HumanVsAi,
            };
        }
        if let Some(color) = self.color {
            session.player_color = match color {
                ColorArg::Black => Color::Black,
                ColorArg::White => Color::White,
            };
        }
        if let Some(layout) = self.layout {
            session.layout = match layout {
                LayoutArg::Standard => Layout::Standard,
                LayoutArg::BelgianDaisy => Layout::BelgianDaisy,
                LayoutArg::GermanDaisy => Layout::GermanDaisy,
            };
        }
        if let Some(moves) = self.move_limit {
            session.limits.black_moves = moves;
            session.limits.white_moves = moves;
            session.limits.enforce_moves = true;
        }
        if let Some(seconds) = self.time_limit {
            session.limits.black_seconds = seconds;
            session.limits.white_seconds = seconds;
            session.limits.enforce_time = true;
        }
        if self.confirm_ai {
            session.ai_mode = AiMode::ConfirmFirst;
        }
        if let Some(server) = &self.server {
            config.server = server.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .init();
    } else if let Err(e) = ensure_logging_initialized() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config().context("Failed to load settings")?,
    };
    args.apply(&mut config);
    tracing::info!(mode = ?config.session.mode, server = %config.server, "Starting session");

    run_game_loop(config).await
}

/// Relay stdin commands to the session driver and print its updates
async fn run_game_loop(config: ClientConfig) -> Result<()> {
    let bridge = AiBridge::new(Box::new(TcpTransport::new(config.server.clone())), config.timeouts());
    let session = GameSession::new(config.session.clone());
    let DriverHandle {
        commands,
        mut updates,
        task,
    } = spawn(session, bridge, config.driver_settings());

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_view: Option<Box<SessionView>> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_input(&line) {
                    Ok(Input::Help) => println!("{}", HELP),
                    Ok(Input::Show) => {
                        if let Some(view) = &last_view {
                            println!("{}", render_view(view));
                        }
                    }
                    Ok(Input::Command(command)) => {
                        let quit = command == UserCommand::Quit;
                        if commands.send(command).await.is_err() || quit {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
            update = updates.recv() => match update {
                Some(SessionUpdate::View(view)) => {
                    println!("{}", render_view(&view));
                    last_view = Some(view);
                }
                Some(update) => {
                    if let Some(text) = describe_update(&update) {
                        println!("{}", text);
                    }
                }
                None => break,
            },
            _ = signal::ctrl_c() => {
                println!("Interrupted");
                break;
            }
        }
    }

    // Closing the command channel stops the driver
    drop(commands);
    let session = task.await.context("Session driver failed")?;
    tracing::info!(turns = session.history().len(), "Session finished");
    Ok(())
}
