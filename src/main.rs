//! Headless host for the frame chunk limit.
//!
//! Runs the limit against an in-memory world so it can be exercised without
//! a game server.
//!
//! # Architecture Overview
//!
//! ```text
//!   stdin thread ──Console(line)──┐
//!                                 ├──▶ HostTask queue ──▶ main loop (single consumer)
//!   watcher thread ──Config(sig)──┘                         │
//!                                                           ├─ FrameChunkLimit::handle_signal
//!   Ctrl+C ───────────Shutdown────┘                         ├─ World::place → on_hanging_place
//!                                                           └─ on_command("framechunk")
//! ```
//!
//! Every task runs on the one consumer, in the order it was queued.

use std::io::BufRead;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use frame_chunk_limit::command::SET_PERMISSION;
use frame_chunk_limit::host::{BufferedSender, ChunkKey, CommandSender, EntityKind, World};
use frame_chunk_limit::observability::{logging, metrics};
use frame_chunk_limit::{ConfigSignal, FrameChunkLimit};

#[derive(Parser)]
#[command(name = "frame-chunk-limit")]
#[command(about = "Run the item frame chunk limit against an in-memory world", long_about = None)]
struct Cli {
    /// Directory holding config.toml
    #[arg(short, long, default_value = "plugins/FrameChunkLimit")]
    data_dir: PathBuf,

    /// Name of the simulated player issuing console lines
    #[arg(short, long, default_value = "Steve")]
    player: String,

    /// Run the player without the framechunklimit.set permission
    #[arg(long)]
    no_permission: bool,

    /// Expose Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<SocketAddr>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = logging::DEFAULT_DIRECTIVE)]
    log: String,
}

/// Work for the main context.
#[derive(Debug)]
enum HostTask {
    Config(ConfigSignal),
    Console(String),
    Shutdown,
}

impl From<ConfigSignal> for HostTask {
    fn from(signal: ConfigSignal) -> Self {
        HostTask::Config(signal)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log);

    tracing::info!("frame-chunk-limit v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(addr) = cli.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<HostTask>();
    let mut plugin = FrameChunkLimit::on_enable(&cli.data_dir, tx.clone());

    spawn_console_reader(tx.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            let _ = tx.send(HostTask::Shutdown);
        }
    });

    let mut player = BufferedSender::player(cli.player);
    if !cli.no_permission {
        player = player.with_permission(SET_PERMISSION);
    }
    let mut world = World::new();

    println!("Commands: place <x> <z> [frame|glow|painting], count <x> <z>, framechunk [limit], quit");
    while let Some(task) = rx.recv().await {
        match task {
            HostTask::Config(signal) => plugin.handle_signal(signal),
            HostTask::Console(line) => {
                let keep_running = run_console_line(&mut plugin, &mut world, &player, &line);
                for message in player.take_messages() {
                    println!("[to {}] {}", player.name(), message);
                }
                if !keep_running {
                    break;
                }
            }
            HostTask::Shutdown => break,
        }
    }

    plugin.on_disable();
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Read stdin on a plain thread so a pending read never holds up shutdown.
fn spawn_console_reader(tx: mpsc::UnboundedSender<HostTask>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(HostTask::Console(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(HostTask::Shutdown);
    });
}

/// Execute one console line. Returns `false` when the host should stop.
fn run_console_line(
    plugin: &mut FrameChunkLimit,
    world: &mut World,
    player: &BufferedSender,
    line: &str,
) -> bool {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return true;
    };
    let args: Vec<&str> = parts.collect();

    match command.trim_start_matches('/') {
        "quit" | "stop" => return false,
        "place" => match parse_chunk(&args) {
            Some(key) => {
                let kind = args
                    .get(2)
                    .and_then(|k| k.parse::<EntityKind>().ok())
                    .unwrap_or(EntityKind::ItemFrame);
                let placed = world.place(key, kind.clone(), Some(player), |event| {
                    plugin.on_hanging_place(event);
                });
                println!(
                    "{} {} in chunk ({}, {}); {} hanging displays",
                    if placed { "Placed" } else { "Refused" },
                    kind,
                    key.x,
                    key.z,
                    world.hanging_displays(key)
                );
            }
            None => println!("Usage: place <x> <z> [frame|glow|painting]"),
        },
        "count" => match parse_chunk(&args) {
            Some(key) => println!(
                "Chunk ({}, {}) holds {} hanging displays (limit {})",
                key.x,
                key.z,
                world.hanging_displays(key),
                plugin.limit()
            ),
            None => println!("Usage: count <x> <z>"),
        },
        label => {
            if !plugin.on_command(player, label, &args) {
                println!("Unknown command: {}", label);
            }
        }
    }
    true
}

fn parse_chunk(args: &[&str]) -> Option<ChunkKey> {
    let x = args.first()?.parse().ok()?;
    let z = args.get(1)?.parse().ok()?;
    Some(ChunkKey::new(x, z))
}
