use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use mixcast_client::{ClientConfig, ClientEngine, EngineHandle, SyntheticCapture, WebRtcEngine};
use mixcast_core::{PeerId, PeerSummary, Role};
use mixcast_server::RelayConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mixcast", version, about = "WebRTC signaling relay and native peer")]
struct Cli {
    /// Used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve {
        #[arg(long)]
        bind: Option<SocketAddr>,

        #[arg(long)]
        max_message_size: Option<usize>,
    },

    /// Join a relay as a native peer.
    Join {
        #[arg(long, default_value = "ws://127.0.0.1:3478")]
        url: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        role: Role,

        /// Peer ids to call once identified.
        #[arg(long = "call")]
        calls: Vec<PeerId>,

        #[arg(long)]
        auto_call: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Serve {
            bind,
            max_message_size,
        } => {
            let mut config = RelayConfig::from_env();
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(limit) = max_message_size {
                config.max_message_size = limit;
            }

            println!(
                "{}",
                format!("📡 Starting mixcast relay on ws://{}", config.bind)
                    .green()
                    .bold()
            );
            mixcast_server::serve(config).await
        }

        Commands::Join {
            url,
            name,
            role,
            calls,
            auto_call,
        } => join(url, name, role, calls, auto_call).await,
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn join(
    url: String,
    name: String,
    role: Role,
    calls: Vec<PeerId>,
    auto_call: bool,
) -> Result<()> {
    let capture = SyntheticCapture::new(format!("{name}-stream"));
    let rtc = Arc::new(WebRtcEngine::new(Arc::new(capture)).context("Failed to set up WebRTC")?);

    println!("{}", format!("🔌 Connecting to {url}...").cyan());
    let handle = ClientEngine::start(ClientConfig::new(url, name, role), rtc).await?;
    let local_id = handle.identified().await?;
    println!(
        "{} {} ({})",
        "✨ Joined as".green().bold(),
        local_id.to_string().bold(),
        role
    );

    let mut called: HashSet<PeerId> = HashSet::new();
    for target in calls {
        called.insert(target);
        handle.call(target).await?;
    }

    let mut roster = handle.roster_updates();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            changed = roster.changed() => {
                if changed.is_err() {
                    println!("{}", "🔌 Relay connection closed".yellow());
                    break;
                }
                let peers = roster.borrow_and_update().clone();
                print_roster(&peers, local_id);

                if auto_call {
                    for target in auto_call_targets(role, &peers, local_id) {
                        if called.insert(target) {
                            handle.call(target).await?;
                        }
                    }
                }
            }

            notice = handle.next_notice() => {
                match notice {
                    Some(notice) => eprintln!("{} {}", "⚠️".yellow(), notice.0),
                    None => break,
                }
            }

            _ = ticker.tick(), if role == Role::Mixer => {
                select_first_stream(&handle).await;
            }

            _ = tokio::signal::ctrl_c() => {
                println!("{}", "👋 Leaving".cyan());
                break;
            }
        }
    }

    Ok(())
}

fn print_roster(peers: &[PeerSummary], local_id: PeerId) {
    println!("{}", format!("👥 {} connected", peers.len()).cyan());
    for peer in peers {
        let role = peer.role.map(Role::as_str).unwrap_or("-");
        let marker = if peer.id == local_id { " (you)" } else { "" };
        println!("   {} {:<16} {}{}", peer.id, peer.name, role, marker);
    }
}

/// Feeds and viewers call mixers; mixers call feeds.
fn auto_call_targets(role: Role, peers: &[PeerSummary], local_id: PeerId) -> Vec<PeerId> {
    let wanted = match role {
        Role::Feed | Role::Viewer => Role::Mixer,
        Role::Mixer => Role::Feed,
    };

    peers
        .iter()
        .filter(|p| p.id != local_id && p.role == Some(wanted))
        .map(|p| p.id)
        .collect()
}

async fn select_first_stream(handle: &EngineHandle) {
    let tracks = handle.tracks();
    if tracks.selected().await.is_some() {
        return;
    }
    if let Some(first) = tracks.streams().await.into_iter().next() {
        if tracks.select_stream(&first).await {
            println!("{} {}", "🎬 Now mixing".green().bold(), first);
        }
    }
}
