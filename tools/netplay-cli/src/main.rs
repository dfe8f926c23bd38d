//! Netplay CLI - Host or join a session without a frontend
//!
//! # Commands
//!
//! - `netplay host` - Listen for a peer on the configured port
//! - `netplay join <host[:port]>` - Connect to a host
//! - `netplay relays` - List the known MITM relay locations
//!
//! Settings come from `netplay.toml` in the platform config directory;
//! command-line flags override them for this run only.
//!
//! # Usage
//!
//! ```bash
//! # On the first machine
//! netplay host --port 55435
//!
//! # On the second machine
//! netplay join 192.168.1.10:55435
//!
//! # Both on one machine
//! netplay join 127.0.0.1:55435 --bind-port 55436
//! ```

mod input;
mod run;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Netplay CLI - Drive a netplay session from the terminal
#[derive(Parser)]
#[command(name = "netplay")]
#[command(about = "Host or join a rollback netplay session")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for a peer
    Host(run::HostArgs),

    /// Connect to a host
    Join(run::JoinArgs),

    /// List MITM relay locations
    Relays,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Host(args) => run::host(args),
        Commands::Join(args) => run::join(args),
        Commands::Relays => {
            for server in netplay_core::MITM_SERVERS {
                println!("{:<10} {}", server.id, server.label);
            }
            Ok(())
        }
    }
}
