//! Host and join commands
//!
//! Both end in the same fixed-rate frame loop: PreFrame, wait out the
//! frame, PostFrame. The loop stops after `--frames` ticks or when the
//! session stops running.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Args;
use netplay_core::address::NETPLAY_HOST_STR_LEN;
use netplay_core::{
    ControlRequest, GgrsEngine, LocalSocket, Netplay, NetplaySettings, decode_hostname,
};

use crate::input::SyntheticInput;

const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Arguments shared by both roles
#[derive(Args)]
pub struct LoopArgs {
    /// Ticks to run before disconnecting (0 = until the session stops)
    #[arg(long, default_value = "3600")]
    pub frames: u64,

    /// Disable desync detection for this run
    #[arg(long)]
    pub no_desync_detection: bool,
}

/// Arguments for the host command
#[derive(Args)]
pub struct HostArgs {
    /// UDP port to listen on (defaults to the configured port)
    #[arg(short, long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub run: LoopArgs,
}

/// Arguments for the join command
#[derive(Args)]
pub struct JoinArgs {
    /// Host to connect to, as `host` or `host:port`
    pub target: String,

    /// Local UDP port to bind (defaults to the host's port)
    #[arg(long)]
    pub bind_port: Option<u16>,

    #[command(flatten)]
    pub run: LoopArgs,
}

pub fn host(args: HostArgs) -> Result<()> {
    let mut settings = netplay_core::load_settings();
    if let Some(port) = args.port {
        settings.netplay.port = port;
    }
    apply_loop_args(&mut settings, &args.run);

    let port = settings.netplay.port;
    let mut netplay = Netplay::new(GgrsEngine::new(), SyntheticInput::new(), settings);
    if !netplay.dispatch(ControlRequest::EnableServer) {
        bail!("Failed to host on port {}", port);
    }

    println!("Hosting on port {}", port);
    for ip in LocalSocket::get_local_ips() {
        println!("  reachable at {}:{}", ip, port);
    }

    frame_loop(&mut netplay, args.run.frames)
}

pub fn join(args: JoinArgs) -> Result<()> {
    let target = decode_hostname(&args.target, NETPLAY_HOST_STR_LEN)
        .with_context(|| format!("Invalid host: {}", args.target))?;
    if target.port == 0 {
        bail!("No port given in {}", args.target);
    }

    let mut settings = netplay_core::load_settings();
    settings.netplay.server = target.address.clone();
    settings.netplay.port = target.port;
    if args.bind_port.is_some() {
        settings.netplay.bind_port = args.bind_port;
    }
    apply_loop_args(&mut settings, &args.run);

    let mut netplay = Netplay::new(GgrsEngine::new(), SyntheticInput::new(), settings);
    if !netplay.dispatch(ControlRequest::EnableClient) {
        bail!("Failed to join {}:{}", target.address, target.port);
    }

    println!("Joining {}:{}", target.address, target.port);
    frame_loop(&mut netplay, args.run.frames)
}

fn apply_loop_args(settings: &mut NetplaySettings, args: &LoopArgs) {
    if args.no_desync_detection {
        settings.netplay.desync_detection = false;
    }
}

fn frame_loop(netplay: &mut Netplay<GgrsEngine, SyntheticInput>, frames: u64) -> Result<()> {
    let mut tick = 0u64;
    let mut submitted = 0u64;

    while frames == 0 || tick < frames {
        let start = Instant::now();

        if netplay.dispatch(ControlRequest::PreFrame) {
            submitted += 1;
        }
        netplay.input().advance();

        if let Some(remaining) = FRAME_TIME.checked_sub(start.elapsed()) {
            thread::sleep(remaining);
        }
        netplay.dispatch(ControlRequest::PostFrame);

        if !netplay.dispatch(ControlRequest::IsEnabled) {
            tracing::warn!("Session stopped");
            break;
        }
        tick += 1;
    }

    netplay.dispatch(ControlRequest::Disconnect);
    println!("Ran {} frames ({} with input submitted)", tick, submitted);
    Ok(())
}
