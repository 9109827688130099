//! devlink agent entry point.
//!
//! Wires together the controller connection, the clipboard watcher, and the
//! HID output forwarder, then runs the tokio event loop.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ AgentConfig::load_or_default()   -- TOML config, defaults on first run
//!  └─ ControllerConnection::start()    -- TCP reconnect loop
//!  └─ watch_clipboard()                -- poll loop -> ClipboardSync / ClipboardAck
//!  └─ forward_reports()                -- mpsc drain -> HidOutputReport
//!  └─ status loop                      -- logs Connected / Disconnected
//! ```
//!
//! # Device adapters
//!
//! The `ScriptedClipboard` used here reads from an in-memory script rather
//! than the OS clipboard. In a production build it is replaced by the
//! platform adapter (X11 selections, Windows `OpenClipboard`, macOS
//! `NSPasteboard`). Likewise, the HID report channel is fed by the
//! emulated-device layer that owns the kernel-side virtual devices.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use devlink_agent::application::{
    channel::DeviceChannel, forward_hid::ForwardHidOutputUseCase,
    sync_clipboard::SyncClipboardUseCase,
};
use devlink_agent::infrastructure::{
    clipboard::{watch_clipboard, ScriptedClipboard},
    hid::{forward_reports, OutputReportEvent},
    network::{ControllerConnection, ControllerConnectionConfig, NetworkEvent},
    storage::config::{default_config_path, AgentConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config first: it carries the default log level.
    let config = match default_config_path() {
        Ok(path) => AgentConfig::load_or_default(&path)?,
        Err(_) => AgentConfig::default(),
    };

    // Initialise structured logging. RUST_LOG overrides the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.agent.log_level)),
        )
        .init();

    info!(device = %config.agent.device_name, "devlink agent starting");

    // Shutdown flag.
    let running = Arc::new(AtomicBool::new(true));

    // ── Controller connection ─────────────────────────────────────────────────
    let controller_addr: SocketAddr = config.network.controller_addr.parse().unwrap_or_else(|_| {
        warn!(
            "invalid controller_addr {:?}; using the default",
            config.network.controller_addr
        );
        ControllerConnectionConfig::default().controller_addr
    });

    let net_cfg = ControllerConnectionConfig {
        controller_addr,
        device_name: config.agent.device_name.clone(),
        reconnect_interval: Duration::from_secs(config.network.reconnect_interval_secs),
    };

    let connection = Arc::new(ControllerConnection::new(net_cfg));
    let mut network_rx = connection.clone().start(Arc::clone(&running)).await;
    let channel: Arc<dyn DeviceChannel> = connection;

    // ── Clipboard watcher ─────────────────────────────────────────────────────
    // In production: replace ScriptedClipboard with the platform clipboard
    // adapter.
    if config.clipboard.sync_enabled {
        let use_case = SyncClipboardUseCase::new(Arc::clone(&channel));
        tokio::spawn(watch_clipboard(
            Box::new(ScriptedClipboard::empty()),
            use_case,
            Duration::from_millis(config.clipboard.poll_interval_ms),
            Arc::clone(&running),
        ));
    }

    // ── HID output forwarder ──────────────────────────────────────────────────
    let hid_use_case = ForwardHidOutputUseCase::new(Arc::clone(&channel));
    let (report_tx, report_rx) = tokio::sync::mpsc::channel::<OutputReportEvent>(64);
    tokio::spawn(forward_reports(report_rx, hid_use_case));
    // The emulated-device layer pushes output reports through this sender;
    // it stays open for the lifetime of the agent.
    let _report_tx = report_tx;

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    // ── Status loop ───────────────────────────────────────────────────────────
    info!("devlink agent ready; connecting to controller at {controller_addr}");

    while let Some(event) = network_rx.recv().await {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        match event {
            NetworkEvent::Connected { controller_addr } => {
                info!("control channel connected to {controller_addr}");
            }
            NetworkEvent::Disconnected => {
                warn!("control channel disconnected; reconnect in progress");
            }
        }
    }

    info!("devlink agent stopped");
    Ok(())
}
