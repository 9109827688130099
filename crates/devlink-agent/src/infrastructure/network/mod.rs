//! Network infrastructure for the agent.
//!
//! Handles the TCP control-channel connection to the controller and
//! implements the outbound [`DeviceChannel`] seam.
//!
//! Architecture:
//! - `ControllerConnection` owns the write half of a TCP stream behind an
//!   async mutex. Holding the lock across the whole `write_all` of one
//!   encoded message is what guarantees the single-writer discipline: the
//!   wire format has no message-ID field, so distinct messages must land on
//!   the stream contiguously and in send order.
//! - A reconnect loop re-establishes the connection when it drops and
//!   reports liveness changes on an `mpsc` channel.
//! - Inbound bytes (controller requests) belong to a separate component;
//!   this layer only watches them to detect a closed connection.

pub mod mock;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use devlink_core::{encode_message, DeviceMessage};
use tokio::{
    io::AsyncReadExt,
    io::AsyncWriteExt,
    net::TcpStream,
    sync::{mpsc, Mutex},
    time,
};
use tracing::{debug, error, info, warn};

use crate::application::channel::{ChannelError, DeviceChannel};

/// Configuration for the agent's network connection.
#[derive(Debug, Clone)]
pub struct ControllerConnectionConfig {
    /// Address of the controller's TCP control port.
    pub controller_addr: SocketAddr,
    /// Human-readable name of this device, used in log output.
    pub device_name: String,
    /// Reconnect interval when the connection drops.
    pub reconnect_interval: Duration,
}

impl Default for ControllerConnectionConfig {
    fn default() -> Self {
        Self {
            controller_addr: "127.0.0.1:27183".parse().unwrap(),
            device_name: "devlink-agent".to_string(),
            reconnect_interval: Duration::from_secs(5),
        }
    }
}

/// Events emitted by the network layer to the application layer.
#[derive(Debug)]
pub enum NetworkEvent {
    /// The TCP connection was established.
    Connected { controller_addr: SocketAddr },
    /// The TCP connection was lost.
    Disconnected,
}

/// Manages the TCP control-channel connection from the device to the
/// controller.
pub struct ControllerConnection {
    config: ControllerConnectionConfig,
    write_half: Arc<Mutex<Option<tokio::net::tcp::OwnedWriteHalf>>>,
}

impl ControllerConnection {
    /// Creates a new (not yet connected) `ControllerConnection`.
    pub fn new(config: ControllerConnectionConfig) -> Self {
        Self {
            config,
            write_half: Arc::new(Mutex::new(None)),
        }
    }

    /// Connects to the controller and keeps the connection alive.
    ///
    /// Returns a channel receiver that delivers [`NetworkEvent`]s to the
    /// caller. Runs a continuous reconnect loop until `running` is set to
    /// false.
    pub async fn start(
        self: Arc<Self>,
        running: Arc<AtomicBool>,
    ) -> mpsc::Receiver<NetworkEvent> {
        let (tx, rx) = mpsc::channel(16);
        let this = Arc::clone(&self);

        tokio::spawn(async move {
            while running.load(Ordering::Relaxed) {
                match TcpStream::connect(this.config.controller_addr).await {
                    Ok(stream) => {
                        info!(
                            device = %this.config.device_name,
                            "connected to controller at {}",
                            this.config.controller_addr
                        );
                        let (read_half, write_half_owned) = stream.into_split();
                        {
                            let mut guard = this.write_half.lock().await;
                            *guard = Some(write_half_owned);
                        }

                        // The write half must be in place before the event
                        // goes out, so a listener reacting to `Connected`
                        // can send immediately.
                        let addr = this.config.controller_addr;
                        let _ = tx.send(NetworkEvent::Connected { controller_addr: addr }).await;

                        this.watch_connection(read_half).await;

                        {
                            let mut guard = this.write_half.lock().await;
                            *guard = None;
                        }
                        let _ = tx.send(NetworkEvent::Disconnected).await;
                        info!(
                            "disconnected from controller; reconnecting in {:?}",
                            this.config.reconnect_interval
                        );
                    }
                    Err(e) => {
                        warn!(
                            "could not connect to controller at {}: {e}",
                            this.config.controller_addr
                        );
                    }
                }

                if running.load(Ordering::Relaxed) {
                    time::sleep(this.config.reconnect_interval).await;
                }
            }
        });

        rx
    }

    /// Watches the read half until the controller closes the connection.
    ///
    /// Controller-to-device requests are consumed and handled by the
    /// component that owns the inbound protocol; at this layer the bytes are
    /// only drained so a close or reset is noticed promptly.
    async fn watch_connection(&self, mut reader: tokio::net::tcp::OwnedReadHalf) {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => debug!(bytes = n, "inbound controller data"),
                Err(e) => {
                    if e.kind() != std::io::ErrorKind::UnexpectedEof {
                        error!("read error on control channel: {e}");
                    }
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl DeviceChannel for ControllerConnection {
    async fn send(&self, msg: &DeviceMessage) -> Result<(), ChannelError> {
        let bytes = encode_message(msg)?;

        // The lock is held from here until the whole message is written, so
        // concurrent producers cannot interleave their bytes.
        let mut guard = self.write_half.lock().await;
        let writer = guard.as_mut().ok_or(ChannelError::NotConnected)?;
        if let Err(e) = writer.write_all(&bytes).await {
            error!("failed to send {msg}: {e}");
            return Err(ChannelError::Io(e));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_has_expected_port() {
        // Arrange / Act
        let cfg = ControllerConnectionConfig::default();

        // Assert
        assert_eq!(cfg.controller_addr.port(), 27183);
    }

    #[test]
    fn test_config_default_reconnect_interval_is_five_seconds() {
        let cfg = ControllerConnectionConfig::default();
        assert_eq!(cfg.reconnect_interval, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_send_before_connect_returns_not_connected() {
        let conn = ControllerConnection::new(ControllerConnectionConfig::default());

        let result = conn.send(&DeviceMessage::clipboard_ack(1)).await;

        assert!(matches!(result, Err(ChannelError::NotConnected)));
    }

    #[tokio::test]
    async fn test_oversize_report_fails_before_touching_the_connection() {
        use devlink_core::protocol::messages::HID_DATA_MAX_BYTES;

        let conn = ControllerConnection::new(ControllerConnectionConfig::default());
        let msg = DeviceMessage::hid_output_report(1, vec![0; HID_DATA_MAX_BYTES + 1]);

        // Encoding is checked first, so the error is the encode failure and
        // not `NotConnected`.
        let result = conn.send(&msg).await;
        assert!(matches!(result, Err(ChannelError::Encode(_))));
    }

    #[tokio::test]
    async fn test_start_returns_receiver_immediately() {
        // Arrange – an address that refuses connections immediately, and a
        // flag that stops the loop before its first retry.
        let cfg = ControllerConnectionConfig {
            controller_addr: "127.0.0.1:1".parse().unwrap(),
            reconnect_interval: Duration::from_secs(60),
            ..Default::default()
        };
        let running = Arc::new(AtomicBool::new(false));
        let conn = Arc::new(ControllerConnection::new(cfg));

        // Act
        let rx = conn.start(Arc::clone(&running)).await;

        // Assert – the receiver exists without waiting for a connection.
        drop(rx);
    }

    #[tokio::test]
    async fn test_messages_arrive_contiguously_and_in_order() {
        use tokio::io::AsyncReadExt;
        use tokio::net::TcpListener;

        // Arrange – a real local socket standing in for the controller.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let cfg = ControllerConnectionConfig {
            controller_addr: addr,
            ..Default::default()
        };
        let conn = Arc::new(ControllerConnection::new(cfg));
        let running = Arc::new(AtomicBool::new(true));
        let mut events = conn.clone().start(Arc::clone(&running)).await;

        let (mut server_side, _) = listener.accept().await.unwrap();
        assert!(matches!(
            events.recv().await,
            Some(NetworkEvent::Connected { .. })
        ));

        // Act – send two messages through the channel.
        conn.send(&DeviceMessage::clipboard_ack(1)).await.unwrap();
        conn.send(&DeviceMessage::hid_output_report(7, vec![]))
            .await
            .unwrap();
        running.store(false, Ordering::Relaxed);

        // Assert – the peer sees both messages back to back, in order.
        let mut wire = vec![0u8; 9 + 5];
        server_side.read_exact(&mut wire).await.unwrap();
        assert_eq!(
            wire,
            [0x01, 0, 0, 0, 0, 0, 0, 0, 0x01, 0x02, 0x00, 0x07, 0x00, 0x00]
        );
    }
}
