//! Discord Gateway WebSocket client.
//!
//! This module handles connecting to the Discord gateway, the hello/identify
//! handshake, gateway heartbeating, parsing MESSAGE_CREATE dispatches into
//! [`InboundMessage`] values, and reconnection with exponential backoff.
//!
//! The gateway heartbeat here is Discord's connection keepalive and is
//! unrelated to the liveness heartbeat this agent persists to disk.

use crate::core::InboundMessage;
use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Duration, Interval};
use tokio_tungstenite::{connect_async, tungstenite::Message};

const DISCORD_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

// GUILDS | GUILD_MESSAGES | MESSAGE_CONTENT
const GATEWAY_INTENTS: u64 = (1 << 0) | (1 << 9) | (1 << 15);

/// A gateway frame reduced to the cases this client acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// Server hello carrying the heartbeat cadence.
    Hello { heartbeat_interval_ms: u64 },
    /// The server asked for an immediate heartbeat.
    HeartbeatRequest,
    /// Acknowledgement of a heartbeat we sent.
    HeartbeatAck,
    /// A chat message was posted.
    MessageCreate(InboundMessage),
    /// Any other opcode or dispatch type; ignored.
    Other,
}

/// A parsed gateway frame: the event plus the sequence number, which must be
/// echoed back in heartbeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub seq: Option<u64>,
    pub event: GatewayEvent,
}

/// Parses a raw gateway JSON frame.
///
/// # Returns
/// * `Ok(ParsedFrame)` for any structurally valid frame (unknown opcodes map
///   to `GatewayEvent::Other`)
/// * `Err` if the JSON is malformed or a known frame is missing its payload
pub fn parse_frame(text: &str) -> Result<ParsedFrame> {
    #[derive(Deserialize)]
    struct RawFrame {
        op: u8,
        #[serde(default)]
        d: Value,
        #[serde(default)]
        s: Option<u64>,
        #[serde(default)]
        t: Option<String>,
    }

    #[derive(Deserialize)]
    struct HelloData {
        heartbeat_interval: u64,
    }

    #[derive(Deserialize)]
    struct Author {
        #[serde(default)]
        bot: bool,
    }

    #[derive(Deserialize)]
    struct MessageData {
        channel_id: String,
        content: String,
        author: Author,
    }

    let frame: RawFrame = serde_json::from_str(text)?;
    let event = match frame.op {
        10 => {
            let hello: HelloData = serde_json::from_value(frame.d)?;
            GatewayEvent::Hello {
                heartbeat_interval_ms: hello.heartbeat_interval,
            }
        }
        1 => GatewayEvent::HeartbeatRequest,
        11 => GatewayEvent::HeartbeatAck,
        0 if frame.t.as_deref() == Some("MESSAGE_CREATE") => {
            let msg: MessageData = serde_json::from_value(frame.d)?;
            GatewayEvent::MessageCreate(InboundMessage {
                channel_id: msg.channel_id,
                author_is_bot: msg.author.bot,
                content: msg.content,
            })
        }
        _ => GatewayEvent::Other,
    };

    Ok(ParsedFrame {
        seq: frame.s,
        event,
    })
}

/// Discord Gateway client that maintains the WebSocket session and forwards
/// inbound chat messages to the command dispatcher.
pub struct DiscordGatewayClient {
    url: String,
    token: String,
    output_tx: mpsc::Sender<InboundMessage>,
}

impl DiscordGatewayClient {
    /// Creates a new gateway client against the public Discord gateway.
    pub fn new(token: String, output_tx: mpsc::Sender<InboundMessage>) -> Self {
        Self::with_url(DISCORD_GATEWAY_URL.to_string(), token, output_tx)
    }

    /// Creates a client against a custom gateway URL (used by tests).
    pub fn with_url(url: String, token: String, output_tx: mpsc::Sender<InboundMessage>) -> Self {
        Self {
            url,
            token,
            output_tx,
        }
    }

    /// Runs the client with automatic reconnection until shutdown.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<()>) -> Result<()> {
        let mut backoff_ms: u64 = 1000;
        const MAX_BACKOFF_MS: u64 = 60_000;

        loop {
            log::info!("Connecting to Discord gateway at {}", self.url);

            match self.connect_and_run(&mut shutdown_rx).await {
                Ok(true) => {
                    log::info!("Gateway client shutting down");
                    return Ok(());
                }
                Ok(false) => {
                    log::info!("Gateway connection closed by server");
                    backoff_ms = 1000;
                }
                Err(e) => {
                    log::error!("Gateway connection failed: {}", e);
                }
            }

            log::info!("Reconnecting to gateway in {} ms", backoff_ms);
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    log::info!("Gateway client shutting down during backoff");
                    return Ok(());
                }
                _ = tokio::time::sleep(Duration::from_millis(backoff_ms)) => {}
            }

            backoff_ms = std::cmp::min(backoff_ms * 2, MAX_BACKOFF_MS);
        }
    }

    /// Connects once and processes frames until the connection drops or a
    /// shutdown arrives. Returns `Ok(true)` on shutdown, `Ok(false)` when
    /// the server closed the connection.
    async fn connect_and_run(&self, shutdown_rx: &mut watch::Receiver<()>) -> Result<bool> {
        let (ws_stream, _) = connect_async(&self.url)
            .await
            .map_err(|e| anyhow::anyhow!("failed to connect to {}: {}", self.url, e))?;

        log::info!("Connected to Discord gateway");

        let (mut write, mut read) = ws_stream.split();
        let mut heartbeat_timer: Option<Interval> = None;
        let mut last_seq: Option<u64> = None;

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(true);
                }
                _ = maybe_tick(&mut heartbeat_timer) => {
                    let payload = json!({ "op": 1, "d": last_seq }).to_string();
                    if let Err(e) = write.send(Message::text(payload)).await {
                        return Err(anyhow::anyhow!("failed to send gateway heartbeat: {}", e));
                    }
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            let frame = match parse_frame(text.as_str()) {
                                Ok(frame) => frame,
                                Err(e) => {
                                    log::warn!("Failed to parse gateway frame: {}", e);
                                    continue;
                                }
                            };
                            if frame.seq.is_some() {
                                last_seq = frame.seq;
                            }
                            match frame.event {
                                GatewayEvent::Hello { heartbeat_interval_ms } => {
                                    log::debug!(
                                        "Gateway hello: heartbeat every {} ms",
                                        heartbeat_interval_ms
                                    );
                                    heartbeat_timer = Some(interval(Duration::from_millis(
                                        heartbeat_interval_ms.max(1),
                                    )));
                                    let identify = json!({
                                        "op": 2,
                                        "d": {
                                            "token": self.token,
                                            "intents": GATEWAY_INTENTS,
                                            "properties": {
                                                "os": std::env::consts::OS,
                                                "browser": "homebeat",
                                                "device": "homebeat"
                                            }
                                        }
                                    })
                                    .to_string();
                                    write.send(Message::text(identify)).await.map_err(|e| {
                                        anyhow::anyhow!("failed to send identify: {}", e)
                                    })?;
                                }
                                GatewayEvent::HeartbeatRequest => {
                                    let payload = json!({ "op": 1, "d": last_seq }).to_string();
                                    write.send(Message::text(payload)).await.map_err(|e| {
                                        anyhow::anyhow!("failed to send gateway heartbeat: {}", e)
                                    })?;
                                }
                                GatewayEvent::HeartbeatAck => {
                                    log::trace!("Gateway heartbeat acknowledged");
                                }
                                GatewayEvent::MessageCreate(inbound) => {
                                    if let Err(e) = self.output_tx.send(inbound).await {
                                        return Err(anyhow::anyhow!(
                                            "inbound message channel closed: {}",
                                            e
                                        ));
                                    }
                                }
                                GatewayEvent::Other => {}
                            }
                        }
                        Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                            log::trace!("Gateway ping/pong");
                        }
                        Some(Ok(Message::Binary(_))) | Some(Ok(Message::Frame(_))) => {
                            log::debug!("Ignoring non-text gateway message");
                        }
                        Some(Ok(Message::Close(_))) => {
                            log::info!("Gateway sent close frame");
                            return Ok(false);
                        }
                        Some(Err(e)) => {
                            return Err(anyhow::anyhow!("gateway WebSocket error: {}", e));
                        }
                        None => {
                            return Ok(false);
                        }
                    }
                }
            }
        }
    }
}

/// Ticks the heartbeat timer once armed; pends forever before the hello
/// frame arrives.
async fn maybe_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
