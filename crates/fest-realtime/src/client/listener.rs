//! Background socket listener

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fest_common::RealtimeConfig;
use fest_core::{DomainResult, IdeaId, RemoteEvent};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::handle::Command;
use super::unavailable;
use crate::protocol::{ChannelMessage, DecodeError};

pub(crate) type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// State shared between the listener and its handle
pub(crate) struct ListenerContext {
    pub url: String,
    pub config: RealtimeConfig,
    pub events: mpsc::Sender<RemoteEvent>,
    pub joined: Arc<RwLock<HashSet<IdeaId>>>,
    pub connected: Arc<AtomicBool>,
}

/// How a connection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// Closed on request, or nobody is reading events any more
    Stop,
    /// Lost the socket; worth reconnecting
    Dropped,
}

/// Open the socket, giving up after `timeout`
pub(crate) async fn open_socket(url: &str, timeout: Duration) -> DomainResult<Socket> {
    match tokio::time::timeout(timeout, connect_async(url)).await {
        Ok(Ok((socket, _response))) => Ok(socket),
        Ok(Err(e)) => Err(unavailable(e.to_string())),
        Err(_) => Err(unavailable(format!(
            "connect timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}

/// Outcome of a reconnect cycle
enum Reconnect {
    Connected(Socket),
    /// Shutdown requested, or nobody is reading events any more
    Stopped,
    GaveUp,
}

/// Run until shutdown, reconnecting a bounded number of times
pub(crate) async fn listener_loop(
    ctx: ListenerContext,
    mut socket: Socket,
    mut control_rx: mpsc::Receiver<Command>,
) {
    loop {
        if run_connection(&ctx, socket, &mut control_rx).await == Exit::Stop {
            tracing::info!("Real-time listener shutting down");
            break;
        }

        ctx.connected.store(false, Ordering::Release);
        match reconnect(&ctx, &mut control_rx).await {
            Reconnect::Connected(next) => {
                ctx.connected.store(true, Ordering::Release);
                socket = next;
            }
            Reconnect::Stopped => {
                tracing::info!("Real-time listener shutting down while reconnecting");
                break;
            }
            Reconnect::GaveUp => {
                tracing::error!(
                    attempts = ctx.config.max_reconnects,
                    "Real-time channel lost, live updates stopped"
                );
                break;
            }
        }
    }

    ctx.connected.store(false, Ordering::Release);
    // Dropping `ctx` closes the event queue
}

/// Retry the socket, staying responsive to the control channel between
/// and during attempts
async fn reconnect(ctx: &ListenerContext, control_rx: &mut mpsc::Receiver<Command>) -> Reconnect {
    for attempt in 1..=ctx.config.max_reconnects {
        let next = async {
            tokio::time::sleep(ctx.config.reconnect_delay()).await;
            open_socket(&ctx.url, ctx.config.connect_timeout()).await
        };
        tokio::pin!(next);

        let result = loop {
            tokio::select! {
                result = &mut next => break result,
                cmd = control_rx.recv() => match cmd {
                    // Joined topics are replayed once a socket is up
                    Some(Command::Send(message)) => {
                        tracing::debug!(event = %message.event, "Dropping frame while reconnecting");
                    }
                    Some(Command::Shutdown) | None => return Reconnect::Stopped,
                },
                () = ctx.events.closed() => return Reconnect::Stopped,
            }
        };

        match result {
            Ok(socket) => {
                tracing::info!(attempt, "Real-time channel reconnected");
                return Reconnect::Connected(socket);
            }
            Err(e) => tracing::warn!(attempt, error = %e, "Reconnect failed"),
        }
    }
    Reconnect::GaveUp
}

/// Pump one connection until it drops or we are told to stop
async fn run_connection(
    ctx: &ListenerContext,
    socket: Socket,
    control_rx: &mut mpsc::Receiver<Command>,
) -> Exit {
    let (mut sink, mut stream) = socket.split();

    // Re-join topics held before a reconnect
    let topics: Vec<IdeaId> = ctx.joined.read().await.iter().copied().collect();
    for idea_id in topics {
        let frame = Message::Text(ChannelMessage::join(idea_id).to_text());
        if let Err(e) = sink.send(frame).await {
            tracing::warn!(error = %e, "Failed to re-join topic");
            return Exit::Dropped;
        }
    }

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !forward(ctx, &text).await {
                        return Exit::Stop;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::warn!("Real-time channel closed by server");
                    return Exit::Dropped;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Real-time channel error");
                    return Exit::Dropped;
                }
            },

            cmd = control_rx.recv() => match cmd {
                Some(Command::Send(message)) => {
                    if let Err(e) = sink.send(Message::Text(message.to_text())).await {
                        tracing::warn!(event = %message.event, error = %e, "Send failed");
                        return Exit::Dropped;
                    }
                }
                Some(Command::Shutdown) | None => {
                    let _ = sink.send(Message::Close(None)).await;
                    return Exit::Stop;
                }
            },
        }
    }
}

/// Decode a text frame and queue it; `false` once the queue has no reader
async fn forward(ctx: &ListenerContext, text: &str) -> bool {
    let event = match ChannelMessage::parse(text).and_then(ChannelMessage::into_remote_event) {
        Ok(event) => event,
        Err(DecodeError::UnknownEvent(name)) => {
            tracing::trace!(event = %name, "Ignoring unknown event");
            return true;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed frame");
            return true;
        }
    };

    tracing::trace!(event = %event.event_type().as_str(), idea_id = %event.idea_id(), "Event received");
    ctx.events.send(event).await.is_ok()
}
