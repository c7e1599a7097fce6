//! Duplex channel handling.
//!
//! # Responsibilities
//! - Check the handshake's origin against the configured allow-list
//! - Complete upgrade handshake with client
//! - Echo every text or binary message back with the same framing
//!
//! # Data Flow
//! ```text
//! Client ──── message i ────→ Server
//! Client ←─── message i ───── Server   (before message i+1 is read)
//! ```
//!
//! # Design Decisions
//! - One task per channel, owned exclusively by its loop
//! - The first receive error, send error or peer close ends the channel;
//!   the server never initiates a close handshake
//! - Ping/pong is answered by the protocol layer and not echoed
//! - No idle timeout and no message cap beyond the transport defaults

use std::net::SocketAddr;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, FromRequestParts, Request,
    },
    http::header,
    response::Response,
};

use crate::http::error::{HandshakeError, TransportError};
use crate::http::server::AppState;
use crate::net::ChannelGuard;
use crate::observability::metrics;

/// Complete the handshake and hand the connection to the echo loop.
pub async fn upgrade(state: &AppState, request: Request) -> Result<Response, HandshakeError> {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    if !state.config.websocket.permits_origin(origin.as_deref()) {
        return Err(HandshakeError::OriginNotAllowed(
            origin.unwrap_or_else(|| "(none)".to_string()),
        ));
    }

    let path = request.uri().path().to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let (mut parts, _body) = request.into_parts();
    let ws = WebSocketUpgrade::from_request_parts(&mut parts, &()).await?;

    let channels = state.channels.clone();
    let failed_path = path.clone();
    Ok(ws
        .on_failed_upgrade(move |error| {
            tracing::warn!(path = %failed_path, error = %error, "Upgrade failed after handshake");
        })
        .on_upgrade(move |socket| async move {
            let guard = channels.track();
            tracing::info!(
                channel_id = %guard.id(),
                path = %path,
                peer = ?peer,
                "Channel established"
            );
            run_echo(socket, guard).await;
        }))
}

/// Receive a message, send it back unchanged, repeat.
pub async fn run_echo(mut socket: WebSocket, guard: ChannelGuard) {
    let channel_id = guard.id();
    let mut echoed: u64 = 0;

    let failure = loop {
        let message = match socket.recv().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => break Some(TransportError::Receive(e)),
            None => break None,
        };

        let (frame, len) = match &message {
            Message::Text(text) => ("text", text.len()),
            Message::Binary(data) => ("binary", data.len()),
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => break None,
        };
        tracing::debug!(channel_id = %channel_id, frame, bytes = len, "Message received");

        if let Err(e) = socket.send(message).await {
            break Some(TransportError::Send(e));
        }
        metrics::record_message(frame);
        echoed += 1;
    };

    match failure {
        Some(error) => tracing::warn!(
            channel_id = %channel_id,
            echoed,
            error = %error,
            "Channel closed on transport error"
        ),
        None => tracing::info!(channel_id = %channel_id, echoed, "Channel closed by peer"),
    }

    drop(socket);
    drop(guard);
}
