//! Per-connection WebSocket session loop.
//!
//! One task per open connection waits on two sources at once: frames from
//! the client and events from the owner's registry channel. Whatever ends
//! the loop, the connection leaves its group before the task exits.

use actix_ws::{CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tracing::{debug, info, warn};

use crate::domain::{EventReceiver, GadgetEvent, GroupMembership};

use super::lifecycle::ConnectionState;
use super::messages::{GadgetEventFrame, PongFrame, is_ping};

#[derive(Debug)]
enum SessionEnd {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    Protocol(ProtocolError),
    Network(Closed),
    Unsubscribed,
}

pub(super) async fn run(
    mut session: Session,
    mut stream: MessageStream,
    mut membership: GroupMembership,
    mut events: EventReceiver,
    mut state: ConnectionState,
) {
    let end = loop {
        let step = tokio::select! {
            frame = stream.recv() => handle_frame(&mut session, state, frame).await,
            event = events.recv() => match event {
                Some(event) => deliver(&mut session, &event).await.map_err(SessionEnd::Network),
                None => Err(SessionEnd::Unsubscribed),
            },
        };
        if let Err(end) = step {
            break end;
        }
    };

    state = state.on_disconnect();
    membership.leave();
    log_end(&end, &membership, state);
    if let SessionEnd::ClientClosed(reason) = end {
        if let Err(error) = session.close(reason).await {
            debug!(error = %error, "close handshake not completed");
        }
    }
}

async fn handle_frame(
    session: &mut Session,
    state: ConnectionState,
    frame: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionEnd> {
    let Some(frame) = frame else {
        return Err(SessionEnd::StreamClosed);
    };
    let message = frame.map_err(SessionEnd::Protocol)?;
    if !state.accepts_frames() {
        return Ok(());
    }
    match message {
        Message::Text(text) => {
            if is_ping(&text) {
                send_json(session, &PongFrame::default())
                    .await
                    .map_err(SessionEnd::Network)?;
            }
            Ok(())
        }
        Message::Ping(payload) => session.pong(&payload).await.map_err(SessionEnd::Network),
        Message::Close(reason) => Err(SessionEnd::ClientClosed(reason)),
        Message::Binary(_) | Message::Continuation(_) | Message::Pong(_) | Message::Nop => Ok(()),
    }
}

async fn deliver(session: &mut Session, event: &GadgetEvent) -> Result<(), Closed> {
    send_json(session, &GadgetEventFrame::from(event)).await
}

async fn send_json<T: serde::Serialize>(session: &mut Session, payload: &T) -> Result<(), Closed> {
    match serde_json::to_string(payload) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            warn!(error = %error, "failed to serialise WebSocket frame");
            Ok(())
        }
    }
}

fn log_end(end: &SessionEnd, membership: &GroupMembership, state: ConnectionState) {
    let group = membership.group();
    match end {
        SessionEnd::ClientClosed(_) | SessionEnd::StreamClosed => {
            info!(%group, ?state, "WebSocket disconnected");
        }
        SessionEnd::Protocol(error) => {
            warn!(%group, error = %error, "WebSocket protocol error");
        }
        SessionEnd::Network(error) => {
            warn!(%group, error = %error, "WebSocket send failed; leaving group");
        }
        SessionEnd::Unsubscribed => {
            debug!(%group, "registry dropped the connection handle");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
