//! WebSocket connection handlers.
//!
//! Each socket gets two tasks: a reader that parses client events and
//! dispatches them to the use cases, and a pusher that drains the
//! connection's outbound queue. When the reader ends the pusher is aborted;
//! when the pusher ends the reader finishes its current event and stops. The
//! disconnect use case runs once both have stopped.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{Stream, StreamExt},
};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{
        ConnectionId, FileName, FilePayload, Identity, MessageBody, OutboundEvent, RoomName,
        ValueObjectError,
    },
    infrastructure::dto::websocket::{
        ClientEvent, JoinRoomPayload, SendMessagePayload, UploadFilePayload,
    },
    ui::state::AppState,
    usecase::{
        JoinRoomError, LeaveRoomError, SendMessageCommand, SendMessageError, UploadFileCommand,
        UploadFileError,
    },
};

/// Why a single client event was refused; the `Display` text is what the
/// client receives in `error_msg`.
#[derive(Debug, Error)]
enum RequestError {
    #[error("Malformed event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValueObjectError),

    #[error(transparent)]
    Join(#[from] JoinRoomError),

    #[error(transparent)]
    Leave(#[from] LeaveRoomError),

    #[error(transparent)]
    Send(#[from] SendMessageError),

    #[error(transparent)]
    Upload(#[from] UploadFileError),
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.max_message_size(state.max_frame_bytes)
        .max_frame_size(state.max_frame_bytes)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound queue into the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let connection_id = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Connection '{}' accepted", connection_id);

    let (sender, receiver) = socket.split();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let mut recv_task = tokio::spawn(reader_loop(
        state.clone(),
        connection_id,
        receiver,
        stop_rx,
    ));
    let mut send_task = pusher_loop(rx, sender);

    // The pusher can be aborted at any point; the reader is only asked to
    // stop, so an event it already started dispatching runs to completion.
    let reader_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    if reader_finished {
        send_task.abort();
        let _ = send_task.await;
    } else {
        let _ = stop_tx.send(());
        let _ = recv_task.await;
    }

    match state
        .disconnect_client_usecase
        .execute(&connection_id)
        .await
    {
        Some(departure) => tracing::info!(
            "Connection '{}' closed; '{}' removed from '{}'",
            connection_id,
            departure.identity,
            departure.room
        ),
        None => tracing::info!("Connection '{}' closed", connection_id),
    }
}

/// Read frames until the peer goes away or `stop` fires.
///
/// `stop` is only observed between frames.
async fn reader_loop<S>(
    state: Arc<AppState>,
    connection_id: ConnectionId,
    mut frames: S,
    mut stop: oneshot::Receiver<()>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let frame = tokio::select! {
            biased;
            _ = &mut stop => {
                tracing::debug!("Reader for '{}' stopped", connection_id);
                break;
            }
            frame = frames.next() => frame,
        };

        let msg = match frame {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                if let Err(e) = dispatch(&state, connection_id, text.as_str()).await {
                    tracing::info!("Rejected event from '{}': {}", connection_id, e);
                    let reply = OutboundEvent::Error(e.to_string());
                    if let Err(e) = state.router.to_connection(&connection_id, &reply).await {
                        tracing::warn!("Failed to send error_msg to '{}': {}", connection_id, e);
                    }
                }
            }
            Message::Binary(_) => {
                tracing::debug!("Ignoring binary frame from '{}'", connection_id);
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            _ => {}
        }
    }
}

/// Parse one text frame and run the matching use case.
async fn dispatch(
    state: &AppState,
    connection_id: ConnectionId,
    text: &str,
) -> Result<(), RequestError> {
    let event: ClientEvent = serde_json::from_str(text)?;
    tracing::debug!("'{}' sent {}", connection_id, event.name());

    match event {
        ClientEvent::GetRooms => {
            state.get_rooms_usecase.execute(&connection_id).await;
        }
        ClientEvent::JoinRoom(JoinRoomPayload { room, identity }) => {
            // Domain Model への変換
            let room = RoomName::new(room)?;
            let identity = Identity::new(identity)?;
            state
                .join_room_usecase
                .execute(connection_id, room, identity)
                .await?;
        }
        ClientEvent::LeaveRoom => {
            state.leave_room_usecase.execute(&connection_id).await?;
        }
        ClientEvent::SendMessage(SendMessagePayload {
            room,
            author,
            message,
            time: _,
        }) => {
            let command = SendMessageCommand {
                room: RoomName::new(room)?,
                author: claimed_author(author)?,
                body: MessageBody::new(message)?,
            };
            state
                .send_message_usecase
                .execute(connection_id, command)
                .await?;
        }
        ClientEvent::UploadFile(UploadFilePayload {
            room,
            author,
            file_name,
            file_data,
            time: _,
        }) => {
            let command = UploadFileCommand {
                room: RoomName::new(room)?,
                author: claimed_author(author)?,
                file_name: FileName::new(file_name)?,
                payload: FilePayload::new(file_data)?,
            };
            state
                .upload_file_usecase
                .execute(connection_id, command)
                .await?;
        }
    }

    Ok(())
}

/// A blank author counts as no claim at all.
fn claimed_author(author: Option<String>) -> Result<Option<Identity>, ValueObjectError> {
    author
        .filter(|author| !author.trim().is_empty())
        .map(Identity::new)
        .transpose()
}
