//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, PlayerName, RoomId},
    infrastructure::dto::websocket::{ClientMessage, GuessPayload, JoinPayload},
    ui::state::AppState,
    usecase::CoordinatorHandle,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the channel closes (the connection was unregistered) or the socket fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state.coordinator.connect(connection_id.clone(), tx);
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();

    let coordinator = state.coordinator.clone();
    let reader_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", reader_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => handle_frame(&coordinator, &reader_id, text.as_str()).await,
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", reader_id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.coordinator.disconnect(connection_id.clone());
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Parse one inbound frame and forward it to the coordinator.
/// Malformed frames and invalid values are logged and dropped.
async fn handle_frame(coordinator: &CoordinatorHandle, connection_id: &ConnectionId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Ignoring malformed frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match message {
        ClientMessage::Join(JoinPayload { name, avatar }) => {
            let name = match PlayerName::try_from(name) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!("Ignoring join with blank name from '{}': {}", connection_id, e);
                    return;
                }
            };
            if coordinator
                .join(connection_id.clone(), name, avatar)
                .await
                .is_none()
            {
                tracing::warn!("Connection '{}' is already seated", connection_id);
            }
        }
        ClientMessage::StartRound(room_id) => match RoomId::try_from(room_id) {
            Ok(room_id) => coordinator.start_round(connection_id.clone(), room_id),
            Err(e) => tracing::warn!("Invalid room id from '{}': {}", connection_id, e),
        },
        ClientMessage::SendGuess(GuessPayload { room_id, message }) => {
            match RoomId::try_from(room_id) {
                Ok(room_id) => coordinator.guess(connection_id.clone(), room_id, message),
                Err(e) => tracing::warn!("Invalid room id from '{}': {}", connection_id, e),
            }
        }
    }
}
