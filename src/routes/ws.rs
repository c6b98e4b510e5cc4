//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use chrono::Local;
use tracing::{debug, error, info, instrument};

use crate::error::TutorError;
use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "tutor_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "tutor_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target = "tutor_backend", "WS received: {}", trunc_for_log(&txt, 256));
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "tutor_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "tutor_backend", "WebSocket disconnected");
}

fn error_message(e: TutorError) -> ServerWsMessage {
  match &e {
    TutorError::NotRegistered | TutorError::NoPendingQuiz | TutorError::MalformedReply => {}
    other => error!(target: "tutor_backend", error = %other, "Interaction failed"),
  }
  ServerWsMessage::Error { message: error_text(&e) }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Start { user_id, display_name } => {
      match handle_start(state, &user_id, display_name).await {
        Ok(text) => ServerWsMessage::Info { text },
        Err(e) => error_message(e),
      }
    }

    ClientWsMessage::Help => ServerWsMessage::Info { text: help_text() },

    ClientWsMessage::Daily { user_id, display_name } => {
      match handle_daily(state, &user_id, display_name).await {
        Ok(text) => {
          tracing::info!(target: "practice", %user_id, "WS daily bundle served");
          ServerWsMessage::Bundle { text }
        }
        Err(e) => error_message(e),
      }
    }

    ClientWsMessage::Score { user_id } => match profile_for(state, &user_id).await {
      Ok(p) => ServerWsMessage::Score { score: p.score },
      Err(e) => error_message(e),
    },

    ClientWsMessage::Level { user_id } => match profile_for(state, &user_id).await {
      Ok(p) => ServerWsMessage::Level { level: p.level },
      Err(e) => error_message(e),
    },

    ClientWsMessage::Streak { user_id } => match profile_for(state, &user_id).await {
      Ok(p) => ServerWsMessage::Streak { streak: p.streak },
      Err(e) => error_message(e),
    },

    ClientWsMessage::Reply { user_id, text } => {
      let today = Local::now().date_naive();
      match evaluate_answer(state, &user_id, &text, today).await {
        Ok(ev) => {
          tracing::info!(target: "practice", %user_id, gained = ev.gained, "WS reply evaluated");
          let text = evaluation_text(&ev);
          ServerWsMessage::AnswerResult {
            gained: ev.gained,
            score: ev.score,
            level: ev.level,
            streak: ev.streak,
            text,
          }
        }
        Err(e) => error_message(e),
      }
    }
  }
}
