//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Expected, user-correctable conditions come back as 200 + corrective text
//! (chat semantics); storage failures become a generic 500 and are logged.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, response::{IntoResponse, Response}, Json};
use chrono::Local;
use tracing::{error, info, instrument};

use crate::error::TutorError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

fn error_response(e: TutorError) -> Response {
  let status = match &e {
    TutorError::NotRegistered | TutorError::NoPendingQuiz | TutorError::MalformedReply => {
      StatusCode::OK
    }
    _ => {
      error!(target: "tutor_backend", error = %e, "Interaction failed");
      StatusCode::INTERNAL_SERVER_ERROR
    }
  };
  (status, Json(TextOut { text: error_text(&e) })).into_response()
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(%body.user_id))]
pub async fn http_post_start(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Response {
  match handle_start(&state, &body.user_id, body.display_name).await {
    Ok(text) => Json(TextOut { text }).into_response(),
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info")]
pub async fn http_get_help() -> impl IntoResponse {
  Json(TextOut { text: help_text() })
}

#[instrument(level = "info", skip(state, body), fields(%body.user_id))]
pub async fn http_post_daily(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DailyIn>,
) -> Response {
  match handle_daily(&state, &body.user_id, body.display_name).await {
    Ok(text) => {
      info!(target: "practice", user_id = %body.user_id, "HTTP daily bundle served");
      Json(TextOut { text }).into_response()
    }
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.user_id, text_len = body.text.len()))]
pub async fn http_post_reply(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ReplyIn>,
) -> Response {
  let today = Local::now().date_naive();
  match evaluate_answer(&state, &body.user_id, &body.text, today).await {
    Ok(ev) => {
      info!(target: "practice", user_id = %body.user_id, gained = ev.gained, "HTTP reply evaluated");
      let text = evaluation_text(&ev);
      Json(ReplyOut { gained: ev.gained, score: ev.score, level: ev.level, streak: ev.streak, text })
        .into_response()
    }
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info", skip(state), fields(%q.user_id))]
pub async fn http_get_score(
  State(state): State<Arc<AppState>>,
  Query(q): Query<UserQuery>,
) -> Response {
  match profile_for(&state, &q.user_id).await {
    Ok(p) => Json(ScoreOut { score: p.score }).into_response(),
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info", skip(state), fields(%q.user_id))]
pub async fn http_get_level(
  State(state): State<Arc<AppState>>,
  Query(q): Query<UserQuery>,
) -> Response {
  match profile_for(&state, &q.user_id).await {
    Ok(p) => Json(LevelOut { level: p.level }).into_response(),
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info", skip(state), fields(%q.user_id))]
pub async fn http_get_streak(
  State(state): State<Arc<AppState>>,
  Query(q): Query<UserQuery>,
) -> Response {
  match profile_for(&state, &q.user_id).await {
    Ok(p) => Json(StreakOut { streak: p.streak }).into_response(),
    Err(e) => error_response(e),
  }
}
