//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Composing the daily bundle (presentation text + answer key)
//!   - Evaluating two-field replies against the pending key
//!   - Profile field queries (score / level / streak)
//!   - Static welcome/help text and error-to-reply mapping

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::{AnswerKey, Evaluation, Level};
use crate::error::TutorError;
use crate::state::AppState;
use crate::util::split_reply;

pub const REPLY_FORMAT: &str = "<grammar answer> || <puzzle answer>";

pub fn welcome_text() -> String {
  "🎓 Daily Drill activated!\n\
   Commands:\n\
   daily – today's practice bundle\n\
   score – your score\n\
   level – your level\n\
   streak – your streak\n\
   help – this text"
    .into()
}

pub fn help_text() -> String {
  format!(
    "daily – today's practice bundle\n\
     score – your score\n\
     level – your level\n\
     streak – your streak\n\
     Answer the bundle as: {}",
    REPLY_FORMAT
  )
}

/// Compose today's bundle for a user: one item per category at the user's
/// level (an absent profile reads as Beginner). Returns the presentation
/// text plus the answer key; the caller stores the key in the pending slot.
#[instrument(level = "info", skip(state), fields(%user_id))]
pub async fn build_daily_bundle(
  state: &AppState,
  user_id: &str,
) -> Result<(String, AnswerKey), TutorError> {
  let level = state
    .profiles
    .get(user_id)
    .await
    .map(|p| p.level)
    .unwrap_or(Level::Beginner);

  let grammar = state
    .catalog
    .grammar_for(level)
    .ok_or(TutorError::EmptyCatalog { category: "grammar" })?;
  let vocab = state
    .catalog
    .vocabulary_for(level)
    .ok_or(TutorError::EmptyCatalog { category: "vocabulary" })?;
  let puzzle = state
    .catalog
    .puzzle_for(level)
    .ok_or(TutorError::EmptyCatalog { category: "puzzles" })?;
  let lesson = state
    .catalog
    .lesson_for(level)
    .ok_or(TutorError::EmptyCatalog { category: "lessons" })?;

  let text = format!(
    "🌅 Good morning! Here is your daily practice:\n\n\
     📝 Grammar:\n{}\n\n\
     📚 Vocabulary:\nWord: {}\nMeaning: {}\nExample: {}\n\n\
     🧠 Puzzle:\n{}\n\n\
     📖 Mini Lesson:\n{}\n\n\
     ➡ Reply using this format:\n{}",
    grammar.prompt, vocab.word, vocab.meaning, vocab.example, puzzle.prompt, lesson.text,
    REPLY_FORMAT
  );

  let key = AnswerKey {
    bundle_id: Uuid::new_v4().to_string(),
    grammar: grammar.answer.clone(),
    puzzle: puzzle.answer.clone(),
  };
  info!(target: "practice", %user_id, %level, bundle = %key.bundle_id, "Daily bundle composed");
  Ok((text, key))
}

/// The `daily` command: ensure the profile, compose the bundle, store the
/// answer key, hand back the presentation text.
#[instrument(level = "info", skip(state, display_name), fields(%user_id))]
pub async fn handle_daily(
  state: &AppState,
  user_id: &str,
  display_name: Option<String>,
) -> Result<String, TutorError> {
  state.profiles.ensure_profile(user_id, display_name).await?;
  let (text, key) = build_daily_bundle(state, user_id).await?;
  state.set_pending(user_id, key).await;
  Ok(text)
}

/// The `start` command: create-if-absent, static welcome.
#[instrument(level = "info", skip(state, display_name), fields(%user_id))]
pub async fn handle_start(
  state: &AppState,
  user_id: &str,
  display_name: Option<String>,
) -> Result<String, TutorError> {
  state.profiles.ensure_profile(user_id, display_name).await?;
  Ok(welcome_text())
}

/// Score a free-text reply against the user's pending answer key.
///
/// `NoPendingQuiz` and `MalformedReply` leave the profile and the pending
/// slot untouched. A well-formed reply consumes the pending key (read once;
/// a concurrent duplicate gets `NoPendingQuiz`) and is matched
/// field-by-field, case-insensitively after trimming; matching fields add to
/// the score and the level is recomputed. The streak is touched regardless
/// of how many fields matched.
#[instrument(level = "info", skip(state, raw), fields(%user_id, %today, reply_len = raw.len()))]
pub async fn evaluate_answer(
  state: &AppState,
  user_id: &str,
  raw: &str,
  today: NaiveDate,
) -> Result<Evaluation, TutorError> {
  // Parse before consuming: a malformed reply must leave the slot in place,
  // and a missing quiz still takes precedence over a bad format.
  let (grammar_part, puzzle_part) = match split_reply(raw) {
    Some(fields) => fields,
    None if state.pending_for(user_id).await.is_some() => {
      return Err(TutorError::MalformedReply);
    }
    None => return Err(TutorError::NoPendingQuiz),
  };
  // Remove-and-return in one critical section: the key is scored at most once
  // even under concurrent replies from the same user.
  let key = state
    .take_pending(user_id)
    .await
    .ok_or(TutorError::NoPendingQuiz)?;

  let mut gained = 0u32;
  if grammar_part.to_lowercase() == key.grammar.to_lowercase() {
    gained += 1;
  }
  if puzzle_part.to_lowercase() == key.puzzle.to_lowercase() {
    gained += 1;
  }

  if gained > 0 {
    state.profiles.increment_score(user_id, gained).await?;
    state.profiles.recompute_level(user_id).await?;
  }
  let streak = state.profiles.touch_streak(user_id, today).await?;

  let profile = state
    .profiles
    .get(user_id)
    .await
    .ok_or(TutorError::NotRegistered)?;
  debug!(target: "practice", %user_id, bundle = %key.bundle_id, gained, score = profile.score, "Reply evaluated");
  Ok(Evaluation {
    gained,
    score: profile.score,
    level: profile.level,
    streak,
  })
}

pub fn evaluation_text(ev: &Evaluation) -> String {
  format!(
    "✅ Correct: {}\n🏆 Score: {}\n🎯 Level: {}\n🔥 Streak: {} days",
    ev.gained, ev.score, ev.level, ev.streak
  )
}

/// `score` / `level` / `streak` queries share the same lookup.
pub async fn profile_for(state: &AppState, user_id: &str) -> Result<crate::domain::UserProfile, TutorError> {
  state
    .profiles
    .get(user_id)
    .await
    .ok_or(TutorError::NotRegistered)
}

/// Map an error to the textual reply for the chat transport. The three
/// expected conditions get corrective prompts; everything else is a generic
/// failure (details stay in the server log).
pub fn error_text(e: &TutorError) -> String {
  match e {
    TutorError::NotRegistered => "You're not registered yet. Send `start` first.".into(),
    TutorError::NoPendingQuiz => "No quiz found. Send `daily` to get today's bundle.".into(),
    TutorError::MalformedReply => format!("Wrong format. Use: {}", REPLY_FORMAT),
    TutorError::EmptyCatalog { .. } | TutorError::Storage(_) => {
      "Something went wrong on our side. Please try again.".into()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::ContentCatalog;
  use crate::store::ProfileStore;

  fn test_state() -> AppState {
    AppState::with_parts(ContentCatalog::from_seeds(), ProfileStore::in_memory())
  }

  fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
  }

  fn key(grammar: &str, puzzle: &str) -> AnswerKey {
    AnswerKey {
      bundle_id: "b1".into(),
      grammar: grammar.into(),
      puzzle: puzzle.into(),
    }
  }

  #[tokio::test]
  async fn matching_is_case_insensitive_and_trimmed() {
    let state = test_state();
    state.profiles.ensure_profile("u1", None).await.unwrap();
    state.set_pending("u1", key("B", "Answer1")).await;

    let ev = evaluate_answer(&state, "u1", "  b ||   answer1  ", day("2024-03-10"))
      .await
      .unwrap();
    assert_eq!(ev.gained, 2);
    assert_eq!(ev.score, 2);
    assert_eq!(ev.streak, 1);
    assert!(state.pending_for("u1").await.is_none());
  }

  #[tokio::test]
  async fn partial_credit_for_one_matching_field() {
    let state = test_state();
    state.profiles.ensure_profile("u1", None).await.unwrap();
    state.set_pending("u1", key("B", "echo")).await;

    let ev = evaluate_answer(&state, "u1", "B || wrong", day("2024-03-10"))
      .await
      .unwrap();
    assert_eq!(ev.gained, 1);
    assert_eq!(ev.score, 1);
  }

  #[tokio::test]
  async fn wrong_answers_still_touch_the_streak() {
    let state = test_state();
    state.profiles.ensure_profile("u1", None).await.unwrap();
    state.set_pending("u1", key("B", "echo")).await;

    let ev = evaluate_answer(&state, "u1", "x || y", day("2024-03-10"))
      .await
      .unwrap();
    assert_eq!(ev.gained, 0);
    assert_eq!(ev.score, 0);
    assert_eq!(ev.streak, 1);
    assert!(state.pending_for("u1").await.is_none());
  }

  #[tokio::test]
  async fn malformed_reply_changes_nothing() {
    let state = test_state();
    state.profiles.ensure_profile("u1", None).await.unwrap();
    state.set_pending("u1", key("B", "echo")).await;

    let err = evaluate_answer(&state, "u1", "no separator here", day("2024-03-10"))
      .await
      .unwrap_err();
    assert!(matches!(err, TutorError::MalformedReply));

    let p = state.profiles.get("u1").await.unwrap();
    assert_eq!(p.score, 0);
    assert_eq!(p.streak, 0);
    assert!(p.last_active.is_none());
    assert!(state.pending_for("u1").await.is_some());
  }

  #[tokio::test]
  async fn reply_without_pending_quiz_does_not_touch_profile() {
    let state = test_state();
    state.profiles.ensure_profile("u1", None).await.unwrap();

    let err = evaluate_answer(&state, "u1", "B || echo", day("2024-03-10"))
      .await
      .unwrap_err();
    assert!(matches!(err, TutorError::NoPendingQuiz));

    let p = state.profiles.get("u1").await.unwrap();
    assert_eq!(p.score, 0);
    assert!(p.last_active.is_none());
  }

  #[tokio::test]
  async fn missing_quiz_takes_precedence_over_bad_format() {
    let state = test_state();
    state.profiles.ensure_profile("u1", None).await.unwrap();

    let err = evaluate_answer(&state, "u1", "no separator here", day("2024-03-10"))
      .await
      .unwrap_err();
    assert!(matches!(err, TutorError::NoPendingQuiz));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_replies_score_one_bundle_once() {
    for _ in 0..200 {
      let state = test_state();
      state.profiles.ensure_profile("u1", None).await.unwrap();
      state.set_pending("u1", key("B", "echo")).await;

      let s1 = state.clone();
      let h1 = tokio::spawn(async move {
        evaluate_answer(&s1, "u1", "B || echo", day("2024-03-10")).await
      });
      let s2 = state.clone();
      let h2 = tokio::spawn(async move {
        evaluate_answer(&s2, "u1", "B || echo", day("2024-03-10")).await
      });
      let (r1, r2) = (h1.await.unwrap(), h2.await.unwrap());

      // Exactly one reply consumes the key; the other finds no quiz.
      let oks = [&r1, &r2].iter().filter(|r| r.is_ok()).count();
      assert_eq!(oks, 1, "one bundle must be scored exactly once: {:?} {:?}", r1, r2);
      for r in [&r1, &r2] {
        if r.is_err() {
          assert!(matches!(r, Err(TutorError::NoPendingQuiz)));
        }
      }
      let p = state.profiles.get("u1").await.unwrap();
      assert_eq!(p.score, 2);
      assert_eq!(p.streak, 1);
      assert!(state.pending_for("u1").await.is_none());
    }
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn concurrent_users_stay_isolated() {
    let state = test_state();
    let mut handles = Vec::new();
    for uid in ["a", "b"] {
      let s = state.clone();
      handles.push(tokio::spawn(async move {
        for _ in 0..20 {
          handle_daily(&s, uid, None).await.unwrap();
          let k = s.pending_for(uid).await.unwrap();
          let reply = format!("{} || {}", k.grammar, k.puzzle);
          evaluate_answer(&s, uid, &reply, day("2024-03-10")).await.unwrap();
        }
      }));
    }
    for h in handles {
      h.await.unwrap();
    }
    for uid in ["a", "b"] {
      let p = state.profiles.get(uid).await.unwrap();
      assert_eq!(p.score, 40);
      assert_eq!(p.level, Level::Advanced);
      assert_eq!(p.streak, 1);
      assert!(state.pending_for(uid).await.is_none());
    }
  }

  #[tokio::test]
  async fn daily_then_reply_end_to_end() {
    let state = test_state();
    let today = day("2024-03-10");

    // New user: profile created, bundle issued at Beginner level.
    let text = handle_daily(&state, "u1", Some("Ada".into())).await.unwrap();
    assert!(text.contains("Grammar"));
    assert!(text.contains(REPLY_FORMAT));
    let p = state.profiles.get("u1").await.unwrap();
    assert_eq!(p.level, Level::Beginner);

    // Answer both fields correctly, straight from the pending key.
    let k = state.pending_for("u1").await.unwrap();
    let reply = format!("{} || {}", k.grammar, k.puzzle);
    let ev = evaluate_answer(&state, "u1", &reply, today).await.unwrap();
    assert_eq!(ev.gained, 2);
    assert_eq!(ev.score, 2);
    assert_eq!(ev.level, crate::domain::level_for(2));
    assert_eq!(ev.streak, 1);
    assert!(state.pending_for("u1").await.is_none());

    // Second round on the same calendar day: score grows, streak stays 1.
    handle_daily(&state, "u1", None).await.unwrap();
    let k = state.pending_for("u1").await.unwrap();
    let reply = format!("{} || {}", k.grammar, k.puzzle);
    let ev = evaluate_answer(&state, "u1", &reply, today).await.unwrap();
    assert_eq!(ev.score, 4);
    assert_eq!(ev.streak, 1);
  }

  #[tokio::test]
  async fn reissued_daily_overwrites_pending_key() {
    let state = test_state();
    state.profiles.ensure_profile("u1", None).await.unwrap();
    state.set_pending("u1", key("old", "old")).await;

    handle_daily(&state, "u1", None).await.unwrap();
    let k = state.pending_for("u1").await.unwrap();
    assert_ne!(k.bundle_id, "b1");
  }

  #[tokio::test]
  async fn pending_keys_are_per_user() {
    let state = test_state();
    state.profiles.ensure_profile("a", None).await.unwrap();
    state.profiles.ensure_profile("b", None).await.unwrap();
    state.set_pending("a", key("B", "echo")).await;
    state.set_pending("b", key("C", "cat")).await;

    evaluate_answer(&state, "a", "B || echo", day("2024-03-10"))
      .await
      .unwrap();

    // b's slot and profile are untouched by a's reply.
    let kb = state.pending_for("b").await.unwrap();
    assert_eq!(kb.grammar, "C");
    let pb = state.profiles.get("b").await.unwrap();
    assert_eq!(pb.score, 0);
  }
}
