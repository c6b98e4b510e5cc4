//! Domain models used by the backend: proficiency levels, content items,
//! user profiles, answer keys, and evaluation results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Proficiency level attached to content and derived for users.
/// A profile's level is always `level_for(score)`; it is never set directly.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Level {
  Beginner,
  Intermediate,
  Advanced,
}
impl Default for Level {
  fn default() -> Self { Level::Beginner }
}
impl std::fmt::Display for Level {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Level::Beginner => write!(f, "Beginner"),
      Level::Intermediate => write!(f, "Intermediate"),
      Level::Advanced => write!(f, "Advanced"),
    }
  }
}

/// Step function mapping a score to its level.
pub fn level_for(score: u32) -> Level {
  if score < 10 {
    Level::Beginner
  } else if score < 25 {
    Level::Intermediate
  } else {
    Level::Advanced
  }
}

/// Anything in the catalog carries a level tag.
pub trait Leveled {
  fn level(&self) -> Level;
}

/// A grammar exercise: prompt shown to the user, answer kept server-side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrammarItem {
  pub level: Level,
  pub prompt: String,
  pub answer: String,
}

/// A vocabulary entry. Presented in full; never scored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabularyItem {
  pub level: Level,
  pub word: String,
  pub meaning: String,
  pub example: String,
}

/// A puzzle: prompt shown to the user, answer kept server-side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleItem {
  pub level: Level,
  pub prompt: String,
  pub answer: String,
}

/// A mini lesson. Presented in full; never scored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonItem {
  pub level: Level,
  pub text: String,
}

impl Leveled for GrammarItem    { fn level(&self) -> Level { self.level } }
impl Leveled for VocabularyItem { fn level(&self) -> Level { self.level } }
impl Leveled for PuzzleItem     { fn level(&self) -> Level { self.level } }
impl Leveled for LessonItem     { fn level(&self) -> Level { self.level } }

/// One row per user. `level` is kept in sync with `score` by the store;
/// `last_active` is the calendar date of the last streak-qualifying activity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: String,
  #[serde(default)]
  pub display_name: Option<String>,
  pub level: Level,
  pub score: u32,
  pub streak: u32,
  #[serde(default)]
  pub last_active: Option<NaiveDate>,
}

impl UserProfile {
  /// Defaults for a first interaction: Beginner, nothing earned yet.
  pub fn new(id: impl Into<String>, display_name: Option<String>) -> Self {
    Self {
      id: id.into(),
      display_name,
      level: Level::Beginner,
      score: 0,
      streak: 0,
      last_active: None,
    }
  }
}

/// Expected answers for one issued daily bundle. Ephemeral: held per user
/// until the next reply, overwritten if a new bundle is issued first.
#[derive(Clone, Debug)]
pub struct AnswerKey {
  pub bundle_id: String,
  pub grammar: String,
  pub puzzle: String,
}

/// Outcome of scoring one reply, for display back to the user.
#[derive(Clone, Debug)]
pub struct Evaluation {
  pub gained: u32,
  pub score: u32,
  pub level: Level,
  pub streak: u32,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn level_for_step_points() {
    assert_eq!(level_for(0), Level::Beginner);
    assert_eq!(level_for(9), Level::Beginner);
    assert_eq!(level_for(10), Level::Intermediate);
    assert_eq!(level_for(24), Level::Intermediate);
    assert_eq!(level_for(25), Level::Advanced);
    assert_eq!(level_for(1000), Level::Advanced);
  }

  #[test]
  fn level_for_is_monotonic() {
    fn rank(l: Level) -> u8 {
      match l {
        Level::Beginner => 0,
        Level::Intermediate => 1,
        Level::Advanced => 2,
      }
    }
    let mut prev = rank(level_for(0));
    for score in 1..100 {
      let cur = rank(level_for(score));
      assert!(cur >= prev, "level must not decrease at score {}", score);
      prev = cur;
    }
  }
}
