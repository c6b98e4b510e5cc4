//! Loading the content bank from TOML.
//!
//! Expected schema: four arrays of tables, each entry carrying a `level`
//! (one of Beginner/Intermediate/Advanced) plus variant fields:
//!
//! ```toml
//! [[grammar]]
//! level = "Beginner"
//! prompt = "..."
//! answer = "B"
//!
//! [[vocabulary]]
//! level = "Intermediate"
//! word = "..."
//! meaning = "..."
//! example = "..."
//!
//! [[puzzles]]
//! level = "Beginner"
//! prompt = "..."
//! answer = "..."
//!
//! [[lessons]]
//! level = "Advanced"
//! text = "..."
//! ```
//!
//! Loading is all-or-nothing: if CONTENT_CONFIG_PATH is set, any read or
//! parse error aborts startup. If it is unset, the built-in seed bank applies.

use serde::Deserialize;
use tracing::info;

use crate::domain::{GrammarItem, LessonItem, PuzzleItem, VocabularyItem};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ContentConfig {
  #[serde(default)]
  pub grammar: Vec<GrammarItem>,
  #[serde(default)]
  pub vocabulary: Vec<VocabularyItem>,
  #[serde(default)]
  pub puzzles: Vec<PuzzleItem>,
  #[serde(default)]
  pub lessons: Vec<LessonItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read content config {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse content config {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },
}

/// Load `ContentConfig` from CONTENT_CONFIG_PATH.
/// `Ok(None)` means the variable is unset and the seed bank should be used.
pub fn load_content_config_from_env() -> Result<Option<ContentConfig>, ConfigError> {
  let Ok(path) = std::env::var("CONTENT_CONFIG_PATH") else {
    return Ok(None);
  };
  let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
    path: path.clone(),
    source,
  })?;
  let cfg = toml::from_str::<ContentConfig>(&raw).map_err(|source| ConfigError::Parse {
    path: path.clone(),
    source,
  })?;
  info!(target: "tutor_backend", %path, grammar = cfg.grammar.len(), vocabulary = cfg.vocabulary.len(), puzzles = cfg.puzzles.len(), lessons = cfg.lessons.len(), "Loaded content config (TOML)");
  Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Level;

  #[test]
  fn parses_full_bank() {
    let raw = r#"
      [[grammar]]
      level = "Beginner"
      prompt = "She ___ early."
      answer = "B"

      [[vocabulary]]
      level = "Intermediate"
      word = "reluctant"
      meaning = "unwilling"
      example = "He was reluctant."

      [[puzzles]]
      level = "Beginner"
      prompt = "Unscramble: T A C"
      answer = "cat"

      [[lessons]]
      level = "Advanced"
      text = "Inversion adds emphasis."
    "#;
    let cfg: ContentConfig = toml::from_str(raw).unwrap();
    assert_eq!(cfg.grammar.len(), 1);
    assert_eq!(cfg.grammar[0].level, Level::Beginner);
    assert_eq!(cfg.vocabulary[0].word, "reluctant");
    assert_eq!(cfg.puzzles[0].answer, "cat");
    assert_eq!(cfg.lessons[0].level, Level::Advanced);
  }

  #[test]
  fn missing_categories_default_to_empty() {
    let cfg: ContentConfig = toml::from_str("").unwrap();
    assert!(cfg.grammar.is_empty());
    assert!(cfg.lessons.is_empty());
  }
}
