//! Immutable content catalog and the level-based selection policy.
//!
//! Selection filters a collection to the requested level and picks uniformly
//! at random. If nothing in the collection carries that level, it falls back
//! to the whole collection: availability beats strict level matching. An
//! empty collection is rejected at construction, not at selection time.

use rand::seq::SliceRandom;

use crate::config::ContentConfig;
use crate::domain::{GrammarItem, Level, Leveled, LessonItem, PuzzleItem, VocabularyItem};
use crate::error::TutorError;
use crate::seeds;

/// Uniform random pick among items tagged with `level`, falling back to the
/// entire collection when the filter comes up empty. `None` only for an
/// empty collection, which catalog construction rules out.
pub fn select_for_level<'a, T: Leveled>(items: &'a [T], level: Level) -> Option<&'a T> {
  let mut rng = rand::thread_rng();
  let filtered: Vec<&T> = items.iter().filter(|i| i.level() == level).collect();
  if filtered.is_empty() {
    items.choose(&mut rng)
  } else {
    filtered.choose(&mut rng).copied()
  }
}

/// The four content collections, loaded once at startup and never mutated.
#[derive(Clone, Debug)]
pub struct ContentCatalog {
  grammar: Vec<GrammarItem>,
  vocabulary: Vec<VocabularyItem>,
  puzzles: Vec<PuzzleItem>,
  lessons: Vec<LessonItem>,
}

impl ContentCatalog {
  /// Build from an external content bank. Every category must be non-empty.
  pub fn new(cfg: ContentConfig) -> Result<Self, TutorError> {
    if cfg.grammar.is_empty() {
      return Err(TutorError::EmptyCatalog { category: "grammar" });
    }
    if cfg.vocabulary.is_empty() {
      return Err(TutorError::EmptyCatalog { category: "vocabulary" });
    }
    if cfg.puzzles.is_empty() {
      return Err(TutorError::EmptyCatalog { category: "puzzles" });
    }
    if cfg.lessons.is_empty() {
      return Err(TutorError::EmptyCatalog { category: "lessons" });
    }
    Ok(Self {
      grammar: cfg.grammar,
      vocabulary: cfg.vocabulary,
      puzzles: cfg.puzzles,
      lessons: cfg.lessons,
    })
  }

  /// Built-in seed bank; complete by construction.
  pub fn from_seeds() -> Self {
    Self {
      grammar: seeds::seed_grammar(),
      vocabulary: seeds::seed_vocabulary(),
      puzzles: seeds::seed_puzzles(),
      lessons: seeds::seed_lessons(),
    }
  }

  pub fn grammar_for(&self, level: Level) -> Option<&GrammarItem> {
    select_for_level(&self.grammar, level)
  }
  pub fn vocabulary_for(&self, level: Level) -> Option<&VocabularyItem> {
    select_for_level(&self.vocabulary, level)
  }
  pub fn puzzle_for(&self, level: Level) -> Option<&PuzzleItem> {
    select_for_level(&self.puzzles, level)
  }
  pub fn lesson_for(&self, level: Level) -> Option<&LessonItem> {
    select_for_level(&self.lessons, level)
  }

  /// Per-category sizes, for the startup inventory log.
  pub fn inventory(&self) -> (usize, usize, usize, usize) {
    (
      self.grammar.len(),
      self.vocabulary.len(),
      self.puzzles.len(),
      self.lessons.len(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lesson(level: Level, text: &str) -> LessonItem {
    LessonItem { level, text: text.into() }
  }

  #[test]
  fn picks_only_from_matching_level() {
    let items = vec![
      lesson(Level::Beginner, "b"),
      lesson(Level::Advanced, "a1"),
      lesson(Level::Advanced, "a2"),
    ];
    for _ in 0..50 {
      let chosen = select_for_level(&items, Level::Advanced).unwrap();
      assert_eq!(chosen.level, Level::Advanced);
    }
  }

  #[test]
  fn falls_back_to_whole_collection_when_level_missing() {
    let items = vec![lesson(Level::Beginner, "only")];
    let chosen = select_for_level(&items, Level::Advanced).unwrap();
    assert_eq!(chosen.text, "only");
  }

  #[test]
  fn empty_collection_yields_none() {
    let items: Vec<LessonItem> = vec![];
    assert!(select_for_level(&items, Level::Beginner).is_none());
  }

  #[test]
  fn rejects_config_with_empty_category() {
    let cfg = ContentConfig {
      grammar: vec![],
      vocabulary: crate::seeds::seed_vocabulary(),
      puzzles: crate::seeds::seed_puzzles(),
      lessons: crate::seeds::seed_lessons(),
    };
    match ContentCatalog::new(cfg) {
      Err(TutorError::EmptyCatalog { category }) => assert_eq!(category, "grammar"),
      other => panic!("expected EmptyCatalog, got {:?}", other.map(|_| ())),
    }
  }

  #[test]
  fn seed_bank_covers_every_level_per_category() {
    let cat = ContentCatalog::from_seeds();
    for level in [Level::Beginner, Level::Intermediate, Level::Advanced] {
      assert!(cat.grammar_for(level).is_some());
      assert!(cat.vocabulary_for(level).is_some());
      assert!(cat.puzzle_for(level).is_some());
      assert!(cat.lesson_for(level).is_some());
    }
  }
}
