//! Built-in content bank. Guarantees the app is useful even without an
//! external content file, with every category covered at every level.

use crate::domain::{GrammarItem, Level, LessonItem, PuzzleItem, VocabularyItem};

pub fn seed_grammar() -> Vec<GrammarItem> {
  vec![
    GrammarItem {
      level: Level::Beginner,
      prompt: "Choose the correct option:\nShe ___ to school every day.\nA) go  B) goes  C) going".into(),
      answer: "B".into(),
    },
    GrammarItem {
      level: Level::Beginner,
      prompt: "Choose the correct option:\nThey ___ happy yesterday.\nA) are  B) was  C) were".into(),
      answer: "C".into(),
    },
    GrammarItem {
      level: Level::Intermediate,
      prompt: "Choose the correct option:\nIf I ___ more time, I would travel.\nA) had  B) have  C) has".into(),
      answer: "A".into(),
    },
    GrammarItem {
      level: Level::Intermediate,
      prompt: "Choose the correct option:\nThe report ___ by the team last week.\nA) wrote  B) was written  C) is writing".into(),
      answer: "B".into(),
    },
    GrammarItem {
      level: Level::Advanced,
      prompt: "Choose the correct option:\nHardly ___ the station when the train left.\nA) I had reached  B) had I reached  C) I reached".into(),
      answer: "B".into(),
    },
  ]
}

pub fn seed_vocabulary() -> Vec<VocabularyItem> {
  vec![
    VocabularyItem {
      level: Level::Beginner,
      word: "curious".into(),
      meaning: "eager to know or learn something".into(),
      example: "The curious child asked many questions.".into(),
    },
    VocabularyItem {
      level: Level::Intermediate,
      word: "reluctant".into(),
      meaning: "unwilling and hesitant".into(),
      example: "He was reluctant to admit his mistake.".into(),
    },
    VocabularyItem {
      level: Level::Advanced,
      word: "ubiquitous".into(),
      meaning: "present or found everywhere".into(),
      example: "Smartphones have become ubiquitous in modern life.".into(),
    },
  ]
}

pub fn seed_puzzles() -> Vec<PuzzleItem> {
  vec![
    PuzzleItem {
      level: Level::Beginner,
      prompt: "Unscramble the word: T A C".into(),
      answer: "cat".into(),
    },
    PuzzleItem {
      level: Level::Intermediate,
      prompt: "I speak without a mouth and hear without ears. What am I?".into(),
      answer: "echo".into(),
    },
    PuzzleItem {
      level: Level::Advanced,
      prompt: "What 7-letter word becomes longer when the third letter is removed?".into(),
      answer: "lounger".into(),
    },
  ]
}

pub fn seed_lessons() -> Vec<LessonItem> {
  vec![
    LessonItem {
      level: Level::Beginner,
      text: "Use 'a' before consonant sounds and 'an' before vowel sounds: a dog, an apple, an hour.".into(),
    },
    LessonItem {
      level: Level::Intermediate,
      text: "The present perfect ('I have seen') links the past to now; the simple past ('I saw') stays in the past. Time markers like 'yesterday' take the simple past.".into(),
    },
    LessonItem {
      level: Level::Advanced,
      text: "Inversion adds emphasis in formal writing: 'Never have I seen such a view.' The auxiliary moves before the subject after negative adverbials like 'never', 'rarely', 'hardly'.".into(),
    },
  ]
}
