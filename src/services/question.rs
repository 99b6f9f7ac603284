use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::SrsConfig;
use crate::db::Database;
use crate::model::{CefrLevel, TranslationDirection, Word};
use crate::services::catalog;
use crate::services::distractors::{self, DISTRACTOR_COUNT};
use crate::services::selection;

/// One answer button: the candidate word's id plus the text shown to
/// the learner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub word_id: i64,
    pub label: String,
}

/// A complete quiz question. Transient; the session driver records the
/// learner's choice via the progress and session services.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub word: Word,
    pub options: Vec<AnswerOption>,
    pub correct_index: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionError {
    #[error("word {0} not found")]
    WordNotFound(i64),
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Builds the next question for the learner: priority-selected word,
/// up to three distractors, shuffled options.
///
/// `Ok(None)` means the level is exhausted for this session; any store
/// failure propagates as `Err`.
pub async fn generate_question(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
    direction: TranslationDirection,
) -> Result<Option<QuizQuestion>, sqlx::Error> {
    let Some(word) = selection::select_next_word(db, cfg, user_id, level, exclude_ids).await?
    else {
        return Ok(None);
    };

    Ok(Some(assemble_question(db, word, direction).await?))
}

/// Builds a question around a specific catalog word, e.g. when the
/// learner replays the words they got wrong in the previous run.
pub async fn question_for_word(
    db: &Database,
    word_id: i64,
    direction: TranslationDirection,
) -> Result<QuizQuestion, QuestionError> {
    let word = catalog::word_by_id(db, word_id)
        .await?
        .ok_or(QuestionError::WordNotFound(word_id))?;
    Ok(assemble_question(db, word, direction).await?)
}

/// Driver-facing wrapper: retries generation a bounded number of times
/// before reporting the level as exhausted.
pub async fn next_question(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
    direction: TranslationDirection,
) -> Result<Option<QuizQuestion>, sqlx::Error> {
    for attempt in 0..cfg.max_generate_attempts {
        if let Some(question) =
            generate_question(db, cfg, user_id, level, exclude_ids, direction).await?
        {
            return Ok(Some(question));
        }
        tracing::debug!(user_id, attempt, "no question generated, retrying");
    }
    Ok(None)
}

async fn assemble_question(
    db: &Database,
    word: Word,
    direction: TranslationDirection,
) -> Result<QuizQuestion, sqlx::Error> {
    let mut distractors = distractors::select_distractors(db, &word).await?;

    if distractors.len() < DISTRACTOR_COUNT {
        let missing = DISTRACTOR_COUNT - distractors.len();
        let extra =
            distractors::fill_distractors(db, &word, &distractors, word.level, missing).await?;
        distractors.extend(extra);
    }
    distractors.truncate(DISTRACTOR_COUNT);

    let mut options: Vec<AnswerOption> = Vec::with_capacity(distractors.len() + 1);
    options.push(answer_option(&word, direction));
    options.extend(distractors.iter().map(|d| answer_option(d, direction)));
    options.shuffle(&mut rand::rng());

    let correct_index = options
        .iter()
        .position(|o| o.word_id == word.id)
        .unwrap_or(0);

    Ok(QuizQuestion {
        word,
        options,
        correct_index,
    })
}

fn answer_option(word: &Word, direction: TranslationDirection) -> AnswerOption {
    let label = match direction {
        // Learner picks the German word, article included so it has to
        // be known, not deduced.
        TranslationDirection::RuToDe | TranslationDirection::UkToDe => word.display_de(),
        TranslationDirection::DeToRu => capitalize_first(&word.translation_ru),
        TranslationDirection::DeToUk => capitalize_first(&word.translation_uk),
    };
    AnswerOption {
        word_id: word.id,
        label,
    }
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Article, PartOfSpeech};

    fn haus() -> Word {
        Word {
            id: 1,
            word_de: "Haus".to_string(),
            article: Some(Article::Das),
            pos: PartOfSpeech::Noun,
            level: CefrLevel::A1,
            translation_ru: "дом".to_string(),
            translation_uk: "дім".to_string(),
            example_de: Some("Das Haus ist groß.".to_string()),
            example_ru: None,
            example_uk: None,
            times_shown: 0,
            times_correct: 0,
        }
    }

    #[test]
    fn capitalize_first_handles_cyrillic_and_empty() {
        assert_eq!(capitalize_first("дом"), "Дом");
        assert_eq!(capitalize_first("house"), "House");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn native_to_target_shows_article_prefixed_german() {
        let option = answer_option(&haus(), TranslationDirection::RuToDe);
        assert_eq!(option.label, "das Haus");

        let option = answer_option(&haus(), TranslationDirection::UkToDe);
        assert_eq!(option.label, "das Haus");
    }

    #[test]
    fn target_to_native_shows_capitalized_translation() {
        let option = answer_option(&haus(), TranslationDirection::DeToRu);
        assert_eq!(option.label, "Дом");

        let option = answer_option(&haus(), TranslationDirection::DeToUk);
        assert_eq!(option.label, "Дім");
    }
}
