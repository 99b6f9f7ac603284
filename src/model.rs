use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// CEFR proficiency tier. Ordered so that `A1 < A2 < ... < C2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "A1" | "a1" => Some(CefrLevel::A1),
            "A2" | "a2" => Some(CefrLevel::A2),
            "B1" | "b1" => Some(CefrLevel::B1),
            "B2" | "b2" => Some(CefrLevel::B2),
            "C1" | "c1" => Some(CefrLevel::C1),
            "C2" | "c2" => Some(CefrLevel::C2),
            _ => None,
        }
    }
}

/// Grammatical article of a German noun. Absence is modelled as
/// `Option<Article>` on the word, not as a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Article {
    Der,
    Die,
    Das,
}

impl Article {
    pub fn as_str(&self) -> &'static str {
        match self {
            Article::Der => "der",
            Article::Die => "die",
            Article::Das => "das",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "der" => Some(Article::Der),
            "die" => Some(Article::Die),
            "das" => Some(Article::Das),
            // legacy catalog imports used '-' for "no article"
            "" | "-" => None,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Phrase,
    Other,
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Phrase => "phrase",
            PartOfSpeech::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "noun" => Some(PartOfSpeech::Noun),
            "verb" => Some(PartOfSpeech::Verb),
            "adjective" | "adj" => Some(PartOfSpeech::Adjective),
            "adverb" | "adv" => Some(PartOfSpeech::Adverb),
            "pronoun" => Some(PartOfSpeech::Pronoun),
            "preposition" => Some(PartOfSpeech::Preposition),
            "conjunction" => Some(PartOfSpeech::Conjunction),
            "phrase" => Some(PartOfSpeech::Phrase),
            "other" => Some(PartOfSpeech::Other),
            _ => None,
        }
    }
}

/// Which language is shown as the prompt vs. the answer options.
/// Closed set; formatting logic matches on it exhaustively so an
/// unhandled direction cannot compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationDirection {
    DeToRu,
    RuToDe,
    DeToUk,
    UkToDe,
}

impl TranslationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationDirection::DeToRu => "de_to_ru",
            TranslationDirection::RuToDe => "ru_to_de",
            TranslationDirection::DeToUk => "de_to_uk",
            TranslationDirection::UkToDe => "uk_to_de",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "de_to_ru" => Some(TranslationDirection::DeToRu),
            "ru_to_de" => Some(TranslationDirection::RuToDe),
            "de_to_uk" => Some(TranslationDirection::DeToUk),
            "uk_to_de" => Some(TranslationDirection::UkToDe),
            _ => None,
        }
    }

    /// True when the prompt is in the learner's native language and the
    /// answer options show German surface forms.
    pub fn native_to_target(&self) -> bool {
        matches!(
            self,
            TranslationDirection::RuToDe | TranslationDirection::UkToDe
        )
    }
}

/// A catalog entry. Read-mostly; only the global exposure counters are
/// mutated when the word gets quizzed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    pub word_de: String,
    pub article: Option<Article>,
    pub pos: PartOfSpeech,
    pub level: CefrLevel,
    pub translation_ru: String,
    pub translation_uk: String,
    pub example_de: Option<String>,
    pub example_ru: Option<String>,
    pub example_uk: Option<String>,
    pub times_shown: i64,
    pub times_correct: i64,
}

impl Word {
    /// German surface form with its article prefixed, e.g. "das Haus".
    pub fn display_de(&self) -> String {
        match self.article {
            Some(article) => format!("{} {}", article.as_str(), self.word_de),
            None => self.word_de.clone(),
        }
    }
}

/// Per-learner progress for one word. At most one row per
/// (user, word) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    pub user_id: i64,
    pub word_id: i64,
    pub times_shown: i64,
    pub times_correct: i64,
    pub correct_streak: i64,
    pub learned: bool,
    pub last_seen_at: Option<NaiveDateTime>,
}

impl WordProgress {
    /// Fresh progress for a word the learner has never been shown.
    pub fn fresh(user_id: i64, word_id: i64) -> Self {
        Self {
            user_id,
            word_id,
            times_shown: 0,
            times_correct: 0,
            correct_streak: 0,
            learned: false,
            last_seen_at: None,
        }
    }

    /// State after one answered question. The `learned` flag is always
    /// recomputed from the streak here, never set anywhere else: a
    /// single wrong answer un-learns the word regardless of its
    /// cumulative success rate.
    pub fn after_answer(&self, is_correct: bool, now: NaiveDateTime, mastery_streak: i64) -> Self {
        let correct_streak = if is_correct { self.correct_streak + 1 } else { 0 };
        Self {
            user_id: self.user_id,
            word_id: self.word_id,
            times_shown: self.times_shown + 1,
            times_correct: self.times_correct + i64::from(is_correct),
            correct_streak,
            learned: correct_streak >= mastery_streak,
            last_seen_at: Some(now),
        }
    }

    /// Lifetime success rate in percent, `None` before the first
    /// exposure.
    pub fn success_rate(&self) -> Option<f64> {
        if self.times_shown == 0 {
            return None;
        }
        Some(self.times_correct as f64 * 100.0 / self.times_shown as f64)
    }
}

/// Column list shared by every query that hydrates a [`Word`] from the
/// `"words"` table (aliased `w`).
pub(crate) const WORD_COLUMNS: &str = r#"w."id", w."wordDe", w."article", w."pos", w."level", w."translationRu", w."translationUk", w."exampleDe", w."exampleRu", w."exampleUk", w."timesShown", w."timesCorrect""#;

pub(crate) fn map_word_row(row: &SqliteRow) -> Word {
    let article: Option<String> = row.try_get("article").ok().flatten();
    let pos: String = row.try_get("pos").unwrap_or_default();
    let level: String = row.try_get("level").unwrap_or_default();

    Word {
        id: row.try_get("id").unwrap_or_default(),
        word_de: row.try_get("wordDe").unwrap_or_default(),
        article: article.as_deref().and_then(Article::parse),
        pos: PartOfSpeech::parse(&pos).unwrap_or(PartOfSpeech::Other),
        level: CefrLevel::parse(&level).unwrap_or(CefrLevel::A1),
        translation_ru: row.try_get("translationRu").unwrap_or_default(),
        translation_uk: row.try_get("translationUk").unwrap_or_default(),
        example_de: row.try_get("exampleDe").ok().flatten(),
        example_ru: row.try_get("exampleRu").ok().flatten(),
        example_uk: row.try_get("exampleUk").ok().flatten(),
        times_shown: row.try_get("timesShown").unwrap_or_default(),
        times_correct: row.try_get("timesCorrect").unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn level_parse_round_trip() {
        for level in CefrLevel::ALL {
            assert_eq!(CefrLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(CefrLevel::parse("D1"), None);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(CefrLevel::A1 < CefrLevel::A2);
        assert!(CefrLevel::B2 < CefrLevel::C1);
    }

    #[test]
    fn article_parse_accepts_legacy_dash() {
        assert_eq!(Article::parse("der"), Some(Article::Der));
        assert_eq!(Article::parse("-"), None);
        assert_eq!(Article::parse(""), None);
    }

    #[test]
    fn direction_parse_round_trip() {
        for raw in ["de_to_ru", "ru_to_de", "de_to_uk", "uk_to_de"] {
            let direction = TranslationDirection::parse(raw).unwrap();
            assert_eq!(direction.as_str(), raw);
        }
        assert_eq!(TranslationDirection::parse("en_to_de"), None);
    }

    #[test]
    fn display_de_prefixes_article() {
        let word = Word {
            id: 1,
            word_de: "Haus".to_string(),
            article: Some(Article::Das),
            pos: PartOfSpeech::Noun,
            level: CefrLevel::A1,
            translation_ru: "дом".to_string(),
            translation_uk: "дім".to_string(),
            example_de: None,
            example_ru: None,
            example_uk: None,
            times_shown: 0,
            times_correct: 0,
        };
        assert_eq!(word.display_de(), "das Haus");
    }

    #[test]
    fn after_answer_resets_streak_and_learned_on_miss() {
        let now = Utc::now().naive_utc();
        let progress = WordProgress {
            user_id: 7,
            word_id: 3,
            times_shown: 12,
            times_correct: 11,
            correct_streak: 5,
            learned: true,
            last_seen_at: Some(now),
        };
        let next = progress.after_answer(false, now, 3);
        assert_eq!(next.correct_streak, 0);
        assert!(!next.learned);
        assert_eq!(next.times_shown, 13);
        assert_eq!(next.times_correct, 11);
    }

    #[test]
    fn success_rate_is_none_before_first_exposure() {
        let progress = WordProgress::fresh(1, 1);
        assert_eq!(progress.success_rate(), None);

        let now = Utc::now().naive_utc();
        let shown = progress.after_answer(true, now, 3);
        assert_eq!(shown.success_rate(), Some(100.0));
    }
}
