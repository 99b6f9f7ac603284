#![allow(dead_code)]

use tempfile::TempDir;

use wortquiz_core::db::{migrate, Database};
use wortquiz_core::model::{Article, CefrLevel, PartOfSpeech};
use wortquiz_core::services::catalog::{self, NewWord};

pub async fn setup_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let db = Database::open(&db_path)
        .await
        .expect("failed to open database");
    migrate::run_migrations(db.pool())
        .await
        .expect("migration failed");

    (temp_dir, db)
}

pub async fn insert_word(
    db: &Database,
    word_de: &str,
    article: Option<Article>,
    pos: PartOfSpeech,
    level: CefrLevel,
    translation: &str,
) -> i64 {
    catalog::insert_word(
        db,
        &NewWord {
            word_de: word_de.to_string(),
            article,
            pos,
            level,
            translation_ru: translation.to_string(),
            translation_uk: translation.to_string(),
            example_de: None,
            example_ru: None,
            example_uk: None,
        },
    )
    .await
    .expect("failed to insert word")
}

pub async fn insert_noun(
    db: &Database,
    word_de: &str,
    article: Article,
    level: CefrLevel,
    translation: &str,
) -> i64 {
    insert_word(db, word_de, Some(article), PartOfSpeech::Noun, level, translation).await
}

pub async fn insert_verb(db: &Database, word_de: &str, level: CefrLevel, translation: &str) -> i64 {
    insert_word(db, word_de, None, PartOfSpeech::Verb, level, translation).await
}

/// Plants a progress row directly, bypassing the updater, so tests can
/// stage arbitrary histories (e.g. a word last seen two hours ago).
pub async fn plant_progress(
    db: &Database,
    user_id: i64,
    word_id: i64,
    times_shown: i64,
    times_correct: i64,
    correct_streak: i64,
    learned: bool,
    last_seen_at: Option<chrono::NaiveDateTime>,
) {
    sqlx::query(
        r#"
        INSERT INTO "user_words"
          ("userId","wordId","timesShown","timesCorrect","correctStreak","learned","lastSeenAt")
        VALUES (?,?,?,?,?,?,?)
        "#,
    )
    .bind(user_id)
    .bind(word_id)
    .bind(times_shown)
    .bind(times_correct)
    .bind(correct_streak)
    .bind(learned)
    .bind(last_seen_at)
    .execute(db.pool())
    .await
    .expect("failed to plant progress row");
}
