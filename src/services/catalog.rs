use chrono::Utc;

use crate::db::Database;
use crate::model::{map_word_row, Article, CefrLevel, PartOfSpeech, Word, WORD_COLUMNS};

/// Catalog entry to insert. Ids are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewWord {
    pub word_de: String,
    pub article: Option<Article>,
    pub pos: PartOfSpeech,
    pub level: CefrLevel,
    pub translation_ru: String,
    pub translation_uk: String,
    pub example_de: Option<String>,
    pub example_ru: Option<String>,
    pub example_uk: Option<String>,
}

pub async fn word_by_id(db: &Database, word_id: i64) -> Result<Option<Word>, sqlx::Error> {
    let sql = format!(r#"SELECT {WORD_COLUMNS} FROM "words" w WHERE w."id" = ? LIMIT 1"#);
    let row = sqlx::query(&sql)
        .bind(word_id)
        .fetch_optional(db.pool())
        .await?;
    Ok(row.as_ref().map(map_word_row))
}

pub async fn insert_word(db: &Database, word: &NewWord) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO "words"
          ("wordDe","article","pos","level","translationRu","translationUk","exampleDe","exampleRu","exampleUk","createdAt")
        VALUES (?,?,?,?,?,?,?,?,?,?)
        "#,
    )
    .bind(&word.word_de)
    .bind(word.article.map(|a| a.as_str()))
    .bind(word.pos.as_str())
    .bind(word.level.as_str())
    .bind(&word.translation_ru)
    .bind(&word.translation_uk)
    .bind(word.example_de.as_deref())
    .bind(word.example_ru.as_deref())
    .bind(word.example_uk.as_deref())
    .bind(Utc::now().naive_utc())
    .execute(db.pool())
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn word_count(db: &Database, level: Option<CefrLevel>) -> Result<i64, sqlx::Error> {
    let count: i64 = match level {
        Some(level) => {
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM "words" WHERE "level" = ?"#)
                .bind(level.as_str())
                .fetch_one(db.pool())
                .await?
        }
        None => {
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM "words""#)
                .fetch_one(db.pool())
                .await?
        }
    };
    Ok(count)
}
