use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::db::Database;
use crate::model::{
    map_word_row, CefrLevel, TranslationDirection, Word, WORD_COLUMNS,
};

/// One quiz run, persisted so finished runs can be reported on.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSessionRecord {
    pub id: String,
    pub user_id: i64,
    pub level: CefrLevel,
    pub direction: TranslationDirection,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub started_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

/// One answered question of a session, joined with its catalog word
/// for the results report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResultItem {
    pub word: Word,
    pub is_correct: bool,
    pub answered_at: NaiveDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("quiz session not found")]
    NotFound,
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

pub async fn create_session(
    db: &Database,
    user_id: i64,
    level: CefrLevel,
    direction: TranslationDirection,
    total_questions: i64,
) -> Result<QuizSessionRecord, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let started_at = Utc::now().naive_utc();

    sqlx::query(
        r#"
        INSERT INTO "quiz_sessions"
          ("id","userId","level","direction","totalQuestions","correctAnswers","startedAt")
        VALUES (?,?,?,?,?,0,?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(level.as_str())
    .bind(direction.as_str())
    .bind(total_questions)
    .bind(started_at)
    .execute(db.pool())
    .await?;

    tracing::debug!(user_id, session_id = %id, level = level.as_str(), "created quiz session");

    Ok(QuizSessionRecord {
        id,
        user_id,
        level,
        direction,
        total_questions,
        correct_answers: 0,
        started_at,
        completed_at: None,
    })
}

pub async fn get_session(
    db: &Database,
    session_id: &str,
) -> Result<Option<QuizSessionRecord>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT "id","userId","level","direction","totalQuestions","correctAnswers","startedAt","completedAt"
        FROM "quiz_sessions"
        WHERE "id" = ?
        LIMIT 1
        "#,
    )
    .bind(session_id)
    .fetch_optional(db.pool())
    .await?;

    Ok(row.as_ref().map(map_session_row))
}

/// Appends one answered question to the session.
pub async fn record_session_item(
    db: &Database,
    session_id: &str,
    word_id: i64,
    is_correct: bool,
) -> Result<(), SessionError> {
    ensure_session_exists(db, session_id).await?;

    sqlx::query(
        r#"
        INSERT INTO "quiz_session_items" ("sessionId","wordId","isCorrect","answeredAt")
        VALUES (?,?,?,?)
        "#,
    )
    .bind(session_id)
    .bind(word_id)
    .bind(is_correct)
    .bind(Utc::now().naive_utc())
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Closes the session with its final score.
pub async fn complete_session(
    db: &Database,
    session_id: &str,
    correct_answers: i64,
) -> Result<QuizSessionRecord, SessionError> {
    let result = sqlx::query(
        r#"
        UPDATE "quiz_sessions"
        SET "correctAnswers" = ?, "completedAt" = ?
        WHERE "id" = ?
        "#,
    )
    .bind(correct_answers)
    .bind(Utc::now().naive_utc())
    .bind(session_id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(SessionError::NotFound);
    }

    get_session(db, session_id).await?.ok_or(SessionError::NotFound)
}

/// The session's answered words in answer order, for the results
/// report.
pub async fn session_results(
    db: &Database,
    session_id: &str,
) -> Result<Vec<SessionResultItem>, SessionError> {
    ensure_session_exists(db, session_id).await?;

    let sql = format!(
        r#"
        SELECT {WORD_COLUMNS}, i."isCorrect" AS "isCorrect", i."answeredAt" AS "answeredAt"
        FROM "quiz_session_items" i
        JOIN "words" w ON w."id" = i."wordId"
        WHERE i."sessionId" = ?
        ORDER BY i."answeredAt" ASC, i."id" ASC
        "#
    );
    let rows = sqlx::query(&sql)
        .bind(session_id)
        .fetch_all(db.pool())
        .await?;

    Ok(rows
        .iter()
        .map(|row| SessionResultItem {
            word: map_word_row(row),
            is_correct: row.try_get("isCorrect").unwrap_or(false),
            answered_at: row
                .try_get("answeredAt")
                .unwrap_or_else(|_| Utc::now().naive_utc()),
        })
        .collect())
}

async fn ensure_session_exists(db: &Database, session_id: &str) -> Result<(), SessionError> {
    let existing: Option<String> =
        sqlx::query_scalar(r#"SELECT "id" FROM "quiz_sessions" WHERE "id" = ? LIMIT 1"#)
            .bind(session_id)
            .fetch_optional(db.pool())
            .await?;

    if existing.is_none() {
        return Err(SessionError::NotFound);
    }
    Ok(())
}

fn map_session_row(row: &SqliteRow) -> QuizSessionRecord {
    let level: String = row.try_get("level").unwrap_or_default();
    let direction: String = row.try_get("direction").unwrap_or_default();

    QuizSessionRecord {
        id: row.try_get("id").unwrap_or_default(),
        user_id: row.try_get("userId").unwrap_or_default(),
        level: CefrLevel::parse(&level).unwrap_or(CefrLevel::A1),
        direction: TranslationDirection::parse(&direction)
            .unwrap_or(TranslationDirection::DeToRu),
        total_questions: row.try_get("totalQuestions").unwrap_or_default(),
        correct_answers: row.try_get("correctAnswers").unwrap_or_default(),
        started_at: row
            .try_get("startedAt")
            .unwrap_or_else(|_| Utc::now().naive_utc()),
        completed_at: row.try_get("completedAt").ok(),
    }
}
