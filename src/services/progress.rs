use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row};

use crate::config::SrsConfig;
use crate::db::Database;
use crate::model::{CefrLevel, WordProgress};

/// Aggregate progress counts for reporting. `new` is the remainder of
/// the catalog the learner has never seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total: i64,
    pub seen: i64,
    pub mastered: i64,
    pub struggling: i64,
    pub new: i64,
}

/// Applies one answered question: bumps the word's global counters and
/// upserts the learner's progress row, streak and `learned` recomputed
/// by [`WordProgress::after_answer`]. Atomic per (learner, word).
pub async fn record_answer(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    word_id: i64,
    is_correct: bool,
) -> Result<WordProgress, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let mut tx = db.pool().begin().await?;

    sqlx::query(
        r#"
        UPDATE "words"
        SET "timesShown" = "timesShown" + 1,
            "timesCorrect" = "timesCorrect" + CASE WHEN ? THEN 1 ELSE 0 END
        WHERE "id" = ?
        "#,
    )
    .bind(is_correct)
    .bind(word_id)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query(
        r#"
        SELECT "timesShown","timesCorrect","correctStreak","learned","lastSeenAt"
        FROM "user_words"
        WHERE "userId" = ? AND "wordId" = ?
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(word_id)
    .fetch_optional(&mut *tx)
    .await?;

    let current = match &row {
        Some(row) => map_progress_row(user_id, word_id, row),
        None => WordProgress::fresh(user_id, word_id),
    };
    let next = current.after_answer(is_correct, now, cfg.mastery_streak);

    sqlx::query(
        r#"
        INSERT INTO "user_words"
          ("userId","wordId","timesShown","timesCorrect","correctStreak","learned","lastSeenAt","updatedAt")
        VALUES (?,?,?,?,?,?,?,?)
        ON CONFLICT("userId","wordId") DO UPDATE SET
          "timesShown" = excluded."timesShown",
          "timesCorrect" = excluded."timesCorrect",
          "correctStreak" = excluded."correctStreak",
          "learned" = excluded."learned",
          "lastSeenAt" = excluded."lastSeenAt",
          "updatedAt" = excluded."updatedAt"
        "#,
    )
    .bind(user_id)
    .bind(word_id)
    .bind(next.times_shown)
    .bind(next.times_correct)
    .bind(next.correct_streak)
    .bind(next.learned)
    .bind(next.last_seen_at)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        user_id,
        word_id,
        is_correct,
        streak = next.correct_streak,
        learned = next.learned,
        "recorded answer"
    );

    Ok(next)
}

/// The learner's progress row for one word, if any.
pub async fn word_progress(
    db: &Database,
    user_id: i64,
    word_id: i64,
) -> Result<Option<WordProgress>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT "timesShown","timesCorrect","correctStreak","learned","lastSeenAt"
        FROM "user_words"
        WHERE "userId" = ? AND "wordId" = ?
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(word_id)
    .fetch_optional(db.pool())
    .await?;

    Ok(row.as_ref().map(|row| map_progress_row(user_id, word_id, row)))
}

/// Progress counts for one level, or across the whole catalog when
/// `level` is `None`. Bucket predicates match the selector's.
pub async fn progress_summary(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: Option<CefrLevel>,
) -> Result<ProgressSummary, sqlx::Error> {
    let total: i64 = {
        let mut qb = QueryBuilder::<sqlx::Sqlite>::new(r#"SELECT COUNT(*) FROM "words" w"#);
        if let Some(level) = level {
            qb.push(r#" WHERE w."level" = "#);
            qb.push_bind(level.as_str());
        }
        let row = qb.build().fetch_one(db.pool()).await?;
        row.try_get(0).unwrap_or(0)
    };

    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(
        r#"
        SELECT
          COUNT(*) as "seen",
          SUM(CASE WHEN uw."learned" = 1 THEN 1 ELSE 0 END) as "mastered",
          SUM(CASE WHEN uw."learned" = 0 AND uw."timesShown" > 0
                    AND (uw."timesCorrect" * 100.0 / uw."timesShown") < "#,
    );
    qb.push_bind(cfg.struggling_threshold);
    qb.push(
        r#" THEN 1 ELSE 0 END) as "struggling"
        FROM "user_words" uw
        JOIN "words" w ON w."id" = uw."wordId"
        WHERE uw."userId" = "#,
    );
    qb.push_bind(user_id);
    if let Some(level) = level {
        qb.push(r#" AND w."level" = "#);
        qb.push_bind(level.as_str());
    }

    let row = qb.build().fetch_one(db.pool()).await?;
    let seen: i64 = row.try_get("seen").unwrap_or(0);
    let mastered: i64 = row.try_get("mastered").unwrap_or(0);
    let struggling: i64 = row.try_get("struggling").unwrap_or(0);

    Ok(ProgressSummary {
        total,
        seen,
        mastered,
        struggling,
        new: total - seen,
    })
}

fn map_progress_row(user_id: i64, word_id: i64, row: &SqliteRow) -> WordProgress {
    WordProgress {
        user_id,
        word_id,
        times_shown: row.try_get("timesShown").unwrap_or_default(),
        times_correct: row.try_get("timesCorrect").unwrap_or_default(),
        correct_streak: row.try_get("correctStreak").unwrap_or_default(),
        learned: row.try_get("learned").unwrap_or(false),
        last_seen_at: row.try_get("lastSeenAt").ok(),
    }
}
