use chrono::{NaiveDateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use sqlx::{QueryBuilder, Row};

use crate::config::SrsConfig;
use crate::db::Database;
use crate::model::{map_word_row, CefrLevel, Word, WORD_COLUMNS};

/// Priority class a candidate word is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Struggling,
    New,
    Review,
    Mastered,
}

const BUCKET_ORDER: [Bucket; 4] = [
    Bucket::Struggling,
    Bucket::New,
    Bucket::Review,
    Bucket::Mastered,
];

/// Index into [`BUCKET_ORDER`] the cumulative draw lands on. One draw
/// per call; an empty bucket cascades to the later entries without
/// redrawing.
pub(crate) fn starting_bucket_index(cfg: &SrsConfig, draw: f64) -> usize {
    let mut threshold = cfg.struggling_ratio;
    if draw < threshold {
        return 0;
    }
    threshold += cfg.new_ratio;
    if draw < threshold {
        return 1;
    }
    threshold += cfg.review_ratio;
    if draw < threshold {
        return 2;
    }
    3
}

/// Pick the next word to quiz for `user_id` at `level`, skipping
/// `exclude_ids` (words already used in the running session).
///
/// Returns `Ok(None)` only when the level has no eligible words left
/// at all; an empty priority bucket falls through to the next one and
/// finally to an unconditional random pick.
pub async fn select_next_word(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
) -> Result<Option<Word>, sqlx::Error> {
    let draw: f64 = rand::rng().random();
    select_next_word_with_draw(db, cfg, user_id, level, exclude_ids, draw).await
}

/// Deterministic variant of [`select_next_word`]: the caller supplies
/// the bucket draw in `[0, 1)`.
pub async fn select_next_word_with_draw(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
    draw: f64,
) -> Result<Option<Word>, sqlx::Error> {
    let start = starting_bucket_index(cfg, draw);

    for bucket in &BUCKET_ORDER[start..] {
        let found = match bucket {
            Bucket::Struggling => {
                struggling_candidate(db, cfg, user_id, level, exclude_ids).await?
            }
            Bucket::New => new_candidate(db, user_id, level, exclude_ids).await?,
            Bucket::Review => review_candidate(db, cfg, user_id, level, exclude_ids).await?,
            Bucket::Mastered => mastered_candidate(db, cfg, user_id, level, exclude_ids).await?,
        };

        if let Some(word) = found {
            tracing::debug!(user_id, word_id = word.id, bucket = ?bucket, "selected next word");
            return Ok(Some(word));
        }
    }

    any_candidate(db, level, exclude_ids).await
}

/// Seen, not learned, success rate below the struggling threshold and
/// outside the re-show cooldown.
pub async fn struggling_candidate(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
) -> Result<Option<Word>, sqlx::Error> {
    seen_unlearned_candidate(db, cfg, user_id, level, exclude_ids, None, cfg.struggling_threshold)
        .await
}

/// Seen, not learned, success rate between the struggling and review
/// thresholds and outside the re-show cooldown.
pub async fn review_candidate(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
) -> Result<Option<Word>, sqlx::Error> {
    seen_unlearned_candidate(
        db,
        cfg,
        user_id,
        level,
        exclude_ids,
        Some(cfg.struggling_threshold),
        cfg.review_threshold,
    )
    .await
}

/// Never shown to this learner before, at any level.
pub async fn new_candidate(
    db: &Database,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
) -> Result<Option<Word>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
        r#"SELECT {WORD_COLUMNS} FROM "words" w WHERE w."level" = "#
    ));
    qb.push_bind(level.as_str());
    qb.push(r#" AND w."id" NOT IN (SELECT "wordId" FROM "user_words" WHERE "userId" = "#);
    qb.push_bind(user_id);
    qb.push(")");
    push_exclusions(&mut qb, exclude_ids);

    let rows = qb.build().fetch_all(db.pool()).await?;
    let words: Vec<Word> = rows.iter().map(map_word_row).collect();
    Ok(words.choose(&mut rand::rng()).cloned())
}

/// Streak-learned words with enough exposures and a high lifetime
/// success rate. No cooldown applies; this bucket fires rarely.
pub async fn mastered_candidate(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
) -> Result<Option<Word>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
        r#"SELECT {WORD_COLUMNS} FROM "words" w JOIN "user_words" uw ON uw."wordId" = w."id" AND uw."userId" = "#
    ));
    qb.push_bind(user_id);
    qb.push(r#" WHERE w."level" = "#);
    qb.push_bind(level.as_str());
    qb.push(r#" AND uw."learned" = 1 AND uw."timesShown" >= "#);
    qb.push_bind(cfg.min_attempts_for_mastered);
    qb.push(r#" AND (uw."timesCorrect" * 100.0 / uw."timesShown") >= "#);
    qb.push_bind(cfg.mastered_success_rate);
    push_exclusions(&mut qb, exclude_ids);

    let rows = qb.build().fetch_all(db.pool()).await?;
    let words: Vec<Word> = rows.iter().map(map_word_row).collect();
    Ok(words.choose(&mut rand::rng()).cloned())
}

/// Unconditional fallback: any word at the level not yet used this
/// session.
pub async fn any_candidate(
    db: &Database,
    level: CefrLevel,
    exclude_ids: &[i64],
) -> Result<Option<Word>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
        r#"SELECT {WORD_COLUMNS} FROM "words" w WHERE w."level" = "#
    ));
    qb.push_bind(level.as_str());
    push_exclusions(&mut qb, exclude_ids);

    let rows = qb.build().fetch_all(db.pool()).await?;
    let words: Vec<Word> = rows.iter().map(map_word_row).collect();
    Ok(words.choose(&mut rand::rng()).cloned())
}

async fn seen_unlearned_candidate(
    db: &Database,
    cfg: &SrsConfig,
    user_id: i64,
    level: CefrLevel,
    exclude_ids: &[i64],
    min_rate: Option<f64>,
    max_rate: f64,
) -> Result<Option<Word>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
        r#"SELECT {WORD_COLUMNS}, uw."lastSeenAt" AS "lastSeenAt" FROM "words" w JOIN "user_words" uw ON uw."wordId" = w."id" AND uw."userId" = "#
    ));
    qb.push_bind(user_id);
    qb.push(r#" WHERE w."level" = "#);
    qb.push_bind(level.as_str());
    qb.push(r#" AND uw."learned" = 0 AND uw."timesShown" > 0"#);
    qb.push(r#" AND (uw."timesCorrect" * 100.0 / uw."timesShown") < "#);
    qb.push_bind(max_rate);
    if let Some(min_rate) = min_rate {
        qb.push(r#" AND (uw."timesCorrect" * 100.0 / uw."timesShown") >= "#);
        qb.push_bind(min_rate);
    }
    push_exclusions(&mut qb, exclude_ids);

    let rows = qb.build().fetch_all(db.pool()).await?;

    // Timestamps live as TEXT; the cooldown comparison happens here
    // rather than in SQL.
    let cutoff = Utc::now().naive_utc() - cfg.reshow_cooldown;
    let words: Vec<Word> = rows
        .iter()
        .filter(|row| {
            let last_seen: Option<NaiveDateTime> = row.try_get("lastSeenAt").ok();
            match last_seen {
                None => true,
                Some(ts) => ts < cutoff,
            }
        })
        .map(map_word_row)
        .collect();

    Ok(words.choose(&mut rand::rng()).cloned())
}

fn push_exclusions(qb: &mut QueryBuilder<'_, sqlx::Sqlite>, exclude_ids: &[i64]) {
    if exclude_ids.is_empty() {
        return;
    }
    qb.push(r#" AND w."id" NOT IN ("#);
    {
        let mut sep = qb.separated(", ");
        for id in exclude_ids {
            sep.push_bind(*id);
        }
        sep.push_unseparated(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_maps_to_cumulative_ranges() {
        let cfg = SrsConfig::default();
        assert_eq!(starting_bucket_index(&cfg, 0.0), 0);
        assert_eq!(starting_bucket_index(&cfg, 0.59), 0);
        assert_eq!(starting_bucket_index(&cfg, 0.60), 1);
        assert_eq!(starting_bucket_index(&cfg, 0.89), 1);
        assert_eq!(starting_bucket_index(&cfg, 0.90), 2);
        assert_eq!(starting_bucket_index(&cfg, 0.9899), 2);
        assert_eq!(starting_bucket_index(&cfg, 0.99), 3);
        assert_eq!(starting_bucket_index(&cfg, 0.9999), 3);
    }

    #[test]
    fn custom_ratios_shift_the_ranges() {
        let cfg = SrsConfig {
            struggling_ratio: 0.25,
            new_ratio: 0.25,
            review_ratio: 0.25,
            ..SrsConfig::default()
        };
        assert_eq!(starting_bucket_index(&cfg, 0.10), 0);
        assert_eq!(starting_bucket_index(&cfg, 0.30), 1);
        assert_eq!(starting_bucket_index(&cfg, 0.60), 2);
        assert_eq!(starting_bucket_index(&cfg, 0.80), 3);
    }

    #[test]
    fn cascade_covers_every_bucket_after_the_start() {
        let cfg = SrsConfig::default();
        let start = starting_bucket_index(&cfg, 0.95);
        let remaining: Vec<Bucket> = BUCKET_ORDER[start..].to_vec();
        assert_eq!(remaining, vec![Bucket::Review, Bucket::Mastered]);
    }
}
