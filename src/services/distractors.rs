use rand::seq::IndexedRandom;
use sqlx::QueryBuilder;

use crate::db::Database;
use crate::model::{map_word_row, CefrLevel, PartOfSpeech, Word, WORD_COLUMNS};

/// Number of wrong options a full question carries.
pub const DISTRACTOR_COUNT: usize = 3;

/// Plausible wrong answers for `correct`: same level and part of
/// speech. For nouns carrying an article, candidates with that same
/// article are excluded so the article alone never gives the answer
/// away.
///
/// Returns up to [`DISTRACTOR_COUNT`] words, sampled uniformly; fewer
/// when the catalog is short (the caller pads via
/// [`fill_distractors`]).
pub async fn select_distractors(
    db: &Database,
    correct: &Word,
) -> Result<Vec<Word>, sqlx::Error> {
    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
        r#"SELECT {WORD_COLUMNS} FROM "words" w WHERE w."id" != "#
    ));
    qb.push_bind(correct.id);
    qb.push(r#" AND w."level" = "#);
    qb.push_bind(correct.level.as_str());
    qb.push(r#" AND w."pos" = "#);
    qb.push_bind(correct.pos.as_str());

    if correct.pos == PartOfSpeech::Noun {
        if let Some(article) = correct.article {
            qb.push(r#" AND (w."article" IS NULL OR w."article" != "#);
            qb.push_bind(article.as_str());
            qb.push(")");
        }
    }

    let rows = qb.build().fetch_all(db.pool()).await?;
    let candidates: Vec<Word> = rows.iter().map(map_word_row).collect();

    if candidates.len() >= DISTRACTOR_COUNT {
        let mut rng = rand::rng();
        return Ok(candidates
            .choose_multiple(&mut rng, DISTRACTOR_COUNT)
            .cloned()
            .collect());
    }

    Ok(candidates)
}

/// Pads a short distractor list with any other words at the level,
/// excluding the correct word and the distractors already chosen.
pub async fn fill_distractors(
    db: &Database,
    correct: &Word,
    current: &[Word],
    level: CefrLevel,
    count: usize,
) -> Result<Vec<Word>, sqlx::Error> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
        r#"SELECT {WORD_COLUMNS} FROM "words" w WHERE w."level" = "#
    ));
    qb.push_bind(level.as_str());
    qb.push(r#" AND w."id" NOT IN ("#);
    {
        let mut sep = qb.separated(", ");
        sep.push_bind(correct.id);
        for word in current {
            sep.push_bind(word.id);
        }
        sep.push_unseparated(")");
    }

    let rows = qb.build().fetch_all(db.pool()).await?;
    let candidates: Vec<Word> = rows.iter().map(map_word_row).collect();

    let mut rng = rand::rng();
    Ok(candidates
        .choose_multiple(&mut rng, count.min(candidates.len()))
        .cloned()
        .collect())
}
