use chrono::Duration;

/// Tunables for the word-selection policy. Immutable once built; pass
/// a reference into the selector so tests can override thresholds
/// without touching global state.
#[derive(Debug, Clone)]
pub struct SrsConfig {
    /// Probability mass of the struggling bucket.
    pub struggling_ratio: f64,
    /// Probability mass of the new-words bucket.
    pub new_ratio: f64,
    /// Probability mass of the review bucket. The mastered bucket gets
    /// the remainder of the unit interval.
    pub review_ratio: f64,
    /// Success rate (percent) below which a seen word counts as
    /// struggling.
    pub struggling_threshold: f64,
    /// Upper success-rate bound (percent) of the review bucket.
    pub review_threshold: f64,
    /// Minimum lifetime success rate (percent) for the mastered
    /// bucket. Independent of the streak-derived `learned` flag.
    pub mastered_success_rate: f64,
    /// Minimum exposures before a word qualifies for the mastered
    /// bucket.
    pub min_attempts_for_mastered: i64,
    /// Consecutive correct answers that flip `learned` on.
    pub mastery_streak: i64,
    /// A word shown more recently than this is held back from the
    /// struggling and review buckets.
    pub reshow_cooldown: Duration,
    /// How many times the session driver retries generation before
    /// treating the level as exhausted.
    pub max_generate_attempts: u32,
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            struggling_ratio: 0.60,
            new_ratio: 0.30,
            review_ratio: 0.09,
            struggling_threshold: 70.0,
            review_threshold: 90.0,
            mastered_success_rate: 90.0,
            min_attempts_for_mastered: 3,
            mastery_streak: 3,
            reshow_cooldown: Duration::hours(1),
            max_generate_attempts: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ratios_leave_mass_for_mastered() {
        let cfg = SrsConfig::default();
        let assigned = cfg.struggling_ratio + cfg.new_ratio + cfg.review_ratio;
        assert!(assigned < 1.0);
        assert!((assigned - 0.99).abs() < 1e-9);
    }
}
