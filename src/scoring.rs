/// Composite relevance scoring for memory re-ranking
///
/// The score is an additive blend of three signals:
///   1. Keyword overlap — +2 per keyword contained in the memory text
///   2. Recency        — +1 for memories under 30 days old
///   3. Proven success — +3 when the recorded success_score clears the
///      threshold; the dominant signal, so one proven form outranks several
///      merely topical ones
///
/// All scoring functions are pure — no I/O, no store writes. Scores are
/// computed at query time only and never persisted.

use chrono::{DateTime, Utc};

use crate::client::MemoryRecord;

/// Points per keyword found as a substring of the memory text.
pub const KEYWORD_MATCH_BONUS: i64 = 2;

/// Points for a memory younger than [`RECENCY_WINDOW_DAYS`].
pub const RECENCY_BONUS: i64 = 1;

/// Points for a memory whose form analytics mark it successful.
pub const SUCCESS_BONUS: i64 = 3;

/// Age cutoff for the recency bonus.
pub const RECENCY_WINDOW_DAYS: i64 = 30;

/// Keyword overlap component.
///
/// Matching is pure substring containment, not tokenized equality. This is
/// deliberate: it catches compound and partial matches ("feedback" inside
/// "feedbacks") at the cost of occasional false positives on short keywords.
pub fn keyword_overlap_score(text: &str, keywords: &[String]) -> i64 {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .filter(|k| lowered.contains(&k.to_lowercase()))
        .count() as i64
        * KEYWORD_MATCH_BONUS
}

/// Recency component: +1 inside the window, 0 outside or when the memory
/// carries no timestamp. Unknown recency is never penalized.
pub fn recency_bonus(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match created_at {
        Some(ts) if now.signed_duration_since(ts).num_days() < RECENCY_WINDOW_DAYS => {
            RECENCY_BONUS
        }
        _ => 0,
    }
}

/// Success component: +3 when analytics mark the memory successful.
pub fn success_bonus(record: &MemoryRecord) -> i64 {
    if record.is_successful() {
        SUCCESS_BONUS
    } else {
        0
    }
}

/// Full composite score for one record at evaluation time `now`.
pub fn relevance_score(record: &MemoryRecord, keywords: &[String], now: DateTime<Utc>) -> i64 {
    keyword_overlap_score(&record.text, keywords)
        + recency_bonus(record.created_at, now)
        + success_bonus(record)
}

/// Maximum score attainable for a given keyword set. Used to normalize
/// averages onto a 0–100 scale for reporting.
pub fn max_attainable_score(keyword_count: usize) -> i64 {
    keyword_count as i64 * KEYWORD_MATCH_BONUS + RECENCY_BONUS + SUCCESS_BONUS
}

/// Score every record, sort descending by score, and truncate to `limit`.
///
/// The sort is stable: records with equal scores keep their store-returned
/// relative order.
pub fn rank(
    mut records: Vec<MemoryRecord>,
    keywords: &[String],
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<MemoryRecord> {
    for record in &mut records {
        record.relevance_score = relevance_score(record, keywords, now);
    }
    records.sort_by_key(|r| std::cmp::Reverse(r.relevance_score));
    records.truncate(limit);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FormAnalytics;
    use chrono::Duration;

    fn record(text: &str) -> MemoryRecord {
        MemoryRecord {
            text: text.to_string(),
            analytics: None,
            created_at: None,
            relevance_score: 0,
        }
    }

    fn with_success(mut r: MemoryRecord, score: f64) -> MemoryRecord {
        r.analytics = Some(FormAnalytics {
            success_score: Some(score),
            ..FormAnalytics::default()
        });
        r
    }

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_keyword_overlap_substring_containment() {
        let kw = keywords(&["feedback", "survey"]);
        assert_eq!(keyword_overlap_score("customer feedback survey", &kw), 4);
        // Substring, not token equality: "feedbacks" still matches.
        assert_eq!(keyword_overlap_score("collected feedbacks", &kw), 2);
        assert_eq!(keyword_overlap_score("unrelated text", &kw), 0);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let kw = keywords(&["Feedback"]);
        assert_eq!(keyword_overlap_score("FEEDBACK form created", &kw), 2);
    }

    #[test]
    fn test_recency_bonus_window() {
        let now = Utc::now();
        assert_eq!(recency_bonus(Some(now - Duration::days(10)), now), 1);
        assert_eq!(recency_bonus(Some(now - Duration::days(40)), now), 0);
        assert_eq!(recency_bonus(None, now), 0);
    }

    #[test]
    fn test_success_bonus_threshold() {
        let now = Utc::now();
        let kw = keywords(&[]);
        let mediocre = with_success(record("x"), 5.0);
        let good = with_success(record("x"), 8.0);
        // Moving success_score from 5 to 8 adds exactly the success bonus.
        assert_eq!(
            relevance_score(&good, &kw, now) - relevance_score(&mediocre, &kw, now),
            SUCCESS_BONUS
        );
        assert_eq!(relevance_score(&with_success(record("x"), 7.0), &kw, now), 3);
    }

    #[test]
    fn test_scoring_monotonic_in_keyword_matches() {
        let now = Utc::now();
        let kw = keywords(&["feedback", "survey"]);
        let base = relevance_score(&record("plain note"), &kw, now);
        let one = relevance_score(&record("plain feedback note"), &kw, now);
        let two = relevance_score(&record("feedback survey note"), &kw, now);
        assert!(one > base);
        assert!(two > one);
    }

    #[test]
    fn test_missing_metadata_scores_without_panic() {
        let now = Utc::now();
        let kw = keywords(&["feedback"]);
        let r = record("no metadata at all");
        assert_eq!(relevance_score(&r, &kw, now), 0);
    }

    #[test]
    fn test_rank_sorts_descending_and_truncates() {
        let now = Utc::now();
        let kw = keywords(&["alpha", "beta", "gamma"]);
        let records = vec![
            record("nothing here"),
            record("alpha beta gamma"),
            record("alpha only"),
        ];
        let ranked = rank(records, &kw, 2, now);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].text, "alpha beta gamma");
        assert_eq!(ranked[0].relevance_score, 6);
        assert_eq!(ranked[1].text, "alpha only");
    }

    #[test]
    fn test_rank_stable_on_ties() {
        let now = Utc::now();
        let kw = keywords(&["alpha"]);
        let records = vec![
            record("alpha first"),
            record("alpha second"),
            record("alpha third"),
        ];
        let ranked = rank(records, &kw, 10, now);
        assert_eq!(ranked[0].text, "alpha first");
        assert_eq!(ranked[1].text, "alpha second");
        assert_eq!(ranked[2].text, "alpha third");
    }

    #[test]
    fn test_recency_loses_to_extra_keyword_match() {
        // 2 matches + recent (score 5) vs 3 matches + stale (score 6).
        let now = Utc::now();
        let kw = keywords(&["one", "two", "three"]);

        let mut recent = record("one two");
        recent.created_at = Some(now - Duration::days(10));
        let mut stale = record("one two three");
        stale.created_at = Some(now - Duration::days(40));

        let ranked = rank(vec![recent, stale], &kw, 10, now);
        assert_eq!(ranked[0].text, "one two three");
        assert_eq!(ranked[0].relevance_score, 6);
        assert_eq!(ranked[1].relevance_score, 5);
    }

    #[test]
    fn test_max_attainable_score() {
        assert_eq!(max_attainable_score(0), 4);
        assert_eq!(max_attainable_score(3), 10);
    }
}
