/// Insight synthesis from ranked memories
///
/// Aggregates the top-ranked records into a short natural-language summary
/// plus statistics. Two independent sources feed the summary: analytics of
/// historically successful forms, and canned advisories triggered by the
/// keyword set. An empty summary means "no enhancement available" — never
/// an error.

use crate::client::{MemoryRecord, SearchResult};
use crate::scoring::max_attainable_score;

/// Summary statistics alongside the insight lines.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightStats {
    pub total_similar: usize,
    pub successful_count: usize,
    /// Mean relevance score normalized to 0–100 against the maximum
    /// attainable score for the keyword set. 0.0 for an empty result set.
    pub avg_relevance: f64,
}

/// Synthesized insight: constructed fresh per call, never persisted.
#[derive(Debug, Clone)]
pub struct Insight {
    pub summary_lines: Vec<String>,
    pub stats: InsightStats,
}

impl Insight {
    pub fn is_empty(&self) -> bool {
        self.summary_lines.is_empty()
    }
}

/// Keyword-triggered advisories, matched by prefix against each keyword.
const ADVISORIES: &[(&[&str], &str)] = &[
    (
        &["feedback", "survey"],
        "Consider including rating scales and open-ended comment fields",
    ),
    (
        &["application", "job"],
        "Include file upload for resume/documents and structured experience fields",
    ),
    (
        &["registration", "event"],
        "Add date/time fields and contact information collection",
    ),
];

/// Build an [`Insight`] from a scored search result.
pub fn synthesize(result: &SearchResult, keywords: &[String]) -> Insight {
    let successful: Vec<&MemoryRecord> = result
        .records
        .iter()
        .filter(|r| r.is_successful())
        .collect();

    let mut summary_lines = Vec::new();

    if !successful.is_empty() {
        if let Some(avg_fields) = average_field_count(&successful) {
            summary_lines.push(format!(
                "Similar successful forms averaged {} fields",
                avg_fields
            ));
        }

        let popular = popular_field_types(&successful);
        if !popular.is_empty() {
            summary_lines.push(format!(
                "Popular field types for similar forms: {}",
                popular.join(", ")
            ));
        }
    }

    for (triggers, line) in ADVISORIES {
        let hit = keywords
            .iter()
            .any(|k| triggers.iter().any(|t| k.starts_with(t)));
        if hit {
            summary_lines.push(line.to_string());
        }
    }

    Insight {
        summary_lines,
        stats: InsightStats {
            total_similar: result.records.len(),
            successful_count: successful.len(),
            avg_relevance: normalized_avg_relevance(&result.records, keywords.len()),
        },
    }
}

/// Mean generated_field_count over successful records, rounded to the
/// nearest integer. None when no successful record carries a count.
fn average_field_count(successful: &[&MemoryRecord]) -> Option<i64> {
    let counts: Vec<i64> = successful
        .iter()
        .filter_map(|r| r.analytics.as_ref()?.generated_field_count)
        .collect();
    if counts.is_empty() {
        return None;
    }
    let sum: i64 = counts.iter().sum();
    Some((sum as f64 / counts.len() as f64).round() as i64)
}

/// First three distinct field types across successful records, in order of
/// first appearance.
fn popular_field_types(successful: &[&MemoryRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for record in successful {
        let Some(types) = record
            .analytics
            .as_ref()
            .and_then(|a| a.generated_field_types.as_ref())
        else {
            continue;
        };
        for t in types {
            if seen.len() == 3 {
                return seen;
            }
            if !seen.contains(t) {
                seen.push(t.clone());
            }
        }
    }
    seen
}

fn normalized_avg_relevance(records: &[MemoryRecord], keyword_count: usize) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let mean = records.iter().map(|r| r.relevance_score as f64).sum::<f64>()
        / records.len() as f64;
    mean / max_attainable_score(keyword_count) as f64 * 100.0
}
