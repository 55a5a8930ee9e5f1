/// Deterministic keyword extraction for memory search
///
/// Pure text processing, no LLM call: lowercases the prompt, strips
/// punctuation, drops stop words and short tokens, then classifies the
/// survivors against a small domain taxonomy. Domain keywords are placed
/// first in the result because query composition only consumes the first
/// three entries — position is the weighting mechanism.

use regex::Regex;

/// Maximum number of keywords returned per prompt.
pub const MAX_KEYWORDS: usize = 8;

/// Tokens never worth searching on: articles, pronouns, auxiliaries, and the
/// generic verbs/nouns every form-building prompt contains.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "these", "those", "you",
    "your", "our", "ours", "their", "them", "they", "his", "her", "she",
    "him", "its", "are", "was", "were", "been", "being", "have", "has",
    "had", "does", "did", "will", "would", "can", "could", "should", "may",
    "might", "must", "shall", "from", "about", "into", "out", "some", "any",
    "all", "not", "but", "create", "make", "build", "want", "need", "help",
    "please", "like", "new", "form", "forms", "field", "fields", "add",
    "get", "use", "generate",
];

/// Domain taxonomy, ordered by how often each class carries the intent of a
/// form-building prompt. Matching is prefix-based so plurals and simple
/// inflections ("customers", "registrations") classify without stemming.
const DOMAIN_PREFIXES: &[&str] = &[
    // role nouns
    "customer", "client", "employee", "patient", "student", "member",
    "vendor", "guest", "applicant", "volunteer",
    // form-type nouns
    "feedback", "survey", "application", "registration", "contact", "order",
    "booking", "quiz", "evaluation", "assessment", "appointment", "intake",
    "enrollment", "subscription",
    // field/type nouns
    "email", "phone", "date", "time", "checkbox", "dropdown", "rating",
    "address", "upload", "signature", "number", "text",
    // industry nouns
    "healthcare", "finance", "retail", "education", "insurance",
    "restaurant", "fitness", "legal", "technology", "marketing", "nonprofit",
    // action verbs
    "collect", "track", "evaluate", "measure", "gather", "assess", "review",
    "monitor", "capture", "schedule",
];

/// Extract up to [`MAX_KEYWORDS`] salient terms from a free-text prompt.
///
/// Domain-taxonomy matches come first, then the remaining surviving tokens
/// in original order, de-duplicated. An empty, whitespace-only, or
/// all-punctuation prompt yields an empty vec — never an error.
pub fn extract_keywords(prompt: &str) -> Vec<String> {
    let lowered = prompt.to_lowercase();
    let Some(scrubbed) = scrub_non_word(&lowered) else {
        return Vec::new();
    };

    let tokens: Vec<&str> = scrubbed
        .split_whitespace()
        .filter(|t| t.len() > 2 && !STOP_WORDS.contains(t))
        .collect();

    let mut ordered: Vec<&str> = Vec::with_capacity(tokens.len());
    ordered.extend(tokens.iter().copied().filter(|t| is_domain_keyword(t)));
    ordered.extend(tokens.iter().copied().filter(|t| !is_domain_keyword(t)));

    let mut result: Vec<String> = Vec::new();
    for token in ordered {
        if result.len() == MAX_KEYWORDS {
            break;
        }
        if !result.iter().any(|k| k == token) {
            result.push(token.to_string());
        }
    }
    result
}

/// True if the token matches any taxonomy entry by prefix.
pub fn is_domain_keyword(token: &str) -> bool {
    DOMAIN_PREFIXES.iter().any(|p| token.starts_with(p))
}

/// Replace every non-word character run with a single space.
fn scrub_non_word(text: &str) -> Option<String> {
    let re = Regex::new(r"\W+").ok()?;
    Some(re.replace_all(text, " ").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_prompts() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   ").is_empty());
    }

    #[test]
    fn test_punctuation_and_numeric_prompts() {
        assert!(extract_keywords("!!! ??? ...").is_empty());
        assert!(extract_keywords("12 34 5").is_empty());
    }

    #[test]
    fn test_stop_words_and_short_tokens_dropped() {
        let keywords = extract_keywords("I want to create a form");
        assert!(keywords.is_empty(), "got {:?}", keywords);
    }

    #[test]
    fn test_domain_keywords_come_first() {
        let keywords = extract_keywords("quarterly report feedback survey");
        // "feedback" and "survey" are taxonomy matches; they must precede
        // the generic tokens regardless of prompt order.
        assert_eq!(keywords[0], "feedback");
        assert_eq!(keywords[1], "survey");
        assert!(keywords.contains(&"quarterly".to_string()));
        assert!(keywords.contains(&"report".to_string()));
    }

    #[test]
    fn test_prefix_matching_catches_plurals() {
        assert!(is_domain_keyword("customers"));
        assert!(is_domain_keyword("registrations"));
        assert!(!is_domain_keyword("quarterly"));
    }

    #[test]
    fn test_no_duplicates_and_capped_at_eight() {
        let prompt = "survey survey feedback alpha bravo charlie delta echo \
                      foxtrot golf hotel";
        let keywords = extract_keywords(prompt);
        assert!(keywords.len() <= MAX_KEYWORDS);
        let mut deduped = keywords.clone();
        deduped.dedup();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keywords.len(), "duplicate in {:?}", keywords);
    }

    #[test]
    fn test_every_keyword_longer_than_two_chars() {
        let keywords = extract_keywords("an ox is by my pc for hr on a db");
        assert!(keywords.iter().all(|k| k.len() > 2), "got {:?}", keywords);
    }

    #[test]
    fn test_customer_feedback_survey_prompt() {
        let keywords = extract_keywords("Create a customer feedback survey");
        assert!(keywords.contains(&"customer".to_string()));
        assert!(keywords.contains(&"feedback".to_string()));
        assert!(keywords.contains(&"survey".to_string()));
    }
}
