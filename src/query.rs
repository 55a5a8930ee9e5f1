/// Search query composition
///
/// Builds the query string sent to the memory store from the raw prompt and
/// the extracted keywords. The store treats very short or empty queries
/// unpredictably, so a fixed fallback guarantees it never receives one.

/// Fallback query used when the prompt yields nothing searchable.
pub const FALLBACK_QUERY: &str = "recent form interactions";

/// Number of keywords appended to the prompt when composing a query.
const QUERY_KEYWORD_COUNT: usize = 3;

/// Compose the search query: trimmed prompt plus the first three keywords.
///
/// Returns [`FALLBACK_QUERY`] when the prompt is blank or the composed
/// string is shorter than three characters. Never returns an empty or
/// whitespace-only string.
pub fn compose_query(prompt: &str, keywords: &[String]) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return FALLBACK_QUERY.to_string();
    }

    let head: Vec<&str> = keywords
        .iter()
        .take(QUERY_KEYWORD_COUNT)
        .map(String::as_str)
        .collect();

    let composed = format!("{} {}", trimmed, head.join(" "));
    let composed = composed.trim().to_string();

    if composed.len() < 3 {
        return FALLBACK_QUERY.to_string();
    }
    composed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_and_keywords_falls_back() {
        assert_eq!(compose_query("", &[]), FALLBACK_QUERY);
        assert_eq!(compose_query("   ", &[]), FALLBACK_QUERY);
    }

    #[test]
    fn test_tiny_composed_query_falls_back() {
        assert_eq!(compose_query("ab", &[]), FALLBACK_QUERY);
    }

    #[test]
    fn test_prompt_with_keywords() {
        let keywords = vec![
            "customer".to_string(),
            "feedback".to_string(),
            "survey".to_string(),
            "extra".to_string(),
        ];
        let query = compose_query("Create a customer feedback survey", &keywords);
        assert_eq!(
            query,
            "Create a customer feedback survey customer feedback survey"
        );
    }

    #[test]
    fn test_never_shorter_than_three_chars() {
        for prompt in ["", "a", "xy", "hello", "  x  "] {
            assert!(compose_query(prompt, &[]).len() >= 3);
        }
    }

    #[test]
    fn test_only_first_three_keywords_used() {
        let keywords: Vec<String> =
            ["one", "two", "three", "four"].iter().map(|s| s.to_string()).collect();
        let query = compose_query("prompt", &keywords);
        assert_eq!(query, "prompt one two three");
    }
}
