use chrono::{DateTime, Utc};
use regex::{escape, Regex};

/// Display helpers shared by the presentation layer. Pure string work,
/// no terminal I/O.

pub fn format_date(published: Option<&DateTime<Utc>>) -> String {
    match published {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}

/// Truncate to `max` characters, ellipsis included. Char-aware so
/// multibyte titles never split mid-codepoint.
pub fn truncate(text: &str, max: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "N/A".to_string();
    }
    if trimmed.chars().count() <= max {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Wrap every case-insensitive keyword occurrence with `mark`. The marker
/// is injected so the caller decides how a match renders (ANSI styling,
/// plain brackets in tests).
pub fn highlight_keywords(
    text: &str,
    keywords: &[String],
    mark: impl Fn(&str) -> String,
) -> String {
    let mut result = text.to_string();
    for keyword in keywords {
        if keyword.is_empty() {
            continue;
        }
        let Ok(pattern) = Regex::new(&format!("(?i){}", escape(keyword))) else {
            continue;
        };
        result = pattern
            .replace_all(&result, |caps: &regex::Captures| mark(&caps[0]))
            .into_owned();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bracket(m: &str) -> String {
        format!("[{m}]")
    }

    // ==================== format_date ====================

    #[test]
    fn test_format_date() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(format_date(Some(&dt)), "2024-03-01 08:30");
    }

    #[test]
    fn test_format_missing_date() {
        assert_eq!(format_date(None), "N/A");
    }

    // ==================== truncate ====================

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("short headline", 100), "short headline");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        let result = truncate("abcdefghij", 8);
        assert_eq!(result, "abcde...");
        assert_eq!(result.chars().count(), 8);
    }

    #[test]
    fn test_truncate_trims_whitespace() {
        assert_eq!(truncate("  padded  ", 100), "padded");
    }

    #[test]
    fn test_truncate_empty_is_na() {
        assert_eq!(truncate("", 10), "N/A");
        assert_eq!(truncate("   ", 10), "N/A");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let result = truncate("héllo wörld ünïcode everywhere", 12);
        assert_eq!(result.chars().count(), 12);
        assert!(result.ends_with("..."));
    }

    // ==================== highlight_keywords ====================

    #[test]
    fn test_highlight_case_insensitive() {
        let result = highlight_keywords(
            "Rust rules, RUST forever",
            &["rust".to_string()],
            bracket,
        );
        assert_eq!(result, "[Rust] rules, [RUST] forever");
    }

    #[test]
    fn test_highlight_multiple_keywords() {
        let result = highlight_keywords(
            "breaking climate news",
            &["climate".to_string(), "news".to_string()],
            bracket,
        );
        assert_eq!(result, "breaking [climate] [news]");
    }

    #[test]
    fn test_highlight_regex_metacharacters_escaped() {
        let result = highlight_keywords("price is $5.00 today", &["$5.00".to_string()], bracket);
        assert_eq!(result, "price is [$5.00] today");
    }

    #[test]
    fn test_highlight_no_keywords_is_identity() {
        assert_eq!(highlight_keywords("unchanged", &[], bracket), "unchanged");
    }

    #[test]
    fn test_highlight_empty_keyword_skipped() {
        assert_eq!(
            highlight_keywords("text", &[String::new()], bracket),
            "text"
        );
    }
}
