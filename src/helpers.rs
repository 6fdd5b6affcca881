use once_cell::sync::Lazy;
use regex::Regex;

/// Looks for "<N> volume(s) ... complete" in the free-text status field.
static VOLUME_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)((\d+).*volume.).*(complete)(.*)").unwrap());

/// Normalize a query or title for searching and fuzzy comparison. Literal
/// queries are passed through untouched apart from surrounding whitespace.
pub fn sanitize_title(value: &str, literal: bool) -> String {
    if literal {
        return value.trim().to_string();
    }
    let lowered = value.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity of two titles on a 0-100 scale.
pub fn title_ratio(a: &str, b: &str) -> u32 {
    let a = sanitize_title(a, false);
    let b = sanitize_title(b, false);
    (strsim::normalized_levenshtein(&a, &b) * 100.0).round() as u32
}

/// Approximate title match against a 0-100 threshold.
pub fn titles_match(search: &str, title: &str, threshold: u32) -> bool {
    title_ratio(search, title) >= threshold
}

/// Lenient integer parse for fields the API serves as strings ("2005").
pub fn xlate_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    value.parse::<f64>().ok().map(|f| f as i64)
}

/// Volume count from the status text; only trusted when the pattern matches.
pub fn parse_volume_count(status: &str) -> Option<i64> {
    VOLUME_COUNT
        .captures(status)
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_punctuation_and_case() {
        assert_eq!(sanitize_title("Berserk: The Prototype!", false), "berserk the prototype");
        assert_eq!(sanitize_title("  Berserk: The Prototype! ", true), "Berserk: The Prototype!");
    }

    #[test]
    fn titles_match_uses_threshold() {
        assert!(titles_match("great adventure", "Great Adventure", 90));
        assert!(titles_match("great adventure", "great adventures", 90));
        assert!(!titles_match("great adventure", "completely different", 50));
    }

    #[test]
    fn xlate_int_handles_strings_and_floats() {
        assert_eq!(xlate_int("2005"), Some(2005));
        assert_eq!(xlate_int(" 2005 "), Some(2005));
        assert_eq!(xlate_int("2005.0"), Some(2005));
        assert_eq!(xlate_int("n/a"), None);
    }

    #[test]
    fn volume_count_needs_complete_marker() {
        assert_eq!(parse_volume_count("10 Volumes (Complete)"), Some(10));
        assert_eq!(parse_volume_count("3 volumes (ongoing, complete in Japan)"), Some(3));
        assert_eq!(parse_volume_count("12 Volumes (Ongoing)"), None);
        assert_eq!(parse_volume_count("Complete"), None);
    }
}
