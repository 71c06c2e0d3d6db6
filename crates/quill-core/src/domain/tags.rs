/// Split a comma-separated tag string into the stored tag list.
///
/// Entries are trimmed, blanks dropped, and duplicates removed keeping the
/// first occurrence.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_blank_entries_and_trims() {
        assert_eq!(
            parse_tags("AI, Machine Learning, , Tutorial"),
            vec!["AI", "Machine Learning", "Tutorial"]
        );
    }

    #[test]
    fn test_dedupes_preserving_first_occurrence() {
        assert_eq!(parse_tags("rust, ai ,rust,AI"), vec!["rust", "ai", "AI"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }
}
