//! Helpers for optional free-text fields.

/// Trimmed text or `None` if the text is empty or only whitespace.
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn is_blank(text: Option<&str>) -> bool {
    text.map(|v| v.trim().is_empty()).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_blank() {
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(""), None);
        assert!(is_blank(Some(" \t")));
        assert!(is_blank(None));
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(non_blank("  Helsinki "), Some("Helsinki".to_string()));
        assert!(!is_blank(Some("a")));
    }
}
