//! Small field validators shared by the services.

/// Good enough for a form check; the mail server has the final word.
pub(crate) fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Profile links must be absolute http(s) URLs.
pub(crate) fn is_valid_link(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Usernames: 3–30 chars from [A-Za-z0-9_.-].
pub(crate) fn is_valid_username(s: &str) -> bool {
    (3..=30).contains(&s.len())
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Empty or whitespace-only form inputs become None.
pub(crate) fn none_if_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("plain"));
    }

    #[test]
    fn username_shapes() {
        assert!(is_valid_username("wren.h-01"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }

    #[test]
    fn blank_normalization() {
        assert_eq!(none_if_blank("  ".into()), None);
        assert_eq!(none_if_blank(" x ".into()), Some("x".into()));
    }
}
