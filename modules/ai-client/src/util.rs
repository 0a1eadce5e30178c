/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_multibyte_chars() {
        let text = "Battle of Kőszeg";
        let truncated = truncate_to_char_boundary(text, 12);
        assert!(truncated.len() <= 12);
        assert!(text.starts_with(truncated));
        assert_eq!(truncated, "Battle of K");
    }

    #[test]
    fn truncate_within_bounds_is_identity() {
        assert_eq!(truncate_to_char_boundary("Hastings", 100), "Hastings");
    }
}
