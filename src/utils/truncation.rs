/// Field bounds for normalized findings. Oversized values are truncated,
/// never rejected: a finding is worth keeping even when a scanner dumps an
/// enormous snippet into it.
pub const MAX_TITLE_LEN: usize = 500;
pub const MAX_FILE_LEN: usize = 1_000;
pub const MAX_CODE_LEN: usize = 1_000;
pub const MAX_METADATA_LEN: usize = 500;

/// Truncate `value` to at most `max` characters, keeping a valid prefix.
/// Counts characters rather than bytes so a multi-byte character is never
/// split in half.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

pub fn truncate_title(value: &str) -> String {
    truncate_chars(value, MAX_TITLE_LEN)
}

pub fn truncate_file(value: &str) -> String {
    truncate_chars(value, MAX_FILE_LEN)
}

pub fn truncate_code(value: &str) -> String {
    truncate_chars(value, MAX_CODE_LEN)
}

pub fn truncate_metadata(value: &str) -> String {
    truncate_chars(value, MAX_METADATA_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_pass_through() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn long_values_cut_to_exact_length() {
        let long = "x".repeat(2_000);
        let cut = truncate_title(&long);
        assert_eq!(cut.chars().count(), MAX_TITLE_LEN);
        assert!(long.starts_with(&cut));
    }

    #[test]
    fn exact_length_is_untouched() {
        let exact = "y".repeat(MAX_TITLE_LEN);
        assert_eq!(truncate_title(&exact), exact);
    }

    #[test]
    fn multibyte_characters_are_not_split() {
        // Each snowman is 3 bytes; count by chars, cut on a char boundary.
        let snowmen = "☃".repeat(600);
        let cut = truncate_title(&snowmen);
        assert_eq!(cut.chars().count(), 500);
        assert!(cut.chars().all(|c| c == '☃'));
    }

    #[test]
    fn metadata_bound_is_500() {
        let long = "m".repeat(501);
        assert_eq!(truncate_metadata(&long).len(), 500);
    }
}
