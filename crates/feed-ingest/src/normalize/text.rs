//! Text cleanup utilities.

/// Cell values treated as absent (compared case-insensitively after trimming).
pub const MISSING_SENTINELS: &[&str] = &["", "nan", "none", "null", "n/a", "na", "-"];

/// Returns true when a cell carries no data.
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_SENTINELS
        .iter()
        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
}

/// Control characters other than tab and line breaks, which XML 1.0 forbids.
fn is_stray_control(ch: char) -> bool {
    ch.is_control() && !ch.is_whitespace()
}

/// Trims and collapses internal whitespace, dropping stray control
/// characters; `None` for missing values.
pub fn clean_text(value: &str) -> Option<String> {
    if is_missing(value) {
        return None;
    }
    let visible: String = value.chars().filter(|ch| !is_stray_control(*ch)).collect();
    let collapsed = visible.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Splits a delimiter-joined images cell into trimmed, non-empty entries.
///
/// Control characters are removed from each entry.
pub fn split_images(value: &str) -> Vec<String> {
    value
        .split([',', ';', '|', '\n', '\r'])
        .map(|part| {
            part.chars()
                .filter(|ch| !ch.is_control())
                .collect::<String>()
        })
        .map(|part| part.trim().to_string())
        .filter(|part| !is_missing(part))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_missing() {
        assert!(is_missing(""));
        assert!(is_missing("  NaN "));
        assert!(is_missing("None"));
        assert!(is_missing("N/A"));
        assert!(is_missing("-"));
        assert!(!is_missing("0"));
        assert!(!is_missing("Корпус 1"));
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text("  ЖК   Солнечный\t "),
            Some("ЖК Солнечный".to_string())
        );
        assert_eq!(clean_text("null"), None);
    }

    #[test]
    fn test_split_images_keeps_order() {
        assert_eq!(
            split_images(" http://a/1.jpg, ,http://a/2.jpg;http://a/3.jpg\n"),
            vec!["http://a/1.jpg", "http://a/2.jpg", "http://a/3.jpg"]
        );
        assert!(split_images(" , ; ").is_empty());
    }

    #[test]
    fn test_control_characters_are_dropped() {
        assert_eq!(
            clean_text("Светлая\u{1}квартира\u{1b}"),
            Some("Светлаяквартира".to_string())
        );
        assert_eq!(clean_text("\u{0}\u{7}"), None);
        assert_eq!(
            clean_text("вид\tна\u{b}парк"),
            Some("вид на парк".to_string())
        );
        assert_eq!(
            split_images("http://a/1.jpg\u{2},\u{1f}"),
            vec!["http://a/1.jpg"]
        );
    }
}
