//! タイトルをファイル名として安全な形に変換

/// ファイル名に使えない文字 (Windows の予約文字)
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// 切り詰め後の最大文字数
pub const MAX_TITLE_CHARS: usize = 150;

const ELLIPSIS: &str = "...";

/// タイトルから予約文字を削除し、150文字を超える場合は切り詰めて `...` を付与
///
/// 予約文字は置換せずに削除する（`"Great: Scene/Title"` → `"Great SceneTitle"`）。
/// 長さはバイトではなく文字数で数える。
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect();

    match cleaned.char_indices().nth(MAX_TITLE_CHARS) {
        Some((cut, _)) => format!("{}{}", &cleaned[..cut], ELLIPSIS),
        None => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_reserved_chars_without_replacement() {
        assert_eq!(sanitize_title("Great: Scene/Title"), "Great SceneTitle");
        assert_eq!(sanitize_title(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
    }

    #[test]
    fn test_keeps_ordinary_text() {
        assert_eq!(sanitize_title("Plain Title - Part 2"), "Plain Title - Part 2");
        assert_eq!(sanitize_title("日本語のタイトル"), "日本語のタイトル");
    }

    #[test]
    fn test_truncates_long_title() {
        let title = "a".repeat(200);
        let sanitized = sanitize_title(&title);
        assert_eq!(sanitized.chars().count(), 153);
        assert!(sanitized.ends_with("..."));
        assert_eq!(&sanitized[..150], "a".repeat(150));
    }

    #[test]
    fn test_exactly_max_is_not_truncated() {
        let title = "b".repeat(MAX_TITLE_CHARS);
        assert_eq!(sanitize_title(&title), title);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let title = "あ".repeat(160);
        let sanitized = sanitize_title(&title);
        assert_eq!(sanitized.chars().count(), 153);
        assert!(sanitized.starts_with(&"あ".repeat(150)));
    }

    #[test]
    fn test_length_measured_after_removal() {
        // 予約文字を除くと150文字ちょうどになる
        let title = format!("{}{}", "c".repeat(150), "?".repeat(20));
        assert_eq!(sanitize_title(&title), "c".repeat(150));
    }

    #[test]
    fn test_idempotent_under_limit() {
        for title in ["Great: Scene/Title", "already clean", "", "x*y*z"] {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once);
        }
    }
}
