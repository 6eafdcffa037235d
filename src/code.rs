//! ファイル名からの商品コード抽出

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

// 英字 + ハイフン + 数字 (例: ABC-123)
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+-\d+").expect("商品コードの正規表現が不正"));

/// 商品コード
///
/// カタログの検索キーであり、整理先フォルダ名でもある。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductCode(String);

impl ProductCode {
    /// ファイル名から最も左にある商品コードを抽出
    pub fn extract(file_name: &str) -> Option<Self> {
        CODE_RE
            .find(file_name)
            .map(|m| ProductCode(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
