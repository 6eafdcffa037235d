//! カタログ関連の型定義

use serde::Serialize;

/// カタログページから抽出したメタデータ
///
/// ページが存在しない場合はすべて空（`Default`）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogMetadata {
    /// ヘッダー内の h1 テキスト
    pub title: Option<String>,
    /// カバー画像URL (data-src 優先)
    pub cover_image_url: Option<String>,
    /// `.jpg` へのリンク（文書順・重複あり）
    pub screenshot_urls: Vec<String>,
}
