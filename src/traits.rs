use async_trait::async_trait;

use crate::catalog::CatalogMetadata;
use crate::code::ProductCode;
use crate::error::OrganizerError;

/// 商品コードからメタデータを取得する情報源
///
/// ページ構造への依存はこのトレイトの実装側に閉じ込め、ドライバは
/// `fetch_metadata` だけを呼び出す。
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// カタログページを取得して解析
    ///
    /// ページが存在しない（非200）場合は空の `CatalogMetadata` を返し、
    /// 通信そのものに失敗した場合のみ `Err` を返す。
    async fn fetch_metadata(&self, code: &ProductCode) -> Result<CatalogMetadata, OrganizerError>;
}
