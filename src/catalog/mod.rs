//! カタログスクレイパーモジュール
//!
//! 商品コードごとのカタログページを取得し、タイトル・カバー画像・
//! スクリーンショットのURLを抽出する

mod scraper;
mod types;

pub use self::scraper::{catalog_page_url, parse_catalog_page, CatalogScraper};
pub use types::CatalogMetadata;
