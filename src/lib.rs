//! 商品コード付きファイルの整理ライブラリ
//!
//! - ファイル名から商品コード (例: `ABC-123`) を抽出
//! - カタログサイトからタイトル・カバー画像・スクリーンショットを取得
//! - `<code>/<タイトル>.<拡張子>` に移動し、画像を同じフォルダに保存
//!
//! # 使用例
//!
//! ```rust,ignore
//! use catalog_organizer::{runner, OrganizerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OrganizerConfig::new("./videos");
//!     let summary = runner::run(&config).await.unwrap();
//!     println!("organized: {}", summary.organized);
//! }
//! ```
//!
//! # 1ファイルだけ処理する場合
//!
//! ```rust,ignore
//! use catalog_organizer::{CatalogScraper, OrganizeRequest, OrganizerConfig, OrganizerService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OrganizerConfig::new("./videos");
//!     let scraper = CatalogScraper::from_config(&config).unwrap();
//!     let mut service = OrganizerService::from_config(&config, scraper).unwrap();
//!
//!     let report = service
//!         .call(OrganizeRequest::new("./videos/Sample-ID-042.avi"))
//!         .await
//!         .unwrap();
//!     println!("moved: {:?}", report.moved_to);
//! }
//! ```

pub mod catalog;
pub mod code;
pub mod config;
pub mod download;
pub mod error;
pub mod organizer;
pub mod runner;
pub mod sanitize;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use catalog::{CatalogMetadata, CatalogScraper};
pub use code::ProductCode;
pub use config::OrganizerConfig;
pub use download::ImageDownloader;
pub use error::OrganizerError;
pub use runner::RunSummary;
pub use sanitize::sanitize_title;
pub use service::{OrganizeReport, OrganizeRequest, OrganizerService};
pub use traits::MetadataSource;
