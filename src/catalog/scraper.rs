use ::scraper::{ElementRef, Html, Selector};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, info, warn};

use super::types::CatalogMetadata;
use crate::code::ProductCode;
use crate::config::OrganizerConfig;
use crate::error::OrganizerError;
use crate::traits::MetadataSource;

const TITLE_SELECTOR: &str = "header.entry-header h1";
const COVER_HEADING_SELECTOR: &str = "h2.subhead";
const LINK_SELECTOR: &str = "a[href]";
const SCREENSHOT_SUFFIX: &str = ".jpg";

/// カタログページのURLを構築
pub fn catalog_page_url(base_url: &str, code: &ProductCode) -> String {
    format!("{}/movies/{}/", base_url.trim_end_matches('/'), code)
}

fn selector(css: &str) -> Result<Selector, OrganizerError> {
    Selector::parse(css).map_err(|e| OrganizerError::Parse(format!("{}: {:?}", css, e)))
}

/// カタログページのHTMLからメタデータを抽出
pub fn parse_catalog_page(html: &str, code: &ProductCode) -> Result<CatalogMetadata, OrganizerError> {
    let document = Html::parse_document(html);

    Ok(CatalogMetadata {
        title: extract_title(&document)?,
        cover_image_url: extract_cover_url(&document, code)?,
        screenshot_urls: extract_screenshot_urls(&document)?,
    })
}

fn extract_title(document: &Html) -> Result<Option<String>, OrganizerError> {
    let title = document
        .select(&selector(TITLE_SELECTOR)?)
        .next()
        .map(|h1| h1.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());
    Ok(title)
}

/// 「<code> Cover」見出しの後に続く最初の div 内の img からURLを取得
fn extract_cover_url(document: &Html, code: &ProductCode) -> Result<Option<String>, OrganizerError> {
    let label = format!("{} Cover", code);

    let heading = document
        .select(&selector(COVER_HEADING_SELECTOR)?)
        .find(|h2| h2.text().collect::<String>().contains(&label));
    let Some(heading) = heading else {
        debug!("カバー見出しなし: {}", label);
        return Ok(None);
    };

    let Some(container) = next_element_named(document, heading, "div") else {
        return Ok(None);
    };

    let url = container
        .select(&selector("img")?)
        .next()
        .and_then(|img| {
            let img = img.value();
            img.attr("data-src").or_else(|| img.attr("src"))
        })
        .filter(|src| !src.is_empty())
        .map(str::to_string);
    Ok(url)
}

/// 文書順で `anchor` より後に現れる最初の `name` 要素
fn next_element_named<'a>(document: &'a Html, anchor: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    let anchor_id = (*anchor).id();
    document
        .tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != anchor_id)
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == name)
}

fn extract_screenshot_urls(document: &Html) -> Result<Vec<String>, OrganizerError> {
    let urls = document
        .select(&selector(LINK_SELECTOR)?)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.ends_with(SCREENSHOT_SUFFIX))
        .map(str::to_string)
        .collect();
    Ok(urls)
}

/// 相対パスの画像URLをページURL基準の絶対URLに変換
fn resolve_image_urls(mut metadata: CatalogMetadata, page_url: &Url) -> CatalogMetadata {
    let resolve = |href: String| match page_url.join(&href) {
        Ok(url) => url.to_string(),
        Err(_) => href,
    };
    metadata.cover_image_url = metadata.cover_image_url.map(resolve);
    metadata.screenshot_urls = metadata.screenshot_urls.into_iter().map(resolve).collect();
    metadata
}

/// HTTP GET + HTML解析によるカタログスクレイパー
pub struct CatalogScraper {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogScraper {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &OrganizerConfig) -> Result<Self, OrganizerError> {
        Ok(Self::new(config.http_client()?, config.catalog_base_url.clone()))
    }
}

#[async_trait]
impl MetadataSource for CatalogScraper {
    async fn fetch_metadata(&self, code: &ProductCode) -> Result<CatalogMetadata, OrganizerError> {
        let url = catalog_page_url(&self.base_url, code);
        info!("カタログページ取得: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!("カタログページなし: {} (status={})", url, status.as_u16());
            return Ok(CatalogMetadata::default());
        }

        let page_url = response.url().clone();
        let html = response.text().await?;
        let metadata = resolve_image_urls(parse_catalog_page(&html, code)?, &page_url);

        debug!(
            "メタデータ: {}",
            serde_json::to_string(&metadata).unwrap_or_default()
        );
        Ok(metadata)
    }
}
