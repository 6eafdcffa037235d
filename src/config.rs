use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://www.javdatabase.com";

/// RUST_LOG 未設定時のログフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,catalog_organizer=info";

#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// 走査・整理対象のディレクトリ
    pub work_dir: PathBuf,
    /// カタログサイトのベースURL（末尾スラッシュなし）
    pub catalog_base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl OrganizerConfig {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_catalog_base_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// 共有HTTPクライアントを生成
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
    }
}
