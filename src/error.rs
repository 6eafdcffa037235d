use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("商品コードが見つかりません: {0}")]
    NoCodeMatch(String),

    #[error("メタデータが取得できません: {0}")]
    MetadataNotFound(String),

    #[error("通信エラー: {0}")]
    Network(String),

    #[error("ファイル移動エラー: {from} -> {to}: {reason}")]
    FileMove {
        from: String,
        to: String,
        reason: String,
    },

    #[error("画像ダウンロード失敗: {url} (status={status})")]
    ImageDownload { url: String, status: u16 },

    #[error("HTML解析エラー: {0}")]
    Parse(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),
}

impl From<reqwest::Error> for OrganizerError {
    fn from(e: reqwest::Error) -> Self {
        OrganizerError::Network(e.to_string())
    }
}
