//! 画像のダウンロード

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::StatusCode;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, warn};

use crate::code::ProductCode;
use crate::error::OrganizerError;

/// カバー画像の保存名（実際の画像形式に関わらず固定）
pub const COVER_FILE_NAME: &str = "a_cover.webp";

/// 書き込みバッファサイズ
const WRITE_CHUNK_SIZE: usize = 1024;

const PARTIAL_SUFFIX: &str = ".part";

/// スクリーンショットの保存名 (`<code>_screenshot_<n>.jpg`, n は1始まり)
pub fn screenshot_file_name(code: &ProductCode, index: usize) -> String {
    format!("{}_screenshot_{}.jpg", code, index)
}

/// ダウンロードした（または失敗した）画像1件の記録
#[derive(Debug)]
pub struct ImageDownload {
    pub url: String,
    pub file_name: String,
    pub result: Result<PathBuf, OrganizerError>,
}

pub struct ImageDownloader {
    client: reqwest::Client,
}

impl ImageDownloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// URLの内容を `folder/file_name` に保存
    ///
    /// 200以外のレスポンスではファイルを作成しない。本文は `.part` ファイルに
    /// 書き込み、完了後にリネームする。
    pub async fn download(
        &self,
        url: &str,
        folder: &Path,
        file_name: &str,
    ) -> Result<PathBuf, OrganizerError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(OrganizerError::ImageDownload {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let target = folder.join(file_name);
        let partial = folder.join(format!("{}{}", file_name, PARTIAL_SUFFIX));

        if let Err(e) = write_body(response, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        tokio::fs::rename(&partial, &target).await?;

        Ok(target)
    }

    /// ダウンロードしてログを出力し、結果を記録として返す
    pub async fn fetch(&self, url: &str, folder: &Path, file_name: &str) -> ImageDownload {
        let result = self.download(url, folder, file_name).await;
        match &result {
            Ok(path) => info!("ダウンロード完了: {:?}", path),
            Err(e) => warn!("ダウンロード失敗: {}: {}", file_name, e),
        }
        ImageDownload {
            url: url.to_string(),
            file_name: file_name.to_string(),
            result,
        }
    }
}

async fn write_body(response: reqwest::Response, path: &Path) -> Result<(), OrganizerError> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::with_capacity(WRITE_CHUNK_SIZE, file);

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        writer.write_all(&chunk?).await?;
    }
    writer.flush().await?;
    Ok(())
}
