use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;
use tracing::{info, warn};

use crate::code::ProductCode;
use crate::config::OrganizerConfig;
use crate::download::{screenshot_file_name, ImageDownload, ImageDownloader, COVER_FILE_NAME};
use crate::error::OrganizerError;
use crate::organizer::{destination_file_name, move_file, prepare_destination};
use crate::sanitize::sanitize_title;
use crate::traits::MetadataSource;

/// 整理リクエスト（作業ディレクトリ内のファイル1件）
#[derive(Debug, Clone)]
pub struct OrganizeRequest {
    pub path: PathBuf,
}

impl OrganizeRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// 整理結果
///
/// 移動に失敗しても画像のダウンロードは行うため、それぞれの結果を保持する。
#[derive(Debug)]
pub struct OrganizeReport {
    pub code: ProductCode,
    pub folder: PathBuf,
    pub moved_to: Result<PathBuf, OrganizerError>,
    pub images: Vec<ImageDownload>,
}

impl OrganizeReport {
    pub fn is_moved(&self) -> bool {
        self.moved_to.is_ok()
    }

    pub fn image_failures(&self) -> usize {
        self.images.iter().filter(|i| i.result.is_err()).count()
    }
}

/// tower::Serviceを実装したファイル整理サービス
///
/// `Err` はそのファイルの処理を打ち切ったことを表す（コードなし、メタデータなし、
/// 通信エラー、フォルダ作成失敗）。移動・画像の失敗は `OrganizeReport` に記録される。
pub struct OrganizerService<S> {
    source: Arc<S>,
    downloader: Arc<ImageDownloader>,
    work_dir: Arc<PathBuf>,
}

impl<S> Clone for OrganizerService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            downloader: Arc::clone(&self.downloader),
            work_dir: Arc::clone(&self.work_dir),
        }
    }
}

impl<S: MetadataSource> OrganizerService<S> {
    pub fn new(source: S, downloader: ImageDownloader, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Arc::new(source),
            downloader: Arc::new(downloader),
            work_dir: Arc::new(work_dir.into()),
        }
    }

    pub fn from_config(config: &OrganizerConfig, source: S) -> Result<Self, OrganizerError> {
        let downloader = ImageDownloader::new(config.http_client()?);
        Ok(Self::new(source, downloader, config.work_dir.clone()))
    }
}

impl<S: MetadataSource + 'static> Service<OrganizeRequest> for OrganizerService<S> {
    type Response = OrganizeReport;
    type Error = OrganizerError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: OrganizeRequest) -> Self::Future {
        let this = self.clone();

        Box::pin(async move {
            let file_name = req.file_name();
            let code = ProductCode::extract(&file_name)
                .ok_or_else(|| OrganizerError::NoCodeMatch(file_name.clone()))?;
            info!("処理開始: {} (コード: {})", file_name, code);

            let metadata = this.source.fetch_metadata(&code).await?;
            let title = metadata
                .title
                .as_deref()
                .ok_or_else(|| OrganizerError::MetadataNotFound(code.to_string()))?;
            let sanitized = sanitize_title(title);

            let folder = prepare_destination(&this.work_dir, &code).await?;
            let destination = folder.join(destination_file_name(&req.path, &sanitized));

            let moved_to = move_file(&req.path, &destination)
                .await
                .map(|()| destination);
            if let Err(e) = &moved_to {
                warn!("{}", e);
            }

            let mut images = Vec::with_capacity(metadata.screenshot_urls.len() + 1);
            if let Some(cover_url) = &metadata.cover_image_url {
                images.push(this.downloader.fetch(cover_url, &folder, COVER_FILE_NAME).await);
            }
            for (i, url) in metadata.screenshot_urls.iter().enumerate() {
                let name = screenshot_file_name(&code, i + 1);
                images.push(this.downloader.fetch(url, &folder, &name).await);
            }

            let report = OrganizeReport {
                code,
                folder,
                moved_to,
                images,
            };
            info!(
                "処理完了: {} (画像 {}件中 失敗 {}件)",
                report.code,
                report.images.len(),
                report.image_failures()
            );
            Ok(report)
        })
    }
}
