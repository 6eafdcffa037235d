//! 作業ディレクトリを走査し、ファイルを1件ずつ整理サービスに渡す

use std::path::PathBuf;

use futures::future::poll_fn;
use serde::Serialize;
use tower::Service;
use tracing::{debug, info, warn};

use crate::catalog::CatalogScraper;
use crate::config::OrganizerConfig;
use crate::error::OrganizerError;
use crate::service::{OrganizeReport, OrganizeRequest, OrganizerService};
use crate::traits::MetadataSource;

/// 1回の実行結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub scanned: usize,
    pub organized: usize,
    pub skipped_not_file: usize,
    pub skipped_no_code: usize,
    pub skipped_no_metadata: usize,
    /// 通信エラー・フォルダ作成失敗などで処理を打ち切ったファイル
    pub failed: usize,
    pub move_failures: usize,
    pub image_failures: usize,
}

impl RunSummary {
    fn record_report(&mut self, report: &OrganizeReport) {
        self.organized += 1;
        if !report.is_moved() {
            self.move_failures += 1;
        }
        self.image_failures += report.image_failures();
    }

    fn record_error(&mut self, err: &OrganizerError) {
        match err {
            OrganizerError::NoCodeMatch(name) => {
                info!("スキップ: {} (商品コードなし)", name);
                self.skipped_no_code += 1;
            }
            OrganizerError::MetadataNotFound(code) => {
                warn!("タイトルを取得できませんでした: {}", code);
                self.skipped_no_metadata += 1;
            }
            other => {
                warn!("処理失敗: {}", other);
                self.failed += 1;
            }
        }
    }
}

/// カタログサイトを情報源として作業ディレクトリを整理
pub async fn run(config: &OrganizerConfig) -> Result<RunSummary, OrganizerError> {
    let source = CatalogScraper::from_config(config)?;
    run_with_source(config, source).await
}

/// 任意の情報源で作業ディレクトリを整理
pub async fn run_with_source<S>(config: &OrganizerConfig, source: S) -> Result<RunSummary, OrganizerError>
where
    S: MetadataSource + 'static,
{
    let mut service = OrganizerService::from_config(config, source)?;
    run_with_service(config, &mut service).await
}

/// 作業ディレクトリ直下のエントリを順に処理
///
/// ディレクトリ一覧の取得に失敗した場合のみ `Err`。各ファイルの失敗は
/// ログに出力して次のエントリへ進む。
pub async fn run_with_service<T>(config: &OrganizerConfig, service: &mut T) -> Result<RunSummary, OrganizerError>
where
    T: Service<OrganizeRequest, Response = OrganizeReport, Error = OrganizerError>,
{
    info!("整理開始: {:?}", config.work_dir);

    // 処理中に作成されるフォルダを拾わないよう、先に一覧を確定させる
    let entries = list_entries(config).await?;
    let mut summary = RunSummary::default();

    for path in entries {
        summary.scanned += 1;

        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            info!("スキップ: {:?} (ファイルではありません)", path);
            summary.skipped_not_file += 1;
            continue;
        }

        poll_fn(|cx| service.poll_ready(cx)).await?;
        match service.call(OrganizeRequest::new(path)).await {
            Ok(report) => summary.record_report(&report),
            Err(e) => summary.record_error(&e),
        }
    }

    info!(
        "整理完了: 走査 {}件, 整理 {}件, スキップ {}件, 失敗 {}件",
        summary.scanned,
        summary.organized,
        summary.skipped_not_file + summary.skipped_no_code + summary.skipped_no_metadata,
        summary.failed
    );
    debug!(
        "集計: {}",
        serde_json::to_string(&summary).unwrap_or_default()
    );
    Ok(summary)
}

async fn list_entries(config: &OrganizerConfig) -> Result<Vec<PathBuf>, OrganizerError> {
    let mut dir = tokio::fs::read_dir(&config.work_dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        entries.push(entry.path());
    }
    Ok(entries)
}
