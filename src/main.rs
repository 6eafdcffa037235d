use catalog_organizer::config::DEFAULT_LOG_FILTER;
use catalog_organizer::{runner, OrganizerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // ログ設定（RUST_LOG で上書き可能）
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .init();

    let work_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("作業ディレクトリを取得できません: {}", e);
            std::process::exit(1);
        }
    };

    let config = OrganizerConfig::new(work_dir);
    if let Err(e) = runner::run(&config).await {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}
