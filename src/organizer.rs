//! 商品コードフォルダへの移動・リネーム

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::code::ProductCode;
use crate::error::OrganizerError;

/// `<work_dir>/<code>` を作成（既に存在してもエラーにしない）
pub async fn prepare_destination(work_dir: &Path, code: &ProductCode) -> std::io::Result<PathBuf> {
    let folder = work_dir.join(code.as_str());
    tokio::fs::create_dir_all(&folder).await?;
    debug!("整理先フォルダ: {:?}", folder);
    Ok(folder)
}

/// 整理後のファイル名（サニタイズ済みタイトル + 元の拡張子）
///
/// 拡張子はUTF-8でなくてもそのまま引き継ぐ。
pub fn destination_file_name(original: &Path, sanitized_title: &str) -> OsString {
    let mut name = OsString::from(sanitized_title);
    if let Some(ext) = original.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// ファイルを移動する
///
/// 移動先が既に存在する場合は上書きせずにエラー。別ファイルシステム間で
/// rename できない場合に限り、コピー後に元ファイルを削除する。
pub async fn move_file(source: &Path, destination: &Path) -> Result<(), OrganizerError> {
    let move_error = |reason: String| OrganizerError::FileMove {
        from: source.display().to_string(),
        to: destination.display().to_string(),
        reason,
    };

    if tokio::fs::try_exists(destination).await.unwrap_or(false) {
        return Err(move_error("移動先に同名ファイルが存在します".into()));
    }

    match tokio::fs::rename(source, destination).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!("別ファイルシステムへの移動、コピーで代替: {}", e);
            copy_then_remove(source, destination)
                .await
                .map_err(|e| move_error(e.to_string()))?;
        }
        Err(e) => return Err(move_error(e.to_string())),
    }

    info!("ファイルを移動: {:?} -> {:?}", source, destination);
    Ok(())
}

/// コピーしてから元ファイルを削除
///
/// 途中で失敗した場合は移動先のコピーを削除し、元ファイルだけが残る状態に戻す。
async fn copy_then_remove(source: &Path, destination: &Path) -> std::io::Result<()> {
    if let Err(e) = tokio::fs::copy(source, destination).await {
        discard_copy(destination).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::remove_file(source).await {
        discard_copy(destination).await;
        return Err(std::io::Error::new(
            e.kind(),
            format!("コピー後の元ファイル削除に失敗: {}", e),
        ));
    }
    Ok(())
}

async fn discard_copy(destination: &Path) {
    if let Err(e) = tokio::fs::remove_file(destination).await {
        if e.kind() != ErrorKind::NotFound {
            warn!("コピー先の削除に失敗: {:?}: {}", destination, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ProductCode {
        ProductCode::extract(s).unwrap()
    }

    #[test]
    fn test_destination_file_name_keeps_extension() {
        assert_eq!(
            destination_file_name(Path::new("Sample-ID-042.avi"), "Great SceneTitle"),
            "Great SceneTitle.avi"
        );
        assert_eq!(
            destination_file_name(Path::new("a.b.ABC-1.tar.gz"), "Title"),
            "Title.gz"
        );
        assert_eq!(destination_file_name(Path::new("ABC-1"), "Title"), "Title");
    }

    #[tokio::test]
    async fn test_prepare_destination_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let first = prepare_destination(dir.path(), &code("ABC-123")).await.unwrap();
        let second = prepare_destination(dir.path(), &code("ABC-123")).await.unwrap();

        assert_eq!(first, dir.path().join("ABC-123"));
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[tokio::test]
    async fn test_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x-ABC-123.mp4");
        std::fs::write(&source, b"video").unwrap();
        let folder = prepare_destination(dir.path(), &code("ABC-123")).await.unwrap();
        let destination = folder.join("Title.mp4");

        move_file(&source, &destination).await.unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"video");
    }

    #[tokio::test]
    async fn test_move_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("x-ABC-123.mp4");
        std::fs::write(&source, b"new").unwrap();
        let destination = dir.path().join("existing.mp4");
        std::fs::write(&destination, b"old").unwrap();

        let err = move_file(&source, &destination).await.unwrap_err();

        assert!(matches!(err, OrganizerError::FileMove { .. }));
        assert_eq!(std::fs::read(&source).unwrap(), b"new");
        assert_eq!(std::fs::read(&destination).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_move_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = move_file(&dir.path().join("gone.mp4"), &dir.path().join("t.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrganizerError::FileMove { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_destination_file_name_keeps_non_utf8_extension() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let original = Path::new(OsStr::from_bytes(b"ABC-1.m\xffv"));
        let name = destination_file_name(original, "Title");
        assert_eq!(name.as_bytes(), b"Title.m\xffv");
    }

    #[tokio::test]
    async fn test_copy_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("ABC-1.mp4");
        std::fs::write(&source, b"video").unwrap();
        let destination = dir.path().join("Title.mp4");

        copy_then_remove(&source, &destination).await.unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"video");
    }

    #[tokio::test]
    async fn test_copy_failure_leaves_no_destination() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("Title.mp4");

        assert!(copy_then_remove(&dir.path().join("gone.mp4"), &destination)
            .await
            .is_err());
        assert!(!destination.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remove_failure_discards_copy() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        let source = locked.join("ABC-1.mp4");
        std::fs::write(&source, b"video").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        // root はパーミッションを無視するので確認できない
        if std::fs::write(locked.join("write-check"), b"").is_ok() {
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let destination = dir.path().join("Title.mp4");
        let result = copy_then_remove(&source, &destination).await;
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(result.is_err());
        assert_eq!(std::fs::read(&source).unwrap(), b"video");
        assert!(!destination.exists());
    }
}
