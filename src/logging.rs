use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// グローバルな詳細ログフラグ
pub static VERBOSE_LOGGING: AtomicBool = AtomicBool::new(false);

/// ログファイルのグローバルハンドル
static LOG_FILE: Mutex<Option<std::fs::File>> = Mutex::new(None);

/// ログファイルを開く
pub fn init_log_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut log_file = LOG_FILE.lock().unwrap_or_else(|e| e.into_inner());
    *log_file = Some(file);
    Ok(())
}

/// ログファイルを閉じる
pub fn close_log_file() {
    let mut log_file = LOG_FILE.lock().unwrap_or_else(|e| e.into_inner());
    *log_file = None;
}

/// ログをファイルに書き込む
pub fn write_log(message: String) {
    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(ref mut file) = *log_file {
            let _ = writeln!(file, "{}", message);
            let _ = file.flush();
        }
    }
}

/// 詳細ログを有効にする
pub fn enable_verbose_logging() {
    VERBOSE_LOGGING.store(true, Ordering::Relaxed);
}

/// 詳細ログを無効にする
pub fn disable_verbose_logging() {
    VERBOSE_LOGGING.store(false, Ordering::Relaxed);
}

/// 詳細ログが有効かチェック
pub fn is_verbose() -> bool {
    VERBOSE_LOGGING.load(Ordering::Relaxed)
}

/// 詳細ログ出力マクロ（ファイル出力）
#[macro_export]
macro_rules! vlog {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            let message = format!($($arg)*);
            $crate::logging::write_log(message);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_toggles() {
        enable_verbose_logging();
        assert!(is_verbose());
        disable_verbose_logging();
        assert!(!is_verbose());
    }

    #[test]
    fn log_file_receives_messages() {
        let path = std::env::temp_dir().join(format!("nazori_log_{}.txt", std::process::id()));
        init_log_file(&path).unwrap();
        write_log("連鎖ログ".to_string());
        close_log_file();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("連鎖ログ"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn write_log_without_file_is_noop() {
        close_log_file();
        write_log("ignored".to_string());
    }
}
