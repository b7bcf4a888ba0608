// 進捗管理

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 進捗統計
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressStats {
    /// 探索し終えた開始位置の数
    pub roots_completed: u64,
    /// 試したなぞりの数
    pub candidates_searched: u64,
}

/// 進捗マネージャー
///
/// カウンタは開始位置を1つ探索し終えるごとに更新する。
pub struct ProgressManager {
    abort_flag: Arc<AtomicBool>,
    roots_completed: AtomicU64,
    candidates_searched: AtomicU64,
    start_time: Instant,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            abort_flag: Arc::new(AtomicBool::new(false)),
            roots_completed: AtomicU64::new(0),
            candidates_searched: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// 検索中断フラグを取得
    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort_flag)
    }

    /// 検索を中断
    pub fn abort(&self) {
        self.abort_flag.store(true, Ordering::Relaxed);
    }

    /// 中断されたかチェック
    pub fn is_aborted(&self) -> bool {
        self.abort_flag.load(Ordering::Relaxed)
    }

    /// 開始位置1つ分の探索完了を記録
    pub fn complete_root(&self, candidates: u64) {
        self.candidates_searched.fetch_add(candidates, Ordering::Relaxed);
        self.roots_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// 現在の統計を取得
    pub fn get_stats(&self) -> ProgressStats {
        ProgressStats {
            roots_completed: self.roots_completed.load(Ordering::Relaxed),
            candidates_searched: self.candidates_searched.load(Ordering::Relaxed),
        }
    }

    /// 経過時間を取得
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 探索速度（なぞり/秒）を取得
    pub fn candidates_per_second(&self) -> f64 {
        let candidates = self.candidates_searched.load(Ordering::Relaxed) as f64;
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            candidates / elapsed
        } else {
            0.0
        }
    }

    /// カウンタを0に戻す（中断フラグはそのまま）
    pub fn clear_counters(&self) {
        self.roots_completed.store(0, Ordering::Relaxed);
        self.candidates_searched.store(0, Ordering::Relaxed);
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
