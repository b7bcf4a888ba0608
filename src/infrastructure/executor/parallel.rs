// 並列実行管理

use anyhow::{anyhow, bail, Result};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 並列実行設定
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// ワーカースレッド数
    pub num_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
        }
    }
}

impl ParallelConfig {
    pub fn new(num_workers: usize) -> Self {
        Self { num_workers }
    }

    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }
}

/// 並列実行エグゼキューター
///
/// 専用の rayon スレッドプールで動かし、中断フラグはタスクの開始前に見る。
pub struct ParallelExecutor {
    config: ParallelConfig,
    abort_flag: Arc<AtomicBool>,
    pool: ThreadPool,
}

impl ParallelExecutor {
    pub fn new(config: ParallelConfig) -> Result<Self> {
        if config.num_workers == 0 {
            bail!("ワーカー数は1以上である必要があります");
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_workers)
            .build()
            .map_err(|e| anyhow!("スレッドプールの作成に失敗しました: {}", e))?;
        Ok(Self {
            config,
            abort_flag: Arc::new(AtomicBool::new(false)),
            pool,
        })
    }

    /// 外部の中断フラグを共有する
    pub fn with_abort_flag(mut self, abort_flag: Arc<AtomicBool>) -> Self {
        self.abort_flag = abort_flag;
        self
    }

    /// 中断フラグを取得
    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort_flag)
    }

    /// 実行を中断
    pub fn abort(&self) {
        self.abort_flag.store(true, Ordering::Relaxed);
    }

    /// 中断されたかチェック
    pub fn is_aborted(&self) -> bool {
        self.abort_flag.load(Ordering::Relaxed)
    }

    /// ワーカー数を取得
    pub fn num_workers(&self) -> usize {
        self.config.num_workers
    }

    /// 設定を取得
    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// items を並列に処理し、入力と同じ順で結果を返す
    ///
    /// どれかが失敗するか中断されたらエラーを返す。
    pub fn map_ordered<I, R, F>(&self, items: &[I], f: F) -> Result<Vec<R>>
    where
        I: Sync,
        R: Send,
        F: Fn(&I) -> Result<R> + Sync + Send,
    {
        let abort = &self.abort_flag;
        self.pool.install(|| {
            items
                .par_iter()
                .map(|item| {
                    if abort.load(Ordering::Relaxed) {
                        bail!("中断されました");
                    }
                    f(item)
                })
                .collect::<Result<Vec<R>>>()
        })
    }
}
