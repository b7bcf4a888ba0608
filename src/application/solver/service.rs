// 最適解探索サービス

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use super::event::{SolveEvent, SolveProgress};
use crate::application::progress::{ProgressManager, ProgressStats};
use crate::constants::CELL_NUM;
use crate::domain::board::Board;
use crate::domain::search::{explore_root, ExplorationResult, ExplorationTarget};
use crate::domain::simulation::Simulator;
use crate::infrastructure::executor::{ParallelConfig, ParallelExecutor};
use crate::vlog;

/// 探索リクエスト
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub board: Board,
    pub target: ExplorationTarget,
    /// 開始位置を固定する場合のインデックス（None なら全体）
    #[serde(default)]
    pub root: Option<usize>,
}

impl SolveRequest {
    pub fn new(board: Board, target: ExplorationTarget) -> Self {
        Self {
            board,
            target,
            root: None,
        }
    }

    pub fn with_root(mut self, root: usize) -> Self {
        self.root = Some(root);
        self
    }
}

/// 探索ハンドル（別スレッドから中断・進捗確認する）
#[derive(Clone)]
pub struct SolveHandle {
    progress: Arc<ProgressManager>,
}

impl SolveHandle {
    /// 探索を中断
    pub fn abort(&self) {
        self.progress.abort();
    }

    /// 中断されたかチェック
    pub fn is_aborted(&self) -> bool {
        self.progress.is_aborted()
    }

    /// 進捗統計を取得
    pub fn get_progress(&self) -> ProgressStats {
        self.progress.get_stats()
    }
}

/// なぞりの最適解探索を管理するサービス
///
/// 並列設定があれば開始位置ごとに分けて並列に探索し、開始位置の順にまとめる。
/// 中断フラグは開始位置の切り替わりで確認する。
pub struct SolveService {
    progress: Arc<ProgressManager>,
    parallel: Option<ParallelConfig>,
    events: Option<Sender<SolveEvent>>,
}

impl SolveService {
    /// 直列で探索するサービス
    pub fn new() -> Self {
        Self {
            progress: Arc::new(ProgressManager::new()),
            parallel: None,
            events: None,
        }
    }

    /// 並列で探索する
    pub fn with_parallel(mut self, config: ParallelConfig) -> Self {
        self.parallel = Some(config);
        self
    }

    /// イベントの送信先を設定
    pub fn with_event_sender(mut self, tx: Sender<SolveEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn handle(&self) -> SolveHandle {
        SolveHandle {
            progress: Arc::clone(&self.progress),
        }
    }

    fn send(&self, event: SolveEvent) {
        if let Some(tx) = &self.events {
            // 受信側が閉じていても探索は続ける
            let _ = tx.send(event);
        }
    }

    fn progress_snapshot(&self, searching: bool, total_roots: u64) -> SolveProgress {
        let stats = self.progress.get_stats();
        SolveProgress {
            searching,
            roots_completed: stats.roots_completed,
            total_roots,
            candidates_searched: stats.candidates_searched,
            search_rate: self.progress.candidates_per_second(),
        }
    }

    /// 入力の検証
    fn validate_inputs(&self, request: &SolveRequest) -> Result<()> {
        // 盤面の妥当性チェック
        request.board.validate().context("盤面が不正です")?;

        // 探索対象の妥当性チェック
        request.target.validate().context("探索対象が不正です")?;

        if let Some(root) = request.root {
            if root >= CELL_NUM {
                return Err(anyhow!("開始位置が範囲外です: {}", root));
            }
        }

        Ok(())
    }

    /// 探索を実行（メインユースケース）
    pub fn solve(&self, request: &SolveRequest) -> Result<ExplorationResult> {
        let result = self.run(request);
        if let Err(e) = &result {
            self.send(SolveEvent::Error(format!("{:#}", e)));
        }
        result
    }

    fn run(&self, request: &SolveRequest) -> Result<ExplorationResult> {
        // 1. 事前検証
        self.validate_inputs(request)
            .context("入力の検証に失敗しました")?;

        // 2. 進捗カウンタをリセット
        self.progress.clear_counters();

        // 3. シミュレーター作成
        let simulator = request.board.to_simulator()?;
        let roots: Vec<usize> = match request.root {
            Some(root) => vec![root],
            None => (0..CELL_NUM).collect(),
        };
        let total_roots = roots.len() as u64;

        let start = Instant::now();
        let mode = match &self.parallel {
            Some(config) => format!("並列 {}スレッド", config.num_workers),
            None => "直列".to_string(),
        };
        let message = format!(
            "探索開始: {:?} 開始位置{}個 ({})",
            request.target.category, total_roots, mode
        );
        vlog!("[探索] {}", message);
        self.send(SolveEvent::Log(message));

        // 4. 開始位置ごとに探索
        let shards = match &self.parallel {
            Some(config) => {
                let executor = ParallelExecutor::new(config.clone())?
                    .with_abort_flag(self.progress.abort_flag());
                executor.map_ordered(&roots, |root| {
                    self.explore_shard(&simulator, &request.target, *root, total_roots)
                })?
            }
            None => {
                let mut shards = Vec::with_capacity(roots.len());
                for root in &roots {
                    if self.progress.is_aborted() {
                        bail!("中断されました");
                    }
                    shards.push(self.explore_shard(&simulator, &request.target, *root, total_roots)?);
                }
                shards
            }
        };

        // 5. 開始位置の順にまとめる（直列と同じ結果になる）
        let mut result = ExplorationResult::new(request.target.clone());
        for shard in shards {
            result.absorb(shard);
        }
        result.elapsed_seconds = start.elapsed().as_secs_f64();

        let message = format!(
            "探索完了: 候補{} 最適解{}件 {:.3}秒",
            result.candidates_num,
            result.optimal_solutions.len(),
            result.elapsed_seconds
        );
        vlog!("[探索] {}", message);
        self.send(SolveEvent::Log(message));
        self.send(SolveEvent::Finished(self.progress_snapshot(false, total_roots)));

        Ok(result)
    }

    /// 開始位置1つ分を探索
    fn explore_shard(
        &self,
        simulator: &Simulator,
        target: &ExplorationTarget,
        root: usize,
        total_roots: u64,
    ) -> Result<ExplorationResult> {
        let mut shard = ExplorationResult::new(target.clone());
        explore_root(simulator, target, root, &mut shard)
            .with_context(|| format!("開始位置{}の探索に失敗しました", root))?;

        self.progress.complete_root(shard.candidates_num);
        vlog!("[探索] 開始位置{} 完了: 候補{}", root, shard.candidates_num);
        self.send(SolveEvent::Progress(self.progress_snapshot(true, total_roots)));
        Ok(shard)
    }
}

impl Default for SolveService {
    fn default() -> Self {
        Self::new()
    }
}
