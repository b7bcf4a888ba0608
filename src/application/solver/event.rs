// 最適解探索のイベント定義（表示側に依存しない）

/// 探索の進捗
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolveProgress {
    pub searching: bool,
    pub roots_completed: u64,
    pub total_roots: u64,
    pub candidates_searched: u64,
    /// なぞり/秒
    pub search_rate: f64,
}

/// 探索サービスからのイベント
#[derive(Clone, Debug)]
pub enum SolveEvent {
    /// ログメッセージ
    Log(String),
    /// 進捗更新（開始位置1つごと）
    Progress(SolveProgress),
    /// 探索完了
    Finished(SolveProgress),
    /// エラー発生
    Error(String),
}
