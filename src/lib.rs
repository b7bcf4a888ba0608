// なぞり消し連鎖シミュレーターと最適なぞり探索 - ライブラリモジュール

pub mod constants;
pub mod domain;         // ドメイン層
pub mod application;    // アプリケーション層
pub mod infrastructure; // インフラ層
pub mod logging;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use application::{ResolveRequest, ResolveResult, SimulationService, SolveRequest, SolveService};
pub use domain::board::{Board, PuyoAttr, PuyoCoord, PuyoType};
pub use domain::chain::Chain;
pub use domain::search::{
    count_up, ExplorationCategory, ExplorationResult, ExplorationTarget, PreferenceKind, SolutionResult,
};
pub use domain::simulation::{Simulator, TraceMode};
