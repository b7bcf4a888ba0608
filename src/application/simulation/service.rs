// なぞり消しシミュレーションサービス

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::board::{Board, Field, NextPuyos, PuyoCoord};
use crate::domain::chain::Chain;
use crate::vlog;

/// 1回のなぞり消しのリクエスト
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub board: Board,
    pub trace: Vec<PuyoCoord>,
}

impl ResolveRequest {
    pub fn new(board: Board, trace: Vec<PuyoCoord>) -> Self {
        Self { board, trace }
    }

    /// "A1,B2" 形式の番地リストからリクエストを作成
    pub fn from_cell_addrs(board: Board, addrs: &str) -> Result<Self> {
        let trace = addrs
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|a| PuyoCoord::from_cell_addr(a).ok_or_else(|| anyhow!("番地が不正です: {}", a)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { board, trace })
    }
}

/// なぞり消しの結果
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolveResult {
    pub chains: Vec<Chain>,
    /// 連鎖が終わった後のフィールド
    pub field: Field,
    /// 連鎖が終わった後のネクスト
    pub next_puyos: NextPuyos,
}

/// なぞりの妥当性チェック
///
/// 重複がなく、最大なぞり数以下で、2つ目以降は先になぞった座標のどれかに隣接していること。
pub fn validate_trace(trace: &[PuyoCoord], max_trace_num: usize) -> Result<()> {
    if trace.len() > max_trace_num {
        bail!("なぞり数が多すぎます: {} (最大{})", trace.len(), max_trace_num);
    }
    for (i, coord) in trace.iter().enumerate() {
        let earlier = &trace[..i];
        if earlier.contains(coord) {
            bail!("なぞり座標が重複しています: {}", coord);
        }
        if i > 0 && !earlier.iter().any(|c| c.is_adjacent_to(coord)) {
            bail!("なぞり座標が繋がっていません: {}", coord);
        }
    }
    Ok(())
}

/// なぞり消しを1回実行するサービス
#[derive(Default)]
pub struct SimulationService;

impl SimulationService {
    pub fn new() -> Self {
        Self
    }

    /// 入力の検証
    fn validate_inputs(&self, request: &ResolveRequest) -> Result<usize> {
        request.board.validate().context("盤面が不正です")?;
        let max = request.board.to_environment()?.actual_max_trace_num();
        validate_trace(&request.trace, max).context("なぞりが不正です")?;
        Ok(max)
    }

    /// なぞり消しを最後まで実行
    pub fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResult> {
        self.validate_inputs(request)
            .context("入力の検証に失敗しました")?;

        let mut simulator = request.board.to_simulator()?;
        let chains = simulator.resolve(&request.trace)?;
        vlog!(
            "[シミュレーション] なぞり{}個 -> {}連鎖",
            request.trace.len(),
            chains.len()
        );

        Ok(ResolveResult {
            chains,
            field: *simulator.field(),
            next_puyos: *simulator.next_puyos(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::{presets, PuyoType};

    fn coords(xy: &[(i32, i32)]) -> Vec<PuyoCoord> {
        xy.iter().map(|(x, y)| PuyoCoord::from_xy(*x, *y).unwrap()).collect()
    }

    fn rule1_1() -> Board {
        presets::preset("specialRule1/1")
            .unwrap()
            .unwrap()
            .with_next_all(PuyoType::Green)
    }

    #[test]
    fn resolves_valid_request() {
        let request = ResolveRequest::from_cell_addrs(rule1_1(), "F3,G3").unwrap();
        assert_eq!(request.trace, coords(&[(5, 2), (6, 2)]));
        let result = SimulationService::new().resolve(&request).unwrap();
        assert_eq!(result.chains.len(), 14);
    }

    #[test]
    fn empty_trace_is_a_no_op() {
        let board = rule1_1();
        let request = ResolveRequest::new(board.clone(), Vec::new());
        let result = SimulationService::new().resolve(&request).unwrap();
        assert!(result.chains.is_empty());
        assert_eq!(result.field.kinds(), board.field_kinds().unwrap());
    }

    #[test]
    fn rejects_duplicates_and_gaps() {
        assert!(validate_trace(&coords(&[(0, 0), (0, 0)]), 5).is_err());
        assert!(validate_trace(&coords(&[(0, 0), (2, 0)]), 5).is_err());
        assert!(validate_trace(&coords(&[(0, 0), (1, 1), (0, 2)]), 5).is_ok());
    }

    #[test]
    fn rejects_too_long_trace() {
        let trace = coords(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);
        assert!(validate_trace(&trace, 5).is_err());
        let request = ResolveRequest::new(rule1_1(), trace);
        assert!(SimulationService::new().resolve(&request).is_err());
    }

    #[test]
    fn out_of_range_coord_in_request_json_is_rejected() {
        let mut json = serde_json::to_value(ResolveRequest::new(rule1_1(), coords(&[(5, 2)]))).unwrap();
        json["trace"][0]["x"] = serde_json::json!(9);
        assert!(serde_json::from_value::<ResolveRequest>(json).is_err());
    }

    #[test]
    fn rejects_malformed_address() {
        assert!(ResolveRequest::from_cell_addrs(rule1_1(), "A1,Z9").is_err());
    }
}
