// なぞりの最適解探索（全探索）

use std::time::Instant;

use anyhow::Result;

use super::config::ExplorationTarget;
use super::result::{ExplorationResult, SolutionResult};
use super::state::SolutionState;
use crate::constants::{CELL_NUM, MAX_TRACE_NUM_LIMIT};
use crate::domain::board::{is_traceable_cell, BitField, PuyoCoord};
use crate::domain::simulation::Simulator;
use crate::vlog;

const LOG_EXPLORER_ROOT: bool = false; // 開始位置ごとの候補数ログ

/// 探索スタックの1段
struct Frame {
    state: SolutionState,
    /// 候補を取り出し中のなぞり座標（何番目か）
    key: usize,
    /// key の候補集合のうち未処理のもの
    pending: BitField,
}

impl Frame {
    fn new(state: SolutionState) -> Self {
        Self {
            state,
            key: 0,
            pending: state.candidates_of(0),
        }
    }

    /// なぞり座標の順、各候補集合の中はインデックスの昇順に取り出す
    fn next_candidate(&mut self) -> Option<usize> {
        loop {
            if let Some(index) = self.pending.pop_lowest() {
                return Some(index);
            }
            self.key += 1;
            if self.key >= self.state.len() {
                return None;
            }
            self.pending = self.state.candidates_of(self.key);
        }
    }
}

/// root から始まるなぞりを深さ優先ですべて列挙する
///
/// なぞれるセルだけを辿り、座標の集合として同じなぞりは1度しか訪れない。
/// 新しいなぞりができるたびに on_visit を呼ぶ。
pub fn walk_traces<T, F>(root: usize, max_trace_num: usize, is_traceable: T, mut on_visit: F) -> Result<()>
where
    T: Fn(usize) -> bool,
    F: FnMut(&SolutionState) -> Result<()>,
{
    let max = max_trace_num.min(MAX_TRACE_NUM_LIMIT);
    let mut stack: Vec<Frame> = Vec::with_capacity(MAX_TRACE_NUM_LIMIT);

    let mut advance = |state: &SolutionState, index: usize| -> Result<Option<SolutionState>> {
        if !is_traceable(index) || !state.check_if_addable(index, max) {
            return Ok(None);
        }
        let mut next = *state;
        next.add_trace_coord(index);
        on_visit(&next)?;
        // これ以上伸ばせないなら積まない
        if next.len() >= max {
            return Ok(None);
        }
        Ok(Some(next))
    };

    if root >= CELL_NUM {
        return Ok(());
    }
    if let Some(state) = advance(&SolutionState::for_root(root), root)? {
        stack.push(Frame::new(state));
    }

    while let Some(frame) = stack.last_mut() {
        let Some(index) = frame.next_candidate() else {
            stack.pop();
            continue;
        };
        let state = frame.state;
        if let Some(next) = advance(&state, index)? {
            stack.push(Frame::new(next));
        }
    }

    Ok(())
}

/// root を開始位置とするなぞりを試して result に記録する
pub fn explore_root(
    simulator: &Simulator,
    target: &ExplorationTarget,
    root: usize,
    result: &mut ExplorationResult,
) -> Result<()> {
    let before = result.candidates_num;
    let field = simulator.field();
    let is_traceable = |index: usize| {
        PuyoCoord::from_index(index)
            .map(|c| is_traceable_cell(field.kind(c)))
            .unwrap_or(false)
    };

    walk_traces(root, simulator.actual_max_trace_num(), is_traceable, |state| {
        let trace_coords = state.trace_coords();
        let mut sim = simulator.clone();
        let chains = sim.resolve(&trace_coords)?;
        result.record(SolutionResult::from_chains(trace_coords, chains, target));
        Ok(())
    })?;

    if LOG_EXPLORER_ROOT {
        vlog!("[探索] 開始位置{}: 候補{}", root, result.candidates_num - before);
    }
    Ok(())
}

/// 最大なぞり数を超えない範囲で全てのなぞりを試して最適解を求める
pub fn solve_all_traces(simulator: &Simulator, target: &ExplorationTarget) -> Result<ExplorationResult> {
    let start = Instant::now();
    let mut result = ExplorationResult::new(target.clone());
    for root in 0..CELL_NUM {
        explore_root(simulator, target, root, &mut result)?;
    }
    result.elapsed_seconds = start.elapsed().as_secs_f64();
    Ok(result)
}

/// なぞり開始位置を固定して最適解を求める
///
/// index より若いインデックスを含むなぞりは探索しない。
pub fn solve_traces_including_index(
    simulator: &Simulator,
    target: &ExplorationTarget,
    index: usize,
) -> Result<ExplorationResult> {
    let start = Instant::now();
    let mut result = ExplorationResult::new(target.clone());
    explore_root(simulator, target, index, &mut result)?;
    result.elapsed_seconds = start.elapsed().as_secs_f64();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::{presets, Board, PuyoAttr, PuyoType};
    use crate::domain::search::config::ExplorationCategory;

    fn rule1_1() -> Simulator {
        let board = presets::preset("specialRule1/1")
            .unwrap()
            .unwrap()
            .with_next_all(PuyoType::Green);
        Simulator::from_board(&board).unwrap()
    }

    #[test]
    fn rule1_1_green_damage_search() {
        let sim = rule1_1();
        let target = ExplorationTarget::new(ExplorationCategory::damage_of(PuyoAttr::Green));
        let result = solve_all_traces(&sim, &target).unwrap();

        assert_eq!(result.candidates_num, 15359);
        let best = result.best().unwrap();
        let expected: Vec<PuyoCoord> = [(5, 2), (6, 2)]
            .iter()
            .map(|(x, y)| PuyoCoord::from_xy(*x, *y).unwrap())
            .collect();
        assert_eq!(best.trace_coords, expected);
        assert!((best.value - 109.0).abs() < 1e-6);
        assert!((best.total_damages.green - 109.0).abs() < 1e-6);
    }

    #[test]
    fn roots_partition_the_whole_search() {
        let sim = rule1_1();
        let target = ExplorationTarget::new(ExplorationCategory::PuyoTsukaiCount);
        let whole = solve_all_traces(&sim, &target).unwrap();
        let sum: u64 = (0..CELL_NUM)
            .map(|i| solve_traces_including_index(&sim, &target, i).unwrap().candidates_num)
            .sum();
        assert_eq!(whole.candidates_num, sum);
    }

    #[test]
    fn non_traceable_root_yields_nothing() {
        let board = Board::from_rows(&[
            "O . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
            ". . . . . . . .",
        ])
        .unwrap();
        let sim = Simulator::from_board(&board).unwrap();
        let result = solve_traces_including_index(&sim, &ExplorationTarget::default(), 0).unwrap();
        assert_eq!(result.candidates_num, 0);
        assert!(result.best().is_none());
    }

    #[test]
    fn empty_board_has_no_solution() {
        let sim = Simulator::from_board(&Board::new()).unwrap();
        let result = solve_all_traces(&sim, &ExplorationTarget::default()).unwrap();
        assert_eq!(result.candidates_num, 0);
        assert!(result.optimal_solutions.is_empty());
    }

    #[test]
    fn top_n_is_sorted_best_first() {
        let sim = rule1_1();
        let target = ExplorationTarget::new(ExplorationCategory::damage_of(PuyoAttr::Green))
            .with_optimal_solution_count(5)
            .unwrap();
        let result = solve_traces_including_index(&sim, &target, 21).unwrap();
        assert!(result.optimal_solutions.len() <= 5);
        for pair in result.optimal_solutions.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
    }
}
