// なぞり探索の1分岐分の状態

use crate::constants::MAX_TRACE_NUM_LIMIT;
use crate::domain::board::{BitField, PuyoCoord, ADJACENT_TABLE};

/// 探索中のなぞりの状態
///
/// なぞった座標ごとに、そこから次になぞれる候補の集合を持つ。
/// 各候補集合どうし、および候補集合と禁止集合は常に排他的になる。
/// 候補集合を集めれば次の全候補、キーを並べればなぞり座標になる。
/// 固定長の配列だけで構成されるので分岐のたびにコピーして使う。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolutionState {
    /// 候補から外れた（なぞれない）インデックス
    forbidden: BitField,
    trace: [u8; MAX_TRACE_NUM_LIMIT],
    candidates: [BitField; MAX_TRACE_NUM_LIMIT],
    len: usize,
}

impl SolutionState {
    /// root より若いインデックスを禁止した初期状態
    pub fn for_root(root: usize) -> Self {
        Self::with_forbidden(BitField::filled_below(root))
    }

    pub fn with_forbidden(forbidden: BitField) -> Self {
        Self {
            forbidden,
            trace: [0; MAX_TRACE_NUM_LIMIT],
            candidates: [BitField::EMPTY; MAX_TRACE_NUM_LIMIT],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn forbidden(&self) -> BitField {
        self.forbidden
    }

    /// k 番目になぞったインデックスの候補集合
    pub fn candidates_of(&self, k: usize) -> BitField {
        if k < self.len {
            self.candidates[k]
        } else {
            BitField::EMPTY
        }
    }

    /// なぞったインデックス（なぞった順）
    pub fn trace_indices(&self) -> &[u8] {
        &self.trace[..self.len]
    }

    pub fn trace_coords(&self) -> Vec<PuyoCoord> {
        self.trace_indices()
            .iter()
            .filter_map(|i| PuyoCoord::from_index(*i as usize))
            .collect()
    }

    /// すべての候補集合の和
    fn assigned(&self) -> BitField {
        self.candidates[..self.len]
            .iter()
            .fold(BitField::EMPTY, |acc, c| acc.union(c))
    }

    /// 追加できる座標かどうか
    pub fn check_if_addable(&self, index: usize, max_trace_num: usize) -> bool {
        if self.len + 1 > max_trace_num.min(MAX_TRACE_NUM_LIMIT) {
            return false;
        }
        if self.forbidden.has(index) {
            return false;
        }
        if self.len == 0 {
            return true;
        }
        self.candidates[..self.len].iter().any(|c| c.has(index))
    }

    /// なぞり座標を追加する（check_if_addable が true のときだけ呼ぶ）
    pub fn add_trace_coord(&mut self, index: usize) {
        let new_set = ADJACENT_TABLE[index]
            .difference(&self.forbidden)
            .difference(&self.assigned());

        if let Some(k) = self.candidates[..self.len].iter().position(|c| c.has(index)) {
            // 前のなぞり座標の候補は探索済みなので禁止へ回す
            for kk in 0..k {
                self.forbidden = self.forbidden.union(&self.candidates[kk]);
                self.candidates[kk] = BitField::EMPTY;
            }
            let set = self.candidates[k];
            self.forbidden = self.forbidden.union(&set.at_or_below(index));
            self.candidates[k] = set.above(index);
        }

        self.trace[self.len] = index as u8;
        self.candidates[self.len] = new_set;
        self.len += 1;
        self.forbidden.add(index);
    }
}
