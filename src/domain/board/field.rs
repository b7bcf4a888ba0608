// フィールド（6行x8列）とネクストぷよ

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

use super::coord::PuyoCoord;
use super::puyo_type::PuyoType;
use crate::constants::{X_NUM, Y_NUM};

static NEXT_PUYO_ID: AtomicU32 = AtomicU32::new(1);

/// プロセス内で一意なぷよIDを払い出す
pub fn generate_puyo_id() -> u32 {
    NEXT_PUYO_ID.fetch_add(1, Ordering::Relaxed)
}

/// フィールド上のぷよ
///
/// id は差分表示の識別用で、シミュレーションの結果には影響しない。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puyo {
    pub id: u32,
    pub kind: PuyoType,
}

impl Puyo {
    /// 新しいIDでぷよを作成
    pub fn new(kind: PuyoType) -> Self {
        Self {
            id: generate_puyo_id(),
            kind,
        }
    }
}

pub type Cells = [[Option<Puyo>; X_NUM]; Y_NUM];

/// 6x8 のぷよ行列
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    cells: Cells,
}

impl Field {
    /// 空のフィールドを作成
    pub fn new() -> Self {
        Self {
            cells: [[None; X_NUM]; Y_NUM],
        }
    }

    /// 種類の行列からフィールドを作成（IDは新規に払い出す）
    pub fn from_kinds(kinds: &[[Option<PuyoType>; X_NUM]; Y_NUM]) -> Self {
        let mut field = Self::new();
        for (y, row) in kinds.iter().enumerate() {
            for (x, kind) in row.iter().enumerate() {
                field.cells[y][x] = kind.map(Puyo::new);
            }
        }
        field
    }

    pub fn get(&self, coord: PuyoCoord) -> Option<Puyo> {
        self.cells[coord.y()][coord.x()]
    }

    /// セルを取得（範囲外はNone）
    pub fn get_xy(&self, x: usize, y: usize) -> Option<Puyo> {
        self.cells.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    pub fn kind(&self, coord: PuyoCoord) -> Option<PuyoType> {
        self.get(coord).map(|p| p.kind)
    }

    pub fn set(&mut self, coord: PuyoCoord, puyo: Option<Puyo>) {
        self.cells[coord.y()][coord.x()] = puyo;
    }

    /// セルのぷよを取り除いて返す
    pub fn take(&mut self, coord: PuyoCoord) -> Option<Puyo> {
        self.cells[coord.y()][coord.x()].take()
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Cells {
        &mut self.cells
    }

    /// 種類だけの行列
    pub fn kinds(&self) -> [[Option<PuyoType>; X_NUM]; Y_NUM] {
        let mut kinds = [[None; X_NUM]; Y_NUM];
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                kinds[y][x] = cell.map(|p| p.kind);
            }
        }
        kinds
    }

    /// 全セルが空かどうか
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(Option::is_none))
    }

    /// 列のぷよ数
    pub fn column_count(&self, x: usize) -> usize {
        self.cells.iter().filter(|row| row[x].is_some()).count()
    }

    /// テキスト表示（1行8トークン）
    pub fn to_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(".".to_string(), |p| p.kind.to_token()))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

/// ネクストぷよ（列ごとに1つ）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPuyos {
    slots: [Option<Puyo>; X_NUM],
}

impl NextPuyos {
    pub fn new() -> Self {
        Self {
            slots: [None; X_NUM],
        }
    }

    pub fn from_kinds(kinds: &[Option<PuyoType>; X_NUM]) -> Self {
        let mut next = Self::new();
        for (x, kind) in kinds.iter().enumerate() {
            next.slots[x] = kind.map(Puyo::new);
        }
        next
    }

    pub fn get(&self, x: usize) -> Option<Puyo> {
        self.slots.get(x).copied().flatten()
    }

    /// 列のネクストを取り出す（以後その列は空）
    pub fn take(&mut self, x: usize) -> Option<Puyo> {
        self.slots.get_mut(x).and_then(Option::take)
    }

    pub fn kinds(&self) -> [Option<PuyoType>; X_NUM] {
        let mut kinds = [None; X_NUM];
        for (x, slot) in self.slots.iter().enumerate() {
            kinds[x] = slot.map(|p| p.kind);
        }
        kinds
    }
}

impl Default for NextPuyos {
    fn default() -> Self {
        Self::new()
    }
}
