// 盤面座標のValue Object

use serde::{Deserialize, Serialize};
use std::fmt;

use super::bit_field::BitField;
use crate::constants::{CELL_NUM, X_NUM, Y_NUM};

/// フィールド上の座標 (x: 0..8, y: 0..6)
///
/// 値型なので同じ (x, y) は常に同一視でき、そのままキーとして使える。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawCoord")]
pub struct PuyoCoord {
    x: u8,
    y: u8,
}

/// 逆シリアライズ用（範囲チェック前）
#[derive(Deserialize)]
struct RawCoord {
    x: i32,
    y: i32,
}

impl TryFrom<RawCoord> for PuyoCoord {
    type Error = String;

    fn try_from(raw: RawCoord) -> Result<Self, Self::Error> {
        PuyoCoord::from_xy(raw.x, raw.y).ok_or_else(|| format!("座標が範囲外です: ({}, {})", raw.x, raw.y))
    }
}

const fn build_all_coords() -> [PuyoCoord; CELL_NUM] {
    let mut coords = [PuyoCoord { x: 0, y: 0 }; CELL_NUM];
    let mut i = 0;
    while i < CELL_NUM {
        coords[i] = PuyoCoord {
            x: (i % X_NUM) as u8,
            y: (i / X_NUM) as u8,
        };
        i += 1;
    }
    coords
}

const fn build_adjacent_table() -> [BitField; CELL_NUM] {
    let mut table = [BitField::EMPTY; CELL_NUM];
    let mut i = 0;
    while i < CELL_NUM {
        let x = (i % X_NUM) as i32;
        let y = (i / X_NUM) as i32;
        let mut field = BitField::EMPTY;
        let mut dy = -1;
        while dy <= 1 {
            let mut dx = -1;
            while dx <= 1 {
                let nx = x + dx;
                let ny = y + dy;
                if !(dx == 0 && dy == 0)
                    && nx >= 0
                    && nx < X_NUM as i32
                    && ny >= 0
                    && ny < Y_NUM as i32
                {
                    field = field.with((ny as usize) * X_NUM + nx as usize);
                }
                dx += 1;
            }
            dy += 1;
        }
        table[i] = field;
        i += 1;
    }
    table
}

/// インデックス順の全座標
pub const ALL_COORDS: [PuyoCoord; CELL_NUM] = build_all_coords();

/// 各インデックスの8近傍をビットフィールドで持つテーブル
pub const ADJACENT_TABLE: [BitField; CELL_NUM] = build_adjacent_table();

impl PuyoCoord {
    /// (x, y) から座標を得る（範囲外はNone）
    pub fn from_xy(x: i32, y: i32) -> Option<Self> {
        if x < 0 || y < 0 || x >= X_NUM as i32 || y >= Y_NUM as i32 {
            return None;
        }
        Some(ALL_COORDS[y as usize * X_NUM + x as usize])
    }

    /// インデックスから座標を得る（範囲外はNone）
    pub fn from_index(index: usize) -> Option<Self> {
        ALL_COORDS.get(index).copied()
    }

    /// "A1" 形式のセル番地から座標を得る
    pub fn from_cell_addr(addr: &str) -> Option<Self> {
        let mut chars = addr.trim().chars();
        let col = chars.next()?.to_ascii_uppercase();
        let row = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !col.is_ascii_uppercase() || !row.is_ascii_digit() {
            return None;
        }
        let x = col as i32 - 'A' as i32;
        let y = row as i32 - '1' as i32;
        Self::from_xy(x, y)
    }

    pub fn x(&self) -> usize {
        self.x as usize
    }

    pub fn y(&self) -> usize {
        self.y as usize
    }

    /// 線形インデックス (y * 8 + x)
    pub fn index(&self) -> usize {
        self.y as usize * X_NUM + self.x as usize
    }

    pub fn to_cell_addr(&self) -> String {
        format!("{}{}", (b'A' + self.x) as char, self.y + 1)
    }

    /// 8近傍の座標（範囲内のみ、インデックス昇順）
    pub fn adjacent_coords(&self) -> Vec<PuyoCoord> {
        ADJACENT_TABLE[self.index()]
            .iter()
            .map(|i| ALL_COORDS[i])
            .collect()
    }

    /// 上下左右の座標（範囲外はNone）。順序は左、上、右、下
    pub fn orthogonal_coords(&self) -> [Option<PuyoCoord>; 4] {
        let (x, y) = (self.x as i32, self.y as i32);
        [
            Self::from_xy(x - 1, y),
            Self::from_xy(x, y - 1),
            Self::from_xy(x + 1, y),
            Self::from_xy(x, y + 1),
        ]
    }

    pub fn is_adjacent_to(&self, other: &PuyoCoord) -> bool {
        ADJACENT_TABLE[self.index()].has(other.index())
    }
}

impl fmt::Display for PuyoCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell_addr())
    }
}
