// ビットフィールド - 48セル分の集合を24bit x 2ワードで表現

use serde::{Deserialize, Serialize};

use crate::constants::{CELL_NUM, WORD_BITS, WORD_MASK};

/// 48セル分の固定長集合
///
/// word0 がインデックス 0..24、word1 が 24..48 を受け持つ。
/// ヒープ確保なしで複製できるので探索のノードごとに使い捨てる。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitField {
    words: [u32; 2],
}

impl BitField {
    pub const EMPTY: BitField = BitField { words: [0, 0] };
    pub const FULL: BitField = BitField {
        words: [WORD_MASK, WORD_MASK],
    };

    /// 空の集合を作成
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// [0, index) をすべて含む集合を作成（48以上なら全セル）
    pub fn filled_below(index: usize) -> Self {
        if index >= CELL_NUM {
            return Self::FULL;
        }
        if index >= WORD_BITS {
            return Self {
                words: [WORD_MASK, (1u32 << (index - WORD_BITS)) - 1],
            };
        }
        Self {
            words: [(1u32 << index) - 1, 0],
        }
    }

    const fn split(index: usize) -> (usize, u32) {
        (index / WORD_BITS, 1u32 << (index % WORD_BITS))
    }

    /// 要素を追加した集合を返す（const 文脈用）
    pub const fn with(self, index: usize) -> Self {
        if index >= CELL_NUM {
            return self;
        }
        let (w, bit) = Self::split(index);
        let mut words = self.words;
        words[w] |= bit;
        Self { words }
    }

    pub fn has(&self, index: usize) -> bool {
        if index >= CELL_NUM {
            return false;
        }
        let (w, bit) = Self::split(index);
        self.words[w] & bit != 0
    }

    pub fn add(&mut self, index: usize) {
        if index >= CELL_NUM {
            return;
        }
        let (w, bit) = Self::split(index);
        self.words[w] |= bit;
    }

    pub fn remove(&mut self, index: usize) {
        if index >= CELL_NUM {
            return;
        }
        let (w, bit) = Self::split(index);
        self.words[w] &= !bit;
    }

    pub fn is_empty(&self) -> bool {
        self.words[0] == 0 && self.words[1] == 0
    }

    pub fn len(&self) -> usize {
        (self.words[0].count_ones() + self.words[1].count_ones()) as usize
    }

    pub fn union(&self, other: &BitField) -> BitField {
        BitField {
            words: [self.words[0] | other.words[0], self.words[1] | other.words[1]],
        }
    }

    pub fn intersection(&self, other: &BitField) -> BitField {
        BitField {
            words: [self.words[0] & other.words[0], self.words[1] & other.words[1]],
        }
    }

    pub fn difference(&self, other: &BitField) -> BitField {
        BitField {
            words: [self.words[0] & !other.words[0], self.words[1] & !other.words[1]],
        }
    }

    /// index より大きい要素だけの集合
    pub fn above(&self, index: usize) -> BitField {
        self.difference(&Self::filled_below(index + 1))
    }

    /// index 以下の要素だけの集合
    pub fn at_or_below(&self, index: usize) -> BitField {
        self.intersection(&Self::filled_below(index + 1))
    }

    /// 最小の要素を取り出して削除する
    pub fn pop_lowest(&mut self) -> Option<usize> {
        for w in 0..2 {
            let word = self.words[w];
            if word != 0 {
                let bit = word.trailing_zeros() as usize;
                self.words[w] &= word - 1;
                return Some(w * WORD_BITS + bit);
            }
        }
        None
    }

    /// 要素を昇順に列挙
    pub fn iter(&self) -> BitFieldIter {
        BitFieldIter { rest: *self }
    }
}

/// BitField の昇順イテレーター
pub struct BitFieldIter {
    rest: BitField,
}

impl Iterator for BitFieldIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.rest.pop_lowest()
    }
}

impl FromIterator<usize> for BitField {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut field = BitField::EMPTY;
        for i in iter {
            field.add(i);
        }
        field
    }
}
