// 連鎖結果の定義

use serde::{Deserialize, Serialize};

use crate::domain::board::{PuyoAttr, ATTR_NUM};

/// 属性ごとの1連鎖分の結果
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeChain {
    /// 攻撃力（ダメージ量の項）
    pub strength: f64,
    /// 消えた数（プラスぷよは2個分）
    pub popped_num: u32,
    /// 分離して消えたブロック数
    pub separated_blocks_num: u32,
}

/// ワイルド（全色）としての1連鎖分の結果
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WildChain {
    pub strength: f64,
    pub separated_blocks_num: u32,
}

/// 1連鎖分の結果
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    /// 連鎖数（1始まり）
    pub chain_num: u32,
    /// 同時消し数
    pub popped_puyo_num: u32,
    /// ブーストカウント
    pub boost_count: u32,
    /// ぷよ使いカウント
    pub puyo_tsukai_count: u32,
    /// 属性ごとの結果（添字は PuyoAttr::slot）
    pub attributes: [Option<AttributeChain>; ATTR_NUM],
    pub wild: WildChain,
    /// 消えたチャンスぷよの数
    pub popped_chance_num: u32,
    /// このとき全消しになったか
    pub is_all_cleared: bool,
}

impl Chain {
    pub fn new(chain_num: u32) -> Self {
        Self {
            chain_num,
            popped_puyo_num: 0,
            boost_count: 0,
            puyo_tsukai_count: 0,
            attributes: [None; ATTR_NUM],
            wild: WildChain::default(),
            popped_chance_num: 0,
            is_all_cleared: false,
        }
    }

    pub fn attr(&self, attr: PuyoAttr) -> Option<&AttributeChain> {
        self.attributes[attr.slot()].as_ref()
    }

    pub fn set_attr(&mut self, attr: PuyoAttr, chain: AttributeChain) {
        self.attributes[attr.slot()] = Some(chain);
    }

    /// 記録のある属性を列挙
    pub fn attrs(&self) -> impl Iterator<Item = (PuyoAttr, &AttributeChain)> {
        PuyoAttr::ALL
            .iter()
            .filter_map(move |a| self.attr(*a).map(|c| (*a, c)))
    }

    pub fn is_chance_popped(&self) -> bool {
        self.popped_chance_num > 0
    }

    pub fn is_prism_popped(&self) -> bool {
        self.attr(PuyoAttr::Prism).is_some()
    }
}
