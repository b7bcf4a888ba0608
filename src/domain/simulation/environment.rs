// シミュレーション設定のValue Objects

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CELL_NUM, CHANCE_MODE_MAX_TRACE_NUM, DEFAULT_MAX_TRACE_NUM,
    DEFAULT_MINIMUM_PUYO_NUM_FOR_POPPING, MAX_TRACE_NUM_LIMIT,
};
use crate::domain::board::{BitField, PuyoAttr};

/// なぞり消しのモード
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceMode {
    /// なぞったぷよを消す
    #[default]
    Normal,
    /// なぞったぷよを指定属性の色に変える
    Recolor(PuyoAttr),
}

impl TraceMode {
    /// 色変え先が色ぷよ属性でなければエラー
    pub fn validate(&self) -> Result<()> {
        match self {
            TraceMode::Normal => Ok(()),
            TraceMode::Recolor(attr) if attr.is_colored() => Ok(()),
            TraceMode::Recolor(attr) => Err(anyhow!(
                "色変え先は色ぷよの属性である必要があります: {:?}",
                attr
            )),
        }
    }
}

/// 固ぷよを同時消し数に数えるかどうか
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KataPoppingPolicy {
    /// 数えない
    #[default]
    Exclude,
    /// 1個として数える
    Include,
}

/// 最大なぞり数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaxTraceNum(u32);

impl MaxTraceNum {
    pub fn new(num: u32) -> Result<Self> {
        if num == 0 {
            return Err(anyhow!("最大なぞり数は1以上である必要があります"));
        }
        if num as usize > MAX_TRACE_NUM_LIMIT {
            return Err(anyhow!(
                "最大なぞり数が大きすぎます: {} (上限 {})",
                num,
                MAX_TRACE_NUM_LIMIT
            ));
        }
        Ok(Self(num))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for MaxTraceNum {
    fn default() -> Self {
        Self(DEFAULT_MAX_TRACE_NUM)
    }
}

/// 消えるのに必要な最小数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumPuyoNum(u32);

impl MinimumPuyoNum {
    pub fn new(num: u32) -> Result<Self> {
        if num < 2 {
            return Err(anyhow!("最小消去数は2以上である必要があります: {}", num));
        }
        if num as usize > CELL_NUM {
            return Err(anyhow!("最小消去数が大きすぎます: {}", num));
        }
        Ok(Self(num))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for MinimumPuyoNum {
    fn default() -> Self {
        Self(DEFAULT_MINIMUM_PUYO_NUM_FOR_POPPING)
    }
}

/// 倍率係数を表すValue Object（正の有限値）
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leverage(f64);

impl Leverage {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(anyhow!("係数は正の有限値である必要があります: {}", value));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn one() -> Self {
        Self(1.0)
    }
}

impl Default for Leverage {
    fn default() -> Self {
        Self::one()
    }
}

/// シミュレーション環境（盤面以外の入力）
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationEnvironment {
    pub boost_area: BitField,
    pub is_chance_mode: bool,
    pub minimum_puyo_num_for_popping: MinimumPuyoNum,
    pub max_trace_num: MaxTraceNum,
    pub trace_mode: TraceMode,
    pub popping_leverage: Leverage,
    pub chain_leverage: Leverage,
    pub kata_policy: KataPoppingPolicy,
}

impl SimulationEnvironment {
    pub fn validate(&self) -> Result<()> {
        self.trace_mode.validate()?;
        // 残りはValue Objectsで検証済み
        Ok(())
    }

    /// 実質の最大なぞり数（チャンスモード中は5に制限）
    pub fn actual_max_trace_num(&self) -> usize {
        if self.is_chance_mode {
            CHANCE_MODE_MAX_TRACE_NUM as usize
        } else {
            self.max_trace_num.get() as usize
        }
    }

    pub fn minimum(&self) -> u32 {
        self.minimum_puyo_num_for_popping.get()
    }
}

impl Default for SimulationEnvironment {
    fn default() -> Self {
        Self {
            boost_area: BitField::EMPTY,
            is_chance_mode: false,
            minimum_puyo_num_for_popping: MinimumPuyoNum::default(),
            max_trace_num: MaxTraceNum::default(),
            trace_mode: TraceMode::Normal,
            popping_leverage: Leverage::one(),
            chain_leverage: Leverage::one(),
            kata_policy: KataPoppingPolicy::Exclude,
        }
    }
}
