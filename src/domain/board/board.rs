// 盤面スナップショット - 外部から受け取る入力データ

use anyhow::{anyhow, Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bit_field::BitField;
use super::coord::PuyoCoord;
use super::field::{Field, NextPuyos};
use super::presets;
use super::puyo_type::{PuyoAttr, PuyoType};
use crate::constants::{
    DEFAULT_MAX_TRACE_NUM, DEFAULT_MINIMUM_PUYO_NUM_FOR_POPPING, X_NUM, Y_NUM,
};
use crate::domain::simulation::{
    KataPoppingPolicy, Leverage, MaxTraceNum, MinimumPuyoNum, SimulationEnvironment, Simulator,
    TraceMode,
};

pub type FieldKinds = [[Option<PuyoType>; X_NUM]; Y_NUM];
pub type NextKinds = [Option<PuyoType>; X_NUM];

/// 盤面と設定のスナップショット（JSONで受け渡す）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    /// 6行 x 8列。上の行から順に並ぶ
    pub field: Vec<Vec<Option<PuyoType>>>,
    /// 8列分のネクストぷよ
    pub next_puyos: Vec<Option<PuyoType>>,
    /// ブーストエリアのセル番地 ("A2" など)
    pub boost_area: Vec<String>,
    pub is_chance_mode: bool,
    pub minimum_puyo_num_for_popping: u32,
    pub max_trace_num: u32,
    pub trace_mode: TraceMode,
    pub popping_leverage: f64,
    pub chain_leverage: f64,
    pub kata_policy: KataPoppingPolicy,
}

impl Board {
    /// 空の盤面を作成
    pub fn new() -> Self {
        Self {
            field: vec![vec![None; X_NUM]; Y_NUM],
            next_puyos: vec![None; X_NUM],
            boost_area: Vec::new(),
            is_chance_mode: false,
            minimum_puyo_num_for_popping: DEFAULT_MINIMUM_PUYO_NUM_FOR_POPPING,
            max_trace_num: DEFAULT_MAX_TRACE_NUM,
            trace_mode: TraceMode::Normal,
            popping_leverage: 1.0,
            chain_leverage: 1.0,
            kata_policy: KataPoppingPolicy::Exclude,
        }
    }

    /// 1行8トークンのテキストから盤面を構築
    ///
    /// トークンは `R B G Y P`（`c` でチャンス、`+` でプラス）、
    /// `H W O K Z`、空セルは `.`。
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        if rows.len() != Y_NUM {
            return Err(anyhow!("行数が不正: 期待{}、実際{}", Y_NUM, rows.len()));
        }
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            let tokens: Vec<&str> = row.split_whitespace().collect();
            if tokens.len() != X_NUM {
                return Err(anyhow!(
                    "{}行目の列数が不正: 期待{}、実際{}",
                    y + 1,
                    X_NUM,
                    tokens.len()
                ));
            }
            for (x, token) in tokens.iter().enumerate() {
                board.field[y][x] = PuyoType::from_token(token)
                    .with_context(|| format!("{}行{}列目", y + 1, x + 1))?;
            }
        }
        Ok(board)
    }

    /// ネクストぷよを全列同じ種類にする
    pub fn with_next_all(mut self, kind: PuyoType) -> Self {
        self.next_puyos = vec![Some(kind); X_NUM];
        self
    }

    /// ネクストぷよを通常色ぷよからランダムに選ぶ
    pub fn with_random_next<R: Rng>(mut self, rng: &mut R) -> Self {
        self.next_puyos = (0..X_NUM)
            .map(|_| {
                let attr = PuyoAttr::COLORED[rng.gen_range(0..PuyoAttr::COLORED.len())];
                Some(attr.base_type())
            })
            .collect();
        self
    }

    /// キャラ名のブーストエリアを設定
    pub fn with_boost_area(mut self, key: &str) -> Result<Self> {
        let addrs = presets::boost_area(key)
            .ok_or_else(|| anyhow!("不明なブーストエリア: {}", key))?;
        self.boost_area = addrs.iter().map(|a| a.to_string()).collect();
        Ok(self)
    }

    /// 盤面の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        self.field_kinds()?;
        self.next_kinds()?;
        self.to_environment()?;
        Ok(())
    }

    /// フィールドを固定長の行列に変換（形が不正ならエラー）
    pub fn field_kinds(&self) -> Result<FieldKinds> {
        if self.field.len() != Y_NUM {
            return Err(anyhow!(
                "フィールドの行数が不正: 期待{}、実際{}",
                Y_NUM,
                self.field.len()
            ));
        }
        let mut kinds = [[None; X_NUM]; Y_NUM];
        for (y, row) in self.field.iter().enumerate() {
            if row.len() != X_NUM {
                return Err(anyhow!(
                    "フィールド{}行目の列数が不正: 期待{}、実際{}",
                    y + 1,
                    X_NUM,
                    row.len()
                ));
            }
            kinds[y].copy_from_slice(row);
        }
        Ok(kinds)
    }

    pub fn next_kinds(&self) -> Result<NextKinds> {
        if self.next_puyos.len() != X_NUM {
            return Err(anyhow!(
                "ネクストぷよの数が不正: 期待{}、実際{}",
                X_NUM,
                self.next_puyos.len()
            ));
        }
        let mut kinds = [None; X_NUM];
        kinds.copy_from_slice(&self.next_puyos);
        Ok(kinds)
    }

    /// 設定部分をValue Objectsに変換
    pub fn to_environment(&self) -> Result<SimulationEnvironment> {
        let mut boost_area = BitField::EMPTY;
        for addr in &self.boost_area {
            let coord = PuyoCoord::from_cell_addr(addr)
                .ok_or_else(|| anyhow!("ブーストエリアの番地が不正: {}", addr))?;
            boost_area.add(coord.index());
        }

        let env = SimulationEnvironment {
            boost_area,
            is_chance_mode: self.is_chance_mode,
            minimum_puyo_num_for_popping: MinimumPuyoNum::new(self.minimum_puyo_num_for_popping)?,
            max_trace_num: MaxTraceNum::new(self.max_trace_num)?,
            trace_mode: self.trace_mode,
            popping_leverage: Leverage::new(self.popping_leverage)
                .context("popping_leverage が不正です")?,
            chain_leverage: Leverage::new(self.chain_leverage)
                .context("chain_leverage が不正です")?,
            kata_policy: self.kata_policy,
        };
        env.validate()?;
        Ok(env)
    }

    /// フィールドとネクストを新しいIDのぷよで組み立てる
    pub fn to_field_and_next(&self) -> Result<(Field, NextPuyos)> {
        let field = Field::from_kinds(&self.field_kinds()?);
        let next = NextPuyos::from_kinds(&self.next_kinds()?);
        Ok((field, next))
    }

    /// この盤面で動くシミュレーターを作成
    pub fn to_simulator(&self) -> Result<Simulator> {
        Simulator::from_board(self)
    }

    /// テキスト表現（from_rows と同じ形式）
    pub fn to_text(&self) -> String {
        self.field
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(".".to_string(), PuyoType::to_token))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
