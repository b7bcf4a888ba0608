// 連鎖シミュレーター

use anyhow::{bail, Context, Result};

use super::detector::{detect_pop_blocks, PopBlock};
use super::environment::{KataPoppingPolicy, SimulationEnvironment, TraceMode};
use crate::constants::{PRISM_STRENGTH_PER_PUYO, X_NUM, Y_NUM};
use crate::domain::board::{BitField, Board, Field, NextPuyos, Puyo, PuyoAttr, PuyoCoord, PuyoType, ALL_COORDS};
use crate::domain::chain::{
    chain_factor, damage_term, popping_factor, AttributeChain, Chain, PoppingFactorParams,
    WildChain,
};
use crate::vlog;

const LOG_SIM_CHAIN_DETAIL: bool = false; // 連鎖ごとの詳細ログ（盤面表示など）

/// フィールドとネクストを所有し、なぞり消しを最後まで解決する
///
/// `resolve` は自身の状態を書き換える。元の状態が必要なら先に clone する。
#[derive(Clone, Debug)]
pub struct Simulator {
    field: Field,
    next_puyos: NextPuyos,
    environment: SimulationEnvironment,
    current_chain_num: u32,
}

impl Simulator {
    pub fn new(field: Field, next_puyos: NextPuyos, environment: SimulationEnvironment) -> Result<Self> {
        environment.validate().context("シミュレーション環境が不正です")?;
        Ok(Self {
            field,
            next_puyos,
            environment,
            current_chain_num: 0,
        })
    }

    /// 盤面スナップショットから作成
    pub fn from_board(board: &Board) -> Result<Self> {
        let environment = board.to_environment()?;
        let (field, next_puyos) = board.to_field_and_next()?;
        Self::new(field, next_puyos, environment)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn next_puyos(&self) -> &NextPuyos {
        &self.next_puyos
    }

    pub fn environment(&self) -> &SimulationEnvironment {
        &self.environment
    }

    /// 実質の最大なぞり数
    pub fn actual_max_trace_num(&self) -> usize {
        self.environment.actual_max_trace_num()
    }

    /// 現在のフィールドで消えるブロック
    pub fn detect_pop_blocks(&self) -> Vec<PopBlock> {
        detect_pop_blocks(&self.field, self.environment.minimum())
    }

    /// なぞったぷよを消す（あるいは色を変える）ところから最後まで連鎖を続ける
    ///
    /// なぞりが空なら何もしない。通常モードでなぞったぷよを消すこと自体は
    /// 連鎖に数えず、その後に消えたブロックから1連鎖目とする。
    pub fn resolve(&mut self, trace_coords: &[PuyoCoord]) -> Result<Vec<Chain>> {
        self.current_chain_num = 0;
        let mut chains = Vec::new();

        if trace_coords.is_empty() {
            return Ok(chains);
        }

        if !self.pop_tracing_puyos(trace_coords, &mut chains)? {
            return Ok(chains);
        }

        while self.drop_in_field() {
            self.pop_puyo_blocks(&mut chains)?;
        }

        while self.drop_next_into_field() {
            if self.pop_puyo_blocks(&mut chains)? {
                while self.drop_in_field() {
                    self.pop_puyo_blocks(&mut chains)?;
                }
            }
        }

        self.current_chain_num = 0;
        Ok(chains)
    }

    /// 通常モードならなぞったぷよを消す。色変えモードなら色を変えて消えるものを消す。
    fn pop_tracing_puyos(&mut self, trace_coords: &[PuyoCoord], chains: &mut Vec<Chain>) -> Result<bool> {
        match self.environment.trace_mode {
            TraceMode::Normal => {
                for c in trace_coords {
                    self.field.take(*c);
                }
                Ok(true)
            }
            TraceMode::Recolor(attr) => {
                if !attr.is_colored() {
                    bail!("色変え先が不正です: {:?}", attr);
                }
                for c in trace_coords {
                    if let Some(p) = self.field.get(*c) {
                        self.field.set(
                            *c,
                            Some(Puyo {
                                id: p.id,
                                kind: p.kind.recolor(attr),
                            }),
                        );
                    }
                }
                self.pop_puyo_blocks(chains)
            }
        }
    }

    /// 消えるブロックがあれば消して1連鎖分を記録する
    fn pop_puyo_blocks(&mut self, chains: &mut Vec<Chain>) -> Result<bool> {
        let blocks = self.detect_pop_blocks();
        if blocks.is_empty() {
            return Ok(false);
        }

        self.current_chain_num += 1;
        let chain_num = self.current_chain_num;
        let mut chain = Chain::new(chain_num);
        chain.popped_puyo_num = self.calc_popped_puyo_num(&blocks);
        chain.boost_count = self.calc_boost_count(&blocks);
        chain.puyo_tsukai_count = self.calc_puyo_tsukai_count(&blocks);

        let params = PoppingFactorParams::new(
            self.environment.minimum(),
            self.environment.popping_leverage.get(),
        );
        let cf = chain_factor(chain_num, self.environment.chain_leverage.get())?;

        let mut total_separated = 0;
        for attr in PuyoAttr::COLORED {
            let mut separated = 0;
            let mut popped = 0;
            for block in blocks.iter().filter(|b| b.attr == attr) {
                separated += 1;
                popped += self.weighted_count(block.cells);
            }
            if separated == 0 {
                continue;
            }
            let strength = damage_term(1.0, popping_factor(chain.popped_puyo_num, separated, &params), cf);
            chain.set_attr(
                attr,
                AttributeChain {
                    strength,
                    popped_num: popped,
                    separated_blocks_num: separated,
                },
            );
            total_separated += separated;
        }

        for block in blocks.iter().filter(|b| !b.attr.is_colored()) {
            let size = block.size() as u32;
            let strength = if block.attr == PuyoAttr::Prism {
                PRISM_STRENGTH_PER_PUYO * size as f64
            } else {
                0.0
            };
            chain.set_attr(
                block.attr,
                AttributeChain {
                    strength,
                    popped_num: size,
                    separated_blocks_num: 0,
                },
            );
        }

        chain.wild = WildChain {
            strength: damage_term(1.0, popping_factor(chain.popped_puyo_num, total_separated, &params), cf),
            separated_blocks_num: total_separated,
        };

        for block in &blocks {
            for i in block.cells.iter() {
                let coord = ALL_COORDS[i];
                if block.attr == PuyoAttr::Kata {
                    // 固ぷよは消えずにおじゃまになる
                    if let Some(p) = self.field.get(coord) {
                        self.field.set(
                            coord,
                            Some(Puyo {
                                id: p.id,
                                kind: PuyoType::Ojama,
                            }),
                        );
                    }
                } else if let Some(p) = self.field.take(coord) {
                    if p.kind.is_chance() {
                        chain.popped_chance_num += 1;
                    }
                }
            }
        }

        chain.is_all_cleared = self.field.is_empty();

        if LOG_SIM_CHAIN_DETAIL {
            vlog!(
                "[シミュレーター] {}連鎖目: 同時消し{} ブースト{} ぷよ使い{}",
                chain_num,
                chain.popped_puyo_num,
                chain.boost_count,
                chain.puyo_tsukai_count
            );
            vlog!("{}", self.field.to_text());
        }

        chains.push(chain);
        Ok(true)
    }

    /// プラスぷよを2個として数えた色ぷよの数
    fn weighted_count(&self, cells: BitField) -> u32 {
        cells
            .iter()
            .filter_map(|i| self.field.kind(ALL_COORDS[i]))
            .map(|k| if k.is_plus() { 2 } else { 1 })
            .sum()
    }

    /// 同時消し数
    fn calc_popped_puyo_num(&self, blocks: &[PopBlock]) -> u32 {
        blocks
            .iter()
            .map(|block| {
                if block.attr.is_colored() {
                    return self.weighted_count(block.cells);
                }
                match block.attr {
                    PuyoAttr::Heart => 0,
                    PuyoAttr::Kata => match self.environment.kata_policy {
                        KataPoppingPolicy::Exclude => 0,
                        KataPoppingPolicy::Include => block.size() as u32,
                    },
                    _ => block.size() as u32,
                }
            })
            .sum()
    }

    fn in_boost_area(&self, index: usize) -> bool {
        self.environment.boost_area.has(index)
    }

    fn calc_boost_count(&self, blocks: &[PopBlock]) -> u32 {
        blocks
            .iter()
            .map(|block| {
                let boosted = block.cells.intersection(&self.environment.boost_area);
                match block.attr {
                    attr if attr.is_colored() => self.weighted_count(boosted),
                    PuyoAttr::Kata | PuyoAttr::Padding => 0,
                    _ => boosted.len() as u32,
                }
            })
            .sum()
    }

    fn calc_puyo_tsukai_count(&self, blocks: &[PopBlock]) -> u32 {
        blocks
            .iter()
            .map(|block| match block.attr {
                PuyoAttr::Kata | PuyoAttr::Padding => 0,
                attr => block
                    .cells
                    .iter()
                    .map(|i| {
                        let boost_factor = if self.in_boost_area(i) { 3 } else { 1 };
                        let plus_factor = match self.field.kind(ALL_COORDS[i]) {
                            Some(k) if attr.is_colored() && k.is_plus() => 2,
                            _ => 1,
                        };
                        plus_factor * boost_factor
                    })
                    .sum::<u32>(),
            })
            .sum()
    }

    /// 列の隙間を詰めてぷよを落とす（ネクストはそのまま）
    fn drop_in_field(&mut self) -> bool {
        let mut dropped = false;
        let cells = self.field.cells_mut();

        for x in 0..X_NUM {
            let mut column = [None; Y_NUM];
            let mut n = 0;
            for y in (0..Y_NUM).rev() {
                if let Some(p) = cells[y][x] {
                    column[n] = Some(p);
                    n += 1;
                }
            }
            for (ry, puyo) in column.iter().enumerate() {
                let y = Y_NUM - 1 - ry;
                if cells[y][x] != *puyo {
                    cells[y][x] = *puyo;
                    dropped = true;
                }
            }
        }

        dropped
    }

    /// 埋まっていない列にネクストぷよを落とし、その上を空きぷよで埋める
    fn drop_next_into_field(&mut self) -> bool {
        let mut dropped = false;

        for x in 0..X_NUM {
            let count = self.field.column_count(x);
            if count == Y_NUM {
                continue;
            }

            let initial_y = Y_NUM - 1 - count;
            let next = self
                .next_puyos
                .take(x)
                .unwrap_or_else(|| Puyo::new(PuyoType::Padding));

            let cells = self.field.cells_mut();
            cells[initial_y][x] = Some(next);
            for row in cells.iter_mut().take(initial_y) {
                row[x] = Some(Puyo::new(PuyoType::Padding));
            }

            dropped = true;
        }

        dropped
    }
}
