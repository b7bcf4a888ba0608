// 連鎖リストの集計

use serde::{Deserialize, Serialize};

use super::result::Chain;
use crate::constants::{BOOST_COUNT_CAP, BOOST_RATIO_PER_COUNT};
use crate::domain::board::PuyoAttr;

/// 色属性ごとの総ダメージ（プリズムとブースト込み）
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalDamages {
    pub red: f64,
    pub blue: f64,
    pub green: f64,
    pub yellow: f64,
    pub purple: f64,
}

impl TotalDamages {
    pub fn from_chains(chains: &[Chain]) -> Self {
        Self {
            red: total_damage_of_attr(chains, PuyoAttr::Red),
            blue: total_damage_of_attr(chains, PuyoAttr::Blue),
            green: total_damage_of_attr(chains, PuyoAttr::Green),
            yellow: total_damage_of_attr(chains, PuyoAttr::Yellow),
            purple: total_damage_of_attr(chains, PuyoAttr::Purple),
        }
    }

    /// 色属性のダメージ（色以外は0）
    pub fn get(&self, attr: PuyoAttr) -> f64 {
        match attr {
            PuyoAttr::Red => self.red,
            PuyoAttr::Blue => self.blue,
            PuyoAttr::Green => self.green,
            PuyoAttr::Yellow => self.yellow,
            PuyoAttr::Purple => self.purple,
            _ => 0.0,
        }
    }
}

/// 総プリズムダメージ
pub fn total_prism_damage(chains: &[Chain]) -> f64 {
    chains
        .iter()
        .filter_map(|c| c.attr(PuyoAttr::Prism))
        .map(|a| a.strength)
        .sum()
}

pub fn total_boost_count(chains: &[Chain]) -> u32 {
    chains.iter().map(|c| c.boost_count).sum()
}

/// ブーストカウントによる倍率（カウントは50で頭打ち）
pub fn boost_ratio(chains: &[Chain]) -> f64 {
    let count = total_boost_count(chains).min(BOOST_COUNT_CAP);
    1.0 + count as f64 * BOOST_RATIO_PER_COUNT
}

/// 対象属性の総ダメージ（プリズムのダメージも含む）
pub fn total_damage_of_attr(chains: &[Chain], attr: PuyoAttr) -> f64 {
    let attr_damage: f64 = chains
        .iter()
        .filter_map(|c| c.attr(attr))
        .map(|a| a.strength)
        .sum();
    boost_ratio(chains) * (attr_damage + total_prism_damage(chains))
}

/// ワイルドの総ダメージ（プリズムのダメージも含む）
pub fn total_wild_damage(chains: &[Chain]) -> f64 {
    let wild_damage: f64 = chains.iter().map(|c| c.wild.strength).sum();
    boost_ratio(chains) * (wild_damage + total_prism_damage(chains))
}

/// 対象属性の消えた数の合計
pub fn total_count_of_attr(chains: &[Chain], attr: PuyoAttr) -> u32 {
    chains
        .iter()
        .filter_map(|c| c.attr(attr))
        .map(|a| a.popped_num)
        .sum()
}

pub fn total_puyo_tsukai_count(chains: &[Chain]) -> u32 {
    chains.iter().map(|c| c.puyo_tsukai_count).sum()
}

pub fn total_popped_chance_num(chains: &[Chain]) -> u32 {
    chains.iter().map(|c| c.popped_chance_num).sum()
}

pub fn is_all_cleared(chains: &[Chain]) -> bool {
    chains.iter().any(|c| c.is_all_cleared)
}

pub fn is_chance_popped(chains: &[Chain]) -> bool {
    chains.iter().any(Chain::is_chance_popped)
}

pub fn is_prism_popped(chains: &[Chain]) -> bool {
    chains.iter().any(Chain::is_prism_popped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::AttributeChain;

    fn chain_with(chain_num: u32, attr: PuyoAttr, strength: f64, popped_num: u32) -> Chain {
        let mut chain = Chain::new(chain_num);
        chain.set_attr(
            attr,
            AttributeChain {
                strength,
                popped_num,
                separated_blocks_num: 1,
            },
        );
        chain.wild.strength = strength;
        chain
    }

    #[test]
    fn damage_of_attr_sums_strengths() {
        let chains = vec![
            chain_with(1, PuyoAttr::Green, 1.0, 3),
            chain_with(2, PuyoAttr::Red, 2.0, 3),
            chain_with(3, PuyoAttr::Green, 4.0, 4),
        ];
        assert!((total_damage_of_attr(&chains, PuyoAttr::Green) - 5.0).abs() < 1e-9);
        assert!((total_damage_of_attr(&chains, PuyoAttr::Blue)).abs() < 1e-9);
        assert!((total_wild_damage(&chains) - 7.0).abs() < 1e-9);
        assert_eq!(total_count_of_attr(&chains, PuyoAttr::Green), 7);
    }

    #[test]
    fn prism_damage_splashes_to_every_color() {
        let chains = vec![
            chain_with(1, PuyoAttr::Green, 1.0, 3),
            chain_with(1, PuyoAttr::Prism, 6.0, 2),
        ];
        let damages = TotalDamages::from_chains(&chains);
        assert!((damages.green - 7.0).abs() < 1e-9);
        assert!((damages.red - 6.0).abs() < 1e-9);
        assert!(is_prism_popped(&chains));
    }

    #[test]
    fn boost_ratio_is_capped() {
        let mut chain = chain_with(1, PuyoAttr::Red, 1.0, 3);
        chain.boost_count = 10;
        assert!((boost_ratio(&[chain.clone()]) - 1.4).abs() < 1e-9);
        chain.boost_count = 80;
        assert!((boost_ratio(&[chain]) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_chain_list_aggregates_to_zero() {
        let chains: Vec<Chain> = Vec::new();
        assert_eq!(total_wild_damage(&chains), 0.0);
        assert_eq!(total_puyo_tsukai_count(&chains), 0);
        assert!(!is_all_cleared(&chains));
        assert!(!is_chance_popped(&chains));
    }
}
