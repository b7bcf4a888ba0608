// ダメージ計算式

use anyhow::{anyhow, Result};

use crate::constants::POPPING_COEFFICIENT;

/// 同時消し係数の計算条件
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoppingFactorParams {
    pub minimum_puyo_num: u32,
    pub popping_coefficient: f64,
    pub popping_leverage: f64,
}

impl PoppingFactorParams {
    pub fn new(minimum_puyo_num: u32, popping_leverage: f64) -> Self {
        Self {
            minimum_puyo_num,
            popping_coefficient: POPPING_COEFFICIENT,
            popping_leverage,
        }
    }
}

/// 同時消し係数
///
/// `(1 + (消した数 - 最小消去数) * 係数 * 倍率) * 分離数`
pub fn popping_factor(popped_num: u32, separated_blocks_num: u32, params: &PoppingFactorParams) -> f64 {
    (1.0
        + (popped_num as f64 - params.minimum_puyo_num as f64)
            * params.popping_coefficient
            * params.popping_leverage)
        * separated_blocks_num as f64
}

/// 連鎖係数
///
/// 1連鎖目は0、2連鎖目0.4、3連鎖目0.7、4連鎖目以降は 1.0 + (n-4)*0.2 を基本として
/// `基本 * 連鎖倍率 + 1` を返す。
pub fn chain_factor(chain_num: u32, chain_leverage: f64) -> Result<f64> {
    let base = match chain_num {
        0 => return Err(anyhow!("連鎖数は1以上である必要があります: {}", chain_num)),
        1 => 0.0,
        2 => 0.4,
        3 => 0.7,
        n => 1.0 + (n - 4) as f64 * 0.2,
    };
    Ok(base * chain_leverage + 1.0)
}

/// ダメージ量の項
pub fn damage_term(attack_strength: f64, popping_factor: f64, chain_factor: f64) -> f64 {
    attack_strength * popping_factor * chain_factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn popping_factor_at_minimum_is_one() {
        let params = PoppingFactorParams::new(4, 1.0);
        assert!((popping_factor(4, 1, &params) - 1.0).abs() < EPS);
    }

    #[test]
    fn popping_factor_with_leverage() {
        let params = PoppingFactorParams::new(4, 5.0);
        assert!((popping_factor(5, 1, &params) - 1.75).abs() < EPS);
    }

    #[test]
    fn popping_factor_scales_with_separated_blocks() {
        let params = PoppingFactorParams::new(4, 1.0);
        assert!((popping_factor(8, 2, &params) - 3.2).abs() < EPS);
    }

    #[test]
    fn chain_factor_first_chain_is_one() {
        for lev in [1.0, 7.0, 10.0] {
            assert!((chain_factor(1, lev).unwrap() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn chain_factor_examples() {
        assert!((chain_factor(2, 1.0).unwrap() - 1.4).abs() < EPS);
        assert!((chain_factor(3, 1.0).unwrap() - 1.7).abs() < EPS);
        assert!((chain_factor(4, 1.0).unwrap() - 2.0).abs() < EPS);
        assert!((chain_factor(10, 1.0).unwrap() - 3.2).abs() < EPS);
        assert!((chain_factor(2, 7.0).unwrap() - 3.8).abs() < EPS);
    }

    #[test]
    fn chain_factor_rejects_zero() {
        assert!(chain_factor(0, 1.0).is_err());
    }

    #[test]
    fn damage_term_is_product() {
        assert!((damage_term(2.0, 1.5, 3.0) - 9.0).abs() < EPS);
    }
}
