// 連鎖結果とダメージ計算

pub mod aggregate;
pub mod damage;
pub mod result;

pub use aggregate::TotalDamages;
pub use damage::{chain_factor, damage_term, popping_factor, PoppingFactorParams};
pub use result::{AttributeChain, Chain, WildChain};
