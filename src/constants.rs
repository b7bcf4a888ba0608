// 盤面定数とシミュレーション既定値

/// ====== 盤面定数 ======
/// フィールドの列数
pub const X_NUM: usize = 8;
/// フィールドの行数
pub const Y_NUM: usize = 6;
/// セル総数
pub const CELL_NUM: usize = X_NUM * Y_NUM;

/// ビットフィールド1ワードあたりのビット数（24bit x 2 で 48セル）
pub const WORD_BITS: usize = 24;
pub const WORD_MASK: u32 = (1u32 << WORD_BITS) - 1;

/// ====== シミュレーション既定値 ======
pub const DEFAULT_MINIMUM_PUYO_NUM_FOR_POPPING: u32 = 4;
pub const DEFAULT_MAX_TRACE_NUM: u32 = 5;
/// チャンスモード中の最大なぞり数
pub const CHANCE_MODE_MAX_TRACE_NUM: u32 = 5;
/// なぞり数の上限（探索スタックの深さもこれで抑える）
pub const MAX_TRACE_NUM_LIMIT: usize = 18;

/// 同時消し係数
pub const POPPING_COEFFICIENT: f64 = 0.15;
/// プリズム1個あたりの攻撃力
pub const PRISM_STRENGTH_PER_PUYO: f64 = 3.0;

/// ブーストカウントの上限と1カウントあたりの倍率
pub const BOOST_COUNT_CAP: u32 = 50;
pub const BOOST_RATIO_PER_COUNT: f64 = 0.04;

/// ====== 探索既定値 ======
pub const DEFAULT_OPTIMAL_SOLUTION_COUNT: usize = 1;
pub const MAX_OPTIMAL_SOLUTION_COUNT: usize = 100;
