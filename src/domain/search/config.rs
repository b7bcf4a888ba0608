// 探索対象のValue Objects

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OPTIMAL_SOLUTION_COUNT, MAX_OPTIMAL_SOLUTION_COUNT};
use crate::domain::board::PuyoAttr;

/// 保持する最適解の数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimalSolutionCount(usize);

impl OptimalSolutionCount {
    pub fn new(count: usize) -> Result<Self> {
        if count > MAX_OPTIMAL_SOLUTION_COUNT {
            return Err(anyhow!("最適解の保持数が大きすぎます: {}", count));
        }
        Ok(Self(count))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for OptimalSolutionCount {
    fn default() -> Self {
        Self(DEFAULT_OPTIMAL_SOLUTION_COUNT)
    }
}

/// 階段ボーナスの段の高さを表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepHeight(u32);

impl StepHeight {
    pub fn new(height: u32) -> Result<Self> {
        if height == 0 {
            return Err(anyhow!("段の高さは1以上である必要があります"));
        }
        Ok(Self(height))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// 階段状に発生するカウントボーナス
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepCountingBonus {
    /// 段を登る対象属性（属性ごとのカウントの合計で登る）
    pub target_attrs: Vec<PuyoAttr>,
    pub step_height: StepHeight,
    pub bonus_count: u32,
    /// false なら1回のみ、true なら段を超えるたびに発生
    pub repeat: bool,
}

impl StepCountingBonus {
    /// 対象属性の合計カウントから得られるボーナス
    pub fn bonus_for(&self, total_height: u32) -> u32 {
        let mut steps = total_height / self.step_height.get();
        if !self.repeat {
            steps = steps.min(1);
        }
        self.bonus_count * steps
    }
}

/// 探索カテゴリー
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExplorationCategory {
    /// ダメージ量（main_attr が None ならワイルド）
    Damage {
        main_attr: Option<PuyoAttr>,
        sub_attr: Option<PuyoAttr>,
        /// 副属性 / 主属性 のダメージ率
        main_sub_ratio: f64,
    },
    /// スキル溜めのぷよ数
    SkillPuyoCount {
        main_attr: PuyoAttr,
        counting_bonus: Option<StepCountingBonus>,
    },
    /// ぷよ使いカウント
    PuyoTsukaiCount,
}

impl ExplorationCategory {
    /// 単色ダメージ
    pub fn damage_of(attr: PuyoAttr) -> Self {
        Self::Damage {
            main_attr: Some(attr),
            sub_attr: None,
            main_sub_ratio: 0.0,
        }
    }

    /// ワイルド（全色）ダメージ
    pub fn wild_damage() -> Self {
        Self::Damage {
            main_attr: None,
            sub_attr: None,
            main_sub_ratio: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Damage {
                main_attr,
                sub_attr,
                main_sub_ratio,
            } => {
                if let Some(attr) = main_attr {
                    if !attr.is_colored() {
                        bail!("ダメージの主属性は色属性である必要があります: {:?}", attr);
                    }
                }
                if let Some(attr) = sub_attr {
                    if !attr.is_colored() {
                        bail!("ダメージの副属性は色属性である必要があります: {:?}", attr);
                    }
                }
                if !main_sub_ratio.is_finite() || *main_sub_ratio < 0.0 {
                    bail!("副属性のダメージ率が不正です: {}", main_sub_ratio);
                }
            }
            Self::SkillPuyoCount { counting_bonus, .. } => {
                if let Some(bonus) = counting_bonus {
                    if bonus.target_attrs.is_empty() {
                        bail!("カウントボーナスの対象属性が空です");
                    }
                }
            }
            Self::PuyoTsukaiCount => {}
        }
        Ok(())
    }
}

/// 好みの種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferenceKind {
    BiggerValue,
    ChancePop,
    PrismPop,
    AllClear,
    SmallerTraceNum,
    HeartPop,
    /// おじゃまと固ぷよ
    OjamaPop,
    SmallerValue,
    NoChancePop,
    NoPrismPop,
    NoAllClear,
    BiggerTraceNum,
    NoHeartPop,
    NoOjamaPop,
    MoreChancePop,
    MorePrismPop,
    MoreHeartPop,
    MoreOjamaPop,
    LessChancePop,
    LessPrismPop,
    LessHeartPop,
    LessOjamaPop,
}

impl PreferenceKind {
    pub const ALL: [PreferenceKind; 22] = [
        PreferenceKind::BiggerValue,
        PreferenceKind::ChancePop,
        PreferenceKind::PrismPop,
        PreferenceKind::AllClear,
        PreferenceKind::SmallerTraceNum,
        PreferenceKind::HeartPop,
        PreferenceKind::OjamaPop,
        PreferenceKind::SmallerValue,
        PreferenceKind::NoChancePop,
        PreferenceKind::NoPrismPop,
        PreferenceKind::NoAllClear,
        PreferenceKind::BiggerTraceNum,
        PreferenceKind::NoHeartPop,
        PreferenceKind::NoOjamaPop,
        PreferenceKind::MoreChancePop,
        PreferenceKind::MorePrismPop,
        PreferenceKind::MoreHeartPop,
        PreferenceKind::MoreOjamaPop,
        PreferenceKind::LessChancePop,
        PreferenceKind::LessPrismPop,
        PreferenceKind::LessHeartPop,
        PreferenceKind::LessOjamaPop,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Self::BiggerValue => "探索対象の値が大きい",
            Self::ChancePop => "チャンスぷよを含む",
            Self::PrismPop => "プリズムを含む",
            Self::AllClear => "全消し達成",
            Self::SmallerTraceNum => "なぞり数が少ない",
            Self::HeartPop => "ハートを含む",
            Self::OjamaPop => "おじゃまを含む",
            Self::SmallerValue => "探索対象の値が小さい",
            Self::NoChancePop => "チャンスぷよを含まない",
            Self::NoPrismPop => "プリズムを含まない",
            Self::NoAllClear => "全消ししない",
            Self::BiggerTraceNum => "なぞり数が多い",
            Self::NoHeartPop => "ハートを含まない",
            Self::NoOjamaPop => "おじゃまを含まない",
            Self::MoreChancePop => "チャンスぷよが多い",
            Self::MorePrismPop => "プリズムが多い",
            Self::MoreHeartPop => "ハートが多い",
            Self::MoreOjamaPop => "おじゃまが多い",
            Self::LessChancePop => "チャンスぷよが少ない",
            Self::LessPrismPop => "プリズムが少ない",
            Self::LessHeartPop => "ハートが少ない",
            Self::LessOjamaPop => "おじゃまが少ない",
        }
    }
}

/// 探索対象
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorationTarget {
    pub category: ExplorationCategory,
    /// インデックスの小さい好みほど優先
    #[serde(default = "default_preference_priorities")]
    pub preference_priorities: Vec<PreferenceKind>,
    #[serde(default)]
    pub optimal_solution_count: OptimalSolutionCount,
}

fn default_preference_priorities() -> Vec<PreferenceKind> {
    vec![PreferenceKind::BiggerValue, PreferenceKind::SmallerTraceNum]
}

impl ExplorationTarget {
    pub fn new(category: ExplorationCategory) -> Self {
        Self {
            category,
            preference_priorities: default_preference_priorities(),
            optimal_solution_count: OptimalSolutionCount::default(),
        }
    }

    pub fn with_optimal_solution_count(mut self, count: usize) -> Result<Self> {
        self.optimal_solution_count = OptimalSolutionCount::new(count)?;
        Ok(self)
    }

    pub fn with_preference_priorities(mut self, priorities: Vec<PreferenceKind>) -> Self {
        self.preference_priorities = priorities;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.category.validate().context("探索カテゴリーが不正です")?;
        OptimalSolutionCount::new(self.optimal_solution_count.get())?;
        Ok(())
    }
}

impl Default for ExplorationTarget {
    fn default() -> Self {
        Self::new(ExplorationCategory::wild_damage())
    }
}
