// 探索結果の定義と順位付け

use serde::{Deserialize, Serialize};

use super::config::{ExplorationCategory, ExplorationTarget, PreferenceKind};
use crate::domain::board::{PuyoAttr, PuyoCoord};
use crate::domain::chain::aggregate;
use crate::domain::chain::{Chain, TotalDamages};

/// なぞり消し1回分の結果
///
/// chains 以外は chains から計算できるが、比較を速くするために先に求めておく。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolutionResult {
    pub trace_coords: Vec<PuyoCoord>,
    pub chains: Vec<Chain>,
    /// 探索対象ごとの値（大きいほど良い）
    pub value: f64,
    pub total_damages: TotalDamages,
    pub total_wild_damage: f64,
    pub puyo_tsukai_count: u32,
    pub popped_chance_num: u32,
    pub popped_prism_num: u32,
    pub popped_heart_num: u32,
    /// おじゃま（固ぷよから変わったものも含む）
    pub popped_ojama_num: u32,
    pub popped_kata_num: u32,
    pub is_all_cleared: bool,
}

impl SolutionResult {
    pub fn from_chains(trace_coords: Vec<PuyoCoord>, chains: Vec<Chain>, target: &ExplorationTarget) -> Self {
        let value = calc_value(&chains, &target.category);
        Self {
            trace_coords,
            value,
            total_damages: TotalDamages::from_chains(&chains),
            total_wild_damage: aggregate::total_wild_damage(&chains),
            puyo_tsukai_count: aggregate::total_puyo_tsukai_count(&chains),
            popped_chance_num: aggregate::total_popped_chance_num(&chains),
            popped_prism_num: aggregate::total_count_of_attr(&chains, PuyoAttr::Prism),
            popped_heart_num: aggregate::total_count_of_attr(&chains, PuyoAttr::Heart),
            popped_ojama_num: aggregate::total_count_of_attr(&chains, PuyoAttr::Ojama),
            popped_kata_num: aggregate::total_count_of_attr(&chains, PuyoAttr::Kata),
            is_all_cleared: aggregate::is_all_cleared(&chains),
            chains,
        }
    }

    pub fn trace_num(&self) -> usize {
        self.trace_coords.len()
    }

    /// なぞり座標をセル番地で連結（例: "F3,G3"）
    pub fn trace_text(&self) -> String {
        self.trace_coords
            .iter()
            .map(PuyoCoord::to_cell_addr)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn popped_ojama_total(&self) -> u32 {
        self.popped_ojama_num + self.popped_kata_num
    }
}

/// 探索対象の値を計算
pub fn calc_value(chains: &[Chain], category: &ExplorationCategory) -> f64 {
    match category {
        ExplorationCategory::Damage {
            main_attr,
            sub_attr,
            main_sub_ratio,
        } => match main_attr {
            None => aggregate::total_wild_damage(chains),
            Some(main) => {
                let main_value = aggregate::total_damage_of_attr(chains, *main);
                let sub_value = sub_attr
                    .map(|sub| aggregate::total_damage_of_attr(chains, sub) * main_sub_ratio)
                    .unwrap_or(0.0);
                main_value + sub_value
            }
        },
        ExplorationCategory::SkillPuyoCount {
            main_attr,
            counting_bonus,
        } => {
            let main_value = aggregate::total_count_of_attr(chains, *main_attr);
            let bonus_value = counting_bonus
                .as_ref()
                .map(|bonus| {
                    let height = bonus
                        .target_attrs
                        .iter()
                        .map(|attr| aggregate::total_count_of_attr(chains, *attr))
                        .sum();
                    bonus.bonus_for(height)
                })
                .unwrap_or(0);
            (main_value + bonus_value) as f64
        }
        ExplorationCategory::PuyoTsukaiCount => aggregate::total_puyo_tsukai_count(chains) as f64,
    }
}

/// 探索結果
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorationResult {
    pub exploration_target: ExplorationTarget,
    pub elapsed_seconds: f64,
    /// 試したなぞりの数
    pub candidates_num: u64,
    /// 最適解（良い順）
    pub optimal_solutions: Vec<SolutionResult>,
}

impl ExplorationResult {
    pub fn new(exploration_target: ExplorationTarget) -> Self {
        Self {
            exploration_target,
            elapsed_seconds: 0.0,
            candidates_num: 0,
            optimal_solutions: Vec::new(),
        }
    }

    pub fn best(&self) -> Option<&SolutionResult> {
        self.optimal_solutions.first()
    }

    /// 1候補分を数えて順位に入れる
    pub fn record(&mut self, solution: SolutionResult) {
        self.candidates_num += 1;
        merge_result_if_ranked_in(&self.exploration_target, solution, &mut self.optimal_solutions);
    }

    /// 別の探索結果（後に探索した分）を取り込む
    ///
    /// 開始位置の順に取り込めば、まとめて探索した場合と同じ結果になる。
    pub fn absorb(&mut self, other: ExplorationResult) {
        self.candidates_num += other.candidates_num;
        for solution in other.optimal_solutions {
            merge_result_if_ranked_in(&self.exploration_target, solution, &mut self.optimal_solutions);
        }
    }
}

/// 順位に入るなら挿入する
///
/// 新しい結果は、それ以上に良い既存の結果すべての後ろに入る。
pub fn merge_result_if_ranked_in(
    target: &ExplorationTarget,
    solution: SolutionResult,
    optimal_solutions: &mut Vec<SolutionResult>,
) {
    let max = target.optimal_solution_count.get();
    if max == 0 {
        return;
    }

    let priorities = &target.preference_priorities;
    let pos = optimal_solutions
        .iter()
        .rposition(|s| std::ptr::eq(better_solution(priorities, s, &solution), s))
        .map_or(0, |p| p + 1);
    if pos >= max {
        return;
    }

    optimal_solutions.insert(pos, solution);
    optimal_solutions.truncate(max);
}

/// 好みの優先順に比べて良い方を返す（差がなければ s1）
pub fn better_solution<'a>(
    priorities: &[PreferenceKind],
    s1: &'a SolutionResult,
    s2: &'a SolutionResult,
) -> &'a SolutionResult {
    for kind in priorities {
        if let Some(better) = better_solution_by(*kind, s1, s2) {
            return better;
        }
    }
    s1
}

/// 1つの好みで比べる（差がなければ None）
pub fn better_solution_by<'a>(
    kind: PreferenceKind,
    s1: &'a SolutionResult,
    s2: &'a SolutionResult,
) -> Option<&'a SolutionResult> {
    use PreferenceKind::*;

    match kind {
        BiggerValue => by_bigger(s1, s2, |s| s.value),
        SmallerValue => by_smaller(s1, s2, |s| s.value),
        ChancePop => by_bigger(s1, s2, |s| has(s.popped_chance_num)),
        NoChancePop => by_smaller(s1, s2, |s| has(s.popped_chance_num)),
        PrismPop => by_bigger(s1, s2, |s| has(s.popped_prism_num)),
        NoPrismPop => by_smaller(s1, s2, |s| has(s.popped_prism_num)),
        AllClear => by_bigger(s1, s2, |s| has(s.is_all_cleared as u32)),
        NoAllClear => by_smaller(s1, s2, |s| has(s.is_all_cleared as u32)),
        SmallerTraceNum => by_smaller(s1, s2, |s| s.trace_num() as f64),
        BiggerTraceNum => by_bigger(s1, s2, |s| s.trace_num() as f64),
        HeartPop => by_bigger(s1, s2, |s| has(s.popped_heart_num)),
        NoHeartPop => by_smaller(s1, s2, |s| has(s.popped_heart_num)),
        OjamaPop => by_bigger(s1, s2, |s| has(s.popped_ojama_total())),
        NoOjamaPop => by_smaller(s1, s2, |s| has(s.popped_ojama_total())),
        MoreChancePop => by_bigger(s1, s2, |s| s.popped_chance_num as f64),
        LessChancePop => by_smaller(s1, s2, |s| s.popped_chance_num as f64),
        MorePrismPop => by_bigger(s1, s2, |s| s.popped_prism_num as f64),
        LessPrismPop => by_smaller(s1, s2, |s| s.popped_prism_num as f64),
        MoreHeartPop => by_bigger(s1, s2, |s| s.popped_heart_num as f64),
        LessHeartPop => by_smaller(s1, s2, |s| s.popped_heart_num as f64),
        MoreOjamaPop => by_bigger(s1, s2, |s| s.popped_ojama_total() as f64),
        LessOjamaPop => by_smaller(s1, s2, |s| s.popped_ojama_total() as f64),
    }
}

fn has(num: u32) -> f64 {
    if num > 0 {
        1.0
    } else {
        0.0
    }
}

/// key が大きい方を返す（差がなければ None）
fn by_bigger<'a>(
    a: &'a SolutionResult,
    b: &'a SolutionResult,
    key: impl Fn(&SolutionResult) -> f64,
) -> Option<&'a SolutionResult> {
    let (ka, kb) = (key(a), key(b));
    if kb > ka {
        Some(b)
    } else if kb < ka {
        Some(a)
    } else {
        None
    }
}

/// key が小さい方を返す（差がなければ None）
fn by_smaller<'a>(
    a: &'a SolutionResult,
    b: &'a SolutionResult,
    key: impl Fn(&SolutionResult) -> f64,
) -> Option<&'a SolutionResult> {
    by_bigger(a, b, |s| -key(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(value: f64, trace_num: usize) -> SolutionResult {
        let trace_coords = (0..trace_num).filter_map(PuyoCoord::from_index).collect();
        let mut s = SolutionResult::from_chains(trace_coords, Vec::new(), &ExplorationTarget::default());
        s.value = value;
        s
    }

    fn target_with_count(count: usize) -> ExplorationTarget {
        ExplorationTarget::default().with_optimal_solution_count(count).unwrap()
    }

    #[test]
    fn bigger_value_wins() {
        let priorities = [PreferenceKind::BiggerValue];
        let a = solution(1.0, 1);
        let b = solution(2.0, 1);
        assert!(std::ptr::eq(better_solution(&priorities, &a, &b), &b));
        assert!(std::ptr::eq(better_solution(&priorities, &b, &a), &b));
    }

    #[test]
    fn tie_returns_first() {
        let priorities = [PreferenceKind::BiggerValue, PreferenceKind::SmallerTraceNum];
        let a = solution(1.0, 2);
        let b = solution(1.0, 2);
        assert!(std::ptr::eq(better_solution(&priorities, &a, &b), &a));
    }

    #[test]
    fn shorter_trace_breaks_value_tie() {
        let priorities = [PreferenceKind::BiggerValue, PreferenceKind::SmallerTraceNum];
        let long = solution(5.0, 3);
        let short = solution(5.0, 2);
        assert!(std::ptr::eq(better_solution(&priorities, &long, &short), &short));
    }

    #[test]
    fn negated_preferences_flip() {
        let mut a = solution(1.0, 1);
        let b = solution(1.0, 1);
        a.popped_chance_num = 2;
        assert!(std::ptr::eq(
            better_solution_by(PreferenceKind::ChancePop, &a, &b).unwrap(),
            &a
        ));
        assert!(std::ptr::eq(
            better_solution_by(PreferenceKind::NoChancePop, &a, &b).unwrap(),
            &b
        ));
        assert!(better_solution_by(PreferenceKind::PrismPop, &a, &b).is_none());
    }

    #[test]
    fn ojama_preference_counts_kata() {
        let mut a = solution(1.0, 1);
        let b = solution(1.0, 1);
        a.popped_kata_num = 1;
        assert!(std::ptr::eq(
            better_solution_by(PreferenceKind::OjamaPop, &a, &b).unwrap(),
            &a
        ));
        assert!(std::ptr::eq(
            better_solution_by(PreferenceKind::LessOjamaPop, &a, &b).unwrap(),
            &b
        ));
    }

    #[test]
    fn smaller_preferences_do_not_depend_on_argument_order() {
        let short = solution(2.0, 2);
        let long = solution(5.0, 5);
        for (x, y) in [(&short, &long), (&long, &short)] {
            assert!(std::ptr::eq(
                better_solution_by(PreferenceKind::SmallerTraceNum, x, y).unwrap(),
                &short
            ));
            assert!(std::ptr::eq(
                better_solution_by(PreferenceKind::SmallerValue, x, y).unwrap(),
                &short
            ));
            assert!(std::ptr::eq(
                better_solution_by(PreferenceKind::BiggerTraceNum, x, y).unwrap(),
                &long
            ));
        }
    }

    #[test]
    fn merge_keeps_top_n_in_order() {
        let target = target_with_count(2);
        let mut list = Vec::new();
        merge_result_if_ranked_in(&target, solution(1.0, 1), &mut list);
        merge_result_if_ranked_in(&target, solution(3.0, 1), &mut list);
        merge_result_if_ranked_in(&target, solution(2.0, 1), &mut list);
        let values: Vec<f64> = list.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![3.0, 2.0]);
        merge_result_if_ranked_in(&target, solution(0.5, 1), &mut list);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn equal_result_goes_after_existing() {
        let target = target_with_count(3);
        let mut list = Vec::new();
        let mut first = solution(1.0, 1);
        first.popped_heart_num = 7;
        merge_result_if_ranked_in(&target, first, &mut list);
        merge_result_if_ranked_in(&target, solution(1.0, 1), &mut list);
        assert_eq!(list[0].popped_heart_num, 7);
    }

    #[test]
    fn zero_count_keeps_nothing() {
        let mut result = ExplorationResult::new(target_with_count(0));
        result.record(solution(1.0, 1));
        assert_eq!(result.candidates_num, 1);
        assert!(result.optimal_solutions.is_empty());
    }

    #[test]
    fn absorb_in_order_matches_single_pass() {
        let target = target_with_count(2);
        let values = [1.0, 4.0, 4.0, 2.0, 3.0];

        let mut single = ExplorationResult::new(target.clone());
        for (i, v) in values.iter().enumerate() {
            let mut s = solution(*v, 1);
            s.popped_heart_num = i as u32;
            single.record(s);
        }

        let mut left = ExplorationResult::new(target.clone());
        let mut right = ExplorationResult::new(target);
        for (i, v) in values.iter().enumerate() {
            let mut s = solution(*v, 1);
            s.popped_heart_num = i as u32;
            if i < 2 {
                left.record(s);
            } else {
                right.record(s);
            }
        }
        left.absorb(right);

        assert_eq!(left.candidates_num, single.candidates_num);
        assert_eq!(left.optimal_solutions, single.optimal_solutions);
    }

    #[test]
    fn skill_count_value_includes_step_bonus() {
        use crate::domain::chain::AttributeChain;
        use crate::domain::search::config::{StepCountingBonus, StepHeight};

        let mut chain = Chain::new(1);
        chain.set_attr(
            PuyoAttr::Red,
            AttributeChain {
                strength: 1.0,
                popped_num: 6,
                separated_blocks_num: 1,
            },
        );
        chain.set_attr(
            PuyoAttr::Blue,
            AttributeChain {
                strength: 1.0,
                popped_num: 5,
                separated_blocks_num: 1,
            },
        );
        let category = ExplorationCategory::SkillPuyoCount {
            main_attr: PuyoAttr::Red,
            counting_bonus: Some(StepCountingBonus {
                target_attrs: vec![PuyoAttr::Red, PuyoAttr::Blue],
                step_height: StepHeight::new(5).unwrap(),
                bonus_count: 2,
                repeat: true,
            }),
        };
        // 6 + 2 * floor(11 / 5)
        assert_eq!(calc_value(&[chain], &category), 10.0);
    }

    #[test]
    fn damage_value_adds_sub_attr_with_ratio() {
        use crate::domain::chain::AttributeChain;

        let mut chain = Chain::new(1);
        for (attr, strength) in [(PuyoAttr::Red, 3.0), (PuyoAttr::Blue, 6.0)] {
            chain.set_attr(
                attr,
                AttributeChain {
                    strength,
                    popped_num: 4,
                    separated_blocks_num: 1,
                },
            );
        }
        let category = ExplorationCategory::Damage {
            main_attr: Some(PuyoAttr::Red),
            sub_attr: Some(PuyoAttr::Blue),
            main_sub_ratio: 1.0 / 3.0,
        };
        assert!((calc_value(&[chain], &category) - 5.0).abs() < 1e-9);
    }
}
