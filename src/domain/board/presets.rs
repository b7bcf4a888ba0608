// プリセット盤面とブーストエリア

use anyhow::Result;

use super::board::Board;
use super::puyo_type::PuyoAttr;
use crate::domain::simulation::TraceMode;

/// キャラ名とブーストエリアのセル番地
const BOOST_AREAS: [(&str, [&str; 7]); 3] = [
    ("rulue", ["A2", "A3", "B3", "B4", "B5", "C5", "C6"]),
    ("aruru", ["E2", "D3", "E3", "D4", "E4", "D5", "E6"]),
    ("draco", ["H2", "G3", "H3", "G4", "F5", "G5", "F6"]),
];

/// キャラ名からブーストエリアを得る
pub fn boost_area(key: &str) -> Option<&'static [&'static str]> {
    BOOST_AREAS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, addrs)| addrs.as_slice())
}

pub fn boost_area_keys() -> Vec<&'static str> {
    BOOST_AREAS.iter().map(|(k, _)| *k).collect()
}

/// とくべつルール1: なぞって消す、3個で消える、連鎖係数7
fn special_rule_1(rows: &[&str]) -> Result<Board> {
    Ok(Board {
        trace_mode: TraceMode::Normal,
        minimum_puyo_num_for_popping: 3,
        chain_leverage: 7.0,
        ..Board::from_rows(rows)?
    })
}

/// とくべつルール2: なぞったぷよを青に変える、4個で消える、連鎖係数10
fn special_rule_2(rows: &[&str]) -> Result<Board> {
    Ok(Board {
        trace_mode: TraceMode::Recolor(PuyoAttr::Blue),
        minimum_puyo_num_for_popping: 4,
        chain_leverage: 10.0,
        ..Board::from_rows(rows)?
    })
}

const PRESET_IDS: [&str; 3] = ["specialRule1/1", "specialRule1/2", "specialRule2/1"];

pub fn preset_ids() -> &'static [&'static str] {
    &PRESET_IDS
}

/// プリセット盤面を取得（ネクストは空）
pub fn preset(id: &str) -> Option<Result<Board>> {
    let board = match id {
        "specialRule1/1" => special_rule_1(&[
            "R P H P Y G Y Y",
            "R Y P H Y G P G",
            "B Y G B H Y G P",
            "B R B R P B R P",
            "Y G P P R B G G",
            "B G B R B Y R R",
        ]),
        "specialRule1/2" => special_rule_1(&[
            "Y P R B R Y G B",
            "P G B P Y B G B",
            "P Y R B R Y Y R",
            "H H P G B P R Y",
            "Y G P G B P R H",
            "G R G R P G B Y",
        ]),
        "specialRule2/1" => special_rule_2(&[
            "Y P R G Y G B G",
            "P G P H W Y R G",
            "P P B B Y B G R",
            "Y Y Y G P Y G R",
            "G G P R G P B R",
            "P G P R R P P B",
        ]),
        _ => return None,
    };
    Some(board)
}
