// 盤面ファイルの読み込み

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::domain::board::{presets, Board};

/// JSONファイルから盤面を読み込んで検証する
pub fn load_board(path: &Path) -> Result<Board> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("盤面ファイルを読み込めません: {}", path.display()))?;
    let board: Board = serde_json::from_str(&text)
        .with_context(|| format!("盤面ファイルの形式が不正です: {}", path.display()))?;
    board.validate().context("盤面が不正です")?;
    Ok(board)
}

/// "preset:ID" ならプリセット、それ以外はファイルパスとして盤面を読み込む
pub fn load_board_spec(source: &str) -> Result<Board> {
    if let Some(id) = source.strip_prefix("preset:") {
        return presets::preset(id)
            .with_context(|| format!("プリセットが見つかりません: {}", id))?;
    }
    load_board(Path::new(source))
}

/// 盤面をJSONファイルに保存する
pub fn save_board(path: &Path, board: &Board) -> Result<()> {
    let json = serde_json::to_string_pretty(board)?;
    fs::write(path, json).with_context(|| format!("盤面ファイルを書き込めません: {}", path.display()))?;
    Ok(())
}
