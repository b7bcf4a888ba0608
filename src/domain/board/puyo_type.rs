// ぷよの種類と属性

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ぷよの属性
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PuyoAttr {
    Red = 1,
    Blue = 2,
    Green = 3,
    Yellow = 4,
    Purple = 5,
    Heart = 6,
    Prism = 7,
    Ojama = 8,
    Kata = 9,
    Padding = 10,
}

/// 属性の総数（配列の添字用）
pub const ATTR_NUM: usize = 10;

impl PuyoAttr {
    /// 色ぷよの属性（赤青緑黄紫の順）
    pub const COLORED: [PuyoAttr; 5] = [
        PuyoAttr::Red,
        PuyoAttr::Blue,
        PuyoAttr::Green,
        PuyoAttr::Yellow,
        PuyoAttr::Purple,
    ];

    /// 色ぷよの消えに巻き込まれて消える属性
    pub const SPECIAL: [PuyoAttr; 4] = [
        PuyoAttr::Heart,
        PuyoAttr::Prism,
        PuyoAttr::Ojama,
        PuyoAttr::Kata,
    ];

    pub const ALL: [PuyoAttr; ATTR_NUM] = [
        PuyoAttr::Red,
        PuyoAttr::Blue,
        PuyoAttr::Green,
        PuyoAttr::Yellow,
        PuyoAttr::Purple,
        PuyoAttr::Heart,
        PuyoAttr::Prism,
        PuyoAttr::Ojama,
        PuyoAttr::Kata,
        PuyoAttr::Padding,
    ];

    pub fn is_colored(self) -> bool {
        (self as u8) <= PuyoAttr::Purple as u8
    }

    /// 0始まりの添字
    pub fn slot(self) -> usize {
        self as usize - 1
    }

    /// 属性の基本となるぷよの種類
    pub fn base_type(self) -> PuyoType {
        match self {
            PuyoAttr::Red => PuyoType::Red,
            PuyoAttr::Blue => PuyoType::Blue,
            PuyoAttr::Green => PuyoType::Green,
            PuyoAttr::Yellow => PuyoType::Yellow,
            PuyoAttr::Purple => PuyoType::Purple,
            PuyoAttr::Heart => PuyoType::Heart,
            PuyoAttr::Prism => PuyoType::Prism,
            PuyoAttr::Ojama => PuyoType::Ojama,
            PuyoAttr::Kata => PuyoType::Kata,
            PuyoAttr::Padding => PuyoType::Padding,
        }
    }

    /// 名前から属性を得る（CLIや設定ファイル用）
    pub fn from_name(name: &str) -> Result<Self> {
        let attr = match name.to_ascii_lowercase().as_str() {
            "red" | "r" => PuyoAttr::Red,
            "blue" | "b" => PuyoAttr::Blue,
            "green" | "g" => PuyoAttr::Green,
            "yellow" | "y" => PuyoAttr::Yellow,
            "purple" | "p" => PuyoAttr::Purple,
            "heart" | "h" => PuyoAttr::Heart,
            "prism" | "w" => PuyoAttr::Prism,
            "ojama" | "o" => PuyoAttr::Ojama,
            "kata" | "k" => PuyoAttr::Kata,
            _ => return Err(anyhow!("不明な属性名: {}", name)),
        };
        Ok(attr)
    }
}

impl fmt::Display for PuyoAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PuyoAttr::Red => "赤",
            PuyoAttr::Blue => "青",
            PuyoAttr::Green => "緑",
            PuyoAttr::Yellow => "黄",
            PuyoAttr::Purple => "紫",
            PuyoAttr::Heart => "ハート",
            PuyoAttr::Prism => "プリズム",
            PuyoAttr::Ojama => "おじゃま",
            PuyoAttr::Kata => "固",
            PuyoAttr::Padding => "空き",
        };
        write!(f, "{}", name)
    }
}

/// ぷよの種類
///
/// 色ぷよは 1 + 色番号*4 + (プラスなら1) + (チャンスなら2) で並ぶ。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PuyoType {
    Red = 1,
    RedPlus = 2,
    RedChance = 3,
    RedChancePlus = 4,
    Blue = 5,
    BluePlus = 6,
    BlueChance = 7,
    BlueChancePlus = 8,
    Green = 9,
    GreenPlus = 10,
    GreenChance = 11,
    GreenChancePlus = 12,
    Yellow = 13,
    YellowPlus = 14,
    YellowChance = 15,
    YellowChancePlus = 16,
    Purple = 17,
    PurplePlus = 18,
    PurpleChance = 19,
    PurpleChancePlus = 20,
    Heart = 21,
    Prism = 22,
    Ojama = 23,
    Kata = 24,
    Padding = 25,
}

const COLORED_TYPES: [PuyoType; 20] = [
    PuyoType::Red,
    PuyoType::RedPlus,
    PuyoType::RedChance,
    PuyoType::RedChancePlus,
    PuyoType::Blue,
    PuyoType::BluePlus,
    PuyoType::BlueChance,
    PuyoType::BlueChancePlus,
    PuyoType::Green,
    PuyoType::GreenPlus,
    PuyoType::GreenChance,
    PuyoType::GreenChancePlus,
    PuyoType::Yellow,
    PuyoType::YellowPlus,
    PuyoType::YellowChance,
    PuyoType::YellowChancePlus,
    PuyoType::Purple,
    PuyoType::PurplePlus,
    PuyoType::PurpleChance,
    PuyoType::PurpleChancePlus,
];

impl PuyoType {
    /// 色ぷよを属性と強化状態から組み立てる（色属性以外はNone）
    pub fn colored(attr: PuyoAttr, plus: bool, chance: bool) -> Option<Self> {
        if !attr.is_colored() {
            return None;
        }
        let offset = attr.slot() * 4 + plus as usize + 2 * chance as usize;
        COLORED_TYPES.get(offset).copied()
    }

    pub fn attr(self) -> PuyoAttr {
        match self {
            PuyoType::Heart => PuyoAttr::Heart,
            PuyoType::Prism => PuyoAttr::Prism,
            PuyoType::Ojama => PuyoAttr::Ojama,
            PuyoType::Kata => PuyoAttr::Kata,
            PuyoType::Padding => PuyoAttr::Padding,
            colored => PuyoAttr::COLORED[(colored as usize - 1) / 4],
        }
    }

    /// 色ぷよかどうか（プリズムは含まない）
    pub fn is_colored(self) -> bool {
        (self as u8) <= PuyoType::PurpleChancePlus as u8
    }

    pub fn is_plus(self) -> bool {
        self.is_colored() && (self as u8 - 1) & 1 != 0
    }

    pub fn is_chance(self) -> bool {
        self.is_colored() && (self as u8 - 1) & 2 != 0
    }

    /// なぞれるかどうか（固ぷよ・おじゃま・空きはなぞれない）
    pub fn is_traceable(self) -> bool {
        !matches!(self, PuyoType::Ojama | PuyoType::Kata | PuyoType::Padding)
    }

    /// 強化（プラス・チャンス）を外した通常の色ぷよにする
    pub fn strip_enhancements(self) -> Self {
        if !self.is_colored() {
            return self;
        }
        self.attr().base_type()
    }

    pub fn to_chance(self) -> Self {
        self.with_flags(self.is_plus(), true)
    }

    pub fn to_plus(self) -> Self {
        self.with_flags(true, self.is_chance())
    }

    pub fn strip_chance(self) -> Self {
        self.with_flags(self.is_plus(), false)
    }

    pub fn strip_plus(self) -> Self {
        self.with_flags(false, self.is_chance())
    }

    fn with_flags(self, plus: bool, chance: bool) -> Self {
        if !self.is_colored() {
            return self;
        }
        Self::colored(self.attr(), plus, chance).unwrap_or(self)
    }

    /// 指定属性へ色変えした種類
    ///
    /// 空きはそのまま。色ぷよ同士の色変えは強化状態を保つ。
    /// それ以外は変換先属性の基本種類になる。
    pub fn recolor(self, to_attr: PuyoAttr) -> Self {
        if self == PuyoType::Padding {
            return self;
        }
        if self.is_colored() && to_attr.is_colored() {
            return Self::colored(to_attr, self.is_plus(), self.is_chance())
                .unwrap_or_else(|| to_attr.base_type());
        }
        to_attr.base_type()
    }

    /// 盤面テキスト用のトークンから種類を得る（"." は空セルとして None）
    pub fn from_token(token: &str) -> Result<Option<Self>> {
        let token = token.trim();
        let mut chars = token.chars();
        let head = chars
            .next()
            .ok_or_else(|| anyhow!("空のトークンです"))?
            .to_ascii_uppercase();
        let rest: String = chars.collect();

        let special = match head {
            '.' => return Ok(None),
            'H' => Some(PuyoType::Heart),
            'W' => Some(PuyoType::Prism),
            'O' => Some(PuyoType::Ojama),
            'K' => Some(PuyoType::Kata),
            'Z' => Some(PuyoType::Padding),
            _ => None,
        };
        if let Some(t) = special {
            if !rest.is_empty() {
                return Err(anyhow!("不正なトークン: {}", token));
            }
            return Ok(Some(t));
        }

        let attr = match head {
            'R' => PuyoAttr::Red,
            'B' => PuyoAttr::Blue,
            'G' => PuyoAttr::Green,
            'Y' => PuyoAttr::Yellow,
            'P' => PuyoAttr::Purple,
            _ => return Err(anyhow!("不正なトークン: {}", token)),
        };
        let (chance, plus) = match rest.as_str() {
            "" => (false, false),
            "+" => (false, true),
            "c" | "C" => (true, false),
            "c+" | "C+" => (true, true),
            _ => return Err(anyhow!("不正なトークン: {}", token)),
        };
        Ok(Self::colored(attr, plus, chance))
    }

    pub fn to_token(self) -> String {
        let head = match self.attr() {
            PuyoAttr::Red => "R",
            PuyoAttr::Blue => "B",
            PuyoAttr::Green => "G",
            PuyoAttr::Yellow => "Y",
            PuyoAttr::Purple => "P",
            PuyoAttr::Heart => return "H".to_string(),
            PuyoAttr::Prism => return "W".to_string(),
            PuyoAttr::Ojama => return "O".to_string(),
            PuyoAttr::Kata => return "K".to_string(),
            PuyoAttr::Padding => return "Z".to_string(),
        };
        let chance = if self.is_chance() { "c" } else { "" };
        let plus = if self.is_plus() { "+" } else { "" };
        format!("{}{}{}", head, chance, plus)
    }
}

/// セルがなぞれるかどうか（空セルはなぞれない）
pub fn is_traceable_cell(cell: Option<PuyoType>) -> bool {
    cell.map_or(false, PuyoType::is_traceable)
}
