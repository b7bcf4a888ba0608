// 消えるブロックの検出

use crate::constants::{CELL_NUM, X_NUM, Y_NUM};
use crate::domain::board::{BitField, Field, PuyoAttr, ALL_COORDS};

/// 同時に消えるブロック
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopBlock {
    pub attr: PuyoAttr,
    pub cells: BitField,
}

impl PopBlock {
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// 素集合（48セル固定）
struct DisjointSet {
    parent: [u8; CELL_NUM],
}

impl DisjointSet {
    fn new() -> Self {
        let mut parent = [0u8; CELL_NUM];
        for (i, p) in parent.iter_mut().enumerate() {
            *p = i as u8;
        }
        Self { parent }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }
        // 経路圧縮
        let mut cur = i;
        while self.parent[cur] as usize != root {
            let next = self.parent[cur] as usize;
            self.parent[cur] = root as u8;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        // 小さいインデックスを代表にする
        if ra < rb {
            self.parent[rb] = ra as u8;
        } else {
            self.parent[ra] = rb as u8;
        }
    }
}

/// 消えるブロックを検出する
///
/// 色ぷよは右と下の同色を左上から順に繋ぎ、最小消去数以上のブロックが消える。
/// ハート・プリズム・おじゃま・固ぷよは消える色ぷよブロックに上下左右で接していれば、
/// 属性ごとに1つのブロックとして消える（最小数なし）。
/// 消えるものがなければ空のベクタを返す。
pub fn detect_pop_blocks(field: &Field, minimum_puyo_num: u32) -> Vec<PopBlock> {
    let cells = field.cells();
    let mut set = DisjointSet::new();
    let mut colored_attr: [Option<PuyoAttr>; CELL_NUM] = [None; CELL_NUM];

    for y in 0..Y_NUM {
        for x in 0..X_NUM {
            if let Some(p) = cells[y][x] {
                if p.kind.is_colored() {
                    colored_attr[y * X_NUM + x] = Some(p.kind.attr());
                }
            }
        }
    }

    for i in 0..CELL_NUM {
        let Some(attr) = colored_attr[i] else {
            continue;
        };
        let x = i % X_NUM;
        if x + 1 < X_NUM && colored_attr[i + 1] == Some(attr) {
            set.union(i, i + 1);
        }
        if i + X_NUM < CELL_NUM && colored_attr[i + X_NUM] == Some(attr) {
            set.union(i, i + X_NUM);
        }
    }

    let mut components = [BitField::EMPTY; CELL_NUM];
    for i in 0..CELL_NUM {
        if colored_attr[i].is_some() {
            let root = set.find(i);
            components[root].add(i);
        }
    }

    let mut blocks = Vec::new();
    let mut popping = BitField::EMPTY;
    for attr in PuyoAttr::COLORED {
        for (root, component) in components.iter().enumerate() {
            if colored_attr[root] != Some(attr) || component.is_empty() {
                continue;
            }
            if component.len() > 1 && component.len() as u32 >= minimum_puyo_num {
                blocks.push(PopBlock {
                    attr,
                    cells: *component,
                });
                popping = popping.union(component);
            }
        }
    }

    if popping.is_empty() {
        return blocks;
    }

    // 巻き込まれて消える特殊ぷよ
    let mut specials = [BitField::EMPTY; PuyoAttr::SPECIAL.len()];
    for coord in ALL_COORDS.iter() {
        let Some(p) = field.get(*coord) else {
            continue;
        };
        let attr = p.kind.attr();
        let Some(slot) = PuyoAttr::SPECIAL.iter().position(|a| *a == attr) else {
            continue;
        };
        let hit = coord
            .orthogonal_coords()
            .iter()
            .flatten()
            .any(|n| popping.has(n.index()));
        if hit {
            specials[slot].add(coord.index());
        }
    }

    for (slot, cells) in specials.iter().enumerate() {
        if !cells.is_empty() {
            blocks.push(PopBlock {
                attr: PuyoAttr::SPECIAL[slot],
                cells: *cells,
            });
        }
    }

    blocks
}
