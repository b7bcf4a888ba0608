// 盤面関連のドメインモデル

pub mod bit_field;
pub mod board;
pub mod coord;
pub mod field;
pub mod presets;
pub mod puyo_type;

pub use bit_field::BitField;
pub use board::{Board, FieldKinds, NextKinds};
pub use coord::{PuyoCoord, ADJACENT_TABLE, ALL_COORDS};
pub use field::{generate_puyo_id, Field, NextPuyos, Puyo};
pub use puyo_type::{is_traceable_cell, PuyoAttr, PuyoType, ATTR_NUM};
