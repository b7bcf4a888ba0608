// ファイル入出力

pub mod loader;
pub mod writer;

pub use loader::{load_board, load_board_spec, save_board};
pub use writer::{FileResultWriter, MemoryResultWriter, OutputFormat, ResultWriter};
