// 結果の書き込み

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::search::SolutionResult;

/// なぞり結果を書き込むためのtrait
pub trait ResultWriter: Send {
    /// 単一の結果を書き込む
    fn write_result(&mut self, result: &SolutionResult) -> Result<()>;

    /// 複数の結果をまとめて書き込む
    fn write_batch(&mut self, results: &[SolutionResult]) -> Result<()> {
        for result in results {
            self.write_result(result)?;
        }
        Ok(())
    }

    /// 書き込みを完了（フラッシュ）
    fn flush(&mut self) -> Result<()>;

    /// 書き込んだ結果数を取得
    fn count(&self) -> u64;
}

/// 出力フォーマット
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON Lines形式（1行1結果）
    JsonLines,
    /// JSON配列形式
    JsonArray,
}

/// ファイルへの結果書き込み実装
pub struct FileResultWriter {
    writer: BufWriter<File>,
    count: u64,
    format: OutputFormat,
    /// 配列の閉じ括弧を書いたか
    finished: bool,
}

impl FileResultWriter {
    /// 新しいファイルライターを作成
    pub fn new(path: &Path, format: OutputFormat) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("出力ファイルを作成できません: {}", path.display()))?;
        let mut writer = Self {
            writer: BufWriter::new(file),
            count: 0,
            format,
            finished: false,
        };
        if format == OutputFormat::JsonArray {
            writer.writer.write_all(b"[\n")?;
        }
        Ok(writer)
    }

    /// JSON Lines形式で作成
    pub fn json_lines(path: &Path) -> Result<Self> {
        Self::new(path, OutputFormat::JsonLines)
    }

    /// JSON配列形式で作成
    pub fn json_array(path: &Path) -> Result<Self> {
        Self::new(path, OutputFormat::JsonArray)
    }
}

impl ResultWriter for FileResultWriter {
    fn write_result(&mut self, result: &SolutionResult) -> Result<()> {
        let json = serde_json::to_string(result)?;
        match self.format {
            OutputFormat::JsonLines => {
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::JsonArray => {
                if self.count > 0 {
                    writeln!(self.writer, ",")?;
                }
                write!(self.writer, "  {}", json)?;
            }
        }
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.format == OutputFormat::JsonArray && !self.finished {
            writeln!(self.writer, "\n]")?;
            self.finished = true;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Drop for FileResultWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// メモリ内結果書き込み実装（テスト用）
pub struct MemoryResultWriter {
    results: Vec<SolutionResult>,
}

impl MemoryResultWriter {
    pub fn new() -> Self {
        Self { results: Vec::new() }
    }

    pub fn results(&self) -> &[SolutionResult] {
        &self.results
    }
}

impl Default for MemoryResultWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultWriter for MemoryResultWriter {
    fn write_result(&mut self, result: &SolutionResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn count(&self) -> u64 {
        self.results.len() as u64
    }
}
