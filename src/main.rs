// なぞり消し連鎖シミュレーター - コマンドライン

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use nazori::application::{ResolveRequest, SimulationService, SolveRequest, SolveService};
use nazori::domain::board::{Board, PuyoAttr, PuyoType};
use nazori::domain::chain::{aggregate, Chain};
use nazori::domain::search::{count_up, ExplorationCategory, ExplorationResult, ExplorationTarget};
use nazori::infrastructure::executor::ParallelConfig;
use nazori::infrastructure::storage::{load_board_spec, FileResultWriter, ResultWriter};
use nazori::logging;

/// なぞり消し連鎖シミュレーターと最適なぞり探索
#[derive(Parser)]
#[command(name = "nazori", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// ログをファイルに書き出す（詳細ログも有効になる）
    #[arg(long, value_name = "FILE", global = true)]
    log: Option<PathBuf>,
    /// 詳細ログを標準出力に出す
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// 全面なぞれる盤面での候補数を数える
    Count {
        /// 最大なぞり数
        max: usize,
    },
    /// 最適ななぞりを探索する
    Solve {
        #[command(flatten)]
        board: BoardArgs,
        /// red|blue|green|yellow|purple|wild|tsukai|skill:<属性>
        #[arg(long, default_value = "wild")]
        target: String,
        /// 残す解の数
        #[arg(long, default_value_t = 1)]
        top: usize,
        /// 並列化しない
        #[arg(long)]
        serial: bool,
        /// ワーカースレッド数（省略時は CPU 数）
        #[arg(long, value_name = "N", conflicts_with = "serial")]
        threads: Option<usize>,
        /// 解を JSON 配列で書き出す
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// なぞりを1つ再生して連鎖を表示する
    Resolve {
        #[command(flatten)]
        board: BoardArgs,
        /// なぞり座標（例: F3,G3）
        #[arg(value_name = "A1,B2,...")]
        trace: String,
    },
}

#[derive(Args)]
struct BoardArgs {
    /// 盤面 JSON のパスか preset:ID
    #[arg(value_name = "BOARD")]
    source: String,
    /// ネクストを埋めるぷよ（トークンか random）
    #[arg(long, value_name = "TOKEN")]
    next: Option<String>,
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("エラー: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.log {
        logging::init_log_file(path)
            .with_context(|| format!("ログファイルを開けません: {}", path.display()))?;
        logging::enable_verbose_logging();
    } else if cli.verbose {
        logging::enable_verbose_logging();
    }

    let result = match &cli.command {
        Command::Count { max } => run_count(*max),
        Command::Solve {
            board,
            target,
            top,
            serial,
            threads,
            out,
        } => run_solve(board, target, *top, *serial, *threads, out.as_deref()),
        Command::Resolve { board, trace } => run_resolve(board, trace),
    };

    logging::close_log_file();
    result
}

fn run_count(max: usize) -> Result<()> {
    for n in 0..=max {
        println!("{}: {}", n, count_up(n)?);
    }
    Ok(())
}

/// 盤面を読み込み、必要ならネクストを埋める
fn load_board(args: &BoardArgs) -> Result<Board> {
    let board = load_board_spec(&args.source)?;
    match args.next.as_deref() {
        None => Ok(board),
        Some("random") => Ok(board.with_random_next(&mut rand::thread_rng())),
        Some(token) => {
            let kind = PuyoType::from_token(token)?
                .ok_or_else(|| anyhow!("ネクストに空セルは指定できません"))?;
            Ok(board.with_next_all(kind))
        }
    }
}

fn parse_target(name: &str) -> Result<ExplorationCategory> {
    if let Some(attr) = name.strip_prefix("skill:") {
        return Ok(ExplorationCategory::SkillPuyoCount {
            main_attr: PuyoAttr::from_name(attr)?,
            counting_bonus: None,
        });
    }
    match name {
        "wild" => Ok(ExplorationCategory::wild_damage()),
        "tsukai" => Ok(ExplorationCategory::PuyoTsukaiCount),
        _ => {
            let attr = PuyoAttr::from_name(name)?;
            if !attr.is_colored() {
                bail!("ダメージの対象は色属性で指定してください: {}", name);
            }
            Ok(ExplorationCategory::damage_of(attr))
        }
    }
}

fn run_solve(
    board: &BoardArgs,
    target: &str,
    top: usize,
    serial: bool,
    threads: Option<usize>,
    out: Option<&Path>,
) -> Result<()> {
    let board = load_board(board)?;
    let target = ExplorationTarget::new(parse_target(target)?).with_optimal_solution_count(top)?;

    let mut service = SolveService::new();
    if !serial {
        let mut config = ParallelConfig::default();
        if let Some(n) = threads {
            config = config.with_num_workers(n);
        }
        service = service.with_parallel(config);
    }

    let result = service.solve(&SolveRequest::new(board, target))?;
    print_exploration_result(&result);

    if let Some(path) = out {
        let mut writer = FileResultWriter::json_array(path)?;
        writer.write_batch(&result.optimal_solutions)?;
        writer.flush()?;
        println!("{}件の解を {} に書き出しました", writer.count(), path.display());
    }
    Ok(())
}

fn run_resolve(board: &BoardArgs, trace: &str) -> Result<()> {
    let board = load_board(board)?;
    let request = ResolveRequest::from_cell_addrs(board, trace)?;
    let result = SimulationService::new().resolve(&request)?;

    for chain in &result.chains {
        print_chain(chain);
    }
    println!(
        "合計: {}連鎖 ワイルド{:.2} ぷよ使い{}{}",
        result.chains.len(),
        aggregate::total_wild_damage(&result.chains),
        aggregate::total_puyo_tsukai_count(&result.chains),
        if aggregate::is_all_cleared(&result.chains) { " 全消し" } else { "" }
    );
    println!("{}", result.field.to_text());
    Ok(())
}

fn print_chain(chain: &Chain) {
    let attrs: Vec<String> = chain
        .attrs()
        .map(|(attr, a)| format!("{}{}個({:.2})", attr, a.popped_num, a.strength))
        .collect();
    println!(
        "{:>2}連鎖: 同時消し{} {} ブースト{} ぷよ使い{}",
        chain.chain_num,
        chain.popped_puyo_num,
        attrs.join(" "),
        chain.boost_count,
        chain.puyo_tsukai_count
    );
}

fn print_exploration_result(result: &ExplorationResult) {
    println!(
        "候補数: {} 経過時間: {:.3}秒",
        result.candidates_num, result.elapsed_seconds
    );
    if result.optimal_solutions.is_empty() {
        println!("なぞれる場所がありません");
        return;
    }
    for (rank, solution) in result.optimal_solutions.iter().enumerate() {
        println!(
            "#{} [{}] 値{:.2} {}連鎖 ぷよ使い{}",
            rank + 1,
            solution.trace_text(),
            solution.value,
            solution.chains.len(),
            solution.puyo_tsukai_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn solve_arguments() {
        let cli = Cli::try_parse_from([
            "nazori", "solve", "preset:specialRule1/1", "--target", "green", "--top", "3", "--next", "G",
            "--threads", "2",
        ])
        .unwrap();
        match cli.command {
            Command::Solve {
                board,
                target,
                top,
                serial,
                threads,
                out,
            } => {
                assert_eq!(board.source, "preset:specialRule1/1");
                assert_eq!(board.next.as_deref(), Some("G"));
                assert_eq!(target, "green");
                assert_eq!(top, 3);
                assert!(!serial);
                assert_eq!(threads, Some(2));
                assert!(out.is_none());
            }
            _ => panic!("solve として解析されていない"),
        }
    }

    #[test]
    fn serial_conflicts_with_threads() {
        assert!(Cli::try_parse_from(["nazori", "solve", "b.json", "--serial", "--threads", "2"]).is_err());
    }

    #[test]
    fn resolve_requires_trace() {
        assert!(Cli::try_parse_from(["nazori", "resolve", "b.json"]).is_err());
        let cli = Cli::try_parse_from(["nazori", "resolve", "b.json", "F3,G3", "--log", "x.log"]).unwrap();
        assert_eq!(cli.log, Some(PathBuf::from("x.log")));
        assert!(matches!(cli.command, Command::Resolve { ref trace, .. } if trace == "F3,G3"));
    }

    #[test]
    fn target_names() {
        assert!(matches!(parse_target("tsukai").unwrap(), ExplorationCategory::PuyoTsukaiCount));
        assert!(matches!(
            parse_target("skill:blue").unwrap(),
            ExplorationCategory::SkillPuyoCount { main_attr: PuyoAttr::Blue, .. }
        ));
        assert!(parse_target("heart").is_err());
    }
}
