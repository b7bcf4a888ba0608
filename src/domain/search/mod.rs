// なぞり探索

pub mod config;
pub mod counting;
pub mod explorer;
pub mod result;
pub mod state;

pub use config::{
    ExplorationCategory, ExplorationTarget, OptimalSolutionCount, PreferenceKind, StepCountingBonus,
    StepHeight,
};
pub use counting::count_up;
pub use explorer::{explore_root, solve_all_traces, solve_traces_including_index, walk_traces};
pub use result::{better_solution, calc_value, merge_result_if_ranked_in, ExplorationResult, SolutionResult};
pub use state::SolutionState;
