// 連鎖シミュレーション

pub mod detector;
pub mod environment;
pub mod simulator;

pub use detector::{detect_pop_blocks, PopBlock};
pub use environment::{
    KataPoppingPolicy, Leverage, MaxTraceNum, MinimumPuyoNum, SimulationEnvironment, TraceMode,
};
pub use simulator::Simulator;
