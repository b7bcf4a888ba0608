// アプリケーション層 - ユースケースの組み立て

pub mod progress;
pub mod simulation;
pub mod solver;

pub use progress::{ProgressManager, ProgressStats};
pub use simulation::{ResolveRequest, ResolveResult, SimulationService};
pub use solver::{SolveEvent, SolveHandle, SolveProgress, SolveRequest, SolveService};
