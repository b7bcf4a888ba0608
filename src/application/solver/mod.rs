// 最適解探索アプリケーションサービス

pub mod event;
pub mod service;

pub use event::{SolveEvent, SolveProgress};
pub use service::{SolveHandle, SolveRequest, SolveService};
