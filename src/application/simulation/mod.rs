// なぞり消しシミュレーションのアプリケーションサービス

pub mod service;

pub use service::{validate_trace, ResolveRequest, ResolveResult, SimulationService};
