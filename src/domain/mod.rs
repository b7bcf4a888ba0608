// ドメイン層 - ビジネスロジックの中核

pub mod board;
pub mod chain;
pub mod search;
pub mod simulation;
