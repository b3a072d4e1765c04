pub mod config;
pub mod flow;
pub mod ping;
pub mod progress;
pub mod register;
pub mod report;
pub mod score;
pub mod serve;
pub mod stats;
