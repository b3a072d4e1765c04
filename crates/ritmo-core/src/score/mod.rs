//! Scoring: tier weights, calendar windows, series trimming, and the
//! aggregation engine that ties them to the activity ledger.

mod engine;
mod series;
mod weights;
pub mod window;

pub use engine::{Granularity, ScoreEngine};
pub use series::trim_trailing_zeros;
pub use weights::ScoreWeights;
