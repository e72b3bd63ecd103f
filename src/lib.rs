pub mod error;
pub mod forest;
pub mod tree;
pub mod utils;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use forest::forest::{
    average_path_length, max_anomaly_scores, Anomaly, IsolationForest, IsolationForestConfig,
};
pub use tree::{node::Node, tree::IsolationTree};

pub type RandomGenerator = rand_chacha::ChaCha8Rng;
