//! Prover configuration

use serde::{Deserialize, Serialize};

/// Tunables for one proof attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProverConfig {
    /// Worker-thread cap shared by the whole attempt; 0 means unlimited
    pub max_threads: usize,
    /// Cache equality verdicts in the union-find
    pub use_cache: bool,
}

impl Default for ProverConfig {
    fn default() -> Self {
        ProverConfig {
            max_threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            use_cache: true,
        }
    }
}
