//! Resolver configuration.

use serde::{Deserialize, Serialize};

/// Immutable knobs passed into both resolvers.
///
/// Built once from the CLI flags and handed down by reference; resolvers
/// never consult process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Entities whose height is strictly below this bound are skipped, not
    /// published. 0 disables filtering.
    pub ignore_below_height: u64,
    /// Upper bound on ancestor headers fetched per block resolution.
    /// 0 fetches none.
    pub max_ancestors: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ignore_below_height: 0,
            max_ancestors: 0,
        }
    }
}
