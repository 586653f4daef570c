// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration loaded from environment variables.

use serde::{Deserialize, Serialize};

/// NoGo pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoGoConfig {
    /// Decimal places kept in output coordinates.
    pub coordinate_decimals: u32,
    /// Tolerance of the simplification applied to the merged coverage outline.
    pub coverage_simplify_tolerance: f64,
    /// Upper bound on sources fed to one merge; the merge cost doubles per source.
    pub max_merge_sources: usize,
    /// Trace matching sources on the rayon pool.
    pub parallel_sources: bool,
}

impl NoGoConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            coordinate_decimals: env_or("NOGO_COORDINATE_DECIMALS", defaults.coordinate_decimals),
            coverage_simplify_tolerance: env_or(
                "NOGO_COVERAGE_SIMPLIFY_TOLERANCE",
                defaults.coverage_simplify_tolerance,
            ),
            max_merge_sources: env_or("NOGO_MAX_MERGE_SOURCES", defaults.max_merge_sources),
            parallel_sources: env_or("NOGO_PARALLEL_SOURCES", defaults.parallel_sources),
        }
    }
}

impl Default for NoGoConfig {
    fn default() -> Self {
        Self {
            coordinate_decimals: 7,
            coverage_simplify_tolerance: 1e-9,
            max_merge_sources: 8,
            parallel_sources: true,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NoGoConfig::default();
        assert_eq!(config.coordinate_decimals, 7);
        assert_eq!(config.max_merge_sources, 8);
        assert!(config.parallel_sources);
    }

    #[test]
    fn test_from_env_reads_and_falls_back() {
        std::env::set_var("NOGO_MAX_MERGE_SOURCES", "3");
        std::env::set_var("NOGO_COORDINATE_DECIMALS", "not a number");
        let config = NoGoConfig::from_env();
        std::env::remove_var("NOGO_MAX_MERGE_SOURCES");
        std::env::remove_var("NOGO_COORDINATE_DECIMALS");

        assert_eq!(config.max_merge_sources, 3);
        assert_eq!(config.coordinate_decimals, 7);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: NoGoConfig =
            serde_json::from_str(r#"{"coordinate_decimals": 4, "parallel_sources": false}"#)
                .unwrap();
        assert_eq!(config.coordinate_decimals, 4);
        assert!(!config.parallel_sources);
        assert_eq!(config.max_merge_sources, 8);
    }
}
