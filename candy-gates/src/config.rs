//! Configuration for a run of the gate-structure recognizer.

use std::time::Duration;

/// Tuning knobs for [`crate::analyzer::GateAnalyzer`].
///
/// There is no `Options`-style global registry here: a config value is built explicitly and
/// passed to the analyzer, so two analyzers in the same process can run with different settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GateRecognitionConfig {
    /// Number of rarest-literal rounds the driver will run after the initial unit-clause seeding
    /// is exhausted. (Default: 0, meaning "unit clauses only")
    pub tries: usize,

    /// Enables the syntactic pattern checker (full-OR, full-AND, complete encoding). (Default:
    /// true)
    pub patterns: bool,

    /// Enables the semantic (oracle-backed) functional checker. (Default: true)
    pub semantic: bool,

    /// Loads every input clause into the oracle up front, so semantic checks reason about the
    /// whole formula rather than just the candidate's own clauses. (Default: false)
    pub holistic: bool,

    /// Enables the VE-blocked decomposition test as an alternative way to satisfy the
    /// blocked-pair precondition. (Default: false)
    pub lookahead: bool,

    /// Runs the pipeline in escalating modes (patterns only, then + semantic, then + lookahead)
    /// instead of applying every enabled rule in one pass. (Default: false)
    pub intensify: bool,

    /// Upper bound on the number of non-tautological resolvents the decomposition test will
    /// examine before giving up. (Default: 10)
    pub lookahead_threshold: usize,

    /// Conflict budget given to the oracle for each semantic call; `0` means unlimited. (Default:
    /// 0)
    pub semantic_budget: u64,

    /// Wall-clock budget for a whole [`crate::analyzer::GateAnalyzer::analyze`] call. `None`
    /// means unlimited. (Default: None)
    pub timeout: Option<Duration>,
}

impl Default for GateRecognitionConfig {
    fn default() -> Self {
        GateRecognitionConfig {
            tries: 0,
            patterns: true,
            semantic: true,
            holistic: false,
            lookahead: false,
            intensify: false,
            lookahead_threshold: 10,
            semantic_budget: 0,
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = GateRecognitionConfig::default();
        assert_eq!(config.tries, 0);
        assert!(config.patterns);
        assert!(config.semantic);
        assert!(!config.holistic);
        assert!(!config.lookahead);
        assert!(!config.intensify);
        assert_eq!(config.lookahead_threshold, 10);
        assert_eq!(config.semantic_budget, 0);
        assert_eq!(config.timeout, None);
    }
}
