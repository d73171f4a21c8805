//! Counters and histograms describing how a run of the recognizer reached its result.
//!
//! These are purely observational: nothing here feeds back into acceptance decisions. They exist
//! so a caller can tell, after the fact, whether a run leaned on cheap monotone tests or spent its
//! budget on expensive semantic/decomposition calls.

use candy_oracle::OracleOutcome;

/// Counters and conflict-count samples collected while decoding a [`crate::gate::GateProblem`].
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub monotone_gates: u32,
    pub pattern_gates: u32,
    pub semantic_gates: u32,
    pub decompose_blocked: u32,

    pub semantic_calls: u32,
    /// Conflict counts used by semantic calls that confirmed a gate.
    pub semantic_success_conflicts: Vec<u64>,
    /// Conflict counts used by semantic calls that did not confirm a gate (including budget
    /// exhaustion).
    pub semantic_failure_conflicts: Vec<u64>,
}

impl Stats {
    pub fn record_semantic_call(&mut self, outcome: OracleOutcome, conflicts: u64) {
        self.semantic_calls += 1;
        if outcome == OracleOutcome::Unsat {
            self.semantic_success_conflicts.push(conflicts);
        } else {
            self.semantic_failure_conflicts.push(conflicts);
        }
    }

    pub fn record_gate(&mut self, mono: bool, pattern: bool, semantic: bool) {
        if mono {
            self.monotone_gates += 1;
        } else if pattern {
            self.pattern_gates += 1;
        } else if semantic {
            self.semantic_gates += 1;
        }
    }

    pub fn record_decompose_blocked(&mut self) {
        self.decompose_blocked += 1;
    }
}
