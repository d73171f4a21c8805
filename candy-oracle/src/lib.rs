//! Incremental SAT oracle contract for the Candy gate-structure recognizer.
//!
//! The recognizer's semantic checker (see `candy-gates`) needs a collaborator that can add
//! clauses incrementally and decide satisfiability under a set of assumption literals, giving up
//! after a conflict budget is exhausted rather than running forever. [`SatOracle`] is that
//! narrow interface; [`solver::IncrementalSolver`] is one concrete, intentionally simple
//! implementation of it. Building a competitive CDCL solver is out of scope here — the oracle is
//! a collaborator, not the subject under study.

pub mod solver;

use candy_formula::{Lit, Var};

/// Outcome of a single [`SatOracle::solve`] call.
///
/// There is no fourth "error" outcome: resource exhaustion inside an oracle implementation must
/// be reported as [`OracleOutcome::Unknown`], never as a Rust error, so that callers can treat
/// "gave up" uniformly regardless of cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleOutcome {
    Sat,
    Unsat,
    Unknown,
}

/// A per-call conflict budget for [`SatOracle::solve`].
///
/// `SolveBudget::UNLIMITED` (conflict count `0`) means "run to completion".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveBudget(pub u64);

impl SolveBudget {
    pub const UNLIMITED: SolveBudget = SolveBudget(0);

    fn is_exhausted(self, conflicts: u64) -> bool {
        self.0 != 0 && conflicts >= self.0
    }
}

/// Incremental SAT oracle contract used by the semantic checker.
///
/// Implementations must be incremental (clauses added by one call to [`add_clause`](Self::add_clause)
/// remain part of the formula for all later calls) and must tolerate being given activation
/// literals: a caller may mint a fresh variable with [`new_var`](Self::new_var), use it to gate a
/// set of clauses, and later permanently disable those clauses by asserting a unit clause on that
/// variable. The oracle does not need to know which variables are "activation" literals; it just
/// needs its own variable count to grow monotonically as `new_var` is called.
pub trait SatOracle {
    /// Number of variables currently known to the oracle.
    fn var_count(&self) -> usize;

    /// Allocates and returns a fresh variable, disjoint from every variable used so far.
    fn new_var(&mut self) -> Var;

    /// Adds a clause to the formula. Permanent: there is no retraction operation, by design —
    /// clauses are disabled by asserting a unit on an activation literal instead.
    fn add_clause(&mut self, clause: &[Lit]);

    /// Decides satisfiability of the current formula under the given assumption literals.
    ///
    /// Returns [`OracleOutcome::Unknown`] if the conflict budget is exhausted before a verdict is
    /// reached.
    fn solve(&mut self, assumptions: &[Lit], budget: SolveBudget) -> OracleOutcome;

    /// Number of conflicts encountered during the most recent [`solve`](Self::solve) call.
    ///
    /// Exposed only so callers can keep statistics (e.g. conflict histograms); it carries no
    /// semantic weight for the recognizer itself.
    fn conflicts_used(&self) -> u64;
}
