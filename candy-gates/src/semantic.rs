//! The semantic (functional) gate checker.
//!
//! Where the pattern checker only recognizes a handful of syntactic shapes, this checker asks an
//! oracle whether the candidate's forward and backward clauses actually force the output to be a
//! function of its inputs, using an activation literal so the check can be undone if the
//! candidate turns out not to be a gate.

use candy_oracle::{SatOracle, SolveBudget};

use crate::index::{ClauseId, ClauseIndex};
use crate::stats::Stats;
use candy_formula::Var;

/// Asks `oracle` whether `out` is right-unique given `fwd` and `bwd`: mints a fresh activation
/// literal, asserts every clause of `fwd ∪ bwd` gated by it with the `out`-literal dropped, and
/// checks that the gated formula is unsatisfiable when the activation literal is negated. Either
/// way, the activation literal is then permanently disabled with a unit clause, so this call
/// leaves no trace in the oracle's formula for future calls beyond the disabled gate clauses.
pub fn semantic_check<O: SatOracle>(
    oracle: &mut O,
    index: &ClauseIndex,
    out: Var,
    fwd: &[ClauseId],
    bwd: &[ClauseId],
    budget: SolveBudget,
    stats: &mut Stats,
) -> bool {
    let alit = oracle.new_var().positive();

    for &id in fwd.iter().chain(bwd.iter()) {
        let mut clause = vec![alit];
        clause.extend(index.clause(id).iter().filter(|lit| lit.var() != out).copied());
        oracle.add_clause(&clause);
    }

    let outcome = oracle.solve(&[!alit], budget);
    oracle.add_clause(&[alit]);

    stats.record_semantic_call(outcome, oracle.conflicts_used());
    outcome == candy_oracle::OracleOutcome::Unsat
}
