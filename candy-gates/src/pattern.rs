//! Syntactic pattern recognition for fully-encoded boolean gates.
//!
//! Applies only once a candidate has already passed the blocked-pair test and its forward and
//! backward input sets coincide (`S == T`, see the driver in `analyzer.rs`); it distinguishes a
//! fully-written-out OR/AND/complete-encoding gate from a blocked pair that merely happens to
//! share inputs.

use std::collections::BTreeSet;

use crate::index::{ClauseId, ClauseIndex};
use candy_formula::{Lit, Var};

fn fixed_clause_size(ids: &[ClauseId], index: &ClauseIndex, size: usize) -> bool {
    ids.iter().all(|&id| index.clause(id).len() == size)
}

/// `o ↔ (i1 ∨ i2 ∨ ... ∨ in)` written out as one `n`-ary forward clause and `n` binary backward
/// clauses.
fn full_or(fwd: &[ClauseId], bwd: &[ClauseId], index: &ClauseIndex) -> bool {
    fwd.len() == 1 && !bwd.is_empty() && fixed_clause_size(bwd, index, 2)
}

/// `o ↔ (i1 ∧ i2 ∧ ... ∧ in)` written out as `n` binary forward clauses and one `n`-ary backward
/// clause.
fn full_and(fwd: &[ClauseId], bwd: &[ClauseId], index: &ClauseIndex) -> bool {
    bwd.len() == 1 && !fwd.is_empty() && fixed_clause_size(fwd, index, 2)
}

/// A gate whose truth table over its input variables is written out completely: `2^(n-1)`
/// forward clauses and `2^(n-1)` backward clauses over `n` input variables, i.e. every one of the
/// `2^n` possible input sign combinations appears exactly once on each side.
fn complete_encoding(fwd: &[ClauseId], bwd: &[ClauseId], inputs: &BTreeSet<Lit>, index: &ClauseIndex) -> bool {
    let input_vars: BTreeSet<Var> = inputs.iter().map(|l| l.var()).collect();
    if input_vars.is_empty() || 2 * input_vars.len() != inputs.len() {
        return false;
    }
    let expected = 1usize << input_vars.len();
    fwd.len() == bwd.len()
        && 2 * fwd.len() == expected
        && fixed_clause_size(fwd, index, input_vars.len() + 1)
        && fixed_clause_size(bwd, index, input_vars.len() + 1)
}

/// Whether `(fwd, bwd)` matches one of the recognized fully-encoded gate patterns over `inputs`.
pub fn pattern_check(fwd: &[ClauseId], bwd: &[ClauseId], inputs: &BTreeSet<Lit>, index: &ClauseIndex) -> bool {
    full_or(fwd, bwd, index) || full_and(fwd, bwd, index) || complete_encoding(fwd, bwd, inputs, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ClauseIndex;
    use candy_formula::{cnf_formula, lit};

    #[test]
    fn recognizes_a_full_or_gate() {
        // o <-> (a v b): fwd = {(-o v a v b)}, bwd = {(o v -a), (o v -b)}
        let formula = cnf_formula![-1, 2, 3; 1, -2; 1, -3;];
        let index = ClauseIndex::from_formula(&formula);
        let fwd = vec![crate::index::ClauseId(0)];
        let bwd = vec![crate::index::ClauseId(1), crate::index::ClauseId(2)];
        let inputs: BTreeSet<Lit> = [lit![2], lit![3]].into_iter().collect();
        assert!(pattern_check(&fwd, &bwd, &inputs, &index));
    }

    #[test]
    fn recognizes_a_full_and_gate() {
        // o <-> (a ^ b): fwd = {(-o v a), (-o v b)}, bwd = {(o v -a v -b)}
        let formula = cnf_formula![-1, 2; -1, 3; 1, -2, -3;];
        let index = ClauseIndex::from_formula(&formula);
        let fwd = vec![crate::index::ClauseId(0), crate::index::ClauseId(1)];
        let bwd = vec![crate::index::ClauseId(2)];
        let inputs: BTreeSet<Lit> = [lit![2], lit![3]].into_iter().collect();
        assert!(pattern_check(&fwd, &bwd, &inputs, &index));
    }

    #[test]
    fn recognizes_a_complete_encoding_gate() {
        // o <-> (a xor b), written out as all four input/output sign combinations: 2 forward
        // clauses, 2 backward clauses, 2 input variables (n=2, 2*|F| == 2^n == 4).
        let formula = cnf_formula![-1, 2, 3; -1, -2, -3; 1, 2, -3; 1, -2, 3;];
        let index = ClauseIndex::from_formula(&formula);
        let fwd = vec![crate::index::ClauseId(0), crate::index::ClauseId(1)];
        let bwd = vec![crate::index::ClauseId(2), crate::index::ClauseId(3)];
        let inputs: BTreeSet<Lit> = [lit![2], lit![-2], lit![3], lit![-3]].into_iter().collect();
        assert!(pattern_check(&fwd, &bwd, &inputs, &index));
    }

    #[test]
    fn rejects_a_mismatched_shape() {
        let formula = cnf_formula![-1, 2, 3; 1, -2;];
        let index = ClauseIndex::from_formula(&formula);
        let fwd = vec![crate::index::ClauseId(0)];
        let bwd = vec![crate::index::ClauseId(1)];
        let inputs: BTreeSet<Lit> = [lit![2], lit![3]].into_iter().collect();
        assert!(!pattern_check(&fwd, &bwd, &inputs, &index));
    }
}
