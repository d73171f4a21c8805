//! The blocked-pair predicate and resolution.
//!
//! A candidate gate `(o, F, G)` — `F = idx(¬o)`, `G = idx(o)` — is blocked if every clause pair
//! `(a, b) ∈ F × G` resolves to a tautology on `var(o)`: that is, for every literal `c ∈ a` other
//! than `¬o`, `¬c ∈ b` does not hold.

use crate::index::{ClauseId, ClauseIndex};
use candy_formula::Lit;

/// Whether `a` and `b` resolve to a tautology when resolved on `out`.
///
/// `a` is expected to contain `!out` and `b` to contain `out`, mirroring the roles of a forward
/// and a backward clause of the same candidate gate, but the check itself only looks at the other
/// literals, so it is safe to call with any two clauses.
pub fn is_blocked_pair(out: Lit, a: &[Lit], b: &[Lit]) -> bool {
    a.iter()
        .any(|&c| c != !out && b.iter().any(|&d| d == !c))
}

/// Whether every pair in `f × g` is blocked on `out`.
pub fn is_blocked_all(out: Lit, f: &[&[Lit]], g: &[&[Lit]]) -> bool {
    f.iter().all(|&a| g.iter().all(|&b| is_blocked_pair(out, a, b)))
}

/// [`is_blocked_all`] for clause sets named by [`ClauseId`] in a [`ClauseIndex`].
pub fn is_blocked(out: Lit, index: &ClauseIndex, f: &[ClauseId], g: &[ClauseId]) -> bool {
    let f_slices: Vec<&[Lit]> = f.iter().map(|&id| index.clause(id)).collect();
    let g_slices: Vec<&[Lit]> = g.iter().map(|&id| index.clause(id)).collect();
    is_blocked_all(out, &f_slices, &g_slices)
}

/// The resolvent of `a` and `b` on `var(out)`: the union of both clauses with every literal on
/// that variable removed, deduplicated and sorted.
///
/// Callers are expected to only resolve non-tautological pairs (see [`is_blocked_pair`]); calling
/// this on a tautological pair produces a resolvent that is not a sound consequence of `a ∧ b`.
pub fn resolvent(out: Lit, a: &[Lit], b: &[Lit]) -> Vec<Lit> {
    let mut result: Vec<Lit> = a
        .iter()
        .chain(b.iter())
        .copied()
        .filter(|lit| lit.var() != out.var())
        .collect();
    result.sort_unstable();
    result.dedup();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use candy_formula::lit;

    #[test]
    fn blocked_when_every_resolvent_is_tautological() {
        // (a ∨ o) and (¬a ∨ ¬o) resolve to (a ∨ ¬a), a tautology.
        assert!(is_blocked_pair(lit![1], &[lit![2], lit![-1]], &[lit![-2], lit![1]]));
    }

    #[test]
    fn not_blocked_when_a_resolvent_is_non_tautological() {
        // (a ∨ ¬o) and (b ∨ o) resolve to (a ∨ b), not a tautology.
        assert!(!is_blocked_pair(lit![1], &[lit![2], lit![-1]], &[lit![3], lit![1]]));
    }

    #[test]
    fn resolvent_drops_the_pivot_variable_and_dedups() {
        let r = resolvent(lit![1], &[lit![2], lit![-1]], &[lit![2], lit![3], lit![1]]);
        assert_eq!(r, vec![lit![2], lit![3]]);
    }
}
