//! The variable-elimination-after-decomposition ("VE-blocked") test.
//!
//! An alternative way for a candidate `(o, F, G)` to satisfy the blocked-pair precondition when
//! `blocked(o, F, G)` itself fails: resolve every non-tautological pair in `F × G` on `var(o)`,
//! find a literal common to every resulting resolvent, and check whether eliminating *that*
//! literal (by the usual blocked/monotone/functional test, applied to its own occurrences outside
//! `F ∪ G`) would make every resolvent a tautology too. If so, `(o, F, G)` is accepted as blocked
//! by decomposition.

use std::collections::BTreeSet;

use candy_oracle::{SatOracle, SolveBudget};

use crate::blocked::{is_blocked, is_blocked_all, is_blocked_pair, resolvent};
use crate::index::{ClauseId, ClauseIndex};
use crate::mono::MonoFlags;
use crate::semantic::semantic_check;
use crate::stats::Stats;
use candy_formula::{Lit, Var};

/// Checks whether `(out, fwd, bwd)` is blocked via decomposition. See the module documentation
/// for the algorithm; `lookahead_threshold` bounds how many non-tautological resolvents are
/// examined before giving up (resolvent counts grow with `|fwd| * |bwd|`, so a candidate with a
/// wide, non-gate fan-in can otherwise make this quadratic in the clause count).
#[allow(clippy::too_many_arguments)]
pub fn ve_blocked<O: SatOracle>(
    out: Lit,
    fwd: &[ClauseId],
    bwd: &[ClauseId],
    index: &ClauseIndex,
    mono: &MonoFlags,
    oracle: &mut O,
    lookahead_threshold: usize,
    semantic_budget: SolveBudget,
    stats: &mut Stats,
) -> bool {
    let resolvents = match non_tautological_resolvents(out, fwd, bwd, index, lookahead_threshold) {
        Some(resolvents) => resolvents,
        None => return false,
    };
    if resolvents.is_empty() {
        // Every pair happened to be tautological after all.
        return true;
    }

    let candidates = common_variable_candidates(&resolvents);
    if candidates.is_empty() {
        return false;
    }

    let inputs: BTreeSet<Var> = fwd
        .iter()
        .chain(bwd)
        .flat_map(|&id| index.clause(id).iter().map(|l| l.var()))
        .filter(|&v| v != out.var())
        .collect();

    for &cand in &candidates {
        let (fwd_l, bwd_l) = match restricted_occurrences(cand, index, fwd, bwd, &inputs) {
            Some(sets) => sets,
            None => continue,
        };

        if !is_blocked(cand, index, &fwd_l, &bwd_l) {
            continue;
        }

        let pure1 = !mono.get(cand);
        let pure2 = !(clause_set_contains(fwd, index, cand) && clause_set_contains(fwd, index, !cand));
        let pure3 = index.occurrence_count(cand) == bwd_l.len();
        let monotonic = pure1 && pure2 && pure3;

        let functional = if monotonic {
            false
        } else {
            semantic_check(oracle, index, cand.var(), &fwd_l, &bwd_l, semantic_budget, stats)
        };

        if !(monotonic || functional) {
            continue;
        }

        let (res_bwd, res_fwd): (Vec<Vec<Lit>>, Vec<Vec<Lit>>) =
            resolvents.iter().cloned().partition(|r| r.contains(&!cand));

        let res_fwd_slices: Vec<&[Lit]> = res_fwd.iter().map(|r| r.as_slice()).collect();
        let res_bwd_slices: Vec<&[Lit]> = res_bwd.iter().map(|r| r.as_slice()).collect();
        let bwd_l_slices: Vec<&[Lit]> = bwd_l.iter().map(|&id| index.clause(id)).collect();
        let fwd_l_slices: Vec<&[Lit]> = fwd_l.iter().map(|&id| index.clause(id)).collect();

        if is_blocked_all(!cand, &res_fwd_slices, &bwd_l_slices)
            && is_blocked_all(!cand, &fwd_l_slices, &res_bwd_slices)
        {
            stats.record_decompose_blocked();
            return true;
        }
    }

    false
}

/// All non-tautological resolvents of `fwd × bwd` on `var(out)`, or `None` if more than
/// `lookahead_threshold` of them exist.
fn non_tautological_resolvents(
    out: Lit,
    fwd: &[ClauseId],
    bwd: &[ClauseId],
    index: &ClauseIndex,
    lookahead_threshold: usize,
) -> Option<Vec<Vec<Lit>>> {
    let mut resolvents = Vec::new();
    for &a in fwd {
        for &b in bwd {
            let clause_a = index.clause(a);
            let clause_b = index.clause(b);
            if !is_blocked_pair(out, clause_a, clause_b) {
                resolvents.push(resolvent(out, clause_a, clause_b));
                if resolvents.len() > lookahead_threshold {
                    return None;
                }
            }
        }
    }
    Some(resolvents)
}

/// Literals whose variable appears in every resolvent. Kept as literals (not variables) because
/// the eventual `cand` we eliminate must match a specific polarity per resolvent, but a variable
/// occurring with either polarity across resolvents is still a valid candidate to test — hence
/// both literals of a variable survive the intersection as long as the variable itself is common
/// to all resolvents.
fn common_variable_candidates(resolvents: &[Vec<Lit>]) -> BTreeSet<Lit> {
    let mut candidates: BTreeSet<Lit> = match resolvents.first() {
        Some(first) => first.iter().copied().collect(),
        None => return BTreeSet::new(),
    };

    for resolvent in &resolvents[1..] {
        if candidates.is_empty() {
            break;
        }
        let mut next = BTreeSet::new();
        for &lit in resolvent {
            for &candidate in &candidates {
                if lit.var() == candidate.var() {
                    next.insert(lit);
                    next.insert(candidate);
                }
            }
        }
        candidates = next;
    }

    candidates
}

fn clause_set_contains(ids: &[ClauseId], index: &ClauseIndex, lit: Lit) -> bool {
    ids.iter().any(|&id| index.clause(id).contains(&lit))
}

/// `cand`'s own forward/backward occurrences, restricted to clauses that are (a) not already part
/// of `fwd ∪ bwd` and (b) use only variables from `inputs` (so the eliminated literal's own gate
/// test stays within the candidate's input budget). Returns `None` if there is no restricted
/// forward occurrence to resolve against.
fn restricted_occurrences(
    cand: Lit,
    index: &ClauseIndex,
    fwd: &[ClauseId],
    bwd: &[ClauseId],
    inputs: &BTreeSet<Var>,
) -> Option<(Vec<ClauseId>, Vec<ClauseId>)> {
    let mut fwd_l = Vec::new();
    for &id in index.occurrences(!cand) {
        if fwd.contains(&id) || bwd.contains(&id) {
            continue;
        }
        if index.clause(id).iter().all(|l| inputs.contains(&l.var())) {
            fwd_l.push(id);
        }
    }
    if fwd_l.is_empty() {
        return None;
    }

    let mut bwd_l = Vec::new();
    for &id in index.occurrences(cand) {
        if fwd.contains(&id) || bwd.contains(&id) {
            continue;
        }
        if index.clause(id).iter().all(|l| inputs.contains(&l.var())) {
            bwd_l.push(id);
        }
    }

    Some((fwd_l, bwd_l))
}
