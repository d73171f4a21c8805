//! The recovered gate structure: one record per committed gate, plus the root clauses left over.

use log::debug;

use crate::index::{ClauseId, ClauseIndex};
use crate::stats::Stats;
use candy_formula::{Lit, Var};

/// A single committed gate `out ↔ f(inputs)`.
///
/// `fwd` are the clauses that define `out` in terms of its inputs (the ones that contained
/// `!out`), `bwd` the clauses that constrain the inputs given `out` (the ones that contained
/// `out`). Both are kept as [`ClauseId`]s into the owning [`GateProblem`]'s clause storage rather
/// than as copied literal vectors.
#[derive(Debug, Clone, Default)]
pub struct GateRecord {
    pub(crate) out: Option<Lit>,
    pub(crate) fwd: Vec<ClauseId>,
    pub(crate) bwd: Vec<ClauseId>,
    pub(crate) inp: Vec<Lit>,
    pub(crate) not_mono: bool,
}

impl GateRecord {
    pub fn is_defined(&self) -> bool {
        self.out.is_some()
    }

    pub fn output(&self) -> Option<Lit> {
        self.out
    }

    pub fn forward_clauses(&self) -> &[ClauseId] {
        &self.fwd
    }

    pub fn backward_clauses(&self) -> &[ClauseId] {
        &self.bwd
    }

    pub fn inputs(&self) -> &[Lit] {
        &self.inp
    }

    /// Whether this gate (or an ancestor closer to a root) is not a pure monotone gate, meaning
    /// its inputs can no longer be assumed to appear in a single polarity downstream.
    pub fn has_non_monotone_parent(&self) -> bool {
        self.not_mono
    }
}

/// The result of decoding a CNF formula into a DAG of gates plus whatever clauses could not be
/// explained as part of one: the recognizer's output.
pub struct GateProblem {
    // Fields are `pub(crate)` rather than hidden behind accessors so `analyzer.rs` can borrow
    // `index` and `stats` disjointly and mutably at the same time while driving the recognizer.
    pub(crate) index: ClauseIndex,
    pub(crate) roots: Vec<ClauseId>,
    pub(crate) gates: Vec<Option<GateRecord>>,
    pub(crate) gate_count: usize,
    pub(crate) artificial_root: Option<Var>,
    pub(crate) stats: Stats,
    pub(crate) timed_out: bool,
}

impl GateProblem {
    pub(crate) fn new(index: ClauseIndex, stats: Stats) -> GateProblem {
        let var_count = index.var_count();
        GateProblem {
            index,
            roots: Vec::new(),
            gates: vec![None; var_count],
            gate_count: 0,
            artificial_root: None,
            stats,
            timed_out: false,
        }
    }

    pub(crate) fn add_roots(&mut self, ids: impl IntoIterator<Item = ClauseId>) {
        self.roots.extend(ids);
    }

    pub(crate) fn set_gate(&mut self, var: Var, record: GateRecord) {
        if var.index() >= self.gates.len() {
            self.gates.resize(var.index() + 1, None);
        }
        self.gates[var.index()] = Some(record);
        self.gate_count += 1;
    }

    pub fn var_count(&self) -> usize {
        self.index.var_count()
    }

    pub fn clause_count(&self) -> usize {
        self.index.clause_count()
    }

    pub fn clause(&self, id: ClauseId) -> &[Lit] {
        self.index.clause(id)
    }

    pub fn roots(&self) -> &[ClauseId] {
        &self.roots
    }

    pub fn gate(&self, var: Var) -> Option<&GateRecord> {
        self.gates.get(var.index()).and_then(Option::as_ref)
    }

    pub fn gates(&self) -> impl Iterator<Item = (Var, &GateRecord)> {
        self.gates
            .iter()
            .enumerate()
            .filter_map(|(index, gate)| gate.as_ref().map(|gate| (Var::from_index(index), gate)))
    }

    pub fn gate_count(&self) -> usize {
        self.gate_count
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn has_timeout(&self) -> bool {
        self.timed_out
    }

    pub fn has_artificial_root(&self) -> bool {
        self.artificial_root.is_some()
    }

    pub fn artificial_root(&self) -> Option<Var> {
        self.artificial_root
    }

    /// All literals appearing in any root clause, deduplicated and sorted.
    pub fn root_literals(&self) -> Vec<Lit> {
        let mut lits: Vec<Lit> = self
            .roots
            .iter()
            .flat_map(|&id| self.index.clause(id).iter().copied())
            .collect();
        lits.sort_unstable();
        lits.dedup();
        lits
    }

    /// Mints a fresh variable `r`, adds `(c ∨ ¬r)` for every original root clause `c`, and
    /// replaces the root set with the single unit clause `{r}`. No-op if the roots have already
    /// been normalized.
    ///
    /// This leaves the formula equisatisfiable (and equivalent under the usual Tseitin argument:
    /// `r` is forced true by the new root, and `r ⇒ c` for every original root `c`).
    pub fn normalize_roots(&mut self) {
        if self.artificial_root.is_some() {
            return;
        }

        let root_var = Var::from_index(self.index.var_count());
        let root_lit = root_var.positive();

        let mut fwd = Vec::with_capacity(self.roots.len());
        for &id in &self.roots {
            let mut clause: Vec<Lit> = self.index.clause(id).to_vec();
            clause.push(!root_lit);
            fwd.push(self.index.push_clause(clause));
        }
        let inputs = self.root_literals();
        let new_root_clause = self.index.push_clause(vec![root_lit]);

        self.set_gate(
            root_var,
            GateRecord {
                out: Some(root_lit),
                fwd,
                bwd: Vec::new(),
                inp: inputs,
                not_mono: false,
            },
        );
        self.roots = vec![new_root_clause];
        self.artificial_root = Some(root_var);
    }

    /// Given a full assignment, returns the clauses that actually constrain it: the roots, plus
    /// for every gate reachable from a root literal, its backward clauses if the output is true
    /// under `model` or its forward clauses if it is false, recursing into that clause set's own
    /// literals.
    ///
    /// `model[v.index()]` gives the truth value of variable `v`; variables past the end of
    /// `model` are treated as false.
    pub fn get_pruned_problem(&self, model: &[bool]) -> Vec<ClauseId> {
        let lit_true = |lit: Lit| model.get(lit.var().index()).copied().unwrap_or(false) == lit.is_positive();

        let mut visited = vec![false; self.gates.len()];
        let mut result: Vec<ClauseId> = self.roots.clone();
        let mut queue: Vec<Var> = self.root_literals().iter().map(|l| l.var()).collect();

        while let Some(var) = queue.pop() {
            if var.index() >= visited.len() || visited[var.index()] {
                continue;
            }
            visited[var.index()] = true;

            if let Some(gate) = self.gate(var) {
                let out = gate.output().unwrap();
                let used = if lit_true(out) { &gate.bwd } else { &gate.fwd };
                result.extend(used.iter().copied());
                for &id in used {
                    for &lit in self.index.clause(id) {
                        if lit.var() != var {
                            queue.push(lit.var());
                        }
                    }
                }
            }
        }

        result
    }

    /// Emits a one-line-per-gate debug trace of the recovered structure.
    pub fn log_summary(&self) {
        debug!(
            "gate problem: {} vars, {} clauses, {} gates, {} roots, timed_out={}",
            self.var_count(),
            self.clause_count(),
            self.gate_count,
            self.roots.len(),
            self.timed_out
        );
        for (var, gate) in self.gates() {
            debug!(
                "  gate {:?}: inputs={:?} fwd={} bwd={} not_mono={}",
                var,
                gate.inputs(),
                gate.fwd.len(),
                gate.bwd.len(),
                gate.not_mono
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candy_formula::{cnf_formula, lit};

    #[test]
    fn root_literals_are_deduplicated_and_sorted() {
        let formula = cnf_formula![1, 2; 2, 3;];
        let index = ClauseIndex::from_formula(&formula);
        let mut problem = GateProblem::new(index, Stats::default());
        problem.add_roots([ClauseId(0), ClauseId(1)]);
        assert_eq!(problem.root_literals(), vec![lit![1], lit![2], lit![3]]);
    }

    #[test]
    fn normalize_roots_replaces_roots_with_a_single_unit_clause() {
        let formula = cnf_formula![1, 2; 3;];
        let index = ClauseIndex::from_formula(&formula);
        let mut problem = GateProblem::new(index, Stats::default());
        problem.add_roots([ClauseId(0), ClauseId(1)]);

        problem.normalize_roots();

        assert!(problem.has_artificial_root());
        assert_eq!(problem.roots().len(), 1);
        let root_clause = problem.clause(problem.roots()[0]);
        assert_eq!(root_clause.len(), 1);
        assert!(root_clause[0].is_positive());

        let root_var = problem.artificial_root().unwrap();
        let gate = problem.gate(root_var).unwrap();
        assert_eq!(gate.forward_clauses().len(), 2);
        assert!(gate.backward_clauses().is_empty());
    }

    #[test]
    fn normalize_roots_is_idempotent() {
        let formula = cnf_formula![1, 2;];
        let index = ClauseIndex::from_formula(&formula);
        let mut problem = GateProblem::new(index, Stats::default());
        problem.add_roots([ClauseId(0)]);
        problem.normalize_roots();
        let first_root = problem.roots()[0];
        problem.normalize_roots();
        assert_eq!(problem.roots(), &[first_root]);
    }
}
