//! A small incremental solver satisfying the [`SatOracle`] contract.
//!
//! This is deliberately a plain DPLL search over unit propagation, not a CDCL solver: competitive
//! solving is out of scope for a collaborator whose only job is to answer "is this small,
//! activation-gated formula unsatisfiable under these assumptions". Clauses accumulate across
//! calls to [`add_clause`](SatOracle::add_clause); each [`solve`](SatOracle::solve) call restarts
//! the search from scratch rather than reusing derived state from a previous call.

use candy_formula::{Lit, Var};
use log::trace;

use crate::{OracleOutcome, SatOracle, SolveBudget};

/// An incremental SAT oracle backed by a plain DPLL search.
#[derive(Default)]
pub struct IncrementalSolver {
    var_count: usize,
    clauses: Vec<Vec<Lit>>,
    last_conflicts: u64,
}

impl IncrementalSolver {
    pub fn new() -> IncrementalSolver {
        IncrementalSolver::default()
    }
}

impl SatOracle for IncrementalSolver {
    fn var_count(&self) -> usize {
        self.var_count
    }

    fn new_var(&mut self) -> Var {
        let var = Var::from_index(self.var_count);
        self.var_count += 1;
        var
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        for &lit in clause {
            if lit.index() >= self.var_count {
                self.var_count = lit.index() + 1;
            }
        }
        self.clauses.push(clause.to_vec());
    }

    fn solve(&mut self, assumptions: &[Lit], budget: SolveBudget) -> OracleOutcome {
        let mut assignment = vec![None; self.var_count];
        let mut conflicts = 0u64;

        for &lit in assumptions {
            if !assign(&mut assignment, lit) {
                trace!("oracle: assumptions conflict directly, unsat");
                return OracleOutcome::Unsat;
            }
        }

        let outcome = match search(&self.clauses, &mut assignment, budget, &mut conflicts) {
            Some(true) => OracleOutcome::Sat,
            Some(false) => OracleOutcome::Unsat,
            None => {
                trace!("oracle: conflict budget {:?} exhausted", budget);
                OracleOutcome::Unknown
            }
        };
        self.last_conflicts = conflicts;
        outcome
    }

    fn conflicts_used(&self) -> u64 {
        self.last_conflicts
    }
}

fn lit_value(assignment: &[Option<bool>], lit: Lit) -> Option<bool> {
    assignment[lit.var().index()].map(|value| value == lit.is_positive())
}

/// Assigns `lit` true. Returns `false` if it contradicts an existing assignment.
fn assign(assignment: &mut [Option<bool>], lit: Lit) -> bool {
    match assignment[lit.var().index()] {
        Some(value) => value == lit.is_positive(),
        None => {
            assignment[lit.var().index()] = Some(lit.is_positive());
            true
        }
    }
}

/// Propagates unit clauses to a fixpoint. Returns `false` on conflict.
fn propagate(clauses: &[Vec<Lit>], assignment: &mut [Option<bool>]) -> bool {
    loop {
        let mut changed = false;
        for clause in clauses {
            let mut satisfied = false;
            let mut unassigned_count = 0;
            let mut unit_lit = None;

            for &lit in clause {
                match lit_value(assignment, lit) {
                    Some(true) => {
                        satisfied = true;
                        break;
                    }
                    Some(false) => {}
                    None => {
                        unassigned_count += 1;
                        unit_lit = Some(lit);
                    }
                }
            }

            if satisfied {
                continue;
            }
            if unassigned_count == 0 {
                return false;
            }
            if unassigned_count == 1 {
                assign(assignment, unit_lit.unwrap());
                changed = true;
            }
        }
        if !changed {
            return true;
        }
    }
}

/// Recursive DPLL search. `Some(true)`/`Some(false)` is a definite verdict, `None` means the
/// conflict budget ran out first.
fn search(
    clauses: &[Vec<Lit>],
    assignment: &mut Vec<Option<bool>>,
    budget: SolveBudget,
    conflicts: &mut u64,
) -> Option<bool> {
    let before_propagate = assignment.clone();
    if !propagate(clauses, assignment) {
        *assignment = before_propagate;
        *conflicts += 1;
        return Some(false);
    }

    let next_unassigned = assignment.iter().position(Option::is_none);
    let var_index = match next_unassigned {
        None => return Some(true),
        Some(index) => index,
    };

    if budget.is_exhausted(*conflicts) {
        return None;
    }

    let before_decision = assignment.clone();

    assignment[var_index] = Some(true);
    match search(clauses, assignment, budget, conflicts) {
        Some(true) => return Some(true),
        None => return None,
        Some(false) => {}
    }

    *assignment = before_decision.clone();
    assignment[var_index] = Some(false);
    let result = search(clauses, assignment, budget, conflicts);
    if result != Some(true) {
        *assignment = before_decision;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use candy_formula::lit;

    #[test]
    fn empty_formula_is_sat() {
        let mut solver = IncrementalSolver::new();
        assert_eq!(
            solver.solve(&[], SolveBudget::UNLIMITED),
            OracleOutcome::Sat
        );
    }

    #[test]
    fn unit_conflict_is_unsat() {
        let mut solver = IncrementalSolver::new();
        solver.add_clause(&[lit![1]]);
        solver.add_clause(&[lit![-1]]);
        assert_eq!(
            solver.solve(&[], SolveBudget::UNLIMITED),
            OracleOutcome::Unsat
        );
    }

    #[test]
    fn assumptions_drive_the_result() {
        let mut solver = IncrementalSolver::new();
        solver.add_clause(&[lit![1], lit![2]]);
        assert_eq!(
            solver.solve(&[lit![-1], lit![-2]], SolveBudget::UNLIMITED),
            OracleOutcome::Unsat
        );
        assert_eq!(
            solver.solve(&[lit![1]], SolveBudget::UNLIMITED),
            OracleOutcome::Sat
        );
    }

    #[test]
    fn fresh_vars_are_disjoint_and_monotonic() {
        let mut solver = IncrementalSolver::new();
        solver.add_clause(&[lit![1], lit![2]]);
        let a = solver.new_var();
        let b = solver.new_var();
        assert_ne!(a, b);
        assert!(solver.var_count() >= b.index() + 1);
    }

    #[test]
    fn clauses_persist_across_solve_calls() {
        let mut solver = IncrementalSolver::new();
        solver.add_clause(&[lit![1], lit![2]]);
        assert_eq!(
            solver.solve(&[lit![-1]], SolveBudget::UNLIMITED),
            OracleOutcome::Sat
        );
        solver.add_clause(&[lit![-2]]);
        assert_eq!(
            solver.solve(&[lit![-1]], SolveBudget::UNLIMITED),
            OracleOutcome::Unsat
        );
    }
}
