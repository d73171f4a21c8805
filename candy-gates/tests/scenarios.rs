//! Scenario and invariant tests for the gate-structure recognizer.
//!
//! These exercise [`GateAnalyzer`] end to end against small hand-built formulas, rather than the
//! individual rule checkers each module's own unit tests cover.

use std::time::Duration;

use candy_formula::{cnf_formula, lit, CnfFormula};
use candy_gates::{ClauseId, GateAnalyzer, GateProblem, GateRecognitionConfig};
use candy_oracle::solver::IncrementalSolver;

fn analyze(formula: &CnfFormula, config: GateRecognitionConfig) -> GateProblem {
    let mut oracle = IncrementalSolver::new();
    GateAnalyzer::new(formula, &mut oracle, config).analyze()
}

/// Every input clause is either a root or a forward/backward clause of exactly one gate, and
/// vice versa: no clause id is double-counted and none goes missing.
fn assert_clause_partition_is_exact(problem: &GateProblem) {
    let mut seen = vec![false; problem.clause_count()];
    let mut mark = |id: ClauseId| {
        assert!(!seen[id.0], "clause {:?} claimed twice", id);
        seen[id.0] = true;
    };
    for &id in problem.roots() {
        mark(id);
    }
    for (_, gate) in problem.gates() {
        for &id in gate.forward_clauses() {
            mark(id);
        }
        for &id in gate.backward_clauses() {
            mark(id);
        }
    }
    assert!(seen.into_iter().all(|s| s), "some clause is neither a root nor part of a gate");
}

// S1: a full-AND gate, `o <-> (a & b)`, discoverable straight from its unit-clause root.
#[test]
fn s1_recognizes_full_and_gate() {
    let formula = cnf_formula![
        1;
        -1, 2;
        -1, 3;
        1, -2, -3;
    ];
    let problem = analyze(&formula, GateRecognitionConfig::default());

    assert_eq!(problem.gate_count(), 1);
    let gate = problem.gate(lit![1].var()).unwrap();
    assert!(!gate.has_non_monotone_parent());
    assert_eq!(gate.inputs().len(), 2);
    assert_clause_partition_is_exact(&problem);
}

// S2: a full-OR gate, `o <-> (a | b)`.
#[test]
fn s2_recognizes_full_or_gate() {
    let formula = cnf_formula![
        1;
        1, -2;
        1, -3;
        -1, 2, 3;
    ];
    let problem = analyze(&formula, GateRecognitionConfig::default());

    assert_eq!(problem.gate_count(), 1);
    let gate = problem.gate(lit![1].var()).unwrap();
    assert!(!gate.has_non_monotone_parent());
    assert_eq!(gate.inputs().len(), 2);
    assert_clause_partition_is_exact(&problem);
}

// S3: an XOR gate, `o <-> (a xor b)`, whose Tseitin clauses don't match either syntactic pattern
// (unlike the OR/AND shapes above, its forward and backward clause sets are neither singleton nor
// a complete 2^k encoding of only two inputs) but is still blocked on `o`, so it is recovered
// either via the monotone fast path or the semantic oracle depending on how `o` was reached.
#[test]
fn s3_recognizes_xor_gate() {
    let formula = cnf_formula![
        1;
        -1, 2, 3;
        -1, -2, -3;
        1, -2, 3;
        1, 2, -3;
    ];
    let problem = analyze(&formula, GateRecognitionConfig::default());

    assert_eq!(problem.gate_count(), 1);
    let gate = problem.gate(lit![1].var()).unwrap();
    // Unlike the full-OR/full-AND shapes above, an XOR's defining clauses pin both polarities of
    // each input, so both `2`/`-2` and `3`/`-3` show up among the recorded inputs.
    let input_vars: std::collections::BTreeSet<_> = gate.inputs().iter().map(|l| l.var()).collect();
    assert_eq!(input_vars.len(), 2);
    assert_clause_partition_is_exact(&problem);
}

// S4: clauses with no gate structure at all should surface entirely as roots.
#[test]
fn s4_leaves_non_gate_clauses_as_roots() {
    let formula = cnf_formula![1, 2, 3; -1, 4, 5; 2, -4, 6; -3, -5, -6;];
    let problem = analyze(&formula, GateRecognitionConfig::default());

    assert_eq!(problem.gate_count(), 0);
    assert_eq!(problem.roots().len(), formula.len());
    assert_clause_partition_is_exact(&problem);
}

// S5: no unit clauses at all, so nothing is seeded until a `tries` round promotes the rarest
// literal's clauses to roots and enqueues their literals as candidates.
#[test]
fn s5_tries_loop_recovers_gates_unreachable_from_units() {
    let formula = cnf_formula![
        8, 9;
        -1, 2;
        -1, 3;
        1, -2, -3;
    ];
    let without_tries = analyze(
        &formula,
        GateRecognitionConfig {
            tries: 0,
            ..GateRecognitionConfig::default()
        },
    );
    assert_eq!(without_tries.gate_count(), 0);
    assert_eq!(without_tries.roots().len(), formula.len());

    let with_tries = analyze(
        &formula,
        GateRecognitionConfig {
            tries: 4,
            ..GateRecognitionConfig::default()
        },
    );
    assert!(with_tries.gate_count() > without_tries.gate_count());
    assert_clause_partition_is_exact(&with_tries);
}

// S6: an immediately-expired timeout should stop the driver before it discovers anything, leaving
// every clause as a root rather than panicking or looping.
#[test]
fn s6_expired_timeout_stops_before_any_gate_is_committed() {
    let formula = cnf_formula![
        1;
        -1, 2;
        -1, 3;
        1, -2, -3;
    ];
    let config = GateRecognitionConfig {
        timeout: Some(Duration::from_secs(0)),
        ..GateRecognitionConfig::default()
    };
    let problem = analyze(&formula, config);

    assert!(problem.has_timeout());
    assert_eq!(problem.gate_count(), 0);
    assert_eq!(problem.roots().len(), formula.len());
}

// Invariant: every literal appearing in a gate's forward or backward clauses other than its own
// output is accounted for among its recorded inputs.
#[test]
fn gate_inputs_cover_every_other_literal_in_its_own_clauses() {
    let formula = cnf_formula![
        1;
        -1, 2;
        -1, 3;
        1, -2, -3;
    ];
    let problem = analyze(&formula, GateRecognitionConfig::default());

    for (_, gate) in problem.gates() {
        let out = gate.output().unwrap();
        for &id in gate.forward_clauses() {
            for &l in problem.clause(id) {
                if l != !out {
                    assert!(gate.inputs().contains(&l), "missing input {:?}", l);
                }
            }
        }
    }
}

// Invariant: a gate never lists its own output variable as one of its inputs. Uses two gates over
// disjoint variables so neither one's clauses are shared with the other's occurrence sets.
#[test]
fn gate_inputs_never_mention_the_gate_s_own_variable() {
    let formula = cnf_formula![
        1;
        -1, 2;
        -1, 3;
        1, -2, -3;
        4;
        -4, 5;
        -4, 6;
        4, -5, -6;
    ];
    let problem = analyze(&formula, GateRecognitionConfig::default());

    assert_eq!(problem.gate_count(), 2);
    for (var, gate) in problem.gates() {
        for &input in gate.inputs() {
            assert_ne!(input.var(), var);
        }
    }
}

// Invariant: normalizing the roots of an already-normalized problem is a no-op, and normalizing a
// fresh one always leaves exactly one root clause, a single positive literal.
#[test]
fn normalize_roots_always_converges_to_one_positive_unit_root() {
    let formula = cnf_formula![1, 2, 3; -1, 4, 5; 2, -4, 6;];
    let mut problem = analyze(&formula, GateRecognitionConfig::default());

    problem.normalize_roots();
    assert_eq!(problem.roots().len(), 1);
    let root_clause = problem.clause(problem.roots()[0]);
    assert_eq!(root_clause.len(), 1);
    assert!(root_clause[0].is_positive());

    let roots_before = problem.roots().to_vec();
    problem.normalize_roots();
    assert_eq!(problem.roots(), roots_before.as_slice());
}

// Invariant: enabling `intensify` must never find fewer gates than running every enabled rule in
// a single pass, since intensification only adds retries of previously-rejected candidates.
#[test]
fn intensify_never_finds_fewer_gates_than_a_single_pass() {
    let formula = cnf_formula![
        1;
        -1, 2, 3;
        -1, -2, -3;
        1, -2, 3;
        1, 2, -3;
    ];
    let plain = analyze(&formula, GateRecognitionConfig::default());
    let intensified = analyze(
        &formula,
        GateRecognitionConfig {
            intensify: true,
            lookahead: true,
            ..GateRecognitionConfig::default()
        },
    );
    assert!(intensified.gate_count() >= plain.gate_count());
}
