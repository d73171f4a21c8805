//! The driver: seeds candidate output literals from unit clauses, then repeatedly promotes the
//! rarest remaining literal's clauses to roots to uncover more candidates, testing each candidate
//! against the blocked-pair/pattern/semantic/decomposition pipeline until the index is empty, the
//! try budget runs out, or the wall-clock timeout fires.

use std::collections::BTreeSet;
use std::time::Instant;

use log::{debug, info, trace};

use candy_formula::{CnfFormula, Lit};
use candy_oracle::{SatOracle, SolveBudget};

use crate::blocked;
use crate::config::GateRecognitionConfig;
use crate::decompose;
use crate::gate::{GateProblem, GateRecord};
use crate::index::{ClauseId, ClauseIndex};
use crate::mono::MonoFlags;
use crate::pattern;
use crate::semantic;

/// Which optional rules are active for one pass over a candidate queue. Used to implement
/// intensification: escalating modes run the same candidates through progressively more (and more
/// expensive) rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mode {
    patterns: bool,
    semantic: bool,
    decompose: bool,
}

/// Recovers a [`GateProblem`] from a [`CnfFormula`], using `oracle` for semantic checks.
pub struct GateAnalyzer<'o, O: SatOracle> {
    mono: MonoFlags,
    oracle: &'o mut O,
    config: GateRecognitionConfig,
    problem: GateProblem,
    start: Option<Instant>,
    timed_out: bool,
}

impl<'o, O: SatOracle> GateAnalyzer<'o, O> {
    pub fn new(formula: &CnfFormula, oracle: &'o mut O, config: GateRecognitionConfig) -> Self {
        let index = ClauseIndex::from_formula(formula);
        let mono = MonoFlags::new(index.var_count());

        if config.holistic {
            for id in index.clause_ids() {
                oracle.add_clause(index.clause(id));
            }
        }

        GateAnalyzer {
            mono,
            oracle,
            config,
            problem: GateProblem::new(index, Default::default()),
            start: None,
            timed_out: false,
        }
    }

    pub fn has_timeout(&self) -> bool {
        self.timed_out
    }

    /// Runs the recognizer to completion (or until the configured budget is exhausted) and
    /// returns the decoded gate structure.
    pub fn analyze(mut self) -> GateProblem {
        self.start = Some(Instant::now());
        info!(
            "gate analysis starting: {} vars, {} clauses",
            self.problem.index.var_count(),
            self.problem.index.clause_count()
        );

        let unit_ids: Vec<ClauseId> = self
            .problem
            .index
            .clause_ids()
            .filter(|&id| self.problem.index.clause(id).len() == 1)
            .collect();
        let unit_lits: Vec<Lit> = unit_ids
            .iter()
            .map(|&id| self.problem.index.clause(id)[0])
            .collect();
        self.problem.index.retire_all(&unit_ids);
        self.problem.add_roots(unit_ids);

        let queue = self.seed_candidates(unit_lits);
        self.run_modes(queue);

        for round in 0..self.config.tries {
            if self.is_timed_out() {
                break;
            }
            let lit = match self.problem.index.rarest_literal() {
                Some(lit) => lit,
                None => break,
            };
            trace!("try #{}: rarest literal is {:?}", round, lit);

            let clause_ids: Vec<ClauseId> = self.problem.index.occurrences(lit).to_vec();
            let lits: Vec<Lit> = clause_ids
                .iter()
                .flat_map(|&id| self.problem.index.clause(id).iter().copied())
                .collect();
            self.problem.index.retire_all(&clause_ids);
            self.problem.add_roots(clause_ids);

            let queue = self.seed_candidates(lits);
            self.run_modes(queue);
        }

        let remaining = self.problem.index.remaining_clauses();
        self.problem.index.retire_all(&remaining);
        self.problem.add_roots(remaining);

        self.problem.timed_out = self.timed_out;
        info!(
            "gate analysis finished: {} gates, {} roots, timed_out={}",
            self.problem.gate_count(),
            self.problem.roots().len(),
            self.timed_out
        );
        self.problem
    }

    fn is_timed_out(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if let Some(limit) = self.config.timeout {
            if self.start.map(|s| s.elapsed() >= limit).unwrap_or(false) {
                self.timed_out = true;
            }
        }
        self.timed_out
    }

    fn seed_candidates(&mut self, lits: Vec<Lit>) -> Vec<Lit> {
        for &lit in &lits {
            self.mono.increment(lit);
        }
        lits
    }

    fn modes(&self) -> Vec<Mode> {
        let full = Mode {
            patterns: self.config.patterns,
            semantic: self.config.semantic,
            decompose: self.config.lookahead,
        };
        if !self.config.intensify {
            return vec![full];
        }

        let mut modes = vec![
            Mode {
                patterns: self.config.patterns,
                semantic: false,
                decompose: false,
            },
            Mode {
                patterns: self.config.patterns,
                semantic: self.config.semantic,
                decompose: false,
            },
            full,
        ];
        modes.dedup();
        modes
    }

    fn run_modes(&mut self, candidates: Vec<Lit>) {
        let modes = self.modes();
        let mut queue = candidates;
        for mode in modes {
            if self.is_timed_out() {
                return;
            }
            queue = self.analyze_pass(queue, mode);
        }
    }

    /// Processes `candidates` under `mode`, committing any gates found and returning the
    /// literals that were rejected (to be retried under a stronger mode, if any).
    fn analyze_pass(&mut self, candidates: Vec<Lit>, mode: Mode) -> Vec<Lit> {
        let mut queue = candidates;
        let mut rejected = Vec::new();

        while let Some(o) = queue.pop() {
            if self.is_timed_out() {
                rejected.push(o);
                rejected.append(&mut queue);
                break;
            }
            if !self.check_candidate(o, mode, &mut queue) {
                rejected.push(o);
            }
        }

        rejected
    }

    /// The core per-candidate pipeline step: tests whether `o` is a gate output given the
    /// clauses currently indexed against `!o` and `o`, commits it if so, and pushes its inputs
    /// onto `queue`. Returns whether a gate was committed.
    fn check_candidate(&mut self, o: Lit, mode: Mode, queue: &mut Vec<Lit>) -> bool {
        let f: Vec<ClauseId> = self.problem.index.occurrences(!o).to_vec();
        if f.is_empty() {
            return false;
        }
        let g: Vec<ClauseId> = self.problem.index.occurrences(o).to_vec();

        let blocked_directly = blocked::is_blocked(o, &self.problem.index, &f, &g);
        let blocked_by_decompose = !blocked_directly
            && mode.decompose
            && decompose::ve_blocked(
                o,
                &f,
                &g,
                &self.problem.index,
                &self.mono,
                self.oracle,
                self.config.lookahead_threshold,
                SolveBudget(self.config.semantic_budget),
                &mut self.problem.stats,
            );
        if !(blocked_directly || blocked_by_decompose) {
            return false;
        }

        let mono_o = !self.mono.get(o) || !self.mono.get(!o);

        let mut s: BTreeSet<Lit> = BTreeSet::new();
        for &id in &f {
            for &lit in self.problem.index.clause(id) {
                if lit != !o {
                    s.insert(lit);
                }
            }
        }

        let mut t: BTreeSet<Lit> = BTreeSet::new();
        if !mono_o {
            for &id in &g {
                for &lit in self.problem.index.clause(id) {
                    if lit != o {
                        t.insert(!lit);
                    }
                }
            }
        }

        let pattern_match =
            !mono_o && mode.patterns && s == t && pattern::pattern_check(&f, &g, &s, &self.problem.index);
        let semantic_match = !mono_o
            && !pattern_match
            && mode.semantic
            && semantic::semantic_check(
                self.oracle,
                &self.problem.index,
                o.var(),
                &f,
                &g,
                SolveBudget(self.config.semantic_budget),
                &mut self.problem.stats,
            );

        if !(mono_o || pattern_match || semantic_match) {
            return false;
        }

        if blocked_by_decompose {
            trace!("candidate {:?} accepted via decomposition", o);
        }
        self.problem.stats.record_gate(mono_o, pattern_match, semantic_match);
        debug!(
            "committed gate {:?}: {} fwd, {} bwd, mono={}",
            o,
            f.len(),
            g.len(),
            mono_o
        );

        let inputs: Vec<Lit> = s.iter().copied().collect();
        self.problem.set_gate(
            o.var(),
            GateRecord {
                out: Some(o),
                fwd: f.clone(),
                bwd: g.clone(),
                inp: inputs.clone(),
                not_mono: !mono_o,
            },
        );

        self.problem.index.retire_all(&f);
        self.problem.index.retire_all(&g);

        for &lit in &inputs {
            self.mono.increment(lit);
            if !mono_o {
                self.mono.increment(!lit);
            }
            queue.push(lit);
        }

        true
    }
}
