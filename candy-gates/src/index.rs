//! The occurrence index: for each literal, the clauses that still mention it.
//!
//! The index owns a private copy of the input formula's clauses in an arena; everywhere else in
//! this crate a clause is named by its [`ClauseId`] rather than by value, which is the "borrowed,
//! non-owning reference into clause storage" the rest of the recognizer relies on.

use candy_formula::{CnfFormula, Lit};

/// A handle for a clause stored in a [`ClauseIndex`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseId(pub usize);

pub struct ClauseIndex {
    clauses: Vec<Vec<Lit>>,
    occurrences: Vec<Vec<ClauseId>>,
    retired: Vec<bool>,
    retired_count: usize,
}

impl ClauseIndex {
    /// Builds an index over a copy of `formula`'s clauses.
    pub fn from_formula(formula: &CnfFormula) -> ClauseIndex {
        let clauses: Vec<Vec<Lit>> = formula.iter().map(|clause| clause.to_vec()).collect();
        let mut index = ClauseIndex {
            occurrences: vec![Vec::new(); formula.var_count() * 2],
            retired: vec![false; clauses.len()],
            retired_count: 0,
            clauses,
        };
        for (id, clause) in index.clauses.iter().enumerate() {
            for &lit in clause {
                index.occurrences_mut(lit).push(ClauseId(id));
            }
        }
        index
    }

    fn occurrences_mut(&mut self, lit: Lit) -> &mut Vec<ClauseId> {
        if lit.code() >= self.occurrences.len() {
            self.occurrences.resize(lit.code() + 1, Vec::new());
        }
        &mut self.occurrences[lit.code()]
    }

    /// Number of variables the index was built with. Grows if a literal past this range is
    /// referenced, see [`ClauseIndex::push_clause`].
    pub fn var_count(&self) -> usize {
        self.occurrences.len() / 2
    }

    /// Total number of clauses ever stored, retired or not.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn clause(&self, id: ClauseId) -> &[Lit] {
        &self.clauses[id.0]
    }

    pub fn clause_ids(&self) -> impl Iterator<Item = ClauseId> {
        (0..self.clauses.len()).map(ClauseId)
    }

    /// Clauses currently mentioning `lit`, in the order they were inserted. Never contains a
    /// retired clause.
    pub fn occurrences(&self, lit: Lit) -> &[ClauseId] {
        match self.occurrences.get(lit.code()) {
            Some(occ) => occ,
            None => &[],
        }
    }

    pub fn occurrence_count(&self, lit: Lit) -> usize {
        self.occurrences(lit).len()
    }

    /// Removes a clause from every occurrence list it is part of. Idempotent.
    pub fn retire(&mut self, id: ClauseId) {
        if self.retired[id.0] {
            return;
        }
        self.retired[id.0] = true;
        self.retired_count += 1;
        for &lit in &self.clauses[id.0] {
            let occ = &mut self.occurrences[lit.code()];
            if let Some(pos) = occ.iter().position(|&c| c == id) {
                occ.swap_remove(pos);
            }
        }
    }

    pub fn retire_all(&mut self, ids: &[ClauseId]) {
        for &id in ids {
            self.retire(id);
        }
    }

    pub fn is_retired(&self, id: ClauseId) -> bool {
        self.retired[id.0]
    }

    /// Whether every clause has been retired.
    pub fn is_empty(&self) -> bool {
        self.retired_count == self.clauses.len()
    }

    /// The literal with the smallest non-zero occurrence count, ties broken by literal encoding.
    pub fn rarest_literal(&self) -> Option<Lit> {
        self.occurrences
            .iter()
            .enumerate()
            .filter(|(_, occ)| !occ.is_empty())
            .min_by_key(|&(code, occ)| (occ.len(), code))
            .map(|(code, _)| Lit::from_code(code))
    }

    /// Ids of all clauses that have not been retired.
    pub fn remaining_clauses(&self) -> Vec<ClauseId> {
        (0..self.clauses.len())
            .filter(|&i| !self.retired[i])
            .map(ClauseId)
            .collect()
    }

    /// Appends a brand-new clause to the arena (used by root normalization to synthesize the
    /// artificial AND-gate's forward clauses) and returns its id. The clause starts out retired:
    /// post-analysis synthetic clauses are never meant to be rediscovered through the index.
    pub fn push_clause(&mut self, literals: Vec<Lit>) -> ClauseId {
        for &lit in &literals {
            if lit.index() + 1 > self.var_count() {
                self.occurrences.resize((lit.index() + 1) * 2, Vec::new());
            }
        }
        let id = ClauseId(self.clauses.len());
        self.clauses.push(literals);
        self.retired.push(true);
        self.retired_count += 1;
        id
    }
}
