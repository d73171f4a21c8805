//! Recovers a directed acyclic gate graph from a CNF formula.
//!
//! Many CNF formulas that show up in practice (model checking, circuit verification, planning)
//! were themselves produced by clausifying a circuit or a formula built from boolean connectives.
//! That structure is implicit in the clauses but useful to recover: a preprocessor can then
//! simplify at the gate level, and search heuristics can branch on gate outputs before
//! inputs. [`analyzer::GateAnalyzer`] decodes a [`candy_formula::CnfFormula`] into a
//! [`gate::GateProblem`] — a DAG of gates plus whatever clauses it could not explain as part of
//! one — by repeatedly testing whether a literal is *blocked* against the clauses that could
//! define it (see `blocked`), confirming the definition syntactically (`pattern`) or semantically
//! (`semantic`, backed by a `candy_oracle::SatOracle`), and falling back to a resolution-based
//! decomposition test (`decompose`) when a direct blocked-pair test fails.
//!
//! Building a competitive CDCL solver is out of scope: `candy-oracle`'s plain DPLL search is
//! enough to answer the small, activation-gated satisfiability queries this crate needs.

pub mod analyzer;
pub mod blocked;
pub mod config;
pub mod decompose;
pub mod gate;
pub mod index;
pub mod mono;
pub mod pattern;
pub mod semantic;
pub mod stats;

pub use analyzer::GateAnalyzer;
pub use config::GateRecognitionConfig;
pub use gate::{GateProblem, GateRecord};
pub use index::{ClauseId, ClauseIndex};
pub use stats::Stats;
