//! CNF formula descriptions consumed by the solver constructor.
//!
//! Reading CNF input (e.g. DIMACS files) is the caller's concern. The caller
//! hands over the parsed result as a [`CnfFormula`]: a variable count and a
//! list of clauses, each clause a list of literals.

use thiserror::Error;

use crate::lit::{Lit, Var};

/// Error while building a [`CnfFormula`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CnfError {
    /// The declared variable count exceeds the supported range.
    #[error("unsupported variable count {var_count}")]
    UnsupportedVarCount {
        /// The declared variable count.
        var_count: usize,
    },
    /// A clause literal refers to a variable outside the declared range.
    #[error("literal {lit} outside the declared variable range 1..={var_count}")]
    LitOutOfRange {
        /// The out of range literal.
        lit: Lit,
        /// The declared variable count.
        var_count: usize,
    },
}

/// A parsed CNF description.
///
/// Literal validity is checked when a clause is added, so a formula that was
/// built successfully can be consumed by the solver without further checks.
/// Repeated occurrences of the same literal within one clause are dropped;
/// clauses containing complementary literals are kept as given.
pub struct CnfFormula {
    var_count: usize,
    clauses: Vec<Vec<Lit>>,
}

impl CnfFormula {
    /// Creates a formula over the given number of variables with no clauses.
    pub fn new(var_count: usize) -> Result<CnfFormula, CnfError> {
        if var_count > Var::MAX_VAR_COUNT {
            return Err(CnfError::UnsupportedVarCount { var_count });
        }
        Ok(CnfFormula {
            var_count,
            clauses: vec![],
        })
    }

    /// Appends a clause to the formula.
    ///
    /// The literal order is preserved, apart from dropping any literal that
    /// repeats an earlier literal of the same clause.
    pub fn add_clause(&mut self, lits: &[Lit]) -> Result<(), CnfError> {
        let mut clause = Vec::with_capacity(lits.len());
        for &lit in lits {
            if lit.index() >= self.var_count {
                return Err(CnfError::LitOutOfRange {
                    lit,
                    var_count: self.var_count,
                });
            }
            if !clause.contains(&lit) {
                clause.push(lit);
            }
        }
        self.clauses.push(clause);
        Ok(())
    }

    /// The number of variables of the formula.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// The clauses of the formula, in the order they were added.
    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    /// Consumes the formula, returning its clauses.
    pub(crate) fn into_clauses(self) -> Vec<Vec<Lit>> {
        self.clauses
    }
}
