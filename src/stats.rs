//! Solver statistics.

/// Counters for the work performed by a solver.
#[derive(Default, Debug, Clone)]
pub struct Stats {
    /// Total number of decisions, including vacuous ones.
    pub decisions: u64,
    /// Total number of propagated assignments.
    pub propagations: u64,
    /// Total number of conflicts.
    pub conflicts: u64,
    /// Number of clauses added by asserting.
    pub learned_clauses: u64,
    /// Number of times a clause was newly marked subsumed.
    pub subsumptions: u64,
}
