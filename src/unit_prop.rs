//! Unit propagation for CNF clauses.
//!
//! This implements watch list based unit propagation. Unit propagation is the
//! process of repeatedly extending the current partial assignment by all
//! literals propagated by clauses that are unit under the current assignment,
//! until none are left or until a clause is in conflict.
//!
//! Subsumed clauses take no part in propagation: when a literal is
//! propagated, every clause containing it is marked subsumed (and journalled
//! for undo) before the clauses watching its negation are examined. A clause
//! found to contain some other true literal during a watch scan is subsumed
//! on the spot. Subsumed clauses keep their watches, so clearing the flag on
//! backtracking restores them fully.

use crate::{
    clauses::{ClauseId, Clauses},
    conflict_analysis::Conflict,
    lit::Lit,
    solver::Solver,
    trail::{self, PartialAssignment, Reason, Step},
};

/// Performs unit propagation.
///
/// Either propagates all consequences of the pending work-list and returns
/// `Ok`, or stops at the first falsified clause and returns it as the
/// conflict.
pub fn propagate(solver: &mut Solver) -> Result<(), Conflict> {
    while let Some(lit) = solver.trail.next_unpropagated_lit() {
        propagate_literal(solver, lit)?;
        solver.trail.advance_propagated();
        solver.stats.propagations += 1;
    }

    Ok(())
}

/// Processes the consequences of `lit` having been assigned true.
fn propagate_literal(solver: &mut Solver, lit: Lit) -> Result<(), Conflict> {
    // Every clause containing `lit` is satisfied now and drops out of
    // propagation until backtracking.
    solver.stats.subsumptions += solver.clauses.subsume_containing(lit);

    // Clauses watching `!lit` may have become unit or falsified.
    scan_watches(solver, !lit)
}

/// Re-examines every clause watching the now falsified literal `false_lit`.
fn scan_watches(solver: &mut Solver, false_lit: Lit) -> Result<(), Conflict> {
    let mut watches = solver.clauses.take_watch_list(false_lit);

    let mut result = Ok(());

    let mut pos = 0;
    while pos < watches.len() {
        let clause = watches[pos];

        if solver.clauses.is_subsumed(clause) {
            pos += 1;
            continue;
        }

        match scan_for_watch(&solver.values, &solver.clauses, clause, false_lit) {
            Scan::Satisfied => {
                // A true literal was found during the scan; the clause is
                // subsumed and keeps its watches.
                solver.stats.subsumptions += solver.clauses.subsume(clause) as u64;
                pos += 1;
            }
            Scan::Replacement(replacement) => {
                solver.clauses.move_watch(clause, false_lit, replacement);
                // Swap-remove moves the last entry into `pos`; advancing here
                // would skip that entry.
                watches.swap_remove(pos);
            }
            Scan::None => match solver.clauses.other_watch(clause, false_lit) {
                Some(other) if solver.values.is_true(other) => {
                    solver.stats.subsumptions += solver.clauses.subsume(clause) as u64;
                    pos += 1;
                }
                Some(other) if !solver.values.is_assigned(other.var()) => {
                    // The clause is unit and forces its other watch.
                    trail::assign_raw(
                        &mut solver.values,
                        &mut solver.trail,
                        Step {
                            lit: other,
                            level: solver.level,
                            reason: Reason::Clause(clause),
                        },
                    );
                    pos += 1;
                }
                // The other watch is false, or missing because a unit clause
                // was falsified: the clause is in conflict.
                _ => {
                    result = Err(Conflict { clause });
                    break;
                }
            },
        }
    }

    solver.clauses.restore_watch_list(false_lit, watches);

    result
}

/// Result of searching a clause for a watch replacement.
enum Scan {
    /// The clause contains a true literal and was not scanned further.
    Satisfied,
    /// A non-watched unassigned literal that can take over the watch.
    Replacement(Lit),
    /// Every candidate literal is falsified.
    None,
}

/// Searches the literal list of a clause for a replacement watch.
///
/// The list is scanned in order. A true literal ends the scan immediately;
/// falsified literals and the current watches are skipped; the first
/// remaining literal is the replacement.
fn scan_for_watch(
    values: &PartialAssignment,
    clauses: &Clauses,
    clause: ClauseId,
    false_lit: Lit,
) -> Scan {
    let (watch_a, watch_b) = clauses.watches(clause);
    debug_assert!(watch_a == Some(false_lit) || watch_b == Some(false_lit));

    for &lit in clauses.lits(clause) {
        if values.is_true(lit) {
            return Scan::Satisfied;
        }
        if values.is_false(lit) {
            continue;
        }
        if Some(lit) == watch_a || Some(lit) == watch_b {
            continue;
        }
        return Scan::Replacement(lit);
    }

    Scan::None
}
