//! Conflict analysis: 1-UIP computation and asserting clause construction.
//!
//! When propagation runs into a falsified clause, the current-level suffix of
//! the trail holds the decision followed by the implied literals that led to
//! the conflict. The first unique implication point is the vertex that every
//! path from the decision to the conflict passes through. It is found as the
//! immediate dominator of the conflict vertex in the current-level subgraph
//! of the implication graph, computed by intersecting per-vertex dominator
//! chains in trail order.
//!
//! The asserting clause is the negated UIP together with the negations of
//! every lower-level literal appearing in the reason of a current-level
//! vertex on the conflict side of the cut. Its assertion level is the
//! highest level among those lower-level literals, or the root level for a
//! unit clause.

use std::mem::replace;

use crate::{
    clauses::{ClauseId, Clauses, LearnedClause},
    lit::{LitIdx, Var},
    solver::Solver,
    trail::{DecisionLevel, Reason, Step, Trail},
    util::vec_map::VecMap,
};

/// Record of a propagation conflict.
///
/// Replaces a trail entry for the conflict: the conflict behaves like one
/// more implied vertex whose reason is the falsified clause, but it never
/// occupies a variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// The clause whose literals are all false.
    pub clause: ClauseId,
}

/// Scratch state used exclusively during conflict analysis.
///
/// The per-variable entries are only meaningful for current-level variables
/// while [`build_asserting_clause`] runs; every analysis re-initializes the
/// entries it is going to read.
pub struct ConflictAnalysis {
    /// Trail position of a current-level variable.
    order: VecMap<Var, LitIdx>,

    /// Immediate dominator of a current-level variable within the
    /// current-level subgraph.
    dominator: VecMap<Var, Option<Var>>,

    /// Dedup bitmap for collecting lower-level reason literals.
    marked: VecMap<Var, bool>,
}

impl ConflictAnalysis {
    /// Creates analysis scratch for the given number of variables.
    pub fn new(var_count: usize) -> ConflictAnalysis {
        ConflictAnalysis {
            order: VecMap::from(vec![0; var_count]),
            dominator: VecMap::from(vec![None; var_count]),
            marked: VecMap::from(vec![false; var_count]),
        }
    }

    /// Intersects two dominator chains, returning the nearest common
    /// dominator.
    fn idom(&self, mut a: Var, mut b: Var) -> Var {
        while a != b {
            while self.order[a] < self.order[b] {
                // Dominator chains strictly decrease in order and end at the
                // level's source vertex, which dominates itself.
                b = self.dominator[b].unwrap();
            }
            while self.order[b] < self.order[a] {
                a = self.dominator[a].unwrap();
            }
        }
        a
    }
}

/// Builds the asserting clause for a recorded conflict.
///
/// Requires a conflict above the root level; root-level conflicts are turned
/// into the false clause by the caller without running the analysis.
pub(crate) fn build_asserting_clause(solver: &mut Solver, conflict: Conflict) -> LearnedClause {
    let level = solver.level;
    debug_assert!(level > DecisionLevel::ROOT);

    let uip = compute_uip(solver, conflict);

    // Mark the lower-level reason literals of every vertex on the conflict
    // side of the cut. The conflict vertex itself always is; a trail vertex
    // is iff the UIP dominates its immediate dominator.
    mark_lower_level_reasons(
        &solver.trail,
        &solver.clauses,
        &mut solver.analysis.marked,
        level,
        conflict.clause,
    );

    let mut pos = solver.trail.steps().len();
    loop {
        pos -= 1;
        let steps: &[Step] = solver.trail.steps();
        let step = &steps[pos];
        let var = step.lit.var();
        if var == uip {
            break;
        }
        debug_assert_eq!(step.level, level);

        let dominator = solver.analysis.dominator[var].unwrap();
        if solver.analysis.idom(uip, dominator) == uip {
            if let Reason::Clause(reason) = step.reason {
                mark_lower_level_reasons(
                    &solver.trail,
                    &solver.clauses,
                    &mut solver.analysis.marked,
                    level,
                    reason,
                );
            }
        }
    }

    // Collect the clause: the negated UIP first, then the negations of the
    // marked literals in trail order. Unmarking while collecting leaves the
    // bitmap clean for the next analysis.
    let uip_lit = !solver.trail.step_for_var(uip).lit;
    let mut lits = vec![uip_lit];
    let mut assertion_level = DecisionLevel::ROOT;

    for step in solver.trail.steps().iter() {
        if step.level >= level {
            break;
        }
        let var = step.lit.var();
        if replace(&mut solver.analysis.marked[var], false) {
            lits.push(!step.lit);
            if step.level > assertion_level {
                assertion_level = step.level;
            }
        }
    }

    tracing::trace!(clause = ?lits, ?assertion_level, "asserting clause");

    LearnedClause::new(lits, assertion_level)
}

/// Marks every literal of `clause` that was assigned below `level`.
fn mark_lower_level_reasons(
    trail: &Trail,
    clauses: &Clauses,
    marked: &mut VecMap<Var, bool>,
    level: DecisionLevel,
    clause: ClauseId,
) {
    for &lit in clauses.lits(clause) {
        let var = lit.var();
        if trail.step_for_var(var).level < level {
            marked[var] = true;
        }
    }
}

/// Computes the first unique implication point of the recorded conflict.
fn compute_uip(solver: &mut Solver, conflict: Conflict) -> Var {
    let level = solver.level;
    let steps: &[Step] = solver.trail.steps();

    // Find the start of the current-level suffix: the decision (or the first
    // literal forced at this level) followed by the implied literals in
    // assignment order.
    let mut start = steps.len();
    while start > 0 && steps[start - 1].level == level {
        start -= 1;
    }
    debug_assert!(
        start < steps.len(),
        "conflict without current-level assignments"
    );

    for (offset, step) in steps[start..].iter().enumerate() {
        let var = step.lit.var();
        solver.analysis.order[var] = (start + offset) as LitIdx;
        solver.analysis.dominator[var] = None;
    }

    let source = steps[start].lit.var();
    solver.analysis.dominator[source] = Some(source);

    // Fold each vertex's current-level predecessors into its immediate
    // dominator. Predecessors always precede the vertex on the trail, so
    // their dominators are final when the vertex is processed.
    for step in &steps[start + 1..] {
        let var = step.lit.var();
        let reason = match step.reason {
            Reason::Clause(clause) => clause,
            Reason::Decision => continue,
        };
        for &pred in solver.clauses.lits(reason) {
            let pred_var = pred.var();
            if pred_var == var || solver.trail.step_for_var(pred_var).level != level {
                continue;
            }
            solver.analysis.dominator[var] = Some(match solver.analysis.dominator[var] {
                None => pred_var,
                Some(dominator) => solver.analysis.idom(pred_var, dominator),
            });
        }
    }

    // The conflict vertex: its predecessors are the falsified literals of
    // the conflicting clause and its immediate dominator is the UIP.
    let mut uip = None;
    for &pred in solver.clauses.lits(conflict.clause) {
        let pred_var = pred.var();
        if solver.trail.step_for_var(pred_var).level != level {
            continue;
        }
        uip = Some(match uip {
            None => pred_var,
            Some(dominator) => solver.analysis.idom(pred_var, dominator),
        });
    }

    uip.expect("conflicting clause has no literal at the conflict level")
}

#[cfg(test)]
mod tests {
    use crate::{cnf::CnfFormula, lit::Lit, solver::Solver, trail::DecisionLevel};

    macro_rules! solver {
        ($var_count:literal vars $($($lit:literal),+);* $(;)?) => {{
            let mut cnf = CnfFormula::new($var_count).unwrap();
            $(
                cnf.add_clause(&[$(Lit::from_dimacs($lit)),*]).unwrap();
            )*
            Solver::new(cnf)
        }};
    }

    macro_rules! lits {
        ($($lit:literal),*) => {
            [$(Lit::from_dimacs($lit)),*]
        };
    }

    #[test]
    fn uip_is_the_decision() {
        let mut solver = solver![4 vars
            1, 2;
            1, 3;
            -2, -3, 4;
            1, -4;
        ];

        let learned = solver.decide(Lit::from_dimacs(-1)).expect("conflict");

        assert_eq!(learned.lits(), lits![1]);
        assert_eq!(learned.assertion_level(), DecisionLevel::ROOT);
    }

    #[test]
    fn uip_is_an_implied_vertex() {
        let mut solver = solver![4 vars
            -1, 2;
            -2, 3;
            -2, 4;
            -3, -4;
        ];

        let learned = solver.decide(Lit::from_dimacs(1)).expect("conflict");

        assert_eq!(learned.lits(), lits![-2]);
        assert_eq!(learned.assertion_level(), DecisionLevel::ROOT);
    }

    #[test]
    fn lower_level_reasons_set_the_assertion_level() {
        let mut solver = solver![3 vars
            -1, -2, 3;
            -2, -3;
        ];

        assert_eq!(solver.decide(Lit::from_dimacs(1)), None);
        let learned = solver.decide(Lit::from_dimacs(2)).expect("conflict");

        assert_eq!(learned.lits(), lits![-2, -1]);
        assert_eq!(learned.assertion_level(), DecisionLevel(2));

        solver.undo_decide();
        assert!(solver.at_assertion_level(&learned));
        assert_eq!(solver.assert_clause(learned), None);
        assert!(solver.is_true(Lit::from_dimacs(-2)));
    }
}
