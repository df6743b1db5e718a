//! Solver state and the decide/undo/assert entry points.
//!
//! The solver owns the complete state of a search episode: the assignment,
//! the trail, the clause store with its subsumption journal, the analysis
//! scratch and the decision level. An external driver steers it by deciding
//! literals and reacting to the returned clauses:
//!
//! - `None` from [`decide`](Solver::decide) or
//!   [`assert_clause`](Solver::assert_clause) means propagation reached a
//!   fixpoint without conflict.
//! - A returned [`LearnedClause`] means a conflict was analyzed; the driver
//!   pops levels with [`undo_decide`](Solver::undo_decide) until
//!   [`at_assertion_level`](Solver::at_assertion_level) holds and then hands
//!   the clause back to [`assert_clause`](Solver::assert_clause).
//! - The false clause (see [`LearnedClause::is_false_clause`]) means the
//!   formula is unsatisfiable: no reachable level satisfies
//!   `at_assertion_level`.

use crate::{
    clauses::{ClauseId, Clauses, LearnedClause},
    cnf::CnfFormula,
    conflict_analysis::{self, Conflict, ConflictAnalysis},
    lit::{Lit, Var},
    stats::Stats,
    trail::{self, DecisionLevel, PartialAssignment, Reason, Step, Trail},
    unit_prop,
    util::vec_map::VecMap,
};

/// The state of a CDCL core over a fixed CNF formula.
pub struct Solver {
    pub(crate) var_count: usize,
    pub(crate) level: DecisionLevel,
    pub(crate) values: PartialAssignment,
    pub(crate) trail: Trail,
    pub(crate) clauses: Clauses,
    pub(crate) analysis: ConflictAnalysis,
    /// The most recent unresolved conflict. At the root level this flags the
    /// formula as refuted; above it, it feeds
    /// [`build_asserting_clause`](Solver::build_asserting_clause).
    pub(crate) conflict: Option<Conflict>,
    pub(crate) stats: Stats,
    var_marks: VecMap<Var, bool>,
}

impl Solver {
    /// Constructs a solver from a parsed CNF description.
    ///
    /// Builds the variable and clause tables, watches the first and last
    /// literal of every clause, forces the original unit facts at the root
    /// level and propagates them to fixpoint. A conflict among the root
    /// facts leaves the state constructed but refuted: `unit_resolution`
    /// returns false and every decision returns the false clause.
    pub fn new(cnf: CnfFormula) -> Solver {
        let var_count = cnf.var_count();
        let mut solver = Solver {
            var_count,
            level: DecisionLevel::ROOT,
            values: PartialAssignment::new(var_count),
            trail: Trail::new(var_count),
            clauses: Clauses::new(var_count),
            analysis: ConflictAnalysis::new(var_count),
            conflict: None,
            stats: Stats::default(),
            var_marks: VecMap::from(vec![false; var_count]),
        };

        for lits in cnf.into_clauses() {
            let unit = match *lits {
                [] => None,
                [unit] => Some(unit),
                _ => None,
            };
            let empty = lits.is_empty();
            let id = solver.clauses.add_original(lits);

            // Once refuted, the remaining clauses are still registered but
            // no further facts are forced.
            if solver.conflict.is_some() {
                continue;
            }
            if empty {
                solver.conflict = Some(Conflict { clause: id });
            } else if let Some(unit) = unit {
                if !solver.values.is_assigned(unit.var()) {
                    trail::assign_raw(
                        &mut solver.values,
                        &mut solver.trail,
                        Step {
                            lit: unit,
                            level: DecisionLevel::ROOT,
                            reason: Reason::Clause(id),
                        },
                    );
                } else if solver.values.is_true(unit) {
                    solver.stats.subsumptions += solver.clauses.subsume(id) as u64;
                } else {
                    solver.conflict = Some(Conflict { clause: id });
                }
            }
        }

        if solver.conflict.is_none() {
            if let Err(conflict) = unit_prop::propagate(&mut solver) {
                solver.conflict = Some(conflict);
            }
        }
        if let Some(conflict) = solver.conflict {
            solver.stats.conflicts += 1;
            tracing::debug!(clause = ?conflict.clause, "refuted by root propagation");
        }

        solver
    }

    /// The number of variables of the formula.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// The number of original clauses.
    pub fn clause_count(&self) -> usize {
        self.clauses.original_count()
    }

    /// The number of learned clauses. Zero for a freshly constructed solver.
    pub fn learned_clause_count(&self) -> usize {
        self.clauses.learned_count()
    }

    /// The current decision level.
    pub fn decision_level(&self) -> DecisionLevel {
        self.level
    }

    /// Whether the variable was assigned, by decision or by propagation.
    pub fn is_assigned(&self, var: Var) -> bool {
        self.values.is_assigned(var)
    }

    /// Whether the literal is assigned true, i.e. its polarity agrees with
    /// its variable's assigned value.
    pub fn is_true(&self, lit: Lit) -> bool {
        self.values.is_true(lit)
    }

    /// Whether every original clause mentioning the variable is subsumed.
    ///
    /// Vacuously true for a variable mentioned by no clause.
    pub fn is_irrelevant(&self, var: Var) -> bool {
        let mentions = self
            .clauses
            .appears_in(var.positive())
            .iter()
            .chain(self.clauses.appears_in(var.negative()));
        mentions.into_iter().all(|&id| self.clauses.is_subsumed(id))
    }

    /// The number of original clauses mentioning the variable.
    pub fn occurrence_count(&self, var: Var) -> usize {
        self.clauses.appears_in(var.positive()).len()
            + self.clauses.appears_in(var.negative()).len()
    }

    /// The `index`-th original clause mentioning the variable, counting the
    /// clauses containing the positive literal first.
    ///
    /// Panics if `index` is not below
    /// [`occurrence_count`](Solver::occurrence_count).
    pub fn occurrence(&self, index: usize, var: Var) -> ClauseId {
        let positive = self.clauses.appears_in(var.positive());
        if index < positive.len() {
            positive[index]
        } else {
            self.clauses.appears_in(var.negative())[index - positive.len()]
        }
    }

    /// The literals of a stored clause.
    pub fn clause_lits(&self, id: ClauseId) -> &[Lit] {
        self.clauses.lits(id)
    }

    /// Whether a stored clause currently contains a true literal.
    pub fn is_subsumed(&self, id: ClauseId) -> bool {
        self.clauses.is_subsumed(id)
    }

    /// Statistics of the work performed so far.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Sets the caller owned mark of a variable.
    pub fn mark_var(&mut self, var: Var) {
        self.var_marks[var] = true;
    }

    /// Clears the caller owned mark of a variable.
    pub fn unmark_var(&mut self, var: Var) {
        self.var_marks[var] = false;
    }

    /// Whether the caller owned mark of a variable is set.
    pub fn is_marked_var(&self, var: Var) -> bool {
        self.var_marks[var]
    }

    /// Sets the caller owned mark of a clause.
    pub fn mark_clause(&mut self, id: ClauseId) {
        self.clauses.mark(id);
    }

    /// Clears the caller owned mark of a clause.
    pub fn unmark_clause(&mut self, id: ClauseId) {
        self.clauses.unmark(id);
    }

    /// Whether the caller owned mark of a clause is set.
    pub fn is_marked_clause(&self, id: ClauseId) -> bool {
        self.clauses.is_marked(id)
    }

    /// Whether the clause can be asserted at the current decision level.
    pub fn at_assertion_level(&self, clause: &LearnedClause) -> bool {
        clause.assertion_level() == self.level
    }

    /// Decides a literal: raises the decision level, assigns the literal
    /// true and propagates.
    ///
    /// Returns `None` when propagation reaches a fixpoint, or the asserting
    /// clause of the resulting conflict. Once the formula was refuted at the
    /// root level, every decision returns the false clause.
    pub fn decide(&mut self, lit: Lit) -> Option<LearnedClause> {
        if self.conflict.is_some() && self.level == DecisionLevel::ROOT {
            return Some(LearnedClause::false_clause());
        }

        self.level = self.level.up();
        self.clauses.push_boundary();
        self.stats.decisions += 1;
        tracing::trace!(?lit, level = ?self.level, "decide");

        if self.values.is_assigned(lit.var()) {
            return self.decide_assigned(lit);
        }

        trail::assign_raw(
            &mut self.values,
            &mut self.trail,
            Step {
                lit,
                level: self.level,
                reason: Reason::Decision,
            },
        );

        match unit_prop::propagate(self) {
            Ok(()) => None,
            Err(conflict) => Some(self.analyze(conflict)),
        }
    }

    /// Handles a decision on an already assigned variable. Drivers are not
    /// expected to take this path; the outcomes keep the level accounting
    /// balanced so `undo_decide` works as usual.
    fn decide_assigned(&mut self, lit: Lit) -> Option<LearnedClause> {
        if self.values.is_true(lit) {
            // The decision is already a consequence; the level stays raised
            // and holds no assignments.
            return None;
        }

        self.stats.conflicts += 1;
        if self.trail.step_for_var(lit.var()).level == DecisionLevel::ROOT {
            // The decision contradicts a root fact. Its negation is already
            // forced at level 1, so there is no level at which an asserting
            // clause could be reasserted.
            tracing::debug!(?lit, "decision against a root fact");
            Some(LearnedClause::false_clause())
        } else {
            // The decision never reaches the trail, making it its own
            // conflict cut: learn its negation as a unit clause.
            Some(LearnedClause::new(vec![!lit], DecisionLevel::ROOT))
        }
    }

    /// Undoes the most recent decision together with everything propagation
    /// derived from it, and lowers the decision level.
    pub fn undo_decide(&mut self) {
        debug_assert!(self.level > DecisionLevel::ROOT);
        self.undo_unit_resolution();
        self.level = self.level.down();
    }

    /// Propagates the pending work-list to fixpoint.
    ///
    /// Returns false if a conflict was found; the conflict is retained for
    /// [`build_asserting_clause`](Solver::build_asserting_clause).
    pub fn unit_resolution(&mut self) -> bool {
        if self.conflict.is_some() && self.level == DecisionLevel::ROOT {
            return false;
        }
        match unit_prop::propagate(self) {
            Ok(()) => true,
            Err(conflict) => {
                self.conflict = Some(conflict);
                self.stats.conflicts += 1;
                tracing::trace!(clause = ?conflict.clause, "conflict");
                false
            }
        }
    }

    /// Undoes every assignment of the current level and the subsumptions
    /// journalled since the level started.
    pub fn undo_unit_resolution(&mut self) {
        trail::unwind_level(&mut self.values, &mut self.trail, self.level);
        self.clauses.unwind_journal();
        if self.level > DecisionLevel::ROOT {
            self.conflict = None;
        }
    }

    /// Builds the asserting clause of the recorded conflict.
    ///
    /// At the root level the conflict is unrecoverable and the false clause
    /// is returned.
    pub fn build_asserting_clause(&mut self) -> LearnedClause {
        if self.level == DecisionLevel::ROOT {
            return LearnedClause::false_clause();
        }
        debug_assert!(self.conflict.is_some());
        let conflict = self.conflict.unwrap();
        conflict_analysis::build_asserting_clause(self, conflict)
    }

    /// Asserts a clause previously built by conflict analysis.
    ///
    /// Preconditions: the clause came from this solver, is not the false
    /// clause, and [`at_assertion_level`](Solver::at_assertion_level) holds.
    /// The clause is added to the learned clauses, its asserting literal is
    /// forced and propagation runs. On a conflict a new asserting clause is
    /// returned, or the false clause when the conflict is at the root level.
    pub fn assert_clause(&mut self, clause: LearnedClause) -> Option<LearnedClause> {
        debug_assert!(!clause.is_false_clause());
        debug_assert!(self.at_assertion_level(&clause));

        let (lits, assertion_level) = clause.into_parts();
        let id = self.clauses.add_learned(lits, assertion_level);
        self.stats.learned_clauses += 1;
        tracing::trace!(clause = ?id, ?assertion_level, "assert");

        let asserted = self.clauses.lits(id)[0];
        let propagation = if !self.values.is_assigned(asserted.var()) {
            trail::assign_raw(
                &mut self.values,
                &mut self.trail,
                Step {
                    lit: asserted,
                    level: self.level,
                    reason: Reason::Clause(id),
                },
            );
            unit_prop::propagate(self)
        } else if self.values.is_true(asserted) {
            // Already established; the new clause is satisfied right away.
            self.stats.subsumptions += self.clauses.subsume(id) as u64;
            unit_prop::propagate(self)
        } else {
            Err(Conflict { clause: id })
        };

        match propagation {
            Ok(()) => None,
            Err(conflict) if self.level > DecisionLevel::ROOT => Some(self.analyze(conflict)),
            Err(conflict) => {
                self.conflict = Some(conflict);
                self.stats.conflicts += 1;
                tracing::debug!("unsatisfiable at the root level");
                Some(LearnedClause::false_clause())
            }
        }
    }

    /// Records a conflict and runs conflict analysis.
    fn analyze(&mut self, conflict: Conflict) -> LearnedClause {
        self.conflict = Some(conflict);
        self.stats.conflicts += 1;
        tracing::trace!(clause = ?conflict.clause, "conflict");
        conflict_analysis::build_asserting_clause(self, conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::TrailIndex;

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

    fn lit(number: isize) -> Lit {
        Lit::from_dimacs(number)
    }

    fn var(number: isize) -> Var {
        Var::from_dimacs(number)
    }

    /// Checks the watch, trail and implication invariants of a solver state.
    fn check_invariants(solver: &Solver) {
        let clause_count = solver.clauses.original_count() + solver.clauses.learned_count();

        // Every clause of size two or more watches two distinct member
        // literals; unit clauses watch their literal; each watch appears on
        // its literal's watch list exactly once.
        for number in 1..=clause_count {
            let id = ClauseId::from_number(number);
            let lits = solver.clauses.lits(id);
            let (watch_a, watch_b) = solver.clauses.watches(id);
            let mut expected = vec![];
            match lits.len() {
                0 => assert_eq!((watch_a, watch_b), (None, None)),
                1 => {
                    assert_eq!((watch_a, watch_b), (Some(lits[0]), None));
                    expected.push(lits[0]);
                }
                _ => {
                    let (a, b) = (watch_a.unwrap(), watch_b.unwrap());
                    assert_ne!(a, b, "clause {id:?} watches a single literal");
                    assert!(lits.contains(&a) && lits.contains(&b));
                    expected.push(a);
                    expected.push(b);
                }
            }
            for index in 0..solver.var_count() * 2 {
                let lit = Lit::from_index(index / 2, index % 2 == 1);
                let entries = solver
                    .clauses
                    .watch_list(lit)
                    .iter()
                    .filter(|&&entry| entry == id)
                    .count();
                assert_eq!(
                    entries,
                    expected.iter().filter(|&&watch| watch == lit).count(),
                    "watch list of {lit:?} disagrees with clause {id:?}"
                );
            }
        }

        // Every variable appears on the trail at most once, and exactly the
        // assigned variables are on it.
        let mut seen = vec![false; solver.var_count()];
        for step in solver.trail.steps().iter() {
            let var = step.lit.var();
            assert!(!seen[var.index()], "{var:?} appears twice on the trail");
            seen[var.index()] = true;
            assert!(solver.values.is_true(step.lit));
        }
        for index in 0..solver.var_count() {
            assert_eq!(seen[index], solver.is_assigned(Var::from_index(index)));
        }

        // Every implied trail entry is the sole non-falsified literal of its
        // implying clause, and the falsifying assignments precede it.
        for (position, step) in solver.trail.steps().iter().enumerate() {
            if let Reason::Clause(reason) = step.reason {
                let lits = solver.clauses.lits(reason);
                assert!(lits.contains(&step.lit));
                for &other in lits {
                    if other != step.lit {
                        assert!(solver.values.is_false(other));
                        assert!(solver.trail.trail_index(other.var()) < TrailIndex(position as _));
                    }
                }
            }
        }
    }

    /// Observable state of a solver, for undo round-trip checks.
    #[derive(Debug, PartialEq, Eq)]
    struct Snapshot {
        level: DecisionLevel,
        values: Vec<Option<bool>>,
        trail: Vec<Lit>,
        subsumed: Vec<bool>,
        watches: Vec<(Option<Lit>, Option<Lit>)>,
        learned_count: usize,
    }

    fn snapshot(solver: &Solver) -> Snapshot {
        let clause_count = solver.clauses.original_count() + solver.clauses.learned_count();
        let ids = (1..=clause_count).map(ClauseId::from_number);
        Snapshot {
            level: solver.decision_level(),
            values: (0..solver.var_count())
                .map(|index| solver.values.value(Var::from_index(index)))
                .collect(),
            trail: solver.trail.steps().iter().map(|step| step.lit).collect(),
            subsumed: ids.clone().map(|id| solver.is_subsumed(id)).collect(),
            watches: ids.map(|id| solver.clauses.watches(id)).collect(),
            learned_count: solver.learned_clause_count(),
        }
    }

    /// Checks that a learned clause is satisfied by every total assignment
    /// satisfying the original clauses.
    fn check_entailed(solver: &Solver, learned: &LearnedClause) {
        let var_count = solver.var_count();
        for assignment in 0..1u32 << var_count {
            let satisfies = |lit: Lit| {
                let value = assignment & (1 << lit.index()) != 0;
                value == lit.is_positive()
            };
            let satisfies_all = (1..=solver.clause_count()).all(|number| {
                solver
                    .clause_lits(ClauseId::from_number(number))
                    .iter()
                    .any(|&lit| satisfies(lit))
            });
            if satisfies_all {
                assert!(
                    learned.lits().iter().any(|&lit| satisfies(lit)),
                    "learned clause {learned:?} not entailed"
                );
            }
        }
    }

    #[test]
    fn decide_then_learn_then_refute() {
        let mut solver = solver![2 vars
            1, 2;
            -1, 2;
            1, -2;
            -1, -2;
        ];

        let learned = solver.decide(lit(1)).expect("conflict");
        assert_eq!(learned.lits(), lits![-1]);
        assert_eq!(learned.assertion_level(), DecisionLevel::ROOT);
        check_entailed(&solver, &learned);
        check_invariants(&solver);

        assert!(!solver.at_assertion_level(&learned));
        solver.undo_decide();
        assert!(solver.at_assertion_level(&learned));
        check_invariants(&solver);

        let refutation = solver.assert_clause(learned).expect("unsatisfiable");
        assert!(refutation.is_false_clause());
        assert_eq!(refutation.assertion_level(), DecisionLevel::NONE);
        assert!(!solver.at_assertion_level(&refutation));

        // Refuted at the root: every further decision is hopeless.
        let again = solver.decide(lit(2)).expect("refuted");
        assert!(again.is_false_clause());
    }

    #[test]
    fn propagation_subsumes_satisfied_clauses() {
        let mut solver = solver![3 vars
            1, 2, 3;
        ];

        assert_eq!(solver.decide(lit(-1)), None);
        assert_eq!(solver.decide(lit(-2)), None);

        assert!(solver.is_true(lit(3)));
        assert!(solver.is_irrelevant(var(3)));
        check_invariants(&solver);

        solver.undo_decide();
        assert!(!solver.is_irrelevant(var(3)));
        assert!(!solver.is_assigned(var(3)));
        check_invariants(&solver);
    }

    #[test]
    fn construction_propagates_root_units() {
        let solver = solver![2 vars
            1;
            -1, 2;
        ];

        assert!(solver.is_true(lit(1)));
        assert!(solver.is_true(lit(2)));
        assert_eq!(solver.decision_level(), DecisionLevel::ROOT);
        assert_eq!(solver.learned_clause_count(), 0);
        for step in solver.trail.steps().iter() {
            assert_eq!(step.level, DecisionLevel::ROOT);
            assert!(step.reason.clause().is_some());
        }
        check_invariants(&solver);
    }

    #[test]
    fn decision_against_root_fact() {
        let mut solver = solver![1 vars
            1;
        ];

        let refutation = solver.decide(lit(-1)).expect("hopeless decision");
        assert!(refutation.is_false_clause());
    }

    #[test]
    fn decision_against_a_propagated_literal() {
        let mut solver = solver![2 vars
            -1, -2;
        ];

        // Deciding 1 falsifies variable 2 above the root level; deciding 2
        // on top of that never reaches the trail and learns its negation.
        assert_eq!(solver.decide(lit(1)), None);
        assert!(solver.is_true(lit(-2)));

        let learned = solver.decide(lit(2)).expect("conflicting decision");
        assert_eq!(learned.lits(), lits![-2]);
        assert_eq!(learned.assertion_level(), DecisionLevel::ROOT);

        // The failed decision still opened a level, so undo stays balanced.
        solver.undo_decide();
        assert_eq!(solver.decision_level(), DecisionLevel(2));
        assert!(solver.is_true(lit(-2)));
        check_invariants(&solver);
    }

    #[test]
    fn vacuous_decision() {
        let mut solver = solver![2 vars
            1;
            2, -2;
        ];

        assert_eq!(solver.decide(lit(1)), None);
        assert_eq!(solver.decision_level(), DecisionLevel(2));
        solver.undo_decide();
        assert_eq!(solver.decision_level(), DecisionLevel::ROOT);
        check_invariants(&solver);
    }

    #[test]
    fn uip_cut_learns_a_unit() {
        let mut solver = solver![4 vars
            1, 2;
            1, 3;
            -2, -3, 4;
            1, -4;
        ];

        let learned = solver.decide(lit(-1)).expect("conflict");
        assert_eq!(learned.lits(), lits![1]);
        assert_eq!(learned.assertion_level(), DecisionLevel::ROOT);
        check_entailed(&solver, &learned);

        solver.undo_decide();
        assert_eq!(solver.assert_clause(learned), None);
        assert!(solver.is_true(lit(1)));
        check_invariants(&solver);
    }

    #[test]
    fn undo_restores_the_exact_state() {
        let mut solver = solver![4 vars
            1, 2;
            1, 3;
            -2, -3, 4;
            1, -4;
        ];

        let before = snapshot(&solver);
        solver.decide(lit(-1)).expect("conflict");
        solver.undo_decide();
        assert_eq!(snapshot(&solver), before);
        check_invariants(&solver);

        // A non-conflicting decide/undo round trip as well.
        let mut solver = solver![4 vars
            1, 2, 3;
            -3, 2;
        ];
        assert_eq!(solver.decide(lit(-2)), None);
        let before = snapshot(&solver);
        assert_eq!(solver.decide(lit(-4)), None);
        solver.undo_decide();
        assert_eq!(snapshot(&solver), before);
        check_invariants(&solver);
    }

    #[test]
    fn unit_resolution_is_idempotent() {
        let mut solver = solver![3 vars
            -1, 2;
            -2, 3;
        ];

        assert_eq!(solver.decide(lit(1)), None);
        assert!(solver.unit_resolution());
        let before = snapshot(&solver);
        assert!(solver.unit_resolution());
        assert_eq!(snapshot(&solver), before);
    }

    #[test]
    fn opposing_units_refute_at_construction() {
        let mut solver = solver![1 vars
            1;
            -1;
        ];

        assert!(!solver.unit_resolution());
        let refutation = solver.decide(lit(1)).expect("refuted");
        assert!(refutation.is_false_clause());
        assert!(solver.build_asserting_clause().is_false_clause());
    }

    #[test]
    fn empty_clause_refutes_at_construction() {
        let mut cnf = CnfFormula::new(2).unwrap();
        cnf.add_clause(&lits![1, 2]).unwrap();
        cnf.add_clause(&[]).unwrap();
        let mut solver = Solver::new(cnf);

        assert!(!solver.unit_resolution());
        assert!(solver.decide(lit(1)).expect("refuted").is_false_clause());
    }

    #[test]
    fn driver_loop_solves_a_satisfiable_formula() {
        // Exercises the full decide/backtrack/assert protocol the way an
        // external driver would, on a formula with one model.
        let mut solver = solver![3 vars
            -1, 2;
            -2, 3;
            -3, 1;
            1, 2, 3;
        ];

        let mut pending = solver.decide(lit(-1));
        while let Some(learned) = pending.take() {
            assert!(!learned.is_false_clause());
            while !solver.at_assertion_level(&learned) {
                solver.undo_decide();
            }
            check_entailed(&solver, &learned);
            pending = solver.assert_clause(learned);
        }

        // The formula forces all variables true.
        assert!(solver.is_true(lit(1)));
        assert!(solver.is_true(lit(2)));
        assert!(solver.is_true(lit(3)));
        check_invariants(&solver);
    }

    #[test]
    fn occurrence_queries() {
        let solver = solver![3 vars
            1, 2;
            -1, 3;
            2, -3;
        ];

        assert_eq!(solver.occurrence_count(var(1)), 2);
        assert_eq!(solver.occurrence(0, var(1)), ClauseId::from_number(1));
        assert_eq!(solver.occurrence(1, var(1)), ClauseId::from_number(2));
        assert_eq!(solver.occurrence_count(var(2)), 2);
        assert_eq!(
            solver.clause_lits(ClauseId::from_number(3)),
            lits![2, -3]
        );
    }

    #[test]
    fn caller_marks_are_plain_state() {
        let mut solver = solver![2 vars
            1, 2;
        ];

        assert!(!solver.is_marked_var(var(1)));
        solver.mark_var(var(1));
        assert!(solver.is_marked_var(var(1)));
        solver.unmark_var(var(1));
        assert!(!solver.is_marked_var(var(1)));

        let id = ClauseId::from_number(1);
        solver.mark_clause(id);
        assert!(solver.is_marked_clause(id));
        solver.unmark_clause(id);
        assert!(!solver.is_marked_clause(id));
    }

    #[test]
    fn stats_track_the_search() {
        let mut solver = solver![3 vars
            1, 2;
        ];

        assert_eq!(solver.stats().decisions, 0);
        assert_eq!(solver.decide(lit(-1)), None);
        assert_eq!(solver.decide(lit(-3)), None);
        let stats = solver.stats();
        assert_eq!(stats.decisions, 2);
        assert!(stats.propagations >= 3);
        assert_eq!(stats.conflicts, 0);
        assert!(stats.subsumptions >= 1);
    }
}
