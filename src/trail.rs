//! The assignment trail: a history of decided and implied literals that
//! enables exact undo.

use crate::{
    clauses::ClauseId,
    lit::{Lit, LitIdx, Var},
    util::vec_map::{VecMap, VecMapIndex},
};

/// A decision level.
///
/// Wrapper around `LitIdx` for better type safety.
///
/// Level 1 is the root level holding the consequences of original unit
/// clauses; the first explicit decision raises the level to 2. Level 0 never
/// holds assignments and only occurs as the assertion level of the false
/// clause.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DecisionLevel(pub LitIdx);

impl DecisionLevel {
    /// The root level, where original unit facts are forced.
    pub const ROOT: DecisionLevel = DecisionLevel(1);

    /// The assertion level of the false clause, below every reachable level.
    pub const NONE: DecisionLevel = DecisionLevel(0);

    /// The next higher decision level.
    #[inline]
    pub fn up(self) -> DecisionLevel {
        DecisionLevel(self.0 + 1)
    }

    /// The next lower decision level.
    #[inline]
    pub fn down(self) -> DecisionLevel {
        debug_assert!(self > DecisionLevel::NONE);
        DecisionLevel(self.0 - 1)
    }
}

impl std::fmt::Debug for DecisionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

/// A position on the trail.
///
/// When processing the implication graph it is often convenient to refer to
/// literals by their position on the trail. Using this type instead of an
/// integer makes this more type safe and helps avoiding casts between `usize`
/// and `LitIdx`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TrailIndex(pub LitIdx);

impl TrailIndex {
    /// Marker for variables that are unassigned.
    ///
    /// Note that `Trail::trail_index` is only valid for assigned variables
    /// and is not guaranteed to return this for unassigned variables.
    pub const UNASSIGNED: TrailIndex = TrailIndex(LitIdx::MAX);
}

impl std::fmt::Debug for TrailIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl VecMapIndex for TrailIndex {
    #[inline(always)]
    fn vec_map_index(&self) -> usize {
        self.0 as usize
    }
}

/// The reason a literal entered the trail, the edges of the implication
/// graph.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Reason {
    /// Assigned as decision literal.
    Decision,
    /// Forced by the given clause, every other literal of which was false.
    Clause(ClauseId),
}

impl Reason {
    /// The implying clause, if the step was not a decision.
    pub fn clause(self) -> Option<ClauseId> {
        match self {
            Reason::Decision => None,
            Reason::Clause(clause) => Some(clause),
        }
    }
}

/// A step of the trail.
#[derive(Debug)]
pub struct Step {
    /// The assigned literal.
    pub lit: Lit,
    /// The decision level of this step.
    pub level: DecisionLevel,
    /// What caused the assignment.
    pub reason: Reason,
}

/// Stores a history of assignment steps, the resulting partial assignment
/// and the implication graph.
///
/// The suffix of the trail past the propagation cursor doubles as the unit
/// propagation work-list: it holds exactly the assigned literals whose
/// consequences have not been processed yet, in assignment (FIFO) order.
pub struct Trail {
    /// The step on which a variable was assigned.
    trail_index: VecMap<Var, TrailIndex>,

    /// Sequence of performed steps.
    steps: VecMap<TrailIndex, Step>,

    /// Number of steps that are fully propagated.
    propagated: usize,
}

impl Trail {
    /// Creates an empty trail for the given number of variables.
    pub fn new(var_count: usize) -> Trail {
        Trail {
            trail_index: VecMap::from(vec![TrailIndex::UNASSIGNED; var_count]),
            steps: VecMap::default(),
            propagated: 0,
        }
    }

    /// Returns the history of performed assignment steps.
    pub fn steps(&self) -> &VecMap<TrailIndex, Step> {
        &self.steps
    }

    /// Returns the index of the step that assigned a given variable.
    ///
    /// With debug assertions enabled, this will panic if the variable is not
    /// assigned by a step on the trail. For release builds, calling this for
    /// an unassigned variable might panic or return bogus data. It is memory
    /// safe in either case.
    pub fn trail_index(&self, var: Var) -> TrailIndex {
        let index = self.trail_index[var];
        debug_assert_ne!(index, TrailIndex::UNASSIGNED);
        index
    }

    /// Returns the step that assigned a given variable.
    ///
    /// The same caveats as for [`trail_index`](Self::trail_index) apply.
    pub fn step_for_var(&self, var: Var) -> &Step {
        &self.steps[self.trail_index(var)]
    }

    /// Returns the first literal that is not known to be fully propagated.
    pub fn next_unpropagated_lit(&self) -> Option<Lit> {
        self.steps.get(self.propagated).map(|step| step.lit)
    }

    /// Marks the next literal as fully propagated.
    pub fn advance_propagated(&mut self) {
        debug_assert!(self.propagated < self.steps.len());
        self.propagated += 1
    }
}

/// Appends an assignment step to the trail and assigns the corresponding
/// literal.
///
/// Split out from `Trail` so it can be called while other solver components
/// are borrowed.
pub fn assign_raw(values: &mut PartialAssignment, trail: &mut Trail, step: Step) {
    trail.trail_index[step.lit] = TrailIndex(trail.steps.len() as LitIdx);
    debug_assert!(!values.is_assigned(step.lit.var()));
    values.assign(step.lit);
    trail.steps.push(step);
}

/// Removes every step of the given level from the end of the trail, undoing
/// its assignments, and discards the remaining work-list.
pub fn unwind_level(values: &mut PartialAssignment, trail: &mut Trail, level: DecisionLevel) {
    while let Some(step) = trail.steps.last() {
        if step.level != level {
            break;
        }
        let lit = trail.steps.pop().unwrap().lit;
        values.unassign(lit.var());
        #[cfg(debug_assertions)]
        {
            // In debug builds we mark unassigned literals in `trail_index` so
            // that on invalid accesses we get a panic right away.
            trail.trail_index[lit] = TrailIndex::UNASSIGNED;
        }
    }

    trail.propagated = trail.steps.len();
}

/// A partial assignment to Boolean variables.
///
/// Each variable can be unassigned or assigned a Boolean value. Stored as one
/// byte per variable: `0` for false, `1` for true, `2` for unassigned. A
/// literal is true iff its polarity agrees with its variable's value.
pub struct PartialAssignment {
    values: VecMap<Var, u8>,
}

const UNASSIGNED: u8 = 2;

impl PartialAssignment {
    /// Creates an assignment with all of the given variables unassigned.
    pub fn new(var_count: usize) -> PartialAssignment {
        PartialAssignment {
            values: VecMap::from(vec![UNASSIGNED; var_count]),
        }
    }

    /// Assigns `true` to the given literal.
    ///
    /// A variable can be assigned `false` by assigning `true` to the negated
    /// literal.
    #[inline(always)]
    pub fn assign(&mut self, lit: Lit) {
        self.values[lit] = lit.is_positive() as u8
    }

    /// Removes any assigned value from a variable.
    #[inline(always)]
    pub fn unassign(&mut self, var: Var) {
        self.values[var] = UNASSIGNED
    }

    /// Returns `true` if the literal is assigned `true`.
    #[inline(always)]
    pub fn is_true(&self, lit: Lit) -> bool {
        self.values[lit] == lit.is_positive() as u8
    }

    /// Returns `true` if the literal is assigned `false`.
    #[inline(always)]
    pub fn is_false(&self, lit: Lit) -> bool {
        self.values[lit] == lit.is_negative() as u8
    }

    /// Returns `true` if the variable is assigned.
    #[inline(always)]
    pub fn is_assigned(&self, var: Var) -> bool {
        self.values[var] != UNASSIGNED
    }

    /// Returns the assigned value of a variable, if any.
    #[inline(always)]
    pub fn value(&self, var: Var) -> Option<bool> {
        match self.values[var] {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}
