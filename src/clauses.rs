//! Storage for original and learned clauses, their watched literals,
//! per-literal occurrence lists and the subsumption journal.

use std::mem::take;

use crate::{
    lit::{Lit, LitIdx},
    trail::DecisionLevel,
    util::vec_map::VecMap,
};

/// Identifies a stored clause.
///
/// Original clauses are numbered from 1 in input order. Learned clauses
/// continue the numbering from `original_count + 1` in insertion order, so
/// ids stay monotone over the lifetime of a solver.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClauseId(LitIdx);

impl ClauseId {
    /// The clause with a given 1-based number.
    ///
    /// Panics if the number is zero or out of the representable range.
    #[inline]
    pub fn from_number(number: usize) -> ClauseId {
        assert!(number > 0 && number <= LitIdx::MAX as usize);
        ClauseId(number as LitIdx)
    }

    /// The 1-based number of this clause.
    #[inline]
    pub fn number(self) -> usize {
        self.0 as usize
    }

    /// Position in the clause vector.
    #[inline]
    fn idx(self) -> usize {
        self.0 as usize - 1
    }
}

impl std::fmt::Debug for ClauseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

/// A stored clause.
struct Clause {
    /// The literals, in input order for original clauses. For learned
    /// clauses the asserting literal comes first.
    lits: Vec<Lit>,

    /// The two watched literals.
    ///
    /// For a clause of size at least two these are distinct members of
    /// `lits`. Unit clauses watch their only literal with `watch_b` empty;
    /// the empty clause watches nothing and never enters a watch list.
    watch_a: Option<Lit>,
    watch_b: Option<Lit>,

    /// Whether one of the literals is currently assigned true. Maintained
    /// through the journal so undo can clear it exactly.
    subsumed: bool,

    /// Caller owned mark bit.
    marked: bool,

    /// The level at which the clause becomes unit again. Only meaningful for
    /// learned clauses.
    assertion_level: DecisionLevel,
}

/// Entry of the subsumption journal.
///
/// `Boundary` marks the start of a decision level. Undoing a level pops
/// entries down to and including the nearest boundary, clearing the
/// subsumption flag of every popped clause.
enum JournalEntry {
    /// Decision level boundary.
    Boundary,
    /// A clause that was marked subsumed at the current level.
    Subsumed(ClauseId),
}

/// Clause storage.
///
/// Holds the original clauses followed by the learned clauses, the
/// per-literal occurrence lists used for relevance queries, the watch lists
/// driving unit propagation and the learned-clause occurrence lists used for
/// eager subsumption.
pub struct Clauses {
    clauses: Vec<Clause>,
    original_count: usize,

    /// Original clauses containing a literal.
    appears_in: VecMap<Lit, Vec<ClauseId>>,

    /// Clauses (original or learned) currently watching a literal.
    watch_lists: VecMap<Lit, Vec<ClauseId>>,

    /// Learned clauses containing a literal.
    learned_lists: VecMap<Lit, Vec<ClauseId>>,

    journal: Vec<JournalEntry>,
}

impl Clauses {
    /// Creates an empty store for the given number of variables.
    pub fn new(var_count: usize) -> Clauses {
        Clauses {
            clauses: vec![],
            original_count: 0,
            appears_in: VecMap::from(vec![vec![]; var_count * 2]),
            watch_lists: VecMap::from(vec![vec![]; var_count * 2]),
            learned_lists: VecMap::from(vec![vec![]; var_count * 2]),
            journal: vec![],
        }
    }

    /// Adds an original clause, watching its first and last literal and
    /// registering it in the occurrence list of each literal.
    ///
    /// Must not be called after the first learned clause was added.
    pub fn add_original(&mut self, lits: Vec<Lit>) -> ClauseId {
        debug_assert_eq!(self.original_count, self.clauses.len());
        let id = self.push_clause(lits, DecisionLevel::NONE);
        self.original_count += 1;

        for &lit in &self.clauses[id.idx()].lits {
            self.appears_in[lit].push(id);
        }
        id
    }

    /// Adds a learned clause, watching its first and last literal and
    /// registering it in the learned occurrence list of each literal.
    pub fn add_learned(&mut self, lits: Vec<Lit>, assertion_level: DecisionLevel) -> ClauseId {
        debug_assert!(!lits.is_empty());
        let id = self.push_clause(lits, assertion_level);

        for &lit in &self.clauses[id.idx()].lits {
            self.learned_lists[lit].push(id);
        }
        id
    }

    fn push_clause(&mut self, lits: Vec<Lit>, assertion_level: DecisionLevel) -> ClauseId {
        let id = ClauseId::from_number(self.clauses.len() + 1);

        let watch_a = lits.first().copied();
        let watch_b = if lits.len() >= 2 {
            lits.last().copied()
        } else {
            None
        };
        debug_assert!(watch_a.is_none() || watch_a != watch_b);

        if let Some(lit) = watch_a {
            self.watch_lists[lit].push(id);
        }
        if let Some(lit) = watch_b {
            self.watch_lists[lit].push(id);
        }

        self.clauses.push(Clause {
            lits,
            watch_a,
            watch_b,
            subsumed: false,
            marked: false,
            assertion_level,
        });
        id
    }

    /// The number of original clauses.
    pub fn original_count(&self) -> usize {
        self.original_count
    }

    /// The number of learned clauses.
    pub fn learned_count(&self) -> usize {
        self.clauses.len() - self.original_count
    }

    /// The literals of a clause.
    pub fn lits(&self, id: ClauseId) -> &[Lit] {
        &self.clauses[id.idx()].lits
    }

    /// The assertion level of a learned clause.
    pub fn assertion_level(&self, id: ClauseId) -> DecisionLevel {
        self.clauses[id.idx()].assertion_level
    }

    /// The two watched literals of a clause.
    pub(crate) fn watches(&self, id: ClauseId) -> (Option<Lit>, Option<Lit>) {
        let clause = &self.clauses[id.idx()];
        (clause.watch_a, clause.watch_b)
    }

    /// Given one watched literal of a clause, returns the other watch.
    pub(crate) fn other_watch(&self, id: ClauseId, watched: Lit) -> Option<Lit> {
        let clause = &self.clauses[id.idx()];
        if clause.watch_a == Some(watched) {
            clause.watch_b
        } else {
            debug_assert_eq!(clause.watch_b, Some(watched));
            clause.watch_a
        }
    }

    /// Replaces the watch `from` of a clause by `to` and enters the clause
    /// into `to`'s watch list.
    ///
    /// The caller is responsible for detaching the clause from `from`'s watch
    /// list, which it usually has taken out for scanning.
    pub(crate) fn move_watch(&mut self, id: ClauseId, from: Lit, to: Lit) {
        let clause = &mut self.clauses[id.idx()];
        if clause.watch_a == Some(from) {
            clause.watch_a = Some(to);
        } else {
            debug_assert_eq!(clause.watch_b, Some(from));
            clause.watch_b = Some(to);
        }
        self.watch_lists[to].push(id);
    }

    /// Returns the watch list of a literal, replacing it with an empty list.
    pub(crate) fn take_watch_list(&mut self, lit: Lit) -> Vec<ClauseId> {
        take(&mut self.watch_lists[lit])
    }

    /// Restores a watch list that was taken with
    /// [`take_watch_list`](Self::take_watch_list).
    pub(crate) fn restore_watch_list(&mut self, lit: Lit, list: Vec<ClauseId>) {
        debug_assert!(self.watch_lists[lit].is_empty());
        self.watch_lists[lit] = list;
    }

    /// The clauses currently watching a literal.
    pub fn watch_list(&self, lit: Lit) -> &[ClauseId] {
        &self.watch_lists[lit]
    }

    /// The original clauses containing a literal.
    pub(crate) fn appears_in(&self, lit: Lit) -> &[ClauseId] {
        &self.appears_in[lit]
    }

    /// Whether a clause currently contains a true literal.
    pub fn is_subsumed(&self, id: ClauseId) -> bool {
        self.clauses[id.idx()].subsumed
    }

    /// Marks a clause subsumed, journalling the change for undo.
    ///
    /// Returns whether the clause was newly marked.
    pub(crate) fn subsume(&mut self, id: ClauseId) -> bool {
        let clause = &mut self.clauses[id.idx()];
        if clause.subsumed {
            return false;
        }
        clause.subsumed = true;
        self.journal.push(JournalEntry::Subsumed(id));
        true
    }

    /// Marks every original and learned clause containing `lit` as subsumed.
    ///
    /// Returns the number of newly subsumed clauses.
    pub(crate) fn subsume_containing(&mut self, lit: Lit) -> u64 {
        let mut subsumed = 0;
        for i in 0..self.appears_in[lit].len() {
            let id = self.appears_in[lit][i];
            subsumed += self.subsume(id) as u64;
        }
        for i in 0..self.learned_lists[lit].len() {
            let id = self.learned_lists[lit][i];
            subsumed += self.subsume(id) as u64;
        }
        subsumed
    }

    /// Pushes a decision level boundary onto the subsumption journal.
    pub(crate) fn push_boundary(&mut self) {
        self.journal.push(JournalEntry::Boundary);
    }

    /// Pops journal entries down to and including the nearest level boundary,
    /// clearing the subsumption flag of each popped clause.
    ///
    /// At the root level there is no boundary and the whole journal is
    /// drained.
    pub(crate) fn unwind_journal(&mut self) {
        while let Some(entry) = self.journal.pop() {
            match entry {
                JournalEntry::Boundary => break,
                JournalEntry::Subsumed(id) => self.clauses[id.idx()].subsumed = false,
            }
        }
    }

    /// Sets the caller owned mark of a clause.
    pub fn mark(&mut self, id: ClauseId) {
        self.clauses[id.idx()].marked = true;
    }

    /// Clears the caller owned mark of a clause.
    pub fn unmark(&mut self, id: ClauseId) {
        self.clauses[id.idx()].marked = false;
    }

    /// Whether the caller owned mark of a clause is set.
    pub fn is_marked(&self, id: ClauseId) -> bool {
        self.clauses[id.idx()].marked
    }
}

/// An asserting clause produced by conflict analysis, not yet part of the
/// clause store.
///
/// The first literal is the negation of the UIP; it is the literal forced
/// when the clause is asserted at its assertion level. The false clause is
/// the `LearnedClause` with no literals and assertion level 0: it represents
/// an unrecoverable conflict at the root level and satisfies
/// `at_assertion_level` at no level the solver can reach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LearnedClause {
    lits: Vec<Lit>,
    assertion_level: DecisionLevel,
}

impl LearnedClause {
    pub(crate) fn new(lits: Vec<Lit>, assertion_level: DecisionLevel) -> LearnedClause {
        debug_assert!(!lits.is_empty());
        debug_assert!(assertion_level >= DecisionLevel::ROOT);
        LearnedClause {
            lits,
            assertion_level,
        }
    }

    pub(crate) fn false_clause() -> LearnedClause {
        LearnedClause {
            lits: vec![],
            assertion_level: DecisionLevel::NONE,
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<Lit>, DecisionLevel) {
        (self.lits, self.assertion_level)
    }

    /// The literals of the clause, the negated UIP first.
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// The level at which the clause can be asserted.
    pub fn assertion_level(&self) -> DecisionLevel {
        self.assertion_level
    }

    /// Whether this is the false clause, i.e. a proof that the formula is
    /// unsatisfiable.
    pub fn is_false_clause(&self) -> bool {
        self.assertion_level == DecisionLevel::NONE
    }
}
