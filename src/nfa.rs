//! Epsilon-NFA construction (Thompson) and epsilon elimination.
//!
//! Thompson construction walks the AST bottom-up, emitting a fragment per
//! node. A fragment is a black box: two designated states, entry and exit,
//! and nothing outside the fragment can reach its interior except through
//! the entry. After the root fragment is built, a global start and a global
//! final state are added, so the finished epsilon-NFA has exactly one start
//! and exactly one final state. Epsilon elimination relies on that.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::alphabet::Alphabet;
use crate::ast::Ast;

pub type StateId = usize;

/// Destinations of one state on one symbol. Almost always 1-2 entries.
pub type TargetSet = SmallVec<[StateId; 2]>;

/// One NFA state: per-symbol target sets plus epsilon targets.
#[derive(Debug, Clone)]
pub struct NfaState {
    pub targets: Vec<TargetSet>,
    pub epsilon: TargetSet,
    pub is_final: bool,
}

impl NfaState {
    fn new(symbol_count: usize) -> Self {
        Self {
            targets: vec![TargetSet::new(); symbol_count],
            epsilon: TargetSet::new(),
            is_final: false,
        }
    }
}

/// A nondeterministic automaton over alphabet symbol ids.
///
/// Directly after Thompson construction it carries epsilon transitions;
/// [`Nfa::eliminate_epsilon`] consumes it and returns the epsilon-free
/// equivalent over the same state ids.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    start: StateId,
    symbol_count: usize,
}

impl Nfa {
    /// Thompson-construct an epsilon-NFA from an AST.
    pub fn thompson(ast: &Ast, alphabet: &Alphabet) -> Self {
        let mut builder = NfaBuilder::new(alphabet.len());
        let fragment = builder.emit_fragment(ast, alphabet);

        // Global start and final states wrapping the root fragment.
        let start = builder.add_state();
        let finish = builder.add_state();
        builder.add_epsilon(start, fragment.entry);
        builder.add_epsilon(fragment.exit, finish);
        builder.states[finish].is_final = true;

        Nfa {
            states: builder.states,
            start,
            symbol_count: alphabet.len(),
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id]
    }

    pub fn is_final(&self, id: StateId) -> bool {
        self.states[id].is_final
    }

    #[cfg(test)]
    fn has_epsilons(&self) -> bool {
        self.states.iter().any(|s| !s.epsilon.is_empty())
    }

    /// The epsilon closure of `id`: every state reachable through epsilon
    /// transitions alone, including `id` itself. Returned sorted.
    fn epsilon_closure(&self, id: StateId) -> Vec<StateId> {
        let mut seen: FxHashSet<StateId> = FxHashSet::default();
        let mut stack = vec![id];
        seen.insert(id);

        while let Some(current) = stack.pop() {
            for &eps in &self.states[current].epsilon {
                if seen.insert(eps) {
                    stack.push(eps);
                }
            }
        }

        let mut closure: Vec<StateId> = seen.into_iter().collect();
        closure.sort_unstable();
        closure
    }

    /// Consume this epsilon-NFA and produce the equivalent NFA with no
    /// epsilon transitions.
    ///
    /// The new transition relation applies the closure on both sides of a
    /// real transition: a symbol move from `s` lands in every state of
    /// `E(d)` for every `d` reachable on that symbol from any `s' ∈ E(s)`.
    /// A state becomes final iff its closure contains the final state.
    ///
    /// Panics if the automaton does not have exactly one final state; the
    /// Thompson builder guarantees it, so a violation is an internal bug.
    pub fn eliminate_epsilon(self) -> Nfa {
        let finals: Vec<StateId> = (0..self.states.len())
            .filter(|&id| self.states[id].is_final)
            .collect();
        assert_eq!(
            finals.len(),
            1,
            "epsilon elimination requires exactly one final state"
        );
        let old_final = finals[0];

        let closures: Vec<Vec<StateId>> = (0..self.states.len())
            .map(|id| self.epsilon_closure(id))
            .collect();

        let mut states = Vec::with_capacity(self.states.len());
        for id in 0..self.states.len() {
            let mut state = NfaState::new(self.symbol_count);
            state.is_final = closures[id].binary_search(&old_final).is_ok();

            for symbol in 0..self.symbol_count {
                let mut reached: FxHashSet<StateId> = FxHashSet::default();
                for &via in &closures[id] {
                    for &dest in &self.states[via].targets[symbol] {
                        reached.extend(closures[dest].iter().copied());
                    }
                }
                let mut targets: TargetSet = reached.into_iter().collect();
                targets.sort_unstable();
                state.targets[symbol] = targets;
            }
            states.push(state);
        }

        Nfa {
            states,
            start: self.start,
            symbol_count: self.symbol_count,
        }
    }
}

/// A Thompson fragment: its designated entry and exit states.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    entry: StateId,
    exit: StateId,
}

/// Mutable state-vector builder used during Thompson construction.
struct NfaBuilder {
    states: Vec<NfaState>,
    symbol_count: usize,
}

impl NfaBuilder {
    fn new(symbol_count: usize) -> Self {
        Self {
            states: Vec::new(),
            symbol_count,
        }
    }

    fn add_state(&mut self) -> StateId {
        self.states.push(NfaState::new(self.symbol_count));
        self.states.len() - 1
    }

    fn add_transition(&mut self, from: StateId, symbol: usize, to: StateId) {
        let targets = &mut self.states[from].targets[symbol];
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        let epsilon = &mut self.states[from].epsilon;
        if !epsilon.contains(&to) {
            epsilon.push(to);
        }
    }

    /// Emit the Thompson fragment for one AST node.
    fn emit_fragment(&mut self, ast: &Ast, alphabet: &Alphabet) -> Fragment {
        match ast {
            Ast::Class(intervals) => {
                let entry = self.add_state();
                let exit = self.add_state();
                for symbol in alphabet.symbols_in(intervals) {
                    self.add_transition(entry, symbol, exit);
                }
                Fragment { entry, exit }
            }
            Ast::Epsilon => {
                let entry = self.add_state();
                let exit = self.add_state();
                self.add_epsilon(entry, exit);
                Fragment { entry, exit }
            }
            Ast::Concatenation(parts) => {
                debug_assert!(!parts.is_empty(), "parser never emits empty concatenation");
                let first = self.emit_fragment(&parts[0], alphabet);
                let mut exit = first.exit;
                for part in &parts[1..] {
                    let next = self.emit_fragment(part, alphabet);
                    self.add_epsilon(exit, next.entry);
                    exit = next.exit;
                }
                Fragment {
                    entry: first.entry,
                    exit,
                }
            }
            Ast::Alternative(branches) => {
                let entry = self.add_state();
                let exit = self.add_state();
                for branch in branches {
                    let fragment = self.emit_fragment(branch, alphabet);
                    self.add_epsilon(entry, fragment.entry);
                    self.add_epsilon(fragment.exit, exit);
                }
                Fragment { entry, exit }
            }
            Ast::Quantifier { inner, min, max } => {
                self.emit_quantifier(inner, *min, *max, alphabet)
            }
        }
    }

    /// Quantifier fragment: `min` mandatory copies chained by epsilon, then
    /// either `max - min` optional copies (each bypassable) or one looping
    /// copy for the unbounded case. Every intermediate chain point connects
    /// to the exit, so exactly `min` repetitions is always admitted.
    fn emit_quantifier(
        &mut self,
        inner: &Ast,
        min: u32,
        max: Option<u32>,
        alphabet: &Alphabet,
    ) -> Fragment {
        let entry = self.add_state();
        let exit = self.add_state();

        let mut prev = entry;
        for _ in 0..min {
            let copy = self.emit_fragment(inner, alphabet);
            self.add_epsilon(prev, copy.entry);
            prev = copy.exit;
        }

        match max {
            Some(max) => {
                for _ in min..max {
                    let copy = self.emit_fragment(inner, alphabet);
                    self.add_epsilon(prev, exit);
                    self.add_epsilon(prev, copy.entry);
                    prev = copy.exit;
                }
            }
            None => {
                let copy = self.emit_fragment(inner, alphabet);
                self.add_epsilon(prev, copy.entry);
                self.add_epsilon(copy.exit, copy.entry);
                self.add_epsilon(copy.exit, exit);
            }
        }

        self.add_epsilon(prev, exit);
        Fragment { entry, exit }
    }
}
