//! Deterministic automaton: subset construction and minimization.
//!
//! Subset construction turns the epsilon-free NFA into a DFA whose states
//! are composites (sets of NFA state ids), memoized through an injective
//! composite-to-id association. Every symbol is processed for every
//! composite, so the resulting transition function is total; the empty
//! composite becomes an ordinary (dead) reject state. Minimization is Moore
//! partition refinement run to a fixpoint, not Hopcroft.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::nfa::{Nfa, StateId};

/// One DFA state. The transition function is total: `targets` has exactly
/// one destination per alphabet symbol.
#[derive(Debug, Clone)]
pub struct DfaState {
    pub targets: Vec<StateId>,
    pub is_final: bool,
    /// True while every transition ever assigned to this state is a
    /// self-loop. From such a state the verdict can no longer change.
    pub is_dead: bool,
}

/// A deterministic automaton over alphabet symbol ids.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<DfaState>,
    start: StateId,
    symbol_count: usize,
}

/// Injective association between composites and minted DFA ids, kept only
/// for the duration of subset construction.
struct CompositeIndex {
    by_composite: FxHashMap<Vec<StateId>, StateId>,
    by_id: FxHashMap<StateId, Vec<StateId>>,
}

impl CompositeIndex {
    fn new() -> Self {
        Self {
            by_composite: FxHashMap::default(),
            by_id: FxHashMap::default(),
        }
    }

    fn get(&self, composite: &[StateId]) -> Option<StateId> {
        self.by_composite.get(composite).copied()
    }

    fn insert(&mut self, composite: Vec<StateId>, id: StateId) {
        let prior = self.by_composite.insert(composite.clone(), id);
        assert!(prior.is_none(), "composite registered twice");
        let prior = self.by_id.insert(id, composite);
        assert!(prior.is_none(), "DFA id registered twice");
    }
}

impl Dfa {
    /// Powerset construction over an epsilon-free NFA.
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        let symbol_count = nfa.symbol_count();
        let mut states: Vec<DfaState> = Vec::new();
        let mut index = CompositeIndex::new();
        let mut queue: VecDeque<StateId> = VecDeque::new();

        let mint = |states: &mut Vec<DfaState>,
                    index: &mut CompositeIndex,
                    composite: Vec<StateId>|
         -> StateId {
            let id = states.len();
            states.push(DfaState {
                targets: vec![id; symbol_count],
                is_final: composite.iter().any(|&s| nfa.is_final(s)),
                is_dead: true,
            });
            index.insert(composite, id);
            id
        };

        let start_composite = vec![nfa.start()];
        let start = mint(&mut states, &mut index, start_composite);
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            let composite = index.by_id[&id].clone();

            for symbol in 0..symbol_count {
                let mut dest_composite: Vec<StateId> = Vec::new();
                for &s in &composite {
                    for &d in &nfa.state(s).targets[symbol] {
                        if let Err(pos) = dest_composite.binary_search(&d) {
                            dest_composite.insert(pos, d);
                        }
                    }
                }

                let dest = match index.get(&dest_composite) {
                    Some(existing) => existing,
                    None => {
                        let minted = mint(&mut states, &mut index, dest_composite);
                        queue.push_back(minted);
                        minted
                    }
                };

                states[id].targets[symbol] = dest;
                if dest != id {
                    states[id].is_dead = false;
                }
            }
        }

        Dfa {
            states,
            start,
            symbol_count,
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

    #[inline]
    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id]
    }

    /// Minimize by Moore partition refinement.
    ///
    /// Starts from the final/non-final split and repeatedly tests every
    /// non-leader member of each partition against its leader: two states
    /// are equivalent under the current partition map iff, for every
    /// symbol, their destinations are equal or lie in the same partition.
    /// All members failing the test against one leader move together into
    /// one fresh partition; the refinement reaches a fixpoint when the
    /// state-to-partition map stops changing. Consumes the input automaton
    /// and returns the minimized replacement.
    pub fn minimize(self) -> Dfa {
        let mut partitions: Vec<Vec<StateId>> = Vec::new();
        let finals: Vec<StateId> = (0..self.states.len())
            .filter(|&id| self.states[id].is_final)
            .collect();
        let non_finals: Vec<StateId> = (0..self.states.len())
            .filter(|&id| !self.states[id].is_final)
            .collect();
        if !finals.is_empty() {
            partitions.push(finals);
        }
        if !non_finals.is_empty() {
            partitions.push(non_finals);
        }

        let mut part_of = partition_map(&partitions, self.states.len());

        loop {
            let before = part_of.clone();
            let pass_partitions = partitions.len();

            for p in 0..pass_partitions {
                let leader = partitions[p][0];
                let mut movers = Vec::new();
                let mut kept = vec![leader];

                for &member in &partitions[p][1..] {
                    if self.equivalent(leader, member, &before) {
                        kept.push(member);
                    } else {
                        movers.push(member);
                    }
                }

                if !movers.is_empty() {
                    partitions[p] = kept;
                    partitions.push(movers);
                }
            }

            part_of = partition_map(&partitions, self.states.len());
            if part_of == before {
                break;
            }
        }

        // Materialize one state per surviving partition.
        let mut states: Vec<DfaState> = Vec::with_capacity(partitions.len());
        for members in &partitions {
            let leader = members[0];
            let targets: Vec<StateId> = (0..self.symbol_count)
                .map(|symbol| part_of[self.states[leader].targets[symbol]])
                .collect();
            let id = states.len();
            let is_dead = targets.iter().all(|&t| t == id);
            states.push(DfaState {
                targets,
                is_final: members.iter().any(|&m| self.states[m].is_final),
                is_dead,
            });
        }

        Dfa {
            states,
            start: part_of[self.start],
            symbol_count: self.symbol_count,
        }
    }

    /// Equivalence of two states relative to a partition map: destinations
    /// must be literally equal or co-resident for every symbol.
    fn equivalent(&self, a: StateId, b: StateId, part_of: &[usize]) -> bool {
        for symbol in 0..self.symbol_count {
            let ta = self.states[a].targets[symbol];
            let tb = self.states[b].targets[symbol];
            if ta != tb && part_of[ta] != part_of[tb] {
                return false;
            }
        }
        true
    }
}

fn partition_map(partitions: &[Vec<StateId>], state_count: usize) -> Vec<usize> {
    let mut part_of = vec![usize::MAX; state_count];
    for (p, members) in partitions.iter().enumerate() {
        for &member in members {
            part_of[member] = p;
        }
    }
    debug_assert!(part_of.iter().all(|&p| p != usize::MAX));
    part_of
}
