/*! Deterministic finite automata and the subset construction.

A DFA state stands for a set of NFA states, its subset label. The label is
kept for structural reasoning (minimization and diagnostics) and never used
for transition lookup, which goes through a plain (state, symbol) table.

The table is not total: the absence of an entry means "no transition", and
simulation treats it as immediate rejection. This mirrors the subset
construction, which simply adds no transition when a move-set comes out
empty.
*/

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::nfa::{Nfa, StateId};
use crate::tokens::EPSILON;

/// A single DFA state.
#[derive(Debug, Clone, Default)]
pub struct DfaState {
    /// The identities this state stands for: NFA identities for a DFA built
    /// by subset construction, original DFA identities for a minimized one.
    label: BTreeSet<StateId>,
    transitions: FxHashMap<char, StateId>,
    accepting: bool,
}

impl DfaState {
    /// The set of constituent identities this state represents.
    pub fn label(&self) -> &BTreeSet<StateId> {
        &self.label
    }

    /// True if this state is accepting.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The destination for `symbol`, if the state has a transition on it.
    pub fn destination(&self, symbol: char) -> Option<StateId> {
        self.transitions.get(&symbol).copied()
    }

    /// Iterates over this state's (symbol, destination) pairs in no
    /// particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.transitions.iter().map(|(s, d)| (*s, *d))
    }
}

/// A deterministic finite automaton.
#[derive(Debug, Clone, Default)]
pub struct Dfa {
    states: Vec<DfaState>,
    initial: Option<StateId>,
    accepting: BTreeSet<StateId>,
    alphabet: BTreeSet<char>,
}

impl Dfa {
    /// Converts an NFA into an equivalent DFA by subset construction.
    ///
    /// The initial DFA state is the epsilon-closure of the NFA's initial
    /// state. From there, every pending subset is expanded once per alphabet
    /// symbol (in sorted order): the move-set followed by its
    /// epsilon-closure either names an already materialized subset or a new
    /// one. The subset-to-identity index guarantees each distinct subset is
    /// materialized at most once, which is what makes the result
    /// deterministic. Termination follows from the bounded number of
    /// distinct subsets.
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        let mut dfa = Dfa::default();
        let initial = match nfa.initial() {
            Some(id) => id,
            None => return dfa,
        };

        let start = nfa.epsilon_closure([initial]);
        let q0 = dfa.add_state(start.clone(), nfa.contains_accepting(&start));
        dfa.initial = Some(q0);

        let mut index: FxHashMap<BTreeSet<StateId>, StateId> =
            FxHashMap::default();
        index.insert(start.clone(), q0);
        let mut pending = vec![start];

        while let Some(subset) = pending.pop() {
            let from = index[&subset];
            for symbol in nfa.alphabet() {
                let target =
                    nfa.epsilon_closure(nfa.move_set(&subset, symbol));
                if target.is_empty() {
                    // No transition on this symbol for this state.
                    continue;
                }
                let to = match index.get(&target) {
                    Some(&id) => id,
                    None => {
                        let id = dfa.add_state(
                            target.clone(),
                            nfa.contains_accepting(&target),
                        );
                        index.insert(target.clone(), id);
                        pending.push(target);
                        id
                    }
                };
                dfa.add_transition(from, symbol, to);
            }
        }

        dfa
    }

    pub(crate) fn add_state(
        &mut self,
        label: BTreeSet<StateId>,
        accepting: bool,
    ) -> StateId {
        let id = self.states.len();
        self.states.push(DfaState { label, transitions: FxHashMap::default(), accepting });
        if accepting {
            self.accepting.insert(id);
        }
        id
    }

    /// Adds a transition and registers the symbol in the alphabet. The
    /// epsilon symbol is never a valid transition key and is ignored.
    pub(crate) fn add_transition(
        &mut self,
        from: StateId,
        symbol: char,
        to: StateId,
    ) {
        if symbol == EPSILON {
            return;
        }
        self.states[from].transitions.insert(symbol, to);
        self.alphabet.insert(symbol);
    }

    pub(crate) fn set_initial(&mut self, id: StateId) {
        self.initial = Some(id);
    }

    pub(crate) fn set_alphabet(&mut self, alphabet: BTreeSet<char>) {
        self.alphabet = alphabet;
    }

    /// The number of states in the automaton.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The initial state, if the automaton has one.
    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    /// The identities of the accepting states, in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter().copied()
    }

    /// True if `id` is an accepting state.
    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting.contains(&id)
    }

    /// The automaton's alphabet, in ascending order.
    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied()
    }

    /// Iterates over all (identity, state) pairs in identity order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &DfaState)> {
        self.states.iter().enumerate()
    }

    /// The state with the given identity.
    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id]
    }

    /// The destination of `from` on `symbol`, if that transition exists.
    pub fn transition(&self, from: StateId, symbol: char) -> Option<StateId> {
        self.states[from].destination(symbol)
    }

    /// Decides whether the automaton accepts `input`.
    ///
    /// Follows the single transition per input character; a missing
    /// transition rejects immediately. An automaton with no initial state
    /// rejects every string, including the empty one.
    pub fn matches(&self, input: &str) -> bool {
        let mut current = match self.initial {
            Some(id) => id,
            None => return false,
        };
        for c in input.chars() {
            match self.states[current].destination(c) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.accepting.contains(&current)
    }
}
