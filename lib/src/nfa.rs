/*! Nondeterministic finite automata and Thompson's construction.

The NFA is an arena of states: identities are dense integers starting at
zero, and every edge is an identity reference into the same arena. No state
ever owns another, which sidesteps the cyclic-ownership problems that the
epsilon loops of the star construction would otherwise cause.

[`Nfa::from_postfix`] consumes a postfix token sequence and builds the
automaton fragment by fragment. Each composition rule copies its operands
into a fresh arena with renumbered identities instead of grafting them in
place, so every constructed NFA is self-contained and has a private,
contiguous identity space.
*/

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::tokens::{Operator, Token, EPSILON};
use crate::Error;

/// Identifier of a state within its owning automaton.
pub type StateId = usize;

/// A single NFA state.
///
/// Nondeterminism lives in the transition map: a symbol may lead to zero,
/// one or many destination states, and the reserved [`EPSILON`] symbol
/// labels the no-input transitions.
#[derive(Debug, Clone, Default)]
pub struct State {
    transitions: FxHashMap<char, Vec<StateId>>,
    accepting: bool,
}

impl State {
    /// True if this state is accepting.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The destinations reachable from this state on `symbol`, in insertion
    /// order. Empty when the state has no transition on `symbol`.
    pub fn destinations(&self, symbol: char) -> &[StateId] {
        self.transitions.get(&symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over this state's (symbol, destinations) pairs in no
    /// particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (char, &[StateId])> {
        self.transitions.iter().map(|(s, d)| (*s, d.as_slice()))
    }
}

/// A nondeterministic finite automaton.
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    states: Vec<State>,
    initial: Option<StateId>,
    accepting: BTreeSet<StateId>,
    alphabet: BTreeSet<char>,
}

impl Nfa {
    /// Builds the NFA for a postfix token sequence.
    ///
    /// Maintains a stack of NFA fragments; literals push a fresh two-state
    /// fragment, operators pop their operands and push the composed
    /// automaton. Fails with [`Error::MalformedPostfix`] when an operator
    /// lacks operands or the stack doesn't reduce to exactly one fragment,
    /// and with [`Error::UnexpectedToken`] when a parenthesis reaches the
    /// builder.
    pub fn from_postfix(postfix: &[Token]) -> Result<Nfa, Error> {
        let mut stack: Vec<Nfa> = Vec::new();

        for token in postfix {
            match *token {
                Token::Literal(c) | Token::Escaped(c) => {
                    stack.push(Nfa::symbol(c));
                }
                Token::Operator(op) => {
                    let composed = match op {
                        Operator::Concat => {
                            let b = pop_operand(&mut stack)?;
                            let a = pop_operand(&mut stack)?;
                            Nfa::concat(&a, &b)
                        }
                        Operator::Union => {
                            let b = pop_operand(&mut stack)?;
                            let a = pop_operand(&mut stack)?;
                            Nfa::union(&a, &b)
                        }
                        Operator::Star => Nfa::star(&pop_operand(&mut stack)?),
                        Operator::Plus => Nfa::plus(&pop_operand(&mut stack)?),
                        Operator::Optional => {
                            Nfa::optional(&pop_operand(&mut stack)?)
                        }
                    };
                    stack.push(composed);
                }
                Token::OpenParen | Token::CloseParen => {
                    return Err(Error::UnexpectedToken(*token));
                }
            }
        }

        let result = stack.pop().ok_or(Error::MalformedPostfix)?;
        if !stack.is_empty() {
            return Err(Error::MalformedPostfix);
        }
        Ok(result)
    }

    /// The fragment for a single symbol: a start state with one transition
    /// on the symbol to an accepting end state. The [`EPSILON`] symbol
    /// produces a fragment that matches only the empty string.
    fn symbol(symbol: char) -> Nfa {
        let mut nfa = Nfa::default();
        let start = nfa.add_state();
        let end = nfa.add_state();
        nfa.initial = Some(start);
        nfa.mark_accepting(end);
        nfa.add_transition(start, symbol, end);
        nfa
    }

    /// Concatenation `ab`: every accepting state of `a` gets an epsilon
    /// transition to `b`'s initial state; only `b`'s accepting states remain
    /// accepting.
    fn concat(a: &Nfa, b: &Nfa) -> Nfa {
        let mut nfa = Nfa::default();
        let offset_a = nfa.merge(a);
        let offset_b = nfa.merge(b);

        nfa.initial = a.initial.map(|id| id + offset_a);
        if let Some(b_initial) = b.initial {
            for &id in &a.accepting {
                nfa.add_transition(id + offset_a, EPSILON, b_initial + offset_b);
            }
        }
        for &id in &b.accepting {
            nfa.mark_accepting(id + offset_b);
        }
        nfa
    }

    /// Union `a|b`: a fresh initial state branches by epsilon into both
    /// operands, and every accepting state of either operand reaches a fresh
    /// final state by epsilon.
    fn union(a: &Nfa, b: &Nfa) -> Nfa {
        let mut nfa = Nfa::default();
        let start = nfa.add_state();
        let end = nfa.add_state();
        let offset_a = nfa.merge(a);
        let offset_b = nfa.merge(b);

        nfa.initial = Some(start);
        nfa.mark_accepting(end);
        if let Some(a_initial) = a.initial {
            nfa.add_transition(start, EPSILON, a_initial + offset_a);
        }
        if let Some(b_initial) = b.initial {
            nfa.add_transition(start, EPSILON, b_initial + offset_b);
        }
        for &id in &a.accepting {
            nfa.add_transition(id + offset_a, EPSILON, end);
        }
        for &id in &b.accepting {
            nfa.add_transition(id + offset_b, EPSILON, end);
        }
        nfa
    }

    /// Kleene star `a*`: the fresh initial state reaches the operand and,
    /// for the zero-repetition path, the fresh final state directly. The
    /// operand's accepting states loop back to its initial state and exit
    /// to the final state.
    fn star(a: &Nfa) -> Nfa {
        let mut nfa = Nfa::default();
        let start = nfa.add_state();
        let end = nfa.add_state();
        let offset = nfa.merge(a);

        nfa.initial = Some(start);
        nfa.mark_accepting(end);
        nfa.add_transition(start, EPSILON, end);
        if let Some(a_initial) = a.initial {
            nfa.add_transition(start, EPSILON, a_initial + offset);
            for &id in &a.accepting {
                nfa.add_transition(id + offset, EPSILON, end);
                nfa.add_transition(id + offset, EPSILON, a_initial + offset);
            }
        }
        nfa
    }

    /// One-or-more `a+`, derived as `a(a*)`. The operand is duplicated
    /// rather than bypassed with a direct loop edge; the intermediate NFA is
    /// larger but the minimized DFA is unaffected.
    fn plus(a: &Nfa) -> Nfa {
        Nfa::concat(a, &Nfa::star(a))
    }

    /// Optional `a?`, derived as the union of `a` with an epsilon-only
    /// fragment.
    fn optional(a: &Nfa) -> Nfa {
        Nfa::union(a, &Nfa::symbol(EPSILON))
    }

    /// Copies every state of `other` into this automaton, renumbering all
    /// identities and remapping the internal transitions to the copies.
    /// Returns the offset to add to an `other` identity to obtain the
    /// identity of its copy. Accepting flags and the initial state are not
    /// carried over; each composition rule decides those for itself.
    fn merge(&mut self, other: &Nfa) -> usize {
        let offset = self.states.len();
        for (id, state) in other.states.iter().enumerate() {
            let new_id = self.add_state();
            debug_assert_eq!(new_id, id + offset);
            for (symbol, destinations) in state.transitions() {
                for &destination in destinations {
                    self.add_transition(new_id, symbol, destination + offset);
                }
            }
        }
        offset
    }

    fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    fn mark_accepting(&mut self, id: StateId) {
        self.states[id].accepting = true;
        self.accepting.insert(id);
    }

    /// Adds a transition. Every non-epsilon symbol becomes part of the
    /// alphabet; the epsilon symbol never does.
    fn add_transition(&mut self, from: StateId, symbol: char, to: StateId) {
        self.states[from].transitions.entry(symbol).or_default().push(to);
        if symbol != EPSILON {
            self.alphabet.insert(symbol);
        }
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

    /// The automaton's alphabet, in ascending order. Never contains the
    /// epsilon symbol.
    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied()
    }

    /// Iterates over all (identity, state) pairs in identity order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate()
    }

    /// The epsilon-closure of a set of states: every state reachable from
    /// the seed set by epsilon transitions alone, the seed set included.
    /// Depth-first traversal; the closure set doubles as the visited set
    /// guarding against epsilon cycles.
    pub fn epsilon_closure(
        &self,
        seed: impl IntoIterator<Item = StateId>,
    ) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        let mut pending: Vec<StateId> = seed.into_iter().collect();
        while let Some(id) = pending.pop() {
            if !closure.insert(id) {
                continue;
            }
            for &next in self.states[id].destinations(EPSILON) {
                if !closure.contains(&next) {
                    pending.push(next);
                }
            }
        }
        closure
    }

    /// The states directly reachable from any state in `set` via `symbol`,
    /// without following epsilon transitions.
    pub fn move_set(
        &self,
        set: &BTreeSet<StateId>,
        symbol: char,
    ) -> BTreeSet<StateId> {
        let mut result = BTreeSet::new();
        for &id in set {
            result.extend(self.states[id].destinations(symbol));
        }
        result
    }

    /// True if `set` contains at least one accepting state.
    pub fn contains_accepting(&self, set: &BTreeSet<StateId>) -> bool {
        set.iter().any(|id| self.states[*id].accepting)
    }

    /// Decides whether the automaton accepts `input`.
    ///
    /// Simulates all nondeterministic branches at once: the configuration is
    /// the epsilon-closure of the set of states reached so far. An empty
    /// configuration rejects immediately. An automaton with no initial state
    /// rejects every string, including the empty one.
    pub fn matches(&self, input: &str) -> bool {
        let initial = match self.initial {
            Some(id) => id,
            None => return false,
        };
        let mut current = self.epsilon_closure([initial]);
        for c in input.chars() {
            if c == EPSILON {
                // The reserved symbol is not part of any alphabet, so no
                // input containing it can ever be accepted.
                return false;
            }
            current = self.epsilon_closure(self.move_set(&current, c));
            if current.is_empty() {
                return false;
            }
        }
        self.contains_accepting(&current)
    }
}

fn pop_operand(stack: &mut Vec<Nfa>) -> Result<Nfa, Error> {
    stack.pop().ok_or(Error::MalformedPostfix)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Nfa;
    use crate::postfix::to_postfix;
    use crate::tokens::{tokenize, Token};
    use crate::Error;

    fn nfa(expression: &str) -> Nfa {
        Nfa::from_postfix(&to_postfix(&tokenize(expression).unwrap()).unwrap())
            .unwrap()
    }

    #[test]
    fn symbol_fragment() {
        let nfa = nfa("a");
        assert_eq!(nfa.state_count(), 2);
        assert_eq!(nfa.initial(), Some(0));
        assert_eq!(nfa.accepting_states().collect::<Vec<_>>(), vec![1]);
        assert_eq!(nfa.alphabet().collect::<Vec<_>>(), vec!['a']);
        assert!(nfa.matches("a"));
        assert!(!nfa.matches("b"));
        assert!(!nfa.matches(""));
    }

    #[test]
    fn epsilon_never_joins_the_alphabet() {
        let nfa = nfa("a?|ε");
        assert_eq!(nfa.alphabet().collect::<Vec<_>>(), vec!['a']);
    }

    #[test]
    fn identities_are_contiguous() {
        let nfa = nfa("(a|b)*abb");
        let ids: Vec<_> = nfa.states().map(|(id, _)| id).collect();
        assert_eq!(ids, (0..nfa.state_count()).collect::<Vec<_>>());
        // Every referenced destination exists in the arena.
        for (_, state) in nfa.states() {
            for (_, destinations) in state.transitions() {
                for &d in destinations {
                    assert!(d < nfa.state_count());
                }
            }
        }
    }

    #[test]
    fn union_matches_either_operand() {
        let nfa = nfa("a|b");
        assert!(nfa.matches("a"));
        assert!(nfa.matches("b"));
        assert!(!nfa.matches("ab"));
        assert!(!nfa.matches(""));
    }

    #[test]
    fn concatenation_requires_both() {
        let nfa = nfa("ab");
        assert!(nfa.matches("ab"));
        assert!(!nfa.matches("a"));
        assert!(!nfa.matches("ba"));
    }

    #[test]
    fn star_matches_zero_or_more() {
        let nfa = nfa("a*");
        assert!(nfa.matches(""));
        assert!(nfa.matches("aaaa"));
        assert!(!nfa.matches("aab"));
    }

    #[test]
    fn plus_requires_at_least_one() {
        let nfa = nfa("a+");
        assert!(!nfa.matches(""));
        assert!(nfa.matches("a"));
        assert!(nfa.matches("aaa"));
    }

    #[test]
    fn optional_matches_zero_or_one() {
        let nfa = nfa("ab?");
        assert!(nfa.matches("a"));
        assert!(nfa.matches("ab"));
        assert!(!nfa.matches("abb"));
    }

    #[test]
    fn epsilon_atom_matches_the_empty_string() {
        let nfa = nfa("a|@");
        assert!(nfa.matches(""));
        assert!(nfa.matches("a"));
        assert!(!nfa.matches("@"));
    }

    #[test]
    fn escaped_operator_matches_literally() {
        let nfa = nfa(r"\*a");
        assert!(nfa.matches("*a"));
        assert!(!nfa.matches("a"));
    }

    #[test]
    fn epsilon_closure_follows_cycles() {
        // `(a*)*` builds epsilon cycles between the stacked star wrappers.
        let nfa = nfa("(a*)*");
        let initial = nfa.initial().unwrap();
        let closure = nfa.epsilon_closure([initial]);
        assert!(closure.contains(&initial));
        assert!(nfa.contains_accepting(&closure));
        assert!(nfa.matches(""));
        assert!(nfa.matches("aaa"));
    }

    #[test]
    fn malformed_postfix() {
        // A lone operator has no operands.
        let star = to_postfix(&tokenize("*").unwrap()).unwrap();
        assert_eq!(Nfa::from_postfix(&star).unwrap_err(), Error::MalformedPostfix);

        // Two operands with no operator don't reduce to one fragment.
        let loose = [Token::Literal('a'), Token::Literal('b')];
        assert_eq!(
            Nfa::from_postfix(&loose).unwrap_err(),
            Error::MalformedPostfix
        );
    }

    #[test]
    fn parenthesis_in_postfix_is_rejected() {
        let bogus = [Token::Literal('a'), Token::OpenParen];
        assert_eq!(
            Nfa::from_postfix(&bogus).unwrap_err(),
            Error::UnexpectedToken(Token::OpenParen)
        );
    }

    #[test]
    fn empty_postfix_is_malformed() {
        assert_eq!(Nfa::from_postfix(&[]).unwrap_err(), Error::MalformedPostfix);
    }
}
