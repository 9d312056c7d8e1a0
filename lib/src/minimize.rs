/*! DFA minimization by iterative partition refinement.

States that can't be told apart by any future input are collapsed into one
(Myhill–Nerode equivalence). The refinement is the direct fixed-point
algorithm rather than Hopcroft's: worst case O(n² · |alphabet|), but simple
and exact. The number of blocks is monotonically non-decreasing and bounded
by the reachable state count, which is what makes the loop terminate.
*/

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use rustc_hash::FxHashMap;

use crate::dfa::Dfa;
use crate::nfa::StateId;

/// A block of DFA states believed behaviorally equivalent.
type Block = BTreeSet<StateId>;

/// The destinations of one state under the sorted alphabet, expressed as
/// indices of the blocks those destinations belong to. `None` is the
/// sentinel for a missing transition. Two states in the same block with
/// equal signatures are (so far) indistinguishable.
type Signature = Vec<Option<usize>>;

impl Dfa {
    /// Returns an equivalent DFA with the minimal number of states.
    ///
    /// Unreachable states are pruned first, then the reachable ones are
    /// partitioned into accepting and non-accepting blocks and refined until
    /// a full pass produces no split. Each final block becomes one state of
    /// the result, labeled with the identities of its members. A degenerate
    /// automaton with no initial state is returned unchanged.
    pub fn minimize(&self) -> Dfa {
        let initial = match self.initial() {
            Some(id) => id,
            None => return self.clone(),
        };

        let reachable = self.reachable_states();
        let accepting: Block = reachable
            .iter()
            .copied()
            .filter(|id| self.is_accepting(*id))
            .collect();
        let non_accepting: Block =
            reachable.difference(&accepting).copied().collect();

        let mut partitions: Vec<Block> = Vec::new();
        if !non_accepting.is_empty() {
            partitions.push(non_accepting);
        }
        if !accepting.is_empty() {
            partitions.push(accepting);
        }

        loop {
            let mut changed = false;
            let mut refined = Vec::with_capacity(partitions.len());
            for block in &partitions {
                let pieces = self.split_block(block, &partitions);
                if pieces.len() > 1 {
                    changed = true;
                }
                refined.extend(pieces);
            }
            partitions = refined;
            if !changed {
                break;
            }
        }

        let minimized = self.rebuild(&partitions, initial);

        debug!(
            "minimization: {} states down to {}",
            self.state_count(),
            minimized.state_count()
        );

        minimized
    }

    /// The states reachable from the initial state via any transition.
    fn reachable_states(&self) -> BTreeSet<StateId> {
        let mut reachable = BTreeSet::new();
        let mut pending: Vec<StateId> = self.initial().into_iter().collect();
        while let Some(id) = pending.pop() {
            if !reachable.insert(id) {
                continue;
            }
            for (_, destination) in self.state(id).transitions() {
                if !reachable.contains(&destination) {
                    pending.push(destination);
                }
            }
        }
        reachable
    }

    /// Groups the members of `block` by signature. A block whose members all
    /// agree comes back whole; otherwise one sub-block per distinct
    /// signature. Grouping through a `BTreeMap` keeps the sub-block order
    /// deterministic.
    fn split_block(&self, block: &Block, partitions: &[Block]) -> Vec<Block> {
        if block.len() <= 1 {
            return vec![block.clone()];
        }
        let mut groups: BTreeMap<Signature, Block> = BTreeMap::new();
        for &id in block {
            groups
                .entry(self.signature(id, partitions))
                .or_default()
                .insert(id);
        }
        groups.into_values().collect()
    }

    fn signature(&self, id: StateId, partitions: &[Block]) -> Signature {
        self.alphabet()
            .map(|symbol| {
                self.transition(id, symbol).map(|destination| {
                    partitions
                        .iter()
                        .position(|block| block.contains(&destination))
                        .unwrap_or(usize::MAX)
                })
            })
            .collect()
    }

    /// Builds the minimized DFA: one state per block, accepting iff any
    /// member was, transitions copied from an arbitrary representative. All
    /// members of a block agree on which block every symbol leads to (that
    /// is the refinement fixed point), so any representative yields the same
    /// destination block.
    fn rebuild(&self, partitions: &[Block], initial: StateId) -> Dfa {
        let mut block_of: FxHashMap<StateId, usize> = FxHashMap::default();
        for (index, block) in partitions.iter().enumerate() {
            for &id in block {
                block_of.insert(id, index);
            }
        }

        let mut minimized = Dfa::default();
        for block in partitions {
            let accepting = block.iter().any(|id| self.is_accepting(*id));
            minimized.add_state(block.clone(), accepting);
        }
        minimized.set_initial(block_of[&initial]);

        for (index, block) in partitions.iter().enumerate() {
            let representative = match block.iter().next() {
                Some(&id) => id,
                None => continue,
            };
            for symbol in self.alphabet() {
                if let Some(destination) =
                    self.transition(representative, symbol)
                {
                    minimized.add_transition(
                        index,
                        symbol,
                        block_of[&destination],
                    );
                }
            }
        }

        minimized.set_alphabet(self.alphabet().collect());
        minimized
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use crate::dfa::Dfa;
    use crate::nfa::Nfa;
    use crate::postfix::to_postfix;
    use crate::tokens::tokenize;

    fn dfa(expression: &str) -> Dfa {
        let nfa = Nfa::from_postfix(
            &to_postfix(&tokenize(expression).unwrap()).unwrap(),
        )
        .unwrap();
        Dfa::from_nfa(&nfa)
    }

    #[test]
    fn textbook_example_has_four_states() {
        // `(a|b)*abb` minimizes to the well-known 4-state automaton.
        let minimized = dfa("(a|b)*abb").minimize();
        assert_eq!(minimized.state_count(), 4);
        assert!(minimized.matches("abb"));
        assert!(minimized.matches("aabb"));
        assert!(minimized.matches("babb"));
        assert!(!minimized.matches("aab"));
    }

    #[test]
    fn never_increases_the_state_count() {
        for expression in ["a", "a|b", "a*", "ab", "a+", "(a|b)*abb", "a?b?c?"]
        {
            let dfa = dfa(expression);
            assert!(dfa.minimize().state_count() <= dfa.state_count());
        }
    }

    #[test]
    fn idempotent() {
        let minimized = dfa("(a|b)*abb").minimize();
        assert_eq!(
            minimized.minimize().state_count(),
            minimized.state_count()
        );
    }

    #[test]
    fn distinguishes_accepting_from_non_accepting() {
        // `a` has an accepting and a non-accepting reachable state; they
        // must not collapse.
        let minimized = dfa("a").minimize();
        assert_eq!(minimized.state_count(), 2);
        assert!(minimized.matches("a"));
        assert!(!minimized.matches(""));
    }

    #[test]
    fn labels_are_the_original_identities() {
        let dfa = dfa("(a|b)*abb");
        let minimized = dfa.minimize();
        let mut covered = BTreeSet::new();
        for (_, state) in minimized.states() {
            covered.extend(state.label().iter().copied());
        }
        // The block labels cover exactly the reachable original states, and
        // subset construction only ever creates reachable states.
        assert_eq!(
            covered,
            dfa.states().map(|(id, _)| id).collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn alphabet_is_preserved() {
        let dfa = dfa("(a|b)*abb");
        let minimized = dfa.minimize();
        assert_eq!(
            minimized.alphabet().collect::<Vec<_>>(),
            dfa.alphabet().collect::<Vec<_>>()
        );
    }

    #[test]
    fn degenerate_automaton_is_returned_unchanged() {
        let empty = Dfa::default();
        let minimized = empty.minimize();
        assert_eq!(minimized.state_count(), 0);
        assert!(!minimized.matches(""));
    }
}
