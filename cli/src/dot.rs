/*! Graphviz DOT rendering of automata.

Built exclusively on the public introspection surface of the `rdfa` crate:
state enumeration, the initial state, the accepting set, and the per-state
transition maps. Accepting states are drawn as double circles, the initial
state gets an arrow from an invisible node, epsilon edges are labeled `ε`,
and DFA states carry their constituent-identity sets for traceability back
to the automaton they were built from.
*/

use itertools::Itertools;

use rdfa::{Dfa, Nfa, EPSILON};

/// Renders an NFA in DOT format.
pub fn nfa(nfa: &Nfa) -> String {
    let mut out = String::from(
        "digraph nfa {\n  rankdir=LR;\n  node [shape = circle];\n",
    );
    for id in nfa.accepting_states() {
        out.push_str(&format!("  s{} [shape = doublecircle];\n", id));
    }
    if let Some(initial) = nfa.initial() {
        out.push_str("  start [label = \"\", shape = plaintext];\n");
        out.push_str(&format!("  start -> s{};\n", initial));
    }
    for (id, state) in nfa.states() {
        for (symbol, destinations) in
            state.transitions().sorted_by_key(|(symbol, _)| *symbol)
        {
            for &destination in destinations {
                out.push_str(&format!(
                    "  s{} -> s{} [label = \"{}\"];\n",
                    id,
                    destination,
                    edge_label(symbol)
                ));
            }
        }
    }
    out.push_str("}\n");
    out
}

/// Renders a DFA in DOT format. State labels include the constituent
/// identity set of each state.
pub fn dfa(dfa: &Dfa) -> String {
    let mut out = String::from(
        "digraph dfa {\n  rankdir=LR;\n  node [shape = circle];\n",
    );
    for (id, state) in dfa.states() {
        let shape =
            if state.is_accepting() { "doublecircle" } else { "circle" };
        out.push_str(&format!(
            "  s{} [shape = {}, label = \"{}: {{{}}}\"];\n",
            id,
            shape,
            id,
            state.label().iter().join(", ")
        ));
    }
    if let Some(initial) = dfa.initial() {
        out.push_str("  start [label = \"\", shape = plaintext];\n");
        out.push_str(&format!("  start -> s{};\n", initial));
    }
    for (id, state) in dfa.states() {
        for (symbol, destination) in
            state.transitions().sorted_by_key(|(symbol, _)| *symbol)
        {
            out.push_str(&format!(
                "  s{} -> s{} [label = \"{}\"];\n",
                id,
                destination,
                edge_label(symbol)
            ));
        }
    }
    out.push_str("}\n");
    out
}

fn edge_label(symbol: char) -> String {
    match symbol {
        EPSILON => "ε".to_string(),
        '"' => "\\\"".to_string(),
        '\\' => "\\\\".to_string(),
        symbol => symbol.to_string(),
    }
}
