//! Union: a fresh NFA with ε-edges from a new initial state to each
//! operand's (renamed) initial state.
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::automaton::{Automaton, Edge, StateId};
use crate::error::{Error, Result};

const NEW_INITIAL: &str = "union_start";

/// Builds the union of `automata`. Operand states are renamed `i::state` to
/// avoid collisions between operands; the result is typically
/// non-deterministic and is not determinized or totalized.
pub fn union(automata: &[&Automaton]) -> Result<Automaton> {
    if automata.is_empty() {
        return Err(Error::InvalidAutomaton {
            automaton: String::from("<union>"),
            detail: String::from("union requires at least one automaton"),
        });
    }

    let initial: StateId = NEW_INITIAL.into();
    let mut states: Vec<StateId> = vec![initial.clone()];
    let mut finals: HashSet<StateId> = HashSet::new();
    let mut edges: HashMap<StateId, Vec<Edge>> = HashMap::new();
    let mut init_out: Vec<Edge> = Vec::new();

    for (index, automaton) in automata.iter().enumerate() {
        let rename = |id: &StateId| -> StateId { format!("{index}::{id}").into() };

        for state in automaton.states() {
            states.push(rename(state));
        }
        for state in automaton.finals() {
            finals.insert(rename(state));
        }
        for state in automaton.states() {
            let renamed_out = automaton
                .out_edges(state)
                .iter()
                .map(|edge| Edge {
                    label: edge.label,
                    destination: rename(&edge.destination),
                })
                .collect();
            edges.insert(rename(state), renamed_out);
        }

        init_out.push(Edge {
            label: None,
            destination: rename(automaton.initial()),
        });
    }

    edges.insert(initial.clone(), init_out);

    let mut result = Automaton::new("union", initial.clone(), Vec::new());
    result.replace_graph(initial, states, finals, edges);
    result.set_deterministic(false);
    debug!(operands = automata.len(), "built union automaton");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::StateId;

    #[test_log::test]
    fn union_accepts_either_language() {
        let mut a = Automaton::new("a", "q0", Vec::<StateId>::new());
        a.add_edge(&"q0".into(), Some('a'), &"q0".into()).unwrap();
        a.set_final(&"q0".into(), true).unwrap();

        let mut b = Automaton::new("b", "q0", Vec::<StateId>::new());
        b.add_edge(&"q0".into(), Some('b'), &"q0".into()).unwrap();
        b.set_final(&"q0".into(), true).unwrap();

        let result = union(&[&a, &b]).unwrap();
        assert!(result.accepts("a"));
        assert!(result.accepts("b"));
        assert!(!result.accepts("c"));
        assert!(!result.is_deterministic());
    }
}
