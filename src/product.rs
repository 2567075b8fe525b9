//! Product construction: intersection of two or more automata.
use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::automaton::{Automaton, Edge, StateId};
use crate::error::{Error, Result};

/// Intersects two or more automata. Operands are not modified: each is
/// determinized and totalized on a private copy, over the union of both
/// alphabets, before the product is built. Folds pairwise for more than two
/// operands, which is sound because intersection is commutative and
/// associative up to language equality.
pub fn intersect(automata: &[&Automaton]) -> Result<Automaton> {
    let mut iter = automata.iter();
    let first = iter
        .next()
        .ok_or_else(|| Error::InvalidAutomaton {
            automaton: String::from("<intersect>"),
            detail: String::from("intersect requires at least one automaton"),
        })?;
    let mut acc = (*first).clone();
    for &next in iter {
        acc = intersect2(&acc, next)?;
    }
    Ok(acc)
}

/// Pairwise product construction, see [`intersect`].
fn intersect2(a: &Automaton, b: &Automaton) -> Result<Automaton> {
    let mut a = a.clone();
    let mut b = b.clone();

    let mut alphabet: Vec<char> = a.alphabet().chain(b.alphabet()).collect::<HashSet<_>>().into_iter().collect();
    alphabet.sort_unstable();

    a.make_deterministic()?;
    a.total_over(&alphabet)?;
    b.make_deterministic()?;
    b.total_over(&alphabet)?;

    let mut names: HashMap<(StateId, StateId), StateId> = HashMap::new();
    let mut order: Vec<StateId> = Vec::new();
    let mut finals: HashSet<StateId> = HashSet::new();
    let mut edges: HashMap<StateId, Vec<Edge>> = HashMap::new();
    let mut queue: VecDeque<(StateId, StateId)> = VecDeque::new();
    let mut next_id = 0usize;

    let start = (a.initial().clone(), b.initial().clone());
    let start_name: StateId = format!("q{next_id}").into();
    next_id += 1;
    names.insert(start.clone(), start_name.clone());
    order.push(start_name.clone());
    queue.push_back(start);

    while let Some((sa, sb)) = queue.pop_front() {
        let name = names[&(sa.clone(), sb.clone())].clone();
        if a.is_final(&sa) && b.is_final(&sb) {
            finals.insert(name.clone());
        }
        let out = edges.entry(name.clone()).or_default();

        for &symbol in &alphabet {
            let ta = a
                .out_edges(&sa)
                .iter()
                .find(|e| e.label == Some(symbol))
                .map(|e| e.destination.clone());
            let tb = b
                .out_edges(&sb)
                .iter()
                .find(|e| e.label == Some(symbol))
                .map(|e| e.destination.clone());
            let (Some(ta), Some(tb)) = (ta, tb) else {
                continue;
            };

            let pair = (ta, tb);
            let target_name = match names.get(&pair) {
                Some(existing) => existing.clone(),
                None => {
                    let fresh: StateId = format!("q{next_id}").into();
                    next_id += 1;
                    names.insert(pair.clone(), fresh.clone());
                    order.push(fresh.clone());
                    queue.push_back(pair);
                    fresh
                }
            };

            out.push(Edge {
                label: Some(symbol),
                destination: target_name,
            });
        }
    }

    let mut product = Automaton::new("intersection", start_name.clone(), Vec::new());
    product.replace_graph(start_name, order, finals, edges);
    product.set_deterministic(true);
    debug!(states = product.states().len(), "built product automaton");
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::StateId;

    fn star(name: &str, symbols: &[char]) -> Automaton {
        let mut a = Automaton::new(name, "q0", Vec::<StateId>::new());
        for &c in symbols {
            a.add_edge(&"q0".into(), Some(c), &"q0".into()).unwrap();
        }
        a.set_final(&"q0".into(), true).unwrap();
        a
    }

    #[test_log::test]
    fn intersect_three_way() {
        let aut1 = star("aut1", &['a', 'b', 'c']);

        let mut aut2 = Automaton::new("aut2", "q0", ["sink"].map(StateId::from));
        aut2.add_edge(&"q0".into(), Some('a'), &"q0".into()).unwrap();
        aut2.add_edge(&"q0".into(), Some('b'), &"q0".into()).unwrap();
        aut2.add_edge(&"q0".into(), Some('c'), &"sink".into()).unwrap();
        aut2.add_edge(&"sink".into(), Some('a'), &"sink".into()).unwrap();
        aut2.add_edge(&"sink".into(), Some('b'), &"sink".into()).unwrap();
        aut2.add_edge(&"sink".into(), Some('c'), &"sink".into()).unwrap();
        aut2.set_final(&"q0".into(), true).unwrap();

        let mut aut3 = Automaton::new("aut3", "q0", ["sink"].map(StateId::from));
        aut3.add_edge(&"q0".into(), Some('a'), &"q0".into()).unwrap();
        aut3.add_edge(&"q0".into(), Some('b'), &"sink".into()).unwrap();
        aut3.add_edge(&"q0".into(), Some('c'), &"sink".into()).unwrap();
        aut3.add_edge(&"sink".into(), Some('a'), &"sink".into()).unwrap();
        aut3.add_edge(&"sink".into(), Some('b'), &"sink".into()).unwrap();
        aut3.add_edge(&"sink".into(), Some('c'), &"sink".into()).unwrap();
        aut3.set_final(&"q0".into(), true).unwrap();

        let mut result = intersect(&[&aut1, &aut2, &aut3]).unwrap();
        result.minimize().unwrap();

        for word in ["", "a", "aa"] {
            assert!(result.accepts(word), "expected {word:?} to be accepted");
        }
        for word in ["b", "bb", "c", "cc"] {
            assert!(!result.accepts(word), "expected {word:?} to be rejected");
        }
    }
}
