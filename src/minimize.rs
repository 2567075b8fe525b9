//! Minimization by partition refinement (Moore-style), after determinizing,
//! totalizing and pruning unreachable states.
use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::automaton::{Automaton, Edge, StateId};
use crate::error::Result;

impl Automaton {
    /// Minimizes in place. Requires the automaton to be a total DFA
    /// afterwards: determinizes and totalizes first (both no-ops if
    /// already in that shape). Unreachable states are pruned before
    /// refinement.
    pub fn minimize(&mut self) -> Result<()> {
        self.make_deterministic()?;
        self.make_total()?;

        let reachable = self.reachable_states();
        let mut alphabet: Vec<char> = self.alphabet().collect();
        alphabet.sort_unstable();

        let mut partition: HashMap<StateId, usize> = HashMap::new();
        for state in &reachable {
            partition.insert(state.clone(), if self.is_final(state) { 1 } else { 0 });
        }
        loop {
            let mut signatures: HashMap<Vec<usize>, usize> = HashMap::new();
            let mut next_partition: HashMap<StateId, usize> = HashMap::new();
            let mut next_id = 0usize;

            // Stable iteration: states() order, restricted to reachable.
            for state in self.states().iter().filter(|s| reachable.contains(*s)) {
                let mut signature = vec![partition[state]];
                for &symbol in &alphabet {
                    let target = self
                        .out_edges(state)
                        .iter()
                        .find(|e| e.label == Some(symbol))
                        .map(|e| partition[&e.destination])
                        .unwrap_or(usize::MAX);
                    signature.push(target);
                }

                let id = *signatures.entry(signature).or_insert_with(|| {
                    let id = next_id;
                    next_id += 1;
                    id
                });
                next_partition.insert(state.clone(), id);
            }

            if next_partition == partition {
                break;
            }
            partition = next_partition;
        }

        // Name blocks q0.. in discovery order, starting from the initial's block.
        let initial_block = partition[self.initial()];
        let mut block_names: HashMap<usize, StateId> = HashMap::new();
        let mut order: Vec<StateId> = Vec::new();
        let mut next_id = 0usize;

        fn assign_name(
            block: usize,
            order: &mut Vec<StateId>,
            names: &mut HashMap<usize, StateId>,
            next_id: &mut usize,
        ) -> StateId {
            names
                .entry(block)
                .or_insert_with(|| {
                    let name: StateId = format!("q{next_id}").into();
                    *next_id += 1;
                    order.push(name.clone());
                    name
                })
                .clone()
        }
        assign_name(initial_block, &mut order, &mut block_names, &mut next_id);
        for state in self.states().iter().filter(|s| reachable.contains(*s)) {
            assign_name(partition[*state], &mut order, &mut block_names, &mut next_id);
        }

        let mut finals: HashSet<StateId> = HashSet::new();
        let mut edges: HashMap<StateId, Vec<Edge>> = HashMap::new();
        for state in self.states().iter().filter(|s| reachable.contains(*s)) {
            let block = partition[state];
            let name = block_names[&block].clone();
            if self.is_final(state) {
                finals.insert(name.clone());
            }
            let out = edges.entry(name.clone()).or_default();
            for &symbol in &alphabet {
                if let Some(edge) = self.out_edges(state).iter().find(|e| e.label == Some(symbol)) {
                    let target_block = partition[&edge.destination];
                    let target_name = block_names[&target_block].clone();
                    let candidate = Edge { label: Some(symbol), destination: target_name };
                    if !out.contains(&candidate) {
                        out.push(candidate);
                    }
                }
            }
        }

        let initial_name = block_names[&initial_block].clone();
        debug!(
            states_before = reachable.len(),
            states_after = order.len(),
            "minimized automaton"
        );
        self.replace_graph(initial_name, order, finals, edges);
        self.set_deterministic(true);
        Ok(())
    }

    /// All states reachable from the initial state via any edge (labelled
    /// or ε). Used by minimization's reachability prune and by the
    /// emptiness test.
    pub(crate) fn reachable_states(&self) -> HashSet<StateId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(self.initial().clone());
        queue.push_back(self.initial().clone());

        while let Some(state) = queue.pop_front() {
            for edge in self.out_edges(&state) {
                if seen.insert(edge.destination.clone()) {
                    queue.push_back(edge.destination.clone());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::StateId;

    #[test_log::test]
    fn minimize_merges_equivalent_states() {
        // Two states both accepting everything should collapse into one.
        let mut a = Automaton::new("a", "q0", ["q1"].map(StateId::from));
        a.add_edge(&"q0".into(), Some('a'), &"q1".into()).unwrap();
        a.add_edge(&"q1".into(), Some('a'), &"q0".into()).unwrap();
        a.set_final(&"q0".into(), true).unwrap();
        a.set_final(&"q1".into(), true).unwrap();

        a.minimize().unwrap();
        assert_eq!(a.states().len(), 1);
        assert!(a.accepts("a"));
        assert!(a.accepts(""));
    }

    #[test]
    fn minimize_prunes_unreachable_states() {
        let mut a = Automaton::new("a", "q0", ["q1", "unreachable"].map(StateId::from));
        a.add_edge(&"q0".into(), Some('a'), &"q0".into()).unwrap();
        a.set_final(&"q0".into(), true).unwrap();

        a.minimize().unwrap();
        assert!(!a.states().iter().any(|s| s.as_str() == "unreachable"));
    }

    #[test]
    fn minimize_twice_is_stable() {
        let mut a = Automaton::new("a", "q0", ["q1", "q2"].map(StateId::from));
        a.add_edge(&"q0".into(), Some('a'), &"q1".into()).unwrap();
        a.add_edge(&"q1".into(), Some('a'), &"q2".into()).unwrap();
        a.add_edge(&"q2".into(), Some('a'), &"q2".into()).unwrap();
        a.set_final(&"q1".into(), true).unwrap();
        a.set_final(&"q2".into(), true).unwrap();

        a.minimize().unwrap();
        let states_once = a.states().len();
        a.minimize().unwrap();
        assert_eq!(a.states().len(), states_once);
    }
}
