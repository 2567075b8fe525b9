//! The [`Automaton`] aggregate: states, edges, the active alphabet and the
//! cached determinism flag, plus the graph primitives every transform is
//! built from (add/remove state, add/remove edge, fresh-name generation).
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Handle for a state. Cheap to clone; two handles compare equal iff their
/// underlying names are equal. `Arc` rather than `Rc` so an `Automaton`
/// (and the `StateId`s it hands out) can be built on one thread and moved
/// to another.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct StateId(Arc<str>);

impl StateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<T: Into<String>> From<T> for StateId {
    fn from(value: T) -> Self {
        StateId(Arc::from(value.into()))
    }
}

/// An edge label: a concrete input symbol, or the absence of one (ε).
///
/// Encoding ε as a missing symbol rather than a sentinel character keeps the
/// alphabet free of stand-ins that would otherwise need filtering everywhere
/// it is iterated.
pub type Label = Option<char>;

/// A single outgoing transition. Equality is structural and is what
/// `add_edge`/I4 use to detect duplicates within one state's out-set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Edge {
    pub label: Label,
    pub destination: StateId,
}

/// A finite state automaton over `char`, with ε-transitions.
///
/// See the crate invariants I1–I6: `initial` is always a member of `states`,
/// every edge endpoint is a member of `states`, the alphabet multiset always
/// matches the non-ε labels in use, and no state carries two structurally
/// identical out-edges.
pub struct Automaton {
    pub(crate) name: String,
    pub(crate) states: Vec<StateId>,
    state_set: HashSet<StateId>,
    pub(crate) initial: StateId,
    pub(crate) finals: HashSet<StateId>,
    pub(crate) edges: HashMap<StateId, Vec<Edge>>,
    alphabet: HashMap<char, NonZeroUsize>,
    deterministic: Cell<bool>,
    dirty: Cell<bool>,
}

impl Automaton {
    /// Creates an automaton with the given initial state, auto-adding it to
    /// `states` if it is not already present among the supplied ids.
    pub fn new(
        name: impl Into<String>,
        initial: impl Into<StateId>,
        states: impl IntoIterator<Item = StateId>,
    ) -> Self {
        let initial = initial.into();
        let mut ordered = Vec::new();
        let mut set = HashSet::new();

        for state in states.into_iter().chain(std::iter::once(initial.clone())) {
            if set.insert(state.clone()) {
                ordered.push(state);
            }
        }

        let mut automaton = Automaton {
            name: name.into(),
            states: ordered,
            state_set: set,
            initial,
            finals: HashSet::new(),
            edges: HashMap::new(),
            alphabet: HashMap::new(),
            deterministic: Cell::new(true),
            dirty: Cell::new(false),
        };
        for state in automaton.states.clone() {
            automaton.edges.entry(state).or_default();
        }
        automaton
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial(&self) -> &StateId {
        &self.initial
    }

    /// Insertion order; rendering and determinization both rely on this.
    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn finals(&self) -> &HashSet<StateId> {
        &self.finals
    }

    pub fn is_final(&self, state: &StateId) -> bool {
        self.finals.contains(state)
    }

    pub fn has_state(&self, state: &StateId) -> bool {
        self.state_set.contains(state)
    }

    /// The active alphabet (ε excluded), in no particular order. Callers
    /// that need a stable iteration order (determinization, totalization)
    /// should sort the returned keys.
    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.keys().copied()
    }

    pub fn alphabet_len(&self) -> usize {
        self.alphabet.len()
    }

    pub fn out_edges(&self, state: &StateId) -> &[Edge] {
        self.edges.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Adds a brand-new, edge-less state.
    pub fn add_state(&mut self, id: impl Into<StateId>) -> Result<()> {
        let id = id.into();
        if !self.state_set.insert(id.clone()) {
            return Err(Error::DuplicateElement {
                automaton: self.name.clone(),
                state: id.to_string(),
            });
        }
        self.states.push(id.clone());
        self.edges.entry(id).or_default();
        Ok(())
    }

    /// Adds an edge `src --label--> dst`. `label == None` is ε. `dst` is
    /// created if missing, matching the source library's permissiveness;
    /// `src` must already exist.
    pub fn add_edge(&mut self, src: &StateId, label: Label, dst: &StateId) -> Result<()> {
        if !self.state_set.contains(src) {
            return Err(Error::NoSuchNode {
                automaton: self.name.clone(),
                state: src.to_string(),
            });
        }
        if !self.state_set.contains(dst) {
            self.add_state(dst.clone())?;
        }

        let out = self.edges.entry(src.clone()).or_default();
        if out
            .iter()
            .any(|e| e.label == label && e.destination == *dst)
        {
            return Err(Error::DuplicateElement {
                automaton: self.name.clone(),
                state: format!("{src} --{label:?}--> {dst}"),
            });
        }

        let shares_label = out.iter().any(|e| e.label == label);
        out.push(Edge {
            label,
            destination: dst.clone(),
        });

        if let Some(symbol) = label {
            self.alphabet
                .entry(symbol)
                .and_modify(|count| *count = NonZeroUsize::new(count.get() + 1).unwrap())
                .or_insert_with(|| NonZeroUsize::new(1).unwrap());
        }

        if self.deterministic.get() && (label.is_none() || shares_label) {
            self.deterministic.set(false);
            self.dirty.set(false);
        }

        Ok(())
    }

    /// Removes the edge `src --label--> dst`. Marks the determinism cache
    /// dirty rather than eagerly rechecking: a batch of removals should not
    /// pay O(|E|) per removal just to keep the flag fresh.
    pub fn remove_edge(&mut self, src: &StateId, label: Label, dst: &StateId) -> Result<()> {
        let out = self
            .edges
            .get_mut(src)
            .ok_or_else(|| Error::NoSuchNode {
                automaton: self.name.clone(),
                state: src.to_string(),
            })?;

        let position = out
            .iter()
            .position(|e| e.label == label && e.destination == *dst)
            .ok_or_else(|| Error::NoSuchEdge {
                automaton: self.name.clone(),
                src: src.to_string(),
                label,
                dst: dst.to_string(),
            })?;
        out.remove(position);

        if let Some(symbol) = label {
            if let Some(counter) = self.alphabet.get_mut(&symbol) {
                match NonZeroUsize::new(counter.get() - 1) {
                    Some(next) => *counter = next,
                    None => {
                        self.alphabet.remove(&symbol);
                    }
                }
            }
        }

        if !self.deterministic.get() {
            self.dirty.set(true);
        }

        Ok(())
    }

    /// Removes a state along with every incident edge. Refuses to remove
    /// the initial state (see DESIGN.md) rather than leave the automaton
    /// without one.
    pub fn remove_state(&mut self, id: &StateId) -> Result<()> {
        if !self.state_set.contains(id) {
            return Err(Error::NoSuchNode {
                automaton: self.name.clone(),
                state: id.to_string(),
            });
        }
        if *id == self.initial {
            return Err(Error::InvalidAutomaton {
                automaton: self.name.clone(),
                detail: format!("cannot remove the initial state `{id}`"),
            });
        }

        let outgoing = self.edges.get(id).cloned().unwrap_or_default();
        for edge in outgoing {
            self.remove_edge(id, edge.label, &edge.destination)?;
        }

        let incoming: Vec<(StateId, Label)> = self
            .edges
            .iter()
            .flat_map(|(from, edges)| {
                edges
                    .iter()
                    .filter(|e| e.destination == *id)
                    .map(move |e| (from.clone(), e.label))
            })
            .collect();
        for (from, label) in incoming {
            self.remove_edge(&from, label, id)?;
        }

        self.edges.remove(id);
        self.state_set.remove(id);
        self.states.retain(|s| s != id);
        self.finals.remove(id);
        Ok(())
    }

    /// Generates a state identifier not already present, derived from
    /// `base` by appending a growing numeric suffix.
    pub fn fresh_state_name(&self, base: &str) -> StateId {
        let mut suffix = 1usize;
        loop {
            let candidate: StateId = format!("{base}_{suffix}").into();
            if !self.state_set.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Adds a chain of edges spelling out `word` from `src` to `dst`. A
    /// fresh name is claimed per character, suffixed off `src`; for the
    /// final character that claimed name is not wired into the chain (the
    /// edge targets `dst` instead) but is still reserved as a state, so a
    /// word of length n leaves n-1 wired intermediates plus one unused one
    /// behind. An empty word adds a direct ε-edge.
    pub fn add_edges(&mut self, src: &StateId, word: &str, dst: &StateId) -> Result<()> {
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return self.add_edge(src, None, dst);
        }

        let mut current = src.clone();
        for (i, &ch) in chars.iter().enumerate() {
            let claimed = self.fresh_state_name(src.as_str());
            let next = if i + 1 == chars.len() {
                self.add_state(claimed)?;
                dst.clone()
            } else {
                claimed
            };
            self.add_edge(&current, Some(ch), &next)?;
            current = next;
        }
        Ok(())
    }

    pub fn set_final(&mut self, state: &StateId, is_final: bool) -> Result<()> {
        if !self.state_set.contains(state) {
            return Err(Error::NoSuchNode {
                automaton: self.name.clone(),
                state: state.to_string(),
            });
        }
        if is_final {
            self.finals.insert(state.clone());
        } else {
            self.finals.remove(state);
        }
        Ok(())
    }

    /// Recomputes the determinism cache if `dirty`, otherwise returns the
    /// cached value. A state is non-deterministic if it has an ε-out-edge
    /// or two out-edges sharing a label.
    pub fn is_deterministic(&self) -> bool {
        if self.dirty.get() {
            let value = self.states.iter().all(|state| {
                let out = self.out_edges(state);
                let mut seen = HashSet::new();
                out.iter().all(|e| e.label.is_some() && seen.insert(e.label))
            });
            self.deterministic.set(value);
            self.dirty.set(false);
        }
        self.deterministic.get()
    }

    pub(crate) fn set_deterministic(&self, value: bool) {
        self.deterministic.set(value);
        self.dirty.set(false);
    }

    /// `true` iff every state has an out-edge for every symbol in the
    /// active alphabet.
    pub fn is_total(&self) -> bool {
        self.states.iter().all(|state| {
            let out = self.out_edges(state);
            self.alphabet.keys().all(|&symbol| {
                out.iter().any(|e| e.label == Some(symbol))
            })
        })
    }

    /// Rebuilds `edges`, `states`, `finals` and the alphabet from scratch;
    /// used by transforms (determinize, minimize, intersect) that replace
    /// the whole graph at once rather than mutating it edge by edge.
    pub(crate) fn replace_graph(
        &mut self,
        initial: StateId,
        states: Vec<StateId>,
        finals: HashSet<StateId>,
        edges: HashMap<StateId, Vec<Edge>>,
    ) {
        self.state_set = states.iter().cloned().collect();
        self.states = states;
        self.initial = initial;
        self.finals = finals;

        let mut alphabet = HashMap::new();
        for out in edges.values() {
            for edge in out {
                if let Some(symbol) = edge.label {
                    let counter = alphabet.entry(symbol).or_insert(0usize);
                    *counter += 1;
                }
            }
        }
        self.alphabet = alphabet
            .into_iter()
            .map(|(symbol, count)| (symbol, NonZeroUsize::new(count).unwrap()))
            .collect();
        self.edges = edges;
    }
}

impl Clone for Automaton {
    fn clone(&self) -> Self {
        Automaton {
            name: self.name.clone(),
            states: self.states.clone(),
            state_set: self.state_set.clone(),
            initial: self.initial.clone(),
            finals: self.finals.clone(),
            edges: self.edges.clone(),
            alphabet: self.alphabet.clone(),
            deterministic: Cell::new(self.deterministic.get()),
            dirty: Cell::new(self.dirty.get()),
        }
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("name", &self.name)
            .field("states", &self.states)
            .field("initial", &self.initial)
            .field("finals", &self.finals)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(id: &str) -> StateId {
        id.into()
    }

    #[test]
    fn add_edge_updates_alphabet_and_determinism() {
        let mut a = Automaton::new("a", s("init"), [s("q1"), s("q2"), s("q3")]);
        assert!(a.is_deterministic());

        a.add_edge(&s("q1"), Some('a'), &s("q2")).unwrap();
        assert!(a.is_deterministic());

        a.add_edge(&s("q1"), Some('a'), &s("q3")).unwrap();
        assert!(!a.is_deterministic());

        a.add_edge(&s("q1"), None, &s("q3")).unwrap();
        assert!(!a.is_deterministic());

        a.remove_edge(&s("q1"), Some('a'), &s("q3")).unwrap();
        a.remove_edge(&s("q1"), None, &s("q3")).unwrap();
        assert!(a.is_deterministic());
    }

    #[test]
    fn duplicate_edge_rejected() {
        let mut a = Automaton::new("a", s("q1"), [s("q2")]);
        a.add_edge(&s("q1"), Some('a'), &s("q2")).unwrap();
        assert!(matches!(
            a.add_edge(&s("q1"), Some('a'), &s("q2")),
            Err(Error::DuplicateElement { .. })
        ));
    }

    #[test]
    fn add_edges_chains_fresh_states() {
        let mut a = Automaton::new("a", s("q1"), [s("q2")]);
        a.add_edges(&s("q1"), "abc", &s("q2")).unwrap();
        assert_eq!(a.states().len(), 5);
        assert!(a
            .out_edges(&s("q1"))
            .iter()
            .any(|e| e.label == Some('a') && e.destination == s("q1_1")));
    }

    #[test]
    fn remove_state_rejects_initial() {
        let mut a = Automaton::new("a", s("q1"), []);
        assert!(matches!(
            a.remove_state(&s("q1")),
            Err(Error::InvalidAutomaton { .. })
        ));
    }

    #[test]
    fn remove_state_clears_alphabet() {
        let mut a = Automaton::new("a", s("q1"), [s("q2")]);
        a.add_edge(&s("q1"), Some('a'), &s("q2")).unwrap();
        a.remove_state(&s("q2")).unwrap();
        assert_eq!(a.alphabet().count(), 0);
        assert!(!a.has_state(&s("q2")));
    }
}
