//! Integration tests exercising the public API end to end: ε-closure, the
//! determinism cache, three-way intersection, complement involution, the
//! regex/union equivalence and the DOT rendering shape.
use fsa_script::Automaton;

#[test_log::test]
fn epsilon_closure_chain() {
    let mut a = Automaton::new("a", "q0", ["q1", "q2", "q3"].map(Into::into));
    a.add_edge(&"q0".into(), None, &"q1".into()).unwrap();
    a.add_edge(&"q1".into(), None, &"q2".into()).unwrap();
    a.add_edge(&"q2".into(), Some('a'), &"q3".into()).unwrap();

    let mut closure: Vec<String> = a
        .epsilon_closure(&"q0".into())
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();
    closure.sort();
    assert_eq!(closure, vec!["q0", "q1", "q2"]);

    let closure: Vec<String> = a
        .epsilon_closure(&"q3".into())
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();
    assert_eq!(closure, vec!["q3"]);
}

#[test_log::test]
fn determinism_cache_tracks_mutations() {
    let mut a = Automaton::new("a", "init", ["q1", "q2", "q3"].map(Into::into));
    assert!(a.is_deterministic());

    a.add_edge(&"q1".into(), Some('a'), &"q2".into()).unwrap();
    assert!(a.is_deterministic());

    a.add_edge(&"q1".into(), Some('a'), &"q3".into()).unwrap();
    assert!(!a.is_deterministic());

    a.add_edge(&"q1".into(), None, &"q3".into()).unwrap();
    assert!(!a.is_deterministic());

    a.remove_edge(&"q1".into(), Some('a'), &"q3".into()).unwrap();
    a.remove_edge(&"q1".into(), None, &"q3".into()).unwrap();
    assert!(a.is_deterministic());
}

#[test_log::test]
fn add_edges_chain_has_five_states() {
    let mut a = Automaton::new("a", "q1", ["q2"].map(Into::into));
    a.add_edges(&"q1".into(), "abc", &"q2".into()).unwrap();
    assert_eq!(a.states().len(), 5);
}

#[test_log::test]
fn three_way_intersect_then_minimize() {
    let aut1 = Automaton::from_regex("(a|b|c)*", "aut1").unwrap();

    let mut aut2 = Automaton::new("aut2", "s0", ["sink"].map(Into::into));
    for sym in ['a', 'b'] {
        aut2.add_edge(&"s0".into(), Some(sym), &"s0".into()).unwrap();
    }
    aut2.add_edge(&"s0".into(), Some('c'), &"sink".into()).unwrap();
    for sym in ['a', 'b', 'c'] {
        aut2.add_edge(&"sink".into(), Some(sym), &"sink".into()).unwrap();
    }
    aut2.set_final(&"s0".into(), true).unwrap();

    let mut aut3 = Automaton::new("aut3", "t0", ["sink"].map(Into::into));
    aut3.add_edge(&"t0".into(), Some('a'), &"t0".into()).unwrap();
    aut3.add_edge(&"t0".into(), Some('b'), &"sink".into()).unwrap();
    aut3.add_edge(&"t0".into(), Some('c'), &"sink".into()).unwrap();
    for sym in ['a', 'b', 'c'] {
        aut3.add_edge(&"sink".into(), Some(sym), &"sink".into()).unwrap();
    }
    aut3.set_final(&"t0".into(), true).unwrap();

    let mut result = fsa_script::intersect(&[&aut1, &aut2, &aut3]).unwrap();
    result.minimize().unwrap();

    for word in ["", "a", "aa"] {
        assert!(result.accepts(word), "{word:?} should be accepted");
    }
    for word in ["b", "bb", "c", "cc"] {
        assert!(!result.accepts(word), "{word:?} should be rejected");
    }
}

#[test_log::test]
fn intersection_with_complement_is_empty() {
    let a = Automaton::from_regex("a*bb*|aa*bc*", "a").unwrap();
    let mut not_a = a.clone();
    not_a.complement().unwrap();

    let meet = fsa_script::intersect(&[&a, &not_a]).unwrap();
    assert!(meet.is_empty_language());
}

#[test_log::test]
fn regex_equivalent_to_union_of_regexes() {
    let combined = Automaton::from_regex("ef|a*bb*|aa*bc*", "combined").unwrap();

    let ef = Automaton::from_regex("ef", "ef").unwrap();
    let star = Automaton::from_regex("a*bb*", "star").unwrap();
    let mixed = Automaton::from_regex("aa*bc*", "mixed").unwrap();
    let unioned = fsa_script::union(&[&ef, &star, &mixed]).unwrap();

    assert!(fsa_script::equivalent(&combined, &unioned).unwrap());
}

#[test_log::test]
fn dot_rendering_has_expected_shape() {
    let mut a = Automaton::new("two_state", "q0", ["q1"].map(Into::into));
    a.add_edge(&"q0".into(), Some('a'), &"q1".into()).unwrap();
    a.set_final(&"q1".into(), true).unwrap();

    let dot = a.to_dot();
    assert!(dot.contains("rankdir=LR;"));
    assert!(dot.contains("doublecircle"));
    assert!(dot.contains("q1"));
    assert!(dot.contains("q0 -> q1 [label=a,]") || dot.contains("q0 -> q1 ["));
}
