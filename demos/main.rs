//! Builds a couple of representative automata and writes their DOT
//! rendering to `./output`, mirroring the crate's own `src/bin/test.rs`
//! smoke check. Not part of the public API; gated behind `render`.
use std::fs;

use fsa_script::Automaton;

fn main() {
    tracing_subscriber::fmt::init();

    fs::create_dir_all("./output").expect("failed to create output directory");

    let mut dfa = Automaton::new("dfa", "q0", ["q1", "q2"].map(Into::into));
    dfa.add_edge(&"q0".into(), Some('0'), &"q0".into()).unwrap();
    dfa.add_edge(&"q0".into(), Some('1'), &"q1".into()).unwrap();
    dfa.add_edge(&"q1".into(), Some('0'), &"q2".into()).unwrap();
    dfa.add_edge(&"q1".into(), Some('1'), &"q0".into()).unwrap();
    dfa.add_edge(&"q2".into(), Some('0'), &"q1".into()).unwrap();
    dfa.add_edge(&"q2".into(), Some('1'), &"q2".into()).unwrap();
    dfa.set_final(&"q1".into(), true).unwrap();
    fs::write("./output/dfa.dot", dfa.to_dot()).expect("failed to write dfa.dot");

    let nfa = Automaton::from_regex("ef|a*bb*|aa*bc*", "nfa").unwrap();
    fs::write("./output/nfa.dot", nfa.to_dot()).expect("failed to write nfa.dot");

    let mut minimized = nfa.clone();
    minimized.minimize().unwrap();
    fs::write("./output/minimized.dot", minimized.to_dot()).expect("failed to write minimized.dot");
}
