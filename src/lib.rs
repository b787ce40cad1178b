//! dfamatch: compile a regular expression into a minimal DFA and match
//! whole strings in linear time.
//!
//! The pipeline: parse the pattern into an AST, partition the codepoint
//! domain into the pattern's alphabet, Thompson-construct an epsilon-NFA,
//! eliminate epsilons, run subset construction into a DFA, and minimize it
//! by partition refinement. The result is an immutable [`CompiledPattern`]
//! whose [`is_match`](CompiledPattern::is_match) walks the input once.
//!
//! ```
//! let p = dfamatch::compile("[a-c]{2,3}").unwrap();
//! assert!(p.is_match("abc"));
//! assert!(!p.is_match("abcd"));
//! ```
//!
//! Matching is anchored at both ends: the entire target string must match.
//! A compiled pattern is plain immutable data, so one pattern can serve
//! concurrent matches from many threads.

mod alphabet;
mod ast;
mod dfa;
mod matcher;
mod nfa;
mod parser;

use alphabet::Alphabet;
use dfa::Dfa;
use nfa::Nfa;

pub use parser::PatternError;

/// A pattern compiled down to a minimized DFA.
///
/// Built once by [`compile`], then read-only.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    alphabet: Alphabet,
    dfa: Dfa,
}

/// Compile a pattern into a [`CompiledPattern`].
///
/// Syntax errors are reported with a message and the 0-based character
/// offset where parsing failed; no partial automaton is ever returned.
pub fn compile(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let ast = parser::parse_pattern(pattern)?;

    let mut referenced = Vec::new();
    ast.collect_intervals(&mut referenced);
    let alphabet = Alphabet::partition(&referenced);

    let nfa = Nfa::thompson(&ast, &alphabet).eliminate_epsilon();
    let dfa = Dfa::from_nfa(&nfa).minimize();

    Ok(CompiledPattern {
        pattern: pattern.to_string(),
        alphabet,
        dfa,
    })
}

impl CompiledPattern {
    /// True iff the whole of `target` matches the pattern.
    pub fn is_match(&self, target: &str) -> bool {
        matcher::match_whole(&self.dfa, &self.alphabet, target)
    }

    /// The original pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of states in the minimized DFA.
    pub fn state_count(&self) -> usize {
        self.dfa.state_count()
    }

    /// Number of symbols in the partitioned alphabet.
    pub fn alphabet_len(&self) -> usize {
        self.alphabet.len()
    }
}
