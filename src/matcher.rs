//! The matching loop over a minimized DFA.

use crate::alphabet::Alphabet;
use crate::dfa::Dfa;

/// Whole-string match: consume every codepoint of `target` and report
/// whether the walk ends on a final state.
///
/// Each codepoint resolves to its alphabet symbol by interval lookup; the
/// lookup cannot fail because the alphabet covers the whole domain. Once a
/// dead state is reached the remaining input is skipped: all of a dead
/// state's transitions are self-loops, so the verdict is already fixed.
pub fn match_whole(dfa: &Dfa, alphabet: &Alphabet, target: &str) -> bool {
    let mut state = dfa.start();

    for ch in target.chars() {
        if dfa.state(state).is_dead {
            break;
        }
        let symbol = alphabet.symbol_of(ch as u32);
        state = dfa.state(state).targets[symbol];
    }

    dfa.state(state).is_final
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast;
    use crate::nfa::Nfa;
    use crate::parser::parse_pattern;

    fn compile_parts(pattern: &str) -> (Dfa, Alphabet) {
        let ast = parse_pattern(pattern).unwrap();
        let mut referenced = Vec::new();
        ast.collect_intervals(&mut referenced);
        let alphabet = Alphabet::partition(&referenced);
        let nfa = Nfa::thompson(&ast, &alphabet).eliminate_epsilon();
        (Dfa::from_nfa(&nfa).minimize(), alphabet)
    }

    #[test]
    fn test_whole_string_not_substring() {
        let (dfa, alphabet) = compile_parts("bc");
        assert!(match_whole(&dfa, &alphabet, "bc"));
        assert!(!match_whole(&dfa, &alphabet, "abc"));
        assert!(!match_whole(&dfa, &alphabet, "bcd"));
    }

    #[test]
    fn test_dead_state_early_exit_agrees() {
        // "xz...": after 'x' the walk is in the reject state; skipping the
        // rest of the input must not change the verdict.
        let (dfa, alphabet) = compile_parts("ab");
        let long = format!("x{}", "z".repeat(10_000));
        assert!(!match_whole(&dfa, &alphabet, &long));
    }

    #[test]
    fn test_matches_outside_ascii() {
        let (dfa, alphabet) = compile_parts("π+");
        assert!(match_whole(&dfa, &alphabet, "π"));
        assert!(match_whole(&dfa, &alphabet, "πππ"));
        assert!(!match_whole(&dfa, &alphabet, "p"));
        assert!(!match_whole(&dfa, &alphabet, ""));
    }

    #[test]
    fn test_any_codepoint_resolves() {
        // The alphabet covers the whole domain, so matching never panics on
        // characters the pattern does not mention.
        let (dfa, alphabet) = compile_parts("a");
        for input in ["\u{10FFFF}", "\0", "漢", "\u{E000}"] {
            assert!(!match_whole(&dfa, &alphabet, input));
        }
    }

    #[test]
    fn test_epsilon_ast_matches_only_empty() {
        let ast = Ast::Epsilon;
        let alphabet = Alphabet::partition(&[]);
        let nfa = Nfa::thompson(&ast, &alphabet).eliminate_epsilon();
        let dfa = Dfa::from_nfa(&nfa).minimize();
        assert!(match_whole(&dfa, &alphabet, ""));
        assert!(!match_whole(&dfa, &alphabet, "a"));
    }
}
