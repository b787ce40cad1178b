//! Abstract syntax tree for parsed patterns.
//!
//! The AST is a closed sum type: parsing produces it, and the two
//! compilation traversals consume it read-only. `collect_intervals` gathers
//! every codepoint interval the pattern tests (the input to alphabet
//! partitioning); Thompson fragment emission lives in `nfa.rs` and pattern
//! matches over the same variants.

use crate::alphabet::CodepointInterval;

/// One node of a parsed pattern.
///
/// Literals, `.`, shorthand classes, and bracket classes all normalize to
/// `Class` carrying the interval set they match. Negation is resolved at
/// parse time, so a `Class` is always a positive interval set.
#[derive(Debug, Clone)]
pub enum Ast {
    /// `a|b|...` — matches if any branch matches.
    Alternative(Vec<Ast>),
    /// `ab...` — matches the branches in sequence.
    Concatenation(Vec<Ast>),
    /// `x{min,max}` and the `* + ?` shorthands. `max == None` means
    /// unbounded.
    Quantifier {
        inner: Box<Ast>,
        min: u32,
        max: Option<u32>,
    },
    /// A set of codepoint intervals matching exactly one input codepoint.
    Class(Vec<CodepointInterval>),
    /// Matches the empty string. Produced for empty patterns and empty
    /// alternation branches.
    Epsilon,
}

impl Ast {
    /// Append every interval this subtree directly tests.
    ///
    /// No disjoining happens here; the collected multiset may overlap and is
    /// handed to `Alphabet::partition` once, for the whole tree.
    pub fn collect_intervals(&self, out: &mut Vec<CodepointInterval>) {
        match self {
            Ast::Alternative(branches) | Ast::Concatenation(branches) => {
                for branch in branches {
                    branch.collect_intervals(out);
                }
            }
            Ast::Quantifier { inner, .. } => inner.collect_intervals(out),
            Ast::Class(intervals) => out.extend_from_slice(intervals),
            Ast::Epsilon => {}
        }
    }
}
