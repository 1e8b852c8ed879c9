use ahash::{AHashMap, AHashSet};
use petgraph::{algo::is_cyclic_directed, matrix_graph::MatrixGraph};

use crate::{
    error::GrammarError,
    grammar::{NonTerminal, ProductionRule, Symbol},
};

/// All whole-grammar integrity checks. Run before a grammar is handed out
/// by the assembler and again before a document is written.
pub(crate) fn check(rules: &[ProductionRule], entrypoint: &NonTerminal) -> Result<(), GrammarError> {
    check_entrypoint(rules, entrypoint)?;
    check_closure(rules)?;
    check_termination(rules)
}

fn check_entrypoint(rules: &[ProductionRule], entrypoint: &NonTerminal) -> Result<(), GrammarError> {
    if rules.iter().any(|rule| rule.lhs() == entrypoint) {
        Ok(())
    } else {
        Err(GrammarError::MissingEntrypoint(entrypoint.id().to_string()))
    }
}

/// Closure invariant: every non-terminal referenced anywhere must have at
/// least one production of its own. Rules never have empty right-hand
/// sides, so "defined" and "has a non-empty alternative list" coincide.
fn check_closure(rules: &[ProductionRule]) -> Result<(), GrammarError> {
    let mut defined = AHashSet::new();

    for rule in rules {
        defined.insert(rule.lhs().id());
    }

    for rule in rules {
        for symbol in rule.rhs() {
            if let Symbol::NonTerminal(nonterm) = symbol {
                if !defined.contains(nonterm.id()) {
                    return Err(GrammarError::UnknownSymbolReference(nonterm.id().to_string()));
                }
            }
        }
    }

    Ok(())
}

/// Reject grammars a generator could never finish expanding.
///
/// A non-terminal is productive if some alternative consists solely of
/// terminals and already-productive non-terminals; the set is grown to a
/// fixpoint so legitimate recursion (`TEXT`, `NUMBER -> DASH NUMBER`,
/// `ARG_RECUR`) passes. Whatever remains can only reach itself, which a
/// cycle check over the remainder confirms.
fn check_termination(rules: &[ProductionRule]) -> Result<(), GrammarError> {
    let mut productive = AHashSet::new();

    loop {
        let mut changed = false;

        for rule in rules {
            if productive.contains(rule.lhs().id()) {
                continue;
            }

            let grounded = rule.rhs().iter().all(|symbol| match symbol {
                Symbol::Terminal(_) => true,
                Symbol::NonTerminal(nonterm) => productive.contains(nonterm.id()),
            });

            if grounded {
                productive.insert(rule.lhs().id());
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    let unproductive: Vec<&ProductionRule> = rules
        .iter()
        .filter(|rule| !productive.contains(rule.lhs().id()))
        .collect();

    if unproductive.is_empty() {
        return Ok(());
    }

    let mut nodes = AHashMap::new();
    let mut graph = MatrixGraph::<(), ()>::with_capacity(unproductive.len());

    for rule in &unproductive {
        let src = *nodes
            .entry(rule.lhs().id())
            .or_insert_with(|| graph.add_node(()));

        for symbol in rule.rhs() {
            if let Symbol::NonTerminal(nonterm) = symbol {
                if productive.contains(nonterm.id()) {
                    continue;
                }

                let dst = *nodes
                    .entry(nonterm.id())
                    .or_insert_with(|| graph.add_node(()));

                if !graph.has_edge(src, dst) {
                    graph.add_edge(src, dst, ());
                }
            }
        }
    }

    // Once closure holds, every unproductive rule references another
    // unproductive non-terminal, so the remainder graph is always cyclic.
    debug_assert!(is_cyclic_directed(&graph));

    Err(GrammarError::ContainsCycles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{base_rules, Terminal};

    fn rule(lhs: &str, rhs: Vec<Symbol>) -> ProductionRule {
        ProductionRule::new(NonTerminal::new(lhs), rhs)
    }

    fn term(s: &str) -> Symbol {
        Symbol::Terminal(Terminal::new(s))
    }

    fn nonterm(s: &str) -> Symbol {
        Symbol::NonTerminal(NonTerminal::new(s))
    }

    #[test]
    fn test_missing_entrypoint() {
        let rules = vec![rule("A", vec![term("x")])];
        assert_eq!(
            check(&rules, &NonTerminal::new("START")),
            Err(GrammarError::MissingEntrypoint("START".to_string()))
        );
    }

    #[test]
    fn test_dangling_reference() {
        let rules = vec![rule("START", vec![nonterm("MISSING")])];
        assert_eq!(
            check(&rules, &NonTerminal::new("START")),
            Err(GrammarError::UnknownSymbolReference("MISSING".to_string()))
        );
    }

    #[test]
    fn test_unterminable_loop() {
        let rules = vec![
            rule("START", vec![nonterm("A")]),
            rule("A", vec![nonterm("B")]),
            rule("B", vec![nonterm("A")]),
        ];
        assert_eq!(
            check(&rules, &NonTerminal::new("START")),
            Err(GrammarError::ContainsCycles)
        );
    }

    #[test]
    fn test_recursion_with_an_exit_is_fine() {
        let rules = vec![
            rule("START", vec![nonterm("TEXT")]),
            rule("TEXT", vec![term("A")]),
            rule("TEXT", vec![term("A"), nonterm("TEXT")]),
        ];
        assert!(check(&rules, &NonTerminal::new("START")).is_ok());
    }

    #[test]
    fn test_base_rules_only_lack_function_call() {
        let rules = base_rules();
        assert_eq!(
            check(&rules, &NonTerminal::new("START")),
            Err(GrammarError::UnknownSymbolReference("FUNCTION_CALL".to_string()))
        );
    }
}
