use crate::grammar::{NonTerminal, Symbol, Terminal};
use crate::signature::Signature;

const EXPRESSION: &str = "EXPRESSION";
const ARG_RECUR: &str = "ARG_RECUR";
const SEP: &str = "SEP";
const FUNC_BEG: &str = "FUNC_BEG";
const FUNC_END: &str = "FUNC_END";

/// Optional-parameter expansion doubles the alternative count per optional,
/// so signatures past this many alternatives get flagged in the log.
const BLOWUP_THRESHOLD: usize = 64;

fn nonterm(name: &str) -> Symbol {
    Symbol::NonTerminal(NonTerminal::new(name))
}

/// Compile one parsed signature into the ordered alternatives it
/// contributes to the `FUNCTION_CALL` rule.
///
/// A variadic signature yields exactly two alternatives, the minimal and
/// the recursive arity. Any other signature yields `2^k` alternatives for
/// `k` optional parameters: each optional doubles the working set, one
/// half taking `SEP EXPRESSION`, the other half ending early. Pure
/// function, no shared state.
pub fn compile(signature: &Signature) -> Vec<Vec<Symbol>> {
    let seed = vec![
        Symbol::Terminal(Terminal::new(signature.name())),
        nonterm(FUNC_BEG),
        nonterm(EXPRESSION),
    ];

    let mut alternatives;

    if signature.is_variadic() {
        let mut recursive = seed.clone();
        recursive.push(nonterm(ARG_RECUR));
        alternatives = vec![seed, recursive];
    } else {
        alternatives = vec![seed];

        // The seed already stands in for the first parameter
        for param in &signature.params()[1..] {
            if param.is_optional() {
                let short = alternatives.clone();
                for alternative in &mut alternatives {
                    alternative.push(nonterm(SEP));
                    alternative.push(nonterm(EXPRESSION));
                }
                alternatives.extend(short);
            } else {
                for alternative in &mut alternatives {
                    alternative.push(nonterm(SEP));
                    alternative.push(nonterm(EXPRESSION));
                }
            }
        }
    }

    for alternative in &mut alternatives {
        alternative.push(nonterm(FUNC_END));
    }

    if alternatives.len() > BLOWUP_THRESHOLD {
        log::warn!(
            "'{}' expands into {} alternatives",
            signature.name(),
            alternatives.len()
        );
    }

    alternatives
}
