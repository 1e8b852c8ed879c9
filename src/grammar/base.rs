use crate::{grammar::ProductionRule, parser::amalgam};

/// The hand-authored part of the grammar: literals, operators, the
/// precedence chain of expression rules, cell references and dates.
/// Authored as a commented JSON document so the boundary-value annotations
/// live next to the literals they describe.
static BASE_GRAMMAR: &str = include_str!("base.json");

/// The hand-authored base rules of the formula grammar.
///
/// Deterministic: no input, no I/O, two calls yield structurally identical
/// output. The result is not closed on its own — `FACTOR` references
/// [`FUNCTION_CALL`](crate::grammar::FUNCTION_CALL), which only the
/// assembler populates.
pub fn base_rules() -> Vec<ProductionRule> {
    amalgam::parse_str(BASE_GRAMMAR).expect("embedded base grammar is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Symbol, FUNCTION_CALL};

    #[test]
    fn test_base_is_deterministic() {
        assert_eq!(base_rules(), base_rules());
    }

    #[test]
    fn test_function_call_is_referenced_not_defined() {
        let rules = base_rules();

        assert!(!rules.iter().any(|r| r.lhs().id() == FUNCTION_CALL));
        assert!(rules.iter().any(|r| {
            r.rhs().iter().any(|s| match s {
                Symbol::NonTerminal(nt) => nt.id() == FUNCTION_CALL,
                Symbol::Terminal(_) => false,
            })
        }));
    }

    #[test]
    fn test_negative_numbers_are_recursive() {
        let rules = base_rules();
        let number_alts: Vec<String> = rules
            .iter()
            .filter(|r| r.lhs().id() == "NUMBER")
            .map(|r| r.render())
            .collect();

        assert!(number_alts.contains(&"DASH NUMBER".to_string()));
        // Boundary literals that are themselves negative stay literals
        assert!(number_alts.contains(&"'-128'".to_string()));
        assert!(number_alts.contains(&"'-2147483649'".to_string()));
    }

    #[test]
    fn test_precedence_chain() {
        let rules = base_rules();
        let chain = [
            ("EXPRESSION", "COMPARE_EXPR"),
            ("COMPARE_EXPR", "CONCAT_EXPR"),
            ("CONCAT_EXPR", "ARITH_EXPR"),
            ("ARITH_EXPR", "PERCENT_EXPR"),
            ("PERCENT_EXPR", "UNARY_EXPR"),
            ("UNARY_EXPR", "UNION_EXPR"),
            ("UNION_EXPR", "ISECT_EXPR"),
            ("ISECT_EXPR", "RANGE_EXPR"),
            ("RANGE_EXPR", "FACTOR"),
        ];

        for (lhs, first_alt) in chain {
            let rule = rules
                .iter()
                .find(|r| r.lhs().id() == lhs)
                .unwrap_or_else(|| panic!("missing rule {lhs}"));
            assert_eq!(rule.render(), first_alt);
        }
    }
}
