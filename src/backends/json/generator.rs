use serde::ser::Serialize;
use serde_json::{json, ser::PrettyFormatter, Serializer, Value};
use std::{fs::File, io::Write, path::Path};

use crate::{
    error::GrammarError,
    grammar::{validate, FormulaGrammar},
};

/// Renders a grammar into the canonical amalgamation document: one JSON
/// key per non-terminal in first-occurrence order, each holding its
/// production strings in insertion order.
pub struct JsonGenerator {}

impl JsonGenerator {
    /// Create a new JsonGenerator.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {}
    }

    /// Render the grammar as a document string.
    ///
    /// The closure invariant is re-checked first: a grammar with dangling
    /// references is unusable by every downstream consumer, so nothing is
    /// rendered on failure.
    pub fn render(&self, grammar: &FormulaGrammar) -> Result<String, GrammarError> {
        validate::check(grammar.rules(), grammar.entrypoint())?;

        let mut document = json!({});
        let object = document.as_object_mut().unwrap();

        for rule in grammar.rules() {
            let alternatives = object
                .entry(rule.lhs().id().to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            let alternatives = alternatives.as_array_mut().unwrap();

            alternatives.push(Value::String(rule.render()));
        }

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut ser).unwrap();

        Ok(String::from_utf8(buf).unwrap())
    }

    /// Validate and write the grammar document to `path`.
    pub fn generate<P: AsRef<Path>>(&self, path: P, grammar: &FormulaGrammar) -> Result<(), GrammarError> {
        let document = self.render(grammar)?;

        let mut file = File::create(path).expect("Could not open output file");
        file.write_all(document.as_bytes()).expect("Could not write to output file");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{NonTerminal, ProductionRule, Symbol};
    use crate::parser::amalgam;

    fn sample_grammar() -> FormulaGrammar {
        FormulaGrammar::assembler()
            .signature("ROUND(Number: Number; [Count: Integer])")
            .signature("SUM(Number 1 N: Number)")
            .build()
            .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let generator = JsonGenerator::new();
        let first = generator.render(&sample_grammar()).unwrap();

        let rules = amalgam::parse_str(&first).unwrap();
        let entrypoint = rules[0].lhs().clone();
        let decoded = FormulaGrammar::new(rules, entrypoint);

        assert_eq!(generator.render(&decoded).unwrap(), first);
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join("librefuzz-roundtrip.json");
        let generator = JsonGenerator::new();

        let first = generator.render(&sample_grammar()).unwrap();
        generator.generate(&path, &sample_grammar()).unwrap();

        let decoded = FormulaGrammar::from_document(&path).unwrap();
        assert_eq!(generator.render(&decoded).unwrap(), first);
    }

    #[test]
    fn test_dangling_reference_prevents_rendering() {
        let rules = vec![ProductionRule::new(
            NonTerminal::new("START"),
            vec![Symbol::NonTerminal(NonTerminal::new("MISSING"))],
        )];
        let grammar = FormulaGrammar::new(rules, NonTerminal::new("START"));

        assert_eq!(
            JsonGenerator::new().render(&grammar),
            Err(GrammarError::UnknownSymbolReference("MISSING".to_string()))
        );
    }

    #[test]
    fn test_alternatives_group_under_one_key() {
        let document = JsonGenerator::new().render(&sample_grammar()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        let function_call = value["FUNCTION_CALL"].as_array().unwrap();

        assert_eq!(function_call.len(), 4);
        assert_eq!(
            function_call[0],
            "'ROUND' FUNC_BEG EXPRESSION SEP EXPRESSION FUNC_END"
        );
    }
}
