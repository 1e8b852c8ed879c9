use std::fs;
use std::path::Path;

use crate::{
    error::{GrammarError, ParsingError, SignatureError},
    grammar::{
        base_rules, FormulaGrammar, NonTerminal, ProductionRule, Symbol, Terminal,
        DEFAULT_ENTRYPOINT, FUNCTION_CALL,
    },
    signature::{compile, valid_name, Signature},
};

/// Counts reported after a batch of signatures has been assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    compiled: usize,
    malformed: usize,
    empty_params: usize,
    ambiguous: usize,
}

impl AssemblySummary {
    /// Signatures that contributed alternatives to the grammar.
    pub fn compiled(&self) -> usize {
        self.compiled
    }

    /// Lines that did not match the `NAME(...)` shape.
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Signatures with an empty parameter list.
    pub fn empty_params(&self) -> usize {
        self.empty_params
    }

    /// Signatures flagged for manual review as both repeatable and optional.
    pub fn ambiguous(&self) -> usize {
        self.ambiguous
    }

    /// Total skipped signatures across all per-item error kinds.
    pub fn skipped(&self) -> usize {
        self.malformed + self.empty_params + self.ambiguous
    }
}

impl std::fmt::Display for AssemblySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "compiled {} signatures, skipped {} ({} malformed, {} without parameters, {} ambiguous)",
            self.compiled,
            self.skipped(),
            self.malformed,
            self.empty_params,
            self.ambiguous
        )
    }
}

/// Assembles the final grammar: the hand-authored base rules plus one
/// `FUNCTION_CALL` alternative per compiled signature variation.
///
/// Per-item signature errors are logged and skipped, the batch continues;
/// [`build`](GrammarAssembler::build) then runs the whole-grammar checks
/// that are fatal. Given the same ordered input the assembled grammar
/// serializes byte-identically, so callers that collect signatures from
/// the filesystem own sorting them into a canonical order first.
///
/// Use it like so:
/// ```
/// use librefuzz_grammar::grammar::FormulaGrammar;
///
/// let grammar = FormulaGrammar::assembler()
///     .signature("ROUND(Number: Number; [Count: Integer])")
///     .signature("SUM(Number 1 N: Number)")
///     .nullary_function("PI")
///     .build().unwrap();
/// ```
pub struct GrammarAssembler {
    rules: Vec<ProductionRule>,
    functions: Vec<ProductionRule>,
    entrypoint: String,
    summary: AssemblySummary,
}

impl GrammarAssembler {
    pub(crate) fn new() -> Self {
        Self {
            rules: base_rules(),
            functions: Vec::new(),
            entrypoint: DEFAULT_ENTRYPOINT.to_string(),
            summary: AssemblySummary::default(),
        }
    }

    /// Compile one signature line and append its alternatives to the
    /// `FUNCTION_CALL` rule. A line that fails to compile is logged and
    /// skipped; the assembler stays usable.
    pub fn signature(mut self, line: &str) -> Self {
        match Signature::parse(line) {
            Ok(signature) => {
                for rhs in compile(&signature) {
                    self.functions
                        .push(ProductionRule::new(NonTerminal::new(FUNCTION_CALL), rhs));
                }
                self.summary.compiled += 1;
            },
            Err(e) => {
                log::warn!("skipping signature: {e}");
                match e {
                    SignatureError::MalformedSignature(_) => self.summary.malformed += 1,
                    SignatureError::EmptyParameterList(_) => self.summary.empty_params += 1,
                    SignatureError::AmbiguousParameterKind(_) => self.summary.ambiguous += 1,
                }
            },
        }

        self
    }

    /// Compile every non-blank line, in order.
    pub fn signatures<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            self = self.signature(line);
        }

        self
    }

    /// Read one corpus file and compile its lines in file order.
    pub fn signature_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ParsingError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ParsingError::new(path.as_ref(), format!("{e}")))?;

        Ok(self.signatures(content.lines()))
    }

    /// Author an explicit zero-argument production `'NAME' FUNC_BEG
    /// FUNC_END`. The compiler refuses empty parameter lists, so nullary
    /// functions enter the grammar only through this deliberate hook.
    /// A name the quoting convention cannot represent is logged and
    /// skipped like any other malformed signature.
    pub fn nullary_function<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();

        if !valid_name(&name) {
            log::warn!(
                "skipping signature: {}",
                SignatureError::MalformedSignature(name)
            );
            self.summary.malformed += 1;
            return self;
        }

        self.functions.push(ProductionRule::new(
            NonTerminal::new(FUNCTION_CALL),
            vec![
                Symbol::Terminal(Terminal::new(name)),
                Symbol::NonTerminal(NonTerminal::new("FUNC_BEG")),
                Symbol::NonTerminal(NonTerminal::new("FUNC_END")),
            ],
        ));
        self.summary.compiled += 1;

        self
    }

    /// Override the non-terminal where generation starts.
    pub fn entrypoint<S: Into<String>>(mut self, entrypoint: S) -> Self {
        self.entrypoint = entrypoint.into();
        self
    }

    /// The per-item counts accumulated so far.
    pub fn summary(&self) -> AssemblySummary {
        self.summary
    }

    /// Run the whole-grammar integrity checks and hand out the immutable
    /// grammar. Any [`GrammarError`] here is fatal for the batch.
    pub fn build(mut self) -> Result<FormulaGrammar, GrammarError> {
        self.rules.append(&mut self.functions);

        let entrypoint = NonTerminal::new(self.entrypoint);
        super::validate::check(&self.rules, &entrypoint)?;

        Ok(FormulaGrammar::new(self.rules, entrypoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::json::JsonGenerator;

    const CORPUS: [&str; 4] = [
        "ROUND(Number: Number; [Count: Integer])",
        "SUM(Number 1 N: Number)",
        "DATE(Year: Integer; Month: Integer; Day: Integer)",
        "ABS(Number: Number)",
    ];

    #[test]
    fn test_skip_leaves_batch_intact() {
        let assembler = FormulaGrammar::assembler()
            .signature("ABS(Number: Number)")
            .signature("not-a-signature")
            .signature("NOW()")
            .signature("FOO(A N: Number; [B: Number])")
            .signature("SUM(Number 1 N: Number)");

        let summary = assembler.summary();
        assert_eq!(summary.compiled(), 2);
        assert_eq!(summary.malformed(), 1);
        assert_eq!(summary.empty_params(), 1);
        assert_eq!(summary.ambiguous(), 1);
        assert_eq!(summary.skipped(), 3);

        assert!(assembler.build().is_ok());
    }

    #[test]
    fn test_alternatives_keep_input_order() {
        let grammar = FormulaGrammar::assembler()
            .signatures(CORPUS)
            .build()
            .unwrap();

        let functions: Vec<String> = grammar
            .rules()
            .iter()
            .filter(|r| r.lhs().id() == FUNCTION_CALL)
            .map(|r| r.render())
            .collect();

        assert_eq!(
            functions,
            vec![
                "'ROUND' FUNC_BEG EXPRESSION SEP EXPRESSION FUNC_END",
                "'ROUND' FUNC_BEG EXPRESSION FUNC_END",
                "'SUM' FUNC_BEG EXPRESSION FUNC_END",
                "'SUM' FUNC_BEG EXPRESSION ARG_RECUR FUNC_END",
                "'DATE' FUNC_BEG EXPRESSION SEP EXPRESSION SEP EXPRESSION FUNC_END",
                "'ABS' FUNC_BEG EXPRESSION FUNC_END",
            ]
        );
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let render = || {
            let grammar = FormulaGrammar::assembler()
                .signatures(CORPUS)
                .nullary_function("PI")
                .build()
                .unwrap();
            JsonGenerator::new().render(&grammar).unwrap()
        };

        assert_eq!(render(), render());
    }

    #[test]
    fn test_no_compiled_functions_is_fatal() {
        // FACTOR references FUNCTION_CALL, which then has no alternatives
        assert!(matches!(
            FormulaGrammar::assembler().build(),
            Err(GrammarError::UnknownSymbolReference(name)) if name == "FUNCTION_CALL"
        ));
    }

    #[test]
    fn test_nullary_production() {
        let grammar = FormulaGrammar::assembler()
            .nullary_function("PI")
            .build()
            .unwrap();

        let pi = grammar
            .rules()
            .iter()
            .find(|r| r.lhs().id() == FUNCTION_CALL)
            .unwrap();
        assert_eq!(pi.render(), "'PI' FUNC_BEG FUNC_END");
    }

    #[test]
    fn test_unquotable_nullary_name_is_skipped() {
        let assembler = FormulaGrammar::assembler()
            .signature("ABS(Number: Number)")
            .nullary_function("P'I")
            .nullary_function("TO DAY");

        let summary = assembler.summary();
        assert_eq!(summary.compiled(), 1);
        assert_eq!(summary.malformed(), 2);

        // The emitted document must stay decodable
        let grammar = assembler.build().unwrap();
        let document = JsonGenerator::new().render(&grammar).unwrap();
        assert!(crate::parser::amalgam::parse_str(&document).is_ok());
    }

    #[test]
    fn test_custom_entrypoint_must_exist() {
        assert!(matches!(
            FormulaGrammar::assembler()
                .signatures(CORPUS)
                .entrypoint("NO_SUCH_RULE")
                .build(),
            Err(GrammarError::MissingEntrypoint(name)) if name == "NO_SUCH_RULE"
        ));
    }
}
