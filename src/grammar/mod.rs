//! The grammar data model and the assembler that populates it.
//!
//! A grammar is a list of production rules. Every rule maps a single
//! non-terminal to one sequence of symbols; a non-terminal with multiple
//! alternatives simply has multiple rules, and the order of those rules
//! carries through into the serialized document (downstream generators
//! weight alternatives by position).
//!
//! Use it like so:
//! ```no_run
//! use librefuzz_grammar::grammar::FormulaGrammar;
//!
//! let grammar = FormulaGrammar::assembler()
//!     .signature_file("page_scrapes/func_sum.html.txt").unwrap()
//!     .nullary_function("PI")
//!     .build().unwrap();
//!
//! for rule in grammar.rules() {
//!     println!("{} -> {}", rule.lhs().id(), rule.render());
//! }
//! ```

mod assemble;
mod base;
pub(crate) mod validate;

pub use assemble::*;
pub use base::base_rules;

use itertools::Itertools;

use crate::{error::ParsingError, parser::amalgam};

/// The non-terminal that collects every compiled function-call alternative.
pub const FUNCTION_CALL: &str = "FUNCTION_CALL";

/// The non-terminal where generation starts unless overridden.
pub const DEFAULT_ENTRYPOINT: &str = "START";

/// A named grammar symbol that expands to one of its alternatives.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct NonTerminal(String);

impl NonTerminal {
    /// Create a non-terminal with the given name.
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// The name of this non-terminal.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// A literal token that does not expand further.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Terminal(String);

impl Terminal {
    /// Create a terminal with the given content.
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// The literal content of this terminal.
    pub fn content(&self) -> &str {
        &self.0
    }
}

/// One element of a production's right-hand side.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum Symbol {
    /// A literal token.
    Terminal(Terminal),
    /// A reference to another rule.
    NonTerminal(NonTerminal),
}

impl Symbol {
    /// Render this symbol in document notation: terminals are enclosed in
    /// single quotes, non-terminal references appear as their bare name.
    pub fn token(&self) -> String {
        match self {
            Symbol::Terminal(term) => format!("'{}'", term.content()),
            Symbol::NonTerminal(nonterm) => nonterm.id().to_string(),
        }
    }
}

/// A single production rule: one alternative of its left-hand side.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct ProductionRule {
    lhs: NonTerminal,
    rhs: Vec<Symbol>,
}

impl ProductionRule {
    /// Create a production rule. The right-hand side must not be empty.
    pub fn new(lhs: NonTerminal, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    /// The non-terminal this rule expands.
    pub fn lhs(&self) -> &NonTerminal {
        &self.lhs
    }

    /// The symbol sequence this rule expands to.
    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    /// Render the right-hand side as a space-joined token sequence,
    /// the form the alternative takes in a serialized document.
    pub fn render(&self) -> String {
        self.rhs.iter().map(Symbol::token).join(" ")
    }
}

/// An immutable, fully assembled grammar of spreadsheet-formula syntax.
///
/// Built either through the [`GrammarAssembler`] or by decoding a
/// previously serialized document.
pub struct FormulaGrammar {
    rules: Vec<ProductionRule>,
    entrypoint: NonTerminal,
}

impl FormulaGrammar {
    /// Create a [`GrammarAssembler`] seeded with the hand-authored base
    /// grammar.
    pub fn assembler() -> GrammarAssembler {
        GrammarAssembler::new()
    }

    pub(crate) fn new(rules: Vec<ProductionRule>, entrypoint: NonTerminal) -> Self {
        Self { rules, entrypoint }
    }

    /// Decode a document previously written by the
    /// [`JsonGenerator`](crate::backends::json::JsonGenerator).
    ///
    /// No validation is re-run here: the generator refuses to write
    /// unusable grammars in the first place. The entrypoint is taken to be
    /// the document's first non-terminal.
    pub fn from_document<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ParsingError> {
        let rules = amalgam::parse_file(path.as_ref())?;

        let entrypoint = match rules.first() {
            Some(rule) => rule.lhs().clone(),
            None => {
                return Err(ParsingError::new(
                    path.as_ref(),
                    "Document contains no production rules",
                ));
            },
        };

        Ok(Self::new(rules, entrypoint))
    }

    /// All production rules in insertion order.
    pub fn rules(&self) -> &[ProductionRule] {
        &self.rules
    }

    /// The non-terminal where generation starts.
    pub fn entrypoint(&self) -> &NonTerminal {
        &self.entrypoint
    }
}

impl std::fmt::Display for FormulaGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Entrypoint: {}", self.entrypoint.id())?;
        writeln!(f, "Rules:")?;

        for rule in &self.rules {
            writeln!(f, "  {} -> {}", rule.lhs().id(), rule.render())?;
        }

        Ok(())
    }
}
