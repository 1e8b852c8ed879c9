//! This library assembles the context-free grammar of LibreOffice-Calc-style
//! formula syntax that the librefuzz fuzzer generates its inputs from.
//!
//! It consists of
//! - __signature__: Parse and compile the typed function signatures the
//!   documentation extractor hands over, one per line.
//! - __grammar__: The hand-authored base grammar (literals, operators, the
//!   expression precedence chain, cell and date forms) and the assembler
//!   that merges compiled function productions into it.
//! - __backends__: Serialize the assembled grammar into the amalgamation
//!   document consumed downstream.
//!
//! ## Getting Started
//! The first step always is to assemble a grammar. Use the
//! [`FormulaGrammar::assembler()`](grammar::FormulaGrammar::assembler)
//! method to get a [`GrammarAssembler`](grammar::GrammarAssembler):
//! ```no_run
//! use librefuzz_grammar::grammar::FormulaGrammar;
//!
//! let assembler = FormulaGrammar::assembler()
//!     // Feed extracted signature corpus files, in canonical order
//!     .signature_file("page_scrapes/func_round.html.txt").unwrap()
//!     // Author zero-argument functions explicitly
//!     .nullary_function("PI");
//!
//! let summary = assembler.summary();
//! let grammar = assembler.build().unwrap();
//! println!("{summary}");
//! ```
//! Then, plug the grammar into the serializer:
//! ```no_run
//! # use librefuzz_grammar::{backends::json::JsonGenerator, grammar::FormulaGrammar};
//! # let grammar = FormulaGrammar::assembler().nullary_function("PI").build().unwrap();
//! JsonGenerator::new().generate("amalgamation.json", &grammar).unwrap();
//! ```
//! And that's it. Compiling signatures is pure and per-item failures only
//! skip the offending line; whole-grammar integrity failures (dangling
//! references, unterminable loops) abort before anything is written.

#![deny(missing_docs)]

pub(crate) mod parser;

pub mod backends;
pub mod error;
pub mod grammar;
pub mod signature;
