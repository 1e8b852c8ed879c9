//! Serialize a grammar into the amalgamation document format consumed by
//! the fuzz-input generator.
//!
//! Use it like so:
//! ```no_run
//! use librefuzz_grammar::{backends::json::JsonGenerator, grammar::FormulaGrammar};
//!
//! let grammar = FormulaGrammar::assembler()
//!     .signature("SUM(Number 1 N: Number)")
//!     .build().unwrap();
//!
//! JsonGenerator::new().generate("amalgamation.json", &grammar).unwrap();
//! ```

mod generator;

pub use generator::JsonGenerator;
