//! All error types of this crate.

use std::path::PathBuf;
use thiserror::Error;

/// A file could not be read or did not have the expected format.
#[derive(Debug, Error)]
pub struct ParsingError {
    path: PathBuf,
    msg: String,
}

impl ParsingError {
    pub(crate) fn new<P: Into<PathBuf>, S: Into<String>>(path: P, msg: S) -> Self {
        Self {
            path: path.into(),
            msg: msg.into(),
        }
    }
}

impl std::fmt::Display for ParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParsingError in {}: {}", self.path.display(), self.msg)
    }
}

/// Errors raised while compiling a single function signature.
///
/// All of these are per-item: the assembler logs them and skips the
/// offending line, the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The line does not match the `NAME(...)` shape.
    #[error("'{0}' does not match the NAME(...) signature shape")]
    MalformedSignature(String),

    /// The function has a name but no parameters. Zero-argument functions
    /// get an explicitly authored production instead of a compiled one.
    #[error("function '{0}' has an empty parameter list")]
    EmptyParameterList(String),

    /// The first parameter carries the recurrence marker while other
    /// parameters are bracketed as optional. Documented functions are one
    /// or the other, never both, so this line needs manual review.
    #[error("function '{0}' mixes a repeatable first parameter with optional parameters")]
    AmbiguousParameterKind(String),
}

/// Errors that make the assembled grammar unusable as a whole.
///
/// These are fatal: no document may be emitted for a grammar that fails
/// any of these checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The grammar does not define the configured entrypoint.
    #[error("the grammar does not define the entrypoint '{0}'")]
    MissingEntrypoint(String),

    /// A non-terminal is referenced in some alternative but has no
    /// productions of its own.
    #[error("the non-terminal '{0}' is referenced but never defined")]
    UnknownSymbolReference(String),

    /// The grammar contains a loop that can never terminate, so a
    /// generator expanding it would never finish.
    #[error("the grammar contains an unterminable loop")]
    ContainsCycles,
}
