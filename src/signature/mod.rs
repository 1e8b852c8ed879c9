//! Typed function signatures and their compilation into grammar rules.
//!
//! The extraction collaborator hands over one signature per line, already
//! typed, in the shape `NAME(PARAM[; PARAM]...)` where a parameter is
//! `name: Type`, `[name: Type]` if optional, or `name N: Type` if it may
//! repeat without bound. [`Signature::parse`] turns such a line into a
//! [`Signature`]; [`compile`] turns a signature into the production
//! alternatives of the `FUNCTION_CALL` rule.

mod compile;

pub use compile::compile;

use crate::error::SignatureError;

/// Function names become quoted terminals, and the document format has no
/// escaping, so a name must survive the quoting convention as-is.
pub(crate) fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c == '\'')
}

/// The closed set of parameter types the upstream extractor infers.
///
/// Compilation maps every parameter to an expression regardless of type;
/// the type is carried for corpus diagnostics and future refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// A floating point number.
    Number,
    /// An integer.
    Integer,
    /// A text value.
    String,
    /// TRUE or FALSE.
    Boolean,
    /// A date value.
    Date,
    /// A cell range.
    Range,
    /// Anything goes.
    Any,
}

impl ParamType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "Number" => Some(Self::Number),
            "Integer" => Some(Self::Integer),
            "String" => Some(Self::String),
            "Boolean" => Some(Self::Boolean),
            "Date" => Some(Self::Date),
            "Range" => Some(Self::Range),
            "Any" => Some(Self::Any),
            _ => None,
        }
    }
}

/// One parameter descriptor of a documented function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    ty: ParamType,
    optional: bool,
    repeatable: bool,
}

impl Parameter {
    /// The documented parameter name, recurrence marker stripped.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The inferred type of this parameter.
    pub fn ty(&self) -> ParamType {
        self.ty
    }

    /// Whether the parameter was bracketed as optional.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the parameter carried the recurrence marker.
    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }
}

/// A documented function: its name plus ordered parameter descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    params: Vec<Parameter>,
}

impl Signature {
    /// Parse one extracted signature line.
    ///
    /// Fails with [`SignatureError::MalformedSignature`] if the line does
    /// not match the `NAME(...)` shape, with
    /// [`SignatureError::EmptyParameterList`] if the parentheses are empty
    /// and with [`SignatureError::AmbiguousParameterKind`] if the first
    /// parameter is repeatable while others are bracketed as optional.
    pub fn parse(line: &str) -> Result<Self, SignatureError> {
        let line = line.trim();
        let malformed = || SignatureError::MalformedSignature(line.to_string());

        let open = line.find('(').ok_or_else(|| malformed())?;
        if !line.ends_with(')') {
            return Err(malformed());
        }

        let name = line[..open].trim();
        if !valid_name(name) {
            return Err(malformed());
        }

        let inner = &line[open + 1..line.len() - 1];
        if inner.trim().is_empty() {
            return Err(SignatureError::EmptyParameterList(name.to_string()));
        }

        let params = inner
            .split(';')
            .map(|raw| Self::parse_param(raw).ok_or_else(|| malformed()))
            .collect::<Result<Vec<Parameter>, SignatureError>>()?;

        let signature = Self {
            name: name.to_string(),
            params,
        };

        if signature.is_variadic() && signature.params.iter().any(Parameter::is_optional) {
            return Err(SignatureError::AmbiguousParameterKind(signature.name));
        }

        Ok(signature)
    }

    fn parse_param(raw: &str) -> Option<Parameter> {
        let raw = raw.trim();

        let (raw, optional) = if raw.starts_with('[') && raw.ends_with(']') {
            (raw[1..raw.len() - 1].trim(), true)
        } else if raw.contains('[') || raw.contains(']') {
            return None;
        } else {
            (raw, false)
        };

        let (name, ty) = raw.split_once(':')?;
        let ty = ParamType::parse(ty.trim())?;

        let name = name.trim();
        let (name, repeatable) = match name.strip_suffix(" N") {
            Some(stripped) => (stripped.trim_end(), true),
            None => (name, false),
        };

        if name.is_empty() {
            return None;
        }

        Some(Parameter {
            name: name.to_string(),
            ty,
            optional,
            repeatable,
        })
    }

    /// The function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered parameter descriptors.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Whether this function takes an unbounded argument list. Only the
    /// first descriptor decides, mirroring how the documentation marks
    /// variadic functions.
    pub fn is_variadic(&self) -> bool {
        self.params.first().is_some_and(Parameter::is_repeatable)
    }
}
