//! Decoder for the amalgamation document format: a JSON object mapping
//! bare non-terminal names to arrays of production strings, where each
//! production is a space-separated token sequence with single-quoted
//! terminals. Comments in C style are tolerated on input.

use ahash::AHashSet;
use json_comments::{CommentSettings, StripComments};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json as json;
use std::{fs::File, io::BufReader, path::Path};

use crate::{
    error::ParsingError,
    grammar::{NonTerminal, ProductionRule, Symbol, Terminal},
};

fn parse_until<F: FnMut(u8) -> bool>(buf: &[u8], mut delim: F) -> &[u8] {
    let mut cursor = 0;

    while cursor < buf.len() {
        if delim(buf[cursor]) {
            break;
        }
        cursor += 1;
    }

    &buf[..cursor]
}

/// Split one production string into its symbols. Single-quoted runs are
/// terminals, everything else up to the next whitespace is a non-terminal
/// reference.
fn scan_alternative(key: &str, production: &str) -> Result<Vec<Symbol>, String> {
    let bytes = production.as_bytes();
    let mut symbols = Vec::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        match bytes[cursor] {
            b'\'' => {
                cursor += 1;
                let content = parse_until(&bytes[cursor..], |c| c == b'\'');
                if cursor + content.len() >= bytes.len() {
                    return Err(format!("Unterminated terminal in a production of '{key}'"));
                }
                cursor += content.len() + 1;
                let content = String::from_utf8(content.to_vec()).unwrap();
                symbols.push(Symbol::Terminal(Terminal::new(content)));
            },
            c if c.is_ascii_whitespace() => {
                cursor += 1;
            },
            _ => {
                let content = parse_until(&bytes[cursor..], |c| c.is_ascii_whitespace() || c == b'\'');
                cursor += content.len();
                let content = String::from_utf8(content.to_vec()).unwrap();
                symbols.push(Symbol::NonTerminal(NonTerminal::new(content)));
            },
        }
    }

    if symbols.is_empty() {
        return Err(format!("A production of '{key}' contains no tokens"));
    }

    Ok(symbols)
}

/// The document's top-level object as an entry list. Deserializing into a
/// map would collapse duplicate keys last-wins before we ever see them, so
/// the entries are streamed instead and duplicates rejected explicitly.
struct Entries(Vec<(String, json::Value)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a grammar document object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();

                while let Some(entry) = map.next_entry::<String, json::Value>()? {
                    entries.push(entry);
                }

                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

fn parse_document(document: Entries) -> Result<Vec<ProductionRule>, String> {
    let mut rules = Vec::new();
    let mut seen = AHashSet::new();

    for (key, value) in &document.0 {
        if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c == '\'') {
            return Err(format!("'{key}' is not a valid non-terminal name"));
        }

        if !seen.insert(key.as_str()) {
            return Err(format!("The non-terminal '{key}' is defined more than once"));
        }

        let alternatives = match value {
            json::Value::Array(alternatives) => alternatives,
            _ => return Err(format!("Right-hand-side of '{key}' must be an array")),
        };

        if alternatives.is_empty() {
            return Err(format!("Invalid production rule '{key}': Must not be empty"));
        }

        for alternative in alternatives {
            let production = match alternative.as_str() {
                Some(production) => production,
                _ => return Err(format!("Right-hand-side of '{key}' must be an array of strings")),
            };

            rules.push(ProductionRule::new(
                NonTerminal::new(key.as_str()),
                scan_alternative(key, production)?,
            ));
        }
    }

    Ok(rules)
}

pub(crate) fn parse_str(content: &str) -> Result<Vec<ProductionRule>, String> {
    let reader = StripComments::with_settings(CommentSettings::c_style(), content.as_bytes());

    let document: Entries = match json::from_reader(reader) {
        Ok(document) => document,
        Err(_) => return Err("Invalid grammar document".to_string()),
    };

    parse_document(document)
}

pub(crate) fn parse_file(path: &Path) -> Result<Vec<ProductionRule>, ParsingError> {
    let file = File::open(path).map_err(|e| ParsingError::new(path, format!("{e}")))?;
    let reader = BufReader::new(file);
    let reader = StripComments::with_settings(CommentSettings::c_style(), reader);

    let document: Entries = match json::from_reader(reader) {
        Ok(document) => document,
        Err(_) => {
            return Err(ParsingError::new(path, "Invalid grammar document"));
        },
    };

    parse_document(document).map_err(|e| ParsingError::new(path, e))
}
