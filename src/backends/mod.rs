//! Render an assembled grammar for downstream consumers.

pub mod json;
