//! Document generation for pmxdocs
//!
//! Turns raw API records into a tree of `.mdx` documents with YAML front
//! matter. Parsing and redaction happen here, between collection and
//! templating: every generator fetches its records, decodes microformat
//! fields with `pmx-parse`, pushes sensitive values through the shared
//! `pmx-redact::Redactor`, and renders markdown.

pub mod document;
pub mod generator;
pub mod generators;
pub mod markdown;

pub use document::Document;
pub use generator::{DocGenerator, GenerationReport, Renderer};
