/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mustache template front end: parser and value model.
//!
//! This crate turns mustache template source into an AST and defines the
//! value model that AST is later evaluated against. It supports:
//!
//! - Variable interpolation: `{{var}}` or `{{obj.field}}`
//! - Unescaped interpolation: `{{&var}}` or `{{{var}}}`
//! - Sections: `{{#var}}...{{/var}}`
//! - Inverted sections: `{{^var}}...{{/var}}`
//! - Partials: `{{>name}}`
//! - Comments: `{{! ... }}`
//! - Delimiter changes: `{{=<% %>=}}`
//! - Standalone-tag whitespace elision
//!
//! # Architecture
//!
//! Rendering is **not** part of this crate. The parser produces an
//! [`Ast`]; host data converts to [`Value`] through [`ToValue`]; an
//! external evaluator walks the tree against a [`Context`] stack and owns
//! escaping, truthiness and lambda invocation. A [`Template`] bundles an
//! AST with its resolved partials as the unit handed to that evaluator.
//!
//! # Example
//!
//! ```
//! use mustache_core::{parse, object, field, Node};
//!
//! let ast = parse("greeting", "Hello, {{name}}!").unwrap();
//! assert_eq!(ast.len(), 3);
//! assert!(matches!(&ast[1], Node::Variable { escape: true, .. }));
//!
//! let data = object([field("name", "World")]);
//! ```

pub mod ast;
pub mod context;
pub mod convert;
pub mod error;
pub mod parser;
pub mod template;
pub mod value;

// Re-export main types at crate root
pub use ast::{Ast, Identifier, Node};
pub use context::Context;
pub use convert::{ToValue, field, json_field, object};
pub use error::{ParseError, ParseResult};
pub use parser::{ParserConfig, parse, parse_with_config};
pub use template::Template;
pub use value::{Lambda, Value};
