/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The compiled template container.
//!
//! A [`Template`] bundles a parsed AST with its name and a mapping of
//! partial name to fully resolved template. Resolving every
//! `{{>name}}` reference in the AST into that mapping is the assembler's
//! job, and the mapping must be acyclic for rendering to terminate; the
//! type itself enforces neither.

use crate::ast::Ast;
use crate::error::ParseResult;
use crate::parser::{self, ParserConfig};
use std::collections::HashMap;

/// A named template with its resolved partials, ready for rendering.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The template's name (also used as the source name in errors).
    pub name: String,

    /// The parsed template body.
    pub ast: Ast,

    /// Resolved partials, keyed by the name used in `{{>name}}` tags.
    pub partials: HashMap<String, Template>,
}

impl Template {
    /// Wrap an already parsed AST with no partials.
    pub fn new(name: impl Into<String>, ast: Ast) -> Self {
        Self {
            name: name.into(),
            ast,
            partials: HashMap::new(),
        }
    }

    /// Wrap an already parsed AST together with its resolved partials.
    pub fn with_partials(
        name: impl Into<String>,
        ast: Ast,
        partials: HashMap<String, Template>,
    ) -> Self {
        Self {
            name: name.into(),
            ast,
            partials,
        }
    }

    /// Parse `source` and wrap it with an empty partial mapping.
    pub fn compile(name: impl Into<String>, source: &str) -> ParseResult<Self> {
        let name = name.into();
        let ast = parser::parse(&name, source)?;
        Ok(Self::new(name, ast))
    }

    /// Parse `source` with a custom starting delimiter pair.
    pub fn compile_with_config(
        config: &ParserConfig,
        name: impl Into<String>,
        source: &str,
    ) -> ParseResult<Self> {
        let name = name.into();
        let ast = parser::parse_with_config(config, &name, source)?;
        Ok(Self::new(name, ast))
    }
}
