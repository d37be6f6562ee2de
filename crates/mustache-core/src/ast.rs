/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! This module defines the abstract syntax tree for parsed templates.
//! Nodes are created only by the parser and are immutable afterwards;
//! the renderer walks them without modification.

use std::fmt;

/// A parsed template body: an ordered sequence of sibling nodes.
pub type Ast = Vec<Node>;

/// The name a tag refers to.
///
/// Either a dotted path (`a.b.c`) or the implicit marker (`.`), which
/// stands for the current top-of-context value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// A dotted path. The segment list is never empty and segments
    /// never contain `.`.
    Named(Vec<String>),

    /// The literal current context value, written `.` in a tag.
    Implicit,
}

impl Identifier {
    /// Build a named identifier from path segments.
    pub fn named(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Identifier::Named(segments.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Named(segments) => f.write_str(&segments.join(".")),
            Identifier::Implicit => f.write_str("."),
        }
    }
}

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text to be output as-is.
    Text(String),

    /// Section block: `{{#id}}...{{/id}}`.
    ///
    /// The body is rendered once per truthy/iterable value bound to `id`,
    /// with that value pushed as the new top of the context stack.
    Section { id: Identifier, body: Ast },

    /// Inverted section: `{{^id}}...{{/id}}`.
    ///
    /// The body renders only when `id` resolves to a falsy or empty value.
    /// The identifier is never `Implicit`; the parser rejects that form.
    InvertedSection { id: Identifier, body: Ast },

    /// Variable interpolation: `{{id}}`, `{{&id}}` or `{{{id}}}`.
    ///
    /// `escape` is false for the `&` and triple-brace forms; the renderer
    /// applies its escaping policy only when `escape` is true.
    Variable { escape: bool, id: Identifier },

    /// Partial reference: `{{>name}}`.
    ///
    /// The name is free-form text, not a dotted identifier. Resolution to
    /// a template happens during assembly, before rendering.
    Partial(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_named() {
        let id = Identifier::named(["a", "b", "c"]);
        assert_eq!(
            id,
            Identifier::Named(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(Identifier::named(["a", "b", "c"]).to_string(), "a.b.c");
        assert_eq!(Identifier::named(["name"]).to_string(), "name");
        assert_eq!(Identifier::Implicit.to_string(), ".");
    }

    #[test]
    fn test_node_equality() {
        let section = Node::Section {
            id: Identifier::named(["a"]),
            body: vec![Node::Text("X".to_string())],
        };
        assert_eq!(
            section,
            Node::Section {
                id: Identifier::named(["a"]),
                body: vec![Node::Text("X".to_string())],
            }
        );
        assert_ne!(
            section,
            Node::InvertedSection {
                id: Identifier::named(["a"]),
                body: vec![Node::Text("X".to_string())],
            }
        );
    }
}
