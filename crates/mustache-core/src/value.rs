/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The template value model.
//!
//! This module defines [`Value`], the single runtime representation every
//! piece of template data is converted into before rendering, and
//! [`Lambda`], the callable variant that lets host code rewrite a section
//! body before it is rendered.
//!
//! Numbers are stored as [`serde_json::Number`] so that integers survive
//! conversion without floating-point round-trip surprises.

use crate::ast::{Ast, Node};
use crate::context::Context;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A value that can be substituted into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A map of string keys to values. Insertion order is not significant.
    Object(HashMap<String, Value>),

    /// An ordered list of values.
    Array(Vec<Value>),

    /// A numeric value, integer-preserving.
    Number(serde_json::Number),

    /// A string value.
    String(String),

    /// A boolean value.
    Bool(bool),

    /// A null/missing value.
    Null,

    /// A callable that receives the current context and a section body
    /// and produces a replacement body.
    Lambda(Lambda),
}

/// A section lambda in canonical form: `(&Context, &[Node]) -> Ast`.
///
/// Lambdas are opaque: equality is pointer identity and they have no
/// structural textual form.
#[derive(Clone)]
pub struct Lambda(Arc<dyn Fn(&Context, &[Node]) -> Ast + Send + Sync>);

impl Lambda {
    /// Invoke the lambda with the current context and a section body.
    pub fn invoke(&self, context: &Context, body: &[Node]) -> Ast {
        (self.0)(context, body)
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lambda(<lambda>)")
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Value {
    /// Wrap a canonical-shape lambda: `(&Context, &[Node]) -> Ast`.
    pub fn lambda<F>(f: F) -> Value
    where
        F: Fn(&Context, &[Node]) -> Ast + Send + Sync + 'static,
    {
        Value::Lambda(Lambda(Arc::new(f)))
    }

    /// Wrap a lambda returning text instead of an AST.
    ///
    /// The returned text becomes a single [`Node::Text`] body.
    pub fn lambda_text<F, S>(f: F) -> Value
    where
        F: Fn(&Context, &[Node]) -> S + Send + Sync + 'static,
        S: Into<String>,
    {
        Value::lambda(move |context, body| vec![Node::Text(f(context, body).into())])
    }

    /// Wrap a lambda that only transforms the section body, ignoring
    /// the context.
    pub fn lambda_body<F>(f: F) -> Value
    where
        F: Fn(&[Node]) -> Ast + Send + Sync + 'static,
    {
        Value::lambda(move |_context, body| f(body))
    }

    /// Wrap a context-ignoring lambda returning text.
    pub fn lambda_body_text<F, S>(f: F) -> Value
    where
        F: Fn(&[Node]) -> S + Send + Sync + 'static,
        S: Into<String>,
    {
        Value::lambda(move |_context, body| vec![Node::Text(f(body).into())])
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    /// Human-readable rendering for diagnostics.
    ///
    /// Structural for every data variant, `null` for [`Value::Null`] and a
    /// fixed placeholder for lambdas. Object keys are sorted so the output
    /// is deterministic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                f.write_str("{")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, map[*key])?;
                }
                f.write_str("}")
            }
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
            Value::Lambda(_) => f.write_str("<lambda>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::String("hi".to_string()).to_string(), "\"hi\"");
        assert_eq!(Value::Number(42.into()).to_string(), "42");
    }

    #[test]
    fn test_display_composites() {
        let array = Value::Array(vec![Value::Number(1.into()), Value::Null]);
        assert_eq!(array.to_string(), "[1, null]");

        let mut map = HashMap::new();
        map.insert("b".to_string(), Value::Bool(false));
        map.insert("a".to_string(), Value::String("x".to_string()));
        // Keys come out sorted regardless of insertion order.
        assert_eq!(Value::Object(map).to_string(), "{\"a\": \"x\", \"b\": false}");
    }

    #[test]
    fn test_display_lambda_placeholder() {
        let lambda = Value::lambda(|_ctx, body| body.to_vec());
        assert_eq!(lambda.to_string(), "<lambda>");
    }

    #[test]
    fn test_lambda_equality_is_pointer_identity() {
        let a = Value::lambda(|_ctx, body| body.to_vec());
        let b = Value::lambda(|_ctx, body| body.to_vec());
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn test_lambda_text_wraps_into_text_node() {
        let value = Value::lambda_text(|_ctx, _body| "hello");
        let context = Context::new(Value::Null);
        match value {
            Value::Lambda(lambda) => {
                assert_eq!(
                    lambda.invoke(&context, &[]),
                    vec![Node::Text("hello".to_string())]
                );
            }
            _ => panic!("Expected Lambda value"),
        }
    }

    #[test]
    fn test_lambda_body_ignores_context() {
        let value = Value::lambda_body(|body| {
            let mut doubled = body.to_vec();
            doubled.extend(body.to_vec());
            doubled
        });
        let context = Context::new(Value::Null);
        let body = vec![Node::Text("x".to_string())];
        match value {
            Value::Lambda(lambda) => {
                assert_eq!(
                    lambda.invoke(&context, &body),
                    vec![
                        Node::Text("x".to_string()),
                        Node::Text("x".to_string()),
                    ]
                );
            }
            _ => panic!("Expected Lambda value"),
        }
    }

    #[test]
    fn test_lambda_body_text() {
        let value = Value::lambda_body_text(|body| format!("{} nodes", body.len()));
        let context = Context::new(Value::Null);
        match value {
            Value::Lambda(lambda) => {
                assert_eq!(
                    lambda.invoke(&context, &[Node::Text("a".to_string())]),
                    vec![Node::Text("1 nodes".to_string())]
                );
            }
            _ => panic!("Expected Lambda value"),
        }
    }
}
