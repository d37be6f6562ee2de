/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The context stack used during template evaluation.
//!
//! A [`Context`] is a non-empty stack of values, innermost first. The
//! renderer pushes a frame when it enters a section and pops it on exit;
//! identifier resolution walks the stack from the innermost frame outward.
//! This crate only defines the stack shape; resolution and truthiness
//! policy belong to the evaluator.

use crate::value::Value;

/// A non-empty stack of in-scope values.
///
/// Non-emptiness holds by construction: the current frame is stored
/// separately from its parents, and [`Context::pop`] refuses to remove
/// the last frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    current: Value,
    parents: Vec<Value>,
}

impl Context {
    /// Create a context with a single root frame.
    pub fn new(value: Value) -> Self {
        Self {
            current: value,
            parents: Vec::new(),
        }
    }

    /// The innermost (current) value.
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// Push a value as the new innermost frame.
    pub fn push(&mut self, value: Value) {
        let previous = std::mem::replace(&mut self.current, value);
        self.parents.push(previous);
    }

    /// Pop the innermost frame, restoring its parent.
    ///
    /// Returns the popped value, or `None` when only the root frame is
    /// left (the stack never becomes empty).
    pub fn pop(&mut self) -> Option<Value> {
        let parent = self.parents.pop()?;
        Some(std::mem::replace(&mut self.current, parent))
    }

    /// Number of frames on the stack (always at least 1).
    pub fn depth(&self) -> usize {
        self.parents.len() + 1
    }

    /// Iterate over the frames, innermost first.
    pub fn frames(&self) -> impl Iterator<Item = &Value> {
        std::iter::once(&self.current).chain(self.parents.iter().rev())
    }
}
