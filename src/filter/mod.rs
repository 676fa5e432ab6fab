// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Content Filter Expression Parser and Evaluator (spec.md §4.5).
//!
//! Implements the SQL92 subset DDS content-filtered topics and query
//! conditions use: comparisons, `AND`/`OR`/`NOT`, `BETWEEN`, `LIKE`,
//! inline literals, and bound `%0..%99` parameters. Ported from the
//! teacher's `dds/filter/{mod.rs,parser.rs}` tree-walking scanner and
//! AST, extended with `BETWEEN` (spec.md §4.5, not in the teacher's
//! grammar) and a `vm` module that compiles the AST to bytecode instead
//! of walking it directly — the teacher's `evaluator.rs` tree-walker
//! has no bytecode layer; `vm` is new, grounded on the opcode family
//! and fixed-size typed-cell stack spec.md §4.5 names.
//!
//! # Supported Syntax
//!
//! ```text
//! expression ::= condition
//!              | expression AND expression
//!              | expression OR expression
//!              | NOT expression
//!              | '(' expression ')'
//!
//! condition  ::= field_name operator value
//!              | field_name BETWEEN value AND value
//!              | field_name LIKE value
//!
//! operator   ::= '>' | '<' | '>=' | '<=' | '=' | '<>' | '!='
//!
//! value      ::= parameter | literal
//! parameter  ::= '%' digit+
//! literal    ::= integer | float | single-quoted string
//! ```

mod parser;
pub mod vm;

pub use parser::{parse_expression, Expression, Operator, Value};
pub use vm::{FieldValue, FilterCache, Program};

use std::sync::{Arc, RwLock};

/// Content filter for SQL-subset filtering of DDS samples. Holds the
/// compiled bytecode program and bound parameters; attach to a
/// `ContentFilteredTopic` or `QueryCondition`.
#[derive(Debug)]
pub struct ContentFilter {
    expression_str: String,
    program: Arc<Program>,
    parameters: Arc<RwLock<Vec<String>>>,
    cache: RwLock<FilterCache>,
    name: Option<String>,
}

impl Clone for ContentFilter {
    fn clone(&self) -> Self {
        Self {
            expression_str: self.expression_str.clone(),
            program: Arc::clone(&self.program),
            parameters: Arc::clone(&self.parameters),
            cache: RwLock::new(FilterCache::new()),
            name: self.name.clone(),
        }
    }
}

impl ContentFilter {
    pub fn new(expression: &str) -> Result<Self, FilterError> {
        let parsed = parse_expression(expression)?;
        Ok(Self {
            expression_str: expression.to_string(),
            program: Arc::new(vm::compile(&parsed)),
            parameters: Arc::new(RwLock::new(Vec::new())),
            cache: RwLock::new(FilterCache::new()),
            name: None,
        })
    }

    pub fn with_parameters(expression: &str, parameters: Vec<String>) -> Result<Self, FilterError> {
        let filter = Self::new(expression)?;
        filter.set_parameters(parameters);
        Ok(filter)
    }

    /// Rebind parameters. Per spec.md §4.5, changing parameters
    /// invalidates the evaluation cache (spec.md §8 scenario 6).
    pub fn set_parameters(&self, params: Vec<String>) {
        if let Ok(mut guard) = self.parameters.write() {
            *guard = params;
        }
        if let Ok(mut cache) = self.cache.write() {
            cache.reset();
        }
    }

    pub fn parameters(&self) -> Vec<String> {
        self.parameters.read().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn expression(&self) -> &str {
        &self.expression_str
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Evaluate against one sample's field values. An empty expression
    /// (the parsed `True` node) always returns `true` (spec.md §8).
    pub fn matches(
        &self,
        fields: &std::collections::HashMap<String, FieldValue>,
    ) -> Result<bool, FilterError> {
        let params = self.parameters();
        let mut cache = self.cache.write().map_err(|_| {
            FilterError::TypeMismatch("filter cache lock poisoned".to_string())
        })?;
        vm::interpret(&self.program, fields, &params, &mut cache)
    }
}

/// Errors that can occur during filter parsing or evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    ParseError(String),
    UnknownField(String),
    ParameterOutOfRange(usize),
    TypeMismatch(String),
    EmptyExpression,
    StackOverflow,
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::ParseError(msg) => write!(f, "filter parse error: {msg}"),
            FilterError::UnknownField(name) => write!(f, "unknown field: {name}"),
            FilterError::ParameterOutOfRange(idx) => write!(f, "parameter %{idx} not provided"),
            FilterError::TypeMismatch(msg) => write!(f, "type mismatch: {msg}"),
            FilterError::EmptyExpression => write!(f, "empty filter expression"),
            FilterError::StackOverflow => write!(f, "filter VM stack overflow"),
        }
    }
}

impl std::error::Error for FilterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_compared_to_itself_always_matches() {
        // spec.md §8: "%0 = %0" returns true regardless of bound parameters.
        let filter = ContentFilter::with_parameters("%0 = %0", vec!["7".to_string()]).unwrap();
        let fields = std::collections::HashMap::new();
        assert!(filter.matches(&fields).unwrap());

        filter.set_parameters(vec!["anything".to_string()]);
        assert!(filter.matches(&fields).unwrap());
    }

    #[test]
    fn empty_expression_matches_everything() {
        let expr = parse_expression("   ");
        assert!(matches!(expr, Err(FilterError::EmptyExpression)));
        // An explicit True node (how an empty WHERE clause compiles down
        // to for a ContentFilteredTopic with no filter expression) always
        // matches (spec.md §8).
        let program = vm::compile(&Expression::True);
        let mut cache = FilterCache::new();
        let fields = std::collections::HashMap::new();
        assert!(vm::interpret(&program, &fields, &[], &mut cache).unwrap());
    }

    #[test]
    fn between_scenario_from_spec() {
        // spec.md §8 scenario 6.
        let filter =
            ContentFilter::with_parameters("x BETWEEN %0 AND %1", vec!["10".into(), "20".into()])
                .unwrap();
        let mut fields = std::collections::HashMap::new();
        fields.insert("x".to_string(), FieldValue::Integer(15));
        assert!(filter.matches(&fields).unwrap());

        fields.insert("x".to_string(), FieldValue::Integer(21));
        assert!(!filter.matches(&fields).unwrap());

        filter.set_parameters(vec!["10".into(), "30".into()]);
        assert!(filter.matches(&fields).unwrap());
    }

    #[test]
    fn with_name_roundtrips() {
        let filter = ContentFilter::new("x > 0").unwrap().with_name("positive");
        assert_eq!(filter.name(), Some("positive"));
    }
}
