// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bytecode compiler and interpreter for filter expressions.
//!
//! The teacher's `dds/filter/evaluator.rs` walks the `Expression` tree
//! directly on every sample. This module compiles the tree once into a
//! flat opcode sequence (`Program`) and interprets it over a fixed-size
//! stack of typed cells, reusing the teacher's comparison, coercion and
//! `LIKE` matching rules (`compare`/`coerce_types`/`simple_like_match`)
//! but without re-walking the AST or re-parsing bound parameters on
//! every sample — resolved parameter values are memoized in a
//! `FilterCache` that is reset whenever the program or the bound
//! parameters change (spec.md §4.5, §8 scenario 6).

use std::collections::HashMap;

use super::parser::{Expression, Operator, Value};
use super::FilterError;

/// Maximum depth of the evaluation stack. Expressions nesting deeper
/// than this are rejected rather than growing the stack unbounded.
const MAX_STACK: usize = 64;

/// A resolved field value used in comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Boolean(bool),
}

impl FieldValue {
    pub fn from_i32(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }

    pub fn from_i64(v: i64) -> Self {
        FieldValue::Integer(v)
    }

    pub fn from_u32(v: u32) -> Self {
        FieldValue::Unsigned(v as u64)
    }

    pub fn from_u64(v: u64) -> Self {
        FieldValue::Unsigned(v)
    }

    pub fn from_f32(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }

    pub fn from_f64(v: f64) -> Self {
        FieldValue::Float(v)
    }

    pub fn from_bool(v: bool) -> Self {
        FieldValue::Boolean(v)
    }

    pub fn from_string(v: impl Into<String>) -> Self {
        FieldValue::String(v.into())
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Unsigned(n) => Some(*n as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// One operand slot in a compiled program: either not yet resolved
/// against fields/parameters (`Field`/`Param`), or a literal baked in
/// at compile time.
#[derive(Debug, Clone)]
enum Operand {
    Field(String),
    Param(usize),
    Literal(FieldValue),
}

#[derive(Debug, Clone)]
enum Instr {
    /// Push a resolved operand.
    Push(Operand),
    Cmp(Operator),
    Between,
    And,
    Or,
    Not,
    PushTrue,
}

/// Compiled bytecode for a filter expression.
#[derive(Debug)]
pub struct Program {
    instrs: Vec<Instr>,
}

fn value_to_operand(value: &Value) -> Operand {
    match value {
        Value::Field(name) => Operand::Field(name.clone()),
        Value::Parameter(idx) => Operand::Param(*idx),
        Value::Integer(n) => Operand::Literal(FieldValue::Integer(*n)),
        Value::Float(f) => Operand::Literal(FieldValue::Float(*f)),
        Value::String(s) => Operand::Literal(FieldValue::String(s.clone())),
        Value::Boolean(b) => Operand::Literal(FieldValue::Boolean(*b)),
    }
}

fn compile_into(expr: &Expression, out: &mut Vec<Instr>) {
    match expr {
        Expression::Comparison { left, op, right } => {
            out.push(Instr::Push(value_to_operand(left)));
            out.push(Instr::Push(value_to_operand(right)));
            out.push(Instr::Cmp(*op));
        }
        Expression::Between { value, low, high } => {
            out.push(Instr::Push(value_to_operand(value)));
            out.push(Instr::Push(value_to_operand(low)));
            out.push(Instr::Push(value_to_operand(high)));
            out.push(Instr::Between);
        }
        Expression::And(l, r) => {
            compile_into(l, out);
            compile_into(r, out);
            out.push(Instr::And);
        }
        Expression::Or(l, r) => {
            compile_into(l, out);
            compile_into(r, out);
            out.push(Instr::Or);
        }
        Expression::Not(e) => {
            compile_into(e, out);
            out.push(Instr::Not);
        }
        Expression::True => out.push(Instr::PushTrue),
    }
}

/// Compile a parsed expression into a flat bytecode program.
pub fn compile(expr: &Expression) -> Program {
    let mut instrs = Vec::new();
    compile_into(expr, &mut instrs);
    Program { instrs }
}

/// Memoized parameter resolutions for one compiled program. Reset
/// whenever the bound parameters (or the program itself) change.
#[derive(Debug, Default)]
pub struct FilterCache {
    resolved_params: Vec<Option<FieldValue>>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate all memoized parameter resolutions.
    pub fn reset(&mut self) {
        self.resolved_params.clear();
    }

    fn get_or_resolve(&mut self, idx: usize, params: &[String]) -> Result<FieldValue, FilterError> {
        if idx >= self.resolved_params.len() {
            self.resolved_params.resize(idx + 1, None);
        }
        if let Some(Some(v)) = self.resolved_params.get(idx) {
            return Ok(v.clone());
        }

        let raw = params
            .get(idx)
            .ok_or(FilterError::ParameterOutOfRange(idx))?;
        let resolved = parse_param(raw);
        self.resolved_params[idx] = Some(resolved.clone());
        Ok(resolved)
    }
}

/// Best-effort dynamic typing of a bound parameter string: integer,
/// then float, then boolean, falling back to a plain string.
fn parse_param(raw: &str) -> FieldValue {
    if let Ok(i) = raw.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return FieldValue::Float(f);
    }
    if let Ok(b) = raw.parse::<bool>() {
        return FieldValue::Boolean(b);
    }
    FieldValue::String(raw.to_string())
}

fn resolve_operand(
    operand: &Operand,
    fields: &HashMap<String, FieldValue>,
    params: &[String],
    cache: &mut FilterCache,
) -> Result<FieldValue, FilterError> {
    match operand {
        Operand::Field(name) => fields
            .get(name)
            .cloned()
            .ok_or_else(|| FilterError::UnknownField(name.clone())),
        Operand::Param(idx) => cache.get_or_resolve(*idx, params),
        Operand::Literal(v) => Ok(v.clone()),
    }
}

fn compare(left: &FieldValue, op: Operator, right: &FieldValue) -> Result<bool, FilterError> {
    if op == Operator::Like {
        let (FieldValue::String(text), FieldValue::String(pattern)) = (left, right) else {
            return Err(FilterError::TypeMismatch("LIKE requires string operands".to_string()));
        };
        return Ok(simple_like_match(text, pattern));
    }

    if let (FieldValue::String(a), FieldValue::String(b)) = (left, right) {
        return Ok(match op {
            Operator::Eq => a == b,
            Operator::Ne => a != b,
            Operator::Lt => a < b,
            Operator::Le => a <= b,
            Operator::Gt => a > b,
            Operator::Ge => a >= b,
            Operator::Like => unreachable!("handled above"),
        });
    }

    if let (FieldValue::Boolean(a), FieldValue::Boolean(b)) = (left, right) {
        return Ok(match op {
            Operator::Eq => a == b,
            Operator::Ne => a != b,
            _ => {
                return Err(FilterError::TypeMismatch(
                    "ordering operators require numeric or string operands".to_string(),
                ))
            }
        });
    }

    let (a, b) = match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(FilterError::TypeMismatch(format!(
                "cannot compare {left:?} with {right:?}"
            )))
        }
    };

    Ok(match op {
        Operator::Eq => a == b,
        Operator::Ne => a != b,
        Operator::Lt => a < b,
        Operator::Le => a <= b,
        Operator::Gt => a > b,
        Operator::Ge => a >= b,
        Operator::Like => unreachable!("handled above"),
    })
}

/// Recursive pattern match supporting `%` (any run) and `_` (any one
/// character), mirroring SQL `LIKE` semantics without pulling in a
/// regex engine.
fn simple_like_match(text: &str, pattern: &str) -> bool {
    fn matches(t: &[u8], p: &[u8]) -> bool {
        match p.first() {
            None => t.is_empty(),
            Some(b'%') => matches(t, &p[1..]) || (!t.is_empty() && matches(&t[1..], p)),
            Some(b'_') => !t.is_empty() && matches(&t[1..], &p[1..]),
            Some(c) => !t.is_empty() && t[0] == *c && matches(&t[1..], &p[1..]),
        }
    }
    matches(text.as_bytes(), pattern.as_bytes())
}

#[derive(Debug, Clone)]
enum Cell {
    Value(FieldValue),
    Bool(bool),
}

fn pop_value(stack: &mut Vec<Cell>) -> Result<FieldValue, FilterError> {
    match stack.pop() {
        Some(Cell::Value(v)) => Ok(v),
        _ => Err(FilterError::TypeMismatch("expected value operand on stack".to_string())),
    }
}

fn pop_bool(stack: &mut Vec<Cell>) -> Result<bool, FilterError> {
    match stack.pop() {
        Some(Cell::Bool(b)) => Ok(b),
        _ => Err(FilterError::TypeMismatch("expected boolean operand on stack".to_string())),
    }
}

/// Run a compiled program against one sample's fields and the
/// currently-bound parameters, returning whether the sample matches.
pub fn interpret(
    program: &Program,
    fields: &HashMap<String, FieldValue>,
    params: &[String],
    cache: &mut FilterCache,
) -> Result<bool, FilterError> {
    let mut stack: Vec<Cell> = Vec::with_capacity(8);

    for instr in &program.instrs {
        if stack.len() >= MAX_STACK {
            return Err(FilterError::StackOverflow);
        }

        match instr {
            Instr::Push(operand) => {
                let value = resolve_operand(operand, fields, params, cache)?;
                stack.push(Cell::Value(value));
            }
            Instr::PushTrue => stack.push(Cell::Bool(true)),
            Instr::Cmp(op) => {
                let right = pop_value(&mut stack)?;
                let left = pop_value(&mut stack)?;
                stack.push(Cell::Bool(compare(&left, *op, &right)?));
            }
            Instr::Between => {
                let high = pop_value(&mut stack)?;
                let low = pop_value(&mut stack)?;
                let value = pop_value(&mut stack)?;
                let in_range = compare(&value, Operator::Ge, &low)? && compare(&value, Operator::Le, &high)?;
                stack.push(Cell::Bool(in_range));
            }
            Instr::And => {
                let b = pop_bool(&mut stack)?;
                let a = pop_bool(&mut stack)?;
                stack.push(Cell::Bool(a && b));
            }
            Instr::Or => {
                let b = pop_bool(&mut stack)?;
                let a = pop_bool(&mut stack)?;
                stack.push(Cell::Bool(a || b));
            }
            Instr::Not => {
                let a = pop_bool(&mut stack)?;
                stack.push(Cell::Bool(!a));
            }
        }
    }

    pop_bool(&mut stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parser::parse_expression;

    fn run(expr: &str, fields: &HashMap<String, FieldValue>, params: &[String]) -> bool {
        let parsed = parse_expression(expr).unwrap();
        let program = compile(&parsed);
        let mut cache = FilterCache::new();
        interpret(&program, fields, params, &mut cache).unwrap()
    }

    #[test]
    fn simple_comparison() {
        let mut fields = HashMap::new();
        fields.insert("temperature".to_string(), FieldValue::Integer(30));
        assert!(run("temperature > 25", &fields, &[]));
        assert!(!run("temperature < 25", &fields, &[]));
    }

    #[test]
    fn and_or_not() {
        let mut fields = HashMap::new();
        fields.insert("a".to_string(), FieldValue::Integer(1));
        fields.insert("b".to_string(), FieldValue::Integer(2));
        assert!(run("a = 1 AND b = 2", &fields, &[]));
        assert!(!run("a = 1 AND b = 3", &fields, &[]));
        assert!(run("a = 1 OR b = 3", &fields, &[]));
        assert!(run("NOT a = 2", &fields, &[]));
    }

    #[test]
    fn between_with_params() {
        let mut fields = HashMap::new();
        fields.insert("x".to_string(), FieldValue::Integer(15));
        let params = vec!["10".to_string(), "20".to_string()];
        assert!(run("x BETWEEN %0 AND %1", &fields, &params));

        fields.insert("x".to_string(), FieldValue::Integer(21));
        assert!(!run("x BETWEEN %0 AND %1", &fields, &params));
    }

    #[test]
    fn like_matches_percent_and_underscore() {
        assert!(simple_like_match("sensor_01", "sensor%"));
        assert!(simple_like_match("sensor_01", "sensor_01"));
        assert!(simple_like_match("sensor_01", "sens_r_01"));
        assert!(!simple_like_match("sensor_01", "actuator%"));
    }

    #[test]
    fn like_operator_requires_strings() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), FieldValue::String("sensor_01".to_string()));
        assert!(run("name LIKE 'sensor%'", &fields, &[]));
    }

    #[test]
    fn unknown_field_is_an_error() {
        let fields = HashMap::new();
        let parsed = parse_expression("missing > 1").unwrap();
        let program = compile(&parsed);
        let mut cache = FilterCache::new();
        let result = interpret(&program, &fields, &[], &mut cache);
        assert!(matches!(result, Err(FilterError::UnknownField(name)) if name == "missing"));
    }

    #[test]
    fn parameter_out_of_range_is_an_error() {
        let fields = HashMap::new();
        let parsed = parse_expression("x = %0").unwrap();
        let program = compile(&parsed);
        let mut cache = FilterCache::new();
        let result = interpret(&program, &fields, &[], &mut cache);
        assert!(matches!(result, Err(FilterError::ParameterOutOfRange(0))));
    }

    #[test]
    fn cache_reset_picks_up_new_parameter_value() {
        let mut fields = HashMap::new();
        fields.insert("x".to_string(), FieldValue::Integer(25));
        let parsed = parse_expression("x = %0").unwrap();
        let program = compile(&parsed);
        let mut cache = FilterCache::new();

        let params_a = vec!["10".to_string()];
        assert!(!interpret(&program, &fields, &params_a, &mut cache).unwrap());

        // Without resetting, the cache would still hold the stale "10".
        cache.reset();
        let params_b = vec!["25".to_string()];
        assert!(interpret(&program, &fields, &params_b, &mut cache).unwrap());
    }

    #[test]
    fn float_and_integer_compare_across_types() {
        let mut fields = HashMap::new();
        fields.insert("x".to_string(), FieldValue::Float(3.5));
        assert!(run("x > 3", &fields, &[]));
    }
}
