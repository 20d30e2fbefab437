//! Request validation
//!
//! Turns an untyped JSON object into a [`ParameterSet`], collecting one message per
//! failing field. Only the first failing constraint of each field is reported.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::fingerprint::ParameterSet;

/// Upper bound for both divisors.
pub const MAX_DIVISOR: u64 = 1000;
/// Upper bound for the sequence length.
pub const MAX_LIMIT: u64 = 100_000;
/// Maximum replacement length, in characters.
pub const MAX_REPLACEMENT_CHARS: usize = 50;

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k} {v}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Validate a request object and build its parameter set.
pub fn validate(data: &Map<String, Value>) -> Result<ParameterSet, FieldErrors> {
    let mut errors = FieldErrors::default();

    let int1 = check(&mut errors, "int1", bounded_int(data.get("int1"), MAX_DIVISOR));
    let int2 = check(&mut errors, "int2", bounded_int(data.get("int2"), MAX_DIVISOR));
    let limit = check(&mut errors, "limit", bounded_int(data.get("limit"), MAX_LIMIT));
    let str1 = check(&mut errors, "str1", bounded_str(data.get("str1")));
    let str2 = check(&mut errors, "str2", bounded_str(data.get("str2")));

    match (int1, int2, limit, str1, str2) {
        (Some(int1), Some(int2), Some(limit), Some(str1), Some(str2)) => {
            Ok(ParameterSet {
                int1,
                int2,
                limit,
                str1,
                str2,
            })
        }
        _ => Err(errors),
    }
}

fn check<T>(errors: &mut FieldErrors, field: &str, result: Result<T, String>) -> Option<T> {
    result.map_err(|message| errors.insert(field, message)).ok()
}

fn bounded_int(value: Option<&Value>, max: u64) -> Result<u64, String> {
    let number = match value {
        None | Some(Value::Null) => return Err("is required".to_string()),
        Some(Value::String(s)) if s.is_empty() => return Err("is required".to_string()),
        Some(Value::Number(number)) => number,
        Some(_) => return Err("must be an integer".to_string()),
    };

    let n = if let Some(n) = number.as_i64() {
        n
    } else if number.is_u64() {
        // Larger than i64::MAX, so certainly out of range.
        return Err(format!("must be less than or equal to {max}"));
    } else {
        match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
            _ => return Err("must be an integer".to_string()),
        }
    };

    if n <= 0 {
        return Err("must be positive".to_string());
    }

    let n = n as u64;
    if n > max {
        return Err(format!("must be less than or equal to {max}"));
    }

    Ok(n)
}

fn bounded_str(value: Option<&Value>) -> Result<String, String> {
    match value {
        None | Some(Value::Null) => Err("is required".to_string()),
        Some(Value::String(s)) if s.is_empty() => Err("is required".to_string()),
        Some(Value::String(s)) if s.chars().count() > MAX_REPLACEMENT_CHARS => Err(format!(
            "must be at most {MAX_REPLACEMENT_CHARS} characters"
        )),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err("must be a string".to_string()),
    }
}
