//! Common code and struct.
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Convert m/s into km/h
///
#[inline]
pub fn to_kmh(a: f64) -> f64 {
    a * 3.6
}

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("not a number: {0}")]
    NotANumber(String),
    #[error("not a boolean: {0}")]
    NotABool(String),
}

/// Loosely-typed value as found in upstream data.
///
/// Position, altitudes and ground status are sometimes sent as numbers, sometimes as strings
/// and sometimes not at all, so we keep them as-is and normalise them when they are used.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Field {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Numeric value, `None` when absent.
    ///
    /// Numeric strings are accepted, surrounding blanks are ignored and a blank string is the
    /// same as null.  Non-finite values are refused.
    ///
    pub fn as_f64(&self) -> Result<Option<f64>, FieldError> {
        match self {
            Field::Null => Ok(None),
            Field::Number(v) if v.is_finite() => Ok(Some(*v)),
            Field::Number(v) => Err(FieldError::NotANumber(v.to_string())),
            Field::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                match s.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(Some(v)),
                    _ => Err(FieldError::NotANumber(s.to_string())),
                }
            }
            Field::Bool(b) => Err(FieldError::NotANumber(b.to_string())),
        }
    }

    /// Strict boolean out of every representation of truth we accept, `None` when absent.
    ///
    /// - booleans as-is
    /// - `1` and `0`
    /// - `true/false`, `t/f`, `yes/no`, `y/n`, `1/0` in any case, blank being false
    ///
    pub fn truthy(&self) -> Result<Option<bool>, FieldError> {
        match self {
            Field::Null => Ok(None),
            Field::Bool(b) => Ok(Some(*b)),
            Field::Number(v) if *v == 1. => Ok(Some(true)),
            Field::Number(v) if *v == 0. => Ok(Some(false)),
            Field::Number(v) => Err(FieldError::NotABool(v.to_string())),
            Field::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => Ok(Some(true)),
                "false" | "f" | "no" | "n" | "0" | "" => Ok(Some(false)),
                _ => Err(FieldError::NotABool(s.to_string())),
            },
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Null => write!(f, "null"),
            Field::Bool(b) => write!(f, "{b}"),
            Field::Number(v) => write!(f, "{v}"),
            Field::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&Value> for Field {
    /// Arrays and objects are kept as text, they will never parse as anything.
    ///
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Field::Null,
            Value::Bool(b) => Field::Bool(*b),
            Value::Number(n) => n.as_f64().map(Field::Number).unwrap_or(Field::Null),
            Value::String(s) => Field::Text(s.clone()),
            v => Field::Text(v.to_string()),
        }
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Number(value)
    }
}

impl From<Option<f64>> for Field {
    fn from(value: Option<f64>) -> Self {
        value.map(Field::Number).unwrap_or_default()
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Field::Bool(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_string())
    }
}
