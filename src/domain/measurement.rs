//! Live measurement values keyed by variable name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current value of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MeasurementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A SenML-style record as published to and returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Variable name.
    pub n: String,
    /// Unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<String>,
    /// Numeric value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<f64>,
    /// String value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vs: Option<String>,
}

impl MeasurementRecord {
    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            n: name.into(),
            v: Some(value),
            ..Self::default()
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            n: name.into(),
            vs: Some(value.into()),
            ..Self::default()
        }
    }

    /// A non-empty string value takes precedence over the numeric one.
    #[must_use]
    pub fn value(&self) -> Option<MeasurementValue> {
        match (&self.vs, self.v) {
            (Some(text), _) if !text.is_empty() => Some(MeasurementValue::Text(text.clone())),
            (_, Some(number)) => Some(MeasurementValue::Number(number)),
            _ => None,
        }
    }
}
