//! # Testing & Assertions
//!
//! Assertion vocabulary evaluated against captured HTTP responses, the
//! ordered step plan for the Idea resource, and the sequential runner that
//! produces a [`RunReport`].

pub mod runner;
pub mod steps;

use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;

use crate::http::response::HttpResponse;

pub use runner::{RunReport, Runner, StepOutcome, StepReport, run_suite};
pub use steps::{RunContext, Step};

const BODY_EXCERPT_CHARS: usize = 200;

/// Target of an assertion within the HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum AssertionTarget {
    StatusCode,
    /// Top-level field of a JSON object body.
    JsonField(String),
    /// The JSON body as a whole.
    JsonBody,
    /// The raw body text.
    Body,
}

impl Display for AssertionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionTarget::StatusCode => write!(f, "status"),
            AssertionTarget::JsonField(field) => write!(f, "field `{field}`"),
            AssertionTarget::JsonBody => write!(f, "JSON body"),
            AssertionTarget::Body => write!(f, "body"),
        }
    }
}

/// Comparison operator for an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionOperator {
    Equals,
    Contains,
    /// A JSON array with at least one element.
    NonEmptyArray,
}

impl Display for AssertionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssertionOperator::Equals => "equals",
            AssertionOperator::Contains => "contains",
            AssertionOperator::NonEmptyArray => "is a non-empty array",
        };
        write!(f, "{label}")
    }
}

/// A single assertion that can be evaluated against a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assertion {
    pub target: AssertionTarget,
    pub operator: AssertionOperator,
    pub expected: String,
}

/// Result of evaluating an assertion.
#[derive(Debug, Clone, Serialize)]
pub struct AssertionResult {
    pub assertion: Assertion,
    pub passed: bool,
    pub actual: String,
    pub message: String,
}

impl Assertion {
    pub fn status(code: u16) -> Self {
        Self {
            target: AssertionTarget::StatusCode,
            operator: AssertionOperator::Equals,
            expected: code.to_string(),
        }
    }

    pub fn field_equals(field: &str, expected: &str) -> Self {
        Self {
            target: AssertionTarget::JsonField(field.to_string()),
            operator: AssertionOperator::Equals,
            expected: expected.to_string(),
        }
    }

    pub fn body_contains(text: &str) -> Self {
        Self {
            target: AssertionTarget::Body,
            operator: AssertionOperator::Contains,
            expected: text.to_string(),
        }
    }

    pub fn json_array_not_empty() -> Self {
        Self {
            target: AssertionTarget::JsonBody,
            operator: AssertionOperator::NonEmptyArray,
            expected: String::new(),
        }
    }

    pub fn evaluate(&self, response: &HttpResponse) -> AssertionResult {
        let actual = self.actual_value(response);
        let passed = match self.operator {
            AssertionOperator::Equals => actual.as_deref() == Some(self.expected.as_str()),
            AssertionOperator::Contains => actual
                .as_deref()
                .is_some_and(|value| value.contains(self.expected.as_str())),
            AssertionOperator::NonEmptyArray => self.is_non_empty_array(response),
        };

        let actual = match (&self.target, actual) {
            (AssertionTarget::Body, Some(_)) => response.body_excerpt(BODY_EXCERPT_CHARS),
            (_, Some(value)) => value,
            (_, None) => "<missing>".to_string(),
        };

        let message = if passed {
            format!("{} {} {}", self.target, self.operator, self.expected)
                .trim_end()
                .to_string()
        } else if self.operator == AssertionOperator::NonEmptyArray {
            format!("expected {} {}, got {actual}", self.target, self.operator)
        } else {
            format!(
                "expected {} {} `{}`, got `{actual}`",
                self.target, self.operator, self.expected
            )
        };

        AssertionResult {
            assertion: self.clone(),
            passed,
            actual,
            message,
        }
    }

    fn actual_value(&self, response: &HttpResponse) -> Option<String> {
        match &self.target {
            AssertionTarget::StatusCode => Some(response.status.to_string()),
            AssertionTarget::Body => Some(response.body.clone()),
            AssertionTarget::JsonField(field) => {
                let value: Value = serde_json::from_str(&response.body).ok()?;
                match value.get(field)? {
                    Value::String(text) => Some(text.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                }
            }
            AssertionTarget::JsonBody => Some(describe_json(&response.body)),
        }
    }

    fn is_non_empty_array(&self, response: &HttpResponse) -> bool {
        let Ok(body) = serde_json::from_str::<Value>(&response.body) else {
            return false;
        };
        let value = match &self.target {
            AssertionTarget::JsonBody => Some(&body),
            AssertionTarget::JsonField(field) => body.get(field),
            AssertionTarget::StatusCode | AssertionTarget::Body => None,
        };
        matches!(value, Some(Value::Array(items)) if !items.is_empty())
    }
}

fn describe_json(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => format!("array of {} item(s)", items.len()),
        Ok(Value::Object(map)) => format!("object with {} field(s)", map.len()),
        Ok(Value::Null) => "null".to_string(),
        Ok(other) => other.to_string(),
        Err(_) => "<invalid JSON>".to_string(),
    }
}
