//! Field-level validation shared by request and response bodies.
//!
//! Request bodies implement [`FromBody`]: they are checked and converted into
//! domain input in one pass. Response bodies implement [`Validate`] and are
//! checked before serialization. Both are built from the same [`rules`], so a
//! field accepted on the way in is held to the same constraint on the way out.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Error codes reported in [`FieldViolation::error_code`].
pub mod codes {
    pub const REQUIRED: &str = "required";
    pub const TYPE: &str = "type";
    pub const FORMAT: &str = "format";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MINIMUM: &str = "minimum";
    pub const MAXIMUM: &str = "maximum";
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
    pub error_code: &'static str,
}

/// Collects violations while walking a value.
#[derive(Debug, Default)]
pub struct Violations {
    items: Vec<FieldViolation>,
}

impl Violations {
    pub fn push(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        code: &'static str,
    ) {
        self.items.push(FieldViolation {
            path: path.into(),
            message: message.into(),
            error_code: code,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.items
    }
}

/// Joins a parent path and a field name.
pub fn field(path: &str, name: &str) -> String {
    format!("{}.{}", path, name)
}

/// Joins a parent path and a sequence index.
pub fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

/// Checks applied to outgoing bodies.
pub trait Validate {
    fn validate_at(&self, path: &str, violations: &mut Violations);

    fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Violations::default();
        self.validate_at("body", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations.into_vec())
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate_at(&self, path: &str, violations: &mut Violations) {
        for (i, item) in self.iter().enumerate() {
            item.validate_at(&index(path, i), violations);
        }
    }
}

/// Domain input parsed from an incoming JSON body.
pub trait FromBody: Sized {
    /// Wire shape of the body. Fields are optional so that missing values are
    /// reported per field rather than as a single deserialization error.
    type Body: DeserializeOwned;

    /// Returns `None` iff at least one violation was recorded.
    fn from_body(body: Self::Body, path: &str, violations: &mut Violations) -> Option<Self>;

    fn parse(body: Self::Body) -> Result<Self, Vec<FieldViolation>> {
        let mut violations = Violations::default();
        match Self::from_body(body, "body", &mut violations) {
            Some(value) if violations.is_empty() => Ok(value),
            _ => Err(violations.into_vec()),
        }
    }
}

/// The individual field rules.
pub mod rules {
    use super::*;

    /// Reports a missing value.
    pub fn required<T>(
        violations: &mut Violations,
        path: &str,
        name: &str,
        value: Option<T>,
    ) -> Option<T> {
        if value.is_none() {
            violations.push(
                field(path, name),
                format!("must have required property '{}'", name),
                codes::REQUIRED,
            );
        }
        value
    }

    /// Non-empty after trimming.
    pub fn text(violations: &mut Violations, path: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            violations.push(path, "must NOT be empty", codes::MIN_LENGTH);
            return false;
        }
        true
    }

    /// A required, non-empty string field.
    pub fn required_text(
        violations: &mut Violations,
        path: &str,
        name: &str,
        value: Option<String>,
    ) -> Option<String> {
        let value = required(violations, path, name, value)?;
        text(violations, &field(path, name), &value).then_some(value)
    }

    /// Calendar date in `YYYY-MM-DD` form.
    pub fn date(violations: &mut Violations, path: &str, value: &str) -> Option<NaiveDate> {
        match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                violations.push(path, "must match format \"date\"", codes::FORMAT);
                None
            }
        }
    }

    /// A plausible email address: one `@` with non-empty local part and a dotted domain.
    pub fn email(violations: &mut Violations, path: &str, value: &str) -> bool {
        let valid = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !value.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            violations.push(path, "must match format \"email\"", codes::FORMAT);
        }
        valid
    }

    pub fn non_negative_int(violations: &mut Violations, path: &str, value: i64) -> bool {
        if value < 0 {
            violations.push(path, "must be >= 0", codes::MINIMUM);
            return false;
        }
        true
    }

    pub fn at_most_int(violations: &mut Violations, path: &str, value: i64, max: i64) -> bool {
        if value > max {
            violations.push(path, format!("must be <= {}", max), codes::MAXIMUM);
            return false;
        }
        true
    }

    pub fn at_most(violations: &mut Violations, path: &str, value: f64, max: f64) -> bool {
        if value > max {
            violations.push(path, format!("must be <= {}", max), codes::MAXIMUM);
            return false;
        }
        true
    }

    /// Finite and `>= 0`.
    pub fn non_negative(violations: &mut Violations, path: &str, value: f64) -> bool {
        if !value.is_finite() {
            violations.push(path, "must be a finite number", codes::TYPE);
            return false;
        }
        if value < 0.0 {
            violations.push(path, "must be >= 0", codes::MINIMUM);
            return false;
        }
        true
    }
}
