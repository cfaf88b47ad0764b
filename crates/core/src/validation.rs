//! Declarative input validation
//!
//! Constraints are evaluated synchronously and collected into a
//! [`ValidationResult`]; nothing here raises for a failed rule.
//!
//! # Example
//!
//! ```
//! use spaces_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("name", "Rooftop garden")
//!     .max_chars("name", "Rooftop garden", 40)
//!     .hex_color("themeColorHexaCode", "#69701e")
//!     .range("radius", 50.0, 0.0, 100.0)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .expect("hex color pattern is valid")
});

/// A single failed constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Machine-readable rule name
    pub code: String,
    /// Expected value (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations, in rule order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations for one field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.field == field)
    }

    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.violations.extend(other.violations);
    }

    /// Convert to Result type
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
            Err(Error::new(
                ErrorCode::ConstraintViolation,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
#[derive(Debug, Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        mut self,
        field: &str,
        code: &str,
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    ) -> Self {
        self.result.add(Violation {
            field: field.to_string(),
            message,
            code: code.to_string(),
            expected,
            actual,
        });
        self
    }

    /// Validate that a field is not blank
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            return self.push(
                field,
                "REQUIRED",
                "Field is required".to_string(),
                Some("non-empty value".to_string()),
                Some("empty".to_string()),
            );
        }
        self
    }

    /// Validate maximum length, counted in characters
    pub fn max_chars(self, field: &str, value: &str, max: usize) -> Self {
        let len = value.chars().count();
        if len > max {
            return self.push(
                field,
                "MAX_LENGTH",
                format!("Must contain at most {max} character(s)"),
                Some(format!("<= {max} chars")),
                Some(format!("{len} chars")),
            );
        }
        self
    }

    /// Validate a `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` colour
    pub fn hex_color(self, field: &str, value: &str) -> Self {
        if !HEX_COLOR.is_match(value) {
            return self.push(
                field,
                "HEX_COLOR",
                "Must be a hex colour".to_string(),
                Some("#rrggbb".to_string()),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate an inclusive numeric range. NaN never passes.
    pub fn range<T: PartialOrd + std::fmt::Display>(
        self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        let in_range = value >= min && value <= max;
        if !in_range {
            return self.push(
                field,
                "RANGE",
                format!("Must be between {min} and {max}"),
                Some(format!("{min} - {max}")),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate that a number is neither NaN nor infinite
    pub fn finite(self, field: &str, value: f64) -> Self {
        if !value.is_finite() {
            return self.push(
                field,
                "FINITE",
                "Must be a finite number".to_string(),
                None,
                Some(value.to_string()),
            );
        }
        self
    }

    /// Add a custom validation; the closure returns a message on failure
    pub fn custom<F>(self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        match f() {
            Some(message) => self.push(field, "CUSTOM", message, None, None),
            None => self,
        }
    }

    /// Fold a nested result in
    pub fn nested(mut self, other: ValidationResult) -> Self {
        self.result.merge(other);
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("name", "   ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.violations()[0].code, "REQUIRED");
    }

    #[test]
    fn test_max_chars_counts_characters() {
        let forty_one = "a".repeat(41);
        let result = Validator::new().max_chars("name", &forty_one, 40).validate();
        assert_eq!(result.violations()[0].code, "MAX_LENGTH");

        // 40 multi-byte characters should still pass
        let accented = "é".repeat(40);
        assert!(Validator::new().max_chars("name", &accented, 40).validate().is_valid());
    }

    #[test]
    fn test_hex_color_validation() {
        for ok in ["#fff", "#69701e", "#212078", "#FFAA00CC"] {
            assert!(Validator::new().hex_color("c", ok).validate().is_valid(), "{ok}");
        }
        for bad in ["", "#ggg", "#12345", "red", "212078", "##212078"] {
            assert!(!Validator::new().hex_color("c", bad).validate().is_valid(), "{bad}");
        }
    }

    #[test]
    fn test_range_validation() {
        let result = Validator::new().range("radius", 150.0, 0.0, 100.0).validate();
        assert_eq!(result.violations()[0].code, "RANGE");
        assert!(!Validator::new().range("radius", f64::NAN, 0.0, 100.0).validate().is_valid());
        assert!(Validator::new().range("radius", 100.0, 0.0, 100.0).validate().is_valid());
    }

    #[test]
    fn test_violations_collected_not_short_circuited() {
        let result = Validator::new()
            .required("name", "")
            .hex_color("color", "nope")
            .range("radius", -1.0, 0.0, 100.0)
            .validate();
        assert_eq!(result.violations().len(), 3);
        assert_eq!(result.for_field("color").count(), 1);
    }

    #[test]
    fn test_into_result() {
        let err = Validator::new()
            .custom("location", || Some("out of range".to_string()))
            .validate()
            .into_result()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConstraintViolation);
        assert!(err.message.contains("location: out of range"));
    }
}
